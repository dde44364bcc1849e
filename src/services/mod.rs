pub mod broadcaster;
pub mod conversations;
pub mod handlers;
pub mod messages;
pub mod response;

#[cfg(test)]
pub(crate) mod test_doubles;
