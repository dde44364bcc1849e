pub mod queue;
pub mod repositories;
