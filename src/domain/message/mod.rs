pub mod commands;
pub mod entity;
pub mod events;

pub use commands::{CreateMessage, UpdateMessage};
pub use entity::{Message, NewMessage};
pub use events::MessageEvent;
