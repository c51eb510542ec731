pub mod commands;
pub mod events;
pub mod types;

pub use commands::NotifierCommand;
pub use events::NotifierEvent;
pub use types::{ChatMessage, Coordinate, Identity, OutgoingMessage, Profile, Role, Session};
