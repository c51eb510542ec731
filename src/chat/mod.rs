pub mod controller;
pub mod messages;
pub mod sessions;

pub use controller::ChatController;
pub use sessions::SessionStore;
