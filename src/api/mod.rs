pub mod transport;

pub use transport::{ChatTransport, HttpTransport};
