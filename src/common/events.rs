/// Sự kiện từ tầng realtime gửi lên controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifierEvent {
    Connected,
    /// The backend signalled that the session list for the subscribed
    /// identity changed. Pure invalidation: no payload, no sequence number,
    /// so the only correct reaction is a full re-fetch.
    SessionsChanged,
    Disconnected,
}
