use super::types::Role;

/// Lệnh controller gửi xuống tầng realtime.
#[derive(Debug, Clone)]
pub enum NotifierCommand {
    /// Announce interest in session updates for an identity. The owner
    /// queues this right after spawning the task, and again if the
    /// signed-in account changes.
    Subscribe { owner_id: String, role: Role },
}
