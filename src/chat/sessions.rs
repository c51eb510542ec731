use crate::api::ChatTransport;
use crate::common::{Role, Session};

/// In-memory session list for the signed-in identity.
///
/// A read-only projection of backend state: every refresh replaces the
/// whole list, there is no merge or client-side de-duplication. Rapid
/// invalidation signals each trigger their own refresh; nothing coalesces
/// them, and with no request-sequencing token the last response to resolve
/// wins.
pub struct SessionStore<T: ChatTransport> {
    transport: T,
    sessions: Vec<Session>,
}

impl<T: ChatTransport> SessionStore<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            sessions: Vec::new(),
        }
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    /// Re-fetch the session list from the backend. On failure the previous
    /// list stays visible (stale-but-available); no retry is scheduled.
    pub async fn refresh(&mut self, owner_id: &str, role: Role) {
        match self.transport.fetch_sessions(owner_id, role).await {
            Ok(sessions) => {
                log::debug!("Session list refreshed: {} entries", sessions.len());
                self.sessions = sessions;
            }
            Err(err) => {
                log::warn!("Session refresh failed, keeping stale list: {err}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::testing::MockTransport;
    use chrono::Utc;

    fn session(partner_id: &str, last_message: &str) -> Session {
        Session {
            partner_id: partner_id.to_string(),
            partner_name: None,
            last_message: last_message.to_string(),
            last_timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn refresh_replaces_the_list_wholesale() {
        let transport = MockTransport::new();
        transport.seed_sessions(vec![session("d-1", "hello"), session("d-2", "ETA?")]);

        let mut store = SessionStore::new(transport.clone());
        store.refresh("p-9", Role::Passenger).await;
        assert_eq!(store.sessions().len(), 2);

        transport.seed_sessions(vec![session("d-2", "5 mins")]);
        store.refresh("p-9", Role::Passenger).await;
        assert_eq!(store.sessions().len(), 1);
        assert_eq!(store.sessions()[0].partner_id, "d-2");
    }

    #[tokio::test]
    async fn failed_refresh_keeps_the_stale_list() {
        let transport = MockTransport::new();
        transport.seed_sessions(vec![session("d-1", "hello")]);

        let mut store = SessionStore::new(transport.clone());
        store.refresh("p-9", Role::Passenger).await;
        assert_eq!(store.sessions().len(), 1);

        transport.fail_sessions(true);
        store.refresh("p-9", Role::Passenger).await;
        assert_eq!(store.sessions().len(), 1, "stale list must survive");
    }
}
