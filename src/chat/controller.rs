use crate::api::ChatTransport;
use crate::common::{ChatMessage, Identity, NotifierEvent, Session};
use crate::error::Result;

use super::messages::{ChatPair, MessageChannel};
use super::sessions::SessionStore;

/// Orchestrates one open conversation for the chat screen: counterpart
/// name resolution, history loading, sending, and session-list refresh on
/// realtime invalidation signals.
pub struct ChatController<T: ChatTransport + Clone> {
    transport: T,
    channel: MessageChannel<T>,
    store: SessionStore<T>,
    identity: Identity,
    pair: ChatPair,
    counterpart_id: String,
    booking_id: Option<i64>,
    counterpart_name: String,
}

impl<T: ChatTransport + Clone> ChatController<T> {
    pub fn new(
        transport: T,
        identity: Identity,
        counterpart_id: impl Into<String>,
        booking_id: Option<i64>,
    ) -> Self {
        let counterpart_id = counterpart_id.into();
        let pair = ChatPair::from_identity(&identity.user_id, identity.role, &counterpart_id);
        // Until resolved, show the generic role label.
        let counterpart_name = identity.role.counterpart().fallback_label().to_string();
        Self {
            channel: MessageChannel::new(transport.clone()),
            store: SessionStore::new(transport.clone()),
            transport,
            identity,
            pair,
            counterpart_id,
            booking_id,
            counterpart_name,
        }
    }

    /// Mount-time work: resolve the counterpart display name, then load the
    /// initial history. Name resolution failure never blocks the screen;
    /// the generic label stays in place.
    pub async fn start(&mut self) -> Vec<ChatMessage> {
        let counterpart_role = self.identity.role.counterpart();
        match self
            .transport
            .fetch_profile(&self.counterpart_id, counterpart_role)
            .await
        {
            Ok(profile) => {
                if let Some(name) = profile.display_name() {
                    self.counterpart_name = name;
                }
            }
            Err(err) => {
                log::warn!(
                    "Could not resolve name for {}: {err}; using generic label",
                    self.counterpart_id
                );
            }
        }

        self.channel.history(&self.pair).await
    }

    pub fn counterpart_name(&self) -> &str {
        &self.counterpart_name
    }

    /// Send a message and re-fetch the history to observe it. The backend
    /// does not push message payloads, only the session-list signal.
    pub async fn send(&self, body: impl Into<String>) -> Result<Vec<ChatMessage>> {
        self.channel
            .send(
                &self.pair,
                &self.identity.user_id,
                self.identity.role,
                body,
                self.booking_id,
            )
            .await?;
        Ok(self.channel.history(&self.pair).await)
    }

    /// React to a realtime event. One `SessionsChanged` signal triggers one
    /// refresh; bursts are not debounced.
    pub async fn handle_event(&mut self, event: NotifierEvent) {
        match event {
            NotifierEvent::SessionsChanged => {
                self.store
                    .refresh(&self.identity.user_id, self.identity.role)
                    .await;
            }
            NotifierEvent::Connected => log::info!("Realtime channel up"),
            NotifierEvent::Disconnected => log::info!("Realtime channel closed"),
        }
    }

    pub fn sessions(&self) -> &[Session] {
        self.store.sessions()
    }

    pub async fn refresh_sessions(&mut self) {
        self.store
            .refresh(&self.identity.user_id, self.identity.role)
            .await;
    }
}
