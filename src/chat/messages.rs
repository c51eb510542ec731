use crate::api::ChatTransport;
use crate::common::{ChatMessage, OutgoingMessage, Role};
use crate::error::{ClientError, Result};

/// The (driver, passenger) pairing that keys a conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatPair {
    pub driver_id: String,
    pub passenger_id: String,
}

impl ChatPair {
    /// Build the pair from the signed-in side plus the counterpart id.
    pub fn from_identity(user_id: &str, role: Role, counterpart_id: &str) -> Self {
        match role {
            Role::Driver => Self {
                driver_id: user_id.to_string(),
                passenger_id: counterpart_id.to_string(),
            },
            Role::Passenger => Self {
                driver_id: counterpart_id.to_string(),
                passenger_id: user_id.to_string(),
            },
        }
    }

    fn is_complete(&self) -> bool {
        !self.driver_id.is_empty() && !self.passenger_id.is_empty()
    }
}

/// Fetch/append access to the message history of one conversation.
pub struct MessageChannel<T: ChatTransport> {
    transport: T,
}

impl<T: ChatTransport> MessageChannel<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Ordered history for the pair, oldest first, as returned by the
    /// backend. A failed fetch degrades to an empty list so the screen
    /// still renders.
    pub async fn history(&self, pair: &ChatPair) -> Vec<ChatMessage> {
        match self
            .transport
            .fetch_history(&pair.driver_id, &pair.passenger_id)
            .await
        {
            Ok(messages) => messages,
            Err(err) => {
                log::warn!("Failed to fetch chat history: {err}");
                Vec::new()
            }
        }
    }

    /// Append a message to the conversation.
    ///
    /// Rejected before any network call when either side of the pair is
    /// unknown. There is no idempotency key: resubmitting after an
    /// ambiguous failure can duplicate the message on the backend.
    /// The caller re-fetches `history` to observe the new message; the
    /// backend pushes only the session-list invalidation signal.
    pub async fn send(
        &self,
        pair: &ChatPair,
        sender_id: &str,
        sender_role: Role,
        body: impl Into<String>,
        booking_id: Option<i64>,
    ) -> Result<()> {
        if !pair.is_complete() {
            log::warn!("Chat send rejected: missing driver or passenger id");
            return Err(ClientError::MissingIdentity);
        }

        let outgoing = OutgoingMessage {
            driver_id: pair.driver_id.clone(),
            passenger_id: pair.passenger_id.clone(),
            booking_id,
            sender_id: sender_id.to_string(),
            sender_role,
            message: body.into(),
        };
        self.transport.send_message(&outgoing).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::testing::{Call, MockTransport};

    fn pair() -> ChatPair {
        ChatPair {
            driver_id: "d-1".to_string(),
            passenger_id: "p-9".to_string(),
        }
    }

    #[test]
    fn pair_is_oriented_by_role() {
        let from_driver = ChatPair::from_identity("d-1", Role::Driver, "p-9");
        let from_passenger = ChatPair::from_identity("p-9", Role::Passenger, "d-1");
        assert_eq!(from_driver, from_passenger);
    }

    #[tokio::test]
    async fn history_is_an_idempotent_read() {
        let transport = MockTransport::new();
        transport.seed_message("d-1", "p-9", Role::Passenger, "Saan po kayo?");
        transport.seed_message("d-1", "p-9", Role::Driver, "Malapit na");

        let channel = MessageChannel::new(transport);
        let first = channel.history(&pair()).await;
        let second = channel.history(&pair()).await;
        assert_eq!(first.len(), 2);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn sent_message_shows_up_last_with_its_role() {
        let transport = MockTransport::new();
        transport.seed_message("d-1", "p-9", Role::Passenger, "Saan po kayo?");

        let channel = MessageChannel::new(transport);
        channel
            .send(&pair(), "d-1", Role::Driver, "Nasa kanto na", Some(7))
            .await
            .unwrap();

        let history = channel.history(&pair()).await;
        let last = history.last().unwrap();
        assert_eq!(last.message, "Nasa kanto na");
        assert_eq!(last.sender_role, Role::Driver);
        assert_eq!(last.booking_id, Some(7));
    }

    #[tokio::test]
    async fn send_without_both_ids_never_touches_the_network() {
        let transport = MockTransport::new();
        let channel = MessageChannel::new(transport.clone());

        let incomplete = ChatPair {
            driver_id: String::new(),
            passenger_id: "p-9".to_string(),
        };
        let err = channel
            .send(&incomplete, "p-9", Role::Passenger, "hello", None)
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::MissingIdentity));
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn send_records_the_sender() {
        let transport = MockTransport::new();
        let channel = MessageChannel::new(transport.clone());
        channel
            .send(&pair(), "p-9", Role::Passenger, "ETA?", None)
            .await
            .unwrap();

        assert_eq!(
            transport.calls(),
            vec![Call::Send {
                sender_id: "p-9".to_string()
            }]
        );
    }
}
