use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message as WsMessage;

use crate::common::{NotifierCommand, NotifierEvent, Role};
use crate::error::Result;

pub const SUBSCRIBE_EVENT: &str = "subscribe";
pub const SESSIONS_UPDATE_EVENT: &str = "sessions:update";

/// Outbound subscribe frame. The realtime channel carries no message
/// payloads; it exists only to signal "your session list changed".
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubscribeFrame<'a> {
    event: &'static str,
    owner_id: &'a str,
    role: Role,
}

#[derive(Debug, Deserialize)]
struct ServerFrame {
    event: String,
}

/// Task owning one persistent websocket connection to the backend.
///
/// One notifier per open screen: commands come down from the owning
/// controller, invalidation events go back up. The owner queues a
/// `Subscribe` command right after spawning the task; the frame goes out
/// once the socket is up. Dropping the command sender (screen unmount)
/// shuts the task down; there is no reconnect loop, the owner decides
/// whether to start a fresh task after a disconnect.
pub struct RealtimeNotifier {
    event_sender: mpsc::Sender<NotifierEvent>,
    command_receiver: mpsc::Receiver<NotifierCommand>,
    url: String,
}

impl RealtimeNotifier {
    pub fn new(
        event_sender: mpsc::Sender<NotifierEvent>,
        command_receiver: mpsc::Receiver<NotifierCommand>,
        realtime_base: impl Into<String>,
    ) -> Self {
        Self {
            event_sender,
            command_receiver,
            url: realtime_base.into(),
        }
    }

    pub async fn run(mut self) -> Result<()> {
        let (stream, _) = connect_async(self.url.as_str()).await?;
        let (mut sink, mut source) = stream.split();

        let _ = self.event_sender.send(NotifierEvent::Connected).await;
        log::info!("Realtime channel connected to {}", self.url);

        loop {
            tokio::select! {
                command = self.command_receiver.recv() => {
                    match command {
                        Some(NotifierCommand::Subscribe { owner_id, role }) => {
                            if let Err(err) = send_subscribe(&mut sink, &owner_id, role).await {
                                log::warn!("Failed to subscribe: {err}");
                                break;
                            }
                        }
                        // Owning controller went away (screen unmount).
                        None => break,
                    }
                }
                frame = source.next() => {
                    match frame {
                        Some(Ok(WsMessage::Text(text))) => self.handle_frame(text.as_str()).await,
                        Some(Ok(_)) => {}
                        Some(Err(err)) => {
                            log::warn!("Realtime channel error: {err}");
                            break;
                        }
                        None => break,
                    }
                }
            }
        }

        let _ = self.event_sender.send(NotifierEvent::Disconnected).await;
        log::info!("Realtime channel closed");
        Ok(())
    }

    async fn handle_frame(&self, text: &str) {
        match serde_json::from_str::<ServerFrame>(text) {
            Ok(frame) if frame.event == SESSIONS_UPDATE_EVENT => {
                let _ = self.event_sender.send(NotifierEvent::SessionsChanged).await;
            }
            Ok(frame) => log::debug!("Ignoring realtime event `{}`", frame.event),
            Err(err) => log::warn!("Malformed realtime frame: {err}"),
        }
    }
}

async fn send_subscribe<S>(sink: &mut S, owner_id: &str, role: Role) -> Result<()>
where
    S: futures::Sink<WsMessage, Error = tokio_tungstenite::tungstenite::Error> + Unpin,
{
    let frame = SubscribeFrame {
        event: SUBSCRIBE_EVENT,
        owner_id,
        role,
    };
    let json = serde_json::to_string(&frame)?;
    sink.send(WsMessage::text(json)).await?;
    Ok(())
}
