//! One-way contextual message bridge to the voice-agent session.
//!
//! The agent consumes `{"type": "contextual_update", "text": ...}` frames
//! over its conversation WebSocket. Everything here is fire-and-forget: the
//! duck hearing about the buffer is never worth an error in the editor.

use crate::domain::DuckPersonality;
use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use std::time::SystemTime;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

/// Handle for queueing contextual updates to the voice-agent session.
#[derive(Debug, Clone)]
pub struct AgentBridge {
    tx: UnboundedSender<String>,
}

impl AgentBridge {
    /// Spawns the bridge task owning the WebSocket connection. Messages
    /// queued before the connection settles are delivered once it does.
    pub fn connect(endpoint: String) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_bridge(endpoint, rx));
        Self { tx }
    }

    /// Announces the session owner and the initial buffer snapshot.
    pub fn send_session_start(&self, user_id: &str, code: &str) {
        self.enqueue(format!("USER_ID={user_id}"));
        self.enqueue(snapshot_message(code));
    }

    /// Pushes a fresh buffer snapshot, called after each successful save.
    pub fn send_code_snapshot(&self, code: &str) {
        self.enqueue(snapshot_message(code));
    }

    /// Announces a persona switch so the agent changes voice.
    pub fn send_persona(&self, persona: &DuckPersonality) {
        self.enqueue(format!(
            "The user is now talking to {}: {}.",
            persona.name, persona.description
        ));
    }

    fn enqueue(&self, text: String) {
        // A closed channel means the bridge task already gave up; snapshots
        // are advisory, so the update is dropped.
        let _ = self.tx.send(text);
    }
}

async fn run_bridge(endpoint: String, mut rx: UnboundedReceiver<String>) {
    let (stream, _) = match connect_async(endpoint.as_str()).await {
        Ok(connected) => connected,
        Err(error) => {
            tracing::warn!(%error, "voice-agent connection failed; contextual updates disabled");
            return;
        }
    };

    tracing::info!("voice-agent bridge connected");
    let (mut sink, mut source) = stream.split();

    loop {
        tokio::select! {
            queued = rx.recv() => {
                let Some(text) = queued else { break };
                if let Err(error) = sink.send(Message::text(contextual_update(&text))).await {
                    tracing::warn!(%error, "failed to push contextual update");
                    break;
                }
            }
            incoming = source.next() => {
                match incoming {
                    // The agent talks back over audio; this bridge stays one-way.
                    Some(Ok(_)) => {}
                    Some(Err(error)) => {
                        tracing::warn!(%error, "voice-agent connection error");
                        break;
                    }
                    None => break,
                }
            }
        }
    }

    let _ = sink.close().await;
}

fn contextual_update(text: &str) -> String {
    json!({ "type": "contextual_update", "text": text }).to_string()
}

fn snapshot_message(code: &str) -> String {
    let timestamp = humantime::format_rfc3339_seconds(SystemTime::now());
    format!("[{timestamp}] Current code buffer:\n{code}")
}

#[cfg(test)]
mod tests {
    use super::{contextual_update, snapshot_message};

    #[test]
    fn contextual_update_uses_the_agent_frame_shape() {
        let frame: serde_json::Value =
            serde_json::from_str(&contextual_update("hello duck")).unwrap();

        assert_eq!(frame["type"], "contextual_update");
        assert_eq!(frame["text"], "hello duck");
    }

    #[test]
    fn snapshot_carries_a_timestamp_and_the_buffer() {
        let message = snapshot_message("let x = 1;");

        assert!(message.starts_with('['));
        assert!(message.contains("] Current code buffer:\nlet x = 1;"));
    }
}
