use crate::commands::Dispatcher;
use crate::error::{BotError, Result};
use crate::state;
use crate::types::discord::*;
use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio::time::{Duration, interval};
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message as WsMessage};

// GUILDS (1 << 0); interactions are delivered regardless of intents
const INTENTS: u64 = 1;

/// Run one gateway session until Discord asks for a reconnect, invalidates
/// the session, or the socket fails.
pub async fn run_gateway(gateway_url: String, dispatcher: &Dispatcher) -> Result<()> {
    let (ws_stream, _) = connect_async(&gateway_url).await?;
    let (mut write, mut read) = ws_stream.split();
    tracing::info!(url = %gateway_url, "Gateway connected");

    while let Some(msg) = read.next().await {
        let WsMessage::Text(text) = msg? else {
            continue;
        };

        let Some(event) = parse_frame(&text) else {
            continue;
        };
        state::update_sequence(event.s).await;

        if event.opcode() != Opcode::Hello {
            continue;
        }

        let interval_ms = event
            .d
            .as_ref()
            .and_then(|d| d["heartbeat_interval"].as_u64())
            .ok_or_else(|| {
                BotError::new("gateway_hello").push_str("missing heartbeat_interval")
            })?;

        // Try RESUME if we have a session, otherwise IDENTIFY
        let token = state::token().await;
        let session = state::session().await;

        let handshake = if let Some(sid) = session.session_id {
            tracing::info!(session_id = %sid, seq = ?session.sequence, "Resuming gateway session");
            json!({
                "op": Opcode::Resume as u8,
                "d": {
                    "token": token,
                    "session_id": sid,
                    "seq": session.sequence
                }
            })
        } else {
            tracing::info!("Identifying with gateway");
            json!({
                "op": Opcode::Identify as u8,
                "d": {
                    "token": token,
                    "intents": INTENTS,
                    "properties": {
                        "os": std::env::consts::OS,
                        "browser": "coordinate-bot",
                        "device": "coordinate-bot"
                    }
                }
            })
        };
        write.send(WsMessage::Text(handshake.to_string().into())).await?;

        let mut heartbeat_timer = interval(Duration::from_millis(interval_ms));
        heartbeat_timer.tick().await; // First tick immediately

        loop {
            tokio::select! {
                _ = heartbeat_timer.tick() => {
                    let heartbeat = json!({
                        "op": Opcode::Heartbeat as u8,
                        "d": state::get_sequence().await
                    });

                    if write.send(WsMessage::Text(heartbeat.to_string().into())).await.is_err() {
                        tracing::warn!("Heartbeat send failed, reconnecting");
                        return Ok(());
                    }
                    tracing::trace!("Heartbeat sent");
                }
                msg_result = read.next() => {
                    let Some(msg_result) = msg_result else {
                        tracing::warn!("Gateway stream ended");
                        return Ok(());
                    };

                    match msg_result {
                        Ok(WsMessage::Text(text)) => {
                            let Some(event) = parse_frame(&text) else {
                                continue;
                            };
                            state::update_sequence(event.s).await;

                            match event.opcode() {
                                Opcode::Dispatch => handle_dispatch_event(event, dispatcher).await,
                                Opcode::Heartbeat => {
                                    // Discord asked for an immediate heartbeat
                                    heartbeat_timer.reset_immediately();
                                }
                                Opcode::Reconnect => {
                                    tracing::info!("Gateway requested reconnect");
                                    return Ok(());
                                }
                                Opcode::InvalidSession => {
                                    let resumable = event
                                        .d
                                        .as_ref()
                                        .and_then(|d| d.as_bool())
                                        .unwrap_or(false);
                                    tracing::warn!(resumable, "Gateway session invalidated");
                                    if !resumable {
                                        state::clear_session().await;
                                    }
                                    return Ok(());
                                }
                                _ => {}
                            }
                        }
                        Ok(WsMessage::Close(frame)) => {
                            tracing::warn!(?frame, "Gateway closed the connection");
                            return Ok(());
                        }
                        Ok(_) => {}
                        Err(e) => return Err(e.into()),
                    }
                }
            }
        }
    }

    Ok(())
}

/// Decode one text frame. A frame that is not a gateway payload is logged
/// and skipped so the session survives it.
fn parse_frame(text: &str) -> Option<DiscordEvent> {
    match serde_json::from_str(text) {
        Ok(event) => Some(event),
        Err(e) => {
            tracing::warn!(error = %e, "Skipping malformed gateway frame");
            None
        }
    }
}

async fn handle_dispatch_event(event: DiscordEvent, dispatcher: &Dispatcher) {
    match event.event_type() {
        EventType::Ready => {
            let Some(d) = event.d else {
                return;
            };
            if let Some(session_id) = d["session_id"].as_str() {
                let resume_url = d["resume_gateway_url"].as_str().map(String::from);
                state::set_session(session_id.to_string(), resume_url).await;
            }
            let username = d["user"]["username"].as_str().unwrap_or_default();
            tracing::info!(user = username, "Bot logged in");
        }
        EventType::Resumed => {
            tracing::info!("Gateway session resumed");
        }
        EventType::InteractionCreate => {
            let Some(d) = event.d else {
                return;
            };
            match serde_json::from_value::<Interaction>(d) {
                Ok(interaction) => {
                    // Each interaction runs on its own task so a pending
                    // delete confirmation does not stall the gateway.
                    let dispatcher = dispatcher.clone();
                    tokio::spawn(async move {
                        if let Err(e) = dispatcher.handle_interaction(interaction).await {
                            tracing::error!("Failed to handle interaction:\n{}", e.tree());
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to parse INTERACTION_CREATE event");
                }
            }
        }
        EventType::Unknown => {}
    }
}
