//! WebSocket push channel + REST endpoints for notifications and replies.

use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use tokio::sync::broadcast::error::RecvError;
use tower_http::cors::CorsLayer;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::dispatcher::NotificationDispatcher;
use super::model::{ClientAction, Envelope, NotificationEvent, WsMessage};
use super::queue::RecipientQueue;
use crate::directory::UserId;
use crate::error::DispatchError;
use crate::responses::validate;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<NotificationDispatcher>,
}

impl AppState {
    fn queue(&self) -> &Arc<RecipientQueue> {
        self.dispatcher.queue()
    }
}

/// Build the Axum router with the push WebSocket and REST routes.
pub fn relay_routes(dispatcher: Arc<NotificationDispatcher>) -> Router {
    let state = AppState { dispatcher };

    Router::new()
        .route("/health", get(health))
        .route("/ws/{user_id}", get(ws_handler))
        .route("/api/notifications", post(dispatch_notification))
        .route("/api/notifications/{user_id}", get(list_notifications))
        .route("/api/responses/validate", post(validate_response))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ── Health ──────────────────────────────────────────────────────────────

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "notification-relay"
    }))
}

// ── WebSocket ───────────────────────────────────────────────────────────

async fn ws_handler(
    ws: WebSocketUpgrade,
    Path(user_id): Path<UserId>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    info!(user_id, "Push client connecting");
    let queue = Arc::clone(state.queue());
    ws.on_upgrade(move |socket| handle_socket(socket, user_id, queue))
}

async fn handle_socket(mut socket: WebSocket, user_id: UserId, queue: Arc<RecipientQueue>) {
    // Subscribe before the snapshot so nothing appended in between is missed.
    // An envelope caught by both is skipped below by id.
    let mut rx = queue.subscribe();

    let pending = queue.pending(user_id).await;
    let mut synced = synced_ids(&pending);
    if send_json(&mut socket, &WsMessage::EnvelopesSync { envelopes: pending })
        .await
        .is_err()
    {
        warn!(user_id, "Failed to send initial sync, client disconnected");
        return;
    }

    info!(user_id, "Push client connected");

    loop {
        tokio::select! {
            // Forward this recipient's envelopes
            result = rx.recv() => {
                match result {
                    Ok(envelope) => {
                        if route_live(user_id, &mut synced, &envelope) != LiveRoute::Forward {
                            continue;
                        }
                        if send_json(&mut socket, &WsMessage::Envelope { envelope }).await.is_err() {
                            debug!(user_id, "Client disconnected during send");
                            break;
                        }
                    }
                    Err(RecvError::Lagged(n)) => {
                        warn!(user_id, missed = n, "Push client lagged behind broadcast");
                        let pending = queue.pending(user_id).await;
                        synced = synced_ids(&pending);
                        if send_json(&mut socket, &WsMessage::EnvelopesSync { envelopes: pending })
                            .await
                            .is_err()
                        {
                            break;
                        }
                    }
                    Err(RecvError::Closed) => {
                        debug!("Broadcast channel closed");
                        break;
                    }
                }
            }

            // Receive replies from client
            result = socket.recv() => {
                match result {
                    Some(Ok(Message::Text(text))) => {
                        if let Some(reply) = handle_client_message(user_id, &text) {
                            if send_json(&mut socket, &reply).await.is_err() {
                                break;
                            }
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        info!(user_id, "Push client disconnected");
                        break;
                    }
                    Some(Err(e)) => {
                        warn!(user_id, error = %e, "WebSocket error");
                        break;
                    }
                    _ => {}
                }
            }
        }
    }

    info!(user_id, "Push connection closed");
}

/// Decision for an envelope arriving on the live broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LiveRoute {
    Forward,
    /// Already delivered in the last sync frame.
    AlreadySynced,
    OtherRecipient,
}

/// Ids delivered by a sync frame that may still show up on the live stream.
fn synced_ids(envelopes: &[Envelope]) -> HashSet<Uuid> {
    envelopes.iter().map(|e| e.id).collect()
}

fn route_live(user_id: UserId, synced: &mut HashSet<Uuid>, envelope: &Envelope) -> LiveRoute {
    if envelope.recipient_id != user_id {
        LiveRoute::OtherRecipient
    } else if synced.remove(&envelope.id) {
        LiveRoute::AlreadySynced
    } else {
        LiveRoute::Forward
    }
}

fn handle_client_message(user_id: UserId, text: &str) -> Option<WsMessage> {
    match serde_json::from_str::<ClientAction>(text) {
        Ok(ClientAction::Reply { text }) => Some(match validate(&text) {
            Ok(option) => {
                info!(user_id, option = %option, "Reply accepted");
                WsMessage::ReplyAccepted { option }
            }
            Err(e) => WsMessage::ReplyRejected {
                reason: e.to_string(),
            },
        }),
        Err(e) => {
            debug!(user_id, error = %e, text, "Unrecognized WS message from client");
            None
        }
    }
}

async fn send_json(socket: &mut WebSocket, msg: &WsMessage) -> Result<(), axum::Error> {
    match serde_json::to_string(msg) {
        Ok(json) => socket.send(Message::Text(json.into())).await,
        Err(e) => {
            warn!(error = %e, "Failed to serialize WS message");
            Ok(())
        }
    }
}

// ── REST Endpoints ──────────────────────────────────────────────────────

async fn list_notifications(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> impl IntoResponse {
    Json(state.queue().pending(user_id).await)
}

async fn dispatch_notification(
    State(state): State<AppState>,
    Json(event): Json<NotificationEvent>,
) -> impl IntoResponse {
    match state.dispatcher.dispatch(event).await {
        Ok(envelope) => (StatusCode::ACCEPTED, Json(serde_json::json!(envelope))),
        Err(e) => {
            let status = match e {
                DispatchError::EntityNotFound { .. } => StatusCode::NOT_FOUND,
                DispatchError::Unsupported { .. } => StatusCode::NOT_IMPLEMENTED,
                DispatchError::Lookup(_) => StatusCode::SERVICE_UNAVAILABLE,
            };
            (status, Json(serde_json::json!({"error": e.to_string()})))
        }
    }
}

#[derive(Deserialize)]
struct ValidateRequest {
    text: String,
}

async fn validate_response(Json(body): Json<ValidateRequest>) -> impl IntoResponse {
    match validate(&body.text) {
        Ok(option) => (StatusCode::OK, Json(serde_json::json!({"option": option}))),
        Err(e) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(serde_json::json!({"error": e.to_string()})),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::{Event, User};
    use crate::notifications::factory::{EnvelopeFactory, EventNotice};
    use crate::responses::ResponseOption;

    fn envelope_for(user_id: UserId) -> Envelope {
        let user = User {
            id: user_id,
            username: format!("user-{user_id}"),
        };
        let event = Event {
            id: 10,
            title: "Fly-in breakfast".into(),
        };
        EnvelopeFactory::event(EventNotice::Start, &user, &event)
    }

    #[test]
    fn live_envelope_in_snapshot_is_skipped_once() {
        let queued = envelope_for(1);
        let mut synced = synced_ids(std::slice::from_ref(&queued));

        assert_eq!(route_live(1, &mut synced, &queued), LiveRoute::AlreadySynced);
        assert!(synced.is_empty());
        // A second copy would be a genuine new delivery.
        assert_eq!(route_live(1, &mut synced, &queued), LiveRoute::Forward);
    }

    #[test]
    fn live_envelope_for_someone_else_is_dropped() {
        let theirs = envelope_for(2);
        let mut synced = synced_ids(std::slice::from_ref(&theirs));

        assert_eq!(route_live(1, &mut synced, &theirs), LiveRoute::OtherRecipient);
        assert_eq!(synced.len(), 1);
    }

    #[test]
    fn fresh_envelope_is_forwarded() {
        let mut synced = synced_ids(&[envelope_for(1)]);
        let fresh = envelope_for(1);

        assert_eq!(route_live(1, &mut synced, &fresh), LiveRoute::Forward);
        assert_eq!(synced.len(), 1);
    }

    #[test]
    fn resync_after_lag_replaces_synced_ids() {
        let before_lag = envelope_for(1);
        let missed = envelope_for(1);
        let mut synced = synced_ids(std::slice::from_ref(&before_lag));
        assert!(!synced.contains(&missed.id));

        // Re-sync snapshot now holds both; the stale set is replaced, not merged.
        synced = synced_ids(&[before_lag.clone(), missed.clone()]);
        assert_eq!(route_live(1, &mut synced, &missed), LiveRoute::AlreadySynced);
        assert_eq!(route_live(1, &mut synced, &before_lag), LiveRoute::AlreadySynced);

        let after = envelope_for(1);
        assert_eq!(route_live(1, &mut synced, &after), LiveRoute::Forward);
    }

    #[test]
    fn reply_frames_are_gated() {
        let accepted = handle_client_message(1, r#"{"action":"reply","text":"b"}"#);
        assert!(matches!(
            accepted,
            Some(WsMessage::ReplyAccepted {
                option: ResponseOption::B
            })
        ));

        let rejected = handle_client_message(1, r#"{"action":"reply","text":"bee"}"#);
        assert!(matches!(rejected, Some(WsMessage::ReplyRejected { .. })));
    }

    #[test]
    fn garbage_frames_are_ignored() {
        assert!(handle_client_message(1, "not json").is_none());
        assert!(handle_client_message(1, r#"{"action":"approve"}"#).is_none());
    }
}
