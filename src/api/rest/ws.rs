use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{Sink, SinkExt, Stream, StreamExt};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::broadcast::Receiver;
use tracing::{info, warn};

use crate::models::event::ShiftEvent;
use crate::state::AppState;

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Streams shift claim/release events to the client as JSON text frames.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, receiver) = socket.split();
    let rx = state.shift_events_tx.subscribe();

    info!("shift feed client connected");
    forward_events(sender, receiver, rx).await;
    info!("shift feed client disconnected");
}

/// Runs until either the client goes away or the event channel closes. The
/// other half is aborted and awaited so the broadcast receiver is dropped
/// before this returns.
async fn forward_events<S, R, E>(mut sender: S, mut receiver: R, mut rx: Receiver<ShiftEvent>)
where
    S: Sink<Message> + Unpin + Send + 'static,
    R: Stream<Item = Result<Message, E>> + Unpin + Send + 'static,
    E: Send + 'static,
{
    let mut send_task = tokio::spawn(async move {
        loop {
            let event = match rx.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "shift feed client lagged");
                    continue;
                }
                Err(RecvError::Closed) => break,
            };

            let json = match serde_json::to_string(&event) {
                Ok(json) => json,
                Err(err) => {
                    warn!(error = %err, "failed to serialize shift event for ws");
                    continue;
                }
            };

            if sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(_msg)) = receiver.next().await {}
    });

    tokio::select! {
        _ = &mut send_task => {
            recv_task.abort();
            let _ = recv_task.await;
        }
        _ = &mut recv_task => {
            send_task.abort();
            let _ = send_task.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use futures::channel::mpsc;
    use futures::stream;
    use tokio::sync::broadcast;
    use uuid::Uuid;

    use super::*;
    use crate::models::event::ShiftEventKind;

    #[tokio::test]
    async fn client_disconnect_drops_event_subscription() {
        let (events_tx, _) = broadcast::channel::<ShiftEvent>(16);
        let (sink, _frames) = mpsc::channel::<Message>(16);
        let closed = stream::empty::<Result<Message, axum::Error>>();

        forward_events(sink, closed, events_tx.subscribe()).await;

        assert_eq!(events_tx.receiver_count(), 0);
    }

    #[tokio::test]
    async fn events_are_forwarded_as_json_text() {
        let (events_tx, _) = broadcast::channel::<ShiftEvent>(16);
        let (sink, mut frames) = mpsc::channel::<Message>(16);
        let (_client_tx, client_rx) = mpsc::channel::<Result<Message, axum::Error>>(1);

        let feed = tokio::spawn(forward_events(sink, client_rx, events_tx.subscribe()));
        let donation_id = Uuid::new_v4();
        events_tx
            .send(ShiftEvent::new(ShiftEventKind::Claimed, donation_id, "a@x.com"))
            .unwrap();

        let Some(Message::Text(text)) = frames.next().await else {
            panic!("expected a text frame");
        };
        let event: serde_json::Value = serde_json::from_str(text.as_str()).unwrap();
        assert_eq!(event["donationId"], donation_id.to_string());

        drop(events_tx);
        feed.await.unwrap();
    }
}
