//! Change notifications: the tracing sink and the `GET /events` stream.

use std::convert::Infallible;

use axum::{
  extract::State,
  response::sse::{Event as SseEvent, KeepAlive, Sse},
};
use rapsheet_core::{
  Record,
  notify::{Notification, Notifier},
  store::RecordStore,
};
use tokio_stream::{Stream, StreamExt as _, wrappers::BroadcastStream};

use crate::AppState;

/// Logs every notification at `INFO`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
  fn notify(&self, n: &Notification) {
    tracing::info!(
      event = n.event.name(),
      cnic = %n.event.cnic(),
      event_id = %n.event_id,
      "change notification"
    );
  }
}

/// `GET /events` — server-sent events, one per notification emitted after
/// the subscription was opened. The SSE event name is the notification's
/// event name and the data is the notification as JSON.
pub async fn stream<R, S>(
  State(state): State<AppState<R, S>>,
) -> Sse<impl Stream<Item = Result<SseEvent, Infallible>>>
where
  R: Record,
  S: RecordStore<R> + 'static,
{
  let rx = state.events.subscribe();
  let events = BroadcastStream::new(rx).filter_map(|msg| match msg {
    Ok(n) => SseEvent::default()
      .event(n.event.name())
      .id(n.event_id.to_string())
      .json_data(&n)
      .ok()
      .map(Ok::<_, Infallible>),
    Err(err) => {
      tracing::warn!(%err, "event subscriber fell behind");
      None
    }
  });
  Sse::new(events).keep_alive(KeepAlive::default())
}
