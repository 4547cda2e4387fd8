//! Server-Sent Events handler for catalog changes

use crate::state::AppState;
use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::Stream;
use std::convert::Infallible;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

/// SSE endpoint; each event carries its JSON form as data
pub async fn sync_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = BroadcastStream::new(state.subscribe());

    let event_stream = stream.filter_map(|result| match result {
        Ok(event) => match Event::default().event(event.name()).json_data(&event) {
            Ok(sse) => Some(Ok(sse)),
            Err(e) => {
                tracing::warn!("Failed to encode {} event: {}", event.name(), e);
                None
            }
        },
        Err(_) => None, // Lagged, skip
    });

    Sse::new(event_stream).keep_alive(KeepAlive::default())
}
