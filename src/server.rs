//! Minimal status surface.
//!
//! Two read-only routes: `/` is a static landing page, `/silver` serves
//! the journal tail. The server shares nothing with the engine task
//! except the journal file, so no locking crosses the two.

use axum::Router;
use axum::extract::State;
use axum::response::Html;
use axum::routing::get;
use tokio::sync::watch;
use tracing::info;

use crate::journal::Journal;

/// How much of the journal the status page shows.
const TAIL_CHARS: usize = 8_000;

pub fn router(journal: Journal) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/silver", get(silver))
        .with_state(journal)
}

async fn home() -> Html<&'static str> {
    Html("<h1>Silver Bullet Bot LIVE</h1><p>Log → <a href='/silver'>/silver</a></p>")
}

async fn silver(State(journal): State<Journal>) -> Html<String> {
    let body = journal
        .tail(TAIL_CHARS)
        .unwrap_or_else(|| "Silver Bullet log starting...".to_string());

    Html(format!(
        "<pre>{body}</pre><meta http-equiv='refresh' content='5'>"
    ))
}

/// Serve the status surface until `shutdown` flips.
pub async fn serve(
    port: u16,
    journal: Journal,
    mut shutdown: watch::Receiver<bool>,
) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!(port, "status surface listening");

    axum::serve(listener, router(journal))
        .with_graceful_shutdown(async move {
            let _ = shutdown.changed().await;
        })
        .await?;

    Ok(())
}
