//! HTTP API over the analysis workflow
//!
//! | Method | Path | Body / Query |
//! |--------|------|--------------|
//! | POST | `/api/start` | `{session_id?}` |
//! | POST | `/api/message` | `{message, session_id?}` |
//! | GET | `/api/status` | `?session_id=` |
//! | POST | `/api/reset` | `{session_id?}` |
//! | GET | `/api/tools` | |
//! | GET | `/health` | |
//!
//! Sessions are keyed by `session_id`, `"default"` when omitted.

mod error;
mod routes;
mod state;

pub use error::{ApiError, ServerError};
pub use routes::router;
pub use state::{AppState, DEFAULT_SESSION};

use tokio::net::TcpListener;
use tracing::info;

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(state: AppState, addr: &str) -> Result<(), ServerError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.to_string(),
            source,
        })?;
    info!(addr, "HTTP API listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServerError::Serve)
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutting down HTTP API");
    }
}
