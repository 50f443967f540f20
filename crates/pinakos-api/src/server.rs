//! HTTP server entry point.

use pinakos_core::Result;

use crate::routes::router;
use crate::state::AppState;

/// Bind the configured address and serve until the process ends.
pub async fn serve(state: AppState) -> Result<()> {
    let addr = state.config.bind_addr.clone();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    log::info!("pinakos API listening on {addr}");

    axum::serve(listener, router(state)).await?;
    Ok(())
}
