use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::models::StatusRecord;
use crate::table::StatusTable;

pub async fn get_stats(State(table): State<Arc<StatusTable>>) -> Json<Vec<StatusRecord>> {
    Json(table.snapshot().await.records)
}

pub fn create_router(table: Arc<StatusTable>) -> Router {
    Router::new()
        .route("/api/stats", get(get_stats))
        .layer(TraceLayer::new_for_http())
        .with_state(table)
}

pub async fn start_server(
    port: u16,
    table: Arc<StatusTable>,
    cancel: CancellationToken,
) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    serve(listener, table, cancel).await
}

/// Serves the status endpoint until `cancel` fires.
pub async fn serve(
    listener: TcpListener,
    table: Arc<StatusTable>,
    cancel: CancellationToken,
) -> std::io::Result<()> {
    info!("Status endpoint: http://{}/api/stats", listener.local_addr()?);
    axum::serve(listener, create_router(table))
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await
}
