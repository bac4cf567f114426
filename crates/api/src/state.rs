use std::sync::Arc;

use crate::config::ServerConfig;
use crate::directory::DirectoryClient;
use crate::ws::GroupBroadcaster;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
/// The directory is a trait object so integration tests can substitute a
/// recording mock for the HTTP client.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: vigil_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// WebSocket connection manager; the production broadcast channel.
    pub broadcaster: Arc<GroupBroadcaster>,
    /// External directory used as the system of record for roles.
    pub directory: Arc<dyn DirectoryClient>,
}
