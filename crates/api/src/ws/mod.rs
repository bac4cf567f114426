//! WebSocket infrastructure: the group-keyed connection manager (the
//! production [`crate::broadcast::Broadcaster`]), the upgrade handler, and
//! the heartbeat task.

pub mod handler;
pub mod heartbeat;
pub mod manager;

pub use handler::ws_handler;
pub use heartbeat::start_heartbeat;
pub use manager::GroupBroadcaster;
