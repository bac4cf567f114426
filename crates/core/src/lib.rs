//! Pure domain types for the vigil coordinator.
//!
//! No I/O lives here: IDs and timestamps, the role/authorization model,
//! presence status, command kinds and the broadcast wire payload, and the
//! shared error taxonomy. Everything else (storage, transport) builds on
//! these types from `vigil-db` and `vigil-api`.

pub mod command;
pub mod error;
pub mod presence;
pub mod roles;
pub mod types;
