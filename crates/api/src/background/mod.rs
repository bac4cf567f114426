//! Background jobs spawned at startup and cancelled on shutdown.

pub mod delivery_sweep;
