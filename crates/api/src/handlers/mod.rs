//! HTTP request handlers, one module per resource.

pub mod commands;
pub mod presence;
pub mod roles;
