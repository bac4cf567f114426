//! Identity-token handling.
//!
//! Authentication itself happens in the external directory; this module
//! only validates the directory-issued bearer tokens and exposes the
//! verified caller identity to handlers.

pub mod jwt;
