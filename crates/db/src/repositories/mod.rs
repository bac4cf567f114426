//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. All SQL in the workspace lives
//! here.

pub mod account_repo;
pub mod command_repo;
pub mod presence_repo;

pub use account_repo::AccountRepo;
pub use command_repo::CommandRepo;
pub use presence_repo::PresenceRepo;
