use async_trait::async_trait;
use vigil_core::roles::Role;

use super::{DirectoryClient, DirectoryError};

/// Directory stand-in for development and tests.
///
/// Derives the external id deterministically from the email local part, so
/// repeated assignments for the same address resolve to the same identity
/// without any network round trip.
pub struct LocalDirectory;

#[async_trait]
impl DirectoryClient for LocalDirectory {
    async fn assign_role(&self, email: &str, _role: Role) -> Result<String, DirectoryError> {
        let local_part = email.split('@').next().unwrap_or(email);
        let external_id = local_part.trim().to_lowercase();
        if external_id.is_empty() {
            return Err(DirectoryError::Malformed(format!(
                "cannot derive identity from email {email:?}"
            )));
        }
        Ok(external_id)
    }

    async fn remove_role(&self, _external_id: &str) -> Result<(), DirectoryError> {
        Ok(())
    }
}
