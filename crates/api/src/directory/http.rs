use async_trait::async_trait;
use serde::Deserialize;
use vigil_core::roles::Role;

use super::{DirectoryClient, DirectoryError};

/// Production directory client speaking the directory's REST API.
pub struct HttpDirectoryClient {
    client: reqwest::Client,
    base_url: String,
}

/// Body returned by the directory's role-assignment endpoint.
#[derive(Debug, Deserialize)]
struct AssignResponse {
    external_id: String,
}

impl HttpDirectoryClient {
    /// Create a new client.
    ///
    /// * `base_url` - Base HTTP URL, e.g. `https://directory.internal`.
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or a [`DirectoryError::Api`]
    /// containing the status and body text on failure.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, DirectoryError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(DirectoryError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl DirectoryClient for HttpDirectoryClient {
    async fn assign_role(&self, email: &str, role: Role) -> Result<String, DirectoryError> {
        let body = serde_json::json!({
            "email": email,
            "role": role,
        });

        let response = self
            .client
            .post(format!("{}/roles", self.base_url))
            .json(&body)
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        let parsed: AssignResponse = response
            .json()
            .await
            .map_err(|e| DirectoryError::Malformed(e.to_string()))?;

        if parsed.external_id.trim().is_empty() {
            return Err(DirectoryError::Malformed(
                "empty external_id in assignment response".to_string(),
            ));
        }
        Ok(parsed.external_id)
    }

    async fn remove_role(&self, external_id: &str) -> Result<(), DirectoryError> {
        let response = self
            .client
            .delete(format!("{}/roles/{}", self.base_url, external_id))
            .send()
            .await?;

        Self::ensure_success(response).await?;
        Ok(())
    }
}
