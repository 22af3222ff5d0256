//! HTTP client for seeding a running server with users from a JSON file

use std::path::{Path, PathBuf};

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;
use tracing::{error, info};

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Outcome of a bulk upload run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UploadSummary {
    pub uploaded: usize,
    pub failed: usize,
}

impl UploadSummary {
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Read a JSON array of user objects
pub fn load_users(path: &Path) -> Result<Vec<Value>, ClientError> {
    let content = std::fs::read_to_string(path).map_err(|source| ClientError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| ClientError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// POSTs users one at a time to the users endpoint
pub struct BulkUploader {
    client: reqwest::Client,
    api_url: String,
    token: Option<String>,
}

impl BulkUploader {
    pub fn new(api_url: impl Into<String>, token: Option<String>) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("bulk-upload/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            api_url: api_url.into(),
            token: token.filter(|t| !t.is_empty()),
        })
    }

    /// Upload every user in order. Failures are logged and counted, never fatal.
    pub async fn upload_all(&self, users: &[Value]) -> UploadSummary {
        let mut summary = UploadSummary::default();

        for (index, user) in users.iter().enumerate() {
            let position = index + 1;
            let email = user.get("email").and_then(Value::as_str).unwrap_or("<no email>");

            match self.upload(user).await {
                Ok(status) if status == StatusCode::OK || status == StatusCode::CREATED => {
                    info!(position, email, status = status.as_u16(), "Uploaded user");
                    summary.uploaded += 1;
                }
                Ok(status) => {
                    error!(position, email, status = status.as_u16(), "Failed to upload user");
                    summary.failed += 1;
                }
                Err(e) => {
                    error!(position, email, error = %e, "Exception uploading user");
                    summary.failed += 1;
                }
            }
        }

        summary
    }

    async fn upload(&self, user: &Value) -> Result<StatusCode, reqwest::Error> {
        let mut request = self.client.post(&self.api_url).json(user);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), body = %body, "Server rejected user");
        }
        Ok(status)
    }
}
