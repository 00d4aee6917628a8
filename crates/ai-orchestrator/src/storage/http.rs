use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::{Deserialize, Serialize};

use super::{File, Storage, StorageError};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SaveRequest<'a> {
    base64: &'a str,
    file_type: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SaveResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    file_path: Option<String>,
}

/// Stores files in a remote image service through `POST /api/image/save`.
#[derive(Clone)]
pub struct HttpStorage {
    client: Client,
    base_url: String,
    jwt: Option<String>,
}

impl HttpStorage {
    /// Creates a storage that talks to the service at `base_url`.
    #[inline]
    pub fn new<S: Into<String>>(base_url: S) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
            jwt: None,
        }
    }

    /// Sends the token as a bearer credential with every request.
    #[inline]
    pub fn with_jwt<S: Into<String>>(mut self, jwt: S) -> Self {
        self.jwt = Some(jwt.into());
        self
    }
}

#[async_trait]
impl Storage for HttpStorage {
    async fn persist_file(&self, file: File) -> Result<String, StorageError> {
        file.validate()?;

        let mut req = self
            .client
            .post(format!("{}/api/image/save", self.base_url))
            .header(ACCEPT, mime::APPLICATION_JSON.as_ref())
            .header(CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
            .json(&SaveRequest {
                base64: &file.base64_content,
                file_type: &file.mime_type,
            });
        if let Some(jwt) = &self.jwt {
            req = req.bearer_auth(jwt);
        }

        debug!("saving a {} file to {}", file.mime_type, self.base_url);
        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            error!("image service responded with {status}");
            return Err(StorageError::Status(status));
        }

        let content: SaveResponse = resp.json().await?;
        if content.status != "success" {
            let message =
                content.message.unwrap_or_else(|| "Unknown error".to_owned());
            error!("image service rejected the file: {message}");
            return Err(StorageError::Rejected(message));
        }
        Ok(content.file_path.unwrap_or_default())
    }
}
