use crate::selection::PendingFile;
use crate::upload::types::UploadError;
use reqwest::multipart::{Form, Part};
use reqwest::Body;
use serde::Deserialize;

const GENERIC_FAILURE: &str = "Upload failed";

/// Body returned by both upload endpoints.
#[derive(Debug, Deserialize)]
struct BoardResponse {
    message: Option<String>,
    error: Option<String>,
}

#[derive(Clone, Debug)]
pub struct BoardClient {
    base_url: String,
    http: reqwest::Client,
}

impl BoardClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// Posts one file as multipart `file` + `title` to `/upload/file`.
    ///
    /// The file is streamed from disk, so memory use stays flat however
    /// large the upload limit is.
    pub async fn upload_file(
        &self,
        file: &PendingFile,
        title: &str,
    ) -> Result<String, UploadError> {
        let io_error = |source| UploadError::Io {
            name: file.name.clone(),
            source,
        };
        let handle = tokio::fs::File::open(&file.path).await.map_err(io_error)?;
        let length = handle.metadata().await.map_err(io_error)?.len();

        let part = Part::stream_with_length(Body::from(handle), length)
            .file_name(file.name.clone());
        let form = Form::new()
            .part("file", part)
            .text("title", title.to_string());

        let response = self
            .http
            .post(format!("{}/upload/file", self.base_url))
            .multipart(form)
            .send()
            .await?;

        Self::read_response(response).await
    }

    /// Posts a text message as form fields `title` and `content`.
    pub async fn post_message(&self, title: &str, content: &str) -> Result<String, UploadError> {
        let response = self
            .http
            .post(format!("{}/upload/message", self.base_url))
            .form(&[("title", title), ("content", content)])
            .send()
            .await?;

        Self::read_response(response).await
    }

    // The server signals the outcome in the body; the status code is not
    // consulted when a `message` is present.
    async fn read_response(response: reqwest::Response) -> Result<String, UploadError> {
        let status = response.status();
        let body = response.bytes().await?;
        let parsed: BoardResponse = serde_json::from_slice(&body)
            .map_err(|e| UploadError::Decode(format!("HTTP {}: {}", status.as_u16(), e)))?;

        match parsed {
            BoardResponse {
                message: Some(message),
                ..
            } => Ok(message),
            BoardResponse { error, .. } => Err(UploadError::Server(
                error.unwrap_or_else(|| GENERIC_FAILURE.to_string()),
            )),
        }
    }
}
