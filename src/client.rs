//! Google Drive API client scoped to a single music folder.

use std::sync::Arc;

use reqwest::{Client, Response};

use crate::auth::TokenProvider;
use crate::error::{DriveError, Result};
use crate::models::{ApiErrorResponse, FileListResponse, FileMetadata};

/// Base URL for Google Drive API v3.
const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";

/// Client for the Drive folder holding the song files.
#[derive(Clone)]
pub struct DriveClient {
    folder_id: String,
    auth: Arc<dyn TokenProvider>,
    http: Client,
    base_url: String,
}

impl DriveClient {
    /// Create a new DriveClient.
    ///
    /// # Arguments
    /// * `auth` - Token provider for upstream calls
    /// * `folder_id` - The ID of the folder containing the audio files
    pub fn new(auth: Arc<dyn TokenProvider>, folder_id: String) -> Self {
        Self {
            folder_id,
            auth,
            http: Client::new(),
            base_url: DRIVE_API_BASE.to_string(),
        }
    }

    /// Point the client at a different API base URL. Tests use this to
    /// substitute a mock server for the real Drive endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Get the folder ID this client is scoped to.
    pub fn folder_id(&self) -> &str {
        &self.folder_id
    }

    /// List non-trashed files in the folder, optionally restricted to
    /// names containing `search`.
    pub async fn list_files(&self, search: Option<&str>) -> Result<Vec<FileMetadata>> {
        let mut query = format!("'{}' in parents and trashed = false", self.folder_id);
        if let Some(term) = search {
            query.push_str(&format!(
                " and name contains '{}'",
                term.replace('\'', "\\'")
            ));
        }

        let token = self.auth.get_token().await?;
        let mut all_files = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .http
                .get(format!("{}/files", self.base_url))
                .bearer_auth(&token)
                .query(&[
                    ("q", query.as_str()),
                    ("fields", "nextPageToken, files(id, name, webContentLink)"),
                ]);

            if let Some(ref token) = page_token {
                request = request.query(&[("pageToken", token)]);
            }

            let response = request.send().await?;
            let status = response.status();

            if !status.is_success() {
                let error_body = response.text().await.unwrap_or_default();
                return Err(api_error(status.as_u16(), error_body));
            }

            let list_response: FileListResponse = response.json().await?;
            all_files.extend(list_response.files);

            match list_response.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(all_files)
    }

    /// Get file metadata by ID.
    pub async fn get_file(&self, file_id: &str) -> Result<FileMetadata> {
        let token = self.auth.get_token().await?;

        let response = self
            .http
            .get(format!("{}/files/{}", self.base_url, file_id))
            .bearer_auth(&token)
            .query(&[("fields", "id, name, mimeType")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), error_body));
        }

        let metadata: FileMetadata = response.json().await?;
        Ok(metadata)
    }

    /// Open a streamed download of the file's content.
    ///
    /// Returns the upstream response so the caller can forward its body
    /// chunk by chunk; nothing is buffered here.
    pub async fn open_stream(&self, file_id: &str) -> Result<Response> {
        let token = self.auth.get_token().await?;

        let response = self
            .http
            .get(format!("{}/files/{}", self.base_url, file_id))
            .bearer_auth(&token)
            .query(&[("alt", "media")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), error_body));
        }

        Ok(response)
    }
}

/// Map an upstream error body to a DriveError, preferring the structured
/// API error payload when it parses.
fn api_error(status: u16, body: String) -> DriveError {
    if let Ok(api_error) = serde_json::from_str::<ApiErrorResponse>(&body) {
        return DriveError::ApiError {
            status: api_error.error.code,
            message: api_error.error.message,
        };
    }
    DriveError::ApiError {
        status,
        message: body,
    }
}
