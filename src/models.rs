//! Data models for Google Drive API responses and the public song catalog.

use serde::{Deserialize, Serialize};

/// Suffix stripped from Drive filenames when building song names.
const OPUS_SUFFIX: &str = ".opus";

/// Metadata for a file in Google Drive.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub web_content_link: Option<String>,
}

/// Response from the files.list API endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileListResponse {
    #[serde(default)]
    pub files: Vec<FileMetadata>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// A song as exposed on the public `/songs` surface.
///
/// `name` is the Drive filename with a trailing `.opus` removed; `url` is
/// the relative stream path for this file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub id: String,
    pub name: String,
    pub url: String,
}

impl From<FileMetadata> for Song {
    fn from(file: FileMetadata) -> Self {
        let name = file
            .name
            .strip_suffix(OPUS_SUFFIX)
            .unwrap_or(&file.name)
            .to_string();
        let url = format!("/stream/{}", file.id);
        Song {
            id: file.id,
            name,
            url,
        }
    }
}

/// Google API error response.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    pub code: u16,
    pub message: String,
}

/// Service account credentials from JSON file.
#[derive(Debug, Deserialize)]
pub struct ServiceAccountCredentials {
    pub client_email: String,
    pub private_key: String,
    pub token_uri: Option<String>,
}

/// OAuth2 token response.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}
