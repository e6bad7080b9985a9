//! drivecast - an HTTP relay that lists and streams audio files from a
//! Google Drive folder.
//!
//! This library provides:
//! - A Drive client scoped to one folder (listing, metadata, media streams)
//! - Service account authentication behind the [`TokenProvider`] trait
//! - The axum router exposing `/songs` and `/stream/:file_id`
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use drivecast::server::{run, AppState};
//! use drivecast::{Authenticator, DriveClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let auth = Authenticator::from_file("service-account.json")?;
//!     let client = DriveClient::new(Arc::new(auth), "folder-id".to_string());
//!
//!     run(3000, AppState { client }).await
//! }
//! ```

pub mod auth;
pub mod client;
pub mod error;
pub mod handlers;
pub mod models;
pub mod server;
pub mod url_parser;

// Re-exports for convenience
pub use auth::{Authenticator, TokenProvider};
pub use client::DriveClient;
pub use error::{DriveError, Result};
pub use models::{FileMetadata, Song};
pub use url_parser::extract_folder_id;
