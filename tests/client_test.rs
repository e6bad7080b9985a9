//! Tests for DriveClient with mocked HTTP responses.

use std::io::Write;
use std::sync::Arc;

use async_trait::async_trait;
use drivecast::auth::TokenProvider;
use drivecast::error::{DriveError, Result as DriveResult};
use drivecast::models::{FileListResponse, FileMetadata, ServiceAccountCredentials};
use drivecast::{Authenticator, DriveClient};
use mockito::Matcher;
use serde_json::json;
use tempfile::NamedTempFile;

/// Token provider that hands out a fixed token without any exchange.
struct StubTokens;

#[async_trait]
impl TokenProvider for StubTokens {
    async fn get_token(&self) -> DriveResult<String> {
        Ok("test-token".to_string())
    }
}

fn client_for(server: &mockito::Server) -> DriveClient {
    DriveClient::new(Arc::new(StubTokens), "folder1".to_string()).with_base_url(server.url())
}

mod listing {
    use super::*;

    #[tokio::test]
    async fn list_files_maps_response() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("GET", "/files")
            .match_header("authorization", "Bearer test-token")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded(
                    "q".into(),
                    "'folder1' in parents and trashed = false".into(),
                ),
                Matcher::UrlEncoded(
                    "fields".into(),
                    "nextPageToken, files(id, name, webContentLink)".into(),
                ),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "files": [
                        {"id": "id1", "name": "lofi-beat.opus"},
                        {"id": "id2", "name": "rock.opus"}
                    ]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = client_for(&server);
        let files = client.list_files(None).await.unwrap();

        mock.assert_async().await;
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].id, "id1");
        assert_eq!(files[0].name, "lofi-beat.opus");
    }

    #[tokio::test]
    async fn list_files_passes_filter_through() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("GET", "/files")
            .match_query(Matcher::UrlEncoded(
                "q".into(),
                "'folder1' in parents and trashed = false and name contains 'lofi'".into(),
            ))
            .with_status(200)
            .with_body(json!({"files": [{"id": "id1", "name": "lofi-beat.opus"}]}).to_string())
            .create_async()
            .await;

        let client = client_for(&server);
        let files = client.list_files(Some("lofi")).await.unwrap();

        mock.assert_async().await;
        assert_eq!(files.len(), 1);
    }

    #[tokio::test]
    async fn list_files_escapes_quotes_in_filter() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("GET", "/files")
            .match_query(Matcher::UrlEncoded(
                "q".into(),
                "'folder1' in parents and trashed = false and name contains 'rock\\'n'".into(),
            ))
            .with_status(200)
            .with_body(json!({"files": []}).to_string())
            .create_async()
            .await;

        let client = client_for(&server);
        let files = client.list_files(Some("rock'n")).await.unwrap();

        mock.assert_async().await;
        assert!(files.is_empty());
    }

    #[tokio::test]
    async fn list_files_surfaces_api_error() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock("GET", "/files")
            .match_query(Matcher::Any)
            .with_status(403)
            .with_body(
                json!({"error": {"code": 403, "message": "The caller does not have permission"}})
                    .to_string(),
            )
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client.list_files(None).await.unwrap_err();

        match err {
            DriveError::ApiError { status, message } => {
                assert_eq!(status, 403);
                assert!(message.contains("permission"));
            }
            other => panic!("Expected ApiError, got {:?}", other),
        }
    }
}

mod metadata {
    use super::*;

    #[tokio::test]
    async fn get_file_returns_metadata() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("GET", "/files/abc123")
            .match_header("authorization", "Bearer test-token")
            .match_query(Matcher::UrlEncoded(
                "fields".into(),
                "id, name, mimeType".into(),
            ))
            .with_status(200)
            .with_body(
                json!({"id": "abc123", "name": "track.opus", "mimeType": "audio/ogg"}).to_string(),
            )
            .create_async()
            .await;

        let client = client_for(&server);
        let metadata = client.get_file("abc123").await.unwrap();

        mock.assert_async().await;
        assert_eq!(metadata.id, "abc123");
        assert_eq!(metadata.mime_type, Some("audio/ogg".to_string()));
    }

    #[tokio::test]
    async fn get_file_maps_not_found() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock("GET", "/files/missing")
            .match_query(Matcher::Any)
            .with_status(404)
            .with_body(json!({"error": {"code": 404, "message": "File not found"}}).to_string())
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client.get_file("missing").await.unwrap_err();

        match err {
            DriveError::ApiError { status, .. } => assert_eq!(status, 404),
            other => panic!("Expected ApiError, got {:?}", other),
        }
    }
}

mod streaming {
    use super::*;

    #[tokio::test]
    async fn open_stream_returns_raw_bytes() {
        let mut server = mockito::Server::new_async().await;

        let payload: Vec<u8> = (0u8..=255).cycle().take(4096).collect();

        let mock = server
            .mock("GET", "/files/abc123")
            .match_header("authorization", "Bearer test-token")
            .match_query(Matcher::UrlEncoded("alt".into(), "media".into()))
            .with_status(200)
            .with_header("content-type", "application/octet-stream")
            .with_body(payload.clone())
            .create_async()
            .await;

        let client = client_for(&server);
        let response = client.open_stream("abc123").await.unwrap();
        let body = response.bytes().await.unwrap();

        mock.assert_async().await;
        assert_eq!(body.as_ref(), payload.as_slice());
    }

    #[tokio::test]
    async fn open_stream_surfaces_api_error() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock("GET", "/files/abc123")
            .match_query(Matcher::UrlEncoded("alt".into(), "media".into()))
            .with_status(500)
            .with_body("upstream exploded")
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client.open_stream("abc123").await.unwrap_err();

        match err {
            DriveError::ApiError { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "upstream exploded");
            }
            other => panic!("Expected ApiError, got {:?}", other),
        }
    }
}

mod models {
    use super::*;

    #[test]
    fn test_file_metadata_deserialization() {
        let json = json!({
            "id": "file123",
            "name": "track.opus",
            "mimeType": "audio/ogg",
            "webContentLink": "https://drive.google.com/uc?id=file123"
        });

        let metadata: FileMetadata = serde_json::from_value(json).unwrap();

        assert_eq!(metadata.id, "file123");
        assert_eq!(metadata.name, "track.opus");
        assert_eq!(metadata.mime_type, Some("audio/ogg".to_string()));
    }

    #[test]
    fn test_file_metadata_without_mime_type() {
        let json = json!({
            "id": "file123",
            "name": "track.opus"
        });

        let metadata: FileMetadata = serde_json::from_value(json).unwrap();

        assert_eq!(metadata.id, "file123");
        assert_eq!(metadata.mime_type, None);
    }

    #[test]
    fn test_file_list_response_deserialization() {
        let json = json!({
            "files": [
                {"id": "f1", "name": "file1.opus"},
                {"id": "f2", "name": "file2.opus"}
            ],
            "nextPageToken": "token123"
        });

        let response: FileListResponse = serde_json::from_value(json).unwrap();

        assert_eq!(response.files.len(), 2);
        assert_eq!(response.next_page_token, Some("token123".to_string()));
    }

    #[test]
    fn test_file_list_response_empty() {
        let json = json!({
            "files": []
        });

        let response: FileListResponse = serde_json::from_value(json).unwrap();

        assert!(response.files.is_empty());
        assert!(response.next_page_token.is_none());
    }
}

mod credentials {
    use super::*;

    #[test]
    fn test_credentials_from_json() {
        let json = json!({
            "client_email": "test@project.iam.gserviceaccount.com",
            "private_key": "key",
            "token_uri": "https://oauth2.googleapis.com/token"
        });

        let creds: ServiceAccountCredentials = serde_json::from_value(json).unwrap();

        assert_eq!(creds.client_email, "test@project.iam.gserviceaccount.com");
        assert_eq!(
            creds.token_uri,
            Some("https://oauth2.googleapis.com/token".to_string())
        );
    }

    #[test]
    fn test_authenticator_from_file() {
        // Create a temporary credentials file
        let mut temp_file = NamedTempFile::new().unwrap();
        let creds_json = json!({
            "client_email": "test@project.iam.gserviceaccount.com",
            "private_key": "key"
        });

        temp_file
            .write_all(creds_json.to_string().as_bytes())
            .unwrap();

        let auth = Authenticator::from_file(temp_file.path());
        assert!(auth.is_ok());
    }

    #[test]
    fn test_authenticator_from_invalid_file() {
        let auth = Authenticator::from_file("/nonexistent/path/credentials.json");
        assert!(auth.is_err());
    }

    #[test]
    fn test_authenticator_from_invalid_json() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"not valid json").unwrap();

        let auth = Authenticator::from_file(temp_file.path());
        assert!(auth.is_err());
    }
}

mod error_handling {
    use drivecast::error::DriveError;

    #[test]
    fn test_error_display() {
        let err = DriveError::ApiError {
            status: 404,
            message: "File not found".to_string(),
        };

        let display = format!("{}", err);
        assert!(display.contains("404"));
        assert!(display.contains("File not found"));
    }

    #[test]
    fn test_invalid_folder_error() {
        let err = DriveError::InvalidFolder("bad-url".to_string());
        let display = format!("{}", err);
        assert!(display.contains("bad-url"));
    }
}
