//! HTTP request handlers for the public relay surface.

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use futures::TryStreamExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, warn};

use crate::error::DriveError;
use crate::models::Song;
use crate::server::AppState;

/// Content type used when upstream metadata does not report one.
const DEFAULT_CONTENT_TYPE: &str = "audio/mpeg";

#[derive(Debug, Deserialize)]
pub struct SongsQuery {
    q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

/// GET /songs - List songs in the configured folder.
pub async fn list_songs(
    State(state): State<AppState>,
    Query(params): Query<SongsQuery>,
) -> Result<Json<Vec<Song>>, (StatusCode, Json<ErrorResponse>)> {
    match state.client.list_files(params.q.as_deref()).await {
        Ok(files) => Ok(Json(files.into_iter().map(Song::from).collect())),
        Err(e) => {
            error!("Failed to list songs: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "failed to list songs".to_string(),
                    details: None,
                }),
            ))
        }
    }
}

/// GET /stream/:file_id - Proxy the file's bytes straight from Drive.
///
/// Metadata is fetched first so the Content-Type header can be set before
/// the body starts; the media stream is then forwarded chunk by chunk
/// without buffering the file.
pub async fn stream_song(State(state): State<AppState>, Path(file_id): Path<String>) -> Response {
    let metadata = match state.client.get_file(&file_id).await {
        Ok(metadata) => metadata,
        Err(e) => return stream_error(&file_id, e),
    };

    let upstream = match state.client.open_stream(&file_id).await {
        Ok(response) => response,
        Err(e) => return stream_error(&file_id, e),
    };

    let content_type = metadata
        .mime_type
        .as_deref()
        .and_then(|m| HeaderValue::from_str(m).ok())
        .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_CONTENT_TYPE));

    // Once the first chunk is on the wire an upstream failure can only
    // truncate the body; log it and let the connection close.
    let id = file_id.clone();
    let stream = upstream
        .bytes_stream()
        .inspect_err(move |e| warn!("Stream for file {} failed mid-transfer: {}", id, e));

    (
        [(header::CONTENT_TYPE, content_type)],
        Body::from_stream(stream),
    )
        .into_response()
}

/// Convert a pre-stream failure into the 500 diagnostic payload.
fn stream_error(file_id: &str, err: DriveError) -> Response {
    error!("Failed to stream file {}: {}", file_id, err);

    let details = match err {
        DriveError::ApiError { message, .. } => {
            serde_json::from_str(&message).unwrap_or(Value::String(message))
        }
        other => Value::String(other.to_string()),
    };

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: "failed to stream audio".to_string(),
            details: Some(details),
        }),
    )
        .into_response()
}
