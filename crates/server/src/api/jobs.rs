//! Job API handlers: status polling and the two image intake routes.

use axum::{
    extract::{Multipart, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for status polling
#[derive(Debug, Deserialize)]
pub struct StatusParams {
    pub id: Option<String>,
}

/// Request body for clipboard submission
#[derive(Debug, Deserialize)]
pub struct ClipboardBody {
    pub data_url: Option<String>,
}

/// Response for successful submissions
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub ok: bool,
    pub id: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub ok: bool,
    pub error: String,
}

fn reject(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorBody {
            ok: false,
            error: message.to_string(),
        }),
    )
        .into_response()
}

fn submitted(id: String) -> Response {
    Json(SubmitResponse { ok: true, id }).into_response()
}

// ============================================================================
// Handlers
// ============================================================================

/// `GET /api/status?id=...` — poll a job's state, progress, and outcome.
pub async fn get_status(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StatusParams>,
) -> Response {
    let Some(id) = params.id else {
        return reject(StatusCode::BAD_REQUEST, "missing id");
    };

    // Snapshots serialize themselves; unknown ids get the not-found body
    // with a 200, pollers distinguish by the `ok` field.
    (
        [(header::CONTENT_TYPE, "application/json; charset=utf-8")],
        state.jobs().get_status_json(&id),
    )
        .into_response()
}

/// `POST /api/upload` — multipart form with an image under the `file` field.
pub async fn upload(State(state): State<Arc<AppState>>, mut multipart: Multipart) -> Response {
    let mut file_bytes = None;
    let mut filename = None;
    let mut content_type = None;

    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                if field.name() != Some("file") {
                    continue;
                }
                filename = field.file_name().map(str::to_string);
                content_type = field.content_type().map(str::to_string);
                match field.bytes().await {
                    Ok(bytes) => file_bytes = Some(bytes),
                    Err(e) => {
                        warn!("Failed to read upload body: {}", e);
                        return reject(StatusCode::BAD_REQUEST, "missing file");
                    }
                }
            }
            Ok(None) => break,
            Err(e) => {
                warn!("Malformed multipart request: {}", e);
                return reject(StatusCode::BAD_REQUEST, "missing file");
            }
        }
    }

    let Some(bytes) = file_bytes.filter(|b| !b.is_empty()) else {
        return reject(StatusCode::BAD_REQUEST, "missing file");
    };

    let suffix = filename
        .as_deref()
        .and_then(extension_from_filename)
        .map(str::to_string)
        .unwrap_or_else(|| {
            extension_for_mime(content_type.as_deref().unwrap_or_default()).to_string()
        });

    submit_image(&state, &bytes, &suffix).await
}

/// `POST /api/clipboard` — JSON body with a base64 image data URL.
pub async fn clipboard(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ClipboardBody>,
) -> Response {
    let Some(data_url) = body.data_url else {
        return reject(StatusCode::BAD_REQUEST, "missing data_url");
    };

    let Some((mime, payload)) = parse_data_url(&data_url) else {
        return reject(StatusCode::BAD_REQUEST, "invalid data_url");
    };

    let bytes = match base64::engine::general_purpose::STANDARD.decode(payload) {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!("Clipboard base64 decode failed: {}", e);
            return reject(StatusCode::BAD_REQUEST, "base64 decode failed");
        }
    };

    submit_image(&state, &bytes, extension_for_mime(mime)).await
}

/// Writes the image to a uniquely named file in the upload dir and queues it.
async fn submit_image(state: &AppState, bytes: &[u8], suffix: &str) -> Response {
    let save_path = unique_upload_path(state.upload_dir(), suffix);
    if let Err(e) = tokio::fs::write(&save_path, bytes).await {
        warn!("Failed to write {:?}: {}", save_path, e);
        return reject(StatusCode::INTERNAL_SERVER_ERROR, "failed to write temp file");
    }

    debug!("Saved {} byte upload to {:?}", bytes.len(), save_path);
    submitted(state.jobs().submit(save_path))
}

fn unique_upload_path(dir: &Path, suffix: &str) -> PathBuf {
    dir.join(format!("upload_{}{}", Uuid::new_v4().simple(), suffix))
}

fn extension_from_filename(filename: &str) -> Option<&str> {
    filename
        .rfind('.')
        .map(|dot| &filename[dot..])
        // A trailing dot carries no extension; let the mime decide.
        .filter(|suffix| suffix.len() > 1)
}

fn extension_for_mime(mime: &str) -> &'static str {
    match mime.to_ascii_lowercase().as_str() {
        "image/png" => ".png",
        "image/jpeg" | "image/jpg" => ".jpg",
        "image/webp" => ".webp",
        "image/heic" | "image/heif" => ".heic",
        _ => ".bin",
    }
}

/// Splits a `data:<mime>;base64,<payload>` URL into mime and payload.
fn parse_data_url(data_url: &str) -> Option<(&str, &str)> {
    let (meta, payload) = data_url.split_once("base64,")?;
    let mime = meta
        .strip_prefix("data:")
        .and_then(|rest| rest.split(';').next())
        .filter(|mime| !mime.is_empty())
        .unwrap_or("application/octet-stream");
    Some((mime, payload))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_data_url_png() {
        let (mime, payload) = parse_data_url("data:image/png;base64,aGVsbG8=").unwrap();
        assert_eq!(mime, "image/png");
        assert_eq!(payload, "aGVsbG8=");
    }

    #[test]
    fn test_parse_data_url_without_base64_marker() {
        assert!(parse_data_url("data:image/png,plain").is_none());
    }

    #[test]
    fn test_parse_data_url_missing_mime_defaults() {
        let (mime, _) = parse_data_url("data:;base64,AAAA").unwrap();
        assert_eq!(mime, "application/octet-stream");
    }

    #[test]
    fn test_extension_from_filename() {
        assert_eq!(extension_from_filename("shot.PNG"), Some(".PNG"));
        assert_eq!(extension_from_filename("archive.tar.gz"), Some(".gz"));
        assert_eq!(extension_from_filename("noext"), None);
    }

    #[test]
    fn test_extension_from_filename_trailing_dot_defers_to_mime() {
        assert_eq!(extension_from_filename("shot."), None);
        assert_eq!(extension_from_filename("."), None);
    }

    #[test]
    fn test_extension_for_mime() {
        assert_eq!(extension_for_mime("image/PNG"), ".png");
        assert_eq!(extension_for_mime("image/jpeg"), ".jpg");
        assert_eq!(extension_for_mime("text/plain"), ".bin");
    }
}
