use crate::codec::JpegCodec;
use crate::config::{quality_from_strength, ServiceConfig};
use crate::constants::MAX_BODY_BYTES;
use crate::error::{CompressionError, Result, Severity};
use crate::tree::{compress_tree, CompressionReport};
use crate::upload::compress_upload;
use axum::{
    extract::{DefaultBodyLimit, Extension, Form, Multipart},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared per-process state: the resolved codec capability and the immutable
/// service configuration.
pub struct ServiceState {
    pub codec: JpegCodec,
    pub config: ServiceConfig,
}

pub fn router(state: ServiceState) -> Router {
    Router::new()
        .route("/v1/compress", post(compress_image))
        .route("/v1/compress-folder-recursive", post(compress_folder_recursive))
        .route("/v1/health", get(health))
        .route("/health", get(health))
        .layer(Extension(Arc::new(state)))
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "up": true }))
}

/// Boundary error: a compression failure plus the status it maps to.
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl From<CompressionError> for ApiError {
    fn from(err: CompressionError) -> Self {
        let status = match err.severity() {
            Severity::BadInput => StatusCode::BAD_REQUEST,
            Severity::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

fn resolve_quality(strength: Option<u8>, config: &ServiceConfig) -> Result<u8> {
    quality_from_strength(strength.unwrap_or(config.default_strength))
}

#[derive(Debug, Serialize)]
struct CompressUploadResponse {
    file_path: String,
}

#[derive(Debug, Serialize)]
struct FolderFailure {
    source: String,
    error: String,
}

#[derive(Debug, Serialize)]
struct CompressFolderResponse {
    compressed_files: Vec<String>,
    failures: Vec<FolderFailure>,
}

impl CompressFolderResponse {
    fn from_report(report: &CompressionReport) -> Self {
        Self {
            compressed_files: report
                .outputs()
                .into_iter()
                .map(|path| path.display().to_string())
                .collect(),
            failures: report
                .failures()
                .into_iter()
                .map(|(source, error)| FolderFailure {
                    source: source.display().to_string(),
                    error: error.to_string(),
                })
                .collect(),
        }
    }
}

async fn compress_image(
    Extension(state): Extension<Arc<ServiceState>>,
    mut multipart: Multipart,
) -> std::result::Result<Json<CompressUploadResponse>, ApiError> {
    let mut upload: Option<(String, Vec<u8>)> = None;
    let mut strength: Option<u8> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::bad_request(format!("malformed multipart request: {err}")))?
    {
        let name = field.name().map(str::to_string);
        let file_name = field.file_name().map(str::to_string);

        if name.as_deref() == Some("strength") {
            let text = field
                .text()
                .await
                .map_err(|err| ApiError::bad_request(format!("unreadable strength field: {err}")))?;
            let value = text
                .trim()
                .parse::<u8>()
                .map_err(|_| ApiError::bad_request("strength must be an integer between 0 and 100"))?;
            strength = Some(value);
        } else if upload.is_none() {
            if let Some(file_name) = file_name {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|err| ApiError::bad_request(format!("unreadable image field: {err}")))?;
                upload = Some((file_name, bytes.to_vec()));
            }
        }
    }

    let (file_name, bytes) = upload.ok_or(CompressionError::EmptyUpload)?;
    let quality = resolve_quality(strength, &state.config)?;

    let output = tokio::task::spawn_blocking(move || {
        compress_upload(
            &state.codec,
            &file_name,
            bytes,
            &state.config.upload_output_root,
            quality,
        )
    })
    .await
    .map_err(|err| ApiError::internal(format!("compression task failed: {err}")))??;

    Ok(Json(CompressUploadResponse {
        file_path: output.display().to_string(),
    }))
}

#[derive(Debug, Deserialize)]
struct CompressFolderRequest {
    folder_path: String,
    strength: Option<u8>,
}

async fn compress_folder_recursive(
    Extension(state): Extension<Arc<ServiceState>>,
    Form(request): Form<CompressFolderRequest>,
) -> std::result::Result<Json<CompressFolderResponse>, ApiError> {
    let folder = request.folder_path.trim();
    if folder.is_empty() {
        return Err(ApiError::bad_request("folder path must not be blank"));
    }
    let source_root = PathBuf::from(folder);
    let quality = resolve_quality(request.strength, &state.config)?;

    let report = tokio::task::spawn_blocking(move || {
        compress_tree(
            &state.codec,
            &source_root,
            &state.config.tree_output_root,
            quality,
        )
    })
    .await
    .map_err(|err| ApiError::internal(format!("compression task failed: {err}")))??;

    Ok(Json(CompressFolderResponse::from_report(&report)))
}
