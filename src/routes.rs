//! HTTP handlers and router assembly.

use std::{io, sync::Arc};

use axum::{
    body::Body,
    extract::{
        multipart::{Field, MultipartRejection},
        Extension, Multipart, Path,
    },
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::trace::TraceLayer;

use crate::{
    error::UploadError,
    models::{ListResponse, UploadResponse},
    storage::{self, Storage},
};

const FILE_FIELD: &str = "file";

pub fn router(storage: Storage) -> Router<Body> {
    Router::new()
        .route("/", get(get_root))
        .route("/upload", post(post_upload))
        .route("/uploads", get(get_uploads))
        .route("/uploads/:filename", get(get_upload))
        .layer(Extension(Arc::new(storage)))
        .layer(TraceLayer::new_for_http())
}

async fn get_root() -> &'static str {
    "Welcome to the home page!"
}

async fn post_upload(
    Extension(storage): Extension<Arc<Storage>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, UploadError> {
    // anything that isn't a readable form counts as a missing file part
    let mut multipart = multipart.map_err(|_| UploadError::NoFilePart)?;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) | Err(_) => return Err(UploadError::NoFilePart),
        };
        // a part without a filename parameter is a plain form value, not a file
        if field.name() == Some(FILE_FIELD) && field.file_name().is_some() {
            return store_field(&storage, field).await;
        }
    }
}

async fn store_field(
    storage: &Storage,
    field: Field<'_>,
) -> Result<Json<UploadResponse>, UploadError> {
    let filename = field.file_name().unwrap_or_default().to_string();
    if filename.is_empty() {
        return Err(UploadError::NoSelectedFile);
    }
    if !storage::allowed_file(&filename) {
        return Err(UploadError::InvalidFileType);
    }

    let bytes = field.bytes().await?;
    let stored = storage.save(&filename, &bytes).await?;
    tracing::info!(filename = %filename, stored = %stored, size = bytes.len(), "Stored upload");

    Ok(Json(UploadResponse {
        message: "File uploaded successfully",
    }))
}

async fn get_uploads(
    Extension(storage): Extension<Arc<Storage>>,
) -> Result<Json<ListResponse>, UploadError> {
    let images = storage.list().await?;
    Ok(Json(ListResponse { images }))
}

async fn get_upload(
    Extension(storage): Extension<Arc<Storage>>,
    Path(filename): Path<String>,
) -> Result<Response, UploadError> {
    let bytes = storage.read(&filename).await.map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => UploadError::NotFound,
        _ => UploadError::Io(err),
    })?;

    let content_type = match storage::extension(&filename).as_deref() {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        _ => "image/jpeg",
    };

    Ok(([(header::CONTENT_TYPE, content_type)], bytes).into_response())
}
