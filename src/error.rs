//! Request-level errors and their HTTP rendering.

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::models::ErrorResponse;

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("No file part")]
    NoFilePart,

    #[error("No selected file")]
    NoSelectedFile,

    #[error("Invalid file type")]
    InvalidFileType,

    #[error("Malformed multipart body: {0}")]
    Multipart(#[from] MultipartError),

    #[error("File not found")]
    NotFound,

    #[error("Storage error: {0}")]
    Io(#[from] std::io::Error),
}

impl UploadError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NoFilePart | Self::NoSelectedFile | Self::InvalidFileType | Self::Multipart(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        let status = self.status();

        let error = if status.is_server_error() {
            tracing::error!(status = %status, error = %self, "Server error in request handler");
            "Internal server error".to_string()
        } else {
            tracing::debug!(status = %status, error = %self, "Rejected request");
            self.to_string()
        };

        (status, Json(ErrorResponse { error })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_are_bad_request() {
        assert_eq!(UploadError::NoFilePart.status(), StatusCode::BAD_REQUEST);
        assert_eq!(UploadError::NoSelectedFile.status(), StatusCode::BAD_REQUEST);
        assert_eq!(UploadError::InvalidFileType.status(), StatusCode::BAD_REQUEST);
        assert_eq!(UploadError::NotFound.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn io_errors_hide_details() {
        let err = UploadError::from(std::io::Error::from(std::io::ErrorKind::PermissionDenied));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn messages_match_wire_format() {
        assert_eq!(UploadError::NoFilePart.to_string(), "No file part");
        assert_eq!(UploadError::NoSelectedFile.to_string(), "No selected file");
        assert_eq!(UploadError::InvalidFileType.to_string(), "Invalid file type");
    }
}
