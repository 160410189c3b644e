use serde::Serialize;

#[derive(Serialize)]
pub struct UploadResponse {
    pub message: &'static str,
}

#[derive(Serialize)]
pub struct ListResponse {
    pub images: Vec<String>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
