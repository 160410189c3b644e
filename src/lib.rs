//! Image upload service: accepts image uploads over HTTP, stores them in a
//! flat directory and lists what is stored.

pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod storage;

pub use config::Config;
pub use error::UploadError;
pub use routes::router;
pub use storage::Storage;
