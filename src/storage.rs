//! Filesystem-backed image store.
//!
//! Every stored file lives directly under one upload directory; the
//! directory listing is the only index.

use std::{
    io,
    path::{Path, PathBuf},
};

use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};
use tokio::fs;
use unicode_normalization::UnicodeNormalization;

pub const ALLOWED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

#[cfg(windows)]
const WINDOWS_DEVICE_FILES: [&str; 22] = [
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Lower-cased extension of `filename` if it is on the allow-list.
pub fn extension(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str()).then(|| ext)
}

pub fn allowed_file(filename: &str) -> bool {
    extension(filename).is_some()
}

/// Reduces an untrusted client filename to `[A-Za-z0-9_.-]`. Accented
/// letters decay to their ASCII base via NFKD, path separators are flattened,
/// and leading/trailing dots and underscores are removed. The result can be
/// empty.
pub fn secure_filename(filename: &str) -> String {
    let flattened: String = filename
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = flattened.split_whitespace().collect::<Vec<_>>().join("_");

    let cleaned: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();

    let name = cleaned.trim_matches(|c| c == '.' || c == '_').to_string();

    #[cfg(windows)]
    {
        let stem = name.split('.').next().unwrap_or("").to_ascii_uppercase();
        if !name.is_empty() && WINDOWS_DEVICE_FILES.contains(&stem.as_str()) {
            return format!("_{}", name);
        }
    }

    name
}

pub fn generate_filename() -> String {
    let mut rng = thread_rng();

    (0..10)
        .map(|_| rng.sample(Alphanumeric) as char)
        .collect::<String>()
}

#[derive(Debug, Clone)]
pub struct Storage {
    dir: PathBuf,
}

impl Storage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Creates the upload directory and any missing parents. Safe to call
    /// repeatedly.
    pub async fn ensure_ready(&self) -> io::Result<()> {
        fs::create_dir_all(&self.dir).await
    }

    /// Name a validated upload is stored under. Falls back to a random stem
    /// when sanitizing leaves nothing usable, keeping the allowed extension
    /// so the file still shows up in listings.
    pub fn target_name(filename: &str) -> String {
        let secured = secure_filename(filename);
        if allowed_file(&secured) {
            return secured;
        }

        match extension(filename) {
            Some(ext) => format!("{}.{}", generate_filename(), ext),
            None => secured,
        }
    }

    /// Writes `bytes` under the sanitized form of `filename`, replacing any
    /// existing file of that name. Returns the stored name.
    pub async fn save(&self, filename: &str, bytes: &[u8]) -> io::Result<String> {
        let name = Self::target_name(filename);
        fs::write(self.dir.join(&name), bytes).await?;
        Ok(name)
    }

    /// Names of allowed images directly inside the upload directory, in
    /// whatever order the filesystem yields them.
    pub async fn list(&self) -> io::Result<Vec<String>> {
        self.ensure_ready().await?;

        let mut images = Vec::new();
        let mut entries = fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if let Ok(name) = entry.file_name().into_string() {
                if allowed_file(&name) {
                    images.push(name);
                }
            }
        }

        Ok(images)
    }

    /// Reads a stored image. Names that are not already in sanitized form,
    /// or lack an allowed extension, are reported as `NotFound`.
    pub async fn read(&self, filename: &str) -> io::Result<Vec<u8>> {
        if filename.is_empty() || secure_filename(filename) != filename || !allowed_file(filename) {
            return Err(io::Error::from(io::ErrorKind::NotFound));
        }

        fs::read(self.dir.join(filename)).await
    }
}
