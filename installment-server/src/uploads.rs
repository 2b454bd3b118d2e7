//! Customer Image Store
//!
//! Validates uploaded customer photos and stores them content-addressed:
//! `<uploads>/customers/<sha256>.<ext>`. Uploading the same bytes twice
//! yields the same path and writes nothing the second time.

use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use shared::error::{AppError, AppResult, ErrorCode};

/// Supported image formats
const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// Sub-directory of the uploads root holding customer photos
const CUSTOMERS_DIR: &str = "customers";

/// Calculate SHA256 hash of data
fn calculate_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Lowercased extension of an uploaded filename
fn extension_of(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}

/// Customer photo storage rooted at the uploads directory
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
    max_bytes: usize,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            root: root.into(),
            max_bytes,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Validate image file
    ///
    /// Checks run cheapest first: empty, size, extension, then a full decode.
    pub fn validate(&self, data: &[u8], filename: &str) -> AppResult<String> {
        if data.is_empty() {
            return Err(AppError::new(ErrorCode::EmptyFile));
        }

        if data.len() > self.max_bytes {
            return Err(AppError::with_message(
                ErrorCode::FileTooLarge,
                format!(
                    "File too large. Maximum size is {} bytes ({}MB)",
                    self.max_bytes,
                    self.max_bytes / 1024 / 1024
                ),
            )
            .with_detail("size", data.len())
            .with_detail("max_size", self.max_bytes));
        }

        let ext = extension_of(filename).unwrap_or_default();
        if !SUPPORTED_FORMATS.contains(&ext.as_str()) {
            return Err(AppError::with_message(
                ErrorCode::UnsupportedFileFormat,
                format!(
                    "Unsupported file format '{}'. Supported: {}",
                    ext,
                    SUPPORTED_FORMATS.join(", ")
                ),
            ));
        }

        // Verify it's actually an image by trying to load it
        if let Err(e) = image::load_from_memory(data) {
            return Err(AppError::with_message(
                ErrorCode::InvalidImageFile,
                format!("Invalid image file ({}): {}", ext, e),
            ));
        }

        Ok(ext)
    }

    /// Validate and persist a customer photo
    ///
    /// Returns the path relative to the work dir, e.g.
    /// `uploads/customers/<hash>.png`, which is what the customer row keeps.
    pub fn store_customer_image(&self, data: &[u8], filename: &str) -> AppResult<String> {
        let ext = self.validate(data, filename)?;
        let hash = calculate_hash(data);
        let name = format!("{hash}.{ext}");

        let dir = self.root.join(CUSTOMERS_DIR);
        let path = dir.join(&name);
        if path.exists() {
            tracing::debug!(file = %name, "Customer image already stored");
        } else {
            fs::create_dir_all(&dir).map_err(|e| {
                AppError::with_message(
                    ErrorCode::FileStorageFailed,
                    format!("Failed to create image dir: {}", e),
                )
            })?;
            fs::write(&path, data).map_err(|e| {
                AppError::with_message(
                    ErrorCode::FileStorageFailed,
                    format!("Failed to save image: {}", e),
                )
            })?;
            tracing::info!(file = %name, size = data.len(), "Customer image stored");
        }

        Ok(format!("uploads/{CUSTOMERS_DIR}/{name}"))
    }
}
