//! Local filesystem storage for uploaded car photos.
//!
//! Files live under `<media_root>/carros/` with generated names; the database
//! stores the path relative to `media_root` and the API exposes it under
//! `media_url`.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use concessionaria_core::carro::FOTO_UPLOAD_DIR;
use image::{ImageFormat, ImageReader};

#[derive(Debug, thiserror::Error)]
pub enum PhotoError {
    #[error("uploaded file is not a supported image")]
    InvalidImage,

    #[error("photo storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// An uploaded file as received from a multipart form.
#[derive(Debug, Clone)]
pub struct UploadedPhoto {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Writes, resolves and removes photo files below a media root.
#[derive(Debug, Clone)]
pub struct PhotoStore {
    root: PathBuf,
    media_url: String,
}

impl PhotoStore {
    pub fn new(root: impl Into<PathBuf>, media_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            media_url: media_url.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// URL prefix used when rendering `foto` in responses.
    pub fn media_url(&self) -> &str {
        &self.media_url
    }

    /// Validate that `upload` decodes as a supported image and write it to disk.
    ///
    /// Returns the stored path relative to the media root.
    pub async fn save(&self, upload: &UploadedPhoto) -> Result<String, PhotoError> {
        let format = sniff_image(&upload.bytes)?;
        let relative = format!(
            "{FOTO_UPLOAD_DIR}/{}.{}",
            uuid::Uuid::new_v4().simple(),
            extension_for(format)
        );

        let dir = self.root.join(FOTO_UPLOAD_DIR);
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(self.root.join(&relative), &upload.bytes).await?;

        tracing::info!(
            path = %relative,
            original_name = %upload.file_name,
            size = upload.bytes.len(),
            "Stored carro photo"
        );
        Ok(relative)
    }

    /// Remove a stored photo. Missing files and failures are logged, not returned.
    pub async fn remove(&self, relative: &str) {
        let Some(path) = self.resolve(relative) else {
            tracing::warn!(path = %relative, "Refusing to remove photo outside media root");
            return;
        };
        match tokio::fs::remove_file(&path).await {
            Ok(()) => tracing::debug!(path = %relative, "Removed carro photo"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %relative, "Photo already gone");
            }
            Err(e) => tracing::warn!(path = %relative, error = %e, "Failed to remove photo"),
        }
    }

    /// Map a stored relative path back onto the filesystem, rejecting traversal.
    fn resolve(&self, relative: &str) -> Option<PathBuf> {
        let candidate = Path::new(relative);
        let safe = candidate
            .components()
            .all(|c| matches!(c, std::path::Component::Normal(_)));
        safe.then(|| self.root.join(candidate))
    }
}

/// Identify the image format from its magic bytes and confirm the header decodes.
fn sniff_image(bytes: &[u8]) -> Result<ImageFormat, PhotoError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|_| PhotoError::InvalidImage)?;
    let format = reader.format().ok_or(PhotoError::InvalidImage)?;
    if !matches!(format, ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::WebP) {
        return Err(PhotoError::InvalidImage);
    }
    reader
        .into_dimensions()
        .map_err(|_| PhotoError::InvalidImage)?;
    Ok(format)
}

fn extension_for(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Jpeg => "jpg",
        ImageFormat::WebP => "webp",
        _ => "png",
    }
}
