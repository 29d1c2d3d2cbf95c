//! Profile image uploads: validation, thumbnailing and the storage port.
//!
//! Uploads are checked for size and MIME type, decoded, cropped to a
//! 300x300 square and re-encoded as JPEG before they reach the store.
//! Removing an image is always best-effort: callers go through
//! [`discard_image`], which logs failures instead of returning them.

use async_trait::async_trait;
use image::{DynamicImage, codecs::jpeg::JpegEncoder, imageops::FilterType};

use roster_types::{
    Result,
    errors::{AppError, ApplicationError},
    player::ImageRef,
};

pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;
pub const THUMBNAIL_SIZE: u32 = 300;
pub const THUMBNAIL_QUALITY: u8 = 80;
pub const THUMBNAIL_EXTENSION: &str = "jpg";
pub const THUMBNAIL_CONTENT_TYPE: &str = "image/jpeg";

const ALLOWED_CONTENT_TYPES: [&str; 4] = ["image/jpeg", "image/jpg", "image/png", "image/webp"];

/// Storage for image files, addressed by a generated filename.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persists `bytes` under a new unique name and returns that name.
    async fn save(&self, bytes: Vec<u8>, extension: &str) -> Result<String, ApplicationError>;

    /// Returns `None` when no such file exists.
    async fn load(&self, filename: &str) -> Result<Option<Vec<u8>>, ApplicationError>;

    async fn remove(&self, filename: &str) -> Result<(), ApplicationError>;
}

/// A file received with a create or update request.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl ImageUpload {
    pub fn new(bytes: Vec<u8>, content_type: impl Into<String>) -> Self {
        Self {
            bytes,
            content_type: content_type.into(),
        }
    }

    /// Content type without parameters, lowercased ("image/PNG; x=y" -> "image/png").
    pub fn mime(&self) -> String {
        self.content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_lowercase()
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.bytes.len() > MAX_IMAGE_BYTES {
            return Err(AppError::ImageTooLarge {
                size: self.bytes.len(),
                max: MAX_IMAGE_BYTES,
            });
        }

        let mime = self.mime();
        if !ALLOWED_CONTENT_TYPES.contains(&mime.as_str()) {
            return Err(AppError::UnsupportedImageType(mime));
        }

        Ok(())
    }
}

/// Center-crops to a square thumbnail and encodes it as JPEG.
pub fn make_thumbnail(bytes: &[u8]) -> Result<Vec<u8>, AppError> {
    let decoded =
        image::load_from_memory(bytes).map_err(|e| AppError::UnreadableImage(e.to_string()))?;

    let square = decoded.resize_to_fill(THUMBNAIL_SIZE, THUMBNAIL_SIZE, FilterType::Lanczos3);
    let rgb = DynamicImage::ImageRgb8(square.to_rgb8());

    let mut out = Vec::new();
    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut out, THUMBNAIL_QUALITY))
        .map_err(|e| AppError::UnreadableImage(e.to_string()))?;

    Ok(out)
}

/// Validates, resizes and stores an upload.
pub async fn store_upload(store: &dyn ImageStore, upload: ImageUpload) -> Result<ImageRef> {
    upload.validate()?;

    let thumbnail = tokio::task::spawn_blocking(move || make_thumbnail(&upload.bytes))
        .await
        .map_err(|e| ApplicationError::Infrastructure(e.to_string()))??;

    let filename = store.save(thumbnail, THUMBNAIL_EXTENSION).await?;
    tracing::debug!("Stored player image {}", filename);

    Ok(ImageRef {
        filename,
        content_type: THUMBNAIL_CONTENT_TYPE.to_string(),
    })
}

/// Removes an image file, logging instead of failing.
pub async fn discard_image(store: &dyn ImageStore, filename: &str) {
    if let Err(e) = store.remove(filename).await {
        tracing::warn!("Failed to delete image {}: {}", filename, e);
    }
}
