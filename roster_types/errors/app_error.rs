use thiserror::Error;
use uuid::Uuid;

/// Errors for app logic: input validation and image uploads.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}")]
    Validation { field: String, message: String },

    #[error("Image file size too large. Maximum size is {}MB", .max / (1024 * 1024))]
    ImageTooLarge { size: usize, max: usize },

    #[error("Invalid image type '{0}'. Allowed types: JPEG, PNG, WebP")]
    UnsupportedImageType(String),

    #[error("Image could not be processed: {0}")]
    UnreadableImage(String),

    #[error("Unexpected file field '{0}'")]
    UnexpectedFileField(String),

    #[error("Player with ID {0} has no image")]
    ImageNotFound(Uuid),
}
