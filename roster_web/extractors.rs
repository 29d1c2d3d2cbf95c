use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, Request, multipart::MultipartError},
    http::header::CONTENT_TYPE,
};
use uuid::Uuid;

use roster_app::{images::ImageUpload, validation::PlayerForm};
use roster_types::errors::AppError;

use crate::error::ApiError;

/// The only multipart part allowed to carry a file.
pub const IMAGE_FIELD: &str = "image";

/// Player fields plus an optional image, from a multipart form or a JSON body.
///
/// Multipart text parts become fields and the `image` part becomes the
/// upload; an empty `image` part counts as no image. Any other body is read
/// as JSON, and an empty body yields no fields at all.
#[derive(Debug, Default)]
pub struct PlayerPayload {
    pub form: PlayerForm,
    pub image: Option<ImageUpload>,
}

impl<S> FromRequest<S> for PlayerPayload
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.to_lowercase().starts_with("multipart/form-data"));

        if is_multipart {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| ApiError::upload(e.body_text()))?;
            return read_multipart(multipart).await;
        }

        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::validation(e.body_text()))?;

        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(PlayerPayload::default());
        }

        let value: serde_json::Value = serde_json::from_slice(&body)
            .map_err(|e| ApiError::validation(format!("Invalid JSON body: {e}")))?;

        Ok(PlayerPayload {
            form: PlayerForm::from_json(value)?,
            image: None,
        })
    }
}

async fn read_multipart(mut multipart: Multipart) -> Result<PlayerPayload, ApiError> {
    let mut payload = PlayerPayload::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();

        if field.file_name().is_none() {
            let value = field.text().await.map_err(multipart_error)?;
            payload.form.insert(name, value);
            continue;
        }

        if name != IMAGE_FIELD || payload.image.is_some() {
            return Err(AppError::UnexpectedFileField(name).into());
        }

        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field.bytes().await.map_err(multipart_error)?;

        if !bytes.is_empty() {
            payload.image = Some(ImageUpload::new(bytes.to_vec(), content_type));
        }
    }

    Ok(payload)
}

fn multipart_error(e: MultipartError) -> ApiError {
    ApiError::upload(e.body_text())
}

/// Ids that are not UUIDs cannot name a player.
pub fn parse_player_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::player_not_found())
}
