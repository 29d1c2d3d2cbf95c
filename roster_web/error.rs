use axum::{
    Json,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::QueryRejection;
use serde_json::json;
use std::sync::Arc;

use roster_app::config::Config;
use roster_types::errors::{AppError, ApplicationError, DbError};

const INTERNAL_MESSAGE: &str = "Something went wrong";

/// An error ready to be sent as `{"error": label, "message": text}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub label: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, label: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            label,
            message: message.into(),
        }
    }

    pub fn player_not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Not Found", "Player not found")
    }

    pub fn upload(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "File Upload Error", message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Validation Error", message)
    }
}

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        match err {
            ApplicationError::App(AppError::Validation { message, .. }) => {
                ApiError::validation(message)
            }
            ApplicationError::App(
                e @ (AppError::ImageTooLarge { .. }
                | AppError::UnsupportedImageType(_)
                | AppError::UnreadableImage(_)
                | AppError::UnexpectedFileField(_)),
            ) => ApiError::upload(e.to_string()),
            ApplicationError::App(AppError::ImageNotFound(_)) => {
                ApiError::new(StatusCode::NOT_FOUND, "Not Found", "Image not found")
            }
            ApplicationError::Db(DbError::PlayerNotFound(_)) => ApiError::player_not_found(),
            ApplicationError::Db(DbError::Duplicate(_)) => ApiError::new(
                StatusCode::CONFLICT,
                "Duplicate Error",
                "A player with this information already exists",
            ),
            ApplicationError::Json(e) => ApiError::validation(e.to_string()),
            other => ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error",
                other.to_string(),
            ),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::validation(rejection.to_string())
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApplicationError::App(err).into()
    }
}

/// Detail of a 500, only sent to clients in development.
#[derive(Debug, Clone)]
pub struct InternalErrorDetail(pub String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!("Request failed: {}", self.message);
            let mut response = json_error(self.status, self.label, INTERNAL_MESSAGE);
            response
                .extensions_mut()
                .insert(InternalErrorDetail(self.message));
            return response;
        }

        json_error(self.status, self.label, self.message)
    }
}

pub fn json_error(status: StatusCode, label: &str, message: impl Into<String>) -> Response {
    (
        status,
        Json(json!({
            "error": label,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// Puts the real message of a 500 back into the body when running in development.
pub async fn expose_internal_errors(
    State(config): State<Arc<Config>>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;
    if !config.environment.is_development() {
        return response;
    }

    match response.extensions().get::<InternalErrorDetail>() {
        Some(detail) => json_error(response.status(), "Internal Server Error", detail.0.clone()),
        None => response,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_validation_maps_to_400_with_message() {
        let err: ApiError = ApplicationError::validation("runs", "Runs cannot be negative").into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.label, "Validation Error");
        assert_eq!(err.message, "Runs cannot be negative");
    }

    #[test]
    fn test_not_found_and_duplicate() {
        let not_found: ApiError =
            ApplicationError::Db(DbError::PlayerNotFound(Uuid::new_v4())).into();
        assert_eq!(not_found.status, StatusCode::NOT_FOUND);

        let duplicate: ApiError =
            ApplicationError::Db(DbError::Duplicate("players_pkey".to_string())).into();
        assert_eq!(duplicate.status, StatusCode::CONFLICT);
    }

    #[test]
    fn test_upload_errors_are_bad_requests() {
        let err: ApiError = AppError::ImageTooLarge {
            size: 6 * 1024 * 1024,
            max: 5 * 1024 * 1024,
        }
        .into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.label, "File Upload Error");
        assert!(err.message.contains("5MB"));
    }

    #[test]
    fn test_internal_errors_hide_their_message() {
        let err: ApiError = ApplicationError::Infrastructure("disk on fire".to_string()).into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);

        let response = err.into_response();
        let detail = response.extensions().get::<InternalErrorDetail>().unwrap();
        assert!(detail.0.contains("disk on fire"));
    }
}
