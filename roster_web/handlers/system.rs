use axum::{Json, http::StatusCode, response::IntoResponse};
use chrono::Utc;
use serde_json::{Value, json};

use crate::error::json_error;

/// GET /health
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "OK",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// GET /api: what this server exposes.
pub async fn api_info() -> Json<Value> {
    Json(json!({
        "message": "Cricket Player Roster API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "GET /api/players": "List players with search, team filter, sorting and pagination",
            "POST /api/players": "Create a player",
            "GET /api/players/{id}": "Get a player",
            "PATCH /api/players/{id}": "Update some fields of a player",
            "PUT /api/players/{id}": "Replace all fields of a player",
            "DELETE /api/players/{id}": "Delete a player",
            "GET /api/players/{id}/image": "Get the profile image of a player",
            "GET /api/players/{id}/description": "Get the public profile of a player",
        },
    }))
}

pub async fn not_found() -> impl IntoResponse {
    json_error(StatusCode::NOT_FOUND, "Not Found", "Route not found")
}
