use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use axum_extra::extract::{Query, WithRejection};
use uuid::Uuid;

use roster_app::{
    command_handlers::{
        CreatePlayerCommandHandler, DeletePlayerCommandHandler, UpdatePlayerCommandHandler,
    },
    cqrs::{
        commands::{CreatePlayer, DeletePlayer, UpdatePlayer},
        queries::{GetPlayerById, GetPlayerImage, ListPlayers},
    },
    queries_handlers::{GetPlayerByIdHandler, GetPlayerImageHandler, ListPlayersHandler},
    validation::{ListParams, list_query, player_changes, player_fields},
};
use roster_types::player::{Player, PlayerChanges};

use crate::{
    dto::{MessageResponse, PlayerDescription, PlayerListResponse, PlayerResponse},
    error::ApiError,
    extractors::{PlayerPayload, parse_player_id},
    http::AppState,
};

async fn load_player(state: &AppState, player_id: Uuid) -> Result<Player, ApiError> {
    Ok(state
        .app_bus
        .query(GetPlayerById { player_id }, GetPlayerByIdHandler::new())
        .await?)
}

/// GET /api/players
pub async fn list_players(
    State(state): State<AppState>,
    WithRejection(Query(params), _): WithRejection<Query<ListParams>, ApiError>,
) -> Result<Json<PlayerListResponse>, ApiError> {
    let query = list_query(params)?;
    let (page, limit) = (query.page, query.limit);

    let result = state
        .app_bus
        .query(ListPlayers { query }, ListPlayersHandler::new())
        .await?;

    Ok(Json(PlayerListResponse::new(
        result,
        page,
        limit,
        &state.config,
    )))
}

/// POST /api/players
pub async fn create_player(
    State(state): State<AppState>,
    payload: PlayerPayload,
) -> Result<(StatusCode, Json<PlayerResponse>), ApiError> {
    let fields = player_fields(&payload.form)?;
    let command = CreatePlayer::new(fields, payload.image);
    let player_id = command.id;

    state
        .app_bus
        .execute(
            command,
            CreatePlayerCommandHandler::new(state.images.clone()),
        )
        .await?;

    let player = load_player(&state, player_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(PlayerResponse::new(player, &state.config)),
    ))
}

/// GET /api/players/{id}
pub async fn get_player(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PlayerResponse>, ApiError> {
    let player = load_player(&state, parse_player_id(&id)?).await?;
    Ok(Json(PlayerResponse::new(player, &state.config)))
}

/// GET /api/players/{id}/description
pub async fn get_player_description(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PlayerDescription>, ApiError> {
    let player = load_player(&state, parse_player_id(&id)?).await?;
    Ok(Json(PlayerDescription::new(player, &state.config)))
}

/// PATCH /api/players/{id}: only the supplied fields change.
pub async fn patch_player(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: PlayerPayload,
) -> Result<Json<PlayerResponse>, ApiError> {
    let player_id = parse_player_id(&id)?;
    let changes = player_changes(&payload.form)?;
    update_player(state, player_id, changes, payload).await
}

/// PUT /api/players/{id}: every scalar field is required and replaced.
pub async fn put_player(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: PlayerPayload,
) -> Result<Json<PlayerResponse>, ApiError> {
    let player_id = parse_player_id(&id)?;
    let changes = player_fields(&payload.form)?.into();
    update_player(state, player_id, changes, payload).await
}

async fn update_player(
    state: AppState,
    player_id: Uuid,
    changes: PlayerChanges,
    payload: PlayerPayload,
) -> Result<Json<PlayerResponse>, ApiError> {
    let command = UpdatePlayer {
        player_id,
        changes,
        image: payload.image,
    };

    state
        .app_bus
        .execute(
            command,
            UpdatePlayerCommandHandler::new(state.images.clone()),
        )
        .await?;

    let player = load_player(&state, player_id).await?;
    Ok(Json(PlayerResponse::new(player, &state.config)))
}

/// DELETE /api/players/{id}
pub async fn delete_player(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let player_id = parse_player_id(&id)?;

    state
        .app_bus
        .execute(
            DeletePlayer { player_id },
            DeletePlayerCommandHandler::new(state.images.clone()),
        )
        .await?;

    Ok(Json(MessageResponse::new("Player deleted successfully")))
}

/// GET /api/players/{id}/image: the stored thumbnail bytes.
pub async fn get_player_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let player_id = parse_player_id(&id)?;

    let image = state
        .app_bus
        .query(
            GetPlayerImage { player_id },
            GetPlayerImageHandler::new(state.images.clone()),
        )
        .await?;

    Ok(([(header::CONTENT_TYPE, image.content_type)], image.bytes))
}
