use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderName, HeaderValue, Method},
    middleware,
    routing::get,
};
use std::{io::Error, sync::Arc};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use roster_app::{app_bus::AppBus, config::Config, images::ImageStore};
use roster_types::{Result, errors::ApplicationError};

use crate::{
    error::expose_internal_errors,
    handlers::{
        api_info, create_player, delete_player, get_player, get_player_description,
        get_player_image, health, list_players, not_found, patch_player, put_player,
    },
};

/// Request bodies may exceed the image limit so that oversized uploads
/// reach the image size check instead of failing inside multipart parsing.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Hardening headers added to every response that does not set them itself.
/// No Content-Security-Policy: the API serves JSON and images only.
pub const SECURITY_HEADERS: [(&str, &str); 11] = [
    ("cross-origin-opener-policy", "same-origin"),
    ("cross-origin-resource-policy", "cross-origin"),
    ("origin-agent-cluster", "?1"),
    ("referrer-policy", "no-referrer"),
    ("strict-transport-security", "max-age=15552000; includeSubDomains"),
    ("x-content-type-options", "nosniff"),
    ("x-dns-prefetch-control", "off"),
    ("x-download-options", "noopen"),
    ("x-frame-options", "SAMEORIGIN"),
    ("x-permitted-cross-domain-policies", "none"),
    ("x-xss-protection", "0"),
];

#[derive(Clone)]
pub struct AppState {
    pub app_bus: Arc<AppBus>,
    pub images: Arc<dyn ImageStore>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(app_bus: Arc<AppBus>, images: Arc<dyn ImageStore>) -> AppState {
        let config = app_bus.config().clone();

        AppState {
            app_bus,
            images,
            config,
        }
    }
}

pub struct WebRouter {}

impl WebRouter {
    pub fn router(state: AppState) -> Router {
        let uploads = ServeDir::new(&state.config.upload_dir);
        let config = state.config.clone();

        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers(Any);

        let router = Router::new()
            .route("/health", get(health))
            .route("/api", get(api_info))
            .route("/api/players", get(list_players).post(create_player))
            .route(
                "/api/players/{id}",
                get(get_player)
                    .patch(patch_player)
                    .put(put_player)
                    .delete(delete_player),
            )
            .route("/api/players/{id}/image", get(get_player_image))
            .route(
                "/api/players/{id}/description",
                get(get_player_description),
            )
            .nest_service("/uploads", uploads)
            .fallback(not_found)
            .with_state(state)
            .layer(middleware::from_fn_with_state(config, expose_internal_errors))
            .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
            .layer(cors);

        with_security_headers(router).layer(TraceLayer::new_for_http())
    }

    pub async fn serve(state: AppState) -> Result<(), ApplicationError> {
        let addr = format!("{}:{}", state.config.host, state.config.port);
        let listener = TcpListener::bind(&addr).await.map_err(infra_error)?;

        tracing::info!("HTTP Server started, listening on http://{}", addr);
        Self::serve_on(listener, state).await
    }

    /// Serves on an already bound listener.
    pub async fn serve_on(listener: TcpListener, state: AppState) -> Result<(), ApplicationError> {
        axum::serve(listener, Self::router(state))
            .await
            .map_err(infra_error)?;

        Ok(())
    }
}

fn with_security_headers(router: Router) -> Router {
    SECURITY_HEADERS.into_iter().fold(router, |router, (name, value)| {
        router.layer(SetResponseHeaderLayer::if_not_present(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        ))
    })
}

fn infra_error(e: Error) -> ApplicationError {
    let err = format!("{:#?}", e);
    ApplicationError::Infrastructure(err)
}
