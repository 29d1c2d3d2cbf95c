mod test_utils;

use axum::http::StatusCode;
use serde_json::Value;

use roster_app::config::Environment;
use roster_types::errors::ApplicationError;

use crate::test_utils::tests::{setup_broken_web_app, setup_web_app};

#[tokio::test]
async fn test_health() -> Result<(), ApplicationError> {
    let app = setup_web_app().await?;

    let res = app.client.get(app.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();

    assert_eq!(body["status"], "OK");
    assert!(body["timestamp"].is_string());
    Ok(())
}

#[tokio::test]
async fn test_api_info_lists_endpoints() -> Result<(), ApplicationError> {
    let app = setup_web_app().await?;

    let body: Value = app
        .client
        .get(app.url("/api"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert!(body["endpoints"]["GET /api/players"].is_string());
    assert!(body["version"].is_string());
    Ok(())
}

#[tokio::test]
async fn test_unknown_route_is_json_404() -> Result<(), ApplicationError> {
    let app = setup_web_app().await?;

    let res = app.client.get(app.url("/nope")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Not Found");
    Ok(())
}

#[tokio::test]
async fn test_cors_preflight_is_allowed() -> Result<(), ApplicationError> {
    let app = setup_web_app().await?;

    let res = app
        .client
        .request(reqwest::Method::OPTIONS, app.url("/api/players"))
        .header("Origin", "http://example.com")
        .header("Access-Control-Request-Method", "PATCH")
        .send()
        .await
        .unwrap();

    assert!(res.status().is_success());
    assert_eq!(res.headers()["access-control-allow-origin"], "*");
    Ok(())
}

#[tokio::test]
async fn test_internal_errors_are_hidden_in_production() -> Result<(), ApplicationError> {
    let (client, base_url) = setup_broken_web_app(Environment::Production).await?;

    let res = client
        .get(format!("{base_url}/api/players"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Internal Server Error");
    assert_eq!(body["message"], "Something went wrong");
    Ok(())
}

#[tokio::test]
async fn test_internal_errors_are_detailed_in_development() -> Result<(), ApplicationError> {
    let (client, base_url) = setup_broken_web_app(Environment::Development).await?;

    let res = client
        .get(format!("{base_url}/api/players"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await.unwrap();
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .contains("database unavailable")
    );
    Ok(())
}

#[tokio::test]
async fn test_responses_carry_security_headers() -> Result<(), ApplicationError> {
    let app = setup_web_app().await?;

    for path in ["/health", "/api/players", "/nope"] {
        let res = app.client.get(app.url(path)).send().await.unwrap();
        let headers = res.headers();

        assert_eq!(headers["x-content-type-options"], "nosniff", "path: {path}");
        assert_eq!(headers["x-frame-options"], "SAMEORIGIN", "path: {path}");
        assert_eq!(headers["referrer-policy"], "no-referrer", "path: {path}");
        assert_eq!(headers["cross-origin-resource-policy"], "cross-origin");
        assert!(headers.get("content-security-policy").is_none());
    }

    Ok(())
}
