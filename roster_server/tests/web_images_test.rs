mod test_utils;

use axum::http::StatusCode;
use serde_json::Value;

use roster_app::{images::MAX_IMAGE_BYTES, test_utils::tests::png_bytes};
use roster_types::errors::ApplicationError;

use crate::test_utils::tests::{player_multipart, setup_web_app};

fn filename_of(player: &Value) -> String {
    player["image"]
        .as_str()
        .unwrap()
        .rsplit('/')
        .next()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn test_oversized_image_is_rejected_without_mutation() -> Result<(), ApplicationError> {
    let app = setup_web_app().await?;
    let created = app.create_player("Andre Russell", "KKR", 2300).await;
    let url = app.url(&format!("/api/players/{}", created["id"].as_str().unwrap()));

    let form = player_multipart(
        &[("name", "Someone Else")],
        Some((vec![0u8; MAX_IMAGE_BYTES + 1], "image/jpeg")),
    );
    let res = app.client.patch(&url).multipart(form).send().await.unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "File Upload Error");
    assert!(body["message"].as_str().unwrap().contains("5MB"));

    let current: Value = app.client.get(&url).send().await.unwrap().json().await.unwrap();
    assert_eq!(current, created);
    assert_eq!(app.images.len(), 0);

    let form = player_multipart(
        &[
            ("name", "Sunil Narine"),
            ("team", "KKR"),
            ("country", "West Indies"),
            ("runs", "1500"),
            ("salary", "60000000"),
            ("role", "All-Rounder"),
        ],
        Some((vec![0u8; MAX_IMAGE_BYTES + 1], "image/png")),
    );
    let res = app
        .client
        .post(app.url("/api/players"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.players.count(), 1);

    Ok(())
}

#[tokio::test]
async fn test_unsupported_image_type_is_rejected() -> Result<(), ApplicationError> {
    let app = setup_web_app().await?;
    let created = app.create_player("Andre Russell", "KKR", 2300).await;
    let url = app.url(&format!("/api/players/{}", created["id"].as_str().unwrap()));

    let form = player_multipart(&[], Some((b"GIF89a".to_vec(), "image/gif")));
    let res = app.client.patch(&url).multipart(form).send().await.unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "File Upload Error");

    Ok(())
}

#[tokio::test]
async fn test_replacing_image_removes_previous_file() -> Result<(), ApplicationError> {
    let app = setup_web_app().await?;
    let created = app.create_player("Yuzvendra Chahal", "RR", 50).await;
    let url = app.url(&format!("/api/players/{}", created["id"].as_str().unwrap()));

    let form = player_multipart(&[], Some((png_bytes(64, 64), "image/png")));
    let first: Value = app
        .client
        .patch(&url)
        .multipart(form)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let first_file = filename_of(&first);
    assert!(app.images.contains(&first_file));

    let form = player_multipart(&[], Some((png_bytes(32, 96), "image/webp;q=1")));
    let res = app.client.patch(&url).multipart(form).send().await.unwrap();
    // The bytes are PNG, so decoding still works whatever the declared type.
    assert_eq!(res.status(), StatusCode::OK);
    let second: Value = res.json().await.unwrap();
    let second_file = filename_of(&second);

    assert_ne!(first_file, second_file);
    assert!(!app.images.contains(&first_file));
    assert!(app.images.contains(&second_file));
    assert_eq!(app.images.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_delete_removes_image_file() -> Result<(), ApplicationError> {
    let app = setup_web_app().await?;

    let form = player_multipart(
        &[
            ("name", "Trent Boult"),
            ("team", "MI"),
            ("country", "New Zealand"),
            ("runs", "90"),
            ("salary", "125000000"),
            ("role", "Bowler"),
        ],
        Some((png_bytes(50, 50), "image/png")),
    );
    let created: Value = app
        .client
        .post(app.url("/api/players"))
        .multipart(form)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let filename = filename_of(&created);

    let res = app
        .client
        .delete(app.url(&format!(
            "/api/players/{}",
            created["id"].as_str().unwrap()
        )))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert!(!app.images.contains(&filename));

    Ok(())
}

#[tokio::test]
async fn test_unexpected_file_field_is_rejected() -> Result<(), ApplicationError> {
    let app = setup_web_app().await?;

    let part = reqwest::multipart::Part::bytes(png_bytes(10, 10))
        .file_name("avatar.png")
        .mime_str("image/png")
        .unwrap();
    let form = player_multipart(&[("name", "Nobody")], None).part("avatar", part);

    let res = app
        .client
        .post(app.url("/api/players"))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "File Upload Error");
    assert_eq!(app.players.count(), 0);

    Ok(())
}

#[tokio::test]
async fn test_image_of_player_without_image_is_not_found() -> Result<(), ApplicationError> {
    let app = setup_web_app().await?;
    let created = app.create_player("Kuldeep Yadav", "DC", 100).await;

    let res = app
        .client
        .get(app.url(&format!(
            "/api/players/{}/image",
            created["id"].as_str().unwrap()
        )))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Image not found");

    Ok(())
}
