mod common;

use anyhow::Result;
use axum::http::StatusCode;

// Bearer authentication failures must reject the request before any
// handler or database access runs.

#[tokio::test]
async fn missing_authorization_header_is_401() -> Result<()> {
    let (status, body) = common::send(common::get("/api/v1.0/admin/allergen/grid", None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 601);
    assert_eq!(body["message"], "Missing Authorization header");

    Ok(())
}

#[tokio::test]
async fn non_bearer_scheme_is_401() -> Result<()> {
    let req = axum::http::Request::builder()
        .method("GET")
        .uri("/api/v1.0/admin/allergen/grid")
        .header("Authorization", "Basic dXNlcjpwYXNz")
        .body(axum::body::Body::empty())?;
    let (status, body) = common::send(req).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 601);

    Ok(())
}

#[tokio::test]
async fn garbage_token_is_401() -> Result<()> {
    let (status, body) = common::send(common::get(
        "/api/v1.0/admin/allergen/grid",
        Some("not-a-jwt"),
    ))
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 601);

    Ok(())
}

#[tokio::test]
async fn public_routes_require_no_token() -> Result<()> {
    let (status, body) = common::send(common::get("/", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Carehome Admin API");

    Ok(())
}
