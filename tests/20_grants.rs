mod common;

use anyhow::Result;
use axum::http::StatusCode;
use carehome_api::grant::GrantLevel;
use serde_json::json;

// Authorization gate behavior at the HTTP boundary. All routes used here
// fail before any database access, so no live database is required.

#[tokio::test]
async fn caller_without_grant_is_denied() -> Result<()> {
    let token = common::token(&[]);
    let (status, body) = common::send(common::options(
        "/api/v1.0/admin/allergen/grid",
        Some(&token),
    ))
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 603);

    Ok(())
}

#[tokio::test]
async fn view_grant_admits_metadata_but_not_create() -> Result<()> {
    let token = common::token(&[("persistence-common-allergen", GrantLevel::View)]);

    let (status, _) = common::send(common::options(
        "/api/v1.0/admin/allergen/grid",
        Some(&token),
    ))
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = common::send(common::json_request(
        "POST",
        "/api/v1.0/admin/allergen",
        Some(&token),
        &json!({"title": "Lidocaine"}),
    ))
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 603);

    Ok(())
}

#[tokio::test]
async fn grants_do_not_leak_across_resources() -> Result<()> {
    let token = common::token(&[("persistence-common-allergen", GrantLevel::Delete)]);

    let (status, body) = common::send(common::options(
        "/api/v1.0/admin/apartment/grid",
        Some(&token),
    ))
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 603);

    Ok(())
}

#[tokio::test]
async fn unknown_resource_is_404_with_generic_code() -> Result<()> {
    let token = common::token(&[("persistence-common-allergen", GrantLevel::View)]);

    let (status, body) = common::send(common::options(
        "/api/v1.0/admin/starship/grid",
        Some(&token),
    ))
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 620);

    Ok(())
}

#[tokio::test]
async fn edit_grant_does_not_allow_delete() -> Result<()> {
    let token = common::token(&[("persistence-common-allergen", GrantLevel::Edit)]);

    let (status, body) = common::send(common::json_request(
        "DELETE",
        "/api/v1.0/admin/allergen",
        Some(&token),
        &json!([1, 2, 3]),
    ))
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 603);

    Ok(())
}
