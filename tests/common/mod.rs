use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use std::collections::HashMap;
use tower::ServiceExt;

use carehome_api::auth::{generate_jwt, Claims};
use carehome_api::grant::GrantLevel;
use carehome_api::server::app;

/// Mint a bearer token for space 1 with the given grants. Relies on the
/// development JWT secret default.
pub fn token(perms: &[(&str, GrantLevel)]) -> String {
    let permissions: HashMap<String, GrantLevel> = perms
        .iter()
        .map(|(name, level)| (name.to_string(), *level))
        .collect();
    let claims = Claims::new(uuid::Uuid::new_v4(), "tester".to_string(), 1, permissions);
    generate_jwt(claims).expect("token generation")
}

/// Drive the router in-process with one request; returns status and
/// parsed JSON body (Null for empty bodies).
pub async fn send(req: Request<Body>) -> (StatusCode, Value) {
    let response = app().oneshot(req).await.expect("request");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

pub fn get(uri: &str, bearer: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = bearer {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    builder.body(Body::empty()).expect("request build")
}

pub fn options(uri: &str, bearer: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("OPTIONS").uri(uri);
    if let Some(token) = bearer {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    builder.body(Body::empty()).expect("request build")
}

pub fn json_request(method: &str, uri: &str, bearer: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");
    if let Some(token) = bearer {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    builder
        .body(Body::from(serde_json::to_vec(body).expect("serialize")))
        .expect("request build")
}
