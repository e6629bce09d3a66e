use axum::{
    extract::{Path, Query},
    response::{IntoResponse, Json, Response},
    Extension,
};
use serde_json::Value;
use std::collections::HashMap;

use crate::database::manager::DatabaseManager;
use crate::database::repository;
use crate::error::ApiError;
use crate::grant::GrantLevel;
use crate::listing::{engine, GridQuery, Scope};
use crate::middleware::{ApiResponse, AuthUser};

use super::{configuration, gate, parse_id, resolve};

/// GET /api/v1.0/admin/:resource - full unpaginated list, same filter and
/// sort semantics as the grid
pub async fn list_get(
    Path(resource): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Response, ApiError> {
    let res = resolve(&resource)?;
    gate(&user, res, GrantLevel::View)?;

    let cfg = configuration(res, &params)?;
    let query = GridQuery::unpaginated(cfg, &params)?;
    let scope = Scope::space(user.space_id);
    let pool = DatabaseManager::pool().await?;
    let records = engine::list(&pool, res.table, cfg, &query, &scope).await?;
    Ok(Json(records).into_response())
}

/// GET /api/v1.0/admin/:resource/:id - single record fetch
pub async fn record_get(
    Path((resource, id)): Path<(String, String)>,
    Extension(user): Extension<AuthUser>,
) -> Result<ApiResponse<Value>, ApiError> {
    let res = resolve(&resource)?;
    gate(&user, res, GrantLevel::View)?;
    let id = parse_id(res, &id)?;

    let pool = DatabaseManager::pool().await?;
    let record = repository::fetch(&pool, res, user.space_id, id).await?;
    Ok(ApiResponse::data(record))
}

/// POST /api/v1.0/admin/:resource - create, returns the new identifier
pub async fn record_post(
    Path(resource): Path<String>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<Value>,
) -> Result<ApiResponse<Value>, ApiError> {
    let res = resolve(&resource)?;
    gate(&user, res, GrantLevel::Add)?;

    let pool = DatabaseManager::pool().await?;
    let id = repository::insert(&pool, res, user.space_id, &body).await?;
    Ok(ApiResponse::created_id(id))
}

/// PUT /api/v1.0/admin/:resource/:id - update in place
pub async fn record_put(
    Path((resource, id)): Path<(String, String)>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<Value>,
) -> Result<ApiResponse<()>, ApiError> {
    let res = resolve(&resource)?;
    gate(&user, res, GrantLevel::Edit)?;
    let id = parse_id(res, &id)?;

    let pool = DatabaseManager::pool().await?;
    repository::update(&pool, res, user.space_id, id, &body).await?;
    Ok(ApiResponse::<()>::no_content())
}

/// DELETE /api/v1.0/admin/:resource/:id - single delete
pub async fn record_delete(
    Path((resource, id)): Path<(String, String)>,
    Extension(user): Extension<AuthUser>,
) -> Result<ApiResponse<()>, ApiError> {
    let res = resolve(&resource)?;
    gate(&user, res, GrantLevel::Delete)?;
    let id = parse_id(res, &id)?;

    let pool = DatabaseManager::pool().await?;
    repository::delete(&pool, res, user.space_id, id).await?;
    Ok(ApiResponse::<()>::no_content())
}

/// DELETE /api/v1.0/admin/:resource - bulk delete, all-or-nothing
pub async fn bulk_delete(
    Path(resource): Path<String>,
    Extension(user): Extension<AuthUser>,
    Json(ids): Json<Vec<i64>>,
) -> Result<ApiResponse<()>, ApiError> {
    let res = resolve(&resource)?;
    gate(&user, res, GrantLevel::Delete)?;

    let pool = DatabaseManager::pool().await?;
    repository::delete_many(&pool, res, user.space_id, &ids).await?;
    Ok(ApiResponse::<()>::no_content())
}
