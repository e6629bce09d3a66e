use axum::{
    extract::{Path, Query},
    response::{IntoResponse, Json, Response},
    Extension,
};
use std::collections::HashMap;

use crate::database::manager::DatabaseManager;
use crate::error::ApiError;
use crate::grant::GrantLevel;
use crate::listing::{engine, export, GridQuery, ResponseFormat, Scope};
use crate::middleware::AuthUser;

use super::{configuration, gate, resolve};

/// GET /api/v1.0/admin/:resource/grid - paginated grid, or CSV export
/// when `format=csv`
pub async fn grid_get(
    Path(resource): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Response, ApiError> {
    let res = resolve(&resource)?;
    gate(&user, res, GrantLevel::View)?;

    let cfg = configuration(res, &params)?;
    let scope = Scope::space(user.space_id);

    // Export mode shares the matching/ordering logic but skips paging
    let probe = GridQuery::unpaginated(cfg, &params)?;
    if probe.format == ResponseFormat::Csv {
        let pool = DatabaseManager::pool().await?;
        let rows = engine::list(&pool, res.table, cfg, &probe, &scope).await?;
        return Ok(export::csv_response(res.name, export::to_csv(cfg, &rows)));
    }

    let query = GridQuery::from_params(cfg, &params)?;
    let pool = DatabaseManager::pool().await?;
    let paged = engine::grid(&pool, res.table, cfg, &query, &scope).await?;
    Ok(Json(paged).into_response())
}

/// OPTIONS /api/v1.0/admin/:resource/grid - field metadata only, no query
/// execution
pub async fn grid_options(
    Path(resource): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Response, ApiError> {
    let res = resolve(&resource)?;
    gate(&user, res, GrantLevel::View)?;

    let cfg = configuration(res, &params)?;
    Ok(Json(cfg.field_metadata()).into_response())
}
