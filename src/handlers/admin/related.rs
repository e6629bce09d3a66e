use axum::{extract::Path, Extension, Json};
use serde_json::Value;

use crate::database::manager::DatabaseManager;
use crate::database::repository;
use crate::error::ApiError;
use crate::grant::GrantLevel;
use crate::middleware::{ApiResponse, AuthUser};

use super::{gate, resolve};

/// POST /api/v1.0/admin/:resource/related/info - cross-reference usage
/// counts for the given ids, used to warn before deletion
pub async fn related_info(
    Path(resource): Path<String>,
    Extension(user): Extension<AuthUser>,
    Json(ids): Json<Vec<i64>>,
) -> Result<ApiResponse<Value>, ApiError> {
    let res = resolve(&resource)?;
    gate(&user, res, GrantLevel::View)?;

    let pool = DatabaseManager::pool().await?;
    let info = repository::related_info(&pool, res, user.space_id, &ids).await?;
    Ok(ApiResponse::data(info))
}
