//! Thin generic handlers for the admin CRUD surface.
//!
//! Every handler follows the same shape: resolve the resource from the
//! catalog, pass the authorization gate, marshal parameters, call the
//! engine or repository, wrap in the envelope. The gate always runs
//! before any database access.

pub mod grid;
pub mod record;
pub mod related;

use std::collections::HashMap;

use crate::error::{codes, ApiError};
use crate::grant::{authorize, GrantLevel};
use crate::listing::ListConfiguration;
use crate::middleware::AuthUser;
use crate::resources::{self, ResourceDef};

pub(crate) fn resolve(resource: &str) -> Result<&'static ResourceDef, ApiError> {
    resources::resource(resource).ok_or_else(|| {
        ApiError::not_found(
            codes::RESOURCE_NOT_FOUND,
            format!("Unknown resource: {}", resource),
        )
    })
}

pub(crate) fn gate(
    user: &AuthUser,
    res: &'static ResourceDef,
    level: GrantLevel,
) -> Result<(), ApiError> {
    authorize(&user.permissions, res.grant, level)
}

/// Select the list configuration for a listing request. A `config` query
/// parameter may name it explicitly; the name must exist in the catalog
/// and belong to the addressed resource.
pub(crate) fn configuration(
    res: &'static ResourceDef,
    params: &HashMap<String, String>,
) -> Result<&'static ListConfiguration, ApiError> {
    let Some(name) = params.get("config") else {
        return Ok(&res.list_config);
    };
    let cfg = resources::list_config(name).ok_or_else(|| {
        ApiError::invalid_list_configuration(format!("Unknown list configuration: {}", name))
    })?;
    if cfg.name != res.list_config.name {
        return Err(ApiError::invalid_list_configuration(format!(
            "List configuration '{}' does not belong to resource '{}'",
            name, res.name
        )));
    }
    Ok(cfg)
}

/// Record ids are matched as raw path segments so an unparseable id yields
/// the resource's structured not-found body instead of an extractor
/// rejection.
pub(crate) fn parse_id(res: &'static ResourceDef, raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>()
        .map_err(|_| ApiError::not_found(res.not_found_code, format!("{} not found", res.name)))
}
