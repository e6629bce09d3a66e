//! Route-level permission grants.
//!
//! Every protectable resource is identified by a grant name (e.g.
//! `persistence-common-allergen`). A route declares the level it needs;
//! the caller's resolved [`PermissionSet`] decides pass/fail before any
//! persistence access happens.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::ApiError;

/// Permission level required by a route or held by a caller.
///
/// Levels form a total order: holding a level implies every lower one,
/// so VIEW is always implied by ADD/EDIT/DELETE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrantLevel {
    View,
    Add,
    Edit,
    Delete,
}

impl GrantLevel {
    fn rank(self) -> u8 {
        match self {
            GrantLevel::View => 0,
            GrantLevel::Add => 1,
            GrantLevel::Edit => 2,
            GrantLevel::Delete => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GrantLevel::View => "view",
            GrantLevel::Add => "add",
            GrantLevel::Edit => "edit",
            GrantLevel::Delete => "delete",
        }
    }
}

/// A `(grant name, required level)` pair attached to a route.
#[derive(Debug, Clone, Copy)]
pub struct Grant {
    pub name: &'static str,
    pub level: GrantLevel,
}

impl Grant {
    pub fn new(name: &'static str, level: GrantLevel) -> Self {
        Self { name, level }
    }
}

/// The caller's resolved permissions: grant name -> maximum held level.
///
/// Built once per authenticated request from the token claims; read-only
/// afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PermissionSet(HashMap<String, GrantLevel>);

impl PermissionSet {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    pub fn grant(mut self, name: impl Into<String>, level: GrantLevel) -> Self {
        self.0.insert(name.into(), level);
        self
    }

    /// Does this set satisfy `level` on `name`?
    pub fn allows(&self, name: &str, level: GrantLevel) -> bool {
        self.0
            .get(name)
            .is_some_and(|held| held.rank() >= level.rank())
    }
}

impl From<HashMap<String, GrantLevel>> for PermissionSet {
    fn from(map: HashMap<String, GrantLevel>) -> Self {
        Self(map)
    }
}

/// Evaluate the gate: the resource-level VIEW requirement composes with the
/// action-level requirement, and both must pass.
///
/// Pure check, no side effects. Callers invoke this before touching the
/// database so unauthorized requests produce no partial effects.
pub fn authorize(
    permissions: &PermissionSet,
    name: &'static str,
    level: GrantLevel,
) -> Result<(), ApiError> {
    if !permissions.allows(name, GrantLevel::View) {
        return Err(ApiError::authorization_denied(format!(
            "Permission denied: {} requires view access",
            name
        )));
    }
    if !permissions.allows(name, level) {
        return Err(ApiError::authorization_denied(format!(
            "Permission denied: {} requires {} access",
            name,
            level.as_str()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_level_implies_lower_levels() {
        let perms = PermissionSet::new().grant("persistence-common-allergen", GrantLevel::Delete);
        assert!(perms.allows("persistence-common-allergen", GrantLevel::View));
        assert!(perms.allows("persistence-common-allergen", GrantLevel::Edit));
        assert!(perms.allows("persistence-common-allergen", GrantLevel::Delete));
    }

    #[test]
    fn view_does_not_imply_mutation() {
        let perms = PermissionSet::new().grant("persistence-common-allergen", GrantLevel::View);
        assert!(perms.allows("persistence-common-allergen", GrantLevel::View));
        assert!(!perms.allows("persistence-common-allergen", GrantLevel::Add));
        assert!(!perms.allows("persistence-common-allergen", GrantLevel::Delete));
    }

    #[test]
    fn grants_are_independent_per_resource() {
        let perms = PermissionSet::new()
            .grant("persistence-common-allergen", GrantLevel::Delete)
            .grant("persistence-common-apartment", GrantLevel::View);
        assert!(perms.allows("persistence-common-allergen", GrantLevel::Delete));
        assert!(!perms.allows("persistence-common-apartment", GrantLevel::Delete));
        assert!(!perms.allows("persistence-common-physician", GrantLevel::View));
    }

    #[test]
    fn authorize_denies_without_view() {
        let perms = PermissionSet::new();
        let err = authorize(&perms, "persistence-common-allergen", GrantLevel::View).unwrap_err();
        assert_eq!(err.status_code(), 403);
        assert_eq!(err.app_code(), 603);
    }

    #[test]
    fn authorize_denies_insufficient_level() {
        let perms = PermissionSet::new().grant("persistence-common-allergen", GrantLevel::Add);
        assert!(authorize(&perms, "persistence-common-allergen", GrantLevel::Add).is_ok());
        let err = authorize(&perms, "persistence-common-allergen", GrantLevel::Delete).unwrap_err();
        assert_eq!(err.status_code(), 403);
    }

    #[test]
    fn level_serde_uses_lowercase_names() {
        let json = serde_json::to_string(&GrantLevel::Delete).unwrap();
        assert_eq!(json, "\"delete\"");
        let level: GrantLevel = serde_json::from_str("\"view\"").unwrap();
        assert_eq!(level, GrantLevel::View);
    }
}
