//! Category administration handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use anara_core::catalog::CategoryRecord;
use anara_core::types::CategoryId;

use crate::db::{CategoryAdminRepository, CategoryInput};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

/// Create/update payload.
#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub parent_id: Option<CategoryId>,
    #[serde(default)]
    pub position: Option<i32>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

const fn default_active() -> bool {
    true
}

/// Reorder payload: the desired child order under one parent.
#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    /// `None` reorders the top level.
    #[serde(default)]
    pub parent_id: Option<CategoryId>,
    pub ordered_ids: Vec<CategoryId>,
}

impl CategoryRequest {
    fn validated(self) -> Result<CategoryInput> {
        let name = self.name.trim().to_owned();
        let slug = self.slug.trim().to_owned();
        if name.is_empty() {
            return Err(AppError::BadRequest("name is required".to_string()));
        }
        if slug.is_empty()
            || !slug
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(AppError::BadRequest(
                "slug must be non-empty, lowercase ASCII letters, digits and dashes".to_string(),
            ));
        }
        Ok(CategoryInput {
            name,
            slug,
            parent_id: self.parent_id,
            position: self.position,
            is_active: self.is_active,
        })
    }
}

/// List the flat category records.
#[instrument(skip_all)]
pub async fn list(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
) -> Result<Json<Vec<CategoryRecord>>> {
    let records = CategoryAdminRepository::new(state.pool()).list().await?;
    Ok(Json(records))
}

/// Create a category.
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Json(request): Json<CategoryRequest>,
) -> Result<(StatusCode, Json<CategoryRecord>)> {
    admin.ensure_can_edit()?;

    let input = request.validated()?;
    let record = CategoryAdminRepository::new(state.pool())
        .create(&input)
        .await?;

    tracing::info!(category = %record.id, slug = %record.slug, "category created");
    Ok((StatusCode::CREATED, Json(record)))
}

/// Update a category.
#[instrument(skip_all)]
pub async fn update(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<CategoryId>,
    Json(request): Json<CategoryRequest>,
) -> Result<Json<CategoryRecord>> {
    admin.ensure_can_edit()?;

    let input = request.validated()?;
    let record = CategoryAdminRepository::new(state.pool())
        .update(id, &input)
        .await?;

    Ok(Json(record))
}

/// Delete a category. Its children become top-level.
#[instrument(skip_all)]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<CategoryId>,
) -> Result<StatusCode> {
    admin.ensure_can_edit()?;

    CategoryAdminRepository::new(state.pool()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Persist a drag-reorder of one sibling group.
#[instrument(skip_all)]
pub async fn reorder(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Json(request): Json<ReorderRequest>,
) -> Result<Json<serde_json::Value>> {
    admin.ensure_can_edit()?;

    if request.ordered_ids.is_empty() {
        return Err(AppError::BadRequest("ordered_ids is empty".to_string()));
    }

    let updated = CategoryAdminRepository::new(state.pool())
        .reorder(request.parent_id, &request.ordered_ids)
        .await?;

    Ok(Json(serde_json::json!({ "updated": updated })))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn request(name: &str, slug: &str) -> CategoryRequest {
        CategoryRequest {
            name: name.to_string(),
            slug: slug.to_string(),
            parent_id: None,
            position: None,
            is_active: true,
        }
    }

    #[test]
    fn test_valid_request_passes() {
        let input = request("Silk Sarees", "silk-sarees").validated().unwrap();
        assert_eq!(input.slug, "silk-sarees");
    }

    #[test]
    fn test_blank_name_rejected() {
        assert!(request("  ", "slug").validated().is_err());
    }

    #[test]
    fn test_bad_slug_rejected() {
        assert!(request("Name", "has spaces").validated().is_err());
        assert!(request("Name", "").validated().is_err());
    }
}
