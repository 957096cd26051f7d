//! Banner administration handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use anara_core::BannerId;

use crate::db::{BannerAdminRepository, BannerInput};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdminAuth;
use crate::models::Banner;
use crate::state::AppState;

/// Create/update payload.
#[derive(Debug, Deserialize)]
pub struct BannerRequest {
    pub title: String,
    pub image_url: String,
    #[serde(default)]
    pub link_url: Option<String>,
    #[serde(default)]
    pub position: Option<i32>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

const fn default_active() -> bool {
    true
}

impl BannerRequest {
    fn validated(self) -> Result<BannerInput> {
        let title = self.title.trim().to_owned();
        if title.is_empty() {
            return Err(AppError::BadRequest("title is required".to_string()));
        }
        if self.image_url.trim().is_empty() {
            return Err(AppError::BadRequest("image_url is required".to_string()));
        }
        Ok(BannerInput {
            title,
            image_url: self.image_url.trim().to_owned(),
            link_url: self
                .link_url
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned),
            position: self.position,
            is_active: self.is_active,
        })
    }
}

/// List all banners.
#[instrument(skip_all)]
pub async fn list(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
) -> Result<Json<Vec<Banner>>> {
    let banners = BannerAdminRepository::new(state.pool()).list().await?;
    Ok(Json(banners))
}

/// Create a banner.
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Json(request): Json<BannerRequest>,
) -> Result<(StatusCode, Json<Banner>)> {
    admin.ensure_can_edit()?;

    let input = request.validated()?;
    let banner = BannerAdminRepository::new(state.pool())
        .create(&input)
        .await?;

    Ok((StatusCode::CREATED, Json(banner)))
}

/// Update a banner.
#[instrument(skip_all)]
pub async fn update(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<BannerId>,
    Json(request): Json<BannerRequest>,
) -> Result<Json<Banner>> {
    admin.ensure_can_edit()?;

    let input = request.validated()?;
    let banner = BannerAdminRepository::new(state.pool())
        .update(id, &input)
        .await?;

    Ok(Json(banner))
}

/// Delete a banner.
#[instrument(skip_all)]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<BannerId>,
) -> Result<StatusCode> {
    admin.ensure_can_edit()?;

    BannerAdminRepository::new(state.pool()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
