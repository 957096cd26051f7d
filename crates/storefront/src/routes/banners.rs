//! Banner route handlers.

use axum::{Json, extract::State};
use tracing::instrument;

use crate::db::BannerRepository;
use crate::error::Result;
use crate::models::banner::Banner;
use crate::state::AppState;

/// List active banners in position order.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Banner>>> {
    let banners = BannerRepository::new(state.pool()).list_active().await?;
    Ok(Json(banners))
}
