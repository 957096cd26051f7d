//! Category tree route handlers.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use anara_core::catalog::CategoryNode;

use crate::state::AppState;

/// Category tree response.
#[derive(Debug, Serialize)]
pub struct CategoryTreeResponse {
    /// Root categories with nested, position-ordered children.
    pub categories: Vec<CategoryNode>,
    /// Whether a rebuild fetch is currently in flight.
    pub loading: bool,
}

/// Return the current category tree.
///
/// The tree is rebuilt in the background when the catalog changes; this
/// handler only reads the latest snapshot.
#[instrument(skip(state))]
pub async fn tree(State(state): State<AppState>) -> Json<CategoryTreeResponse> {
    let catalog = state.catalog();
    Json(CategoryTreeResponse {
        categories: catalog.tree().as_ref().clone(),
        loading: catalog.is_loading(),
    })
}
