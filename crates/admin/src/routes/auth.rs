//! Admin session auth handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use anara_core::Email;

use crate::error::{AppError, Result};
use crate::middleware::RequireAdminAuth;
use crate::models::{CurrentAdmin, session_keys};
use crate::services::auth::authenticate;
use crate::state::AppState;

/// Login form.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Authenticate and start an admin session.
#[instrument(skip(state, session, request))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<LoginRequest>,
) -> Result<Json<CurrentAdmin>> {
    let email = Email::parse(request.email.trim())
        .map_err(|e| AppError::BadRequest(format!("email: {e}")))?;

    let admin = authenticate(state.pool(), &email, &request.password).await?;
    let current = CurrentAdmin::from(&admin);

    // A fresh session id for the authenticated principal
    session.cycle_id().await?;
    session
        .insert(session_keys::CURRENT_ADMIN, &current)
        .await?;

    tracing::info!(admin = %current.email, role = %current.role, "admin logged in");

    Ok(Json(current))
}

/// End the admin session.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<StatusCode> {
    session.flush().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// The authenticated admin.
#[instrument(skip_all)]
pub async fn me(RequireAdminAuth(admin): RequireAdminAuth) -> Json<CurrentAdmin> {
    Json(admin)
}
