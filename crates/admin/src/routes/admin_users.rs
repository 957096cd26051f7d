//! Admin account management handlers (super admin only).

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use tracing::instrument;

use anara_core::{AdminRole, Email};

use crate::db::AdminUserRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdminAuth;
use crate::models::AdminUser;
use crate::services::auth::hash_password;
use crate::state::AppState;

const MIN_PASSWORD_LENGTH: usize = 12;

/// Create-admin payload.
#[derive(Debug, Deserialize)]
pub struct CreateAdminRequest {
    pub email: String,
    pub name: String,
    pub role: AdminRole,
    pub password: String,
}

/// List admin accounts.
#[instrument(skip_all)]
pub async fn list(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
) -> Result<Json<Vec<AdminUser>>> {
    admin.ensure_can_manage_admins()?;

    let admins = AdminUserRepository::new(state.pool()).list().await?;
    Ok(Json(admins))
}

/// Create an admin account.
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Json(request): Json<CreateAdminRequest>,
) -> Result<(StatusCode, Json<AdminUser>)> {
    admin.ensure_can_manage_admins()?;

    let email = Email::parse(request.email.trim())
        .map_err(|e| AppError::BadRequest(format!("email: {e}")))?;
    let name = request.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("name is required".to_string()));
    }
    if request.password.len() < MIN_PASSWORD_LENGTH {
        return Err(AppError::BadRequest(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    let password_hash = hash_password(&request.password)?;
    let created = AdminUserRepository::new(state.pool())
        .create(&email, name, request.role, &password_hash)
        .await?;

    tracing::info!(admin = %created.email, role = %created.role, "admin account created");
    Ok((StatusCode::CREATED, Json(created)))
}
