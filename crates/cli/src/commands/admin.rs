//! Admin account management commands.

use std::str::FromStr;

use anara_core::{AdminRole, Email};

use anara_admin::db::AdminUserRepository;
use anara_admin::services::auth::hash_password;

use super::{CommandError, connect};

const MIN_PASSWORD_LENGTH: usize = 12;

/// Create an admin account.
///
/// # Errors
///
/// Returns an error for invalid inputs or database failures.
pub async fn create_account(
    email: &str,
    name: &str,
    role: &str,
    password: &str,
) -> Result<(), CommandError> {
    let email = Email::parse(email).map_err(|e| CommandError::Invalid(format!("email: {e}")))?;
    let role = AdminRole::from_str(role).map_err(CommandError::Invalid)?;
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(CommandError::Invalid(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    let password_hash =
        hash_password(password).map_err(|e| CommandError::Invalid(e.to_string()))?;

    let pool = connect("ADMIN_DATABASE_URL").await?;
    let created = AdminUserRepository::new(&pool)
        .create(&email, name.trim(), role, &password_hash)
        .await
        .map_err(|e| CommandError::Invalid(e.to_string()))?;

    tracing::info!(admin = %created.email, role = %created.role, "admin account created");
    Ok(())
}
