//! Password authentication for admin accounts.
//!
//! Argon2id hashes, verified against the `admin_user` table. Sessions are
//! the authorization carrier afterwards; see `middleware::auth`.

use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use sqlx::PgPool;
use thiserror::Error;

use anara_core::Email;

use crate::db::{AdminUserRepository, RepositoryError};
use crate::models::AdminUser;

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown email or wrong password. Deliberately indistinguishable.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Password hashing failed.
    #[error("password hash error: {0}")]
    Hash(String),

    /// Database lookup failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Hash a password for storage.
///
/// # Errors
///
/// Returns `AuthError::Hash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hash(e.to_string()))
}

/// Verify a password against a stored hash.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` on mismatch, `AuthError::Hash`
/// if the stored hash is unreadable.
pub fn verify_password(hash: &str, password: &str) -> Result<(), AuthError> {
    let parsed = PasswordHash::new(hash).map_err(|e| AuthError::Hash(e.to_string()))?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AuthError::InvalidCredentials)
}

/// Authenticate an admin by email and password.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` for unknown emails and wrong
/// passwords alike.
pub async fn authenticate(
    pool: &PgPool,
    email: &Email,
    password: &str,
) -> Result<AdminUser, AuthError> {
    let (admin, password_hash) = AdminUserRepository::new(pool)
        .get_by_email_with_hash(email)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    verify_password(&password_hash, password)?;

    Ok(admin)
}
