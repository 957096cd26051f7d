//! Admin account repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use anara_core::{AdminRole, AdminUserId, Email};

use crate::models::AdminUser;

use super::{RepositoryError, conflict_on_unique};

#[derive(sqlx::FromRow)]
struct AdminUserRow {
    id: i32,
    email: String,
    name: String,
    role: AdminRole,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AdminUserRow {
    fn into_domain(self) -> Result<AdminUser, RepositoryError> {
        let email = Email::parse(&self.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(AdminUser {
            id: AdminUserId::new(self.id),
            email,
            name: self.name,
            role: self.role,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Repository for admin account operations.
pub struct AdminUserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AdminUserRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Fetch an admin by email together with their password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails,
    /// `RepositoryError::DataCorruption` if the stored email is invalid.
    pub async fn get_by_email_with_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(AdminUser, String)>, RepositoryError> {
        let row: Option<(i32, String, String, AdminRole, String, DateTime<Utc>, DateTime<Utc>)> =
            sqlx::query_as(
                r"
                SELECT id, email, name, role, password_hash, created_at, updated_at
                FROM admin_user
                WHERE email = $1
                ",
            )
            .bind(email.as_str())
            .fetch_optional(self.pool)
            .await?;

        match row {
            Some((id, email, name, role, password_hash, created_at, updated_at)) => {
                let admin = AdminUserRow {
                    id,
                    email,
                    name,
                    role,
                    created_at,
                    updated_at,
                }
                .into_domain()?;
                Ok(Some((admin, password_hash)))
            }
            None => Ok(None),
        }
    }

    /// Create a new admin account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    pub async fn create(
        &self,
        email: &Email,
        name: &str,
        role: AdminRole,
        password_hash: &str,
    ) -> Result<AdminUser, RepositoryError> {
        let row: AdminUserRow = sqlx::query_as(
            r"
            INSERT INTO admin_user (email, name, role, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, name, role, created_at, updated_at
            ",
        )
        .bind(email.as_str())
        .bind(name)
        .bind(role)
        .bind(password_hash)
        .fetch_one(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "email already exists"))?;

        row.into_domain()
    }

    /// List all admin accounts, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<AdminUser>, RepositoryError> {
        let rows: Vec<AdminUserRow> = sqlx::query_as(
            r"
            SELECT id, email, name, role, created_at, updated_at
            FROM admin_user
            ORDER BY created_at DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(AdminUserRow::into_domain).collect()
    }
}
