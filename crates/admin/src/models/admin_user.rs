//! Admin user domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use anara_core::{AdminUserId, Email};

// Re-export AdminRole from core for convenience
pub use anara_core::AdminRole;

use crate::error::AppError;

/// An admin user (domain type). The password hash never leaves the
/// repository layer.
#[derive(Debug, Clone, Serialize)]
pub struct AdminUser {
    /// Unique admin user ID.
    pub id: AdminUserId,
    /// Admin's email address.
    pub email: Email,
    /// Admin's display name.
    pub name: String,
    /// Admin's role/permission level.
    pub role: AdminRole,
    /// When the admin was created.
    pub created_at: DateTime<Utc>,
    /// When the admin was last updated.
    pub updated_at: DateTime<Utc>,
}

/// The authenticated admin stored in the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAdmin {
    pub id: AdminUserId,
    pub email: String,
    pub name: String,
    pub role: AdminRole,
}

impl CurrentAdmin {
    /// Reject callers whose role cannot mutate store data.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Forbidden` for read-only roles.
    pub fn ensure_can_edit(&self) -> Result<(), AppError> {
        if self.role.can_edit() {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "role {} cannot modify store data",
                self.role
            )))
        }
    }

    /// Reject callers whose role cannot manage admin accounts.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Forbidden` for non-super-admin roles.
    pub fn ensure_can_manage_admins(&self) -> Result<(), AppError> {
        if self.role.can_manage_admins() {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "role {} cannot manage admin accounts",
                self.role
            )))
        }
    }
}

impl From<&AdminUser> for CurrentAdmin {
    fn from(admin: &AdminUser) -> Self {
        Self {
            id: admin.id,
            email: admin.email.as_str().to_owned(),
            name: admin.name.clone(),
            role: admin.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn current(role: AdminRole) -> CurrentAdmin {
        CurrentAdmin {
            id: AdminUserId::new(1),
            email: "ops@anarawear.in".to_string(),
            name: "Ops".to_string(),
            role,
        }
    }

    #[test]
    fn test_viewer_cannot_edit() {
        assert!(current(AdminRole::Viewer).ensure_can_edit().is_err());
        assert!(current(AdminRole::Admin).ensure_can_edit().is_ok());
    }

    #[test]
    fn test_only_super_admin_manages_admins() {
        assert!(current(AdminRole::Admin).ensure_can_manage_admins().is_err());
        assert!(
            current(AdminRole::SuperAdmin)
                .ensure_can_manage_admins()
                .is_ok()
        );
    }
}
