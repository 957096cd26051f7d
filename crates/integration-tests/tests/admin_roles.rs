//! Role gating for admin mutations.

use axum::http::StatusCode;
use axum::response::IntoResponse;

use anara_admin::models::{AdminRole, CurrentAdmin};
use anara_core::AdminUserId;

fn admin_with(role: AdminRole) -> CurrentAdmin {
    CurrentAdmin {
        id: AdminUserId::new(7),
        email: "staff@anarawear.in".to_string(),
        name: "Staff".to_string(),
        role,
    }
}

#[test]
fn test_viewer_mutation_maps_to_403() {
    let err = admin_with(AdminRole::Viewer)
        .ensure_can_edit()
        .expect_err("viewer must not edit");
    assert_eq!(err.into_response().status(), StatusCode::FORBIDDEN);
}

#[test]
fn test_editing_roles_pass() {
    assert!(admin_with(AdminRole::Admin).ensure_can_edit().is_ok());
    assert!(admin_with(AdminRole::SuperAdmin).ensure_can_edit().is_ok());
}

#[test]
fn test_admin_account_management_is_super_admin_only() {
    let err = admin_with(AdminRole::Admin)
        .ensure_can_manage_admins()
        .expect_err("plain admin must not manage accounts");
    assert_eq!(err.into_response().status(), StatusCode::FORBIDDEN);

    assert!(
        admin_with(AdminRole::SuperAdmin)
            .ensure_can_manage_admins()
            .is_ok()
    );
}
