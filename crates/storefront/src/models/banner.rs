//! Homepage banner model.

use serde::Serialize;

use anara_core::BannerId;

/// A promotional banner shown on the storefront.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Banner {
    pub id: BannerId,
    pub title: String,
    pub image_url: String,
    pub link_url: Option<String>,
    /// Sibling ordering key, same convention as categories.
    pub position: i32,
    pub is_active: bool,
}
