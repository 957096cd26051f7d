//! Banner model (admin view).

use serde::Serialize;

use anara_core::BannerId;

/// A promotional banner, including inactive ones.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Banner {
    pub id: BannerId,
    pub title: String,
    pub image_url: String,
    pub link_url: Option<String>,
    pub position: i32,
    pub is_active: bool,
}
