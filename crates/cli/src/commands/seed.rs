//! Seed the catalog with starter data.
//!
//! Inserts a small category tree and one banner so a fresh environment
//! has something to render. Safe to re-run: existing slugs are skipped.

use anara_admin::db::{BannerAdminRepository, BannerInput, CategoryAdminRepository, CategoryInput};
use anara_core::types::CategoryId;

use super::{CommandError, connect};

/// Starter category tree: (name, slug, parent slug).
const CATEGORIES: &[(&str, &str, Option<&str>)] = &[
    ("Sarees", "sarees", None),
    ("Silk Sarees", "silk-sarees", Some("sarees")),
    ("Cotton Sarees", "cotton-sarees", Some("sarees")),
    ("Lehengas", "lehengas", None),
    ("Bridal Lehengas", "bridal-lehengas", Some("lehengas")),
    ("Kurta Sets", "kurta-sets", None),
    ("Dupattas", "dupattas", None),
];

/// Seed categories and a launch banner.
///
/// # Errors
///
/// Returns an error if the connection or an insert fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect("ADMIN_DATABASE_URL").await?;

    let categories = CategoryAdminRepository::new(&pool);
    let existing = categories
        .list()
        .await
        .map_err(|e| CommandError::Invalid(e.to_string()))?;

    let mut slug_to_id: std::collections::HashMap<String, CategoryId> = existing
        .into_iter()
        .map(|record| (record.slug, record.id))
        .collect();

    let mut created = 0;
    for (name, slug, parent_slug) in CATEGORIES {
        if slug_to_id.contains_key(*slug) {
            tracing::debug!(slug = %slug, "category already present, skipping");
            continue;
        }

        let parent_id = parent_slug.and_then(|p| slug_to_id.get(p).copied());
        let record = categories
            .create(&CategoryInput {
                name: (*name).to_owned(),
                slug: (*slug).to_owned(),
                parent_id,
                position: None,
                is_active: true,
            })
            .await
            .map_err(|e| CommandError::Invalid(e.to_string()))?;

        slug_to_id.insert(record.slug.clone(), record.id);
        created += 1;
    }

    let banners = BannerAdminRepository::new(&pool);
    let has_banners = !banners
        .list()
        .await
        .map_err(|e| CommandError::Invalid(e.to_string()))?
        .is_empty();
    if !has_banners {
        banners
            .create(&BannerInput {
                title: "Festive Collection".to_owned(),
                image_url: "https://cdn.anarawear.in/banners/festive.jpg".to_owned(),
                link_url: Some("/collections/sarees".to_owned()),
                position: None,
                is_active: true,
            })
            .await
            .map_err(|e| CommandError::Invalid(e.to_string()))?;
    }

    tracing::info!(created, "seed complete");
    Ok(())
}
