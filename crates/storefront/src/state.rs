//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::cart::CartStorage;
use crate::catalog::CategoryTreeService;
use crate::commerce::CommerceClient;
use crate::config::StorefrontConfig;
use crate::db::{PgCartStorage, PgCategorySource, RepositoryError};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the database pool, the commerce client, and the
/// category tree service.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    commerce: CommerceClient,
    catalog: CategoryTreeService,
    cart_storage: Arc<PgCartStorage>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Starts the category tree service, which keeps rebuilding the tree
    /// as change notifications arrive from the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the category change listener cannot connect.
    pub async fn new(config: StorefrontConfig, pool: PgPool) -> Result<Self, RepositoryError> {
        let commerce = CommerceClient::new(&config.commerce);
        let source = PgCategorySource::connect(pool.clone()).await?;
        let catalog = CategoryTreeService::spawn(source);
        let cart_storage = Arc::new(PgCartStorage::new(pool.clone()));

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                commerce,
                catalog,
                cart_storage,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the commerce platform client.
    #[must_use]
    pub fn commerce(&self) -> &CommerceClient {
        &self.inner.commerce
    }

    /// Get a reference to the category tree service.
    #[must_use]
    pub fn catalog(&self) -> &CategoryTreeService {
        &self.inner.catalog
    }

    /// The durable cart snapshot storage.
    #[must_use]
    pub fn cart_storage(&self) -> Arc<dyn CartStorage> {
        Arc::clone(&self.inner.cart_storage) as Arc<dyn CartStorage>
    }
}
