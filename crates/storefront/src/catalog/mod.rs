//! Category tree service.
//!
//! Owns the current category forest and rebuilds it from scratch whenever
//! the category source announces a change. Consumers read the latest tree
//! through a `watch` channel and must not assume node identity survives a
//! rebuild.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError};

use async_trait::async_trait;
use tokio::sync::{broadcast, watch};
use tracing::instrument;

use anara_core::catalog::{CategoryNode, CategoryRecord, build_tree};

use crate::db::RepositoryError;

/// The category collaborator: a flat record list plus a change feed.
///
/// `subscribe` is the single injection point for the collaborator's change
/// notifications, independent of the transport behind it (`LISTEN/NOTIFY`
/// in production, an in-process channel in tests).
#[async_trait]
pub trait CategorySource: Send + Sync + 'static {
    /// Fetch the current flat category records.
    async fn list(&self) -> Result<Vec<CategoryRecord>, RepositoryError>;

    /// Subscribe to change notifications. Each message means "the records
    /// changed, rebuild"; payloads carry no data.
    fn subscribe(&self) -> broadcast::Receiver<()>;
}

struct ServiceInner {
    source: Arc<dyn CategorySource>,
    tree_tx: watch::Sender<Arc<Vec<CategoryNode>>>,
    /// Monotonic sequence of started fetches.
    started: AtomicU64,
    /// Sequence of the newest applied fetch; guarded so the stale check
    /// and the publish happen atomically.
    applied: std::sync::Mutex<u64>,
    in_flight: AtomicUsize,
}

impl ServiceInner {
    /// Fetch and rebuild. A fetch that resolves after a newer one has
    /// already been applied is discarded (last-started wins); a failed
    /// fetch keeps the previous tree.
    #[instrument(skip(self))]
    async fn refresh(&self) {
        let seq = self.started.fetch_add(1, Ordering::SeqCst) + 1;
        self.in_flight.fetch_add(1, Ordering::SeqCst);

        let result = self.source.list().await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match result {
            Ok(records) => {
                let tree = Arc::new(build_tree(&records));
                let mut applied = self
                    .applied
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner);
                if seq > *applied {
                    *applied = seq;
                    self.tree_tx.send_replace(tree);
                } else {
                    tracing::debug!(seq, "discarding stale category fetch");
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "category fetch failed; keeping previous tree");
            }
        }
    }
}

/// Holds the current category tree and rebuilds it reactively.
///
/// Cheap to clone; all clones observe the same tree.
#[derive(Clone)]
pub struct CategoryTreeService {
    inner: Arc<ServiceInner>,
}

impl CategoryTreeService {
    /// Start the service: build once immediately, then rebuild on every
    /// change notification from the source.
    pub fn spawn(source: impl CategorySource) -> Self {
        let (tree_tx, _) = watch::channel(Arc::new(Vec::new()));
        let inner = Arc::new(ServiceInner {
            source: Arc::new(source),
            tree_tx,
            started: AtomicU64::new(0),
            applied: std::sync::Mutex::new(0),
            in_flight: AtomicUsize::new(0),
        });

        let driver = Arc::clone(&inner);
        tokio::spawn(async move {
            let mut changes = driver.source.subscribe();
            driver.refresh().await;

            loop {
                match changes.recv().await {
                    Ok(()) => driver.refresh().await,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        // Missed notifications collapse into one rebuild.
                        tracing::debug!(skipped, "change feed lagged; rebuilding once");
                        driver.refresh().await;
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::info!("category change feed closed; rebuilds stopped");
                        break;
                    }
                }
            }
        });

        Self { inner }
    }

    /// The latest built tree. Empty until the first fetch lands.
    #[must_use]
    pub fn tree(&self) -> Arc<Vec<CategoryNode>> {
        self.inner.tree_tx.borrow().clone()
    }

    /// Watch the tree for changes (e.g., to push updates to clients).
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<Arc<Vec<CategoryNode>>> {
        self.inner.tree_tx.subscribe()
    }

    /// Whether a fetch is currently in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.inner.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Force a rebuild outside the change feed (e.g., on demand).
    pub async fn refresh(&self) {
        self.inner.refresh().await;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use std::sync::RwLock;

    use anara_core::types::CategoryId;

    struct FakeSource {
        records: RwLock<Vec<CategoryRecord>>,
        changes: broadcast::Sender<()>,
        fail: std::sync::atomic::AtomicBool,
    }

    impl FakeSource {
        fn new(records: Vec<CategoryRecord>) -> Arc<Self> {
            let (changes, _) = broadcast::channel(8);
            Arc::new(Self {
                records: RwLock::new(records),
                changes,
                fail: std::sync::atomic::AtomicBool::new(false),
            })
        }

        fn replace(&self, records: Vec<CategoryRecord>) {
            *self.records.write().unwrap() = records;
            let _ = self.changes.send(());
        }
    }

    #[async_trait]
    impl CategorySource for Arc<FakeSource> {
        async fn list(&self) -> Result<Vec<CategoryRecord>, RepositoryError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(RepositoryError::DataCorruption("fake outage".to_string()));
            }
            Ok(self.records.read().unwrap().clone())
        }

        fn subscribe(&self) -> broadcast::Receiver<()> {
            self.changes.subscribe()
        }
    }

    fn record(id: i32, parent: Option<i32>, position: i32, name: &str) -> CategoryRecord {
        CategoryRecord {
            id: CategoryId::new(id),
            name: name.to_owned(),
            slug: name.to_lowercase(),
            parent_id: parent.map(CategoryId::new),
            position,
            is_active: true,
        }
    }

    #[tokio::test]
    async fn test_initial_build() {
        let source = FakeSource::new(vec![record(1, None, 0, "Sarees")]);
        let service = CategoryTreeService::spawn(Arc::clone(&source));

        let mut rx = service.watch();
        let tree = rx.wait_for(|t| !t.is_empty()).await.unwrap().clone();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].name, "Sarees");
    }

    #[tokio::test]
    async fn test_rebuild_on_change_notification() {
        let source = FakeSource::new(vec![record(1, None, 0, "Sarees")]);
        let service = CategoryTreeService::spawn(Arc::clone(&source));

        let mut rx = service.watch();
        rx.wait_for(|t| !t.is_empty()).await.unwrap();

        source.replace(vec![
            record(1, None, 0, "Sarees"),
            record(2, Some(1), 0, "Silk"),
        ]);

        let tree = rx
            .wait_for(|t| t.first().is_some_and(|n| !n.children.is_empty()))
            .await
            .unwrap()
            .clone();
        assert_eq!(tree[0].children[0].name, "Silk");
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_previous_tree() {
        let source = FakeSource::new(vec![record(1, None, 0, "Sarees")]);
        let service = CategoryTreeService::spawn(Arc::clone(&source));

        let mut rx = service.watch();
        rx.wait_for(|t| !t.is_empty()).await.unwrap();

        source.fail.store(true, Ordering::SeqCst);
        service.refresh().await;

        let tree = service.tree();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].name, "Sarees");
    }
}
