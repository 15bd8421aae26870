//! Off-thread search dispatch.
//!
//! [`EmojiCatalog::search`] is a single synchronous scan; this
//! module is only the scheduling wrapper that keeps it off a UI
//! thread. There is no cancellation and no supersession: every
//! dispatched request completes and delivers its result exactly
//! once. Requests carry a monotonically increasing id, and a caller
//! that issues overlapping searches must discard any result whose id
//! is lower than the newest id it was handed — a stale result
//! arriving late is expected, not a bug in this layer.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;

use crate::catalog::EmojiCatalog;
use crate::record::EmojiRecord;

/// Identifier of one dispatched search, ordered by issue time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SearchRequest(u64);

impl SearchRequest {
    /// Sequence number, for logging.
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Runs catalog searches on worker threads and reports each result
/// through its callback.
///
/// The wrapped catalog must already be loaded; the panic-on-unloaded
/// contract of [`EmojiCatalog::search`] applies on the worker
/// thread. Loading again requires exclusive ownership of the
/// catalog, so a dispatcher is created after load and dropped before
/// any reload.
pub struct SearchDispatcher {
    catalog: Arc<EmojiCatalog>,
    next_request: AtomicU64,
}

impl SearchDispatcher {
    #[must_use]
    pub fn new(catalog: Arc<EmojiCatalog>) -> Self {
        Self {
            catalog,
            next_request: AtomicU64::new(0),
        }
    }

    /// Issue a search; the callback receives the request id and the
    /// matching records (owned clones, display order preserved).
    ///
    /// Returns the id immediately so the caller can remember the
    /// newest issued request and drop stale completions.
    pub fn dispatch<F>(&self, keyword: &str, callback: F) -> SearchRequest
    where
        F: FnOnce(SearchRequest, Vec<EmojiRecord>) + Send + 'static,
    {
        let request = SearchRequest(self.next_request.fetch_add(1, Ordering::Relaxed));
        let catalog = Arc::clone(&self.catalog);
        let keyword = keyword.to_string();
        thread::spawn(move || {
            let results = catalog
                .search(&keyword)
                .into_iter()
                .cloned()
                .collect::<Vec<_>>();
            tracing::debug!(
                request = request.value(),
                keyword = %keyword,
                hits = results.len(),
                "search complete"
            );
            callback(request, results);
        });
        request
    }
}
