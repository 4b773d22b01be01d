use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

use answerdb_core::error::Result;
use answerdb_core::traits::ContentStore;
use answerdb_core::types::{Collection, Document};

/// Fetches candidates from both collections with manual overrides taking
/// precedence over automatic documents of the same id.
pub struct CandidateRetriever {
    store: Arc<dyn ContentStore>,
    limit: usize,
}

impl CandidateRetriever {
    pub fn new(store: Arc<dyn ContentStore>, limit: usize) -> Self {
        Self { store, limit }
    }

    /// Automatic hits without an override, followed by every manual hit.
    ///
    /// A surviving hit that lacks its title or passages fails the whole
    /// retrieval with `Error::MalformedDocument`.
    pub fn retrieve(&self, expanded_query: &str) -> Result<Vec<Document>> {
        let automatic = self.store.search_text(Collection::Automatic, expanded_query, self.limit)?;
        let manual = self.store.search_text(Collection::Manual, expanded_query, self.limit)?;
        debug!(automatic = automatic.len(), manual = manual.len(), "retrieved candidates");

        let overridden: HashSet<&str> = manual.iter().map(|d| d.id.as_str()).collect();
        let kept: Vec<_> = automatic
            .into_iter()
            .filter(|d| !d.manually_changed && !overridden.contains(d.id.as_str()))
            .collect();
        kept.into_iter().chain(manual).map(Document::try_from).collect()
    }
}
