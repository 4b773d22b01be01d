use std::sync::Arc;
use tracing::{debug, info};

use answerdb_core::error::Result;
use answerdb_core::traits::ContentStore;
use answerdb_core::types::UnknownQueryRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recorded {
    New,
    AlreadyKnown,
}

/// Records queries that got no usable answer, once per distinct text.
pub struct UnknownQueryRecorder {
    store: Arc<dyn ContentStore>,
}

impl UnknownQueryRecorder {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    /// A duplicate is reported as [`Recorded::AlreadyKnown`]; any other store
    /// failure is returned.
    pub fn record(&self, query_text: &str) -> Result<Recorded> {
        match self.store.insert_once(&UnknownQueryRecord::new(query_text)) {
            Ok(()) => {
                info!(query = query_text, "recorded unknown query");
                Ok(Recorded::New)
            }
            Err(e) if e.is_duplicate_key() => {
                debug!(query = query_text, "unknown query already recorded");
                Ok(Recorded::AlreadyKnown)
            }
            Err(e) => Err(e),
        }
    }
}
