use crate::error::Result;
use crate::types::{Collection, LexicalPos, RawDocument, Synset, TaggedToken, UnknownQueryRecord};

/// The document store the engine reads candidates from and records unknown
/// queries into. Implementations are expected to be safe for concurrent use.
pub trait ContentStore: Send + Sync {
    /// Relevance-ranked text search in one collection, at most `limit` hits.
    /// `query` is whitespace-separated root-form terms.
    fn search_text(&self, collection: Collection, query: &str, limit: usize) -> Result<Vec<RawDocument>>;

    /// Insert unique by `query_text`; an existing key yields `Error::DuplicateKey`.
    fn insert_once(&self, record: &UnknownQueryRecord) -> Result<()>;
}

/// A general-purpose lexical network (wordnet-like) keyed by root form.
pub trait LexicalNetwork: Send + Sync {
    /// Synsets containing `root`; `pos` of `None` means no class filter.
    fn synsets(&self, root: &str, pos: Option<LexicalPos>) -> Vec<Synset>;
}

/// Segments text into tokens and assigns each a part-of-speech class.
pub trait Tagger: Send + Sync {
    fn tag(&self, text: &str) -> Vec<TaggedToken>;
}

impl<T: ContentStore + ?Sized> ContentStore for std::sync::Arc<T> {
    fn search_text(&self, collection: Collection, query: &str, limit: usize) -> Result<Vec<RawDocument>> {
        (**self).search_text(collection, query, limit)
    }

    fn insert_once(&self, record: &UnknownQueryRecord) -> Result<()> {
        (**self).insert_once(record)
    }
}
