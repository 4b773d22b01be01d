//! answerdb-vector
//!
//! Term-weight modeling over a candidate corpus: a TF-IDF vectorizer, the
//! cosine-similarity ranker that orders candidates against the original
//! query, and per-document keyword extraction for ingestion.

pub mod keywords;
pub mod rank;
pub mod tfidf;

use thiserror::Error;

pub use keywords::KeywordExtractor;
pub use rank::VectorSpaceRanker;
pub use tfidf::{SparseVector, TfIdfConfig, TfIdfModel};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RankError {
    /// No term survived tokenization, stopword removal and the max-df cutoff.
    #[error("Empty vocabulary: the corpus has no usable terms")]
    EmptyVocabulary,
}
