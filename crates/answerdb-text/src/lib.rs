//! answerdb-text
//!
//! Tantivy-backed content store: the `automatic` and `manual` document
//! collections searched for answer candidates, and the unique-keyed
//! `unknown` collection of unanswered queries. Documents are indexed by the
//! root forms the shared `TextNormalizer` gives them, the same forms query
//! expansion produces.

pub mod store;
pub mod tantivy_utils;

pub use store::TantivyContentStore;
