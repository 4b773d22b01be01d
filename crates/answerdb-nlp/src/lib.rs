//! answerdb-nlp
//!
//! Language pipeline of the resolver: part-of-speech tagging, root-form
//! reduction, stopword filtering, the custom synonym store, the lexical
//! network and query expansion built on top of them.

pub mod expand;
pub mod lexicon;
pub mod stem;
pub mod stopwords;
pub mod synonyms;
pub mod tagger;
pub mod tokenize;

pub use expand::QueryExpander;
pub use lexicon::{EmptyLexicon, WordNetLexicon};
pub use stem::RootReducer;
pub use stopwords::StopWords;
pub use synonyms::{SynonymGroup, SynonymStore};
pub use tagger::RuleTagger;
pub use tokenize::{NormalizedToken, TextNormalizer};
