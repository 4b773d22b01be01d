//! answerdb-engine
//!
//! Query resolution: expand the query, retrieve candidates from the content
//! store, rank them against the original text, and select an answer. Queries
//! without a usable answer are recorded once and answered with the fallback
//! message.

pub mod format;
pub mod recorder;
pub mod retrieve;
pub mod selector;

use std::sync::Arc;
use tracing::{debug, info};

use answerdb_core::config::Settings;
use answerdb_core::error::Result;
use answerdb_core::traits::{ContentStore, LexicalNetwork};
use answerdb_core::types::RenderStyle;
use answerdb_nlp::{QueryExpander, SynonymStore, TextNormalizer};
use answerdb_vector::{RankError, TfIdfConfig, VectorSpaceRanker};

pub use format::AnswerFormatter;
pub use recorder::{Recorded, UnknownQueryRecorder};
pub use retrieve::CandidateRetriever;
pub use selector::{AnswerPolicy, AnswerSelector, Outcome};

pub const ANSWER_SEPARATOR: &str = "\n\n---\n\n";

/// Fixed texts returned to the caller.
#[derive(Debug, Clone)]
pub struct Messages {
    pub not_found: String,
    pub multiple_answers: String,
}

pub struct QueryResolver {
    expander: QueryExpander,
    retriever: CandidateRetriever,
    ranker: VectorSpaceRanker,
    selector: AnswerSelector,
    recorder: UnknownQueryRecorder,
    messages: Messages,
}

impl QueryResolver {
    pub fn new(
        expander: QueryExpander,
        retriever: CandidateRetriever,
        ranker: VectorSpaceRanker,
        selector: AnswerSelector,
        recorder: UnknownQueryRecorder,
        messages: Messages,
    ) -> Self {
        Self { expander, retriever, ranker, selector, recorder, messages }
    }

    /// Wire every stage from `settings` around shared language resources and
    /// a content store.
    pub fn from_settings(
        settings: &Settings,
        normalizer: Arc<TextNormalizer>,
        synonyms: Arc<SynonymStore>,
        lexicon: Arc<dyn LexicalNetwork>,
        store: Arc<dyn ContentStore>,
    ) -> Self {
        let query = &settings.query_system;
        Self::new(
            QueryExpander::new(Arc::clone(&normalizer), synonyms, lexicon),
            CandidateRetriever::new(Arc::clone(&store), settings.store.candidates_per_collection),
            VectorSpaceRanker::new(normalizer, TfIdfConfig::from(&settings.ranking)),
            AnswerSelector::new(AnswerPolicy::from(query), AnswerFormatter::new(query.source_link_prefix.clone())),
            UnknownQueryRecorder::new(store),
            Messages { not_found: query.not_found.clone(), multiple_answers: query.multiple_answers.clone() },
        )
    }

    /// Answer `query` with a formatted answer, a multi-answer digest, or the
    /// not-found message.
    ///
    /// Errors are limited to structural failures: a malformed document among
    /// the candidates, or a content store that cannot be read or written.
    pub fn resolve(&self, query: &str, style: RenderStyle, source_tag: &str) -> Result<String> {
        info!(source = source_tag, query, "resolving query");
        let expanded = self.expander.expand(query);
        let candidates = self.retriever.retrieve(&expanded)?;
        if candidates.is_empty() {
            return self.not_found(query, "no candidates");
        }

        let ranked = match self.ranker.rank(candidates, query) {
            Ok(ranked) => ranked,
            Err(RankError::EmptyVocabulary) => return self.not_found(query, "empty vocabulary"),
        };

        let answer = match self.selector.select(&ranked, style) {
            Outcome::NotFound => return self.not_found(query, "below threshold"),
            Outcome::Single(answer) => {
                info!(source = source_tag, outcome = "single", "resolved query");
                answer
            }
            Outcome::Multi(answers) => {
                info!(source = source_tag, outcome = "multi", answers = answers.len(), "resolved query");
                std::iter::once(self.messages.multiple_answers.as_str())
                    .chain(answers.iter().map(String::as_str))
                    .collect::<Vec<_>>()
                    .join(ANSWER_SEPARATOR)
            }
        };
        debug!(response = %answer, "response");
        Ok(answer)
    }

    fn not_found(&self, query: &str, reason: &'static str) -> Result<String> {
        info!(reason, outcome = "not_found", "resolved query");
        self.recorder.record(query)?;
        Ok(self.messages.not_found.clone())
    }
}
