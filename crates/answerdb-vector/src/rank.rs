use std::sync::Arc;
use tracing::debug;

use answerdb_core::types::{Document, RankedCandidate};
use answerdb_nlp::TextNormalizer;

use crate::tfidf::{cosine, TfIdfConfig, TfIdfModel};
use crate::RankError;

/// Orders candidates by cosine similarity to the original query, over a
/// TF-IDF model fitted on the candidates themselves.
pub struct VectorSpaceRanker {
    normalizer: Arc<TextNormalizer>,
    config: TfIdfConfig,
}

impl VectorSpaceRanker {
    pub fn new(normalizer: Arc<TextNormalizer>, config: TfIdfConfig) -> Self {
        Self { normalizer, config }
    }

    /// Score every candidate, highest first. Equal scores keep retrieval order.
    ///
    /// An empty candidate list ranks to an empty list; a corpus without a
    /// single usable term is [`RankError::EmptyVocabulary`].
    pub fn rank(&self, candidates: Vec<Document>, query: &str) -> Result<Vec<RankedCandidate>, RankError> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }
        let corpus: Vec<String> = candidates.iter().map(Document::corpus_text).collect();
        let (model, rows) = TfIdfModel::fit_transform(&corpus, &self.normalizer, self.config)?;
        let query_vector = model.transform(query, &self.normalizer);

        let mut ranked: Vec<RankedCandidate> = candidates
            .into_iter()
            .zip(rows.iter())
            .map(|(document, row)| RankedCandidate { document, score: cosine(&query_vector, row) })
            .collect();
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));

        debug!(
            candidates = ranked.len(),
            vocabulary = model.vocabulary_len(),
            top = ranked.first().map(|c| c.score),
            "ranked candidates"
        );
        Ok(ranked)
    }
}
