use std::sync::Arc;

use answerdb_core::types::{Document, Keyword};
use answerdb_nlp::TextNormalizer;

use crate::tfidf::{TfIdfConfig, TfIdfModel};
use crate::RankError;

/// Picks the highest-weighted TF-IDF terms of each document, with the
/// collection being ingested as the idf corpus.
pub struct KeywordExtractor {
    normalizer: Arc<TextNormalizer>,
    config: TfIdfConfig,
    limit: usize,
}

impl KeywordExtractor {
    pub fn new(normalizer: Arc<TextNormalizer>, config: TfIdfConfig, limit: usize) -> Self {
        Self { normalizer, config, limit }
    }

    /// One keyword list per document, in input order. Each list is sorted by
    /// weight, ties broken by the later vocabulary term first.
    pub fn extract(&self, documents: &[Document]) -> Result<Vec<Vec<Keyword>>, RankError> {
        if documents.is_empty() {
            return Ok(Vec::new());
        }
        let corpus: Vec<String> = documents.iter().map(Document::corpus_text).collect();
        let (model, rows) = TfIdfModel::fit_transform(&corpus, &self.normalizer, self.config)?;
        Ok(rows
            .into_iter()
            .map(|mut row| {
                row.sort_by(|a, b| b.1.total_cmp(&a.1).then(b.0.cmp(&a.0)));
                row.into_iter()
                    .take(self.limit)
                    .filter_map(|(index, weight)| {
                        model.term(index).map(|term| Keyword { term: term.to_string(), confidence: weight })
                    })
                    .collect()
            })
            .collect())
    }
}
