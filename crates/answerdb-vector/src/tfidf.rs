//! TF-IDF vectorizer.
//!
//! Weights follow the common smoothed formulation:
//!
//! - `idf(t) = ln((1 + n) / (1 + df(t))) + 1`
//! - `tf(t, d) = 1 + ln(count)` when sublinear scaling is on, `count` otherwise
//! - every row is L2-normalized, so cosine similarity is a dot product
//!
//! Terms occurring in more than `max_df * n` documents are pruned from the
//! vocabulary before weighting.

use std::collections::{BTreeMap, HashMap};

use answerdb_core::config::RankingSettings;
use answerdb_nlp::TextNormalizer;

use crate::RankError;

/// Non-zero weights by vocabulary index, ascending.
pub type SparseVector = Vec<(usize, f32)>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TfIdfConfig {
    pub sublinear_tf: bool,
    pub max_df: f32,
}

impl Default for TfIdfConfig {
    fn default() -> Self {
        Self { sublinear_tf: true, max_df: 1.0 }
    }
}

impl From<&RankingSettings> for TfIdfConfig {
    fn from(settings: &RankingSettings) -> Self {
        Self { sublinear_tf: settings.sublinear_tf, max_df: settings.max_df }
    }
}

#[derive(Debug, Clone)]
pub struct TfIdfModel {
    vocabulary: HashMap<String, usize>,
    terms: Vec<String>,
    idf: Vec<f32>,
    sublinear_tf: bool,
}

impl TfIdfModel {
    /// Learn vocabulary and idf from `corpus` and return the weighted rows.
    pub fn fit_transform<S: AsRef<str>>(
        corpus: &[S],
        normalizer: &TextNormalizer,
        config: TfIdfConfig,
    ) -> Result<(Self, Vec<SparseVector>), RankError> {
        let counts: Vec<HashMap<String, usize>> =
            corpus.iter().map(|doc| term_counts(normalizer.tokenize(doc.as_ref()))).collect();

        let mut document_frequency: BTreeMap<&str, usize> = BTreeMap::new();
        for doc in &counts {
            for term in doc.keys() {
                *document_frequency.entry(term.as_str()).or_default() += 1;
            }
        }

        let n_docs = counts.len();
        let max_doc_count = f64::from(config.max_df) * n_docs as f64;
        let kept: Vec<(&str, usize)> =
            document_frequency.into_iter().filter(|(_, df)| *df as f64 <= max_doc_count).collect();
        if kept.is_empty() {
            return Err(RankError::EmptyVocabulary);
        }

        let terms: Vec<String> = kept.iter().map(|(t, _)| t.to_string()).collect();
        let idf = kept
            .iter()
            .map(|(_, df)| ((1.0 + n_docs as f64) / (1.0 + *df as f64)).ln() as f32 + 1.0)
            .collect();
        let vocabulary = terms.iter().enumerate().map(|(i, t)| (t.clone(), i)).collect();
        let model = Self { vocabulary, terms, idf, sublinear_tf: config.sublinear_tf };

        let rows = counts.iter().map(|doc| model.weigh(doc)).collect();
        Ok((model, rows))
    }

    /// Vectorize unseen text against the fitted vocabulary. Terms outside it
    /// are ignored; text with no known term yields an empty vector.
    pub fn transform(&self, text: &str, normalizer: &TextNormalizer) -> SparseVector {
        self.weigh(&term_counts(normalizer.tokenize(text)))
    }

    pub fn term(&self, index: usize) -> Option<&str> {
        self.terms.get(index).map(String::as_str)
    }

    pub fn vocabulary_len(&self) -> usize {
        self.terms.len()
    }

    fn weigh(&self, counts: &HashMap<String, usize>) -> SparseVector {
        let mut row: SparseVector = counts
            .iter()
            .filter_map(|(term, &count)| {
                let &index = self.vocabulary.get(term)?;
                let tf = if self.sublinear_tf { 1.0 + (count as f32).ln() } else { count as f32 };
                Some((index, tf * self.idf[index]))
            })
            .collect();
        row.sort_unstable_by_key(|(index, _)| *index);
        let norm = row.iter().map(|(_, w)| w * w).sum::<f32>().sqrt();
        if norm > 0.0 {
            for (_, w) in row.iter_mut() {
                *w /= norm;
            }
        }
        row
    }
}

fn term_counts(tokens: Vec<String>) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for token in tokens {
        *counts.entry(token).or_insert(0) += 1;
    }
    counts
}

/// Cosine similarity of two L2-normalized sparse vectors.
pub fn cosine(a: &[(usize, f32)], b: &[(usize, f32)]) -> f32 {
    let (mut i, mut j, mut dot) = (0, 0, 0.0f32);
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                dot += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    dot.clamp(0.0, 1.0)
}
