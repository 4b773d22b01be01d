use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

use answerdb_core::traits::LexicalNetwork;

use crate::synonyms::SynonymStore;
use crate::tokenize::TextNormalizer;

/// Broadens a query with synonyms from the custom store and the lexical
/// network. The output only drives candidate retrieval; ranking uses the
/// original query text.
pub struct QueryExpander {
    normalizer: Arc<TextNormalizer>,
    synonyms: Arc<SynonymStore>,
    lexicon: Arc<dyn LexicalNetwork>,
}

impl QueryExpander {
    pub fn new(normalizer: Arc<TextNormalizer>, synonyms: Arc<SynonymStore>, lexicon: Arc<dyn LexicalNetwork>) -> Self {
        Self { normalizer, synonyms, lexicon }
    }

    /// Root-form query terms followed by their synonyms, space separated.
    ///
    /// A token covered by the lexical network is represented by the synset
    /// lemmas, reduced to root form, instead of its own root. A token without
    /// synonyms from either source passes through unchanged. Synonyms that
    /// equal a query root already in the result are not repeated.
    pub fn expand(&self, query: &str) -> String {
        let mut result: Vec<String> = Vec::new();
        let mut synonyms = Accumulator::default();

        for token in self.normalizer.normalize(query) {
            if let Some(mut group) = self.synonyms.get_synset(&token.root) {
                group.remove(&token.root);
                for term in group.into_terms() {
                    synonyms.push(term);
                }
            }

            let synsets = self.lexicon.synsets(&token.root, token.pos.lexical());
            if synsets.is_empty() {
                result.push(token.root);
                continue;
            }
            for synset in synsets {
                for lemma in synset.lemmas {
                    synonyms.push(self.normalizer.canonical(&lemma.replace('_', " ")));
                }
            }
        }

        let present: HashSet<&str> = result.iter().map(String::as_str).collect();
        let extra: Vec<String> = synonyms.terms.into_iter().filter(|t| !present.contains(t.as_str())).collect();
        result.extend(extra);

        let expanded = result.join(" ");
        debug!(query, expanded = %expanded, "expanded query");
        expanded
    }
}

/// Insertion-ordered set of synonym terms.
#[derive(Default)]
struct Accumulator {
    terms: Vec<String>,
    seen: HashSet<String>,
}

impl Accumulator {
    fn push(&mut self, term: String) {
        if !term.is_empty() && self.seen.insert(term.clone()) {
            self.terms.push(term);
        }
    }
}
