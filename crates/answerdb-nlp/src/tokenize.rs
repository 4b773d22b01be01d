use answerdb_core::traits::Tagger;
use answerdb_core::types::PartOfSpeech;

use crate::stem::RootReducer;
use crate::stopwords::StopWords;

/// A surviving token: its root form and the tag it was reduced with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedToken {
    pub root: String,
    pub pos: PartOfSpeech,
}

/// Turns free text into root-form tokens. Shared by query expansion, the
/// vector-space ranker and the synonym/lexicon loaders so that every
/// component matches on the same canonical forms.
pub struct TextNormalizer {
    tagger: Box<dyn Tagger>,
    reducer: RootReducer,
    stopwords: StopWords,
}

impl TextNormalizer {
    pub fn new(tagger: Box<dyn Tagger>, reducer: RootReducer, stopwords: StopWords) -> Self {
        Self { tagger, reducer, stopwords }
    }

    pub fn stopwords(&self) -> &StopWords {
        &self.stopwords
    }

    /// Tag, filter and reduce `text`, in token order.
    ///
    /// Stopwords are matched against the stripped surface text, before root
    /// reduction.
    pub fn normalize(&self, text: &str) -> Vec<NormalizedToken> {
        self.tagger
            .tag(text)
            .into_iter()
            .filter(|t| !is_punctuation(&t.text))
            .filter(|t| !t.text.chars().any(char::is_numeric))
            .filter(|t| !t.text.trim().is_empty())
            .filter_map(|t| {
                let stripped = strip_punctuation(t.text.trim());
                if stripped.is_empty() || self.stopwords.contains(stripped) {
                    return None;
                }
                Some(NormalizedToken { root: self.reducer.reduce(stripped, t.pos), pos: t.pos })
            })
            .collect()
    }

    /// Root forms only; the vocabulary analyzer of the ranker.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        self.normalize(text).into_iter().map(|t| t.root).collect()
    }

    /// Root form of a dictionary term or phrase. Unlike [`Self::normalize`]
    /// no stopword is dropped, so every word of a curated term survives.
    pub fn canonical(&self, phrase: &str) -> String {
        self.tagger
            .tag(phrase)
            .into_iter()
            .filter_map(|t| {
                let stripped = strip_punctuation(t.text.trim());
                (!stripped.is_empty()).then(|| self.reducer.reduce(stripped, t.pos))
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn is_punctuation(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| !c.is_alphanumeric() && !c.is_whitespace())
}

fn strip_punctuation(token: &str) -> &str {
    token.trim_matches(|c: char| !c.is_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn punctuation_detection() {
        assert!(is_punctuation("?"));
        assert!(is_punctuation("«»"));
        assert!(!is_punctuation("a."));
        assert!(!is_punctuation(""));
    }

    #[test]
    fn strips_edges_only() {
        assert_eq!(strip_punctuation("'e-post'"), "e-post");
        assert_eq!(strip_punctuation("--"), "");
    }
}
