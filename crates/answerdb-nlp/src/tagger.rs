//! Rule-based part-of-speech tagger.
//!
//! Segments on Unicode word boundaries (UAX #29) and classifies each segment
//! from a closed-class word list, an optional `word<TAB>TAG` lexicon and a few
//! suffix rules. Anything unrecognised is tagged as a noun.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;
use unicode_segmentation::UnicodeSegmentation;

use answerdb_core::traits::Tagger;
use answerdb_core::types::{PartOfSpeech, TaggedToken};

const PRONOUNS: &[&str] = &[
    "jeg", "du", "han", "hun", "den", "det", "vi", "dere", "de", "meg", "deg", "seg", "ham", "henne", "oss",
    "dem", "man", "hva", "hvem",
];
const DETERMINERS: &[&str] = &[
    "en", "ei", "et", "denne", "dette", "disse", "min", "mitt", "mine", "din", "ditt", "dine", "sin", "sitt",
    "sine", "vår", "vårt", "våre", "deres", "hans", "hennes", "noen", "noe", "alle", "hver", "ingen",
    "hvilken", "hvilket", "hvilke",
];
const ADPOSITIONS: &[&str] = &[
    "i", "på", "til", "fra", "med", "av", "for", "om", "under", "over", "ved", "etter", "mot", "hos",
    "mellom", "uten", "gjennom",
];
const CONJUNCTIONS: &[&str] = &["og", "eller", "men", "at", "som", "når", "hvis", "fordi", "enn", "så"];
const ADVERBS: &[&str] = &["ikke", "hvor", "hvordan", "hvorfor", "også", "nå", "her", "der", "da", "bare"];
const AUXILIARIES: &[&str] = &[
    "er", "var", "har", "hadde", "kan", "kunne", "skal", "skulle", "vil", "ville", "må", "måtte", "bli",
    "blir", "ble", "være", "vært", "få", "får", "fikk",
];

pub struct RuleTagger {
    lexicon: HashMap<String, PartOfSpeech>,
}

impl Default for RuleTagger {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleTagger {
    pub fn new() -> Self {
        let mut lexicon = HashMap::new();
        let classes = [
            (PRONOUNS, PartOfSpeech::Pronoun),
            (DETERMINERS, PartOfSpeech::Determiner),
            (ADPOSITIONS, PartOfSpeech::Adposition),
            (CONJUNCTIONS, PartOfSpeech::Conjunction),
            (ADVERBS, PartOfSpeech::Adverb),
            (AUXILIARIES, PartOfSpeech::Verb),
        ];
        for (words, pos) in classes {
            for w in words {
                lexicon.insert((*w).to_string(), pos);
            }
        }
        Self { lexicon }
    }

    /// Extend the built-in word list with a `word<TAB>UD-TAG` file.
    pub fn with_lexicon_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read POS lexicon {}", path.display()))?;
        let mut tagger = Self::new();
        for line in contents.lines().map(str::trim).filter(|l| !l.is_empty() && !l.starts_with('#')) {
            if let Some((word, tag)) = line.split_once('\t') {
                tagger.insert(word, PartOfSpeech::from_tag(tag));
            }
        }
        Ok(tagger)
    }

    pub fn insert(&mut self, word: &str, pos: PartOfSpeech) {
        self.lexicon.insert(word.trim().to_lowercase(), pos);
    }

    fn classify(&self, word: &str, sentence_start: bool) -> PartOfSpeech {
        if word.chars().all(|c| !c.is_alphanumeric()) {
            return PartOfSpeech::Punctuation;
        }
        if word.chars().all(|c| c.is_numeric() || matches!(c, '.' | ',' | ':')) {
            return PartOfSpeech::Numeral;
        }
        let lower = word.to_lowercase();
        if let Some(pos) = self.lexicon.get(&lower) {
            return *pos;
        }
        let starts_upper = word.chars().next().is_some_and(char::is_uppercase);
        if starts_upper && !sentence_start {
            return PartOfSpeech::ProperNoun;
        }
        let len = lower.chars().count();
        if len > 4 && ["lig", "isk", "som", "ig"].iter().any(|s| lower.ends_with(s)) {
            return PartOfSpeech::Adjective;
        }
        if len > 4 && lower.ends_with("vis") {
            return PartOfSpeech::Adverb;
        }
        PartOfSpeech::Noun
    }
}

impl Tagger for RuleTagger {
    fn tag(&self, text: &str) -> Vec<TaggedToken> {
        let mut tokens = Vec::new();
        let mut sentence_start = true;
        for segment in text.split_word_bounds() {
            if segment.trim().is_empty() {
                continue;
            }
            let pos = self.classify(segment, sentence_start);
            sentence_start = pos == PartOfSpeech::Punctuation && segment.chars().any(|c| matches!(c, '.' | '!' | '?'));
            tokens.push(TaggedToken::new(segment, pos));
        }
        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(text: &str) -> Vec<(String, PartOfSpeech)> {
        RuleTagger::new().tag(text).into_iter().map(|t| (t.text, t.pos)).collect()
    }

    #[test]
    fn segments_words_and_punctuation() {
        let t = tags("Når åpner husebybadet?");
        let texts: Vec<&str> = t.iter().map(|(s, _)| s.as_str()).collect();
        assert_eq!(texts, vec!["Når", "åpner", "husebybadet", "?"]);
        assert_eq!(t[0].1, PartOfSpeech::Conjunction);
        assert_eq!(t[3].1, PartOfSpeech::Punctuation);
    }

    #[test]
    fn capitalised_word_inside_sentence_is_proper_noun() {
        let t = tags("Ring Trondheim kommune.");
        assert_eq!(t[0].1, PartOfSpeech::Noun);
        assert_eq!(t[1].1, PartOfSpeech::ProperNoun);
    }

    #[test]
    fn numbers_and_suffixes() {
        let t = tags("klokken 07 er vanlig");
        assert_eq!(t[1].1, PartOfSpeech::Numeral);
        assert_eq!(t[2].1, PartOfSpeech::Verb);
        assert_eq!(t[3].1, PartOfSpeech::Adjective);
    }
}
