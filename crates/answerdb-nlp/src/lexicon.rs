//! Lexical network loaded from an Open Multilingual Wordnet tab file.
//!
//! Each data line is `<offset>-<pos>\t<lang>:lemma\t<lemma>`; lines starting
//! with `#` are comments. Only lemmas of the configured language are read.
//! Lemmas are indexed by root form so the expander can look them up with
//! normalized query tokens, while the synsets keep the lemma spelling of the
//! file.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

use answerdb_core::traits::LexicalNetwork;
use answerdb_core::types::{LexicalPos, Synset};

use crate::tokenize::TextNormalizer;

pub struct WordNetLexicon {
    synsets: Vec<Synset>,
    by_root: HashMap<String, Vec<usize>>,
}

/// Wordnet language code (ISO 639-3, as used by OMW) for a configured
/// language name.
pub fn omw_language(name: &str) -> Option<&'static str> {
    let code = match name.trim().to_ascii_lowercase().as_str() {
        "norwegian" | "nb" | "no" | "nob" => "nob",
        "nn" | "nno" | "nynorsk" => "nno",
        "danish" | "da" => "dan",
        "swedish" | "sv" => "swe",
        "english" | "en" => "eng",
        "german" | "de" => "deu",
        "dutch" | "nl" => "nld",
        "finnish" | "fi" => "fin",
        "french" | "fr" => "fra",
        "spanish" | "es" => "spa",
        _ => return None,
    };
    Some(code)
}

impl WordNetLexicon {
    pub fn load(path: &Path, language: &str, normalizer: &TextNormalizer) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read lexical network {}", path.display()))?;
        let lexicon = Self::parse(&contents, language, normalizer);
        info!(path = %path.display(), language, synsets = lexicon.len(), "loaded lexical network");
        Ok(lexicon)
    }

    /// `language` is the OMW code (`nob`); rows tagged `<other>:lemma` are
    /// skipped, untagged `lemma` rows are kept.
    pub fn parse(contents: &str, language: &str, normalizer: &TextNormalizer) -> Self {
        let tagged = format!("{language}:lemma");
        let mut order: Vec<String> = Vec::new();
        let mut entries: HashMap<String, (LexicalPos, Vec<String>)> = HashMap::new();
        for line in contents.lines().filter(|l| !l.trim().is_empty() && !l.starts_with('#')) {
            let mut fields = line.split('\t');
            let (Some(id), Some(kind), Some(lemma)) = (fields.next(), fields.next(), fields.next()) else {
                continue;
            };
            if kind != "lemma" && kind != tagged {
                continue;
            }
            let Some(pos) = id.rsplit('-').next().and_then(|p| p.chars().next()).and_then(LexicalPos::from_code)
            else {
                continue;
            };
            let lemma = lemma.trim().to_string();
            let entry = entries.entry(id.to_string()).or_insert_with(|| {
                order.push(id.to_string());
                (pos, Vec::new())
            });
            if !entry.1.contains(&lemma) {
                entry.1.push(lemma);
            }
        }
        let synsets = order
            .into_iter()
            .filter_map(|id| entries.remove(&id).map(|(pos, lemmas)| Synset { id, pos, lemmas }))
            .collect();
        Self::from_synsets(synsets, normalizer)
    }

    pub fn from_synsets(synsets: Vec<Synset>, normalizer: &TextNormalizer) -> Self {
        let mut by_root: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, synset) in synsets.iter().enumerate() {
            for lemma in &synset.lemmas {
                let root = normalizer.canonical(&lemma.replace('_', " "));
                if root.is_empty() {
                    continue;
                }
                let slots = by_root.entry(root).or_default();
                if !slots.contains(&idx) {
                    slots.push(idx);
                }
            }
        }
        Self { synsets, by_root }
    }

    pub fn len(&self) -> usize {
        self.synsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.synsets.is_empty()
    }
}

impl LexicalNetwork for WordNetLexicon {
    fn synsets(&self, root: &str, pos: Option<LexicalPos>) -> Vec<Synset> {
        self.by_root
            .get(root)
            .map(|slots| {
                slots
                    .iter()
                    .map(|&i| &self.synsets[i])
                    .filter(|s| pos.map_or(true, |p| p == s.pos))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// A lexical network with no entries, for deployments without a wordnet file.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyLexicon;

impl LexicalNetwork for EmptyLexicon {
    fn synsets(&self, _root: &str, _pos: Option<LexicalPos>) -> Vec<Synset> {
        Vec::new()
    }
}
