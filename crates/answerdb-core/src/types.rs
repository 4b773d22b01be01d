//! Domain types shared by the store, the language pipeline, the ranker and
//! the resolver.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

pub type DocumentId = String;

/// A hyperlink carried by a document, rendered wherever `label` occurs in an
/// answer passage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub label: String,
    pub url: String,
}

impl Link {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self { label: label.into(), url: url.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    pub term: String,
    pub confidence: f32,
}

/// A document exactly as the content store holds it.
///
/// `title` and `texts` are required by the answer pipeline but optional here:
/// harvested content can violate the contract, and the violation is reported
/// when converting into [`Document`] rather than deep inside ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDocument {
    pub id: DocumentId,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub texts: Option<Vec<String>>,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub keywords: Vec<Keyword>,
    #[serde(default)]
    pub manually_changed: bool,
}

/// A validated answer candidate.
///
/// - `id`: identity shared between the automatic and manual collections
/// - `texts`: alternative answer passages, in order
/// - `links`: `(label, url)` pairs rendered inside passages
/// - `manually_changed`: a manual override exists for this `id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub url: String,
    pub title: String,
    pub texts: Vec<String>,
    pub links: Vec<Link>,
    pub keywords: Vec<Keyword>,
    pub manually_changed: bool,
}

impl Document {
    /// Title followed by every passage; the text the ranker models.
    pub fn corpus_text(&self) -> String {
        std::iter::once(self.title.as_str())
            .chain(self.texts.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl TryFrom<RawDocument> for Document {
    type Error = Error;

    fn try_from(raw: RawDocument) -> Result<Self, Self::Error> {
        let title = raw
            .title
            .ok_or_else(|| Error::MalformedDocument { id: raw.id.clone(), field: "title" })?;
        let texts = raw
            .texts
            .ok_or_else(|| Error::MalformedDocument { id: raw.id.clone(), field: "texts" })?;
        Ok(Self {
            id: raw.id,
            url: raw.url,
            title,
            texts,
            links: raw.links,
            keywords: raw.keywords,
            manually_changed: raw.manually_changed,
        })
    }
}

impl From<Document> for RawDocument {
    fn from(doc: Document) -> Self {
        Self {
            id: doc.id,
            url: doc.url,
            title: Some(doc.title),
            texts: Some(doc.texts),
            links: doc.links,
            keywords: doc.keywords,
            manually_changed: doc.manually_changed,
        }
    }
}

/// The two document collections of the content store.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    /// Harvested by the crawler.
    Automatic,
    /// Curated overrides, always authoritative.
    Manual,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Automatic => "automatic",
            Collection::Manual => "manual",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A candidate paired with its cosine similarity to the query, in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub document: Document,
    pub score: f32,
}

/// A query that produced no usable answer. Unique by `query_text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnknownQueryRecord {
    pub query_text: String,
}

impl UnknownQueryRecord {
    pub fn new(query_text: impl Into<String>) -> Self {
        Self { query_text: query_text.into() }
    }
}

/// Coarse part-of-speech classes, after the Universal Dependencies tag set.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PartOfSpeech {
    Noun,
    ProperNoun,
    Verb,
    Adjective,
    Adverb,
    Pronoun,
    Determiner,
    Adposition,
    Conjunction,
    Numeral,
    Punctuation,
    Other,
}

impl PartOfSpeech {
    /// Parse a UD tag such as `NOUN` or `PROPN`. Unknown tags map to `Other`.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_uppercase().as_str() {
            "NOUN" => PartOfSpeech::Noun,
            "PROPN" => PartOfSpeech::ProperNoun,
            "VERB" | "AUX" => PartOfSpeech::Verb,
            "ADJ" => PartOfSpeech::Adjective,
            "ADV" => PartOfSpeech::Adverb,
            "PRON" => PartOfSpeech::Pronoun,
            "DET" => PartOfSpeech::Determiner,
            "ADP" => PartOfSpeech::Adposition,
            "CCONJ" | "SCONJ" | "CONJ" => PartOfSpeech::Conjunction,
            "NUM" => PartOfSpeech::Numeral,
            "PUNCT" | "SYM" => PartOfSpeech::Punctuation,
            _ => PartOfSpeech::Other,
        }
    }

    /// Content words are reduced to a stem; function words keep their form.
    pub fn is_open_class(&self) -> bool {
        matches!(
            self,
            PartOfSpeech::Noun
                | PartOfSpeech::ProperNoun
                | PartOfSpeech::Verb
                | PartOfSpeech::Adjective
                | PartOfSpeech::Adverb
                | PartOfSpeech::Other
        )
    }

    /// The lexical-network class used to filter synsets, if any.
    pub fn lexical(&self) -> Option<LexicalPos> {
        match self {
            PartOfSpeech::Noun | PartOfSpeech::ProperNoun => Some(LexicalPos::Noun),
            PartOfSpeech::Verb => Some(LexicalPos::Verb),
            PartOfSpeech::Adjective => Some(LexicalPos::Adjective),
            PartOfSpeech::Adverb => Some(LexicalPos::Adverb),
            _ => None,
        }
    }
}

/// Word classes of the lexical network (wordnet `n`, `v`, `a`/`s`, `r`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum LexicalPos {
    Noun,
    Verb,
    Adjective,
    Adverb,
}

impl LexicalPos {
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'n' => Some(LexicalPos::Noun),
            'v' => Some(LexicalPos::Verb),
            'a' | 's' => Some(LexicalPos::Adjective),
            'r' => Some(LexicalPos::Adverb),
            _ => None,
        }
    }
}

/// How links are rendered inside answer text.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RenderStyle {
    /// `label (url)`
    #[default]
    Plain,
    /// `<a href='url' target='_blank'>label</a>`
    Markup,
}

impl FromStr for RenderStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plain" => Ok(RenderStyle::Plain),
            "markup" | "html" => Ok(RenderStyle::Markup),
            other => Err(Error::InvalidConfig(format!("unknown render style '{other}'"))),
        }
    }
}

/// A surface token as segmented and tagged by a [`crate::traits::Tagger`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedToken {
    pub text: String,
    pub pos: PartOfSpeech,
}

impl TaggedToken {
    pub fn new(text: impl Into<String>, pos: PartOfSpeech) -> Self {
        Self { text: text.into(), pos }
    }
}

/// A synonym set of the lexical network. Multi-word lemmas use `_`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Synset {
    pub id: String,
    pub pos: LexicalPos,
    pub lemmas: Vec<String>,
}
