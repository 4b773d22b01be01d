use answerdb_core::error::{Error, Result};
use answerdb_core::types::PartOfSpeech;
use rust_stemmers::{Algorithm, Stemmer};

pub fn select_algorithm(language: &str) -> Option<Algorithm> {
    let algorithm = match language.trim().to_ascii_lowercase().as_str() {
        "norwegian" | "nb" | "no" | "nob" => Algorithm::Norwegian,
        "danish" | "da" => Algorithm::Danish,
        "swedish" | "sv" => Algorithm::Swedish,
        "english" | "en" => Algorithm::English,
        "german" | "de" => Algorithm::German,
        "dutch" | "nl" => Algorithm::Dutch,
        "finnish" | "fi" => Algorithm::Finnish,
        "french" | "fr" => Algorithm::French,
        "spanish" | "es" => Algorithm::Spanish,
        _ => return None,
    };
    Some(algorithm)
}

/// Reduces tagged tokens to the canonical root form used for matching.
///
/// Open-class words are lowercased and stemmed; function words are only
/// lowercased, since stemming them merges unrelated short forms.
pub struct RootReducer {
    stemmer: Stemmer,
    language: String,
}

impl RootReducer {
    pub fn new(language: &str) -> Result<Self> {
        let algorithm = select_algorithm(language)
            .ok_or_else(|| Error::InvalidConfig(format!("unsupported stemmer language '{language}'")))?;
        Ok(Self { stemmer: Stemmer::create(algorithm), language: language.to_string() })
    }

    pub fn norwegian() -> Self {
        Self { stemmer: Stemmer::create(Algorithm::Norwegian), language: "norwegian".to_string() }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn reduce(&self, token: &str, pos: PartOfSpeech) -> String {
        let lower = token.to_lowercase();
        if pos.is_open_class() {
            self.stemmer.stem(&lower).into_owned()
        } else {
            lower
        }
    }
}
