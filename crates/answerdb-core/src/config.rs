//! Lightweight configuration loader, typed settings and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env vars.
//! Nested keys in env vars are separated by `__`, e.g.
//! `APP_QUERY_SYSTEM__ANSWER_THRESHOLD=0.2`.

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub struct Config {
    figment: Figment,
    base_dir: PathBuf,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::load_from(Path::new("."), &env_name)
    }

    /// Load `config.toml` and its environment overlay from `base_dir`.
    pub fn load_from(base_dir: &Path, env_name: &str) -> anyhow::Result<Self> {
        let mut figment = Figment::new().merge(Toml::file(base_dir.join("config.toml")));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file(base_dir.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(base_dir.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(base_dir.join("config.test.toml"))),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment, base_dir: base_dir.to_path_buf() };
        config.settings()?;
        Ok(config)
    }

    /// Build a configuration from an inline TOML document, without env overlay.
    pub fn from_toml_str(toml: &str) -> Self {
        Self { figment: Figment::new().merge(Toml::string(toml)), base_dir: PathBuf::from(".") }
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    /// The full typed settings tree, validated.
    pub fn settings(&self) -> anyhow::Result<Settings> {
        let settings: Settings = self
            .figment
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to read settings: {}", e))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Resolve a configured path against the directory the config was loaded from.
    pub fn resolve_path<S: AsRef<str>>(&self, p: S) -> PathBuf {
        resolve_with_base(&self.base_dir, p)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub resources: ResourceSettings,
    pub store: StoreSettings,
    pub nlp: NlpSettings,
    pub ranking: RankingSettings,
    pub query_system: QuerySettings,
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        let q = &self.query_system;
        if !(0.0..=1.0).contains(&q.answer_threshold) {
            return Err(Error::InvalidConfig(format!(
                "query_system.answer_threshold must be within [0, 1], got {}",
                q.answer_threshold
            )));
        }
        if q.similarity_threshold < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "query_system.similarity_threshold must not be negative, got {}",
                q.similarity_threshold
            )));
        }
        if q.max_answers == 0 {
            return Err(Error::InvalidConfig("query_system.max_answers must be at least 1".to_string()));
        }
        if self.store.candidates_per_collection == 0 {
            return Err(Error::InvalidConfig("store.candidates_per_collection must be at least 1".to_string()));
        }
        if !(self.ranking.max_df > 0.0 && self.ranking.max_df <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "ranking.max_df must be within (0, 1], got {}",
                self.ranking.max_df
            )));
        }
        Ok(())
    }
}

/// Static resource files. Relative paths resolve against the config directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceSettings {
    pub stopwords: String,
    pub synonyms: String,
    pub lexicon: Option<String>,
    pub pos_lexicon: Option<String>,
}

impl Default for ResourceSettings {
    fn default() -> Self {
        Self {
            stopwords: "resources/stopwords.txt".to_string(),
            synonyms: "resources/synonyms.txt".to_string(),
            lexicon: None,
            pos_lexicon: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    pub index_dir: String,
    pub candidates_per_collection: usize,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self { index_dir: "data/index".to_string(), candidates_per_collection: 30 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NlpSettings {
    /// Snowball stemmer language, e.g. `norwegian`.
    pub language: String,
}

impl Default for NlpSettings {
    fn default() -> Self {
        Self { language: "norwegian".to_string() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingSettings {
    pub sublinear_tf: bool,
    /// Terms occurring in more than `max_df * n_docs` candidates are pruned.
    pub max_df: f32,
}

impl Default for RankingSettings {
    fn default() -> Self {
        Self { sublinear_tf: true, max_df: 1.0 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QuerySettings {
    pub not_found: String,
    pub multiple_answers: String,
    pub answer_threshold: f32,
    /// Tie tolerance: answers scoring within this margin of the top are kept.
    pub similarity_threshold: f32,
    /// Character budget of a multi-answer digest, preamble excluded.
    pub character_limit: usize,
    pub max_answers: usize,
    pub source_link_prefix: String,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            not_found: "Jeg fant ikke informasjonen du spurte etter.".to_string(),
            multiple_answers: "Jeg fant flere mulige svar på spørsmålet ditt:".to_string(),
            answer_threshold: 0.1,
            similarity_threshold: 0.05,
            character_limit: 500,
            max_answers: 5,
            source_link_prefix: String::new(),
        }
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    // Expand env vars first
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    // Expand ~ at start
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
