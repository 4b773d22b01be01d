use anyhow::{anyhow, Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use answerdb_core::config::{resolve_with_base, Config, Settings};
use answerdb_core::traits::LexicalNetwork;
use answerdb_engine::QueryResolver;
use answerdb_nlp::lexicon::omw_language;
use answerdb_nlp::{EmptyLexicon, RootReducer, RuleTagger, StopWords, SynonymStore, TextNormalizer, WordNetLexicon};
use answerdb_text::TantivyContentStore;
use answerdb_vector::{KeywordExtractor, TfIdfConfig};

/// Keywords kept per document when ingestion fills them in.
pub const KEYWORDS_PER_DOCUMENT: usize = 10;

/// Every long-lived component, constructed once and shared by reference.
pub struct App {
    pub settings: Settings,
    pub normalizer: Arc<TextNormalizer>,
    pub synonyms: Arc<SynonymStore>,
    pub store: Arc<TantivyContentStore>,
    pub resolver: QueryResolver,
}

impl App {
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::build(config.settings()?, config.base_dir())
    }

    /// Load resources and open the content store. Relative paths in
    /// `settings` resolve against `base_dir`.
    pub fn build(settings: Settings, base_dir: &Path) -> Result<Self> {
        let resources = &settings.resources;
        let stopwords = StopWords::load(&resolve_with_base(base_dir, &resources.stopwords))?;
        let tagger = match &resources.pos_lexicon {
            Some(path) => RuleTagger::with_lexicon_file(&resolve_with_base(base_dir, path))?,
            None => RuleTagger::new(),
        };
        let reducer = RootReducer::new(&settings.nlp.language)?;
        let normalizer = Arc::new(TextNormalizer::new(Box::new(tagger), reducer, stopwords));

        let synonyms = Arc::new(SynonymStore::load(resolve_with_base(base_dir, &resources.synonyms), Arc::clone(&normalizer))?);
        let lexicon: Arc<dyn LexicalNetwork> = match &resources.lexicon {
            Some(path) => {
                let language = omw_language(&settings.nlp.language)
                    .ok_or_else(|| anyhow!("no wordnet language code for '{}'", settings.nlp.language))?;
                Arc::new(WordNetLexicon::load(&resolve_with_base(base_dir, path), language, &normalizer)?)
            }
            None => Arc::new(EmptyLexicon),
        };

        let index_dir = resolve_with_base(base_dir, &settings.store.index_dir);
        let store = Arc::new(
            TantivyContentStore::open(&index_dir, Arc::clone(&normalizer))
                .with_context(|| format!("Failed to open content store at {}", index_dir.display()))?,
        );

        let resolver = QueryResolver::from_settings(
            &settings,
            Arc::clone(&normalizer),
            Arc::clone(&synonyms),
            lexicon,
            store.clone(),
        );
        info!(language = %settings.nlp.language, index = %index_dir.display(), "answerdb ready");
        Ok(Self { settings, normalizer, synonyms, store, resolver })
    }

    pub fn keyword_extractor(&self) -> KeywordExtractor {
        KeywordExtractor::new(Arc::clone(&self.normalizer), TfIdfConfig::from(&self.settings.ranking), KEYWORDS_PER_DOCUMENT)
    }
}
