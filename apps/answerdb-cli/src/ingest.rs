use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

use answerdb_core::types::{Collection, Document, RawDocument};
use answerdb_text::TantivyContentStore;
use answerdb_vector::{KeywordExtractor, RankError};

/// JSON files under `path`, or `path` itself when it is a file.
pub fn document_files(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        return vec![path.to_path_buf()];
    }
    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("json"))
        .map(|e| e.into_path())
        .collect();
    files.sort();
    files
}

/// A file holds one document object or an array of them.
pub fn read_documents(file: &Path) -> Result<Vec<RawDocument>> {
    let contents = std::fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let value: serde_json::Value =
        serde_json::from_str(&contents).with_context(|| format!("Invalid JSON in {}", file.display()))?;
    let docs: serde_json::Result<Vec<RawDocument>> = if value.is_array() {
        serde_json::from_value(value)
    } else {
        serde_json::from_value(value).map(|doc| vec![doc])
    };
    docs.with_context(|| format!("Unexpected document shape in {}", file.display()))
}

pub fn load_all(path: &Path) -> Result<Vec<RawDocument>> {
    let files = document_files(path);
    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files {msg}")?
            .progress_chars("#>-"),
    );
    let mut docs = Vec::new();
    for file in &files {
        pb.set_message(file.display().to_string());
        docs.extend(read_documents(file)?);
        pb.inc(1);
    }
    pb.finish_and_clear();
    Ok(docs)
}

/// Documents that satisfy the answer contract; the rest are reported and
/// left out.
pub fn validate(docs: Vec<RawDocument>) -> Vec<Document> {
    docs.into_iter()
        .filter_map(|raw| match Document::try_from(raw) {
            Ok(doc) => Some(doc),
            Err(e) => {
                warn!(error = %e, "skipping document");
                None
            }
        })
        .collect()
}

/// Give every document without keywords its top TF-IDF terms, using the
/// batch as the idf corpus. Returns how many documents were filled.
pub fn fill_keywords(docs: &mut [Document], extractor: &KeywordExtractor) -> usize {
    let keywords = match extractor.extract(docs) {
        Ok(keywords) => keywords,
        Err(RankError::EmptyVocabulary) => {
            warn!(documents = docs.len(), "no usable terms for keyword extraction");
            return 0;
        }
    };
    let mut filled = 0;
    for (doc, extracted) in docs.iter_mut().zip(keywords) {
        if doc.keywords.is_empty() && !extracted.is_empty() {
            doc.keywords = extracted;
            filled += 1;
        }
    }
    filled
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub read: usize,
    pub stored: usize,
    pub keywords_filled: usize,
}

/// Load documents from `path` and write them to `collection`. Manual
/// documents go through the override path so their automatic counterparts
/// are flagged.
pub fn ingest(
    store: &TantivyContentStore,
    extractor: &KeywordExtractor,
    path: &Path,
    collection: Collection,
) -> Result<IngestReport> {
    let raw = load_all(path)?;
    let read = raw.len();
    let mut docs = validate(raw);
    let keywords_filled = fill_keywords(&mut docs, extractor);
    let stored = docs.len();
    let raw: Vec<RawDocument> = docs.into_iter().map(RawDocument::from).collect();
    match collection {
        Collection::Automatic => {
            store.upsert(Collection::Automatic, &raw)?;
        }
        Collection::Manual => {
            for doc in raw {
                store.apply_override(doc)?;
            }
        }
    }
    Ok(IngestReport { read, stored, keywords_filled })
}
