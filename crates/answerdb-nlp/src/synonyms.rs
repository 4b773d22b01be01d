//! Custom synonym groups curated by editors.
//!
//! File format: one group per line, terms separated by commas. Blank lines
//! and lines starting with `#` are ignored. Terms are reduced to root form at
//! load time so lookups match normalized query tokens directly.
//!
//! The loaded groups are an immutable snapshot behind an `Arc`. `reload`
//! parses the file completely before swapping the snapshot in, so readers see
//! either the previous list or the new one and never a partial rebuild.

use anyhow::{Context, Result};
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use crate::tokenize::TextNormalizer;

/// A set of interchangeable root-form terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynonymGroup {
    terms: Vec<String>,
}

impl SynonymGroup {
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for term in terms.into_iter().map(Into::into) {
            if !term.is_empty() && !unique.contains(&term) {
                unique.push(term);
            }
        }
        Self { terms: unique }
    }

    pub fn contains(&self, term: &str) -> bool {
        self.terms.iter().any(|t| t == term)
    }

    /// Remove `term`, returning whether it was present.
    pub fn remove(&mut self, term: &str) -> bool {
        let before = self.terms.len();
        self.terms.retain(|t| t != term);
        before != self.terms.len()
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn into_terms(self) -> Vec<String> {
        self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

pub struct SynonymStore {
    path: PathBuf,
    normalizer: Arc<TextNormalizer>,
    groups: RwLock<Arc<Vec<SynonymGroup>>>,
}

impl SynonymStore {
    /// Load the synonym file. Failing here is fatal to the caller.
    pub fn load(path: impl Into<PathBuf>, normalizer: Arc<TextNormalizer>) -> Result<Self> {
        let path = path.into();
        let groups = read_groups(&path, &normalizer)?;
        info!(path = %path.display(), groups = groups.len(), "loaded synonym groups");
        Ok(Self { path, normalizer, groups: RwLock::new(Arc::new(groups)) })
    }

    /// A deep copy of the first group containing `token`.
    pub fn get_synset(&self, token: &str) -> Option<SynonymGroup> {
        self.snapshot().iter().find(|g| g.contains(token)).cloned()
    }

    /// The current group list. Holding it does not block a reload.
    pub fn snapshot(&self) -> Arc<Vec<SynonymGroup>> {
        Arc::clone(&self.groups.read())
    }

    /// Re-read the file and swap in the new groups. On failure the previously
    /// loaded groups stay in place and the error is returned.
    pub fn reload(&self) -> Result<usize> {
        match read_groups(&self.path, &self.normalizer) {
            Ok(groups) => {
                let count = groups.len();
                *self.groups.write() = Arc::new(groups);
                info!(path = %self.path.display(), groups = count, "reloaded synonym groups");
                Ok(count)
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "synonym reload failed, keeping previous groups");
                Err(e)
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.groups.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn read_groups(path: &Path, normalizer: &TextNormalizer) -> Result<Vec<SynonymGroup>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read synonym file {}", path.display()))?;
    Ok(parse_groups(&contents, normalizer))
}

/// Parse synonym file contents, normalizing every term.
pub fn parse_groups(contents: &str, normalizer: &TextNormalizer) -> Vec<SynonymGroup> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| SynonymGroup::new(line.split(',').map(|term| normalizer.canonical(term))))
        .filter(|group| !group.is_empty())
        .collect()
}
