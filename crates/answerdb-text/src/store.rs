use parking_lot::Mutex;
use std::collections::HashSet;
use std::fmt::Display;
use std::path::Path;
use std::sync::Arc;
use tantivy::collector::{Count, TopDocs};
use tantivy::directory::MmapDirectory;
use tantivy::query::{AllQuery, BooleanQuery, Occur, Query, TermQuery};
use tantivy::schema::{Field, IndexRecordOption, Schema, Value};
use tantivy::{doc, Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument, Term};
use tracing::{debug, info};

use answerdb_core::error::{Error, Result};
use answerdb_core::traits::ContentStore;
use answerdb_core::types::{Collection, RawDocument, UnknownQueryRecord};
use answerdb_nlp::TextNormalizer;

use crate::tantivy_utils::{build_document_schema, build_unknown_schema, register_analyzer, DocumentFields};

const WRITER_MEMORY_BYTES: usize = 20_000_000;
const UNKNOWN: &str = "unknown";

fn store_err(e: impl Display) -> Error {
	Error::Store(e.to_string())
}

fn open_index(dir: Option<&Path>, schema: Schema) -> Result<Index> {
	match dir {
		Some(dir) => {
			std::fs::create_dir_all(dir)?;
			let directory = MmapDirectory::open(dir).map_err(store_err)?;
			Index::open_or_create(directory, schema).map_err(store_err)
		}
		None => Ok(Index::create_in_ram(schema)),
	}
}

fn open_writer(index: &Index) -> Result<(IndexReader, Mutex<IndexWriter>)> {
	let writer: IndexWriter = index.writer_with_num_threads(1, WRITER_MEMORY_BYTES).map_err(store_err)?;
	let reader = index.reader_builder().reload_policy(ReloadPolicy::Manual).try_into().map_err(store_err)?;
	Ok((reader, Mutex::new(writer)))
}

struct DocumentCollection {
	name: Collection,
	reader: IndexReader,
	writer: Mutex<IndexWriter>,
	fields: DocumentFields,
	normalizer: Arc<TextNormalizer>,
}

impl DocumentCollection {
	fn open(name: Collection, dir: Option<&Path>, normalizer: Arc<TextNormalizer>) -> Result<Self> {
		let index = open_index(dir, build_document_schema())?;
		register_analyzer(&index);
		let fields = DocumentFields::from_schema(&index.schema()).map_err(store_err)?;
		let (reader, writer) = open_writer(&index)?;
		Ok(Self { name, reader, writer, fields, normalizer })
	}

	/// Root forms of everything searchable in `raw`, reduced by the same
	/// normalizer that builds expanded queries.
	fn roots(&self, raw: &RawDocument) -> String {
		let mut roots: Vec<String> = Vec::new();
		if let Some(title) = &raw.title {
			roots.extend(self.normalizer.tokenize(title));
		}
		for text in raw.texts.iter().flatten() {
			roots.extend(self.normalizer.tokenize(text));
		}
		for keyword in &raw.keywords {
			// Extracted keywords are roots already, harvested ones are not.
			roots.push(keyword.term.to_lowercase());
			roots.push(self.normalizer.canonical(&keyword.term));
		}
		roots.join(" ")
	}

	fn encode(&self, raw: &RawDocument) -> Result<TantivyDocument> {
		let f = &self.fields;
		let mut doc = TantivyDocument::default();
		doc.add_text(f.id, &raw.id);
		doc.add_bool(f.manually_changed, raw.manually_changed);
		doc.add_text(f.roots, self.roots(raw));
		let source = serde_json::to_string(raw).map_err(store_err)?;
		doc.add_text(f.source, source);
		Ok(doc)
	}

	fn decode(&self, doc: &TantivyDocument) -> Result<RawDocument> {
		let source = doc
			.get_first(self.fields.source)
			.and_then(|v| v.as_str())
			.ok_or_else(|| Error::Store(format!("{} document without stored source", self.name)))?;
		serde_json::from_str(source).map_err(store_err)
	}

	fn upsert(&self, docs: &[RawDocument]) -> Result<usize> {
		let mut writer = self.writer.lock();
		for raw in docs {
			writer.delete_term(Term::from_field_text(self.fields.id, &raw.id));
			writer.add_document(self.encode(raw)?).map_err(store_err)?;
		}
		writer.commit().map_err(store_err)?;
		self.reader.reload().map_err(store_err)?;
		debug!(collection = %self.name, count = docs.len(), "upserted documents");
		Ok(docs.len())
	}

	fn delete(&self, id: &str) -> Result<bool> {
		let existed = self.get(id)?.is_some();
		if existed {
			let mut writer = self.writer.lock();
			writer.delete_term(Term::from_field_text(self.fields.id, id));
			writer.commit().map_err(store_err)?;
			self.reader.reload().map_err(store_err)?;
		}
		Ok(existed)
	}

	fn get(&self, id: &str) -> Result<Option<RawDocument>> {
		let searcher = self.reader.searcher();
		let query = TermQuery::new(Term::from_field_text(self.fields.id, id), IndexRecordOption::Basic);
		let top_docs = searcher.search(&query, &TopDocs::with_limit(1)).map_err(store_err)?;
		match top_docs.first() {
			Some((_, address)) => {
				let doc: TantivyDocument = searcher.doc(*address).map_err(store_err)?;
				self.decode(&doc).map(Some)
			}
			None => Ok(None),
		}
	}

	/// `query` holds root-form terms separated by whitespace; a document
	/// matches when any of them is among its roots.
	fn search(&self, query: &str, limit: usize) -> Result<Vec<RawDocument>> {
		if limit == 0 {
			return Ok(Vec::new());
		}
		let mut seen = HashSet::new();
		let clauses: Vec<(Occur, Box<dyn Query>)> = query
			.split_whitespace()
			.map(str::to_lowercase)
			.filter(|term| seen.insert(term.clone()))
			.map(|term| {
				let term_query: Box<dyn Query> = Box::new(TermQuery::new(
					Term::from_field_text(self.fields.roots, &term),
					IndexRecordOption::WithFreqs,
				));
				(Occur::Should, term_query)
			})
			.collect();
		if clauses.is_empty() {
			return Ok(Vec::new());
		}
		let searcher = self.reader.searcher();
		let top_docs = searcher.search(&BooleanQuery::new(clauses), &TopDocs::with_limit(limit)).map_err(store_err)?;
		let mut hits = Vec::with_capacity(top_docs.len());
		for (_score, address) in top_docs {
			let doc: TantivyDocument = searcher.doc(address).map_err(store_err)?;
			hits.push(self.decode(&doc)?);
		}
		debug!(collection = %self.name, query, hits = hits.len(), "text search");
		Ok(hits)
	}

	fn len(&self) -> u64 {
		self.reader.searcher().num_docs()
	}
}

struct UnknownCollection {
	reader: IndexReader,
	writer: Mutex<IndexWriter>,
	query_text: Field,
}

impl UnknownCollection {
	fn open(dir: Option<&Path>) -> Result<Self> {
		let index = open_index(dir, build_unknown_schema())?;
		let query_text = index.schema().get_field("query_text").map_err(store_err)?;
		let (reader, writer) = open_writer(&index)?;
		Ok(Self { reader, writer, query_text })
	}

	fn count(&self, text: &str) -> Result<usize> {
		let query = TermQuery::new(Term::from_field_text(self.query_text, text), IndexRecordOption::Basic);
		self.reader.searcher().search(&query, &Count).map_err(store_err)
	}

	fn insert_once(&self, record: &UnknownQueryRecord) -> Result<()> {
		// The writer lock serializes check-then-insert across threads.
		let mut writer = self.writer.lock();
		if self.count(&record.query_text)? > 0 {
			return Err(Error::DuplicateKey { collection: UNKNOWN.to_string(), key: record.query_text.clone() });
		}
		writer.add_document(doc!(self.query_text => record.query_text.clone())).map_err(store_err)?;
		writer.commit().map_err(store_err)?;
		self.reader.reload().map_err(store_err)?;
		Ok(())
	}

	fn list(&self) -> Result<Vec<UnknownQueryRecord>> {
		let searcher = self.reader.searcher();
		let total = searcher.num_docs() as usize;
		if total == 0 {
			return Ok(Vec::new());
		}
		let top_docs = searcher.search(&AllQuery, &TopDocs::with_limit(total)).map_err(store_err)?;
		let mut records = Vec::with_capacity(top_docs.len());
		for (_score, address) in top_docs {
			let doc: TantivyDocument = searcher.doc(address).map_err(store_err)?;
			if let Some(text) = doc.get_first(self.query_text).and_then(|v| v.as_str()) {
				records.push(UnknownQueryRecord::new(text));
			}
		}
		records.sort_by(|a, b| a.query_text.cmp(&b.query_text));
		Ok(records)
	}

	fn remove(&self, text: &str) -> Result<bool> {
		let mut writer = self.writer.lock();
		if self.count(text)? == 0 {
			return Ok(false);
		}
		writer.delete_term(Term::from_field_text(self.query_text, text));
		writer.commit().map_err(store_err)?;
		self.reader.reload().map_err(store_err)?;
		Ok(true)
	}
}

/// Content store over three tantivy indexes: `automatic`, `manual` and
/// `unknown`. Documents keep their full JSON form in a stored field, so a
/// hit comes back exactly as it was written, malformed fields included.
pub struct TantivyContentStore {
	automatic: DocumentCollection,
	manual: DocumentCollection,
	unknown: UnknownCollection,
}

impl TantivyContentStore {
	/// Open, creating if needed, the three indexes below `dir`. Documents
	/// are indexed by the roots `normalizer` reduces them to.
	pub fn open(dir: &Path, normalizer: Arc<TextNormalizer>) -> Result<Self> {
		let store = Self {
			automatic: DocumentCollection::open(Collection::Automatic, Some(&dir.join("automatic")), Arc::clone(&normalizer))?,
			manual: DocumentCollection::open(Collection::Manual, Some(&dir.join("manual")), normalizer)?,
			unknown: UnknownCollection::open(Some(&dir.join(UNKNOWN)))?,
		};
		info!(
			dir = %dir.display(),
			automatic = store.automatic.len(),
			manual = store.manual.len(),
			"opened content store"
		);
		Ok(store)
	}

	pub fn in_memory(normalizer: Arc<TextNormalizer>) -> Result<Self> {
		Ok(Self {
			automatic: DocumentCollection::open(Collection::Automatic, None, Arc::clone(&normalizer))?,
			manual: DocumentCollection::open(Collection::Manual, None, normalizer)?,
			unknown: UnknownCollection::open(None)?,
		})
	}

	fn collection(&self, collection: Collection) -> &DocumentCollection {
		match collection {
			Collection::Automatic => &self.automatic,
			Collection::Manual => &self.manual,
		}
	}

	/// Insert or replace documents by id. Returns the number written.
	pub fn upsert(&self, collection: Collection, docs: &[RawDocument]) -> Result<usize> {
		self.collection(collection).upsert(docs)
	}

	pub fn get(&self, collection: Collection, id: &str) -> Result<Option<RawDocument>> {
		self.collection(collection).get(id)
	}

	/// Returns whether a document with `id` existed.
	pub fn delete(&self, collection: Collection, id: &str) -> Result<bool> {
		self.collection(collection).delete(id)
	}

	pub fn count(&self, collection: Collection) -> u64 {
		self.collection(collection).len()
	}

	/// Store an editor's version of an answer in `manual` and flag the
	/// automatic document with the same id as manually changed.
	pub fn apply_override(&self, mut doc: RawDocument) -> Result<()> {
		doc.manually_changed = true;
		self.manual.upsert(std::slice::from_ref(&doc))?;
		if let Some(mut automatic) = self.automatic.get(&doc.id)? {
			if !automatic.manually_changed {
				automatic.manually_changed = true;
				self.automatic.upsert(&[automatic])?;
			}
		}
		info!(id = %doc.id, "applied manual override");
		Ok(())
	}

	/// Drop the manual version of `id` and let the automatic one answer again.
	pub fn revert_override(&self, id: &str) -> Result<bool> {
		let removed = self.manual.delete(id)?;
		if let Some(mut automatic) = self.automatic.get(id)? {
			if automatic.manually_changed {
				automatic.manually_changed = false;
				self.automatic.upsert(&[automatic])?;
			}
		}
		info!(id, removed, "reverted manual override");
		Ok(removed)
	}

	/// Recorded unanswered queries, ordered by text.
	pub fn unknown_queries(&self) -> Result<Vec<UnknownQueryRecord>> {
		self.unknown.list()
	}

	/// Returns whether the query was recorded.
	pub fn remove_unknown(&self, query_text: &str) -> Result<bool> {
		self.unknown.remove(query_text)
	}
}

impl ContentStore for TantivyContentStore {
	fn search_text(&self, collection: Collection, query: &str, limit: usize) -> Result<Vec<RawDocument>> {
		self.collection(collection).search(query, limit)
	}

	fn insert_once(&self, record: &UnknownQueryRecord) -> Result<()> {
		self.unknown.insert_once(record)
	}
}
