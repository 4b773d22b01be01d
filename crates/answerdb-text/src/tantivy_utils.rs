use tantivy::schema::{Field, IndexRecordOption, Schema, TextFieldIndexing, TextOptions, INDEXED, STORED, STRING};
use tantivy::tokenizer::{LowerCaser, TextAnalyzer, WhitespaceTokenizer};
use tantivy::Index;

/// Tokenizer of the `roots` field. Its terms are already reduced by the
/// shared normalizer, so it only splits on whitespace.
pub const ROOTS_ANALYZER: &str = "answerdb_roots";

pub fn build_document_schema() -> Schema {
	let mut schema_builder = Schema::builder();
	schema_builder.add_text_field("id", STRING | STORED);
	schema_builder.add_bool_field("manually_changed", INDEXED | STORED);
	let roots_indexing = TextFieldIndexing::default().set_tokenizer(ROOTS_ANALYZER).set_index_option(IndexRecordOption::WithFreqsAndPositions);
	schema_builder.add_text_field("roots", TextOptions::default().set_indexing_options(roots_indexing));
	schema_builder.add_text_field("source", STORED);
	schema_builder.build()
}

pub fn build_unknown_schema() -> Schema {
	let mut schema_builder = Schema::builder();
	schema_builder.add_text_field("query_text", STRING | STORED);
	schema_builder.build()
}

#[derive(Debug, Clone, Copy)]
pub struct DocumentFields {
	pub id: Field,
	pub manually_changed: Field,
	pub roots: Field,
	pub source: Field,
}

impl DocumentFields {
	pub fn from_schema(schema: &Schema) -> tantivy::Result<Self> {
		Ok(Self {
			id: schema.get_field("id")?,
			manually_changed: schema.get_field("manually_changed")?,
			roots: schema.get_field("roots")?,
			source: schema.get_field("source")?,
		})
	}
}

pub fn register_analyzer(index: &Index) {
	let analyzer = TextAnalyzer::builder(WhitespaceTokenizer::default()).filter(LowerCaser).build();
	index.tokenizers().register(ROOTS_ANALYZER, analyzer);
}
