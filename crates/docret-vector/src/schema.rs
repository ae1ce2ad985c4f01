//! Arrow layout of a chunk table.
//!
//! | column     | type                           | nullable |
//! |------------|--------------------------------|----------|
//! | `id`       | Utf8                           | no       |
//! | `content`  | Utf8                           | no       |
//! | `metadata` | Utf8 (JSON object)             | yes      |
//! | `vector`   | FixedSizeList<Float32>[dim]    | yes      |
//!
//! Ingestion happens elsewhere; [`chunk_batch`] encodes rows in this layout
//! for pipelines and fixtures.

use anyhow::{bail, Result};
use arrow_array::types::Float32Type;
use arrow_array::{FixedSizeListArray, RecordBatch, StringArray};
use arrow_schema::{DataType, Field, Schema};
use std::sync::Arc;

use docret_core::DocumentChunk;

pub const ID_COLUMN: &str = "id";
pub const CONTENT_COLUMN: &str = "content";
pub const METADATA_COLUMN: &str = "metadata";
pub const VECTOR_COLUMN: &str = "vector";
pub const DISTANCE_COLUMN: &str = "_distance";

pub fn build_chunk_schema(dim: i32) -> Arc<Schema> {
	Arc::new(Schema::new(vec![
		Field::new(ID_COLUMN, DataType::Utf8, false),
		Field::new(CONTENT_COLUMN, DataType::Utf8, false),
		Field::new(METADATA_COLUMN, DataType::Utf8, true),
		Field::new(VECTOR_COLUMN, DataType::FixedSizeList(Arc::new(Field::new("item", DataType::Float32, true)), dim), true),
	]))
}

/// Dimension of the `vector` column, if the schema has one.
pub fn vector_dim(schema: &Schema) -> Option<usize> {
	match schema.field_with_name(VECTOR_COLUMN).ok()?.data_type() {
		DataType::FixedSizeList(_, n) => usize::try_from(*n).ok(),
		_ => None,
	}
}

pub fn chunk_batch(chunks: &[DocumentChunk], vectors: &[Vec<f32>], dim: i32) -> Result<RecordBatch> {
	if chunks.len() != vectors.len() { bail!("{} chunks but {} vectors", chunks.len(), vectors.len()); }
	if let Some(bad) = vectors.iter().find(|v| v.len() as i32 != dim) { bail!("vector of length {} in a table of dim {}", bad.len(), dim); }
	let ids: Vec<&str> = chunks.iter().map(|c| c.id.as_str()).collect();
	let contents: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
	let mut metadata = Vec::with_capacity(chunks.len());
	for c in chunks { metadata.push(if c.metadata.is_empty() { None } else { Some(serde_json::to_string(&c.metadata)?) }); }
	let vectors = vectors.iter().map(|v| Some(v.iter().map(|&x| Some(x)).collect::<Vec<_>>()));
	Ok(RecordBatch::try_new(build_chunk_schema(dim), vec![
		Arc::new(StringArray::from(ids)),
		Arc::new(StringArray::from(contents)),
		Arc::new(StringArray::from(metadata)),
		Arc::new(FixedSizeListArray::from_iter_primitive::<Float32Type, _, _>(vectors, dim)),
	])?)
}
