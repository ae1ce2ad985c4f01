use arrow_array::{Array, Float32Array, RecordBatch, StringArray};
use futures::TryStreamExt;
use lancedb::query::{ExecutableQuery, QueryBase};
use lancedb::{connect, DistanceType, Table};
use std::path::{Path, PathBuf};
use tokio::runtime::Runtime;

use docret_core::{DistanceMetric, DocumentChunk, Error, Metadata, Result, ScoredChunk, VectorIndex};

use crate::schema::{vector_dim, CONTENT_COLUMN, DISTANCE_COLUMN, ID_COLUMN, METADATA_COLUMN, VECTOR_COLUMN};

/// Read-only view of a LanceDB chunk table.
///
/// LanceDB is async; this type owns a runtime and blocks on it so queries are
/// synchronous. Do not call it from inside another tokio runtime.
pub struct LanceIndex {
	rt: Runtime,
	table: Table,
	path: PathBuf,
	metric: DistanceMetric,
	dim: usize,
}

impl LanceIndex {
	pub fn open(path: &Path, table_name: &str, metric: DistanceMetric) -> Result<Self> {
		if !path.is_dir() {
			return Err(Error::index_load(path, "directory does not exist"));
		}
		let rt = tokio::runtime::Builder::new_multi_thread()
			.enable_all()
			.build()
			.map_err(|e| Error::index_load(path, format!("failed to start runtime: {e}")))?;
		let uri = path.to_string_lossy().to_string();
		let (table, schema) = rt.block_on(async {
			let db = connect(&uri).execute().await.map_err(|e| Error::index_load(path, e))?;
			let names = db.table_names().execute().await.map_err(|e| Error::index_load(path, e))?;
			if !names.iter().any(|n| n == table_name) {
				return Err(Error::index_load(path, format!("table '{table_name}' not found (available: {})", names.join(", "))));
			}
			let table = db.open_table(table_name).execute().await.map_err(|e| Error::index_load(path, e))?;
			let schema = table.schema().await.map_err(|e| Error::index_load(path, e))?;
			Ok((table, schema))
		})?;
		if schema.field_with_name(CONTENT_COLUMN).is_err() {
			return Err(Error::index_load(path, format!("table '{table_name}' has no '{CONTENT_COLUMN}' column")));
		}
		let dim = vector_dim(&schema)
			.ok_or_else(|| Error::index_load(path, format!("table '{table_name}' has no fixed-size '{VECTOR_COLUMN}' column")))?;
		tracing::info!(path = %path.display(), table = table_name, dim, metric = %metric, "opened LanceDB index");
		Ok(Self { rt, table, path: path.to_path_buf(), metric, dim })
	}

}

impl VectorIndex for LanceIndex {
	fn metric(&self) -> DistanceMetric { self.metric }

	fn dim(&self) -> Option<usize> { Some(self.dim) }

	fn len(&self) -> Result<usize> {
		self.rt.block_on(self.table.count_rows(None)).map_err(Error::search)
	}

	fn search_by_vector(&self, query: &[f32], k: usize) -> Result<Vec<ScoredChunk>> {
		if query.len() != self.dim {
			return Err(Error::search(format!(
				"query vector has {} dimensions but the index at {} stores {}; was it built with a different model?",
				query.len(), self.path.display(), self.dim
			)));
		}
		if self.len()? == 0 { return Ok(Vec::new()); }
		let batches: Vec<RecordBatch> = self.rt.block_on(async {
			let stream = self
				.table
				.vector_search(query.to_vec())?
				.distance_type(distance_type(self.metric))
				.limit(k)
				.execute()
				.await?;
			stream.try_collect::<Vec<_>>().await
		}).map_err(Error::search)?;

		let mut hits = Vec::new();
		for batch in &batches { read_hits(batch, &mut hits)?; }
		// Lance returns hits nearest first; keep that order and never exceed k.
		hits.truncate(k);
		Ok(hits)
	}
}

fn distance_type(metric: DistanceMetric) -> DistanceType {
	match metric {
		DistanceMetric::L2 => DistanceType::L2,
		DistanceMetric::Cosine => DistanceType::Cosine,
		DistanceMetric::Dot => DistanceType::Dot,
	}
}

fn string_column<'a>(batch: &'a RecordBatch, name: &str) -> Option<&'a StringArray> {
	batch.column_by_name(name).and_then(|c| c.as_any().downcast_ref::<StringArray>())
}

fn read_hits(batch: &RecordBatch, out: &mut Vec<ScoredChunk>) -> Result<()> {
	let content = string_column(batch, CONTENT_COLUMN).ok_or_else(|| Error::search("result batch has no content column"))?;
	let distance = batch
		.column_by_name(DISTANCE_COLUMN)
		.and_then(|c| c.as_any().downcast_ref::<Float32Array>())
		.ok_or_else(|| Error::search("result batch has no _distance column"))?;
	let ids = string_column(batch, ID_COLUMN);
	let metadata = string_column(batch, METADATA_COLUMN);
	for i in 0..batch.num_rows() {
		let id = ids.filter(|c| c.is_valid(i)).map(|c| c.value(i).to_string()).unwrap_or_default();
		let metadata = match metadata.filter(|c| c.is_valid(i)) {
			Some(col) => parse_metadata(col.value(i))?,
			None => Metadata::new(),
		};
		let chunk = DocumentChunk { id, content: content.value(i).to_string(), metadata };
		out.push(ScoredChunk::new(chunk, distance.value(i)));
	}
	Ok(())
}

fn parse_metadata(raw: &str) -> Result<Metadata> {
	if raw.trim().is_empty() { return Ok(Metadata::new()); }
	let value: Option<Metadata> = serde_json::from_str(raw).map_err(|e| Error::search(format!("malformed metadata JSON: {e}")))?;
	Ok(value.unwrap_or_default())
}
