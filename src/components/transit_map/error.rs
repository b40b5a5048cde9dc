use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
	#[error("failed to fetch {url}: {reason}")]
	FetchFailure { url: String, reason: String },

	#[error("position row {row}, column {column}: {value:?} is not a coordinate")]
	InvalidPosition {
		row: usize,
		column: usize,
		value: String,
	},

	#[error("no position row for station row {row}")]
	MissingPosition { row: usize },

	#[error("link {from} -> {to} points past the last node ({node_count} nodes)")]
	DanglingLinkReference {
		from: usize,
		to: usize,
		node_count: usize,
	},

	#[error("no node with id {id}")]
	UnknownNode { id: usize },

	#[error("malformed table: {0}")]
	Table(#[from] csv::Error),
}
