//! Turns the adjacency and position tables into a [`TransitGraph`].
//!
//! Row `i` of the position table supplies the coordinates of row `i` of the
//! adjacency table. Adjacency cell `(i, j)` holding `"1"` links node `i` to
//! node `j - 1`.

use log::{debug, info, warn};

use super::error::GraphError;
use super::types::{CARDINALITY_STEP, CardinalityMode, Link, Node, TransitGraph};

const LINK_MARKER: &str = "1";

/// Split comma-separated text into rows of cells. Rows may differ in
/// length. Empty lines are skipped by the reader; a row of blank cells is
/// still a row.
pub fn parse_rows(text: &str) -> Result<Vec<Vec<String>>, GraphError> {
	let mut reader = csv::ReaderBuilder::new()
		.has_headers(false)
		.flexible(true)
		.from_reader(text.as_bytes());

	let mut rows = Vec::new();
	for record in reader.records() {
		let record = record?;
		rows.push(record.iter().map(str::to_owned).collect());
	}
	Ok(rows)
}

/// Parse both tables and build the graph.
pub fn build_from_csv(
	adjacency: &str,
	positions: &str,
	mode: CardinalityMode,
) -> Result<TransitGraph, GraphError> {
	let adjacency = parse_rows(adjacency)?;
	let positions = parse_rows(positions)?;
	debug!(
		"Parsed {} adjacency rows and {} position rows",
		adjacency.len(),
		positions.len()
	);
	build(&adjacency, &positions, mode)
}

pub fn build(
	adjacency: &[Vec<String>],
	positions: &[Vec<String>],
	mode: CardinalityMode,
) -> Result<TransitGraph, GraphError> {
	let mut graph = TransitGraph::default();

	for (i, row) in adjacency.iter().enumerate() {
		let position = positions
			.get(i)
			.ok_or(GraphError::MissingPosition { row: i })?;
		graph.nodes.push(Node {
			id: i,
			name: row.first().cloned().unwrap_or_default(),
			x: parse_coordinate(position, i, 0)?,
			y: parse_coordinate(position, i, 1)?,
			cardinality: 0,
		});
	}
	if positions.len() > adjacency.len() {
		debug!(
			"Ignoring {} surplus position rows",
			positions.len() - adjacency.len()
		);
	}

	let node_count = graph.nodes.len();
	for (i, row) in adjacency.iter().enumerate() {
		for (j, cell) in row.iter().enumerate().skip(1) {
			if cell != LINK_MARKER {
				continue;
			}
			let link = Link {
				source: i,
				target: j - 1,
			};
			if link.target >= node_count {
				// Row-order construction bumps the source before the target is known.
				if mode == CardinalityMode::SinglePass {
					graph.nodes[link.source].cardinality += CARDINALITY_STEP;
				}
				warn!(
					"{}",
					GraphError::DanglingLinkReference {
						from: link.source,
						to: link.target,
						node_count,
					}
				);
				graph.dropped_links.push(link);
				continue;
			}

			graph.nodes[link.source].cardinality += CARDINALITY_STEP;
			let bump_target = match mode {
				CardinalityMode::SinglePass => link.target <= link.source,
				CardinalityMode::TwoPass => true,
			};
			if bump_target {
				graph.nodes[link.target].cardinality += CARDINALITY_STEP;
			}
			graph.links.push(link);
		}
	}

	info!(
		"Built transit graph: {} stations, {} links ({} dropped)",
		graph.nodes.len(),
		graph.links.len(),
		graph.dropped_links.len()
	);
	Ok(graph)
}

/// Integer pixels, optionally signed; a plain decimal is truncated toward
/// zero. Exponents and other suffixes are rejected.
fn parse_coordinate(row: &[String], row_idx: usize, column: usize) -> Result<f64, GraphError> {
	let cell = row.get(column).map(String::as_str).unwrap_or_default();
	let invalid = || GraphError::InvalidPosition {
		row: row_idx,
		column,
		value: cell.to_owned(),
	};

	let trimmed = cell.trim();
	let unsigned = trimmed.strip_prefix(['+', '-']).unwrap_or(trimmed);
	let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
	let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
	if whole.is_empty() || !all_digits(whole) || !all_digits(fraction) {
		return Err(invalid());
	}

	let sign_len = trimmed.len() - unsigned.len();
	trimmed[..sign_len + whole.len()]
		.parse::<i64>()
		.map(|v| v as f64)
		.map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	fn rows(table: &[&[&str]]) -> Vec<Vec<String>> {
		table
			.iter()
			.map(|r| r.iter().map(|c| c.to_string()).collect())
			.collect()
	}

	#[test]
	fn nodes_follow_adjacency_row_order() {
		let adjacency = rows(&[&["A", "0", "1"], &["B", "1", "0"]]);
		let positions = rows(&[&["0", "0"], &["10", "10"]]);
		let graph = build(&adjacency, &positions, CardinalityMode::SinglePass).unwrap();

		assert_eq!(graph.nodes.len(), adjacency.len());
		for (i, node) in graph.nodes.iter().enumerate() {
			assert_eq!(node.id, i);
		}
		assert_eq!(graph.nodes[0].name, "A");
		assert_eq!((graph.nodes[0].x, graph.nodes[0].y), (0.0, 0.0));
		assert_eq!(graph.nodes[1].name, "B");
		assert_eq!((graph.nodes[1].x, graph.nodes[1].y), (10.0, 10.0));
	}

	#[test]
	fn every_marker_yields_one_link() {
		let adjacency = rows(&[&["A", "0", "1"], &["B", "1", "0"]]);
		let positions = rows(&[&["0", "0"], &["10", "10"]]);
		let graph = build(&adjacency, &positions, CardinalityMode::SinglePass).unwrap();

		assert_eq!(
			graph.links,
			vec![
				Link {
					source: 0,
					target: 1
				},
				Link {
					source: 1,
					target: 0
				},
			]
		);
		assert!(graph.dropped_links.is_empty());
	}

	#[test]
	fn single_pass_skips_targets_not_yet_built() {
		let adjacency = rows(&[&["A", "0", "1"], &["B", "0", "0"]]);
		let positions = rows(&[&["0", "0"], &["10", "10"]]);
		let graph = build(&adjacency, &positions, CardinalityMode::SinglePass).unwrap();

		assert_eq!(graph.links.len(), 1);
		assert_eq!(graph.nodes[0].cardinality, 3);
		assert_eq!(graph.nodes[1].cardinality, 0);
	}

	#[test]
	fn single_pass_bumps_targets_already_built() {
		let adjacency = rows(&[&["A", "0", "1"], &["B", "1", "0"]]);
		let positions = rows(&[&["0", "0"], &["10", "10"]]);
		let graph = build(&adjacency, &positions, CardinalityMode::SinglePass).unwrap();

		// A: source of link 0, target of link 1. B: source of link 1 only.
		assert_eq!(graph.nodes[0].cardinality, 6);
		assert_eq!(graph.nodes[1].cardinality, 3);
	}

	#[test]
	fn two_pass_bumps_both_endpoints() {
		let adjacency = rows(&[&["A", "0", "1"], &["B", "0", "0"]]);
		let positions = rows(&[&["0", "0"], &["10", "10"]]);
		let graph = build(&adjacency, &positions, CardinalityMode::TwoPass).unwrap();

		assert_eq!(graph.nodes[0].cardinality, 3);
		assert_eq!(graph.nodes[1].cardinality, 3);
	}

	#[test]
	fn self_loop_counts_twice_on_one_node() {
		let adjacency = rows(&[&["A", "1"]]);
		let positions = rows(&[&["4", "4"]]);
		let graph = build(&adjacency, &positions, CardinalityMode::SinglePass).unwrap();

		assert_eq!(
			graph.links,
			vec![Link {
				source: 0,
				target: 0
			}]
		);
		assert_eq!(graph.nodes[0].cardinality, 6);
	}

	#[test]
	fn dangling_link_is_dropped_not_fatal() {
		let adjacency = rows(&[&["A", "0", "1", "1"], &["B", "1", "0", "0"]]);
		let positions = rows(&[&["0", "0"], &["10", "10"]]);
		let graph = build(&adjacency, &positions, CardinalityMode::SinglePass).unwrap();

		assert_eq!(graph.links.len(), 2);
		assert_eq!(
			graph.dropped_links,
			vec![Link {
				source: 0,
				target: 2
			}]
		);
		// The dropped link still counts once on its source.
		assert_eq!(graph.nodes[0].cardinality, 9);
		assert_eq!(graph.nodes[1].cardinality, 3);
	}

	#[test]
	fn two_pass_ignores_dangling_links() {
		let adjacency = rows(&[&["A", "0", "1", "1"], &["B", "1", "0", "0"]]);
		let positions = rows(&[&["0", "0"], &["10", "10"]]);
		let graph = build(&adjacency, &positions, CardinalityMode::TwoPass).unwrap();

		assert_eq!(graph.dropped_links.len(), 1);
		assert_eq!(graph.nodes[0].cardinality, 6);
		assert_eq!(graph.nodes[1].cardinality, 6);
	}

	#[test]
	fn blank_adjacency_row_keeps_later_rows_aligned() {
		let graph = build_from_csv(
			"A,0,0,1\n,,,\nC,1,0,0\n",
			"0,0\n5,5\n9,9\n",
			CardinalityMode::SinglePass,
		)
		.unwrap();

		assert_eq!(graph.nodes.len(), 3);
		let names: Vec<&str> = graph.nodes.iter().map(|n| n.name.as_str()).collect();
		assert_eq!(names, vec!["A", "", "C"]);
		assert_eq!((graph.nodes[1].x, graph.nodes[1].y), (5.0, 5.0));
		assert_eq!((graph.nodes[2].id, graph.nodes[2].x), (2, 9.0));
		assert_eq!(
			graph.links,
			vec![
				Link {
					source: 0,
					target: 2
				},
				Link {
					source: 2,
					target: 0
				},
			]
		);
		assert!(graph.dropped_links.is_empty());
		assert_eq!(graph.nodes[1].cardinality, 0);
	}

	#[test]
	fn blank_position_row_is_invalid_not_skipped() {
		let err = build_from_csv("A\nB\n", "0,0\n,\n", CardinalityMode::SinglePass).unwrap_err();

		assert!(matches!(
			err,
			GraphError::InvalidPosition {
				row: 1,
				column: 0,
				..
			}
		));
	}

	#[test]
	fn exponent_and_suffixed_coordinates_are_invalid() {
		for cell in ["1e3", "12px", ".5", "-", "inf", "NaN"] {
			let adjacency = rows(&[&["A"]]);
			let positions = rows(&[&[cell, "0"]]);
			let err = build(&adjacency, &positions, CardinalityMode::SinglePass).unwrap_err();
			assert!(
				matches!(err, GraphError::InvalidPosition { row: 0, column: 0, .. }),
				"{cell:?} should be rejected"
			);
		}
	}

	#[test]
	fn missing_position_row_fails_fast() {
		let adjacency = rows(&[&["A"], &["B"], &["C"]]);
		let positions = rows(&[&["0", "0"], &["10", "10"]]);
		let err = build(&adjacency, &positions, CardinalityMode::SinglePass).unwrap_err();

		assert!(matches!(err, GraphError::MissingPosition { row: 2 }));
	}

	#[test]
	fn surplus_position_rows_are_ignored() {
		let adjacency = rows(&[&["A"]]);
		let positions = rows(&[&["1", "2"], &["3", "4"]]);
		let graph = build(&adjacency, &positions, CardinalityMode::SinglePass).unwrap();

		assert_eq!(graph.nodes.len(), 1);
	}

	#[test]
	fn non_numeric_coordinate_reports_row_and_column() {
		let adjacency = rows(&[&["A"], &["B"]]);
		let positions = rows(&[&["0", "0"], &["10", "north"]]);
		let err = build(&adjacency, &positions, CardinalityMode::SinglePass).unwrap_err();

		match err {
			GraphError::InvalidPosition { row, column, value } => {
				assert_eq!((row, column), (1, 1));
				assert_eq!(value, "north");
			}
			other => panic!("unexpected error: {other}"),
		}
	}

	#[test]
	fn missing_y_cell_is_invalid() {
		let adjacency = rows(&[&["A"]]);
		let positions = rows(&[&["7"]]);
		let err = build(&adjacency, &positions, CardinalityMode::SinglePass).unwrap_err();

		assert!(matches!(
			err,
			GraphError::InvalidPosition {
				row: 0,
				column: 1,
				..
			}
		));
	}

	#[test]
	fn coordinates_accept_padding_and_truncate_decimals() {
		let adjacency = rows(&[&["A"], &["B"]]);
		let positions = rows(&[&[" 12 ", "-3"], &["7.9", "+2.5"]]);
		let graph = build(&adjacency, &positions, CardinalityMode::SinglePass).unwrap();

		assert_eq!((graph.nodes[0].x, graph.nodes[0].y), (12.0, -3.0));
		assert_eq!((graph.nodes[1].x, graph.nodes[1].y), (7.0, 2.0));
	}

	#[test]
	fn markers_must_match_exactly() {
		let adjacency = rows(&[&["A", " 1", "1.0"], &["B", "", "1 "]]);
		let positions = rows(&[&["0", "0"], &["0", "0"]]);
		let graph = build(&adjacency, &positions, CardinalityMode::SinglePass).unwrap();

		assert!(graph.links.is_empty());
	}

	#[test]
	fn parse_rows_handles_ragged_rows_and_crlf() {
		let parsed = parse_rows("Hauptwache,0,1\r\nKonstablerwache,1\r\n\r\n").unwrap();
		assert_eq!(
			parsed,
			rows(&[&["Hauptwache", "0", "1"], &["Konstablerwache", "1"]])
		);
	}

	#[test]
	fn building_twice_is_structurally_identical() {
		let adjacency = "A,0,1,0\nB,1,0,1\nC,0,1,0\n";
		let positions = "0,0\n10,10\n20,5\n";
		let first = build_from_csv(adjacency, positions, CardinalityMode::SinglePass).unwrap();
		let second = build_from_csv(adjacency, positions, CardinalityMode::SinglePass).unwrap();

		assert_eq!(first, second);
	}

	#[test]
	fn incidence_lists_each_link_once_per_endpoint() {
		let graph = build_from_csv(
			"A,1,1,0\nB,1,0,0\nC,0,0,0\n",
			"0,0\n1,1\n2,2\n",
			CardinalityMode::SinglePass,
		)
		.unwrap();

		// Links: 0->0, 0->1, 1->0.
		assert_eq!(graph.incidence(), vec![vec![0, 1, 2], vec![1, 2], vec![]]);
	}
}
