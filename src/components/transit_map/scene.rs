//! Visual state derived from node positions, and the drag updates that
//! keep it in step with the graph.

use log::debug;

use super::error::GraphError;
use super::types::{Link, Node, TransitGraph};

/// Top-left corner of a square station glyph.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GlyphAnchor {
	pub x: f64,
	pub y: f64,
}

/// Text baseline origin.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LabelAnchor {
	pub dx: f64,
	pub dy: f64,
}

/// Endpoints of a drawn link: `(x1, y1)` at the source, `(x2, y2)` at the target.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LinkLine {
	pub x1: f64,
	pub y1: f64,
	pub x2: f64,
	pub y2: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DragPhase {
	#[default]
	Idle,
	Dragging,
}

/// Graph plus everything drawn from it. All per-node vectors are indexed
/// by node id, `lines` by link index.
#[derive(Clone, Debug)]
pub struct Scene {
	graph: TransitGraph,
	node_size: f64,
	glyphs: Vec<GlyphAnchor>,
	glyph_labels: Vec<LabelAnchor>,
	name_labels: Vec<LabelAnchor>,
	lines: Vec<LinkLine>,
	incident: Vec<Vec<usize>>,
	phases: Vec<DragPhase>,
}

impl Scene {
	pub fn new(graph: TransitGraph, node_size: f64) -> Self {
		let glyphs = graph
			.nodes
			.iter()
			.map(|n| glyph_anchor(n, node_size))
			.collect();
		let glyph_labels = graph
			.nodes
			.iter()
			.map(|n| glyph_label_anchor(n, node_size))
			.collect();
		let name_labels = graph
			.nodes
			.iter()
			.map(|n| name_label_anchor(n, node_size))
			.collect();
		// Out-of-range endpoints start at the origin.
		let lines = graph
			.links
			.iter()
			.map(|link| {
				let (x1, y1) = graph.node(link.source).map_or((0.0, 0.0), |n| (n.x, n.y));
				let (x2, y2) = graph.node(link.target).map_or((0.0, 0.0), |n| (n.x, n.y));
				LinkLine { x1, y1, x2, y2 }
			})
			.collect();
		let incident = graph.incidence();
		let phases = vec![DragPhase::Idle; graph.nodes.len()];

		Self {
			graph,
			node_size,
			glyphs,
			glyph_labels,
			name_labels,
			lines,
			incident,
			phases,
		}
	}

	pub fn nodes(&self) -> &[Node] {
		&self.graph.nodes
	}

	pub fn links(&self) -> &[Link] {
		&self.graph.links
	}

	pub fn node_size(&self) -> f64 {
		self.node_size
	}

	pub fn glyph(&self, id: usize) -> Option<GlyphAnchor> {
		self.glyphs.get(id).copied()
	}

	pub fn glyph_label(&self, id: usize) -> Option<LabelAnchor> {
		self.glyph_labels.get(id).copied()
	}

	pub fn name_label(&self, id: usize) -> Option<LabelAnchor> {
		self.name_labels.get(id).copied()
	}

	pub fn lines(&self) -> &[LinkLine] {
		&self.lines
	}

	pub fn phase(&self, id: usize) -> DragPhase {
		self.phases.get(id).copied().unwrap_or_default()
	}

	pub fn is_dragging(&self, id: usize) -> bool {
		self.phase(id) == DragPhase::Dragging
	}

	/// Move a node by `(dx, dy)` and re-derive its glyph, labels and the
	/// endpoints of every incident link.
	pub fn on_node_moved(&mut self, id: usize, dx: f64, dy: f64) -> Result<(), GraphError> {
		let size = self.node_size;
		let node = self
			.graph
			.node_mut(id)
			.ok_or(GraphError::UnknownNode { id })?;
		node.x += dx;
		node.y += dy;
		let (x, y) = (node.x, node.y);

		self.glyphs[id] = glyph_anchor(node, size);
		self.glyph_labels[id] = glyph_label_anchor(node, size);
		self.name_labels[id] = name_label_anchor(node, size);

		for &i in &self.incident[id] {
			let link = self.graph.links[i];
			let line = &mut self.lines[i];
			if link.source == id {
				line.x1 = x;
				line.y1 = y;
			}
			if link.target == id {
				line.x2 = x;
				line.y2 = y;
			}
		}
		Ok(())
	}

	pub fn begin_drag(&mut self, id: usize) -> Result<(), GraphError> {
		let phase = self
			.phases
			.get_mut(id)
			.ok_or(GraphError::UnknownNode { id })?;
		*phase = DragPhase::Dragging;
		debug!("Drag started on station {id}");
		Ok(())
	}

	/// One drag step. Steps for a node that is not being dragged are ignored.
	pub fn drag(&mut self, id: usize, dx: f64, dy: f64) -> Result<(), GraphError> {
		match self.phases.get(id) {
			Some(DragPhase::Dragging) => self.on_node_moved(id, dx, dy),
			Some(DragPhase::Idle) => Ok(()),
			None => Err(GraphError::UnknownNode { id }),
		}
	}

	pub fn end_drag(&mut self, id: usize) -> Result<(), GraphError> {
		let phase = self
			.phases
			.get_mut(id)
			.ok_or(GraphError::UnknownNode { id })?;
		if *phase == DragPhase::Dragging {
			if let Some(node) = self.graph.node(id) {
				debug!("Drag ended on {} at ({}, {})", node.name, node.x, node.y);
			}
		}
		*phase = DragPhase::Idle;
		Ok(())
	}

	/// Topmost station whose glyph contains the world point.
	pub fn node_at(&self, x: f64, y: f64) -> Option<usize> {
		let half = self.node_size / 2.0;
		self.graph
			.nodes
			.iter()
			.rev()
			.find(|n| (n.x - x).abs() <= half && (n.y - y).abs() <= half)
			.map(|n| n.id)
	}
}

fn glyph_anchor(node: &Node, size: f64) -> GlyphAnchor {
	GlyphAnchor {
		x: node.x - size / 2.0,
		y: node.y - size / 2.0,
	}
}

fn glyph_label_anchor(node: &Node, size: f64) -> LabelAnchor {
	LabelAnchor {
		dx: node.x - size / 3.0,
		dy: node.y + size / 3.0,
	}
}

fn name_label_anchor(node: &Node, size: f64) -> LabelAnchor {
	LabelAnchor {
		dx: node.x + size / 2.0 + 1.0,
		dy: node.y + size / 3.0,
	}
}
