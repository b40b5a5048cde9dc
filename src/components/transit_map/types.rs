/// Amount added to a node's cardinality for each incident link.
pub const CARDINALITY_STEP: u32 = 3;

/// A station. `id` is its row in the adjacency table and its index in
/// [`TransitGraph::nodes`].
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	pub id: usize,
	pub name: String,
	pub x: f64,
	pub y: f64,
	pub cardinality: u32,
}

/// A connection between two stations, stored as node ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Link {
	pub source: usize,
	pub target: usize,
}

/// How link discovery feeds node cardinality.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CardinalityMode {
	/// Row-order construction: a target is only bumped when its row has
	/// already been scanned (`target <= source`).
	#[default]
	SinglePass,
	/// Both endpoints are bumped for every link.
	TwoPass,
}

impl CardinalityMode {
	/// Accepts `single-pass` or `two-pass`.
	pub fn parse(value: &str) -> Option<Self> {
		match value.trim() {
			"single-pass" => Some(Self::SinglePass),
			"two-pass" => Some(Self::TwoPass),
			_ => None,
		}
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransitGraph {
	pub nodes: Vec<Node>,
	pub links: Vec<Link>,
	/// Links whose target had no node; kept out of `links`.
	pub dropped_links: Vec<Link>,
}

impl TransitGraph {
	pub fn node(&self, id: usize) -> Option<&Node> {
		self.nodes.get(id)
	}

	pub fn node_mut(&mut self, id: usize) -> Option<&mut Node> {
		self.nodes.get_mut(id)
	}

	/// Index of every link incident to each node, by node id.
	pub fn incidence(&self) -> Vec<Vec<usize>> {
		let mut incident = vec![Vec::new(); self.nodes.len()];
		for (i, link) in self.links.iter().enumerate() {
			if let Some(list) = incident.get_mut(link.source) {
				list.push(i);
			}
			if link.target != link.source {
				if let Some(list) = incident.get_mut(link.target) {
					list.push(i);
				}
			}
		}
		incident
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn cardinality_mode_parses_query_values() {
		assert_eq!(CardinalityMode::parse("two-pass"), Some(CardinalityMode::TwoPass));
		assert_eq!(
			CardinalityMode::parse(" single-pass "),
			Some(CardinalityMode::SinglePass)
		);
		assert_eq!(CardinalityMode::parse("TwoPass"), None);
		assert_eq!(CardinalityMode::parse(""), None);
	}
}
