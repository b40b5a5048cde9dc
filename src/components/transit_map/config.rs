use log::{info, warn};

use super::types::CardinalityMode;

/// Edge length of a station glyph, in world pixels.
pub const NODE_SIZE: f64 = 18.0;

/// Side length of both background images.
pub const BACKGROUND_SIZE: f64 = 2477.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomBounds {
	pub min: f64,
	pub max: f64,
}

impl ZoomBounds {
	pub fn clamp(&self, k: f64) -> f64 {
		k.clamp(self.min, self.max)
	}
}

impl Default for ZoomBounds {
	fn default() -> Self {
		Self {
			min: 0.15,
			max: 5.0,
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct ImageConfig {
	pub src: String,
	pub width: f64,
	pub height: f64,
}

impl ImageConfig {
	fn square(src: &str) -> Self {
		Self {
			src: src.into(),
			width: BACKGROUND_SIZE,
			height: BACKGROUND_SIZE,
		}
	}
}

/// Fixed inputs and layout constants for one map.
#[derive(Clone, Debug, PartialEq)]
pub struct MapConfig {
	pub adjacency_url: String,
	pub positions_url: String,
	pub node_size: f64,
	pub zoom: ZoomBounds,
	pub map_image: ImageConfig,
	pub stations_image: ImageConfig,
	/// Text drawn inside every station glyph.
	pub glyph_text: String,
	pub cardinality: CardinalityMode,
}

impl Default for MapConfig {
	fn default() -> Self {
		Self {
			adjacency_url: "resources/data/subway.csv".into(),
			positions_url: "resources/data/positions.csv".into(),
			node_size: NODE_SIZE,
			zoom: ZoomBounds::default(),
			map_image: ImageConfig::square("./resources/img/ffm_map.png"),
			stations_image: ImageConfig::square("./resources/img/stations_raw.png"),
			glyph_text: "U".into(),
			cardinality: CardinalityMode::default(),
		}
	}
}

impl MapConfig {
	/// Defaults, with the cardinality mode taken from `?cardinality=...`
	/// when the page URL carries one.
	pub fn from_location() -> Self {
		let mut config = Self::default();
		let Some(value) = query_param("cardinality") else {
			return config;
		};
		match CardinalityMode::parse(&value) {
			Some(mode) => {
				info!("Cardinality mode from URL: {:?}", mode);
				config.cardinality = mode;
			}
			None => warn!("Unknown cardinality mode {:?}; using {:?}", value, config.cardinality),
		}
		config
	}
}

fn query_param(name: &str) -> Option<String> {
	let window = web_sys::window()?;
	let search = window.location().search().ok()?;
	let params = web_sys::UrlSearchParams::new_with_str(&search).ok()?;
	let value = params.get(name)?;
	if value.trim().is_empty() {
		None
	} else {
		Some(value)
	}
}
