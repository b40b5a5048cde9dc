use log::warn;

use super::config::{MapConfig, ZoomBounds};
use super::scene::Scene;

/// Seconds a background layer takes to fade fully in or out.
const FADE_SECONDS: f64 = 0.25;
const WHEEL_ZOOM_STEP: f64 = 1.1;

/// Screen = world * k + (x, y).
#[derive(Clone, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewTransform {
	pub fn screen_to_world(&self, sx: f64, sy: f64) -> (f64, f64) {
		((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	/// Scale by `factor` around the screen point `(sx, sy)`, keeping that
	/// point over the same world position.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64, bounds: ZoomBounds) {
		let new_k = bounds.clamp(self.k * factor);
		let ratio = new_k / self.k;
		self.x = sx - (sx - self.x) * ratio;
		self.y = sy - (sy - self.y) * ratio;
		self.k = new_k;
	}
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub node: Option<usize>,
	pub last_x: f64,
	pub last_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// A toggleable background image that fades between shown and hidden.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageLayer {
	pub visible: bool,
	pub opacity: f64,
}

impl ImageLayer {
	pub fn new(visible: bool) -> Self {
		Self {
			visible,
			opacity: if visible { 1.0 } else { 0.0 },
		}
	}

	pub fn set_visible(&mut self, visible: bool) {
		self.visible = visible;
	}

	pub fn is_drawn(&self) -> bool {
		self.opacity > 0.0
	}

	pub fn tick(&mut self, dt: f64) {
		let step = dt / FADE_SECONDS;
		self.opacity = if self.visible {
			(self.opacity + step).min(1.0)
		} else {
			(self.opacity - step).max(0.0)
		};
	}
}

/// Everything the event handlers and the renderer share.
pub struct MapState {
	pub scene: Option<Scene>,
	pub transform: ViewTransform,
	pub zoom: ZoomBounds,
	pub drag: DragState,
	pub pan: PanState,
	pub map_layer: ImageLayer,
	pub stations_layer: ImageLayer,
	pub width: f64,
	pub height: f64,
}

impl MapState {
	pub fn new(
		config: &MapConfig,
		width: f64,
		height: f64,
		show_map: bool,
		show_stations: bool,
	) -> Self {
		Self {
			scene: None,
			transform: ViewTransform::default(),
			zoom: config.zoom,
			drag: DragState::default(),
			pan: PanState::default(),
			map_layer: ImageLayer::new(show_map),
			stations_layer: ImageLayer::new(show_stations),
			width,
			height,
		}
	}

	/// Start dragging the station under the pointer, or panning if there is none.
	pub fn pointer_down(&mut self, sx: f64, sy: f64) {
		let (wx, wy) = self.transform.screen_to_world(sx, sy);
		let hit = self.scene.as_ref().and_then(|s| s.node_at(wx, wy));

		if let (Some(id), Some(scene)) = (hit, self.scene.as_mut()) {
			if let Err(e) = scene.begin_drag(id) {
				warn!("Cannot drag station {id}: {e}");
				return;
			}
			self.drag = DragState {
				node: Some(id),
				last_x: sx,
				last_y: sy,
			};
		} else {
			self.pan = PanState {
				active: true,
				start_x: sx,
				start_y: sy,
				transform_start_x: self.transform.x,
				transform_start_y: self.transform.y,
			};
		}
	}

	pub fn pointer_move(&mut self, sx: f64, sy: f64) {
		if let Some(id) = self.drag.node {
			let (dx, dy) = (
				(sx - self.drag.last_x) / self.transform.k,
				(sy - self.drag.last_y) / self.transform.k,
			);
			self.drag.last_x = sx;
			self.drag.last_y = sy;
			if let Some(scene) = self.scene.as_mut() {
				if let Err(e) = scene.drag(id, dx, dy) {
					warn!("Drag step dropped: {e}");
				}
			}
		} else if self.pan.active {
			self.transform.x = self.pan.transform_start_x + (sx - self.pan.start_x);
			self.transform.y = self.pan.transform_start_y + (sy - self.pan.start_y);
		}
	}

	/// Ends whatever gesture is in progress.
	pub fn pointer_up(&mut self) {
		if let Some(id) = self.drag.node.take() {
			if let Some(scene) = self.scene.as_mut() {
				if let Err(e) = scene.end_drag(id) {
					warn!("Drag end dropped: {e}");
				}
			}
		}
		self.pan.active = false;
	}

	pub fn wheel(&mut self, sx: f64, sy: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 {
			1.0 / WHEEL_ZOOM_STEP
		} else {
			WHEEL_ZOOM_STEP
		};
		self.transform.zoom_at(sx, sy, factor, self.zoom);
	}

	pub fn tick(&mut self, dt: f64) {
		self.map_layer.tick(dt);
		self.stations_layer.tick(dt);
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}
