use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use super::config::{ImageConfig, MapConfig};
use super::scene::{LinkLine, Scene};
use super::state::{ImageLayer, MapState};

const BACKDROP: &str = "#f4f4f0";
const LINK_COLOR: &str = "rgba(40, 40, 40, 0.85)";
const LINK_DRAGGING_COLOR: &str = "rgba(226, 0, 26, 0.85)";
const NODE_COLOR: &str = "#0065ae";
const NODE_DRAGGING_COLOR: &str = "#e2001a";
const GLYPH_TEXT_COLOR: &str = "white";
const NAME_COLOR: &str = "#1a1a1a";
const NODE_CORNER_RADIUS: f64 = 2.0;
/// Stations at or above this cardinality get a bold name label.
const INTERCHANGE_CARDINALITY: u32 = 9;
const ARROW_LENGTH: f64 = 6.0;
// Marker reference point lies 15 units along a 10-unit arrow scaled to 6px.
const ARROW_TIP_BACKOFF: f64 = 3.0;

/// The two background images, created once and drawn once they decode.
pub struct Backgrounds {
	map: HtmlImageElement,
	stations: HtmlImageElement,
}

impl Backgrounds {
	pub fn load(config: &MapConfig) -> Result<Self, JsValue> {
		let map = HtmlImageElement::new()?;
		map.set_src(&config.map_image.src);
		let stations = HtmlImageElement::new()?;
		stations.set_src(&config.stations_image.src);
		Ok(Self { map, stations })
	}
}

pub fn render(
	state: &MapState,
	ctx: &CanvasRenderingContext2d,
	backgrounds: Option<&Backgrounds>,
	config: &MapConfig,
) {
	ctx.set_fill_style_str(BACKDROP);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);

	if let Some(bg) = backgrounds {
		draw_layer(ctx, &bg.map, &state.map_layer, &config.map_image);
		draw_layer(ctx, &bg.stations, &state.stations_layer, &config.stations_image);
	}
	if let Some(scene) = &state.scene {
		draw_links(scene, ctx);
		draw_nodes(scene, ctx, &config.glyph_text);
	}
	ctx.restore();
}

fn draw_layer(
	ctx: &CanvasRenderingContext2d,
	image: &HtmlImageElement,
	layer: &ImageLayer,
	config: &ImageConfig,
) {
	if !layer.is_drawn() || !image.complete() || image.natural_width() == 0 {
		return;
	}
	ctx.set_global_alpha(layer.opacity);
	let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
		image,
		0.0,
		0.0,
		config.width,
		config.height,
	);
	ctx.set_global_alpha(1.0);
}

fn draw_links(scene: &Scene, ctx: &CanvasRenderingContext2d) {
	ctx.set_line_width(1.0);

	for (link, line) in scene.links().iter().zip(scene.lines()) {
		let color = if scene.is_dragging(link.source) || scene.is_dragging(link.target) {
			LINK_DRAGGING_COLOR
		} else {
			LINK_COLOR
		};
		ctx.set_stroke_style_str(color);
		ctx.set_fill_style_str(color);
		ctx.begin_path();
		ctx.move_to(line.x1, line.y1);
		ctx.line_to(line.x2, line.y2);
		ctx.stroke();
		draw_arrowhead(ctx, line);
	}
}

fn draw_arrowhead(ctx: &CanvasRenderingContext2d, line: &LinkLine) {
	let (dx, dy) = (line.x2 - line.x1, line.y2 - line.y1);
	let dist = (dx * dx + dy * dy).sqrt();
	if dist < 0.001 {
		return;
	}
	let (ux, uy) = (dx / dist, dy / dist);
	let (tip_x, tip_y) = (line.x2 - ux * ARROW_TIP_BACKOFF, line.y2 - uy * ARROW_TIP_BACKOFF);
	let (back_x, back_y) = (tip_x - ux * ARROW_LENGTH, tip_y - uy * ARROW_LENGTH);
	let (px, py) = (-uy * ARROW_LENGTH * 0.5, ux * ARROW_LENGTH * 0.5);

	ctx.begin_path();
	ctx.move_to(tip_x, tip_y);
	ctx.line_to(back_x + px, back_y + py);
	ctx.line_to(back_x - px, back_y - py);
	ctx.close_path();
	ctx.fill();
}

fn draw_nodes(scene: &Scene, ctx: &CanvasRenderingContext2d, glyph_text: &str) {
	let size = scene.node_size();
	let glyph_font = format!("bold {}px sans-serif", size);

	for node in scene.nodes() {
		let id = node.id;
		let Some(glyph) = scene.glyph(id) else {
			continue;
		};

		let color = if scene.is_dragging(id) {
			NODE_DRAGGING_COLOR
		} else {
			NODE_COLOR
		};
		rounded_square(ctx, glyph.x, glyph.y, size, NODE_CORNER_RADIUS);
		ctx.set_fill_style_str(color);
		ctx.fill();

		if let Some(label) = scene.glyph_label(id) {
			ctx.set_fill_style_str(GLYPH_TEXT_COLOR);
			ctx.set_font(&glyph_font);
			let _ = ctx.fill_text(glyph_text, label.dx, label.dy);
		}
		if let Some(label) = scene.name_label(id) {
			ctx.set_fill_style_str(NAME_COLOR);
			ctx.set_font(if node.cardinality >= INTERCHANGE_CARDINALITY {
				"bold 12px sans-serif"
			} else {
				"12px sans-serif"
			});
			let _ = ctx.fill_text(&node.name, label.dx, label.dy);
		}
	}
}

fn rounded_square(ctx: &CanvasRenderingContext2d, x: f64, y: f64, size: f64, r: f64) {
	let (right, bottom) = (x + size, y + size);
	ctx.begin_path();
	ctx.move_to(x + r, y);
	let _ = ctx.arc_to(right, y, right, bottom, r);
	let _ = ctx.arc_to(right, bottom, x, bottom, r);
	let _ = ctx.arc_to(x, bottom, x, y, r);
	let _ = ctx.arc_to(x, y, right, y, r);
	ctx.close_path();
}
