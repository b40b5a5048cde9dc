use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{error, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::config::MapConfig;
use super::loader::{fetch_text, load_graph};
use super::render::{self, Backgrounds};
use super::scene::Scene;
use super::state::MapState;

/// Longest frame step fed to layer fades, in seconds.
const MAX_FRAME_DT: f64 = 0.1;

fn window_size(window: &Window) -> (f64, f64) {
	let w = window
		.inner_width()
		.ok()
		.and_then(|v| v.as_f64())
		.unwrap_or(800.0);
	let h = window
		.inner_height()
		.ok()
		.and_then(|v| v.as_f64())
		.unwrap_or(600.0);
	(w, h)
}

fn pointer_position(
	canvas_ref: NodeRef<leptos::html::Canvas>,
	ev: &MouseEvent,
) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

#[component]
pub fn TransitMapCanvas(
	#[prop(into)] show_map: Signal<bool>,
	#[prop(into)] show_stations: Signal<bool>,
	#[prop(optional)] config: MapConfig,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<MapState>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (state_init, animate_init, resize_cb_init) =
		(state.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if state_init.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			error!("No window; transit map not mounted");
			return;
		};

		let (w, h) = window_size(&window);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = match canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into().ok())
		{
			Some(ctx) => ctx,
			None => {
				error!("Canvas 2d context unavailable");
				return;
			}
		};
		*state_init.borrow_mut() = Some(MapState::new(
			&config,
			w,
			h,
			show_map.get_untracked(),
			show_stations.get_untracked(),
		));

		let (state_load, config_load) = (state_init.clone(), config.clone());
		wasm_bindgen_futures::spawn_local(async move {
			match load_graph(&config_load, fetch_text).await {
				Ok(graph) => {
					let scene = Scene::new(graph, config_load.node_size);
					if let Some(ref mut s) = *state_load.borrow_mut() {
						s.scene = Some(scene);
					}
					info!("Transit map ready");
				}
				Err(e) => error!("Transit map not rendered: {e}"),
			}
		});

		let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let Some(win) = web_sys::window() else {
				return;
			};
			let (nw, nh) = window_size(&win);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(ref mut s) = *state_resize.borrow_mut() {
				s.resize(nw, nh);
			}
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let backgrounds = match Backgrounds::load(&config) {
			Ok(bg) => Some(bg),
			Err(e) => {
				warn!("Background images unavailable: {:?}", e);
				None
			}
		};
		let (state_anim, animate_inner, config_anim) =
			(state_init.clone(), animate_init.clone(), config.clone());
		let mut last_frame = js_sys::Date::now();
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			let now = js_sys::Date::now();
			let dt = ((now - last_frame) / 1000.0).clamp(0.0, MAX_FRAME_DT);
			last_frame = now;
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.tick(dt);
				render::render(s, &ctx, backgrounds.as_ref(), &config_anim);
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				if let Some(win) = web_sys::window() {
					let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
				}
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let state_toggle = state.clone();
	Effect::new(move |_| {
		let (map, stations) = (show_map.get(), show_stations.get());
		if let Some(ref mut s) = *state_toggle.borrow_mut() {
			s.map_layer.set_visible(map);
			s.stations_layer.set_visible(stations);
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.pointer_down(x, y);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			s.pointer_move(x, y);
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			s.pointer_up();
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.pointer_up();
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			s.wheel(x, y, ev.delta_y());
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="transit-map-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
