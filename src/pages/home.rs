use leptos::prelude::*;

use crate::components::transit_map::{MapConfig, TransitMapCanvas};

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let (show_map, set_show_map) = signal(true);
	let (show_stations, set_show_stations) = signal(false);
	let config = MapConfig::from_location();

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-map">
				<TransitMapCanvas show_map=show_map show_stations=show_stations config=config.clone() />
				<div class="map-overlay">
					<button id="map" on:click=move |_| set_show_map.update(|v| *v = !*v)>
						"Map"
					</button>
					<button id="stations" on:click=move |_| set_show_stations.update(|v| *v = !*v)>
						"Stations"
					</button>
					<p class="subtitle">"Drag stations to reposition. Scroll to zoom. Drag background to pan."</p>
				</div>
			</div>
		</ErrorBoundary>
	}
}
