use std::future::Future;

use log::info;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use super::builder::build_from_csv;
use super::config::MapConfig;
use super::error::GraphError;
use super::types::TransitGraph;

/// Fetch the adjacency table, then the position table, then build.
///
/// The position table is only requested once the adjacency table has
/// arrived, and nothing is built unless both succeed.
pub async fn load_graph<F, Fut>(config: &MapConfig, mut fetch: F) -> Result<TransitGraph, GraphError>
where
	F: FnMut(String) -> Fut,
	Fut: Future<Output = Result<String, GraphError>>,
{
	let adjacency = fetch(config.adjacency_url.clone()).await?;
	info!("Loaded adjacency table ({} bytes)", adjacency.len());
	let positions = fetch(config.positions_url.clone()).await?;
	info!("Loaded position table ({} bytes)", positions.len());
	build_from_csv(&adjacency, &positions, config.cardinality)
}

/// GET `url` with the browser's fetch and return the body as text.
pub async fn fetch_text(url: String) -> Result<String, GraphError> {
	let fail = |reason: String| GraphError::FetchFailure {
		url: url.clone(),
		reason,
	};
	let window = web_sys::window().ok_or_else(|| fail("window not available".into()))?;
	let response_value = JsFuture::from(window.fetch_with_str(&url))
		.await
		.map_err(|e| fail(format!("fetch failed: {:?}", e)))?;

	let response: web_sys::Response = response_value
		.dyn_into()
		.map_err(|_| fail("failed to cast fetch response".into()))?;

	if !response.ok() {
		return Err(fail(format!("HTTP {}", response.status())));
	}

	let text_promise = response
		.text()
		.map_err(|e| fail(format!("response.text() failed: {:?}", e)))?;
	let text_value = JsFuture::from(text_promise)
		.await
		.map_err(|e| fail(format!("await response text failed: {:?}", e)))?;
	text_value
		.as_string()
		.ok_or_else(|| fail("response text was not a string".into()))
}
