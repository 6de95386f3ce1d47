//! WASM bindings for the geo crate.
//!
//! The web map calls these with its current region and marker list and gets
//! a JSON [`ClusterResult`](crate::ClusterResult) back.

use crate::{parse_markers, GridClusterer, Viewport};
use wasm_bindgen::prelude::*;

/// Cluster markers for a map region with the default grid divisor.
///
/// # Arguments
/// * `viewport_json` - Region as `{"latitude", "longitude", "latitudeDelta", "longitudeDelta"}`
/// * `markers_json` - JSON array of markers
///
/// # Returns
/// JSON string with `clustered` and `solo` arrays
#[wasm_bindgen]
pub fn cluster_markers(viewport_json: &str, markers_json: &str) -> Result<String, JsValue> {
    run(GridClusterer::default(), viewport_json, markers_json)
}

/// Cluster markers with a custom grid divisor.
#[wasm_bindgen]
pub fn cluster_markers_with_divisor(
    viewport_json: &str,
    markers_json: &str,
    divisor: f64,
) -> Result<String, JsValue> {
    let clusterer = GridClusterer::with_divisor(divisor).map_err(|e| JsValue::from_str(&e.to_string()))?;
    run(clusterer, viewport_json, markers_json)
}

fn run(clusterer: GridClusterer, viewport_json: &str, markers_json: &str) -> Result<String, JsValue> {
    let viewport: Viewport = serde_json::from_str(viewport_json)
        .map_err(|e| JsValue::from_str(&format!("Viewport parse error: {}", e)))?;

    let markers = parse_markers(markers_json).map_err(|e| JsValue::from_str(&e.to_string()))?;

    let result = clusterer.cluster(&viewport, markers);

    serde_json::to_string(&result)
        .map_err(|e| JsValue::from_str(&format!("JSON serialize error: {}", e)))
}
