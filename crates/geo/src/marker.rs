//! Map markers as they arrive from the places API.
//!
//! Native callers usually implement [`Located`] on their own types. This
//! module covers the JSON boundary instead: the web map (through the WASM
//! bindings) and the `spotfeed-map` CLI both exchange markers in this shape.

use crate::{Coordinate, GeoError, Located, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What a marker points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    /// A reviewed place
    #[default]
    Place,
    /// A user check-in at a place
    CheckIn,
}

/// A located map marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    /// Identifier assigned by the backend
    pub id: String,
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Place or check-in
    #[serde(default)]
    pub kind: MarkerKind,
    /// Opaque data the map layer wants carried through clustering
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub payload: Value,
}

impl Marker {
    /// Creates a place marker with no payload.
    pub fn new(id: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            id: id.into(),
            latitude,
            longitude,
            kind: MarkerKind::Place,
            payload: Value::Null,
        }
    }

    /// Sets the marker kind.
    #[must_use]
    pub fn with_kind(mut self, kind: MarkerKind) -> Self {
        self.kind = kind;
        self
    }

    /// Attaches an opaque payload.
    #[must_use]
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }

    /// Checks that the coordinates are within lat/lng ranges.
    pub fn validate(&self) -> Result<()> {
        let coord = Coordinate::new(self.latitude, self.longitude);
        if coord.is_valid() {
            Ok(())
        } else {
            Err(GeoError::InvalidCoordinate(format!(
                "marker {} at ({}, {})",
                self.id, self.latitude, self.longitude
            )))
        }
    }
}

impl Located for Marker {
    #[inline]
    fn latitude(&self) -> f64 {
        self.latitude
    }

    #[inline]
    fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Parses a JSON array of markers.
pub fn parse_markers(json: &str) -> Result<Vec<Marker>> {
    Ok(serde_json::from_str(json)?)
}
