//! The visible map region.

use crate::{Coordinate, GeoError, Result};
use serde::{Deserialize, Serialize};

/// Angular extent of a viewport, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Span {
    /// Visible height in degrees of latitude
    pub latitude_delta: f64,
    /// Visible width in degrees of longitude
    pub longitude_delta: f64,
}

impl Span {
    /// Creates a new span.
    #[inline]
    pub const fn new(latitude_delta: f64, longitude_delta: f64) -> Self {
        Self {
            latitude_delta,
            longitude_delta,
        }
    }
}

/// A center coordinate plus a span.
///
/// Serializes flat, in the same shape map SDKs use for a region:
/// `{"latitude", "longitude", "latitudeDelta", "longitudeDelta"}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Center of the visible region
    #[serde(flatten)]
    pub center: Coordinate,
    /// Visible extent
    #[serde(flatten)]
    pub span: Span,
}

impl Viewport {
    /// Creates a viewport from a center and a span.
    #[inline]
    pub const fn new(latitude: f64, longitude: f64, latitude_delta: f64, longitude_delta: f64) -> Self {
        Self {
            center: Coordinate::new(latitude, longitude),
            span: Span::new(latitude_delta, longitude_delta),
        }
    }

    /// Checks the span invariant: both deltas finite and non-negative.
    ///
    /// A zero span passes; clustering treats it as degenerate.
    pub fn validate(&self) -> Result<()> {
        let Span {
            latitude_delta,
            longitude_delta,
        } = self.span;

        if !latitude_delta.is_finite() || !longitude_delta.is_finite() {
            return Err(GeoError::InvalidViewport(format!(
                "span must be finite, got {latitude_delta} x {longitude_delta}"
            )));
        }
        if latitude_delta < 0.0 || longitude_delta < 0.0 {
            return Err(GeoError::InvalidViewport(format!(
                "span must not be negative, got {latitude_delta} x {longitude_delta}"
            )));
        }
        Ok(())
    }

    /// True when the span cannot produce a usable grid: either delta is
    /// zero, negative, or not finite.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        !(self.span.latitude_delta.is_finite()
            && self.span.longitude_delta.is_finite()
            && self.span.latitude_delta > 0.0
            && self.span.longitude_delta > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_json_shape() {
        let viewport: Viewport = serde_json::from_str(
            r#"{"latitude": 52.52, "longitude": 13.405, "latitudeDelta": 0.05, "longitudeDelta": 0.08}"#,
        )
        .unwrap();

        assert_eq!(viewport, Viewport::new(52.52, 13.405, 0.05, 0.08));

        let json = serde_json::to_value(viewport).unwrap();
        assert_eq!(json["latitudeDelta"], 0.05);
        assert_eq!(json["longitude"], 13.405);
    }

    #[test]
    fn test_validate() {
        assert!(Viewport::new(0.0, 0.0, 0.1, 0.1).validate().is_ok());
        assert!(Viewport::new(0.0, 0.0, 0.0, 0.0).validate().is_ok());
        assert!(Viewport::new(0.0, 0.0, -0.1, 0.1).validate().is_err());
        assert!(Viewport::new(0.0, 0.0, 0.1, f64::INFINITY).validate().is_err());
        assert!(Viewport::new(0.0, 0.0, f64::NAN, 0.1).validate().is_err());
    }

    #[test]
    fn test_degenerate() {
        assert!(!Viewport::new(0.0, 0.0, 0.1, 0.1).is_degenerate());
        assert!(Viewport::new(0.0, 0.0, 0.0, 0.1).is_degenerate());
        assert!(Viewport::new(0.0, 0.0, 0.1, 0.0).is_degenerate());
        assert!(Viewport::new(0.0, 0.0, -1.0, 0.1).is_degenerate());
        assert!(Viewport::new(0.0, 0.0, f64::NAN, 0.1).is_degenerate());
    }
}
