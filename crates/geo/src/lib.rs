//! Viewport grid clustering for spotfeed map markers.
//!
//! This crate provides:
//! - The [`Located`] capability for anything with a latitude and longitude
//! - Viewport-relative grid clustering of markers ([`GridClusterer`])
//! - A serde [`Marker`] type for markers crossing a JSON boundary
//! - Haversine distance helpers used to size cluster pins
//! - WASM bindings for the web map
//!
//! # Example
//!
//! ```
//! use spotfeed_geo::{cluster, Coordinate, Viewport};
//!
//! let viewport = Viewport::new(0.0, 0.0, 0.02, 0.02);
//! let items = vec![
//!     Coordinate::new(0.001, 0.001),
//!     Coordinate::new(0.001, 0.002),
//!     Coordinate::new(5.0, 5.0),
//! ];
//!
//! let result = cluster(&viewport, items);
//! assert_eq!(result.clustered.len(), 1);
//! assert_eq!(result.clustered[0].count, 2);
//! assert_eq!(result.solo, vec![Coordinate::new(5.0, 5.0)]);
//! ```

mod error;
mod haversine;
mod viewport;
pub mod cluster;
pub mod marker;

#[cfg(feature = "wasm")]
mod wasm;

pub use cluster::{cluster, CellKey, ClusterGroup, ClusterResult, GridClusterer, DEFAULT_GRID_DIVISOR};
pub use error::{GeoError, GeoErrorCode, Result};
pub use haversine::haversine_distance;
pub use marker::{parse_markers, Marker, MarkerKind};
pub use viewport::{Span, Viewport};

/// A geographic coordinate with latitude and longitude.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees (-90 to 90)
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180)
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a new coordinate.
    #[inline]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Returns true if the coordinate is within the valid lat/lng ranges.
    #[inline]
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Returns true if both components are finite numbers.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }

    #[inline]
    pub(crate) fn to_radians(self) -> (f64, f64) {
        (self.latitude.to_radians(), self.longitude.to_radians())
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}

/// Anything that can be placed on the map.
///
/// The clustering engine only ever reads these two values; the rest of the
/// item is carried through untouched.
pub trait Located {
    /// Latitude in degrees.
    fn latitude(&self) -> f64;

    /// Longitude in degrees.
    fn longitude(&self) -> f64;

    /// Both components as a [`Coordinate`].
    #[inline]
    fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude(), self.longitude())
    }
}

impl Located for Coordinate {
    #[inline]
    fn latitude(&self) -> f64 {
        self.latitude
    }

    #[inline]
    fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl<T: Located + ?Sized> Located for &T {
    #[inline]
    fn latitude(&self) -> f64 {
        (**self).latitude()
    }

    #[inline]
    fn longitude(&self) -> f64 {
        (**self).longitude()
    }
}
