//! Viewport grid clustering.
//!
//! The visible region is cut into a grid whose cell size is the viewport span
//! divided by a fixed divisor. Every cell holding two or more markers becomes
//! one [`ClusterGroup`] pinned at the members' centroid; markers alone in
//! their cell are returned untouched as solo markers.
//!
//! Bucketing truncates toward zero, so the cells on either side of the
//! equator and the prime meridian merge into one cell twice the usual width.
//! There is no wrap-around at the antimeridian or the poles: markers at
//! -179.9° and 179.9° never share a cell.

use crate::{haversine_distance, Coordinate, Located, Result, Span, Viewport, GeoError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Default number of grid cells across each viewport axis.
pub const DEFAULT_GRID_DIVISOR: f64 = 5.0;

/// Grid cell identifier derived from a coordinate and the cell size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellKey {
    /// Latitude bucket (truncated quotient)
    pub lat_bucket: i64,
    /// Longitude bucket (truncated quotient)
    pub lon_bucket: i64,
}

impl CellKey {
    /// Buckets a coordinate for the given cell size.
    ///
    /// Returns `None` when the coordinate is not finite.
    #[inline]
    pub fn for_coordinate(coord: Coordinate, cell: Span) -> Option<Self> {
        if !coord.is_finite() {
            return None;
        }
        // `as` truncates toward zero and saturates at the i64 bounds.
        Some(Self {
            lat_bucket: (coord.latitude / cell.latitude_delta) as i64,
            lon_bucket: (coord.longitude / cell.longitude_delta) as i64,
        })
    }

    /// Stable id used for cluster groups built from this cell.
    pub fn cluster_id(&self) -> String {
        format!("cluster:{}:{}", self.lat_bucket, self.lon_bucket)
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lat_bucket, self.lon_bucket)
    }
}

/// Two or more markers that share a grid cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterGroup<T> {
    /// Derived from the cell key; stable for the same viewport and items
    pub id: String,
    /// Arithmetic mean of the member coordinates
    pub coordinate: Coordinate,
    /// Number of members, always equal to `content.len()`
    pub count: usize,
    /// Original members in first-encounter order
    pub content: Vec<T>,
}

impl<T: Located> ClusterGroup<T> {
    fn from_cell(key: CellKey, content: Vec<T>) -> Self {
        let count = content.len();
        let (lat_sum, lon_sum) = content.iter().fold((0.0, 0.0), |(lat, lon), item| {
            (lat + item.latitude(), lon + item.longitude())
        });
        let n = count as f64;

        Self {
            id: key.cluster_id(),
            coordinate: Coordinate::new(lat_sum / n, lon_sum / n),
            count,
            content,
        }
    }

    /// Great-circle distance in kilometers from the centroid to the farthest
    /// member. Useful for sizing the cluster pin.
    pub fn radius_km(&self) -> f64 {
        self.content
            .iter()
            .map(|item| haversine_distance(&self.coordinate, &item.coordinate()))
            .fold(0.0, f64::max)
    }
}

/// Partition of a marker set into clusters and solo markers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterResult<T> {
    /// One group per cell with two or more markers
    pub clustered: Vec<ClusterGroup<T>>,
    /// Markers alone in their cell, in input order
    pub solo: Vec<T>,
}

impl<T> Default for ClusterResult<T> {
    fn default() -> Self {
        Self {
            clustered: Vec::new(),
            solo: Vec::new(),
        }
    }
}

impl<T> ClusterResult<T> {
    /// Total number of input markers represented in this result.
    pub fn len(&self) -> usize {
        self.solo.len() + self.clustered.iter().map(|g| g.count).sum::<usize>()
    }

    /// True when the result holds no markers at all.
    pub fn is_empty(&self) -> bool {
        self.solo.is_empty() && self.clustered.is_empty()
    }

    /// Number of pins a map would draw: one per cluster plus one per solo marker.
    pub fn pin_count(&self) -> usize {
        self.clustered.len() + self.solo.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Bucket {
    Cell(CellKey),
    // Markers with non-finite coordinates get a bucket of their own.
    Unplaced(usize),
}

/// Grid clustering engine.
///
/// Holds only the divisor, so one instance can be shared freely across
/// threads and reused for every camera change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridClusterer {
    divisor: f64,
}

impl Default for GridClusterer {
    fn default() -> Self {
        Self {
            divisor: DEFAULT_GRID_DIVISOR,
        }
    }
}

impl GridClusterer {
    /// Creates a clusterer with the default divisor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a clusterer with a custom divisor. Larger divisors give a
    /// finer grid and therefore fewer, smaller clusters.
    pub fn with_divisor(divisor: f64) -> Result<Self> {
        if !divisor.is_finite() || divisor <= 0.0 {
            return Err(GeoError::InvalidDivisor(divisor));
        }
        Ok(Self { divisor })
    }

    /// The grid divisor in use.
    #[inline]
    pub fn divisor(&self) -> f64 {
        self.divisor
    }

    /// Cell size for a viewport, or `None` if the viewport is degenerate.
    pub fn cell_size(&self, viewport: &Viewport) -> Option<Span> {
        if viewport.is_degenerate() {
            return None;
        }
        let cell = Span::new(
            viewport.span.latitude_delta / self.divisor,
            viewport.span.longitude_delta / self.divisor,
        );
        // A subnormal span can still underflow to zero here.
        (cell.latitude_delta > 0.0 && cell.longitude_delta > 0.0).then_some(cell)
    }

    /// Groups `items` into clusters for `viewport`.
    ///
    /// Never fails. An empty input yields an empty result, and a degenerate
    /// viewport (zero, negative or non-finite span) returns every item as solo.
    pub fn cluster<T, I>(&self, viewport: &Viewport, items: I) -> ClusterResult<T>
    where
        T: Located,
        I: IntoIterator<Item = T>,
    {
        let Some(cell) = self.cell_size(viewport) else {
            let solo: Vec<T> = items.into_iter().collect();
            debug!(
                items = solo.len(),
                latitude_delta = viewport.span.latitude_delta,
                longitude_delta = viewport.span.longitude_delta,
                "Degenerate viewport, skipping clustering"
            );
            return ClusterResult {
                clustered: Vec::new(),
                solo,
            };
        };

        let mut buckets: IndexMap<Bucket, Vec<T>> = IndexMap::new();
        for (index, item) in items.into_iter().enumerate() {
            let bucket = CellKey::for_coordinate(item.coordinate(), cell)
                .map_or(Bucket::Unplaced(index), Bucket::Cell);
            buckets.entry(bucket).or_default().push(item);
        }

        let mut result = ClusterResult::default();
        for (bucket, mut members) in buckets {
            match bucket {
                Bucket::Cell(key) if members.len() >= 2 => {
                    result.clustered.push(ClusterGroup::from_cell(key, members));
                }
                _ => result.solo.append(&mut members),
            }
        }

        debug!(
            items = result.len(),
            clusters = result.clustered.len(),
            solo = result.solo.len(),
            cell_latitude = cell.latitude_delta,
            cell_longitude = cell.longitude_delta,
            "Clustered markers"
        );

        result
    }

    /// Clusters one item set for several viewports at once, typically the
    /// same center at different zoom levels. Results are in viewport order.
    pub fn cluster_levels<'a, T>(&self, viewports: &[Viewport], items: &'a [T]) -> Vec<ClusterResult<&'a T>>
    where
        T: Located + Sync,
    {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            viewports
                .par_iter()
                .map(|viewport| self.cluster(viewport, items))
                .collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            viewports
                .iter()
                .map(|viewport| self.cluster(viewport, items))
                .collect()
        }
    }
}

/// Clusters `items` for `viewport` with the default grid divisor.
pub fn cluster<T, I>(viewport: &Viewport, items: I) -> ClusterResult<T>
where
    T: Located,
    I: IntoIterator<Item = T>,
{
    GridClusterer::default().cluster(viewport, items)
}
