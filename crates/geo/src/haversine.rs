//! Haversine distance calculation.
//!
//! Great-circle distance between two points on a sphere, used to size
//! cluster pins on the map.

use crate::Coordinate;

/// Earth's mean radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Calculates the great-circle distance between two coordinates in kilometers.
///
/// # Example
/// ```
/// use spotfeed_geo::{haversine_distance, Coordinate};
///
/// let berlin = Coordinate::new(52.5200, 13.4050);
/// let paris = Coordinate::new(48.8566, 2.3522);
///
/// let distance = haversine_distance(&berlin, &paris);
/// assert!((distance - 878.0).abs() < 10.0);
/// ```
#[inline]
pub fn haversine_distance(from: &Coordinate, to: &Coordinate) -> f64 {
    let (lat1, lon1) = from.to_radians();
    let (lat2, lon2) = to.to_radians();

    let d_lat = lat2 - lat1;
    let d_lon = lon2 - lon1;

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);

    EARTH_RADIUS_KM * 2.0 * a.sqrt().atan2((1.0 - a).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BERLIN: Coordinate = Coordinate::new(52.5200, 13.4050);
    const PARIS: Coordinate = Coordinate::new(48.8566, 2.3522);

    #[test]
    fn test_berlin_to_paris() {
        let distance = haversine_distance(&BERLIN, &PARIS);
        assert!((distance - 878.0).abs() < 5.0, "Berlin-Paris: {}", distance);
    }

    #[test]
    fn test_same_point_zero_distance() {
        assert!(haversine_distance(&BERLIN, &BERLIN).abs() < 0.001);
    }

    #[test]
    fn test_antimeridian_is_short() {
        // Distance wraps even though clustering does not.
        let east = Coordinate::new(0.0, 179.9);
        let west = Coordinate::new(0.0, -179.9);
        assert!(haversine_distance(&east, &west) < 25.0);
    }
}
