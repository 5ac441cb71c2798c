//! Coordinate transforms and axis-aligned bounding boxes.
//!
//! Parcel boundaries usually arrive as geographic (latitude/longitude)
//! coordinates from a map layer. The pipeline works in a local planar
//! frame in meters: an equirectangular approximation centered on a
//! reference point, with the east-west scale taken at the reference
//! latitude. Over parcel-sized extents the distortion is negligible, and
//! the round trip is an identity well within 1e-9 planar units.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeoPoint {
    /// Latitude in degrees, north positive.
    pub lat: f64,
    /// Longitude in degrees, east positive.
    pub lon: f64,
}

impl GeoPoint {
    /// Creates a new geographic point.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Projects a geographic point into the local planar frame (meters)
/// centered on `reference`.
///
/// x grows eastward, y grows northward. The longitude scale uses the
/// cosine of the reference latitude.
pub fn to_planar(point: GeoPoint, reference: GeoPoint) -> (f64, f64) {
    let lat_scale = EARTH_RADIUS_M;
    let lon_scale = EARTH_RADIUS_M * reference.lat.to_radians().cos();
    let x = (point.lon - reference.lon).to_radians() * lon_scale;
    let y = (point.lat - reference.lat).to_radians() * lat_scale;
    (x, y)
}

/// Inverse of [`to_planar`]: maps a local planar point (meters) back to
/// geographic coordinates.
pub fn to_geographic(point: (f64, f64), reference: GeoPoint) -> GeoPoint {
    let lon_scale = EARTH_RADIUS_M * reference.lat.to_radians().cos();
    // lon_scale vanishes at the poles; parcels there are out of scope,
    // but avoid producing NaN for a zero x offset.
    let lon = if lon_scale.abs() > f64::EPSILON {
        reference.lon + (point.0 / lon_scale).to_degrees()
    } else {
        reference.lon
    };
    let lat = reference.lat + (point.1 / EARTH_RADIUS_M).to_degrees();
    GeoPoint::new(lat, lon)
}

/// 2D axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Aabb2D {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Aabb2D {
    /// Creates a new bounding box from min/max corners.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Width of the box.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the box.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Area of the box.
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Returns the box grown by `amount` on every side.
    ///
    /// A negative amount shrinks the box; the result may be inverted
    /// (min > max), which [`Aabb2D::is_empty`] reports.
    pub fn expanded(&self, amount: f64) -> Self {
        Self {
            min_x: self.min_x - amount,
            min_y: self.min_y - amount,
            max_x: self.max_x + amount,
            max_y: self.max_y + amount,
        }
    }

    /// True if the box has non-positive extent on either axis.
    pub fn is_empty(&self) -> bool {
        self.max_x <= self.min_x || self.max_y <= self.min_y
    }

    /// True if the boxes overlap or touch.
    pub fn intersects(&self, other: &Aabb2D) -> bool {
        self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.min_y <= other.max_y
            && other.min_y <= self.max_y
    }

    /// True if `point` lies inside or on the boundary.
    pub fn contains_point(&self, point: (f64, f64)) -> bool {
        point.0 >= self.min_x
            && point.0 <= self.max_x
            && point.1 >= self.min_y
            && point.1 <= self.max_y
    }

    /// Euclidean gap between two boxes (0 when they overlap or touch).
    pub fn distance(&self, other: &Aabb2D) -> f64 {
        let dx = (other.min_x - self.max_x).max(self.min_x - other.max_x).max(0.0);
        let dy = (other.min_y - self.max_y).max(self.min_y - other.max_y).max(0.0);
        (dx * dx + dy * dy).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_round_trip_identity() {
        let reference = GeoPoint::new(55.7963, 37.5358);
        let points = [
            GeoPoint::new(55.796391, 37.535800),
            GeoPoint::new(55.796288, 37.535120),
            GeoPoint::new(55.795950, 37.535350),
        ];
        for p in points {
            let planar = to_planar(p, reference);
            let back = to_geographic(planar, reference);
            assert_relative_eq!(back.lat, p.lat, epsilon = 1e-9);
            assert_relative_eq!(back.lon, p.lon, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_planar_scale() {
        let reference = GeoPoint::new(60.0, 30.0);
        // One degree of latitude is ~111 km regardless of longitude scale.
        let (_, y) = to_planar(GeoPoint::new(61.0, 30.0), reference);
        assert_relative_eq!(y, EARTH_RADIUS_M.to_radians(), epsilon = 1.0);
        // One degree of longitude at 60°N is half that.
        let (x, _) = to_planar(GeoPoint::new(60.0, 31.0), reference);
        assert_relative_eq!(x, EARTH_RADIUS_M.to_radians() * 0.5, epsilon = 1.0);
    }

    #[test]
    fn test_aabb_dimensions() {
        let bbox = Aabb2D::new(10.0, 20.0, 50.0, 60.0);
        assert_relative_eq!(bbox.width(), 40.0);
        assert_relative_eq!(bbox.height(), 40.0);
        assert_relative_eq!(bbox.area(), 1600.0);
        assert!(!bbox.is_empty());
    }

    #[test]
    fn test_aabb_expanded() {
        let bbox = Aabb2D::new(0.0, 0.0, 10.0, 10.0).expanded(2.0);
        assert_relative_eq!(bbox.min_x, -2.0);
        assert_relative_eq!(bbox.max_y, 12.0);
        assert!(Aabb2D::new(0.0, 0.0, 3.0, 3.0).expanded(-2.0).is_empty());
    }

    #[test]
    fn test_aabb_intersects() {
        let a = Aabb2D::new(0.0, 0.0, 10.0, 10.0);
        let b = Aabb2D::new(5.0, 5.0, 15.0, 15.0);
        let c = Aabb2D::new(11.0, 0.0, 20.0, 10.0);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
        // Touching boxes intersect.
        let d = Aabb2D::new(10.0, 0.0, 20.0, 10.0);
        assert!(a.intersects(&d));
    }

    #[test]
    fn test_aabb_distance() {
        let a = Aabb2D::new(0.0, 0.0, 10.0, 10.0);
        let right = Aabb2D::new(13.0, 0.0, 20.0, 10.0);
        assert_relative_eq!(a.distance(&right), 3.0, epsilon = 1e-12);
        let diagonal = Aabb2D::new(13.0, 14.0, 20.0, 20.0);
        assert_relative_eq!(a.distance(&diagonal), 5.0, epsilon = 1e-12);
        let overlapping = Aabb2D::new(5.0, 5.0, 15.0, 15.0);
        assert_relative_eq!(a.distance(&overlapping), 0.0);
    }
}
