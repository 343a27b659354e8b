//! Ground distance between geographic coordinates.

use crate::{GeoCoord, C};
use geo::{GeodesicDistance, Point};

/// Mean radius of Earth in meters
/// This is the value recommended by the IUGG:
/// Moritz, H. (2000). Geodetic Reference System 1980. Journal of Geodesy, 74(1), 128–133. doi:10.1007/s001900050278
/// "Derived Geometric Constants: mean radius" (p133)
/// https://en.wikipedia.org/wiki/Earth_radius#Mean_radius
pub const MEAN_EARTH_RADIUS: C = 6_371_008.8;

/// The surface distances are measured on.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum EarthModel {
    /// The WGS-84 ellipsoid (Karney's geodesic algorithm).
    #[default]
    Wgs84,
    /// A sphere of `radius` meters (haversine).
    Sphere { radius: C },
}

impl EarthModel {
    /// A sphere with Earth's mean radius.
    pub const MEAN_SPHERE: Self = Self::Sphere {
        radius: MEAN_EARTH_RADIUS,
    };
}

/// Returns the ground distance in meters between `a` and `b`.
///
/// Elevation is ignored.
pub fn distance(a: GeoCoord, b: GeoCoord, model: EarthModel) -> C {
    match model {
        EarthModel::Wgs84 => Point::from(a).geodesic_distance(&Point::from(b)),
        EarthModel::Sphere { radius } => haversine(a, b, radius),
    }
}

fn haversine(a: GeoCoord, b: GeoCoord, radius: C) -> C {
    let (lat_a, lat_b) = (a.latitude.to_radians(), b.latitude.to_radians());
    let d_lat = lat_b - lat_a;
    let d_lon = (b.longitude - a.longitude).to_radians();
    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * radius * h.sqrt().min(1.0).asin()
}

#[cfg(test)]
mod tests {
    use super::{distance, EarthModel, MEAN_EARTH_RADIUS};
    use crate::GeoCoord;
    use approx::assert_relative_eq;

    #[test]
    fn test_wgs84_degree_lengths() {
        let origin = GeoCoord::new(0.0, 0.0);
        // One degree of longitude along the equator.
        assert_relative_eq!(
            distance(origin, GeoCoord::new(0.0, 1.0), EarthModel::Wgs84),
            111_319.49,
            epsilon = 0.01
        );
        // One degree of latitude north of the equator.
        assert_relative_eq!(
            distance(origin, GeoCoord::new(1.0, 0.0), EarthModel::Wgs84),
            110_574.4,
            epsilon = 2.0
        );
    }

    #[test]
    fn test_sphere_degree_lengths() {
        let degree = MEAN_EARTH_RADIUS * 1.0_f64.to_radians();
        let origin = GeoCoord::new(0.0, 0.0);
        assert_relative_eq!(
            distance(origin, GeoCoord::new(1.0, 0.0), EarthModel::MEAN_SPHERE),
            degree,
            max_relative = 1e-12
        );
        // A degree of longitude shrinks with cos(latitude).
        let at_60 = distance(
            GeoCoord::new(60.0, 10.0),
            GeoCoord::new(60.0, 11.0),
            EarthModel::MEAN_SPHERE,
        );
        assert_relative_eq!(at_60, degree / 2.0, max_relative = 1e-4);
    }

    #[test]
    fn test_distance_is_symmetric_and_ignores_elevation() {
        let a = GeoCoord::new(49.0, 16.0).with_elevation(300.0);
        let b = GeoCoord::new(50.0, 17.0);
        for model in [EarthModel::Wgs84, EarthModel::MEAN_SPHERE] {
            assert_relative_eq!(
                distance(a, b, model),
                distance(b, a, model),
                max_relative = 1e-9
            );
            assert_relative_eq!(distance(a, a, model), 0.0, epsilon = 1e-9);
        }
    }
}
