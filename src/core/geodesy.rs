//! Great-circle distances between launch sites and nearby points.

use crate::domain::model::GeoPoint;

/// Approximate radius of the Earth in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6373.0;

/// Haversine distance in kilometres between two points given in degrees.
///
/// Coordinates outside [-90, 90] / [-180, 180] are not rejected; the formula
/// is evaluated on whatever values are passed in.
pub fn distance_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let (lat1, lon1) = a.to_radians();
    let (lat2, lon2) = b.to_radians();

    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    // rounding can push h a hair above 1 for antipodal points
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Arithmetic midpoint of two coordinates, where a distance label is placed.
pub fn label_anchor(a: GeoPoint, b: GeoPoint) -> GeoPoint {
    GeoPoint::new(
        (a.latitude + b.latitude) / 2.0,
        (a.longitude + b.longitude) / 2.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const LC_40: GeoPoint = GeoPoint::new(28.56367, -80.57163);
    const COASTLINE: GeoPoint = GeoPoint::new(28.56260, -80.56786);

    #[test]
    fn test_same_point_is_zero() {
        assert_eq!(distance_km(LC_40, LC_40), 0.0);
        let south_pole = GeoPoint::new(-90.0, 0.0);
        assert_eq!(distance_km(south_pole, south_pole), 0.0);
    }

    #[test]
    fn test_symmetric() {
        let vafb = GeoPoint::new(34.63283, -120.61074);
        assert_eq!(distance_km(LC_40, vafb), distance_km(vafb, LC_40));
        assert_eq!(distance_km(LC_40, COASTLINE), distance_km(COASTLINE, LC_40));
    }

    #[test]
    fn test_launch_pad_to_coastline() {
        let d = distance_km(LC_40, COASTLINE);
        assert!((d - 0.37).abs() < 0.05, "got {}", d);
    }

    #[test]
    fn test_quarter_meridian() {
        let d = distance_km(GeoPoint::new(0.0, 0.0), GeoPoint::new(90.0, 0.0));
        let expected = EARTH_RADIUS_KM * std::f64::consts::FRAC_PI_2;
        assert!((d - expected).abs() < 1e-6);
    }

    #[test]
    fn test_grows_with_separation() {
        let origin = GeoPoint::new(0.0, 0.0);
        let mut previous = 0.0;
        for step in 1..=18 {
            let d = distance_km(origin, GeoPoint::new(0.0, step as f64 * 10.0));
            assert!(d >= previous);
            previous = d;
        }
    }

    #[test]
    fn test_antipodal_points_are_finite() {
        let d = distance_km(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 180.0));
        assert!(d.is_finite());
        assert!((d - EARTH_RADIUS_KM * std::f64::consts::PI).abs() < 1e-6);
    }

    #[test]
    fn test_out_of_range_input_is_accepted() {
        let d = distance_km(GeoPoint::new(95.0, 0.0), GeoPoint::new(0.0, 200.0));
        assert!(d.is_finite());
        assert!(d >= 0.0);
    }

    #[test]
    fn test_label_anchor_is_midpoint() {
        let mid = label_anchor(LC_40, COASTLINE);
        assert!((mid.latitude - 28.563135).abs() < 1e-9);
        assert!((mid.longitude - -80.569745).abs() < 1e-9);
    }
}
