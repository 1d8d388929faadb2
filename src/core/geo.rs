/// Mean Earth radius used for great-circle distances
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// Great-circle distance between two (lat, lon) pairs in degrees, in kilometres
pub fn haversine_km(a: (f64, f64), b: (f64, f64)) -> f64 {
    let (lat1, lon1) = (a.0.to_radians(), a.1.to_radians());
    let (lat2, lon2) = (b.0.to_radians(), b.1.to_radians());

    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// Sum of segment lengths along a polyline of (lat, lon) pairs
pub fn path_length_km<I>(points: I) -> f64
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let mut total = 0.0;
    let mut prev: Option<(f64, f64)> = None;
    for p in points {
        if let Some(q) = prev {
            total += haversine_km(q, p);
        }
        prev = Some(p);
    }
    total
}

/// Check that a latitude/longitude pair is finite and in range
pub fn is_valid_coordinate(latitude: f64, longitude: f64) -> bool {
    latitude.is_finite()
        && longitude.is_finite()
        && (-90.0..=90.0).contains(&latitude)
        && (-180.0..=180.0).contains(&longitude)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_zero_for_same_point() {
        assert_eq!(haversine_km((27.7, 85.3), (27.7, 85.3)), 0.0);
    }

    #[test]
    fn test_haversine_one_degree_of_latitude() {
        // One degree of latitude is ~111.2 km everywhere
        let d = haversine_km((0.0, 0.0), (1.0, 0.0));
        assert!((d - 111.19).abs() < 0.1, "got {}", d);
    }

    #[test]
    fn test_path_length_sums_segments() {
        let pts = [(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)];
        let total = path_length_km(pts);
        let direct = haversine_km((0.0, 0.0), (2.0, 0.0));
        assert!((total - direct).abs() < 1e-6);
        assert_eq!(path_length_km([(5.0, 5.0)]), 0.0);
        assert_eq!(path_length_km(Vec::<(f64, f64)>::new()), 0.0);
    }

    #[test]
    fn test_coordinate_validation() {
        assert!(is_valid_coordinate(27.7, 85.3));
        assert!(is_valid_coordinate(-90.0, 180.0));
        assert!(!is_valid_coordinate(91.0, 0.0));
        assert!(!is_valid_coordinate(0.0, -180.5));
        assert!(!is_valid_coordinate(f64::NAN, 0.0));
    }
}
