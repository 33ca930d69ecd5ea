//! Small geo helper library

const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Great-circle distance between two (lat, lon) points in degrees
pub fn haversine_distance_meters(a: (f64, f64), b: (f64, f64)) -> f64 {
    let lat1 = a.0.to_radians();
    let lat2 = b.0.to_radians();
    let d_lat = (b.0 - a.0).to_radians();
    let d_lon = (b.1 - a.1).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);

    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_METERS * c
}

/// Human-readable distance: meters below 1 km, tenths of km above
pub fn format_meters(meters: f64) -> String {
    if !meters.is_finite() {
        return "—".to_string();
    }
    if meters < 1000.0 {
        format!("{} m", meters.round() as i64)
    } else {
        format!("{:.1} km", meters / 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_distance_for_identical_points() {
        let p = (47.6, -122.3);
        assert_eq!(haversine_distance_meters(p, p), 0.0);
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let d = haversine_distance_meters((0.0, 0.0), (1.0, 0.0));
        assert!((d - 111_195.0).abs() < 200.0, "got {d}");
    }

    #[test]
    fn formats_short_and_long_distances() {
        assert_eq!(format_meters(999.0), "999 m");
        assert_eq!(format_meters(1500.0), "1.5 km");
        assert_eq!(format_meters(f64::NAN), "—");
    }
}
