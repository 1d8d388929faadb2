use serde::{Deserialize, Serialize};
use crate::core::geo;
use crate::error::{RouteError, RouteResult};

/// A single point along a vehicle route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePoint {
    /// Latitude in degrees
    pub latitude: f64,

    /// Longitude in degrees
    pub longitude: f64,

    /// Optional place name shown in the info panel
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl RoutePoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            name: None,
        }
    }

    pub fn named(latitude: f64, longitude: f64, name: &str) -> Self {
        Self {
            latitude,
            longitude,
            name: Some(name.to_string()),
        }
    }

    /// (lat, lon) pair
    pub fn coords(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}

/// Geographic bounding box of a route
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl Bounds {
    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }
}

/// Ordered, non-empty list of route points.
///
/// Fixed for the lifetime of a playback session; the only mutable
/// reference into it is an index held by the playback engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    points: Vec<RoutePoint>,
}

impl Route {
    /// Build a route, rejecting empty lists and out-of-range coordinates
    pub fn new(points: Vec<RoutePoint>) -> RouteResult<Self> {
        if points.is_empty() {
            return Err(RouteError::Empty);
        }

        if let Some((row, p)) = points
            .iter()
            .enumerate()
            .find(|(_, p)| !geo::is_valid_coordinate(p.latitude, p.longitude))
        {
            return Err(RouteError::InvalidCoordinate {
                row,
                value: format!("{}, {}", p.latitude, p.longitude),
            });
        }

        Ok(Self { points })
    }

    /// Number of points (always >= 1)
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Index of the last point
    pub fn last_index(&self) -> usize {
        self.points.len() - 1
    }

    pub fn points(&self) -> &[RoutePoint] {
        &self.points
    }

    /// Point at `index`, clamped into the route
    pub fn point(&self, index: usize) -> &RoutePoint {
        &self.points[self.clamp_index(index)]
    }

    /// Clamp an index into `[0, len - 1]`
    pub fn clamp_index(&self, index: usize) -> usize {
        index.min(self.last_index())
    }

    /// Points from the start up to and including `index`
    pub fn path_to(&self, index: usize) -> &[RoutePoint] {
        &self.points[..=self.clamp_index(index)]
    }

    /// Place name at `index`, if the point has one
    pub fn name_at(&self, index: usize) -> Option<&str> {
        self.points.get(index).and_then(|p| p.name.as_deref())
    }

    /// Distance along the route from the start to `index`, in kilometres
    pub fn distance_to_km(&self, index: usize) -> f64 {
        geo::path_length_km(self.path_to(index).iter().map(RoutePoint::coords))
    }

    /// Full route length in kilometres
    pub fn total_distance_km(&self) -> f64 {
        self.distance_to_km(self.last_index())
    }

    pub fn bounds(&self) -> Bounds {
        let first = &self.points[0];
        let init = Bounds {
            min_lat: first.latitude,
            max_lat: first.latitude,
            min_lon: first.longitude,
            max_lon: first.longitude,
        };
        self.points.iter().fold(init, |b, p| Bounds {
            min_lat: b.min_lat.min(p.latitude),
            max_lat: b.max_lat.max(p.latitude),
            min_lon: b.min_lon.min(p.longitude),
            max_lon: b.max_lon.max(p.longitude),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Route {
        Route::new(vec![
            RoutePoint::named(0.0, 0.0, "Depot"),
            RoutePoint::new(0.0, 1.0),
            RoutePoint::named(1.0, 1.0, "Market"),
        ])
        .unwrap()
    }

    #[test]
    fn test_empty_route_rejected() {
        assert!(matches!(Route::new(Vec::new()), Err(RouteError::Empty)));
    }

    #[test]
    fn test_invalid_coordinate_rejected() {
        let err = Route::new(vec![RoutePoint::new(0.0, 0.0), RoutePoint::new(95.0, 0.0)]).unwrap_err();
        assert!(matches!(err, RouteError::InvalidCoordinate { row: 1, .. }));
    }

    #[test]
    fn test_path_to_is_inclusive_and_clamped() {
        let route = sample();
        assert_eq!(route.path_to(0).len(), 1);
        assert_eq!(route.path_to(1).len(), 2);
        assert_eq!(route.path_to(99).len(), 3);
        assert_eq!(route.clamp_index(7), 2);
    }

    #[test]
    fn test_name_lookup() {
        let route = sample();
        assert_eq!(route.name_at(0), Some("Depot"));
        assert_eq!(route.name_at(1), None);
        assert_eq!(route.name_at(2), Some("Market"));
        assert_eq!(route.name_at(3), None);
    }

    #[test]
    fn test_distances() {
        let route = sample();
        assert_eq!(route.distance_to_km(0), 0.0);
        let first_leg = route.distance_to_km(1);
        assert!((first_leg - 111.19).abs() < 0.1);
        assert!(route.total_distance_km() > first_leg);
    }

    #[test]
    fn test_bounds() {
        let b = sample().bounds();
        assert_eq!((b.min_lat, b.max_lat, b.min_lon, b.max_lon), (0.0, 1.0, 0.0, 1.0));
        assert_eq!(b.center(), (0.5, 0.5));
    }

    #[test]
    fn test_point_json_name_optional() {
        let p: RoutePoint = serde_json::from_str(r#"{"latitude": 1.5, "longitude": 2.5}"#).unwrap();
        assert_eq!(p, RoutePoint::new(1.5, 2.5));
    }
}
