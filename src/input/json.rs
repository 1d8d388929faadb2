use crate::core::{DayLabel, Route, RoutePoint};
use crate::error::RouteResult;

/// Parse a route from a JSON array of `{latitude, longitude, name?}` objects
pub fn parse_route_json(text: &str) -> RouteResult<Route> {
    let points: Vec<RoutePoint> = serde_json::from_str(text)?;
    Route::new(points)
}

/// Parse the day list from a JSON array of `{day}` objects
pub fn parse_days_json(text: &str) -> RouteResult<Vec<DayLabel>> {
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RouteError;

    #[test]
    fn test_parse_route() {
        let route = parse_route_json(
            r#"[
                {"latitude": 27.70, "longitude": 85.31, "name": "Start"},
                {"latitude": 27.71, "longitude": 85.32}
            ]"#,
        )
        .unwrap();
        assert_eq!(route.len(), 2);
        assert_eq!(route.name_at(0), Some("Start"));
        assert_eq!(route.name_at(1), None);
    }

    #[test]
    fn test_parse_empty_route_fails() {
        assert!(matches!(parse_route_json("[]"), Err(RouteError::Empty)));
    }

    #[test]
    fn test_parse_malformed_route_fails() {
        assert!(matches!(
            parse_route_json(r#"[{"latitude": "north"}]"#),
            Err(RouteError::Json(_))
        ));
    }

    #[test]
    fn test_parse_days() {
        let days = parse_days_json(r#"[{"day": "Monday"}, {"day": "Tuesday"}]"#).unwrap();
        assert_eq!(days, vec![DayLabel::new("Monday"), DayLabel::new("Tuesday")]);
    }
}
