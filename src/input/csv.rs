use std::io::Read;
use crate::core::{Route, RoutePoint};
use crate::error::{RouteError, RouteResult};

const LATITUDE_COLUMNS: &[&str] = &["latitude", "lat"];
const LONGITUDE_COLUMNS: &[&str] = &["longitude", "lon", "lng", "long"];
const NAME_COLUMNS: &[&str] = &["name", "label", "place"];

/// Load a route from CSV data
///
/// Supports flexible column layouts, matched case-insensitively:
/// - latitude,longitude,name
/// - lat,lng
/// - name,lat,lon
///
/// The name column is optional; empty names are treated as missing.
pub fn parse_route_csv<R: Read>(reader: R) -> RouteResult<Route> {
    let mut rdr = csv::Reader::from_reader(reader);

    let headers = rdr.headers()?.clone();
    let lat_idx = find_column(&headers, LATITUDE_COLUMNS)?;
    let lon_idx = find_column(&headers, LONGITUDE_COLUMNS)?;
    let name_idx = find_column(&headers, NAME_COLUMNS).ok();

    let mut points = Vec::new();

    for (row, result) in rdr.records().enumerate() {
        let record = result?;

        let latitude = parse_coordinate(record.get(lat_idx), row)?;
        let longitude = parse_coordinate(record.get(lon_idx), row)?;

        let name = name_idx
            .and_then(|idx| record.get(idx))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        points.push(RoutePoint { latitude, longitude, name });
    }

    Route::new(points)
}

fn parse_coordinate(field: Option<&str>, row: usize) -> RouteResult<f64> {
    let raw = field.unwrap_or_default().trim();
    raw.parse::<f64>().map_err(|_| RouteError::InvalidCoordinate {
        row,
        value: raw.to_string(),
    })
}

/// Find a column by checking possible names
fn find_column(headers: &csv::StringRecord, names: &'static [&'static str]) -> RouteResult<usize> {
    for (idx, header) in headers.iter().enumerate() {
        let header_lower = header.trim().to_lowercase();
        if names.iter().any(|&name| header_lower == name) {
            return Ok(idx);
        }
    }

    Err(RouteError::MissingColumn(names))
}
