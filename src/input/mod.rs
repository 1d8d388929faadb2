pub mod csv;
pub mod json;

pub use csv::parse_route_csv;
pub use json::{parse_days_json, parse_route_json};

use std::path::Path;
use crate::core::{DayLabel, Route};
use crate::error::{RouteError, RouteResult};

const BUILTIN_ROUTE: &str = include_str!("../../data/route.json");
const BUILTIN_DAYS: &str = include_str!("../../data/days.json");

/// Input format detection result
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputFormat {
    Json,
    Csv,
    Unknown,
}

/// Detect the format of a route file from its extension, falling back to its contents
pub fn detect_format(path: &Path, data: &[u8]) -> InputFormat {
    match path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase).as_deref() {
        Some("json") => return InputFormat::Json,
        Some("csv") => return InputFormat::Csv,
        _ => {}
    }

    if is_json(data) {
        InputFormat::Json
    } else if is_csv(data) {
        InputFormat::Csv
    } else {
        InputFormat::Unknown
    }
}

fn is_json(data: &[u8]) -> bool {
    data.iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|&b| b == b'[')
}

fn is_csv(data: &[u8]) -> bool {
    let sample = &data[..data.len().min(500)];
    let text = match std::str::from_utf8(sample) {
        Ok(text) => text,
        // Cut mid-character at the sample boundary; keep the valid prefix
        Err(e) if e.error_len().is_none() => match std::str::from_utf8(&sample[..e.valid_up_to()]) {
            Ok(text) => text,
            Err(_) => return false,
        },
        Err(_) => return false,
    };
    // A header line with at least one separator
    text.lines().next().is_some_and(|line| line.contains(','))
}

fn read(path: &Path) -> RouteResult<Vec<u8>> {
    std::fs::read(path).map_err(|source| RouteError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a route from a file, auto-detecting format
pub fn load_route(path: &Path) -> RouteResult<Route> {
    let data = read(path)?;

    match detect_format(path, &data) {
        InputFormat::Json => parse_route_json(&String::from_utf8_lossy(&data)),
        InputFormat::Csv => parse_route_csv(data.as_slice()),
        InputFormat::Unknown => Err(RouteError::UnknownFormat(path.to_path_buf())),
    }
}

/// Load the day list from a JSON file
pub fn load_days(path: &Path) -> RouteResult<Vec<DayLabel>> {
    let data = read(path)?;
    parse_days_json(&String::from_utf8_lossy(&data))
}

/// Route compiled into the binary
pub fn builtin_route() -> RouteResult<Route> {
    parse_route_json(BUILTIN_ROUTE)
}

/// Day list compiled into the binary
pub fn builtin_days() -> RouteResult<Vec<DayLabel>> {
    parse_days_json(BUILTIN_DAYS)
}
