pub mod day;
pub mod geo;
pub mod route;

pub use day::DayLabel;
pub use route::{Bounds, Route, RoutePoint};
