use imgui::{Condition, StyleColor, Ui};
use crate::core::{Bounds, RoutePoint};
use crate::session::ControlAction;

/// Smallest span (degrees) the projection will fit, so single-point routes still render
const MIN_SPAN_DEG: f64 = 0.001;
const VEHICLE_RADIUS: f32 = 8.0;

/// Equirectangular projection of a route's bounding box into a canvas rect
#[derive(Debug, Clone, Copy)]
pub struct MapProjection {
    center: (f64, f64),
    /// Pixels per degree of latitude
    scale: f64,
    /// Longitude shrink factor at the center latitude
    lon_factor: f64,
    canvas_center: [f32; 2],
}

impl MapProjection {
    /// Fit `bounds` inside a canvas of `size` at `origin`, keeping aspect ratio
    pub fn fit(bounds: &Bounds, origin: [f32; 2], size: [f32; 2], padding: f32) -> Self {
        let center = bounds.center();
        let lon_factor = center.0.to_radians().cos().max(0.01);

        let lat_span = (bounds.max_lat - bounds.min_lat).max(MIN_SPAN_DEG);
        let lon_span = ((bounds.max_lon - bounds.min_lon) * lon_factor).max(MIN_SPAN_DEG);

        let avail_w = (size[0] - 2.0 * padding).max(1.0) as f64;
        let avail_h = (size[1] - 2.0 * padding).max(1.0) as f64;
        let scale = (avail_w / lon_span).min(avail_h / lat_span);

        Self {
            center,
            scale,
            lon_factor,
            canvas_center: [origin[0] + size[0] / 2.0, origin[1] + size[1] / 2.0],
        }
    }

    /// Screen position of a coordinate; north is up
    pub fn project(&self, latitude: f64, longitude: f64) -> [f32; 2] {
        let dx = (longitude - self.center.1) * self.lon_factor * self.scale;
        let dy = (latitude - self.center.0) * self.scale;
        [
            self.canvas_center[0] + dx as f32,
            self.canvas_center[1] - dy as f32,
        ]
    }

    pub fn project_point(&self, point: &RoutePoint) -> [f32; 2] {
        self.project(point.latitude, point.longitude)
    }
}

/// What the map draws this frame
pub struct MapFrame<'a> {
    pub route: &'a [RoutePoint],
    pub bounds: Bounds,
    /// Travelled path, None when the track is hidden
    pub trail: Option<&'a [RoutePoint]>,
    pub vehicle: &'a RoutePoint,
    pub destination: Option<&'a RoutePoint>,
}

/// Route map canvas with the vehicle marker
pub struct MapView {
    hint_shown: bool,
}

impl MapView {
    pub fn new() -> Self {
        Self { hint_shown: true }
    }

    /// Draw the map; clicking the vehicle asks for the info panel
    pub fn render(&mut self, ui: &Ui, frame: &MapFrame<'_>, opened: &mut bool) -> Option<ControlAction> {
        let mut action = None;

        ui.window("Map")
            .size([760.0, 560.0], Condition::FirstUseEver)
            .position([10.0, 130.0], Condition::FirstUseEver)
            .opened(opened)
            .build(|| {
                if self.hint_shown {
                    ui.text_disabled("Click the vehicle for details");
                    ui.same_line();
                    if ui.small_button("x") {
                        self.hint_shown = false;
                    }
                }

                let origin = ui.cursor_screen_pos();
                let avail = ui.content_region_avail();
                let size = [avail[0].max(50.0), avail[1].max(50.0)];
                let projection = MapProjection::fit(&frame.bounds, origin, size, 24.0);

                let draw_list = ui.get_window_draw_list();
                draw_list
                    .add_rect(origin, [origin[0] + size[0], origin[1] + size[1]], ui.style_color(StyleColor::FrameBg))
                    .filled(true)
                    .build();

                let route_pts: Vec<[f32; 2]> = frame.route.iter().map(|p| projection.project_point(p)).collect();
                if route_pts.len() > 1 {
                    draw_list
                        .add_polyline(route_pts.clone(), [0.55, 0.55, 0.6, 0.8])
                        .thickness(2.0)
                        .build();
                }
                for pt in &route_pts {
                    draw_list.add_circle(*pt, 3.0, [0.7, 0.7, 0.75, 1.0]).filled(true).build();
                }

                if let Some(trail) = frame.trail {
                    let trail_pts: Vec<[f32; 2]> = trail.iter().map(|p| projection.project_point(p)).collect();
                    if trail_pts.len() > 1 {
                        draw_list
                            .add_polyline(trail_pts, [0.1, 0.8, 0.25, 1.0])
                            .thickness(4.0)
                            .build();
                    }
                }

                if let Some(dest) = frame.destination {
                    let pos = projection.project_point(dest);
                    draw_list
                        .add_circle(pos, VEHICLE_RADIUS + 4.0, [0.2, 0.5, 1.0, 1.0])
                        .thickness(2.0)
                        .build();
                }

                let vehicle_pos = projection.project_point(frame.vehicle);
                draw_list
                    .add_circle(vehicle_pos, VEHICLE_RADIUS, [0.9, 0.1, 0.1, 1.0])
                    .filled(true)
                    .build();
                draw_list
                    .add_circle(vehicle_pos, VEHICLE_RADIUS, [1.0, 1.0, 1.0, 1.0])
                    .thickness(1.5)
                    .build();

                // Whole canvas captures clicks; only hits on the marker count
                if ui.invisible_button("map_canvas", size) && hits(ui.io().mouse_pos, vehicle_pos, VEHICLE_RADIUS + 4.0) {
                    action = Some(ControlAction::OpenPanel);
                }
                if ui.is_item_hovered() && hits(ui.io().mouse_pos, vehicle_pos, VEHICLE_RADIUS + 4.0) {
                    ui.tooltip_text(frame.vehicle.name.as_deref().unwrap_or("Vehicle"));
                }
            });

        action
    }
}

impl Default for MapView {
    fn default() -> Self {
        Self::new()
    }
}

fn hits(mouse: [f32; 2], center: [f32; 2], radius: f32) -> bool {
    let dx = mouse[0] - center[0];
    let dy = mouse[1] - center[1];
    dx * dx + dy * dy <= radius * radius
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> Bounds {
        Bounds { min_lat: 10.0, max_lat: 11.0, min_lon: 20.0, max_lon: 21.0 }
    }

    #[test]
    fn test_center_maps_to_canvas_center() {
        let proj = MapProjection::fit(&bounds(), [100.0, 50.0], [400.0, 300.0], 10.0);
        let c = proj.project(10.5, 20.5);
        assert!((c[0] - 300.0).abs() < 1e-3);
        assert!((c[1] - 200.0).abs() < 1e-3);
    }

    #[test]
    fn test_north_is_up_and_east_is_right() {
        let proj = MapProjection::fit(&bounds(), [0.0, 0.0], [400.0, 400.0], 0.0);
        let north = proj.project(11.0, 20.5);
        let south = proj.project(10.0, 20.5);
        let east = proj.project(10.5, 21.0);
        let west = proj.project(10.5, 20.0);
        assert!(north[1] < south[1]);
        assert!(east[0] > west[0]);
    }

    #[test]
    fn test_bounds_fit_inside_canvas() {
        let proj = MapProjection::fit(&bounds(), [0.0, 0.0], [400.0, 200.0], 10.0);
        for (lat, lon) in [(10.0, 20.0), (11.0, 21.0), (10.0, 21.0), (11.0, 20.0)] {
            let p = proj.project(lat, lon);
            assert!(p[0] >= 9.99 && p[0] <= 390.01, "x {} out of canvas", p[0]);
            assert!(p[1] >= 9.99 && p[1] <= 190.01, "y {} out of canvas", p[1]);
        }
    }

    #[test]
    fn test_single_point_bounds() {
        let b = Bounds { min_lat: 5.0, max_lat: 5.0, min_lon: 5.0, max_lon: 5.0 };
        let proj = MapProjection::fit(&b, [0.0, 0.0], [100.0, 100.0], 0.0);
        let p = proj.project(5.0, 5.0);
        assert!(p[0].is_finite() && p[1].is_finite());
        assert_eq!(p, [50.0, 50.0]);
    }

    #[test]
    fn test_hit_test() {
        assert!(hits([10.0, 10.0], [12.0, 12.0], 4.0));
        assert!(!hits([10.0, 10.0], [20.0, 10.0], 4.0));
    }
}
