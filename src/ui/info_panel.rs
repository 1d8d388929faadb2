use imgui::{Condition, Ui};
use crate::core::DayLabel;
use crate::session::{ControlAction, VehicleInfo};

const NO_SELECTION: &str = "-- Select --";

/// Everything the vehicle info panel shows
pub struct PanelFrame<'a> {
    pub info: &'a VehicleInfo,
    pub route_len: usize,
    pub destination: Option<usize>,
    pub days: &'a [DayLabel],
    pub selected_day: Option<usize>,
}

/// Overlay with vehicle details and the destination picker
pub struct VehicleInfoPanel;

impl VehicleInfoPanel {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&mut self, ui: &Ui, frame: &PanelFrame<'_>) -> Vec<ControlAction> {
        let mut actions = Vec::new();
        let mut open = true;

        ui.window("Vehicle Info")
            .size([300.0, 330.0], Condition::FirstUseEver)
            .position([800.0, 100.0], Condition::FirstUseEver)
            .opened(&mut open)
            .build(|| {
                let info = frame.info;
                ui.text_colored([0.7, 0.7, 0.7, 1.0], format!("Location: {}", info.location));
                ui.text(format!("Battery: {}%", info.battery_percent));
                ui.text(format!(
                    "Distance: {:.2} km of {:.2} km",
                    info.distance_km, info.total_distance_km
                ));
                ui.text(format!("Speed: {}", info.speed_label));
                ui.separator();

                let preview = frame
                    .destination
                    .map(|i| format!("Point {}", i))
                    .unwrap_or_else(|| NO_SELECTION.to_string());
                if let Some(_combo) = ui.begin_combo("Destination", &preview) {
                    for i in 0..frame.route_len {
                        let selected = frame.destination == Some(i);
                        if ui.selectable_config(format!("Point {}", i)).selected(selected).build() {
                            actions.push(ControlAction::SelectDestination(i));
                        }
                    }
                }

                let day_preview = frame
                    .selected_day
                    .and_then(|i| frame.days.get(i))
                    .map(|d| d.day.as_str())
                    .unwrap_or(NO_SELECTION);
                if let Some(_combo) = ui.begin_combo("Today", day_preview) {
                    if ui.selectable_config(NO_SELECTION).selected(frame.selected_day.is_none()).build() {
                        actions.push(ControlAction::SelectDay(None));
                    }
                    for (i, day) in frame.days.iter().enumerate() {
                        // Labels may repeat; the id suffix keeps them distinct
                        let label = format!("{}##day{}", day.day, i);
                        if ui.selectable_config(label).selected(frame.selected_day == Some(i)).build() {
                            actions.push(ControlAction::SelectDay(Some(i)));
                        }
                    }
                }

                ui.spacing();
                let disabled = ui.begin_disabled(frame.destination.is_none());
                if ui.button_with_size("Play Movement", [ui.content_region_avail()[0], 0.0]) {
                    actions.push(ControlAction::Play);
                }
                disabled.end();
            });

        if !open {
            actions.push(ControlAction::ClosePanel);
        }

        actions
    }
}

impl Default for VehicleInfoPanel {
    fn default() -> Self {
        Self::new()
    }
}
