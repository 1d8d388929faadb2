use imgui::{Condition, StyleColor, Ui};
use crate::playback::PlaybackSnapshot;
use crate::session::ControlAction;

const BLUE: [f32; 4] = [0.15, 0.39, 0.92, 1.0];
const RED: [f32; 4] = [0.86, 0.15, 0.15, 1.0];
const PURPLE: [f32; 4] = [0.58, 0.2, 0.92, 1.0];
const GRAY: [f32; 4] = [0.29, 0.33, 0.39, 1.0];
const GREEN: [f32; 4] = [0.09, 0.64, 0.29, 1.0];

/// Playback toolbar: play, stop, replay, track toggle, speed up
pub struct ControlsWindow;

impl ControlsWindow {
    pub fn new() -> Self {
        Self
    }

    pub fn render(
        &mut self,
        ui: &Ui,
        snapshot: &PlaybackSnapshot,
        show_track: bool,
        opened: &mut bool,
    ) -> Vec<ControlAction> {
        let mut actions = Vec::new();

        ui.window("Vehicle Tracking")
            .size([560.0, 90.0], Condition::FirstUseEver)
            .position([10.0, 30.0], Condition::FirstUseEver)
            .opened(opened)
            .build(|| {
                // Play needs a destination
                let disabled = ui.begin_disabled(snapshot.destination_index.is_none());
                if colored_button(ui, "Play", BLUE) {
                    actions.push(ControlAction::Play);
                }
                disabled.end();

                ui.same_line();
                if colored_button(ui, "Stop", RED) {
                    actions.push(ControlAction::Stop);
                }

                ui.same_line();
                if colored_button(ui, "Replay", PURPLE) {
                    actions.push(ControlAction::Replay);
                }

                ui.same_line();
                let track_label = if show_track { "Hide Track" } else { "Show Track" };
                if colored_button(ui, track_label, GRAY) {
                    actions.push(ControlAction::ToggleTrack);
                }

                ui.same_line();
                if colored_button(ui, "Speed Up", GREEN) {
                    actions.push(ControlAction::SpeedUp);
                }

                ui.separator();
                ui.text(format!("Current Speed: {}", snapshot.speed_label()));
                ui.same_line();
                if snapshot.is_playing() {
                    ui.text_colored([0.3, 0.9, 0.3, 1.0], "Playing");
                } else {
                    ui.text_disabled(format!("{:?}", snapshot.status));
                }
            });

        actions
    }
}

impl Default for ControlsWindow {
    fn default() -> Self {
        Self::new()
    }
}

fn colored_button(ui: &Ui, label: &str, color: [f32; 4]) -> bool {
    let hovered = [color[0] * 0.85, color[1] * 0.85, color[2] * 0.85, 1.0];
    let _button = ui.push_style_color(StyleColor::Button, color);
    let _hovered = ui.push_style_color(StyleColor::ButtonHovered, hovered);
    let _active = ui.push_style_color(StyleColor::ButtonActive, hovered);
    ui.button(label)
}
