use imgui::{Condition, Ui};

pub struct AboutDialog {
    show: bool,
}

impl AboutDialog {
    pub fn new() -> Self {
        Self { show: false }
    }

    pub fn show(&mut self) {
        self.show = true;
    }

    pub fn render(&mut self, ui: &Ui) {
        if !self.show {
            return;
        }

        ui.window("About Vehicle Tracker")
            .size([380.0, 240.0], Condition::FirstUseEver)
            .build(|| {
                ui.text("Vehicle Tracker");
                ui.text_colored([0.7, 0.7, 0.7, 1.0], format!("Version {}", env!("CARGO_PKG_VERSION")));
                ui.separator();
                ui.text("Replays a vehicle along a recorded route.");
                ui.separator();
                ui.text("Features:");
                ui.bullet_text("Play, stop and replay toward any point");
                ui.bullet_text("Adjustable playback speed");
                ui.bullet_text("Travelled-track overlay");
                ui.bullet_text("JSON and CSV route files");
                ui.separator();
                if ui.button("Close") {
                    self.show = false;
                }
            });
    }
}

impl Default for AboutDialog {
    fn default() -> Self {
        Self::new()
    }
}
