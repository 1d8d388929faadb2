use tokio::runtime::Handle;
use tracing::info;
use crate::core::{day, DayLabel, Route, RoutePoint};
use crate::playback::{PlaybackConfig, PlaybackSnapshot, Player};

/// User intent coming from the controls, the map or the info panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlAction {
    Play,
    Stop,
    Replay,
    SpeedUp,
    ToggleTrack,
    OpenPanel,
    ClosePanel,
    SelectDestination(usize),
    SelectDay(Option<usize>),
}

/// Contents of the vehicle info panel
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleInfo {
    pub location: String,
    pub battery_percent: u8,
    pub distance_km: f64,
    pub total_distance_km: f64,
    pub speed_label: String,
}

/// One tracking session: a player over a route plus the view toggles
/// around it. Track and panel visibility never touch playback state.
pub struct TrackingSession {
    player: Player,
    config: PlaybackConfig,
    runtime: Handle,
    days: Vec<DayLabel>,
    selected_day: Option<usize>,
    show_track: bool,
    show_panel: bool,
    battery_percent: u8,
}

impl TrackingSession {
    pub fn new(
        route: Route,
        days: Vec<DayLabel>,
        config: PlaybackConfig,
        battery_percent: u8,
        runtime: Handle,
    ) -> Self {
        let selected_day = day::find_day(&days, chrono::Local::now().date_naive());
        Self {
            player: Player::new(route, config, runtime.clone()),
            config,
            runtime,
            days,
            selected_day,
            show_track: true,
            show_panel: false,
            battery_percent: battery_percent.min(100),
        }
    }

    pub fn apply(&mut self, action: ControlAction) {
        match action {
            ControlAction::Play => {
                if self.player.play() {
                    self.show_panel = false;
                }
            }
            ControlAction::Stop => self.player.stop(),
            ControlAction::Replay => {
                self.player.replay();
                self.show_panel = false;
            }
            ControlAction::SpeedUp => {
                self.player.increase_speed();
            }
            ControlAction::ToggleTrack => self.show_track = !self.show_track,
            ControlAction::OpenPanel => self.show_panel = true,
            ControlAction::ClosePanel => self.show_panel = false,
            ControlAction::SelectDestination(index) => self.player.set_destination(index),
            ControlAction::SelectDay(index) => {
                self.selected_day = index.filter(|&i| i < self.days.len());
            }
        }
    }

    /// Swap in a new route. The old player is dropped, which cancels its timer.
    pub fn replace_route(&mut self, route: Route) {
        let config = PlaybackConfig::with_step_interval(self.snapshot().step_interval_ms);
        info!(points = route.len(), "Route replaced");
        self.player = Player::new(route, config, self.runtime.clone());
    }

    /// Back to the configured starting speed on a fresh player over the same route
    pub fn restart(&mut self) {
        let route = self.player.with_engine(|e| e.route().clone());
        self.player = Player::new(route, self.config, self.runtime.clone());
    }

    pub fn replace_days(&mut self, days: Vec<DayLabel>) {
        self.selected_day = day::find_day(&days, chrono::Local::now().date_naive());
        self.days = days;
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        self.player.snapshot()
    }

    pub fn route_len(&self) -> usize {
        self.player.with_engine(|e| e.route().len())
    }

    pub fn days(&self) -> &[DayLabel] {
        &self.days
    }

    pub fn selected_day(&self) -> Option<usize> {
        self.selected_day
    }

    pub fn show_track(&self) -> bool {
        self.show_track
    }

    pub fn show_panel(&self) -> bool {
        self.show_panel
    }

    /// Travelled path for trail rendering, or None while the track is hidden
    pub fn trail(&self) -> Option<Vec<RoutePoint>> {
        if !self.show_track {
            return None;
        }
        Some(self.player.with_engine(|e| e.path_so_far().to_vec()))
    }

    pub fn vehicle_info(&self) -> VehicleInfo {
        self.player.with_engine(|e| VehicleInfo {
            location: e.location_name().to_string(),
            battery_percent: self.battery_percent,
            distance_km: e.distance_travelled_km(),
            total_distance_km: e.route().total_distance_km(),
            speed_label: e.snapshot().speed_label(),
        })
    }
}
