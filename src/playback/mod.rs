pub mod engine;
pub mod timer;

pub use engine::PlaybackEngine;
pub use timer::Player;

use crate::core::RoutePoint;

/// Default delay between index advances
pub const DEFAULT_STEP_INTERVAL_MS: u64 = 1000;

/// Playback status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStatus {
    /// Never played since the session started or was reset
    Idle,
    Playing,
    /// Stopped explicitly before reaching the destination
    Stopped,
    /// Current index reached the destination
    Arrived,
}

/// Playback configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackConfig {
    pub step_interval_ms: u64,  // 1000 = one point per second
    pub min_step_interval_ms: u64,
    pub speed_step_ms: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            step_interval_ms: DEFAULT_STEP_INTERVAL_MS,
            min_step_interval_ms: 200,
            speed_step_ms: 200,
        }
    }
}

impl PlaybackConfig {
    /// Config with a custom starting interval, never below the minimum step
    pub fn with_step_interval(step_interval_ms: u64) -> Self {
        let defaults = Self::default();
        Self {
            step_interval_ms: step_interval_ms.max(defaults.min_step_interval_ms),
            ..defaults
        }
    }
}

/// Result of a single timer tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not playing; nothing changed
    Idle,
    /// Moved one step to the given index
    Moved(usize),
    /// Already at the destination; playback has ended
    Arrived(usize),
}

/// Read-only view of playback for the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSnapshot {
    pub current_index: usize,
    pub destination_index: Option<usize>,
    pub status: PlaybackStatus,
    pub step_interval_ms: u64,
    pub position: RoutePoint,
}

impl PlaybackSnapshot {
    pub fn is_playing(&self) -> bool {
        self.status == PlaybackStatus::Playing
    }

    pub fn speed_multiplier(&self) -> f64 {
        speed_multiplier(self.step_interval_ms)
    }

    pub fn speed_label(&self) -> String {
        speed_label(self.step_interval_ms)
    }

    pub fn location_name(&self) -> &str {
        self.position.name.as_deref().unwrap_or("Unknown")
    }
}

/// Speed relative to one point per second
pub fn speed_multiplier(step_interval_ms: u64) -> f64 {
    1000.0 / step_interval_ms.max(1) as f64
}

/// Speed multiplier formatted for display, e.g. "2.5x"
pub fn speed_label(step_interval_ms: u64) -> String {
    format!("{:.1}x", speed_multiplier(step_interval_ms))
}
