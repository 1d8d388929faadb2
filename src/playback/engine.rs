use std::cmp::Ordering;
use tracing::{info, warn};
use crate::core::{Route, RoutePoint};
use crate::playback::{PlaybackConfig, PlaybackSnapshot, PlaybackStatus, TickOutcome};

/// Playback engine for a vehicle route.
///
/// A pure state machine: it never touches a clock. Something else (see
/// [`Player`](crate::playback::Player)) calls [`tick`](Self::tick) once per
/// step interval while [`is_playing`](Self::is_playing) is true.
pub struct PlaybackEngine {
    route: Route,
    config: PlaybackConfig,
    status: PlaybackStatus,
    current_index: usize,
    destination_index: Option<usize>,
}

impl PlaybackEngine {
    #[cfg(test)]
    pub fn new(route: Route) -> Self {
        Self::with_config(route, PlaybackConfig::default())
    }

    pub fn with_config(route: Route, config: PlaybackConfig) -> Self {
        Self {
            route,
            config,
            status: PlaybackStatus::Idle,
            current_index: 0,
            destination_index: None,
        }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Get current playback position (index into the route)
    #[cfg(test)]
    pub fn position(&self) -> usize {
        self.current_index
    }

    /// Get the destination index, if one was chosen
    pub fn destination(&self) -> Option<usize> {
        self.destination_index
    }

    /// Get current playback status
    #[cfg(test)]
    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    /// Check if currently playing
    pub fn is_playing(&self) -> bool {
        self.status == PlaybackStatus::Playing
    }

    /// Delay between index advances
    pub fn step_interval_ms(&self) -> u64 {
        self.config.step_interval_ms
    }

    /// Choose the index to move toward. Does not start motion.
    pub fn set_destination(&mut self, index: usize) {
        debug_assert!(
            index < self.route.len(),
            "destination {} out of range for route of {} points",
            index,
            self.route.len()
        );
        self.destination_index = Some(self.clamp_destination(index));
    }

    fn clamp_destination(&self, index: usize) -> usize {
        let clamped = self.route.clamp_index(index);
        if clamped != index {
            warn!(index, clamped, "destination out of range, clamping");
        }
        clamped
    }

    /// Start moving toward the destination.
    ///
    /// Returns false, leaving the state untouched, when there is no
    /// destination or the vehicle is already there.
    pub fn play(&mut self) -> bool {
        match self.destination_index {
            Some(dest) if dest != self.current_index => {
                self.status = PlaybackStatus::Playing;
                info!(from = self.current_index, to = dest, "Playback started");
                true
            }
            _ => false,
        }
    }

    /// Halt motion wherever the vehicle is. Idempotent.
    pub fn stop(&mut self) {
        if self.status == PlaybackStatus::Playing {
            self.status = PlaybackStatus::Stopped;
            info!(at = self.current_index, "Playback stopped");
        }
    }

    /// Jump back to the first point, then behave as [`play`](Self::play)
    pub fn replay(&mut self) -> bool {
        self.current_index = 0;
        if self.play() {
            return true;
        }
        // Destination is the start itself: nothing left to travel
        if self.status == PlaybackStatus::Playing {
            self.status = PlaybackStatus::Arrived;
        }
        false
    }

    /// Shorten the step interval by one speed step, floored at the minimum.
    ///
    /// Returns true if the interval changed.
    pub fn increase_speed(&mut self) -> bool {
        let current = self.config.step_interval_ms;
        if current <= self.config.min_step_interval_ms {
            return false;
        }
        self.config.step_interval_ms = current
            .saturating_sub(self.config.speed_step_ms)
            .max(self.config.min_step_interval_ms);
        info!(step_interval_ms = self.config.step_interval_ms, "Speed increased");
        true
    }

    /// Advance one step toward the destination
    pub fn tick(&mut self) -> TickOutcome {
        if self.status != PlaybackStatus::Playing {
            return TickOutcome::Idle;
        }

        let Some(dest) = self.destination_index else {
            self.status = PlaybackStatus::Stopped;
            return TickOutcome::Idle;
        };

        match self.current_index.cmp(&dest) {
            Ordering::Less => {
                self.current_index += 1;
                TickOutcome::Moved(self.current_index)
            }
            Ordering::Greater => {
                self.current_index -= 1;
                TickOutcome::Moved(self.current_index)
            }
            Ordering::Equal => {
                self.status = PlaybackStatus::Arrived;
                info!(at = self.current_index, "Arrived at destination");
                TickOutcome::Arrived(self.current_index)
            }
        }
    }

    /// Back to the session start state, keeping the current speed
    pub fn reset(&mut self) {
        self.status = PlaybackStatus::Idle;
        self.current_index = 0;
        self.destination_index = None;
    }

    /// Route point under the vehicle
    pub fn current_point(&self) -> &RoutePoint {
        self.route.point(self.current_index)
    }

    /// Points travelled so far, start through current inclusive
    pub fn path_so_far(&self) -> &[RoutePoint] {
        self.route.path_to(self.current_index)
    }

    pub fn location_name(&self) -> &str {
        self.route.name_at(self.current_index).unwrap_or("Unknown")
    }

    /// Distance from the route start to the current point
    pub fn distance_travelled_km(&self) -> f64 {
        self.route.distance_to_km(self.current_index)
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            current_index: self.current_index,
            destination_index: self.destination_index,
            status: self.status,
            step_interval_ms: self.config.step_interval_ms,
            position: self.current_point().clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(n: usize) -> Route {
        let points = (0..n)
            .map(|i| RoutePoint::named(27.0 + i as f64 * 0.01, 85.0, &format!("P{}", i)))
            .collect();
        Route::new(points).unwrap()
    }

    fn run_to_completion(engine: &mut PlaybackEngine) -> Vec<usize> {
        let mut visited = Vec::new();
        for _ in 0..1000 {
            match engine.tick() {
                TickOutcome::Moved(i) => visited.push(i),
                TickOutcome::Arrived(_) | TickOutcome::Idle => break,
            }
        }
        visited
    }

    #[test]
    fn test_initial_state() {
        let engine = PlaybackEngine::new(route(5));
        assert_eq!(engine.position(), 0);
        assert_eq!(engine.destination(), None);
        assert_eq!(engine.status(), PlaybackStatus::Idle);
        assert_eq!(engine.step_interval_ms(), 1000);
    }

    #[test]
    fn test_play_without_destination_is_noop() {
        let mut engine = PlaybackEngine::new(route(5));
        assert!(!engine.play());
        assert_eq!(engine.status(), PlaybackStatus::Idle);
        assert_eq!(engine.tick(), TickOutcome::Idle);
        assert_eq!(engine.position(), 0);
    }

    #[test]
    fn test_play_to_current_index_is_noop() {
        let mut engine = PlaybackEngine::new(route(5));
        engine.set_destination(0);
        assert!(!engine.play());
        assert!(!engine.is_playing());
    }

    #[test]
    fn test_set_destination_does_not_start() {
        let mut engine = PlaybackEngine::new(route(5));
        engine.set_destination(3);
        assert!(!engine.is_playing());
        assert_eq!(engine.tick(), TickOutcome::Idle);
        assert_eq!(engine.position(), 0);
    }

    #[test]
    fn test_forward_to_end() {
        let mut engine = PlaybackEngine::new(route(5));
        engine.set_destination(4);
        assert!(engine.play());

        for expected in 1..=4 {
            assert_eq!(engine.tick(), TickOutcome::Moved(expected));
        }
        assert_eq!(engine.position(), 4);
        // Still playing at the destination until the arrival tick
        assert!(engine.is_playing());

        assert_eq!(engine.tick(), TickOutcome::Arrived(4));
        assert!(!engine.is_playing());
        assert_eq!(engine.status(), PlaybackStatus::Arrived);
        assert_eq!(engine.tick(), TickOutcome::Idle);
    }

    #[test]
    fn test_backward_movement() {
        let mut engine = PlaybackEngine::new(route(5));
        engine.set_destination(3);
        engine.play();
        run_to_completion(&mut engine);
        assert_eq!(engine.position(), 3);

        engine.set_destination(0);
        assert!(engine.play());
        assert_eq!(run_to_completion(&mut engine), vec![2, 1, 0]);
        assert_eq!(engine.position(), 0);
        assert!(!engine.is_playing());
    }

    #[test]
    fn test_every_destination_is_reached() {
        for start in 0..6 {
            for dest in 0..6 {
                if start == dest {
                    continue;
                }
                let mut engine = PlaybackEngine::new(route(6));
                engine.set_destination(start);
                engine.play();
                run_to_completion(&mut engine);

                engine.set_destination(dest);
                assert!(engine.play());
                run_to_completion(&mut engine);
                assert_eq!(engine.position(), dest);
                assert!(!engine.is_playing());
            }
        }
    }

    #[test]
    fn test_stop_mid_route() {
        let mut engine = PlaybackEngine::new(route(5));
        engine.set_destination(2);
        engine.play();
        assert_eq!(engine.tick(), TickOutcome::Moved(1));

        engine.stop();
        assert_eq!(engine.status(), PlaybackStatus::Stopped);
        for _ in 0..5 {
            assert_eq!(engine.tick(), TickOutcome::Idle);
        }
        assert_eq!(engine.position(), 1);

        // Idempotent
        engine.stop();
        assert_eq!(engine.status(), PlaybackStatus::Stopped);
    }

    #[test]
    fn test_resume_after_stop() {
        let mut engine = PlaybackEngine::new(route(5));
        engine.set_destination(3);
        engine.play();
        engine.tick();
        engine.stop();

        assert!(engine.play());
        assert_eq!(run_to_completion(&mut engine), vec![2, 3]);
    }

    #[test]
    fn test_replay_resets_to_start() {
        let mut engine = PlaybackEngine::new(route(5));
        engine.set_destination(3);
        engine.play();
        run_to_completion(&mut engine);
        assert_eq!(engine.position(), 3);

        assert!(engine.replay());
        assert_eq!(engine.position(), 0);
        assert!(engine.is_playing());
        assert_eq!(run_to_completion(&mut engine), vec![1, 2, 3]);
    }

    #[test]
    fn test_replay_without_destination_stays_at_start() {
        let mut engine = PlaybackEngine::new(route(5));
        assert!(!engine.replay());
        assert_eq!(engine.position(), 0);
        assert!(!engine.is_playing());
    }

    #[test]
    fn test_replay_toward_start_while_playing_arrives() {
        let mut engine = PlaybackEngine::new(route(5));
        engine.set_destination(4);
        engine.play();
        engine.tick();
        engine.tick();
        engine.set_destination(0);

        assert!(!engine.replay());
        assert_eq!(engine.position(), 0);
        assert_eq!(engine.status(), PlaybackStatus::Arrived);
    }

    #[test]
    fn test_redirect_while_playing() {
        let mut engine = PlaybackEngine::new(route(6));
        engine.set_destination(5);
        engine.play();
        engine.tick();
        engine.tick();
        engine.set_destination(1);
        assert_eq!(run_to_completion(&mut engine), vec![1]);
        assert_eq!(engine.position(), 1);
    }

    #[test]
    fn test_increase_speed_floors_at_minimum() {
        let mut engine = PlaybackEngine::new(route(2));
        let mut intervals = Vec::new();
        while engine.increase_speed() {
            intervals.push(engine.step_interval_ms());
        }
        assert_eq!(intervals, vec![800, 600, 400, 200]);
        assert!(!engine.increase_speed());
        assert_eq!(engine.step_interval_ms(), 200);
        assert_eq!(engine.snapshot().speed_label(), "5.0x");
    }

    #[test]
    fn test_increase_speed_from_odd_interval() {
        let config = PlaybackConfig::with_step_interval(300);
        let mut engine = PlaybackEngine::with_config(route(2), config);
        assert!(engine.increase_speed());
        assert_eq!(engine.step_interval_ms(), 200);
    }

    #[test]
    fn test_derived_values() {
        let mut engine = PlaybackEngine::new(route(5));
        assert_eq!(engine.path_so_far().len(), 1);
        assert_eq!(engine.location_name(), "P0");
        assert_eq!(engine.distance_travelled_km(), 0.0);

        engine.set_destination(2);
        engine.play();
        run_to_completion(&mut engine);

        assert_eq!(engine.path_so_far().len(), 3);
        assert_eq!(engine.current_point(), engine.route().point(2));
        assert!(engine.distance_travelled_km() > 2.0);

        let snap = engine.snapshot();
        assert_eq!(snap.current_index, 2);
        assert_eq!(snap.destination_index, Some(2));
        assert_eq!(snap.location_name(), "P2");
        assert_eq!(snap.speed_label(), "1.0x");
    }

    #[test]
    fn test_reset() {
        let mut engine = PlaybackEngine::new(route(5));
        engine.increase_speed();
        engine.set_destination(4);
        engine.play();
        engine.tick();
        engine.reset();
        assert_eq!(engine.position(), 0);
        assert_eq!(engine.destination(), None);
        assert_eq!(engine.status(), PlaybackStatus::Idle);
        assert_eq!(engine.step_interval_ms(), 800);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "out of range")]
    fn test_out_of_range_destination_fails_fast_in_debug() {
        let mut engine = PlaybackEngine::new(route(3));
        engine.set_destination(3);
    }

    #[test]
    fn test_out_of_range_destination_clamps_to_last_point() {
        let engine = PlaybackEngine::new(route(3));
        assert_eq!(engine.clamp_destination(3), 2);
        assert_eq!(engine.clamp_destination(usize::MAX), 2);
        assert_eq!(engine.clamp_destination(1), 1);
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn test_out_of_range_destination_clamps_in_release() {
        let mut engine = PlaybackEngine::new(route(3));
        engine.set_destination(10);
        assert_eq!(engine.destination(), Some(2));
        assert!(engine.play());
        assert_eq!(run_to_completion(&mut engine), vec![1, 2]);
    }
}
