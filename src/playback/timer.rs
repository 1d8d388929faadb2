use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, trace};
use crate::core::Route;
use crate::playback::{PlaybackConfig, PlaybackEngine, PlaybackSnapshot, TickOutcome};

/// The repeating timer currently driving playback
struct TickTimer {
    generation: u64,
    task: JoinHandle<()>,
}

struct Shared {
    engine: PlaybackEngine,
    timer: Option<TickTimer>,
    /// Bumped on every cancel; a tick from an older generation is discarded
    generation: u64,
}

impl Shared {
    fn cancel_timer(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if let Some(timer) = self.timer.take() {
            timer.task.abort();
            debug!(generation = timer.generation, "Playback timer cancelled");
        }
    }
}

/// Drives a [`PlaybackEngine`] with a single repeating tokio timer.
///
/// The player exclusively owns the timer. Every control operation manages
/// it directly: `play` and `replay` (re)start it, `stop` cancels it, a speed
/// change restarts it at the new period, arrival cancels it from inside the
/// tick, and dropping the player cancels it.
///
/// Cancellation is synchronous. The generation counter is checked under the
/// same lock the tick mutates the engine with, so once a control call
/// returns no tick started by an earlier timer can move the vehicle.
pub struct Player {
    shared: Arc<Mutex<Shared>>,
    runtime: Handle,
}

impl Player {
    pub fn new(route: Route, config: PlaybackConfig, runtime: Handle) -> Self {
        Self {
            shared: Arc::new(Mutex::new(Shared {
                engine: PlaybackEngine::with_config(route, config),
                timer: None,
                generation: 0,
            })),
            runtime,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        lock(&self.shared)
    }

    /// Choose the destination index. Does not start motion.
    pub fn set_destination(&self, index: usize) {
        self.lock().engine.set_destination(index);
    }

    /// Start moving toward the destination; no-op without a usable destination
    pub fn play(&self) -> bool {
        let mut shared = self.lock();
        if !shared.engine.play() {
            return false;
        }
        self.start_timer(&mut shared);
        true
    }

    /// Halt motion and cancel the timer. Idempotent.
    pub fn stop(&self) {
        let mut shared = self.lock();
        shared.engine.stop();
        shared.cancel_timer();
    }

    /// Return to the first point and play toward the current destination
    pub fn replay(&self) -> bool {
        let mut shared = self.lock();
        if shared.engine.replay() {
            self.start_timer(&mut shared);
            true
        } else {
            shared.cancel_timer();
            false
        }
    }

    /// Shorten the step interval; while playing the timer restarts at the new period
    pub fn increase_speed(&self) -> bool {
        let mut shared = self.lock();
        if !shared.engine.increase_speed() {
            return false;
        }
        if shared.engine.is_playing() {
            self.start_timer(&mut shared);
        }
        true
    }

    /// Back to the start state and cancel any timer
    pub fn reset(&self) {
        let mut shared = self.lock();
        shared.cancel_timer();
        shared.engine.reset();
    }

    #[cfg(test)]
    pub fn is_playing(&self) -> bool {
        self.lock().engine.is_playing()
    }

    /// Whether a timer task is currently live
    #[cfg(test)]
    pub fn has_timer(&self) -> bool {
        self.lock().timer.is_some()
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        self.lock().engine.snapshot()
    }

    /// Run `f` with read access to the engine
    pub fn with_engine<R>(&self, f: impl FnOnce(&PlaybackEngine) -> R) -> R {
        f(&self.lock().engine)
    }

    /// Replace any running timer with a fresh one at the engine's interval
    fn start_timer(&self, shared: &mut Shared) {
        shared.cancel_timer();

        let generation = shared.generation;
        let period = Duration::from_millis(shared.engine.step_interval_ms());
        let weak = Arc::downgrade(&self.shared);
        let task = self.runtime.spawn(run_timer(weak, generation, period));

        shared.timer = Some(TickTimer { generation, task });
        debug!(generation, period_ms = period.as_millis() as u64, "Playback timer started");
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        self.lock().cancel_timer();
    }
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    // A panic while holding the lock leaves the engine in a valid state
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

async fn run_timer(shared: Weak<Mutex<Shared>>, generation: u64, period: Duration) {
    let mut interval = time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        let Some(shared) = shared.upgrade() else {
            break;
        };
        let mut guard = lock(&shared);
        if guard.generation != generation {
            break;
        }

        match guard.engine.tick() {
            TickOutcome::Moved(index) => {
                trace!(index, "Playback tick");
            }
            TickOutcome::Arrived(_) | TickOutcome::Idle => {
                // Detaches our own handle; the task ends by returning
                guard.timer = None;
                guard.generation = guard.generation.wrapping_add(1);
                break;
            }
        }
    }
}
