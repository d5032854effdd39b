use crate::playback::timer::TickTimer;
use crate::playback::{clamp_speed, delay_for_speed, PlaybackState, DEFAULT_SPEED};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::debug;

/// Render sink invoked with the step at the new position, or `None` to clear
pub type StepCallback<T> = Box<dyn FnMut(Option<&T>) + Send>;

/// Mutable playback session, only ever touched under the engine lock
struct Session<T> {
    steps: Vec<T>,
    /// `None` is the before-first position
    position: Option<usize>,
    state: PlaybackState,
    speed: u8,
    callback: Option<StepCallback<T>>,
    timer: Option<TickTimer>,
    timers_armed: u64,
}

impl<T> Session<T> {
    fn last_index(&self) -> Option<usize> {
        self.steps.len().checked_sub(1)
    }

    fn has_next(&self) -> bool {
        match (self.position, self.last_index()) {
            (_, None) => false,
            (None, Some(_)) => true,
            (Some(position), Some(last)) => position < last,
        }
    }

    fn notify(&mut self) {
        let Session { steps, position, callback, .. } = self;
        if let Some(callback) = callback.as_mut() {
            callback(position.and_then(|idx| steps.get(idx)));
        }
    }

    fn advance(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.position = Some(self.position.map_or(0, |idx| idx + 1));
        self.notify();
        true
    }

    fn disarm(&mut self) {
        if let Some(timer) = self.timer.take() {
            debug!(
                timer = timer.id(),
                delay_ms = timer.period().as_millis() as u64,
                "disarming playback timer"
            );
        }
    }

    /// Handle a tick from timer `id`; returns whether the timer should keep running
    fn on_tick(&mut self, id: u64) -> bool {
        let current = self.timer.as_ref().map(TickTimer::id);
        if self.state != PlaybackState::Playing || current != Some(id) {
            debug!(timer = id, "ignoring stale tick");
            return false;
        }

        if self.advance() {
            return true;
        }

        self.disarm();
        self.state = PlaybackState::Stopped;
        debug!("playback reached the last step");
        false
    }

    /// Manual navigation suspends automatic playback first
    fn suspend(&mut self) {
        if self.state == PlaybackState::Playing {
            self.disarm();
            self.state = PlaybackState::Paused;
        }
    }
}

/// Step-based playback engine
///
/// Owns an ordered sequence of opaque steps, a position into it, and the
/// timer that advances the position while playing. Every position change
/// is reported through a single registered callback (last registration
/// wins). The callback runs while the engine is locked, so it must not
/// call back into the engine; forward the step elsewhere instead.
pub struct PlaybackEngine<T> {
    session: Arc<Mutex<Session<T>>>,
    runtime: Handle,
}

impl<T: Send + 'static> PlaybackEngine<T> {
    /// Create an idle engine whose timers run on `runtime`
    pub fn new(runtime: Handle) -> Self {
        let session = Session {
            steps: Vec::new(),
            position: None,
            state: PlaybackState::Idle,
            speed: DEFAULT_SPEED,
            callback: None,
            timer: None,
            timers_armed: 0,
        };

        Self {
            session: Arc::new(Mutex::new(session)),
            runtime,
        }
    }

    /// Register the render callback, replacing any previous one
    pub fn set_step_callback<F>(&self, callback: F)
    where
        F: FnMut(Option<&T>) + Send + 'static,
    {
        self.session.lock().callback = Some(Box::new(callback));
    }

    /// Replace the step sequence and return to the before-first position
    pub fn set_steps(&self, steps: Vec<T>) {
        let mut session = self.session.lock();
        session.disarm();
        debug!(steps = steps.len(), "loading step sequence");
        session.steps = steps;
        session.position = None;
        session.state = PlaybackState::Idle;
        session.notify();
    }

    /// Start or resume automatic playback
    pub fn play(&self) {
        let mut session = self.session.lock();
        if session.steps.is_empty() || session.state == PlaybackState::Playing {
            return;
        }
        session.state = PlaybackState::Playing;
        self.arm(&mut session);
    }

    /// Suspend automatic playback, keeping the position
    pub fn pause(&self) {
        let mut session = self.session.lock();
        if session.state != PlaybackState::Playing {
            return;
        }
        session.disarm();
        session.state = PlaybackState::Paused;
        debug!(position = ?session.position, "playback paused");
    }

    /// End the current run, keeping the position
    pub fn stop(&self) {
        let mut session = self.session.lock();
        session.disarm();
        if session.state != PlaybackState::Idle {
            session.state = PlaybackState::Stopped;
        }
    }

    /// Stop and return to the before-first position
    pub fn reset(&self) {
        let mut session = self.session.lock();
        session.disarm();
        session.position = None;
        session.state = PlaybackState::Idle;
        session.notify();
    }

    /// Move one step forward; no-op at the last step
    ///
    /// Stepping forward while playing pauses automatic playback first.
    pub fn next_step(&self) {
        let mut session = self.session.lock();
        if !session.has_next() {
            return;
        }
        session.suspend();
        session.advance();
    }

    /// Move one step back; no-op at or before the first step
    ///
    /// The state is kept. While playing, the timer is re-armed so the
    /// next automatic step comes one full delay after this one.
    pub fn previous_step(&self) {
        let mut session = self.session.lock();
        let Some(position) = session.position.filter(|&idx| idx > 0) else {
            return;
        };
        session.position = Some(position - 1);
        session.notify();
        if session.state == PlaybackState::Playing {
            self.arm(&mut session);
        }
    }

    /// Set playback speed, clamped to 1..=10
    ///
    /// While playing, the running timer is replaced by one at the new delay.
    pub fn set_speed(&self, speed: i32) {
        let mut session = self.session.lock();
        session.speed = clamp_speed(speed);
        debug!(speed = session.speed, "playback speed changed");
        if session.state == PlaybackState::Playing {
            self.arm(&mut session);
        }
    }

    pub fn speed(&self) -> u8 {
        self.session.lock().speed
    }

    /// Delay between automatic steps at the current speed
    pub fn delay(&self) -> Duration {
        delay_for_speed(self.speed())
    }

    pub fn state(&self) -> PlaybackState {
        self.session.lock().state
    }

    pub fn is_playing(&self) -> bool {
        self.state() == PlaybackState::Playing
    }

    /// Current index, `None` before the first step
    pub fn position(&self) -> Option<usize> {
        self.session.lock().position
    }

    pub fn total_steps(&self) -> usize {
        self.session.lock().steps.len()
    }

    /// Whether the position is the last valid index (always true when empty)
    pub fn is_at_end(&self) -> bool {
        let session = self.session.lock();
        session.position == session.last_index()
    }

    /// Whether the position is at or before the first step
    pub fn is_at_start(&self) -> bool {
        self.session.lock().position.map_or(true, |idx| idx == 0)
    }

    /// One-based step counter and total, as shown to users
    pub fn progress(&self) -> (usize, usize) {
        let session = self.session.lock();
        (session.position.map_or(0, |idx| idx + 1), session.steps.len())
    }

    pub fn current_step(&self) -> Option<T>
    where
        T: Clone,
    {
        let session = self.session.lock();
        session.position.and_then(|idx| session.steps.get(idx).cloned())
    }

    /// Arm a fresh timer, disarming any previous one first
    fn arm(&self, session: &mut Session<T>) {
        session.disarm();
        session.timers_armed += 1;

        let id = session.timers_armed;
        let period = delay_for_speed(session.speed);
        let shared = Arc::downgrade(&self.session);

        debug!(timer = id, delay_ms = period.as_millis() as u64, "arming playback timer");
        session.timer = Some(TickTimer::spawn(&self.runtime, id, period, move || {
            let Some(shared) = shared.upgrade() else {
                return false;
            };
            let mut session = shared.lock();
            session.on_tick(id)
        }));
    }
}
