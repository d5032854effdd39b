use crate::core::{Algorithm, AlgorithmInput, StepBatch, StepFrame};
use crate::input::{StepResult, StepSource};
use crate::playback::PlaybackEngine;
use crate::ui::controls::ControlsState;
use crate::ui::shortcuts::{ShortcutAction, ShortcutManager};
use crate::ui::visualizer::Visualizer;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// What the caller should do after an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    /// Show this text to the user
    Message(String),
    Quit,
}

/// One interactive visualization: engine, renderer and controls
///
/// The engine callback only forwards frames over a channel; the owner
/// pulls them with `next_frame` and renders outside the engine lock.
pub struct Session {
    engine: PlaybackEngine<StepFrame>,
    frames: mpsc::UnboundedReceiver<Option<StepFrame>>,
    visualizer: Visualizer,
    shortcuts: ShortcutManager,
    batch: Option<StepBatch>,
    loading: bool,
}

impl Session {
    pub fn new(runtime: Handle, algorithm: Algorithm, speed: i32) -> Self {
        let engine = PlaybackEngine::new(runtime);
        engine.set_speed(speed);

        let (tx, frames) = mpsc::unbounded_channel();
        engine.set_step_callback(move |frame: Option<&StepFrame>| {
            // receiver gone means the session is shutting down
            let _ = tx.send(frame.cloned());
        });

        Self {
            engine,
            frames,
            visualizer: Visualizer::new(algorithm),
            shortcuts: ShortcutManager::new(),
            batch: None,
            loading: false,
        }
    }

    pub fn engine(&self) -> &PlaybackEngine<StepFrame> {
        &self.engine
    }

    pub fn visualizer_mut(&mut self) -> &mut Visualizer {
        &mut self.visualizer
    }

    pub fn batch(&self) -> Option<&StepBatch> {
        self.batch.as_ref()
    }

    pub fn controls(&self) -> ControlsState {
        if self.loading {
            ControlsState::Loading
        } else {
            ControlsState::for_playback(self.engine.state())
        }
    }

    /// Fetch steps for `algorithm` and hand them to the engine
    ///
    /// On failure the previously loaded steps stay in place.
    pub async fn load(
        &mut self,
        source: &dyn StepSource,
        algorithm: Algorithm,
        input: &AlgorithmInput,
    ) -> StepResult<usize> {
        self.engine.stop();
        self.loading = true;
        info!(source = source.name(), %algorithm, "Loading steps");

        let result = source.fetch(algorithm, input).await;
        self.loading = false;

        match result {
            Ok(batch) => Ok(self.show_batch(batch)),
            Err(e) => {
                warn!(error = %e, %algorithm, "Failed to load steps");
                Err(e)
            }
        }
    }

    /// Replace the current run with `batch`, returning its step count
    pub fn show_batch(&mut self, batch: StepBatch) -> usize {
        let frames = batch.frames();
        let total = frames.len();
        if total == 0 {
            warn!(algorithm = %batch.algorithm, "Step source returned no steps");
        }

        self.visualizer.load(batch.algorithm, total);
        self.engine.set_steps(frames);
        self.batch = Some(batch);
        total
    }

    /// Next frame the engine reported, `None` inside for a cleared display
    pub async fn next_frame(&mut self) -> Option<Option<StepFrame>> {
        self.frames.recv().await
    }

    /// Frames already reported but not yet pulled, oldest first
    pub fn drain_frames(&mut self) -> Vec<Option<StepFrame>> {
        let mut frames = Vec::new();
        while let Ok(frame) = self.frames.try_recv() {
            frames.push(frame);
        }
        frames
    }

    /// Whether no further frame will arrive without user input
    ///
    /// True while still playing once the last step is reached, since the
    /// closing tick only stops the engine and reports nothing.
    pub fn run_finished(&self) -> bool {
        !self.engine.is_playing() || self.engine.is_at_end()
    }

    /// Interpret a typed line; unknown input yields a hint
    pub fn handle_line(&mut self, line: &str) -> Outcome {
        match self.shortcuts.process_line(line) {
            Some(action) => self.apply(action),
            None => Outcome::Message(format!("Unknown command {:?}, type ? for help", line.trim())),
        }
    }

    pub fn apply(&mut self, action: ShortcutAction) -> Outcome {
        let controls = self.controls();
        if controls == ControlsState::Loading && action != ShortcutAction::Quit {
            return Outcome::Continue;
        }

        match action {
            ShortcutAction::PlayPause => {
                if controls.start_enabled() {
                    // a finished run starts over
                    if self.engine.total_steps() > 0 && self.engine.is_at_end() {
                        self.engine.reset();
                    }
                    self.engine.play();
                } else if controls.pause_enabled() {
                    self.engine.pause();
                }
            }
            ShortcutAction::Stop => self.engine.stop(),
            ShortcutAction::StepForward => self.engine.next_step(),
            ShortcutAction::StepBack => self.engine.previous_step(),
            ShortcutAction::Reset => self.engine.reset(),
            ShortcutAction::SpeedUp => return self.change_speed(self.engine.speed() as i32 + 1),
            ShortcutAction::SpeedDown => return self.change_speed(self.engine.speed() as i32 - 1),
            ShortcutAction::SetSpeed(speed) => return self.change_speed(speed),
            ShortcutAction::Help => return Outcome::Message(self.shortcuts.render_help()),
            ShortcutAction::Quit => {
                self.engine.stop();
                return Outcome::Quit;
            }
        }
        Outcome::Continue
    }

    fn change_speed(&mut self, speed: i32) -> Outcome {
        self.engine.set_speed(speed);
        Outcome::Message(format!(
            "Speed {} ({} ms per step)",
            self.engine.speed(),
            self.engine.delay().as_millis()
        ))
    }

    /// Progress, speed and control summary
    pub fn status_line(&self) -> String {
        let (current, total) = self.engine.progress();
        format!(
            "[{}/{}] {} | speed {} | {}",
            current,
            total,
            self.engine.state().label(),
            self.engine.speed(),
            self.controls().render()
        )
    }

    /// Frame display followed by the status line
    pub fn render(&self, frame: Option<&StepFrame>) -> String {
        format!("{}\n{}\n", self.visualizer.render(frame), self.status_line())
    }
}
