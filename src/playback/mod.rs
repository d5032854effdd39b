pub mod engine;
pub mod timer;

pub use engine::{PlaybackEngine, StepCallback};

use std::time::Duration;

/// Slowest playback speed
pub const MIN_SPEED: u8 = 1;

/// Fastest playback speed
pub const MAX_SPEED: u8 = 10;

/// Speed a fresh engine starts at
pub const DEFAULT_SPEED: u8 = 5;

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// Never played, or fully reset
    Idle,
    /// Timer armed, auto-advancing
    Playing,
    /// Timer disarmed, position retained, resumable
    Paused,
    /// Steps exhausted or explicitly stopped
    Stopped,
}

impl PlaybackState {
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::Stopped => "stopped",
        }
    }
}

/// Clamp arbitrary speed input into `MIN_SPEED..=MAX_SPEED`
pub fn clamp_speed(speed: i32) -> u8 {
    speed.clamp(MIN_SPEED as i32, MAX_SPEED as i32) as u8
}

/// Inter-step delay for a speed: 2000ms at speed 1 down to 200ms at speed 10
pub fn delay_for_speed(speed: u8) -> Duration {
    let speed = speed.clamp(MIN_SPEED, MAX_SPEED) as u64;
    Duration::from_millis(2200 - speed * 200)
}
