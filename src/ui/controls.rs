use crate::playback::PlaybackState;

/// Which playback controls are usable right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlsState {
    Idle,
    /// Waiting on the step source
    Loading,
    Playing,
    Paused,
}

impl ControlsState {
    /// Controls for an engine in `state`; a finished run can be started again
    pub fn for_playback(state: PlaybackState) -> Self {
        match state {
            PlaybackState::Idle | PlaybackState::Stopped => Self::Idle,
            PlaybackState::Playing => Self::Playing,
            PlaybackState::Paused => Self::Paused,
        }
    }

    pub fn start_enabled(self) -> bool {
        matches!(self, Self::Idle | Self::Paused)
    }

    pub fn pause_enabled(self) -> bool {
        self == Self::Playing
    }

    pub fn step_enabled(self) -> bool {
        self == Self::Paused
    }

    pub fn reset_enabled(self) -> bool {
        self != Self::Loading
    }

    pub fn start_label(self) -> &'static str {
        match self {
            Self::Loading => "Loading...",
            Self::Paused => "Resume",
            Self::Idle | Self::Playing => "Start",
        }
    }

    /// One-line summary, disabled controls in brackets
    pub fn render(self) -> String {
        let button = |label: &str, enabled: bool| {
            if enabled {
                label.to_string()
            } else {
                format!("[{label}]")
            }
        };

        [
            button(self.start_label(), self.start_enabled()),
            button("Pause", self.pause_enabled()),
            button("Step", self.step_enabled()),
            button("Reset", self.reset_enabled()),
        ]
        .join("  ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enabled_controls() {
        assert!(ControlsState::Idle.start_enabled());
        assert!(!ControlsState::Idle.pause_enabled());
        assert!(!ControlsState::Idle.step_enabled());

        assert!(!ControlsState::Loading.start_enabled());
        assert!(!ControlsState::Loading.pause_enabled());
        assert!(!ControlsState::Loading.step_enabled());
        assert!(!ControlsState::Loading.reset_enabled());

        assert!(!ControlsState::Playing.start_enabled());
        assert!(ControlsState::Playing.pause_enabled());
        assert!(!ControlsState::Playing.step_enabled());

        assert!(ControlsState::Paused.start_enabled());
        assert!(!ControlsState::Paused.pause_enabled());
        assert!(ControlsState::Paused.step_enabled());
    }

    #[test]
    fn test_follows_playback() {
        assert_eq!(ControlsState::for_playback(PlaybackState::Stopped), ControlsState::Idle);
        assert_eq!(ControlsState::for_playback(PlaybackState::Paused), ControlsState::Paused);
        assert_eq!(ControlsState::for_playback(PlaybackState::Playing), ControlsState::Playing);
    }

    #[test]
    fn test_render() {
        assert_eq!(ControlsState::Paused.render(), "Resume  [Pause]  Step  Reset");
        assert_eq!(
            ControlsState::Loading.render(),
            "[Loading...]  [Pause]  [Step]  [Reset]"
        );
    }
}
