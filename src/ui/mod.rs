pub mod controls;
pub mod session;
pub mod settings;
pub mod shortcuts;
pub mod visualizer;

pub use controls::ControlsState;
pub use session::{Outcome, Session};
pub use settings::AppSettings;
pub use shortcuts::{ShortcutAction, ShortcutManager};
pub use visualizer::Visualizer;
