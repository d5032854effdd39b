use std::fmt;

/// Keyboard shortcut manager
///
/// The terminal reads whole lines, so a "key" is what the user typed
/// before pressing Enter. Arrow keys arrive as ANSI escape sequences.
pub struct ShortcutManager {
    shortcuts: Vec<Shortcut>,
}

#[derive(Clone)]
pub struct Shortcut {
    pub key: Key,
    pub action: ShortcutAction,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Space,
    ArrowLeft,
    ArrowRight,
    Char(char),
}

impl Key {
    /// Interpret one typed line; an empty line counts as Space
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return Some(Self::Space);
        }

        match line.trim().to_ascii_lowercase().as_str() {
            "\x1b[c" | "right" => Some(Self::ArrowRight),
            "\x1b[d" | "left" => Some(Self::ArrowLeft),
            "space" => Some(Self::Space),
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(Self::Char(c)),
                    _ => None,
                }
            }
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Space => write!(f, "Space"),
            Self::ArrowLeft => write!(f, "←"),
            Self::ArrowRight => write!(f, "→"),
            Self::Char(c) => write!(f, "{c}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    PlayPause,
    Stop,
    StepForward,
    StepBack,
    Reset,
    SpeedUp,
    SpeedDown,
    /// Typed as `speed <n>`
    SetSpeed(i32),
    Help,
    Quit,
}

impl ShortcutManager {
    pub fn new() -> Self {
        let mut manager = Self {
            shortcuts: Vec::new(),
        };
        manager.register_defaults();
        manager
    }

    fn register_defaults(&mut self) {
        // Playback controls
        self.register(Key::Space, ShortcutAction::PlayPause, "Play/Pause");
        self.register(Key::Char('s'), ShortcutAction::Stop, "Stop");
        self.register(Key::Char('r'), ShortcutAction::Reset, "Reset");

        // Navigation
        self.register(Key::Char('n'), ShortcutAction::StepForward, "Step Forward");
        self.register(Key::ArrowRight, ShortcutAction::StepForward, "Step Forward");
        self.register(Key::Char('p'), ShortcutAction::StepBack, "Step Back");
        self.register(Key::ArrowLeft, ShortcutAction::StepBack, "Step Back");
        self.register(Key::Char('+'), ShortcutAction::SpeedUp, "Speed Up");
        self.register(Key::Char('-'), ShortcutAction::SpeedDown, "Speed Down");

        // Other
        self.register(Key::Char('?'), ShortcutAction::Help, "Show Shortcuts");
        self.register(Key::Char('q'), ShortcutAction::Quit, "Quit");
    }

    fn register(&mut self, key: Key, action: ShortcutAction, description: &str) {
        self.shortcuts.push(Shortcut {
            key,
            action,
            description: description.to_string(),
        });
    }

    pub fn shortcuts(&self) -> &[Shortcut] {
        &self.shortcuts
    }

    /// Action bound to `key`, if any
    pub fn process_key(&self, key: Key) -> Option<ShortcutAction> {
        self.shortcuts
            .iter()
            .find(|shortcut| shortcut.key == key)
            .map(|shortcut| shortcut.action)
    }

    /// Map a typed line to an action
    pub fn process_line(&self, line: &str) -> Option<ShortcutAction> {
        let trimmed = line.trim();
        if let Some(value) = trimmed.strip_prefix("speed ") {
            return value.trim().parse().ok().map(ShortcutAction::SetSpeed);
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "help" => return Some(ShortcutAction::Help),
            "quit" | "exit" => return Some(ShortcutAction::Quit),
            _ => {}
        }
        Key::parse(line).and_then(|key| self.process_key(key))
    }

    /// Help text listing every shortcut by category
    pub fn render_help(&self) -> String {
        let mut out = String::from("Keyboard Shortcuts (type, then Enter)\n");
        let mut current_category = "";

        for shortcut in &self.shortcuts {
            let category = match shortcut.action {
                ShortcutAction::PlayPause | ShortcutAction::Stop | ShortcutAction::Reset => "Playback",
                ShortcutAction::StepForward
                | ShortcutAction::StepBack
                | ShortcutAction::SpeedUp
                | ShortcutAction::SpeedDown
                | ShortcutAction::SetSpeed(_) => "Navigation",
                ShortcutAction::Help | ShortcutAction::Quit => "General",
            };

            if category != current_category {
                out.push_str(category);
                out.push('\n');
                current_category = category;
            }
            out.push_str(&format!("  {:8} - {}\n", shortcut.key.to_string(), shortcut.description));
        }

        out.push_str("  speed N  - Set speed (1-10)\n");
        out
    }
}

impl Default for ShortcutManager {
    fn default() -> Self {
        Self::new()
    }
}
