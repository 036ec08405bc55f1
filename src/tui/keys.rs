use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Key binding configuration
#[derive(Debug, Clone)]
pub struct KeyBinding {
    pub key: KeyCode,
    pub modifiers: KeyModifiers,
    pub label: String,
    pub description: String,
}

impl KeyBinding {
    pub fn new(key: KeyCode, modifiers: KeyModifiers, label: &str, description: &str) -> Self {
        Self {
            key,
            modifiers,
            label: label.to_string(),
            description: description.to_string(),
        }
    }

    pub fn matches(&self, event: &KeyEvent) -> bool {
        self.key == event.code && self.modifiers == event.modifiers
    }
}

/// Application key mappings
#[derive(Debug, Clone)]
pub struct KeyMap {
    /// Quit application
    pub quit: KeyBinding,

    /// Show help
    pub help: KeyBinding,

    /// Open the dialog with no trigger to return to
    pub open_without_trigger: KeyBinding,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            quit: KeyBinding::new(
                KeyCode::Char('c'),
                KeyModifiers::CONTROL,
                "Ctrl+C",
                "Quit application",
            ),
            help: KeyBinding::new(
                KeyCode::Char('g'),
                KeyModifiers::CONTROL,
                "Ctrl+G",
                "Show/hide help",
            ),
            open_without_trigger: KeyBinding::new(
                KeyCode::Char('o'),
                KeyModifiers::CONTROL,
                "Ctrl+O",
                "Open dialog without a trigger",
            ),
        }
    }
}

impl KeyMap {
    /// Check if the event should quit the application
    pub fn should_quit(&self, event: &KeyEvent) -> bool {
        self.quit.matches(event)
    }

    /// Check if the event should show help
    pub fn should_show_help(&self, event: &KeyEvent) -> bool {
        self.help.matches(event)
    }

    /// Check if the event should open the dialog without a trigger
    pub fn should_open_without_trigger(&self, event: &KeyEvent) -> bool {
        self.open_without_trigger.matches(event)
    }

    /// Get help text for all key bindings
    pub fn help_text(&self) -> String {
        [&self.quit, &self.help, &self.open_without_trigger]
            .iter()
            .map(|binding| format!("{:<16} {}", binding.label, binding.description))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bindings_require_modifiers() {
        let keys = KeyMap::default();
        assert!(keys.should_quit(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!keys.should_quit(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE)));
        assert!(keys.should_open_without_trigger(&KeyEvent::new(
            KeyCode::Char('o'),
            KeyModifiers::CONTROL
        )));
    }

    #[test]
    fn test_help_text_lists_bindings() {
        let text = KeyMap::default().help_text();
        assert_eq!(text.lines().count(), 3);
        assert!(text.contains("Ctrl+G"));
    }
}
