use anyhow::{anyhow, Result};
use clap::Args;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::Config;
use crate::tui::{App, Event};

/// Replay a key sequence against the demo page without a terminal
#[derive(Args)]
pub struct RunCommand {
    /// Comma-separated keys, e.g. "tab,tab,enter,shift+tab,esc"
    #[arg(short = 'k', long = "keys", default_value = "tab,tab,enter,tab,tab,esc")]
    pub keys: String,

    /// Print one JSON object per step
    #[arg(long = "json")]
    pub json: bool,

    /// Print the accessibility tree after the last key
    #[arg(long = "tree")]
    pub tree: bool,
}

/// Page state after one replayed key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
    pub key: String,
    pub open: bool,
    pub focused: Option<String>,
    pub trigger: Option<String>,
    pub overlay: bool,
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:<10} open={:<5} focused={:<12} trigger={:<12} overlay={}",
            self.key,
            self.open,
            self.focused.as_deref().unwrap_or("-"),
            self.trigger.as_deref().unwrap_or("-"),
            self.overlay
        )
    }
}

impl RunCommand {
    pub async fn execute(&self, config: &Config) -> Result<()> {
        debug!("Executing run command");

        let keys = parse_keys(&self.keys)?;
        info!(count = keys.len(), "Replaying keys");

        let mut app = App::new(config)?;
        let steps = replay(&mut app, &keys).await?;

        for step in &steps {
            if self.json {
                println!("{}", serde_json::to_string(step)?);
            } else {
                println!("{}", step);
            }
        }

        if self.tree {
            println!("{}", serde_json::to_string_pretty(&app.page.accessibility_tree())?);
        }

        Ok(())
    }
}

/// Feed every key through the application and record the page after each
async fn replay(app: &mut App, keys: &[(String, KeyEvent)]) -> Result<Vec<Step>> {
    let mut steps = Vec::with_capacity(keys.len());

    for (name, key) in keys {
        if app.handle_event(Event::Key(*key)).await? {
            debug!("Quit requested, stopping replay");
            break;
        }

        let state = app.page.state();
        steps.push(Step {
            key: name.clone(),
            open: state.is_open,
            focused: app.page.focused().map(|id| id.to_string()),
            trigger: state.trigger.as_ref().map(|id| id.to_string()),
            overlay: state.overlay_active,
        });
    }

    Ok(steps)
}

fn parse_keys(script: &str) -> Result<Vec<(String, KeyEvent)>> {
    script.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| Ok((name.to_string(), parse_key(name)?)))
        .collect()
}

fn parse_key(name: &str) -> Result<KeyEvent> {
    let lower = name.to_ascii_lowercase();
    let (modifiers, base) = match lower.strip_prefix("ctrl+") {
        Some(rest) => (KeyModifiers::CONTROL, rest),
        None => match lower.strip_prefix("shift+") {
            Some(rest) => (KeyModifiers::SHIFT, rest),
            None => (KeyModifiers::NONE, lower.as_str()),
        },
    };

    let code = match base {
        "tab" if modifiers == KeyModifiers::SHIFT => KeyCode::BackTab,
        "tab" => KeyCode::Tab,
        "backtab" => KeyCode::BackTab,
        "enter" | "return" => KeyCode::Enter,
        "esc" | "escape" => KeyCode::Esc,
        "space" => KeyCode::Char(' '),
        "backspace" => KeyCode::Backspace,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        other => {
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => return Err(anyhow!("Unknown key '{}'", name)),
            }
        }
    };

    Ok(KeyEvent::new(code, modifiers))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keys() {
        let keys = parse_keys("tab, shift+tab ,ctrl+o,esc,x").unwrap();
        let codes: Vec<KeyCode> = keys.iter().map(|(_, key)| key.code).collect();

        assert_eq!(
            codes,
            vec![KeyCode::Tab, KeyCode::BackTab, KeyCode::Char('o'), KeyCode::Esc, KeyCode::Char('x')]
        );
        assert_eq!(keys[2].1.modifiers, KeyModifiers::CONTROL);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        assert!(parse_keys("tab,pageup").is_err());
    }

    #[tokio::test]
    async fn test_replay_open_and_escape() {
        let mut app = App::new(&Config::default()).unwrap();
        let keys = parse_keys("tab,tab,enter,tab,tab,esc").unwrap();
        let steps = replay(&mut app, &keys).await.unwrap();

        let focused: Vec<Option<&str>> = steps.iter().map(|step| step.focused.as_deref()).collect();
        assert_eq!(
            focused,
            vec![
                Some("bbc-news"),
                Some("open-modal"),
                Some("google"),
                Some("modal-close"),
                Some("google"),
                Some("open-modal"),
            ]
        );
        assert!(steps[2].open && steps[2].overlay);
        assert_eq!(steps[2].trigger.as_deref(), Some("open-modal"));
        assert!(!steps[5].open && !steps[5].overlay);
    }

    #[tokio::test]
    async fn test_replay_stops_on_quit() {
        let mut app = App::new(&Config::default()).unwrap();
        let keys = parse_keys("tab,ctrl+c,tab").unwrap();
        let steps = replay(&mut app, &keys).await.unwrap();

        assert_eq!(steps.len(), 1);
    }

    #[test]
    fn test_step_serializes() {
        let step = Step {
            key: "esc".to_string(),
            open: false,
            focused: Some("open-modal".to_string()),
            trigger: None,
            overlay: false,
        };
        let value = serde_json::to_value(&step).unwrap();
        assert_eq!(value["focused"], "open-modal");
        assert!(value["trigger"].is_null());
    }
}
