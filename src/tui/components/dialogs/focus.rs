//! Focus trap for modal dialogs
//!
//! While a dialog is open, Tab and Shift+Tab only move between the controls
//! captured when it opened. Moving past either end wraps around and suppresses
//! the default traversal, so focus never reaches the page underneath.

use super::controls::ControlId;
use tracing::{debug, warn};

/// Where keyboard focus currently sits inside a dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FocusTarget {
    /// One of the captured controls
    Control(ControlId),
    /// The dialog container itself, used when nothing inside is focusable
    Container,
}

impl FocusTarget {
    pub fn control_id(&self) -> Option<&ControlId> {
        match self {
            Self::Control(id) => Some(id),
            Self::Container => None,
        }
    }
}

/// Result of a Tab key press inside the trap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabOutcome {
    /// Focus after the key press
    pub target: FocusTarget,
    /// True when the trap wrapped focus and the default traversal was suppressed
    pub default_prevented: bool,
}

/// Ordered focusable list captured when a dialog becomes visible
#[derive(Debug, Clone)]
pub struct FocusTrap {
    focusable: Vec<ControlId>,
    focused: FocusTarget,
}

impl FocusTrap {
    /// Capture the focusable list and focus the first entry, or the container
    /// when the list is empty
    pub fn capture(focusable: Vec<ControlId>) -> Self {
        let focused = first_target(&focusable);
        debug!(count = focusable.len(), ?focused, "Captured focus trap");
        Self { focusable, focused }
    }

    pub fn focusable(&self) -> &[ControlId] {
        &self.focusable
    }

    pub fn focused(&self) -> &FocusTarget {
        &self.focused
    }

    pub fn contains(&self, id: &ControlId) -> bool {
        self.focusable.contains(id)
    }

    fn position(&self) -> Option<usize> {
        let id = self.focused.control_id()?;
        self.focusable.iter().position(|candidate| candidate == id)
    }

    /// Handle Tab (`backward == false`) or Shift+Tab (`backward == true`)
    pub fn advance(&mut self, backward: bool) -> TabOutcome {
        let len = self.focusable.len();
        if len == 0 {
            self.focused = FocusTarget::Container;
            return TabOutcome {
                target: FocusTarget::Container,
                default_prevented: true,
            };
        }

        let (next, default_prevented) = match (self.position(), backward) {
            (Some(0), true) => (len - 1, true),
            (Some(p), false) if p + 1 == len => (0, true),
            (Some(p), true) => (p - 1, false),
            (Some(p), false) => (p + 1, false),
            // Focus is on the container or on something no longer captured
            (None, true) => (len - 1, true),
            (None, false) => (0, true),
        };

        self.focused = FocusTarget::Control(self.focusable[next].clone());
        debug!(focused = ?self.focused, backward, default_prevented, "Focus moved");

        TabOutcome {
            target: self.focused.clone(),
            default_prevented,
        }
    }

    /// Focus a specific control. Controls outside the trap are refused.
    pub fn focus(&mut self, id: &ControlId) -> bool {
        if self.contains(id) {
            self.focused = FocusTarget::Control(id.clone());
            true
        } else {
            warn!(control = %id, "Refused focus outside the dialog");
            false
        }
    }

    /// Replace the captured list after the dialog content changed. Focus is
    /// kept when the focused control survives, otherwise it resets to the
    /// first entry.
    pub fn recapture(&mut self, focusable: Vec<ControlId>) {
        self.focusable = focusable;
        let survives = self
            .focused
            .control_id()
            .map(|id| self.focusable.contains(id))
            .unwrap_or(false);

        if !survives {
            self.focused = first_target(&self.focusable);
        }
        debug!(count = self.focusable.len(), focused = ?self.focused, "Recaptured focus trap");
    }
}

fn first_target(focusable: &[ControlId]) -> FocusTarget {
    focusable
        .first()
        .cloned()
        .map(FocusTarget::Control)
        .unwrap_or(FocusTarget::Container)
}
