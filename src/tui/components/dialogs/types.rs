//! Core dialog types and traits
//!
//! Configuration, layout, errors and the host surface a dialog reports its
//! lifecycle to.

use super::controls::ControlId;
use ratatui::layout::Rect;
use serde::{Deserialize, Serialize};

/// Dialog positioning options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogPosition {
    /// Center the dialog in the available area
    #[default]
    Center,
    /// Position at specific coordinates (col, row) relative to the area
    Fixed(u16, u16),
    /// Position at top of screen
    Top,
    /// Position at bottom of screen
    Bottom,
}

/// Dialog size options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogSize {
    /// Fixed size in characters (width, height)
    Fixed(u16, u16),
    /// Percentage of available area (width_pct, height_pct)
    Percentage(u16, u16),
    /// Fit content with optional minimum size
    FitContent { min_width: u16, min_height: u16 },
    /// Full screen
    FullScreen,
}

impl Default for DialogSize {
    fn default() -> Self {
        Self::FitContent {
            min_width: 40,
            min_height: 10,
        }
    }
}

/// Dialog configuration options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogConfig {
    /// Position configuration
    pub position: DialogPosition,
    /// Size configuration
    pub size: DialogSize,
    /// Whether the Escape key closes the dialog
    pub closable: bool,
    /// Whether the built-in close control is rendered in the footer
    pub show_close_control: bool,
    /// Whether a click on the backdrop closes the dialog
    pub close_on_backdrop: bool,
    /// Whether dialog has a border
    pub has_border: bool,
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            position: DialogPosition::default(),
            size: DialogSize::Percentage(70, 70),
            closable: true,
            show_close_control: true,
            close_on_backdrop: false,
            has_border: true,
        }
    }
}

impl DialogConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_position(mut self, position: DialogPosition) -> Self {
        self.position = position;
        self
    }

    pub fn with_size(mut self, size: DialogSize) -> Self {
        self.size = size;
        self
    }

    pub fn closable(mut self, closable: bool) -> Self {
        self.closable = closable;
        self
    }

    pub fn with_close_control(mut self, show: bool) -> Self {
        self.show_close_control = show;
        self
    }

    pub fn close_on_backdrop(mut self, enabled: bool) -> Self {
        self.close_on_backdrop = enabled;
        self
    }

    pub fn with_border(mut self, has_border: bool) -> Self {
        self.has_border = has_border;
        self
    }

    pub fn validate(&self) -> DialogResult<()> {
        if let DialogSize::Percentage(w, h) = self.size {
            if w == 0 || h == 0 || w > 100 || h > 100 {
                return Err(DialogError::InvalidConfig(format!(
                    "percentage size must be within 1..=100, got {}x{}",
                    w, h
                )));
            }
        }
        Ok(())
    }
}

/// Dialog lifecycle events, forwarded to the application event loop
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DialogEvent {
    /// Dialog became visible and captured its focusable controls
    Opened { focusable: usize },
    /// Dialog was hidden and its focus trap discarded
    Closed,
    /// Close control, Escape or backdrop asked the host to close
    CloseRequested,
    /// Focus went back to the control that opened the dialog
    FocusRestored { trigger: ControlId },
    /// A control inside the dialog was activated with Enter, Space or a click
    ControlActivated { control: ControlId },
}

impl DialogEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Opened { .. } => "dialog_opened",
            Self::Closed => "dialog_closed",
            Self::CloseRequested => "dialog_close_requested",
            Self::FocusRestored { .. } => "dialog_focus_restored",
            Self::ControlActivated { .. } => "dialog_control_activated",
        }
    }
}

/// Result type for dialog operations
pub type DialogResult<T> = std::result::Result<T, DialogError>;

/// Dialog-specific error types
#[derive(Debug, thiserror::Error)]
pub enum DialogError {
    #[error("Invalid dialog configuration: {0}")]
    InvalidConfig(String),

    #[error("Control '{0}' is not part of the dialog")]
    UnknownControl(ControlId),

    #[error("Dialog is not open")]
    NotOpen,
}

/// The host a modal reports to
///
/// `on_close` always runs before `restore_focus` so host state is updated
/// before focus moves back onto the trigger.
pub trait ModalHost {
    /// Close handler supplied by the host
    fn on_close(&mut self);

    /// Move keyboard focus back onto the control that opened the dialog
    fn restore_focus(&mut self, trigger: &ControlId);

    /// Dialog became visible (scroll lock, background dimming)
    fn on_open_side_effect(&mut self) {}

    /// Dialog was hidden
    fn on_close_side_effect(&mut self) {}

    /// Dialog lifecycle notification
    fn on_dialog_event(&mut self, event: DialogEvent) {
        let _ = event;
    }
}

/// Helper struct for dialog layout calculations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogLayout {
    /// Full available area
    pub available_area: Rect,
    /// Dialog area (including border)
    pub dialog_area: Rect,
    /// Content area (excluding border)
    pub content_area: Rect,
}

impl DialogLayout {
    pub fn calculate(
        config: &DialogConfig,
        available_area: Rect,
        content_size: Option<(u16, u16)>,
    ) -> Self {
        let (width, height) = Self::calculate_size(config, available_area, content_size);
        let width = width.min(available_area.width);
        let height = height.min(available_area.height);
        let (x, y) = Self::calculate_position(config, available_area, width, height);

        let dialog_area = Rect {
            x,
            y,
            width,
            height,
        };

        let content_area = if config.has_border {
            Rect {
                x: dialog_area.x + 1,
                y: dialog_area.y + 1,
                width: dialog_area.width.saturating_sub(2),
                height: dialog_area.height.saturating_sub(2),
            }
        } else {
            dialog_area
        };

        Self {
            available_area,
            dialog_area,
            content_area,
        }
    }

    fn calculate_size(
        config: &DialogConfig,
        available_area: Rect,
        content_size: Option<(u16, u16)>,
    ) -> (u16, u16) {
        match config.size {
            DialogSize::Fixed(w, h) => (w, h),
            DialogSize::Percentage(w_pct, h_pct) => {
                let width = (available_area.width as u32 * w_pct as u32 / 100) as u16;
                let height = (available_area.height as u32 * h_pct as u32 / 100) as u16;
                (width, height)
            }
            DialogSize::FitContent { min_width, min_height } => {
                if let Some((content_w, content_h)) = content_size {
                    let width = content_w.max(min_width);
                    let height = content_h.max(min_height);

                    // Add border size if needed
                    if config.has_border {
                        (width.saturating_add(2), height.saturating_add(2))
                    } else {
                        (width, height)
                    }
                } else {
                    (min_width, min_height)
                }
            }
            DialogSize::FullScreen => (available_area.width, available_area.height),
        }
    }

    fn calculate_position(
        config: &DialogConfig,
        available_area: Rect,
        width: u16,
        height: u16,
    ) -> (u16, u16) {
        let centered_x = available_area.x + (available_area.width.saturating_sub(width)) / 2;
        match config.position {
            DialogPosition::Center => {
                let y = available_area.y + (available_area.height.saturating_sub(height)) / 2;
                (centered_x, y)
            }
            DialogPosition::Fixed(x, y) => (
                available_area.x + x.min(available_area.width.saturating_sub(width)),
                available_area.y + y.min(available_area.height.saturating_sub(height)),
            ),
            DialogPosition::Top => (centered_x, available_area.y),
            DialogPosition::Bottom => {
                let y = available_area.y + available_area.height.saturating_sub(height);
                (centered_x, y)
            }
        }
    }

    /// Check if a point is within the dialog area
    pub fn contains_point(&self, x: u16, y: u16) -> bool {
        let area = &self.dialog_area;
        x >= area.x && x < area.x + area.width && y >= area.y && y < area.y + area.height
    }
}
