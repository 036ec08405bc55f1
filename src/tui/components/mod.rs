pub mod dialogs;

use crate::tui::{styles::Theme, Frame};
use anyhow::Result;
use async_trait::async_trait;
use ratatui::layout::Rect;

/// Base trait for all UI components
#[async_trait]
pub trait Component: Send + Sync {
    /// Handle periodic updates
    async fn tick(&mut self) -> Result<()> {
        Ok(())
    }

    /// Render the component
    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme);

    /// Get component dimensions
    fn size(&self) -> Rect;

    /// Set component dimensions
    fn set_size(&mut self, size: Rect);

    /// Check if component has focus
    fn has_focus(&self) -> bool {
        false
    }

    /// Set component focus
    fn set_focus(&mut self, focus: bool) {
        let _ = focus;
    }

    /// Check if component is visible
    fn is_visible(&self) -> bool {
        true
    }
}

/// Base component state
#[derive(Debug, Clone)]
pub struct ComponentState {
    pub size: Rect,
    pub has_focus: bool,
    pub is_visible: bool,
}

impl Default for ComponentState {
    fn default() -> Self {
        Self {
            size: Rect::default(),
            has_focus: false,
            is_visible: true,
        }
    }
}

impl ComponentState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_visibility(mut self, visible: bool) -> Self {
        self.is_visible = visible;
        self
    }
}
