pub mod home;

use crate::tui::{
    components::dialogs::{DialogLayer, RenderTarget},
    styles::Theme,
    Frame,
};
use anyhow::Result;
use async_trait::async_trait;
use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::layout::Rect;

/// Page identifier type
pub type PageId = String;

/// Base trait for all pages
#[async_trait]
pub trait Page: Send + Sync {
    /// Get the page ID
    fn id(&self) -> &PageId;

    /// Get the page title
    fn title(&self) -> &str;

    /// Handle keyboard input
    async fn handle_key_event(&mut self, event: KeyEvent) -> Result<()>;

    /// Handle mouse input
    async fn handle_mouse_event(&mut self, event: MouseEvent) -> Result<()>;

    /// Handle periodic updates
    async fn tick(&mut self) -> Result<()>;

    /// Render the page
    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme);

    /// Called when the screen is resized
    fn on_resize(&mut self, _area: Rect) {
        // Default implementation
    }

    /// Layer to attach above the page, if any
    fn overlay(&self) -> Option<(RenderTarget, DialogLayer)> {
        None
    }

    /// Get page-specific help text
    fn help_text(&self) -> Vec<(&str, &str)> {
        vec![]
    }
}
