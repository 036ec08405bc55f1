use crate::{
    config::Config,
    tui::{
        components::dialogs::PortalRoot,
        events::Event,
        keys::KeyMap,
        pages::{home::HostPage, Page},
        styles::Theme,
        Frame,
    },
};
use anyhow::Result;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use tokio::sync::mpsc;
use tracing::debug;

/// Main application state and controller
pub struct App {
    /// Whether the application should quit
    pub should_quit: bool,

    /// Current application dimensions
    pub size: Rect,

    /// Key mappings for the application
    pub key_map: KeyMap,

    /// Page hosting the dialog
    pub page: HostPage,

    /// Dialog layers attached after the page is drawn
    pub portal: PortalRoot,

    /// Current theme for styling
    pub theme: Theme,

    /// Status message to display
    pub status_message: Option<String>,

    /// Show help overlay
    pub show_help: bool,

    /// Enable mouse support
    pub mouse_enabled: bool,

    /// Event receiver for internal communication
    pub event_receiver: mpsc::UnboundedReceiver<Event>,
}

impl App {
    /// Create a new application instance
    pub fn new(config: &Config) -> Result<Self> {
        let (event_sender, event_receiver) = mpsc::unbounded_channel();
        let page = HostPage::new(config)?.with_events(event_sender);

        Ok(Self {
            should_quit: false,
            size: Rect::default(),
            key_map: KeyMap::default(),
            page,
            portal: PortalRoot::new(config.background_dim),
            theme: Theme::default(),
            status_message: None,
            show_help: false,
            mouse_enabled: config.mouse_enabled,
            event_receiver,
        })
    }

    /// Handle incoming events
    pub async fn handle_event(&mut self, event: Event) -> Result<bool> {
        match event {
            Event::Key(key_event) => {
                if self.key_map.should_quit(&key_event) {
                    self.should_quit = true;
                    return Ok(true);
                }

                if self.key_map.should_show_help(&key_event) {
                    self.show_help = !self.show_help;
                    return Ok(false);
                }

                if self.key_map.should_open_without_trigger(&key_event) {
                    if !self.page.modal().is_open() {
                        self.page.open_dialog(None);
                    }
                } else {
                    self.page.handle_key_event(key_event).await?;
                }
            }

            Event::Mouse(mouse_event) => {
                if self.mouse_enabled {
                    self.page.handle_mouse_event(mouse_event).await?;
                }
            }

            Event::Resize(width, height) => {
                self.size = Rect::new(0, 0, width, height);
                self.page.on_resize(self.size);
            }

            Event::Tick => {
                self.page.tick().await?;
            }

            other => self.handle_internal(other),
        }

        // Process events raised by the page while handling this one
        while let Ok(internal_event) = self.event_receiver.try_recv() {
            self.handle_internal(internal_event);
        }

        Ok(self.should_quit)
    }

    fn handle_internal(&mut self, event: Event) {
        match event {
            Event::StatusMessage(message) => {
                self.status_message = Some(message);
            }
            Event::Custom(name, payload) => {
                debug!(name = %name, payload = %payload, "Custom event");
            }
            other => {
                debug!(event = ?other, "Unexpected internal event");
            }
        }
    }

    /// Render the application UI
    pub fn render(&mut self, frame: &mut Frame) {
        self.size = frame.size();
        self.page.on_resize(self.size);

        // Create main layout
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),    // Main content
                Constraint::Length(1), // Status bar
            ])
            .split(self.size);

        self.page.render(frame, chunks[0], &self.theme);
        self.render_status_bar(frame, chunks[1]);

        if let Some((target, layer)) = self.page.overlay() {
            self.portal.attach(target, layer);
        }
        self.portal.flush(frame, &self.theme);

        // Render help overlay if enabled
        if self.show_help {
            self.render_help_overlay(frame);
        }
    }

    /// Render the status bar
    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let status_text = if let Some(ref message) = self.status_message {
            message.clone()
        } else {
            format!(
                "Focus: {} | Press Ctrl+G for help | Ctrl+C to quit",
                self.page.focused().map_or("none", |id| id.as_str())
            )
        };

        let status_paragraph = Paragraph::new(status_text).style(self.theme.status_bar_style());

        frame.render_widget(status_paragraph, area);
    }

    /// Render help overlay
    fn render_help_overlay(&self, frame: &mut Frame) {
        let help_area = centered_rect(60, 50, frame.size());

        let mut help_text = self.key_map.help_text();
        for (key, description) in self.page.help_text() {
            help_text.push_str(&format!("\n{:<16} {}", key, description));
        }

        let help_block = Block::default()
            .borders(Borders::ALL)
            .title("Help")
            .style(self.theme.help_style());

        let help_paragraph = Paragraph::new(help_text)
            .block(help_block)
            .style(self.theme.text_style());

        frame.render_widget(Clear, help_area);
        frame.render_widget(help_paragraph, help_area);
    }
}

/// Create a centered rectangle with given percentage of the screen
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
