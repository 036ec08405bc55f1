use ratatui::style::{Color, Modifier, Style};

/// Application theme configuration
#[derive(Debug, Clone)]
pub struct Theme {
    /// Primary colors
    pub primary: Color,
    pub accent: Color,

    /// Text colors
    pub text: Color,
    pub text_dim: Color,
    pub text_bright: Color,

    /// Background colors
    pub background: Color,
    pub background_alt: Color,
    pub dialog_background: Color,
    pub overlay: Color,

    /// Border colors
    pub border: Color,
    pub border_focused: Color,

    /// Special colors
    pub link: Color,
    pub selection: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Create a dark theme
    pub fn dark() -> Self {
        Self {
            primary: Color::Rgb(147, 51, 234),    // Purple
            accent: Color::Rgb(236, 72, 153),     // Pink

            text: Color::Rgb(248, 250, 252),      // Slate-50
            text_dim: Color::Rgb(148, 163, 184),  // Slate-400
            text_bright: Color::Rgb(255, 255, 255), // White

            background: Color::Rgb(15, 23, 42),   // Slate-900
            background_alt: Color::Rgb(30, 41, 59), // Slate-800
            dialog_background: Color::Rgb(51, 65, 85), // Slate-700
            overlay: Color::Rgb(2, 6, 23),        // Slate-950

            border: Color::Rgb(71, 85, 105),      // Slate-600
            border_focused: Color::Rgb(147, 51, 234), // Purple

            link: Color::Rgb(96, 165, 250),       // Blue-400
            selection: Color::Rgb(30, 58, 138),   // Blue-900
        }
    }

    /// Base style for normal elements
    pub fn base_style(&self) -> Style {
        Style::default()
            .fg(self.text)
            .bg(self.background)
    }

    /// Style for text content
    pub fn text_style(&self) -> Style {
        Style::default().fg(self.text)
    }

    /// Style for page headings
    pub fn heading_style(&self) -> Style {
        Style::default()
            .fg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for borders
    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    /// Style for focused borders
    pub fn focused_border_style(&self) -> Style {
        Style::default()
            .fg(self.border_focused)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for unfocused links and buttons
    pub fn control_style(&self) -> Style {
        Style::default()
            .fg(self.link)
            .add_modifier(Modifier::UNDERLINED)
    }

    /// Style for the focused control
    pub fn selection_style(&self) -> Style {
        Style::default()
            .bg(self.selection)
            .fg(self.text_bright)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for the dialog surface
    pub fn dialog_style(&self) -> Style {
        Style::default()
            .fg(self.text)
            .bg(self.dialog_background)
    }

    /// Style for the dialog title
    pub fn dialog_title_style(&self) -> Style {
        self.dialog_style()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    /// Style applied over the page while a dialog is open
    pub fn overlay_style(&self) -> Style {
        Style::default()
            .fg(self.text_dim)
            .bg(self.overlay)
    }

    /// Style for the status bar
    pub fn status_bar_style(&self) -> Style {
        Style::default()
            .fg(self.text)
            .bg(self.background_alt)
    }

    /// Style for help text
    pub fn help_style(&self) -> Style {
        Style::default()
            .fg(self.text)
            .bg(self.background)
            .add_modifier(Modifier::BOLD)
    }
}
