//! Out-of-tree rendering for dialogs
//!
//! A dialog never draws itself where its host sits in the page layout. It
//! hands a [`DialogLayer`] to the [`PortalRoot`] together with a
//! [`RenderTarget`]. After the page has been drawn the portal resolves each
//! target against the screen, lays the layer out inside it as a
//! [`DialogView`] and renders that. Layering therefore does not depend on
//! component nesting.

use super::{
    a11y::A11yNode,
    controls::{ContentBlock, Control, ControlId, Inline, ModalContent},
    focus::FocusTarget,
    modal::{CLOSE_CONTROL_ID, CLOSE_CONTROL_LABEL},
    types::{DialogConfig, DialogLayout},
};
use crate::tui::{styles::Theme, Frame};
use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};
use tracing::trace;
use unicode_width::UnicodeWidthStr;

/// Name of the default attachment point
pub const DEFAULT_TARGET: &str = "modal-root";

/// Width used to estimate content size for fit-to-content dialogs
const PREFERRED_WIDTH: u16 = 60;

/// Attachment point for dialog layers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderTarget {
    name: String,
    area: Option<Rect>,
}

impl RenderTarget {
    /// Attachment point covering the whole screen
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            area: None,
        }
    }

    /// Attachment point restricted to part of the screen
    pub fn with_area(mut self, area: Rect) -> Self {
        self.area = Some(area);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Area layers attached to this target are laid out in
    pub fn resolve(&self, screen: Rect) -> Rect {
        match self.area {
            Some(area) => area.intersection(screen),
            None => screen,
        }
    }
}

impl Default for RenderTarget {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET)
    }
}

/// A run of text on one dialog row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSpan {
    pub text: String,
    /// Set when the span is a control
    pub control: Option<ControlId>,
    pub focused: bool,
}

impl ViewSpan {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            control: None,
            focused: false,
        }
    }

    pub fn control(text: impl Into<String>, id: ControlId, focused: bool) -> Self {
        Self {
            text: text.into(),
            control: Some(id),
            focused,
        }
    }

    /// Terminal columns the text occupies
    pub fn width(&self) -> u16 {
        self.text.width().min(u16::MAX as usize) as u16
    }
}

/// One rendered row of the dialog body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewLine {
    pub spans: Vec<ViewSpan>,
}

impl ViewLine {
    pub fn width(&self) -> u16 {
        self.spans.iter().map(ViewSpan::width).sum()
    }

    pub fn text(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }

    pub fn has_focus(&self) -> bool {
        self.spans.iter().any(|span| span.focused)
    }

    /// Control under the given column offset
    fn control_at(&self, offset: u16) -> Option<&ControlId> {
        let mut x = 0u16;
        for span in &self.spans {
            let end = x.saturating_add(span.width());
            if offset >= x && offset < end {
                return span.control.as_ref();
            }
            x = end;
        }
        None
    }
}

/// What a screen position falls on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hit {
    Control(ControlId),
    /// Inside the dialog but not on a control
    Dialog,
    /// Outside the dialog
    Backdrop,
}

/// What an open dialog hands to the portal: content and focus, not yet laid
/// out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogLayer {
    pub title: String,
    pub content: ModalContent,
    pub focused: Option<FocusTarget>,
    pub config: DialogConfig,
    pub accessibility: A11yNode,
}

impl DialogLayer {
    /// Lay the dialog out inside `area`, the resolved attachment area.
    /// Body rows are wrapped to the dialog width and scrolled so the focused
    /// control stays visible.
    pub fn layout(&self, area: Rect) -> DialogView {
        let focused = self.focused.as_ref().and_then(FocusTarget::control_id);
        let has_footer = self.config.show_close_control;

        let estimate_width = PREFERRED_WIDTH.min(area.width.saturating_sub(2)).max(1);
        let estimate = wrap_content(&self.content, estimate_width, focused);
        let footer_rows = if has_footer { 2 } else { 0 };
        let content_size = (
            estimate_width,
            (estimate.len() as u16).saturating_add(2 + footer_rows),
        );
        let layout = DialogLayout::calculate(&self.config, area, Some(content_size));

        let body = body_area(layout.content_area, has_footer);
        let lines = wrap_content(&self.content, body.width, focused);
        let visible = body.height as usize;
        let offset = match lines.iter().position(ViewLine::has_focus) {
            Some(index) if visible > 0 && index >= visible => index + 1 - visible,
            _ => 0,
        };

        let close_control = has_footer.then(|| {
            let id = ControlId::from(CLOSE_CONTROL_ID);
            let is_focused = focused == Some(&id);
            ViewSpan::control(format!("[ {} ]", CLOSE_CONTROL_LABEL), id, is_focused)
        });

        DialogView {
            title: self.title.clone(),
            layout,
            body: lines.into_iter().skip(offset).collect(),
            close_control,
            container_focused: matches!(self.focused, Some(FocusTarget::Container)),
            has_border: self.config.has_border,
            accessibility: self.accessibility.clone(),
        }
    }
}

/// A dialog laid out at a concrete position on screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogView {
    pub title: String,
    pub layout: DialogLayout,
    /// Body rows currently scrolled into view
    pub body: Vec<ViewLine>,
    /// Footer close control, when shown
    pub close_control: Option<ViewSpan>,
    /// Focus sits on the dialog container itself
    pub container_focused: bool,
    pub has_border: bool,
    pub accessibility: A11yNode,
}

impl DialogView {
    /// Row holding the title
    pub fn title_row(&self) -> u16 {
        self.layout.content_area.y
    }

    /// Rows available to the body between the title and the footer
    pub fn body_area(&self) -> Rect {
        body_area(self.layout.content_area, self.close_control.is_some())
    }

    /// Row holding the close control
    pub fn footer_row(&self) -> Option<u16> {
        let content = self.layout.content_area;
        self.close_control
            .as_ref()
            .filter(|_| content.height > 0)
            .map(|_| content.y + content.height - 1)
    }

    pub fn hit_test(&self, x: u16, y: u16) -> Hit {
        if !self.layout.contains_point(x, y) {
            return Hit::Backdrop;
        }

        let content = self.layout.content_area;
        let offset = x.saturating_sub(content.x);

        if let (Some(row), Some(close)) = (self.footer_row(), &self.close_control) {
            if y == row && x >= content.x && offset < close.width() {
                if let Some(id) = &close.control {
                    return Hit::Control(id.clone());
                }
            }
        }

        let body = self.body_area();
        if y >= body.y && y < body.y + body.height && x >= body.x {
            let index = (y - body.y) as usize;
            if let Some(id) = self.body.get(index).and_then(|line| line.control_at(offset)) {
                return Hit::Control(id.clone());
            }
        }

        Hit::Dialog
    }

    /// Draw the view into the frame
    pub fn render(&self, frame: &mut Frame, theme: &Theme) {
        let area = self.layout.dialog_area;
        if area.width == 0 || area.height == 0 {
            return;
        }

        frame.render_widget(Clear, area);

        if self.has_border {
            let border_style = if self.container_focused {
                theme.focused_border_style()
            } else {
                theme.border_style()
            };
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .style(theme.dialog_style());
            frame.render_widget(block, area);
        } else {
            frame.render_widget(Block::default().style(theme.dialog_style()), area);
        }

        let content = self.layout.content_area;
        if content.height == 0 {
            return;
        }

        let title_area = Rect::new(content.x, self.title_row(), content.width, 1);
        let title = Paragraph::new(self.title.as_str()).style(theme.dialog_title_style());
        frame.render_widget(title, title_area);

        let body = self.body_area();
        let lines: Vec<Line> = self
            .body
            .iter()
            .take(body.height as usize)
            .map(|line| to_line(line, theme))
            .collect();
        frame.render_widget(Paragraph::new(lines).style(theme.dialog_style()), body);

        if let (Some(row), Some(close)) = (self.footer_row(), &self.close_control) {
            let footer_area = Rect::new(content.x, row, content.width, 1);
            let footer = Paragraph::new(Line::from(span_for(close, theme)));
            frame.render_widget(footer, footer_area);
        }
    }
}

/// Body rows for a content area: below the title and a spacer row, above the
/// footer when there is one
fn body_area(content: Rect, has_footer: bool) -> Rect {
    let top = 2u16.min(content.height);
    let bottom = if has_footer { 2u16 } else { 0 };
    Rect {
        x: content.x,
        y: content.y + top,
        width: content.width,
        height: content.height.saturating_sub(top + bottom),
    }
}

fn control_span(control: &Control, focused: Option<&ControlId>) -> ViewSpan {
    if control.is_interactive() {
        let is_focused = focused == Some(&control.id);
        ViewSpan::control(control.display_text(), control.id.clone(), is_focused)
    } else {
        ViewSpan::plain(control.display_text())
    }
}

/// Lay the content out as rows no wider than `width` columns, one blank row
/// between blocks
fn wrap_content(content: &ModalContent, width: u16, focused: Option<&ControlId>) -> Vec<ViewLine> {
    let width = width.max(1) as usize;
    let mut lines = Vec::new();

    for (index, block) in content.blocks.iter().enumerate() {
        if index > 0 {
            lines.push(ViewLine::default());
        }
        match block {
            ContentBlock::Control(control) => lines.push(ViewLine {
                spans: vec![control_span(control, focused)],
            }),
            ContentBlock::Paragraph(inlines) => lines.extend(wrap_inlines(inlines, width, focused)),
        }
    }
    lines
}

fn wrap_inlines(inlines: &[Inline], width: usize, focused: Option<&ControlId>) -> Vec<ViewLine> {
    let tokens = inlines.iter().flat_map(|inline| match inline {
        Inline::Text(text) => text.split_whitespace().map(ViewSpan::plain).collect::<Vec<_>>(),
        Inline::Control(control) => vec![control_span(control, focused)],
    });

    let mut lines = Vec::new();
    let mut current = ViewLine::default();
    let mut used = 0usize;

    for token in tokens {
        let token_width = token.text.width();
        if used > 0 && used + 1 + token_width > width {
            lines.push(std::mem::take(&mut current));
            used = 0;
        }
        if used > 0 {
            current.spans.push(ViewSpan::plain(" "));
            used += 1;
        }
        current.spans.push(token);
        used += token_width;
    }

    if !current.spans.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

fn span_for<'a>(span: &'a ViewSpan, theme: &Theme) -> Span<'a> {
    let style = match (&span.control, span.focused) {
        (Some(_), true) => theme.selection_style(),
        (Some(_), false) => theme.control_style(),
        (None, _) => theme.dialog_style(),
    };
    Span::styled(span.text.as_str(), style)
}

fn to_line<'a>(line: &'a ViewLine, theme: &Theme) -> Line<'a> {
    Line::from(
        line.spans
            .iter()
            .map(|span| span_for(span, theme))
            .collect::<Vec<_>>(),
    )
}

/// Collects dialog layers during a frame and attaches them after the page
#[derive(Debug, Default)]
pub struct PortalRoot {
    layers: Vec<(RenderTarget, DialogLayer)>,
    background_dim: bool,
}

impl PortalRoot {
    pub fn new(background_dim: bool) -> Self {
        Self {
            layers: Vec::new(),
            background_dim,
        }
    }

    pub fn attach(&mut self, target: RenderTarget, layer: DialogLayer) {
        self.layers.push((target, layer));
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Lay out, render and drop every attached layer. Each layer is placed
    /// inside the area its target resolves to on this frame.
    pub fn flush(&mut self, frame: &mut Frame, theme: &Theme) {
        if self.layers.is_empty() {
            return;
        }

        let screen = frame.size();
        if self.background_dim {
            frame
                .buffer_mut()
                .set_style(screen, theme.overlay_style().add_modifier(Modifier::DIM));
        }

        for (target, layer) in self.layers.drain(..) {
            let area = target.resolve(screen);
            trace!(render_target = target.name(), ?area, "Attaching dialog layer");
            layer.layout(area).render(frame, theme);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::components::dialogs::types::DialogSize;
    use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};

    fn sample_view() -> DialogView {
        let config = DialogConfig::new().with_size(DialogSize::Fixed(30, 8));
        let layout = DialogLayout::calculate(&config, Rect::new(0, 0, 40, 10), None);
        DialogView {
            title: "Facts".to_string(),
            layout,
            body: vec![ViewLine {
                spans: vec![
                    ViewSpan::plain("Go "),
                    ViewSpan::control("there", ControlId::from("link"), false),
                ],
            }],
            close_control: Some(ViewSpan::control(
                "[ Close modal ]",
                ControlId::from("modal-close"),
                true,
            )),
            container_focused: false,
            has_border: true,
            accessibility: A11yNode::dialog(true, "Facts", String::new()),
        }
    }

    fn sample_layer() -> DialogLayer {
        DialogLayer {
            title: "Facts".to_string(),
            content: ModalContent::new().with_block(ContentBlock::Paragraph(vec![
                Inline::Text("Go".to_string()),
                Inline::Control(Control::link("link", "there", "#facts")),
            ])),
            focused: Some(FocusTarget::Control(ControlId::from("link"))),
            config: DialogConfig::new().with_size(DialogSize::Fixed(30, 8)),
            accessibility: A11yNode::dialog(true, "Facts", String::new()),
        }
    }

    fn buffer_text(buffer: &Buffer) -> String {
        let area = buffer.area;
        (area.top()..area.bottom())
            .map(|y| {
                (area.left()..area.right())
                    .map(|x| buffer.get(x, y).symbol())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_target_resolution() {
        let screen = Rect::new(0, 0, 80, 24);
        assert_eq!(RenderTarget::default().resolve(screen), screen);
        assert_eq!(RenderTarget::default().name(), DEFAULT_TARGET);

        let target = RenderTarget::new("side").with_area(Rect::new(60, 0, 40, 24));
        assert_eq!(target.resolve(screen), Rect::new(60, 0, 20, 24));
    }

    #[test]
    fn test_hit_test_regions() {
        let view = sample_view();
        // dialog at (5,1) 30x8, content at (6,2) 28x6
        assert_eq!(view.hit_test(0, 0), Hit::Backdrop);
        assert_eq!(view.hit_test(6, 2), Hit::Dialog);

        let body = view.body_area();
        assert_eq!(body.y, 4);
        assert_eq!(view.hit_test(body.x + 3, body.y), Hit::Control(ControlId::from("link")));
        assert_eq!(view.hit_test(body.x, body.y), Hit::Dialog);

        let footer = view.footer_row().unwrap();
        assert_eq!(footer, 7);
        assert_eq!(
            view.hit_test(6, footer),
            Hit::Control(ControlId::from("modal-close"))
        );
    }

    #[test]
    fn test_hit_test_counts_wide_characters_as_two_columns() {
        let mut view = sample_view();
        view.body = vec![ViewLine {
            spans: vec![
                ViewSpan::plain("漢字漢字"),
                ViewSpan::control("lnk", ControlId::from("lnk"), false),
            ],
        }];
        let body = view.body_area();

        assert_eq!(view.body[0].width(), 11);
        assert_eq!(view.hit_test(body.x + 5, body.y), Hit::Dialog);
        assert_eq!(view.hit_test(body.x + 8, body.y), Hit::Control(ControlId::from("lnk")));
        assert_eq!(view.hit_test(body.x + 10, body.y), Hit::Control(ControlId::from("lnk")));
    }

    #[test]
    fn test_wrap_inlines_respects_width() {
        let inlines = vec![
            Inline::Text("Visit google and search".to_string()),
            Inline::Control(Control::link("g", "Visit google", "https://www.google.com")),
        ];
        let lines = wrap_inlines(&inlines, 14, None);
        let texts: Vec<String> = lines.iter().map(ViewLine::text).collect();

        assert_eq!(texts, vec!["Visit google", "and search", "Visit google"]);
        assert!(lines.iter().all(|line| line.width() <= 14));
    }

    #[test]
    fn test_wrap_inlines_measures_display_width() {
        let inlines = vec![Inline::Text("漢字漢字漢字 漢字漢字漢字".to_string())];
        let lines = wrap_inlines(&inlines, 12, None);

        let widths: Vec<u16> = lines.iter().map(ViewLine::width).collect();
        assert_eq!(widths, vec![12, 12]);
    }

    #[test]
    fn test_layout_places_dialog_inside_area() {
        let layer = sample_layer();
        let view = layer.layout(Rect::new(40, 0, 40, 24));

        assert!(view.layout.dialog_area.x >= 40);
        assert_eq!(view.body[0].text(), "Go there");
        assert!(view.body[0].has_focus());
        assert_eq!(view.accessibility, layer.accessibility);
    }

    #[test]
    fn test_portal_renders_attached_layers() {
        let backend = TestBackend::new(40, 10);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::default();

        terminal
            .draw(|frame| {
                frame.render_widget(Paragraph::new("page underneath"), frame.size());
                let mut portal = PortalRoot::new(true);
                portal.attach(RenderTarget::default(), sample_layer());
                portal.flush(frame, &theme);
                assert!(portal.is_empty());
            })
            .unwrap();

        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("Facts"));
        assert!(text.contains("[ Close modal ]"));
    }

    #[test]
    fn test_flush_resolves_target_area() {
        let backend = TestBackend::new(80, 12);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::default();

        terminal
            .draw(|frame| {
                let mut portal = PortalRoot::new(false);
                let target = RenderTarget::new("side").with_area(Rect::new(40, 0, 40, 12));
                portal.attach(target, sample_layer());
                portal.flush(frame, &theme);
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        let left: String = (0..12)
            .flat_map(|y| (0..40).map(move |x| (x, y)))
            .map(|(x, y)| buffer.get(x, y).symbol().to_string())
            .collect();
        assert!(left.trim().is_empty());
        assert!(buffer_text(buffer).contains("Facts"));
    }
}
