//! Demo page hosting the random facts dialog

use super::{Page, PageId};
use crate::{
    config::Config,
    tui::{
        components::{
            dialogs::{
                A11yNode, ContentBlock, Control, ControlId, ControlKind, DialogConfig, DialogEvent,
                DialogLayer, Inline, KeyDisposition, Modal, ModalContent, ModalHost, ModalProps,
                RenderTarget, Role,
            },
            Component,
        },
        events::Event,
        styles::Theme,
        Frame,
    },
};
use anyhow::Result;
use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use tokio::sync::mpsc;
use tracing::{debug, info};
use unicode_width::UnicodeWidthStr;

/// Id of the button that opens the dialog
pub const OPEN_MODAL_ID: &str = "open-modal";

/// Id of the news link in the page intro
pub const NEWS_LINK_ID: &str = "bbc-news";

/// Id of the link inside the dialog
pub const GOOGLE_LINK_ID: &str = "google";

const HEADING: &str = "Random facts";
const INTRO: &str = "Open the modal to view some random facts or read the news";

/// Body of the random facts dialog
pub fn random_facts() -> ModalContent {
    ModalContent::new()
        .with_paragraph(
            "The Eiffel Tower can be 15 cm taller during the summer, due to thermal expansion \
             meaning the iron heats up, the particles gain kinetic energy and take up more space.",
        )
        .with_block(ContentBlock::Paragraph(vec![
            Inline::Text("Visit google and search for \"random fact\" for more facts ".to_string()),
            Inline::Control(Control::link(
                GOOGLE_LINK_ID,
                "Visit google",
                "https://www.google.com",
            )),
        ]))
        .with_paragraph(
            "Human teeth are the only part of the body that cannot heal themselves. Teeth are \
             coated in enamel which is not a living tissue.",
        )
        .with_paragraph(
            "The Ancient Romans used to drop a piece of toast into their wine for good health - \
             hence why we 'raise a toast'.",
        )
        .with_paragraph(
            "The Japanese word 'Kuchi zamishi' is the act of eating when you're not hungry \
             because your mouth is lonely. We do this all the time.",
        )
}

/// Page-side state the dialog reports to
#[derive(Debug, Clone, Default)]
pub struct HostState {
    pub is_open: bool,
    /// Control that opened the dialog, if any
    pub trigger: Option<ControlId>,
    /// Page control holding keyboard focus
    pub focused: Option<ControlId>,
    /// Background is dimmed and inert
    pub overlay_active: bool,
    events: Vec<DialogEvent>,
}

impl ModalHost for HostState {
    fn on_close(&mut self) {
        self.is_open = false;
    }

    fn restore_focus(&mut self, trigger: &ControlId) {
        self.focused = Some(trigger.clone());
    }

    fn on_open_side_effect(&mut self) {
        self.overlay_active = true;
    }

    fn on_close_side_effect(&mut self) {
        self.overlay_active = false;
    }

    fn on_dialog_event(&mut self, event: DialogEvent) {
        self.events.push(event);
    }
}

/// Page with a heading, an intro link and the button that opens the dialog
pub struct HostPage {
    id: PageId,
    title: String,
    controls: Vec<Control>,
    state: HostState,
    modal: Modal,
    screen: Rect,
    hit_areas: Vec<(Rect, ControlId)>,
    status: Option<String>,
    events: Option<mpsc::UnboundedSender<Event>>,
}

impl HostPage {
    pub fn new(config: &Config) -> Result<Self> {
        let dialog_config = DialogConfig::new()
            .close_on_backdrop(config.close_on_backdrop)
            .with_close_control(config.show_close_control);
        let modal = Modal::new(ModalProps::new(config.modal_title.clone(), random_facts()))
            .with_config(dialog_config)?;

        Ok(Self {
            id: "home".to_string(),
            title: HEADING.to_string(),
            controls: vec![
                Control::link(NEWS_LINK_ID, "Visit BBC News website", "https://www.bbc.co.uk/news"),
                Control::button(OPEN_MODAL_ID, "Open modal"),
            ],
            state: HostState::default(),
            modal,
            screen: Rect::default(),
            hit_areas: Vec::new(),
            status: None,
            events: None,
        })
    }

    /// Forward dialog events and status messages to the application loop
    pub fn with_events(mut self, sender: mpsc::UnboundedSender<Event>) -> Self {
        self.events = Some(sender);
        self
    }

    pub fn state(&self) -> &HostState {
        &self.state
    }

    pub fn modal(&self) -> &Modal {
        &self.modal
    }

    /// Control focused on the page, or inside the dialog while it is open
    pub fn focused(&self) -> Option<&ControlId> {
        if self.modal.is_open() {
            self.modal.focused_control()
        } else {
            self.state.focused.as_ref()
        }
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn set_screen(&mut self, screen: Rect) {
        self.screen = screen;
    }

    /// Open the dialog. The trigger gets focus back when it closes.
    pub fn open_dialog(&mut self, trigger: Option<ControlId>) {
        info!(trigger = ?trigger, "Opening dialog");
        self.state.is_open = true;
        self.state.trigger = trigger;
        self.sync_modal();
    }

    /// Close the dialog from the page side, without restoring focus
    pub fn close_dialog(&mut self) {
        self.state.is_open = false;
        self.sync_modal();
    }

    fn sync_modal(&mut self) {
        self.modal
            .set_open(self.state.is_open, self.state.trigger.clone());
        self.modal.sync(&mut self.state);
        self.flush_events();
    }

    fn flush_events(&mut self) {
        for event in self.state.events.drain(..) {
            debug!(event = event.name(), "Dialog event");
            if let Some(sender) = &self.events {
                let payload = serde_json::to_value(&event).unwrap_or(serde_json::Value::Null);
                let _ = sender.send(Event::Custom(event.name().to_string(), payload));
            }
        }
    }

    fn notify_status(&mut self, message: String) {
        if let Some(sender) = &self.events {
            let _ = sender.send(Event::StatusMessage(message.clone()));
        }
        self.status = Some(message);
    }

    fn follow_link(&mut self, control: &Control) {
        if let ControlKind::Link { href: Some(href) } = &control.kind {
            info!(href = %href, "Following link");
            self.notify_status(format!("Opening {}", href));
        }
    }

    /// Handle a key on the page or, while it is open, in the dialog
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }

        if self.modal.is_open() {
            let disposition = self.modal.handle_key(key, &mut self.state);
            if let KeyDisposition::Activated(id) = &disposition {
                if let Some(control) = self.modal.content().control(id).cloned() {
                    self.follow_link(&control);
                }
            }
            self.sync_modal();
            return;
        }

        match key.code {
            KeyCode::Tab => self.cycle_focus(false),
            KeyCode::BackTab => self.cycle_focus(true),
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(id) = self.state.focused.clone() {
                    self.activate(id);
                }
            }
            _ => {}
        }
    }

    /// Handle a mouse event on the page or the dialog
    pub fn handle_mouse(&mut self, event: MouseEvent) {
        if self.modal.is_open() {
            let area = self.modal.props().target.resolve(self.screen);
            let disposition = self.modal.handle_mouse(event, area, &mut self.state);
            if let KeyDisposition::Activated(id) = &disposition {
                if let Some(control) = self.modal.content().control(id).cloned() {
                    self.follow_link(&control);
                }
            }
            self.sync_modal();
            return;
        }

        if event.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        let hit = self
            .hit_areas
            .iter()
            .find(|(area, _)| {
                event.column >= area.x
                    && event.column < area.x + area.width
                    && event.row >= area.y
                    && event.row < area.y + area.height
            })
            .map(|(_, id)| id.clone());

        if let Some(id) = hit {
            self.state.focused = Some(id.clone());
            self.activate(id);
        }
    }

    fn cycle_focus(&mut self, backward: bool) {
        let len = self.controls.len();
        let position = self
            .state
            .focused
            .as_ref()
            .and_then(|id| self.controls.iter().position(|control| &control.id == id));

        let next = match (position, backward) {
            (None, false) => 0,
            (None, true) => len - 1,
            (Some(p), false) => (p + 1) % len,
            (Some(p), true) => (p + len - 1) % len,
        };
        self.state.focused = Some(self.controls[next].id.clone());
    }

    fn activate(&mut self, id: ControlId) {
        if id.as_str() == OPEN_MODAL_ID {
            self.open_dialog(Some(id));
            return;
        }
        if let Some(control) = self.controls.iter().find(|control| control.id == id).cloned() {
            self.follow_link(&control);
        }
    }

    /// Accessibility tree of the screen: the main landmark, then the dialog
    /// while it is open
    pub fn accessibility_tree(&self) -> Vec<A11yNode> {
        let mut main = A11yNode::new(Role::Main, self.title.clone())
            .with_child(A11yNode::new(Role::Heading, HEADING))
            .with_child(A11yNode::new(Role::Text, INTRO));

        for control in &self.controls {
            let role = match control.kind {
                ControlKind::Link { .. } => Role::Link,
                _ => Role::Button,
            };
            main = main.with_child(A11yNode::new(role, control.label.clone()).with_id(control.id.as_str()));
        }

        let mut tree = vec![main];
        tree.extend(self.modal.accessibility());
        tree
    }

    fn control_line<'a>(&self, control: &'a Control, theme: &Theme) -> Line<'a> {
        let focused = !self.modal.has_focus() && self.state.focused.as_ref() == Some(&control.id);
        let style = if focused {
            theme.selection_style()
        } else {
            theme.control_style()
        };
        Line::from(Span::styled(control.display_text(), style))
    }
}

#[async_trait]
impl Page for HostPage {
    fn id(&self) -> &PageId {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    async fn handle_key_event(&mut self, event: KeyEvent) -> Result<()> {
        self.handle_key(event);
        Ok(())
    }

    async fn handle_mouse_event(&mut self, event: MouseEvent) -> Result<()> {
        self.handle_mouse(event);
        Ok(())
    }

    async fn tick(&mut self) -> Result<()> {
        self.modal.tick().await
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(self.title.as_str())
            .style(theme.base_style());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Heading
                Constraint::Length(1),
                Constraint::Length(2), // Intro
                Constraint::Length(1), // News link
                Constraint::Length(1),
                Constraint::Length(1), // Open button
                Constraint::Min(0),
            ])
            .split(inner);

        frame.render_widget(
            Paragraph::new(Span::styled(HEADING, theme.heading_style())),
            chunks[0],
        );
        frame.render_widget(
            Paragraph::new(INTRO)
                .style(theme.text_style())
                .wrap(Wrap { trim: true }),
            chunks[2],
        );

        self.hit_areas.clear();
        for (control, chunk) in self.controls.iter().zip([chunks[3], chunks[5]]) {
            frame.render_widget(Paragraph::new(self.control_line(control, theme)), chunk);
            let width = (control.display_text().width() as u16).min(chunk.width);
            self.hit_areas
                .push((Rect { width, ..chunk }, control.id.clone()));
        }

        self.modal.set_size(area);
    }

    fn on_resize(&mut self, area: Rect) {
        self.set_screen(area);
    }

    fn overlay(&self) -> Option<(RenderTarget, DialogLayer)> {
        let layer = self.modal.layer()?;
        Some((self.modal.props().target.clone(), layer))
    }

    fn help_text(&self) -> Vec<(&str, &str)> {
        if self.modal.is_visible() {
            vec![
                ("Tab / Shift+Tab", "Move focus inside the dialog"),
                ("Enter / Space", "Activate focused control"),
                ("Esc", "Close dialog"),
            ]
        } else {
            vec![
                ("Tab / Shift+Tab", "Move focus"),
                ("Enter", "Activate focused control"),
                ("Ctrl+O", "Open dialog without a trigger"),
            ]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::components::dialogs::CLOSE_CONTROL_ID;
    use crossterm::event::KeyModifiers;
    use ratatui::{backend::TestBackend, Terminal};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn page() -> HostPage {
        let mut page = HostPage::new(&Config::default()).unwrap();
        page.set_screen(Rect::new(0, 0, 80, 24));
        page
    }

    fn focused(page: &HostPage) -> Option<&str> {
        page.focused().map(ControlId::as_str)
    }

    fn open_with_keyboard(page: &mut HostPage) {
        page.handle_key(key(KeyCode::Tab));
        page.handle_key(key(KeyCode::Tab));
        assert_eq!(focused(page), Some(OPEN_MODAL_ID));
        page.handle_key(key(KeyCode::Enter));
    }

    #[test]
    fn test_random_facts_content() {
        let content = random_facts();
        assert_eq!(content.blocks.len(), 5);
        let focusable = content.focusable_controls();
        assert_eq!(focusable.len(), 1);
        assert_eq!(focusable[0].id.as_str(), GOOGLE_LINK_ID);
    }

    #[test]
    fn test_page_tab_cycles_page_controls() {
        let mut page = page();
        page.handle_key(key(KeyCode::Tab));
        assert_eq!(focused(&page), Some(NEWS_LINK_ID));
        page.handle_key(key(KeyCode::Tab));
        page.handle_key(key(KeyCode::Tab));
        assert_eq!(focused(&page), Some(NEWS_LINK_ID));
        page.handle_key(key(KeyCode::BackTab));
        assert_eq!(focused(&page), Some(OPEN_MODAL_ID));
    }

    #[test]
    fn test_open_button_opens_dialog_with_trigger() {
        let mut page = page();
        open_with_keyboard(&mut page);

        assert!(page.state().is_open);
        assert!(page.state().overlay_active);
        assert_eq!(page.state().trigger, Some(ControlId::from(OPEN_MODAL_ID)));
        assert_eq!(focused(&page), Some(GOOGLE_LINK_ID));
        assert!(page.overlay().is_some());
    }

    #[test]
    fn test_tab_never_leaves_dialog() {
        let mut page = page();
        open_with_keyboard(&mut page);

        for _ in 0..7 {
            page.handle_key(key(KeyCode::Tab));
            let current = focused(&page);
            assert!(current == Some(GOOGLE_LINK_ID) || current == Some(CLOSE_CONTROL_ID));
        }
        assert_eq!(page.state().focused, Some(ControlId::from(OPEN_MODAL_ID)));
    }

    #[test]
    fn test_escape_returns_focus_to_button() {
        let mut page = page();
        open_with_keyboard(&mut page);
        page.handle_key(key(KeyCode::Esc));

        assert!(!page.state().is_open);
        assert!(!page.state().overlay_active);
        assert!(!page.modal().is_open());
        assert!(page.overlay().is_none());
        assert_eq!(focused(&page), Some(OPEN_MODAL_ID));
    }

    #[test]
    fn test_close_control_returns_focus_to_button() {
        let mut page = page();
        open_with_keyboard(&mut page);
        page.handle_key(key(KeyCode::Tab));
        assert_eq!(focused(&page), Some(CLOSE_CONTROL_ID));
        page.handle_key(key(KeyCode::Enter));

        assert!(!page.state().is_open);
        assert_eq!(focused(&page), Some(OPEN_MODAL_ID));
    }

    #[test]
    fn test_open_without_trigger_keeps_page_focus() {
        let mut page = page();
        page.open_dialog(None);
        assert!(page.modal().is_open());

        page.handle_key(key(KeyCode::Esc));
        assert!(!page.state().is_open);
        assert_eq!(page.state().focused, None);
    }

    #[test]
    fn test_close_dialog_from_page() {
        let mut page = page();
        open_with_keyboard(&mut page);
        page.close_dialog();

        assert!(!page.modal().is_open());
        assert!(!page.state().overlay_active);
    }

    #[test]
    fn test_dialog_link_reports_status() {
        let mut page = page();
        open_with_keyboard(&mut page);
        page.handle_key(key(KeyCode::Enter));

        assert_eq!(page.status(), Some("Opening https://www.google.com"));
        assert!(page.modal().is_open());
    }

    #[test]
    fn test_accessibility_tree_follows_dialog() {
        let mut page = page();
        assert_eq!(page.accessibility_tree().len(), 1);

        open_with_keyboard(&mut page);
        let tree = page.accessibility_tree();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[1].role, Role::Dialog);
        assert_eq!(tree[1].modal, Some(true));
        assert_eq!(tree[1].name, "Random facts");
        assert!(tree[0].find_id(OPEN_MODAL_ID).is_some());
    }

    #[test]
    fn test_help_text_follows_dialog() {
        let mut page = page();
        assert!(page.help_text().iter().any(|(keys, _)| *keys == "Ctrl+O"));

        open_with_keyboard(&mut page);
        assert!(page.help_text().iter().any(|(keys, _)| *keys == "Esc"));
    }

    #[test]
    fn test_click_on_dialog_link_follows_it() {
        let mut page = page();
        open_with_keyboard(&mut page);

        let area = page.modal().props().target.resolve(Rect::new(0, 0, 80, 24));
        let view = page.modal().view(area).unwrap();
        let body = view.body_area();
        let (row, column) = view
            .body
            .iter()
            .enumerate()
            .find_map(|(index, line)| {
                let mut x = 0;
                for span in &line.spans {
                    if span.control.as_ref().map(ControlId::as_str) == Some(GOOGLE_LINK_ID) {
                        return Some((index as u16, x));
                    }
                    x += span.width();
                }
                None
            })
            .unwrap();

        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: body.x + column,
            row: body.y + row,
            modifiers: KeyModifiers::NONE,
        };
        page.handle_mouse(click);

        assert_eq!(page.status(), Some("Opening https://www.google.com"));
        assert!(page.modal().is_open());
    }

    #[tokio::test]
    async fn test_dialog_events_are_forwarded() {
        let (sender, mut receiver) = mpsc::unbounded_channel();
        let mut page = HostPage::new(&Config::default()).unwrap().with_events(sender);

        page.handle_key_event(key(KeyCode::Tab)).await.unwrap();
        page.handle_key_event(key(KeyCode::Tab)).await.unwrap();
        page.handle_key_event(key(KeyCode::Enter)).await.unwrap();

        match receiver.try_recv() {
            Ok(Event::Custom(name, payload)) => {
                assert_eq!(name, "dialog_opened");
                assert_eq!(payload["focusable"], 2);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_render_and_click_open_button() {
        let mut page = page();
        let theme = Theme::default();
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();

        terminal
            .draw(|frame| {
                let area = frame.size();
                page.render(frame, area, &theme);
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content.iter().map(|cell| cell.symbol()).collect();
        assert!(text.contains("Random facts"));
        assert!(text.contains("[ Open modal ]"));

        // Border row, heading, spacer, two intro rows, link, spacer, then the button
        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 2,
            row: 7,
            modifiers: KeyModifiers::NONE,
        };
        page.handle_mouse(click);

        assert!(page.modal().is_open());
        assert_eq!(page.state().trigger, Some(ControlId::from(OPEN_MODAL_ID)));
    }
}
