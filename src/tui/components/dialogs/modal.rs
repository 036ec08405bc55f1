//! Accessible modal dialog with a focus trap
//!
//! The host owns the open flag and the trigger. After every change it pushes
//! them into the modal with [`Modal::set_open`] and runs [`Modal::sync`],
//! which captures the focusable controls when the dialog appears and drops
//! them when it disappears. While visible, key events go through
//! [`Modal::handle_key`].

use super::{
    a11y::{A11yNode, Role, CONTENT_ID, TITLE_ID},
    controls::{Control, ControlId, ControlKind, ModalContent},
    focus::{FocusTarget, FocusTrap, TabOutcome},
    portal::{DialogLayer, DialogView, Hit, RenderTarget},
    types::{DialogConfig, DialogEvent, DialogLayout, DialogResult, DialogError, ModalHost},
};
use crate::tui::{
    components::{Component, ComponentState},
    styles::Theme,
    Frame,
};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use tracing::{debug, info};

/// Id of the built-in close control
pub const CLOSE_CONTROL_ID: &str = "modal-close";

/// Label of the built-in close control
pub const CLOSE_CONTROL_LABEL: &str = "Close modal";

/// Everything the host configures on a modal
#[derive(Debug, Clone, Default)]
pub struct ModalProps {
    /// Where the dialog is attached
    pub target: RenderTarget,
    pub is_open: bool,
    /// Control that opened the dialog; focus returns here on close
    pub trigger: Option<ControlId>,
    pub title: String,
    pub content: ModalContent,
}

impl ModalProps {
    pub fn new(title: impl Into<String>, content: ModalContent) -> Self {
        Self {
            title: title.into(),
            content,
            ..Self::default()
        }
    }

    pub fn with_target(mut self, target: RenderTarget) -> Self {
        self.target = target;
        self
    }

    pub fn open(mut self, trigger: Option<ControlId>) -> Self {
        self.is_open = true;
        self.trigger = trigger;
        self
    }
}

/// What the modal did with a key or mouse event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyDisposition {
    /// Focus moved inside the trap
    Focus(TabOutcome),
    /// The close handler ran
    Closed,
    /// A control other than the close control was activated
    Activated(ControlId),
    /// The value of an input or select changed
    Edited(ControlId),
    /// Not handled; the default behaviour applies
    Ignored,
}

/// Modal dialog component
pub struct Modal {
    state: ComponentState,
    config: DialogConfig,
    props: ModalProps,
    /// Present exactly while the dialog is visible
    trap: Option<FocusTrap>,
    /// Set once the close handler has run, until the host's answer is synced
    closing: bool,
}

impl Modal {
    pub fn new(props: ModalProps) -> Self {
        Self {
            state: ComponentState::new().with_visibility(false),
            config: DialogConfig::default(),
            props,
            trap: None,
            closing: false,
        }
    }

    pub fn with_config(mut self, config: DialogConfig) -> DialogResult<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    pub fn config(&self) -> &DialogConfig {
        &self.config
    }

    pub fn props(&self) -> &ModalProps {
        &self.props
    }

    pub fn title(&self) -> &str {
        &self.props.title
    }

    pub fn content(&self) -> &ModalContent {
        &self.props.content
    }

    /// True once `sync` has shown the dialog and until it hides it again
    pub fn is_open(&self) -> bool {
        self.props.is_open && self.trap.is_some()
    }

    pub fn focused(&self) -> Option<&FocusTarget> {
        self.trap.as_ref().map(FocusTrap::focused)
    }

    pub fn focused_control(&self) -> Option<&ControlId> {
        self.focused().and_then(FocusTarget::control_id)
    }

    pub fn trap(&self) -> Option<&FocusTrap> {
        self.trap.as_ref()
    }

    /// Update the open flag and trigger. Takes effect on the next `sync`.
    pub fn set_open(&mut self, is_open: bool, trigger: Option<ControlId>) {
        self.props.is_open = is_open;
        self.props.trigger = trigger;
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.props.title = title.into();
    }

    /// Replace the body content. An open dialog recaptures its focusable
    /// controls right away.
    pub fn set_content(&mut self, content: ModalContent) {
        self.props.content = content;
        let focusable = self.focusable_ids();
        if let Some(trap) = self.trap.as_mut() {
            trap.recapture(focusable);
        }
    }

    /// Focusable controls in document order, the close control last
    pub fn focusable_ids(&self) -> Vec<ControlId> {
        let mut ids: Vec<ControlId> = self
            .props
            .content
            .focusable_controls()
            .into_iter()
            .map(|control| control.id.clone())
            .collect();

        if self.config.show_close_control {
            ids.push(ControlId::from(CLOSE_CONTROL_ID));
        }
        ids
    }

    /// Apply the open flag: capture and focus on show, release on hide
    pub fn sync(&mut self, host: &mut dyn ModalHost) {
        self.closing = false;
        match (self.props.is_open, self.trap.is_some()) {
            (true, false) => {
                let trap = FocusTrap::capture(self.focusable_ids());
                let focusable = trap.focusable().len();
                info!(title = %self.props.title, focusable, "Dialog opened");
                self.trap = Some(trap);
                self.state.is_visible = true;
                self.state.has_focus = true;
                host.on_open_side_effect();
                host.on_dialog_event(DialogEvent::Opened { focusable });
            }
            (false, true) => {
                info!(title = %self.props.title, "Dialog closed");
                self.trap = None;
                self.state.is_visible = false;
                self.state.has_focus = false;
                host.on_close_side_effect();
                host.on_dialog_event(DialogEvent::Closed);
            }
            _ => {}
        }
    }

    /// Move focus to a control inside the dialog
    pub fn focus_control(&mut self, id: &ControlId) -> DialogResult<()> {
        let trap = self.trap.as_mut().ok_or(DialogError::NotOpen)?;
        if trap.focus(id) {
            Ok(())
        } else {
            Err(DialogError::UnknownControl(id.clone()))
        }
    }

    /// Run the host close handler, then return focus to the trigger.
    /// Does nothing while the dialog is closed, or when a close is already
    /// waiting for the host to sync.
    pub fn close_with_focus(&mut self, host: &mut dyn ModalHost) -> bool {
        if !self.is_open() || self.closing {
            debug!("Close ignored, dialog is not open");
            return false;
        }

        host.on_dialog_event(DialogEvent::CloseRequested);
        host.on_close();
        self.closing = true;

        if let Some(trigger) = self.props.trigger.clone() {
            debug!(trigger = %trigger, "Restoring focus to trigger");
            host.restore_focus(&trigger);
            host.on_dialog_event(DialogEvent::FocusRestored { trigger });
        }
        true
    }

    /// The built-in close control was clicked
    pub fn click_close(&mut self, host: &mut dyn ModalHost) -> bool {
        self.close_with_focus(host)
    }

    /// Handle a key event delivered to the dialog
    pub fn handle_key(&mut self, key: KeyEvent, host: &mut dyn ModalHost) -> KeyDisposition {
        if key.kind == KeyEventKind::Release || !self.is_open() || self.closing {
            return KeyDisposition::Ignored;
        }

        match key.code {
            KeyCode::Tab => self.advance(key.modifiers.contains(KeyModifiers::SHIFT)),
            KeyCode::BackTab => self.advance(true),
            KeyCode::Esc if self.config.closable => {
                if self.close_with_focus(host) {
                    KeyDisposition::Closed
                } else {
                    KeyDisposition::Ignored
                }
            }
            KeyCode::Enter => self.activate_focused(host),
            KeyCode::Char(' ') if !self.focused_is_text_entry() => self.activate_focused(host),
            KeyCode::Char(c)
                if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.edit_focused(|kind| match kind {
                    ControlKind::Input { value } => {
                        value.push(c);
                        true
                    }
                    _ => false,
                })
            }
            KeyCode::Backspace => self.edit_focused(|kind| match kind {
                ControlKind::Input { value } => value.pop().is_some(),
                _ => false,
            }),
            KeyCode::Left | KeyCode::Right => {
                let forward = key.code == KeyCode::Right;
                self.edit_focused(|kind| match kind {
                    ControlKind::Select { options, selected } if !options.is_empty() => {
                        let len = options.len();
                        *selected = if forward {
                            (*selected + 1) % len
                        } else {
                            (*selected + len - 1) % len
                        };
                        true
                    }
                    _ => false,
                })
            }
            _ => KeyDisposition::Ignored,
        }
    }

    /// Activate the focused control as Enter or Space would
    pub fn activate_focused(&mut self, host: &mut dyn ModalHost) -> KeyDisposition {
        let Some(id) = self.focused_control().cloned() else {
            return KeyDisposition::Ignored;
        };

        if id.as_str() == CLOSE_CONTROL_ID {
            return if self.click_close(host) {
                KeyDisposition::Closed
            } else {
                KeyDisposition::Ignored
            };
        }

        debug!(control = %id, "Control activated");
        host.on_dialog_event(DialogEvent::ControlActivated { control: id.clone() });
        KeyDisposition::Activated(id)
    }

    /// Handle a mouse event. `area` is where the dialog is attached, i.e. its
    /// render target resolved against the screen.
    pub fn handle_mouse(
        &mut self,
        event: MouseEvent,
        area: Rect,
        host: &mut dyn ModalHost,
    ) -> KeyDisposition {
        if event.kind != MouseEventKind::Down(MouseButton::Left) || self.closing {
            return KeyDisposition::Ignored;
        }
        let Some(view) = self.view(area) else {
            return KeyDisposition::Ignored;
        };

        match view.hit_test(event.column, event.row) {
            Hit::Control(id) => {
                if self.focus_control(&id).is_err() {
                    return KeyDisposition::Ignored;
                }
                let activates = id.as_str() == CLOSE_CONTROL_ID
                    || matches!(
                        self.props.content.control(&id).map(|control| &control.kind),
                        Some(ControlKind::Button { .. } | ControlKind::Link { .. })
                    );
                if activates {
                    self.activate_focused(host)
                } else {
                    KeyDisposition::Focus(TabOutcome {
                        target: FocusTarget::Control(id),
                        default_prevented: false,
                    })
                }
            }
            Hit::Backdrop if self.config.close_on_backdrop => {
                if self.close_with_focus(host) {
                    KeyDisposition::Closed
                } else {
                    KeyDisposition::Ignored
                }
            }
            Hit::Backdrop | Hit::Dialog => KeyDisposition::Ignored,
        }
    }

    fn advance(&mut self, backward: bool) -> KeyDisposition {
        match self.trap.as_mut() {
            Some(trap) => KeyDisposition::Focus(trap.advance(backward)),
            None => KeyDisposition::Ignored,
        }
    }

    fn focused_is_text_entry(&self) -> bool {
        self.focused_control()
            .and_then(|id| self.props.content.control(id))
            .map(|control| matches!(control.kind, ControlKind::Input { .. } | ControlKind::TextArea))
            .unwrap_or(false)
    }

    fn edit_focused(&mut self, edit: impl FnOnce(&mut ControlKind) -> bool) -> KeyDisposition {
        let Some(id) = self.focused_control().cloned() else {
            return KeyDisposition::Ignored;
        };
        match self.props.content.control_mut(&id) {
            Some(control) => {
                if edit(&mut control.kind) {
                    KeyDisposition::Edited(id)
                } else {
                    KeyDisposition::Ignored
                }
            }
            None => KeyDisposition::Ignored,
        }
    }

    /// Describe the visible dialog for the portal; `None` while closed
    pub fn layer(&self) -> Option<DialogLayer> {
        self.is_open().then(|| DialogLayer {
            title: self.props.title.clone(),
            content: self.props.content.clone(),
            focused: self.focused().cloned(),
            config: self.config.clone(),
            accessibility: self.build_accessibility(),
        })
    }

    /// Lay the visible dialog out inside an already resolved area
    pub fn view(&self, area: Rect) -> Option<DialogView> {
        self.layer().map(|layer| layer.layout(area))
    }

    /// Accessibility node of the dialog; `None` while closed
    pub fn accessibility(&self) -> Option<A11yNode> {
        self.is_open().then(|| self.build_accessibility())
    }

    fn build_accessibility(&self) -> A11yNode {
        let mut body = A11yNode::new(Role::Text, self.props.content.plain_text()).with_id(CONTENT_ID);
        for control in self.props.content.focusable_controls() {
            body = body.with_child(control_node(control));
        }

        let mut node = A11yNode::dialog(
            self.props.is_open,
            &self.props.title,
            self.props.content.plain_text(),
        )
        .with_child(A11yNode::new(Role::Heading, self.props.title.clone()).with_id(TITLE_ID))
        .with_child(body);

        if self.config.show_close_control {
            node = node.with_child(
                A11yNode::new(Role::Button, CLOSE_CONTROL_LABEL).with_id(CLOSE_CONTROL_ID),
            );
        }
        node
    }
}

fn control_node(control: &Control) -> A11yNode {
    let role = match control.kind {
        ControlKind::Link { .. } => Role::Link,
        ControlKind::Button { .. } => Role::Button,
        ControlKind::Input { .. } | ControlKind::TextArea | ControlKind::Select { .. } => Role::TextBox,
        ControlKind::Frame | ControlKind::Generic { .. } => Role::Text,
    };
    A11yNode::new(role, control.label.clone()).with_id(control.id.as_str())
}

impl Component for Modal {
    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        if let Some(view) = self.view(area) {
            view.render(frame, theme);
        }
    }

    fn size(&self) -> Rect {
        self.state.size
    }

    fn set_size(&mut self, size: Rect) {
        self.state.size = size;
    }

    fn has_focus(&self) -> bool {
        self.state.has_focus
    }

    fn set_focus(&mut self, focus: bool) {
        self.state.has_focus = focus;
    }

    fn is_visible(&self) -> bool {
        self.state.is_visible
    }
}
