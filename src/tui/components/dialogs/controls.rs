//! Declarative dialog content
//!
//! Dialog bodies are described up front as paragraphs and controls instead of
//! being discovered by walking rendered output. The focusable set of a dialog
//! is derived from this description in document order.

use serde::{Deserialize, Serialize};

/// Identifier of an interactive control, unique within a page
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ControlId(pub String);

impl ControlId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ControlId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ControlId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ControlId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What kind of element a control is
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlKind {
    /// Hyperlink; only focusable when it points somewhere
    Link { href: Option<String> },
    Button { disabled: bool },
    TextArea,
    /// Single line text input
    Input { value: String },
    Select { options: Vec<String>, selected: usize },
    /// Embedded frame
    Frame,
    /// Any other element, focusable only with an explicit tab index of 0 or 1
    Generic { tab_index: Option<i32> },
}

/// A single control in dialog or page content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Control {
    pub id: ControlId,
    pub label: String,
    pub kind: ControlKind,
}

impl Control {
    pub fn new(id: impl Into<ControlId>, label: impl Into<String>, kind: ControlKind) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind,
        }
    }

    pub fn button(id: impl Into<ControlId>, label: impl Into<String>) -> Self {
        Self::new(id, label, ControlKind::Button { disabled: false })
    }

    pub fn link(id: impl Into<ControlId>, label: impl Into<String>, href: impl Into<String>) -> Self {
        Self::new(id, label, ControlKind::Link { href: Some(href.into()) })
    }

    pub fn input(id: impl Into<ControlId>, label: impl Into<String>) -> Self {
        Self::new(id, label, ControlKind::Input { value: String::new() })
    }

    pub fn generic(id: impl Into<ControlId>, label: impl Into<String>, tab_index: Option<i32>) -> Self {
        Self::new(id, label, ControlKind::Generic { tab_index })
    }

    /// Mark a button as disabled. Other kinds are returned unchanged.
    pub fn disabled(mut self) -> Self {
        if let ControlKind::Button { disabled } = &mut self.kind {
            *disabled = true;
        }
        self
    }

    /// Whether keyboard focus may land on this control
    pub fn is_interactive(&self) -> bool {
        match &self.kind {
            ControlKind::Link { href } => href.is_some(),
            ControlKind::Button { disabled } => !disabled,
            ControlKind::TextArea
            | ControlKind::Input { .. }
            | ControlKind::Select { .. }
            | ControlKind::Frame => true,
            ControlKind::Generic { tab_index } => matches!(tab_index, Some(0) | Some(1)),
        }
    }

    /// Text shown for the control when rendered
    pub fn display_text(&self) -> String {
        match &self.kind {
            ControlKind::Button { .. } => format!("[ {} ]", self.label),
            ControlKind::Link { .. } => self.label.clone(),
            ControlKind::Input { value } => format!("{}: [{}]", self.label, value),
            ControlKind::Select { options, selected } => {
                let current = options.get(*selected).map(String::as_str).unwrap_or("");
                format!("{}: <{}>", self.label, current)
            }
            ControlKind::TextArea | ControlKind::Frame | ControlKind::Generic { .. } => {
                self.label.clone()
            }
        }
    }
}

/// Inline run inside a paragraph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Inline {
    Text(String),
    Control(Control),
}

/// Block of dialog content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentBlock {
    Paragraph(Vec<Inline>),
    Control(Control),
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Paragraph(vec![Inline::Text(text.into())])
    }
}

/// Opaque body content supplied by the host
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModalContent {
    pub blocks: Vec<ContentBlock>,
}

impl ModalContent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_block(mut self, block: ContentBlock) -> Self {
        self.blocks.push(block);
        self
    }

    pub fn with_paragraph(self, text: impl Into<String>) -> Self {
        self.with_block(ContentBlock::text(text))
    }

    pub fn with_control(self, control: Control) -> Self {
        self.with_block(ContentBlock::Control(control))
    }

    /// All controls in document order, interactive or not
    pub fn controls(&self) -> impl Iterator<Item = &Control> {
        self.blocks.iter().flat_map(block_controls)
    }

    /// Interactive controls in document order
    pub fn focusable_controls(&self) -> Vec<&Control> {
        self.controls().filter(|control| control.is_interactive()).collect()
    }

    pub fn control(&self, id: &ControlId) -> Option<&Control> {
        self.controls().find(|control| &control.id == id)
    }

    pub fn control_mut(&mut self, id: &ControlId) -> Option<&mut Control> {
        self.blocks.iter_mut().find_map(|block| match block {
            ContentBlock::Control(control) if &control.id == id => Some(control),
            ContentBlock::Control(_) => None,
            ContentBlock::Paragraph(inlines) => inlines.iter_mut().find_map(|inline| match inline {
                Inline::Control(control) if &control.id == id => Some(control),
                _ => None,
            }),
        })
    }

    /// Plain text of the content, used as the accessible description
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(|block| match block {
                ContentBlock::Control(control) => control.label.clone(),
                ContentBlock::Paragraph(inlines) => inlines
                    .iter()
                    .map(|inline| match inline {
                        Inline::Text(text) => text.as_str(),
                        Inline::Control(control) => control.label.as_str(),
                    })
                    .collect::<String>(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn block_controls(block: &ContentBlock) -> Box<dyn Iterator<Item = &Control> + '_> {
    match block {
        ContentBlock::Control(control) => Box::new(std::iter::once(control)),
        ContentBlock::Paragraph(inlines) => Box::new(inlines.iter().filter_map(|inline| match inline {
            Inline::Control(control) => Some(control),
            Inline::Text(_) => None,
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interactive_predicate() {
        assert!(Control::link("a", "A", "https://example.com").is_interactive());
        assert!(!Control::new("a", "A", ControlKind::Link { href: None }).is_interactive());
        assert!(Control::button("b", "B").is_interactive());
        assert!(!Control::button("b", "B").disabled().is_interactive());
        assert!(Control::input("i", "I").is_interactive());
        assert!(Control::new("t", "T", ControlKind::TextArea).is_interactive());
        assert!(Control::new("f", "F", ControlKind::Frame).is_interactive());
        assert!(Control::generic("g0", "G", Some(0)).is_interactive());
        assert!(Control::generic("g1", "G", Some(1)).is_interactive());
        assert!(!Control::generic("g2", "G", Some(2)).is_interactive());
        assert!(!Control::generic("gm", "G", Some(-1)).is_interactive());
        assert!(!Control::generic("gn", "G", None).is_interactive());
    }

    #[test]
    fn test_focusable_controls_in_document_order() {
        let content = ModalContent::new()
            .with_control(Control::button("first", "Button 1"))
            .with_block(ContentBlock::Paragraph(vec![
                Inline::Text("See ".to_string()),
                Inline::Control(Control::link("link", "Link to google", "#test")),
            ]))
            .with_control(Control::button("off", "Off").disabled())
            .with_control(Control::input("input", "Input"));

        let ids: Vec<&str> = content
            .focusable_controls()
            .iter()
            .map(|control| control.id.as_str())
            .collect();

        assert_eq!(ids, vec!["first", "link", "input"]);
    }

    #[test]
    fn test_control_mut_finds_inline_controls() {
        let mut content = ModalContent::new().with_block(ContentBlock::Paragraph(vec![
            Inline::Text("Name ".to_string()),
            Inline::Control(Control::input("name", "Name")),
        ]));

        let control = content.control_mut(&ControlId::from("name")).unwrap();
        if let ControlKind::Input { value } = &mut control.kind {
            value.push('x');
        }

        assert_eq!(
            content.control(&ControlId::from("name")).unwrap().display_text(),
            "Name: [x]"
        );
    }

    #[test]
    fn test_plain_text_joins_paragraphs() {
        let content = ModalContent::new()
            .with_paragraph("One.")
            .with_block(ContentBlock::Paragraph(vec![
                Inline::Text("Visit ".to_string()),
                Inline::Control(Control::link("g", "google", "https://www.google.com")),
            ]));

        assert_eq!(content.plain_text(), "One.\nVisit google");
        assert!(ModalContent::new().plain_text().is_empty());
    }
}
