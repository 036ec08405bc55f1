//! Accessibility description of dialogs and page landmarks
//!
//! The terminal has no screen reader bridge of its own, so the tree is exposed
//! as data: tests inspect it and the `run` command prints it.

use serde::{Deserialize, Serialize};

/// Element id of the dialog title
pub const TITLE_ID: &str = "modal-title";

/// Element id of the dialog body
pub const CONTENT_ID: &str = "modal-content";

/// Accessible role of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Main,
    Heading,
    Dialog,
    Button,
    Link,
    TextBox,
    Text,
}

/// A node of the accessibility tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct A11yNode {
    pub role: Role,
    /// Element id, when the node can be referenced
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Accessible name
    pub name: String,
    /// Mirrors the open state for dialogs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modal: Option<bool>,
    /// Id of the element that labels this node
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labelled_by: Option<String>,
    /// Id of the element that describes this node
    #[serde(skip_serializing_if = "Option::is_none")]
    pub described_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub children: Vec<A11yNode>,
}

impl A11yNode {
    pub fn new(role: Role, name: impl Into<String>) -> Self {
        Self {
            role,
            id: None,
            name: name.into(),
            modal: None,
            labelled_by: None,
            described_by: None,
            description: None,
            children: Vec::new(),
        }
    }

    /// Dialog node labelled by its title and described by its body
    pub fn dialog(is_open: bool, title: &str, description: String) -> Self {
        let mut node = Self::new(Role::Dialog, title);
        node.modal = Some(is_open);
        node.labelled_by = Some(TITLE_ID.to_string());
        node.described_by = Some(CONTENT_ID.to_string());
        node.description = Some(description);
        node
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_child(mut self, child: A11yNode) -> Self {
        self.children.push(child);
        self
    }

    /// Depth-first search by element id
    pub fn find_id(&self, id: &str) -> Option<&A11yNode> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find_id(id))
    }
}
