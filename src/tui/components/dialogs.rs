//! Dialog system for modal UI components
//!
//! A modal is described declaratively by its content, traps keyboard focus
//! while it is open and hands focus back to its trigger when it closes. Open
//! dialogs are attached to a render target after the page is drawn, so they
//! always sit above it.

pub mod a11y;
pub mod controls;
pub mod focus;
pub mod modal;
pub mod portal;
pub mod types;

pub use a11y::{A11yNode, Role};
pub use controls::{ContentBlock, Control, ControlId, ControlKind, Inline, ModalContent};
pub use modal::{KeyDisposition, Modal, ModalProps, CLOSE_CONTROL_ID};
pub use portal::{DialogLayer, PortalRoot, RenderTarget};
pub use types::*;
