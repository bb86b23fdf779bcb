//! In-memory element tree for Seam.
//!
//! Provides [`Element`] and [`Text`] handles and the [`DomNode`] sum of both,
//! with [`Node`] implemented for:
//!
//! - [`DomNode`]: full trees. Text nodes are not elements, so passing one as
//!   the root of an apply pass fails with `ApplyError::InvalidRoot`.
//! - [`Element`]: element-only trees. Traversal skips text children.
//!
//! ```rust,ignore
//! use seam_dom::Element;
//!
//! let root = Element::new("div")
//!     .with_child(Element::new("span").with_attr("data-tooltip", "show: hi"))
//!     .with_text("plain text");
//!
//! seam.apply(&root)?;
//! ```

mod element;

pub use element::{DomNode, Element, Text};

use seam_core::Node;

impl Node for Element {
    fn is_element(&self) -> bool {
        true
    }

    fn attributes(&self) -> Vec<(String, String)> {
        Element::attributes(self)
    }

    fn children(&self) -> Vec<Self> {
        self.element_children()
    }
}

impl Node for DomNode {
    fn is_element(&self) -> bool {
        matches!(self, Self::Element(_))
    }

    fn attributes(&self) -> Vec<(String, String)> {
        match self {
            Self::Element(e) => Element::attributes(e),
            Self::Text(_) => Vec::new(),
        }
    }

    fn children(&self) -> Vec<Self> {
        match self {
            Self::Element(e) => Element::children(e),
            Self::Text(_) => Vec::new(),
        }
    }
}
