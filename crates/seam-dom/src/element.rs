use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

// =============================================================================
// Element
// =============================================================================

struct ElementData {
    tag: String,
    attributes: Vec<(String, String)>,
    children: Vec<DomNode>,
}

/// A shared handle to an element.
///
/// Clones refer to the same element; equality is identity. Attribute names
/// are stored verbatim, so matching is case-sensitive.
#[derive(Clone)]
pub struct Element(Arc<RwLock<ElementData>>);

impl Element {
    /// Creates a detached element with no attributes or children.
    pub fn new(tag: impl Into<String>) -> Self {
        Self(Arc::new(RwLock::new(ElementData {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        })))
    }

    /// Sets an attribute (builder style).
    pub fn with_attr(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Appends a child (builder style). A child that would create a cycle is
    /// dropped, see [`append_child`](Self::append_child).
    pub fn with_child(self, child: impl Into<DomNode>) -> Self {
        self.append_child(child);
        self
    }

    /// Appends a text child (builder style).
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.append_child(Text::new(text));
        self
    }

    /// The tag name.
    pub fn tag(&self) -> String {
        self.0.read().tag.clone()
    }

    /// Returns the value of attribute `name`.
    pub fn attribute(&self, name: &str) -> Option<String> {
        self.0
            .read()
            .attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
    }

    /// Returns `true` if attribute `name` is present.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.0.read().attributes.iter().any(|(n, _)| n == name)
    }

    /// Sets attribute `name`, keeping its position if it already exists.
    pub fn set_attribute(&self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        let mut data = self.0.write();
        match data.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => data.attributes.push((name, value)),
        }
    }

    /// Removes attribute `name`, returning its value.
    pub fn remove_attribute(&self, name: &str) -> Option<String> {
        let mut data = self.0.write();
        let index = data.attributes.iter().position(|(n, _)| n == name)?;
        Some(data.attributes.remove(index).1)
    }

    /// Snapshot of all attributes in insertion order.
    pub fn attributes(&self) -> Vec<(String, String)> {
        self.0.read().attributes.clone()
    }

    /// Appends a child node.
    ///
    /// Returns `false` without appending when the child is this element or
    /// one of its ancestors, since the tree would then contain a cycle.
    pub fn append_child(&self, child: impl Into<DomNode>) -> bool {
        let child = child.into();
        if let DomNode::Element(element) = &child
            && (element.ptr_eq(self) || element.descendants().iter().any(|d| d.ptr_eq(self)))
        {
            return false;
        }
        self.0.write().children.push(child);
        true
    }

    /// Removes every child node.
    pub fn clear_children(&self) {
        self.0.write().children.clear();
    }

    /// Snapshot of the child nodes.
    pub fn children(&self) -> Vec<DomNode> {
        self.0.read().children.clone()
    }

    /// Snapshot of the child elements, skipping text.
    pub fn element_children(&self) -> Vec<Element> {
        self.0
            .read()
            .children
            .iter()
            .filter_map(|child| child.as_element().cloned())
            .collect()
    }

    /// All descendant elements in document order, excluding `self`.
    pub fn descendants(&self) -> Vec<Element> {
        let mut out = Vec::new();
        for child in self.element_children() {
            out.push(child.clone());
            out.extend(child.descendants());
        }
        out
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self) -> String {
        self.children()
            .iter()
            .map(|child| match child {
                DomNode::Element(e) => e.text_content(),
                DomNode::Text(t) => t.content(),
            })
            .collect()
    }

    /// Returns `true` if both handles refer to the same element.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Element {}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.0.read();
        f.debug_struct("Element")
            .field("tag", &data.tag)
            .field("attributes", &data.attributes)
            .field("children", &data.children.len())
            .finish()
    }
}

/// Serialises the element and its subtree as markup.
impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (tag, attributes, children) = {
            let data = self.0.read();
            (data.tag.clone(), data.attributes.clone(), data.children.clone())
        };

        write!(f, "<{tag}")?;
        for (name, value) in &attributes {
            write!(f, " {name}=\"{}\"", escape(value, true))?;
        }
        f.write_str(">")?;
        for child in &children {
            write!(f, "{child}")?;
        }
        write!(f, "</{tag}>")
    }
}

// =============================================================================
// Text
// =============================================================================

/// A shared handle to a text node.
#[derive(Clone)]
pub struct Text(Arc<RwLock<String>>);

impl Text {
    /// Creates a detached text node.
    pub fn new(content: impl Into<String>) -> Self {
        Self(Arc::new(RwLock::new(content.into())))
    }

    /// The text content.
    pub fn content(&self) -> String {
        self.0.read().clone()
    }

    /// Replaces the text content.
    pub fn set_content(&self, content: impl Into<String>) {
        *self.0.write() = content.into();
    }

    /// Returns `true` if both handles refer to the same text node.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Text {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Text {}

impl fmt::Debug for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Text").field(&*self.0.read()).finish()
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&escape(&self.0.read(), false))
    }
}

// =============================================================================
// DomNode
// =============================================================================

/// Any node of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomNode {
    /// An element.
    Element(Element),
    /// A text node.
    Text(Text),
}

impl DomNode {
    /// Returns the element if this node is one.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(e) => Some(e),
            Self::Text(_) => None,
        }
    }

    /// Returns the text node if this node is one.
    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Self::Element(_) => None,
            Self::Text(t) => Some(t),
        }
    }
}

impl From<Element> for DomNode {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

impl From<Text> for DomNode {
    fn from(text: Text) -> Self {
        Self::Text(text)
    }
}

impl fmt::Display for DomNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Element(e) => fmt::Display::fmt(e, f),
            Self::Text(t) => fmt::Display::fmt(t, f),
        }
    }
}

fn escape(raw: &str, attribute: bool) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}
