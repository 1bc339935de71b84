//! DOM Node
//!
//! Nodes link to each other through `NodeId`s into the owning arena instead
//! of pointers, so the whole tree is a single `Vec`.

use crate::{AttributeMap, ClassList, NodeId};

/// DOM Node - Core structure
#[derive(Debug)]
pub struct Node {
    /// Parent node (NONE if root)
    pub parent: NodeId,
    /// First child
    pub first_child: NodeId,
    /// Last child (for O(1) append)
    pub last_child: NodeId,
    /// Previous sibling
    pub prev_sibling: NodeId,
    /// Next sibling
    pub next_sibling: NodeId,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    fn detached(data: NodeData) -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            data,
        }
    }

    /// Create a new element node
    pub fn element(tag: &str) -> Self {
        Self::detached(NodeData::Element(ElementData::new(tag)))
    }

    /// Create a new text node
    pub fn text(content: &str) -> Self {
        Self::detached(NodeData::Text(content.to_string()))
    }

    /// Create a comment node
    pub fn comment(content: &str) -> Self {
        Self::detached(NodeData::Comment(content.to_string()))
    }

    /// Create a document node
    pub fn document() -> Self {
        Self::detached(NodeData::Document)
    }

    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// Node-specific data
#[derive(Debug)]
pub enum NodeData {
    /// Document root
    Document,
    /// Element
    Element(ElementData),
    /// Text content
    Text(String),
    /// Comment
    Comment(String),
}

/// Element-specific data
///
/// The class list and inline style are kept in step with the `class` and
/// `style` attributes, so attribute iteration always reflects current state.
#[derive(Debug, Clone)]
pub struct ElementData {
    tag: String,
    attrs: AttributeMap,
    classes: ClassList,
    style: Vec<(String, String)>,
}

impl ElementData {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: AttributeMap::new(),
            classes: ClassList::new(),
            style: Vec::new(),
        }
    }

    /// Lowercased tag name
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attrs(&self) -> &AttributeMap {
        &self.attrs
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name)
    }

    pub fn set_attr(&mut self, name: &str, value: &str) {
        match name {
            "class" => self.classes = ClassList::parse(value),
            "style" => self.style = parse_style(value),
            _ => {}
        }
        self.attrs.set(name, value);
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        match name {
            "class" => self.classes = ClassList::new(),
            "style" => self.style.clear(),
            _ => {}
        }
        self.attrs.remove(name).map(|a| a.value)
    }

    pub fn classes(&self) -> &ClassList {
        &self.classes
    }

    /// Force a class on or off, updating the `class` attribute on change
    pub fn toggle_class(&mut self, class: &str, force: bool) -> bool {
        let changed = self.classes.toggle(class, force);
        if changed {
            let value = self.classes.value();
            self.attrs.set("class", &value);
        }
        changed
    }

    pub fn style_property(&self, name: &str) -> Option<&str> {
        self.style
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an inline style property (custom properties included)
    pub fn set_style_property(&mut self, name: &str, value: &str) {
        match self.style.iter_mut().find(|(k, _)| k == name) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.style.push((name.to_string(), value.to_string())),
        }
        let serialized = self
            .style
            .iter()
            .map(|(k, v)| format!("{k}: {v}"))
            .collect::<Vec<_>>()
            .join("; ");
        self.attrs.set("style", &serialized);
    }
}

/// Split a `style` attribute into declarations. Values are re-serialized by
/// the CSS parser, so quoting and number formatting may be normalized.
fn parse_style(value: &str) -> Vec<(String, String)> {
    use lightningcss::printer::PrinterOptions;
    use lightningcss::stylesheet::{ParserOptions, StyleAttribute};

    let options = ParserOptions {
        error_recovery: true,
        ..ParserOptions::default()
    };
    let attribute = match StyleAttribute::parse(value, options) {
        Ok(attribute) => attribute,
        Err(e) => {
            tracing::warn!("Ignoring unparsable style {:?}: {}", value, e);
            return Vec::new();
        }
    };

    let block = &attribute.declarations;
    let normal = block.declarations.iter().map(|p| (p, false));
    let important = block.important_declarations.iter().map(|p| (p, true));
    normal
        .chain(important)
        .filter_map(|(property, important)| {
            let name = property.property_id().name().to_string();
            let value = property.value_to_css_string(PrinterOptions::default()).ok()?;
            let value = if important {
                format!("{value} !important")
            } else {
                value
            };
            Some((name, value))
        })
        .collect()
}
