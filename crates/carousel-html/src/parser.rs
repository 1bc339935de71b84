//! HTML5 Parser implementation
//!
//! Uses html5ever's RcDom and converts it to our arena tree. Whitespace-only
//! text, doctypes and processing instructions are dropped; element order and
//! attribute order are preserved.

use carousel_dom::{DomTree, NodeId};
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

use crate::HtmlError;

/// HTML5 parser
#[derive(Debug, Default)]
pub struct HtmlParser {
    keep_comments: bool,
}

impl HtmlParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep comment nodes in the converted tree
    pub fn with_comments(mut self, keep: bool) -> Self {
        self.keep_comments = keep;
        self
    }

    /// Parse HTML string into an element tree
    pub fn parse(&self, html: &str) -> Result<DomTree, HtmlError> {
        let dom = parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut html.as_bytes())?;

        let mut tree = DomTree::new();
        let root = tree.root();
        self.convert_node(&dom.document, &mut tree, root);

        tracing::debug!("Parsed {} nodes", tree.len());
        Ok(tree)
    }

    fn convert_node(&self, handle: &Handle, tree: &mut DomTree, parent: NodeId) {
        match &handle.data {
            RcNodeData::Document => {
                for child in handle.children.borrow().iter() {
                    self.convert_node(child, tree, parent);
                }
            }
            RcNodeData::Text { contents } => {
                let text = contents.borrow().to_string();
                if !text.trim().is_empty() {
                    let id = tree.create_text(&text);
                    tree.append_child(parent, id);
                }
            }
            RcNodeData::Comment { contents } => {
                if self.keep_comments {
                    let id = tree.create_comment(&contents.to_string());
                    tree.append_child(parent, id);
                }
            }
            RcNodeData::Element { name, attrs, .. } => {
                let id = tree.create_element(&name.local);
                if let Some(el) = tree.element_mut(id) {
                    for attr in attrs.borrow().iter() {
                        el.set_attr(&attr.name.local, &attr.value);
                    }
                }
                tree.append_child(parent, id);

                for child in handle.children.borrow().iter() {
                    self.convert_node(child, tree, id);
                }
            }
            RcNodeData::Doctype { .. } | RcNodeData::ProcessingInstruction { .. } => {}
        }
    }
}
