//! DOM Tree (arena-based allocation)

use crate::element::{ElementTree, SimpleSelector};
use crate::{ElementData, Node, NodeId};

/// Arena-based DOM tree
///
/// Node 0 is always the document node.
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::document()],
        }
    }

    /// Document node
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Number of nodes in the tree
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A tree is never empty; the document node always exists
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Element data for `id`, if it is an element
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(Node::as_element)
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.get_mut(id).and_then(Node::as_element_mut)
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(Node::element(tag))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(Node::text(text))
    }

    /// Create a detached comment node
    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.push(Node::comment(text))
    }

    /// Append a detached node as the last child of `parent`
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if parent.index() >= self.nodes.len() || child.index() >= self.nodes.len() {
            tracing::warn!("append_child with unknown node {} -> {}", child, parent);
            return;
        }
        let prev_last = self.nodes[parent.index()].last_child;

        {
            let node = &mut self.nodes[child.index()];
            node.parent = parent;
            node.prev_sibling = prev_last;
            node.next_sibling = NodeId::NONE;
        }
        if prev_last.is_valid() {
            self.nodes[prev_last.index()].next_sibling = child;
        } else {
            self.nodes[parent.index()].first_child = child;
        }
        self.nodes[parent.index()].last_child = child;
    }

    /// Create an element with attributes and append it to `parent`
    ///
    /// Convenience for building fixtures by hand.
    pub fn append_element(&mut self, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let id = self.create_element(tag);
        if let Some(el) = self.element_mut(id) {
            for (name, value) in attrs {
                el.set_attr(name, value);
            }
        }
        self.append_child(parent, id);
        id
    }

    /// Direct children of a node
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let first = self.get(id).map_or(NodeId::NONE, |n| n.first_child);
        std::iter::successors(first.is_valid().then_some(first), move |&cur| {
            let next = self.nodes[cur.index()].next_sibling;
            next.is_valid().then_some(next)
        })
    }

    /// Pre-order walk of everything below `scope`
    pub fn descendants(&self, scope: NodeId) -> Descendants<'_> {
        let next = self.get(scope).map_or(NodeId::NONE, |n| n.first_child);
        Descendants {
            tree: self,
            scope,
            next,
        }
    }

    /// Concatenated text of a subtree
    pub fn text_content(&self, id: NodeId) -> String {
        self.descendants(id)
            .filter_map(|n| self.nodes[n.index()].as_text())
            .collect()
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Pre-order iterator over a subtree (scope excluded)
pub struct Descendants<'a> {
    tree: &'a DomTree,
    scope: NodeId,
    next: NodeId,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next;
        if !current.is_valid() {
            return None;
        }

        let node = &self.tree.nodes[current.index()];
        if node.first_child.is_valid() {
            self.next = node.first_child;
        } else {
            self.next = NodeId::NONE;
            let mut cursor = current;
            while cursor.is_valid() && cursor != self.scope {
                let n = &self.tree.nodes[cursor.index()];
                if n.next_sibling.is_valid() {
                    self.next = n.next_sibling;
                    break;
                }
                cursor = n.parent;
            }
        }
        Some(current)
    }
}

impl ElementTree for DomTree {
    fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    fn parent_element(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.get(node)?.parent;
        self.element(parent).map(|_| parent)
    }

    fn element_children(&self, node: NodeId) -> Vec<NodeId> {
        self.children(node)
            .filter(|&c| self.nodes[c.index()].is_element())
            .collect()
    }

    fn find_descendant(&self, scope: NodeId, selector: &SimpleSelector) -> Option<NodeId> {
        self.descendants(scope)
            .find(|&id| self.element(id).is_some_and(|el| selector.matches(el)))
    }

    fn find_all(&self, scope: NodeId, selector: &SimpleSelector) -> Vec<NodeId> {
        self.descendants(scope)
            .filter(|&id| self.element(id).is_some_and(|el| selector.matches(el)))
            .collect()
    }

    fn attributes(&self, element: NodeId) -> Vec<(String, String)> {
        self.element(element)
            .map(|el| {
                el.attrs()
                    .iter()
                    .map(|a| (a.name.clone(), a.value.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn get_attribute(&self, element: NodeId, name: &str) -> Option<&str> {
        self.element(element)?.attr(name)
    }

    fn set_attribute(&mut self, element: NodeId, name: &str, value: &str) {
        if let Some(el) = self.element_mut(element) {
            el.set_attr(name, value);
        }
    }

    fn remove_attribute(&mut self, element: NodeId, name: &str) {
        if let Some(el) = self.element_mut(element) {
            el.remove_attr(name);
        }
    }

    fn class_list(&self, element: NodeId) -> Vec<String> {
        self.element(element)
            .map(|el| el.classes().iter().map(str::to_string).collect())
            .unwrap_or_default()
    }

    fn has_class(&self, element: NodeId, class: &str) -> bool {
        self.element(element)
            .is_some_and(|el| el.classes().contains(class))
    }

    fn toggle_class(&mut self, element: NodeId, class: &str, force: bool) {
        if let Some(el) = self.element_mut(element) {
            el.toggle_class(class, force);
        }
    }

    fn set_style_property(&mut self, element: NodeId, name: &str, value: &str) {
        if let Some(el) = self.element_mut(element) {
            el.set_style_property(name, value);
        }
    }

    fn describe(&self, element: NodeId) -> String {
        let Some(el) = self.element(element) else {
            return format!("node {element}");
        };
        let mut out = format!("<{}", el.tag());
        if let Some(id) = el.attr("id") {
            out.push_str(&format!(" id=\"{id}\""));
        }
        if !el.classes().is_empty() {
            out.push_str(&format!(" class=\"{}\"", el.classes()));
        }
        out.push_str(&format!("> {element}"));
        out
    }
}
