//! Arena-backed document tree.
//!
//! Node ids are stable for the lifetime of the document: removing a node
//! never invalidates other ids, and an id for a removed node simply stops
//! resolving. That stability is what the overlay engine's processed-set
//! relies on.

use std::collections::BTreeSet;
use tokio::sync::watch;
use tracing::trace;

use crate::error::DomError;

// ============================================================================
// Node
// ============================================================================

/// Stable identifier of a node within its document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// A single document node: tag name, class list, optional own text, and
/// child links.
#[derive(Debug, Clone)]
pub struct Node {
    tag: String,
    classes: BTreeSet<String>,
    text: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    alive: bool,
}

impl Node {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            classes: BTreeSet::new(),
            text: None,
            parent: None,
            children: Vec::new(),
            alive: true,
        }
    }
}

// ============================================================================
// Document
// ============================================================================

/// A mutable document tree with change notification.
///
/// Every observable mutation bumps a revision counter and notifies
/// subscribers through a watch channel. Mutations that change nothing
/// are skipped entirely.
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    revision: u64,
    notify: watch::Sender<u64>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates an empty document with a root node.
    pub fn new() -> Self {
        let (notify, _) = watch::channel(0);
        Self {
            nodes: vec![Node::new("root")],
            root: NodeId(0),
            revision: 0,
            notify,
        }
    }

    /// The root node id.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Current revision counter.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Subscribes to mutation notifications.
    ///
    /// The channel carries the revision at the time of the mutation;
    /// bursts coalesce into a single pending notification, which is
    /// exactly the semantics the scheduler wants.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.notify.subscribe()
    }

    fn touch(&mut self) {
        self.revision += 1;
        let _ = self.notify.send(self.revision);
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0).filter(|n| n.alive)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0).filter(|n| n.alive)
    }

    // ========================================================================
    // Construction
    // ========================================================================

    /// Creates a detached element. Attaching it is a separate, observable
    /// mutation; creation alone is not.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(tag));
        id
    }

    /// Deep-clones a subtree into new, detached nodes.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::NotInTree`] if `id` is not live.
    pub fn clone_subtree(&mut self, id: NodeId) -> Result<NodeId, DomError> {
        let source = self.node(id).ok_or(DomError::NotInTree(id))?.clone();
        let mut clone = source.clone();
        clone.parent = None;
        clone.children.clear();
        for child in source.children {
            let child_clone = self.clone_subtree(child)?;
            clone.children.push(child_clone);
        }
        // The clone's slot is only known once all child clones are in the
        // arena; fix up their parent links before pushing it.
        let clone_id = NodeId(self.nodes.len());
        for &child in &clone.children {
            self.nodes[child.0].parent = Some(clone_id);
        }
        self.nodes.push(clone);
        Ok(clone_id)
    }

    // ========================================================================
    // Attachment
    // ========================================================================

    /// Appends a detached node as the last child of `parent`.
    ///
    /// # Errors
    ///
    /// Returns an error if either node is not live or `child` is already
    /// attached.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.attach(parent, child, usize::MAX)
    }

    /// Inserts a detached node as the next sibling of `anchor`.
    ///
    /// # Errors
    ///
    /// Returns an error if `anchor` has no parent or `node` is already
    /// attached.
    pub fn insert_after(&mut self, anchor: NodeId, node: NodeId) -> Result<(), DomError> {
        let parent = self
            .node(anchor)
            .ok_or(DomError::NotInTree(anchor))?
            .parent
            .ok_or(DomError::NoParent(anchor))?;
        let index = self.nodes[parent.0]
            .children
            .iter()
            .position(|&c| c == anchor)
            .map_or(usize::MAX, |i| i + 1);
        self.attach(parent, node, index)
    }

    /// Inserts a detached node among `parent`'s children at `index`
    /// (clamped to the child count).
    ///
    /// # Errors
    ///
    /// Returns an error if either node is not live or `node` is already
    /// attached.
    pub fn insert_child_at(
        &mut self,
        parent: NodeId,
        index: usize,
        node: NodeId,
    ) -> Result<(), DomError> {
        self.attach(parent, node, index)
    }

    fn attach(&mut self, parent: NodeId, child: NodeId, index: usize) -> Result<(), DomError> {
        self.node(parent).ok_or(DomError::NotInTree(parent))?;
        let child_node = self.node(child).ok_or(DomError::NotInTree(child))?;
        if child_node.parent.is_some() {
            return Err(DomError::AlreadyAttached(child));
        }
        let count = self.nodes[parent.0].children.len();
        let index = index.min(count);
        self.nodes[parent.0].children.insert(index, child);
        self.nodes[child.0].parent = Some(parent);
        trace!(?parent, ?child, index, "Attached node");
        self.touch();
        Ok(())
    }

    /// Detaches `id` from its parent and removes its whole subtree.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::NotInTree`] if `id` is not live.
    pub fn remove(&mut self, id: NodeId) -> Result<(), DomError> {
        self.node(id).ok_or(DomError::NotInTree(id))?;
        if let Some(parent) = self.nodes[id.0].parent {
            self.nodes[parent.0].children.retain(|&c| c != id);
        }
        self.kill_subtree(id);
        trace!(?id, "Removed subtree");
        self.touch();
        Ok(())
    }

    fn kill_subtree(&mut self, id: NodeId) {
        let children = std::mem::take(&mut self.nodes[id.0].children);
        for child in children {
            self.kill_subtree(child);
        }
        self.nodes[id.0].alive = false;
        self.nodes[id.0].parent = None;
    }

    // ========================================================================
    // Text & Classes
    // ========================================================================

    /// Sets a node's own text. A write of the current value is a no-op
    /// and does not notify subscribers.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::NotInTree`] if `id` is not live.
    pub fn set_text(&mut self, id: NodeId, text: &str) -> Result<(), DomError> {
        let node = self.node_mut(id).ok_or(DomError::NotInTree(id))?;
        if node.text.as_deref() == Some(text) {
            return Ok(());
        }
        node.text = Some(text.to_string());
        self.touch();
        Ok(())
    }

    /// A node's own text, if any.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.node(id)?.text.as_deref()
    }

    /// Concatenated text of a node and all its descendants, in document
    /// order.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        if let Some(node) = self.node(id) {
            if let Some(text) = &node.text {
                out.push_str(text);
            }
            for &child in &node.children {
                self.collect_text(child, out);
            }
        }
    }

    /// Adds a class; a no-op (no notification) if already present.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::NotInTree`] if `id` is not live.
    pub fn add_class(&mut self, id: NodeId, class: &str) -> Result<(), DomError> {
        let node = self.node_mut(id).ok_or(DomError::NotInTree(id))?;
        if node.classes.insert(class.to_string()) {
            self.touch();
        }
        Ok(())
    }

    /// Whether the node carries the class.
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.node(id).is_some_and(|n| n.classes.contains(class))
    }

    /// The node's tag name.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.node(id).map(|n| n.tag.as_str())
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// The node's parent, if attached.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent
    }

    /// The node's children (empty for dead ids).
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map_or(&[], |n| n.children.as_slice())
    }

    /// The `n`th child.
    pub fn child(&self, id: NodeId, n: usize) -> Option<NodeId> {
        self.children(id).get(n).copied()
    }

    /// Walks `levels` parents up.
    pub fn ancestor(&self, id: NodeId, levels: usize) -> Option<NodeId> {
        let mut current = id;
        for _ in 0..levels {
            current = self.parent(current)?;
        }
        Some(current)
    }

    /// The following sibling, if any.
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let siblings = self.children(parent);
        let index = siblings.iter().position(|&c| c == id)?;
        siblings.get(index + 1).copied()
    }

    /// Whether `id` resolves to a live node attached under the root.
    pub fn contains(&self, id: NodeId) -> bool {
        let Some(node) = self.node(id) else {
            return false;
        };
        if id == self.root {
            return true;
        }
        node.parent.is_some_and(|p| self.contains(p))
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// All attached nodes matching `pred`, in document order.
    pub fn query(&self, pred: impl Fn(&Self, NodeId) -> bool) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.visit(self.root, &pred, &mut out);
        out
    }

    fn visit(
        &self,
        id: NodeId,
        pred: &impl Fn(&Self, NodeId) -> bool,
        out: &mut Vec<NodeId>,
    ) {
        if pred(self, id) {
            out.push(id);
        }
        for &child in self.children(id) {
            self.visit(child, pred, out);
        }
    }

    /// First descendant of `id` (excluding `id` itself) matching `pred`,
    /// depth-first.
    pub fn find_descendant(
        &self,
        id: NodeId,
        pred: impl Fn(&Self, NodeId) -> bool,
    ) -> Option<NodeId> {
        self.descendants(id)
            .into_iter()
            .find(|&d| pred(self, d))
    }

    /// All descendants of `id`, depth-first, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        for &child in self.children(id) {
            self.visit(child, &|_, _| true, &mut out);
        }
        out
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Renders a subtree as a deterministic s-expression, for snapshots
    /// and equality checks in tests.
    pub fn render(&self, id: NodeId) -> String {
        let Some(node) = self.node(id) else {
            return String::from("(dead)");
        };
        let mut out = String::from("(");
        out.push_str(&node.tag);
        for class in &node.classes {
            out.push('.');
            out.push_str(class);
        }
        if let Some(text) = &node.text {
            out.push_str(&format!(" {text:?}"));
        }
        for &child in &node.children {
            out.push(' ');
            out.push_str(&self.render(child));
        }
        out.push(')');
        out
    }

    /// Renders the whole document.
    pub fn outline(&self) -> String {
        self.render(self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(doc: &mut Document, parent: NodeId, tag: &str, text: &str) -> NodeId {
        let id = doc.create_element(tag);
        doc.set_text(id, text).unwrap();
        doc.append_child(parent, id).unwrap();
        id
    }

    #[test]
    fn test_append_and_navigate() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = leaf(&mut doc, root, "a", "one");
        let b = leaf(&mut doc, root, "b", "two");
        assert_eq!(doc.children(root), &[a, b]);
        assert_eq!(doc.next_sibling(a), Some(b));
        assert_eq!(doc.parent(b), Some(root));
        assert_eq!(doc.ancestor(b, 1), Some(root));
    }

    #[test]
    fn test_insert_after_orders_siblings() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = leaf(&mut doc, root, "a", "");
        let c = leaf(&mut doc, root, "c", "");
        let b = doc.create_element("b");
        doc.insert_after(a, b).unwrap();
        assert_eq!(doc.children(root), &[a, b, c]);
    }

    #[test]
    fn test_clone_subtree_is_deep_and_detached() {
        let mut doc = Document::new();
        let outer = doc.create_element("outer");
        doc.append_child(doc.root(), outer).unwrap();
        leaf(&mut doc, outer, "inner", "text");

        let rev_before = doc.revision();
        let clone = doc.clone_subtree(outer).unwrap();
        // Cloning alone is not an observable mutation.
        assert_eq!(doc.revision(), rev_before);
        assert_eq!(doc.parent(clone), None);
        assert_eq!(doc.render(clone), doc.render(outer));

        // Mutating the clone leaves the original alone.
        let inner_clone = doc.child(clone, 0).unwrap();
        doc.set_text(inner_clone, "changed").unwrap();
        assert_eq!(doc.text_content(outer), "text");
    }

    #[test]
    fn test_set_text_same_value_does_not_bump() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = leaf(&mut doc, root, "a", "same");
        let rev = doc.revision();
        doc.set_text(a, "same").unwrap();
        assert_eq!(doc.revision(), rev);
        doc.set_text(a, "different").unwrap();
        assert_eq!(doc.revision(), rev + 1);
    }

    #[test]
    fn test_remove_kills_subtree() {
        let mut doc = Document::new();
        let outer = doc.create_element("outer");
        doc.append_child(doc.root(), outer).unwrap();
        let inner = leaf(&mut doc, outer, "inner", "");

        doc.remove(outer).unwrap();
        assert!(!doc.contains(outer));
        assert!(!doc.contains(inner));
        assert!(doc.children(doc.root()).is_empty());
        assert_eq!(doc.set_text(inner, "x"), Err(DomError::NotInTree(inner)));
    }

    #[test]
    fn test_contains_is_false_for_detached() {
        let mut doc = Document::new();
        let floating = doc.create_element("div");
        assert!(!doc.contains(floating));
        doc.append_child(doc.root(), floating).unwrap();
        assert!(doc.contains(floating));
    }

    #[test]
    fn test_query_document_order() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = leaf(&mut doc, root, "hit", "");
        let wrap = doc.create_element("wrap");
        doc.append_child(doc.root(), wrap).unwrap();
        let b = leaf(&mut doc, wrap, "hit", "");
        let hits = doc.query(|d, id| d.tag(id) == Some("hit"));
        assert_eq!(hits, vec![a, b]);
    }

    #[test]
    fn test_text_content_concatenates_descendants() {
        let mut doc = Document::new();
        let wrap = doc.create_element("wrap");
        doc.append_child(doc.root(), wrap).unwrap();
        leaf(&mut doc, wrap, "span", "2.1M");
        leaf(&mut doc, wrap, "span", " Views");
        assert_eq!(doc.text_content(wrap), "2.1M Views");
    }

    #[tokio::test]
    async fn test_subscribers_see_mutations() {
        let mut doc = Document::new();
        let mut rx = doc.subscribe();
        let rev_start = *rx.borrow_and_update();

        let root = doc.root();
        leaf(&mut doc, root, "a", "x");
        rx.changed().await.unwrap();
        assert!(*rx.borrow_and_update() > rev_start);
    }
}
