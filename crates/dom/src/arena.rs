//! Arena-based tree storage and the generic node primitive
//!
//! ## Memory Layout
//!
//! ```text
//! Arena: Vec<DomNode>
//!        [Node0][Node1][Node2]...
//!         ↑ 4-byte index, not 8-byte pointer
//! ```
//!
//! Nodes are never freed. Detached nodes stay in the arena and can be
//! re-attached later; identity is the index.

use crate::error::{DomError, Result};
use crate::types::{DomNode, NodeId, NodeType, BODY_NODE_NAME};

/// Arena allocator for tree nodes
///
/// Invariant: a node id appears in at most one `children_ids` list, and its
/// `parent_id` names exactly that list's owner (or is `None`).
#[derive(Debug)]
pub struct DomArena {
    /// All nodes stored sequentially (cache-friendly)
    nodes: Vec<DomNode>,
}

impl DomArena {
    /// Create a new empty arena
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    /// Create arena with specific capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Add a node to the arena, returns its ID
    ///
    /// The node's own `node_id` is overwritten with its slot index.
    pub fn add_node(&mut self, mut node: DomNode) -> NodeId {
        let node_id = self.nodes.len() as NodeId;
        node.node_id = node_id;
        self.nodes.push(node);
        node_id
    }

    /// Get node by ID (immutable)
    pub fn get(&self, node_id: NodeId) -> Result<&DomNode> {
        self.nodes
            .get(node_id as usize)
            .ok_or(DomError::NodeNotFound(node_id))
    }

    /// Get node by ID (mutable)
    pub fn get_mut(&mut self, node_id: NodeId) -> Result<&mut DomNode> {
        self.nodes
            .get_mut(node_id as usize)
            .ok_or(DomError::NodeNotFound(node_id))
    }

    /// Total number of nodes, attached or not
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if arena is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ---- mutation -------------------------------------------------------

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<NodeId> {
        self.insert_before(parent, child, None)
    }

    /// Move `child` under `parent`, right before `reference`
    ///
    /// A `reference` that is not a child of `parent` appends at the end.
    /// Inserting a node under itself or one of its descendants, or under a
    /// text node, fails with `HierarchyRequest`.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<NodeId> {
        let parent_type = self.get(parent)?.node_type;
        self.get(child)?;
        if let Some(reference) = reference {
            self.get(reference)?;
        }

        if parent_type == NodeType::Text || self.is_inclusive_ancestor(child, parent)? {
            return Err(DomError::HierarchyRequest { parent, child });
        }

        // Inserting before itself keeps the node where it is
        let reference = match reference {
            Some(reference) if reference == child => self.next_sibling(child)?,
            other => other,
        };

        self.detach(child)?;
        self.get_mut(child)?.parent_id = Some(parent);

        let parent_node = self.get_mut(parent)?;
        let position = reference.and_then(|reference| {
            parent_node
                .children_ids
                .iter()
                .position(|&id| id == reference)
        });
        match position {
            Some(index) => parent_node.children_ids.insert(index, child),
            None => parent_node.children_ids.push(child),
        }

        tracing::trace!("Inserted node {} under {} at {:?}", child, parent, position);
        Ok(child)
    }

    /// Insert `new_child` where `old_child` is, then detach `old_child`
    pub fn replace_child(
        &mut self,
        parent: NodeId,
        new_child: NodeId,
        old_child: NodeId,
    ) -> Result<NodeId> {
        self.get(parent)?;
        if self.get(old_child)?.parent_id != Some(parent) {
            return Err(DomError::NotAChild {
                parent,
                child: old_child,
            });
        }
        if new_child == old_child {
            return Ok(old_child);
        }

        self.insert_before(parent, new_child, Some(old_child))?;
        self.detach(old_child)?;
        Ok(old_child)
    }

    /// Remove `child` from `parent`; a no-op when it is not a child
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<NodeId> {
        self.get(child)?;
        let parent_node = self.get_mut(parent)?;
        if let Some(index) = parent_node.children_ids.iter().position(|&id| id == child) {
            parent_node.children_ids.remove(index);
            self.get_mut(child)?.parent_id = None;
        }
        Ok(child)
    }

    /// Detach a node from its parent, if it has one
    pub fn detach(&mut self, node_id: NodeId) -> Result<()> {
        if let Some(parent) = self.get(node_id)?.parent_id {
            tracing::trace!("Detaching node {} from {}", node_id, parent);
            self.remove_child(parent, node_id)?;
        }
        Ok(())
    }

    // ---- navigation -----------------------------------------------------

    pub fn parent(&self, node_id: NodeId) -> Result<Option<NodeId>> {
        Ok(self.get(node_id)?.parent_id)
    }

    pub fn child_nodes(&self, node_id: NodeId) -> Result<&[NodeId]> {
        Ok(&self.get(node_id)?.children_ids)
    }

    /// Element-kind children only
    pub fn element_children(&self, node_id: NodeId) -> Result<Vec<NodeId>> {
        let mut elements = Vec::new();
        for &child in self.child_nodes(node_id)? {
            if self.get(child)?.is_element() {
                elements.push(child);
            }
        }
        Ok(elements)
    }

    pub fn first_child(&self, node_id: NodeId) -> Result<Option<NodeId>> {
        Ok(self.child_nodes(node_id)?.first().copied())
    }

    pub fn last_child(&self, node_id: NodeId) -> Result<Option<NodeId>> {
        Ok(self.child_nodes(node_id)?.last().copied())
    }

    pub fn has_child_nodes(&self, node_id: NodeId) -> Result<bool> {
        Ok(!self.child_nodes(node_id)?.is_empty())
    }

    pub fn next_sibling(&self, node_id: NodeId) -> Result<Option<NodeId>> {
        self.sibling(node_id, |index| index.checked_add(1))
    }

    pub fn previous_sibling(&self, node_id: NodeId) -> Result<Option<NodeId>> {
        self.sibling(node_id, |index| index.checked_sub(1))
    }

    fn sibling<F>(&self, node_id: NodeId, step: F) -> Result<Option<NodeId>>
    where
        F: Fn(usize) -> Option<usize>,
    {
        let Some(parent) = self.get(node_id)?.parent_id else {
            return Ok(None);
        };
        let siblings = self.child_nodes(parent)?;
        Ok(siblings
            .iter()
            .position(|&id| id == node_id)
            .and_then(step)
            .and_then(|index| siblings.get(index).copied()))
    }

    /// True if `ancestor` is `node_id` or reachable by walking parents from it
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node_id: NodeId) -> Result<bool> {
        let mut current = Some(node_id);
        while let Some(id) = current {
            if id == ancestor {
                return Ok(true);
            }
            current = self.get(id)?.parent_id;
        }
        Ok(false)
    }

    /// Approximate connectivity: the node is `BODY` or has a `BODY` ancestor
    pub fn is_connected(&self, node_id: NodeId) -> Result<bool> {
        let mut current = Some(node_id);
        while let Some(id) = current {
            let node = self.get(id)?;
            if node.node_name == BODY_NODE_NAME {
                return Ok(true);
            }
            current = node.parent_id;
        }
        Ok(false)
    }
}

impl Default for DomArena {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(arena: &mut DomArena, name: &str) -> NodeId {
        arena.add_node(DomNode::new(0, NodeType::Element, name.to_string()))
    }

    fn text(arena: &mut DomArena, value: &str) -> NodeId {
        let mut node = DomNode::new(0, NodeType::Text, "#text".to_string());
        node.node_value = value.to_string();
        arena.add_node(node)
    }

    #[test]
    fn test_arena_basic() {
        let mut arena = DomArena::new();
        let id = element(&mut arena, "DIV");
        assert_eq!(id, 0);
        assert_eq!(arena.get(id).unwrap().node_name, "DIV");
        assert!(matches!(arena.get(7), Err(DomError::NodeNotFound(7))));
    }

    #[test]
    fn test_append_then_remove_restores_children() {
        let mut arena = DomArena::new();
        let parent = element(&mut arena, "UL");
        let a = element(&mut arena, "LI");
        let b = element(&mut arena, "LI");
        arena.append_child(parent, a).unwrap();
        let before = arena.child_nodes(parent).unwrap().to_vec();

        arena.append_child(parent, b).unwrap();
        assert_eq!(arena.remove_child(parent, b).unwrap(), b);

        assert_eq!(arena.child_nodes(parent).unwrap(), before.as_slice());
        assert_eq!(arena.parent(b).unwrap(), None);
    }

    #[test]
    fn test_insert_before_links_siblings() {
        let mut arena = DomArena::new();
        let parent = element(&mut arena, "DIV");
        let a = element(&mut arena, "A");
        let c = element(&mut arena, "C");
        let b = element(&mut arena, "B");
        arena.append_child(parent, a).unwrap();
        arena.append_child(parent, c).unwrap();

        arena.insert_before(parent, b, Some(c)).unwrap();

        assert_eq!(arena.child_nodes(parent).unwrap(), &[a, b, c]);
        assert_eq!(arena.next_sibling(b).unwrap(), Some(c));
        assert_eq!(arena.previous_sibling(b).unwrap(), Some(a));
        assert_eq!(arena.previous_sibling(a).unwrap(), None);
        assert_eq!(arena.next_sibling(c).unwrap(), None);
    }

    #[test]
    fn test_insert_before_unknown_reference_appends() {
        let mut arena = DomArena::new();
        let parent = element(&mut arena, "DIV");
        let other = element(&mut arena, "DIV");
        let stray = element(&mut arena, "SPAN");
        let a = element(&mut arena, "A");
        let b = element(&mut arena, "B");
        arena.append_child(other, stray).unwrap();
        arena.append_child(parent, a).unwrap();

        arena.insert_before(parent, b, Some(stray)).unwrap();
        assert_eq!(arena.child_nodes(parent).unwrap(), &[a, b]);
    }

    #[test]
    fn test_insert_before_itself_is_stable() {
        let mut arena = DomArena::new();
        let parent = element(&mut arena, "DIV");
        let a = element(&mut arena, "A");
        let b = element(&mut arena, "B");
        arena.append_child(parent, a).unwrap();
        arena.append_child(parent, b).unwrap();

        arena.insert_before(parent, a, Some(a)).unwrap();
        assert_eq!(arena.child_nodes(parent).unwrap(), &[a, b]);
    }

    #[test]
    fn test_move_detaches_exactly_once() {
        let mut arena = DomArena::new();
        let from = element(&mut arena, "DIV");
        let to = element(&mut arena, "DIV");
        let node = element(&mut arena, "P");
        let keep = element(&mut arena, "P");
        arena.append_child(from, node).unwrap();
        arena.append_child(from, keep).unwrap();

        arena.append_child(to, node).unwrap();

        assert_eq!(arena.child_nodes(from).unwrap(), &[keep]);
        assert_eq!(arena.child_nodes(to).unwrap(), &[node]);
        assert_eq!(arena.parent(node).unwrap(), Some(to));
    }

    #[test]
    fn test_replace_child() {
        let mut arena = DomArena::new();
        let parent = element(&mut arena, "DIV");
        let old = element(&mut arena, "OLD");
        let new = element(&mut arena, "NEW");
        let tail = element(&mut arena, "TAIL");
        arena.append_child(parent, old).unwrap();
        arena.append_child(parent, tail).unwrap();

        assert_eq!(arena.replace_child(parent, new, old).unwrap(), old);
        assert_eq!(arena.child_nodes(parent).unwrap(), &[new, tail]);
        assert_eq!(arena.parent(old).unwrap(), None);
        assert_eq!(arena.parent(new).unwrap(), Some(parent));
    }

    #[test]
    fn test_replace_non_child_fails_without_mutation() {
        let mut arena = DomArena::new();
        let parent = element(&mut arena, "DIV");
        let a = element(&mut arena, "A");
        let loose = element(&mut arena, "B");
        let new = element(&mut arena, "C");
        arena.append_child(parent, a).unwrap();

        let err = arena.replace_child(parent, new, loose).unwrap_err();
        assert!(matches!(err, DomError::NotAChild { child, .. } if child == loose));
        assert_eq!(arena.child_nodes(parent).unwrap(), &[a]);
        assert_eq!(arena.parent(new).unwrap(), None);
    }

    #[test]
    fn test_remove_child_not_present_is_noop() {
        let mut arena = DomArena::new();
        let parent = element(&mut arena, "DIV");
        let other = element(&mut arena, "DIV");
        let child = element(&mut arena, "P");
        arena.append_child(other, child).unwrap();

        assert_eq!(arena.remove_child(parent, child).unwrap(), child);
        assert_eq!(arena.parent(child).unwrap(), Some(other));
        assert_eq!(arena.child_nodes(other).unwrap(), &[child]);
    }

    #[test]
    fn test_detach_unattached_is_noop() {
        let mut arena = DomArena::new();
        let node = element(&mut arena, "P");
        arena.detach(node).unwrap();
        assert_eq!(arena.parent(node).unwrap(), None);
    }

    #[test]
    fn test_cycles_rejected() {
        let mut arena = DomArena::new();
        let outer = element(&mut arena, "DIV");
        let inner = element(&mut arena, "DIV");
        arena.append_child(outer, inner).unwrap();

        assert!(matches!(
            arena.append_child(inner, outer),
            Err(DomError::HierarchyRequest { .. })
        ));
        assert!(matches!(
            arena.append_child(outer, outer),
            Err(DomError::HierarchyRequest { .. })
        ));
        assert_eq!(arena.child_nodes(outer).unwrap(), &[inner]);
    }

    #[test]
    fn test_text_nodes_take_no_children() {
        let mut arena = DomArena::new();
        let leaf = text(&mut arena, "hi");
        let child = element(&mut arena, "B");
        assert!(matches!(
            arena.append_child(leaf, child),
            Err(DomError::HierarchyRequest { .. })
        ));
    }

    #[test]
    fn test_navigation() {
        let mut arena = DomArena::new();
        let parent = element(&mut arena, "DIV");
        assert!(!arena.has_child_nodes(parent).unwrap());
        assert_eq!(arena.first_child(parent).unwrap(), None);

        let t = text(&mut arena, "x");
        let e = element(&mut arena, "SPAN");
        arena.append_child(parent, t).unwrap();
        arena.append_child(parent, e).unwrap();

        assert!(arena.has_child_nodes(parent).unwrap());
        assert_eq!(arena.first_child(parent).unwrap(), Some(t));
        assert_eq!(arena.last_child(parent).unwrap(), Some(e));
        assert_eq!(arena.element_children(parent).unwrap(), vec![e]);
        assert_eq!(arena.next_sibling(parent).unwrap(), None);
    }

    #[test]
    fn test_is_connected_looks_for_body() {
        let mut arena = DomArena::new();
        let body = element(&mut arena, "BODY");
        let div = element(&mut arena, "DIV");
        let leaf = text(&mut arena, "x");
        arena.append_child(div, leaf).unwrap();

        assert!(arena.is_connected(body).unwrap());
        assert!(!arena.is_connected(leaf).unwrap());

        arena.append_child(body, div).unwrap();
        assert!(arena.is_connected(leaf).unwrap());
    }
}
