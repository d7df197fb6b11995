//! Document - main entry point for tree operations
//!
//! Owns the arena, acts as the node factory, and exposes the DOM-shaped
//! surface (mutation, queries, attributes, events, markup) over `NodeId`s.
//!
//! `documentElement`, `head` and `body` are assigned by whoever bootstraps
//! the document. `Document::blank()` does the usual html/head/body setup.

use ahash::AHashMap;

use crate::arena::DomArena;
use crate::element::ElementData;
use crate::error::{DomError, Result};
use crate::event::{Event, EventListener, HandlerOutcome};
use crate::serializer::{DomSerializer, SerializerConfig};
use crate::types::*;

/// Configuration for a document
#[derive(Debug, Clone)]
pub struct DocumentConfig {
    /// Arena slots reserved up front
    pub initial_capacity: usize,
    pub serializer: SerializerConfig,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 1024, // Pre-allocate for typical page
            serializer: SerializerConfig::default(),
        }
    }
}

/// A document and every node created through it
#[derive(Debug)]
pub struct Document {
    arena: DomArena,
    serializer: DomSerializer,
    document_id: NodeId,
    document_element: Option<NodeId>,
    head: Option<NodeId>,
    body: Option<NodeId>,
}

impl Document {
    /// Create an empty document with default config
    pub fn new() -> Self {
        Self::with_config(DocumentConfig::default())
    }

    /// Create an empty document with custom config
    pub fn with_config(config: DocumentConfig) -> Self {
        let mut arena = DomArena::with_capacity(config.initial_capacity);
        let mut root = DomNode::new(0, NodeType::Document, DOCUMENT_NODE_NAME.to_string());
        root.element = Some(Box::new(ElementData::new(DOCUMENT_NODE_NAME)));
        let document_id = arena.add_node(root);

        Self {
            arena,
            serializer: DomSerializer::with_config(config.serializer),
            document_id,
            document_element: None,
            head: None,
            body: None,
        }
    }

    /// Document with `<html><head></head><body></body></html>` attached and assigned
    pub fn blank() -> Result<Self> {
        let mut document = Self::new();
        let html = document.create_element("html");
        let head = document.create_element("head");
        let body = document.create_element("body");

        document.append_child(document.document_id, html)?;
        document.append_child(html, head)?;
        document.append_child(html, body)?;

        document.set_document_element(Some(html))?;
        document.set_head(Some(head))?;
        document.set_body(Some(body))?;
        Ok(document)
    }

    /// Get reference to internal arena
    pub fn arena(&self) -> &DomArena {
        &self.arena
    }

    /// Get a node record
    pub fn node(&self, node_id: NodeId) -> Result<&DomNode> {
        self.arena.get(node_id)
    }

    /// The document node itself
    pub fn document_id(&self) -> NodeId {
        self.document_id
    }

    pub fn document_element(&self) -> Option<NodeId> {
        self.document_element
    }

    pub fn head(&self) -> Option<NodeId> {
        self.head
    }

    pub fn body(&self) -> Option<NodeId> {
        self.body
    }

    pub fn set_document_element(&mut self, node_id: Option<NodeId>) -> Result<()> {
        self.document_element = self.checked(node_id)?;
        Ok(())
    }

    pub fn set_head(&mut self, node_id: Option<NodeId>) -> Result<()> {
        self.head = self.checked(node_id)?;
        Ok(())
    }

    pub fn set_body(&mut self, node_id: Option<NodeId>) -> Result<()> {
        self.body = self.checked(node_id)?;
        Ok(())
    }

    fn checked(&self, node_id: Option<NodeId>) -> Result<Option<NodeId>> {
        if let Some(id) = node_id {
            self.arena.get(id)?;
        }
        Ok(node_id)
    }

    // ---- factory --------------------------------------------------------

    /// Create an element; the tag is stored upper-cased
    pub fn create_element(&mut self, tag_name: &str) -> NodeId {
        let mut node = DomNode::new(0, NodeType::Element, tag_name.to_uppercase());
        node.element = Some(Box::new(ElementData::new(tag_name)));
        let node_id = self.arena.add_node(node);
        tracing::debug!("Created element {} <{}>", node_id, tag_name);
        node_id
    }

    /// Create an element and stamp its namespace
    pub fn create_element_ns(&mut self, namespace: &str, tag_name: &str) -> NodeId {
        let node_id = self.create_element(tag_name);
        if let Ok(element) = self.element_mut(node_id) {
            element.namespace = Some(namespace.to_string());
        }
        node_id
    }

    pub fn create_text_node(&mut self, value: &str) -> NodeId {
        let mut node = DomNode::new(0, NodeType::Text, TEXT_NODE_NAME.to_string());
        node.node_value = value.to_string();
        self.arena.add_node(node)
    }

    pub fn create_document_fragment(&mut self) -> NodeId {
        self.arena.add_node(DomNode::new(
            0,
            NodeType::DocumentFragment,
            FRAGMENT_NODE_NAME.to_string(),
        ))
    }

    // ---- mutation -------------------------------------------------------

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<NodeId> {
        self.arena.append_child(parent, child)
    }

    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<NodeId> {
        self.arena.insert_before(parent, child, reference)
    }

    pub fn replace_child(
        &mut self,
        parent: NodeId,
        new_child: NodeId,
        old_child: NodeId,
    ) -> Result<NodeId> {
        self.arena.replace_child(parent, new_child, old_child)
    }

    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<NodeId> {
        self.arena.remove_child(parent, child)
    }

    /// Detach a node from its parent; no-op when unattached
    pub fn remove(&mut self, node_id: NodeId) -> Result<()> {
        self.arena.detach(node_id)
    }

    // ---- queries --------------------------------------------------------

    pub fn node_type(&self, node_id: NodeId) -> Result<NodeType> {
        Ok(self.arena.get(node_id)?.node_type)
    }

    pub fn node_name(&self, node_id: NodeId) -> Result<&str> {
        Ok(&self.arena.get(node_id)?.node_name)
    }

    /// Upper-cased tag name, `None` for non-elements
    pub fn tag_name(&self, node_id: NodeId) -> Result<Option<&str>> {
        Ok(self.arena.get(node_id)?.tag_name())
    }

    pub fn namespace(&self, node_id: NodeId) -> Result<Option<&str>> {
        Ok(self.element(node_id)?.namespace.as_deref())
    }

    pub fn parent_node(&self, node_id: NodeId) -> Result<Option<NodeId>> {
        self.arena.parent(node_id)
    }

    /// Same as `parent_node`: any parent counts
    pub fn parent_element(&self, node_id: NodeId) -> Result<Option<NodeId>> {
        self.arena.parent(node_id)
    }

    pub fn child_nodes(&self, node_id: NodeId) -> Result<&[NodeId]> {
        self.arena.child_nodes(node_id)
    }

    /// Element-kind children only
    pub fn children(&self, node_id: NodeId) -> Result<Vec<NodeId>> {
        self.arena.element_children(node_id)
    }

    pub fn first_child(&self, node_id: NodeId) -> Result<Option<NodeId>> {
        self.arena.first_child(node_id)
    }

    pub fn last_child(&self, node_id: NodeId) -> Result<Option<NodeId>> {
        self.arena.last_child(node_id)
    }

    pub fn next_sibling(&self, node_id: NodeId) -> Result<Option<NodeId>> {
        self.arena.next_sibling(node_id)
    }

    pub fn previous_sibling(&self, node_id: NodeId) -> Result<Option<NodeId>> {
        self.arena.previous_sibling(node_id)
    }

    pub fn has_child_nodes(&self, node_id: NodeId) -> Result<bool> {
        self.arena.has_child_nodes(node_id)
    }

    /// True when the node is `BODY` or sits under a `BODY`; not a real document-root test
    pub fn is_connected(&self, node_id: NodeId) -> Result<bool> {
        self.arena.is_connected(node_id)
    }

    /// Containment is not implemented and always reports false
    pub fn contains(&self, _node_id: NodeId, _other: NodeId) -> bool {
        false
    }

    /// Text payload of a text node
    pub fn text_content(&self, node_id: NodeId) -> Result<&str> {
        let node = self.arena.get(node_id)?;
        if !node.is_text() {
            return Err(invalid_type("Text", node.node_type));
        }
        Ok(&node.node_value)
    }

    pub fn set_text_content(&mut self, node_id: NodeId, value: &str) -> Result<()> {
        let node = self.arena.get_mut(node_id)?;
        if !node.is_text() {
            return Err(invalid_type("Text", node.node_type));
        }
        node.node_value = value.to_string();
        Ok(())
    }

    // ---- attributes -----------------------------------------------------

    /// Element data of an element or of the document node
    pub fn element(&self, node_id: NodeId) -> Result<&ElementData> {
        let node = self.arena.get(node_id)?;
        match node.element.as_deref() {
            Some(element) => Ok(element),
            None => Err(invalid_type("Element", node.node_type)),
        }
    }

    pub fn element_mut(&mut self, node_id: NodeId) -> Result<&mut ElementData> {
        let node = self.arena.get_mut(node_id)?;
        let node_type = node.node_type;
        match node.element.as_deref_mut() {
            Some(element) => Ok(element),
            None => Err(invalid_type("Element", node_type)),
        }
    }

    pub fn attributes(&self, node_id: NodeId) -> Result<&[Attribute]> {
        Ok(&self.element(node_id)?.attributes)
    }

    pub fn set_attribute(
        &mut self,
        node_id: NodeId,
        name: &str,
        value: impl ToString,
    ) -> Result<()> {
        self.element_mut(node_id)?.set_attribute(name, value);
        Ok(())
    }

    pub fn get_attribute(&self, node_id: NodeId, name: &str) -> Result<Option<&str>> {
        Ok(self.element(node_id)?.get_attribute(name))
    }

    pub fn remove_attribute(&mut self, node_id: NodeId, name: &str) -> Result<()> {
        self.element_mut(node_id)?.remove_attribute(name);
        Ok(())
    }

    pub fn set_attribute_ns(
        &mut self,
        node_id: NodeId,
        namespace: Option<&str>,
        name: &str,
        value: impl ToString,
    ) -> Result<()> {
        self.element_mut(node_id)?
            .set_attribute_ns(namespace, name, value);
        Ok(())
    }

    pub fn get_attribute_ns(
        &self,
        node_id: NodeId,
        namespace: Option<&str>,
        name: &str,
    ) -> Result<Option<&str>> {
        Ok(self.element(node_id)?.get_attribute_ns(namespace, name))
    }

    pub fn remove_attribute_ns(
        &mut self,
        node_id: NodeId,
        namespace: Option<&str>,
        name: &str,
    ) -> Result<()> {
        self.element_mut(node_id)?
            .remove_attribute_ns(namespace, name);
        Ok(())
    }

    pub fn id(&self, node_id: NodeId) -> Result<Option<&str>> {
        self.get_attribute(node_id, "id")
    }

    pub fn set_id(&mut self, node_id: NodeId, value: impl ToString) -> Result<()> {
        self.set_attribute(node_id, "id", value)
    }

    pub fn class_name(&self, node_id: NodeId) -> Result<Option<&str>> {
        self.get_attribute(node_id, "class")
    }

    pub fn set_class_name(&mut self, node_id: NodeId, value: impl ToString) -> Result<()> {
        self.set_attribute(node_id, "class", value)
    }

    pub fn css_text(&self, node_id: NodeId) -> Result<Option<&str>> {
        self.get_attribute(node_id, "style")
    }

    pub fn set_css_text(&mut self, node_id: NodeId, value: impl ToString) -> Result<()> {
        self.set_attribute(node_id, "style", value)
    }

    /// Read an attribute-backed property (`id`, `className`, `cssText`, or a tag alias like `href`)
    pub fn property(&self, node_id: NodeId, property: &str) -> Result<Option<&str>> {
        let attribute = self.property_attribute(node_id, property)?;
        self.get_attribute(node_id, attribute)
    }

    /// Write an attribute-backed property
    ///
    /// Properties the element does not have are rejected rather than turned
    /// into attributes.
    pub fn set_property(
        &mut self,
        node_id: NodeId,
        property: &str,
        value: impl ToString,
    ) -> Result<()> {
        let attribute = self.property_attribute(node_id, property)?;
        self.set_attribute(node_id, attribute, value)
    }

    fn property_attribute(&self, node_id: NodeId, property: &str) -> Result<&'static str> {
        self.element(node_id)?
            .property_attribute(property)
            .ok_or_else(|| DomError::UnknownProperty {
                tag: self
                    .node_name(node_id)
                    .map(str::to_lowercase)
                    .unwrap_or_default(),
                property: property.to_string(),
            })
    }

    pub fn style(&self, node_id: NodeId) -> Result<&AHashMap<String, String>> {
        Ok(&self.element(node_id)?.style)
    }

    pub fn style_mut(&mut self, node_id: NodeId) -> Result<&mut AHashMap<String, String>> {
        Ok(&mut self.element_mut(node_id)?.style)
    }

    // ---- events ---------------------------------------------------------

    pub fn add_event_listener(
        &mut self,
        node_id: NodeId,
        event_type: &str,
        listener: EventListener,
    ) -> Result<()> {
        self.element_mut(node_id)?
            .add_event_listener(event_type, listener);
        Ok(())
    }

    pub fn remove_event_listener(
        &mut self,
        node_id: NodeId,
        event_type: &str,
        listener: &EventListener,
    ) -> Result<()> {
        self.element_mut(node_id)?
            .remove_event_listener(event_type, listener);
        Ok(())
    }

    /// Dispatch `event` at `target`, bubbling up through parents
    ///
    /// Handlers at each node run last-registered-first. A handler returning
    /// `Cancel`, or one that stops immediate propagation, marks a cancelable
    /// event as default-prevented. Stopping propagation only halts bubbling
    /// for cancelable events. Returns whether any visited node had handlers
    /// for this type.
    pub fn dispatch_event(&mut self, target: NodeId, event: &mut Event) -> Result<bool> {
        self.element(target)?;
        event.target = Some(target);

        let cancelable = event.cancelable;
        let mut handled = false;
        let mut current = Some(target);

        while let Some(node_id) = current {
            event.current_target = Some(node_id);

            // Snapshot so handlers can mutate the tree and registrations
            let listeners = self
                .arena
                .get(node_id)?
                .element
                .as_ref()
                .and_then(|element| element.listeners(&event.event_type));

            if let Some(listeners) = listeners {
                handled = true;
                tracing::trace!(
                    "Dispatching '{}' to {} handler(s) on node {}",
                    event.event_type,
                    listeners.len(),
                    node_id
                );
                for listener in listeners.iter().rev() {
                    let outcome = listener.call(self, event);
                    if (outcome == HandlerOutcome::Cancel || event.immediate_propagation_stopped)
                        && cancelable
                    {
                        event.default_prevented = true;
                    }
                    if event.immediate_propagation_stopped {
                        break;
                    }
                }
            }

            if !event.bubbles || (cancelable && event.propagation_stopped) {
                break;
            }
            current = self.arena.get(node_id)?.parent_id;
        }

        Ok(handled)
    }

    // ---- markup ---------------------------------------------------------

    /// Serialize the node itself and its subtree
    pub fn outer_html(&self, node_id: NodeId) -> Result<String> {
        self.serializer.serialize(&self.arena, node_id)
    }

    /// Serialize the node's children only
    pub fn inner_html(&self, node_id: NodeId) -> Result<String> {
        self.serializer.serialize_children(&self.arena, node_id)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

fn invalid_type(expected: &str, actual: NodeType) -> DomError {
    DomError::InvalidNodeType {
        expected: expected.to_string(),
        actual: format!("{:?}", actual),
    }
}
