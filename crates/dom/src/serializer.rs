//! Tree serializer - convert a subtree to markup
//!
//! Text is escaped, void elements are self-closed, fragments are transparent.
//! Any other node kind is an error: content is never dropped silently.

use crate::arena::DomArena;
use crate::error::{DomError, Result};
use crate::types::*;
use crate::utils::{escape_text, push_attribute};

/// Serializer configuration
#[derive(Debug, Clone)]
pub struct SerializerConfig {
    /// Deepest nesting serialized before giving up
    pub max_depth: usize,
}

impl Default for SerializerConfig {
    fn default() -> Self {
        Self { max_depth: 512 }
    }
}

/// Markup serializer
#[derive(Debug, Clone, Default)]
pub struct DomSerializer {
    config: SerializerConfig,
}

impl DomSerializer {
    pub fn new() -> Self {
        Self::with_config(SerializerConfig::default())
    }

    pub fn with_config(config: SerializerConfig) -> Self {
        Self { config }
    }

    /// Serialize a node and its subtree (`outerHTML`)
    pub fn serialize(&self, arena: &DomArena, node_id: NodeId) -> Result<String> {
        let mut output = String::with_capacity(256);
        self.serialize_node(arena, node_id, 0, &mut output)?;
        Ok(output)
    }

    /// Serialize only the children of a node (`innerHTML`)
    pub fn serialize_children(&self, arena: &DomArena, node_id: NodeId) -> Result<String> {
        let mut output = String::with_capacity(256);
        for &child_id in &arena.get(node_id)?.children_ids {
            self.serialize_node(arena, child_id, 1, &mut output)?;
        }
        Ok(output)
    }

    fn serialize_node(
        &self,
        arena: &DomArena,
        node_id: NodeId,
        depth: usize,
        output: &mut String,
    ) -> Result<()> {
        if depth > self.config.max_depth {
            return Err(DomError::MaxDepthExceeded {
                current: depth,
                max: self.config.max_depth,
            });
        }

        let node = arena.get(node_id)?;

        match node.node_type {
            NodeType::Text => output.push_str(&escape_text(&node.node_value)),
            NodeType::Element => {
                let tag = node.node_name.to_lowercase();
                output.push('<');
                output.push_str(&tag);

                if let Some(element) = &node.element {
                    for attr in &element.attributes {
                        push_attribute(output, &attr.name, &attr.value);
                    }
                }

                if is_void_element(&tag) {
                    output.push_str("/>");
                    return Ok(());
                }
                output.push('>');

                for &child_id in &node.children_ids {
                    self.serialize_node(arena, child_id, depth + 1, output)?;
                }

                output.push_str("</");
                output.push_str(&tag);
                output.push('>');
            }
            NodeType::DocumentFragment => {
                // Fragments contribute their children only
                for &child_id in &node.children_ids {
                    self.serialize_node(arena, child_id, depth + 1, output)?;
                }
            }
            other => {
                tracing::warn!("No serializer for node {} ({:?})", node_id, node);
                return Err(DomError::UnsupportedNodeKind(other));
            }
        }

        Ok(())
    }
}
