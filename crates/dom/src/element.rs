//! Element state: attribute list, style bag, handler registry
//!
//! Attributes are keyed by (namespace, case-insensitive name) and kept in
//! insertion order, which is what the serializer emits.

use ahash::AHashMap;
use smallvec::SmallVec;

use crate::event::EventListener;
use crate::types::{attribute_aliases, Attribute};

/// Per-element data shared by `Element` and `Document` nodes
#[derive(Debug, Clone, Default)]
pub struct ElementData {
    /// Stamped by `createElementNS`
    pub namespace: Option<String>,
    pub attributes: Vec<Attribute>,
    /// Opaque key-value bag, no CSS semantics
    pub style: AHashMap<String, String>,
    /// Attribute-backed properties resolved from the tag at construction
    pub aliases: &'static [&'static str],
    handlers: AHashMap<String, SmallVec<[EventListener; 2]>>,
}

fn names_match(left: &str, right: &str) -> bool {
    left.chars()
        .flat_map(char::to_lowercase)
        .eq(right.chars().flat_map(char::to_lowercase))
}

impl ElementData {
    pub fn new(tag: &str) -> Self {
        Self {
            aliases: attribute_aliases(tag),
            ..Self::default()
        }
    }

    fn position(&self, ns: Option<&str>, name: &str) -> Option<usize> {
        self.attributes
            .iter()
            .position(|attr| attr.namespace.as_deref() == ns && names_match(&attr.name, name))
    }

    pub fn set_attribute_ns(&mut self, ns: Option<&str>, name: &str, value: impl ToString) {
        let value = value.to_string();
        match self.position(ns, name) {
            Some(index) => self.attributes[index].value = value,
            None => self.attributes.push(Attribute {
                namespace: ns.map(str::to_string),
                name: name.to_string(),
                value,
            }),
        }
    }

    pub fn get_attribute_ns(&self, ns: Option<&str>, name: &str) -> Option<&str> {
        self.position(ns, name)
            .map(|index| self.attributes[index].value.as_str())
    }

    pub fn remove_attribute_ns(&mut self, ns: Option<&str>, name: &str) {
        if let Some(index) = self.position(ns, name) {
            self.attributes.remove(index);
        }
    }

    pub fn set_attribute(&mut self, name: &str, value: impl ToString) {
        self.set_attribute_ns(None, name, value);
    }

    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.get_attribute_ns(None, name)
    }

    pub fn remove_attribute(&mut self, name: &str) {
        self.remove_attribute_ns(None, name);
    }

    /// Map a property name to the attribute that backs it, if this element has one
    pub fn property_attribute(&self, property: &str) -> Option<&'static str> {
        match property {
            "id" => Some("id"),
            "className" => Some("class"),
            "cssText" => Some("style"),
            _ => self.aliases.iter().copied().find(|alias| *alias == property),
        }
    }

    /// Register a handler under the lowercased event type
    pub fn add_event_listener(&mut self, event_type: &str, listener: EventListener) {
        self.handlers
            .entry(event_type.to_lowercase())
            .or_default()
            .push(listener);
    }

    /// Remove the most recently added registration of `listener` (by identity)
    pub fn remove_event_listener(&mut self, event_type: &str, listener: &EventListener) {
        if let Some(list) = self.handlers.get_mut(&event_type.to_lowercase()) {
            if let Some(index) = list.iter().rposition(|l| l.same(listener)) {
                list.remove(index);
            }
        }
    }

    /// Snapshot of the handlers for a type, in registration order
    pub fn listeners(&self, event_type: &str) -> Option<SmallVec<[EventListener; 2]>> {
        self.handlers.get(&event_type.to_lowercase()).cloned()
    }
}
