//! Event object and listener handles
//!
//! Events are plain mutable records. Dispatch lives on `Document` because
//! handlers get mutable access to the tree while they run.

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::error::Result;
use crate::types::NodeId;

/// Options accepted by the `Event` constructor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventInit {
    pub bubbles: bool,
    pub cancelable: bool,
}

impl EventInit {
    /// Parse an options dictionary such as `{"bubbles": true}`
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub event_type: String,
    pub bubbles: bool,
    pub cancelable: bool,
    pub target: Option<NodeId>,
    pub current_target: Option<NodeId>,
    pub default_prevented: bool,
    pub propagation_stopped: bool,
    pub immediate_propagation_stopped: bool,
}

impl Event {
    pub fn new(event_type: impl Into<String>, init: EventInit) -> Self {
        Self {
            event_type: event_type.into(),
            bubbles: init.bubbles,
            cancelable: init.cancelable,
            target: None,
            current_target: None,
            default_prevented: false,
            propagation_stopped: false,
            immediate_propagation_stopped: false,
        }
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn stop_immediate_propagation(&mut self) {
        self.propagation_stopped = true;
        self.immediate_propagation_stopped = true;
    }

    /// No effect on events that are not cancelable
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }
}

/// What a handler asks of the dispatcher after it returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerOutcome {
    Continue,
    /// The `return false` convention: cancels the default action of cancelable events
    Cancel,
}

type HandlerFn = dyn Fn(&mut Document, &mut Event) -> HandlerOutcome;

/// Shared handle to an event handler
///
/// Cloning keeps identity, so a clone can later be passed to
/// `remove_event_listener` to unregister the original.
#[derive(Clone)]
pub struct EventListener(Rc<HandlerFn>);

impl EventListener {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&mut Document, &mut Event) -> HandlerOutcome + 'static,
    {
        Self(Rc::new(handler))
    }

    /// Identity comparison (same allocation), never structural
    pub fn same(&self, other: &EventListener) -> bool {
        std::ptr::eq(
            Rc::as_ptr(&self.0) as *const (),
            Rc::as_ptr(&other.0) as *const (),
        )
    }

    pub(crate) fn call(&self, document: &mut Document, event: &mut Event) -> HandlerOutcome {
        (self.0)(document, event)
    }
}

impl fmt::Debug for EventListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventListener({:p})", Rc::as_ptr(&self.0) as *const ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_defaults() {
        let event = Event::new("click", EventInit::default());
        assert!(!event.bubbles);
        assert!(!event.cancelable);
        assert!(!event.default_prevented);
        assert_eq!(event.target, None);
    }

    #[test]
    fn test_control_flags() {
        let mut event = Event::new(
            "click",
            EventInit {
                bubbles: true,
                cancelable: true,
            },
        );
        event.stop_propagation();
        assert!(event.propagation_stopped);
        assert!(!event.immediate_propagation_stopped);

        event.stop_immediate_propagation();
        assert!(event.propagation_stopped);
        assert!(event.immediate_propagation_stopped);

        event.prevent_default();
        assert!(event.default_prevented);
    }

    #[test]
    fn test_prevent_default_requires_cancelable() {
        let mut event = Event::new("scroll", EventInit::default());
        event.prevent_default();
        assert!(!event.default_prevented);
    }

    #[test]
    fn test_init_from_json() {
        let init = EventInit::from_json(r#"{"bubbles": true}"#).unwrap();
        assert!(init.bubbles);
        assert!(!init.cancelable);

        assert!(EventInit::from_json("{bubbles").is_err());
    }

    #[test]
    fn test_listener_identity() {
        let a = EventListener::new(|_, _| HandlerOutcome::Continue);
        let b = EventListener::new(|_, _| HandlerOutcome::Continue);
        assert!(a.same(&a.clone()));
        assert!(!a.same(&b));
    }
}
