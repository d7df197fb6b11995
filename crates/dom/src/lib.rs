//! Minimal document model for server-side rendering
//!
//! Just enough of `document` / `Node` / `Element` to let UI code build a
//! tree outside a browser, then serialize it back to markup.
//!
//! ## Core Design
//!
//! ```text
//! Document (factory) → DomArena (owned) → NodeId (u32) → Serializer → markup
//! ```
//!
//! Everything is single-threaded and synchronous. Listeners hold `Rc`s, so a
//! `Document` is neither `Send` nor `Sync`.

pub mod arena;
pub mod document;
pub mod element;
pub mod error;
pub mod event;
pub mod render;
pub mod serializer;
pub mod types;
pub mod utils;

pub use arena::DomArena;
pub use document::{Document, DocumentConfig};
pub use element::ElementData;
pub use error::{DomError, Result};
pub use event::{Event, EventInit, EventListener, HandlerOutcome};
pub use serializer::{DomSerializer, SerializerConfig};
pub use types::*;
