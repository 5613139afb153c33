//! weft-dom: the live markup tree the weft editor renders into and reads from.
//!
//! This crate provides:
//! - `Dom` - an arena of element, text and comment nodes addressed by `NodeId`
//! - attribute, class token and inline style access on elements
//! - tree mutation primitives (insert before a reference node, unwrap, wrap)
//! - HTML serialization and HTML fragment loading (via html5ever)
//!
//! Node handles are generational: freeing a node (or resetting the whole
//! arena) invalidates every handle that pointed at it, so a stale handle is
//! detected instead of silently addressing a recycled slot.

mod attrs;
mod dom;
mod error;
mod node;
mod parse;
mod position;
mod serialize;

pub use attrs::{Attribute, StyleDeclarations};
pub use dom::{Ancestors, Dom};
pub use error::DomError;
pub use node::{ElementData, NodeData, NodeId};
pub use parse::parse_fragment;
pub use position::DomPosition;
pub use serialize::is_void_element;

/// Zero-width space, used as caret landing text next to atomic content.
pub const ZERO_WIDTH_SPACE: char = '\u{200B}';

/// Non-breaking space.
pub const NBSP: char = '\u{00A0}';
