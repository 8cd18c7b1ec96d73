//! # Mailquill DOM
//!
//! An in-memory model of the host document the page agent operates on.
//!
//! The third-party page is not a stable contract, so everything the agent
//! does against it (locating compose regions, injecting controls, capturing
//! selections, splicing text) is written against this explicit tree instead
//! of ad-hoc traversal code. That keeps every heuristic testable against
//! synthetic documents.
//!
//! The model covers the parts of a real document the agent relies on:
//!
//! - elements with attributes, text nodes, parent/child structure
//! - a per-node layout snapshot (size + visibility)
//! - a document-level selection (field offsets or a cloned rich range)
//! - editing commands that preserve an undo journal, and direct value
//!   writes that bypass it
//! - a synthesized-event log and structural mutation records

pub mod document;
pub mod entities;
pub mod node;
pub mod selection;

pub use document::{Document, MutationRecord};
pub use entities::decode_entities;
pub use node::{Layout, NodeId, NodeKind};
pub use selection::{RangeSnapshot, Selection};
