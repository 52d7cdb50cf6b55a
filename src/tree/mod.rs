//! Constituency trees
//!
//! This module provides the tree representation consumed by the tree-based
//! extractor, a bracketed-notation reader/writer for parser output, and the
//! span/tag merger that injects token offsets and POS tags into leaf labels.

pub mod bracket;
pub mod label;
pub mod merge;
pub mod node;

pub use label::LeafLabel;
pub use merge::SpanTagMerger;
pub use node::{Child, ParseTree};
