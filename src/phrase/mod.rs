//! Phrase extraction components
//!
//! This module provides the two marker-anchored extraction strategies and the
//! ordered phrase → offsets map they produce.

pub mod flat;
pub mod map;
pub mod tree;

pub use flat::FlatExtractor;
pub use map::PhraseOffsets;
pub use tree::TreeExtractor;
