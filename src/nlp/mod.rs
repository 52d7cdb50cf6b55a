//! Natural Language Processing components
//!
//! This module provides the closed-class word lists and the supplementary
//! dictionary used to keep reference markers as single tokens.

pub mod dictionary;
pub mod markers;
