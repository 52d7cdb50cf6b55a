//! Merged leaf labels
//!
//! After merging, a preterminal label reads `"{start}-{tag}"`. Labels the
//! parser filled in itself (punctuation literals, for example) carry no
//! offset and decode with `offset == None`.

use crate::error::{ExtractError, Result};

/// A decoded preterminal label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeafLabel<'a> {
    pub offset: Option<usize>,
    pub tag: &'a str,
}

impl<'a> LeafLabel<'a> {
    /// Decode `label`, splitting on the first `separator`.
    ///
    /// The part before the separator must be a decimal offset; anything else
    /// is treated as an unmerged label whose tag is the whole string.
    pub fn parse(label: &'a str, separator: char) -> Self {
        match label.split_once(separator) {
            Some((offset, tag)) => match offset.parse::<usize>() {
                Ok(offset) => LeafLabel {
                    offset: Some(offset),
                    tag,
                },
                Err(_) => LeafLabel { offset: None, tag: label },
            },
            None => LeafLabel { offset: None, tag: label },
        }
    }

    /// The start offset, or an error naming the raw label.
    pub fn require_offset(label: &str, separator: char) -> Result<usize> {
        LeafLabel::parse(label, separator)
            .offset
            .ok_or_else(|| ExtractError::LeafLabel {
                label: label.to_string(),
            })
    }

    /// Encode `offset` and `tag` into a merged label.
    pub fn encode(offset: usize, tag: &str, separator: char) -> String {
        format!("{offset}{separator}{tag}")
    }
}
