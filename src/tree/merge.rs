//! Span/tag merging
//!
//! Folds POS tags and token start offsets into the preterminal labels of a
//! constituency tree so both survive tree traversal. Preterminal `i` (in
//! left-to-right order) receives `"{starts[i]}-{tags[i]}"`, but only when its
//! current label is the parser's placeholder; informative labels are kept.

use crate::error::{ExtractError, Result};
use crate::tree::label::LeafLabel;
use crate::tree::node::ParseTree;
use crate::types::{ExtractorConfig, OneOrMany};

/// Rewrites placeholder preterminal labels into merged offset/tag labels.
#[derive(Debug, Clone)]
pub struct SpanTagMerger {
    placeholder: String,
    separator: char,
}

impl Default for SpanTagMerger {
    fn default() -> Self {
        Self::from_config(&ExtractorConfig::default())
    }
}

impl SpanTagMerger {
    pub fn new(placeholder: impl Into<String>, separator: char) -> Self {
        Self {
            placeholder: placeholder.into(),
            separator,
        }
    }

    pub fn from_config(cfg: &ExtractorConfig) -> Self {
        Self::new(cfg.placeholder_label.clone(), cfg.label_separator)
    }

    /// Merge one claim's tags and offsets into its tree.
    ///
    /// The tree must have exactly one preterminal per tag.
    pub fn merge_one<S: AsRef<str>>(
        &self,
        tree: &mut ParseTree,
        tags: &[S],
        starts: &[usize],
    ) -> Result<()> {
        ExtractError::check_aligned("token start offsets", tags.len(), starts.len())?;
        ExtractError::check_aligned("tree preterminals", tags.len(), tree.preterminal_count())?;

        let mut offset = 0;
        tree.for_each_preterminal_mut(&mut |subtree| {
            if subtree.label() == self.placeholder {
                let label = LeafLabel::encode(starts[offset], tags[offset].as_ref(), self.separator);
                subtree.set_label(label);
            }
            offset += 1;
        });

        Ok(())
    }

    /// Merge a single claim or a batch of claims.
    ///
    /// All three inputs must share the same shape; the output has that shape
    /// too.
    pub fn merge(
        &self,
        trees: OneOrMany<ParseTree>,
        tags: OneOrMany<Vec<String>>,
        starts: OneOrMany<Vec<usize>>,
    ) -> Result<OneOrMany<ParseTree>> {
        if trees.is_one() != tags.is_one() || trees.is_one() != starts.is_one() {
            return Err(ExtractError::ShapeMismatch("trees, tags and offsets"));
        }
        ExtractError::check_aligned("batch tags", trees.len(), tags.len())?;
        ExtractError::check_aligned("batch offsets", trees.len(), starts.len())?;

        let shape_is_one = trees.is_one();
        let mut merged = trees.into_vec();
        for ((tree, tags), starts) in merged.iter_mut().zip(tags.into_vec()).zip(starts.into_vec()) {
            self.merge_one(tree, &tags, &starts)?;
        }

        Ok(OneOrMany::squeeze(merged, shape_is_one))
    }
}
