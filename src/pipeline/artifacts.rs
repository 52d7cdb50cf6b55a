//! Pipeline artifacts.
//!
//! A [`ClaimDocument`] accumulates the output of every annotation stage
//! under a named field. Stages fill fields strictly in order:
//! tokens → tags → tree (tree strategy only), with the tree's preterminal
//! labels already merged with offsets and tags.

use crate::error::{ExtractError, Result};
use crate::tree::node::ParseTree;
use crate::types::Token;

/// All annotations gathered for one claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimDocument {
    /// The claim as handed to the tokenizer.
    pub text: String,
    pub tokens: Vec<Token>,
    /// One POS code per token.
    pub tags: Vec<String>,
    /// Merged constituency tree, when the tree strategy ran.
    pub tree: Option<ParseTree>,
}

impl ClaimDocument {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tokens: Vec::new(),
            tags: Vec::new(),
            tree: None,
        }
    }

    /// Token texts, in order.
    pub fn words(&self) -> Vec<&str> {
        self.tokens.iter().map(|t| t.text.as_str()).collect()
    }

    /// Token start offsets, in order.
    pub fn starts(&self) -> Vec<usize> {
        self.tokens.iter().map(|t| t.start).collect()
    }

    /// Attach tags, checking they align with the tokens.
    pub fn set_tags(&mut self, tags: Vec<String>) -> Result<()> {
        ExtractError::check_aligned("POS tags", self.tokens.len(), tags.len())?;
        self.tags = tags;
        Ok(())
    }

    pub fn tree(&self) -> Result<&ParseTree> {
        self.tree.as_ref().ok_or(ExtractError::MissingTree)
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::tokens_from_words;

    #[test]
    fn test_words_and_starts() {
        let mut doc = ClaimDocument::new("所述基底");
        doc.tokens = tokens_from_words(&["所述", "基底"]);

        assert_eq!(doc.words(), vec!["所述", "基底"]);
        assert_eq!(doc.starts(), vec![0, 2]);
    }

    #[test]
    fn test_set_tags_checks_alignment() {
        let mut doc = ClaimDocument::new("所述基底");
        doc.tokens = tokens_from_words(&["所述", "基底"]);

        assert!(doc.set_tags(vec!["DT".into()]).is_err());
        assert!(doc.tags.is_empty());
        doc.set_tags(vec!["DT".into(), "NN".into()]).unwrap();
        assert_eq!(doc.tags.len(), 2);
    }

    #[test]
    fn test_missing_tree() {
        let doc = ClaimDocument::new("");
        assert!(doc.is_empty());
        assert!(matches!(doc.tree(), Err(ExtractError::MissingTree)));
    }
}
