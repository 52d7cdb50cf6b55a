//! Error types
//!
//! Every fallible operation in the crate returns [`Result`], whose error
//! defaults to [`ExtractError`].

use std::error::Error as StdError;

/// Crate-wide result alias.
pub type Result<T, E = ExtractError> = std::result::Result<T, E>;

/// Boxed error raised by an external collaborator (tokenizer, tagger, parser).
pub type BoxedCollaboratorError = Box<dyn StdError + Send + Sync + 'static>;

/// Errors produced while annotating a claim or extracting its phrases.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// Two positionally-aligned sequences disagree in length.
    ///
    /// Raised when the tagger, the token offsets, or the parse tree leaves do
    /// not line up with the token sequence.
    #[error("{what}: expected {expected} items, found {actual}")]
    Misaligned {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Single-claim and batch inputs were mixed in one call.
    #[error("cannot mix single-claim and batch inputs ({0})")]
    ShapeMismatch(&'static str),

    /// Labeled bracketing could not be read.
    #[error("malformed tree at byte {position}: {message}")]
    TreeSyntax { position: usize, message: String },

    /// A leaf label that should carry `"{offset}-{tag}"` does not.
    #[error("leaf label '{label}' does not carry a start offset")]
    LeafLabel { label: String },

    /// The tree strategy was requested without a parse tree.
    #[error("tree strategy requires a constituency parse, but none is available")]
    MissingTree,

    /// An external collaborator failed.
    #[error("{stage} failed: {source}")]
    Collaborator {
        stage: &'static str,
        #[source]
        source: BoxedCollaboratorError,
    },

    /// Configuration rejected by validation.
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl ExtractError {
    /// Wrap an external collaborator error, tagging it with the stage name.
    pub fn collaborator(stage: &'static str, source: impl Into<BoxedCollaboratorError>) -> Self {
        ExtractError::Collaborator {
            stage,
            source: source.into(),
        }
    }

    /// Fail unless `actual == expected`.
    pub(crate) fn check_aligned(what: &'static str, expected: usize, actual: usize) -> Result<()> {
        if expected == actual {
            Ok(())
        } else {
            Err(ExtractError::Misaligned {
                what,
                expected,
                actual,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_aligned() {
        assert!(ExtractError::check_aligned("tags", 3, 3).is_ok());
        let err = ExtractError::check_aligned("tags", 3, 2).unwrap_err();
        assert_eq!(err.to_string(), "tags: expected 3 items, found 2");
    }

    #[test]
    fn test_collaborator_error_keeps_source() {
        let err = ExtractError::collaborator("tokenizer", "model not loaded");
        assert_eq!(err.to_string(), "tokenizer failed: model not loaded");
        assert!(err.source().is_some());
    }
}
