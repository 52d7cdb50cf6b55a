//! Stage trait definitions for the pipeline.
//!
//! Tokenization, POS tagging and constituency parsing are delegated to
//! pretrained models outside this crate; these traits are the seams where
//! such models plug in. Implementations are statically dispatched by
//! [`Pipeline`](super::runner::Pipeline), so mock collaborators in tests cost
//! nothing extra.

use crate::error::{ExtractError, Result};
use crate::nlp::dictionary::DictionaryCombiner;
use crate::tree::node::ParseTree;
use crate::types::{ExtractorConfig, Token};

// ============================================================================
// External collaborators
// ============================================================================

/// Splits a claim into located tokens.
///
/// Tokens must be non-overlapping, left to right, with character offsets into
/// `text`.
pub trait Tokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<Token>>;
}

/// Assigns one POS code per word, positionally.
pub trait Tagger {
    fn tag(&self, words: &[&str]) -> Result<Vec<String>>;
}

/// Produces a constituency tree whose leaves align with `words`.
pub trait ConstituencyParser {
    fn parse(&self, words: &[&str]) -> Result<ParseTree>;

    /// Parse several claims at once. Models that batch internally should
    /// override this.
    fn parse_batch(&self, batch: &[Vec<&str>]) -> Result<Vec<ParseTree>> {
        batch.iter().map(|words| self.parse(words)).collect()
    }
}

/// Parser slot for pipelines that only run the flat strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoParser;

impl ConstituencyParser for NoParser {
    fn parse(&self, _words: &[&str]) -> Result<ParseTree> {
        Err(ExtractError::MissingTree)
    }
}

impl<T: Tokenizer + ?Sized> Tokenizer for &T {
    fn tokenize(&self, text: &str) -> Result<Vec<Token>> {
        (**self).tokenize(text)
    }
}

impl<T: Tagger + ?Sized> Tagger for &T {
    fn tag(&self, words: &[&str]) -> Result<Vec<String>> {
        (**self).tag(words)
    }
}

impl<T: ConstituencyParser + ?Sized> ConstituencyParser for &T {
    fn parse(&self, words: &[&str]) -> Result<ParseTree> {
        (**self).parse(words)
    }

    fn parse_batch(&self, batch: &[Vec<&str>]) -> Result<Vec<ParseTree>> {
        (**self).parse_batch(batch)
    }
}

// ============================================================================
// Preprocessor: token normalization between tokenizer and tagger
// ============================================================================

/// Optional token normalization stage.
///
/// Runs on the tokenizer's output before words are handed to the tagger and
/// parser, so any change here is seen consistently downstream.
///
/// # Contract
///
/// - **Input**: the token vector, mutated in place.
/// - **Offsets**: every token must still cover the same source characters
///   it claims to.
/// - **Idempotent**: calling `preprocess` twice should produce the same
///   result as calling it once.
pub trait Preprocessor {
    fn preprocess(&self, tokens: &mut Vec<Token>, cfg: &ExtractorConfig);
}

/// No-op preprocessor.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPreprocessor;

impl Preprocessor for NoopPreprocessor {
    #[inline]
    fn preprocess(&self, _tokens: &mut Vec<Token>, _cfg: &ExtractorConfig) {}
}

/// Supplementary dictionary: re-joins split multi-character terms.
impl Preprocessor for DictionaryCombiner {
    fn preprocess(&self, tokens: &mut Vec<Token>, _cfg: &ExtractorConfig) {
        self.combine(tokens);
    }
}

/// Dictionary built from the configured marker set at run time.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkerCombiner;

impl Preprocessor for MarkerCombiner {
    fn preprocess(&self, tokens: &mut Vec<Token>, cfg: &ExtractorConfig) {
        DictionaryCombiner::from_markers(&cfg.markers).combine(tokens);
    }
}
