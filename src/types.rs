//! Core types shared across the crate
//!
//! [`Token`] is the unit produced by the tokenizer, [`ExtractorConfig`]
//! carries the closed-class word lists and tag codes the extractors key on,
//! and [`Strategy`] selects between the flat and the tree-based extractor.

use serde::{Deserialize, Serialize};

use crate::nlp::markers::{MarkerSet, NounTagSet};

/// One lexical unit located in the original claim string.
///
/// Offsets are character (not byte) indices, `start < end`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

impl Token {
    pub fn new(text: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            text: text.into(),
            start,
            end,
        }
    }

    /// Number of characters covered by the token.
    pub fn char_len(&self) -> usize {
        self.end - self.start
    }
}

/// Build tokens for a sequence of adjacent words, assigning character
/// offsets as if the words were concatenated with no separator.
pub fn tokens_from_words<S: AsRef<str>>(words: &[S]) -> Vec<Token> {
    let mut offset = 0;
    words
        .iter()
        .map(|w| {
            let w = w.as_ref();
            let start = offset;
            offset += w.chars().count();
            Token::new(w, start, offset)
        })
        .collect()
}

/// A value for one claim or a batch of values for many claims.
///
/// Batch-capable stages normalize to the batch form with
/// [`OneOrMany::into_vec`] and restore the caller's shape on the way out
/// with [`OneOrMany::squeeze`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn is_one(&self) -> bool {
        matches!(self, OneOrMany::One(_))
    }

    pub fn len(&self) -> usize {
        match self {
            OneOrMany::One(_) => 1,
            OneOrMany::Many(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }

    /// Rebuild a batch: a single item when `one` is set and exactly one item
    /// is present, otherwise the whole batch.
    pub fn squeeze(mut items: Vec<T>, one: bool) -> Self {
        if one && items.len() == 1 {
            OneOrMany::One(items.remove(0))
        } else {
            OneOrMany::Many(items)
        }
    }
}

/// Which extraction strategy to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Scan POS-tagged tokens left to right.
    Flat,
    /// Select the shortest marker-anchored NP subtree of a constituency parse.
    #[default]
    Tree,
}

impl Strategy {
    fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "flat" | "pos" | "tags" => Strategy::Flat,
            "tree" | "parse" | "np" => Strategy::Tree,
            _ => {
                #[cfg(feature = "tracing")]
                tracing::warn!(value, "unknown strategy, falling back to tree");
                Strategy::Tree
            }
        }
    }

    /// `true` when `value` names a strategy rather than falling back.
    pub fn is_known(value: &str) -> bool {
        matches!(
            value.to_lowercase().as_str(),
            "flat" | "pos" | "tags" | "tree" | "parse" | "np"
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Flat => "flat",
            Strategy::Tree => "tree",
        }
    }
}

impl std::str::FromStr for Strategy {
    type Err = std::convert::Infallible;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Strategy::parse(value))
    }
}

/// Configuration for phrase extraction
///
/// Immutable once built; share it behind a reference (or `Arc`) across
/// workers.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Reference words that trigger extraction.
    pub markers: MarkerSet,
    /// POS codes that may extend a noun phrase (flat strategy).
    pub noun_tags: NounTagSet,
    /// POS code of punctuation; truncates tree-strategy phrases.
    pub punctuation_tag: String,
    /// Linking particle that truncates tree-strategy phrases.
    pub linking_particle: String,
    /// Label prefix identifying noun-phrase subtrees.
    pub noun_phrase_prefix: String,
    /// Leaf label the parser emits for "no label"; only these are rewritten
    /// by the span/tag merger.
    pub placeholder_label: String,
    /// Separator between offset and tag in merged leaf labels.
    pub label_separator: char,
    /// Keep phrases that truncation emptied out (recorded under `""`).
    pub keep_empty_phrases: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            markers: MarkerSet::default(),
            noun_tags: NounTagSet::default(),
            punctuation_tag: "PU".to_string(),
            linking_particle: "的".to_string(),
            noun_phrase_prefix: "NP".to_string(),
            placeholder_label: "_".to_string(),
            label_separator: '-',
            keep_empty_phrases: true,
        }
    }
}

impl ExtractorConfig {
    pub fn with_markers(mut self, markers: MarkerSet) -> Self {
        self.markers = markers;
        self
    }

    pub fn with_noun_tags(mut self, noun_tags: NounTagSet) -> Self {
        self.noun_tags = noun_tags;
        self
    }

    pub fn with_keep_empty_phrases(mut self, keep: bool) -> Self {
        self.keep_empty_phrases = keep;
        self
    }

    /// Whether `label` names a noun-phrase constituent.
    pub fn is_noun_phrase_label(&self, label: &str) -> bool {
        label.starts_with(self.noun_phrase_prefix.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_from_words_uses_char_offsets() {
        let tokens = tokens_from_words(&["所述", "基底", "，"]);
        assert_eq!(tokens[0], Token::new("所述", 0, 2));
        assert_eq!(tokens[1], Token::new("基底", 2, 4));
        assert_eq!(tokens[2], Token::new("，", 4, 5));
        assert_eq!(tokens[1].char_len(), 2);
    }

    #[test]
    fn test_strategy_parse() {
        assert_eq!("flat".parse::<Strategy>().unwrap(), Strategy::Flat);
        assert_eq!("POS".parse::<Strategy>().unwrap(), Strategy::Flat);
        assert_eq!("tree".parse::<Strategy>().unwrap(), Strategy::Tree);
        assert_eq!("anything".parse::<Strategy>().unwrap(), Strategy::Tree);
    }

    #[test]
    fn test_strategy_typo_is_not_known() {
        assert!(Strategy::is_known("Flat"));
        assert!(Strategy::is_known("tree"));
        assert!(!Strategy::is_known("flta"));
        assert_eq!("flta".parse::<Strategy>().unwrap(), Strategy::Tree);
    }

    #[test]
    fn test_default_config() {
        let cfg = ExtractorConfig::default();
        assert!(cfg.markers.contains("所述"));
        assert!(cfg.noun_tags.contains("NN"));
        assert!(cfg.is_noun_phrase_label("NP"));
        assert!(cfg.is_noun_phrase_label("NP-SBJ"));
        assert!(!cfg.is_noun_phrase_label("VP"));
        assert!(cfg.keep_empty_phrases);
    }

    #[test]
    fn test_one_or_many_shapes() {
        let one = OneOrMany::One(3);
        assert!(one.is_one());
        let items = one.clone().into_vec();
        assert_eq!(items, vec![3]);
        assert_eq!(OneOrMany::squeeze(items, one.is_one()), OneOrMany::One(3));

        let many = OneOrMany::Many(vec![1, 2]);
        assert_eq!(many.len(), 2);
        let items = many.clone().into_vec();
        assert_eq!(OneOrMany::squeeze(items, many.is_one()), many);
    }

    #[test]
    fn test_one_or_many_deserializes_by_shape() {
        let one: OneOrMany<Vec<String>> = serde_json::from_str(r#"["a", "b"]"#).unwrap();
        assert!(matches!(one, OneOrMany::One(ref v) if v.len() == 2));

        let batch: OneOrMany<Vec<String>> = serde_json::from_str(r#"[["a"], ["b"]]"#).unwrap();
        assert!(matches!(batch, OneOrMany::Many(ref v) if v.len() == 2));
    }
}
