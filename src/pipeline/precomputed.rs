//! Replay collaborators over pre-annotated claims.
//!
//! Tokenizer, tagger and parser models live outside this crate. When their
//! output has already been produced (by a batch job, or by hand in tests),
//! an [`AnnotationStore`] serves it back through the collaborator traits so
//! the regular [`Pipeline`](super::runner::Pipeline) can run unchanged.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{ExtractError, Result};
use crate::pipeline::traits::{ConstituencyParser, Tagger, Tokenizer};
use crate::tree::node::ParseTree;
use crate::types::{tokens_from_words, Token};

/// One claim with its model annotations, as read from JSON.
///
/// Either `tokens` (with offsets) or `words` must be given; plain words get
/// contiguous offsets. `tree` is labeled bracketing whose leaves are the
/// words, e.g. `(IP (NP (_ 所述) (_ 基底)))`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedClaim {
    /// Claim text; defaults to the concatenated words.
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub tokens: Option<Vec<Token>>,
    #[serde(default)]
    pub words: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub tree: Option<String>,
}

impl AnnotatedClaim {
    pub fn new<S: AsRef<str>>(words: &[S], tags: &[S]) -> Self {
        Self {
            words: words.iter().map(|w| w.as_ref().to_string()).collect(),
            tags: tags.iter().map(|t| t.as_ref().to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn with_tree(mut self, bracketed: impl Into<String>) -> Self {
        self.tree = Some(bracketed.into());
        self
    }

    pub fn tokens(&self) -> Vec<Token> {
        match &self.tokens {
            Some(tokens) => tokens.clone(),
            None => tokens_from_words(&self.words),
        }
    }

    pub fn claim_text(&self) -> String {
        if !self.text.is_empty() {
            return self.text.clone();
        }
        match &self.tokens {
            Some(tokens) => tokens.iter().map(|t| t.text.as_str()).collect(),
            None => self.words.concat(),
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    tokens: Vec<Token>,
    tags: Vec<String>,
    tree: Option<ParseTree>,
}

/// Annotations indexed by claim text and by word sequence.
#[derive(Debug, Clone, Default)]
pub struct AnnotationStore {
    entries: Vec<Entry>,
    by_text: FxHashMap<String, usize>,
    by_words: FxHashMap<Vec<String>, usize>,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_claims(claims: impl IntoIterator<Item = AnnotatedClaim>) -> Result<Self> {
        let mut store = Self::new();
        for claim in claims {
            store.insert(&claim)?;
        }
        Ok(store)
    }

    /// Add one claim. The first annotation of a given text wins.
    pub fn insert(&mut self, claim: &AnnotatedClaim) -> Result<()> {
        let tokens = claim.tokens();
        ExtractError::check_aligned("POS tags", tokens.len(), claim.tags.len())?;
        let tree = claim
            .tree
            .as_deref()
            .map(ParseTree::from_bracketed)
            .transpose()?;
        if let Some(tree) = &tree {
            ExtractError::check_aligned("tree leaves", tokens.len(), tree.leaf_count())?;
        }

        let id = self.entries.len();
        let words: Vec<String> = tokens.iter().map(|t| t.text.clone()).collect();
        self.by_text.entry(claim.claim_text()).or_insert(id);
        self.by_words.entry(words).or_insert(id);
        self.entries.push(Entry {
            tokens,
            tags: claim.tags.clone(),
            tree,
        });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn lookup_words(&self, stage: &'static str, words: &[&str]) -> Result<&Entry> {
        let key: Vec<String> = words.iter().map(|w| w.to_string()).collect();
        self.by_words
            .get(&key)
            .map(|&id| &self.entries[id])
            .ok_or_else(|| {
                ExtractError::collaborator(
                    stage,
                    format!("no annotation for words {:?}", words.concat()),
                )
            })
    }
}

impl Tokenizer for AnnotationStore {
    fn tokenize(&self, text: &str) -> Result<Vec<Token>> {
        self.by_text
            .get(text)
            .map(|&id| self.entries[id].tokens.clone())
            .ok_or_else(|| {
                ExtractError::collaborator("tokenizer", format!("no annotation for claim {text:?}"))
            })
    }
}

impl Tagger for AnnotationStore {
    fn tag(&self, words: &[&str]) -> Result<Vec<String>> {
        Ok(self.lookup_words("tagger", words)?.tags.clone())
    }
}

impl ConstituencyParser for AnnotationStore {
    fn parse(&self, words: &[&str]) -> Result<ParseTree> {
        self.lookup_words("parser", words)?
            .tree
            .clone()
            .ok_or(ExtractError::MissingTree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claim() -> AnnotatedClaim {
        AnnotatedClaim::new(&["所述", "基底", "，"], &["DT", "NN", "PU"])
            .with_tree("(IP (NP (_ 所述) (_ 基底)) (_ ，))")
    }

    #[test]
    fn test_claim_text_defaults_to_words() {
        assert_eq!(claim().claim_text(), "所述基底，");
        assert_eq!(claim().tokens()[1].start, 2);
    }

    #[test]
    fn test_replays_annotations() {
        let store = AnnotationStore::from_claims([claim()]).unwrap();
        let tokens = store.tokenize("所述基底，").unwrap();
        let words: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();

        assert_eq!(store.tag(&words).unwrap(), vec!["DT", "NN", "PU"]);
        assert_eq!(store.parse(&words).unwrap().leaf_count(), 3);
    }

    #[test]
    fn test_unknown_claim_is_a_collaborator_error() {
        let store = AnnotationStore::from_claims([claim()]).unwrap();
        let err = store.tokenize("未知").unwrap_err();
        assert!(matches!(err, ExtractError::Collaborator { stage: "tokenizer", .. }));
        let err = store.tag(&["所述"]).unwrap_err();
        assert!(matches!(err, ExtractError::Collaborator { stage: "tagger", .. }));
    }

    #[test]
    fn test_missing_tree() {
        let bare = AnnotatedClaim::new(&["所述", "基底"], &["DT", "NN"]);
        let store = AnnotationStore::from_claims([bare]).unwrap();
        assert!(matches!(
            store.parse(&["所述", "基底"]),
            Err(ExtractError::MissingTree)
        ));
    }

    #[test]
    fn test_rejects_misaligned_annotations() {
        let bad = AnnotatedClaim::new(&["所述", "基底"], &["DT"]);
        assert!(AnnotationStore::from_claims([bad]).is_err());

        let bad_tree = AnnotatedClaim::new(&["所述", "基底"], &["DT", "NN"]).with_tree("(IP (_ 所述))");
        assert!(matches!(
            AnnotationStore::from_claims([bad_tree]),
            Err(ExtractError::Misaligned { what: "tree leaves", .. })
        ));
    }

    #[test]
    fn test_deserialize_with_explicit_tokens() {
        let json = r#"{
            "text": "所述 基底",
            "tokens": [
                {"text": "所述", "start": 0, "end": 2},
                {"text": "基底", "start": 3, "end": 5}
            ],
            "tags": ["DT", "NN"]
        }"#;
        let claim: AnnotatedClaim = serde_json::from_str(json).unwrap();
        assert_eq!(claim.tokens()[1].start, 3);
        assert_eq!(claim.claim_text(), "所述 基底");
    }

    #[test]
    fn test_first_annotation_wins() {
        let first = AnnotatedClaim::new(&["所述", "基底"], &["DT", "NN"]);
        let second = AnnotatedClaim::new(&["所述", "基底"], &["DT", "VV"]);
        let store = AnnotationStore::from_claims([first, second]).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.tag(&["所述", "基底"]).unwrap(), vec!["DT", "NN"]);
    }
}
