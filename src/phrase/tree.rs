//! Constituency-tree phrase extraction
//!
//! Works on a tree whose preterminal labels were merged to `"{offset}-{tag}"`
//! (see [`crate::tree::merge`]). Each NP subtree that contains a marker is
//! cut down to the part starting at its first marker; candidates anchored at
//! the same marker occurrence compete, and the shortest one wins. The winner
//! is then truncated at the first punctuation token or linking particle.

use rustc_hash::FxHashMap;

use crate::error::Result;
use crate::phrase::map::PhraseOffsets;
use crate::tree::label::LeafLabel;
use crate::tree::node::ParseTree;
use crate::types::ExtractorConfig;

/// `(leaf word, preterminal label)` pairs of one candidate subtree.
type Pairs<'t> = Vec<(&'t str, &'t str)>;

/// Shortest-NP-per-marker extraction over a merged constituency tree
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeExtractor;

impl TreeExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, tree: &ParseTree, cfg: &ExtractorConfig) -> Result<PhraseOffsets> {
        let mut phrases = PhraseOffsets::new();
        for pairs in self.select_candidates(tree, cfg)? {
            self.emit(&pairs, cfg, &mut phrases);
        }
        Ok(phrases)
    }

    /// One winning pair list per marker occurrence, in the order the
    /// occurrences were first reached by a pre-order walk.
    fn select_candidates<'t>(
        &self,
        tree: &'t ParseTree,
        cfg: &ExtractorConfig,
    ) -> Result<Vec<Pairs<'t>>> {
        let mut order: Vec<Pairs<'t>> = Vec::new();
        let mut by_marker: FxHashMap<usize, usize> = FxHashMap::default();

        for subtree in tree
            .subtrees()
            .filter(|t| cfg.is_noun_phrase_label(t.label()))
        {
            let mut pairs = subtree.pos();
            let Some(first_marker) = pairs.iter().position(|(w, _)| cfg.markers.contains(w)) else {
                continue;
            };
            pairs.drain(..first_marker);
            if pairs.len() <= 1 {
                #[cfg(feature = "tracing")]
                tracing::trace!(label = subtree.label(), "skipping NP that ends at its marker");
                continue;
            }

            let marker_offset = LeafLabel::require_offset(pairs[0].1, cfg.label_separator)?;
            match by_marker.get(&marker_offset) {
                // Strictly shorter only: the first of several equally short
                // candidates is kept.
                Some(&slot) => {
                    if pairs.len() < order[slot].len() {
                        order[slot] = pairs;
                    }
                }
                None => {
                    by_marker.insert(marker_offset, order.len());
                    order.push(pairs);
                }
            }
        }

        Ok(order)
    }

    /// Truncate a winning candidate and record its phrase.
    fn emit(&self, pairs: &[(&str, &str)], cfg: &ExtractorConfig, phrases: &mut PhraseOffsets) {
        let mut phrase = String::new();
        let mut head = None;
        for &(word, label) in pairs {
            let tag = LeafLabel::parse(label, cfg.label_separator).tag;
            if tag == cfg.punctuation_tag || word == cfg.linking_particle {
                break;
            }
            if !cfg.markers.contains(word) {
                if head.is_none() {
                    head = Some(label);
                }
                phrase.push_str(word);
            }
        }

        // Anchored at the first word kept; an emptied phrase falls back to the
        // token right after the marker.
        let head = head.unwrap_or(pairs[1].1);
        let Some(anchor) = LeafLabel::parse(head, cfg.label_separator).offset else {
            #[cfg(feature = "tracing")]
            tracing::debug!(label = head, "skipping phrase anchored on an unmerged leaf");
            return;
        };

        if phrase.is_empty() && !cfg.keep_empty_phrases {
            #[cfg(feature = "tracing")]
            tracing::debug!(anchor, "dropping phrase emptied by truncation");
            return;
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(phrase = %phrase, anchor, "tree phrase");

        phrases.record(phrase, anchor);
    }
}
