//! Flat, tag-driven phrase extraction
//!
//! Scans POS-tagged tokens left to right. Every marker anchors a phrase that
//! starts at the following token. When that token carries a noun-continuing
//! tag, the phrase extends over the run of such tags after it.

use crate::error::{ExtractError, Result};
use crate::phrase::map::PhraseOffsets;
use crate::types::{ExtractorConfig, Token};

/// Marker-anchored extraction over a flat token/tag sequence
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatExtractor;

impl FlatExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract marker-anchored phrases from one claim.
    ///
    /// `tags` must be positionally aligned with `tokens`.
    pub fn extract<S: AsRef<str>>(
        &self,
        tokens: &[Token],
        tags: &[S],
        cfg: &ExtractorConfig,
    ) -> Result<PhraseOffsets> {
        ExtractError::check_aligned("POS tags", tokens.len(), tags.len())?;

        let mut phrases = PhraseOffsets::new();
        let mut i = 0;

        while i < tokens.len() {
            if !cfg.markers.contains(&tokens[i].text) {
                i += 1;
                continue;
            }

            i += 1;
            if i == tokens.len() {
                break;
            }
            // "所述 该 X": the inner marker anchors the phrase.
            if cfg.markers.contains(&tokens[i].text) {
                continue;
            }

            let anchor = tokens[i].start;
            let mut phrase = tokens[i].text.clone();
            let extends = cfg.noun_tags.contains(tags[i].as_ref());
            i += 1;

            // A non-noun head stays a single-token phrase.
            while extends
                && i < tokens.len()
                && cfg.noun_tags.contains(tags[i].as_ref())
                && !cfg.markers.contains(&tokens[i].text)
            {
                phrase.push_str(&tokens[i].text);
                i += 1;
            }

            #[cfg(feature = "tracing")]
            tracing::trace!(phrase = %phrase, anchor, "flat phrase");

            // `i` now sits on the token that ended the run; the outer loop
            // re-examines it as a potential marker.
            phrases.record(phrase, anchor);
        }

        Ok(phrases)
    }
}
