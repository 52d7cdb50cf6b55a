//! Extractor specification types.
//!
//! An [`ExtractorSpec`] is the JSON form of an extraction setup: which
//! strategy to run, the marker and noun-tag vocabularies, the few label
//! conventions the tree strategy depends on, and whether the supplementary
//! dictionary runs before tagging. Every field except `v` is optional and
//! falls back to [`ExtractorConfig::default`]. Specs are checked by the
//! [`super::validation::ValidationEngine`] before use.
//!
//! # JSON shape
//!
//! ```json
//! {
//!   "v": 1,
//!   "strategy": "tree",
//!   "extra_markers": ["此"],
//!   "noun_tags": ["NN", "NR", "NT"],
//!   "keep_empty_phrases": false,
//!   "combine_markers": true,
//!   "dictionary": ["半导体层"],
//!   "strict": false
//! }
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::nlp::dictionary::DictionaryCombiner;
use crate::nlp::markers::{MarkerSet, NounTagSet};
use crate::types::{ExtractorConfig, Strategy};

/// Spec version understood by this build.
pub const SPEC_VERSION: u32 = 1;

/// Top-level extractor specification (v1).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractorSpec {
    /// Spec version (currently `1`).
    pub v: u32,

    #[serde(default)]
    pub strategy: Option<Strategy>,

    /// Replaces the default marker set.
    #[serde(default)]
    pub markers: Option<Vec<String>>,

    /// Added on top of `markers` (or the defaults).
    #[serde(default)]
    pub extra_markers: Vec<String>,

    /// Replaces the default noun-continuing tag set.
    #[serde(default)]
    pub noun_tags: Option<Vec<String>>,

    #[serde(default)]
    pub extra_noun_tags: Vec<String>,

    #[serde(default)]
    pub punctuation_tag: Option<String>,

    #[serde(default)]
    pub linking_particle: Option<String>,

    #[serde(default)]
    pub noun_phrase_prefix: Option<String>,

    #[serde(default)]
    pub placeholder_label: Option<String>,

    #[serde(default)]
    pub label_separator: Option<char>,

    #[serde(default)]
    pub keep_empty_phrases: Option<bool>,

    /// Re-join markers the tokenizer split apart.
    #[serde(default)]
    pub combine_markers: bool,

    /// Extra supplementary-dictionary terms, combined before tagging.
    #[serde(default)]
    pub dictionary: Vec<String>,

    /// If `true`, unrecognized fields are errors; if `false`, warnings.
    #[serde(default)]
    pub strict: bool,

    /// Captures any fields not recognized by the schema.
    /// Used by the strict-mode validation rule.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_json::Value>,
}

impl ExtractorSpec {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Strategy to run, defaulting to [`Strategy::Tree`].
    pub fn strategy(&self) -> Strategy {
        self.strategy.unwrap_or_default()
    }

    /// Build the runtime configuration, starting from the defaults.
    pub fn to_config(&self) -> ExtractorConfig {
        let mut cfg = ExtractorConfig::default();

        if let Some(markers) = &self.markers {
            cfg.markers = MarkerSet::from_list(markers);
        }
        cfg.markers.add_markers(&self.extra_markers);

        if let Some(tags) = &self.noun_tags {
            cfg.noun_tags = NounTagSet::from_list(tags);
        }
        cfg.noun_tags.add_tags(&self.extra_noun_tags);

        if let Some(tag) = &self.punctuation_tag {
            cfg.punctuation_tag = tag.clone();
        }
        if let Some(particle) = &self.linking_particle {
            cfg.linking_particle = particle.clone();
        }
        if let Some(prefix) = &self.noun_phrase_prefix {
            cfg.noun_phrase_prefix = prefix.clone();
        }
        if let Some(label) = &self.placeholder_label {
            cfg.placeholder_label = label.clone();
        }
        if let Some(sep) = self.label_separator {
            cfg.label_separator = sep;
        }
        if let Some(keep) = self.keep_empty_phrases {
            cfg.keep_empty_phrases = keep;
        }

        cfg
    }

    /// Supplementary dictionary for the preprocessing stage, if any.
    ///
    /// With `combine_markers` the dictionary also holds every marker of
    /// `cfg`.
    pub fn combiner(&self, cfg: &ExtractorConfig) -> Option<DictionaryCombiner> {
        let mut combiner = if self.combine_markers {
            DictionaryCombiner::from_markers(&cfg.markers)
        } else {
            DictionaryCombiner::default()
        };
        combiner.add_terms(&self.dictionary);
        (!combiner.is_empty()).then_some(combiner)
    }
}
