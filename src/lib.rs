//! # claim-features
//!
//! Extraction of anaphorically referenced technical features from Chinese
//! patent claims.
//!
//! Claims refer back to previously introduced features with marker words
//! such as 所述 ("the said"). Each marker anchors a noun phrase; this crate
//! finds those phrases and records the character offsets where they occur.
//!
//! Two strategies are available:
//!
//! - **Flat**: scan POS-tagged tokens and take the run of noun-continuing
//!   tags after each marker ([`phrase::FlatExtractor`]).
//! - **Tree**: choose the shortest marker-led NP subtree of a constituency
//!   parse ([`phrase::TreeExtractor`]). The parse's leaf labels are first
//!   rewritten to `"{offset}-{tag}"` by [`tree::SpanTagMerger`].
//!
//! Tokenizer, tagger and parser models are external; they plug in through
//! the traits in [`pipeline::traits`].
//!
//! ```rust
//! use claim_features::phrase::FlatExtractor;
//! use claim_features::types::{tokens_from_words, ExtractorConfig};
//!
//! let tokens = tokens_from_words(&["所述", "基底", "连接", "所述", "基底"]);
//! let tags = ["DT", "NN", "VV", "DT", "NN"];
//! let phrases = FlatExtractor
//!     .extract(&tokens, &tags, &ExtractorConfig::default())
//!     .unwrap();
//! assert_eq!(phrases.get("基底"), Some(&[2, 8][..]));
//! ```

pub mod error;
pub mod nlp;
pub mod phrase;
pub mod pipeline;
pub mod tree;
pub mod types;

pub use error::{ExtractError, Result};
pub use phrase::{FlatExtractor, PhraseOffsets, TreeExtractor};
pub use pipeline::Pipeline;
pub use tree::{ParseTree, SpanTagMerger};
pub use types::{ExtractorConfig, Strategy, Token};
