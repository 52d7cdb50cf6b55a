//! Stage-based extraction pipeline
//!
//! External collaborators (tokenizer, tagger, parser) plug in through the
//! traits in [`traits`]; [`runner::Pipeline`] drives them and hands the
//! annotated [`artifacts::ClaimDocument`] to the selected extractor.
//! [`spec`] and [`validation`] read and check JSON configuration.

pub mod artifacts;
pub mod errors;
pub mod observer;
pub mod precomputed;
pub mod runner;
pub mod spec;
pub mod traits;
pub mod validation;

pub use artifacts::ClaimDocument;
pub use observer::{NoopObserver, PipelineObserver, StageReport, StageTimingObserver};
pub use precomputed::{AnnotatedClaim, AnnotationStore};
pub use runner::Pipeline;
pub use spec::ExtractorSpec;
pub use traits::{
    ConstituencyParser, MarkerCombiner, NoParser, NoopPreprocessor, Preprocessor, Tagger,
    Tokenizer,
};
pub use validation::{ValidationEngine, ValidationReport};
