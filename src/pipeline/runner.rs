//! Pipeline runner: orchestrates stage execution and artifact flow.
//!
//! The [`Pipeline`] struct holds the external collaborators (tokenizer,
//! tagger, parser) plus a preprocessing stage. Calling [`Pipeline::run`]
//! executes them in order, filling a [`ClaimDocument`] and notifying an
//! optional [`PipelineObserver`] at each boundary, then hands the document to
//! the extractor selected by [`Strategy`].
//!
//! Data flows strictly forward:
//!
//! | Stage | Needs | Produces |
//! |-------|-------|----------|
//! | tokenize | text | tokens |
//! | preprocess | tokens | tokens |
//! | tag | tokens | tags |
//! | parse (tree only) | tokens | tree |
//! | merge (tree only) | tree, tags, tokens | tree |
//! | extract | tokens + tags, or tree | phrases |

use rayon::prelude::*;

use crate::error::{ExtractError, Result};
use crate::phrase::flat::FlatExtractor;
use crate::phrase::map::PhraseOffsets;
use crate::phrase::tree::TreeExtractor;
use crate::pipeline::artifacts::ClaimDocument;
use crate::pipeline::observer::{
    NoopObserver, PipelineObserver, StageClock, StageReport, STAGE_EXTRACT, STAGE_MERGE,
    STAGE_PARSE, STAGE_PREPROCESS, STAGE_TAG, STAGE_TOKENIZE,
};
use crate::pipeline::traits::{
    ConstituencyParser, NoParser, NoopPreprocessor, Preprocessor, Tagger, Tokenizer,
};
use crate::tree::merge::SpanTagMerger;
use crate::types::{ExtractorConfig, OneOrMany, Strategy};

// ---------------------------------------------------------------------------
// Conditional tracing support
// ---------------------------------------------------------------------------

/// Enter a tracing span for a pipeline stage (when the `tracing` feature is
/// enabled). When disabled, this is a no-op and the compiler eliminates it.
macro_rules! trace_stage {
    ($name:expr) => {
        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!("pipeline_stage", stage = $name).entered();
    };
}

// ============================================================================
// Pipeline: statically-composed stage container
// ============================================================================

/// A pipeline composed of concrete collaborator implementations.
///
/// # Type parameters
///
/// | Param | Trait | Default impl |
/// |-------|-------|--------------|
/// | `Tok` | [`Tokenizer`] | |
/// | `Tag` | [`Tagger`] | |
/// | `Par` | [`ConstituencyParser`] | [`NoParser`] |
/// | `Pre` | [`Preprocessor`] | [`NoopPreprocessor`] |
#[derive(Debug, Clone)]
pub struct Pipeline<Tok, Tag, Par = NoParser, Pre = NoopPreprocessor> {
    pub tokenizer: Tok,
    pub tagger: Tag,
    pub parser: Par,
    pub preprocessor: Pre,
}

impl<Tok, Tag> Pipeline<Tok, Tag> {
    /// A pipeline without a parser; only [`Strategy::Flat`] can run.
    pub fn flat(tokenizer: Tok, tagger: Tag) -> Self {
        Pipeline {
            tokenizer,
            tagger,
            parser: NoParser,
            preprocessor: NoopPreprocessor,
        }
    }
}

impl<Tok, Tag, Par> Pipeline<Tok, Tag, Par> {
    pub fn new(tokenizer: Tok, tagger: Tag, parser: Par) -> Self {
        Pipeline {
            tokenizer,
            tagger,
            parser,
            preprocessor: NoopPreprocessor,
        }
    }
}

impl<Tok, Tag, Par, Pre> Pipeline<Tok, Tag, Par, Pre> {
    /// Replace the parser, enabling [`Strategy::Tree`].
    pub fn with_parser<P: ConstituencyParser>(self, parser: P) -> Pipeline<Tok, Tag, P, Pre> {
        Pipeline {
            tokenizer: self.tokenizer,
            tagger: self.tagger,
            parser,
            preprocessor: self.preprocessor,
        }
    }

    /// Replace the preprocessing stage.
    pub fn with_preprocessor<P: Preprocessor>(self, preprocessor: P) -> Pipeline<Tok, Tag, Par, P> {
        Pipeline {
            tokenizer: self.tokenizer,
            tagger: self.tagger,
            parser: self.parser,
            preprocessor,
        }
    }
}

// ============================================================================
// Pipeline::run: execute stages in order
// ============================================================================

impl<Tok, Tag, Par, Pre> Pipeline<Tok, Tag, Par, Pre>
where
    Tok: Tokenizer,
    Tag: Tagger,
    Par: ConstituencyParser,
    Pre: Preprocessor,
{
    /// Annotate and extract one claim.
    ///
    /// The claim should already be stripped of whitespace; offsets are
    /// character indices into `claim` as given.
    pub fn run(
        &self,
        claim: &str,
        strategy: Strategy,
        cfg: &ExtractorConfig,
        observer: &mut impl PipelineObserver,
    ) -> Result<PhraseOffsets> {
        if !cfg.markers.occurs_in(claim) {
            #[cfg(feature = "tracing")]
            tracing::trace!(chars = claim.chars().count(), "no marker in claim, skipping models");
            return Ok(PhraseOffsets::new());
        }

        let doc = self.annotate(claim, strategy, cfg, observer)?;
        observer.on_document(&doc);
        self.extract(&doc, strategy, cfg, observer)
    }

    /// Run the annotation stages only.
    ///
    /// The returned document has tokens and tags, plus a merged tree when
    /// `strategy` is [`Strategy::Tree`] and the claim is non-empty.
    pub fn annotate(
        &self,
        claim: &str,
        strategy: Strategy,
        cfg: &ExtractorConfig,
        observer: &mut impl PipelineObserver,
    ) -> Result<ClaimDocument> {
        let mut doc = ClaimDocument::new(claim);
        self.annotate_tokens(&mut doc, cfg, observer)?;

        if strategy == Strategy::Tree && !doc.is_empty() {
            // Parse
            trace_stage!(STAGE_PARSE);
            observer.on_stage_start(STAGE_PARSE);
            let clock = StageClock::start();
            let mut tree = self.parser.parse(&doc.words())?;
            let report = StageReport::new(clock.elapsed()).with_items(tree.preterminal_count());
            observer.on_stage_end(STAGE_PARSE, &report);

            // Merge
            trace_stage!(STAGE_MERGE);
            observer.on_stage_start(STAGE_MERGE);
            let clock = StageClock::start();
            SpanTagMerger::from_config(cfg).merge_one(&mut tree, &doc.tags, &doc.starts())?;
            doc.tree = Some(tree);
            observer.on_stage_end(STAGE_MERGE, &StageReport::new(clock.elapsed()));
        }

        Ok(doc)
    }

    /// Tokenize, preprocess and tag.
    fn annotate_tokens(
        &self,
        doc: &mut ClaimDocument,
        cfg: &ExtractorConfig,
        observer: &mut impl PipelineObserver,
    ) -> Result<()> {
        // Tokenize
        trace_stage!(STAGE_TOKENIZE);
        observer.on_stage_start(STAGE_TOKENIZE);
        let clock = StageClock::start();
        doc.tokens = self.tokenizer.tokenize(&doc.text)?;
        let report = StageReport::new(clock.elapsed()).with_items(doc.tokens.len());
        observer.on_stage_end(STAGE_TOKENIZE, &report);

        // Preprocess
        trace_stage!(STAGE_PREPROCESS);
        observer.on_stage_start(STAGE_PREPROCESS);
        let clock = StageClock::start();
        self.preprocessor.preprocess(&mut doc.tokens, cfg);
        let report = StageReport::new(clock.elapsed()).with_items(doc.tokens.len());
        observer.on_stage_end(STAGE_PREPROCESS, &report);

        // Tag
        trace_stage!(STAGE_TAG);
        observer.on_stage_start(STAGE_TAG);
        let clock = StageClock::start();
        let tags = if doc.is_empty() {
            Vec::new()
        } else {
            self.tagger.tag(&doc.words())?
        };
        doc.set_tags(tags)?;
        let report = StageReport::new(clock.elapsed()).with_items(doc.tags.len());
        observer.on_stage_end(STAGE_TAG, &report);

        Ok(())
    }

    /// Run the extractor for `strategy` on an annotated document.
    pub fn extract(
        &self,
        doc: &ClaimDocument,
        strategy: Strategy,
        cfg: &ExtractorConfig,
        observer: &mut impl PipelineObserver,
    ) -> Result<PhraseOffsets> {
        trace_stage!(STAGE_EXTRACT);
        observer.on_stage_start(STAGE_EXTRACT);
        let clock = StageClock::start();
        let phrases = extract_document(doc, strategy, cfg)?;
        let report = StageReport::new(clock.elapsed()).with_items(phrases.len());
        observer.on_stage_end(STAGE_EXTRACT, &report);
        observer.on_phrases(&phrases);
        Ok(phrases)
    }
}

fn extract_document(
    doc: &ClaimDocument,
    strategy: Strategy,
    cfg: &ExtractorConfig,
) -> Result<PhraseOffsets> {
    if doc.is_empty() {
        return Ok(PhraseOffsets::new());
    }
    match strategy {
        Strategy::Flat => FlatExtractor.extract(&doc.tokens, &doc.tags, cfg),
        Strategy::Tree => TreeExtractor.extract(doc.tree()?, cfg),
    }
}

// ============================================================================
// Batch execution
// ============================================================================

impl<Tok, Tag, Par, Pre> Pipeline<Tok, Tag, Par, Pre>
where
    Tok: Tokenizer + Sync,
    Tag: Tagger + Sync,
    Par: ConstituencyParser + Sync,
    Pre: Preprocessor + Sync,
{
    /// Annotate many claims.
    ///
    /// Tokenizing and tagging run in parallel per claim; the parser receives
    /// all word sequences in one [`ConstituencyParser::parse_batch`] call and
    /// the trees are merged as a batch.
    pub fn annotate_batch<S>(
        &self,
        claims: &[S],
        strategy: Strategy,
        cfg: &ExtractorConfig,
    ) -> Result<Vec<ClaimDocument>>
    where
        S: AsRef<str> + Sync,
    {
        let mut docs = claims
            .par_iter()
            .map(|claim| {
                let mut doc = ClaimDocument::new(claim.as_ref());
                self.annotate_tokens(&mut doc, cfg, &mut NoopObserver)?;
                Ok(doc)
            })
            .collect::<Result<Vec<_>>>()?;

        if strategy == Strategy::Flat {
            return Ok(docs);
        }

        // Empty claims have nothing to parse.
        let parse_idx: Vec<usize> = (0..docs.len()).filter(|&i| !docs[i].is_empty()).collect();
        if parse_idx.is_empty() {
            return Ok(docs);
        }

        let batch: Vec<Vec<&str>> = parse_idx.iter().map(|&i| docs[i].words()).collect();
        let trees = self.parser.parse_batch(&batch)?;
        ExtractError::check_aligned("parsed trees", batch.len(), trees.len())?;

        let tags = parse_idx.iter().map(|&i| docs[i].tags.clone()).collect();
        let starts = parse_idx.iter().map(|&i| docs[i].starts()).collect();
        let merged = SpanTagMerger::from_config(cfg).merge(
            OneOrMany::Many(trees),
            OneOrMany::Many(tags),
            OneOrMany::Many(starts),
        )?;

        for (i, tree) in parse_idx.into_iter().zip(merged.into_vec()) {
            docs[i].tree = Some(tree);
        }

        Ok(docs)
    }

    /// Extract phrases for many claims; results are in input order.
    pub fn run_batch<S>(
        &self,
        claims: &[S],
        strategy: Strategy,
        cfg: &ExtractorConfig,
    ) -> Result<Vec<PhraseOffsets>>
    where
        S: AsRef<str> + Sync,
    {
        let docs = self.annotate_batch(claims, strategy, cfg)?;
        docs.par_iter()
            .map(|doc| extract_document(doc, strategy, cfg))
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::observer::StageTimingObserver;
    use crate::tree::node::ParseTree;
    use crate::types::{tokens_from_words, Token};

    const WORDS: &[&str] = &["所述的", "所述", "该", "基底", "栅极", "连接", "位于", "提供"];

    /// Longest-match segmentation over a fixed word list; unknown characters
    /// become single-character tokens.
    struct LexiconTokenizer(&'static [&'static str]);

    impl Tokenizer for LexiconTokenizer {
        fn tokenize(&self, text: &str) -> Result<Vec<Token>> {
            let chars: Vec<char> = text.chars().collect();
            let mut words = Vec::new();
            let mut i = 0;
            while i < chars.len() {
                let rest: String = chars[i..].iter().collect();
                let len = self
                    .0
                    .iter()
                    .filter(|w| rest.starts_with(**w))
                    .map(|w| w.chars().count())
                    .max()
                    .unwrap_or(1);
                words.push(chars[i..i + len].iter().collect::<String>());
                i += len;
            }
            Ok(tokens_from_words(&words))
        }
    }

    /// Tags from a tiny lexicon; unknown words are nouns.
    struct LexiconTagger;

    impl Tagger for LexiconTagger {
        fn tag(&self, words: &[&str]) -> Result<Vec<String>> {
            Ok(words
                .iter()
                .map(|w| match *w {
                    "所述" | "所述的" | "该" => "DT",
                    "，" => "PU",
                    "的" => "DEG",
                    "连接" | "位于" => "VV",
                    _ => "NN",
                })
                .map(str::to_string)
                .collect())
        }
    }

    /// Groups each marker with the following word into an NP.
    struct MarkerNpParser;

    impl ConstituencyParser for MarkerNpParser {
        fn parse(&self, words: &[&str]) -> Result<ParseTree> {
            let mut children = Vec::new();
            let mut i = 0;
            while i < words.len() {
                if words[i] == "所述" && i + 1 < words.len() {
                    children.push(ParseTree::node(
                        "NP",
                        vec![
                            ParseTree::preterminal("_", words[i]),
                            ParseTree::preterminal("_", words[i + 1]),
                        ],
                    ));
                    i += 2;
                } else {
                    children.push(ParseTree::preterminal("_", words[i]));
                    i += 1;
                }
            }
            Ok(ParseTree::node("IP", children))
        }
    }

    struct FailingTagger;

    impl Tagger for FailingTagger {
        fn tag(&self, _words: &[&str]) -> Result<Vec<String>> {
            Err(ExtractError::collaborator("tagger", "model not loaded"))
        }
    }

    fn pipeline() -> Pipeline<LexiconTokenizer, LexiconTagger, MarkerNpParser> {
        Pipeline::new(LexiconTokenizer(WORDS), LexiconTagger, MarkerNpParser)
    }

    fn cfg() -> ExtractorConfig {
        ExtractorConfig::default()
    }

    #[test]
    fn test_flat_run() {
        let phrases = pipeline()
            .run("所述基底连接所述基底", Strategy::Flat, &cfg(), &mut NoopObserver)
            .unwrap();
        assert_eq!(phrases.get("基底"), Some(&[2, 8][..]));
    }

    #[test]
    fn test_tree_run() {
        let phrases = pipeline()
            .run("所述栅极位于所述基底", Strategy::Tree, &cfg(), &mut NoopObserver)
            .unwrap();
        assert_eq!(phrases.get("栅极"), Some(&[2][..]));
        assert_eq!(phrases.get("基底"), Some(&[8][..]));
    }

    #[test]
    fn test_annotate_merges_tree() {
        let doc = pipeline()
            .annotate("所述基底", Strategy::Tree, &cfg(), &mut NoopObserver)
            .unwrap();
        let tree = doc.tree().unwrap();
        assert_eq!(tree.to_string(), "(IP (NP (0-DT 所述) (2-NN 基底)))");
    }

    #[test]
    fn test_flat_annotation_has_no_tree() {
        let doc = pipeline()
            .annotate("所述基底", Strategy::Flat, &cfg(), &mut NoopObserver)
            .unwrap();
        assert!(doc.tree.is_none());
        assert_eq!(doc.tags, vec!["DT", "NN"]);
    }

    #[test]
    fn test_observer_sees_every_stage() {
        let mut obs = StageTimingObserver::new();
        pipeline()
            .run("所述基底", Strategy::Tree, &cfg(), &mut obs)
            .unwrap();

        let names: Vec<&str> = obs.reports().iter().map(|(n, _)| *n).collect();
        assert_eq!(
            names,
            vec![
                STAGE_TOKENIZE,
                STAGE_PREPROCESS,
                STAGE_TAG,
                STAGE_PARSE,
                STAGE_MERGE,
                STAGE_EXTRACT,
            ]
        );
        assert_eq!(obs.reports()[0].1.items(), Some(2));
    }

    #[test]
    fn test_claim_without_marker_skips_models() {
        let p = Pipeline::flat(LexiconTokenizer(WORDS), FailingTagger);
        let phrases = p.run("提供基底", Strategy::Flat, &cfg(), &mut NoopObserver).unwrap();
        assert!(phrases.is_empty());
    }

    #[test]
    fn test_empty_claim() {
        let phrases = pipeline().run("", Strategy::Tree, &cfg(), &mut NoopObserver).unwrap();
        assert!(phrases.is_empty());
    }

    #[test]
    fn test_collaborator_errors_propagate() {
        let p = Pipeline::flat(LexiconTokenizer(WORDS), FailingTagger);
        let err = p
            .run("所述基底", Strategy::Flat, &cfg(), &mut NoopObserver)
            .unwrap_err();
        assert!(matches!(err, ExtractError::Collaborator { stage: "tagger", .. }));
    }

    #[test]
    fn test_flat_pipeline_cannot_run_tree_strategy() {
        let p = Pipeline::flat(LexiconTokenizer(WORDS), LexiconTagger);
        let err = p
            .run("所述基底", Strategy::Tree, &cfg(), &mut NoopObserver)
            .unwrap_err();
        assert!(matches!(err, ExtractError::MissingTree));
    }

    #[test]
    fn test_preprocessor_runs_before_tagging() {
        use crate::pipeline::traits::MarkerCombiner;

        // Without the marker in its word list the tokenizer splits it apart.
        let p = Pipeline::flat(LexiconTokenizer(&["基底"]), LexiconTagger)
            .with_preprocessor(MarkerCombiner);
        let phrases = p
            .run("所述的基底", Strategy::Flat, &cfg(), &mut NoopObserver)
            .unwrap();
        assert_eq!(phrases.get("基底"), Some(&[3][..]));
    }

    #[test]
    fn test_run_batch_matches_single_runs() {
        let claims = ["所述基底", "", "提供基底", "所述栅极连接所述基底"];
        let p = pipeline();

        for strategy in [Strategy::Flat, Strategy::Tree] {
            let batch = p.run_batch(&claims, strategy, &cfg()).unwrap();
            assert_eq!(batch.len(), claims.len());
            for (claim, phrases) in claims.iter().zip(&batch) {
                let single = p.run(claim, strategy, &cfg(), &mut NoopObserver).unwrap();
                assert_eq!(&single, phrases, "claim {claim:?} ({})", strategy.as_str());
            }
        }
    }
}
