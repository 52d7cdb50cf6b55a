//! Pipeline observer hooks for logging, profiling and debugging.
//!
//! Observers receive notifications at stage boundaries without coupling to
//! stage logic. Use cases include timing stages, capturing intermediate
//! artifacts for debugging, and emitting structured telemetry.

use std::time::{Duration, Instant};

use crate::phrase::map::PhraseOffsets;
use crate::pipeline::artifacts::ClaimDocument;

pub const STAGE_TOKENIZE: &str = "tokenize";
pub const STAGE_PREPROCESS: &str = "preprocess";
pub const STAGE_TAG: &str = "tag";
pub const STAGE_PARSE: &str = "parse";
pub const STAGE_MERGE: &str = "merge";
pub const STAGE_EXTRACT: &str = "extract";

/// Measures one stage's wall time.
#[derive(Debug, Clone, Copy)]
pub struct StageClock(Instant);

impl StageClock {
    pub fn start() -> Self {
        Self(Instant::now())
    }

    pub fn elapsed(&self) -> Duration {
        self.0.elapsed()
    }
}

/// What a stage reports when it finishes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StageReport {
    elapsed: Duration,
    /// Items produced (tokens, tags, preterminals, phrases).
    items: Option<usize>,
}

impl StageReport {
    pub fn new(elapsed: Duration) -> Self {
        Self {
            elapsed,
            items: None,
        }
    }

    pub fn with_items(mut self, items: usize) -> Self {
        self.items = Some(items);
        self
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn items(&self) -> Option<usize> {
        self.items
    }
}

/// Receives stage-boundary callbacks. Every method defaults to a no-op.
pub trait PipelineObserver {
    fn on_stage_start(&mut self, _stage: &'static str) {}

    fn on_stage_end(&mut self, _stage: &'static str, _report: &StageReport) {}

    /// Called once annotation is complete, before extraction.
    fn on_document(&mut self, _doc: &ClaimDocument) {}

    fn on_phrases(&mut self, _phrases: &PhraseOffsets) {}
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// Collects a report per finished stage, in execution order.
#[derive(Debug, Clone, Default)]
pub struct StageTimingObserver {
    reports: Vec<(&'static str, StageReport)>,
}

impl StageTimingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> &[(&'static str, StageReport)] {
        &self.reports
    }

    pub fn total(&self) -> Duration {
        self.reports.iter().map(|(_, r)| r.elapsed()).sum()
    }
}

impl PipelineObserver for StageTimingObserver {
    fn on_stage_end(&mut self, stage: &'static str, report: &StageReport) {
        self.reports.push((stage, report.clone()));
    }
}

/// Emits a `tracing` event per finished stage.
#[cfg(feature = "tracing")]
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

#[cfg(feature = "tracing")]
impl PipelineObserver for TracingObserver {
    fn on_stage_end(&mut self, stage: &'static str, report: &StageReport) {
        tracing::debug!(
            stage,
            elapsed_us = report.elapsed().as_micros() as u64,
            items = report.items(),
            "stage finished"
        );
    }

    fn on_phrases(&mut self, phrases: &PhraseOffsets) {
        tracing::debug!(
            phrases = phrases.len(),
            occurrences = phrases.occurrences(),
            "phrases extracted"
        );
    }
}
