//! Validation engine for extractor specifications.
//!
//! The engine runs all registered [`ValidationRule`]s against an
//! [`ExtractorSpec`](super::spec::ExtractorSpec) and collects every
//! diagnostic into a [`ValidationReport`]. It never short-circuits on the
//! first error, so users see all problems at once.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use claim_features::pipeline::validation::ValidationEngine;
//!
//! let engine = ValidationEngine::with_defaults();
//! let report = engine.validate(&spec);
//! if report.has_errors() {
//!     for err in report.errors() {
//!         eprintln!("{err}");
//!     }
//! }
//! ```

use serde::Serialize;

use super::errors::{ErrorCode, ExtractorSpecError};
use super::spec::{ExtractorSpec, SPEC_VERSION};
use crate::error::{ExtractError, Result};

// ─── Severity ───────────────────────────────────────────────────────────────

/// Whether a diagnostic is a hard error or a soft warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

// ─── Diagnostic ─────────────────────────────────────────────────────────────

/// A single validation finding attached to an [`ExtractorSpecError`].
#[derive(Debug, Clone, Serialize)]
pub struct ValidationDiagnostic {
    pub severity: Severity,
    #[serde(flatten)]
    pub error: ExtractorSpecError,
}

impl ValidationDiagnostic {
    pub fn error(err: ExtractorSpecError) -> Self {
        Self {
            severity: Severity::Error,
            error: err,
        }
    }

    pub fn warning(err: ExtractorSpecError) -> Self {
        Self {
            severity: Severity::Warning,
            error: err,
        }
    }
}

// ─── Report ─────────────────────────────────────────────────────────────────

/// Collected diagnostics from running all validation rules.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    /// Iterate over error-severity diagnostics.
    pub fn errors(&self) -> impl Iterator<Item = &ExtractorSpecError> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .map(|d| &d.error)
    }

    /// Iterate over warning-severity diagnostics.
    pub fn warnings(&self) -> impl Iterator<Item = &ExtractorSpecError> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .map(|d| &d.error)
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Returns `true` if there are no errors (warnings are acceptable).
    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Collapse into a `Result`: every error message joined into one
    /// [`ExtractError::Config`]. Warnings are dropped.
    pub fn into_result(self) -> Result<()> {
        if self.is_valid() {
            return Ok(());
        }
        let messages: Vec<String> = self.errors().map(|e| e.to_string()).collect();
        Err(ExtractError::Config(messages.join("; ")))
    }
}

// ─── Rule trait ─────────────────────────────────────────────────────────────

/// A single validation rule that inspects an [`ExtractorSpec`] and returns
/// zero or more diagnostics.
///
/// Rules are stateless and must be `Send + Sync` so they can be shared
/// across threads.
pub trait ValidationRule: Send + Sync {
    /// Short, stable identifier for this rule (e.g., `"markers"`).
    fn name(&self) -> &str;

    fn validate(&self, spec: &ExtractorSpec) -> Vec<ValidationDiagnostic>;
}

// ─── Engine ─────────────────────────────────────────────────────────────────

/// Runs a set of [`ValidationRule`]s against an [`ExtractorSpec`] and
/// collects all diagnostics into a [`ValidationReport`].
pub struct ValidationEngine {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl ValidationEngine {
    /// Create an empty engine with no rules.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Create an engine pre-loaded with the default rule set.
    pub fn with_defaults() -> Self {
        let mut engine = Self::new();
        engine.add_rule(Box::new(VersionRule));
        engine.add_rule(Box::new(MarkersRule));
        engine.add_rule(Box::new(NounTagsRule));
        engine.add_rule(Box::new(LabelConventionsRule));
        engine.add_rule(Box::new(UnknownFieldsRule));
        engine
    }

    pub fn add_rule(&mut self, rule: Box<dyn ValidationRule>) {
        self.rules.push(rule);
    }

    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Run all rules against `spec` and return the collected report.
    pub fn validate(&self, spec: &ExtractorSpec) -> ValidationReport {
        let mut report = ValidationReport::default();
        for rule in &self.rules {
            report.diagnostics.extend(rule.validate(spec));
        }
        report
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Concrete rules
// ═══════════════════════════════════════════════════════════════════════════

// ─── 1. Known version ───────────────────────────────────────────────────────

struct VersionRule;

impl ValidationRule for VersionRule {
    fn name(&self) -> &str {
        "version"
    }

    fn validate(&self, spec: &ExtractorSpec) -> Vec<ValidationDiagnostic> {
        if spec.v == SPEC_VERSION {
            return vec![];
        }
        vec![ValidationDiagnostic::error(
            ExtractorSpecError::new(
                ErrorCode::UnsupportedVersion,
                "/v",
                format!("unsupported spec version {}", spec.v),
            )
            .with_hint(format!("Set \"v\": {SPEC_VERSION}")),
        )]
    }
}

// ─── 2. Markers: non-empty set, no blank entries ────────────────────────────

struct MarkersRule;

impl ValidationRule for MarkersRule {
    fn name(&self) -> &str {
        "markers"
    }

    fn validate(&self, spec: &ExtractorSpec) -> Vec<ValidationDiagnostic> {
        let mut out = Vec::new();

        let replaced_empty = spec.markers.as_ref().is_some_and(|m| m.is_empty());
        if replaced_empty && spec.extra_markers.is_empty() {
            out.push(ValidationDiagnostic::error(
                ExtractorSpecError::new(
                    ErrorCode::EmptySet,
                    "/markers",
                    "marker set is empty, so no phrase can ever be extracted",
                )
                .with_hint("Remove \"markers\" to use the defaults, or list at least one marker"),
            ));
        }

        let lists = [
            ("/markers", spec.markers.as_deref().unwrap_or_default()),
            ("/extra_markers", spec.extra_markers.as_slice()),
        ];
        for (path, list) in lists {
            for (i, marker) in list.iter().enumerate() {
                if marker.trim().is_empty() {
                    out.push(ValidationDiagnostic::error(ExtractorSpecError::new(
                        ErrorCode::EmptyValue,
                        format!("{path}/{i}"),
                        "marker is blank",
                    )));
                }
            }
        }

        out
    }
}

// ─── 3. Noun tags: empty set only warns ─────────────────────────────────────

struct NounTagsRule;

impl ValidationRule for NounTagsRule {
    fn name(&self) -> &str {
        "noun_tags"
    }

    fn validate(&self, spec: &ExtractorSpec) -> Vec<ValidationDiagnostic> {
        let replaced_empty = spec.noun_tags.as_ref().is_some_and(|t| t.is_empty());
        if replaced_empty && spec.extra_noun_tags.is_empty() {
            vec![ValidationDiagnostic::warning(
                ExtractorSpecError::new(
                    ErrorCode::EmptySet,
                    "/noun_tags",
                    "noun tag set is empty; flat phrases will be single tokens",
                )
                .with_hint("Remove \"noun_tags\" to use the defaults"),
            )]
        } else {
            vec![]
        }
    }
}

// ─── 4. Label conventions the tree strategy relies on ───────────────────────

struct LabelConventionsRule;

impl ValidationRule for LabelConventionsRule {
    fn name(&self) -> &str {
        "label_conventions"
    }

    fn validate(&self, spec: &ExtractorSpec) -> Vec<ValidationDiagnostic> {
        let mut out = Vec::new();

        let strings = [
            ("punctuation_tag", &spec.punctuation_tag),
            ("linking_particle", &spec.linking_particle),
            ("noun_phrase_prefix", &spec.noun_phrase_prefix),
            ("placeholder_label", &spec.placeholder_label),
        ];
        for (field, value) in strings {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                out.push(ValidationDiagnostic::error(ExtractorSpecError::new(
                    ErrorCode::EmptyValue,
                    format!("/{field}"),
                    format!("{field} must not be empty"),
                )));
            }
        }

        if let Some(sep) = spec.label_separator {
            if sep.is_ascii_digit() || sep.is_whitespace() {
                out.push(ValidationDiagnostic::error(
                    ExtractorSpecError::new(
                        ErrorCode::InvalidCombo,
                        "/label_separator",
                        format!("label separator {sep:?} cannot delimit a numeric offset"),
                    )
                    .with_hint("Use a non-digit, non-space character such as '-'"),
                ));
            }
            let placeholder_has_sep = spec
                .placeholder_label
                .as_deref()
                .is_some_and(|p| p.contains(sep));
            if placeholder_has_sep {
                out.push(ValidationDiagnostic::error(ExtractorSpecError::new(
                    ErrorCode::InvalidCombo,
                    "/placeholder_label",
                    "placeholder label contains the label separator",
                )));
            }
        }

        out
    }
}

// ─── 5. Unknown fields (strict → error, non-strict → warning) ──────────────

struct UnknownFieldsRule;

impl ValidationRule for UnknownFieldsRule {
    fn name(&self) -> &str {
        "unknown_fields"
    }

    fn validate(&self, spec: &ExtractorSpec) -> Vec<ValidationDiagnostic> {
        let diag_fn = if spec.strict {
            ValidationDiagnostic::error
        } else {
            ValidationDiagnostic::warning
        };

        let mut keys: Vec<&String> = spec.unknown_fields.keys().collect();
        keys.sort();
        keys.into_iter()
            .map(|key| {
                diag_fn(
                    ExtractorSpecError::new(
                        ErrorCode::UnknownField,
                        format!("/{key}"),
                        format!("unrecognized field \"{key}\""),
                    )
                    .with_hint("Check spelling or remove this field"),
                )
            })
            .collect()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(json: &str) -> ExtractorSpec {
        serde_json::from_str(json).unwrap()
    }

    fn engine() -> ValidationEngine {
        ValidationEngine::with_defaults()
    }

    // ─── Valid specs ────────────────────────────────────────────────────

    #[test]
    fn test_minimal_spec_is_valid() {
        let report = engine().validate(&spec(r#"{ "v": 1 }"#));
        assert!(report.is_valid());
        assert!(report.is_empty());
    }

    #[test]
    fn test_full_spec_is_valid() {
        let report = engine().validate(&spec(
            r#"{
                "v": 1,
                "strategy": "flat",
                "markers": ["所述"],
                "noun_tags": ["NN"],
                "label_separator": "/",
                "combine_markers": true
            }"#,
        ));
        assert!(report.is_valid(), "{:?}", report);
    }

    #[test]
    fn test_default_engine_rule_names() {
        assert_eq!(
            engine().rule_names(),
            vec!["version", "markers", "noun_tags", "label_conventions", "unknown_fields"]
        );
    }

    // ─── Rule: version ──────────────────────────────────────────────────

    #[test]
    fn test_unknown_version_fails() {
        let report = engine().validate(&spec(r#"{ "v": 2 }"#));
        let errors: Vec<_> = report.errors().collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, ErrorCode::UnsupportedVersion);
        assert_eq!(errors[0].path, "/v");
    }

    // ─── Rule: markers ──────────────────────────────────────────────────

    #[test]
    fn test_empty_markers_fail() {
        let report = engine().validate(&spec(r#"{ "v": 1, "markers": [] }"#));
        let errors: Vec<_> = report.errors().collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, ErrorCode::EmptySet);
        assert!(errors[0].hint.is_some());
    }

    #[test]
    fn test_empty_markers_with_extras_are_valid() {
        let report = engine().validate(&spec(r#"{ "v": 1, "markers": [], "extra_markers": ["此"] }"#));
        assert!(report.is_valid());
    }

    #[test]
    fn test_blank_marker_fails_with_index_path() {
        let report = engine().validate(&spec(r#"{ "v": 1, "extra_markers": ["此", " "] }"#));
        let errors: Vec<_> = report.errors().collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, "/extra_markers/1");
    }

    // ─── Rule: noun_tags ────────────────────────────────────────────────

    #[test]
    fn test_empty_noun_tags_warn() {
        let report = engine().validate(&spec(r#"{ "v": 1, "noun_tags": [] }"#));
        assert!(report.is_valid());
        assert_eq!(report.warnings().count(), 1);
    }

    // ─── Rule: label_conventions ────────────────────────────────────────

    #[test]
    fn test_blank_label_fields_fail() {
        let report = engine().validate(&spec(
            r#"{ "v": 1, "punctuation_tag": "", "noun_phrase_prefix": "  " }"#,
        ));
        let paths: Vec<&str> = report.errors().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["/punctuation_tag", "/noun_phrase_prefix"]);
    }

    #[test]
    fn test_digit_separator_fails() {
        let report = engine().validate(&spec(r#"{ "v": 1, "label_separator": "7" }"#));
        assert!(report.has_errors());
    }

    #[test]
    fn test_placeholder_containing_separator_fails() {
        let report = engine().validate(&spec(
            r#"{ "v": 1, "placeholder_label": "-NONE-", "label_separator": "-" }"#,
        ));
        let errors: Vec<_> = report.errors().collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, "/placeholder_label");
    }

    // ─── Rule: unknown_fields ───────────────────────────────────────────

    #[test]
    fn test_unknown_fields_warn_when_lenient() {
        let report = engine().validate(&spec(r#"{ "v": 1, "markerz": [] }"#));
        assert!(report.is_valid());
        let warnings: Vec<_> = report.warnings().collect();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].path, "/markerz");
    }

    #[test]
    fn test_unknown_fields_fail_when_strict() {
        let report = engine().validate(&spec(r#"{ "v": 1, "strict": true, "b": 1, "a": 2 }"#));
        let paths: Vec<&str> = report.errors().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["/a", "/b"]);
    }

    // ─── Collection and conversion ──────────────────────────────────────

    #[test]
    fn test_all_problems_reported_at_once() {
        let report = engine().validate(&spec(
            r#"{ "v": 3, "markers": [], "noun_tags": [], "strict": true, "x": 0 }"#,
        ));
        assert_eq!(report.errors().count(), 3);
        assert_eq!(report.warnings().count(), 1);
    }

    #[test]
    fn test_into_result() {
        assert!(engine().validate(&spec(r#"{ "v": 1 }"#)).into_result().is_ok());

        let err = engine()
            .validate(&spec(r#"{ "v": 2 }"#))
            .into_result()
            .unwrap_err();
        assert!(matches!(err, ExtractError::Config(ref m) if m.contains("unsupported_version")));
    }

    #[test]
    fn test_report_serializes_flat() {
        let report = engine().validate(&spec(r#"{ "v": 2 }"#));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["diagnostics"][0]["severity"], "error");
        assert_eq!(json["diagnostics"][0]["code"], "unsupported_version");
        assert_eq!(json["diagnostics"][0]["path"], "/v");
    }

    #[test]
    fn test_custom_rule() {
        struct RequireFlat;

        impl ValidationRule for RequireFlat {
            fn name(&self) -> &str {
                "require_flat"
            }

            fn validate(&self, spec: &ExtractorSpec) -> Vec<ValidationDiagnostic> {
                if spec.strategy == Some(crate::types::Strategy::Flat) {
                    vec![]
                } else {
                    vec![ValidationDiagnostic::error(ExtractorSpecError::new(
                        ErrorCode::InvalidCombo,
                        "/strategy",
                        "only the flat strategy is deployed",
                    ))]
                }
            }
        }

        let mut engine = ValidationEngine::new();
        engine.add_rule(Box::new(RequireFlat));
        assert!(engine.validate(&spec(r#"{ "v": 1 }"#)).has_errors());
        assert!(engine.validate(&spec(r#"{ "v": 1, "strategy": "flat" }"#)).is_valid());
    }
}
