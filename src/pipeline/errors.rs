//! Configuration diagnostics.
//!
//! Every problem found in an [`ExtractorSpec`](super::spec::ExtractorSpec)
//! is reported as an [`ExtractorSpecError`]: a stable [`ErrorCode`], a JSON
//! pointer to the offending field, a message, and an optional hint.

use std::fmt;

use serde::Serialize;

/// Stable, machine-readable diagnostic codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The `v` field names a version this build does not understand.
    UnsupportedVersion,
    /// A set that must have members is empty.
    EmptySet,
    /// A string field that must be non-empty is empty or blank.
    EmptyValue,
    /// Two fields conflict with each other.
    InvalidCombo,
    /// A field the schema does not know.
    UnknownField,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnsupportedVersion => "unsupported_version",
            Self::EmptySet => "empty_set",
            Self::EmptyValue => "empty_value",
            Self::InvalidCombo => "invalid_combo",
            Self::UnknownField => "unknown_field",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One configuration problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractorSpecError {
    pub code: ErrorCode,
    /// JSON pointer to the field, e.g. `/markers`.
    pub path: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ExtractorSpecError {
    pub fn new(code: ErrorCode, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            path: path.into(),
            message: message.into(),
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl fmt::Display for ExtractorSpecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "/" } else { &self.path };
        write!(f, "[{}] {}: {}", self.code, path, self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, " (hint: {hint})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ExtractorSpecError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_hint() {
        let err = ExtractorSpecError::new(ErrorCode::EmptySet, "/markers", "no markers configured")
            .with_hint("Add at least one marker");
        assert_eq!(
            err.to_string(),
            "[empty_set] /markers: no markers configured (hint: Add at least one marker)"
        );
    }

    #[test]
    fn test_root_path_display() {
        let err = ExtractorSpecError::new(ErrorCode::UnsupportedVersion, "", "bad version");
        assert_eq!(err.to_string(), "[unsupported_version] /: bad version");
    }

    #[test]
    fn test_serialize_skips_missing_hint() {
        let err = ExtractorSpecError::new(ErrorCode::UnknownField, "/bogus", "unrecognized");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "unknown_field");
        assert!(json.get("hint").is_none());
    }
}
