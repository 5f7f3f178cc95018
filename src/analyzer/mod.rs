//! Error classification and heuristic patch generation.
//!
//! The classifier scans interpreter stderr for a fixed, priority-ordered set
//! of category markers; the first marker found selects the fix strategy. The
//! strategies themselves are plain text rewrites (see [`strategies`]) — no
//! parsing, no execution — so a produced patch is a candidate, not a
//! guarantee.

mod strategies;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::diff::format_diff;

/// A candidate repair produced by a fix strategy.
///
/// `repaired_source` is the full replacement text; `diff` is rendered once at
/// construction for display and audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchResult {
    /// Why this fix applies, phrased for a human reader.
    pub rationale: String,
    /// Unified diff between the original and repaired source.
    pub diff: String,
    /// The complete repaired source, to be executed next.
    pub repaired_source: String,
}

impl PatchResult {
    fn new(rationale: impl Into<String>, original: &str, repaired_source: String) -> Self {
        Self {
            rationale: rationale.into(),
            diff: format_diff(original, &repaired_source),
            repaired_source,
        }
    }
}

/// The error classes this crate knows how to patch.
///
/// An unrecognized error is represented by `classify` returning `None`, so a
/// patch can never exist for an error outside this set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// `SyntaxError` from a block header missing its trailing colon.
    MissingColon,
    /// `IndentationError` of any kind.
    Indentation,
    /// `IndexError` from an off-by-one loop bound.
    IndexOffByOne,
    /// `TypeError` from concatenating text with a number.
    TypeMismatch,
    /// `NameError` for a variable that was never assigned.
    UndefinedName,
    /// `ZeroDivisionError` from a literal division by zero.
    DivisionByZero,
}

impl ErrorCategory {
    /// Categories in dispatch priority order.
    ///
    /// The first category whose marker appears in stderr wins, even when a
    /// later marker also appears (chained tracebacks); keep this order stable.
    pub const DISPATCH_ORDER: [ErrorCategory; 6] = [
        ErrorCategory::MissingColon,
        ErrorCategory::Indentation,
        ErrorCategory::IndexOffByOne,
        ErrorCategory::TypeMismatch,
        ErrorCategory::UndefinedName,
        ErrorCategory::DivisionByZero,
    ];

    /// The stderr substring that identifies this category.
    pub fn marker(&self) -> &'static str {
        match self {
            ErrorCategory::MissingColon => "SyntaxError",
            ErrorCategory::Indentation => "IndentationError",
            ErrorCategory::IndexOffByOne => "IndexError",
            ErrorCategory::TypeMismatch => "TypeError",
            ErrorCategory::UndefinedName => "NameError",
            ErrorCategory::DivisionByZero => "ZeroDivisionError",
        }
    }

    /// Runs this category's fix strategy against the error text and source.
    ///
    /// Returns `None` when the strategy's preconditions do not hold (no line
    /// number in the error text, identifier not extractable, colon already
    /// present).
    pub fn apply(&self, stderr: &str, source: &str) -> Option<PatchResult> {
        match self {
            ErrorCategory::MissingColon => strategies::fix_missing_colon(stderr, source),
            ErrorCategory::Indentation => strategies::fix_indentation(source),
            ErrorCategory::IndexOffByOne => strategies::fix_index_off_by_one(source),
            ErrorCategory::TypeMismatch => strategies::fix_type_mismatch(source),
            ErrorCategory::UndefinedName => strategies::fix_undefined_name(stderr, source),
            ErrorCategory::DivisionByZero => strategies::fix_division_by_zero(source),
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorCategory::MissingColon => "missing_colon",
            ErrorCategory::Indentation => "indentation",
            ErrorCategory::IndexOffByOne => "index_off_by_one",
            ErrorCategory::TypeMismatch => "type_mismatch",
            ErrorCategory::UndefinedName => "undefined_name",
            ErrorCategory::DivisionByZero => "division_by_zero",
        };
        write!(f, "{}", name)
    }
}

/// Picks the first category whose marker appears in `stderr`.
///
/// Whitespace-only stderr means a clean run and classifies as nothing.
pub fn classify(stderr: &str) -> Option<ErrorCategory> {
    if stderr.trim().is_empty() {
        return None;
    }
    ErrorCategory::DISPATCH_ORDER
        .iter()
        .copied()
        .find(|category| stderr.contains(category.marker()))
}

/// Classifies `stderr` and produces a candidate patch for `source`.
///
/// Returns `None` when stderr is clean (nothing to fix), no category marker
/// matches, or the selected strategy declines.
pub fn classify_and_fix(stderr: &str, source: &str) -> Option<PatchResult> {
    classify(stderr)?.apply(stderr, source)
}
