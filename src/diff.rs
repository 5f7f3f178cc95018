//! Unified-diff rendering for repair reports.

use similar::TextDiff;

/// Unchanged lines kept around each hunk.
const CONTEXT_RADIUS: usize = 3;

/// Renders a unified diff between the original and repaired source.
///
/// Display and audit only: the authoritative repaired content is the full
/// replacement text, never this diff re-applied.
pub fn format_diff(original: &str, repaired: &str) -> String {
    TextDiff::from_lines(original, repaired)
        .unified_diff()
        .context_radius(CONTEXT_RADIUS)
        .header("original.py", "repaired.py")
        .to_string()
}
