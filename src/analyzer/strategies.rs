//! Fix strategies, one per error category.
//!
//! All of these are pure text rewrites keyed on regex or substring patterns.
//! They do not parse code, and the global ones rewrite every textual
//! occurrence rather than the one that failed, so a "fix" may still be wrong
//! code. That is the intended behavior of heuristic repair.

use std::sync::OnceLock;

use regex::Regex;

use super::PatchResult;

/// Keywords that open a block and therefore need a trailing colon.
const BLOCK_KEYWORDS: [&str; 6] = ["def ", "if ", "elif ", "for ", "while ", "else"];

fn line_number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"line (\d+)").expect("valid line-number pattern"))
}

fn range_len_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"range\(len\(([^)]*)\)\)").expect("valid range-len pattern"))
}

fn plus_int_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\+\s*(\d+)").expect("valid plus-integer pattern"))
}

fn undefined_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"name '(\w+)' is not defined").expect("valid name pattern"))
}

/// Appends the missing `:` to the block header named in the error text.
///
/// Declines when the error text carries no `line N`, the line is out of
/// range, the line opens no block, or the colon is already there (so a
/// repaired line is never patched twice).
pub(super) fn fix_missing_colon(stderr: &str, source: &str) -> Option<PatchResult> {
    let caps = line_number_re().captures(stderr)?;
    let line_no: usize = caps[1].parse().ok()?;

    let mut lines: Vec<&str> = source.lines().collect();
    let idx = line_no.checked_sub(1)?;
    let line = *lines.get(idx)?;

    let opens_block = BLOCK_KEYWORDS.iter().any(|kw| line.contains(kw));
    if !opens_block || line.trim().ends_with(':') {
        return None;
    }

    let repaired_line = format!("{}:", line);
    lines[idx] = &repaired_line;
    let repaired = lines.join("\n");

    Some(PatchResult::new(
        "Added missing ':' at the end of the block header.",
        source,
        repaired,
    ))
}

/// Indents every non-blank line by four spaces.
///
/// Naive on purpose: it does not work out which lines actually need the
/// indent, so already-correct lines get shifted too.
pub(super) fn fix_indentation(source: &str) -> Option<PatchResult> {
    let repaired = source
        .lines()
        .map(|line| {
            if line.trim().is_empty() {
                line.to_string()
            } else {
                format!("    {}", line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n");

    Some(PatchResult::new(
        "Auto-indented all non-blank lines to fix the indentation error.",
        source,
        repaired,
    ))
}

/// Rewrites every `range(len(x))` bound to `range(len(x) - 1)`.
///
/// Applied globally, whether or not a given loop is the failing one.
pub(super) fn fix_index_off_by_one(source: &str) -> Option<PatchResult> {
    let repaired = range_len_re()
        .replace_all(source, "range(len(${1}) - 1)")
        .into_owned();

    Some(PatchResult::new(
        "Shortened range(len(...)) loop bounds by one to avoid indexing past the end.",
        source,
        repaired,
    ))
}

/// Wraps every `+ <integer literal>` in `str(...)`.
///
/// Applied globally; unrelated numeric additions get rewritten too.
pub(super) fn fix_type_mismatch(source: &str) -> Option<PatchResult> {
    let repaired = plus_int_re()
        .replace_all(source, "+ str(${1})")
        .into_owned();

    Some(PatchResult::new(
        "Wrapped added integer literals in str() so they concatenate with text.",
        source,
        repaired,
    ))
}

/// Declares the undefined identifier as `0` above the existing source.
///
/// Declines when the identifier cannot be pulled out of the error text.
pub(super) fn fix_undefined_name(stderr: &str, source: &str) -> Option<PatchResult> {
    let caps = undefined_name_re().captures(stderr)?;
    let name = &caps[1];
    let repaired = format!("{} = 0\n{}", name, source);

    Some(PatchResult::new(
        format!("Added a starting declaration for undefined variable '{}'.", name),
        source,
        repaired,
    ))
}

/// Replaces every literal `/0` with `/1`.
///
/// Purely textual; any `/0` in the source matches, not just the division
/// that raised.
pub(super) fn fix_division_by_zero(source: &str) -> Option<PatchResult> {
    let repaired = source.replace("/0", "/1");

    Some(PatchResult::new(
        "Replaced literal division by zero with division by one.",
        source,
        repaired,
    ))
}
