//! Line-oriented annotation scan and the merge with resolved entries.

use crate::EnumError;
use crate::entries::{EnumDefinition, EnumEntry, ResolvedEntry};
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Map from entry name to the text following its declaration on the same line.
pub type AnnotationMap = HashMap<String, String>;

/// Scan `source` line by line and record the trailing text of every entry line.
///
/// Skips blank lines, comment-only lines, the `enum` header and the closing
/// brace. A remaining line is split at its first `,`; the left side (minus
/// any `= value`) is the name, the trimmed right side the annotation. Lines
/// without a comma declare nothing the scan can attribute and are skipped.
pub fn scan_annotations(source: &str) -> AnnotationMap {
    scan_lines(source.lines())
}

/// [`scan_annotations`] restricted to the body of `definition`, skipping
/// lines that open inside a comment.
pub fn scan_enum_annotations(source: &str, definition: &EnumDefinition) -> AnnotationMap {
    scan_lines(source.lines().enumerate().filter_map(|(row, line)| {
        (definition.body_rows.contains(&row) && !definition.commented_rows.contains(&row))
            .then_some(line)
    }))
}

fn scan_lines<'a>(lines: impl Iterator<Item = &'a str>) -> AnnotationMap {
    let mut map = AnnotationMap::new();
    for line in lines {
        let line = line.trim();
        if line.is_empty() || line.starts_with("enum") || line.starts_with('}') || line.starts_with("//")
        {
            continue;
        }
        let Some((name, rest)) = line.split_once(',') else {
            continue;
        };
        let name = name.split_once('=').map_or(name, |(n, _)| n).trim();
        map.insert(name.to_string(), rest.trim().to_string());
    }
    map
}

/// Attach annotations to resolved entries, keeping declaration order.
///
/// Every resolved name must have been seen by the line scan; a miss means
/// the two passes disagree (a declaration split across lines, two entries
/// on one line) and fails the whole compile.
pub fn merge(
    resolved: Vec<ResolvedEntry>,
    annotations: &AnnotationMap,
    clean: bool,
) -> Result<Vec<EnumEntry>, EnumError> {
    resolved
        .into_iter()
        .map(|ResolvedEntry { name, value }| {
            let Some(raw) = annotations.get(&name) else {
                return Err(EnumError::MissingAnnotation { name });
            };
            let annotation = if clean {
                clean_annotation(raw, value)
            } else {
                raw.clone()
            };
            Ok(EnumEntry {
                name,
                value,
                annotation,
            })
        })
        .collect()
}

/// Normalise an annotation for display.
///
/// Drops the comment leader (`///<`, `//`, `/*` ...), a closing `*/`, and a
/// leading hex ordinal when it restates `value`. Dots glued to the ordinal
/// (`4A.. Before`) stay with the text.
pub fn clean_annotation(raw: &str, value: u64) -> String {
    static LEADER_RE: OnceLock<Regex> = OnceLock::new();
    let leader_re = LEADER_RE
        .get_or_init(|| Regex::new(r"^(?:///<|//!<|/\*\*<|/\*!<|///|//|/\*\*|/\*)\s*").unwrap());

    let text = leader_re.replace(raw.trim(), "");
    let text = text.trim_end();
    let text = text.strip_suffix("*/").unwrap_or(text).trim();

    let (token, rest) = text.split_once(char::is_whitespace).unwrap_or((text, ""));
    let ordinal = token.trim_end_matches('.');
    let restates_value = !ordinal.is_empty()
        && ordinal.chars().all(|c| c.is_ascii_hexdigit())
        && u64::from_str_radix(ordinal, 16) == Ok(value);
    if !restates_value {
        return text.to_string();
    }

    let dots = &token[ordinal.len()..];
    format!("{} {}", dots, rest.trim_start()).trim().to_string()
}
