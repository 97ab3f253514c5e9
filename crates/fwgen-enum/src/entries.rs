//! Resolve enumerator values from the C syntax tree.

use crate::EnumError;
use crate::treesitter;
use serde::Serialize;
use std::collections::HashSet;
use std::ops::RangeInclusive;

/// A named enum constant with its resolved value, before annotations are attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEntry {
    pub name: String,
    pub value: u64,
}

/// One entry of the compiled table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumEntry {
    pub name: String,
    pub value: u64,
    /// Trailing commentary from the declaring line; may be empty.
    pub annotation: String,
}

/// The enum definition found in a source text.
#[derive(Debug, Clone)]
pub struct EnumDefinition {
    pub entries: Vec<ResolvedEntry>,
    /// 0-based rows from the opening to the closing brace.
    pub body_rows: RangeInclusive<usize>,
    /// Body rows whose first non-blank character sits inside a comment.
    pub commented_rows: HashSet<usize>,
}

/// Parse the single enum definition in `source` and resolve every entry's value.
///
/// The first implicit entry is 0, each following implicit entry is its
/// predecessor plus one, and an explicit `= <literal>` sets the value and
/// the baseline for the entries after it.
pub fn resolve_entries(source: &str) -> Result<Vec<ResolvedEntry>, EnumError> {
    parse_enum(source).map(|definition| definition.entries)
}

/// Like [`resolve_entries`], also reporting where the body and its comments lie.
pub fn parse_enum(source: &str) -> Result<EnumDefinition, EnumError> {
    let tree = treesitter::parse_source(source)?;
    let root = tree.root_node();

    let mut specifiers = Vec::new();
    treesitter::find_all(&root, "enum_specifier", &mut specifiers);
    let bodies: Vec<_> = specifiers
        .iter()
        .filter_map(|s| s.child_by_field_name("body"))
        .collect();

    let body = match bodies.as_slice() {
        [body] => *body,
        [] => return Err(EnumError::parse("no enum definition found")),
        many => {
            return Err(EnumError::parse(format!(
                "expected exactly one enum definition, found {}",
                many.len()
            )));
        }
    };

    let mut entries = Vec::new();
    let mut seen = HashSet::new();
    let mut next: Option<u64> = Some(0);

    let mut cursor = body.walk();
    for enumerator in body.children(&mut cursor) {
        if enumerator.kind() != "enumerator" {
            continue;
        }
        let line = enumerator.start_position().row + 1;
        let name_node = enumerator
            .child_by_field_name("name")
            .ok_or_else(|| EnumError::parse(format!("enumerator without a name at line {line}")))?;
        let name = source[name_node.byte_range()].to_string();

        let value = match enumerator.child_by_field_name("value") {
            Some(value_node) => {
                let text = &source[value_node.byte_range()];
                if value_node.kind() != "number_literal" {
                    return Err(EnumError::parse(format!(
                        "unsupported value expression for {name} at line {line}: {text}"
                    )));
                }
                parse_int_literal(text).ok_or_else(|| {
                    EnumError::parse(format!("invalid integer literal for {name}: {text}"))
                })?
            }
            None => next.ok_or_else(|| {
                EnumError::parse(format!("value of {name} overflows after {}", u64::MAX))
            })?,
        };

        if !seen.insert(name.clone()) {
            return Err(EnumError::DuplicateName { name });
        }
        next = value.checked_add(1);
        entries.push(ResolvedEntry { name, value });
    }

    let body_rows = body.start_position().row..=body.end_position().row;
    let mut comments = Vec::new();
    treesitter::find_all(&body, "comment", &mut comments);
    let commented_rows = commented_rows(source, &comments, &body_rows);

    Ok(EnumDefinition {
        entries,
        body_rows,
        commented_rows,
    })
}

fn commented_rows(
    source: &str,
    comments: &[tree_sitter::Node<'_>],
    rows: &RangeInclusive<usize>,
) -> HashSet<usize> {
    let mut out = HashSet::new();
    let mut line_start = 0;
    for (row, line) in source.split_inclusive('\n').enumerate() {
        let first = line_start + (line.len() - line.trim_start().len());
        line_start += line.len();
        if rows.contains(&row) && comments.iter().any(|c| c.byte_range().contains(&first)) {
            out.insert(row);
        }
    }
    out
}

/// Parse a C integer literal: decimal or `0x`/`0X` hexadecimal, with optional
/// `u`/`l` suffixes.
///
/// Octal (a multi-digit literal with a leading `0`) is not accepted.
pub fn parse_int_literal(text: &str) -> Option<u64> {
    let digits = text.trim().trim_end_matches(['u', 'U', 'l', 'L']);
    if let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        u64::from_str_radix(hex, 16).ok()
    } else if digits.len() > 1 && digits.starts_with('0') {
        None
    } else if digits.chars().all(|c| c.is_ascii_digit()) {
        digits.parse().ok()
    } else {
        None
    }
}
