//! Tree-sitter integration for parsing C enum definitions.

use crate::EnumError;

/// Parse C source text and return the tree-sitter tree.
///
/// A tree containing error or missing nodes is rejected with the 1-based
/// line of the first problem.
pub fn parse_source(source: &str) -> Result<tree_sitter::Tree, EnumError> {
    let language: tree_sitter::Language = tree_sitter_c::LANGUAGE.into();
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&language)
        .map_err(|e| EnumError::parse(format!("failed to set tree-sitter language: {e}")))?;
    let tree = parser
        .parse(source.as_bytes(), None)
        .ok_or_else(|| EnumError::parse("tree-sitter returned no tree"))?;

    let root = tree.root_node();
    if root.has_error() {
        let line = first_error(&root).map_or(0, |n| n.start_position().row + 1);
        return Err(EnumError::parse(format!(
            "malformed enum syntax near line {line}"
        )));
    }
    Ok(tree)
}

fn first_error<'t>(node: &tree_sitter::Node<'t>) -> Option<tree_sitter::Node<'t>> {
    if node.is_error() || node.is_missing() {
        return Some(*node);
    }
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .filter(|c| c.has_error() || c.is_missing())
        .find_map(|c| first_error(&c))
}

/// Collect every node of `kind` below `node`, in source order.
pub fn find_all<'t>(node: &tree_sitter::Node<'t>, kind: &str, out: &mut Vec<tree_sitter::Node<'t>>) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == kind {
            out.push(child);
        }
        find_all(&child, kind, out);
    }
}
