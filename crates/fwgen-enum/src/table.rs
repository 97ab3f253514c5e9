//! Fixed-width table rendering.

use crate::entries::EnumEntry;

/// Formatting knobs for the rendered table.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Width the text between the braces is padded to before the annotation.
    pub pad_width: usize,
    /// Normalise annotations (see [`crate::annotations::clean_annotation`]).
    pub clean_annotations: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            pad_width: 50,
            clean_annotations: false,
        }
    }
}

/// Render one row: `{0xNN, "Name"},` + padding + annotation.
///
/// The hex value has at least two digits. At least one space separates the
/// row from the annotation even when the row is wider than `pad_width`.
pub fn render_row(entry: &EnumEntry, options: &RenderOptions) -> String {
    let inner = format!("{:#04x}, \"{}\"", entry.value, entry.name);
    let pad = options.pad_width.saturating_sub(inner.len()).max(1);
    format!("{{{}}},{}{}", inner, " ".repeat(pad), entry.annotation)
}

/// Render all rows in declaration order, newline separated, without a trailing newline.
pub fn render_table(entries: &[EnumEntry], options: &RenderOptions) -> String {
    entries
        .iter()
        .map(|e| render_row(e, options))
        .collect::<Vec<_>>()
        .join("\n")
}
