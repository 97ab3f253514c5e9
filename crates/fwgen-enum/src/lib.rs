//! Enum table compiler.
//!
//! Turns a single annotated C enum definition into `{0xNN, "Name"},` rows:
//!
//! 1. [`entries::resolve_entries`] parses the enum with the tree-sitter C
//!    grammar and resolves every enumerator's value.
//! 2. [`annotations::scan_enum_annotations`] scans the enum body line by
//!    line and maps each declared name to its trailing commentary.
//! 3. [`annotations::merge`] joins the two by name, failing on any name the
//!    line scan did not see.
//! 4. [`table::render_table`] formats the rows with an aligned annotation column.

pub mod annotations;
pub mod entries;
pub mod table;
pub mod treesitter;

pub use entries::EnumEntry;
pub use table::RenderOptions;

/// Errors from compiling an enum definition.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EnumError {
    #[error("enum parse error: {message}")]
    Parse { message: String },
    #[error("duplicate enum entry name: {name}")]
    DuplicateName { name: String },
    #[error("no annotation line found for enum entry {name}")]
    MissingAnnotation { name: String },
}

impl EnumError {
    pub(crate) fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }
}

/// Resolve, annotate and order every entry of the enum in `source`.
pub fn compile(source: &str, options: &RenderOptions) -> Result<Vec<EnumEntry>, EnumError> {
    let definition = entries::parse_enum(source)?;
    let annotation_map = annotations::scan_enum_annotations(source, &definition);
    tracing::debug!(
        "resolved {} enum entries, scanned {} annotation lines",
        definition.entries.len(),
        annotation_map.len()
    );

    annotations::merge(definition.entries, &annotation_map, options.clean_annotations)
}

/// Compile `source` and render the lookup table rows, one per line.
pub fn compile_table(source: &str, options: &RenderOptions) -> Result<String, EnumError> {
    let entries = compile(source, options)?;
    Ok(table::render_table(&entries, options))
}
