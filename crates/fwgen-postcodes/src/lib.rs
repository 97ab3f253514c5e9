//! Postcode table generator.
//!
//! Downloads the community postcode CSV (or reads a local copy), validates
//! every row and renders one `static PostCode <Type>Codes[]` initializer per
//! code type for the firmware's `codes.h`.

pub mod render;
pub mod rows;
pub mod source;

pub use rows::{CodeType, Console, PostcodeRow, parse_rows};
pub use source::{FileSource, HttpSource, PostcodeSource};

use std::path::PathBuf;

/// Errors from fetching or validating postcode data.
#[derive(Debug, thiserror::Error)]
pub enum PostcodeError {
    #[error("failed to fetch {url}: {message}")]
    RemoteFetch { url: String, message: String },
    #[error("invalid postcode row at line {line}: {message}")]
    RowValidation { line: usize, message: String },
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Fetch, validate and render the postcode tables.
pub fn generate(source: &dyn PostcodeSource) -> Result<String, PostcodeError> {
    let csv_text = source.fetch()?;
    let rows = parse_rows(&csv_text)?;
    tracing::info!("{} postcode rows from {}", rows.len(), source.describe());
    Ok(render::render_tables(&rows))
}
