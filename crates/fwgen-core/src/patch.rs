//! Replace the generated region between two marker lines of a text file.

use std::fs;
use std::path::{Path, PathBuf};

/// Errors from marker-region patching.
#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    #[error("marker not found: {marker:?}")]
    MarkerNotFound { marker: String },
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The pair of sentinel lines delimiting a generated region.
#[derive(Debug, Clone, Copy)]
pub struct Markers<'a> {
    pub start: &'a str,
    pub end: &'a str,
}

/// Where the patched file is written.
#[derive(Debug, Clone)]
pub enum WriteMode {
    /// Overwrite the target.
    InPlace,
    /// Write next to the target, with `suffix` appended to its file name.
    Sibling { suffix: String },
}

/// Replace everything strictly between the end of `markers.start` and the
/// beginning of `markers.end` with `replacement`, framed by newlines.
///
/// The end marker is searched after the start marker, so an end marker
/// that only appears before the start is reported as missing.
pub fn splice(content: &str, markers: Markers<'_>, replacement: &str) -> Result<String, PatchError> {
    let start_offset = content
        .find(markers.start)
        .map(|i| i + markers.start.len())
        .ok_or_else(|| PatchError::MarkerNotFound {
            marker: markers.start.to_string(),
        })?;
    let end_offset = content[start_offset..]
        .find(markers.end)
        .map(|i| i + start_offset)
        .ok_or_else(|| PatchError::MarkerNotFound {
            marker: markers.end.to_string(),
        })?;

    let mut out = String::with_capacity(content.len() + replacement.len() + 2);
    out.push_str(&content[..start_offset]);
    out.push('\n');
    out.push_str(replacement);
    out.push('\n');
    out.push_str(&content[end_offset..]);
    Ok(out)
}

/// Path the patched file lands at for a given target and mode.
pub fn output_path(target: &Path, mode: &WriteMode) -> PathBuf {
    match mode {
        WriteMode::InPlace => target.to_path_buf(),
        WriteMode::Sibling { suffix } => {
            let mut name = target.file_name().unwrap_or_default().to_os_string();
            name.push(suffix);
            target.with_file_name(name)
        }
    }
}

/// Read `target`, splice `replacement` between the markers and write the result.
/// Returns the path that was written.
pub fn patch_file(
    target: &Path,
    markers: Markers<'_>,
    replacement: &str,
    mode: &WriteMode,
) -> Result<PathBuf, PatchError> {
    let content = fs::read_to_string(target).map_err(|source| PatchError::Io {
        path: target.to_path_buf(),
        source,
    })?;
    let updated = splice(&content, markers, replacement)?;

    let out = output_path(target, mode);
    fs::write(&out, updated).map_err(|source| PatchError::Io {
        path: out.clone(),
        source,
    })?;
    tracing::info!("patched {} -> {}", target.display(), out.display());
    Ok(out)
}
