//! Build flags stamping the firmware with its version and build date.
//!
//! The version is the most recent tag reachable from HEAD, suffixed with
//! `-dev` (configurable) when the work tree has uncommitted changes, the
//! same string `git describe --dirty=-dev --tags --abbrev=0` prints.

use chrono::NaiveDate;
use fwgen_core::config::VersionConfig;
use std::path::Path;

/// Errors from collecting build metadata.
#[derive(Debug, thiserror::Error)]
pub enum VersionError {
    #[error("git error: {0}")]
    Git(#[from] git2::Error),
    #[error("no tag reachable from HEAD in {0}")]
    NoTag(String),
}

/// Version and date baked into a firmware build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInfo {
    pub version: String,
    pub build_date: String,
}

/// Describe the work tree containing `repo_root` by its most recent tag.
pub fn describe(repo_root: &Path, dirty_suffix: &str) -> Result<String, VersionError> {
    let repo = git2::Repository::discover(repo_root)?;

    let mut opts = git2::DescribeOptions::new();
    opts.describe_tags();
    // libgit2 reports "no reference found" as a generic error of the describe class.
    let description = repo.describe(&opts).map_err(|e| {
        if e.code() == git2::ErrorCode::NotFound || e.class() == git2::ErrorClass::Describe {
            VersionError::NoTag(repo_root.display().to_string())
        } else {
            VersionError::Git(e)
        }
    })?;

    let mut format = git2::DescribeFormatOptions::new();
    format.abbreviated_size(0).dirty_suffix(dirty_suffix);
    Ok(description.format(Some(&format))?)
}

/// Format the build date, `%Y%m%d` by default.
pub fn build_date(date: NaiveDate, format: &str) -> String {
    date.format(format).to_string()
}

impl BuildInfo {
    /// Collect the version from git and the date from the local clock.
    pub fn collect(repo_root: &Path, config: &VersionConfig) -> Result<Self, VersionError> {
        let version = describe(repo_root, &config.dirty_suffix)?;
        let build_date = build_date(chrono::Local::now().date_naive(), &config.date_format);
        tracing::debug!("build info: version={} date={}", version, build_date);
        Ok(Self {
            version,
            build_date,
        })
    }

    /// Compiler flags: the version as a quoted string define, the date as a bare one.
    pub fn flags(&self, config: &VersionConfig) -> Vec<String> {
        vec![
            format!("-D {}=\\\"{}\\\"", config.version_define, self.version),
            format!("-D {}={}", config.date_define, self.build_date),
        ]
    }
}
