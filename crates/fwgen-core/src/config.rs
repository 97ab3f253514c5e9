//! Configuration for the fwgen generators.
//!
//! Load order: `.fwgen/config.toml` → environment variables → defaults.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level fwgen configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FwgenConfig {
    pub enum_table: EnumTableConfig,
    pub postcodes: PostcodesConfig,
    pub version: VersionConfig,
}

/// Enum table compiler settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnumTableConfig {
    /// Width the `0xNN, "Name"` part of a row is padded to before the annotation.
    pub pad_width: usize,
    /// Strip comment leaders and redundant ordinals from annotations.
    pub clean_annotations: bool,
    /// Marker line opening the generated region in a target file.
    pub marker_start: String,
    /// Marker line closing the generated region in a target file.
    pub marker_end: String,
    /// Suffix appended to the target's file name when not patching in place.
    pub output_suffix: String,
}

/// Postcode table generator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PostcodesConfig {
    /// Where the postcode CSV is downloaded from.
    pub url: String,
    /// Global HTTP timeout for the download.
    pub timeout_secs: u64,
    /// Header that receives the generated tables, relative to the project root.
    pub target: PathBuf,
    pub marker_start: String,
    pub marker_end: String,
    /// Suffix appended to the target's file name when not patching in place.
    pub output_suffix: String,
}

/// Build flag settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VersionConfig {
    /// Appended to the tag name when the work tree has uncommitted changes.
    pub dirty_suffix: String,
    /// chrono format string for the build date.
    pub date_format: String,
    pub version_define: String,
    pub date_define: String,
}

impl Default for EnumTableConfig {
    fn default() -> Self {
        Self {
            pad_width: 50,
            clean_annotations: false,
            marker_start: "// START_ENUM_TABLE_INJECTION".to_string(),
            marker_end: "// END_ENUM_TABLE_INJECTION".to_string(),
            output_suffix: "_new".to_string(),
        }
    }
}

impl Default for PostcodesConfig {
    fn default() -> Self {
        Self {
            url: "https://raw.githubusercontent.com/xboxoneresearch/errorcodes/refs/heads/main/postcodes.csv"
                .to_string(),
            timeout_secs: 30,
            target: PathBuf::from("src/codes.h"),
            marker_start: "// START_POSTCODE_SYNC_INJECTION".to_string(),
            marker_end: "// END_POSTCODE_SYNC_INJECTION".to_string(),
            output_suffix: "_new".to_string(),
        }
    }
}

impl Default for VersionConfig {
    fn default() -> Self {
        Self {
            dirty_suffix: "-dev".to_string(),
            date_format: "%Y%m%d".to_string(),
            version_define: "__FW_VERSION__".to_string(),
            date_define: "__BUILD_DATE__".to_string(),
        }
    }
}

/// Helper to parse an env var and apply it to a config field.
fn env_override<T: std::str::FromStr>(var: &str, target: &mut T) {
    if let Ok(v) = std::env::var(var)
        && let Ok(n) = v.parse()
    {
        *target = n;
    }
}

impl FwgenConfig {
    /// Load config from `.fwgen/config.toml` in the project root, with env var overrides.
    /// Falls back to defaults if no config file exists.
    pub fn load(project_root: &Path) -> Result<Self> {
        let config_path = project_root.join(".fwgen").join("config.toml");

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Self::default()
        };

        env_override("FWGEN_PAD_WIDTH", &mut config.enum_table.pad_width);
        env_override("FWGEN_POSTCODES_URL", &mut config.postcodes.url);
        env_override(
            "FWGEN_HTTP_TIMEOUT_SECS",
            &mut config.postcodes.timeout_secs,
        );
        env_override("FWGEN_DIRTY_SUFFIX", &mut config.version.dirty_suffix);

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.enum_table.pad_width == 0 {
            anyhow::bail!("enum_table.pad_width must be greater than zero");
        }
        if self.postcodes.timeout_secs == 0 {
            anyhow::bail!("postcodes.timeout_secs must be greater than zero");
        }
        check_markers(
            "enum_table",
            &self.enum_table.marker_start,
            &self.enum_table.marker_end,
        )?;
        check_markers(
            "postcodes",
            &self.postcodes.marker_start,
            &self.postcodes.marker_end,
        )?;
        if self.enum_table.output_suffix.is_empty() || self.postcodes.output_suffix.is_empty() {
            anyhow::bail!("output_suffix must not be empty");
        }
        Ok(())
    }
}

fn check_markers(section: &str, start: &str, end: &str) -> Result<()> {
    if start.trim().is_empty() || end.trim().is_empty() {
        anyhow::bail!("{}: markers must not be empty", section);
    }
    if start == end {
        anyhow::bail!(
            "{}: marker_start and marker_end must differ (both are {:?})",
            section,
            start
        );
    }
    Ok(())
}
