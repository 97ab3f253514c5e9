//! CLI binary for fwgen: enum tables, postcode tables and build flags for the firmware.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fwgen_core::config::FwgenConfig;
use fwgen_core::patch::{Markers, WriteMode};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser)]
#[command(
    name = "fwgen",
    about = "Build-time generators for the postcode display firmware"
)]
struct Cli {
    /// Project root directory (defaults to current directory)
    #[arg(short, long, global = true)]
    project: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile an annotated C enum into `{0xNN, "Name"},` table rows
    EnumTable {
        /// File holding the enum definition (reads stdin if omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output format: table, json
        #[arg(short, long, default_value = "table")]
        format: String,

        /// Strip comment leaders and redundant ordinals from annotations
        #[arg(long)]
        clean: bool,

        /// Column the annotation is aligned to (overrides config)
        #[arg(long)]
        pad_width: Option<usize>,

        /// Inject the table between the enum table markers of this file
        #[arg(long)]
        target: Option<PathBuf>,

        /// Overwrite the target instead of writing a suffixed copy
        #[arg(long, requires = "target")]
        in_place: bool,
    },

    /// Generate the postcode lookup tables from the postcode CSV
    Postcodes {
        /// Read a local CSV instead of downloading it
        #[arg(long, conflicts_with = "url")]
        csv: Option<PathBuf>,

        /// Download from this URL (overrides config)
        #[arg(long)]
        url: Option<String>,

        /// Inject the tables into the configured header instead of printing them
        #[arg(long)]
        sync: bool,

        /// Overwrite the header instead of writing a suffixed copy
        #[arg(long, requires = "sync")]
        in_place: bool,
    },

    /// Print the firmware version and build date compiler flags
    BuildFlags,
}

fn get_project_root(cli: &Cli) -> Result<PathBuf> {
    match &cli.project {
        Some(p) => Ok(p.clone()),
        None => std::env::current_dir().context("failed to get current directory"),
    }
}

fn main() -> Result<()> {
    // stdout carries generated code; logs go to stderr.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let project_root = get_project_root(&cli)?;
    let config = FwgenConfig::load(&project_root)?;

    match cli.command {
        Commands::EnumTable {
            input,
            format,
            clean,
            pad_width,
            target,
            in_place,
        } => cmd_enum_table(
            &config,
            input.as_deref(),
            &format,
            clean,
            pad_width,
            target.as_deref(),
            in_place,
        ),
        Commands::Postcodes {
            csv,
            url,
            sync,
            in_place,
        } => cmd_postcodes(&project_root, &config, csv, url, sync, in_place),
        Commands::BuildFlags => cmd_build_flags(&project_root, &config),
    }
}

fn write_mode(in_place: bool, suffix: &str) -> WriteMode {
    if in_place {
        WriteMode::InPlace
    } else {
        WriteMode::Sibling {
            suffix: suffix.to_string(),
        }
    }
}

fn read_input(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut source = String::new();
            std::io::stdin()
                .read_to_string(&mut source)
                .context("failed to read enum definition from stdin")?;
            Ok(source)
        }
    }
}

fn render_options(
    config: &FwgenConfig,
    clean: bool,
    pad_width: Option<usize>,
) -> Result<fwgen_enum::RenderOptions> {
    let pad_width = pad_width.unwrap_or(config.enum_table.pad_width);
    if pad_width == 0 {
        anyhow::bail!("--pad-width must be greater than zero");
    }
    Ok(fwgen_enum::RenderOptions {
        pad_width,
        clean_annotations: clean || config.enum_table.clean_annotations,
    })
}

fn cmd_enum_table(
    config: &FwgenConfig,
    input: Option<&Path>,
    format: &str,
    clean: bool,
    pad_width: Option<usize>,
    target: Option<&Path>,
    in_place: bool,
) -> Result<()> {
    let source = read_input(input)?;
    let options = render_options(config, clean, pad_width)?;

    let entries = fwgen_enum::compile(&source, &options)?;
    let output = match format {
        "table" => fwgen_enum::table::render_table(&entries, &options),
        "json" => serde_json::to_string_pretty(&entries)?,
        _ => anyhow::bail!("Unknown output format: {}. Use 'table' or 'json'.", format),
    };

    match target {
        Some(target) => {
            let markers = Markers {
                start: &config.enum_table.marker_start,
                end: &config.enum_table.marker_end,
            };
            let mode = write_mode(in_place, &config.enum_table.output_suffix);
            let written = fwgen_core::patch::patch_file(target, markers, &output, &mode)?;
            eprintln!("{} entries written to {}", entries.len(), written.display());
        }
        None => println!("{}", output),
    }
    Ok(())
}

fn cmd_postcodes(
    project_root: &Path,
    config: &FwgenConfig,
    csv: Option<PathBuf>,
    url: Option<String>,
    sync: bool,
    in_place: bool,
) -> Result<()> {
    use indicatif::{ProgressBar, ProgressStyle};

    let source: Box<dyn fwgen_postcodes::PostcodeSource> = match csv {
        Some(path) => Box::new(fwgen_postcodes::FileSource::new(path)),
        None => Box::new(fwgen_postcodes::HttpSource::new(
            url.unwrap_or_else(|| config.postcodes.url.clone()),
            Duration::from_secs(config.postcodes.timeout_secs),
        )),
    };

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    spinner.set_message(format!("Fetching {}...", source.describe()));
    spinner.enable_steady_tick(Duration::from_millis(100));
    let result = fwgen_postcodes::generate(source.as_ref());
    spinner.finish_and_clear();
    let tables = result?;

    if !sync {
        println!("{}", tables);
        return Ok(());
    }

    let target = project_root.join(&config.postcodes.target);
    let markers = Markers {
        start: &config.postcodes.marker_start,
        end: &config.postcodes.marker_end,
    };
    let mode = write_mode(in_place, &config.postcodes.output_suffix);
    let written = fwgen_core::patch::patch_file(&target, markers, &tables, &mode)?;
    eprintln!("Postcode tables written to {}", written.display());
    Ok(())
}

fn cmd_build_flags(project_root: &Path, config: &FwgenConfig) -> Result<()> {
    let info = fwgen_version::BuildInfo::collect(project_root, &config.version)
        .context("failed to determine firmware version")?;
    eprintln!("Firmware Revision: {}", info.version);
    eprintln!("Build date: {}", info.build_date);

    for flag in info.flags(&config.version) {
        println!("{}", flag);
    }
    Ok(())
}
