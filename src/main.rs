//! Somnum CLI
//!
//! Builds sample-resolution masks from SPINDLE sleep-state files.

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use somnum::{
    config::{parse_states, Config},
    core::{BoundaryPolicy, RunEnd},
    export::{write_mask_csv, write_report_json, ExportFormat, MaskReport},
    spindle, VERSION,
};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "somnum")]
#[command(version = VERSION)]
#[command(about = "Sample-resolution masks from windowed sleep-state annotations", long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a per-sample mask from a state file
    Mask {
        #[command(flatten)]
        args: MaskArgs,

        /// Output format (csv or json)
        #[arg(long, default_value = "csv")]
        format: ExportFormat,

        /// Write to this file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Write to a timestamped file in the configured export directory
        #[arg(long, conflicts_with = "output")]
        export: bool,
    },

    /// Show the kept sections of a state file
    Sections {
        #[command(flatten)]
        args: MaskArgs,
    },

    /// Show configuration
    Config {
        /// Write the default configuration file
        #[arg(long)]
        init: bool,

        /// Overwrite an existing file with --init
        #[arg(long, requires = "init")]
        force: bool,
    },
}

/// Options shared by the commands that read a state file. Anything left
/// unset falls back to the configuration file.
#[derive(Args)]
struct MaskArgs {
    /// SPINDLE state file
    input: PathBuf,

    /// Zero-based column holding the state
    #[arg(long, short)]
    column: Option<usize>,

    /// States to keep, comma separated (e.g. "n,r")
    #[arg(long, short)]
    states: Option<String>,

    /// Sampling rate of the target signal
    #[arg(long)]
    fs: Option<f64>,

    /// Duration of one scored window
    #[arg(long)]
    unit: Option<f64>,

    /// Field delimiter of the state file
    #[arg(long)]
    delimiter: Option<char>,

    /// Skip the first row of the state file
    #[arg(long)]
    has_headers: bool,

    /// Keep runs touching the first or last window
    #[arg(long)]
    preserve_boundaries: bool,

    /// Extend each section over the window following it
    #[arg(long)]
    trailing_window: bool,
}

impl MaskArgs {
    fn apply(&self, config: &mut Config) {
        if let Some(column) = self.column {
            config.column = column;
        }
        if let Some(ref states) = self.states {
            config.keep_states = parse_states(states);
        }
        if let Some(fs) = self.fs {
            config.sampling.fs = fs;
        }
        if let Some(unit) = self.unit {
            config.sampling.unit = unit;
        }
        if let Some(delimiter) = self.delimiter {
            config.reader.delimiter = delimiter;
        }
        if self.has_headers {
            config.reader.has_headers = true;
        }
        if self.preserve_boundaries {
            config.boundary_policy = BoundaryPolicy::Preserve;
        }
        if self.trailing_window {
            config.run_end = RunEnd::Trailing;
        }
    }
}

fn main() {
    init_logging();

    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    let result = match cli.command {
        Commands::Mask {
            args,
            format,
            output,
            export,
        } => cmd_mask(config_path, &args, format, output, export),
        Commands::Sections { args } => cmd_sections(config_path, &args),
        Commands::Config { init, force } => cmd_config(config_path, init, force),
    };

    if let Err(e) = result {
        tracing::error!("{e:#}");
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => {
            Config::load_from(path).with_context(|| format!("Failed to load config {path:?}"))
        }
        None => Config::load().context("Failed to load config"),
    }
}

fn resolve_config(path: Option<&Path>, args: &MaskArgs) -> Result<Config> {
    let mut config = load_config(path)?;
    args.apply(&mut config);
    Ok(config)
}

fn read_states(config: &Config, input: &Path) -> Result<Vec<String>> {
    let states = spindle::read(input, config.column, &config.reader)
        .with_context(|| format!("Failed to read states from {input:?}"))?;
    tracing::info!(path = ?input, windows = states.len(), "loaded sleep states");
    Ok(states)
}

fn cmd_mask(
    config_path: Option<&Path>,
    args: &MaskArgs,
    format: ExportFormat,
    output: Option<PathBuf>,
    export: bool,
) -> Result<()> {
    let config = resolve_config(config_path, args)?;
    let builder = config
        .mask_builder()
        .context("Invalid sampling configuration")?;
    let states = read_states(&config, &args.input)?;

    let output = if export {
        let stem = args
            .input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "mask".to_string());
        Some(config.export_path.join(format!(
            "{stem}_{}.{}",
            Utc::now().format("%Y%m%d_%H%M%S"),
            format.extension()
        )))
    } else {
        output
    };

    match format {
        ExportFormat::Csv => {
            let mask = builder.build(&states, &config.keep_set())?;
            let writer = open_output(output.as_deref())?;
            write_mask_csv(&mask, writer).context("Failed to write mask")?;
        }
        ExportFormat::Json => {
            let report = MaskReport::from_states(&config, &builder, &states)?
                .with_source(args.input.display().to_string());
            let writer = open_output(output.as_deref())?;
            write_report_json(&report, writer).context("Failed to write report")?;
        }
    }

    if let Some(path) = output {
        println!("Wrote {format} mask to {path:?}");
    }
    Ok(())
}

fn cmd_sections(config_path: Option<&Path>, args: &MaskArgs) -> Result<()> {
    let config = resolve_config(config_path, args)?;
    let builder = config
        .mask_builder()
        .context("Invalid sampling configuration")?;
    let states = read_states(&config, &args.input)?;
    let report = MaskReport::from_states(&config, &builder, &states)?;
    let summary = &report.summary;

    println!("Sections of {:?}", args.input);
    println!("  Keep states: {}", config.keep_states.join(", "));
    println!(
        "  Sampling: {} x {} = {} samples per window",
        config.sampling.fs, config.sampling.unit, report.samples_per_window
    );
    println!();

    if report.sections.is_empty() {
        println!("No kept sections.");
    } else {
        println!("{:>12} {:>12} {:>12}", "start", "stop", "samples");
        for section in &report.sections {
            println!(
                "{:>12} {:>12} {:>12}",
                section.start,
                section.stop,
                section.len()
            );
        }
    }
    println!();

    println!("Summary:");
    println!(
        "  Windows: {} ({} kept in {} sections, longest {})",
        summary.window_count, summary.kept_windows, summary.section_count, summary.longest_section
    );
    println!(
        "  Samples: {} ({} kept, {:.1}%)",
        summary.sample_count,
        summary.kept_samples,
        summary.kept_fraction * 100.0
    );
    println!("  Kept duration: {}", summary.kept_duration);

    Ok(())
}

fn cmd_config(config_path: Option<&Path>, init: bool, force: bool) -> Result<()> {
    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(Config::config_path);

    if init {
        if path.exists() && !force {
            bail!("{path:?} already exists, pass --force to overwrite it");
        }
        Config::default()
            .save_to(&path)
            .with_context(|| format!("Failed to write {path:?}"))?;
        println!("Wrote default configuration to {path:?}");
        return Ok(());
    }

    let config = load_config(config_path)?;

    println!("Configuration");
    println!("=============");
    println!();
    println!("Config file: {path:?}");
    println!();
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {parent:?}"))?;
            }
            let file =
                File::create(path).with_context(|| format!("Failed to create {path:?}"))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}
