use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use content_remap_core::{
    remap_stories, remap_story, Diagnostics, IdentifierMaps, RemapOptions, SchemaRegistry,
};
use serde::Serialize;
use serde_json::Value;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(name = "content-remap")]
#[command(about = "Remap story and asset references when migrating content between spaces")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Remap a story (or an array of stories) to destination identifiers
    Remap {
        /// Input story JSON file (object or array of objects)
        input: PathBuf,

        /// Component schemas file
        #[arg(long)]
        schemas: PathBuf,

        /// Identifier maps file (`{"stories": [[old, new]], "assets": [[id, {"new": {...}}]]}`)
        #[arg(long)]
        maps: PathBuf,

        /// Output remapped JSON file (defaults to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output diagnostics report file
        #[arg(long)]
        report: Option<PathBuf>,

        /// Max nesting depth of content
        #[arg(long, default_value_t = RemapOptions::default().max_depth)]
        max_depth: usize,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,

        /// Exit with an error when any component type has no schema
        #[arg(long)]
        fail_on_missing_schema: bool,
    },

    /// Report schema coverage of stories without remapping any identifiers
    Inspect {
        /// Input story JSON file (object or array of objects)
        input: PathBuf,

        /// Component schemas file
        #[arg(long)]
        schemas: PathBuf,

        /// Output report file (defaults to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum OutputFormat {
    Pretty,
    Compact,
}

/// Diagnostics report written by `--report` and `inspect`.
#[derive(Serialize)]
struct Report {
    generated_at: DateTime<Utc>,
    stories: usize,
    #[serde(flatten)]
    diagnostics: Diagnostics,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; logs go to stderr so stdout stays clean for JSON
    let log_level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Remap {
            input,
            schemas,
            maps,
            output,
            report,
            max_depth,
            format,
            fail_on_missing_schema,
        } => {
            let stories: Value = read_json(&input, "input stories")?;
            let schemas: SchemaRegistry = read_json(&schemas, "schemas")?;
            let maps: IdentifierMaps = read_json(&maps, "identifier maps")?;
            let options = RemapOptions { max_depth };

            tracing::debug!(
                components = schemas.len(),
                stories = maps.story_count(),
                assets = maps.asset_count(),
                "loaded inputs"
            );

            let (remapped, count, diagnostics) = run(&stories, &schemas, &maps, &options)?;

            for name in &diagnostics.missing_schemas {
                eprintln!(
                    "Warning: component type '{name}' has no schema; its content was left unchanged"
                );
            }

            write_json(&remapped, output.as_ref(), format)?;

            let missing = diagnostics.missing_schemas.len();
            if let Some(path) = report {
                write_json(&new_report(count, diagnostics), Some(&path), format)?;
            }

            if fail_on_missing_schema && missing > 0 {
                bail!("{missing} component type(s) missing from schemas");
            }
        }
        Commands::Inspect {
            input,
            schemas,
            output,
            format,
        } => {
            let stories: Value = read_json(&input, "input stories")?;
            let schemas: SchemaRegistry = read_json(&schemas, "schemas")?;

            let (_, count, diagnostics) = run(
                &stories,
                &schemas,
                &IdentifierMaps::new(),
                &RemapOptions::default(),
            )?;

            write_json(&new_report(count, diagnostics), output.as_ref(), format)?;
        }
    }

    Ok(())
}

/// Remap a single story or an array of stories, preserving the input shape.
fn run(
    stories: &Value,
    schemas: &SchemaRegistry,
    maps: &IdentifierMaps,
    options: &RemapOptions,
) -> Result<(Value, usize, Diagnostics)> {
    match stories {
        Value::Array(items) => {
            let batch = remap_stories(items, schemas, maps, options)
                .map_err(|e| anyhow::Error::from(e).context("Remap failed"))?;
            let remapped = batch.results.into_iter().map(|r| r.story).collect();
            Ok((Value::Array(remapped), items.len(), batch.diagnostics))
        }
        story => {
            let result = remap_story(story, schemas, maps, options)
                .map_err(|e| anyhow::Error::from(e).context("Remap failed"))?;
            Ok((result.story, 1, result.diagnostics))
        }
    }
}

fn new_report(stories: usize, diagnostics: Diagnostics) -> Report {
    Report {
        generated_at: Utc::now(),
        stories,
        diagnostics,
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open {what} file: {}", path.display()))?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader)
        .with_context(|| format!("Failed to parse {what} from: {}", path.display()))
}

fn write_json<T: serde::Serialize>(
    val: &T,
    path: Option<&PathBuf>,
    format: OutputFormat,
) -> Result<()> {
    let mut writer: Box<dyn Write> = if let Some(p) = path {
        let file = File::create(p)
            .with_context(|| format!("Failed to create output file: {}", p.display()))?;
        Box::new(BufWriter::new(file))
    } else {
        Box::new(BufWriter::new(io::stdout()))
    };

    match format {
        OutputFormat::Pretty => {
            serde_json::to_writer_pretty(&mut writer, val).context("Failed to write JSON")?;
        }
        OutputFormat::Compact => {
            serde_json::to_writer(&mut writer, val).context("Failed to write JSON")?;
        }
    }

    // Ensure trailing newline
    writeln!(writer).context("Failed to write trailing newline")?;
    writer.flush().context("Failed to flush output")?;

    Ok(())
}
