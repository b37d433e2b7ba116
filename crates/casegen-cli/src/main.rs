//! casegen - test case generation pipeline CLI
//!
//! ## Commands
//!
//! - `run`: Execute the full pipeline over the latest raw text artifact
//! - `ingest`: Store a plain text file as a new raw text artifact
//! - `layout`: Create the artifact directory layout and print it
//! - `audit`: Print one day's audit trail

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use casegen_core::config::{DEFAULT_EXPORT_NAME, ENV_BASE_DIR, ENV_EXPORT_NAME, ENV_RUN_DATE};
use casegen_core::{
    parse_run_date, ArtifactStore, AuditLogger, Collaborators, Pipeline, PipelineConfig,
    PipelineError,
};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "casegen")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Generate validated test cases from extracted requirement text", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct BaseDir {
    /// Base directory holding the artifact layout
    #[arg(long, env = ENV_BASE_DIR, default_value = ".")]
    base_dir: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the pipeline over the latest raw text artifact
    Run {
        #[command(flatten)]
        base: BaseDir,

        /// Pin the date used for dated artifact names (YYYY-MM-DD)
        #[arg(long, env = ENV_RUN_DATE, value_parser = parse_date)]
        date: Option<NaiveDate>,

        /// Purpose stem of the JSON/XLSX export file names
        #[arg(long, env = ENV_EXPORT_NAME, default_value = DEFAULT_EXPORT_NAME)]
        export_name: String,
    },

    /// Store a plain text file as a new raw text artifact
    Ingest {
        /// Text file to ingest
        file: PathBuf,

        #[command(flatten)]
        base: BaseDir,
    },

    /// Create the artifact directories and print them
    Layout {
        #[command(flatten)]
        base: BaseDir,
    },

    /// Print the audit trail for a day
    Audit {
        #[command(flatten)]
        base: BaseDir,

        /// Day to show (YYYY-MM-DD, default: today)
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
}

fn parse_date(raw: &str) -> std::result::Result<NaiveDate, String> {
    parse_run_date(raw).map_err(|e| e.to_string())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    casegen_core::init_tracing(cli.json, level);

    let result = match cli.command {
        Commands::Run {
            base,
            date,
            export_name,
        } => cmd_run(&base.base_dir, date, &export_name),
        Commands::Ingest { file, base } => cmd_ingest(&base.base_dir, &file),
        Commands::Layout { base } => cmd_layout(&base.base_dir),
        Commands::Audit { base, date } => cmd_audit(&base.base_dir, date),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}

/// Pipeline errors carry their own exit code; anything else exits with 1.
fn exit_code(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<PipelineError>()
        .map(PipelineError::exit_code)
        .unwrap_or(1)
}

fn store_for(base_dir: &Path) -> ArtifactStore {
    let config = PipelineConfig::new(base_dir);
    ArtifactStore::new(config.layout(), config.raw_text_prefix)
}

fn cmd_run(base_dir: &Path, date: Option<NaiveDate>, export_name: &str) -> Result<()> {
    let mut config = PipelineConfig::new(base_dir).with_export_name(export_name);
    config.run_date = date;

    let mut pipeline = Pipeline::new(config, Collaborators::builtin())?;
    let report = pipeline.run()?;

    info!(
        run_id = %report.run_id,
        input = %report.raw_source,
        input_digest = %report.input_digest,
        duration_ms = report.duration_ms,
        "run complete"
    );
    println!("Input:        {}", report.raw_source);
    println!("Requirements: {}", report.requirements);
    println!("Coverage:     {}", report.coverage_items);
    println!("Generated:    {}", report.generated);
    println!("Rejected:     {}", report.rejected);
    println!("Final:        {}", report.final_count);
    println!("JSON:         {}", report.json_path.display());
    println!("Excel:        {}", report.spreadsheet_path.display());
    println!("Test Case Generation Pipeline completed successfully");
    Ok(())
}

fn cmd_ingest(base_dir: &Path, file: &Path) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let store = store_for(base_dir);
    let path = store.ingest_raw_text(&content, chrono::Local::now().naive_local())?;
    println!("Stored raw text: {}", path.display());
    Ok(())
}

fn cmd_layout(base_dir: &Path) -> Result<()> {
    let store = store_for(base_dir);
    store.ensure_layout()?;
    let layout = store.layout();
    for (label, dir) in [
        ("inputs", &layout.inputs),
        ("raw text", &layout.raw_text),
        ("requirements", &layout.requirements),
        ("json output", &layout.json_output),
        ("excel output", &layout.excel_output),
        ("audit", &layout.audit),
        ("rejects", &layout.rejects),
    ] {
        println!("{label:<13} {}", dir.display());
    }
    Ok(())
}

fn cmd_audit(base_dir: &Path, date: Option<NaiveDate>) -> Result<()> {
    let config = PipelineConfig::new(base_dir);
    let date = date.unwrap_or_else(|| config.effective_date());
    let audit = AuditLogger::new(config.layout().audit, config.audit_name.clone());

    let entries = audit.entries(date)?;
    if entries.is_empty() {
        println!("No audit entries for {date}");
        return Ok(());
    }
    for line in entries {
        println!("{line}");
    }
    Ok(())
}
