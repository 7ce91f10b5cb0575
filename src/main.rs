//! pump-diagnose - run the pump CBM diagnosis on one measurement snapshot
//!
//! # Usage
//!
//! ```bash
//! # Diagnose a snapshot file, full JSON report on stdout
//! pump-diagnose --snapshot inspection.json
//!
//! # Read the snapshot from stdin and emit the audit table as CSV
//! cat inspection.json | pump-diagnose --snapshot - --format csv
//!
//! # Dump the built-in threshold tables as a starting pump_config.toml
//! pump-diagnose --print-default-config > pump_config.toml
//! ```
//!
//! # Environment Variables
//!
//! - `PUMP_CBM_CONFIG`: Path to the threshold config (default: ./pump_config.toml)
//! - `RUST_LOG`: Logging level (default: info)

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;

use pump_cbm::{render_csv, DiagnosisEngine, DiagnosisReport, MeasurementSnapshot, PumpConfig};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Full diagnosis report as pretty JSON
    Json,
    /// Flattened audit table
    Csv,
    /// Executive summary, one line per field
    Summary,
}

#[derive(Parser, Debug)]
#[command(name = "pump-diagnose")]
#[command(about = "Condition-based maintenance diagnosis for centrifugal pumps")]
#[command(version)]
struct CliArgs {
    /// Measurement snapshot (JSON). Use "-" to read from stdin.
    #[arg(short, long, value_name = "FILE", required_unless_present = "print_default_config")]
    snapshot: Option<String>,

    /// Threshold config file. Overrides the PUMP_CBM_CONFIG search order.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Print the built-in config as TOML and exit
    #[arg(long)]
    print_default_config: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, env = "PUMP_CBM_LOG_JSON")]
    log_json: bool,
}

// ============================================================================
// Helpers
// ============================================================================

fn init_logging(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn read_snapshot(source: &str) -> Result<MeasurementSnapshot> {
    let raw = if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read snapshot from stdin")?;
        buf
    } else {
        std::fs::read_to_string(Path::new(source))
            .with_context(|| format!("Failed to read snapshot {source}"))?
    };
    serde_json::from_str(&raw).with_context(|| format!("Invalid snapshot JSON in {source}"))
}

fn load_config(path: Option<&Path>) -> Result<PumpConfig> {
    match path {
        Some(p) => PumpConfig::load_from_file(p)
            .with_context(|| format!("Failed to load config {}", p.display())),
        None => Ok(PumpConfig::load()),
    }
}

fn render(report: &DiagnosisReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(report).context("Failed to serialize diagnosis report")
        }
        OutputFormat::Csv => render_csv(report).context("Failed to render audit table"),
        OutputFormat::Summary => {
            let s = &report.summary;
            let mut out = format!(
                "{}\nPrimary domain: {}\nRisk: {} (score {})\nActions: {}\n",
                s.headline, s.primary_domain, s.risk_level, s.risk_score, s.action_count
            );
            for action in &s.key_actions {
                out.push_str(&format!("  - {action}\n"));
            }
            out.push_str(&format!("References: {}\n", s.compliance_references.join(", ")));
            Ok(out)
        }
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_logging(args.log_json);

    if args.print_default_config {
        let toml = PumpConfig::default()
            .to_toml()
            .context("Failed to serialize default config")?;
        print!("{toml}");
        return Ok(());
    }

    let config = load_config(args.config.as_deref())?;
    let source = args.snapshot.as_deref().unwrap_or("-");
    let snapshot = read_snapshot(source)?;
    info!(pump_tag = %snapshot.metadata.pump_tag, source = %source, "Snapshot loaded");

    let report = DiagnosisEngine::new(config).diagnose(&snapshot);
    print!("{}", render(&report, args.format)?);
    if args.format == OutputFormat::Json {
        println!();
    }
    Ok(())
}
