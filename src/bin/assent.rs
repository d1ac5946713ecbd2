#![forbid(unsafe_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use clap::{Parser, Subcommand};
use serde::Serialize;
use uuid::Uuid;

use assent_engine::snapshot::{run_assessment, validate_snapshot, AssessmentReport, DiagramSnapshot};

#[derive(Parser)]
#[command(name = "assent", version, about = "Argument-diagram assessment CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one aggregation over a diagram snapshot
    Assess {
        /// Snapshot JSON (nodes, edges, questions, responses)
        #[arg(long)]
        input: PathBuf,
        /// Report destination; stdout when omitted
        #[arg(long)]
        out: Option<PathBuf>,
        /// Pretty-print the report JSON
        #[arg(long)]
        pretty: bool,
    },
    /// Check a snapshot for degraded inputs without assessing it
    Validate {
        #[arg(long)]
        input: PathBuf,
    },
}

/// Report wrapper stamped by the CLI; the engine itself stays pure.
#[derive(Debug, Serialize)]
struct RunEnvelope {
    run_id: Uuid,
    generated_at: String,
    report: AssessmentReport,
}

fn load_snapshot(path: &Path) -> Result<DiagramSnapshot, Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Assess { input, out, pretty } => {
            let snapshot = load_snapshot(&input)?;
            let report = run_assessment(&snapshot)?;
            let envelope = RunEnvelope {
                run_id: Uuid::new_v4(),
                generated_at: Utc::now().to_rfc3339(),
                report,
            };
            let encoded = if pretty {
                serde_json::to_string_pretty(&envelope)?
            } else {
                serde_json::to_string(&envelope)?
            };
            match out {
                Some(path) => {
                    let mut file = File::create(&path)?;
                    writeln!(file, "{encoded}")?;
                    eprintln!("[assess] report written to {}", path.display());
                }
                None => println!("{encoded}"),
            }
        }
        Commands::Validate { input } => {
            let snapshot = load_snapshot(&input)?;
            let warnings = validate_snapshot(&snapshot);
            if warnings.is_empty() {
                println!("snapshot is clean");
            } else {
                for warning in &warnings {
                    println!("{}: {}", warning.subject_id, warning.message);
                }
                return Err(format!("{} warning(s)", warnings.len()).into());
            }
        }
    }

    Ok(())
}
