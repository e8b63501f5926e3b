use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use comfy_table::Table;
use tracing_subscriber::EnvFilter;

use panorama_core::{pipeline, profile};

/// A CLI for the Panorama analytics pipeline
#[derive(Parser, Debug)]
#[command(version, about = "Unifies social analytics exports into one reporting dataset", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the ETL pipeline over a directory of CSV exports.
    Run {
        /// Directory of raw exports (default: $PANORAMA_DATA_DIR, then ./data)
        #[arg(short, long)]
        dir: Option<PathBuf>,
        /// Output file path (default: $PANORAMA_OUTPUT_PATH, then <dir>/final_insights.csv)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Inspect raw exports (headers, shape, sample rows) without running the pipeline.
    Profile {
        /// Directory of raw exports (default: $PANORAMA_DATA_DIR, then ./data)
        #[arg(short, long)]
        dir: Option<PathBuf>,
        /// Sample rows to show per file
        #[arg(long, default_value_t = 3)]
        limit: usize,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { dir, out } => {
            let dir = resolve_data_dir(dir);
            let out = out
                .or_else(|| std::env::var("PANORAMA_OUTPUT_PATH").ok().map(PathBuf::from))
                .unwrap_or_else(|| dir.join("final_insights.csv"));

            let summary = pipeline::run(&dir, &out)?;
            println!(
                "Ingested {} export file(s) from {}",
                summary.files_ingested,
                dir.display()
            );
            println!(
                "Wrote {} rows -> {}",
                summary.rows_written,
                summary.output_path.display()
            );
        }
        Commands::Profile { dir, limit } => {
            let dir = resolve_data_dir(dir);
            let profiles = profile::profile_dir(&dir, limit)?;

            for report in &profiles {
                println!("\n=== {} ===", report.file_name);
                println!("rows={}  cols={}", report.rows, report.columns.len());

                let mut table = Table::new();
                table.set_header(report.columns.clone());
                for row in &report.sample {
                    table.add_row(row.clone());
                }
                println!("{table}");
            }
        }
    }

    Ok(())
}

fn resolve_data_dir(dir: Option<PathBuf>) -> PathBuf {
    dir.or_else(|| std::env::var("PANORAMA_DATA_DIR").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("data"))
}
