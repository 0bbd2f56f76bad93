//! perfilar CLI - Dataset Profiling and Quality Diagnostics
//!
//! Command-line interface for profiling tabular datasets and running the
//! HTTP quality service.

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![allow(clippy::uninlined_format_args)]

use std::{path::PathBuf, process::ExitCode};

use arrow::util::pretty::print_batches;
use clap::{Parser, Subcommand};
use perfilar::{
    correlation_matrix, missing_table, summarize, top_categories, ArrowDataset, Dataset,
    ServeConfig,
};

/// perfilar - Dataset Profiling and Quality Diagnostics in Pure Rust
#[derive(Parser)]
#[command(name = "perfilar")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display dataset information
    Info {
        /// Path to dataset file
        path: PathBuf,
    },
    /// Profile every column and print the dataset summary
    Summary {
        /// Path to dataset file
        path: PathBuf,
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// Print the per-column missingness table
    Missing {
        /// Path to dataset file
        path: PathBuf,
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// Compute quality flags and the quality score
    Quality {
        /// Path to dataset file
        path: PathBuf,
    },
    /// Print the Pearson correlation matrix over numeric columns
    Corr {
        /// Path to dataset file
        path: PathBuf,
    },
    /// Print frequency tables for categorical columns
    Categories {
        /// Path to dataset file
        path: PathBuf,
        /// Maximum number of categorical columns to examine
        #[arg(long, default_value = "5")]
        max_columns: usize,
        /// Maximum rows per frequency table
        #[arg(long, default_value = "10")]
        top_k: usize,
    },
    /// Run the HTTP quality service
    Serve {
        /// Interface to bind
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
        /// Port to bind
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Info { path } => cmd_info(&path),
        Commands::Summary { path, format } => cmd_summary(&path, &format),
        Commands::Missing { path, format } => cmd_missing(&path, &format),
        Commands::Quality { path } => cmd_quality(&path),
        Commands::Corr { path } => cmd_corr(&path),
        Commands::Categories {
            path,
            max_columns,
            top_k,
        } => cmd_categories(&path, max_columns, top_k),
        Commands::Serve { host, port } => cmd_serve(host, port),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn cmd_info(path: &PathBuf) -> perfilar::Result<()> {
    let dataset = load_dataset(path)?;

    let file_size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);

    println!("File: {}", path.display());
    println!("Format: {}", get_format(path));
    println!("Rows: {}", dataset.len());
    println!("Batches: {}", dataset.num_batches());
    println!("Columns: {}", dataset.schema().fields().len());
    println!("Size: {} bytes", file_size);

    Ok(())
}

fn cmd_summary(path: &PathBuf, format: &str) -> perfilar::Result<()> {
    let dataset = load_dataset(path)?;
    let summary = summarize(&dataset)?;

    match format {
        "text" => {
            println!("Rows: {}  Columns: {}", summary.n_rows, summary.n_cols);
            if summary.n_cols == 0 {
                println!("Dataset has no columns");
                return Ok(());
            }
            let batch = summary.to_record_batch()?;
            print_batches(&[batch]).map_err(perfilar::Error::Arrow)?;
        }
        "json" => println!("{}", serde_json::to_string_pretty(&summary)?),
        other => return Err(perfilar::Error::invalid_config(format!(
            "unknown format '{other}' (expected text or json)"
        ))),
    }

    Ok(())
}

fn cmd_missing(path: &PathBuf, format: &str) -> perfilar::Result<()> {
    let dataset = load_dataset(path)?;
    let table = missing_table(&dataset);

    match format {
        "text" => {
            if table.is_empty() {
                println!("Dataset has no columns");
                return Ok(());
            }
            let batch = table.to_record_batch()?;
            print_batches(&[batch]).map_err(perfilar::Error::Arrow)?;
        }
        "json" => println!("{}", serde_json::to_string_pretty(&table)?),
        other => return Err(perfilar::Error::invalid_config(format!(
            "unknown format '{other}' (expected text or json)"
        ))),
    }

    Ok(())
}

fn cmd_quality(path: &PathBuf) -> perfilar::Result<()> {
    let dataset = load_dataset(path)?;

    let summary = summarize(&dataset)?;
    let missing = missing_table(&dataset);
    let flags = perfilar::compute_quality_flags(&summary, &missing);

    println!("{}", serde_json::to_string_pretty(&flags)?);
    Ok(())
}

fn cmd_corr(path: &PathBuf) -> perfilar::Result<()> {
    let dataset = load_dataset(path)?;
    let matrix = correlation_matrix(&dataset)?;

    if matrix.is_empty() {
        println!("Fewer than two numeric columns; nothing to correlate");
        return Ok(());
    }

    let batch = matrix.to_record_batch()?;
    print_batches(&[batch]).map_err(perfilar::Error::Arrow)?;
    Ok(())
}

fn cmd_categories(path: &PathBuf, max_columns: usize, top_k: usize) -> perfilar::Result<()> {
    let dataset = load_dataset(path)?;
    let top = top_categories(&dataset, max_columns, top_k)?;

    if top.is_empty() {
        println!("No categorical columns found");
        return Ok(());
    }

    for column in top.columns() {
        println!("{}:", column.name);
        for row in &column.categories {
            println!("  {} ({})", row.value, row.count);
        }
    }
    Ok(())
}

fn cmd_serve(host: String, port: u16) -> perfilar::Result<()> {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServeConfig {
        host,
        port,
        ..ServeConfig::default()
    };

    let runtime = tokio::runtime::Runtime::new().map_err(perfilar::Error::io_no_path)?;
    runtime.block_on(perfilar::serve(config))
}

fn load_dataset(path: &PathBuf) -> perfilar::Result<ArrowDataset> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    match ext {
        "parquet" => ArrowDataset::from_parquet(path),
        "csv" => ArrowDataset::from_csv(path),
        "json" | "jsonl" => ArrowDataset::from_json(path),
        ext => Err(perfilar::Error::unsupported_format(ext)),
    }
}

fn get_format(path: &std::path::Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("parquet") => "Parquet",
        Some("csv") => "CSV",
        Some("json" | "jsonl") => "JSON",
        _ => "Unknown",
    }
}
