//! `utpr` — command-line front end for the UTPR allocation engine.

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::PathBuf;
use tracing::info;
use utpr_allocation::{AllocationConfig, Allocator};
use utpr_cli::export::{CsvExporter, JsonExporter, render_table};
use utpr_cli::loader::load_factor_table;

/// UTPR residual top-up tax allocator
#[derive(Parser)]
#[command(name = "utpr")]
#[command(about = "Allocates residual top-up tax across entities by payroll and asset factors")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Run one allocation pass over a CSV factor table
    Allocate {
        /// Path to the CSV file with Employees and Tangible_Assets columns
        #[arg(short, long)]
        input: PathBuf,

        /// Total residual top-up tax amount to allocate
        #[arg(short, long)]
        tax: f64,

        /// Weight assigned to the payroll factor
        #[arg(long, default_value_t = 0.5)]
        payroll_weight: f64,

        /// Weight assigned to the tangible-asset factor
        #[arg(long, default_value_t = 0.5)]
        asset_weight: f64,

        /// Output file; prints to stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Explain the allocation mechanism
    Explain,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Csv,
    Json,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "utpr=debug,info" } else { "utpr=info,warn" };
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    match cli.command {
        Command::Allocate { input, tax, payroll_weight, asset_weight, output, format } => {
            allocate_command(&input, tax, payroll_weight, asset_weight, output.as_deref(), format)
        }
        Command::Explain => {
            explain_command();
            Ok(())
        }
    }
}

fn allocate_command(
    input: &std::path::Path,
    tax: f64,
    payroll_weight: f64,
    asset_weight: f64,
    output: Option<&std::path::Path>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let table = load_factor_table(input)?;
    let config = AllocationConfig::new(tax).with_weights(payroll_weight, asset_weight);

    let result = Allocator::new().allocate(&table, &config)?;

    let rendered = match format {
        OutputFormat::Table => render_table(&result),
        OutputFormat::Csv => CsvExporter::new().export(&result)?,
        OutputFormat::Json => JsonExporter::new().export(&result)?,
    };

    match output {
        Some(path) => {
            fs::write(path, rendered)?;
            info!(path = %path.display(), "Wrote allocation result");
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

fn explain_command() {
    println!("UTPR Residual Top-Up Tax Allocator");
    println!(
        "Distributes a residual top-up tax amount across constituent entities in"
    );
    println!("proportion to weighted shares of two factors:");
    println!();
    println!("  weight = payroll_weight * (Employees / total Employees)");
    println!("         + asset_weight   * (Tangible_Assets / total Tangible_Assets)");
    println!();
    println!("Allocations are rounded to 2 decimals; the rounding remainder is folded");
    println!("into the last record so the allocated column sums exactly to the input");
    println!("amount. Weights must sum to 1 (default 0.5 / 0.5).");
}
