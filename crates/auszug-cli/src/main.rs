mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "auszug",
    version,
    about = "Extract transactions from German bank statement PDFs"
)]
struct Cli {
    /// Log engine decisions to stderr (repeat for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the transactions of a statement PDF
    Parse {
        /// Path to the statement PDF
        input_file: PathBuf,

        /// Statement format: auto (default), sparkasse, ing, deutsche_bank
        #[arg(short, long, default_value = "auto")]
        format: String,

        /// Output format: table (default), json or csv
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Write output to a file instead of stdout
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,

        /// Engine config (JSON)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
    /// Run every format engine and report how many transactions each finds
    Detect {
        /// Path to the statement PDF
        input_file: PathBuf,

        /// Engine config (JSON)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
    /// List supported statement formats
    Formats,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "auszug_core=debug,info",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Parse {
            input_file,
            format,
            output,
            out,
            config,
        } => commands::parse::run(input_file, &format, &output, out, config),
        Commands::Detect { input_file, config } => commands::detect::run(input_file, config),
        Commands::Formats => commands::formats::run(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
