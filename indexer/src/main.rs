use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

use indexer::{build_index, postings_report, stats_report};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build an in-memory inverted index and inspect it", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print collection statistics
    Stats {
        /// Input path (file or directory)
        #[arg(long)]
        input: String,
        /// Skip token position tracking
        #[arg(long, default_value_t = false)]
        no_positions: bool,
    },
    /// Print the postings of a query word
    Postings {
        /// Input path (file or directory)
        #[arg(long)]
        input: String,
        /// Word to look up; normalized with the indexing tokenizer
        #[arg(long)]
        term: String,
        /// Skip token position tracking
        #[arg(long, default_value_t = false)]
        no_positions: bool,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    let report = match cli.command {
        Commands::Stats { input, no_positions } => {
            let index = build_index(&input, !no_positions)?;
            stats_report(&index)
        }
        Commands::Postings { input, term, no_positions } => {
            let index = build_index(&input, !no_positions)?;
            postings_report(&index, &term)
        }
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
