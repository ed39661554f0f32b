//! The `quizrun` command-line quiz runner.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use quizrun_core::QuizMode;

mod commands;
mod config;
mod render;

#[derive(Parser)]
#[command(name = "quizrun", version, about = "Multiple-choice quiz runner")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a quiz session
    Play {
        /// Directory holding manifest.json and the bank files
        #[arg(long)]
        bank_dir: Option<PathBuf>,

        /// Bank id from the manifest
        #[arg(long, conflicts_with = "file")]
        bank: Option<String>,

        /// Play a CSV file directly
        #[arg(long)]
        file: Option<PathBuf>,

        /// Session mode: instant or exam
        #[arg(long)]
        mode: Option<QuizMode>,

        /// Number of questions
        #[arg(long)]
        limit: Option<usize>,

        /// Keep bank order
        #[arg(long)]
        no_shuffle: bool,

        /// Show question text exactly as stored
        #[arg(long)]
        no_clean: bool,

        /// Seed for a reproducible question order
        #[arg(long)]
        seed: Option<u64>,

        /// Output directory for reports
        #[arg(long)]
        output: Option<PathBuf>,

        /// Report formats: json, html, markdown, all, none
        #[arg(long)]
        format: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List banks in a bank directory
    Banks {
        /// Directory holding manifest.json
        #[arg(long)]
        bank_dir: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate a bank CSV file or every bank in a directory
    Validate {
        /// CSV file or bank directory
        path: PathBuf,
    },

    /// Re-render a saved JSON report
    Report {
        /// Report JSON file
        path: PathBuf,

        /// Output format: text, markdown, html, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Create a starter config and sample bank
    Init,
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Play {
            bank_dir,
            bank,
            file,
            mode,
            limit,
            no_shuffle,
            no_clean,
            seed,
            output,
            format,
            config,
        } => commands::play::execute(commands::play::PlayArgs {
            bank_dir,
            bank,
            file,
            mode,
            limit,
            no_shuffle,
            no_clean,
            seed,
            output,
            format,
            config,
        }),
        Commands::Banks { bank_dir, config } => commands::banks::execute(bank_dir, config),
        Commands::Validate { path } => commands::validate::execute(path),
        Commands::Report {
            path,
            format,
            output,
        } => commands::report::execute(path, format, output),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
