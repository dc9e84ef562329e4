//! gradekit CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "gradekit", version, about = "Staged-assessment quiz grading")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Grade an answer sheet against a quiz definition
    Grade {
        /// Quiz definition JSON (bare question array or CMS export)
        #[arg(long)]
        quiz: PathBuf,

        /// Answer sheet JSON keyed by question id
        #[arg(long)]
        answers: PathBuf,

        /// Dashboard rules JSON for outcome resolution
        #[arg(long)]
        rules: Option<PathBuf>,

        /// Write a grade report JSON into this directory
        #[arg(long)]
        output: Option<PathBuf>,

        /// Count stage flags the legacy four-band way (score == -5)
        #[arg(long)]
        legacy_flags: bool,

        /// Print the grade report as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Validate a quiz definition (and optionally its rules)
    Validate {
        /// Quiz definition JSON
        #[arg(long)]
        quiz: PathBuf,

        /// Dashboard rules JSON
        #[arg(long)]
        rules: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gradekit=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Grade {
            quiz,
            answers,
            rules,
            output,
            legacy_flags,
            json,
        } => commands::grade::execute(quiz, answers, rules, output, legacy_flags, json),
        Commands::Validate { quiz, rules } => commands::validate::execute(quiz, rules),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
