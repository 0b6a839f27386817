//! mathquest CLI: adaptive arithmetic and number-theory practice.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "mathquest",
    version,
    about = "Adaptive arithmetic and number-theory drills"
)]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive practice session
    Practice {
        /// Topics to practise (comma-separated, or "all")
        #[arg(long, default_value = "all")]
        topics: String,

        /// Number of questions (default from config)
        #[arg(long)]
        questions: Option<usize>,

        /// Seed for reproducible sessions
        #[arg(long)]
        seed: Option<u64>,

        /// Write the transcript and summary to this file
        #[arg(long)]
        transcript: Option<PathBuf>,

        /// Write the full session report as JSON to this file
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Show current score, threshold and level per topic
    Levels {
        /// Topics to show (comma-separated, default: all)
        #[arg(long)]
        topics: Option<String>,

        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Show past sessions
    History {
        /// Only the most recent N sessions
        #[arg(long)]
        limit: Option<usize>,

        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Print sample problems without running a session
    Generate {
        /// Topic to generate
        #[arg(long)]
        topic: String,

        /// Difficulty: easy, medium, hard
        #[arg(long, default_value = "medium")]
        level: String,

        /// How many problems
        #[arg(long, default_value = "5")]
        count: usize,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// Print answers and explanations
        #[arg(long)]
        answers: bool,
    },

    /// Create a starter mathquest.toml
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("mathquest_core=warn,mathquest=info")
            }),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    let result = match cli.command {
        Commands::Practice {
            topics,
            questions,
            seed,
            transcript,
            report,
        } => commands::practice::execute(topics, questions, seed, transcript, report, config),
        Commands::Levels { topics, format } => commands::levels::execute(topics, format, config),
        Commands::History { limit, format } => commands::history::execute(limit, format, config),
        Commands::Generate {
            topic,
            level,
            count,
            seed,
            answers,
        } => commands::generate::execute(topic, level, count, seed, answers, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
