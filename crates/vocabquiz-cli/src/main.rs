//! vocabquiz CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "vocabquiz", version, about = "Adaptive vocabulary quiz generator")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create starter config and a sample vocabulary set
    Init,

    /// List available vocabulary sets
    Sets,

    /// Print the words in one or more vocabulary sets
    Words {
        /// Vocabulary sets (comma-separated, e.g. "fruit.csv,animals.csv")
        #[arg(long)]
        set: String,
    },

    /// Generate an exam weighted toward recent mistakes
    Exam {
        /// Vocabulary sets to draw from (comma-separated)
        #[arg(long)]
        sets: String,

        /// Number of questions (default from config: 10)
        #[arg(long)]
        num_questions: Option<usize>,

        /// Percentage of questions reserved for new words, 0-100 (default from config: 20)
        #[arg(long)]
        new_ratio: Option<f64>,

        /// Extra selection weight per recent mistake (default from config: 5.0)
        #[arg(long)]
        mistake_weight: Option<f64>,

        /// RNG seed for a reproducible exam
        #[arg(long)]
        seed: Option<u64>,

        /// Save the exam sheet as JSON
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Record exam results
    Submit {
        /// JSON file with an array of {"word", "is_correct"} objects
        #[arg(long)]
        results: PathBuf,
    },

    /// Show per-word statistics
    Stats {
        /// Only these words (comma-separated)
        #[arg(long)]
        words: Option<String>,

        /// Sort column: word, correct_count, mistake_count, ratio,
        /// recent_correct, recent_mistake, recent_ratio
        #[arg(long, default_value = "correct_count")]
        sort: String,

        /// Sort ascending instead of descending
        #[arg(long)]
        ascending: bool,

        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Delete all recorded attempts and statistics
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("vocabquiz=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    let result = match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Sets => commands::sets::execute(config),
        Commands::Words { set } => commands::words::execute(set, config),
        Commands::Exam {
            sets,
            num_questions,
            new_ratio,
            mistake_weight,
            seed,
            output,
            format,
        } => {
            commands::exam::execute(
                commands::exam::ExamArgs {
                    sets,
                    num_questions,
                    new_ratio,
                    mistake_weight,
                    seed,
                    output,
                    format,
                },
                config,
            )
            .await
        }
        Commands::Submit { results } => commands::submit::execute(results, config).await,
        Commands::Stats {
            words,
            sort,
            ascending,
            format,
        } => commands::stats::execute(words, sort, ascending, format, config).await,
        Commands::Reset { yes } => commands::reset::execute(yes, config).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
