//! Palabreo CLI - render, read and configure the reading view from a terminal

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Parse and validate jobs argument (must be at least 1)
fn parse_jobs(s: &str) -> Result<usize, String> {
    let n: usize = s.parse().map_err(|_| format!("'{}' is not a valid number", s))?;
    if n < 1 {
        Err("jobs must be at least 1".to_string())
    } else {
        Ok(n)
    }
}

#[derive(Parser)]
#[command(name = "palabreo")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory holding saved reading preferences
    #[arg(long, global = true, env = "PALABREO_DATA_DIR", default_value = ".palabreo")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a markdown file to HTML
    Render {
        /// Input markdown file
        input: String,

        /// Output file path (stdout when omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Wrap the fragment in a page styled with the saved preferences
        #[arg(long)]
        page: bool,
    },

    /// Read one chapter of a markdown manuscript
    Read {
        /// Input markdown file; each top-level heading starts a chapter
        input: String,

        /// Zero-based chapter index, clamped to the available chapters
        #[arg(short, long, default_value = "0", allow_negative_numbers = true)]
        chapter: i64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Batch render a directory of markdown files
    Batch {
        /// Input directory
        input_dir: String,

        /// Output directory
        #[arg(short, long)]
        output_dir: String,

        /// Number of parallel jobs (must be at least 1)
        #[arg(short, long, default_value = "4", value_parser = parse_jobs)]
        jobs: usize,
    },

    /// Show or change reading preferences
    Prefs {
        #[command(subcommand)]
        action: PrefsAction,
    },
}

#[derive(Subcommand)]
enum PrefsAction {
    /// Print the saved preferences
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Output the CSS declarations for the reading container
        #[arg(long, conflicts_with = "json")]
        css: bool,
    },

    /// Change one preference, e.g. `theme dark` or `font-size 20`
    Set {
        /// Preference name (camelCase, snake_case or kebab-case)
        field: String,

        /// New value
        value: String,
    },

    /// Restore the default preferences
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; stdout is reserved for command output
    let filter = if cli.verbose {
        "palabreo_cli=debug,palabreo_core=debug"
    } else {
        "palabreo_cli=info"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Render {
            input,
            output,
            page,
        } => {
            let preferences = if page {
                Some(commands::load_preferences(&cli.data_dir).await)
            } else {
                None
            };
            commands::render(&input, output.as_deref(), preferences.as_ref())
        }

        Commands::Read {
            input,
            chapter,
            json,
        } => commands::read(&input, chapter, json),

        Commands::Batch {
            input_dir,
            output_dir,
            jobs,
        } => commands::batch(&input_dir, &output_dir, jobs),

        Commands::Prefs { action } => match action {
            PrefsAction::Show { json, css } => {
                commands::prefs_show(&cli.data_dir, json, css).await
            }
            PrefsAction::Set { field, value } => {
                commands::prefs_set(&cli.data_dir, &field, &value).await
            }
            PrefsAction::Reset => commands::prefs_reset(&cli.data_dir).await,
        },
    }
}
