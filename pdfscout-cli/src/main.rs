use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use pdfscout::{
    BuildOutcome, ConfigOverrides, CorpusBuilder, CorpusSearcher, IndexConfig, IndexError,
    SearchReport,
};
use std::{
    num::NonZeroUsize,
    path::{Path, PathBuf},
};
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

type Result<T> = std::result::Result<T, IndexError>;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract text from every PDF under a directory and write the index
    Index {
        /// Root directory to scan for PDF files
        #[arg(short = 'd', long)]
        root: Option<PathBuf>,

        /// Where to write the index
        #[arg(short = 'o', long)]
        index: Option<PathBuf>,

        /// Number of extraction workers
        #[arg(short = 'j', long)]
        threads: Option<NonZeroUsize>,

        /// Patterns to ignore (glob format)
        #[arg(short, long)]
        ignore: Vec<String>,

        /// Hide the progress bar
        #[arg(short, long)]
        quiet: bool,
    },

    /// Find the documents and pages containing a term (case-insensitive)
    Search {
        /// Text to search for
        term: String,

        /// Index to search
        #[arg(long)]
        index: Option<PathBuf>,

        /// Show only statistics, not matches
        #[arg(short, long)]
        stats: bool,
    },

    /// Write a config file populated with the default values
    Init {
        /// Destination of the config file
        #[arg(default_value = ".pdfscout.yaml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    run()
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Index {
            root,
            index,
            threads,
            ignore,
            quiet,
        } => {
            let config = load_config(cli.config.as_deref())?.merge_with_cli(ConfigOverrides {
                root_path: root,
                index_path: index,
                thread_count: threads,
                ignore_patterns: ignore,
                log_level: cli.log_level,
            });
            init_tracing(&config.log_level);
            debug!("Index configuration: {:?}", config);
            run_index(config, quiet)
        }
        Commands::Search { term, index, stats } => {
            let config = load_config(cli.config.as_deref())?.merge_with_cli(ConfigOverrides {
                index_path: index,
                log_level: cli.log_level,
                ..Default::default()
            });
            init_tracing(&config.log_level);

            let searcher = CorpusSearcher::new(&config.index_path);
            if !searcher.index_exists() {
                eprintln!(
                    "{} no index at {}; run `pdfscout index` first",
                    "warning:".yellow(),
                    config.index_path.display()
                );
            }
            let report = searcher.search(&term);
            print_search_results(&term, &report, stats);
            Ok(())
        }
        Commands::Init { path, force } => {
            init_tracing(cli.log_level.as_deref().unwrap_or("warn"));
            init_config(&path, force)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<IndexConfig> {
    IndexConfig::load_from(path).map_err(|e| IndexError::config_error(e.to_string()))
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(IndexError::config_error(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    IndexConfig::default().save_to(path)?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}

fn run_index(config: IndexConfig, quiet: bool) -> Result<()> {
    let progress = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(0)
    };
    if let Ok(style) =
        ProgressStyle::default_bar().template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} files")
    {
        progress.set_style(style.progress_chars("=>-"));
    }

    let index_path = config.index_path.clone();
    let outcome = CorpusBuilder::new(config).build(|p| {
        progress.set_length(p.total as u64);
        progress.set_position(p.completed as u64);
    })?;
    progress.finish_and_clear();

    match outcome {
        BuildOutcome::Indexed(summary) => {
            println!(
                "Indexed {} files ({} with text, {} pages) into {}",
                summary.files_found,
                summary.documents_indexed,
                summary.pages_indexed,
                index_path.display().to_string().blue()
            );
            if !summary.skipped.is_empty() {
                println!("{} files had no extractable text:", summary.skipped.len());
                for id in &summary.skipped {
                    println!("  {}", id.dimmed());
                }
            }
            Ok(())
        }
        BuildOutcome::NothingToIndex => {
            println!("No PDF files found; index left unchanged");
            Ok(())
        }
        BuildOutcome::Cancelled { completed, total } => {
            println!("Cancelled after {completed} of {total} files; index left unchanged");
            Ok(())
        }
        BuildOutcome::SaveFailed { error, .. } => {
            eprintln!("{} failed to save index", "error:".red());
            Err(error)
        }
    }
}

fn print_search_results(term: &str, report: &SearchReport, stats_only: bool) {
    if stats_only {
        println!(
            "Found {} pages in {} documents",
            report.total_pages, report.documents_with_matches
        );
        return;
    }

    if report.is_empty() {
        println!("No matches for \"{}\"", term.trim());
        return;
    }

    for m in &report.matches {
        let pages: Vec<String> = m.pages.iter().map(|p| p.to_string()).collect();
        println!("{}: pages {}", m.path.blue(), pages.join(", ").green());
    }

    println!(
        "\nFound {} pages in {} documents",
        report.total_pages, report.documents_with_matches
    );
}
