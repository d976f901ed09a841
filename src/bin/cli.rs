use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pegcity_stats::cleaning::{CleaningPass, FINAL_PASS, FIRST_PASS};
use pegcity_stats::data::{list_csv_files, load_stat_table, save_batch_report, save_stat_table};
use pegcity_stats::inspect::inspect_table;
use pegcity_stats::metrics::{enrich, top_by};
use pegcity_stats::summary::summarize;
use pegcity_stats::{run_batch, HttpSession, ScraperConfig, SourceStatus};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, version, about = "Peg City basketball stats scraper", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape league pages into normalized stats CSV files
    Scrape {
        /// Source page; repeat to scrape several (defaults to the league pages)
        #[arg(short, long = "url")]
        urls: Vec<String>,
        /// Directory the CSV files are written to
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
        /// Seconds to wait for each page's table
        #[arg(short, long)]
        timeout: Option<u64>,
        /// Also write a JSON report of the batch to this path
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// First cleaning pass: drop placeholder columns, impute, clip percentages
    Clean {
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },
    /// Final cleaning pass over the processed data directory
    Finalize {
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
    /// Compare each file's headers against the canonical list
    Inspect {
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },
    /// Missing values, descriptive statistics and outlier counts
    Summary {
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },
    /// Compute TS%, AST_RATIO and EFF for one file and rank players
    Metrics {
        #[arg(short, long)]
        file: PathBuf,
        /// Column to rank players by
        #[arg(long, default_value = "EFF")]
        by: String,
        #[arg(long, default_value_t = 10)]
        top: usize,
        /// Write the enriched table to this path
        #[arg(long)]
        save: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = ScraperConfig::from_env();

    match cli.command {
        Commands::Scrape {
            urls,
            out_dir,
            timeout,
            report,
        } => {
            if !urls.is_empty() {
                config.sources = urls;
            }
            if let Some(dir) = out_dir {
                config.output_dir = dir;
            }
            if let Some(secs) = timeout {
                config.scraping.page_timeout_secs = secs;
            }
            scrape(&config, report.as_deref()).await
        }
        Commands::Clean { dir } => clean(&FIRST_PASS, &dir),
        Commands::Finalize { dir } => {
            clean(
                &FINAL_PASS,
                dir.as_deref().unwrap_or(config.processed_dir.as_path()),
            )
        }
        Commands::Inspect { dir } => inspect(&dir),
        Commands::Summary { dir } => summary(&dir),
        Commands::Metrics {
            file,
            by,
            top,
            save,
        } => metrics(&file, &by, top, save.as_deref()),
    }
}

async fn scrape(config: &ScraperConfig, report_path: Option<&Path>) -> Result<()> {
    println!("Scraping {} source page(s)...\n", config.sources.len());

    let session = HttpSession::open(&config.scraping).context("Failed to open fetch session")?;
    let report = run_batch(session, &config.sources, &config.output_dir).await?;

    for outcome in &report.outcomes {
        match &outcome.status {
            SourceStatus::Saved { path, rows } => {
                println!("Saved: {} ({} rows)", path.display(), rows)
            }
            SourceStatus::Skipped { error } => {
                println!("Skipping {} - Error: {}", outcome.url, error)
            }
        }
    }
    println!(
        "\n{} saved, {} skipped",
        report.saved().count(),
        report.skipped().count()
    );

    if let Some(path) = report_path {
        save_batch_report(&report, path)?;
        println!("Saved batch report to {}", path.display());
    }

    Ok(())
}

fn clean(pass: &CleaningPass, dir: &Path) -> Result<()> {
    let written = pass.clean_dir(dir)?;
    for path in &written {
        println!("Cleaned file saved: {}", path.display());
    }
    println!("\nCleaning complete: {} file(s) written", written.len());
    Ok(())
}

fn inspect(dir: &Path) -> Result<()> {
    for path in list_csv_files(dir)? {
        println!("\nInspecting: {}", path.display());
        let table = match load_stat_table(&path) {
            Ok(table) => table,
            Err(e) => {
                eprintln!("Error reading {}: {:#}", path.display(), e);
                continue;
            }
        };

        let report = inspect_table(&table);
        if report.is_canonical() {
            println!("Headers match the canonical list");
        }
        if !report.missing.is_empty() {
            println!("Missing headers: {:?}", report.missing);
        }
        if !report.extra.is_empty() {
            println!("Extra headers found: {:?}", report.extra);
        }
    }
    println!("\nInspection complete!");
    Ok(())
}

fn summary(dir: &Path) -> Result<()> {
    for path in list_csv_files(dir)? {
        println!("\nAnalyzing: {}", path.display());
        let table = match load_stat_table(&path) {
            Ok(table) => table,
            Err(e) => {
                eprintln!("Error processing {}: {:#}", path.display(), e);
                continue;
            }
        };

        let summary = summarize(&table);
        println!("{} rows x {} columns", summary.rows, summary.columns);

        println!("\nMissing Values:");
        for (column, count) in summary.missing.iter().filter(|(_, c)| *c > 0) {
            println!("  {:<10} {}", column, count);
        }

        println!("\nSummary Statistics:");
        for stats in &summary.numeric {
            println!("  {}", stats.format());
        }
    }
    println!("\nSummary complete!");
    Ok(())
}

fn metrics(file: &Path, by: &str, top: usize, save: Option<&Path>) -> Result<()> {
    let mut table = load_stat_table(file)?;
    enrich(&mut table);

    println!("Top {} players by {}:\n", top, by);
    for (i, ranked) in top_by(&table, by, top)?.iter().enumerate() {
        println!("{}. {} - {:.2}", i + 1, ranked.player, ranked.value);
    }

    if let Some(path) = save {
        save_stat_table(&table, path)?;
        println!("\nSaved enriched table to {}", path.display());
    }

    Ok(())
}
