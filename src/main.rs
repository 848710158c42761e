use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use lendseer::config::{ConfigStore, UserConfig};
use lendseer::engine::{score_all, BudgetAllocator, OpportunityScorer};
use lendseer::marketplace::{JsonFileSource, OpportunitySource};
use lendseer::report::{AnalysisReport, ReportWriter};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the preferences file
    #[arg(long, default_value = "lendseer.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Score scraped listings and propose a budget allocation
    Analyze {
        /// JSON file with the scraped listings
        input: PathBuf,

        /// How many ranked listings to print
        #[arg(long, default_value_t = 10)]
        top: usize,

        /// Skip writing the analysis report to disk
        #[arg(long)]
        no_report: bool,
    },
    /// Write a preferences file with the default values
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    let cli = Cli::parse();
    let store = ConfigStore::new(&cli.config);

    match &cli.command {
        Some(Commands::Analyze {
            input,
            top,
            no_report,
        }) => {
            run_analysis(&store, input, *top, *no_report).await?;
        }
        Some(Commands::Init) => {
            store.save(&UserConfig::default())?;
            println!("Wrote default preferences to {}", store.path().display());
        }
        None => {
            info!("No command specified. Use --help for available commands.");
        }
    }

    Ok(())
}

async fn run_analysis(
    store: &ConfigStore,
    input: &PathBuf,
    top: usize,
    no_report: bool,
) -> Result<()> {
    let config = store.load().context("loading preferences failed")?;
    info!(
        "Preferences: budget {}{:.2}, min return {:.1}%, max risk {}",
        config.currency.symbol(),
        config.budget,
        config.min_return,
        config.max_risk,
    );

    let source = JsonFileSource::new(input);
    let records = source.fetch().await.context("loading listings failed")?;
    info!("Scoring {} listings", records.len());

    let scorer = OpportunityScorer::default();
    let scored = score_all(&scorer, &records, &config);

    println!("Ranked opportunities:");
    for (rank, s) in scored.iter().take(top).enumerate() {
        let title = if s.opportunity.title.is_empty() {
            &s.opportunity.id
        } else {
            &s.opportunity.title
        };
        println!(
            "  {:>2}. [{:>3}] {} - {}",
            rank + 1,
            s.score,
            title,
            s.recommendation.text,
        );
        for reason in &s.recommendation.reasons {
            println!("      - {}", reason);
        }
    }

    let allocator = BudgetAllocator::default();
    let distributions = allocator.allocate(&scored, &config);
    let summary = allocator.summary(&distributions, &config);

    println!();
    println!("Suggested allocation:");
    for d in &distributions {
        let title = if d.opportunity.title.is_empty() {
            &d.opportunity.id
        } else {
            &d.opportunity.title
        };
        println!(
            "  {}{:.2} ({:.1}% of budget) -> {}",
            d.currency.symbol(),
            d.investment_display,
            d.percentage,
            title,
        );
    }
    println!();
    for line in &summary {
        println!("{}", line);
    }

    if !no_report {
        let writer = ReportWriter::new(None)?;
        let report = AnalysisReport::new(config, scored.len(), distributions, summary);
        writer.write(&report)?;
    }

    Ok(())
}
