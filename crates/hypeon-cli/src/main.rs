use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use hypeon_core::{load_snapshot, NicheKey, Platform};
use hypeon_metrics::{composite_records, product_growth};

#[derive(Debug, Parser)]
#[command(name = "hypeon-cli")]
#[command(about = "Hypeon trend metrics command line interface")]
struct Cli {
    /// Directory holding the platform dataset JSON files.
    #[arg(long, env = "HYPEON_DATA_DIR", default_value = "./data")]
    data_dir: PathBuf,

    /// Emit JSON instead of the human-readable table.
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Niche-level composite metrics (growth, sentiment, engagement, hype, trend index).
    Trend {
        /// Restrict output to one niche label (synonyms are collapsed).
        #[arg(long)]
        niche: Option<String>,
    },
    /// Product-level growth ranking for one commerce platform and niche.
    ProductGrowth {
        #[arg(long, value_enum)]
        platform: CommercePlatform,

        /// Niche label driving the social enrichment blend. Required.
        #[arg(long)]
        niche: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CommercePlatform {
    Shopify,
    Amazon,
}

impl From<CommercePlatform> for Platform {
    fn from(value: CommercePlatform) -> Self {
        match value {
            CommercePlatform::Shopify => Platform::Shopify,
            CommercePlatform::Amazon => Platform::Amazon,
        }
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let snapshot = load_snapshot(&cli.data_dir)?;

    match cli.command {
        Commands::Trend { niche } => {
            let filter = niche
                .as_deref()
                .map(NicheKey::normalize)
                .filter(|key| !key.is_empty());
            let records: Vec<_> = composite_records(&snapshot)
                .into_iter()
                .filter(|r| filter.as_ref().is_none_or(|wanted| &r.niche == wanted))
                .collect();

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                println!(
                    "{:<20} {:>8} {:>10} {:>11} {:>6} {:>7}",
                    "niche", "growth", "sentiment", "engagement", "hype", "trend"
                );
                for r in &records {
                    println!(
                        "{:<20} {:>8.3} {:>10.3} {:>11.3} {:>6.3} {:>7.1}",
                        r.niche.as_str(),
                        r.growth_rate,
                        r.sentiment_score,
                        r.engagement_score,
                        r.hype_score,
                        r.trend_index
                    );
                }
            }
        }
        Commands::ProductGrowth { platform, niche } => {
            let records = product_growth(&snapshot, platform.into(), &NicheKey::normalize(&niche))?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                println!(
                    "{:<16} {:<32} {:>9} {:>11} {:>7}",
                    "product_id", "title", "commerce", "enrichment", "growth"
                );
                for r in &records {
                    println!(
                        "{:<16} {:<32} {:>9.3} {:>11.3} {:>7.3}",
                        r.product_id, r.title, r.commerce_score, r.social_enrichment, r.growth_rate
                    );
                }
            }
        }
    }

    Ok(())
}
