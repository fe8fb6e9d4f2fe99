use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use chrono::{Local, NaiveDate, Weekday};
use clap::Parser;
use dailyreel_core::{
    Category, CategoryOutcome, DescriptionResolver, Pipeline, RunConfig, RunReport,
};
use dailyreel_sources::{BaikeClient, ImageDownloader, TmdbClient, WikipediaClient, tmdb};
use dailyreel_store::FileStore;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "dailyreel",
    version,
    about = "Append one new trending film and series to the catalog"
)]
struct Cli {
    /// TMDB v4 read token or v3 API key.
    #[arg(long, env = "TMDB_API_KEY", hide_env_values = true)]
    api_token: Option<String>,

    /// Directory holding catalog.json, latest.json and images/.
    #[arg(long, env = "DAILYREEL_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    /// Preferred metadata language.
    #[arg(long, env = "DAILYREEL_LANGUAGE", default_value = "zh-CN")]
    language: String,

    /// Language of the last-resort description.
    #[arg(long, default_value = "en-US")]
    fallback_language: String,

    #[arg(long, default_value = "zh")]
    wiki_language: String,

    /// Script variant requested from Wikipedia; empty to disable.
    #[arg(long, default_value = "zh-cn")]
    wiki_variant: String,

    /// Weekday on which the catalog is discarded (e.g. mon, sunday).
    #[arg(long, env = "DAILYREEL_RESET_DAY", default_value = "mon")]
    reset_day: Weekday,

    /// Run as if on this day (YYYY-MM-DD). Defaults to today, local time.
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Category to process; repeat for several. Defaults to all.
    #[arg(long = "category")]
    categories: Vec<Category>,

    /// Fetch and resolve only: no reset, no downloads, no writes.
    #[arg(long)]
    dry_run: bool,

    #[arg(long, default_value = tmdb::DEFAULT_BASE_URL)]
    api_base_url: String,
}

impl Cli {
    fn run_config(&self) -> RunConfig {
        RunConfig {
            date: self.date.unwrap_or_else(|| Local::now().date_naive()),
            reset_day: self.reset_day,
            categories: if self.categories.is_empty() {
                Category::ALL.to_vec()
            } else {
                dedup(&self.categories)
            },
            dry_run: self.dry_run,
        }
    }
}

fn dedup(categories: &[Category]) -> Vec<Category> {
    let mut out = Vec::with_capacity(categories.len());
    for &c in categories {
        if !out.contains(&c) {
            out.push(c);
        }
    }
    out
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    info!("dailyreel v{}", env!("CARGO_PKG_VERSION"));

    let Some(token) = cli.api_token.as_deref().map(str::trim).filter(|t| !t.is_empty()) else {
        bail!("no TMDB credential: set TMDB_API_KEY or pass --api-token");
    };

    let store = FileStore::open(&cli.data_dir)
        .with_context(|| format!("opening data directory {}", cli.data_dir.display()))?;

    let metadata = Arc::new(TmdbClient::new(
        cli.api_base_url.clone(),
        token,
        cli.language.clone(),
    ));
    let variant = Some(cli.wiki_variant.clone());
    let wikipedia = Arc::new(WikipediaClient::new(&cli.wiki_language, variant));
    let baike = Arc::new(BaikeClient::default());
    let resolver = DescriptionResolver::standard(
        wikipedia,
        baike,
        metadata.clone(),
        cli.fallback_language.clone(),
    );
    let artwork = Arc::new(ImageDownloader::new(store.images_dir()));

    let pipeline = Pipeline::new(metadata, resolver, artwork, store);
    let config = cli.run_config();
    info!(
        date = %config.date,
        reset_day = %config.reset_day,
        dry_run = config.dry_run,
        data_dir = %cli.data_dir.display(),
        "starting run"
    );

    let report = pipeline.run(&config).await.context("daily run failed")?;
    log_report(&report);
    Ok(())
}

fn log_report(report: &RunReport) {
    if report.reset {
        info!("weekly reset performed");
    }
    for (category, outcome) in &report.outcomes {
        match outcome {
            CategoryOutcome::Added { id, title } => info!(%category, id, %title, "added"),
            CategoryOutcome::NothingNew => info!(%category, "no new trending title"),
            CategoryOutcome::Invalid { id } => warn!(%category, id, "skipped invalid candidate"),
            CategoryOutcome::TrendingUnavailable(reason) => {
                warn!(%category, %reason, "trending unavailable")
            }
        }
    }
    info!(
        added = report.added.len(),
        total = report.catalog_len,
        "run complete"
    );
}
