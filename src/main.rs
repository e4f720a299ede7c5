use avito_scout::config::{Cli, Config};
use avito_scout::{load_or_crawl, Acquired};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("🏠 Avito Scout - Firecrawl listing scraper");
    info!("==========================================");

    let config = Config::from_cli(Cli::parse())?;

    let acquired = load_or_crawl(&config).await?;

    if let Acquired::Crawled(report) = &acquired {
        info!(
            "✅ Scraped {}/{} pages in {}s",
            report.pages_succeeded,
            report.pages_total,
            (report.finished_at - report.started_at).num_seconds()
        );
        for failed in &report.failed_pages {
            warn!(url = %failed.url, error = %failed.error, "Page skipped");
        }
    }
    info!("💾 {} listings in {}", acquired.listings().len(), config.output.display());

    for (i, listing) in acquired.listings().iter().enumerate() {
        let rooms = listing.rooms.map(|r| format!(", {} комн.", r)).unwrap_or_default();
        let area = listing.area.map(|a| format!(", {} м²", a)).unwrap_or_default();
        println!("{}. {} ({} ₽) {}{}{}", i + 1, listing.title, listing.price, listing.location, rooms, area);
    }

    Ok(())
}
