mod common;

use avito_scout::checkpoint::Checkpoint;
use avito_scout::models::Listing;
use avito_scout::scrapers::{AvitoCrawler, JitterDelay, PageScraper, PaginationDiscoverer, RetryPolicy};
use common::{links, listings, rate_limited, server_error, Kind, ScriptedExtractor};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use url::Url;

const INDEX: &str = "https://www.avito.ru/moskva/kvartiry";
const ORIGIN: &str = "https://www.avito.ru";

fn index() -> Url {
    Url::parse(INDEX).unwrap()
}

fn origin() -> Url {
    Url::parse(ORIGIN).unwrap()
}

fn crawler(extractor: Arc<ScriptedExtractor>) -> AvitoCrawler {
    let pages = PageScraper::new(extractor.clone()).with_jitter(JitterDelay::none());
    AvitoCrawler::new(extractor, index(), origin()).with_page_scraper(pages)
}

fn urls(pages: &[Url]) -> Vec<&str> {
    pages.iter().map(Url::as_str).collect()
}

fn titles(listings: &[Listing]) -> Vec<&str> {
    listings.iter().map(|l| l.title.as_str()).collect()
}

#[tokio::test(start_paused = true)]
async fn zero_links_crawls_only_the_index() {
    let extractor = Arc::new(
        ScriptedExtractor::new()
            .on(Kind::Pagination, INDEX, Ok(links(&[])))
            .on(Kind::Listings, INDEX, Ok(listings(&["only"]))),
    );

    let report = crawler(extractor.clone()).crawl().await;

    assert_eq!(extractor.listing_calls(), vec![INDEX.to_string()]);
    assert_eq!(report.pages_total, 1);
    assert_eq!(titles(&report.listings), vec!["only"]);
}

#[tokio::test(start_paused = true)]
async fn failed_discovery_falls_back_to_index() {
    let extractor = Arc::new(
        ScriptedExtractor::new()
            .on(Kind::Pagination, INDEX, server_error())
            .on(Kind::Listings, INDEX, Ok(listings(&["fallback"]))),
    );

    let discoverer = PaginationDiscoverer::new(extractor.clone());
    assert_eq!(urls(&discoverer.discover(&index(), &origin()).await), vec![INDEX]);

    let report = crawler(extractor.clone()).crawl().await;
    assert_eq!(titles(&report.listings), vec!["fallback"]);
}

#[tokio::test(start_paused = true)]
async fn discovery_joins_and_dedupes_links() {
    let extractor = Arc::new(ScriptedExtractor::new().on(
        Kind::Pagination,
        INDEX,
        Ok(links(&[
            "/moskva/kvartiry?p=1",
            "/moskva/kvartiry?p=2",
            "https://www.avito.ru/moskva/kvartiry?p=2",
            "//www.avito.ru/moskva/kvartiry?p=3",
        ])),
    ));

    let pages = PaginationDiscoverer::new(extractor).discover(&index(), &origin()).await;
    assert_eq!(
        urls(&pages),
        vec![
            "https://www.avito.ru/moskva/kvartiry?p=1",
            "https://www.avito.ru/moskva/kvartiry?p=2",
            "https://www.avito.ru/moskva/kvartiry?p=3",
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn failed_page_is_skipped() {
    let a = "https://www.avito.ru/a";
    let b = "https://www.avito.ru/b";
    let c = "https://www.avito.ru/c";
    let extractor = Arc::new(
        ScriptedExtractor::new()
            .on(Kind::Pagination, INDEX, Ok(links(&["/a", "/b", "/c"])))
            .on(Kind::Listings, a, Ok(listings(&["a1", "a2"])))
            .on(Kind::Listings, b, server_error())
            .on(Kind::Listings, c, Ok(listings(&["c1"]))),
    );

    let report = crawler(extractor.clone()).crawl().await;

    assert_eq!(titles(&report.listings), vec!["a1", "a2", "c1"]);
    assert_eq!(report.pages_total, 3);
    assert_eq!(report.pages_succeeded, 2);
    assert_eq!(report.failed_pages.len(), 1);
    assert_eq!(report.failed_pages[0].url, b);
    // non-rate-limit failures are not retried
    assert_eq!(extractor.listing_calls(), vec![a.to_string(), b.to_string(), c.to_string()]);
}

#[tokio::test(start_paused = true)]
async fn every_page_failing_yields_empty_aggregate() {
    let extractor = Arc::new(
        ScriptedExtractor::new()
            .on(Kind::Pagination, INDEX, Ok(links(&["/a", "/b"])))
            .on(Kind::Listings, "https://www.avito.ru/a", server_error())
            .on(Kind::Listings, "https://www.avito.ru/b", rate_limited()),
    );

    let report = crawler(extractor.clone()).crawl().await;

    assert!(report.listings.is_empty());
    assert_eq!(report.failed_pages.len(), 2);
    // 1 call for a, 3 attempts for b
    assert_eq!(extractor.listing_calls().len(), 4);
    assert_eq!(report.to_json().unwrap(), "[]");
}

#[tokio::test(start_paused = true)]
async fn rate_limited_page_is_retried_with_backoff() {
    let extractor = Arc::new(
        ScriptedExtractor::new()
            .on(Kind::Listings, INDEX, rate_limited())
            .on(Kind::Listings, INDEX, rate_limited())
            .on(Kind::Listings, INDEX, Ok(listings(&["third time"]))),
    );

    let scraper = PageScraper::new(extractor.clone())
        .with_jitter(JitterDelay::none())
        .with_retry(RetryPolicy::new(3, Duration::from_millis(2000)));

    let start = Instant::now();
    let page = scraper.scrape_page(INDEX, 0, 1).await.unwrap();

    assert_eq!(titles(&page), vec!["third time"]);
    assert_eq!(extractor.listing_calls().len(), 3);
    assert!(start.elapsed() >= Duration::from_millis(6000));
}

#[tokio::test(start_paused = true)]
async fn jitter_runs_before_each_request() {
    let extractor = Arc::new(ScriptedExtractor::new().on(Kind::Listings, INDEX, Ok(listings(&["x"]))));
    let scraper = PageScraper::new(extractor);

    let start = Instant::now();
    scraper.scrape_page(INDEX, 0, 1).await.unwrap();
    let elapsed = start.elapsed();

    assert!(elapsed >= Duration::from_millis(1000));
    assert!(elapsed < Duration::from_millis(3000));
}

#[tokio::test(start_paused = true)]
async fn noisy_fields_are_coerced() {
    let payload = json!({
        "listings": [
            { "title": "2-к. квартира", "price": "12 500 ₽", "location": "Москва", "area": "45,5 м²", "rooms": "2" },
            { "title": "без цены", "location": "Москва", "area": "30 м²" },
        ]
    });
    let extractor = Arc::new(ScriptedExtractor::new().on(Kind::Listings, INDEX, Ok(payload)));

    let page = PageScraper::new(extractor)
        .with_jitter(JitterDelay::none())
        .scrape_page(INDEX, 0, 1)
        .await
        .unwrap();

    assert_eq!(page.len(), 1);
    assert_eq!(page[0].price, 12500.0);
    assert_eq!(page[0].area, Some(45.5));
    assert_eq!(page[0].rooms, Some(2));
}

#[tokio::test]
async fn checkpoint_holds_pages_before_a_failure() {
    let dir = tempfile::tempdir().unwrap();
    let checkpoint = Checkpoint::new(dir.path().join("avito_listings.json"));

    let extractor = Arc::new(
        ScriptedExtractor::new()
            .on(Kind::Pagination, INDEX, Ok(links(&["/a", "/b", "/c"])))
            .on(Kind::Listings, "https://www.avito.ru/a", Ok(listings(&["a1"])))
            .on(Kind::Listings, "https://www.avito.ru/b", Ok(listings(&["b1"])))
            .on(Kind::Listings, "https://www.avito.ru/c", server_error()),
    );

    let report = crawler(extractor).with_checkpoint(checkpoint.clone()).crawl().await;

    let saved = checkpoint.load().await.unwrap().unwrap();
    assert_eq!(titles(&saved), vec!["a1", "b1"]);
    assert_eq!(saved, report.listings);
}
