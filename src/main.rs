//! CLI entry point: scrape one Amazon.in listing URL into a CSV file
//!
//! Usage: listing-harvester <URL> [OUTPUT.csv]

use anyhow::Result;
use listing_harvester::application::export;
use listing_harvester::{FetchError, ScraperService};
use tracing_subscriber::EnvFilter;

const DEFAULT_OUTPUT: &str = "amazon_products.csv";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let url = match args.next() {
        Some(url) => url,
        None => {
            eprintln!("Usage: listing-harvester <URL> [OUTPUT.csv]");
            std::process::exit(2);
        }
    };
    let output = args.next().unwrap_or_else(|| DEFAULT_OUTPUT.to_string());

    let service = ScraperService::new()?;

    match service.scrape(&url).await {
        Ok(records) if records.is_empty() => {
            println!("No products found. The page might be blocked or contain no products.");
        }
        Ok(records) => {
            export::write_csv_file(&records, &output)?;
            println!("Successfully scraped {} products -> {}", records.len(), output);
        }
        Err(e @ FetchError::InvalidDomain { .. }) => {
            eprintln!("Please enter a valid Amazon.in URL ({e})");
            std::process::exit(2);
        }
        Err(e @ FetchError::BlockedDetected { .. }) => {
            eprintln!("The site served an anti-automation challenge: {e}");
            eprintln!("Try again later or check that the URL is accessible.");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error scraping the page: {e}");
            std::process::exit(1);
        }
    }

    Ok(())
}
