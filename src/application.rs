//! Application layer: pipeline orchestration and result delivery

pub mod export;
pub mod scraper_service;

pub use scraper_service::ScraperService;
