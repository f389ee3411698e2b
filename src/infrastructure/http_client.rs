//! HTTP client for listing fetches with retry, backoff, and block detection
//!
//! Owns one browser-like session (persistent cookies, consistent headers),
//! rotates the User-Agent per attempt, and classifies responses into a typed
//! outcome so the caller can distinguish "blocked" from "gave up".

use std::time::Duration;

use anyhow::{anyhow, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ORIGIN, REFERER, USER_AGENT};
use reqwest::{Client, ClientBuilder, StatusCode};
use std::sync::Mutex;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, info, warn};
use url::Url;

use crate::infrastructure::config::ScraperConfig;

/// Substrings that signal an anti-automation challenge inside a 200 body
const BLOCKING_INDICATORS: [&str; 6] = [
    "robot check",
    "captcha",
    "blocked",
    "access denied",
    "sorry, we just need to make sure you're not a robot",
    "enter the characters you see below",
];

/// One browser identity: User-Agent plus the client hints that must agree
/// with it. Firefox and Safari do not send sec-ch-ua, so those entries carry
/// no hint headers at all.
struct BrowserProfile {
    user_agent: &'static str,
    sec_ch_ua: Option<&'static str>,
    sec_ch_ua_platform: Option<&'static str>,
}

static BROWSER_PROFILES: [BrowserProfile; 6] = [
    BrowserProfile {
        user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
        sec_ch_ua: Some("\"Not_A Brand\";v=\"8\", \"Chromium\";v=\"120\", \"Google Chrome\";v=\"120\""),
        sec_ch_ua_platform: Some("\"Windows\""),
    },
    BrowserProfile {
        user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
        sec_ch_ua: Some("\"Not_A Brand\";v=\"8\", \"Chromium\";v=\"120\", \"Google Chrome\";v=\"120\""),
        sec_ch_ua_platform: Some("\"macOS\""),
    },
    BrowserProfile {
        user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36",
        sec_ch_ua: Some("\"Not_A Brand\";v=\"99\", \"Chromium\";v=\"119\", \"Google Chrome\";v=\"119\""),
        sec_ch_ua_platform: Some("\"Windows\""),
    },
    BrowserProfile {
        user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Safari/605.1.15",
        sec_ch_ua: None,
        sec_ch_ua_platform: None,
    },
    BrowserProfile {
        user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:120.0) Gecko/20100101 Firefox/120.0",
        sec_ch_ua: None,
        sec_ch_ua_platform: None,
    },
    BrowserProfile {
        user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
        sec_ch_ua: Some("\"Not_A Brand\";v=\"8\", \"Chromium\";v=\"120\", \"Google Chrome\";v=\"120\""),
        sec_ch_ua_platform: Some("\"Linux\""),
    },
];

/// Successful fetch: the page body plus how many attempts it took
#[derive(Debug, Clone)]
pub struct FetchSuccess {
    pub body: String,
    pub status: u16,
    pub attempts: u32,
}

/// Typed fetch failure taxonomy
///
/// `InvalidDomain` is raised before any network activity. `BlockedDetected`
/// means the server served an anti-automation challenge on every remaining
/// attempt; `ExhaustedRetries` covers everything else (transport errors,
/// persistent non-200 statuses) with the last observed cause preserved.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("URL host does not belong to '{expected}': {url}")]
    InvalidDomain { url: String, expected: String },

    #[error("blocking challenge detected after {attempts} attempts")]
    BlockedDetected { attempts: u32 },

    #[error("all {attempts} attempts failed, last error: {last_error}")]
    ExhaustedRetries { attempts: u32, last_error: String },
}

/// HTTP session for one scraping task
///
/// Owns the cookie jar exclusively; concurrent scrape tasks must each use
/// their own instance so header rotation and cookies never race.
pub struct FetchClient {
    client: Client,
    config: ScraperConfig,
    referer: HeaderValue,
    origin: HeaderValue,
    rng: Mutex<fastrand::Rng>,
}

impl FetchClient {
    /// Create a client with the default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ScraperConfig::default())
    }

    /// Create a client with a custom configuration
    pub fn with_config(config: ScraperConfig) -> Result<Self> {
        Self::with_config_and_seed(config, None)
    }

    /// Create a client with a seeded RNG for deterministic rotation and jitter
    pub fn with_config_and_seed(config: ScraperConfig, seed: Option<u64>) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .default_headers(Self::session_headers())
            .redirect(if config.follow_redirects {
                reqwest::redirect::Policy::limited(10)
            } else {
                reqwest::redirect::Policy::none()
            })
            .build()
            .map_err(|e| anyhow!("Failed to create HTTP client: {}", e))?;

        let referer = HeaderValue::from_str(&config.base_url)
            .map_err(|e| anyhow!("Invalid base_url for Referer header: {}", e))?;
        let origin = HeaderValue::from_str(config.base_url.trim_end_matches('/'))
            .map_err(|e| anyhow!("Invalid base_url for Origin header: {}", e))?;

        let rng = match seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };

        Ok(Self {
            client,
            config,
            referer,
            origin,
            rng: Mutex::new(rng),
        })
    }

    /// Stable browser-like headers applied to every request in the session
    fn session_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7",
            ),
        );
        headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            HeaderValue::from_static("en-US,en;q=0.9"),
        );
        headers.insert(
            reqwest::header::CACHE_CONTROL,
            HeaderValue::from_static("max-age=0"),
        );
        headers.insert(
            HeaderName::from_static("upgrade-insecure-requests"),
            HeaderValue::from_static("1"),
        );
        headers.insert(
            HeaderName::from_static("sec-fetch-dest"),
            HeaderValue::from_static("document"),
        );
        headers.insert(
            HeaderName::from_static("sec-fetch-mode"),
            HeaderValue::from_static("navigate"),
        );
        headers.insert(
            HeaderName::from_static("sec-fetch-site"),
            HeaderValue::from_static("none"),
        );
        headers.insert(
            HeaderName::from_static("sec-fetch-user"),
            HeaderValue::from_static("?1"),
        );
        headers.insert(
            HeaderName::from_static("sec-ch-ua-mobile"),
            HeaderValue::from_static("?0"),
        );
        headers.insert(HeaderName::from_static("dnt"), HeaderValue::from_static("1"));
        headers
    }

    /// Get the configuration
    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// Check that the URL's host carries the allowed-domain marker
    ///
    /// Runs before any network activity; an unparseable URL fails the same
    /// check.
    pub fn validate_domain(&self, url: &str) -> Result<(), FetchError> {
        let host_ok = Url::parse(url)
            .ok()
            .and_then(|parsed| parsed.host_str().map(|h| h.to_lowercase()))
            .map(|host| host.contains(&self.config.allowed_domain.to_lowercase()))
            .unwrap_or(false);

        if host_ok {
            Ok(())
        } else {
            Err(FetchError::InvalidDomain {
                url: url.to_string(),
                expected: self.config.allowed_domain.clone(),
            })
        }
    }

    /// Fetch the listing page with bounded retries and escalating backoff
    pub async fn fetch(&self, url: &str) -> Result<FetchSuccess, FetchError> {
        self.validate_domain(url)?;

        if self.config.warm_up {
            self.warm_up().await;
        }

        let retries = self.config.max_retries.max(1);
        let mut last_error = String::from("no attempts made");

        for attempt in 1..=retries {
            let headers = self.rotate_identity_headers();
            self.jitter(self.config.delays.pre_request_ms).await;

            debug!("GET {} (attempt {}/{})", url, attempt, retries);
            match self.client.get(url).headers(headers).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status == StatusCode::OK {
                        match response.text().await {
                            Ok(body) => {
                                if let Some(indicator) = detect_blocking(&body) {
                                    warn!(
                                        "Detected blocking content ('{}') on attempt {}",
                                        indicator, attempt
                                    );
                                    if attempt == retries {
                                        return Err(FetchError::BlockedDetected {
                                            attempts: attempt,
                                        });
                                    }
                                    last_error = format!("blocking content: {indicator}");
                                    self.jitter(self.config.delays.block_backoff_ms).await;
                                    continue;
                                }
                                debug!(
                                    "Fetched {} ({} bytes) on attempt {}",
                                    url,
                                    body.len(),
                                    attempt
                                );
                                return Ok(FetchSuccess {
                                    body,
                                    status: status.as_u16(),
                                    attempts: attempt,
                                });
                            }
                            Err(e) => {
                                warn!("Failed to read response body on attempt {}: {}", attempt, e);
                                last_error = format!("body read failed: {e}");
                                self.jitter(self.config.delays.transport_backoff_ms).await;
                            }
                        }
                    } else if status == StatusCode::SERVICE_UNAVAILABLE {
                        warn!("Service unavailable (503) for {}, attempt {}", url, attempt);
                        last_error = "HTTP 503 Service Unavailable".to_string();
                        self.jitter(self.config.delays.unavailable_backoff_ms).await;
                    } else if status == StatusCode::TOO_MANY_REQUESTS {
                        warn!("Rate limited (429) for {}, attempt {}", url, attempt);
                        last_error = "HTTP 429 Too Many Requests".to_string();
                        self.jitter(self.config.delays.rate_limit_backoff_ms).await;
                    } else {
                        warn!("Unexpected status code {} for {}", status, url);
                        last_error = format!("unexpected status {status}");
                    }
                }
                Err(e) => {
                    warn!("Request failed for {} on attempt {}: {}", url, attempt, e);
                    last_error = format!("transport error: {e}");
                    self.jitter(self.config.delays.transport_backoff_ms).await;
                }
            }
        }

        Err(FetchError::ExhaustedRetries {
            attempts: retries,
            last_error,
        })
    }

    /// Visit the site root once to establish session cookies
    ///
    /// Failure here is logged and swallowed: the main request may still
    /// succeed with a fresh jar.
    pub async fn warm_up(&self) {
        info!("Establishing session with {}", self.config.base_url);
        let headers = self.rotate_identity_headers();
        match self.client.get(&self.config.base_url).headers(headers).send().await {
            Ok(response) => {
                debug!("Warm-up request returned {}", response.status());
            }
            Err(e) => {
                warn!("Could not establish initial session: {}", e);
            }
        }
        self.jitter(self.config.delays.warm_up_ms).await;
    }

    /// Pick a pseudo-random browser profile and build the per-attempt headers
    fn rotate_identity_headers(&self) -> HeaderMap {
        let profile = {
            let mut rng = self.lock_rng();
            &BROWSER_PROFILES[rng.usize(..BROWSER_PROFILES.len())]
        };

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(profile.user_agent));
        if let Some(sec_ch_ua) = profile.sec_ch_ua {
            headers.insert(
                HeaderName::from_static("sec-ch-ua"),
                HeaderValue::from_static(sec_ch_ua),
            );
        }
        if let Some(platform) = profile.sec_ch_ua_platform {
            headers.insert(
                HeaderName::from_static("sec-ch-ua-platform"),
                HeaderValue::from_static(platform),
            );
        }
        headers.insert(REFERER, self.referer.clone());
        headers.insert(ORIGIN, self.origin.clone());
        headers
    }

    /// Sleep for a uniformly random duration within the given range
    async fn jitter(&self, range_ms: (u64, u64)) {
        let (lo, hi) = range_ms;
        if hi == 0 {
            return;
        }
        let delay = if lo >= hi {
            lo
        } else {
            self.lock_rng().u64(lo..=hi)
        };
        sleep(Duration::from_millis(delay)).await;
    }

    fn lock_rng(&self) -> std::sync::MutexGuard<'_, fastrand::Rng> {
        self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Return the first blocking indicator found in the body, if any
fn detect_blocking(body: &str) -> Option<&'static str> {
    let lowered = body.to_lowercase();
    BLOCKING_INDICATORS
        .iter()
        .find(|indicator| lowered.contains(**indicator))
        .copied()
}
