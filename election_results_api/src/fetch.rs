//! Downloading pages from the results site, politely.
//!
//! All requests from a run go through one [Fetcher], which owns a single reqwest client (so
//! connections are reused), a [RateLimiter] shared by every worker thread, and the retry policy.

use std::time::Duration;
use log::{debug, info, warn};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use crate::config::Config;
use crate::error::ScrapeError;
use crate::rate_limit::RateLimiter;

/// Something that can produce the html for a url. Implemented by [Fetcher]; tests use canned pages.
pub trait PageSource : Sync {
    fn fetch(&self,url:&str) -> Result<String,ScrapeError>;
}

/// Settings for a [Fetcher], usually taken from the [Config].
#[derive(Debug,Clone)]
pub struct FetchSettings {
    pub user_agent : String,
    pub timeout : Duration,
    pub min_spacing : Duration,
    pub max_retries : u32,
    pub backoff : Duration,
}

impl From<&Config> for FetchSettings {
    fn from(config: &Config) -> Self {
        FetchSettings {
            user_agent: config.user_agent.clone(),
            timeout: config.request_timeout,
            min_spacing: config.min_request_spacing,
            max_retries: config.max_retries,
            backoff: config.retry_backoff,
        }
    }
}

pub struct Fetcher {
    client : Client,
    limiter : RateLimiter,
    max_retries : u32,
    backoff : Duration,
}

/// What went wrong with one attempt, and whether trying again could help.
enum AttemptError {
    Transient(ScrapeError),
    Permanent(ScrapeError),
}

impl Fetcher {
    pub fn new(settings:&FetchSettings) -> Result<Self,ScrapeError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("text/html,application/xhtml+xml"));
        let client = Client::builder()
            .user_agent(settings.user_agent.as_str())
            .default_headers(headers)
            .timeout(settings.timeout)
            .connect_timeout(settings.timeout)
            .build()
            .map_err(|e|ScrapeError::Fetch{ url: String::new(), cause: format!("Could not build http client : {}",e) })?;
        Ok(Fetcher{ client, limiter: RateLimiter::new(settings.min_spacing), max_retries: settings.max_retries, backoff: settings.backoff })
    }

    fn attempt(&self,url:&str) -> Result<String,AttemptError> {
        self.limiter.wait();
        debug!("GET {}",url);
        let classify = |e:reqwest::Error| {
            if e.is_timeout() { AttemptError::Transient(ScrapeError::FetchTimeout{ url: url.to_string() }) }
            else if e.is_builder() { AttemptError::Permanent(ScrapeError::Fetch{ url: url.to_string(), cause: e.to_string() }) } // e.g. malformed url
            else { AttemptError::Transient(ScrapeError::Fetch{ url: url.to_string(), cause: e.to_string() }) }
        };
        let response = self.client.get(url).send().map_err(classify)?;
        let status = response.status();
        if status.is_client_error() {
            return Err(AttemptError::Permanent(ScrapeError::Fetch{ url: url.to_string(), cause: format!("HTTP status {}",status) }));
        }
        if !status.is_success() {
            return Err(AttemptError::Transient(ScrapeError::Fetch{ url: url.to_string(), cause: format!("HTTP status {}",status) }));
        }
        response.text().map_err(classify)
    }
}

impl PageSource for Fetcher {
    /// Fetch a page, retrying transient failures with exponential backoff.
    /// A 4xx response is not retried.
    fn fetch(&self,url:&str) -> Result<String,ScrapeError> {
        info!("Downloading {}",url);
        let mut delay = self.backoff;
        let mut attempt = 0;
        loop {
            match self.attempt(url) {
                Ok(body) => return Ok(body),
                Err(AttemptError::Permanent(e)) => {
                    warn!("{}",e);
                    return Err(e);
                }
                Err(AttemptError::Transient(e)) => {
                    if attempt>=self.max_retries {
                        warn!("Giving up on {} after {} attempts : {}",url,attempt+1,e);
                        return Err(e);
                    }
                    attempt+=1;
                    warn!("{} ; retry {} of {} in {:?}",e,attempt,self.max_retries,delay);
                    std::thread::sleep(delay);
                    delay = delay.saturating_mul(2);
                }
            }
        }
    }
}
