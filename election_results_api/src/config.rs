
use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use anyhow::Context;
use serde::{Serialize,Deserialize};
use serde_with::{serde_as, DurationMilliSeconds, DurationSeconds};
use crate::model::{is_presidential_election_year, Year};

pub const CONFIG_FILE_NAME: &str = "config.toml";

/// How work is split up. Either one page per state with all its years, or one page per year with all its states.
#[derive(Serialize,Deserialize,Debug,Clone,Copy,Eq,PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    PerState,
    PerYear,
}

#[serde_as]
#[derive(Serialize,Deserialize,Debug,Clone)]
#[serde(default)]
pub struct Config {
    /// Root of the results site, e.g. https://www.270towin.com
    pub base_url : String,
    /// Page listing all states with their electoral votes, relative to base_url.
    pub state_list_path : String,
    /// Page linking to each election year, relative to base_url.
    pub year_list_path : String,
    /// Sent with every request. The site blocks the default reqwest agent.
    pub user_agent : String,
    #[serde_as(as = "DurationSeconds<u64>")]
    #[serde(rename = "request_timeout_secs")]
    pub request_timeout : Duration,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(rename = "min_request_spacing_ms")]
    pub min_request_spacing : Duration,
    /// Number of retries after the first attempt, for transient failures only.
    pub max_retries : u32,
    /// Delay before the first retry; doubled for each subsequent one.
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(rename = "retry_backoff_ms")]
    pub retry_backoff : Duration,
    pub worker_pool_size : NonZeroUsize,
    /// If present, scrape these years rather than the list on the site.
    pub years : Option<Vec<Year>>,
    pub granularity : Granularity,
    pub output_dir : PathBuf,
    pub collect_national_summaries : bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: "https://www.270towin.com".to_string(),
            state_list_path: "/states/".to_string(),
            year_list_path: "/historical-presidential-elections/".to_string(),
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) election_results_api/0.1".to_string(),
            request_timeout: Duration::from_secs(10),
            min_request_spacing: Duration::from_secs(1),
            max_retries: 3,
            retry_backoff: Duration::from_millis(500),
            worker_pool_size: NonZeroUsize::new(5).unwrap_or(NonZeroUsize::MIN),
            years: None,
            granularity: Granularity::PerState,
            output_dir: PathBuf::from("output"),
            collect_national_summaries: true,
        }
    }
}

impl Config {
    /// Read a config file. Fields not given take their default values.
    pub fn load(path:&Path) -> anyhow::Result<Config> {
        let file = fs::read_to_string(path).with_context(||format!("Could not read {}",path.display()))?;
        let config : Config = toml::de::from_str(&file).with_context(||format!("Could not parse {}",path.display()))?;
        config.check()?;
        Ok(config)
    }

    /// Like [Config::load], but a missing file means all defaults.
    pub fn load_or_default(path:&Path) -> anyhow::Result<Config> {
        if path.exists() { Config::load(path) } else {
            log::info!("No {} found, using default configuration",path.display());
            Ok(Config::default())
        }
    }

    fn check(&self) -> anyhow::Result<()> {
        url::Url::parse(&self.base_url).with_context(||format!("base_url {} is not a url",self.base_url))?;
        if let Some(years) = &self.years {
            if let Some(bad) = years.iter().find(|&&y|!is_presidential_election_year(y)) {
                anyhow::bail!("Configured year {} is not a presidential election year",bad);
            }
        }
        Ok(())
    }

    pub fn url(&self,path:&str) -> String {
        format!("{}{}",self.base_url.trim_end_matches('/'),path)
    }
    pub fn state_list_url(&self) -> String { self.url(&self.state_list_path) }
    pub fn year_list_url(&self) -> String { self.url(&self.year_list_path) }
    /// The page for a given year, e.g. https://www.270towin.com/2020-election/
    pub fn year_url(&self,year:Year) -> String { self.url(&format!("/{}-election/",year)) }
    /// Fallback page for a state when the state list did not link to one.
    pub fn state_url(&self,state:&str) -> String { self.url(&format!("/states/{}",state.replace(' ',"_"))) }
}
