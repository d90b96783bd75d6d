//! Which years to scrape, and how to split the scraping into independent units of work.

use std::collections::BTreeMap;
use log::{info, warn};
use crate::config::{Config, Granularity};
use crate::error::ScrapeError;
use crate::fetch::PageSource;
use crate::model::{NationalSummary, ResultKey, StateSet, Year};
use crate::parse_years::{parse_national_summary, parse_year_list};

/// The years to scrape, newest first. A configured list wins over the site's list, as the site's
/// navigation has not always been reliable.
pub fn enumerate_years(source:&dyn PageSource,config:&Config) -> Result<Vec<Year>,ScrapeError> {
    if let Some(years) = &config.years {
        let mut years = years.clone();
        years.sort_unstable_by(|a,b|b.cmp(a));
        years.dedup();
        info!("Using {} configured years",years.len());
        return Ok(years);
    }
    let html = source.fetch(&config.year_list_url())?;
    let years = parse_year_list(&html)?;
    info!("Found {} election years on {}",years.len(),config.year_list_url());
    Ok(years)
}

/// The smallest independently schedulable piece of work: fetch one page, parse it, validate every row.
#[derive(Debug,Clone,Eq,PartialEq)]
pub enum WorkUnit {
    /// A state's history page, covering the given years.
    StatePage { state : String, url : String, years : Vec<Year> },
    /// A year's page, covering every state.
    YearPage { year : Year, url : String },
}

impl WorkUnit {
    pub fn url(&self) -> &str {
        match self {
            WorkUnit::StatePage { url, .. } => url,
            WorkUnit::YearPage { url, .. } => url,
        }
    }

    /// The dataset keys this unit is responsible for.
    pub fn keys(&self,states:&StateSet) -> Vec<ResultKey> {
        match self {
            WorkUnit::StatePage { state, years, .. } => years.iter().map(|&year|ResultKey{ year, state: state.clone() }).collect(),
            WorkUnit::YearPage { year, .. } => states.iter().map(|s|ResultKey{ year: *year, state: s.name.clone() }).collect(),
        }
    }
}

/// Split the (year,state) grid into work units according to the configured granularity.
pub fn plan_work_units(states:&StateSet,years:&[Year],config:&Config) -> Vec<WorkUnit> {
    match config.granularity {
        Granularity::PerState => states.iter().map(|s|WorkUnit::StatePage{
            state: s.name.clone(),
            url: s.url.clone().unwrap_or_else(||config.state_url(&s.name)),
            years: years.to_vec(),
        }).collect(),
        Granularity::PerYear => years.iter().map(|&year|WorkUnit::YearPage{ year, url: config.year_url(year) }).collect(),
    }
}

/// Get the national results for each year. A year that fails is logged and reported, not fatal.
pub fn collect_national_summaries(source:&dyn PageSource,config:&Config,years:&[Year]) -> (BTreeMap<Year,NationalSummary>,BTreeMap<Year,ScrapeError>) {
    let mut summaries = BTreeMap::new();
    let mut failures = BTreeMap::new();
    for &year in years {
        let url = config.year_url(year);
        match source.fetch(&url).and_then(|html|parse_national_summary(&html,year,&url)) {
            Ok(summary) => { summaries.insert(year,summary); }
            Err(e) => {
                warn!("No national summary for {} : {}",year,e);
                failures.insert(year,e);
            }
        }
    }
    (summaries,failures)
}
