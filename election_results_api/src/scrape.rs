//! The whole pipeline: state list, years, results, national summaries, and export.
//!
//! There are two stages, as for the other downloaded data
//! * [scrape_election_results] gets everything from the site into memory, recording failures rather than stopping.
//! * [export_election_results] writes the dataset out. This is all or nothing per file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use anyhow::Context;
use log::{info, warn};
use crate::config::Config;
use crate::error::ScrapeError;
use crate::export::{export_csv, export_json, export_national_json};
use crate::fetch::PageSource;
use crate::model::{NationalSummary, StateSet, Year};
use crate::orchestrate::{collect_all, RunOutcome};
use crate::parse_states::parse_state_list;
use crate::years::{collect_national_summaries, enumerate_years, plan_work_units};

pub const RESULTS_CSV : &'static str = "election_results.csv";
pub const RESULTS_JSON : &'static str = "election_results.json";
pub const NATIONAL_JSON : &'static str = "national_results.json";

/// Total electoral votes since the 1964 election (435 representatives, 100 senators, 3 for DC).
const EXPECTED_ELECTORAL_VOTES : u32 = 538;

/// Everything gathered in one run.
pub struct ScrapeRun {
    pub states : StateSet,
    pub years : Vec<Year>,
    pub outcome : RunOutcome,
    pub national : BTreeMap<Year,NationalSummary>,
    pub national_failures : BTreeMap<Year,ScrapeError>,
}

/// Download and parse the state list. Done once, before any results are fetched.
pub fn fetch_states(source:&dyn PageSource,config:&Config) -> Result<StateSet,ScrapeError> {
    let url = config.state_list_url();
    let html = source.fetch(&url)?;
    let states = StateSet::new(parse_state_list(&html,&url)?)?;
    info!("Found {} states with {} electoral votes",states.len(),states.total_electoral_votes());
    if states.total_electoral_votes()!=EXPECTED_ELECTORAL_VOTES {
        warn!("State list has {} electoral votes, expected {}",states.total_electoral_votes(),EXPECTED_ELECTORAL_VOTES);
    }
    Ok(states)
}

/// Scrape everything. Failing to get the state list or the years is fatal, as there is nothing to
/// do without them; failures of individual work units are recorded in the outcome.
pub fn scrape_election_results(source:&dyn PageSource,config:&Config) -> anyhow::Result<ScrapeRun> {
    let states = fetch_states(source,config).context("Could not get state list")?;
    let years = enumerate_years(source,config).context("Could not get election years")?;
    let units = plan_work_units(&states,&years,config);
    let outcome = collect_all(source,&states,&units,config.worker_pool_size)?;
    let (national,national_failures) = if config.collect_national_summaries { collect_national_summaries(source,config,&years) } else { Default::default() };
    Ok(ScrapeRun{ states, years, outcome, national, national_failures })
}

/// Write the results (and national summaries, if any) to `dir`. Returns the files written.
pub fn export_election_results(run:&ScrapeRun,dir:&Path) -> Result<Vec<PathBuf>,ScrapeError> {
    let mut written = Vec::new();
    let csv = dir.join(RESULTS_CSV);
    export_csv(&run.outcome.dataset,&csv)?;
    written.push(csv);
    let json = dir.join(RESULTS_JSON);
    export_json(&run.outcome.dataset,&json)?;
    written.push(json);
    if !run.national.is_empty() {
        let national = dir.join(NATIONAL_JSON);
        export_national_json(run.national.values(),&national)?;
        written.push(national);
    }
    Ok(written)
}
