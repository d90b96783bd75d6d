//! Run work units on a fixed size pool of worker threads and merge what they find.
//!
//! Workers never touch the dataset. Each returns a list of (key, outcome) pairs, and the
//! orchestrator merges all of them, in unit order, once every unit has finished.

use std::collections::BTreeMap;
use std::fmt;
use std::num::NonZeroUsize;
use anyhow::Context;
use log::{debug, info, warn};
use rayon::prelude::*;
use crate::clean::{normalize_state_name, resolve_state, validate};
use crate::error::{ErrorKind, ScrapeError};
use crate::fetch::PageSource;
use crate::model::{Dataset, ElectionResult, RawElectionResult, ResultKey, StateSet};
use crate::parse_results::{parse_state_history, parse_year_results};
use crate::years::WorkUnit;

/// Everything a run produced: the clean dataset, and for every key that could not be filled, why not.
#[derive(Debug,Clone,Default,PartialEq)]
pub struct RunOutcome {
    pub dataset : Dataset,
    pub failures : BTreeMap<ResultKey,ScrapeError>,
}

impl RunOutcome {
    fn record(&mut self,key:ResultKey,result:Result<ElectionResult,ScrapeError>) {
        if self.failures.contains_key(&key) { return; } // first failure for a key wins.
        let error = match result {
            Ok(result) => match self.dataset.insert(result) {
                Ok(()) => return,
                Err(e) => {
                    if let Some(year) = self.dataset.years.get_mut(&key.year) { year.states.remove(&key.state); }
                    e
                }
            },
            Err(e) => {
                if let Some(year) = self.dataset.years.get_mut(&key.year) { year.states.remove(&key.state); }
                e
            }
        };
        self.failures.insert(key,error);
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary{
            succeeded: self.dataset.len(),
            failed: self.failures.len(),
            failures: self.failures.iter().map(|(k,e)|(k.clone(),e.kind(),e.to_string())).collect(),
        }
    }
}

/// Counts of filled and unfilled keys, for the end of a run.
#[derive(Debug,Clone,PartialEq)]
pub struct RunSummary {
    pub succeeded : usize,
    pub failed : usize,
    pub failures : Vec<(ResultKey,ErrorKind,String)>,
}

impl RunSummary {
    pub fn count_by_kind(&self) -> BTreeMap<ErrorKind,usize> {
        let mut counts = BTreeMap::new();
        for (_,kind,_) in &self.failures { *counts.entry(*kind).or_insert(0) += 1; }
        counts
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f,"{} succeeded, {} failed",self.succeeded,self.failed)?;
        for (key,kind,message) in &self.failures {
            writeln!(f,"  {} : {} ({})",key,kind,message)?;
        }
        Ok(())
    }
}

fn fetch_and_parse(source:&dyn PageSource,unit:&WorkUnit) -> Result<Vec<RawElectionResult>,ScrapeError> {
    let html = source.fetch(unit.url())?;
    match unit {
        WorkUnit::StatePage { state, .. } => parse_state_history(&html,state),
        WorkUnit::YearPage { year, .. } => parse_year_results(&html,*year),
    }
}

/// A state page lists every election the state took part in, so years before the earliest row
/// (before statehood, or DC before 1964) are not expected rather than missing.
fn drop_years_before_history(unit:&WorkUnit,expected:Vec<ResultKey>,raw:Vec<RawElectionResult>) -> (Vec<ResultKey>,Vec<RawElectionResult>) {
    match unit {
        WorkUnit::StatePage { years, .. } => {
            let earliest = raw.iter().map(|r|r.year).min();
            let expected = expected.into_iter().filter(|k|earliest.map_or(true,|e|k.year>=e)).collect();
            let raw = raw.into_iter().filter(|r|years.contains(&r.year)).collect();
            (expected,raw)
        }
        WorkUnit::YearPage { .. } => (expected,raw),
    }
}

/// Do one unit of work: fetch, parse and validate. Every key the unit is responsible for gets an
/// outcome, as do any unexpected rows found on the page. A failed fetch or parse fails every key.
pub fn run_unit(source:&dyn PageSource,states:&StateSet,unit:&WorkUnit) -> Vec<(ResultKey,Result<ElectionResult,ScrapeError>)> {
    let expected = unit.keys(states);
    let raw = match fetch_and_parse(source,unit) {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Work unit {} failed : {}",unit.url(),e);
            return expected.into_iter().map(|k|(k,Err(e.clone()))).collect();
        }
    };
    let (expected,raw) = drop_years_before_history(unit,expected,raw);
    let mut found : BTreeMap<ResultKey,Vec<Result<ElectionResult,ScrapeError>>> = BTreeMap::new();
    for row in &raw {
        let outcome = validate(row,states);
        let key = match &outcome {
            Ok(result) => result.key(),
            Err(_) => {
                let name = normalize_state_name(&row.state);
                ResultKey{ year: row.year, state: resolve_state(&name,states).map(|s|s.name.clone()).unwrap_or(name) }
            }
        };
        found.entry(key).or_default().push(outcome);
    }
    let mut res = Vec::new();
    for key in expected {
        if !found.contains_key(&key) {
            let error = ScrapeError::parse(format!("No result for {} on {}",key,unit.url()));
            res.push((key,Err(error)));
        }
    }
    for (key,mut outcomes) in found {
        let outcome = if outcomes.len()==1 { outcomes.remove(0) } else { Err(ScrapeError::parse(format!("{} rows for {} on {}",outcomes.len(),key,unit.url()))) };
        res.push((key,outcome));
    }
    debug!("Work unit {} produced {} outcomes",unit.url(),res.len());
    res
}

/// Run all the units on a pool of `pool_size` threads. The result does not depend on the pool size
/// or on the order units finish in.
pub fn collect_all(source:&dyn PageSource,states:&StateSet,units:&[WorkUnit],pool_size:NonZeroUsize) -> anyhow::Result<RunOutcome> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(pool_size.get())
        .thread_name(|i|format!("scrape-worker-{}",i))
        .build()
        .context("Could not start worker pool")?;
    info!("Running {} work units on {} workers",units.len(),pool_size);
    let per_unit : Vec<Vec<(ResultKey,Result<ElectionResult,ScrapeError>)>> = pool.install(||units.par_iter().map(|unit|run_unit(source,states,unit)).collect());
    let mut outcome = RunOutcome::default();
    for (key,result) in per_unit.into_iter().flatten() {
        outcome.record(key,result);
    }
    info!("Collected {} results, {} failures",outcome.dataset.len(),outcome.failures.len());
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use crate::model::{StateInfo, Winner};

    struct Pages(HashMap<String,String>);
    impl PageSource for Pages {
        fn fetch(&self,url:&str) -> Result<String,ScrapeError> {
            self.0.get(url).cloned().ok_or_else(||ScrapeError::Fetch{ url: url.to_string(), cause: "HTTP status 404 Not Found".to_string() })
        }
    }

    fn states() -> StateSet {
        StateSet::new(vec![
            StateInfo{ name: "Florida".to_string(), electoral_votes: 29, abbreviation: "FL".to_string(), url: None },
            StateInfo{ name: "Ohio".to_string(), electoral_votes: 18, abbreviation: "OH".to_string(), url: None },
        ]).unwrap()
    }

    fn history(rows:&[(u16,&str,&str)]) -> String {
        let rows : String = rows.iter().map(|(y,d,r)|format!(r#"<tr class="toggle-row"><td>{}</td><td><table><tr><td>{}</td><td></td><td>{}</td></tr></table></td></tr>"#,y,d,r)).collect();
        format!(r#"<table id="recent_elections"><tbody>{}</tbody></table>"#,rows)
    }

    fn key(year:u16,state:&str) -> ResultKey { ResultKey{ year, state: state.to_string() } }

    #[test]
    fn test_state_page_unit() {
        let pages = Pages(HashMap::from([("fl".to_string(),history(&[(2020,"47.86%","51.22%"),(2016,"47.8%","49.0%"),(2012,"50.0%","49.1%")]))]));
        let unit = WorkUnit::StatePage{ state: "Florida".to_string(), url: "fl".to_string(), years: vec![2020,2016] };
        let res = run_unit(&pages,&states(),&unit);
        assert_eq!(2,res.len());
        assert!(res.iter().all(|(_,r)|r.is_ok()));
    }

    #[test]
    fn test_missing_and_duplicate_years() {
        let pages = Pages(HashMap::from([("fl".to_string(),history(&[(2020,"47.86%","51.22%"),(2020,"47.86%","51.22%"),(2012,"50.0%","49.1%")]))]));
        let unit = WorkUnit::StatePage{ state: "Florida".to_string(), url: "fl".to_string(), years: vec![2020,2016] };
        let outcome = collect_all(&pages,&states(),&[unit],NonZeroUsize::new(2).unwrap()).unwrap();
        assert!(outcome.dataset.is_empty());
        assert!(matches!(outcome.failures[&key(2016,"Florida")],ScrapeError::Parse(_)));
        assert!(matches!(outcome.failures[&key(2020,"Florida")],ScrapeError::Parse(_)));
    }

    #[test]
    fn test_years_before_state_history_are_not_failures() {
        let pages = Pages(HashMap::from([("dc".to_string(),history(&[(2020,"92.15%","5.40%"),(1964,"85.5%","14.5%")]))]));
        let states = StateSet::new(vec![StateInfo{ name: "District of Columbia".to_string(), electoral_votes: 3, abbreviation: "DC".to_string(), url: None }]).unwrap();
        let unit = WorkUnit::StatePage{ state: "District of Columbia".to_string(), url: "dc".to_string(), years: vec![2020,2016,1964,1960,1956] };
        let outcome = collect_all(&pages,&states,&[unit],NonZeroUsize::new(1).unwrap()).unwrap();
        assert_eq!(2,outcome.dataset.len());
        // 2016 is within the history, so its absence is still reported.
        assert_eq!(vec![key(2016,"District of Columbia")],outcome.failures.keys().cloned().collect::<Vec<_>>());
    }

    #[test]
    fn test_failed_fetch_does_not_stop_others() {
        let pages = Pages(HashMap::from([("fl".to_string(),history(&[(2020,"47.86%","51.22%")]))]));
        let units = vec![
            WorkUnit::StatePage{ state: "Florida".to_string(), url: "fl".to_string(), years: vec![2020] },
            WorkUnit::StatePage{ state: "Ohio".to_string(), url: "oh".to_string(), years: vec![2020] },
        ];
        let outcome = collect_all(&pages,&states(),&units,NonZeroUsize::new(2).unwrap()).unwrap();
        assert_eq!(Winner::Republican,outcome.dataset.get(2020,"Florida").unwrap().winner);
        assert_eq!(ErrorKind::FetchError,outcome.failures[&key(2020,"Ohio")].kind());
        let summary = outcome.summary();
        assert_eq!((1,1),(summary.succeeded,summary.failed));
        assert!(summary.to_string().contains("2020 Ohio : FetchError"));
    }

    #[test]
    fn test_year_page_unit_with_unknown_state() {
        let page = r#"<table id="state_results"><tbody>
            <tr><td>Florida</td><td>47.86%</td><td>51.22%</td></tr>
            <tr><td>Gondor</td><td>10%</td><td>20%</td></tr>
            <tr><td>OH</td><td>45.24%</td><td>101%</td></tr>
          </tbody></table>"#;
        let pages = Pages(HashMap::from([("y2020".to_string(),page.to_string())]));
        let outcome = collect_all(&pages,&states(),&[WorkUnit::YearPage{ year: 2020, url: "y2020".to_string() }],NonZeroUsize::new(1).unwrap()).unwrap();
        assert_eq!(1,outcome.dataset.len());
        assert_eq!(ErrorKind::UnknownStateError,outcome.failures[&key(2020,"Gondor")].kind());
        assert_eq!(ErrorKind::RangeError,outcome.failures[&key(2020,"Ohio")].kind());
        // nothing that reaches the dataset refers to a state outside the state set.
        assert!(outcome.dataset.results().all(|r|states().get(&r.state).is_some()));
    }

    #[test]
    fn test_summary_counts() {
        let mut outcome = RunOutcome::default();
        outcome.record(key(2020,"Ohio"),Err(ScrapeError::UnknownState("Ohio".to_string())));
        outcome.record(key(2016,"Ohio"),Err(ScrapeError::FetchTimeout{ url: "oh".to_string() }));
        outcome.record(key(2012,"Ohio"),Err(ScrapeError::FetchTimeout{ url: "oh".to_string() }));
        let counts = outcome.summary().count_by_kind();
        assert_eq!(Some(&2),counts.get(&ErrorKind::FetchTimeout));
        assert_eq!(Some(&1),counts.get(&ErrorKind::UnknownStateError));
    }
}
