//! Turn raw parsed rows into checked [ElectionResult]s.
//!
//! Checks happen in a fixed order: state reference, percentages, electoral votes, year.
//! Everything here is a pure function of the raw row and the [StateSet].

use itertools::Itertools;
use crate::error::ScrapeError;
use crate::model::{is_presidential_election_year, ElectionResult, RawElectionResult, StateInfo, StateSet, Winner};
use crate::us_states::canonical_variant;

/// Trim, collapse whitespace and drop footnote markers from a state name as written on a page.
pub fn normalize_state_name(name:&str) -> String {
    name.split(|c:char|c.is_whitespace())
        .filter(|t|!t.is_empty())
        .join(" ")
        .trim_end_matches(|c:char|c=='*'||c=='†'||c=='‡')
        .trim()
        .to_string()
}

/// Find the state a (normalized) name refers to: name ignoring case and punctuation, known variant, or postal abbreviation.
pub fn resolve_state<'a>(name:&str,states:&'a StateSet) -> Option<&'a StateInfo> {
    states.get(name)
        .or_else(||canonical_variant(name).and_then(|n|states.get(n)))
        .or_else(||if name.len()==2 { states.get_by_abbreviation(name) } else { None })
}

fn check_percentage(field:&'static str,value:Option<f64>) -> Result<Option<f64>,ScrapeError> {
    match value {
        Some(v) if !(0.0..=100.0).contains(&v) => Err(ScrapeError::Range{ field, value: v.to_string() }),
        _ => Ok(value),
    }
}

/// Check and clean a raw row. Missing percentages are allowed and make the winner Unknown.
pub fn validate(raw:&RawElectionResult,states:&StateSet) -> Result<ElectionResult,ScrapeError> {
    let name = normalize_state_name(&raw.state);
    let state = resolve_state(&name,states).ok_or_else(||ScrapeError::UnknownState(name.clone()))?;
    let democrat_pct = check_percentage("democrat_pct",raw.democrat_pct)?;
    let republican_pct = check_percentage("republican_pct",raw.republican_pct)?;
    if state.electoral_votes==0 { return Err(ScrapeError::Range{ field: "electoral_votes", value: format!("{} for {}",state.electoral_votes,state.name) }) }
    if !is_presidential_election_year(raw.year) { return Err(ScrapeError::Range{ field: "year", value: raw.year.to_string() }) }
    Ok(ElectionResult{
        state: state.name.clone(),
        year: raw.year,
        democrat_pct,
        republican_pct,
        winner: Winner::from_percentages(democrat_pct,republican_pct),
        electoral_votes: state.electoral_votes,
        abbreviation: state.abbreviation.clone(),
    })
}
