//! Data structures for states, per year results, and the collected dataset.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use serde::{Serialize, Deserialize};
use crate::error::ScrapeError;
use crate::us_states::name_key;

/// A presidential election year, e.g. 2020.
pub type Year = u16;

/// The first presidential election was in 1788-89; since 1792 they are every four years.
pub fn is_presidential_election_year(year:Year) -> bool {
    year==1788 || (year>=1792 && year<=2100 && year%4==0)
}

/// Information about a state, from the state list page. Immutable once created.
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
pub struct StateInfo {
    pub name : String,
    pub electoral_votes : u32,
    /// Two letter postal code, e.g. FL.
    pub abbreviation : String,
    /// The page with this state's election history, if the state list linked to one.
    #[serde(default,skip_serializing_if = "Option::is_none")]
    pub url : Option<String>,
}

/// All the states known for a run. Results refer to a state by name, which is looked up here.
#[derive(Debug,Clone,Default,PartialEq)]
pub struct StateSet {
    states : Vec<StateInfo>,
    by_name : HashMap<String,usize>,
    by_abbreviation : HashMap<String,usize>,
}

impl StateSet {
    /// Build a state set, rejecting duplicate names or abbreviations.
    pub fn new(states:Vec<StateInfo>) -> Result<Self,ScrapeError> {
        let mut by_name = HashMap::new();
        let mut by_abbreviation = HashMap::new();
        for (i,state) in states.iter().enumerate() {
            if by_name.insert(name_key(&state.name),i).is_some() { return Err(ScrapeError::parse(format!("Duplicate state {} in state list",state.name))) }
            if by_abbreviation.insert(state.abbreviation.to_uppercase(),i).is_some() { return Err(ScrapeError::parse(format!("Duplicate abbreviation {} in state list",state.abbreviation))) }
        }
        Ok(StateSet{ states, by_name, by_abbreviation })
    }

    /// Look up a state by name, ignoring case, `.` and `,`.
    pub fn get(&self,name:&str) -> Option<&StateInfo> {
        self.by_name.get(&name_key(name)).map(|&i|&self.states[i])
    }

    pub fn get_by_abbreviation(&self,abbreviation:&str) -> Option<&StateInfo> {
        self.by_abbreviation.get(&abbreviation.to_uppercase()).map(|&i|&self.states[i])
    }

    pub fn iter(&self) -> impl Iterator<Item=&StateInfo> { self.states.iter() }
    pub fn len(&self) -> usize { self.states.len() }
    pub fn is_empty(&self) -> bool { self.states.is_empty() }
    pub fn total_electoral_votes(&self) -> u32 { self.states.iter().map(|s|s.electoral_votes).sum() }
}

/// Who won a state in a given year. Never scraped; always derived from the percentages.
#[derive(Serialize,Deserialize,Debug,Clone,Copy,Eq,PartialEq,Hash)]
pub enum Winner {
    Democrat,
    Republican,
    Unknown,
}

impl Winner {
    pub fn from_percentages(democrat_pct:Option<f64>,republican_pct:Option<f64>) -> Winner {
        match (democrat_pct,republican_pct) {
            (Some(d),Some(r)) if d>r => Winner::Democrat,
            (Some(d),Some(r)) if r>d => Winner::Republican,
            _ => Winner::Unknown,
        }
    }
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// The fields parsed from a results table row, before any checking.
#[derive(Debug,Clone,PartialEq)]
pub struct RawElectionResult {
    pub state : String,
    pub year : Year,
    pub democrat_pct : Option<f64>,
    pub republican_pct : Option<f64>,
}

/// A cleaned result for one state in one year.
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
pub struct ElectionResult {
    /// Canonical state name, as in the [StateSet] for the run.
    pub state : String,
    pub year : Year,
    pub democrat_pct : Option<f64>,
    pub republican_pct : Option<f64>,
    pub winner : Winner,
    /// Copied from the [StateInfo] when the result was created.
    pub electoral_votes : u32,
    pub abbreviation : String,
}

impl ElectionResult {
    pub fn key(&self) -> ResultKey { ResultKey{ year: self.year, state: self.state.clone() } }
}

impl fmt::Display for ElectionResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fn pct(p:Option<f64>) -> String { p.map(|p|format!("{:.2}%",p)).unwrap_or_else(||"N/A".to_string()) }
        write!(f,"{} {} ({} EV) : DEM {} REP {} winner {}",self.year,self.state,self.electoral_votes,pct(self.democrat_pct),pct(self.republican_pct),self.winner)
    }
}

/// Identifies one unit of the dataset. Ordered by year then state.
#[derive(Serialize,Deserialize,Debug,Clone,Eq,PartialEq,Hash,Ord,PartialOrd)]
pub struct ResultKey {
    pub year : Year,
    pub state : String,
}

impl fmt::Display for ResultKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.year, self.state)
    }
}

/// All results for one year, keyed by state name.
#[derive(Debug,Clone,PartialEq)]
pub struct YearData {
    pub year : Year,
    pub states : BTreeMap<String,ElectionResult>,
}

impl YearData {
    pub fn new(year:Year) -> Self { YearData{ year, states: BTreeMap::new() } }

    /// Add a result. A second result for the same state is rejected.
    pub fn insert(&mut self,result:ElectionResult) -> Result<(),ScrapeError> {
        if result.year!=self.year { return Err(ScrapeError::parse(format!("Result for {} filed under year {}",result.key(),self.year))) }
        if self.states.contains_key(&result.state) { return Err(ScrapeError::parse(format!("Duplicate result for {}",result.key()))) }
        self.states.insert(result.state.clone(),result);
        Ok(())
    }
}

/// The complete set of cleaned results for a run.
#[derive(Debug,Clone,Default,PartialEq)]
pub struct Dataset {
    pub years : BTreeMap<Year,YearData>,
}

impl Dataset {
    pub fn insert(&mut self,result:ElectionResult) -> Result<(),ScrapeError> {
        self.years.entry(result.year).or_insert_with(||YearData::new(result.year)).insert(result)
    }

    pub fn get(&self,year:Year,state:&str) -> Option<&ElectionResult> {
        self.years.get(&year).and_then(|y|y.states.get(state))
    }

    /// All results, ordered by year then state.
    pub fn results(&self) -> impl Iterator<Item=&ElectionResult> {
        self.years.values().flat_map(|y|y.states.values())
    }

    pub fn len(&self) -> usize { self.years.values().map(|y|y.states.len()).sum() }
    pub fn is_empty(&self) -> bool { self.len()==0 }
}

/// A national candidate on a year page. Only the two major parties are kept.
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
pub struct NationalCandidate {
    pub party : String,
    pub name : String,
    #[serde(default)]
    pub electoral_votes : Option<u32>,
    #[serde(default)]
    pub popular_votes : Option<u64>,
    #[serde(default)]
    pub winner : bool,
    /// The winner's portrait on the year page. Only set for the winner.
    #[serde(default,skip_serializing_if = "Option::is_none")]
    pub winner_image_url : Option<String>,
}

/// National results for a year.
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
pub struct NationalSummary {
    pub year : Year,
    pub candidates : Vec<NationalCandidate>,
}

impl NationalSummary {
    pub fn winning_party(&self) -> Option<&str> {
        self.candidates.iter().find(|c|c.winner).map(|c|c.party.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(name:&str,abbreviation:&str,electoral_votes:u32) -> StateInfo {
        StateInfo{ name: name.to_string(), electoral_votes, abbreviation: abbreviation.to_string(), url: None }
    }

    #[test]
    fn test_election_years() {
        assert!(is_presidential_election_year(1788));
        assert!(!is_presidential_election_year(1789));
        assert!(is_presidential_election_year(1792));
        assert!(is_presidential_election_year(2020));
        assert!(!is_presidential_election_year(2022));
        assert!(!is_presidential_election_year(1700));
    }

    #[test]
    fn test_winner_truth_table() {
        let values = [None,Some(0.0),Some(33.3),Some(50.0),Some(100.0)];
        for d in values {
            for r in values {
                let expected = match (d,r) {
                    (Some(d),Some(r)) if d>r => Winner::Democrat,
                    (Some(d),Some(r)) if r>d => Winner::Republican,
                    _ => Winner::Unknown,
                };
                assert_eq!(expected,Winner::from_percentages(d,r),"d={:?} r={:?}",d,r);
            }
        }
        assert_eq!(Winner::Republican,Winner::from_percentages(Some(47.86),Some(51.22)));
        assert_eq!(Winner::Unknown,Winner::from_percentages(Some(50.0),Some(50.0)));
    }

    #[test]
    fn test_state_set_lookup() {
        let states = StateSet::new(vec![state("Florida","FL",30),state("Ohio","OH",17)]).unwrap();
        assert_eq!(30,states.get("florida").unwrap().electoral_votes);
        assert_eq!("Ohio",states.get(" OHIO. ").unwrap().name);
        assert_eq!("Ohio",states.get_by_abbreviation("oh").unwrap().name);
        assert!(states.get("Gondor").is_none());
        assert_eq!(47,states.total_electoral_votes());
    }

    #[test]
    fn test_state_set_rejects_duplicates() {
        assert!(StateSet::new(vec![state("Florida","FL",30),state("Florida","FX",30)]).is_err());
        assert!(StateSet::new(vec![state("Florida","FL",30),state("Flatland","FL",3)]).is_err());
    }

    #[test]
    fn test_year_data_rejects_duplicate_state() {
        let result = ElectionResult{ state: "Ohio".to_string(), year: 2020, democrat_pct: Some(45.2), republican_pct: Some(53.3), winner: Winner::Republican, electoral_votes: 18, abbreviation: "OH".to_string() };
        let mut year = YearData::new(2020);
        year.insert(result.clone()).unwrap();
        assert!(year.insert(result.clone()).is_err());
        assert!(YearData::new(2016).insert(result).is_err());
    }
}
