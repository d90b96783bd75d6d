//! Parse the list of states, with their electoral votes, from the results site.

use scraper::Html;
use crate::error::ScrapeError;
use crate::model::StateInfo;
use crate::parse_util::{cell_text, direct_cells, parse_electoral_votes, relative_url, select_all, select_first, selector};
use crate::us_states::abbreviation_for;

const STATE_TABLE : &'static str = "table#state_list > tbody";

/// Parse the state list page.
/// A typical row will look like
/// ```text
///   <tr>
///     <td><a href="/states/Florida">Florida</a></td>
///     <td>FL</td>
///     <td>30</td>
///   </tr>
/// ```
/// The abbreviation column is sometimes blank, in which case the standard postal code is used.
/// Relative links are resolved against `page_url`.
pub fn parse_state_list(html:&str,page_url:&str) -> Result<Vec<StateInfo>,ScrapeError> {
    let html = Html::parse_document(html);
    let table = select_first(&html,STATE_TABLE,"state list table")?;
    let select_a = selector("a")?;
    let mut states = Vec::new();
    for tr in select_all(table,"tr","state rows")? {
        let tds = direct_cells(tr);
        if tds.is_empty() { continue; } // header rows use th.
        if tds.len()<3 { return Err(ScrapeError::parse(format!("Unexpected number of columns {} in state list",tds.len()))) }
        let name = cell_text(&tds[0]);
        if name.is_empty() { return Err(ScrapeError::parse("Empty state name in state list")) }
        let url = match tds[0].select(&select_a).next().and_then(|a|a.value().attr("href")) {
            Some(href) => Some(relative_url(page_url,href.trim())?),
            None => None,
        };
        let abbreviation = match cell_text(&tds[1]) {
            a if a.len()==2 && a.chars().all(|c|c.is_ascii_alphabetic()) => a.to_uppercase(),
            _ => abbreviation_for(&name).ok_or_else(||ScrapeError::parse(format!("No abbreviation for state {}",name)))?.to_string(),
        };
        let electoral_votes = parse_electoral_votes(&cell_text(&tds[2]),&name)?;
        states.push(StateInfo{ name, electoral_votes, abbreviation, url });
    }
    if states.is_empty() { return Err(ScrapeError::parse("State list table has no states")) }
    Ok(states)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE_URL : &'static str = "https://www.270towin.com/states/";

    #[test]
    fn test_parse_state_list() {
        let html = r#"<html><body><table id="state_list"><thead><tr><th>State</th><th>Abbr</th><th>EV</th></tr></thead>
            <tbody>
              <tr><td><a href="/states/Florida">Florida</a></td><td>FL</td><td>30</td></tr>
              <tr><td><a href="Ohio"> Ohio </a></td><td></td><td>17</td></tr>
              <tr><td>District of Columbia</td><td>dc</td><td>3</td></tr>
            </tbody></table></body></html>"#;
        let states = parse_state_list(html,PAGE_URL).unwrap();
        assert_eq!(3,states.len());
        assert_eq!("Florida",states[0].name);
        assert_eq!(30,states[0].electoral_votes);
        assert_eq!(Some("https://www.270towin.com/states/Florida".to_string()),states[0].url);
        assert_eq!("OH",states[1].abbreviation);
        assert_eq!(Some("https://www.270towin.com/states/Ohio".to_string()),states[1].url);
        assert_eq!("DC",states[2].abbreviation);
        assert_eq!(None,states[2].url);
    }

    #[test]
    fn test_missing_table_is_error() {
        let err = parse_state_list("<html><body><p>Service unavailable</p></body></html>",PAGE_URL).unwrap_err();
        assert!(matches!(err,ScrapeError::Parse(_)));
    }

    #[test]
    fn test_bad_electoral_votes_is_error() {
        let html = r#"<table id="state_list"><tbody><tr><td>Florida</td><td>FL</td><td>N/A</td></tr></tbody></table>"#;
        assert!(matches!(parse_state_list(html,PAGE_URL),Err(ScrapeError::Parse(_))));
    }

    #[test]
    fn test_unknown_state_without_abbreviation_is_error() {
        let html = r#"<table id="state_list"><tbody><tr><td>Gondor</td><td></td><td>7</td></tr></tbody></table>"#;
        assert!(parse_state_list(html,PAGE_URL).is_err());
    }
}
