//! Parse election result tables, either a state's history page or a year's state by state page.

use scraper::Html;
use crate::error::ScrapeError;
use crate::model::{RawElectionResult, Year};
use crate::parse_util::{cell_text, direct_cells, parse_percentage, select_all, select_first, selector, year_from_label};

/// Parse the historical results table on a state page.
/// A typical row will look like
/// ```text
///   <tr class="toggle-row">
///     <td>2020</td>
///     <td><table><tr><td>47.9%</td><td>&nbsp;</td><td>51.2%</td></tr></table></td>
///     <td>...</td>
///   </tr>
/// ```
/// Rows hidden with `display:none` are duplicates used by the site's expand/collapse and are skipped.
/// Rows whose first cell is not a year are skipped. A percentage that does not parse is recorded as missing.
pub fn parse_state_history(html:&str,state:&str) -> Result<Vec<RawElectionResult>,ScrapeError> {
    let html = Html::parse_document(html);
    let table = select_first(&html,"table#recent_elections",&format!("results table for {}",state))?;
    let select_nested_row = selector("table tr")?;
    let select_td = selector("td")?;
    let mut results = Vec::new();
    for tr in select_all(table,"tr.toggle-row",&format!("result rows for {}",state))? {
        if tr.value().attr("style").map(|s|s.replace(' ',"").contains("display:none")).unwrap_or(false) { continue; }
        let cells = direct_cells(tr);
        if cells.len()<2 { continue; }
        let Some(year) = year_from_label(&cell_text(&cells[0])) else { continue; };
        let (democrat_pct,republican_pct) = match cells[1].select(&select_nested_row).next() {
            Some(nested) => {
                let nested_cells : Vec<_> = nested.select(&select_td).collect();
                (nested_cells.get(0).and_then(|c|parse_percentage(&cell_text(c))),nested_cells.get(2).and_then(|c|parse_percentage(&cell_text(c))))
            }
            None => (None,None),
        };
        results.push(RawElectionResult{ state: state.to_string(), year, democrat_pct, republican_pct });
    }
    Ok(results)
}

/// Parse the state by state results table on a year page.
/// A typical row will look like
/// ```text
///   <tr>
///     <td><a href="/states/Florida">Florida</a></td>
///     <td>47.86%</td>
///     <td>51.22%</td>
///   </tr>
/// ```
/// The state name is kept as written on the page; the validator matches it to the state list.
pub fn parse_year_results(html:&str,year:Year) -> Result<Vec<RawElectionResult>,ScrapeError> {
    let html = Html::parse_document(html);
    let table = select_first(&html,"table#state_results > tbody",&format!("state results table for {}",year))?;
    let mut results = Vec::new();
    for tr in select_all(table,"tr",&format!("state result rows for {}",year))? {
        let cells = direct_cells(tr);
        if cells.is_empty() { continue; }
        if cells.len()<3 { return Err(ScrapeError::parse(format!("Unexpected number of columns {} in state results for {}",cells.len(),year))) }
        let state = cell_text(&cells[0]);
        if state.is_empty() { return Err(ScrapeError::parse(format!("Empty state name in state results for {}",year))) }
        results.push(RawElectionResult{
            state,
            year,
            democrat_pct: parse_percentage(&cell_text(&cells[1])),
            republican_pct: parse_percentage(&cell_text(&cells[2])),
        });
    }
    Ok(results)
}
