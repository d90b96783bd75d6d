//! Parse the list of election years, and the national summary on each year's page.

use scraper::Html;
use crate::error::ScrapeError;
use crate::model::{is_presidential_election_year, NationalCandidate, NationalSummary, Year};
use crate::parse_util::{cell_text, direct_cells, has_class, parse_count, relative_url, select_all, select_first, selector, year_from_label};

const YEAR_LINKS : &'static str = r#"a[href*="-election"]"#;
/// Parties whose national candidates are kept.
pub const TARGET_PARTIES : [&'static str; 2] = ["Democratic", "Republican"];

/// Parse the navigable list of election years, e.g. links like `<a href="/2020-election/">2020 Election</a>`.
/// The year is taken from the label, or failing that from the link. Returned newest first, without duplicates.
pub fn parse_year_list(html:&str) -> Result<Vec<Year>,ScrapeError> {
    let html = Html::parse_document(html);
    let root = html.root_element();
    let mut years : Vec<Year> = select_all(root,YEAR_LINKS,"election year links")?.into_iter()
        .filter_map(|a|year_from_label(&cell_text(&a)).or_else(||a.value().attr("href").and_then(year_from_label)))
        .filter(|&y|is_presidential_election_year(y))
        .collect();
    years.sort_unstable_by(|a,b|b.cmp(a));
    years.dedup();
    if years.is_empty() { return Err(ScrapeError::parse("Election year links contain no election years")) }
    Ok(years)
}

/// Parse the national results table on a year page.
/// A typical row will look like
/// ```text
///   <tr class="winner">
///     <td><img src="/img/biden.png"></td>
///     <td>&nbsp;</td>
///     <td>Joe Biden (Kamala Harris)</td>
///     <td>Democratic</td>
///     <td>306</td>
///     <td>81,268,924</td>
///   </tr>
/// ```
/// Only Democratic and Republican candidates are kept. The running mate in brackets is dropped.
/// The winner's portrait (`div.winner-image img`, or failing that `div.presidential_candidate_winner img`)
/// is resolved against `page_url` and attached to the winning candidate.
pub fn parse_national_summary(html:&str,year:Year,page_url:&str) -> Result<NationalSummary,ScrapeError> {
    let html = Html::parse_document(html);
    let winner_image_url = winner_image_url(&html,page_url)?;
    let tbody = select_first(&html,"div.table-responsive tbody",&format!("national results table for {}",year))?;
    let mut candidates : Vec<NationalCandidate> = Vec::new();
    for tr in select_all(tbody,"tr",&format!("national result rows for {}",year))? {
        let cells = direct_cells(tr);
        if cells.len()<6 { continue; }
        let party = cell_text(&cells[3]);
        if !TARGET_PARTIES.contains(&party.as_str()) || candidates.iter().any(|c|c.party==party) { continue; }
        let full_name = cell_text(&cells[2]);
        let name = full_name.split('(').next().unwrap_or("").trim().to_string();
        candidates.push(NationalCandidate{
            party,
            name,
            electoral_votes: parse_count(&cell_text(&cells[4])).and_then(|v|u32::try_from(v).ok()),
            popular_votes: parse_count(&cell_text(&cells[5])),
            winner: has_class(&tr,"winner"),
            winner_image_url: if has_class(&tr,"winner") { winner_image_url.clone() } else { None },
        });
        if candidates.len()==TARGET_PARTIES.len() { break; }
    }
    if candidates.is_empty() { return Err(ScrapeError::parse(format!("No major party candidates in national results for {}",year))) }
    if candidates.len()<TARGET_PARTIES.len() { log::warn!("Only found {}/{} target parties for {}",candidates.len(),TARGET_PARTIES.len(),year); }
    Ok(NationalSummary{ year, candidates })
}

fn winner_image_url(html:&Html,page_url:&str) -> Result<Option<String>,ScrapeError> {
    for candidate in ["div.winner-image img","div.presidential_candidate_winner img"] {
        if let Some(img) = html.select(&selector(candidate)?).next() {
            match img.value().attr("src") {
                Some(src) => return Ok(Some(relative_url(page_url,src.trim())?)),
                None => log::warn!("Winner image on {} has no src",page_url),
            }
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_year_list() {
        let html = r#"<nav>
            <a href="/2016-election/">2016 Election</a>
            <a href="/2020-election/">2020 Election</a>
            <a href="/2020-election/">2020</a>
            <a href="/1789-election/">1789 Election</a>
            <a href="/2024-election/">Latest</a>
            <a href="/about/">About</a>
          </nav>"#;
        assert_eq!(vec![2024,2020,2016],parse_year_list(html).unwrap());
    }

    #[test]
    fn test_year_list_without_links_is_error() {
        assert!(matches!(parse_year_list("<p>no links</p>"),Err(ScrapeError::Parse(_))));
    }

    #[test]
    fn test_parse_national_summary() {
        let html = r#"<div class="winner-image"><img src="/img/candidates/biden.png"></div>
          <div class="table-responsive"><table><tbody>
            <tr class="winner"><td></td><td></td><td>Joe Biden (Kamala Harris)</td><td>Democratic</td><td>306</td><td>81,268,924</td></tr>
            <tr><td></td><td></td><td>Donald Trump (Mike Pence)</td><td>Republican</td><td>232</td><td>74,216,154</td></tr>
            <tr><td></td><td></td><td>Jo Jorgensen</td><td>Libertarian</td><td>0</td><td>1,865,724</td></tr>
          </tbody></table></div>"#;
        let summary = parse_national_summary(html,2020,"https://www.270towin.com/2020-election/").unwrap();
        assert_eq!(2,summary.candidates.len());
        assert_eq!("Joe Biden",summary.candidates[0].name);
        assert_eq!(Some(306),summary.candidates[0].electoral_votes);
        assert_eq!(Some(74216154),summary.candidates[1].popular_votes);
        assert_eq!(Some("Democratic"),summary.winning_party());
        assert_eq!(Some("https://www.270towin.com/img/candidates/biden.png"),summary.candidates[0].winner_image_url.as_deref());
        assert_eq!(None,summary.candidates[1].winner_image_url);
    }

    #[test]
    fn test_winner_image_fallback() {
        let html = r#"<div class="presidential_candidate_winner"><img src="nixon.jpg"></div>
          <div class="table-responsive"><table><tbody>
            <tr><td></td><td></td><td>Hubert Humphrey</td><td>Democratic</td><td>191</td><td>31,271,839</td></tr>
            <tr class="winner"><td></td><td></td><td>Richard Nixon</td><td>Republican</td><td>301</td><td>31,783,783</td></tr>
          </tbody></table></div>"#;
        let summary = parse_national_summary(html,1968,"https://www.270towin.com/1968-election/").unwrap();
        assert_eq!(Some("https://www.270towin.com/1968-election/nixon.jpg"),summary.candidates[1].winner_image_url.as_deref());
        assert_eq!(None,summary.candidates[0].winner_image_url);
    }

    #[test]
    fn test_national_summary_without_major_parties_is_error() {
        let html = r#"<div class="table-responsive"><table><tbody>
            <tr><td></td><td></td><td>George Washington</td><td>Independent</td><td>69</td><td></td></tr>
          </tbody></table></div>"#;
        assert!(parse_national_summary(html,1788,"https://www.270towin.com/1788-election/").is_err());
    }
}
