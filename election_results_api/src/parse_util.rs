//! Utilities for parse_states.rs, parse_results.rs and parse_years.rs

use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use crate::error::ScrapeError;
use crate::model::Year;

/// Compile a selector, turning a bad selector into a parse error rather than a panic.
pub(crate) fn selector(s:&str) -> Result<Selector,ScrapeError> {
    Selector::parse(s).map_err(|e|ScrapeError::parse(format!("Could not parse selector `{}` error {:?}",s,e)))
}

/// The first element matching `selector_str`, or a parse error naming `what` was expected.
pub(crate) fn select_first<'a>(html:&'a Html,selector_str:&str,what:&str) -> Result<ElementRef<'a>,ScrapeError> {
    html.select(&selector(selector_str)?).next().ok_or_else(||ScrapeError::parse(format!("Could not find {} (`{}`)",what,selector_str)))
}

/// All elements under `element` matching `selector_str`. Zero matches is an error, since an empty
/// page can not be told apart from a page whose layout has changed.
pub(crate) fn select_all<'a>(element:ElementRef<'a>,selector_str:&str,what:&str) -> Result<Vec<ElementRef<'a>>,ScrapeError> {
    let found : Vec<_> = element.select(&selector(selector_str)?).collect();
    if found.is_empty() { Err(ScrapeError::parse(format!("No {} found (`{}`)",what,selector_str))) } else { Ok(found) }
}

/// The `td` elements that are direct children of a row, ignoring those of nested tables.
pub(crate) fn direct_cells<'a>(tr:ElementRef<'a>) -> Vec<ElementRef<'a>> {
    tr.children().filter_map(ElementRef::wrap).filter(|e|e.value().name()=="td").collect()
}

/// All the text in an element, trimmed, with whitespace runs (including non breaking spaces) collapsed.
pub(crate) fn cell_text(element:&ElementRef) -> String {
    element.text().flat_map(|t|t.split(|c:char|c.is_whitespace())).filter(|t|!t.is_empty()).join(" ")
}

pub(crate) fn has_class(element:&ElementRef,class:&str) -> bool {
    element.value().attr("class").map(|c|c.split_whitespace().any(|c|c==class)).unwrap_or(false)
}

pub fn relative_url(base_url:&str,url:&str) -> Result<String,ScrapeError> {
    let base = url::Url::parse(base_url).map_err(|e|ScrapeError::parse(format!("Bad base url {} : {}",base_url,e)))?;
    let res = base.join(url).map_err(|e|ScrapeError::parse(format!("Bad url {} : {}",url,e)))?;
    Ok(res.to_string())
}

/// Strip anything that can not be part of a decimal number, e.g. "47.86%" becomes "47.86".
pub fn strip_non_numeric(s:&str) -> String {
    s.chars().filter(|c|c.is_ascii_digit()||*c=='.'||*c=='-').collect()
}

/// Parse a percentage like "47.86%". Text that does not parse gives None; it is up to the
/// validator to decide what a missing value means.
pub fn parse_percentage(s:&str) -> Option<f64> {
    strip_non_numeric(s).parse::<f64>().ok().filter(|v|v.is_finite())
}

/// Parse a count like "1,234,567". Commas and spaces are allowed; anything else is not.
pub fn parse_count(s:&str) -> Option<u64> {
    let cleaned : String = s.chars().filter(|c|*c!=','&&!c.is_whitespace()).collect();
    cleaned.parse::<u64>().ok()
}

/// Electoral votes are structural, so unlike percentages they must parse.
pub fn parse_electoral_votes(s:&str,context:&str) -> Result<u32,ScrapeError> {
    match parse_count(s) {
        Some(v) if v>0 && v<=u32::MAX as u64 => Ok(v as u32),
        _ => Err(ScrapeError::parse(format!("Electoral votes `{}` for {} is not a positive integer",s,context))),
    }
}

static YEAR_PREFIX : Lazy<Regex> = Lazy::new(||Regex::new(r"(?:^|\D)(\d{4})(?:\D|$)").unwrap());

/// Map a site label such as "2020 Election" or "/2020-election/" to its year.
pub fn year_from_label(label:&str) -> Option<Year> {
    YEAR_PREFIX.captures(label.trim()).and_then(|c|c[1].parse::<Year>().ok())
}
