pub mod error;
pub mod config;
pub mod model;
pub mod us_states;
pub mod rate_limit;
pub mod fetch;
pub mod parse_util;
pub mod parse_states;
pub mod parse_results;
pub mod parse_years;
pub mod clean;
pub mod years;
pub mod orchestrate;
pub mod export;
pub mod scrape;
