//! Write the dataset out as CSV and JSON for the report generator.
//!
//! Each file is written to a temporary file in the same directory and only moved into place once
//! it is complete, so a failed export never leaves a half written file where a good one was.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use log::info;
use serde::{Serialize, Deserialize};
use tempfile::NamedTempFile;
use crate::error::ScrapeError;
use crate::model::{Dataset, ElectionResult, NationalSummary, Winner, Year};

/// Written even when there are no rows, so readers can always find the columns.
const CSV_HEADER : [&'static str; 7] = ["year","state","abbreviation","electoral_votes","democrat_pct","republican_pct","winner"];

/// One exported row. Field order is the CSV column order.
/// A missing percentage is an empty field in CSV and null in JSON.
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
pub struct ExportRecord {
    pub year : Year,
    pub state : String,
    pub abbreviation : String,
    pub electoral_votes : u32,
    pub democrat_pct : Option<f64>,
    pub republican_pct : Option<f64>,
    pub winner : Winner,
}

impl From<&ElectionResult> for ExportRecord {
    fn from(r: &ElectionResult) -> Self {
        ExportRecord{
            year: r.year,
            state: r.state.clone(),
            abbreviation: r.abbreviation.clone(),
            electoral_votes: r.electoral_votes,
            democrat_pct: r.democrat_pct,
            republican_pct: r.republican_pct,
            winner: r.winner,
        }
    }
}

/// The records for a dataset, ordered by year then state.
pub fn export_records(dataset:&Dataset) -> Vec<ExportRecord> {
    dataset.results().map(ExportRecord::from).collect()
}

/// Create the parent directory, write via `write` to a temporary file next to `path`, and if that
/// succeeds move it to `path`.
fn write_atomically(path:&Path,write:impl FnOnce(&mut BufWriter<&mut File>)->Result<(),String>) -> Result<(),ScrapeError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|e|ScrapeError::export(path,e))?;
    let mut file = NamedTempFile::new_in(dir).map_err(|e|ScrapeError::export(path,e))?;
    {
        let mut writer = BufWriter::new(file.as_file_mut());
        write(&mut writer).map_err(|e|ScrapeError::export(path,e))?;
        writer.flush().map_err(|e|ScrapeError::export(path,e))?;
    }
    file.as_file().sync_all().map_err(|e|ScrapeError::export(path,e))?;
    file.persist(path).map_err(|e|ScrapeError::export(path,e.error))?;
    Ok(())
}

pub fn export_csv(dataset:&Dataset,path:&Path) -> Result<(),ScrapeError> {
    let records = export_records(dataset);
    write_atomically(path,|w|{
        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(w);
        writer.write_record(CSV_HEADER).map_err(|e|e.to_string())?;
        for record in &records { writer.serialize(record).map_err(|e|e.to_string())?; }
        writer.flush().map_err(|e|e.to_string())
    })?;
    info!("Saved {} results to {}",records.len(),path.display());
    Ok(())
}

pub fn export_json(dataset:&Dataset,path:&Path) -> Result<(),ScrapeError> {
    let records = export_records(dataset);
    write_atomically(path,|w|serde_json::to_writer_pretty(w,&records).map_err(|e|e.to_string()))?;
    info!("Saved {} results to {}",records.len(),path.display());
    Ok(())
}

/// Write the national summaries, ordered by year.
pub fn export_national_json<'a>(summaries:impl IntoIterator<Item=&'a NationalSummary>,path:&Path) -> Result<(),ScrapeError> {
    let summaries : Vec<&NationalSummary> = summaries.into_iter().collect();
    write_atomically(path,|w|serde_json::to_writer_pretty(w,&summaries).map_err(|e|e.to_string()))?;
    info!("Saved {} national summaries to {}",summaries.len(),path.display());
    Ok(())
}

/// Read back a file written by [export_json].
pub fn read_json(path:&Path) -> Result<Vec<ExportRecord>,ScrapeError> {
    let file = File::open(path).map_err(|e|ScrapeError::export(path,e))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e|ScrapeError::export(path,e))
}
