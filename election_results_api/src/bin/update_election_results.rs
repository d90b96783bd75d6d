use std::path::PathBuf;
use clap::Parser;
use election_results_api::config::{Config, CONFIG_FILE_NAME};
use election_results_api::fetch::{FetchSettings, Fetcher};
use election_results_api::scrape::{export_election_results, scrape_election_results};

#[derive(Parser)]
#[clap(version)]
/// Download U.S. presidential election results by state and year, and save them as CSV and JSON.
struct Opts {
    /// The configuration file. If it does not exist, defaults are used.
    #[clap(short, long, value_parser, default_value = CONFIG_FILE_NAME)]
    config : PathBuf,

    /// Where to write the results. Overrides output_dir in the configuration file.
    #[clap(short, long, value_parser)]
    output_dir : Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let opts = Opts::parse();
    let config = Config::load_or_default(&opts.config)?;
    let output_dir = opts.output_dir.unwrap_or_else(||config.output_dir.clone());
    let fetcher = Fetcher::new(&FetchSettings::from(&config))?;
    println!("Downloading election results from {}",config.base_url);
    let run = scrape_election_results(&fetcher,&config)?;
    let summary = run.outcome.summary();
    print!("{}",summary);
    for (kind,count) in summary.count_by_kind() {
        println!("{:>6} {}",count,kind);
    }
    for (year,e) in &run.national_failures {
        println!("No national summary for {} : {}",year,e);
    }
    for path in export_election_results(&run,&output_dir)? {
        println!("Wrote {}",path.display());
    }
    for result in run.outcome.dataset.results().take(5) {
        println!("{}",result);
    }
    println!("Ran successfully");
    Ok(())
}
