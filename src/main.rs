#![warn(rust_2018_idioms)]

use std::{
    io::{self, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use rayon::prelude::*;
use structopt::StructOpt;
use tracing::{error, info};

use crate::{config::Config, error::AnalysisError, report::Report};

mod config;
mod error;
mod fares;
mod logger;
mod parse;
mod report;
mod solver;

#[global_allocator]
static GLOBAL: jemallocator::Jemalloc = jemallocator::Jemalloc;

#[derive(StructOpt, Debug)]
#[structopt(
    name = "split-fare",
    about = "Find the cheapest combination of train tickets for a journey.",
    rename_all = "snake_case"
)]
struct Options {
    /// path to a TOML config file
    #[structopt(long, parse(from_os_str))]
    config: Option<PathBuf>,

    /// fare artifacts (tab-separated) to analyze, e.g. data/*.tsv
    #[structopt(parse(from_os_str), required = true, min_values = 1)]
    files: Vec<PathBuf>,
}

/// Ingests one artifact, solves it and summarises the result
fn analyze(path: &Path, config: &Config) -> Result<Report, AnalysisError> {
    let matrix = parse::read_fare_matrix(path)?;
    let route = solver::cheapest_route(&matrix);
    Ok(Report::new(path.display().to_string(), &matrix, route.as_ref(), config))
}

/// Analyses every artifact independently, in parallel on the current rayon pool.
/// Results are in input order.
fn analyze_batch(files: &[PathBuf], config: &Config) -> Vec<Result<Report, AnalysisError>> {
    files.par_iter().map(|path| analyze(path, config)).collect()
}

/// Prints each report or error in input order, returning the number of failed artifacts
fn write_batch<W: Write>(
    out: &mut W,
    files: &[PathBuf],
    results: &[Result<Report, AnalysisError>],
    config: &Config,
) -> io::Result<usize> {
    let mut failures = 0;
    for (path, result) in files.iter().zip(results) {
        match result {
            Ok(report) => write!(out, "{}", report.display(config))?,
            Err(err) => {
                failures += 1;
                error!("Failed to analyze {:?}: {}", path, err);
                writeln!(out, "\nError processing {}: {}", path.display(), err)?;
            }
        }
    }
    writeln!(out)?;
    Ok(failures)
}

fn main() -> anyhow::Result<()> {
    let options = Options::from_args();
    logger::init_logger()?;

    let config = match &options.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.jobs)
        .build()
        .context("Could not start the analysis thread pool")?;

    let results = pool.install(|| analyze_batch(&options.files, &config));
    let failures = write_batch(&mut io::stdout().lock(), &options.files, &results, &config)
        .context("Could not write the reports")?;
    info!("Analyzed {} file(s), {} failed", options.files.len(), failures);
    Ok(())
}
