//! Takes latency dumps (one cycle count per line) and writes, for each, the
//! mean and a histogram: `<label>-latency.csv` in the output directory plus an
//! ASCII chart on stdout.

extern crate rayon;
extern crate rteval;
extern crate structopt;
#[macro_use]
extern crate log;

use rayon::prelude::*;
use rteval::errors::*;
use rteval::{HistogramChart, LatencyInput, LatencySamples, LatencySummary, Setting};
use std::path::Path;
use std::process;
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
#[structopt(name = "latency")]
#[structopt(about = "Mean and histogram of measured latencies.")]
struct Opt {
    /// Setting file; built-in defaults when absent.
    #[structopt(short = "c", long = "config")]
    #[structopt(help = "Path to the setting file")]
    config: Option<String>,

    /// Overrides `latency.buckets`.
    #[structopt(short = "b", long = "buckets")]
    #[structopt(help = "Number of histogram buckets")]
    buckets: Option<usize>,

    /// Overrides `output_dir`.
    #[structopt(short = "o", long = "out")]
    #[structopt(help = "Output directory")]
    output_dir: Option<String>,

    /// Overrides `latency.inputs`; each file is titled by its name.
    #[structopt(help = "Latency dumps")]
    inputs: Vec<String>,
}

fn main() {
    if let Err(e) = rteval::init_logger() {
        eprintln!("logger already initialized: {}", e);
    }
    let opt = Opt::from_args();
    debug!("{:?}", opt);

    match run(opt) {
        Ok(0) => {}
        Ok(failed) => {
            error!("{} input file(s) could not be summarized", failed);
            process::exit(1);
        }
        Err(e) => {
            report(&e);
            process::exit(2);
        }
    }
}

/// Returns the number of input files that failed.
fn run(opt: Opt) -> Result<usize> {
    let mut setting = match opt.config {
        Some(ref path) => Setting::init(path)?,
        None => Setting::default(),
    };
    if let Some(buckets) = opt.buckets {
        setting.latency.buckets = buckets;
    }
    if let Some(dir) = opt.output_dir {
        setting.output_dir = dir;
    }
    if !opt.inputs.is_empty() {
        setting.latency.inputs = opt.inputs
            .iter()
            .map(|path| LatencyInput::untitled(path))
            .collect();
    }

    let buckets = setting.latency.buckets;
    let outdir = Path::new(&setting.output_dir);

    let labels = rteval::unique_labels(
        &setting
            .latency
            .inputs
            .iter()
            .map(|input| input.path.as_str())
            .collect::<Vec<_>>(),
    );
    let results = setting
        .latency
        .inputs
        .par_iter()
        .zip(labels.par_iter())
        .map(|(input, label)| {
            info!("summarizing {} ({}) as {}", input.path, input.title, label);
            summarize(&input.path, label, buckets, outdir)
        })
        .collect::<Vec<_>>();

    let mut failed = 0;
    for (input, result) in setting.latency.inputs.iter().zip(results) {
        match result {
            Ok(summary) => {
                println!(
                    "{}",
                    HistogramChart {
                        title: &input.title,
                        summary: &summary,
                    }
                )
            }
            Err(e) => {
                report(&e);
                failed += 1;
            }
        }
    }
    Ok(failed)
}

fn summarize(path: &str, label: &str, buckets: usize, outdir: &Path) -> Result<LatencySummary> {
    let samples = LatencySamples::from_path(path)?;
    let summary = rteval::summarize_latency(&samples, buckets)?;
    if summary.histogram.buckets().len() == 1 && buckets > 1 {
        warn!("{}: all {} samples equal {}", path, summary.count, summary.min);
    }

    rteval::save_histogram_csv(&summary, outdir.join(format!("{}-latency.csv", label)))?;
    Ok(summary)
}

fn report(e: &Error) {
    error!("{}", e);
    for cause in e.iter().skip(1) {
        error!("  caused by: {}", cause);
    }
}
