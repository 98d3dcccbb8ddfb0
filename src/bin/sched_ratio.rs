//! Takes schedulability result files (one `flag utilization` pair per line)
//! and writes, for each, the percent of schedulable task sets per utilization
//! bin: `<label>-ratio.csv` in the output directory plus a table on stdout.

extern crate rayon;
extern crate rteval;
extern crate structopt;
#[macro_use]
extern crate log;

use rayon::prelude::*;
use rteval::errors::*;
use rteval::{BinEdges, BinnedRatio, Dataset, RatioTable, Setting};
use std::path::Path;
use std::process;
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
#[structopt(name = "sched-ratio")]
#[structopt(about = "Percent of schedulable task sets per utilization bin.")]
struct Opt {
    /// Setting file; built-in defaults when absent.
    #[structopt(short = "c", long = "config")]
    #[structopt(help = "Path to the setting file")]
    config: Option<String>,

    /// Overrides `schedulability.bin_width`.
    #[structopt(short = "w", long = "width")]
    #[structopt(help = "Utilization bin width")]
    width: Option<f64>,

    /// Overrides `schedulability.close_last_bin`.
    #[structopt(long = "close-last")]
    #[structopt(help = "Count utilization equal to the last edge in the last bin")]
    close_last: bool,

    /// Overrides `output_dir`.
    #[structopt(short = "o", long = "out")]
    #[structopt(help = "Output directory")]
    output_dir: Option<String>,

    /// Overrides `schedulability.inputs`.
    #[structopt(help = "Result files")]
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
    if let Some(width) = opt.width {
        setting.schedulability.bin_width = width;
    }
    if opt.close_last {
        setting.schedulability.close_last_bin = true;
    }
    if let Some(dir) = opt.output_dir {
        setting.output_dir = dir;
    }
    if !opt.inputs.is_empty() {
        setting.schedulability.inputs = opt.inputs;
    }

    let edges = setting.schedulability.edges()?;
    let outdir = Path::new(&setting.output_dir);

    let inputs = &setting.schedulability.inputs;
    let labels = rteval::unique_labels(inputs);
    let results = inputs
        .par_iter()
        .zip(labels.par_iter())
        .map(|(path, label)| {
            info!("summarizing {} as {}", path, label);
            summarize(path, label, &edges, outdir)
        })
        .collect::<Vec<_>>();

    let mut failed = 0;
    for result in results {
        match result {
            Ok((label, binned)) => println!("{}", RatioTable { label: &label, binned: &binned }),
            Err(e) => {
                report(&e);
                failed += 1;
            }
        }
    }
    Ok(failed)
}

fn summarize(
    path: &str,
    label: &str,
    edges: &BinEdges,
    outdir: &Path,
) -> Result<(String, BinnedRatio)> {
    let dataset = Dataset::from_path(path)?;
    let binned = rteval::schedulability_ratio(&dataset, edges);

    if binned.excluded() > 0 {
        warn!(
            "{}: {} of {} records fall outside the bins",
            path,
            binned.excluded(),
            dataset.len()
        );
    }
    for bin in binned.empty_bins() {
        warn!("{}: no records in [{}, {})", path, bin.lower, bin.upper);
    }

    rteval::save_ratio_csv(&binned, outdir.join(format!("{}-ratio.csv", label)))?;
    Ok((label.to_string(), binned))
}

fn report(e: &Error) {
    error!("{}", e);
    for cause in e.iter().skip(1) {
        error!("  caused by: {}", cause);
    }
}
