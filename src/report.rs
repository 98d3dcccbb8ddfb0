//! CSV and plain-text renderings of the summaries.

use binning::BinnedRatio;
use csv;
use errors::*;
use latency::LatencySummary;
use std::fmt;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

const BAR_WIDTH: usize = 50;

#[derive(Serialize)]
struct RatioRow {
    lower: f64,
    upper: f64,
    center: f64,
    total: usize,
    schedulable: usize,
    ratio: f64,
}

#[derive(Serialize)]
struct BucketRow {
    range_start: f64,
    range_end: f64,
    count: usize,
    percent: f64,
}

/// Writes one row per bin: `lower,upper,center,total,schedulable,ratio`.
/// The ratio of an empty bin is written as `NaN`.
pub fn write_ratio_csv<W: Write>(binned: &BinnedRatio, wtr: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(wtr);
    for bin in binned.bins() {
        writer.serialize(RatioRow {
            lower: bin.lower,
            upper: bin.upper,
            center: bin.center(),
            total: bin.total,
            schedulable: bin.schedulable,
            ratio: bin.ratio().unwrap_or(::std::f64::NAN),
        })?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes one row per bucket: `range_start,range_end,count,percent`.
pub fn write_histogram_csv<W: Write>(summary: &LatencySummary, wtr: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(wtr);
    for bucket in summary.histogram.buckets() {
        writer.serialize(BucketRow {
            range_start: bucket.range_start,
            range_end: bucket.range_end,
            count: bucket.count,
            percent: bucket.percent_of(summary.count),
        })?;
    }
    writer.flush()?;
    Ok(())
}

// Creates `path`, and its directory if missing.
fn create(path: &Path) -> Result<File> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).chain_err(|| format!("failed to create {}", dir.display()))?;
    }
    File::create(path).chain_err(|| format!("failed to create {}", path.display()))
}

/// Creates `path` (and its directory) and writes the ratio CSV into it.
pub fn save_ratio_csv<P: AsRef<Path>>(binned: &BinnedRatio, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = create(path)?;
    write_ratio_csv(binned, file)?;
    info!("wrote {}", path.display());
    Ok(())
}

/// Creates `path` (and its directory) and writes the histogram CSV into it.
pub fn save_histogram_csv<P: AsRef<Path>>(summary: &LatencySummary, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = create(path)?;
    write_histogram_csv(summary, file)?;
    info!("wrote {}", path.display());
    Ok(())
}

fn bar(fraction: f64) -> String {
    let len = (fraction.max(0.0).min(1.0) * BAR_WIDTH as f64).round() as usize;
    "#".repeat(len)
}

/// Text table of a `BinnedRatio`, one line per bin with a bar proportional to
/// the ratio.
pub struct RatioTable<'a> {
    /// Name printed in the heading, e.g. the scheduling policy.
    pub label: &'a str,

    /// The summary to render.
    pub binned: &'a BinnedRatio,
}

impl<'a> fmt::Display for RatioTable<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "{} ({} binned, {} excluded)",
            self.label,
            self.binned.binned(),
            self.binned.excluded()
        )?;
        writeln!(f, "{:>7} {:>7} {:>7} {:>8}", "center", "total", "sched", "percent")?;
        for bin in self.binned.bins() {
            match bin.ratio() {
                Ok(r) => {
                    writeln!(
                        f,
                        "{:7.02} {:7} {:7} {:7.01}% {}",
                        bin.center(),
                        bin.total,
                        bin.schedulable,
                        r * 100.0,
                        bar(r)
                    )?
                }
                Err(_) => writeln!(f, "{:7.02} {:7} {:7} {:>8}", bin.center(), 0, 0, "NaN")?,
            }
        }
        Ok(())
    }
}

/// ASCII histogram of a `LatencySummary`, each bar scaled to the fullest
/// bucket and labelled with its percent of results.
pub struct HistogramChart<'a> {
    /// Chart title.
    pub title: &'a str,

    /// The summary to render.
    pub summary: &'a LatencySummary,
}

impl<'a> fmt::Display for HistogramChart<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = self.summary;
        writeln!(f, "{}", self.title)?;
        writeln!(
            f,
            "samples: {}, mean: {:.02} cycles (+/- {:.02}), min: {}, max: {}",
            s.count,
            s.mean,
            s.std_error,
            s.min,
            s.max
        )?;

        let buckets = s.histogram.buckets();
        let fullest = buckets.iter().map(|b| b.count).max().unwrap_or(0);
        for b in buckets {
            let scale = if fullest == 0 {
                0.0
            } else {
                b.count as f64 / fullest as f64
            };
            writeln!(
                f,
                "[{:>10.01}, {:>10.01}] {:6.02}% {}",
                b.range_start,
                b.range_end,
                b.percent_of(s.count),
                bar(scale)
            )?;
        }
        Ok(())
    }
}
