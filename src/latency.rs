//! Latency samples, their mean and their histogram.

use average::{Estimate, MeanWithError};
use dataset::{parse_finite, read_lines};
use errors::*;
use itertools::{Itertools, MinMaxResult};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Number of histogram buckets when none is configured.
pub const DEFAULT_BUCKETS: usize = 15;

/// Measured cycle counts, one per line of a latency dump. Never empty.
#[derive(Clone, Debug, PartialEq)]
pub struct LatencySamples {
    samples: Vec<f64>,
}

impl LatencySamples {
    /// Creates a sample set; fails with `EmptyInput` when there are no
    /// samples.
    pub fn new(samples: Vec<f64>) -> Result<LatencySamples> {
        if samples.is_empty() {
            bail!(ErrorKind::EmptyInput);
        }
        Ok(LatencySamples { samples: samples })
    }

    /// Take a reader and parse one number per non-empty line.
    pub fn from_reader<R: Read>(rdr: R) -> Result<LatencySamples> {
        let samples = read_lines(rdr, parse_finite)?;
        LatencySamples::new(samples)
    }

    /// Opens and parses a latency dump.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<LatencySamples> {
        let path = path.as_ref();
        let errmsg = || format!("failed to load latency samples {}", path.display());
        let file = File::open(path).chain_err(&errmsg)?;
        let samples = LatencySamples::from_reader(file).chain_err(&errmsg)?;
        debug!("loaded {} samples from {}", samples.len(), path.display());
        Ok(samples)
    }

    /// The samples in file order.
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false once constructed.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// One histogram bucket. Buckets are `[range_start, range_end)`, except the
/// last one which also holds `range_end`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bucket {
    /// Lower bound.
    pub range_start: f64,

    /// Upper bound.
    pub range_end: f64,

    /// Samples in this bucket.
    pub count: usize,
}

impl Bucket {
    /// Share of `total` samples in this bucket, in percent.
    pub fn percent_of(&self, total: usize) -> f64 {
        if total == 0 {
            0.0
        } else {
            self.count as f64 * 100.0 / total as f64
        }
    }
}

/// Raw-count frequency distribution over equal-width buckets spanning the
/// observed range.
#[derive(Clone, Debug, PartialEq)]
pub struct Histogram {
    buckets: Vec<Bucket>,
}

impl Histogram {
    /// Builds a histogram of `bucket_count` buckets from `min` to `max` of
    /// `samples`.
    ///
    /// When every sample has the same value there is no range to divide, so
    /// the histogram is a single zero-width bucket `[v, v]` holding all
    /// samples.
    pub fn build(samples: &[f64], bucket_count: usize) -> Result<Histogram> {
        if bucket_count == 0 {
            bail!(ErrorKind::InvalidBucketCount);
        }
        let (min, max) = match samples.iter().cloned().minmax() {
            MinMaxResult::NoElements => bail!(ErrorKind::EmptyInput),
            MinMaxResult::OneElement(v) => (v, v),
            MinMaxResult::MinMax(min, max) => (min, max),
        };

        if min == max {
            return Ok(Histogram {
                buckets: vec![
                    Bucket {
                        range_start: min,
                        range_end: max,
                        count: samples.len(),
                    },
                ],
            });
        }

        // edges interpolate between min and max so that a range wider than
        // f64::MAX still gives finite, ordered edges
        let n = bucket_count;
        let edges = (0..n + 1)
            .map(|i| if i == 0 {
                min
            } else if i == n {
                max
            } else {
                let t = i as f64 / n as f64;
                min * (1.0 - t) + max * t
            })
            .collect::<Vec<_>>();

        let mut counts = vec![0; n];
        for &v in samples {
            // interior edges at or below v; max falls in the last bucket
            let i = edges[1..n].partition_point(|&e| e <= v);
            counts[i] += 1;
        }

        let buckets = counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| {
                Bucket {
                    range_start: edges[i],
                    range_end: edges[i + 1],
                    count: count,
                }
            })
            .collect();
        Ok(Histogram { buckets: buckets })
    }

    /// Buckets in ascending order.
    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    /// Total number of samples counted.
    pub fn total(&self) -> usize {
        self.buckets.iter().map(|b| b.count).sum()
    }

    /// Width shared by all buckets (0 for the single-value case).
    pub fn bucket_width(&self) -> f64 {
        let first = self.buckets[0].range_start;
        let last = self.buckets[self.buckets.len() - 1].range_end;
        (last - first) / self.buckets.len() as f64
    }
}

/// Mean and distribution of one latency sample set.
#[derive(Clone, Debug, PartialEq)]
pub struct LatencySummary {
    /// Number of samples.
    pub count: usize,

    /// Arithmetic mean.
    pub mean: f64,

    /// Standard error of the mean.
    pub std_error: f64,

    /// Smallest sample.
    pub min: f64,

    /// Largest sample.
    pub max: f64,

    /// Distribution of the samples.
    pub histogram: Histogram,
}

/// Computes the mean and the histogram of `samples`.
pub fn summarize_latency(samples: &LatencySamples, bucket_count: usize) -> Result<LatencySummary> {
    let histogram = Histogram::build(samples.samples(), bucket_count)?;

    let mut m = MeanWithError::new();
    for &v in samples.samples() {
        m.add(v);
    }

    let buckets = histogram.buckets();
    Ok(LatencySummary {
        count: samples.len(),
        mean: m.mean(),
        std_error: m.error(),
        min: buckets[0].range_start,
        max: buckets[buckets.len() - 1].range_end,
        histogram: histogram,
    })
}
