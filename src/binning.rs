//! Utilization binning and per-bin schedulability ratios.

use dataset::Dataset;
use errors::*;

/// Whether the last bin also holds values equal to the last edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RightEdge {
    /// Every bin is `[lower, upper)`; values at the last edge are excluded.
    Open,

    /// The last bin is `[lower, upper]`.
    Closed,
}

impl Default for RightEdge {
    fn default() -> RightEdge {
        RightEdge::Open
    }
}

/// Sorted, unique bin edges. `n` edges make `n - 1` bins.
#[derive(Clone, Debug, PartialEq)]
pub struct BinEdges {
    edges: Vec<f64>,
    right: RightEdge,
}

impl BinEdges {
    /// Creates bin edges from an explicit list. The list needs at least two
    /// finite, strictly ascending values.
    pub fn new(edges: Vec<f64>) -> Result<BinEdges> {
        if edges.len() < 2 {
            bail!(ErrorKind::InvalidEdges(
                format!("need at least 2 edges, found {}", edges.len()),
            ));
        }
        if let Some(e) = edges.iter().find(|e| !e.is_finite()) {
            bail!(ErrorKind::InvalidEdges(format!("{} is not finite", e)));
        }
        if let Some(w) = edges.windows(2).find(|w| w[0] >= w[1]) {
            bail!(ErrorKind::InvalidEdges(
                format!("edges must be strictly ascending, found {} before {}", w[0], w[1]),
            ));
        }

        Ok(BinEdges {
            edges: edges,
            right: RightEdge::Open,
        })
    }

    /// Creates edges `start, start + width, ..., end`. The width must divide
    /// the range.
    ///
    /// When `start` and `width` are short decimals, edge `k` is computed as
    /// `(S + k * W) / 10^d` with `S` and `W` the integers `start * 10^d` and
    /// `width * 10^d`. Each edge is then the float nearest its decimal value,
    /// so `uniform(0.1, 1.0, 0.1)` contains exactly the value `0.3` parses to.
    pub fn uniform(start: f64, end: f64, width: f64) -> Result<BinEdges> {
        if !(width > 0.0) || !width.is_finite() {
            bail!(ErrorKind::InvalidEdges(format!("bin width {} must be positive", width)));
        }
        if !(end > start) {
            bail!(ErrorKind::InvalidEdges(format!("range [{}, {}] is empty", start, end)));
        }

        let span = end - start;
        let n = (span / width).round();
        if n < 1.0 || (n * width - span).abs() > 1e-9 * span.max(1.0) {
            bail!(ErrorKind::InvalidEdges(format!(
                "bin width {} does not divide [{}, {}]",
                width,
                start,
                end
            )));
        }

        let n = n as usize;
        let edge = |k: usize| match decimal_scale(&[start, width]) {
            Some(scale) => {
                ((start * scale).round() + k as f64 * (width * scale).round()) / scale
            }
            None => start + span * k as f64 / n as f64,
        };
        let edges = (0..n + 1)
            .map(|k| if k == n { end } else { edge(k) })
            .collect::<Vec<_>>();
        BinEdges::new(edges)
    }

    /// Sets the right edge policy of the last bin.
    pub fn with_right_edge(mut self, right: RightEdge) -> BinEdges {
        self.right = right;
        self
    }

    /// The edge values.
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Number of bins (one fewer than the number of edges).
    pub fn num_bins(&self) -> usize {
        self.edges.len() - 1
    }

    /// Finds the bin containing `value`: the bin before the first edge
    /// strictly greater than it. Returns `None` for values outside the edge
    /// range (and for NaN).
    pub fn bin_index(&self, value: f64) -> Option<usize> {
        let pos = self.edges.partition_point(|&e| e <= value);
        let last = self.edges.len();
        if pos == 0 {
            None
        } else if pos < last {
            Some(pos - 1)
        } else if self.right == RightEdge::Closed && value == self.edges[last - 1] {
            Some(last - 2)
        } else {
            None
        }
    }
}

// Smallest power of ten (up to 10^12) that turns every value into an integer
// exactly representable as f64.
fn decimal_scale(values: &[f64]) -> Option<f64> {
    (0..13).map(|d| 10f64.powi(d)).find(|&scale| {
        values.iter().all(|&v| {
            let scaled = v * scale;
            scaled.abs() < 9.0e15 && (scaled - scaled.round()).abs() <= 1e-9 * scaled.abs().max(1.0)
        })
    })
}

/// Counts of one utilization bin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BinSummary {
    /// Lower edge (inclusive).
    pub lower: f64,

    /// Upper edge (exclusive, unless it is the closed last bin).
    pub upper: f64,

    /// Records in this bin.
    pub total: usize,

    /// Schedulable records in this bin.
    pub schedulable: usize,
}

impl BinSummary {
    /// Midpoint of the bin, where a chart places its point.
    pub fn center(&self) -> f64 {
        (self.lower + self.upper) / 2.0
    }

    /// True if no record fell into this bin.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Fraction of schedulable records. An empty bin has no ratio and returns
    /// `EmptyBin`.
    pub fn ratio(&self) -> Result<f64> {
        if self.is_empty() {
            bail!(ErrorKind::EmptyBin(self.lower, self.upper));
        }
        Ok(self.schedulable as f64 / self.total as f64)
    }
}

/// Per-bin summaries of one dataset, in ascending edge order. Empty bins are
/// kept, not omitted.
#[derive(Clone, Debug, PartialEq)]
pub struct BinnedRatio {
    bins: Vec<BinSummary>,
    excluded: usize,
}

impl BinnedRatio {
    /// One summary per consecutive edge pair.
    pub fn bins(&self) -> &[BinSummary] {
        &self.bins
    }

    /// Records that fell outside every bin.
    pub fn excluded(&self) -> usize {
        self.excluded
    }

    /// Records that fell into some bin.
    pub fn binned(&self) -> usize {
        self.bins.iter().map(|b| b.total).sum()
    }

    /// Bins that no record fell into.
    pub fn empty_bins(&self) -> Vec<&BinSummary> {
        self.bins.iter().filter(|b| b.is_empty()).collect()
    }
}

/// Partitions the dataset into the bins given by `edges` and counts
/// schedulable records per bin.
pub fn schedulability_ratio(dataset: &Dataset, edges: &BinEdges) -> BinnedRatio {
    let mut bins = edges
        .edges()
        .windows(2)
        .map(|w| {
            BinSummary {
                lower: w[0],
                upper: w[1],
                total: 0,
                schedulable: 0,
            }
        })
        .collect::<Vec<_>>();
    let mut excluded = 0;

    for record in dataset.records() {
        match edges.bin_index(record.utilization) {
            Some(i) => {
                bins[i].total += 1;
                if record.schedulable {
                    bins[i].schedulable += 1;
                }
            }
            None => excluded += 1,
        }
    }

    debug!(
        "binned {} records into {} bins, {} excluded",
        dataset.len() - excluded,
        bins.len(),
        excluded
    );
    BinnedRatio {
        bins: bins,
        excluded: excluded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dataset::Record;

    fn dataset(records: &[(bool, f64)]) -> Dataset {
        Dataset::new(
            records
                .iter()
                .map(|&(s, u)| Record::new(s, u))
                .collect(),
        ).unwrap()
    }

    fn is_invalid_edges(r: Result<BinEdges>) -> bool {
        match r {
            Err(Error(ErrorKind::InvalidEdges(_), _)) => true,
            _ => false,
        }
    }

    #[test]
    fn ratio_per_bin() {
        let data = dataset(&[(true, 0.05), (false, 0.05), (true, 0.15)]);
        let edges = BinEdges::new(vec![0.0, 0.1, 0.2]).unwrap();
        let binned = schedulability_ratio(&data, &edges);

        assert_eq!(binned.bins().len(), 2);
        assert_eq!(binned.bins()[0].ratio().unwrap(), 0.5);
        assert_eq!(binned.bins()[1].ratio().unwrap(), 1.0);
        assert_eq!(binned.excluded(), 0);
    }

    #[test]
    fn value_on_edge_goes_to_bin_starting_there() {
        let edges = BinEdges::uniform(0.0, 1.0, 0.1).unwrap();
        assert_eq!(edges.bin_index(0.1), Some(1));
        assert_eq!(edges.bin_index(0.3), Some(3));
        assert_eq!(edges.bin_index(0.7), Some(7));
        assert_eq!(edges.bin_index(0.19), Some(1));
        assert_eq!(edges.bin_index(0.0), Some(0));
    }

    #[test]
    fn edges_from_nonzero_start_match_decimal_literals() {
        let edges = BinEdges::uniform(0.1, 1.0, 0.1).unwrap();
        assert_eq!(
            edges.edges(),
            &[0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0]
        );
        assert_eq!(edges.bin_index(0.3), Some(2));
        assert_eq!(edges.bin_index(0.7), Some(6));
        assert_eq!(edges.bin_index(0.8), Some(7));

        let edges = BinEdges::uniform(0.25, 0.75, 0.05).unwrap();
        assert_eq!(edges.num_bins(), 10);
        assert_eq!(edges.bin_index(0.35), Some(2));
        assert_eq!(edges.bin_index(0.55), Some(6));
    }

    #[test]
    fn values_outside_edges_are_excluded() {
        let edges = BinEdges::uniform(0.0, 1.0, 0.1).unwrap();
        assert_eq!(edges.bin_index(-0.01), None);
        assert_eq!(edges.bin_index(1.0), None);
        assert_eq!(edges.bin_index(1.3), None);
        assert_eq!(edges.bin_index(::std::f64::NAN), None);

        let data = dataset(&[(true, -0.5), (true, 0.5), (false, 1.0), (false, 2.0)]);
        let binned = schedulability_ratio(&data, &edges);
        assert_eq!(binned.excluded(), 3);
        assert_eq!(binned.binned(), 1);
    }

    #[test]
    fn closed_last_bin_keeps_last_edge() {
        let edges = BinEdges::uniform(0.0, 1.0, 0.1)
            .unwrap()
            .with_right_edge(RightEdge::Closed);
        assert_eq!(edges.bin_index(1.0), Some(9));
        assert_eq!(edges.bin_index(1.0001), None);
    }

    #[test]
    fn uniform_edges() {
        let edges = BinEdges::uniform(0.0, 1.0, 0.1).unwrap();
        assert_eq!(edges.num_bins(), 10);
        assert_eq!(
            edges.edges(),
            &[0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0]
        );
    }

    #[test]
    fn rejects_unusable_edges() {
        assert!(is_invalid_edges(BinEdges::new(vec![0.0])));
        assert!(is_invalid_edges(BinEdges::new(vec![0.0, 0.1, 0.1])));
        assert!(is_invalid_edges(BinEdges::new(vec![0.2, 0.1])));
        assert!(is_invalid_edges(BinEdges::new(vec![0.0, ::std::f64::INFINITY])));
        assert!(is_invalid_edges(BinEdges::uniform(0.0, 1.0, 0.0)));
        assert!(is_invalid_edges(BinEdges::uniform(0.0, 1.0, 0.3)));
        assert!(is_invalid_edges(BinEdges::uniform(1.0, 1.0, 0.1)));
    }

    #[test]
    fn empty_bin_has_no_ratio() {
        let data = dataset(&[(true, 0.05)]);
        let edges = BinEdges::new(vec![0.0, 0.1, 0.2]).unwrap();
        let binned = schedulability_ratio(&data, &edges);

        assert_eq!(binned.empty_bins().len(), 1);
        match binned.bins()[1].ratio() {
            Err(Error(ErrorKind::EmptyBin(lower, upper), _)) => {
                assert_eq!((lower, upper), (0.1, 0.2));
            }
            other => panic!("expected empty bin, got {:?}", other),
        }
    }

    #[test]
    fn counts_add_up_and_ratios_are_bounded() {
        let records = (0..200)
            .map(|i| (i % 3 != 0, i as f64 / 150.0 - 0.1))
            .collect::<Vec<_>>();
        let data = dataset(&records);
        let edges = BinEdges::uniform(0.0, 1.0, 0.1).unwrap();
        let binned = schedulability_ratio(&data, &edges);

        assert_eq!(binned.binned() + binned.excluded(), data.len());
        for bin in binned.bins().iter().filter(|b| !b.is_empty()) {
            let r = bin.ratio().unwrap();
            assert!(r >= 0.0 && r <= 1.0);
        }
    }

    #[test]
    fn repeated_runs_agree() {
        let data = dataset(&[(true, 0.42), (false, 0.91), (true, 0.13), (false, 0.42)]);
        let edges = BinEdges::uniform(0.0, 1.0, 0.1).unwrap();
        assert_eq!(
            schedulability_ratio(&data, &edges),
            schedulability_ratio(&data, &edges)
        );
    }
}
