//! Summaries of real-time scheduling experiment results.
//!
//! Two independent routines live here:
//!
//! * [schedulability_ratio](fn.schedulability_ratio.html) bins simulated task
//!   sets by utilization and reports the fraction that met their deadlines.
//! * [summarize_latency](fn.summarize_latency.html) reports the mean and the
//!   distribution of measured cycle counts.
//!
//! Both are pure functions over data loaded by [Dataset](struct.Dataset.html)
//! and [LatencySamples](struct.LatencySamples.html). The `report` functions
//! render the results as CSV or plain text.
#![recursion_limit = "1024"]
#![deny(missing_docs)]

extern crate average;
extern crate chrono;
extern crate csv;
extern crate env_logger;
#[macro_use]
extern crate error_chain;
extern crate itertools;
#[macro_use]
extern crate log;
extern crate serde;
#[macro_use]
extern crate serde_derive;
extern crate toml;

pub mod errors;

mod dataset;
pub use dataset::Dataset;
pub use dataset::Record;
pub use dataset::label_for;
pub use dataset::unique_labels;

mod binning;
pub use binning::BinEdges;
pub use binning::BinSummary;
pub use binning::BinnedRatio;
pub use binning::RightEdge;
pub use binning::schedulability_ratio;

mod latency;
pub use latency::Bucket;
pub use latency::DEFAULT_BUCKETS;
pub use latency::Histogram;
pub use latency::LatencySamples;
pub use latency::LatencySummary;
pub use latency::summarize_latency;

mod report;
pub use report::HistogramChart;
pub use report::RatioTable;
pub use report::save_histogram_csv;
pub use report::save_ratio_csv;
pub use report::write_histogram_csv;
pub use report::write_ratio_csv;

mod setting;
pub use setting::LatencyInput;
pub use setting::LatencySetting;
pub use setting::SchedulabilitySetting;
pub use setting::Setting;

mod logger;
pub use logger::init_logger;
