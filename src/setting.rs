//! Input files and binning parameters in TOML. Every field has a default, so
//! an empty file (or no file at all) reproduces the stock experiment layout.

use binning::{BinEdges, RightEdge};
use errors::*;
use latency::DEFAULT_BUCKETS;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use toml;

/// The whole setting file.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Setting {
    /// Directory the CSV summaries are written to.
    pub output_dir: String,

    /// Schedulability ratio inputs and bins.
    pub schedulability: SchedulabilitySetting,

    /// Latency summary inputs and buckets.
    pub latency: LatencySetting,
}

/// The `[schedulability]` table.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SchedulabilitySetting {
    /// Result files with one `flag utilization` pair per line.
    pub inputs: Vec<String>,

    /// First bin edge.
    pub bin_start: f64,

    /// Last bin edge.
    pub bin_end: f64,

    /// Width of each bin.
    pub bin_width: f64,

    /// Whether the last bin also holds `bin_end`.
    pub close_last_bin: bool,
}

/// The `[latency]` table.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LatencySetting {
    /// Number of histogram buckets.
    pub buckets: usize,

    /// Latency dumps and the chart title of each.
    pub inputs: Vec<LatencyInput>,
}

/// One `[[latency.inputs]]` entry.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct LatencyInput {
    /// Path to the dump, one cycle count per line.
    pub path: String,

    /// Chart title; the file name when omitted.
    #[serde(default)]
    pub title: String,
}

impl LatencyInput {
    /// An input titled after its file name.
    pub fn untitled(path: &str) -> LatencyInput {
        let title = Path::new(path)
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string());
        LatencyInput {
            path: path.to_string(),
            title: title,
        }
    }

    fn titled(path: &str, title: &str) -> LatencyInput {
        LatencyInput {
            path: path.to_string(),
            title: title.to_string(),
        }
    }
}

impl Default for Setting {
    fn default() -> Setting {
        Setting {
            output_dir: ".".to_string(),
            schedulability: SchedulabilitySetting::default(),
            latency: LatencySetting::default(),
        }
    }
}

impl Default for SchedulabilitySetting {
    fn default() -> SchedulabilitySetting {
        SchedulabilitySetting {
            inputs: vec![
                "out/results_edf.txt".to_string(),
                "out/results_rm.txt".to_string(),
                "out/results_dm.txt".to_string(),
            ],
            bin_start: 0.0,
            bin_end: 1.0,
            bin_width: 0.1,
            close_last_bin: false,
        }
    }
}

impl Default for LatencySetting {
    fn default() -> LatencySetting {
        LatencySetting {
            buckets: DEFAULT_BUCKETS,
            inputs: vec![
                LatencyInput::titled("1.out", "Interrupt Latency Without Background Computing"),
                LatencyInput::titled("2.out", "Interrupt Latency With Background Computing"),
                LatencyInput::titled("3.out", "Context Switch Overhead"),
            ],
        }
    }
}

impl SchedulabilitySetting {
    /// Bin edges described by this table.
    pub fn edges(&self) -> Result<BinEdges> {
        let right = if self.close_last_bin {
            RightEdge::Closed
        } else {
            RightEdge::Open
        };
        let edges = BinEdges::uniform(self.bin_start, self.bin_end, self.bin_width)?;
        Ok(edges.with_right_edge(right))
    }
}

impl Setting {
    /// Initialize from a file.
    pub fn init<P: AsRef<Path>>(path: P) -> Result<Setting> {
        let path = path.as_ref();
        let mut file = File::open(path).chain_err(|| format!("no setting file {}", path.display()))?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        let setting = Setting::parse(&contents)
            .chain_err(|| format!("malformed setting file {}", path.display()))?;
        debug!("setting from {}: {:?}", path.display(), setting);
        Ok(setting)
    }

    /// Parses TOML text; missing fields take their defaults.
    pub fn parse(contents: &str) -> Result<Setting> {
        let setting: Setting = toml::from_str(contents)?;
        Ok(setting.fill_titles())
    }

    fn fill_titles(mut self) -> Setting {
        for input in self.latency.inputs.iter_mut() {
            if input.title.is_empty() {
                *input = LatencyInput::untitled(&input.path);
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let setting = Setting::parse("").unwrap();
        assert_eq!(setting, Setting::default());
        assert_eq!(setting.latency.buckets, 15);
        assert_eq!(setting.latency.inputs.len(), 3);
        assert_eq!(setting.schedulability.edges().unwrap().num_bins(), 10);
    }

    #[test]
    fn partial_tables_keep_other_defaults() {
        let setting = Setting::parse(
            r#"
output_dir = "plots"

[schedulability]
inputs = ["a_edf.txt"]
bin_width = 0.25
close_last_bin = true

[latency]
buckets = 20

[[latency.inputs]]
path = "dumps/1.out"
"#,
        ).unwrap();

        assert_eq!(setting.output_dir, "plots");
        assert_eq!(setting.schedulability.inputs, vec!["a_edf.txt".to_string()]);
        assert_eq!(setting.schedulability.bin_end, 1.0);

        let edges = setting.schedulability.edges().unwrap();
        assert_eq!(edges.edges(), &[0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(edges.bin_index(1.0), Some(3));

        assert_eq!(setting.latency.buckets, 20);
        assert_eq!(
            setting.latency.inputs,
            vec![LatencyInput::titled("dumps/1.out", "1.out")]
        );
    }

    #[test]
    fn malformed_toml_is_an_error() {
        match Setting::parse("output_dir = [") {
            Err(Error(ErrorKind::Toml(_), _)) => {}
            other => panic!("expected toml error, got {:?}", other),
        }
        assert!(Setting::parse("[latency]\nbuckets = \"many\"").is_err());
    }

    #[test]
    fn bad_bin_width_is_reported_when_building_edges() {
        let setting = Setting::parse("[schedulability]\nbin_width = 0.3\n").unwrap();
        assert!(setting.schedulability.edges().is_err());
    }
}
