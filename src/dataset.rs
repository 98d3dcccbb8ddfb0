//! Loading of line-oriented result files.

use errors::*;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// One simulated task set: whether it met its deadlines, and the processor
/// utilization it demanded.
///
/// ```ignore
/// 1 0.4213
/// 0 0.9871
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Record {
    /// Whether every task in the set met its deadline.
    pub schedulable: bool,

    /// Fraction of processor capacity demanded by the set.
    pub utilization: f64,
}

impl Record {
    /// Creates a new `Record`.
    pub fn new(schedulable: bool, utilization: f64) -> Self {
        Record {
            schedulable: schedulable,
            utilization: utilization,
        }
    }
}

/// The records of one schedulability result file, in file order. A dataset is
/// never empty.
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    /// Creates a dataset from records; fails with `EmptyInput` when there are
    /// none.
    pub fn new(records: Vec<Record>) -> Result<Dataset> {
        if records.is_empty() {
            bail!(ErrorKind::EmptyInput);
        }
        Ok(Dataset { records: records })
    }

    /// Take a reader (file, string, etc.) and parse one record per non-empty
    /// line.
    pub fn from_reader<R: Read>(rdr: R) -> Result<Dataset> {
        let records = read_lines(rdr, parse_record)?;
        Dataset::new(records)
    }

    /// Opens and parses a result file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Dataset> {
        let path = path.as_ref();
        let errmsg = || format!("failed to load schedulability results {}", path.display());
        let file = File::open(path).chain_err(&errmsg)?;
        let dataset = Dataset::from_reader(file).chain_err(&errmsg)?;
        debug!("loaded {} records from {}", dataset.len(), path.display());
        Ok(dataset)
    }

    /// All records in file order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false once constructed.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Derives a short label from a result file name. The text after the last
/// `_` of the file stem names the scheduling policy (`out/results_edf.txt`
/// gives `edf`); stems without `_` are used whole.
pub fn label_for<P: AsRef<Path>>(path: P) -> String {
    let stem = path.as_ref()
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    match stem.rfind('_') {
        Some(i) if i + 1 < stem.len() => stem[i + 1..].to_string(),
        _ => stem,
    }
}

/// Labels for a batch of inputs, one per path, all distinct. A label shared by
/// several paths gets the parent directory prepended (`run1/1.out` gives
/// `run1-1`); if that still collides, the input position is appended.
pub fn unique_labels<S: AsRef<str>>(paths: &[S]) -> Vec<String> {
    let paths = paths.iter().map(|p| p.as_ref()).collect::<Vec<&str>>();
    let base = paths.iter().map(|p| label_for(p)).collect::<Vec<_>>();
    let with_parent = paths
        .iter()
        .zip(base.iter())
        .map(|(p, label)| {
            if base.iter().filter(|&l| l == label).count() < 2 {
                return label.clone();
            }
            match Path::new(p).parent().and_then(|d| d.file_name()) {
                Some(dir) => format!("{}-{}", dir.to_string_lossy(), label),
                None => label.clone(),
            }
        })
        .collect::<Vec<_>>();

    with_parent
        .iter()
        .enumerate()
        .map(|(i, label)| if with_parent.iter().filter(|&l| l == label).count() < 2 {
            label.clone()
        } else {
            format!("{}-{}", label, i)
        })
        .collect()
}

/// Parses every non-empty line of `rdr` with `parse`. Line numbers in errors
/// are 1-based. Fails with `EmptyInput` if nothing was parsed.
pub(crate) fn read_lines<R, T, F>(rdr: R, parse: F) -> Result<Vec<T>>
where
    R: Read,
    F: Fn(&str) -> ::std::result::Result<T, String>,
{
    let mut items = Vec::new();
    for (i, line) in BufReader::new(rdr).lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let item = parse(line).map_err(|reason| ErrorKind::Parse(i + 1, reason))?;
        items.push(item);
    }

    if items.is_empty() {
        bail!(ErrorKind::EmptyInput);
    }
    Ok(items)
}

/// Parses a finite number; `nan` and `inf` are rejected.
pub(crate) fn parse_finite(field: &str) -> ::std::result::Result<f64, String> {
    match field.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        Ok(_) => Err(format!("{:?} is not a finite number", field)),
        Err(_) => Err(format!("{:?} is not a number", field)),
    }
}

// `<flag> <utilization>`, separated by any whitespace.
fn parse_record(line: &str) -> ::std::result::Result<Record, String> {
    let fields = line.split_whitespace().collect::<Vec<_>>();
    if fields.len() != 2 {
        return Err(format!("expected 2 fields, found {}", fields.len()));
    }

    let schedulable = match fields[0].parse::<u8>() {
        Ok(0) => false,
        Ok(1) => true,
        _ => {
            return Err(format!(
                "schedulability flag must be 0 or 1, found {:?}",
                fields[0]
            ))
        }
    };
    let utilization = parse_finite(fields[1])?;

    Ok(Record::new(schedulable, utilization))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_error_line(err: Error) -> usize {
        match *err.kind() {
            ErrorKind::Parse(line, _) => line,
            ref other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn reads_records_and_skips_blank_lines() {
        let input = "1 0.05\n0\t0.05\n\n1   0.15\n\n\n";
        let dataset = Dataset::from_reader(input.as_bytes()).unwrap();
        assert_eq!(
            dataset.records(),
            &[
                Record::new(true, 0.05),
                Record::new(false, 0.05),
                Record::new(true, 0.15),
            ]
        );
    }

    #[test]
    fn keeps_utilization_above_one() {
        let dataset = Dataset::from_reader("0 1.25\n".as_bytes()).unwrap();
        assert_eq!(dataset.records()[0], Record::new(false, 1.25));
    }

    #[test]
    fn reports_line_of_bad_field_count() {
        let err = Dataset::from_reader("1 0.1\n\n1 0.2 0.3\n".as_bytes()).unwrap_err();
        assert_eq!(parse_error_line(err), 3);
    }

    #[test]
    fn rejects_flag_other_than_zero_or_one() {
        let err = Dataset::from_reader("2 0.1\n".as_bytes()).unwrap_err();
        assert_eq!(parse_error_line(err), 1);

        let err = Dataset::from_reader("1 0.1\nyes 0.1\n".as_bytes()).unwrap_err();
        assert_eq!(parse_error_line(err), 2);
    }

    #[test]
    fn rejects_non_numeric_and_non_finite_utilization() {
        let err = Dataset::from_reader("1 abc\n".as_bytes()).unwrap_err();
        assert_eq!(parse_error_line(err), 1);

        let err = Dataset::from_reader("1 NaN\n".as_bytes()).unwrap_err();
        assert_eq!(parse_error_line(err), 1);
    }

    #[test]
    fn empty_input_is_an_error() {
        for input in &["", "\n\n  \n"] {
            let err = Dataset::from_reader(input.as_bytes()).unwrap_err();
            match *err.kind() {
                ErrorKind::EmptyInput => {}
                ref other => panic!("expected empty input, got {:?}", other),
            }
        }
        assert!(Dataset::new(Vec::new()).is_err());
    }

    #[test]
    fn labels_follow_policy_suffix() {
        assert_eq!(label_for("out/results_edf.txt"), "edf");
        assert_eq!(label_for("results_rm.txt"), "rm");
        assert_eq!(label_for("/tmp/1.out"), "1");
        assert_eq!(label_for("trailing_.txt"), "trailing_");
    }

    #[test]
    fn colliding_labels_are_made_distinct() {
        let labels = unique_labels(&[
            "a/results_edf.txt",
            "b/results_edf.txt",
            "out/results_rm.txt",
        ]);
        assert_eq!(labels, vec!["a-edf", "b-edf", "rm"]);

        let labels = unique_labels(&["run1/1.out", "run2/1.out", "2.out"]);
        assert_eq!(labels, vec!["run1-1", "run2-1", "2"]);

        let labels = unique_labels(&["x/1.out", "x/1.out", "1.out"]);
        assert_eq!(labels, vec!["x-1-0", "x-1-1", "1"]);
    }

    #[test]
    fn datasets_are_never_empty() {
        let dataset = Dataset::from_reader("1 0.5\n".as_bytes()).unwrap();
        assert_eq!(dataset.len(), 1);
        assert!(!dataset.is_empty());
    }
}
