//! Error types for rteval.
#![allow(missing_docs)]

/// Creates the Error, ErrorKind, ResultExt, and Result types
error_chain!{
    errors {
        Parse(line: usize, reason: String) {
            description("malformed input line")
            display("line {}: {}", line, reason)
        }
        EmptyInput {
            description("input has no usable records")
        }
        EmptyBin(lower: f64, upper: f64) {
            description("bin has no members")
            display("bin [{}, {}) has no members", lower, upper)
        }
        InvalidEdges(reason: String) {
            description("bin edges cannot be used for binning")
            display("invalid bin edges: {}", reason)
        }
        InvalidBucketCount {
            description("histogram needs at least one bucket")
        }
    }

    foreign_links {
        Io(::std::io::Error);
        Csv(::csv::Error);
        Toml(::toml::de::Error);
    }
}
