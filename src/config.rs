use std::path::PathBuf;

/// File name the CSV report is written to when no output path is given
pub const DEFAULT_OUTPUT_FILE: &str = "log_analysis_results.csv";

/// Failed-login count an IP must strictly exceed to be flagged
pub const DEFAULT_FAILURE_THRESHOLD: usize = 10;

/// Settings for a single analysis run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub log_file: PathBuf,
    pub output: PathBuf,
    pub failure_threshold: usize,
    /// Write every ranked endpoint to the CSV instead of only the top one
    pub all_endpoints: bool,
}

impl Config {
    pub fn new(log_file: impl Into<PathBuf>) -> Self {
        Config {
            log_file: log_file.into(),
            output: PathBuf::from(DEFAULT_OUTPUT_FILE),
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
            all_endpoints: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::new("access.log");
        assert_eq!(config.log_file, PathBuf::from("access.log"));
        assert_eq!(config.output, PathBuf::from("log_analysis_results.csv"));
        assert_eq!(config.failure_threshold, 10);
        assert!(!config.all_endpoints);
    }
}
