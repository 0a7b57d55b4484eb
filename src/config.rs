// ⚙️ Run Configuration
// Data file location and display settings, from positional arguments only

use crate::report::DEFAULT_RECENT_LIMIT;
use crate::store::DEFAULT_DATA_FILE;
use anyhow::{bail, Result};
use std::path::PathBuf;

pub const USAGE: &str = "Usage: expense-tracker [-v|--verbose] [DATA_FILE]";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// CSV file holding every expense
    pub data_file: PathBuf,
    /// Rows shown by "View recent expenses"
    pub recent_limit: usize,
    /// Debug-level logging on stderr
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            recent_limit: DEFAULT_RECENT_LIMIT,
            verbose: false,
        }
    }
}

/// What the binary should do after reading its arguments
#[derive(Debug, Clone, PartialEq)]
pub enum Invocation {
    Run(Config),
    Help,
}

impl Config {
    /// Parse arguments (program name already stripped)
    pub fn from_args<I>(args: I) -> Result<Invocation>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Config::default();
        let mut data_file: Option<PathBuf> = None;

        for arg in args {
            match arg.as_str() {
                "-h" | "--help" => return Ok(Invocation::Help),
                "-v" | "--verbose" => config.verbose = true,
                flag if flag.starts_with('-') => bail!("Unknown option '{}'\n{}", flag, USAGE),
                path => {
                    if data_file.is_some() {
                        bail!("Only one data file may be given\n{}", USAGE);
                    }
                    data_file = Some(PathBuf::from(path));
                }
            }
        }

        if let Some(path) = data_file {
            config.data_file = path;
        }

        Ok(Invocation::Run(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Invocation> {
        Config::from_args(args.iter().map(|a| a.to_string()))
    }

    #[test]
    fn test_defaults() {
        let invocation = parse(&[]).unwrap();

        assert_eq!(invocation, Invocation::Run(Config::default()));
        let Invocation::Run(config) = invocation else {
            panic!("expected run");
        };
        assert_eq!(config.data_file, PathBuf::from("expenses.csv"));
        assert_eq!(config.recent_limit, 10);
        assert!(!config.verbose);
    }

    #[test]
    fn test_data_file_and_verbose() {
        let invocation = parse(&["--verbose", "/tmp/mine.csv"]).unwrap();

        assert_eq!(
            invocation,
            Invocation::Run(Config {
                data_file: PathBuf::from("/tmp/mine.csv"),
                recent_limit: 10,
                verbose: true,
            })
        );
    }

    #[test]
    fn test_help() {
        assert_eq!(parse(&["a.csv", "-h"]).unwrap(), Invocation::Help);
    }

    #[test]
    fn test_unknown_flag_and_extra_file_rejected() {
        assert!(parse(&["--json"]).is_err());
        assert!(parse(&["a.csv", "b.csv"]).is_err());
    }
}
