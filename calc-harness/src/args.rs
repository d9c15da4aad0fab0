// SPDX-License-Identifier: GPL-3.0-or-later

//! This module contains the command line interface of the application.
//!
//! The command line parsing is implemented using the `clap` library.
//! The `Arguments` type is the structured form of the program invocation.

use clap::{ArgAction, ArgMatches, Command, arg, command, value_parser};
use std::fmt;
use std::path::PathBuf;

/// Represents the command line arguments of the application.
#[derive(Debug, PartialEq)]
pub struct Arguments {
    // The path of the scenario file. The built-in suite is used without it.
    pub scenarios: Option<PathBuf>,
    // Only the scenarios whose name contains this text are executed.
    pub filter: Option<String>,
    // The path of the JSON report file.
    pub output: Option<PathBuf>,
    // The number of times the verbose flag was given.
    pub verbose: u8,
}

impl TryFrom<ArgMatches> for Arguments {
    type Error = anyhow::Error;

    fn try_from(matches: ArgMatches) -> Result<Self, Self::Error> {
        let scenarios = matches.get_one::<PathBuf>("SCENARIOS").cloned();
        let filter = matches.get_one::<String>("filter").cloned();
        let output = matches.get_one::<PathBuf>("output").cloned();
        let verbose = matches.get_count("verbose");

        Ok(Arguments { scenarios, filter, output, verbose })
    }
}

impl fmt::Display for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Arguments:")?;
        match &self.scenarios {
            Some(path) => writeln!(f, "  scenarios: {}", path.display())?,
            None => writeln!(f, "  scenarios: built-in")?,
        }
        if let Some(filter) = &self.filter {
            writeln!(f, "  filter: {filter}")?;
        }
        if let Some(path) = &self.output {
            writeln!(f, "  output: {}", path.display())?;
        }
        write!(f, "  verbose: {}", self.verbose)
    }
}

/// Represents the command line interface of the application.
///
/// Without a scenario file the built-in suite for the composed operations runs.
pub fn cli() -> Command {
    command!()
        .about("Runs call interception scenarios against the composed calculator operations")
        .args(&[
            arg!(-v --verbose ... "Sets the level of verbosity").action(ArgAction::Count),
            arg!(-f --filter <TEXT> "Runs only the scenarios whose name contains the text"),
            arg!(-o --output <FILE> "Path of the JSON report file").value_parser(value_parser!(PathBuf)),
            arg!([SCENARIOS] "Path of the scenario file").value_parser(value_parser!(PathBuf)),
        ])
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_defaults() {
        let execution = vec!["calc-harness"];

        let matches = cli().get_matches_from(execution);
        let arguments = Arguments::try_from(matches).unwrap();

        assert_eq!(
            arguments,
            Arguments { scenarios: None, filter: None, output: None, verbose: 0 }
        );
    }

    #[test]
    fn test_full_call() {
        let execution = vec![
            "calc-harness",
            "-vv",
            "--filter",
            "average",
            "-o",
            "report.json",
            "suite.yml",
        ];

        let matches = cli().get_matches_from(execution);
        let arguments = Arguments::try_from(matches).unwrap();

        assert_eq!(
            arguments,
            Arguments {
                scenarios: Some("suite.yml".into()),
                filter: Some("average".into()),
                output: Some("report.json".into()),
                verbose: 2,
            }
        );
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        let execution = vec!["calc-harness", "--append"];

        let result = cli().try_get_matches_from(execution);

        assert!(result.is_err());
    }

    #[test]
    fn test_display() {
        let arguments = Arguments {
            scenarios: None,
            filter: Some("queue".into()),
            output: None,
            verbose: 1,
        };

        assert_eq!(
            arguments.to_string(),
            "Arguments:\n  scenarios: built-in\n  filter: queue\n  verbose: 1"
        );
    }
}
