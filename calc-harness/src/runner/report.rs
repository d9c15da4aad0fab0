// SPDX-License-Identifier: GPL-3.0-or-later

//! Results of the executed scenarios.
//!
//! The report is printed in a human readable form, and can be written as a JSON
//! document for other tools to consume.

use crate::calc::Symbol;
use crate::intercept::recorder::{CallRecord, CallRecorder};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Passed,
    Failed,
}

/// The result of one scenario.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScenarioReport {
    pub name: String,
    /// The return policy the scenario was using.
    pub policy: &'static str,
    pub outcome: Outcome,
    /// Number of steps executed.
    pub steps: usize,
    pub failures: Vec<String>,
    /// The call records of the harness when the scenario finished.
    pub calls: BTreeMap<Symbol, CallRecord>,
}

impl ScenarioReport {
    pub fn new(
        name: &str,
        policy: &'static str,
        steps: usize,
        failures: Vec<String>,
        recorder: &CallRecorder,
    ) -> Self {
        let outcome = if failures.is_empty() { Outcome::Passed } else { Outcome::Failed };
        let calls = Symbol::ALL.iter().map(|symbol| (*symbol, recorder.get(*symbol))).collect();

        Self { name: name.to_string(), policy, outcome, steps, failures, calls }
    }

    pub fn passed(&self) -> bool {
        self.outcome == Outcome::Passed
    }
}

impl fmt::Display for ScenarioReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match self.outcome {
            Outcome::Passed => "PASS",
            Outcome::Failed => "FAIL",
        };
        write!(f, "{status} {} [{}]", self.name, self.policy)?;
        for failure in &self.failures {
            write!(f, "\n     {failure}")?;
        }
        Ok(())
    }
}

/// The result of a suite run.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SuiteReport {
    pub scenarios: Vec<ScenarioReport>,
    /// Number of scenarios not matching the name filter.
    pub skipped: usize,
}

impl SuiteReport {
    pub fn passed(&self) -> usize {
        self.scenarios.iter().filter(|scenario| scenario.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.scenarios.len() - self.passed()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// Writes the report as a JSON document into the given file.
    pub fn write_json(&self, path: &Path) -> Result<(), ReportError> {
        let file = File::create(path).map_err(|error| ReportError::Io(path.to_path_buf(), error))?;
        let mut writer = BufWriter::new(file);

        serde_json::to_writer_pretty(&mut writer, self)
            .map_err(|error| ReportError::Serialization(path.to_path_buf(), error))?;
        writer.flush().map_err(|error| ReportError::Io(path.to_path_buf(), error))
    }
}

impl fmt::Display for SuiteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for scenario in &self.scenarios {
            writeln!(f, "{scenario}")?;
        }
        write!(
            f,
            "{} scenarios: {} passed, {} failed, {} skipped",
            self.scenarios.len(),
            self.passed(),
            self.failed(),
            self.skipped
        )
    }
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to write the report file {0}: {1}")]
    Io(PathBuf, std::io::Error),
    #[error("Serialization error {0}: {1}")]
    Serialization(PathBuf, serde_json::Error),
}
