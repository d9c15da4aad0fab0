// SPDX-License-Identifier: GPL-3.0-or-later

//! This module defines the scenario suite the runner executes.
//!
//! A suite is either loaded from a file or the built-in one is used, which is
//! compiled into the binary. Each scenario configures a fresh harness with one
//! return policy, then makes calls and checks the results and the call records.
//!
//! The suite file syntax is based on the YAML format.
//!
//! ```yaml
//! schema: 1
//! queue_capacity: 64
//!
//! scenarios:
//!   - name: expression with fixed mocks
//!     mock: { fixed: { add: 5, subtract: 6, multiply: 30 } }
//!     steps:
//!       - call: { expression: [2, 3, 10, 4] }
//!         expect:
//!           result: 30
//!           calls: { add: 1, subtract: 1, multiply: 1, divide: 0 }
//!
//!   - name: only multiply is mocked
//!     mock: { queue: [999] }
//!     mocked: { only: [multiply] }
//!     steps:
//!       - call: { expression: [2, 3, 10, 4] }
//!         expect:
//!           result: 999
//!           last_args: { multiply: [5, 6] }
//!
//!   - name: average with verified calls
//!     mock:
//!       expect:
//!         - { symbol: add, args: [10, 20], returns: 30 }
//!         - { symbol: add, args: [30, 30], returns: 60 }
//!         - { symbol: divide, args: [60, 3], returns: 20 }
//!     steps:
//!       - call: { average: [10, 20, 30] }
//!         expect: { result: 20 }
//! ```

// Re-Export the types and the loader module content.
pub use loader::{ConfigError, Loader};
pub use types::*;
pub use validation::Validator;

mod types {
    use crate::calc::Symbol;
    use crate::intercept::source::DEFAULT_QUEUE_CAPACITY;
    use serde::Deserialize;
    use std::collections::BTreeMap;
    use std::fmt;

    /// Represents a scenario suite.
    #[derive(Clone, Debug, PartialEq, Deserialize)]
    #[serde(deny_unknown_fields)]
    pub struct Suite {
        #[serde(deserialize_with = "validate_schema_version")]
        pub schema: u32,
        #[serde(default = "default_queue_capacity")]
        pub queue_capacity: usize,
        #[serde(default)]
        pub scenarios: Vec<Scenario>,
    }

    impl fmt::Display for Suite {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            writeln!(f, "Scenario suite:")?;
            writeln!(f, "  schema: {}", self.schema)?;
            writeln!(f, "  queue capacity: {}", self.queue_capacity)?;
            write!(f, "  scenarios: {}", self.scenarios.len())?;
            for scenario in &self.scenarios {
                write!(f, "\n    - {} ({}, {} steps)", scenario.name, scenario.mock, scenario.steps.len())?;
            }
            Ok(())
        }
    }

    /// One isolated test scenario, executed on its own harness.
    #[derive(Clone, Debug, PartialEq, Deserialize)]
    #[serde(deny_unknown_fields)]
    pub struct Scenario {
        pub name: String,
        pub mock: Mock,
        #[serde(default)]
        pub mocked: Mocked,
        #[serde(default)]
        pub steps: Vec<Step>,
    }

    /// The return policy of the scenario, with its initial content.
    #[derive(Clone, Debug, PartialEq, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum Mock {
        /// One fixed value per symbol. Symbols not listed return zero.
        Fixed(BTreeMap<Symbol, i32>),
        /// Values of the shared return queue, consumed in call order.
        Queue(Vec<i32>),
        /// Expected calls, verified at the end of the scenario.
        Expect(Vec<ExpectedCall>),
    }

    impl fmt::Display for Mock {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Mock::Fixed(values) => write!(f, "fixed values: {}", values.len()),
                Mock::Queue(values) => write!(f, "queued values: {}", values.len()),
                Mock::Expect(calls) => write!(f, "expected calls: {}", calls.len()),
            }
        }
    }

    #[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
    #[serde(deny_unknown_fields)]
    pub struct ExpectedCall {
        pub symbol: Symbol,
        pub args: [i32; 2],
        pub returns: i32,
    }

    /// Which symbols are served by the mock. The rest go to the real backend.
    #[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum Mocked {
        #[default]
        All,
        #[serde(rename = "none")]
        Nothing,
        Only(Vec<Symbol>),
    }

    #[derive(Clone, Debug, PartialEq, Deserialize)]
    #[serde(deny_unknown_fields)]
    pub struct Step {
        /// Changes the mocked symbols before the call.
        #[serde(default)]
        pub mocked: Option<Mocked>,
        pub call: Call,
        #[serde(default)]
        pub expect: Check,
    }

    #[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum Call {
        Expression([i32; 4]),
        Average([i32; 3]),
        Operation { symbol: Symbol, args: [i32; 2] },
    }

    impl fmt::Display for Call {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Call::Expression([a, b, c, d]) => write!(f, "expression({a}, {b}, {c}, {d})"),
                Call::Average([a, b, c]) => write!(f, "average({a}, {b}, {c})"),
                Call::Operation { symbol, args: [a, b] } => write!(f, "{symbol}({a}, {b})"),
            }
        }
    }

    /// What to check after a call. Everything is optional.
    #[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize)]
    #[serde(default, deny_unknown_fields)]
    pub struct Check {
        pub result: Option<i32>,
        /// Expected call counts since the start of the scenario.
        pub calls: BTreeMap<Symbol, usize>,
        /// Expected arguments of the most recent call.
        pub last_args: BTreeMap<Symbol, [i32; 2]>,
    }

    const SUPPORTED_SCHEMA_VERSION: u32 = 1;

    fn default_queue_capacity() -> usize {
        DEFAULT_QUEUE_CAPACITY
    }

    // Custom deserialization function to validate the schema version
    fn validate_schema_version<'de, D>(deserializer: D) -> Result<u32, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let schema: u32 = Deserialize::deserialize(deserializer)?;
        if schema != SUPPORTED_SCHEMA_VERSION {
            use serde::de::Error;
            Err(Error::custom(format!(
                "Unsupported schema version: {schema}. Expected: {SUPPORTED_SCHEMA_VERSION}"
            )))
        } else {
            Ok(schema)
        }
    }
}

pub mod validation {

    use super::types::*;
    use std::collections::HashSet;
    use thiserror::Error;

    /// Trait for validating configuration objects
    pub trait Validator<T> {
        type Error: std::error::Error;

        fn validate(config: &T) -> Result<(), Self::Error>;
    }

    /// Validation errors for the scenario suite
    #[derive(Debug, Error)]
    pub enum ValidationError {
        #[error("Empty value for field '{field}'")]
        Empty { field: String },
        #[error("Duplicate {field} entry at: {idx}")]
        DuplicateEntry { field: String, idx: usize },
        #[error("Invalid value for field '{field}': {message}")]
        InvalidValue { field: String, message: &'static str },
        #[error("Scenario '{scenario}' queues {count} values, but the queue capacity is {capacity}")]
        QueueOverflow { scenario: String, count: usize, capacity: usize },
        #[error("Multiple validation errors: {errors:?}")]
        Multiple { errors: Vec<ValidationError> },
    }

    /// Combinator for collecting and handling validation errors
    #[derive(Default)]
    struct ValidationCollector {
        errors: Vec<ValidationError>,
    }

    impl ValidationCollector {
        fn add(&mut self, error: ValidationError) {
            self.errors.push(error);
        }

        fn finish(mut self) -> Result<(), ValidationError> {
            match self.errors.len() {
                0 => Ok(()),
                1 => Err(self.errors.remove(0)),
                _ => Err(ValidationError::Multiple { errors: self.errors }),
            }
        }
    }

    impl Validator<Suite> for Suite {
        type Error = ValidationError;

        fn validate(config: &Suite) -> Result<(), Self::Error> {
            let mut collector = ValidationCollector::default();

            if config.queue_capacity == 0 {
                collector.add(ValidationError::InvalidValue {
                    field: "queue_capacity".into(),
                    message: "must be greater than zero",
                });
            }

            if config.scenarios.is_empty() {
                collector.add(ValidationError::Empty { field: "scenarios".into() });
            }

            // Scenario names identify the results in the report
            let mut seen_names = HashSet::new();
            for (idx, scenario) in config.scenarios.iter().enumerate() {
                if !seen_names.insert(scenario.name.as_str()) {
                    collector.add(ValidationError::DuplicateEntry { field: "scenarios".into(), idx });
                }
                validate_scenario(&mut collector, idx, scenario, config.queue_capacity);
            }

            collector.finish()
        }
    }

    fn validate_scenario(
        collector: &mut ValidationCollector,
        idx: usize,
        scenario: &Scenario,
        queue_capacity: usize,
    ) {
        if scenario.name.trim().is_empty() {
            collector.add(ValidationError::Empty { field: format!("scenarios[{idx}].name") });
        }

        if scenario.steps.is_empty() {
            collector.add(ValidationError::Empty { field: format!("scenarios[{idx}].steps") });
        }

        if let Mock::Queue(values) = &scenario.mock
            && values.len() > queue_capacity
        {
            collector.add(ValidationError::QueueOverflow {
                scenario: scenario.name.clone(),
                count: values.len(),
                capacity: queue_capacity,
            });
        }

        validate_mocked(collector, format!("scenarios[{idx}].mocked"), &scenario.mocked);
        for (step_idx, step) in scenario.steps.iter().enumerate() {
            if let Some(mocked) = &step.mocked {
                validate_mocked(collector, format!("scenarios[{idx}].steps[{step_idx}].mocked"), mocked);
            }
        }
    }

    fn validate_mocked(collector: &mut ValidationCollector, field: String, mocked: &Mocked) {
        if let Mocked::Only(symbols) = mocked {
            let mut seen = HashSet::new();
            for (idx, symbol) in symbols.iter().enumerate() {
                if !seen.insert(symbol) {
                    collector.add(ValidationError::DuplicateEntry { field: field.clone(), idx });
                }
            }
        }
    }

}

pub mod loader {
    use super::{Suite, Validator};
    use log::{debug, info};
    use std::path::{Path, PathBuf};
    use thiserror::Error;

    /// The suite used when no scenario file is given.
    const BUILTIN_SUITE: &str = include_str!("../scenarios/multi_calc.yml");
    const BUILTIN_SUITE_NAME: &str = "<built-in>";

    pub struct Loader {}

    impl Loader {
        /// Loads the suite from the specified file, or the built-in suite without one.
        pub fn load(filename: &Option<PathBuf>) -> Result<Suite, ConfigError> {
            match filename {
                Some(path) => Self::from_file(path),
                None => {
                    debug!("Scenario file not specified. Using the built-in suite.");
                    Self::builtin()
                }
            }
        }

        /// The suite which is compiled into the binary.
        pub fn builtin() -> Result<Suite, ConfigError> {
            Self::from_source(BUILTIN_SUITE, Path::new(BUILTIN_SUITE_NAME))
        }

        /// Loads the suite from the specified file.
        pub fn from_file(path: &Path) -> Result<Suite, ConfigError> {
            info!("Loading scenario file: {}", path.display());

            let content = std::fs::read_to_string(path)
                .map_err(|source| ConfigError::FileAccess { path: path.to_path_buf(), source })?;

            Self::from_source(&content, path)
        }

        fn from_source(content: &str, origin: &Path) -> Result<Suite, ConfigError> {
            let suite: Suite = Self::parse(content)
                .map_err(|source| ConfigError::ParseError { path: origin.to_path_buf(), source })?;

            // Validate the loaded suite
            Suite::validate(&suite)
                .map_err(|source| ConfigError::ValidationError { path: origin.to_path_buf(), source })?;

            Ok(suite)
        }

        /// Define the deserialization format of the scenario file.
        fn parse<T>(content: &str) -> Result<T, serde_saphyr::Error>
        where
            T: serde::de::DeserializeOwned,
        {
            serde_saphyr::from_str(content)
        }
    }

    /// Represents all possible scenario file related errors.
    #[derive(Debug, Error)]
    pub enum ConfigError {
        /// Error when opening or reading a scenario file.
        #[error("Failed to access scenario file '{path}': {source}", path = path.display())]
        FileAccess {
            path: PathBuf,
            #[source]
            source: std::io::Error,
        },
        /// Error when parsing the scenario file format.
        #[error("Failed to parse scenarios from '{path}': {source}", path = path.display())]
        ParseError {
            path: PathBuf,
            #[source]
            source: serde_saphyr::Error,
        },
        /// Error when the scenario suite validation fails.
        #[error("Scenario validation failed for '{path}': {source}", path = path.display())]
        ValidationError {
            path: PathBuf,
            #[source]
            source: super::validation::ValidationError,
        },
    }

}
