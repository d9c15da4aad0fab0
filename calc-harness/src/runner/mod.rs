// SPDX-License-Identifier: GPL-3.0-or-later

//! Executes the scenarios of a suite.
//!
//! Every scenario gets a fresh harness with the return policy it asks for, so no
//! state leaks from one scenario into the next. The steps call the composed
//! operations through the harness, and the results and call records are checked
//! after each step. Scenarios with expected calls are verified at teardown.

pub mod report;

use crate::calc::Calculator;
use crate::config::{Call, Check, Mock, Mocked, Scenario, Suite};
use crate::intercept::expect::Failure;
use crate::intercept::recorder::CallRecorder;
use crate::intercept::source::{ReturnQueue, ReturnSource};
use crate::intercept::{ExpectHarness, FixedHarness, MockHarness, QueueHarness};
use crate::{args, multi_calc};
use report::{ScenarioReport, SuiteReport};
use std::path::PathBuf;
use std::process::ExitCode;

/// The configured scenario run.
pub struct Runner {
    suite: Suite,
    filter: Option<String>,
    output: Option<PathBuf>,
}

impl Runner {
    /// Configure the run based on the command line arguments and the loaded suite.
    pub fn configure(args: args::Arguments, suite: Suite) -> Self {
        Self { suite, filter: args.filter, output: args.output }
    }

    /// Executes the selected scenarios, one after the other.
    pub fn execute(&self) -> SuiteReport {
        let mut report = SuiteReport::default();
        for scenario in &self.suite.scenarios {
            if !self.selected(scenario) {
                log::debug!("Skipping scenario: {}", scenario.name);
                report.skipped += 1;
                continue;
            }
            let result = run_scenario(scenario, self.suite.queue_capacity);
            if !result.passed() {
                log::warn!("Scenario failed: {}", result.name);
            }
            report.scenarios.push(result);
        }
        if report.scenarios.is_empty() {
            log::warn!("No scenario was selected to run");
        }
        log::info!(
            "Executed {} scenarios: {} passed, {} failed",
            report.scenarios.len(),
            report.passed(),
            report.failed()
        );
        report
    }

    /// It actually runs the scenarios, and reports the results.
    ///
    /// The exit code is success only when every executed scenario passed and
    /// the report file, when requested, was written.
    pub fn run(self) -> ExitCode {
        let report = self.execute();
        println!("{report}");

        if let Some(path) = &self.output {
            if let Err(error) = report.write_json(path) {
                log::error!("calc-harness: {error}");
                return ExitCode::FAILURE;
            }
            log::info!("Report written to {}", path.display());
        }

        if report.is_success() { ExitCode::SUCCESS } else { ExitCode::FAILURE }
    }

    fn selected(&self, scenario: &Scenario) -> bool {
        self.filter.as_ref().is_none_or(|filter| scenario.name.contains(filter.as_str()))
    }
}

/// Runs a single scenario on its own harness.
pub fn run_scenario(scenario: &Scenario, queue_capacity: usize) -> ScenarioReport {
    log::debug!("Running scenario: {} ({})", scenario.name, scenario.mock);

    match &scenario.mock {
        Mock::Fixed(values) => {
            let mut harness = FixedHarness::new();
            for (symbol, value) in values {
                harness.set_return(*symbol, *value);
            }
            let failures = run_steps(&mut harness, scenario);
            ScenarioReport::new(&scenario.name, "fixed", scenario.steps.len(), failures, harness.recorder())
        }
        Mock::Queue(values) => {
            let mut harness = QueueHarness::with_source(ReturnQueue::with_capacity(queue_capacity));
            let mut failures = Vec::new();
            for value in values {
                if let Err(error) = harness.push_return(*value) {
                    failures.push(error.to_string());
                }
            }
            failures.extend(run_steps(&mut harness, scenario));
            ScenarioReport::new(&scenario.name, "queue", scenario.steps.len(), failures, harness.recorder())
        }
        Mock::Expect(calls) => {
            let mut harness = ExpectHarness::new();
            for call in calls {
                let [a, b] = call.args;
                harness.expect_call(call.symbol, (a, b), call.returns);
            }
            let mut failures = run_steps(&mut harness, scenario);
            if let Err(error) = harness.verify() {
                failures.extend(error.failures.iter().map(|failure| match failure {
                    Failure::NeverCalled { .. } => format!("teardown: {failure}"),
                    _ => format!("steps: {failure}"),
                }));
            }
            log::debug!("Scenario {} finished with {}", scenario.name, harness.source());
            ScenarioReport::new(&scenario.name, "expect", scenario.steps.len(), failures, harness.recorder())
        }
    }
}

/// Executes the steps on the harness and collects the failed checks.
fn run_steps<S: ReturnSource>(harness: &mut MockHarness<S>, scenario: &Scenario) -> Vec<String> {
    apply_mocked(harness, &scenario.mocked);

    let mut failures = Vec::new();
    for (idx, step) in scenario.steps.iter().enumerate() {
        if let Some(mocked) = &step.mocked {
            apply_mocked(harness, mocked);
        }
        let result = perform(harness, step.call);
        log::debug!("Step {}: {} = {result}", idx + 1, step.call);

        failures.extend(
            check(&step.expect, result, harness.recorder())
                .into_iter()
                .map(|message| format!("step {}, {}: {message}", idx + 1, step.call)),
        );
    }
    failures
}

fn apply_mocked<S: ReturnSource, B: Calculator>(harness: &mut MockHarness<S, B>, mocked: &Mocked) {
    match mocked {
        Mocked::All => harness.enable_all(),
        Mocked::Nothing => harness.disable_all(),
        Mocked::Only(symbols) => {
            harness.disable_all();
            for symbol in symbols {
                harness.set_enabled(*symbol, true);
            }
        }
    }
}

fn perform(calculator: &mut dyn Calculator, call: Call) -> i32 {
    match call {
        Call::Expression([a, b, c, d]) => multi_calc::expression(calculator, a, b, c, d),
        Call::Average([a, b, c]) => multi_calc::average(calculator, a, b, c),
        Call::Operation { symbol, args: [a, b] } => symbol.invoke(calculator, a, b),
    }
}

fn check(expect: &Check, result: i32, recorder: &CallRecorder) -> Vec<String> {
    let mut failures = Vec::new();

    if let Some(expected) = expect.result
        && expected != result
    {
        failures.push(format!("result is {result}, expected {expected}"));
    }
    for (symbol, expected) in &expect.calls {
        let actual = recorder.call_count(*symbol);
        if actual != *expected {
            failures.push(format!("{symbol} was called {actual} times, expected {expected}"));
        }
    }
    for (symbol, [a, b]) in &expect.last_args {
        let actual = recorder.last_args(*symbol);
        if actual != (*a, *b) {
            failures.push(format!(
                "last {symbol} arguments are ({}, {}), expected ({a}, {b})",
                actual.0, actual.1
            ));
        }
    }
    failures
}
