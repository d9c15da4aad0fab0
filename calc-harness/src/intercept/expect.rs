// SPDX-License-Identifier: GPL-3.0-or-later

//! Expectation-verifying return policy.
//!
//! Every symbol owns an ordered list of expected calls. An actual call must match
//! the arguments of the oldest pending expectation of its symbol, and is served
//! the return value registered with it. Problems are not raised at the call site:
//! they are recorded, and reported together when the scenario is verified.
//!
//! Per symbol the policy moves through these phases:
//!
//! ```text
//! Idle --expect_call--> Expecting --verify--> Verified
//!                           |                    |
//!                    mismatch/unexpected     (nothing pending,
//!                           v                 no failures)
//!                         Failed <--verify-- (otherwise)
//! ```
//!
//! A symbol without expectations stays `Idle` through verification, unless it
//! was called while mocked, which fails it.

use super::source::ReturnSource;
use crate::calc::Symbol;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use thiserror::Error;

/// A registered call: the arguments it must be made with and the value it returns.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct Expectation {
    pub args: (i32, i32),
    pub returns: i32,
}

/// The verification phase of one symbol.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum Phase {
    /// Nothing was registered since the last reset.
    #[default]
    Idle,
    /// Expectations are registered and every call so far matched.
    Expecting,
    /// Verification found every expectation consumed and no failure.
    Verified,
    /// A call did not match, or verification found unconsumed expectations.
    Failed,
}

/// A single broken expectation.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum Failure {
    #[error("Unexpected call {symbol}({}, {})", .args.0, .args.1)]
    UnexpectedCall { symbol: Symbol, args: (i32, i32) },
    #[error(
        "Call {symbol}({}, {}) does not match the expected {symbol}({}, {})",
        .actual.0, .actual.1, .expected.0, .expected.1
    )]
    ArgumentMismatch { symbol: Symbol, expected: (i32, i32), actual: (i32, i32) },
    #[error("Expected call {symbol}({}, {}) was never made", .expected.0, .expected.1)]
    NeverCalled { symbol: Symbol, expected: (i32, i32) },
}

/// Every failure found when the expectations were verified.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("Expectations not met: {}", describe(.failures))]
pub struct VerificationError {
    pub failures: Vec<Failure>,
}

fn describe(failures: &[Failure]) -> String {
    failures.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

#[derive(Clone, Debug, Default)]
struct Track {
    phase: Phase,
    pending: VecDeque<Expectation>,
    failures: Vec<Failure>,
}

impl Track {
    fn expect(&mut self, expectation: Expectation) {
        self.pending.push_back(expectation);
        if matches!(self.phase, Phase::Idle | Phase::Verified) {
            self.phase = Phase::Expecting;
        }
    }

    fn call(&mut self, symbol: Symbol, args: (i32, i32)) -> i32 {
        match self.pending.pop_front() {
            Some(expectation) if expectation.args == args => expectation.returns,
            Some(expectation) => {
                self.fail(Failure::ArgumentMismatch { symbol, expected: expectation.args, actual: args });
                0
            }
            None => {
                self.fail(Failure::UnexpectedCall { symbol, args });
                0
            }
        }
    }

    fn fail(&mut self, failure: Failure) {
        log::debug!("{failure}");
        self.failures.push(failure);
        self.phase = Phase::Failed;
    }

    fn verify(&mut self, symbol: Symbol) -> &[Failure] {
        for expectation in self.pending.drain(..) {
            self.failures.push(Failure::NeverCalled { symbol, expected: expectation.args });
        }
        self.phase = match self.phase {
            _ if !self.failures.is_empty() => Phase::Failed,
            Phase::Idle => Phase::Idle,
            _ => Phase::Verified,
        };
        &self.failures
    }
}

/// Ordered expected calls for each of the four symbols.
#[derive(Clone, Debug, Default)]
pub struct Expectations {
    tracks: [Track; 4],
}

impl Expectations {
    /// Registers the next expected call of `symbol`.
    pub fn expect_call(&mut self, symbol: Symbol, args: (i32, i32), returns: i32) {
        log::debug!("Expecting {symbol}({}, {}) -> {returns}", args.0, args.1);
        self.tracks[symbol.index()].expect(Expectation { args, returns });
    }

    pub fn phase(&self, symbol: Symbol) -> Phase {
        self.tracks[symbol.index()].phase
    }

    /// Number of registered calls of `symbol` that were not made yet.
    pub fn pending(&self, symbol: Symbol) -> usize {
        self.tracks[symbol.index()].pending.len()
    }

    /// Checks that every expectation was consumed and no call went wrong.
    ///
    /// Unconsumed expectations become failures, and each symbol moves to its final
    /// phase. Failures are kept until the next `clear`, so verifying again reports
    /// the same result.
    pub fn verify(&mut self) -> Result<(), VerificationError> {
        let mut failures = Vec::new();
        for symbol in Symbol::ALL {
            failures.extend_from_slice(self.tracks[symbol.index()].verify(symbol));
        }

        if failures.is_empty() { Ok(()) } else { Err(VerificationError { failures }) }
    }
}

impl ReturnSource for Expectations {
    fn next_value(&mut self, symbol: Symbol, args: (i32, i32)) -> i32 {
        self.tracks[symbol.index()].call(symbol, args)
    }

    fn clear(&mut self) {
        self.tracks = Default::default();
    }
}

impl fmt::Display for Expectations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let states: Vec<String> = Symbol::ALL
            .iter()
            .map(|symbol| format!("{}={:?}/{}", symbol, self.phase(*symbol), self.pending(*symbol)))
            .collect();
        write!(f, "expectations [{}]", states.join(", "))
    }
}
