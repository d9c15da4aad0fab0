// SPDX-License-Identifier: GPL-3.0-or-later

//! The module contains the call interception harness.
//!
//! The harness stands between the callers of the four operations and the real
//! implementation. It implements the same `Calculator` trait as the real backend,
//! so callers receive it in place of the real one and cannot tell the difference.
//!
//! For each call it records the symbol and the arguments, then either serves a
//! mocked value or delegates to the real backend. Which one happens is decided by
//! a per-symbol enable flag. Mocked values come from the return policy selected by
//! the type parameter: fixed values, a shared queue, or verified expectations.
//!
//! All state is owned by the harness instance. A test constructs its own harness
//! and passes it by reference to the code under test, so tests running in parallel
//! never share interception state.

pub mod expect;
pub mod recorder;
pub mod source;

use crate::calc::{Calculator, RealCalculator, Symbol};
use expect::{Expectations, VerificationError};
use recorder::CallRecorder;
use source::{FixedValues, QueueError, ReturnQueue, ReturnSource};

/// Harness serving one fixed value per symbol.
pub type FixedHarness = MockHarness<FixedValues>;
/// Harness serving values from one queue shared by all symbols.
pub type QueueHarness = MockHarness<ReturnQueue>;
/// Harness verifying the arguments of every mocked call.
pub type ExpectHarness = MockHarness<Expectations>;

/// Routes calls of the four operations to a mock or to the real backend.
pub struct MockHarness<S, B = RealCalculator> {
    enabled: [bool; 4],
    mocked_by_default: bool,
    recorder: CallRecorder,
    source: S,
    backend: B,
}

impl<S: ReturnSource + Default> MockHarness<S> {
    /// Creates a harness with an empty return source, every symbol mocked.
    pub fn new() -> Self {
        Self::with_source(S::default())
    }
}

impl<S: ReturnSource + Default> Default for MockHarness<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ReturnSource> MockHarness<S> {
    pub fn with_source(source: S) -> Self {
        Self::with_backend(source, RealCalculator)
    }
}

impl<S: ReturnSource, B: Calculator> MockHarness<S, B> {
    /// Creates a harness which delegates unmocked calls to the given backend.
    pub fn with_backend(source: S, backend: B) -> Self {
        Self {
            enabled: [true; 4],
            mocked_by_default: true,
            recorder: CallRecorder::default(),
            source,
            backend,
        }
    }

    /// Sets whether symbols are mocked after construction and after each `reset`.
    pub fn mocked_by_default(mut self, mocked: bool) -> Self {
        self.mocked_by_default = mocked;
        self.enabled = [mocked; 4];
        self
    }

    pub fn enable_all(&mut self) {
        log::debug!("Mocking all symbols");
        self.enabled = [true; 4];
    }

    pub fn disable_all(&mut self) {
        log::debug!("Delegating all symbols to the real backend");
        self.enabled = [false; 4];
    }

    pub fn set_enabled(&mut self, symbol: Symbol, enabled: bool) {
        log::debug!("Mocking {symbol}: {enabled}");
        self.enabled[symbol.index()] = enabled;
    }

    pub fn is_enabled(&self, symbol: Symbol) -> bool {
        self.enabled[symbol.index()]
    }

    /// Restores the baseline between scenarios.
    ///
    /// The enable flags return to the harness default, the call records are
    /// cleared and the return source is emptied. The backend is not touched.
    pub fn reset(&mut self) {
        log::debug!("Resetting the harness");
        self.enabled = [self.mocked_by_default; 4];
        self.recorder.reset();
        self.source.clear();
    }

    pub fn call_count(&self, symbol: Symbol) -> usize {
        self.recorder.call_count(symbol)
    }

    pub fn last_args(&self, symbol: Symbol) -> (i32, i32) {
        self.recorder.last_args(symbol)
    }

    pub fn recorder(&self) -> &CallRecorder {
        &self.recorder
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    fn route(&mut self, symbol: Symbol, a: i32, b: i32) -> i32 {
        self.recorder.record(symbol, a, b);
        if self.is_enabled(symbol) {
            let value = self.source.next_value(symbol, (a, b));
            log::trace!("Intercepted {symbol}({a}, {b}) -> {value} (mock)");
            value
        } else {
            let value = symbol.invoke(&mut self.backend, a, b);
            log::trace!("Intercepted {symbol}({a}, {b}) -> {value} (real)");
            value
        }
    }
}

impl<B: Calculator> MockHarness<FixedValues, B> {
    /// Sets the value every mocked call of `symbol` returns.
    pub fn set_return(&mut self, symbol: Symbol, value: i32) {
        self.source.set(symbol, value);
    }
}

impl<B: Calculator> MockHarness<ReturnQueue, B> {
    /// Appends a value to the shared return queue.
    pub fn push_return(&mut self, value: i32) -> Result<(), QueueError> {
        self.source.push(value)
    }

    /// Empties the return queue, leaving the flags and call records alone.
    pub fn clear_returns(&mut self) {
        self.source.clear();
    }
}

impl<B: Calculator> MockHarness<Expectations, B> {
    /// Registers the next expected call of `symbol`, and the value it returns.
    pub fn expect_call(&mut self, symbol: Symbol, args: (i32, i32), returns: i32) {
        self.source.expect_call(symbol, args, returns);
    }

    /// Checks at teardown that all expected calls happened with the right arguments.
    pub fn verify(&mut self) -> Result<(), VerificationError> {
        self.source.verify()
    }
}

impl<S: ReturnSource, B: Calculator> Calculator for MockHarness<S, B> {
    fn add(&mut self, a: i32, b: i32) -> i32 {
        self.route(Symbol::Add, a, b)
    }

    fn subtract(&mut self, a: i32, b: i32) -> i32 {
        self.route(Symbol::Subtract, a, b)
    }

    fn multiply(&mut self, a: i32, b: i32) -> i32 {
        self.route(Symbol::Multiply, a, b)
    }

    fn divide(&mut self, a: i32, b: i32) -> i32 {
        self.route(Symbol::Divide, a, b)
    }
}
