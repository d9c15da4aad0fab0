// SPDX-License-Identifier: GPL-3.0-or-later

//! The four interceptable integer operations.
//!
//! The operations are exposed through the `Calculator` trait. Callers receive a
//! `&mut dyn Calculator` and are not aware whether the calls are served by the real
//! implementation or by a test double standing in its place.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four operations that can be intercepted.
///
/// The set is closed: the harness keeps a fixed-size table of state indexed by the
/// symbol, and there is no way to register new symbols at runtime.
#[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Symbol {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Symbol {
    /// All symbols, in table order.
    pub const ALL: [Symbol; 4] = [Symbol::Add, Symbol::Subtract, Symbol::Multiply, Symbol::Divide];

    /// Position of the symbol in per-symbol state tables.
    pub const fn index(self) -> usize {
        match self {
            Symbol::Add => 0,
            Symbol::Subtract => 1,
            Symbol::Multiply => 2,
            Symbol::Divide => 3,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Symbol::Add => "add",
            Symbol::Subtract => "subtract",
            Symbol::Multiply => "multiply",
            Symbol::Divide => "divide",
        }
    }

    /// Computes the operation with the real semantics.
    ///
    /// Results wrap on overflow. Division truncates toward zero, and dividing by
    /// zero yields zero instead of signaling an error.
    pub fn apply(self, a: i32, b: i32) -> i32 {
        match self {
            Symbol::Add => a.wrapping_add(b),
            Symbol::Subtract => a.wrapping_sub(b),
            Symbol::Multiply => a.wrapping_mul(b),
            Symbol::Divide if b == 0 => 0,
            Symbol::Divide => a.wrapping_div(b),
        }
    }

    /// Calls the method of `calculator` which belongs to this symbol.
    pub fn invoke(self, calculator: &mut dyn Calculator, a: i32, b: i32) -> i32 {
        match self {
            Symbol::Add => calculator.add(a, b),
            Symbol::Subtract => calculator.subtract(a, b),
            Symbol::Multiply => calculator.multiply(a, b),
            Symbol::Divide => calculator.divide(a, b),
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The capability seam between callers and the operation backends.
///
/// Methods take `&mut self` because test doubles record the calls they receive.
#[cfg_attr(test, mockall::automock)]
pub trait Calculator {
    fn add(&mut self, a: i32, b: i32) -> i32;
    fn subtract(&mut self, a: i32, b: i32) -> i32;
    fn multiply(&mut self, a: i32, b: i32) -> i32;
    fn divide(&mut self, a: i32, b: i32) -> i32;
}

/// The real operation backend.
#[derive(Copy, Clone, Debug, Default)]
pub struct RealCalculator;

impl Calculator for RealCalculator {
    fn add(&mut self, a: i32, b: i32) -> i32 {
        Symbol::Add.apply(a, b)
    }

    fn subtract(&mut self, a: i32, b: i32) -> i32 {
        Symbol::Subtract.apply(a, b)
    }

    fn multiply(&mut self, a: i32, b: i32) -> i32 {
        Symbol::Multiply.apply(a, b)
    }

    fn divide(&mut self, a: i32, b: i32) -> i32 {
        Symbol::Divide.apply(a, b)
    }
}
