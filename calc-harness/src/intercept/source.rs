// SPDX-License-Identifier: GPL-3.0-or-later

//! Return value policies for mocked calls.
//!
//! A harness uses exactly one policy, chosen by its type parameter. Every policy
//! defines the value of a call that was never configured (zero), so a mocked call
//! always has a well-defined result.

use crate::calc::Symbol;
use std::collections::VecDeque;
use thiserror::Error;

/// Capacity of the shared return queue, unless configured otherwise.
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// Supplies the values returned by mocked calls.
pub trait ReturnSource {
    /// Produces the value of an enabled call of `symbol` with the given arguments.
    fn next_value(&mut self, symbol: Symbol, args: (i32, i32)) -> i32;

    /// Drops everything that was configured.
    fn clear(&mut self);
}

/// One settable value per symbol.
///
/// Every mocked call of a symbol returns the same value until it is changed.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FixedValues {
    values: [i32; 4],
}

impl FixedValues {
    pub fn set(&mut self, symbol: Symbol, value: i32) {
        self.values[symbol.index()] = value;
    }

    pub fn get(&self, symbol: Symbol) -> i32 {
        self.values[symbol.index()]
    }
}

impl ReturnSource for FixedValues {
    fn next_value(&mut self, symbol: Symbol, _args: (i32, i32)) -> i32 {
        self.get(symbol)
    }

    fn clear(&mut self) {
        self.values = [0; 4];
    }
}

/// A bounded FIFO of return values, shared by all symbols.
///
/// Values are consumed in call order, regardless of which symbol is called. A
/// script of values therefore follows the call order inside a composed expression:
/// the first call takes the first value, the second call the second, and so on.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReturnQueue {
    values: VecDeque<i32>,
    capacity: usize,
}

impl ReturnQueue {
    /// Creates an empty queue which accepts at most `capacity` values.
    ///
    /// Storage grows on demand; only the default capacity is reserved upfront.
    pub fn with_capacity(capacity: usize) -> Self {
        let reserved = capacity.min(DEFAULT_QUEUE_CAPACITY);
        Self { values: VecDeque::with_capacity(reserved), capacity }
    }

    /// Appends a value to the back of the queue.
    ///
    /// When the queue is full, the value is rejected and the queue is unchanged.
    pub fn push(&mut self, value: i32) -> Result<(), QueueError> {
        if self.values.len() >= self.capacity {
            log::warn!("Return queue is full, dropping value {value}");
            return Err(QueueError::Full { capacity: self.capacity, value });
        }
        self.values.push_back(value);
        Ok(())
    }

    /// Takes the value from the front of the queue, or zero when it is empty.
    pub fn pop(&mut self) -> i32 {
        self.values.pop_front().unwrap_or_else(|| {
            log::debug!("Return queue is empty, serving the default value");
            0
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for ReturnQueue {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_QUEUE_CAPACITY)
    }
}

impl ReturnSource for ReturnQueue {
    fn next_value(&mut self, _symbol: Symbol, _args: (i32, i32)) -> i32 {
        self.pop()
    }

    fn clear(&mut self) {
        self.values.clear();
    }
}

/// Errors of the shared return queue.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum QueueError {
    #[error("Return queue is full (capacity {capacity}), value {value} was dropped")]
    Full { capacity: usize, value: i32 },
}
