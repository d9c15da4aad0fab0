// SPDX-License-Identifier: GPL-3.0-or-later

use crate::calc::Symbol;
use serde::Serialize;
use std::fmt;

/// What the recorder knows about the calls of one symbol.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct CallRecord {
    /// Number of calls since the last reset.
    pub count: usize,
    /// Arguments of the most recent call, `(0, 0)` when there was none.
    pub last_args: (i32, i32),
}

/// Records every intercepted call, whether it was mocked or delegated.
///
/// The counts only grow between resets, and the arguments are always overwritten
/// with the latest call. No history is kept beyond the most recent call.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CallRecorder {
    records: [CallRecord; 4],
}

impl CallRecorder {
    pub fn record(&mut self, symbol: Symbol, a: i32, b: i32) {
        let record = &mut self.records[symbol.index()];
        record.count += 1;
        record.last_args = (a, b);
    }

    pub fn call_count(&self, symbol: Symbol) -> usize {
        self.records[symbol.index()].count
    }

    pub fn last_args(&self, symbol: Symbol) -> (i32, i32) {
        self.records[symbol.index()].last_args
    }

    pub fn get(&self, symbol: Symbol) -> CallRecord {
        self.records[symbol.index()]
    }

    /// Number of calls across all symbols.
    pub fn total_calls(&self) -> usize {
        self.records.iter().map(|record| record.count).sum()
    }

    pub fn reset(&mut self) {
        self.records = Default::default();
    }
}

impl fmt::Display for CallRecorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let calls: Vec<String> = Symbol::ALL
            .iter()
            .map(|symbol| format!("{}={}", symbol, self.call_count(*symbol)))
            .collect();
        write!(f, "calls [{}]", calls.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_recorder_is_empty() {
        let recorder = CallRecorder::default();
        for symbol in Symbol::ALL {
            assert_eq!(recorder.call_count(symbol), 0);
            assert_eq!(recorder.last_args(symbol), (0, 0));
        }
        assert_eq!(recorder.total_calls(), 0);
    }

    #[test]
    fn test_record_counts_and_overwrites_arguments() {
        let mut recorder = CallRecorder::default();
        recorder.record(Symbol::Add, 1, 2);
        recorder.record(Symbol::Add, 30, 3);
        recorder.record(Symbol::Divide, 33, 3);

        assert_eq!(recorder.get(Symbol::Add), CallRecord { count: 2, last_args: (30, 3) });
        assert_eq!(recorder.get(Symbol::Divide), CallRecord { count: 1, last_args: (33, 3) });
        assert_eq!(recorder.call_count(Symbol::Subtract), 0);
        assert_eq!(recorder.total_calls(), 3);
    }

    #[test]
    fn test_reset_restores_baseline() {
        let mut recorder = CallRecorder::default();
        recorder.record(Symbol::Multiply, 5, 6);
        recorder.reset();

        assert_eq!(recorder, CallRecorder::default());
    }

    #[test]
    fn test_display_format() {
        let mut recorder = CallRecorder::default();
        recorder.record(Symbol::Add, 1, 2);
        recorder.record(Symbol::Multiply, 3, 4);

        assert_eq!(recorder.to_string(), "calls [add=1, subtract=0, multiply=1, divide=0]");
    }
}
