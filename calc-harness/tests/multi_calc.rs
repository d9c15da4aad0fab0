// SPDX-License-Identifier: GPL-3.0-or-later

use calc_harness::calc::{Calculator, RealCalculator, Symbol};
use calc_harness::intercept::expect::Failure;
use calc_harness::intercept::source::QueueError;
use calc_harness::intercept::{ExpectHarness, FixedHarness, QueueHarness};
use calc_harness::multi_calc::{average, expression};

fn queue_of(values: &[i32]) -> QueueHarness {
    let mut harness = QueueHarness::new();
    for value in values {
        harness.push_return(*value).unwrap();
    }
    harness
}

#[test]
fn expression_with_fixed_values() {
    let mut harness = FixedHarness::new();
    harness.set_return(Symbol::Add, 100);
    harness.set_return(Symbol::Subtract, 50);
    harness.set_return(Symbol::Multiply, 5000);

    assert_eq!(expression(&mut harness, 10, 20, 30, 40), 5000);
    assert_eq!(harness.call_count(Symbol::Add), 1);
    assert_eq!(harness.call_count(Symbol::Subtract), 1);
    assert_eq!(harness.call_count(Symbol::Multiply), 1);
    assert_eq!(harness.last_args(Symbol::Subtract), (30, 40));
    assert_eq!(harness.last_args(Symbol::Multiply), (100, 50));
}

#[test]
fn average_with_fixed_values() {
    let mut harness = FixedHarness::new();
    harness.set_return(Symbol::Add, 100);
    harness.set_return(Symbol::Divide, 33);

    assert_eq!(average(&mut harness, 10, 20, 30), 33);
    assert_eq!(harness.call_count(Symbol::Add), 2);
    assert_eq!(harness.call_count(Symbol::Divide), 1);
    assert_eq!(harness.call_count(Symbol::Multiply), 0);
    assert_eq!(harness.call_count(Symbol::Subtract), 0);
}

#[test]
fn expression_with_queued_values() {
    let cases: [([i32; 3], [i32; 4], i32); 3] = [
        ([5, 6, 30], [2, 3, 10, 4], 30),
        ([10, 0, 0], [5, 5, 7, 7], 0),
        ([3, -3, -9], [1, 2, 2, 5], -9),
    ];
    for (queued, [a, b, c, d], expected) in cases {
        let mut harness = queue_of(&queued);
        assert_eq!(expression(&mut harness, a, b, c, d), expected);
    }
}

#[test]
fn average_with_queued_values() {
    let cases: [([i32; 3], [i32; 3], i32); 3] = [
        ([30, 60, 20], [10, 20, 30], 20),
        ([2, 3, 1], [1, 1, 1], 1),
        ([999, 1000, 333], [1, 2, 3], 333),
    ];
    for (queued, [a, b, c], expected) in cases {
        let mut harness = queue_of(&queued);
        assert_eq!(average(&mut harness, a, b, c), expected);
    }
}

#[test]
fn real_implementation() {
    let mut calc = RealCalculator;
    assert_eq!(expression(&mut calc, 2, 3, 10, 4), 30);
    assert_eq!(expression(&mut calc, 5, 5, 8, 3), 50);
    assert_eq!(average(&mut calc, 10, 20, 30), 20);
    assert_eq!(average(&mut calc, 7, 8, 9), 8);
}

#[test]
fn disabled_harness_behaves_like_the_real_implementation() {
    let mut harness = FixedHarness::new().mocked_by_default(false);
    harness.set_return(Symbol::Add, 1000);

    assert_eq!(expression(&mut harness, 2, 3, 10, 4), 30);
    assert_eq!(average(&mut harness, 1, 2, 3), 2);
    assert_eq!(harness.call_count(Symbol::Add), 3);
}

#[test]
fn partial_mock_of_multiply() {
    let mut harness = queue_of(&[999]);
    harness.disable_all();
    harness.set_enabled(Symbol::Multiply, true);

    assert_eq!(expression(&mut harness, 2, 3, 10, 4), 999);
    assert_eq!(harness.last_args(Symbol::Multiply), (5, 6));
}

#[test]
fn partial_mock_of_divide() {
    let mut harness = queue_of(&[100]);
    harness.disable_all();
    harness.set_enabled(Symbol::Divide, true);

    assert_eq!(average(&mut harness, 10, 20, 30), 100);
    assert_eq!(harness.last_args(Symbol::Divide), (60, 3));
}

#[test]
fn mocked_and_real_results_differ() {
    let mut harness = FixedHarness::new();
    harness.set_return(Symbol::Add, 100);
    harness.set_return(Symbol::Divide, 66);
    assert_eq!(average(&mut harness, 1, 2, 3), 66);

    harness.reset();
    harness.disable_all();
    assert_eq!(average(&mut harness, 1, 2, 3), 2);
    assert_eq!(harness.call_count(Symbol::Divide), 1);
}

#[test]
fn queue_overflow_keeps_the_first_values() {
    let mut harness = QueueHarness::new();
    for value in 1..=64 {
        harness.push_return(value).unwrap();
    }
    assert_eq!(harness.push_return(65), Err(QueueError::Full { capacity: 64, value: 65 }));

    for expected in 1..=64 {
        assert_eq!(harness.add(0, 0), expected);
    }
    assert_eq!(harness.add(0, 0), 0);
}

#[test]
fn expectations_for_average() {
    let mut harness = ExpectHarness::new();
    harness.expect_call(Symbol::Add, (10, 20), 30);
    harness.expect_call(Symbol::Add, (30, 30), 60);
    harness.expect_call(Symbol::Divide, (60, 3), 20);

    assert_eq!(average(&mut harness, 10, 20, 30), 20);
    assert_eq!(harness.verify(), Ok(()));
}

#[test]
fn expectations_report_wrong_arguments() {
    let mut harness = ExpectHarness::new();
    harness.expect_call(Symbol::Add, (1, 2), 3);
    harness.expect_call(Symbol::Subtract, (3, 4), -1);
    harness.expect_call(Symbol::Multiply, (3, -1), -3);

    assert_eq!(expression(&mut harness, 1, 2, 4, 3), 0);

    let error = harness.verify().unwrap_err();
    assert_eq!(
        error.failures,
        vec![
            Failure::ArgumentMismatch { symbol: Symbol::Subtract, expected: (3, 4), actual: (4, 3) },
            Failure::ArgumentMismatch { symbol: Symbol::Multiply, expected: (3, -1), actual: (3, 0) },
        ]
    );
}

#[test]
fn harnesses_in_parallel_threads_are_isolated() {
    let handles: Vec<_> = (0..8)
        .map(|idx| {
            std::thread::spawn(move || {
                let mut harness = FixedHarness::new();
                harness.set_return(Symbol::Multiply, idx);
                for _ in 0..100 {
                    assert_eq!(expression(&mut harness, 1, 2, 3, 4), idx);
                }
                harness.call_count(Symbol::Multiply)
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 100);
    }
}
