// SPDX-License-Identifier: GPL-3.0-or-later

//! Expressions composed from the four operations.
//!
//! These functions hold no state. Every arithmetic step goes through the given
//! calculator, so a test double observes each call in the order listed here.

use crate::calc::Calculator;

/// Computes `(a + b) * (c - d)`.
///
/// Calls `add(a, b)`, then `subtract(c, d)`, then `multiply` on the two results.
pub fn expression(calc: &mut dyn Calculator, a: i32, b: i32, c: i32, d: i32) -> i32 {
    let sum = calc.add(a, b);
    let difference = calc.subtract(c, d);
    calc.multiply(sum, difference)
}

/// Computes `(a + b + c) / 3`, truncated like the underlying division.
///
/// Calls `add(a, b)`, then `add(sum, c)`, then `divide(total, 3)`.
pub fn average(calc: &mut dyn Calculator, a: i32, b: i32, c: i32) -> i32 {
    let sum = calc.add(a, b);
    let total = calc.add(sum, c);
    calc.divide(total, 3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::{MockCalculator, RealCalculator};
    use mockall::Sequence;
    use mockall::predicate::eq;

    #[test]
    fn test_expression_with_real_calculator() {
        let mut calc = RealCalculator;
        assert_eq!(expression(&mut calc, 2, 3, 10, 4), 30);
        assert_eq!(expression(&mut calc, 5, 5, 8, 3), 50);
        assert_eq!(expression(&mut calc, 5, 5, 7, 7), 0);
    }

    #[test]
    fn test_average_with_real_calculator() {
        let mut calc = RealCalculator;
        assert_eq!(average(&mut calc, 1, 2, 3), 2);
        assert_eq!(average(&mut calc, 10, 20, 30), 20);
        assert_eq!(average(&mut calc, 7, 8, 9), 8);
        assert_eq!(average(&mut calc, 1, 1, 1), 1);
        assert_eq!(average(&mut calc, 1, 1, 2), 1);
    }

    #[test]
    fn test_expression_call_order() {
        let mut seq = Sequence::new();
        let mut mock = MockCalculator::new();
        mock.expect_add()
            .with(eq(1), eq(2))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(999);
        mock.expect_subtract()
            .with(eq(3), eq(4))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(-1);
        mock.expect_multiply()
            .with(eq(999), eq(-1))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(-999);
        mock.expect_divide().never();

        assert_eq!(expression(&mut mock, 1, 2, 3, 4), -999);
    }

    #[test]
    fn test_average_call_order() {
        let mut seq = Sequence::new();
        let mut mock = MockCalculator::new();
        mock.expect_add()
            .with(eq(10), eq(20))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(30);
        mock.expect_add()
            .with(eq(30), eq(30))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(60);
        mock.expect_divide()
            .with(eq(60), eq(3))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(20);
        mock.expect_subtract().never();
        mock.expect_multiply().never();

        assert_eq!(average(&mut mock, 10, 20, 30), 20);
    }
}
