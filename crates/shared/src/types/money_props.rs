//! Property-based tests for amount arithmetic.
//!
//! - Distribution sum invariant
//! - Distribution fairness (parts differ by at most one minor unit)
//! - Weighted allocation balance for zero-sum weights

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::money::{Amount, Currency};

/// Strategy to generate signed amounts (-1,000,000.00 to 1,000,000.00).
fn signed_amount() -> impl Strategy<Value = Amount> {
    (-100_000_000i64..100_000_000i64)
        .prop_map(|cents| Amount::from_minor_units(cents, Currency::Eur).unwrap())
}

/// Strategy to generate part counts (1 to 100).
fn part_count() -> impl Strategy<Value = usize> {
    1usize..100
}

/// Strategy to generate positive weights (0.0001 to 1.0000) plus a closing
/// negative weight so the set sums to zero.
fn zero_sum_weights() -> impl Strategy<Value = Vec<Decimal>> {
    prop::collection::vec(1i64..10_000i64, 1..8).prop_map(|raw| {
        let mut weights: Vec<Decimal> = raw.iter().map(|v| Decimal::new(*v, 4)).collect();
        let total: Decimal = weights.iter().copied().sum();
        weights.push(-total);
        weights
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* amount and n >= 1, the parts of `distribute(n)` sum to the
    /// original amount exactly.
    #[test]
    fn prop_distribute_sum_equals_total(
        total in signed_amount(),
        parts in part_count(),
    ) {
        let result = total.distribute(parts).unwrap();
        prop_assert_eq!(result.len(), parts);
        let sum = Amount::sum(Currency::Eur, &result).unwrap();
        prop_assert_eq!(sum, total, "distribution leaked minor units");
    }

    /// *For any* amount, the distributed parts differ from each other by at
    /// most one minor unit.
    #[test]
    fn prop_distribute_parts_are_fair(
        total in signed_amount(),
        parts in part_count(),
    ) {
        let result = total.distribute(parts).unwrap();
        let max = result.iter().map(Amount::minor_units).max().unwrap();
        let min = result.iter().map(Amount::minor_units).min().unwrap();
        prop_assert!(max - min <= 1, "parts differ by {}", max - min);
    }

    /// *For any* amount and zero-sum weights, `allocate` yields parts that
    /// sum to exactly zero.
    #[test]
    fn prop_allocate_zero_sum_weights_balance(
        total in signed_amount(),
        weights in zero_sum_weights(),
    ) {
        let result = total.allocate(&weights).unwrap();
        prop_assert_eq!(result.len(), weights.len());
        let sum = Amount::sum(Currency::Eur, &result).unwrap();
        prop_assert!(sum.is_zero(), "allocation drifted by {}", sum);
    }

    /// *For any* amount, negating twice is the identity and `a + (-a) == 0`.
    #[test]
    fn prop_negate_is_additive_inverse(total in signed_amount()) {
        prop_assert_eq!(total.negate().negate(), total);
        prop_assert!(total.add(&total.negate()).unwrap().is_zero());
    }
}
