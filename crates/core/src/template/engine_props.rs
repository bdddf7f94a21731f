//! Property-based tests for template expansion.

use chrono::NaiveDate;
use hauptbuch_shared::LedgerConfig;
use hauptbuch_shared::types::{Amount, Currency, UserId};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::engine::TemplateEngine;
use super::error::TemplateError;
use super::types::{AmountType, ApplyAttrs, LineAmount, TemplateLineInput};
use crate::account::InMemoryAccounts;
use crate::clock::FixedClock;
use crate::ledger::LedgerService;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

fn engine() -> TemplateEngine<FixedClock> {
    TemplateEngine::new(FixedClock::on(today()))
}

/// Fraction lines whose weights cancel: positive weights in hundredths
/// followed by one negative line taking their sum.
fn arb_fraction_lines() -> impl Strategy<Value = Vec<TemplateLineInput>> {
    prop::collection::vec(1i64..=150, 1..6).prop_map(|hundredths| {
        let sum: i64 = hundredths.iter().sum();
        let mut lines: Vec<TemplateLineInput> = hundredths
            .into_iter()
            .enumerate()
            .map(|(i, h)| TemplateLineInput::fraction(format!("Aufwand : Konto {i}"), Decimal::new(h, 2)))
            .collect();
        lines.push(TemplateLineInput::fraction("Vermögen : Bank", Decimal::new(-sum, 2)));
        lines
    })
}

fn arb_fixed_lines() -> impl Strategy<Value = Vec<TemplateLineInput>> {
    prop::collection::vec(1i64..1_000_000, 1..6).prop_map(|cents| {
        let sum: i64 = cents.iter().sum();
        let mut lines: Vec<TemplateLineInput> = cents
            .into_iter()
            .enumerate()
            .map(|(i, c)| {
                let amount = Amount::from_minor_units(c, Currency::Eur).unwrap();
                TemplateLineInput::fixed(format!("Aufwand : Konto {i}"), amount)
            })
            .collect();
        lines.push(TemplateLineInput::fixed(
            "Vermögen : Bank",
            Amount::from_minor_units(-sum, Currency::Eur).unwrap(),
        ));
        lines
    })
}

fn rent_lines() -> Vec<TemplateLineInput> {
    let amount = Amount::from_minor_units(10_000, Currency::Eur).unwrap();
    vec![
        TemplateLineInput::fixed("Aufwand : Miete", amount),
        TemplateLineInput::fixed("Vermögen : Bank", amount.negate()),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Fraction templates always expand to positions that net to zero.
    #[test]
    fn prop_fraction_expansion_balances(
        lines in arb_fraction_lines(),
        cents in 1i64..100_000_000,
        currency in prop::sample::select(vec![Currency::Eur, Currency::Usd, Currency::Jpy]),
    ) {
        let template = engine().create("Aufteilung", lines, None).unwrap();
        let total = Amount::from_minor_units(cents, currency).unwrap();
        let positions = template.expand(Some(total)).unwrap();

        prop_assert_eq!(positions.len(), template.lines().len());
        let amounts: Vec<Amount> = positions.iter().map(|p| p.amount).collect();
        prop_assert!(Amount::sum(currency, &amounts).unwrap().is_zero());
        prop_assert!(amounts.iter().all(|a| a.currency() == currency));
    }

    /// Fixed templates produce exactly their line amounts when applied.
    #[test]
    fn prop_fixed_apply_exact(lines in arb_fixed_lines()) {
        let template = engine().create("Fest", lines.clone(), None).unwrap();
        let accounts = InMemoryAccounts::with_paths(lines.iter().map(|l| l.account.to_string()));
        let ledger = LedgerService::new(LedgerConfig::default(), accounts, FixedClock::on(today()));

        let entry = template.apply(None, ApplyAttrs::new(today(), UserId::new()), &ledger).unwrap();
        prop_assert_eq!(entry.positions().len(), lines.len());
        for (position, line) in entry.positions().iter().zip(&lines) {
            prop_assert_eq!(&position.account_path, &line.account);
            prop_assert_eq!(LineAmount::Fixed(position.amount), line.amount);
        }
    }

    /// Each published version is strictly greater than its predecessor.
    #[test]
    fn prop_versions_strictly_increase(steps in prop::collection::vec(0u32..4, 1..8)) {
        let engine = engine();
        let mut current = engine.create("Fest", rent_lines(), None).unwrap();
        for step in steps {
            let requested = current.version() + step;
            match engine.new_version_as(&current, requested, rent_lines(), None) {
                Ok(next) => {
                    prop_assert!(next.version() > current.version());
                    current = next;
                }
                Err(error) => {
                    prop_assert_eq!(step, 0);
                    prop_assert_eq!(
                        error,
                        TemplateError::VersionNotIncreasing { current: current.version(), requested }
                    );
                }
            }
        }
    }

    /// A single deviating line type is always rejected.
    #[test]
    fn prop_mixed_types_rejected(mut lines in arb_fraction_lines(), index in any::<prop::sample::Index>()) {
        let at = index.index(lines.len());
        let account = lines[at].account.clone();
        lines[at] = TemplateLineInput::percentage(account, Decimal::ONE_HUNDRED);
        let expected = if at == 0 { AmountType::Percentage } else { AmountType::Fraction };
        let found = if at == 0 { AmountType::Fraction } else { AmountType::Percentage };

        prop_assert_eq!(
            engine().create("Gemischt", lines, None),
            Err(TemplateError::MixedAmountTypes { expected, found })
        );
    }
}

