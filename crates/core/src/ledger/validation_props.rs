//! Property-based tests for ledger entry validation rules.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use hauptbuch_shared::LedgerConfig;
use hauptbuch_shared::types::{Amount, Currency, UserId};
use proptest::prelude::*;

use super::error::EntryError;
use super::service::LedgerService;
use super::types::{NewEntry, PositionInput};
use crate::account::{AccountLookup, AccountPath, InMemoryAccounts};
use crate::clock::FixedClock;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

fn service<A: AccountLookup>(accounts: A) -> LedgerService<A, FixedClock> {
    LedgerService::new(LedgerConfig::default(), accounts, FixedClock::on(today()))
}

fn all_active(paths: &BTreeSet<AccountPath>) -> BTreeSet<AccountPath> {
    paths.clone()
}

fn eur(minor: i64) -> Amount {
    Amount::from_minor_units(minor, Currency::Eur).unwrap()
}

/// Strategy for non-zero signed amounts in cents.
fn signed_cents() -> impl Strategy<Value = i64> {
    prop_oneof![1i64..10_000_000, -10_000_000i64..-1]
}

/// Strategy for balanced position lists: 1-8 open positions plus a
/// closing position carrying the negated sum.
fn balanced_positions() -> impl Strategy<Value = Vec<PositionInput>> {
    (prop::collection::vec((signed_cents(), any::<bool>()), 1..8)).prop_filter_map(
        "closing position would be zero",
        |lines| {
            let sum: i64 = lines.iter().map(|(cents, _)| cents).sum();
            if sum == 0 {
                return None;
            }
            let mut positions: Vec<PositionInput> = lines
                .into_iter()
                .enumerate()
                .map(|(i, (cents, tax))| {
                    let input = PositionInput::new(format!("Aufwand : Konto {i}"), eur(cents));
                    if tax { input.tax_relevant() } else { input }
                })
                .collect();
            positions.push(PositionInput::new("Vermögen : Bank", eur(-sum)));
            Some(positions)
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Balanced entries with distinct active accounts are accepted, with
    /// ordinals following input order.
    #[test]
    fn prop_balanced_entries_accepted(positions in balanced_positions()) {
        let count = positions.len();
        let entry = service(all_active)
            .create(NewEntry::new(today(), "Buchung", positions), UserId::new())
            .unwrap();

        prop_assert!(entry.total().unwrap().is_zero());
        let ordinals: Vec<u32> = entry.positions().iter().map(|p| p.ordinal).collect();
        let expected: Vec<u32> = (1..=u32::try_from(count).unwrap()).collect();
        prop_assert_eq!(ordinals, expected);
    }

    /// Any entry whose positions do not sum to zero fails with
    /// `TransactionNotBalanced` carrying the exact difference, whatever
    /// else is wrong with it.
    #[test]
    fn prop_unbalanced_always_rejected(
        positions in balanced_positions(),
        delta in signed_cents(),
        target in any::<prop::sample::Index>(),
        description in prop_oneof![Just(String::new()), "[a-z]{1,10}"],
        lookup_everything in any::<bool>(),
    ) {
        let mut positions = positions;
        let idx = target.index(positions.len());
        let shifted = positions[idx].amount.minor_units() + delta;
        prop_assume!(shifted != 0);
        positions[idx].amount = eur(shifted);

        let input = NewEntry::new(today(), description, positions);
        let result = if lookup_everything {
            service(all_active).create(input, UserId::new())
        } else {
            service(InMemoryAccounts::new()).create(input, UserId::new())
        };
        prop_assert_eq!(
            result,
            Err(EntryError::TransactionNotBalanced { difference: eur(delta) })
        );
    }

    /// Every missing account is reported in a single error, sorted.
    #[test]
    fn prop_all_missing_accounts_reported(
        positions in balanced_positions(),
        known in prop::collection::vec(any::<bool>(), 9),
    ) {
        let paths: Vec<AccountPath> = positions.iter().map(|p| p.account.clone()).collect();
        let registry = InMemoryAccounts::with_paths(
            paths
                .iter()
                .zip(&known)
                .filter(|(_, known)| **known)
                .map(|(path, _)| path.to_string()),
        );
        let mut missing: Vec<AccountPath> = paths
            .iter()
            .zip(&known)
            .filter(|(_, known)| !**known)
            .map(|(path, _)| path.clone())
            .collect();
        missing.sort();

        let result = service(registry).create(NewEntry::new(today(), "Buchung", positions), UserId::new());
        if missing.is_empty() {
            prop_assert!(result.is_ok());
        } else {
            prop_assert_eq!(result, Err(EntryError::AccountsNotFoundOrInactive(missing)));
        }
    }

    /// Dates after today are rejected; dates inside the backdate window are not.
    #[test]
    fn prop_date_window(positions in balanced_positions(), offset in -400i64..30) {
        let date = today() + chrono::Duration::days(offset);
        let result = service(all_active).validate(&NewEntry::new(date, "Buchung", positions));
        match result {
            Ok(_) => prop_assert!((-365..=0).contains(&offset)),
            Err(errors) => {
                let first = errors.first().clone();
                if offset > 0 {
                    let is_future = matches!(first, EntryError::FutureDateNotAllowed { .. });
                    prop_assert!(is_future);
                } else {
                    prop_assert!(offset < -365);
                    prop_assert_eq!(first, EntryError::ExceedsBackdateLimit { days: 365 });
                }
            }
        }
    }
}
