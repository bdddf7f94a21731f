//! Property-based tests for the entry lifecycle.
//!
//! These tests check the state machine rules and the reversal produced
//! when voiding a posted entry.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use hauptbuch_shared::LedgerConfig;
use hauptbuch_shared::types::{Amount, Currency, UserId};
use proptest::prelude::*;

use super::balance::AccountBalances;
use super::entry::Entry;
use super::error::EntryError;
use super::service::LedgerService;
use super::types::{EntryChanges, EntryStatus, NewEntry, PositionInput};
use crate::account::AccountPath;
use crate::clock::FixedClock;

type Lookup = fn(&BTreeSet<AccountPath>) -> BTreeSet<AccountPath>;
type Service = LedgerService<Lookup, FixedClock>;

fn all_active(paths: &BTreeSet<AccountPath>) -> BTreeSet<AccountPath> {
    paths.clone()
}

fn service() -> Service {
    LedgerService::new(
        LedgerConfig::default(),
        all_active as Lookup,
        FixedClock::on(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()),
    )
}

/// Strategy for a balanced entry in the last 30 days with 2-6 positions.
fn arb_new_entry() -> impl Strategy<Value = NewEntry> {
    (
        prop::collection::vec((1i64..5_000_000, any::<bool>(), prop::option::of("[a-z]{1,12}")), 1..6),
        0u64..30,
        "[A-Za-z][A-Za-z ]{0,30}",
    )
        .prop_map(|(lines, days_back, description)| {
            let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap() - chrono::Days::new(days_back);
            let total: i64 = lines.iter().map(|(cents, _, _)| cents).sum();
            let mut positions: Vec<PositionInput> = lines
                .into_iter()
                .enumerate()
                .map(|(i, (cents, tax, text))| {
                    let amount = Amount::from_minor_units(cents, Currency::Eur).unwrap();
                    let mut input = PositionInput::new(format!("Aufwand : Kostenstelle {i}"), amount);
                    input.tax_relevant = tax;
                    input.description = text;
                    input
                })
                .collect();
            positions.push(PositionInput::new(
                "Vermögen : Bank",
                Amount::from_minor_units(-total, Currency::Eur).unwrap(),
            ));
            NewEntry::new(date, description, positions)
        })
}

fn posted(service: &Service, input: NewEntry, actor: UserId) -> Entry {
    let draft = service.create(input, actor).unwrap();
    service.post(&draft, actor).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Posted entries are immutable: update, delete and post all fail.
    #[test]
    fn prop_posted_entries_immutable(input in arb_new_entry(), new_text in "[a-z]{5,10}") {
        let service = service();
        let actor = UserId::new();
        let entry = posted(&service, input, actor);

        let changes = EntryChanges { description: Some(new_text), ..EntryChanges::default() };
        prop_assert_eq!(service.update(&entry, changes), Err(EntryError::EntryNotEditable));
        prop_assert_eq!(service.delete(&entry), Err(EntryError::EntryNotDeletable));
        prop_assert_eq!(service.post(&entry, actor), Err(EntryError::AlreadyPosted));
    }

    /// A voided entry cannot be voided again, and its reversal negates
    /// every position exactly while keeping its attributes.
    #[test]
    fn prop_reversal_negates_exactly(input in arb_new_entry(), reason in "[a-z]{5,40}") {
        let service = service();
        let actor = UserId::new();
        let original = posted(&service, input, actor);

        let (voided, reversal) = service.void(&original, actor, &reason).unwrap();
        prop_assert_eq!(voided.status(), EntryStatus::Void);
        prop_assert_eq!(reversal.status(), EntryStatus::Posted);
        prop_assert_eq!(reversal.date(), original.date());
        prop_assert_eq!(reversal.reversal_of(), Some(original.id()));
        prop_assert_eq!(voided.reversed_by(), Some(reversal.id()));
        prop_assert!(reversal.total().unwrap().is_zero());

        prop_assert_eq!(reversal.positions().len(), original.positions().len());
        for (orig, rev) in original.positions().iter().zip(reversal.positions()) {
            prop_assert_eq!(&rev.account_path, &orig.account_path);
            prop_assert_eq!(rev.amount, orig.amount.negate());
            prop_assert_eq!(rev.tax_relevant, orig.tax_relevant);
            prop_assert_eq!(&rev.description, &orig.description);
            prop_assert_eq!(rev.ordinal, orig.ordinal);
        }

        prop_assert_eq!(
            service.void(&voided, actor, &reason),
            Err(EntryError::NotPosted)
        );
        prop_assert_eq!(
            service.void(&reversal, actor, &reason).map(|(v, _)| v.status()),
            Ok(EntryStatus::Void)
        );
    }

    /// The voided entry and its reversal net to zero on every account.
    #[test]
    fn prop_void_pair_nets_out(input in arb_new_entry()) {
        let service = service();
        let actor = UserId::new();
        let original = posted(&service, input, actor);
        let (voided, reversal) = service.void(&original, actor, "Fehlbuchung").unwrap();

        let balances = AccountBalances::from_entries(Currency::Eur, [&voided, &reversal]).unwrap();
        for balance in balances.iter() {
            prop_assert!(balance.balance.is_zero());
        }
    }

    /// Drafts can be updated and deleted; ids and creation stamps survive updates.
    #[test]
    fn prop_drafts_editable(input in arb_new_entry(), replacement in arb_new_entry()) {
        let service = service();
        let draft = service.create(input, UserId::new()).unwrap();
        let changes = EntryChanges {
            date: Some(replacement.date),
            description: Some(replacement.description.clone()),
            positions: Some(replacement.positions.clone()),
        };
        let updated = service.update(&draft, changes).unwrap();
        prop_assert_eq!(updated.id(), draft.id());
        prop_assert_eq!(updated.created_at(), draft.created_at());
        prop_assert_eq!(updated.status(), EntryStatus::Draft);
        prop_assert_eq!(updated.positions().len(), replacement.positions.len());
        prop_assert!(service.delete(&updated).is_ok());
    }
}
