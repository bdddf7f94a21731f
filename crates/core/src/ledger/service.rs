//! Ledger service for the entry lifecycle.
//!
//! The service owns no storage. It takes entry snapshots, checks the
//! requested transition against the lifecycle and the validation rules,
//! and returns the new snapshot(s) for the caller to persist.

use std::collections::BTreeSet;

use hauptbuch_shared::LedgerConfig;
use hauptbuch_shared::types::{Amount, UserId};
use tracing::{debug, info, warn};

use super::entry::Entry;
use super::error::{EntryError, ValidationErrors};
use super::types::{EntryChanges, NewEntry, Position, PositionInput, TemplateRef};
use super::validation::{self, BOOKING_STEPS, ValidatedEntry, ValidationContext};
use crate::account::{AccountLookup, AccountPath};
use crate::clock::Clock;

/// Prefix of the description of every reversal entry.
pub const REVERSAL_PREFIX: &str = "Reversal: ";

/// Entry lifecycle operations over an injected account lookup and clock.
#[derive(Debug, Clone)]
pub struct LedgerService<A, C> {
    config: LedgerConfig,
    accounts: A,
    clock: C,
}

impl<A: AccountLookup, C: Clock> LedgerService<A, C> {
    /// Creates a service.
    pub fn new(config: LedgerConfig, accounts: A, clock: C) -> Self {
        Self {
            config,
            accounts,
            clock,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// The injected account lookup.
    pub fn accounts(&self) -> &A {
        &self.accounts
    }

    /// Runs every validation rule and returns all violations.
    ///
    /// # Errors
    ///
    /// Returns the accumulated `ValidationErrors` in rule order.
    pub fn validate(&self, input: &NewEntry) -> Result<ValidatedEntry, ValidationErrors> {
        validation::validate_entry(input, &self.config, &self.accounts, self.clock.today())
    }

    fn validate_first(&self, input: &NewEntry) -> Result<ValidatedEntry, EntryError> {
        self.validate(input).map_err(|errors| {
            warn!(
                error_count = errors.count(),
                codes = ?errors.codes(),
                "Entry rejected by validation"
            );
            errors.into_first()
        })
    }

    /// Creates a draft entry.
    ///
    /// # Errors
    ///
    /// Returns the first violated validation rule.
    pub fn create(&self, input: NewEntry, actor: UserId) -> Result<Entry, EntryError> {
        self.create_with_source(&input, actor, None)
    }

    /// Creates a draft entry that records the template it was generated from.
    ///
    /// # Errors
    ///
    /// Returns the first violated validation rule.
    pub fn create_from_template(
        &self,
        input: NewEntry,
        actor: UserId,
        source: TemplateRef,
    ) -> Result<Entry, EntryError> {
        self.create_with_source(&input, actor, Some(source))
    }

    fn create_with_source(
        &self,
        input: &NewEntry,
        actor: UserId,
        source: Option<TemplateRef>,
    ) -> Result<Entry, EntryError> {
        let validated = self.validate_first(input)?;
        let entry = Entry::draft(validated, actor, self.clock.now(), source);
        info!(
            entry_id = %entry.id(),
            date = %entry.date(),
            positions = entry.positions().len(),
            "Entry created"
        );
        Ok(entry)
    }

    /// Applies `changes` to a draft and re-validates it.
    ///
    /// # Errors
    ///
    /// `EntryNotEditable` unless the entry is a draft, otherwise the first
    /// violated validation rule.
    pub fn update(&self, entry: &Entry, changes: EntryChanges) -> Result<Entry, EntryError> {
        if !entry.can_edit() {
            return Err(EntryError::EntryNotEditable);
        }
        let input = NewEntry {
            date: changes.date.unwrap_or_else(|| entry.date()),
            description: changes
                .description
                .unwrap_or_else(|| entry.description().to_string()),
            positions: changes
                .positions
                .unwrap_or_else(|| to_inputs(entry, |p| p.amount)),
        };
        let validated = self.validate_first(&input)?;
        let updated = entry.revised(validated, self.clock.now());
        info!(entry_id = %updated.id(), "Entry updated");
        Ok(updated)
    }

    /// Posts a draft, re-checking its positions and that every account is
    /// still active.
    ///
    /// Drafts usually come back from storage, so the balance, position
    /// count, zero-amount and duplicate rules run again before the entry is
    /// frozen.
    ///
    /// # Errors
    ///
    /// `AlreadyPosted` unless the entry is a draft; the first violated
    /// booking rule; `AccountsNotFoundOrInactive` listing every offending
    /// account.
    pub fn post(&self, entry: &Entry, actor: UserId) -> Result<Entry, EntryError> {
        if !entry.can_post() {
            return Err(EntryError::AlreadyPosted);
        }
        let snapshot = NewEntry {
            date: entry.date(),
            description: entry.description().to_string(),
            positions: to_inputs(entry, |p| p.amount),
        };
        self.check_booking(&snapshot)?;
        let referenced: BTreeSet<AccountPath> = entry
            .positions()
            .iter()
            .map(|p| p.account_path.clone())
            .collect();
        let missing = self.accounts.missing_or_inactive(&referenced);
        if !missing.is_empty() {
            warn!(
                entry_id = %entry.id(),
                missing = missing.len(),
                "Entry references unavailable accounts"
            );
            return Err(EntryError::AccountsNotFoundOrInactive(missing));
        }
        let posted = entry.posted(actor, self.clock.now());
        info!(entry_id = %posted.id(), posted_by = %actor, "Entry posted");
        Ok(posted)
    }

    /// Voids a posted entry and produces its posted reversal.
    ///
    /// Returns `(voided original, reversal)`. The reversal carries the same
    /// date, the description `"Reversal: <original>"` and every position
    /// negated with its tax flag, description and ordinal intact.
    ///
    /// # Errors
    ///
    /// `NotPosted` unless the entry is posted, then the void reason checks.
    pub fn void(
        &self,
        entry: &Entry,
        actor: UserId,
        reason: &str,
    ) -> Result<(Entry, Entry), EntryError> {
        if !entry.can_void() {
            return Err(EntryError::NotPosted);
        }
        let reason = self.check_void_reason(reason)?;

        let input = NewEntry {
            date: entry.date(),
            description: format!("{REVERSAL_PREFIX}{}", entry.description()),
            positions: to_inputs(entry, |p| p.amount.negate()),
        };
        let validated = self.check_booking(&input)?;

        let now = self.clock.now();
        let reversal = Entry::reversal(entry, validated, actor, now);
        let voided = entry.voided(actor, now, reason, reversal.id());
        info!(
            entry_id = %voided.id(),
            reversal_id = %reversal.id(),
            voided_by = %actor,
            "Entry voided"
        );
        Ok((voided, reversal))
    }

    /// Checks that a draft may be deleted.
    ///
    /// # Errors
    ///
    /// `EntryNotDeletable` unless the entry is a draft.
    pub fn delete(&self, entry: &Entry) -> Result<(), EntryError> {
        if !entry.can_delete() {
            return Err(EntryError::EntryNotDeletable);
        }
        debug!(entry_id = %entry.id(), "Entry deleted");
        Ok(())
    }

    fn check_booking(&self, input: &NewEntry) -> Result<ValidatedEntry, EntryError> {
        ValidationContext::new(input, &self.config, self.clock.today())
            .run(BOOKING_STEPS)
            .finish()
            .map_err(|errors| {
                warn!(
                    error_count = errors.count(),
                    codes = ?errors.codes(),
                    "Entry positions rejected"
                );
                errors.into_first()
            })
    }

    fn check_void_reason(&self, reason: &str) -> Result<String, EntryError> {
        let reason = reason.trim();
        let length = reason.chars().count();
        if length == 0 {
            return Err(EntryError::VoidReasonRequired);
        }
        if length < self.config.void_reason_min {
            return Err(EntryError::VoidReasonTooShort {
                min: self.config.void_reason_min,
            });
        }
        if length > self.config.void_reason_max {
            return Err(EntryError::VoidReasonTooLong {
                max: self.config.void_reason_max,
            });
        }
        Ok(reason.to_string())
    }
}

fn to_inputs(entry: &Entry, amount: impl Fn(&Position) -> Amount) -> Vec<PositionInput> {
    entry
        .positions()
        .iter()
        .map(|p| PositionInput {
            account: p.account_path.clone(),
            amount: amount(p),
            description: p.description.clone(),
            tax_relevant: p.tax_relevant,
        })
        .collect()
}
