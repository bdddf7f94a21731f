//! Business rule validation for ledger entries.
//!
//! Validation is an ordered list of pure steps. Each step receives the
//! [`ValidationContext`], records every violation it finds and hands the
//! context on; [`ValidationContext::finish`] turns the result into either a
//! [`ValidatedEntry`] or the full list of [`ValidationErrors`].
//!
//! The balance check runs first, so an entry whose positions do not sum to
//! zero always reports `TransactionNotBalanced` as its first error.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use hauptbuch_shared::LedgerConfig;
use hauptbuch_shared::types::Amount;

use super::error::{EntryError, ValidationErrors};
use super::types::{NewEntry, Position, PositionInput};
use crate::account::{AccountLookup, AccountPath};

/// A validation step.
pub type Step = for<'a> fn(ValidationContext<'a>) -> ValidationContext<'a>;

/// Steps applied to entries created or updated by a user.
pub const ENTRY_STEPS: &[Step] = &[
    check_balance,
    check_date,
    check_description,
    check_position_count,
    check_zero_amounts,
    check_account_paths,
    check_duplicate_accounts,
    check_accounts_active,
];

/// Steps that look at the positions only. They guard drafts loaded from
/// storage before posting and generated reversals, whose date and accounts
/// were already accepted.
pub const BOOKING_STEPS: &[Step] = &[
    check_balance,
    check_position_count,
    check_zero_amounts,
    check_duplicate_accounts,
];

/// Entry content that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedEntry {
    /// Booking date.
    pub date: NaiveDate,
    /// Trimmed entry text.
    pub description: String,
    /// Positions with ordinals assigned in input order.
    pub positions: Vec<Position>,
}

/// State threaded through the validation steps.
pub struct ValidationContext<'a> {
    input: &'a NewEntry,
    config: &'a LedgerConfig,
    today: NaiveDate,
    accounts: Option<&'a dyn AccountLookup>,
    errors: Vec<EntryError>,
}

impl<'a> ValidationContext<'a> {
    /// Starts a validation run without an account lookup.
    #[must_use]
    pub fn new(input: &'a NewEntry, config: &'a LedgerConfig, today: NaiveDate) -> Self {
        Self {
            input,
            config,
            today,
            accounts: None,
            errors: Vec::new(),
        }
    }

    /// Enables the account existence check.
    #[must_use]
    pub fn with_accounts(mut self, accounts: &'a dyn AccountLookup) -> Self {
        self.accounts = Some(accounts);
        self
    }

    /// Applies `steps` in order.
    #[must_use]
    pub fn run(self, steps: &[Step]) -> Self {
        steps.iter().fold(self, |ctx, step| step(ctx))
    }

    /// Errors recorded so far.
    #[must_use]
    pub fn errors(&self) -> &[EntryError] {
        &self.errors
    }

    fn reject(mut self, error: EntryError) -> Self {
        self.errors.push(error);
        self
    }

    fn positions(&self) -> impl Iterator<Item = (u32, &'a PositionInput)> + use<'a> {
        self.input
            .positions
            .iter()
            .enumerate()
            .map(|(i, p)| (ordinal(i), p))
    }

    /// Ends the run.
    pub fn finish(mut self) -> Result<ValidatedEntry, ValidationErrors> {
        if let Some(errors) = ValidationErrors::from_vec(std::mem::take(&mut self.errors)) {
            return Err(errors);
        }
        let positions = self
            .positions()
            .map(|(ordinal, input)| Position {
                account_path: input.account.clone(),
                amount: input.amount,
                description: input
                    .description
                    .as_deref()
                    .map(str::trim)
                    .filter(|d| !d.is_empty())
                    .map(ToString::to_string),
                tax_relevant: input.tax_relevant,
                ordinal,
            })
            .collect();
        Ok(ValidatedEntry {
            date: self.input.date,
            description: self.input.description.trim().to_string(),
            positions,
        })
    }
}

fn ordinal(index: usize) -> u32 {
    u32::try_from(index + 1).unwrap_or(u32::MAX)
}

/// Validates a user-supplied entry against every rule.
pub fn validate_entry(
    input: &NewEntry,
    config: &LedgerConfig,
    accounts: &dyn AccountLookup,
    today: NaiveDate,
) -> Result<ValidatedEntry, ValidationErrors> {
    ValidationContext::new(input, config, today)
        .with_accounts(accounts)
        .run(ENTRY_STEPS)
        .finish()
}

/// Positions must sum to exactly zero in a single currency.
pub fn check_balance(ctx: ValidationContext<'_>) -> ValidationContext<'_> {
    let positions = &ctx.input.positions;
    let currency = positions
        .first()
        .map_or(ctx.config.default_currency, |p| p.amount.currency());
    match Amount::sum(currency, positions.iter().map(|p| &p.amount)) {
        Ok(sum) if sum.is_zero() => ctx,
        Ok(difference) => ctx.reject(EntryError::TransactionNotBalanced { difference }),
        Err(error) => ctx.reject(error.into()),
    }
}

/// The date lies within `[today - backdate limit, today]`.
pub fn check_date(ctx: ValidationContext<'_>) -> ValidationContext<'_> {
    let date = ctx.input.date;
    let today = ctx.today;
    if date > today {
        return ctx.reject(EntryError::FutureDateNotAllowed { date, today });
    }
    let days = ctx.config.backdate_limit_days;
    if (today - date).num_days() > i64::from(days) {
        return ctx.reject(EntryError::ExceedsBackdateLimit { days });
    }
    ctx
}

/// Rejects blank descriptions and those over the configured length.
pub fn check_description(ctx: ValidationContext<'_>) -> ValidationContext<'_> {
    if ctx.input.description.trim().is_empty() {
        return ctx.reject(EntryError::DescriptionRequired);
    }
    ctx
}

/// `InsufficientPositions` for fewer than two positions.
pub fn check_position_count(ctx: ValidationContext<'_>) -> ValidationContext<'_> {
    let actual = ctx.input.positions.len();
    let (min, max) = (ctx.config.min_positions, ctx.config.max_positions);
    if actual < min {
        return ctx.reject(EntryError::InsufficientPositions { min, actual });
    }
    if actual > max {
        return ctx.reject(EntryError::ExceedsMaxPositions { max });
    }
    ctx
}

/// Reports every zero amount by ordinal.
pub fn check_zero_amounts(ctx: ValidationContext<'_>) -> ValidationContext<'_> {
    let zeros: Vec<u32> = ctx
        .positions()
        .filter(|(_, p)| p.amount.is_zero())
        .map(|(ordinal, _)| ordinal)
        .collect();
    zeros.into_iter().fold(ctx, |ctx, ordinal| {
        ctx.reject(EntryError::ZeroAmountPosition { ordinal })
    })
}

/// Checks path structure and depth. Activity is
/// [`check_accounts_active`]'s job.
pub fn check_account_paths(ctx: ValidationContext<'_>) -> ValidationContext<'_> {
    let max_depth = ctx.config.max_account_depth;
    let invalid: Vec<EntryError> = ctx
        .positions()
        .filter_map(|(ordinal, p)| {
            p.account
                .validate(max_depth)
                .err()
                .map(|error| EntryError::InvalidAccountPath { ordinal, error })
        })
        .collect();
    invalid.into_iter().fold(ctx, ValidationContext::reject)
}

/// Every account appears on at most one position.
pub fn check_duplicate_accounts(ctx: ValidationContext<'_>) -> ValidationContext<'_> {
    let mut seen: BTreeMap<&AccountPath, usize> = BTreeMap::new();
    for (_, p) in ctx.positions() {
        if !p.account.is_empty() {
            *seen.entry(&p.account).or_default() += 1;
        }
    }
    let duplicates: Vec<AccountPath> = seen
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(path, _)| path.clone())
        .collect();
    if duplicates.is_empty() {
        return ctx;
    }
    ctx.reject(EntryError::DuplicateAccounts(duplicates))
}

/// All structurally valid accounts exist and are active. Reports every
/// offender at once.
pub fn check_accounts_active(ctx: ValidationContext<'_>) -> ValidationContext<'_> {
    let Some(accounts) = ctx.accounts else {
        return ctx;
    };
    let max_depth = ctx.config.max_account_depth;
    let requested: BTreeSet<AccountPath> = ctx
        .positions()
        .map(|(_, p)| &p.account)
        .filter(|path| path.validate(max_depth).is_ok())
        .cloned()
        .collect();
    if requested.is_empty() {
        return ctx;
    }
    let missing = accounts.missing_or_inactive(&requested);
    if missing.is_empty() {
        return ctx;
    }
    ctx.reject(EntryError::AccountsNotFoundOrInactive(missing))
}
