//! Template engine: validation, versioning and expansion into entries.
//!
//! A template is checked for balance when it is defined, not when it is
//! applied. Expansion then depends on the amount type:
//!
//! | type         | total    | position amount                           |
//! |--------------|----------|-------------------------------------------|
//! | `fixed`      | ignored  | the line amount                           |
//! | `percentage` | required | `total × p / 100`, each rounded on its own |
//! | `fraction`   | required | `total × f` via largest-remainder         |
//!
//! Generated positions always go through [`LedgerService::create_from_template`],
//! so every entry rule applies to them.

use std::collections::BTreeMap;

use hauptbuch_shared::types::{Amount, AmountError};
use rust_decimal::Decimal;
use tracing::{debug, info};

use super::error::TemplateError;
use super::types::{AmountType, ApplyAttrs, LineAmount, Template, TemplateLine, TemplateLineInput};
use crate::account::{AccountLookup, AccountPath, DEFAULT_MAX_DEPTH};
use crate::clock::Clock;
use crate::ledger::{Entry, LedgerService, NewEntry, PositionInput};

/// Creates, versions and applies templates.
#[derive(Debug, Clone)]
pub struct TemplateEngine<C> {
    clock: C,
    max_account_depth: usize,
}

impl<C: Default> Default for TemplateEngine<C> {
    fn default() -> Self {
        Self {
            clock: C::default(),
            max_account_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl<C: Clock> TemplateEngine<C> {
    /// Creates an engine stamping templates with `clock`.
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            max_account_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Sets the deepest account path a template line may reference.
    #[must_use]
    pub fn with_max_account_depth(mut self, max_account_depth: usize) -> Self {
        self.max_account_depth = max_account_depth;
        self
    }

    /// Defines version 1 of a template.
    ///
    /// # Errors
    ///
    /// Returns the first violated line rule.
    pub fn create(
        &self,
        name: &str,
        lines: Vec<TemplateLineInput>,
        default_total: Option<Amount>,
    ) -> Result<Template, TemplateError> {
        let template = self.build(name, 1, lines, default_total, true)?;
        info!(
            template = %template.name(),
            amount_type = ?template.amount_type(),
            lines = template.lines().len(),
            "Template created"
        );
        Ok(template)
    }

    /// Publishes the next version of `existing` with new lines.
    ///
    /// # Errors
    ///
    /// Returns the first violated line rule.
    pub fn new_version(
        &self,
        existing: &Template,
        lines: Vec<TemplateLineInput>,
        default_total: Option<Amount>,
    ) -> Result<Template, TemplateError> {
        self.new_version_as(
            existing,
            existing.version().saturating_add(1),
            lines,
            default_total,
        )
    }

    /// Publishes an explicit version of `existing`.
    ///
    /// # Errors
    ///
    /// `VersionNotIncreasing` if `version` does not exceed the current one,
    /// otherwise the first violated line rule.
    pub fn new_version_as(
        &self,
        existing: &Template,
        version: u32,
        lines: Vec<TemplateLineInput>,
        default_total: Option<Amount>,
    ) -> Result<Template, TemplateError> {
        if version <= existing.version() {
            return Err(TemplateError::VersionNotIncreasing {
                current: existing.version(),
                requested: version,
            });
        }
        let template = self.build(existing.name(), version, lines, default_total, true)?;
        info!(
            template = %template.name(),
            version = template.version(),
            "Template versioned"
        );
        Ok(template)
    }

    /// Publishes the next version of `existing` as inactive, keeping its lines.
    ///
    /// # Errors
    ///
    /// Fails only if the stored lines no longer validate.
    pub fn deactivated(&self, existing: &Template) -> Result<Template, TemplateError> {
        let lines = existing.lines().iter().map(TemplateLineInput::from).collect();
        let template = self.build(
            existing.name(),
            existing.version().saturating_add(1),
            lines,
            existing.default_total(),
            false,
        )?;
        info!(
            template = %template.name(),
            version = template.version(),
            "Template deactivated"
        );
        Ok(template)
    }

    fn build(
        &self,
        name: &str,
        version: u32,
        lines: Vec<TemplateLineInput>,
        default_total: Option<Amount>,
        active: bool,
    ) -> Result<Template, TemplateError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TemplateError::NameRequired);
        }
        let lines = validate_lines(lines, self.max_account_depth)?;
        Ok(Template::new(
            name.to_string(),
            version,
            default_total,
            active,
            lines,
            self.clock.now(),
        ))
    }
}

impl Template {
    /// Turns a template into entry positions without creating an entry.
    ///
    /// `total` falls back to the template's default total.
    ///
    /// # Errors
    ///
    /// `TotalRequired` for percentage and fraction templates without a
    /// total; `Amount` if the scaled amounts overflow.
    pub fn expand(&self, total: Option<Amount>) -> Result<Vec<PositionInput>, TemplateError> {
        let total = total.or(self.default_total());
        let amounts: Vec<Amount> = match self.amount_type() {
            None => Vec::new(),
            Some(AmountType::Fixed) => self
                .lines()
                .iter()
                .filter_map(|line| match line.amount {
                    LineAmount::Fixed(amount) => Some(amount),
                    _ => None,
                })
                .collect(),
            Some(AmountType::Percentage) => {
                let total = total.ok_or(TemplateError::TotalRequired)?;
                self.lines()
                    .iter()
                    .map(|line| total.percentage(scalar(line)))
                    .collect::<Result<_, _>>()?
            }
            Some(AmountType::Fraction) => {
                let total = total.ok_or(TemplateError::TotalRequired)?;
                let weights: Vec<Decimal> = self.lines().iter().map(scalar).collect();
                total.allocate(&weights)?
            }
        };

        Ok(self
            .lines()
            .iter()
            .zip(amounts)
            .map(|(line, amount)| PositionInput {
                account: line.account_path.clone(),
                amount,
                description: line.description.clone(),
                tax_relevant: line.tax_relevant,
            })
            .collect())
    }

    /// Expands the template and creates a draft entry from it.
    ///
    /// # Errors
    ///
    /// `TemplateInactive` for deactivated versions, the expansion errors of
    /// [`expand`](Self::expand), and `Entry` wrapping any rejection by the
    /// entry rules.
    pub fn apply<A: AccountLookup, C: Clock>(
        &self,
        total: Option<Amount>,
        attrs: ApplyAttrs,
        ledger: &LedgerService<A, C>,
    ) -> Result<Entry, TemplateError> {
        if !self.is_active() {
            return Err(TemplateError::TemplateInactive {
                name: self.name().to_string(),
                version: self.version(),
            });
        }
        let positions = self.expand(total)?;
        debug!(
            template = %self.name(),
            version = self.version(),
            positions = positions.len(),
            "Template expanded"
        );
        let input = NewEntry {
            date: attrs.date,
            description: attrs
                .description
                .unwrap_or_else(|| self.name().to_string()),
            positions,
        };
        let entry = ledger.create_from_template(input, attrs.actor, self.reference())?;
        info!(
            template = %self.name(),
            version = self.version(),
            entry_id = %entry.id(),
            "Template applied"
        );
        Ok(entry)
    }
}

/// Checks line count, homogeneity, non-zero values, account paths and
/// balance, in that order.
///
/// # Errors
///
/// Returns the first violated rule; `Amount(Overflow)` if the line values
/// cannot be summed.
pub fn validate_lines(
    lines: Vec<TemplateLineInput>,
    max_account_depth: usize,
) -> Result<Vec<TemplateLine>, TemplateError> {
    if lines.len() < 2 {
        return Err(TemplateError::InsufficientLines {
            actual: lines.len(),
        });
    }

    let expected = lines[0].amount.amount_type();
    if let Some(found) = lines
        .iter()
        .map(|line| line.amount.amount_type())
        .find(|t| *t != expected)
    {
        return Err(TemplateError::MixedAmountTypes { expected, found });
    }

    let lines: Vec<TemplateLine> = lines
        .into_iter()
        .enumerate()
        .map(|(i, input)| TemplateLine {
            account_path: input.account,
            amount: input.amount,
            description: input
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            tax_relevant: input.tax_relevant,
            ordinal: u32::try_from(i + 1).unwrap_or(u32::MAX),
        })
        .collect();

    if let Some(zero) = lines.iter().find(|line| line.amount.is_zero()) {
        return Err(TemplateError::ZeroLineValue {
            ordinal: zero.ordinal,
        });
    }

    if let Some((ordinal, error)) = lines.iter().find_map(|line| {
        line.account_path
            .validate(max_account_depth)
            .err()
            .map(|error| (line.ordinal, error))
    }) {
        return Err(TemplateError::InvalidAccountPath { ordinal, error });
    }

    let mut seen: BTreeMap<&AccountPath, usize> = BTreeMap::new();
    for line in &lines {
        *seen.entry(&line.account_path).or_default() += 1;
    }
    let duplicates: Vec<AccountPath> = seen
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(path, _)| path.clone())
        .collect();
    if !duplicates.is_empty() {
        return Err(TemplateError::DuplicateAccounts(duplicates));
    }

    if !is_balanced(expected, &lines)? {
        return Err(TemplateError::LinesNotBalanced {
            amount_type: expected,
        });
    }
    Ok(lines)
}

fn is_balanced(amount_type: AmountType, lines: &[TemplateLine]) -> Result<bool, TemplateError> {
    match amount_type {
        AmountType::Fixed => {
            let amounts: Vec<Amount> = lines
                .iter()
                .filter_map(|line| match line.amount {
                    LineAmount::Fixed(amount) => Some(amount),
                    _ => None,
                })
                .collect();
            let currency = amounts.first().map(Amount::currency).unwrap_or_default();
            Ok(Amount::sum(currency, &amounts)?.is_zero())
        }
        AmountType::Percentage => {
            let sum = checked_sum(lines.iter().map(scalar))?;
            let positive = checked_sum(lines.iter().map(scalar).filter(Decimal::is_sign_positive))?;
            Ok(sum.is_zero() && positive == Decimal::ONE_HUNDRED)
        }
        AmountType::Fraction => Ok(checked_sum(lines.iter().map(scalar))?.is_zero()),
    }
}

fn checked_sum(values: impl IntoIterator<Item = Decimal>) -> Result<Decimal, AmountError> {
    values.into_iter().try_fold(Decimal::ZERO, |acc, value| {
        acc.checked_add(value).ok_or(AmountError::Overflow)
    })
}

fn scalar(line: &TemplateLine) -> Decimal {
    match line.amount {
        LineAmount::Percentage(value) | LineAmount::Fraction(value) => value,
        LineAmount::Fixed(amount) => amount.to_decimal(),
    }
}
