//! Account balance calculations.
//!
//! Balances are computed from booked entries only: drafts are ignored, and
//! a voided entry is counted together with its posted reversal so the pair
//! nets out to zero.

use std::collections::BTreeMap;

use hauptbuch_shared::types::{Amount, AmountError, Currency};
use serde::{Deserialize, Serialize};

use super::entry::Entry;
use super::types::EntryStatus;
use crate::account::AccountPath;

/// Turnover and balance of one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    /// The account.
    pub account_path: AccountPath,
    /// Sum of positive positions.
    pub debit_total: Amount,
    /// Sum of negative positions, as a positive amount.
    pub credit_total: Amount,
    /// Net balance, `debit_total - credit_total`.
    pub balance: Amount,
}

impl AccountBalance {
    /// Creates an empty balance.
    #[must_use]
    pub fn new(account_path: AccountPath, currency: Currency) -> Self {
        Self {
            account_path,
            debit_total: Amount::zero(currency),
            credit_total: Amount::zero(currency),
            balance: Amount::zero(currency),
        }
    }

    /// Books a signed amount. On error the balance is left unchanged.
    pub fn book(&mut self, amount: &Amount) -> Result<(), AmountError> {
        *self = self.booked(amount)?;
        Ok(())
    }

    /// The balance after booking `amount`.
    pub fn booked(&self, amount: &Amount) -> Result<Self, AmountError> {
        let (debit_total, credit_total) = if amount.is_negative() {
            (self.debit_total, self.credit_total.add(&amount.abs())?)
        } else {
            (self.debit_total.add(amount)?, self.credit_total)
        };
        Ok(Self {
            account_path: self.account_path.clone(),
            debit_total,
            credit_total,
            balance: self.balance.add(amount)?,
        })
    }
}

/// Balances of every account touched by a set of entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountBalances {
    currency: Currency,
    accounts: BTreeMap<AccountPath, AccountBalance>,
}

impl AccountBalances {
    /// Empty balances in `currency`.
    #[must_use]
    pub fn new(currency: Currency) -> Self {
        Self {
            currency,
            accounts: BTreeMap::new(),
        }
    }

    /// Aggregates posted and voided entries.
    ///
    /// # Errors
    ///
    /// `CurrencyMismatch` if a booked position is not in `currency`.
    pub fn from_entries<'a, I>(currency: Currency, entries: I) -> Result<Self, AmountError>
    where
        I: IntoIterator<Item = &'a Entry>,
    {
        let mut balances = Self::new(currency);
        for entry in entries {
            balances.apply(entry)?;
        }
        Ok(balances)
    }

    /// Books one entry. Drafts are skipped.
    ///
    /// The entry is booked as a whole: if any position fails, no balance
    /// changes.
    pub fn apply(&mut self, entry: &Entry) -> Result<(), AmountError> {
        if entry.status() == EntryStatus::Draft {
            return Ok(());
        }
        let mut staged: BTreeMap<AccountPath, AccountBalance> = BTreeMap::new();
        for position in entry.positions() {
            let path = &position.account_path;
            let current = match staged.get(path).or_else(|| self.accounts.get(path)) {
                Some(balance) => balance.clone(),
                None => AccountBalance::new(path.clone(), self.currency),
            };
            staged.insert(path.clone(), current.booked(&position.amount)?);
        }
        self.accounts.extend(staged);
        Ok(())
    }

    /// Balance of exactly `path`; zero for untouched accounts.
    #[must_use]
    pub fn balance(&self, path: &AccountPath) -> Amount {
        self.accounts
            .get(path)
            .map_or(Amount::zero(self.currency), |b| b.balance)
    }

    /// Turnover details of exactly `path`.
    #[must_use]
    pub fn get(&self, path: &AccountPath) -> Option<&AccountBalance> {
        self.accounts.get(path)
    }

    /// Balance of `path` and all its descendants.
    pub fn rolled_up(&self, path: &AccountPath) -> Result<Amount, AmountError> {
        Amount::sum(
            self.currency,
            self.accounts
                .values()
                .filter(|b| &b.account_path == path || path.is_ancestor_of(&b.account_path))
                .map(|b| &b.balance),
        )
    }

    /// Sum over all accounts; zero whenever every entry balances.
    pub fn total(&self) -> Result<Amount, AmountError> {
        Amount::sum(self.currency, self.accounts.values().map(|b| &b.balance))
    }

    /// Balances ordered by account path.
    pub fn iter(&self) -> impl Iterator<Item = &AccountBalance> {
        self.accounts.values()
    }

    /// Number of accounts with bookings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// True if no account has been booked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}
