//! Ledger error types for validation and lifecycle errors.
//!
//! Every rule the entry aggregate enforces has its own variant with a
//! structured payload, so callers can translate them without parsing
//! messages.

use std::fmt;

use chrono::NaiveDate;
use hauptbuch_shared::types::{Amount, AmountError};
use thiserror::Error;

use crate::account::{AccountPath, PathError};

/// Errors that can occur during ledger entry operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryError {
    // ========== Validation Errors ==========
    /// Too few positions.
    #[error("Entry must have at least {min} positions, got {actual}")]
    InsufficientPositions {
        /// Configured minimum.
        min: usize,
        /// Number of positions supplied.
        actual: usize,
    },

    /// Too many positions.
    #[error("Entry must not have more than {max} positions")]
    ExceedsMaxPositions {
        /// Configured maximum.
        max: usize,
    },

    /// Position amounts do not sum to zero.
    #[error("Transaction is not balanced, difference: {difference}")]
    TransactionNotBalanced {
        /// The non-zero sum of all positions.
        difference: Amount,
    },

    /// A position carries a zero amount.
    #[error("Position {ordinal} has a zero amount")]
    ZeroAmountPosition {
        /// 1-based position number.
        ordinal: u32,
    },

    /// A position references a structurally invalid account path.
    #[error("Position {ordinal} has an invalid account path: {error}")]
    InvalidAccountPath {
        /// 1-based position number.
        ordinal: u32,
        /// Why the path was rejected.
        error: PathError,
    },

    /// The same account appears on more than one position.
    #[error("Duplicate accounts: {}", PathList(.0))]
    DuplicateAccounts(Vec<AccountPath>),

    /// Referenced accounts are unknown or deactivated.
    #[error("Accounts not found or inactive: {}", PathList(.0))]
    AccountsNotFoundOrInactive(Vec<AccountPath>),

    /// Entry is dated after today.
    #[error("Entry date {date} lies after today ({today})")]
    FutureDateNotAllowed {
        /// Requested entry date.
        date: NaiveDate,
        /// The clock's current date.
        today: NaiveDate,
    },

    /// Entry is dated before the backdate window.
    #[error("Entry date lies more than {days} days in the past")]
    ExceedsBackdateLimit {
        /// Configured limit in days.
        days: u32,
    },

    /// Entry description is missing or blank.
    #[error("Entry description is required")]
    DescriptionRequired,

    // ========== Lifecycle Errors ==========
    /// Post attempted on an entry that is not a draft.
    #[error("Entry has already been posted")]
    AlreadyPosted,

    /// Void attempted on an entry that is not posted.
    #[error("Entry is not posted")]
    NotPosted,

    /// Update attempted on an entry that is not a draft.
    #[error("Only draft entries can be edited")]
    EntryNotEditable,

    /// Delete attempted on an entry that is not a draft.
    #[error("Only draft entries can be deleted")]
    EntryNotDeletable,

    /// Void reason missing or blank.
    #[error("Void reason is required")]
    VoidReasonRequired,

    /// Void reason below the minimum length.
    #[error("Void reason must be at least {min} characters")]
    VoidReasonTooShort {
        /// Configured minimum length.
        min: usize,
    },

    /// Void reason above the maximum length.
    #[error("Void reason must not exceed {max} characters")]
    VoidReasonTooLong {
        /// Configured maximum length.
        max: usize,
    },

    // ========== Arithmetic Errors ==========
    /// Amount arithmetic failed, e.g. positions in different currencies.
    #[error(transparent)]
    Amount(#[from] AmountError),
}

impl EntryError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientPositions { .. } => "INSUFFICIENT_POSITIONS",
            Self::ExceedsMaxPositions { .. } => "EXCEEDS_MAX_POSITIONS",
            Self::TransactionNotBalanced { .. } => "TRANSACTION_NOT_BALANCED",
            Self::ZeroAmountPosition { .. } => "ZERO_AMOUNT_POSITION",
            Self::InvalidAccountPath { .. } => "INVALID_ACCOUNT_PATH",
            Self::DuplicateAccounts(_) => "DUPLICATE_ACCOUNTS",
            Self::AccountsNotFoundOrInactive(_) => "ACCOUNTS_NOT_FOUND_OR_INACTIVE",
            Self::FutureDateNotAllowed { .. } => "FUTURE_DATE_NOT_ALLOWED",
            Self::ExceedsBackdateLimit { .. } => "EXCEEDS_BACKDATE_LIMIT",
            Self::DescriptionRequired => "DESCRIPTION_REQUIRED",
            Self::AlreadyPosted => "ALREADY_POSTED",
            Self::NotPosted => "NOT_POSTED",
            Self::EntryNotEditable => "ENTRY_NOT_EDITABLE",
            Self::EntryNotDeletable => "ENTRY_NOT_DELETABLE",
            Self::VoidReasonRequired => "VOID_REASON_REQUIRED",
            Self::VoidReasonTooShort { .. } => "VOID_REASON_TOO_SHORT",
            Self::VoidReasonTooLong { .. } => "VOID_REASON_TOO_LONG",
            Self::Amount(inner) => inner.error_code(),
        }
    }

    /// Returns true for errors caused by the entry's content rather than
    /// its lifecycle state.
    #[must_use]
    pub fn is_validation_error(&self) -> bool {
        !matches!(
            self,
            Self::AlreadyPosted
                | Self::NotPosted
                | Self::EntryNotEditable
                | Self::EntryNotDeletable
                | Self::VoidReasonRequired
                | Self::VoidReasonTooShort { .. }
                | Self::VoidReasonTooLong { .. }
        )
    }
}

/// Every violation found by one validation run, in pipeline order.
///
/// Never empty: a run without violations yields the validated entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{first} ({} further validation error(s))", .rest.len())]
pub struct ValidationErrors {
    first: EntryError,
    rest: Vec<EntryError>,
}

impl ValidationErrors {
    /// Wraps a list of errors; `None` if the list is empty.
    #[must_use]
    pub fn from_vec(errors: Vec<EntryError>) -> Option<Self> {
        let mut errors = errors.into_iter();
        let first = errors.next()?;
        Some(Self {
            first,
            rest: errors.collect(),
        })
    }

    /// The first recorded error.
    #[must_use]
    pub fn first(&self) -> &EntryError {
        &self.first
    }

    /// Consumes the list, returning its first error.
    #[must_use]
    pub fn into_first(self) -> EntryError {
        self.first
    }

    /// All errors in order.
    pub fn iter(&self) -> impl Iterator<Item = &EntryError> {
        std::iter::once(&self.first).chain(&self.rest)
    }

    /// All errors in order.
    #[must_use]
    pub fn into_vec(self) -> Vec<EntryError> {
        let mut errors = Vec::with_capacity(self.rest.len() + 1);
        errors.push(self.first);
        errors.extend(self.rest);
        errors
    }

    /// Number of errors, at least one.
    #[must_use]
    pub fn count(&self) -> usize {
        self.rest.len() + 1
    }

    /// Error codes in order.
    #[must_use]
    pub fn codes(&self) -> Vec<&'static str> {
        self.iter().map(EntryError::error_code).collect()
    }
}

/// Renders paths as a comma-separated list in error messages.
pub(crate) struct PathList<'a>(pub(crate) &'a [AccountPath]);

impl fmt::Display for PathList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, path) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{path}")?;
        }
        Ok(())
    }
}
