//! Template error types.

use hauptbuch_shared::types::AmountError;
use thiserror::Error;

use super::types::AmountType;
use crate::account::{AccountPath, PathError};
use crate::ledger::EntryError;
use crate::ledger::error::PathList;

/// Errors that can occur while defining, versioning or applying templates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// Template name is missing or blank.
    #[error("Template name is required")]
    NameRequired,

    /// Too few lines to form a balanced entry.
    #[error("Template must have at least 2 lines, got {actual}")]
    InsufficientLines {
        /// Number of lines supplied.
        actual: usize,
    },

    /// Lines use more than one amount type.
    #[error("Template lines mix amount types: expected {expected}, found {found}")]
    MixedAmountTypes {
        /// Type of the first line.
        expected: AmountType,
        /// First deviating type.
        found: AmountType,
    },

    /// A line has a zero value.
    #[error("Template line {ordinal} has a zero value")]
    ZeroLineValue {
        /// 1-based line number.
        ordinal: u32,
    },

    /// A line references a structurally invalid account path.
    #[error("Template line {ordinal} has an invalid account path: {error}")]
    InvalidAccountPath {
        /// 1-based line number.
        ordinal: u32,
        /// The path violation.
        error: PathError,
    },

    /// The same account appears on more than one line.
    #[error("Template lines repeat accounts: {}", PathList(.0))]
    DuplicateAccounts(Vec<AccountPath>),

    /// Line values do not cancel out.
    #[error("Template lines of type {amount_type} are not balanced")]
    LinesNotBalanced {
        /// Amount type of the template.
        amount_type: AmountType,
    },

    /// A percentage or fraction template was applied without a total.
    #[error("A total is required to apply this template")]
    TotalRequired,

    /// Requested version does not exceed the current one.
    #[error("Template version {requested} must be greater than {current}")]
    VersionNotIncreasing {
        /// Latest existing version.
        current: u32,
        /// Version that was requested.
        requested: u32,
    },

    /// No template with this name exists.
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    /// The named template has no such version.
    #[error("Template {name} has no version {version}")]
    VersionNotFound {
        /// Template name.
        name: String,
        /// Requested version.
        version: u32,
    },

    /// The template version is deactivated.
    #[error("Template {name} version {version} is inactive")]
    TemplateInactive {
        /// Template name.
        name: String,
        /// Inactive version.
        version: u32,
    },

    /// Amount arithmetic failed.
    #[error(transparent)]
    Amount(#[from] AmountError),

    /// The generated entry was rejected.
    #[error(transparent)]
    Entry(#[from] EntryError),
}

impl TemplateError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NameRequired => "NAME_REQUIRED",
            Self::InsufficientLines { .. } => "INSUFFICIENT_LINES",
            Self::MixedAmountTypes { .. } => "MIXED_AMOUNT_TYPES",
            Self::ZeroLineValue { .. } => "ZERO_LINE_VALUE",
            Self::InvalidAccountPath { .. } => "INVALID_ACCOUNT_PATH",
            Self::DuplicateAccounts(_) => "DUPLICATE_ACCOUNTS",
            Self::LinesNotBalanced { .. } => "LINES_NOT_BALANCED",
            Self::TotalRequired => "TOTAL_REQUIRED",
            Self::VersionNotIncreasing { .. } => "VERSION_NOT_INCREASING",
            Self::TemplateNotFound(_) => "TEMPLATE_NOT_FOUND",
            Self::VersionNotFound { .. } => "VERSION_NOT_FOUND",
            Self::TemplateInactive { .. } => "TEMPLATE_INACTIVE",
            Self::Amount(inner) => inner.error_code(),
            Self::Entry(inner) => inner.error_code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(TemplateError::TotalRequired.error_code(), "TOTAL_REQUIRED");
        assert_eq!(
            TemplateError::LinesNotBalanced {
                amount_type: AmountType::Fraction
            }
            .error_code(),
            "LINES_NOT_BALANCED"
        );
        assert_eq!(
            TemplateError::Entry(EntryError::DescriptionRequired).error_code(),
            "DESCRIPTION_REQUIRED"
        );
    }

    #[test]
    fn test_account_error_display() {
        assert_eq!(
            TemplateError::InvalidAccountPath {
                ordinal: 2,
                error: PathError::EmptyPath
            }
            .to_string(),
            "Template line 2 has an invalid account path: Account path is empty"
        );
        let duplicates = TemplateError::DuplicateAccounts(vec![AccountPath::normalize("Aufwand:Büro")]);
        assert_eq!(duplicates.error_code(), "DUPLICATE_ACCOUNTS");
        assert_eq!(duplicates.to_string(), "Template lines repeat accounts: Aufwand : Büro");
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            TemplateError::MixedAmountTypes {
                expected: AmountType::Fixed,
                found: AmountType::Percentage
            }
            .to_string(),
            "Template lines mix amount types: expected fixed, found percentage"
        );
        assert_eq!(
            TemplateError::VersionNotIncreasing {
                current: 3,
                requested: 2
            }
            .to_string(),
            "Template version 2 must be greater than 3"
        );
    }
}
