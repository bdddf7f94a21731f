//! Ledger domain types for entry creation and the entry lifecycle.

use std::fmt;

use chrono::NaiveDate;
use hauptbuch_shared::types::{Amount, TemplateId};
use serde::{Deserialize, Serialize};

use crate::account::AccountPath;

/// Entry status in the posting lifecycle.
///
/// Entries move `Draft → Posted → Void`. Only drafts can be changed or
/// deleted; a voided entry is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Entry is being drafted and can be modified.
    Draft,
    /// Entry has been posted to the ledger (immutable).
    Posted,
    /// Entry has been voided by a reversal (immutable).
    Void,
}

impl EntryStatus {
    /// Returns the lowercase wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Posted => "posted",
            Self::Void => "void",
        }
    }

    /// Parses a wire name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(Self::Draft),
            "posted" => Some(Self::Posted),
            "void" => Some(Self::Void),
            _ => None,
        }
    }

    /// Returns true if the entry can be modified.
    #[must_use]
    pub const fn is_editable(self) -> bool {
        matches!(self, Self::Draft)
    }

    /// Returns true if the entry is immutable.
    #[must_use]
    pub const fn is_immutable(self) -> bool {
        matches!(self, Self::Posted | Self::Void)
    }

    /// Returns true if the entry can be posted.
    #[must_use]
    pub const fn can_post(self) -> bool {
        matches!(self, Self::Draft)
    }

    /// Returns true if the entry can be voided.
    #[must_use]
    pub const fn can_void(self) -> bool {
        matches!(self, Self::Posted)
    }

    /// Returns true if the entry can be deleted.
    #[must_use]
    pub const fn can_delete(self) -> bool {
        matches!(self, Self::Draft)
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A position as supplied by the caller, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionInput {
    /// Target account.
    pub account: AccountPath,
    /// Signed amount; positive and negative positions must cancel out.
    pub amount: Amount,
    /// Optional line text.
    #[serde(default)]
    pub description: Option<String>,
    /// Whether the position is relevant for tax reporting.
    #[serde(default)]
    pub tax_relevant: bool,
}

impl PositionInput {
    /// Creates a position input without description, not tax relevant.
    pub fn new(account: impl Into<AccountPath>, amount: Amount) -> Self {
        Self {
            account: account.into(),
            amount,
            description: None,
            tax_relevant: false,
        }
    }

    /// Sets the line text.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Marks the position as tax relevant.
    #[must_use]
    pub fn tax_relevant(mut self) -> Self {
        self.tax_relevant = true;
        self
    }
}

/// A validated position of an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Target account.
    pub account_path: AccountPath,
    /// Signed, non-zero amount.
    pub amount: Amount,
    /// Optional line text.
    pub description: Option<String>,
    /// Whether the position is relevant for tax reporting.
    pub tax_relevant: bool,
    /// 1-based order within the entry.
    pub ordinal: u32,
}

impl Position {
    /// The same position with its amount negated.
    #[must_use]
    pub fn negated(&self) -> Self {
        Self {
            amount: self.amount.negate(),
            ..self.clone()
        }
    }
}

/// Input for creating an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEntry {
    /// Booking date.
    pub date: NaiveDate,
    /// Entry text.
    pub description: String,
    /// Positions in display order.
    pub positions: Vec<PositionInput>,
}

impl NewEntry {
    /// Creates an entry input.
    pub fn new(date: NaiveDate, description: impl Into<String>, positions: Vec<PositionInput>) -> Self {
        Self {
            date,
            description: description.into(),
            positions,
        }
    }
}

/// Changes to a draft entry; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryChanges {
    /// New booking date.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// New entry text.
    #[serde(default)]
    pub description: Option<String>,
    /// Replacement positions.
    #[serde(default)]
    pub positions: Option<Vec<PositionInput>>,
}

/// Identifies the template version an entry was generated from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateRef {
    /// Template version ID.
    pub template_id: TemplateId,
    /// Template name.
    pub name: String,
    /// Template version number.
    pub version: u32,
}
