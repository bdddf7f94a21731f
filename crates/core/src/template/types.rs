//! Template domain types.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use hauptbuch_shared::types::{Amount, TemplateId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::engine::validate_lines;
use super::error::TemplateError;
use crate::account::AccountPath;
use crate::ledger::TemplateRef;

/// How the lines of a template express their amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmountType {
    /// Fixed amounts used as-is.
    Fixed,
    /// Signed percentages of a total.
    Percentage,
    /// Signed fractions of a total.
    Fraction,
}

impl AmountType {
    /// Returns the lowercase wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Percentage => "percentage",
            Self::Fraction => "fraction",
        }
    }
}

impl fmt::Display for AmountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How one template line derives its amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum LineAmount {
    /// A fixed signed amount.
    Fixed(Amount),
    /// A signed percentage of the applied total, e.g. `19` for 19 %.
    Percentage(Decimal),
    /// A signed fraction of the applied total, e.g. `0.19`.
    Fraction(Decimal),
}

impl LineAmount {
    /// The kind of value this line carries.
    #[must_use]
    pub const fn amount_type(&self) -> AmountType {
        match self {
            Self::Fixed(_) => AmountType::Fixed,
            Self::Percentage(_) => AmountType::Percentage,
            Self::Fraction(_) => AmountType::Fraction,
        }
    }

    /// True for a zero fixed amount, percentage or fraction.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Fixed(amount) => amount.is_zero(),
            Self::Percentage(value) | Self::Fraction(value) => value.is_zero(),
        }
    }
}

/// A template line as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateLineInput {
    /// Target account.
    pub account: AccountPath,
    /// How the line amount is derived.
    pub amount: LineAmount,
    /// Optional line text, copied onto generated positions.
    #[serde(default)]
    pub description: Option<String>,
    /// Whether generated positions are tax relevant.
    #[serde(default)]
    pub tax_relevant: bool,
}

impl TemplateLineInput {
    /// Creates a line with no description that is not tax relevant.
    /// The account is normalized but not validated until the template is built.
    pub fn new(account: impl Into<AccountPath>, amount: LineAmount) -> Self {
        Self {
            account: account.into(),
            amount,
            description: None,
            tax_relevant: false,
        }
    }

    /// Line with a fixed amount.
    pub fn fixed(account: impl Into<AccountPath>, amount: Amount) -> Self {
        Self::new(account, LineAmount::Fixed(amount))
    }

    /// Line with a percentage of the total.
    pub fn percentage(account: impl Into<AccountPath>, percentage: Decimal) -> Self {
        Self::new(account, LineAmount::Percentage(percentage))
    }

    /// Line with a fraction of the total.
    pub fn fraction(account: impl Into<AccountPath>, fraction: Decimal) -> Self {
        Self::new(account, LineAmount::Fraction(fraction))
    }

    /// Sets the line text.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Marks the line as tax relevant.
    #[must_use]
    pub fn tax_relevant(mut self) -> Self {
        self.tax_relevant = true;
        self
    }
}

/// A validated template line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateLine {
    /// Target account.
    pub account_path: AccountPath,
    /// Fixed amount, percentage or fraction.
    pub amount: LineAmount,
    /// Optional line text, copied into generated positions.
    pub description: Option<String>,
    /// Copied into generated positions.
    pub tax_relevant: bool,
    /// 1-based order; generated positions follow it.
    pub ordinal: u32,
}

impl From<&TemplateLine> for TemplateLineInput {
    fn from(line: &TemplateLine) -> Self {
        Self {
            account: line.account_path.clone(),
            amount: line.amount,
            description: line.description.clone(),
            tax_relevant: line.tax_relevant,
        }
    }
}

/// One immutable version of a named posting pattern.
///
/// Deserialization re-runs the line rules, so a stored template with mixed
/// amount types or unbalanced lines is rejected on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TemplateRepr", into = "TemplateRepr")]
pub struct Template {
    id: TemplateId,
    name: String,
    version: u32,
    default_total: Option<Amount>,
    active: bool,
    lines: Vec<TemplateLine>,
    created_at: DateTime<Utc>,
}

impl Template {
    pub(crate) fn new(
        name: String,
        version: u32,
        default_total: Option<Amount>,
        active: bool,
        lines: Vec<TemplateLine>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: TemplateId::new(),
            name,
            version,
            default_total,
            active,
            lines,
            created_at,
        }
    }

    /// ID of this version.
    #[must_use]
    pub fn id(&self) -> TemplateId {
        self.id
    }

    /// Template name, shared by all versions.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Version number, starting at 1.
    #[must_use]
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Total used by `apply` when the caller passes none.
    #[must_use]
    pub fn default_total(&self) -> Option<Amount> {
        self.default_total
    }

    /// Inactive versions stay in the catalog but cannot be applied.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Lines in ordinal order.
    #[must_use]
    pub fn lines(&self) -> &[TemplateLine] {
        &self.lines
    }

    /// When this version was created.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// The amount type shared by all lines.
    #[must_use]
    pub fn amount_type(&self) -> Option<AmountType> {
        self.lines.first().map(|line| line.amount.amount_type())
    }

    /// True if applying the template needs a total.
    #[must_use]
    pub fn requires_total(&self) -> bool {
        matches!(
            self.amount_type(),
            Some(AmountType::Percentage | AmountType::Fraction)
        )
    }

    /// Reference recorded on entries generated from this version.
    #[must_use]
    pub fn reference(&self) -> TemplateRef {
        TemplateRef {
            template_id: self.id,
            name: self.name.clone(),
            version: self.version,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct TemplateRepr {
    id: TemplateId,
    name: String,
    version: u32,
    default_total: Option<Amount>,
    active: bool,
    lines: Vec<TemplateLine>,
    created_at: DateTime<Utc>,
}

impl TryFrom<TemplateRepr> for Template {
    type Error = TemplateError;

    fn try_from(repr: TemplateRepr) -> Result<Self, Self::Error> {
        let name = repr.name.trim();
        if name.is_empty() {
            return Err(TemplateError::NameRequired);
        }
        // Depth limits are deployment settings checked when a template is
        // defined; loading only re-checks structure and balance.
        let inputs = repr.lines.iter().map(TemplateLineInput::from).collect();
        let lines = validate_lines(inputs, usize::MAX)?;
        Ok(Self {
            id: repr.id,
            name: name.to_string(),
            version: repr.version,
            default_total: repr.default_total,
            active: repr.active,
            lines,
            created_at: repr.created_at,
        })
    }
}

impl From<Template> for TemplateRepr {
    fn from(template: Template) -> Self {
        Self {
            id: template.id,
            name: template.name,
            version: template.version,
            default_total: template.default_total,
            active: template.active,
            lines: template.lines,
            created_at: template.created_at,
        }
    }
}

/// Entry attributes supplied when applying a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyAttrs {
    /// Booking date.
    pub date: NaiveDate,
    /// Entry text; the template name when absent.
    #[serde(default)]
    pub description: Option<String>,
    /// Acting user.
    pub actor: UserId,
}

impl ApplyAttrs {
    /// Attributes for an entry on `date` created by `actor`.
    #[must_use]
    pub fn new(date: NaiveDate, actor: UserId) -> Self {
        Self {
            date,
            description: None,
            actor,
        }
    }

    /// Overrides the entry text.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
