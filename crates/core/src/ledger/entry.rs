//! The ledger entry aggregate.
//!
//! An [`Entry`] is produced by the [`LedgerService`] or loaded back from
//! storage. Fields are private and every state change returns a new
//! snapshot. Loaded snapshots are not trusted: posting re-runs the
//! position rules before an entry becomes immutable.
//!
//! [`LedgerService`]: super::service::LedgerService

use chrono::{DateTime, NaiveDate, Utc};
use hauptbuch_shared::types::{Amount, AmountError, Currency, EntryId, UserId};
use serde::{Deserialize, Serialize};

use super::types::{EntryStatus, Position, TemplateRef};
use super::validation::ValidatedEntry;

/// A double-entry journal entry with its audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    id: EntryId,
    date: NaiveDate,
    description: String,
    status: EntryStatus,
    positions: Vec<Position>,
    created_by: UserId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    posted_at: Option<DateTime<Utc>>,
    posted_by: Option<UserId>,
    voided_at: Option<DateTime<Utc>>,
    voided_by: Option<UserId>,
    void_reason: Option<String>,
    reversal_of: Option<EntryId>,
    reversed_by: Option<EntryId>,
    source_template: Option<TemplateRef>,
}

impl Entry {
    pub(crate) fn draft(
        validated: ValidatedEntry,
        actor: UserId,
        now: DateTime<Utc>,
        source_template: Option<TemplateRef>,
    ) -> Self {
        Self {
            id: EntryId::new(),
            date: validated.date,
            description: validated.description,
            status: EntryStatus::Draft,
            positions: validated.positions,
            created_by: actor,
            created_at: now,
            updated_at: now,
            posted_at: None,
            posted_by: None,
            voided_at: None,
            voided_by: None,
            void_reason: None,
            reversal_of: None,
            reversed_by: None,
            source_template,
        }
    }

    pub(crate) fn revised(&self, validated: ValidatedEntry, now: DateTime<Utc>) -> Self {
        Self {
            date: validated.date,
            description: validated.description,
            positions: validated.positions,
            updated_at: now,
            ..self.clone()
        }
    }

    pub(crate) fn posted(&self, actor: UserId, now: DateTime<Utc>) -> Self {
        Self {
            status: EntryStatus::Posted,
            posted_at: Some(now),
            posted_by: Some(actor),
            updated_at: now,
            ..self.clone()
        }
    }

    pub(crate) fn voided(
        &self,
        actor: UserId,
        now: DateTime<Utc>,
        reason: String,
        reversal: EntryId,
    ) -> Self {
        Self {
            status: EntryStatus::Void,
            voided_at: Some(now),
            voided_by: Some(actor),
            void_reason: Some(reason),
            reversed_by: Some(reversal),
            updated_at: now,
            ..self.clone()
        }
    }

    /// Builds the posted counter-entry for `original`.
    pub(crate) fn reversal(original: &Self, validated: ValidatedEntry, actor: UserId, now: DateTime<Utc>) -> Self {
        let mut reversal = Self::draft(validated, actor, now, None).posted(actor, now);
        reversal.reversal_of = Some(original.id);
        reversal
    }

    /// Entry ID.
    #[must_use]
    pub fn id(&self) -> EntryId {
        self.id
    }

    /// Booking date.
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Entry text.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Lifecycle status.
    #[must_use]
    pub fn status(&self) -> EntryStatus {
        self.status
    }

    /// Positions ordered by ordinal.
    #[must_use]
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Who created the draft.
    #[must_use]
    pub fn created_by(&self) -> UserId {
        self.created_by
    }

    /// Creation time.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Time of the last change, including posting and voiding.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// When the entry was posted. `None` for drafts.
    #[must_use]
    pub fn posted_at(&self) -> Option<DateTime<Utc>> {
        self.posted_at
    }

    /// Who posted the entry.
    #[must_use]
    pub fn posted_by(&self) -> Option<UserId> {
        self.posted_by
    }

    /// When the entry was voided.
    #[must_use]
    pub fn voided_at(&self) -> Option<DateTime<Utc>> {
        self.voided_at
    }

    /// Who voided the entry.
    #[must_use]
    pub fn voided_by(&self) -> Option<UserId> {
        self.voided_by
    }

    /// The trimmed reason given when voiding.
    #[must_use]
    pub fn void_reason(&self) -> Option<&str> {
        self.void_reason.as_deref()
    }

    /// For a reversal, the entry it cancels.
    #[must_use]
    pub fn reversal_of(&self) -> Option<EntryId> {
        self.reversal_of
    }

    /// For a voided entry, its reversal.
    #[must_use]
    pub fn reversed_by(&self) -> Option<EntryId> {
        self.reversed_by
    }

    /// The template version this entry was generated from, if any.
    #[must_use]
    pub fn source_template(&self) -> Option<&TemplateRef> {
        self.source_template.as_ref()
    }

    /// Currency of the first position, if any.
    #[must_use]
    pub fn currency(&self) -> Option<Currency> {
        self.positions.first().map(|p| p.amount.currency())
    }

    /// Sum of all positions; zero for every accepted entry.
    pub fn total(&self) -> Result<Amount, AmountError> {
        let currency = self.currency().unwrap_or_default();
        Amount::sum(currency, self.positions.iter().map(|p| &p.amount))
    }

    /// Sum of the positive positions, i.e. the booked volume.
    pub fn volume(&self) -> Result<Amount, AmountError> {
        let currency = self.currency().unwrap_or_default();
        Amount::sum(
            currency,
            self.positions.iter().map(|p| &p.amount).filter(|a| a.is_positive()),
        )
    }

    /// Whether `update` accepts this entry.
    #[must_use]
    pub fn can_edit(&self) -> bool {
        self.status.is_editable()
    }

    /// Whether `post` accepts this entry.
    #[must_use]
    pub fn can_post(&self) -> bool {
        self.status.can_post()
    }

    /// Whether `void` accepts this entry.
    #[must_use]
    pub fn can_void(&self) -> bool {
        self.status.can_void()
    }

    /// Whether `delete` accepts this entry.
    #[must_use]
    pub fn can_delete(&self) -> bool {
        self.status.can_delete()
    }

    /// Posted and voided entries never change again.
    #[must_use]
    pub fn is_immutable(&self) -> bool {
        self.status.is_immutable()
    }

    /// True for entries created by voiding another entry.
    #[must_use]
    pub fn is_reversal(&self) -> bool {
        self.reversal_of.is_some()
    }
}
