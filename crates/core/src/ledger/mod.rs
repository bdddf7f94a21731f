//! Double-entry bookkeeping logic.
//!
//! This module implements the ledger entry aggregate:
//! - Entries and positions with their posting lifecycle
//! - Business rule validation as a pipeline of pure steps
//! - Ledger service for create, update, post, void and delete
//! - Account balances with hierarchical roll-up
//! - Error types for ledger operations

pub mod balance;
pub mod entry;
pub mod error;
pub mod service;
pub mod types;
pub mod validation;

#[cfg(test)]
mod service_props;
#[cfg(test)]
mod validation_props;

pub use balance::{AccountBalance, AccountBalances};
pub use entry::Entry;
pub use error::{EntryError, ValidationErrors};
pub use service::{LedgerService, REVERSAL_PREFIX};
pub use types::{EntryChanges, EntryStatus, NewEntry, Position, PositionInput, TemplateRef};
pub use validation::{ValidatedEntry, ValidationContext};
