//! Core bookkeeping logic for Hauptbuch.
//!
//! This crate contains pure business logic with no web or database
//! dependencies. Time and account state are injected through traits.
//!
//! # Modules
//!
//! - `account` - Hierarchical account paths and the account lookup contract
//! - `clock` - Injected time source
//! - `ledger` - Double-entry entries, validation and the posting lifecycle
//! - `template` - Versioned posting templates expanded into entries

pub mod account;
pub mod clock;
pub mod ledger;
pub mod template;
