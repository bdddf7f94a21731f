//! Shared types and configuration for Hauptbuch.
//!
//! This crate provides common types used across all other crates:
//! - Money types with exact minor-unit arithmetic
//! - Allocation without rounding loss
//! - Typed IDs for type-safe entity references
//! - Configuration management

pub mod config;
pub mod types;

pub use config::LedgerConfig;
