//! Common types used across the workspace.

pub mod allocation;
pub mod format;
pub mod id;
pub mod money;

#[cfg(test)]
mod money_props;

pub use format::{FormatOptions, SignConvention};
pub use id::*;
pub use money::{Amount, AmountError, Currency};
