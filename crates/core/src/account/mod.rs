//! Account paths and account lookup.
//!
//! This module implements the hierarchical account model:
//! - `path` - Normalized path value type and its relationship algebra
//! - `lookup` - Account references and the injected lookup contract
//! - `error` - Path validation errors

pub mod error;
pub mod lookup;
pub mod path;

#[cfg(test)]
mod path_props;

pub use error::PathError;
pub use lookup::{Account, AccountLookup, InMemoryAccounts};
pub use path::{AccountPath, DEFAULT_MAX_DEPTH, DisplayFormat, SEPARATOR};
