//! Posting templates.
//!
//! A template is a named, versioned posting pattern. Its lines carry fixed
//! amounts, percentages or fractions of a total; applying it expands the
//! lines into positions and creates a draft entry through the ledger.

pub mod catalog;
pub mod engine;
pub mod error;
pub mod types;

#[cfg(test)]
mod engine_props;

pub use catalog::TemplateCatalog;
pub use engine::{TemplateEngine, validate_lines};
pub use error::TemplateError;
pub use types::{AmountType, ApplyAttrs, LineAmount, Template, TemplateLine, TemplateLineInput};
