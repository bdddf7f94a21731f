//! In-memory versioned template store.
//!
//! Versions of a name are kept in ascending order. Registration rejects any
//! version that does not exceed the latest one, which is the same rule a
//! persistent store enforces with a unique `(name, version)` constraint.

use std::collections::BTreeMap;

use hauptbuch_shared::types::Amount;
use tracing::info;

use super::engine::TemplateEngine;
use super::error::TemplateError;
use super::types::{Template, TemplateLineInput};
use crate::clock::Clock;

/// All versions of all templates, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct TemplateCatalog {
    templates: BTreeMap<String, Vec<Template>>,
}

impl TemplateCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a template version.
    ///
    /// # Errors
    ///
    /// `VersionNotIncreasing` if the name already has this or a later version.
    pub fn register(&mut self, template: Template) -> Result<&Template, TemplateError> {
        let versions = self.templates.entry(template.name().to_string()).or_default();
        if let Some(current) = versions.last() {
            if template.version() <= current.version() {
                return Err(TemplateError::VersionNotIncreasing {
                    current: current.version(),
                    requested: template.version(),
                });
            }
        }
        info!(
            template = %template.name(),
            version = template.version(),
            active = template.is_active(),
            "Template registered"
        );
        let index = versions.len();
        versions.push(template);
        Ok(&versions[index])
    }

    /// The newest version of `name`.
    ///
    /// # Errors
    ///
    /// `TemplateNotFound` for unknown names.
    pub fn latest(&self, name: &str) -> Result<&Template, TemplateError> {
        self.templates
            .get(name.trim())
            .and_then(|versions| versions.last())
            .ok_or_else(|| TemplateError::TemplateNotFound(name.trim().to_string()))
    }

    /// A specific version of `name`.
    ///
    /// # Errors
    ///
    /// `TemplateNotFound` for unknown names, `VersionNotFound` for unknown versions.
    pub fn version(&self, name: &str, version: u32) -> Result<&Template, TemplateError> {
        let name = name.trim();
        let versions = self
            .templates
            .get(name)
            .ok_or_else(|| TemplateError::TemplateNotFound(name.to_string()))?;
        versions
            .iter()
            .find(|t| t.version() == version)
            .ok_or_else(|| TemplateError::VersionNotFound {
                name: name.to_string(),
                version,
            })
    }

    /// Every version of `name`, oldest first; empty for unknown names.
    #[must_use]
    pub fn history(&self, name: &str) -> &[Template] {
        self.templates
            .get(name.trim())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Registered names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    /// Latest versions that are active.
    pub fn active(&self) -> impl Iterator<Item = &Template> {
        self.templates
            .values()
            .filter_map(|versions| versions.last())
            .filter(|t| t.is_active())
    }

    /// Publishes and registers the next version of `name`.
    ///
    /// # Errors
    ///
    /// `TemplateNotFound` for unknown names, otherwise the engine's line rules.
    pub fn revise<C: Clock>(
        &mut self,
        engine: &TemplateEngine<C>,
        name: &str,
        lines: Vec<TemplateLineInput>,
        default_total: Option<Amount>,
    ) -> Result<&Template, TemplateError> {
        let next = engine.new_version(self.latest(name)?, lines, default_total)?;
        self.register(next)
    }

    /// Publishes and registers an inactive next version of `name`.
    ///
    /// # Errors
    ///
    /// `TemplateNotFound` for unknown names.
    pub fn deactivate<C: Clock>(
        &mut self,
        engine: &TemplateEngine<C>,
        name: &str,
    ) -> Result<&Template, TemplateError> {
        let next = engine.deactivated(self.latest(name)?)?;
        self.register(next)
    }
}
