//! Registry of built-in test suites.

use std::sync::Arc;

use super::saml2int::Saml2Int;
use super::TestSuite;
use crate::error::{HarnessError, HarnessResult};

type SuiteFactory = fn() -> Arc<dyn TestSuite>;

/// Maps stable suite identifiers to their constructors.
pub struct SuiteRegistry {
    entries: Vec<(&'static str, SuiteFactory)>,
}

impl SuiteRegistry {
    /// Registry holding every suite shipped with the harness.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(Saml2Int::ID, saml2int);
        registry
    }

    /// Registry without any suite.
    #[must_use]
    pub const fn empty() -> Self {
        Self { entries: Vec::new() }
    }

    /// Registers `factory` under `id`, replacing any previous entry.
    pub fn register(&mut self, id: &'static str, factory: SuiteFactory) {
        self.entries.retain(|(existing, _)| !existing.eq_ignore_ascii_case(id));
        self.entries.push((id, factory));
    }

    /// Constructs the suite registered under `id` (case-insensitive).
    pub fn get(&self, id: &str) -> HarnessResult<Arc<dyn TestSuite>> {
        self.entries
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(id))
            .map(|(_, factory)| factory())
            .ok_or_else(|| HarnessError::UnknownSuite(id.to_string()))
    }

    /// Registered identifiers, in registration order.
    #[must_use]
    pub fn ids(&self) -> Vec<&'static str> {
        self.entries.iter().map(|(id, _)| *id).collect()
    }

    /// Constructs every registered suite.
    #[must_use]
    pub fn list(&self) -> Vec<Arc<dyn TestSuite>> {
        self.entries.iter().map(|(_, factory)| factory()).collect()
    }
}

fn saml2int() -> Arc<dyn TestSuite> {
    Arc::new(Saml2Int::new())
}

impl Default for SuiteRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
