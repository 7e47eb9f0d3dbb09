use std::collections::BTreeSet;

use crate::core::dependency::Scope;

/// Tunables of one resolution query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Artifacts released strictly after this instant are invisible.
    pub timestamp: i64,
    pub transitive: bool,
    /// Edges whose scope is outside this set are not followed.
    pub scopes: BTreeSet<Scope>,
    pub include_optional: bool,
}

impl ResolverConfig {
    pub const LATEST: i64 = i64::MAX;

    pub fn at(timestamp: i64) -> Self {
        Self {
            timestamp,
            ..Self::default()
        }
    }

    pub fn with_transitive(mut self, transitive: bool) -> Self {
        self.transitive = transitive;
        self
    }

    pub fn with_scopes(mut self, scopes: impl IntoIterator<Item = Scope>) -> Self {
        self.scopes = scopes.into_iter().collect();
        self
    }

    pub fn with_include_optional(mut self, include_optional: bool) -> Self {
        self.include_optional = include_optional;
        self
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            timestamp: Self::LATEST,
            transitive: true,
            scopes: BTreeSet::from([Scope::Compile, Scope::Runtime]),
            include_optional: false,
        }
    }
}
