use std::path::PathBuf;

use serde::Deserialize;

use crate::config::ConfigError;
use crate::core::dependency::Scope;
use crate::resolver::ResolverConfig;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GraphConfig {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub resolution: ResolutionSettings,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataConfig {
    /// JSON array or `.jsonl` stream of artifact records.
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default)]
    pub jobs: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolutionSettings {
    #[serde(default = "default_transitive")]
    pub transitive: bool,
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,
    #[serde(default)]
    pub include_optional: bool,
    /// Resolution cutoff; absent means "latest".
    #[serde(default)]
    pub timestamp: Option<i64>,
}

impl Default for ResolutionSettings {
    fn default() -> Self {
        Self {
            transitive: default_transitive(),
            scopes: default_scopes(),
            include_optional: false,
            timestamp: None,
        }
    }
}

impl ResolutionSettings {
    pub fn to_resolver_config(&self) -> Result<ResolverConfig, ConfigError> {
        let scopes = self
            .scopes
            .iter()
            .map(|scope| {
                scope
                    .parse::<Scope>()
                    .map_err(|_| ConfigError::InvalidScope(scope.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ResolverConfig::at(self.timestamp.unwrap_or(ResolverConfig::LATEST))
            .with_transitive(self.transitive)
            .with_scopes(scopes)
            .with_include_optional(self.include_optional))
    }
}

fn default_transitive() -> bool {
    true
}

fn default_scopes() -> Vec<String> {
    vec![
        Scope::Compile.as_str().to_string(),
        Scope::Runtime.as_str().to_string(),
    ]
}
