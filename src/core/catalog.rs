use std::path::{Path, PathBuf};

use log::debug;

use crate::config::resolve::{apply_env_overrides, load_config, resolve_config_path};
use crate::config::{ConfigError, GraphConfig};
use crate::error::Result;
use crate::graph::builder::load_graph;
use crate::graph::DependencyGraph;
use crate::resolver::{Resolver, ResolverConfig};

/// A loaded artifact corpus together with the configuration it came from.
#[derive(Debug)]
pub struct Catalog {
    pub config_path: Option<PathBuf>,
    pub config: GraphConfig,
    pub graph: DependencyGraph,
}

impl Catalog {
    pub fn discover(start: impl AsRef<Path>) -> Result<Self> {
        Self::discover_with_overrides(start, None, None)
    }

    /// `config_path` replaces the config search, `data_path` replaces whatever
    /// data file the config and environment name.
    pub fn discover_with_overrides(
        start: impl AsRef<Path>,
        config_path: Option<PathBuf>,
        data_path: Option<PathBuf>,
    ) -> Result<Self> {
        let config_path = resolve_config_path(start, config_path)?;
        let mut config = match config_path.as_deref() {
            Some(path) => {
                debug!("using config {}", path.display());
                load_config(path)?
            }
            None => GraphConfig::default(),
        };
        apply_env_overrides(&mut config)?;
        if let Some(path) = data_path {
            config.data.path = Some(path);
        }

        Self::load(config_path, config)
    }

    pub fn load(config_path: Option<PathBuf>, config: GraphConfig) -> Result<Self> {
        let data = config
            .data
            .path
            .clone()
            .ok_or(ConfigError::MissingDataPath)?;
        let graph = load_graph(&data, config.data.jobs)?;

        Ok(Self {
            config_path,
            config,
            graph,
        })
    }

    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.graph)
    }

    /// The `[resolution]` defaults, before any per-command flags.
    pub fn resolver_config(&self) -> Result<ResolverConfig> {
        Ok(self.config.resolution.to_resolver_config()?)
    }
}
