use std::env;
use std::path::{Path, PathBuf};

use crate::config::{ConfigError, GraphConfig, CONFIG_FILE_NAME};

pub const CONFIG_ENV: &str = "ARTIFACT_GRAPH_CONFIG";
pub const DATA_ENV: &str = "ARTIFACT_GRAPH_DATA";
pub const JOBS_ENV: &str = "ARTIFACT_GRAPH_JOBS";

/// Locates the config file: an explicit path first, then `ARTIFACT_GRAPH_CONFIG`,
/// then the nearest `artifact-graph.toml` above `start`. Only the search is
/// allowed to come back empty; a named file that does not exist is an error.
pub fn resolve_config_path(
    start: impl AsRef<Path>,
    explicit: Option<PathBuf>,
) -> Result<Option<PathBuf>, ConfigError> {
    if let Some(path) = explicit {
        return require_file(path).map(Some);
    }

    if let Ok(path) = env::var(CONFIG_ENV) {
        return require_file(PathBuf::from(path)).map(Some);
    }

    Ok(find_config_from(start.as_ref()))
}

/// Reads and parses `path`; a relative `[data].path` is rebased onto the
/// directory holding the file.
pub fn load_config(path: &Path) -> Result<GraphConfig, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
    }

    let contents = std::fs::read_to_string(path)?;
    let mut config: GraphConfig = toml::from_str(&contents).map_err(|source| ConfigError::Toml {
        path: path.to_path_buf(),
        source,
    })?;

    if let (Some(data), Some(dir)) = (config.data.path.as_mut(), path.parent()) {
        if data.is_relative() {
            *data = dir.join(&*data);
        }
    }

    Ok(config)
}

pub fn apply_env_overrides(config: &mut GraphConfig) -> Result<(), ConfigError> {
    apply_overrides_from(config, |name| env::var(name).ok())
}

pub fn apply_overrides_from(
    config: &mut GraphConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), ConfigError> {
    if let Some(path) = lookup(DATA_ENV).filter(|value| !value.is_empty()) {
        config.data.path = Some(PathBuf::from(path));
    }

    if let Some(jobs) = lookup(JOBS_ENV).filter(|value| !value.is_empty()) {
        let parsed = jobs
            .trim()
            .parse::<usize>()
            .map_err(|_| ConfigError::InvalidValue {
                name: JOBS_ENV.to_string(),
                value: jobs.clone(),
            })?;
        config.data.jobs = Some(parsed);
    }

    Ok(())
}

fn require_file(path: PathBuf) -> Result<PathBuf, ConfigError> {
    if path.is_file() {
        Ok(path)
    } else {
        Err(ConfigError::ConfigNotFound(path))
    }
}

fn find_config_from(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|ancestor| ancestor.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file())
}
