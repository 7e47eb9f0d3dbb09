//! Loads artifact descriptors from JSON (an array of records) or JSON-lines
//! (one record per line) into a [`DependencyGraph`].
//!
//! ```json
//! {"groupId": "org.example", "artifactId": "app", "version": "1.0",
//!  "releaseDate": 1700000000000,
//!  "dependencies": [{"groupId": "org.example", "artifactId": "lib",
//!                    "version": "[1.0,2.0)", "scope": "runtime"}]}
//! ```

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::constraint::{constraint_spec, ConstraintError, VersionConstraint};
use crate::core::coordinate::{Ga, Gav};
use crate::core::dependency::{Dependency, DescriptorError, Exclusion, Scope, DEFAULT_PACKAGING};
use crate::core::pom::Pom;
use crate::graph::DependencyGraph;
use crate::util::parallel::{run_in_parallel, try_run_in_parallel};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactRecord {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub release_date: i64,
    #[serde(default)]
    pub dependencies: Vec<DependencyRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyRecord {
    pub group_id: String,
    pub artifact_id: String,
    /// Constraint spec; absent or blank means any version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub optional: bool,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub packaging_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclusions: Vec<ExclusionRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExclusionRecord {
    pub group_id: String,
    pub artifact_id: String,
}

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("record has an empty {0}")]
    EmptyField(&'static str),
    #[error(transparent)]
    Constraint(#[from] ConstraintError),
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),
}

/// Where in an input file a record sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Line(usize),
    Record(usize),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Line(line) => write!(f, "line {line}"),
            Location::Record(index) => write!(f, "record {index}"),
        }
    }
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path}: malformed JSON at {location}: {source}")]
    Parse {
        path: PathBuf,
        location: Location,
        #[source]
        source: serde_json::Error,
    },
    #[error("{path}: invalid artifact at {location}: {source}")]
    Record {
        path: PathBuf,
        location: Location,
        #[source]
        source: RecordError,
    },
}

impl ArtifactRecord {
    pub fn into_pom(self) -> Result<Pom, RecordError> {
        let gav = Gav::new(self.group_id, self.artifact_id, self.version);
        require(&gav.ga.group_id, "groupId")?;
        require(&gav.ga.artifact_id, "artifactId")?;
        require(gav.version.as_str(), "version")?;

        let mut pom = Pom::new(gav, self.release_date);
        for record in self.dependencies {
            pom.dependencies.push(record.into_dependency()?);
        }
        pom.validate()?;
        Ok(pom)
    }
}

impl DependencyRecord {
    fn into_dependency(self) -> Result<Dependency, RecordError> {
        let ga = Ga::new(self.group_id, self.artifact_id);
        require(&ga.group_id, "dependency groupId")?;
        require(&ga.artifact_id, "dependency artifactId")?;

        let constraints = match self.version.as_deref().map(str::trim) {
            Some(spec) if !spec.is_empty() => VersionConstraint::parse_all(spec)?,
            _ => vec![VersionConstraint::wildcard()],
        };
        let scope = match self.scope.as_deref() {
            Some(scope) => scope.parse::<Scope>()?,
            None => Scope::default(),
        };

        let mut dependency = Dependency::new(ga, constraints)
            .with_scope(scope)
            .with_optional(self.optional)
            .with_exclusions(
                self.exclusions
                    .into_iter()
                    .map(|exclusion| Exclusion::new(exclusion.group_id, exclusion.artifact_id)),
            );
        if let Some(packaging_type) = self.packaging_type {
            dependency = dependency.with_packaging(packaging_type);
        }
        if let Some(classifier) = self.classifier {
            dependency = dependency.with_classifier(classifier);
        }
        Ok(dependency)
    }
}

impl From<&Pom> for ArtifactRecord {
    fn from(pom: &Pom) -> Self {
        Self {
            group_id: pom.gav.ga.group_id.clone(),
            artifact_id: pom.gav.ga.artifact_id.clone(),
            version: pom.gav.version.to_string(),
            release_date: pom.release_date,
            dependencies: pom.dependencies.iter().map(DependencyRecord::from).collect(),
        }
    }
}

impl From<&Dependency> for DependencyRecord {
    fn from(dependency: &Dependency) -> Self {
        Self {
            group_id: dependency.ga.group_id.clone(),
            artifact_id: dependency.ga.artifact_id.clone(),
            version: Some(constraint_spec(&dependency.version_constraints)),
            scope: Some(dependency.scope.as_str().to_string()),
            optional: dependency.optional,
            packaging_type: (dependency.packaging_type != DEFAULT_PACKAGING)
                .then(|| dependency.packaging_type.clone()),
            classifier: (!dependency.classifier.is_empty()).then(|| dependency.classifier.clone()),
            exclusions: dependency
                .exclusions
                .iter()
                .map(|exclusion| ExclusionRecord {
                    group_id: exclusion.group_id.clone(),
                    artifact_id: exclusion.artifact_id.clone(),
                })
                .collect(),
        }
    }
}

pub fn load_graph(path: &Path, jobs: Option<usize>) -> Result<DependencyGraph, IngestError> {
    let graph = DependencyGraph::new();
    load_into(&graph, path, jobs)?;
    Ok(graph)
}

/// Parses every record of `path` and adds them to `graph`. Nothing is added
/// unless the whole file is valid. When a GAV repeats, the later record wins.
pub fn load_into(
    graph: &DependencyGraph,
    path: &Path,
    jobs: Option<usize>,
) -> Result<usize, IngestError> {
    let contents = fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let poms = if is_json_lines(path) {
        parse_json_lines(path, &contents, jobs)?
    } else {
        parse_json_array(path, &contents, jobs)?
    };
    let poms = keep_last_per_gav(poms);
    let count = poms.len();

    run_in_parallel(poms, jobs, |pom| {
        graph.insert(pom);
    });
    info!("loaded {count} artifacts from {}", path.display());
    Ok(count)
}

fn parse_json_lines(
    path: &Path,
    contents: &str,
    jobs: Option<usize>,
) -> Result<Vec<Pom>, IngestError> {
    let lines: Vec<(usize, &str)> = contents
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line))
        .filter(|(_, line)| !line.trim().is_empty())
        .collect();

    try_run_in_parallel(lines, jobs, |(line, text)| {
        let location = Location::Line(line);
        let record: ArtifactRecord =
            serde_json::from_str(text).map_err(|source| IngestError::Parse {
                path: path.to_path_buf(),
                location,
                source,
            })?;
        record.into_pom().map_err(|source| IngestError::Record {
            path: path.to_path_buf(),
            location,
            source,
        })
    })
}

fn parse_json_array(
    path: &Path,
    contents: &str,
    jobs: Option<usize>,
) -> Result<Vec<Pom>, IngestError> {
    let records: Vec<ArtifactRecord> =
        serde_json::from_str(contents).map_err(|source| IngestError::Parse {
            path: path.to_path_buf(),
            location: Location::Line(source.line()),
            source,
        })?;

    let indexed: Vec<(usize, ArtifactRecord)> = records.into_iter().enumerate().collect();
    try_run_in_parallel(indexed, jobs, |(index, record)| {
        record.into_pom().map_err(|source| IngestError::Record {
            path: path.to_path_buf(),
            location: Location::Record(index),
            source,
        })
    })
}

fn keep_last_per_gav(poms: Vec<Pom>) -> Vec<Pom> {
    let mut last: HashMap<Gav, usize> = HashMap::with_capacity(poms.len());
    for (idx, pom) in poms.iter().enumerate() {
        last.insert(pom.gav.clone(), idx);
    }
    if last.len() == poms.len() {
        return poms;
    }
    debug!("{} duplicate records superseded", poms.len() - last.len());
    poms.into_iter()
        .enumerate()
        .filter(|(idx, pom)| last.get(&pom.gav) == Some(idx))
        .map(|(_, pom)| pom)
        .collect()
}

fn is_json_lines(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("jsonl" | "ndjson")
    )
}

fn require(value: &str, field: &'static str) -> Result<(), RecordError> {
    if value.is_empty() {
        Err(RecordError::EmptyField(field))
    } else {
        Ok(())
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}
