use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::core::constraint::{constraint_spec, ConstraintError, VersionConstraint};
use crate::core::version::Version;

/// Group-id and artifact-id pair identifying a product across versions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ga {
    pub group_id: String,
    pub artifact_id: String,
}

/// One released artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Gav {
    pub ga: Ga,
    pub version: Version,
}

/// Seed of a query: a product plus the OR'd constraints its version must meet.
///
/// `g:a:1.0` names one exact release, `g:a:[1,2)` a range, and `g:a` the newest
/// visible version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Coordinate {
    pub ga: Ga,
    pub constraints: Vec<VersionConstraint>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordinateError {
    #[error("malformed coordinate '{0}'")]
    Malformed(String),
    #[error(transparent)]
    Constraint(#[from] ConstraintError),
}

impl Ga {
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into().trim().to_string(),
            artifact_id: artifact_id.into().trim().to_string(),
        }
    }

    pub fn parse(input: &str) -> Result<Self, CoordinateError> {
        let (group_id, artifact_id) = input
            .split_once(':')
            .ok_or_else(|| CoordinateError::Malformed(input.to_string()))?;
        let ga = Self::new(group_id, artifact_id);
        if ga.group_id.is_empty() || ga.artifact_id.is_empty() || ga.artifact_id.contains(':') {
            return Err(CoordinateError::Malformed(input.to_string()));
        }
        Ok(ga)
    }

    pub fn with_version(&self, version: impl Into<Version>) -> Gav {
        Gav {
            ga: self.clone(),
            version: version.into(),
        }
    }
}

impl Gav {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<Version>,
    ) -> Self {
        Ga::new(group_id, artifact_id).with_version(version)
    }

    pub fn parse(input: &str) -> Result<Self, CoordinateError> {
        let malformed = || CoordinateError::Malformed(input.to_string());
        let (ga, version) = input.rsplit_once(':').ok_or_else(malformed)?;
        let ga = Ga::parse(ga).map_err(|_| malformed())?;
        let version = Version::new(version);
        if version.as_str().is_empty() {
            return Err(malformed());
        }
        Ok(Gav { ga, version })
    }
}

impl Coordinate {
    pub fn exact(gav: &Gav) -> Self {
        Self {
            ga: gav.ga.clone(),
            constraints: vec![VersionConstraint::recommended(gav.version.as_str())],
        }
    }

    pub fn parse(input: &str) -> Result<Self, CoordinateError> {
        let trimmed = input.trim();
        let mut parts = trimmed.splitn(3, ':');
        let (group_id, artifact_id) = match (parts.next(), parts.next()) {
            (Some(group_id), Some(artifact_id)) => (group_id, artifact_id),
            _ => return Err(CoordinateError::Malformed(input.to_string())),
        };
        let ga = Ga::new(group_id, artifact_id);
        if ga.group_id.is_empty() || ga.artifact_id.is_empty() {
            return Err(CoordinateError::Malformed(input.to_string()));
        }
        let constraints = match parts.next() {
            Some(spec) if spec.contains(':') => {
                return Err(CoordinateError::Malformed(input.to_string()));
            }
            Some(spec) => VersionConstraint::parse_all(spec)?,
            None => vec![VersionConstraint::wildcard()],
        };
        Ok(Self { ga, constraints })
    }

    /// The release this coordinate names, when it is a single bare version.
    pub fn as_gav(&self) -> Option<Gav> {
        match self.constraints.as_slice() {
            [only] if only.is_pin() && !only.is_wildcard() => {
                Some(self.ga.with_version(only.lower_bound()))
            }
            _ => None,
        }
    }
}

impl fmt::Display for Ga {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)
    }
}

impl fmt::Display for Gav {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.ga, self.version)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.ga, constraint_spec(&self.constraints))
    }
}

impl FromStr for Ga {
    type Err = CoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl FromStr for Gav {
    type Err = CoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl FromStr for Coordinate {
    type Err = CoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
