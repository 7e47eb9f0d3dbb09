use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::core::constraint::VersionConstraint;
use crate::core::coordinate::Ga;

pub const DEFAULT_PACKAGING: &str = "jar";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Scope {
    #[default]
    Compile,
    Provided,
    Runtime,
    Test,
    System,
    Import,
}

/// Excluded product; either field may be the `*` wildcard.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Exclusion {
    pub group_id: String,
    pub artifact_id: String,
}

/// One declared dependency edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub ga: Ga,
    /// OR'd; a version matching any one of them satisfies the edge.
    pub version_constraints: Vec<VersionConstraint>,
    pub exclusions: Vec<Exclusion>,
    pub scope: Scope,
    pub optional: bool,
    pub packaging_type: String,
    pub classifier: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    #[error("dependency {0} declares no version constraint")]
    EmptyConstraints(Ga),
    #[error("dependency {0} has an empty packaging type")]
    EmptyPackagingType(Ga),
    #[error("group id '{0}' is reserved for virtual nodes")]
    ReservedGroupId(String),
    #[error("unknown scope '{0}'")]
    UnknownScope(String),
}

impl Scope {
    pub const ALL: [Scope; 6] = [
        Scope::Compile,
        Scope::Provided,
        Scope::Runtime,
        Scope::Test,
        Scope::System,
        Scope::Import,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Scope::Compile => "compile",
            Scope::Provided => "provided",
            Scope::Runtime => "runtime",
            Scope::Test => "test",
            Scope::System => "system",
            Scope::Import => "import",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = DescriptorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Scope::ALL
            .into_iter()
            .find(|scope| scope.as_str() == lower)
            .ok_or_else(|| DescriptorError::UnknownScope(s.to_string()))
    }
}

impl Exclusion {
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into().trim().to_string(),
            artifact_id: artifact_id.into().trim().to_string(),
        }
    }

    pub fn matches(&self, ga: &Ga) -> bool {
        (self.group_id == "*" || self.group_id == ga.group_id)
            && (self.artifact_id == "*" || self.artifact_id == ga.artifact_id)
    }
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)
    }
}

impl Dependency {
    /// Edge with the defaults an ingester applies when the metadata is silent:
    /// compile scope, jar packaging, no classifier, not optional.
    pub fn new(ga: Ga, version_constraints: Vec<VersionConstraint>) -> Self {
        Self {
            ga,
            version_constraints,
            exclusions: Vec::new(),
            scope: Scope::Compile,
            optional: false,
            packaging_type: DEFAULT_PACKAGING.to_string(),
            classifier: String::new(),
        }
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    pub fn with_exclusions(mut self, exclusions: impl IntoIterator<Item = Exclusion>) -> Self {
        self.exclusions = exclusions.into_iter().collect();
        self
    }

    pub fn with_packaging(mut self, packaging_type: impl Into<String>) -> Self {
        self.packaging_type = packaging_type.into();
        self
    }

    pub fn with_classifier(mut self, classifier: impl Into<String>) -> Self {
        self.classifier = classifier.into().to_lowercase();
        self
    }

    pub fn validate(&self) -> Result<(), DescriptorError> {
        if self.version_constraints.is_empty() {
            return Err(DescriptorError::EmptyConstraints(self.ga.clone()));
        }
        if self.packaging_type.trim().is_empty() {
            return Err(DescriptorError::EmptyPackagingType(self.ga.clone()));
        }
        Ok(())
    }

    pub fn excludes(&self, ga: &Ga) -> bool {
        self.exclusions.iter().any(|exclusion| exclusion.matches(ga))
    }
}

#[cfg(test)]
mod tests {
    use crate::core::constraint::VersionConstraint;
    use crate::core::coordinate::Ga;
    use crate::core::dependency::{Dependency, DescriptorError, Exclusion, Scope};

    fn junit() -> Dependency {
        Dependency::new(
            Ga::new("junit", "junit"),
            vec![VersionConstraint::recommended("4.12")],
        )
    }

    #[test]
    fn defaults_match_an_explicit_compile_jar_edge() {
        let explicit = junit()
            .with_scope(Scope::Compile)
            .with_optional(false)
            .with_packaging("jar")
            .with_classifier("");
        assert_eq!(junit(), explicit);
        assert!(junit().validate().is_ok());
    }

    #[test]
    fn empty_packaging_type_is_rejected() {
        let err = junit().with_packaging("").validate().expect_err("empty packaging");
        assert_eq!(
            err,
            DescriptorError::EmptyPackagingType(Ga::new("junit", "junit"))
        );
    }

    #[test]
    fn empty_constraint_list_is_rejected() {
        let dep = Dependency::new(Ga::new("junit", "junit"), Vec::new());
        assert!(matches!(
            dep.validate(),
            Err(DescriptorError::EmptyConstraints(_))
        ));
    }

    #[test]
    fn scope_parses_case_insensitively() {
        assert_eq!("Runtime".parse::<Scope>().expect("scope"), Scope::Runtime);
        assert_eq!(Scope::Provided.to_string(), "provided");
        assert!("bundled".parse::<Scope>().is_err());
    }

    #[test]
    fn exclusions_support_wildcards() {
        let dep = junit().with_exclusions([
            Exclusion::new("org.hamcrest", "*"),
            Exclusion::new("*", "commons-logging"),
        ]);
        assert!(dep.excludes(&Ga::new("org.hamcrest", "hamcrest-core")));
        assert!(dep.excludes(&Ga::new("commons-logging", "commons-logging")));
        assert!(!dep.excludes(&Ga::new("org.slf4j", "slf4j-api")));
    }
}
