use crate::core::coordinate::Gav;
use crate::core::dependency::{Dependency, DescriptorError};

/// Group id reserved for synthetic nodes; no real artifact may use it.
pub const VIRTUAL_GROUP_ID: &str = "<virtual>";

/// One resolved artifact: identity, release time and declared edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pom {
    pub gav: Gav,
    /// Epoch milliseconds.
    pub release_date: i64,
    pub dependencies: Vec<Dependency>,
}

impl Pom {
    pub fn new(gav: Gav, release_date: i64) -> Self {
        Self {
            gav,
            release_date,
            dependencies: Vec::new(),
        }
    }

    pub fn with_dependency(mut self, dependency: Dependency) -> Self {
        self.dependencies.push(dependency);
        self
    }

    pub fn is_virtual(&self) -> bool {
        self.gav.ga.group_id == VIRTUAL_GROUP_ID
    }

    pub fn validate(&self) -> Result<(), DescriptorError> {
        if self.is_virtual() {
            return Err(DescriptorError::ReservedGroupId(
                self.gav.ga.group_id.clone(),
            ));
        }
        self.dependencies.iter().try_for_each(Dependency::validate)
    }
}
