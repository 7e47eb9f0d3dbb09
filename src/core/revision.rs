use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::core::coordinate::Gav;
use crate::core::pom::Pom;

/// Entry of a resolution result. Identity is the GAV; the release date rides
/// along for display.
#[derive(Debug, Clone)]
pub struct Revision {
    pub gav: Gav,
    pub release_date: i64,
}

impl Revision {
    pub fn new(gav: Gav, release_date: i64) -> Self {
        Self { gav, release_date }
    }
}

impl From<&Pom> for Revision {
    fn from(pom: &Pom) -> Self {
        Self::new(pom.gav.clone(), pom.release_date)
    }
}

impl PartialEq for Revision {
    fn eq(&self, other: &Self) -> bool {
        self.gav == other.gav
    }
}

impl Eq for Revision {}

impl Hash for Revision {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.gav.hash(state);
    }
}

impl Ord for Revision {
    fn cmp(&self, other: &Self) -> Ordering {
        self.gav.cmp(&other.gav)
    }
}

impl PartialOrd for Revision {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (released {})", self.gav, self.release_date)
    }
}
