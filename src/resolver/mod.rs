//! Transitive closure over a [`DependencyGraph`], forward ("what does X need")
//! and reverse ("what needs X").
//!
//! Both walks are synchronous, breadth-first and free of IO; they only take
//! read locks on the graph (plus the write lock a virtual node needs for its
//! insertion and removal) and can run from any thread.

use thiserror::Error;

use crate::core::dependency::Dependency;
use crate::core::pom::Pom;
use crate::graph::DependencyGraph;

pub mod config;
mod dependents;
mod forward;

pub use config::ResolverConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    #[error("cannot find coordinate {0}")]
    CoordinateNotFound(String),
    #[error("{coordinate} was released at {released}, after the resolution timestamp {timestamp}")]
    ReleasedAfterCutoff {
        coordinate: String,
        released: i64,
        timestamp: i64,
    },
}

pub type ResolutionResult<T> = std::result::Result<T, ResolutionError>;

#[derive(Debug, Clone, Copy)]
pub struct Resolver<'g> {
    graph: &'g DependencyGraph,
}

impl<'g> Resolver<'g> {
    pub fn new(graph: &'g DependencyGraph) -> Self {
        Self { graph }
    }

    pub fn graph(&self) -> &'g DependencyGraph {
        self.graph
    }
}

/// Scope and optional filters shared by both directions. Edges leaving a
/// virtual node are always followed.
fn passes_filters(from: &Pom, dep: &Dependency, config: &ResolverConfig) -> bool {
    if from.is_virtual() {
        return true;
    }
    config.scopes.contains(&dep.scope) && (!dep.optional || config.include_optional)
}
