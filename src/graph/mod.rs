//! Time-indexed store of artifact descriptors.
//!
//! [`DependencyGraph`] keeps two maps behind one [`RwLock`]:
//!
//! - the forward store, GA → version → descriptor, which serves both exact GAV
//!   lookups and the "highest matching version" scan of [`DependencyGraph::find`];
//! - the reverse store, GA → GAVs of every descriptor that declares at least one
//!   edge toward that GA. It is coarse: membership says an edge exists, not that
//!   it matches any particular version.
//!
//! Every mutation holds the write lock across both maps, so a reader never sees
//! a reverse edge without its forward descriptor or the other way round.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::AtomicU64;
use std::sync::Arc;

use log::{debug, trace};
use parking_lot::RwLock;

use crate::core::constraint::{matches_any, VersionConstraint};
use crate::core::coordinate::{Ga, Gav};
use crate::core::dependency::DescriptorError;
use crate::core::pom::Pom;
use crate::core::version::Version;

pub mod builder;
pub mod check;
pub mod virtual_node;

pub use virtual_node::VirtualNode;

#[derive(Debug, Default)]
pub struct DependencyGraph {
    state: RwLock<GraphState>,
    next_virtual_id: AtomicU64,
}

#[derive(Debug, Default)]
struct GraphState {
    poms: HashMap<Ga, BTreeMap<Version, Arc<Pom>>>,
    dependents: HashMap<Ga, BTreeSet<Gav>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `pom`, superseding any descriptor with the same GAV together with
    /// all reverse edges it created. Returns the superseded descriptor.
    pub fn add(&self, pom: Pom) -> Result<Option<Arc<Pom>>, DescriptorError> {
        pom.validate()?;
        Ok(self.insert(pom))
    }

    pub fn extend(&self, poms: impl IntoIterator<Item = Pom>) -> Result<usize, DescriptorError> {
        let mut count = 0;
        for pom in poms {
            self.add(pom)?;
            count += 1;
        }
        Ok(count)
    }

    /// Deletes a descriptor and its reverse edges.
    pub fn remove(&self, gav: &Gav) -> Option<Arc<Pom>> {
        self.state.write().remove_pom(gav)
    }

    pub(crate) fn insert(&self, pom: Pom) -> Option<Arc<Pom>> {
        let targets = edge_targets(&pom);
        let pom = Arc::new(pom);

        let mut state = self.state.write();
        let previous = state.remove_pom(&pom.gav);
        if previous.is_some() {
            debug!("superseding descriptor {}", pom.gav);
        }
        state.insert_pom(pom, targets);
        previous
    }

    pub fn get(&self, gav: &Gav) -> Option<Arc<Pom>> {
        self.state.read().lookup(gav).cloned()
    }

    pub fn contains(&self, gav: &Gav) -> bool {
        self.state.read().lookup(gav).is_some()
    }

    pub fn len(&self) -> usize {
        self.state.read().poms.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().poms.is_empty()
    }

    /// Known versions of `ga`, lowest first.
    pub fn versions_of(&self, ga: &Ga) -> Vec<Version> {
        self.state
            .read()
            .poms
            .get(ga)
            .map(|versions| versions.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Raw reverse edges toward `ga`, unfiltered.
    pub fn dependents_of(&self, ga: &Ga) -> Vec<Gav> {
        self.state
            .read()
            .dependents
            .get(ga)
            .map(|gavs| gavs.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Snapshot of every stored descriptor.
    pub fn poms(&self) -> Vec<Arc<Pom>> {
        self.state
            .read()
            .poms
            .values()
            .flat_map(|versions| versions.values().cloned())
            .collect()
    }

    /// Highest version of `ga` released at or before `cutoff` that satisfies
    /// any of `constraints`. An empty constraint list matches nothing.
    pub fn find(
        &self,
        ga: &Ga,
        constraints: &[VersionConstraint],
        cutoff: i64,
    ) -> Option<Arc<Pom>> {
        let state = self.state.read();
        let found = state
            .poms
            .get(ga)?
            .iter()
            .rev()
            .find(|(version, pom)| pom.release_date <= cutoff && matches_any(constraints, version))
            .map(|(_, pom)| Arc::clone(pom));
        trace!(
            "find {ga} at {cutoff}: {}",
            found
                .as_ref()
                .map(|pom| pom.gav.version.to_string())
                .unwrap_or_else(|| "none".to_string())
        );
        found
    }

    /// Descriptors released at or before `cutoff` that declare some edge toward
    /// `ga`. Callers must still check which constraint, if any, matches.
    pub fn find_potential_dependents(&self, ga: &Ga, cutoff: i64) -> Vec<Arc<Pom>> {
        let state = self.state.read();
        let Some(gavs) = state.dependents.get(ga) else {
            return Vec::new();
        };
        gavs.iter()
            .filter_map(|gav| {
                let pom = state.lookup(gav);
                debug_assert!(pom.is_some(), "reverse edge {gav} -> {ga} has no descriptor");
                pom
            })
            .filter(|pom| pom.release_date <= cutoff)
            .cloned()
            .collect()
    }

    /// Checks that the reverse store is exactly the set of edges derived from
    /// the forward store.
    pub fn is_consistent(&self) -> bool {
        let state = self.state.read();
        let mut derived: HashMap<Ga, BTreeSet<Gav>> = HashMap::new();
        for versions in state.poms.values() {
            for pom in versions.values() {
                for target in edge_targets(pom) {
                    derived.entry(target).or_default().insert(pom.gav.clone());
                }
            }
        }
        derived == state.dependents
    }
}

impl GraphState {
    fn lookup(&self, gav: &Gav) -> Option<&Arc<Pom>> {
        self.poms.get(&gav.ga)?.get(&gav.version)
    }

    fn remove_pom(&mut self, gav: &Gav) -> Option<Arc<Pom>> {
        let versions = self.poms.get_mut(&gav.ga)?;
        let previous = versions.remove(&gav.version)?;
        if versions.is_empty() {
            self.poms.remove(&gav.ga);
        }
        for target in edge_targets(&previous) {
            if let Some(gavs) = self.dependents.get_mut(&target) {
                gavs.remove(gav);
                if gavs.is_empty() {
                    self.dependents.remove(&target);
                }
            }
        }
        Some(previous)
    }

    fn insert_pom(&mut self, pom: Arc<Pom>, targets: BTreeSet<Ga>) {
        for target in targets {
            self.dependents
                .entry(target)
                .or_default()
                .insert(pom.gav.clone());
        }
        self.poms
            .entry(pom.gav.ga.clone())
            .or_default()
            .insert(pom.gav.version.clone(), pom);
    }
}

fn edge_targets(pom: &Pom) -> BTreeSet<Ga> {
    pom.dependencies.iter().map(|dep| dep.ga.clone()).collect()
}
