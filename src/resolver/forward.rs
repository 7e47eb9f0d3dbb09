use std::collections::{BTreeSet, HashSet, VecDeque};
use std::sync::Arc;

use log::{debug, trace};

use crate::core::constraint::constraint_spec;
use crate::core::coordinate::{Coordinate, Gav};
use crate::core::dependency::{Dependency, Exclusion};
use crate::core::pom::Pom;
use crate::core::revision::Revision;
use crate::resolver::{passes_filters, ResolutionError, ResolutionResult, Resolver, ResolverConfig};

struct Frontier {
    pom: Arc<Pom>,
    /// Exclusions collected along the path that reached `pom`.
    exclusions: Vec<Exclusion>,
}

impl Resolver<'_> {
    /// Resolves the dependency closure of `seeds` as of `config.timestamp`.
    ///
    /// Every seed must resolve to a descriptor visible at the cutoff, otherwise
    /// the whole call fails. Dependencies the graph cannot satisfy are dropped.
    /// The result holds the seeds themselves and everything reached from them.
    pub fn resolve(
        &self,
        seeds: &[Coordinate],
        config: &ResolverConfig,
    ) -> ResolutionResult<BTreeSet<Revision>> {
        let roots = seeds
            .iter()
            .map(|seed| self.resolve_seed(seed, config.timestamp))
            .collect::<ResolutionResult<Vec<_>>>()?;

        let mut visited: HashSet<Gav> = HashSet::new();
        let mut result = BTreeSet::new();
        let mut queue = VecDeque::new();
        for root in roots {
            if !visited.insert(root.gav.clone()) {
                continue;
            }
            if !root.is_virtual() {
                result.insert(Revision::from(root.as_ref()));
            }
            queue.push_back(Frontier {
                pom: root,
                exclusions: Vec::new(),
            });
        }

        while let Some(Frontier { pom, exclusions }) = queue.pop_front() {
            trace!("expanding {}", pom.gav);
            for dep in &pom.dependencies {
                if exclusions.iter().any(|exclusion| exclusion.matches(&dep.ga)) {
                    trace!("{} excluded on the path to {}", dep.ga, pom.gav);
                    continue;
                }
                if !passes_filters(&pom, dep, config) {
                    continue;
                }
                let candidate = if pom.is_virtual() {
                    self.pinned_target(dep, config.timestamp)
                } else {
                    self.graph
                        .find(&dep.ga, &dep.version_constraints, config.timestamp)
                };
                let Some(found) = candidate else {
                    debug!(
                        "dropping unresolvable edge {} -> {}:{}",
                        pom.gav,
                        dep.ga,
                        constraint_spec(&dep.version_constraints)
                    );
                    continue;
                };
                if !visited.insert(found.gav.clone()) {
                    continue;
                }
                if !found.is_virtual() {
                    result.insert(Revision::from(found.as_ref()));
                }
                if config.transitive {
                    let mut child_exclusions = exclusions.clone();
                    child_exclusions.extend(dep.exclusions.iter().cloned());
                    queue.push_back(Frontier {
                        pom: found,
                        exclusions: child_exclusions,
                    });
                }
            }
        }

        Ok(result)
    }

    /// Resolves the union of the closures of `coordinates` in one pass through
    /// a virtual node that lives only for the duration of this call.
    pub fn resolve_batch(
        &self,
        coordinates: &[Gav],
        config: &ResolverConfig,
    ) -> ResolutionResult<BTreeSet<Revision>> {
        for gav in coordinates {
            self.resolve_seed(&Coordinate::exact(gav), config.timestamp)?;
        }
        let node = self.graph.virtual_node(coordinates);
        self.resolve(&[Coordinate::exact(node.gav())], config)
    }

    /// Edges leaving a virtual node name one release each, so they resolve by
    /// identity rather than by the newest semantically equal version.
    fn pinned_target(&self, dep: &Dependency, timestamp: i64) -> Option<Arc<Pom>> {
        let [pin] = dep.version_constraints.as_slice() else {
            return None;
        };
        let pom = self.graph.get(&dep.ga.with_version(pin.lower_bound()))?;
        (pom.release_date <= timestamp).then_some(pom)
    }

    fn resolve_seed(&self, seed: &Coordinate, timestamp: i64) -> ResolutionResult<Arc<Pom>> {
        if let Some(gav) = seed.as_gav() {
            let pom = self
                .graph
                .get(&gav)
                .ok_or_else(|| ResolutionError::CoordinateNotFound(gav.to_string()))?;
            if pom.release_date > timestamp {
                return Err(ResolutionError::ReleasedAfterCutoff {
                    coordinate: gav.to_string(),
                    released: pom.release_date,
                    timestamp,
                });
            }
            return Ok(pom);
        }

        if let Some(pom) = self.graph.find(&seed.ga, &seed.constraints, timestamp) {
            return Ok(pom);
        }
        match self
            .graph
            .find(&seed.ga, &seed.constraints, ResolverConfig::LATEST)
        {
            Some(pom) => Err(ResolutionError::ReleasedAfterCutoff {
                coordinate: seed.to_string(),
                released: pom.release_date,
                timestamp,
            }),
            None => Err(ResolutionError::CoordinateNotFound(seed.to_string())),
        }
    }
}
