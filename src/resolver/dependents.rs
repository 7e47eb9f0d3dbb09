use std::collections::{BTreeSet, HashSet, VecDeque};

use log::trace;

use crate::core::constraint::matches_any;
use crate::core::coordinate::{Ga, Gav};
use crate::core::pom::Pom;
use crate::core::revision::Revision;
use crate::core::version::Version;
use crate::resolver::{passes_filters, Resolver, ResolverConfig};

impl Resolver<'_> {
    /// Artifacts released by `config.timestamp` that depend on `ga:version`,
    /// directly or (with `config.transitive`) through other dependents.
    ///
    /// The reverse index only says that some edge toward a GA exists, so every
    /// candidate is re-checked against the queried version before it counts.
    pub fn resolve_dependents(
        &self,
        ga: &Ga,
        version: &Version,
        config: &ResolverConfig,
    ) -> BTreeSet<Revision> {
        let origin = ga.with_version(version.clone());
        let mut visited: HashSet<Gav> = HashSet::from([origin.clone()]);
        let mut result = BTreeSet::new();
        let mut queue = VecDeque::from([origin]);

        while let Some(target) = queue.pop_front() {
            for candidate in self
                .graph
                .find_potential_dependents(&target.ga, config.timestamp)
            {
                if candidate.is_virtual() || visited.contains(&candidate.gav) {
                    continue;
                }
                if !depends_on(&candidate, &target, config) {
                    trace!("{} does not accept {}", candidate.gav, target);
                    continue;
                }
                visited.insert(candidate.gav.clone());
                result.insert(Revision::from(candidate.as_ref()));
                if config.transitive {
                    queue.push_back(candidate.gav.clone());
                }
            }
        }

        result
    }
}

fn depends_on(pom: &Pom, target: &Gav, config: &ResolverConfig) -> bool {
    pom.dependencies.iter().any(|dep| {
        dep.ga == target.ga
            && passes_filters(pom, dep, config)
            && matches_any(&dep.version_constraints, &target.version)
    })
}
