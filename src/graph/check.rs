use std::collections::HashMap;

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::core::constraint::constraint_spec;
use crate::core::coordinate::{Ga, Gav};
use crate::graph::DependencyGraph;

/// A declared edge that no descriptor visible at the checked instant satisfies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingDependency {
    pub from: Gav,
    pub dependency: Ga,
    pub constraint: String,
}

#[derive(Debug, Clone, Default)]
pub struct GraphReport {
    pub missing: Vec<MissingDependency>,
    /// Each entry is one strongly connected group of artifacts, sorted.
    pub cycles: Vec<Vec<Gav>>,
}

impl GraphReport {
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.cycles.is_empty()
    }
}

/// Resolves every declared edge of every descriptor released by `timestamp`
/// (ignoring scope and optional flags) and reports the edges that cannot be
/// satisfied together with the cycles among those that can.
pub fn check_graph(graph: &DependencyGraph, timestamp: i64) -> GraphReport {
    let mut poms = graph.poms();
    poms.retain(|pom| !pom.is_virtual() && pom.release_date <= timestamp);
    poms.sort_by(|a, b| a.gav.cmp(&b.gav));

    let mut resolved: DiGraph<Gav, ()> = DiGraph::new();
    let mut nodes: HashMap<Gav, NodeIndex> = HashMap::new();
    let mut node_for = |resolved: &mut DiGraph<Gav, ()>, gav: &Gav| {
        *nodes
            .entry(gav.clone())
            .or_insert_with(|| resolved.add_node(gav.clone()))
    };

    let mut missing = Vec::new();
    for pom in &poms {
        let from = node_for(&mut resolved, &pom.gav);
        for dep in &pom.dependencies {
            match graph.find(&dep.ga, &dep.version_constraints, timestamp) {
                Some(target) => {
                    let to = node_for(&mut resolved, &target.gav);
                    resolved.update_edge(from, to, ());
                }
                None => missing.push(MissingDependency {
                    from: pom.gav.clone(),
                    dependency: dep.ga.clone(),
                    constraint: constraint_spec(&dep.version_constraints),
                }),
            }
        }
    }

    let mut cycles: Vec<Vec<Gav>> = tarjan_scc(&resolved)
        .into_iter()
        .filter(|component| {
            component.len() > 1 || resolved.contains_edge(component[0], component[0])
        })
        .map(|component| {
            let mut members: Vec<Gav> = component
                .into_iter()
                .map(|idx| resolved[idx].clone())
                .collect();
            members.sort();
            members
        })
        .collect();
    cycles.sort();

    GraphReport { missing, cycles }
}
