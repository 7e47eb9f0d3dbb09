use std::sync::atomic::Ordering;

use log::debug;

use crate::core::constraint::VersionConstraint;
use crate::core::coordinate::Gav;
use crate::core::dependency::Dependency;
use crate::core::pom::{Pom, VIRTUAL_GROUP_ID};
use crate::graph::DependencyGraph;

const VIRTUAL_VERSION: &str = "0";

/// A synthetic descriptor depending on a batch of coordinates, removed from the
/// graph when dropped.
#[derive(Debug)]
pub struct VirtualNode<'g> {
    graph: &'g DependencyGraph,
    gav: Gav,
}

impl VirtualNode<'_> {
    pub fn gav(&self) -> &Gav {
        &self.gav
    }
}

impl Drop for VirtualNode<'_> {
    fn drop(&mut self) {
        self.graph.remove_virtual_node(&self.gav);
    }
}

impl DependencyGraph {
    /// Inserts a synthetic descriptor with one hard-pinned edge per coordinate
    /// and returns its id. The id lives under a reserved group, so it cannot
    /// collide with an ingested artifact. Pair every call with
    /// [`DependencyGraph::remove_virtual_node`], or use
    /// [`DependencyGraph::virtual_node`] to have that done on drop.
    pub fn add_virtual_node(&self, coordinates: &[Gav]) -> Gav {
        let id = self.next_virtual_id.fetch_add(1, Ordering::Relaxed);
        let gav = Gav::new(VIRTUAL_GROUP_ID, format!("node-{id}"), VIRTUAL_VERSION);

        let mut pom = Pom::new(gav.clone(), i64::MIN);
        for coordinate in coordinates {
            pom.dependencies.push(Dependency::new(
                coordinate.ga.clone(),
                vec![VersionConstraint::exact(coordinate.version.as_str())],
            ));
        }

        debug!("adding virtual node {gav} over {} coordinates", coordinates.len());
        self.insert(pom);
        gav
    }

    /// Returns false when `gav` is not a live virtual node.
    pub fn remove_virtual_node(&self, gav: &Gav) -> bool {
        if gav.ga.group_id != VIRTUAL_GROUP_ID {
            return false;
        }
        let removed = self.remove(gav).is_some();
        if removed {
            debug!("removed virtual node {gav}");
        }
        removed
    }

    pub fn virtual_node(&self, coordinates: &[Gav]) -> VirtualNode<'_> {
        let gav = self.add_virtual_node(coordinates);
        VirtualNode { graph: self, gav }
    }
}

#[cfg(test)]
mod tests {
    use crate::core::coordinate::{Ga, Gav};
    use crate::core::pom::Pom;
    use crate::graph::DependencyGraph;

    #[test]
    fn virtual_node_pins_each_coordinate_and_is_reverse_indexed() {
        let graph = DependencyGraph::new();
        let x = Gav::new("x", "x", "1");
        let y = Gav::new("y", "y", "2");
        let id = graph.add_virtual_node(&[x.clone(), y.clone()]);

        let node = graph.get(&id).expect("virtual node stored");
        assert!(node.is_virtual());
        assert_eq!(node.dependencies.len(), 2);
        assert_eq!(node.dependencies[0].version_constraints[0].to_string(), "[1]");
        assert_eq!(graph.dependents_of(&Ga::new("y", "y")), vec![id.clone()]);

        assert!(graph.remove_virtual_node(&id));
        assert!(!graph.contains(&id));
        assert!(graph.dependents_of(&Ga::new("x", "x")).is_empty());
        assert!(!graph.remove_virtual_node(&id));
        assert!(graph.is_consistent());
    }

    #[test]
    fn ids_are_unique_per_call() {
        let graph = DependencyGraph::new();
        let first = graph.add_virtual_node(&[]);
        let second = graph.add_virtual_node(&[]);
        assert_ne!(first, second);
    }

    #[test]
    fn remove_virtual_node_ignores_real_artifacts() {
        let graph = DependencyGraph::new();
        let real = Gav::new("a", "a", "1");
        graph.add(Pom::new(real.clone(), 1)).expect("add");
        assert!(!graph.remove_virtual_node(&real));
        assert!(graph.contains(&real));
    }

    #[test]
    fn guard_removes_node_on_drop() {
        let graph = DependencyGraph::new();
        let id = {
            let node = graph.virtual_node(&[Gav::new("x", "x", "1")]);
            assert!(graph.contains(node.gav()));
            node.gav().clone()
        };
        assert!(!graph.contains(&id));
        assert!(graph.is_empty());
    }
}
