use std::collections::HashMap;

use log::{debug, trace};

use super::PersistencePairing;
use crate::error::TopologyError;
use crate::topology::FilteredComplex;
use crate::utils::{FiltrationOps, VertexOps};

/// Union-find over the vertices of a complex, computing the 0-dimensional
/// pairing with the elder rule.
///
/// Sets are flat arrays indexed by vertex slot: `parent` for the forest and
/// `creator` for the filtration position of each slot's vertex. A root's
/// creator is the oldest vertex of its component because the younger root is
/// always attached below the elder one.
#[derive(Debug, Clone, Default)]
pub struct ConnectedComponentsTracker {
    parent: Vec<usize>,
    creator: Vec<usize>,
}

impl ConnectedComponentsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn make_set(&mut self, creator: usize) -> usize {
        let slot = self.parent.len();
        self.parent.push(slot);
        self.creator.push(creator);
        slot
    }

    fn find(&mut self, slot: usize) -> usize {
        let mut root = slot;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut current = slot;
        while self.parent[current] != root {
            let next = self.parent[current];
            self.parent[current] = root;
            current = next;
        }
        root
    }

    /// Attaches the younger root below the elder one and returns the younger
    /// component's creator.
    fn merge(&mut self, a: usize, b: usize) -> usize {
        let (elder, younger) = if self.creator[a] < self.creator[b] {
            (a, b)
        } else {
            (b, a)
        };
        self.parent[younger] = elder;
        self.creator[younger]
    }

    /// Number of components currently alive.
    pub fn component_count(&self) -> usize {
        self.parent
            .iter()
            .enumerate()
            .filter(|&(slot, &parent)| slot == parent)
            .count()
    }

    /// Computes the 0-dimensional pairing of `complex`.
    ///
    /// Every 0-simplex seeds a component. Edges are visited in filtration
    /// order; an edge joining two components destroys the younger one, an
    /// edge inside a component closes a cycle and is left unpaired. Simplices
    /// of dimension two or more are ignored. The positions of the surviving
    /// components' creators are essential.
    pub fn pairing<D, V>(&mut self, complex: &FilteredComplex<D, V>) -> anyhow::Result<PersistencePairing>
    where
        D: FiltrationOps,
        V: VertexOps,
    {
        self.parent.clear();
        self.creator.clear();

        let mut slots: HashMap<V, usize> = HashMap::new();
        for (position, simplex) in complex.iter().enumerate() {
            if simplex.dimension() == 0 {
                let slot = self.make_set(position);
                slots.insert(simplex.vertices()[0], slot);
            }
        }

        let mut pairing = PersistencePairing::new(complex.len());
        let mut cycles = 0usize;

        for (position, simplex) in complex.iter().enumerate() {
            if simplex.dimension() != 1 {
                continue;
            }

            let mut endpoints = [0usize; 2];
            for (endpoint, vertex) in endpoints.iter_mut().zip(simplex.vertices()) {
                let slot = *slots.get(vertex).ok_or_else(|| {
                    TopologyError::invalid(position, format!("edge endpoint {} has no vertex simplex", vertex))
                })?;
                if self.creator[slot] > position {
                    return Err(TopologyError::invalid(
                        position,
                        format!("edge precedes its endpoint {}", vertex),
                    )
                    .into());
                }
                *endpoint = slot;
            }

            let a = self.find(endpoints[0]);
            let b = self.find(endpoints[1]);
            if a == b {
                trace!("edge at position {} closes a cycle", position);
                cycles += 1;
                continue;
            }

            let younger = self.merge(a, b);
            pairing.add_pair(younger, position)?;
        }

        let mut survivors: Vec<usize> = (0..self.parent.len())
            .filter(|&slot| self.parent[slot] == slot)
            .map(|slot| self.creator[slot])
            .collect();
        survivors.sort_unstable();
        for position in survivors {
            pairing.add_essential(position)?;
        }

        debug!(
            "connected components: {} vertices, {} merges, {} cycle edges, {} components",
            self.parent.len(),
            pairing.len(),
            cycles,
            pairing.essential().len()
        );

        Ok(pairing)
    }
}
