//! Index-only adjacency used for connectivity.
//!
//! `Topology` mirrors the vertex slots of its [`Graph`](super::Graph) and nothing else, so the
//! stability trials can clone and mutate it without touching names or edge records.
//!
//! Each vertex maps neighbor slots to the number of edges linking them. Connectivity only
//! looks at the key set; the count lets one of several parallel edges go away without
//! dropping the link.

use crate::unordered::UnorderedVec;
use rustc_hash::FxBuildHasher;
use std::collections::VecDeque;

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;

pub(crate) type Neighbors = HashMap<usize, u32>;

#[derive(Debug, Clone, Default)]
pub(crate) struct Topology {
    adjacency: UnorderedVec<Neighbors>,
}

impl Topology {
    pub(crate) fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    pub(crate) fn add_vertex(&mut self) -> usize {
        self.adjacency.push(Neighbors::default())
    }

    pub(crate) fn neighbors(&self, v: usize) -> &Neighbors {
        &self.adjacency[v]
    }

    /// Records one more edge between `a` and `b`. A self-loop is counted once, on `a` only.
    pub(crate) fn link(&mut self, a: usize, b: usize) {
        *self.adjacency[a].entry(b).or_insert(0) += 1;
        if a != b {
            *self.adjacency[b].entry(a).or_insert(0) += 1;
        }
    }

    pub(crate) fn unlink(&mut self, a: usize, b: usize) {
        Self::decrement(&mut self.adjacency[a], b);
        if a != b {
            Self::decrement(&mut self.adjacency[b], a);
        }
    }

    fn decrement(neighbors: &mut Neighbors, key: usize) {
        if let Some(count) = neighbors.get_mut(&key) {
            *count -= 1;
            if *count == 0 {
                neighbors.remove(&key);
            }
        }
    }

    /// Swap-removes vertex `v` together with every link touching it.
    ///
    /// Returns the former slot of the vertex that moved into `v`, if any. Every reference to
    /// that old slot has been rewritten to `v` by the time this returns.
    pub(crate) fn remove_vertex(&mut self, v: usize) -> Option<usize> {
        let linked: Vec<usize> = self.adjacency[v]
            .keys()
            .copied()
            .filter(|&u| u != v)
            .collect();
        for u in linked {
            self.adjacency[u].remove(&v);
        }

        let last = self.adjacency.last_index()?;
        self.adjacency.swap_remove(v);
        if v == last {
            return None;
        }

        let moved: Vec<(usize, u32)> = self.adjacency[v].iter().map(|(&u, &c)| (u, c)).collect();
        for (u, count) in moved {
            if u == last {
                // Self-loop on the moved vertex.
                let own = &mut self.adjacency[v];
                own.remove(&last);
                own.insert(v, count);
            } else if let Some(c) = self.adjacency[u].remove(&last) {
                self.adjacency[u].insert(v, c);
            }
        }
        Some(last)
    }

    /// A copy with the vertices at `slots` removed.
    ///
    /// `slots` must be strictly increasing. Removing from the highest slot down keeps the
    /// pending slots valid: the element swapped in always comes from above them.
    pub(crate) fn without(&self, slots: &[usize]) -> Topology {
        debug_assert!(slots.windows(2).all(|w| w[0] < w[1]));
        let mut t = self.clone();
        for &v in slots.iter().rev() {
            t.remove_vertex(v);
        }
        t
    }

    /// Number of connected components, by repeated breadth-first search.
    pub(crate) fn component_count(&self) -> usize {
        let n = self.adjacency.len();
        let mut visited = vec![false; n];
        let mut queue: VecDeque<usize> = VecDeque::new();
        let mut components = 0;

        for start in 0..n {
            if visited[start] {
                continue;
            }
            components += 1;
            visited[start] = true;
            queue.push_back(start);
            while let Some(w) = queue.pop_front() {
                for &k in self.adjacency[w].keys() {
                    if !visited[k] {
                        visited[k] = true;
                        queue.push_back(k);
                    }
                }
            }
        }

        components
    }

    /// True when at most one component exists; the empty topology is connected.
    pub(crate) fn is_connected(&self) -> bool {
        self.component_count() <= 1
    }

    /// Sorted neighbor slots per vertex, for snapshots and assertions.
    pub(crate) fn sorted_adjacency(&self) -> Vec<Vec<usize>> {
        self.adjacency
            .iter()
            .map(|n| {
                let mut keys: Vec<usize> = n.keys().copied().collect();
                keys.sort_unstable();
                keys
            })
            .collect()
    }
}
