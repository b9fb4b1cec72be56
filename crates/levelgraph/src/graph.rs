//! The level graph: named vertices, typed edges, and their adjacency.
//!
//! Vertices and edges live in swap-remove storage, so their structural indices move whenever
//! something is removed. Names are the stable handle: re-resolve through [`Graph::vertex`] or
//! [`Graph::edge`] rather than holding an index across a mutation.

mod edge_key;
mod entities;
pub(crate) mod topology;

pub use entities::{Edge, EdgeKind, Position, Vertex, VertexKind};

use crate::error::{Error, Result};
use crate::unordered::UnorderedVec;
use edge_key::{EdgeKey, EdgeKeyView};
use rustc_hash::FxBuildHasher;
use std::fmt::Write as _;
use topology::Topology;
use tracing::{debug, warn};

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;

#[derive(Debug, Clone, Default)]
pub struct Graph {
    vertices: UnorderedVec<Vertex>,
    vertex_index: HashMap<String, usize>,

    edges: UnorderedVec<Edge>,
    edge_index: HashMap<EdgeKey, usize>,

    // Edge slots touching each vertex; a self-loop is listed once.
    incident: UnorderedVec<UnorderedVec<usize>>,
    topology: Topology,

    dirty: bool,
}

/// Whether `name` can be written to and read back from the level text format: one or more
/// letters, ASCII digits, or underscores.
pub fn is_valid_vertex_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_alphabetic() || c.is_ascii_digit() || c == '_')
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the graph changed structurally since it was last persisted.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Vertices in storage order.
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.iter()
    }

    /// Edges in storage order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    pub fn vertex_names(&self) -> impl Iterator<Item = &str> {
        self.vertices.iter().map(|v| v.name.as_str())
    }

    pub fn contains_vertex(&self, name: &str) -> bool {
        self.vertex_index.contains_key(name)
    }

    pub fn vertex(&self, name: &str) -> Option<&Vertex> {
        self.vertex_index.get(name).map(|&idx| &self.vertices[idx])
    }

    pub fn vertex_at(&self, index: usize) -> Option<&Vertex> {
        self.vertices.get(index)
    }

    pub fn edge_at(&self, index: usize) -> Option<&Edge> {
        self.edges.get(index)
    }

    /// Exact lookup by endpoints and kind.
    pub fn edge(&self, from: &str, to: &str, kind: EdgeKind) -> Option<&Edge> {
        let view = EdgeKeyView::new(from, to, kind);
        self.edge_index.get(&view).map(|&idx| &self.edges[idx])
    }

    /// The edge from `from` to `to` of any kind, checking kinds in declaration order.
    pub fn find_edge(&self, from: &str, to: &str) -> Option<&Edge> {
        EdgeKind::ALL
            .into_iter()
            .find_map(|kind| self.edge(from, to, kind))
    }

    pub fn edge_endpoints(&self, edge: &Edge) -> (&Vertex, &Vertex) {
        (&self.vertices[edge.from], &self.vertices[edge.to])
    }

    /// Human-readable edge name, e.g. `A>>B`.
    pub fn edge_name(&self, edge: &Edge) -> String {
        let (from, to) = self.edge_endpoints(edge);
        edge.kind.label(&from.name, &to.name)
    }

    /// Names of the vertices sharing an edge with `name`, in any direction.
    pub fn neighbors(&self, name: &str) -> Result<Vec<&str>> {
        let idx = self.vertex_slot(name)?;
        let mut out: Vec<&str> = self
            .topology
            .neighbors(idx)
            .keys()
            .map(|&n| self.vertices[n].name.as_str())
            .collect();
        out.sort_unstable();
        Ok(out)
    }

    fn vertex_slot(&self, name: &str) -> Result<usize> {
        self.vertex_index
            .get(name)
            .copied()
            .ok_or_else(|| Error::UnknownVertex {
                name: name.to_string(),
            })
    }

    fn edge_slot(&self, from: &str, to: &str, kind: EdgeKind) -> Result<usize> {
        let view = EdgeKeyView::new(from, to, kind);
        self.edge_index
            .get(&view)
            .copied()
            .ok_or_else(|| Error::UnknownEdge {
                name: kind.label(from, to),
            })
    }

    fn key_of(&self, edge: &Edge) -> EdgeKey {
        EdgeKeyView::new(
            &self.vertices[edge.from].name,
            &self.vertices[edge.to].name,
            edge.kind,
        )
        .to_owned_key()
    }

    /// Smallest `V{n}` (n >= 1) not already used as a vertex name.
    pub fn next_vertex_name(&self) -> String {
        (1..)
            .map(|i| format!("V{i}"))
            .find(|name| !self.vertex_index.contains_key(name.as_str()))
            .unwrap_or_default()
    }

    /// Adds a vertex under a fresh `V{n}` name.
    pub fn add_vertex(&mut self) -> &Vertex {
        let name = self.next_vertex_name();
        self.add_vertex_with_weight(name, 1.0)
    }

    /// Adds a vertex with weight 1.0, or returns the existing vertex of that name.
    pub fn add_named_vertex(&mut self, name: impl Into<String>) -> &Vertex {
        self.add_vertex_with_weight(name, 1.0)
    }

    /// Adds a vertex, or returns the existing vertex of that name unchanged.
    ///
    /// An empty name, or one that [`is_valid_vertex_name`] rejects, is replaced by a fresh
    /// `V{n}` name.
    pub fn add_vertex_with_weight(&mut self, name: impl Into<String>, weight: f32) -> &Vertex {
        let mut name = name.into();
        if !is_valid_vertex_name(&name) {
            let fresh = self.next_vertex_name();
            if !name.is_empty() {
                warn!(rejected = %name, vertex = %fresh, "invalid vertex name replaced");
            }
            name = fresh;
        }
        if let Some(idx) = self.vertex_index.get(name.as_str()).copied() {
            return &self.vertices[idx];
        }

        let idx = self.vertices.len();
        debug!(vertex = %name, index = idx, "add vertex");
        self.vertex_index.insert(name.clone(), idx);
        self.vertices.push(Vertex::new(name, weight, idx));
        self.incident.push(UnorderedVec::new());
        self.topology.add_vertex();
        self.dirty = true;
        &self.vertices[idx]
    }

    /// Removes a vertex and every edge incident to it.
    pub fn remove_vertex(&mut self, name: &str) -> Result<Vertex> {
        let idx = self.vertex_slot(name)?;
        self.remove_vertex_at(idx)
    }

    pub fn remove_vertex_at(&mut self, index: usize) -> Result<Vertex> {
        let len = self.vertices.len();
        if index >= len {
            return Err(Error::VertexIndexOutOfRange { index, len });
        }

        // Highest slot first: each removal only relocates an edge from above the pending slots.
        let mut incident: Vec<usize> = self.incident[index].iter().copied().collect();
        incident.sort_unstable_by(|a, b| b.cmp(a));
        for edge_idx in incident {
            self.remove_edge_at(edge_idx)?;
        }

        let moved_from = self.topology.remove_vertex(index);
        let vertex = self.vertices.swap_remove(index);
        self.incident.swap_remove(index);
        self.vertex_index.remove(vertex.name.as_str());
        debug!(vertex = %vertex.name, index, "remove vertex");

        if let Some(old) = moved_from {
            let moved = &mut self.vertices[index];
            moved.index = index;
            if let Some(slot) = self.vertex_index.get_mut(moved.name.as_str()) {
                *slot = index;
            }
            for &edge_idx in self.incident[index].iter() {
                let edge = &mut self.edges[edge_idx];
                if edge.from == old {
                    edge.from = index;
                }
                if edge.to == old {
                    edge.to = index;
                }
            }
        }

        self.dirty = true;
        Ok(vertex)
    }

    /// Adds an edge, or returns the existing edge with the same endpoints and kind.
    pub fn add_edge(&mut self, from: &str, to: &str, kind: EdgeKind) -> Result<&Edge> {
        let from_idx = self.vertex_slot(from)?;
        let to_idx = self.vertex_slot(to)?;
        let view = EdgeKeyView::new(from, to, kind);
        if let Some(idx) = self.edge_index.get(&view).copied() {
            return Ok(&self.edges[idx]);
        }

        let idx = self.edges.len();
        debug!(edge = %kind.label(from, to), index = idx, "add edge");
        self.edge_index.insert(view.to_owned_key(), idx);
        self.edges.push(Edge {
            from: from_idx,
            to: to_idx,
            kind,
            angle: None,
            strength: None,
            index: idx,
        });
        self.incident[from_idx].push(idx);
        if from_idx != to_idx {
            self.incident[to_idx].push(idx);
        }
        self.topology.link(from_idx, to_idx);
        self.dirty = true;
        Ok(&self.edges[idx])
    }

    pub fn remove_edge(&mut self, from: &str, to: &str, kind: EdgeKind) -> Result<Edge> {
        let idx = self.edge_slot(from, to, kind)?;
        self.remove_edge_at(idx)
    }

    pub fn remove_edge_at(&mut self, index: usize) -> Result<Edge> {
        let len = self.edges.len();
        if index >= len {
            return Err(Error::EdgeIndexOutOfRange { index, len });
        }

        let key = self.key_of(&self.edges[index]);
        debug!(edge = %key, index, "remove edge");
        self.edge_index.remove(&key);
        let edge = self.edges.swap_remove(index);
        self.incident[edge.from].remove_item(&index);
        if edge.from != edge.to {
            self.incident[edge.to].remove_item(&index);
        }
        self.topology.unlink(edge.from, edge.to);

        // The edge formerly in the last slot now lives at `index`.
        let old = len - 1;
        if index != old {
            let moved = &mut self.edges[index];
            moved.index = index;
            let (from, to) = (moved.from, moved.to);
            for endpoint in [from, to] {
                for slot in self.incident[endpoint].iter_mut() {
                    if *slot == old {
                        *slot = index;
                    }
                }
            }
            let moved_key = self.key_of(&self.edges[index]);
            if let Some(slot) = self.edge_index.get_mut(&moved_key) {
                *slot = index;
            }
        }

        self.dirty = true;
        Ok(edge)
    }

    pub fn set_vertex_kind(&mut self, name: &str, kind: VertexKind) -> Result<()> {
        let idx = self.vertex_slot(name)?;
        self.vertices[idx].kind = kind;
        self.dirty = true;
        Ok(())
    }

    pub fn set_vertex_position(&mut self, name: &str, position: Position) -> Result<()> {
        let idx = self.vertex_slot(name)?;
        self.vertices[idx].position = position;
        self.dirty = true;
        Ok(())
    }

    pub fn set_vertex_weight(&mut self, name: &str, weight: f32) -> Result<()> {
        let idx = self.vertex_slot(name)?;
        self.vertices[idx].weight = weight;
        self.dirty = true;
        Ok(())
    }

    /// Renames a vertex. Returns `Ok(false)`, keeping the old name, when `new_name` is not a
    /// valid vertex name or is already taken by another vertex.
    pub fn rename_vertex(&mut self, name: &str, new_name: &str) -> Result<bool> {
        let idx = self.vertex_slot(name)?;
        if name == new_name {
            return Ok(true);
        }
        if !is_valid_vertex_name(new_name) || self.vertex_index.contains_key(new_name) {
            debug!(vertex = %name, rejected = %new_name, "rename rejected");
            return Ok(false);
        }

        let touching: Vec<usize> = self.incident[idx].iter().copied().collect();
        for &edge_idx in &touching {
            let key = self.key_of(&self.edges[edge_idx]);
            self.edge_index.remove(&key);
        }

        self.vertex_index.remove(name);
        self.vertex_index.insert(new_name.to_string(), idx);
        self.vertices[idx].name = new_name.to_string();

        for edge_idx in touching {
            let key = self.key_of(&self.edges[edge_idx]);
            self.edge_index.insert(key, edge_idx);
        }

        self.dirty = true;
        Ok(true)
    }

    /// Changes an edge's kind. Returns `Ok(false)` when an edge of `new_kind` already joins the
    /// same endpoints.
    pub fn set_edge_kind(
        &mut self,
        from: &str,
        to: &str,
        kind: EdgeKind,
        new_kind: EdgeKind,
    ) -> Result<bool> {
        let idx = self.edge_slot(from, to, kind)?;
        if kind == new_kind {
            return Ok(true);
        }
        if self.edge(from, to, new_kind).is_some() {
            return Ok(false);
        }

        let old_key = self.key_of(&self.edges[idx]);
        self.edge_index.remove(&old_key);
        self.edges[idx].kind = new_kind;
        let new_key = self.key_of(&self.edges[idx]);
        self.edge_index.insert(new_key, idx);
        self.dirty = true;
        Ok(true)
    }

    /// Sets the layout annotations of an edge; `None` leaves a field unchanged.
    pub fn annotate_edge(
        &mut self,
        from: &str,
        to: &str,
        kind: EdgeKind,
        angle: Option<f32>,
        strength: Option<f32>,
    ) -> Result<()> {
        let idx = self.edge_slot(from, to, kind)?;
        let edge = &mut self.edges[idx];
        if angle.is_some() {
            edge.angle = angle;
        }
        if strength.is_some() {
            edge.strength = strength;
        }
        self.dirty = true;
        Ok(())
    }

    pub(crate) fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn component_count(&self) -> usize {
        self.topology.component_count()
    }

    /// True when the graph has at most one connected component, ignoring edge direction.
    pub fn is_connected(&self) -> bool {
        self.topology.is_connected()
    }

    /// Debug dump of storage slots and adjacency.
    pub fn snapshot(&self) -> String {
        let mut out = String::new();
        let vertices: Vec<String> = self
            .vertices
            .iter()
            .map(|v| format!("[{}]{}", v.index, v.name))
            .collect();
        let _ = writeln!(out, "Vertices: {}", vertices.join(","));
        let edges: Vec<String> = self
            .edges
            .iter()
            .map(|e| format!("[{}]{}", e.index, self.edge_name(e)))
            .collect();
        let _ = writeln!(out, "Edges: {}", edges.join(","));
        out.push_str("Adjacency:");
        for (i, neighbors) in self.topology.sorted_adjacency().iter().enumerate() {
            let list: Vec<String> = neighbors.iter().map(ToString::to_string).collect();
            let _ = write!(out, " [{i}]{}", list.join(","));
        }
        out.push('\n');
        out
    }

    /// Verifies the bookkeeping: slot indices, name tables, incident lists, and that the
    /// adjacency is exactly the symmetric closure of the edge list.
    pub fn check_invariants(&self) -> Result<()> {
        let fail = |message: String| -> Result<()> { Err(Error::Inconsistent { message }) };

        let n = self.vertices.len();
        if self.vertex_index.len() != n || self.incident.len() != n {
            return fail(format!(
                "table sizes differ: vertices={n} names={} incident={}",
                self.vertex_index.len(),
                self.incident.len()
            ));
        }
        if self.topology.vertex_count() != n {
            return fail(format!(
                "adjacency has {} slots for {n} vertices",
                self.topology.vertex_count()
            ));
        }
        for (i, v) in self.vertices.iter().enumerate() {
            if v.index != i {
                return fail(format!("vertex {} at slot {i} claims index {}", v.name, v.index));
            }
            if self.vertex_index.get(v.name.as_str()) != Some(&i) {
                return fail(format!("name table does not map {} to slot {i}", v.name));
            }
        }

        if self.edge_index.len() != self.edges.len() {
            return fail(format!(
                "edge table has {} keys for {} edges",
                self.edge_index.len(),
                self.edges.len()
            ));
        }
        let mut expected: Vec<HashMap<usize, u32>> = vec![HashMap::default(); n];
        let mut expected_incident: Vec<Vec<usize>> = vec![Vec::new(); n];
        for (i, e) in self.edges.iter().enumerate() {
            if e.index != i {
                return fail(format!("edge at slot {i} claims index {}", e.index));
            }
            if e.from >= n || e.to >= n {
                return fail(format!("edge at slot {i} points outside vertex storage"));
            }
            let key = self.key_of(e);
            if self.edge_index.get(&key) != Some(&i) {
                return fail(format!("edge table does not map {key} to slot {i}"));
            }
            *expected[e.from].entry(e.to).or_insert(0) += 1;
            expected_incident[e.from].push(i);
            if e.from != e.to {
                *expected[e.to].entry(e.from).or_insert(0) += 1;
                expected_incident[e.to].push(i);
            }
        }

        for v in 0..n {
            if *self.topology.neighbors(v) != expected[v] {
                return fail(format!(
                    "adjacency of {} disagrees with its edges",
                    self.vertices[v].name
                ));
            }
            let mut actual: Vec<usize> = self.incident[v].iter().copied().collect();
            actual.sort_unstable();
            if actual != expected_incident[v] {
                return fail(format!(
                    "incident edges of {} disagree with the edge list",
                    self.vertices[v].name
                ));
            }
        }
        Ok(())
    }
}
