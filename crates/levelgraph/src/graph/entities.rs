//! Plain-data vertex and edge records owned by [`Graph`](super::Graph).
//!
//! Entities carry no back-reference to their graph; every mutation goes through `Graph`, which
//! keeps the structural indices and the dirty flag current.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VertexKind {
    #[default]
    Normal,
    Start,
    Save,
    Boss,
}

impl VertexKind {
    pub const ALL: [VertexKind; 4] = [Self::Normal, Self::Start, Self::Save, Self::Boss];

    /// Keyword used by the text format (`type:<keyword>`).
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Normal => "poi",
            Self::Start => "start",
            Self::Save => "save",
            Self::Boss => "boss",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.keyword() == keyword)
    }
}

impl fmt::Display for VertexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Edge flavor. Connectivity analysis treats every kind as a symmetric link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EdgeKind {
    #[default]
    Undirected,
    Directed,
    ShortCut,
    Mechanism,
}

impl EdgeKind {
    pub const ALL: [EdgeKind; 4] = [
        Self::Undirected,
        Self::Directed,
        Self::ShortCut,
        Self::Mechanism,
    ];

    pub const fn connector(self) -> &'static str {
        match self {
            Self::Undirected => "--",
            Self::Directed => "->",
            Self::ShortCut => ">>",
            Self::Mechanism => "*>",
        }
    }

    pub fn from_connector(connector: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.connector() == connector)
    }

    /// Human-readable edge name, e.g. `A->B`.
    pub fn label(self, from: &str, to: &str) -> String {
        format!("{from}{}{to}", self.connector())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    pub(in crate::graph) name: String,
    pub(in crate::graph) weight: f32,
    pub(in crate::graph) kind: VertexKind,
    pub(in crate::graph) position: Position,
    pub(in crate::graph) index: usize,
}

impl Vertex {
    pub(in crate::graph) fn new(name: String, weight: f32, index: usize) -> Self {
        Self {
            name,
            weight,
            kind: VertexKind::Normal,
            position: Position::default(),
            index,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rendering hint only; the analysis ignores it.
    pub fn weight(&self) -> f32 {
        self.weight
    }

    pub fn kind(&self) -> VertexKind {
        self.kind
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Current storage slot. Invalidated by any vertex removal.
    pub fn index(&self) -> usize {
        self.index
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub(in crate::graph) from: usize,
    pub(in crate::graph) to: usize,
    pub(in crate::graph) kind: EdgeKind,
    pub(in crate::graph) angle: Option<f32>,
    pub(in crate::graph) strength: Option<f32>,
    pub(in crate::graph) index: usize,
}

impl Edge {
    /// Storage slot of the source vertex.
    pub fn from_index(&self) -> usize {
        self.from
    }

    /// Storage slot of the target vertex.
    pub fn to_index(&self) -> usize {
        self.to
    }

    pub fn kind(&self) -> EdgeKind {
        self.kind
    }

    pub fn angle(&self) -> Option<f32> {
        self.angle
    }

    pub fn strength(&self) -> Option<f32> {
        self.strength
    }

    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }

    /// Current storage slot. Invalidated by any edge or vertex removal.
    pub fn index(&self) -> usize {
        self.index
    }
}
