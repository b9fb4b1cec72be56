#![forbid(unsafe_code)]

//! Level-layout graph engine.
//!
//! Rooms are vertices and connections are typed edges. On top of the mutable graph the crate
//! computes vertex-cut resilience metrics (connectivity, n-th order Cheeger constants, and the
//! factorial-weighted stability factor) and reads/writes a small line-oriented text format.
//!
//! ```
//! use levelgraph::{EdgeKind, Graph};
//!
//! let mut g = Graph::new();
//! for name in ["A", "B", "C", "D"] {
//!     g.add_named_vertex(name);
//! }
//! for (from, to) in [("A", "B"), ("B", "C"), ("C", "D"), ("D", "A")] {
//!     g.add_edge(from, to, EdgeKind::Undirected).unwrap();
//! }
//! assert_eq!(g.connectivity(), 2);
//! assert_eq!(g.cheeger_constant(1), 1.0);
//! ```

pub mod combinations;
pub mod config;
pub mod error;
pub mod graph;
pub mod stability;
pub mod text;
pub mod unordered;

pub use combinations::{Combinations, IndexCombinations, binomial, combinations};
pub use config::AnalysisOptions;
pub use error::{Error, Result};
pub use graph::{Edge, EdgeKind, Graph, Position, Vertex, VertexKind, is_valid_vertex_name};
pub use stability::{CheegerEntry, StabilityAnalyzer, StabilityReport, analyze};
pub use text::{Diagnostic, ParseOptions, ParsedGraph, parse, parse_with_options};
pub use unordered::UnorderedVec;
