use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Settings for [`analyze`](crate::stability::analyze), loadable from JSON.
///
/// ```json
/// { "order": 3, "parallel": false, "maxVertices": 40 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct AnalysisOptions {
    /// Highest cut order folded into the stability factor.
    pub order: usize,
    /// Spread removal trials over the rayon pool. Ignored without the `parallel` feature.
    pub parallel: bool,
    /// Refuse analysis above this many vertices; enumeration is combinatorial.
    pub max_vertices: Option<usize>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            order: 3,
            parallel: false,
            max_vertices: None,
        }
    }
}

impl AnalysisOptions {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|err| Error::InvalidOptions {
            message: err.to_string(),
        })
    }

    pub fn with_order(mut self, order: usize) -> Self {
        self.order = order;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Whether a graph of `vertex_count` vertices is within `max_vertices`.
    pub fn admits(&self, vertex_count: usize) -> bool {
        self.max_vertices.is_none_or(|max| vertex_count <= max)
    }
}
