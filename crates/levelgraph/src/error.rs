pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("unknown vertex: {name}")]
    UnknownVertex { name: String },

    #[error("vertex index {index} out of range (vertex count {len})")]
    VertexIndexOutOfRange { index: usize, len: usize },

    #[error("unknown edge: {name}")]
    UnknownEdge { name: String },

    #[error("edge index {index} out of range (edge count {len})")]
    EdgeIndexOutOfRange { index: usize, len: usize },

    #[error("syntax error at line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("invalid analysis options: {message}")]
    InvalidOptions { message: String },

    #[error("graph invariant violated: {message}")]
    Inconsistent { message: String },
}
