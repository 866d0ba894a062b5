use crate::model::NodeId;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown node: {id}")]
    UnknownNode { id: NodeId },

    #[error("node already exists: {id}")]
    DuplicateNode { id: NodeId },

    #[error("edge {from} -> {to} would create a cycle")]
    CycleDetected { from: NodeId, to: NodeId },

    #[error("graph already has a root ({root}); new nodes need a parent")]
    RootExists { root: NodeId },

    #[error("not an article url: {url}")]
    InvalidPageUrl { url: String },

    #[error("invalid shared state: {message}")]
    InvalidShareState { message: String },

    #[error("invalid layout config: {message}")]
    InvalidConfig { message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
