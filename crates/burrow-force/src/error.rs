use burrow_core::NodeId;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("link references a node missing from the snapshot: {id}")]
    MissingEndpoint { id: NodeId },

    #[error("node appears twice in the snapshot: {id}")]
    DuplicateNode { id: NodeId },

    #[error("invalid force parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },
}

pub type Result<T> = std::result::Result<T, Error>;
