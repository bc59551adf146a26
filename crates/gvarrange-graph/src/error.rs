use crate::model::{NodeId, SocketRef};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown node: {0}")]
    UnknownNode(NodeId),

    #[error("unknown node name: {name}")]
    UnknownNodeName { name: String },

    #[error("duplicate node name: {name}")]
    DuplicateNodeName { name: String },

    #[error("node {node} has no output socket {index}")]
    MissingOutput { node: NodeId, index: usize },

    #[error("node {node} has no input socket {index}")]
    MissingInput { node: NodeId, index: usize },

    #[error("link references socket {socket_index} on node {node_name:?}, which does not exist")]
    SocketOutOfRange {
        node_name: String,
        socket_index: usize,
    },

    #[error("input socket {0} is already linked")]
    SocketOccupied(SocketRef),
}
