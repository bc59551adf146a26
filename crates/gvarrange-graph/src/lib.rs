#![forbid(unsafe_code)]

//! Node graph model used by `gvarrange`.
//!
//! The host application's node editor (nodes, sockets, links) is modelled as an arena of node
//! records keyed by [`NodeId`], with links stored separately and addressing sockets by
//! `(node, index)`. Algorithms only see the graph through the [`NodeTree`] trait, so a host
//! binding can implement it directly instead of copying into a [`NodeGraph`].

pub mod document;
pub mod error;
pub mod geom;
mod graph;
pub mod model;
pub mod tree;

pub use document::{GraphDocument, LinkRecord, NodeRecord};
pub use error::{Error, Result};
pub use geom::{Point, Size, point, size};
pub use graph::{DEFAULT_DIMENSIONS, DEFAULT_WIDTH, NewNode, NodeGraph, REROUTE_TITLE, REROUTE_WIDTH};
pub use model::{Link, LinkId, Node, NodeId, NodeKind, Socket, SocketRef, SocketType};
pub use tree::NodeTree;
