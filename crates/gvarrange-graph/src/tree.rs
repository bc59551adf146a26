//! The capability trait through which the arranger reads and rewrites a host graph.
//!
//! A host binding implements [`NodeTree`] once; every algorithm in `gvarrange-core` is written
//! against it. [`NodeGraph`](crate::NodeGraph) is the in-memory implementation.

use crate::error::Result;
use crate::geom::Point;
use crate::model::{Link, LinkId, Node, NodeId, SocketRef};

pub trait NodeTree {
    /// Node ids in the host's iteration order. Must be identical between two calls that are not
    /// separated by a mutation.
    fn node_ids(&self) -> Vec<NodeId>;

    fn node(&self, id: NodeId) -> Option<&Node>;

    /// All links, in the host's iteration order.
    fn links(&self) -> Vec<Link>;

    fn set_location(&mut self, id: NodeId, location: Point) -> Result<()>;

    /// Connects an output socket to an input socket.
    ///
    /// Fails when either socket does not exist, or when `to` is already linked and does not accept
    /// multiple links. Callers replacing a link must remove it first.
    fn add_link(&mut self, from: SocketRef, to: SocketRef) -> Result<LinkId>;

    fn remove_link(&mut self, id: LinkId) -> Option<Link>;

    /// Creates a reroute node (one input, one output) at `location`.
    fn add_reroute(&mut self, location: Point) -> NodeId;

    /// Removes a node together with every link touching it.
    fn remove_node(&mut self, id: NodeId) -> Option<Node>;

    fn is_linked(&self, input: SocketRef) -> bool {
        self.links().iter().any(|l| l.to == input)
    }

    fn node_count(&self) -> usize {
        self.node_ids().len()
    }
}
