//! Collapses pass-through reroute nodes into direct links before layout.
//!
//! A reroute node is elided when it has at most one incoming and at most one outgoing link, and
//! at least one of the two. Its predecessor is spliced straight to its successor. Reroutes that
//! fan in or fan out (or are completely unconnected) are kept; which side would own the splice is
//! not well defined for them.

use gvarrange_graph::{LinkId, Node, NodeId, NodeTree, SocketRef};
use rustc_hash::FxBuildHasher;
use std::collections::VecDeque;
use tracing::{debug, info};

use crate::error::Result;

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;
type HashSet<T> = hashbrown::HashSet<T, FxBuildHasher>;

#[derive(Debug, Clone, Copy)]
struct Neighbor {
    link: LinkId,
    /// The socket on the far end of `link`.
    socket: SocketRef,
}

#[derive(Debug, Default)]
struct Adjacency {
    incoming: Vec<Neighbor>,
    outgoing: Vec<Neighbor>,
}

impl Adjacency {
    fn is_elidable(&self) -> bool {
        let (i, o) = (self.incoming.len(), self.outgoing.len());
        i <= 1 && o <= 1 && i + o > 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElisionReport {
    /// Removed reroute nodes, in graph order.
    pub removed: Vec<NodeId>,
    /// Number of replacement links created.
    pub spliced: usize,
}

/// Removes every elidable reroute node from `tree`.
///
/// The adjacency of all reroute nodes is indexed once and kept current as splices happen, so a
/// chain of reroutes collapses in a single call. When a splice changes the degree of a reroute
/// that was already skipped, that reroute is examined again; the result is a fixed point and a
/// second call is a no-op.
pub fn elide<T: NodeTree + ?Sized>(tree: &mut T) -> Result<ElisionReport> {
    let reroutes: Vec<NodeId> = tree
        .node_ids()
        .into_iter()
        .filter(|id| tree.node(*id).is_some_and(Node::is_reroute))
        .collect();
    if reroutes.is_empty() {
        return Ok(ElisionReport::default());
    }

    let mut adjacency: HashMap<NodeId, Adjacency> = reroutes
        .iter()
        .map(|id| (*id, Adjacency::default()))
        .collect();
    for link in tree.links() {
        if let Some(adj) = adjacency.get_mut(&link.to.node) {
            adj.incoming.push(Neighbor {
                link: link.id,
                socket: link.from,
            });
        }
        if let Some(adj) = adjacency.get_mut(&link.from.node) {
            adj.outgoing.push(Neighbor {
                link: link.id,
                socket: link.to,
            });
        }
    }

    let mut queue: VecDeque<NodeId> = reroutes.iter().copied().collect();
    let mut queued: HashSet<NodeId> = reroutes.iter().copied().collect();
    let mut removed: HashSet<NodeId> = HashSet::default();
    let mut report = ElisionReport::default();

    while let Some(id) = queue.pop_front() {
        queued.remove(&id);
        if removed.contains(&id) {
            continue;
        }
        let Some(adj) = adjacency.get(&id) else {
            continue;
        };
        if !adj.is_elidable() {
            continue;
        }
        let incoming = adj.incoming.first().copied();
        let outgoing = adj.outgoing.first().copied();

        if let Some(up) = incoming {
            tree.remove_link(up.link);
            if let Some(adj) = adjacency.get_mut(&up.socket.node) {
                adj.outgoing.retain(|n| n.link != up.link);
            }
        }
        if let Some(down) = outgoing {
            tree.remove_link(down.link);
            if let Some(adj) = adjacency.get_mut(&down.socket.node) {
                adj.incoming.retain(|n| n.link != down.link);
            }
        }

        if let (Some(up), Some(down)) = (incoming, outgoing) {
            let link = tree.add_link(up.socket, down.socket)?;
            debug!(reroute = %id, from = %up.socket, to = %down.socket, "spliced reroute");
            if let Some(adj) = adjacency.get_mut(&up.socket.node) {
                adj.outgoing.push(Neighbor {
                    link,
                    socket: down.socket,
                });
            }
            if let Some(adj) = adjacency.get_mut(&down.socket.node) {
                adj.incoming.push(Neighbor {
                    link,
                    socket: up.socket,
                });
            }
            report.spliced += 1;
        }
        removed.insert(id);

        for neighbor in incoming.iter().chain(outgoing.iter()) {
            let n = neighbor.socket.node;
            if n != id && adjacency.contains_key(&n) && !removed.contains(&n) && queued.insert(n)
            {
                queue.push_back(n);
            }
        }
    }

    for id in reroutes {
        if removed.contains(&id) {
            tree.remove_node(id);
            report.removed.push(id);
        }
    }

    info!(
        removed = report.removed.len(),
        spliced = report.spliced,
        "elided reroute nodes"
    );
    Ok(report)
}
