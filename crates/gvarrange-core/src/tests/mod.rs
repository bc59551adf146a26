use gvarrange_graph::{NewNode, NodeGraph, NodeId, NodeTree, Socket, SocketRef};

mod dot;
mod plain;
mod reroute;
mod theme;

pub(crate) fn source(g: &mut NodeGraph, name: &str) -> NodeId {
    g.add_node(NewNode::new(name, "Value").with_outputs([Socket::new("Value")]))
        .unwrap()
}

pub(crate) fn sink(g: &mut NodeGraph, name: &str) -> NodeId {
    g.add_node(NewNode::new(name, "Output").with_inputs([Socket::new("Surface")]))
        .unwrap()
}

pub(crate) fn reroute(g: &mut NodeGraph, name: &str) -> NodeId {
    g.add_node(NewNode::reroute(name)).unwrap()
}

pub(crate) fn link(g: &mut NodeGraph, from: NodeId, to: NodeId) {
    g.add_link(SocketRef::new(from, 0), SocketRef::new(to, 0))
        .unwrap();
}

/// `(from node name, to node name)` for every link, in link order.
pub(crate) fn link_names(g: &NodeGraph) -> Vec<(String, String)> {
    g.links()
        .iter()
        .map(|l| {
            (
                g.node(l.from.node).unwrap().name.clone(),
                g.node(l.to.node).unwrap().name.clone(),
            )
        })
        .collect()
}

pub(crate) fn pair(a: &str, b: &str) -> (String, String) {
    (a.to_string(), b.to_string())
}
