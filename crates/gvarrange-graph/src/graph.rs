//! Arena implementation of [`NodeTree`].

use crate::error::{Error, Result};
use crate::geom::{Point, Size, point, size};
use crate::model::{Link, LinkId, Node, NodeId, NodeKind, Socket, SocketRef};
use crate::tree::NodeTree;
use indexmap::IndexMap;

pub const REROUTE_TITLE: &str = "Reroute";
pub const REROUTE_WIDTH: f64 = 16.0;
pub const DEFAULT_WIDTH: f64 = 140.0;
pub const DEFAULT_DIMENSIONS: Size = Size::new(140.0, 100.0);

/// Description of a node to insert; the graph assigns the [`NodeId`].
#[derive(Debug, Clone)]
pub struct NewNode {
    pub name: String,
    pub kind: NodeKind,
    pub title: String,
    pub label: String,
    pub inputs: Vec<Socket>,
    pub outputs: Vec<Socket>,
    pub location: Point,
    pub width: f64,
    pub dimensions: Size,
}

impl NewNode {
    pub fn new(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Standard,
            title: title.into(),
            label: String::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            location: point(0.0, 0.0),
            width: DEFAULT_WIDTH,
            dimensions: DEFAULT_DIMENSIONS,
        }
    }

    pub fn reroute(name: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Reroute,
            inputs: vec![Socket::new("Input")],
            outputs: vec![Socket::new("Output")],
            width: REROUTE_WIDTH,
            dimensions: size(REROUTE_WIDTH, REROUTE_WIDTH),
            ..Self::new(name, REROUTE_TITLE)
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_inputs(mut self, inputs: impl IntoIterator<Item = Socket>) -> Self {
        self.inputs = inputs.into_iter().collect();
        self
    }

    pub fn with_outputs(mut self, outputs: impl IntoIterator<Item = Socket>) -> Self {
        self.outputs = outputs.into_iter().collect();
        self
    }

    pub fn at(mut self, location: Point) -> Self {
        self.location = location;
        self
    }

    pub fn sized(mut self, width: f64, dimensions: Size) -> Self {
        self.width = width;
        self.dimensions = dimensions;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct NodeGraph {
    nodes: IndexMap<NodeId, Node>,
    links: IndexMap<LinkId, Link>,
    next_node: u32,
    next_link: u32,
}

impl NodeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, new: NewNode) -> Result<NodeId> {
        if self.node_by_name(&new.name).is_some() {
            return Err(Error::DuplicateNodeName { name: new.name });
        }
        Ok(self.insert(new))
    }

    fn insert(&mut self, new: NewNode) -> NodeId {
        let id = NodeId(self.next_node);
        self.next_node += 1;
        self.nodes.insert(
            id,
            Node {
                id,
                name: new.name,
                kind: new.kind,
                title: new.title,
                label: new.label,
                inputs: new.inputs,
                outputs: new.outputs,
                location: new.location,
                width: new.width,
                dimensions: new.dimensions,
            },
        );
        id
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn node_by_name(&self, name: &str) -> Option<&Node> {
        self.nodes.values().find(|n| n.name == name)
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn link(&self, id: LinkId) -> Option<&Link> {
        self.links.get(&id)
    }

    /// First link connecting exactly these two sockets.
    pub fn link_between(&self, from: SocketRef, to: SocketRef) -> Option<LinkId> {
        self.links
            .values()
            .find(|l| l.from == from && l.to == to)
            .map(|l| l.id)
    }

    /// Host-style unique name: `base`, then `base.001`, `base.002`, ...
    fn unique_name(&self, base: &str) -> String {
        if self.node_by_name(base).is_none() {
            return base.to_string();
        }
        let mut n = 1usize;
        loop {
            let candidate = format!("{base}.{n:03}");
            if self.node_by_name(&candidate).is_none() {
                return candidate;
            }
            n += 1;
        }
    }

    fn output_socket(&self, r: SocketRef) -> Result<&Socket> {
        let node = self.nodes.get(&r.node).ok_or(Error::UnknownNode(r.node))?;
        node.outputs.get(r.index).ok_or(Error::MissingOutput {
            node: r.node,
            index: r.index,
        })
    }

    fn input_socket(&self, r: SocketRef) -> Result<&Socket> {
        let node = self.nodes.get(&r.node).ok_or(Error::UnknownNode(r.node))?;
        node.inputs.get(r.index).ok_or(Error::MissingInput {
            node: r.node,
            index: r.index,
        })
    }
}

impl NodeTree for NodeGraph {
    fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.keys().copied().collect()
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    fn links(&self) -> Vec<Link> {
        self.links.values().copied().collect()
    }

    fn set_location(&mut self, id: NodeId, location: Point) -> Result<()> {
        let node = self.nodes.get_mut(&id).ok_or(Error::UnknownNode(id))?;
        node.location = location;
        Ok(())
    }

    fn add_link(&mut self, from: SocketRef, to: SocketRef) -> Result<LinkId> {
        self.output_socket(from)?;
        let multi_input = self.input_socket(to)?.multi_input;
        if !multi_input && self.is_linked(to) {
            return Err(Error::SocketOccupied(to));
        }
        let id = LinkId(self.next_link);
        self.next_link += 1;
        self.links.insert(id, Link { id, from, to });
        Ok(id)
    }

    fn remove_link(&mut self, id: LinkId) -> Option<Link> {
        self.links.shift_remove(&id)
    }

    fn add_reroute(&mut self, location: Point) -> NodeId {
        let name = self.unique_name(REROUTE_TITLE);
        self.insert(NewNode::reroute(name).at(location))
    }

    fn remove_node(&mut self, id: NodeId) -> Option<Node> {
        let node = self.nodes.shift_remove(&id)?;
        self.links.retain(|_, l| l.from.node != id && l.to.node != id);
        Some(node)
    }

    fn is_linked(&self, input: SocketRef) -> bool {
        self.links.values().any(|l| l.to == input)
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }
}
