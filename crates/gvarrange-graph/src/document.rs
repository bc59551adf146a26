//! Serde form of a [`NodeGraph`]: nodes by unique name, links by name and raw socket index.

use crate::error::{Error, Result};
use crate::geom::{Point, Size};
use crate::graph::{DEFAULT_DIMENSIONS, DEFAULT_WIDTH, NewNode, NodeGraph};
use crate::model::{Node, NodeKind, Socket, SocketRef};
use crate::tree::NodeTree;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
    #[serde(default)]
    pub links: Vec<LinkRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub name: String,
    #[serde(default)]
    pub kind: NodeKind,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub label: String,
    #[serde(default)]
    pub inputs: Vec<Socket>,
    #[serde(default)]
    pub outputs: Vec<Socket>,
    #[serde(default)]
    pub location: Point,
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_dimensions")]
    pub dimensions: Size,
}

fn default_width() -> f64 {
    DEFAULT_WIDTH
}

fn default_dimensions() -> Size {
    DEFAULT_DIMENSIONS
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub from_node: String,
    pub from_socket: usize,
    pub to_node: String,
    pub to_socket: usize,
}

impl NodeGraph {
    pub fn from_document(doc: &GraphDocument) -> Result<Self> {
        let mut graph = NodeGraph::new();
        for rec in &doc.nodes {
            let title = if rec.title.is_empty() && rec.kind == NodeKind::Reroute {
                crate::graph::REROUTE_TITLE.to_string()
            } else {
                rec.title.clone()
            };
            graph.add_node(NewNode {
                name: rec.name.clone(),
                kind: rec.kind,
                title,
                label: rec.label.clone(),
                inputs: rec.inputs.clone(),
                outputs: rec.outputs.clone(),
                location: rec.location,
                width: rec.width,
                dimensions: rec.dimensions,
            })?;
        }

        for rec in &doc.links {
            let from = graph.resolve(&rec.from_node, rec.from_socket, |n| n.outputs.len())?;
            let to = graph.resolve(&rec.to_node, rec.to_socket, |n| n.inputs.len())?;
            graph.add_link(from, to)?;
        }
        Ok(graph)
    }

    pub fn to_document(&self) -> GraphDocument {
        let nodes = self
            .nodes()
            .map(|n| NodeRecord {
                name: n.name.clone(),
                kind: n.kind,
                title: n.title.clone(),
                label: n.label.clone(),
                inputs: n.inputs.clone(),
                outputs: n.outputs.clone(),
                location: n.location,
                width: n.width,
                dimensions: n.dimensions,
            })
            .collect();

        let name_of = |r: SocketRef| {
            self.node(r.node)
                .map(|n| n.name.clone())
                .unwrap_or_default()
        };
        let links = self
            .links()
            .into_iter()
            .map(|l| LinkRecord {
                from_node: name_of(l.from),
                from_socket: l.from.index,
                to_node: name_of(l.to),
                to_socket: l.to.index,
            })
            .collect();

        GraphDocument { nodes, links }
    }

    fn resolve(
        &self,
        name: &str,
        socket_index: usize,
        socket_count: impl Fn(&Node) -> usize,
    ) -> Result<SocketRef> {
        let node = self
            .node_by_name(name)
            .ok_or_else(|| Error::UnknownNodeName {
                name: name.to_string(),
            })?;
        if socket_index >= socket_count(node) {
            return Err(Error::SocketOutOfRange {
                node_name: name.to_string(),
                socket_index,
            });
        }
        Ok(SocketRef::new(node.id, socket_index))
    }
}
