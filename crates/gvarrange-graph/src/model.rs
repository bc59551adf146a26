//! Plain data records for nodes, sockets and links.

use crate::geom::{Point, Size};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable handle of a node inside one graph value. Never reused after removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Stable handle of a link inside one graph value. Never reused after removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinkId(pub(crate) u32);

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "l{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    #[default]
    Standard,
    /// One input, one output, no payload. Only bends a wire.
    Reroute,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SocketType {
    Vector,
    #[default]
    #[serde(other)]
    Other,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Socket {
    pub name: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default, rename = "type")]
    pub ty: SocketType,
    #[serde(default)]
    pub hide_value: bool,
    #[serde(default)]
    pub multi_input: bool,
}

impl Socket {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enabled: true,
            ty: SocketType::Other,
            hide_value: false,
            multi_input: false,
        }
    }

    pub fn vector(name: impl Into<String>) -> Self {
        Self {
            ty: SocketType::Vector,
            ..Self::new(name)
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    /// Unique within the graph (the host's identity string).
    pub name: String,
    pub kind: NodeKind,
    /// Type label shown when no user label is set.
    pub title: String,
    /// User label; empty when unset.
    pub label: String,
    pub inputs: Vec<Socket>,
    pub outputs: Vec<Socket>,
    pub location: Point,
    /// Width in host units as stored by the host.
    pub width: f64,
    /// Drawn size in (possibly UI-scaled) pixels.
    pub dimensions: Size,
}

impl Node {
    pub fn display_title(&self) -> &str {
        if self.label.is_empty() {
            &self.title
        } else {
            &self.label
        }
    }

    pub fn is_reroute(&self) -> bool {
        self.kind == NodeKind::Reroute
    }
}

/// A socket addressed by node and raw index within one polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SocketRef {
    pub node: NodeId,
    pub index: usize,
}

impl SocketRef {
    pub fn new(node: NodeId, index: usize) -> Self {
        Self { node, index }
    }
}

impl fmt::Display for SocketRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.node, self.index)
    }
}

/// Directed wire from an output socket to an input socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Link {
    pub id: LinkId,
    pub from: SocketRef,
    pub to: SocketRef,
}
