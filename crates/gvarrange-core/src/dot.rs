//! Writes a node tree as a Graphviz `digraph`.
//!
//! Every node becomes a fixed-size record whose HTML-like label mimics the host's node drawing:
//! a title row, the visible outputs (right aligned), a spacer, the visible inputs (left aligned).
//! Each socket row carries a port named after its [`PortAddress`], which is how edges attach to
//! the right height of the node and how `plain-ext` output is mapped back to sockets.

use gvarrange_graph::{Node, NodeId, NodeTree, SocketRef, SocketType};
use rustc_hash::FxBuildHasher;
use serde_json::Value;
use std::fmt::Write as _;
use tracing::{debug, warn};

use crate::address::{Polarity, PortAddress, node_name};
use crate::config::ArrangeConfig;
use crate::theme::Theme;

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;

/// Graphviz units per inch.
pub const DPI: f64 = 72.0;
pub const FONT_SIZE: u32 = 11;

// Node drawing metrics of the host's node editor, in host units.
pub const WIDGET_UNIT: f64 = 20.0;
pub const NODE_DY: f64 = WIDGET_UNIT;
pub const NODE_SOCKDY: f64 = 0.1 * WIDGET_UNIT;
pub const NODE_DYS: f64 = 0.5 * WIDGET_UNIT;

/// Maps serialized positions back to the tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PortIndex {
    nodes: Vec<IndexedNode>,
}

#[derive(Debug, Clone, PartialEq)]
struct IndexedNode {
    id: NodeId,
    /// Raw indices of visible outputs, by visible position.
    outputs: Vec<usize>,
    /// Raw indices of visible inputs, by visible position.
    inputs: Vec<usize>,
}

impl PortIndex {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, index: usize) -> Option<NodeId> {
        self.nodes.get(index).map(|n| n.id)
    }

    /// Resolves an address to a concrete socket. `None` when the node or port is out of range,
    /// or when the address names no port.
    pub fn resolve(&self, address: PortAddress) -> Option<SocketRef> {
        let node = self.nodes.get(address.node)?;
        let visible = match address.polarity {
            Polarity::Output => &node.outputs,
            Polarity::Input => &node.inputs,
        };
        let raw = *visible.get(address.port?)?;
        Some(SocketRef::new(node.id, raw))
    }
}

/// A complete DOT document plus the index needed to read the layout back.
#[derive(Debug, Clone)]
pub struct Description {
    pub text: String,
    pub index: PortIndex,
}

struct VisibleInput<'a> {
    name: &'a str,
    height: f64,
}

struct DotWriter {
    out: String,
}

impl DotWriter {
    fn line(&mut self, line: &str) {
        debug!(target: "gvarrange::gv_input", "{line}");
        self.out.push_str(line);
        self.out.push('\n');
    }

    fn row(&mut self, label: &str, width: f64, height: f64, align: &str, port: Option<&str>) -> f64 {
        let mut options = vec![
            ("height", height.to_string()),
            ("width", width.to_string()),
            ("align", align.to_string()),
            ("fixedsize", "true".to_string()),
            ("valign", "bottom".to_string()),
        ];
        if let Some(port) = port {
            options.push(("port", port.to_string()));
        }

        let mut s = String::from("<tr><td");
        for (key, value) in &options {
            let _ = write!(s, " {key}={}", quote(value));
        }
        let _ = write!(s, ">{}</td></tr>", htmlize::escape_text(label));
        self.line(&s);
        height
    }
}

fn quote(value: &str) -> String {
    Value::String(value.to_string()).to_string()
}

fn format_options(options: &[(&str, String)]) -> String {
    options
        .iter()
        .map(|(key, value)| format!("{key}={}", quote(value)))
        .collect::<Vec<_>>()
        .join(",")
}

/// Host-unit to point scale, taken from the first node (stored width over drawn width).
fn node_scale<T: NodeTree + ?Sized>(tree: &T, ids: &[NodeId]) -> f64 {
    let Some(first) = ids.first().and_then(|id| tree.node(*id)) else {
        return 1.0;
    };
    let drawn = first.dimensions.width;
    if drawn.is_finite() && drawn > 0.0 && first.width.is_finite() {
        first.width / drawn
    } else {
        1.0
    }
}

pub fn write_description<T: NodeTree + ?Sized>(
    tree: &T,
    config: &ArrangeConfig,
    theme: &Theme,
) -> Description {
    let mut w = DotWriter { out: String::new() };
    let mut index = PortIndex::default();

    w.line("digraph G {");
    write_global_options(&mut w, config, theme);

    let ids = tree.node_ids();
    let scale = node_scale(tree, &ids);

    for (position, id) in ids.iter().enumerate() {
        let Some(node) = tree.node(*id) else {
            continue;
        };
        let entry = write_node(&mut w, tree, node, position, scale, theme);
        index.nodes.push(entry);
    }

    let positions: HashMap<NodeId, usize> = index
        .nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id, i))
        .collect();
    for link in tree.links() {
        let (Some(&from), Some(&to)) = (positions.get(&link.from.node), positions.get(&link.to.node))
        else {
            warn!(link = %link.id, "link references a node outside the tree; skipped");
            continue;
        };
        let tail = visible_address(&index, from, Polarity::Output, link.from.index);
        let head = visible_address(&index, to, Polarity::Input, link.to.index);
        w.line(&format!("{tail} -> {head} [{}];", format_options(&[])));
    }

    w.line("}");
    Description { text: w.out, index }
}

fn visible_address(index: &PortIndex, node: usize, polarity: Polarity, raw: usize) -> PortAddress {
    let visible = match polarity {
        Polarity::Output => &index.nodes[node].outputs,
        Polarity::Input => &index.nodes[node].inputs,
    };
    match visible.iter().position(|r| *r == raw) {
        Some(port) => PortAddress {
            node,
            polarity,
            port: Some(port),
        },
        None => PortAddress::bare(node, polarity),
    }
}

fn write_global_options(w: &mut DotWriter, config: &ArrangeConfig, theme: &Theme) {
    let mut node_options = vec![
        ("fontcolor", theme.text.to_dot()),
        ("fontsize", FONT_SIZE.to_string()),
        ("fixedsize", "shape".to_string()),
        ("gradientangle", "270".to_string()),
        ("margin", "0.0".to_string()),
        ("shape", "rect".to_string()),
        ("style", "filled,rounded".to_string()),
        ("penwidth", "2".to_string()),
    ];
    if let Some(font) = config.font_name.as_deref().filter(|f| !f.is_empty()) {
        node_options.push(("fontname", font.to_string()));
    }

    let graph_options = vec![
        ("bgcolor", theme.background.to_dot()),
        ("fontcolor", theme.text.to_dot()),
        ("margin", "0".to_string()),
        ("nodesep", (config.node_sep / DPI).to_string()),
        ("rankdir", "LR".to_string()),
        ("ranksep", (config.rank_sep / DPI).to_string()),
        ("splines", "polyline".to_string()),
    ];

    let edge_options = vec![
        ("arrowhead", "none".to_string()),
        ("color", theme.wire.to_dot()),
        ("penwidth", "4".to_string()),
    ];

    for (section, options) in [
        ("node", node_options),
        ("graph", graph_options),
        ("edge", edge_options),
    ] {
        w.line(&format!("{section}[{}]", format_options(&options)));
    }
}

fn write_node<T: NodeTree + ?Sized>(
    w: &mut DotWriter,
    tree: &T,
    node: &Node,
    position: usize,
    scale: f64,
    theme: &Theme,
) -> IndexedNode {
    let width = node.dimensions.width * scale;
    let height = node.dimensions.height * scale;
    let header_fraction = if height > 0.0 {
        ((NODE_DY + NODE_DYS / 2.0) / height).clamp(0.0, 1.0)
    } else {
        1.0
    };
    let options = [
        ("width", (width / DPI).to_string()),
        ("height", (height / DPI).to_string()),
        (
            "fillcolor",
            format!(
                "{};{:.6}:{}",
                theme.node_header.to_dot(),
                header_fraction,
                theme.node_backdrop.to_dot()
            ),
        ),
    ];
    w.line(&format!(
        "{} [{}, label=",
        node_name(position),
        format_options(&options)
    ));
    w.line("<<table border=\"0\" cellborder=\"0\" cellpadding=\"0\" cellspacing=\"0\">");

    let mut entry = IndexedNode {
        id: node.id,
        outputs: Vec::new(),
        inputs: Vec::new(),
    };
    let mut visible_outputs = Vec::new();
    for (raw, socket) in node.outputs.iter().enumerate() {
        if socket.enabled {
            entry.outputs.push(raw);
            visible_outputs.push(socket.name.as_str());
        }
    }
    let mut visible_inputs = Vec::new();
    for (raw, socket) in node.inputs.iter().enumerate() {
        if !socket.enabled {
            continue;
        }
        let mut row_height = NODE_DY;
        let shows_vector_value = socket.ty == SocketType::Vector
            && !socket.hide_value
            && !tree.is_linked(SocketRef::new(node.id, raw));
        if shows_vector_value {
            row_height += NODE_DY * 3.0;
        }
        entry.inputs.push(raw);
        visible_inputs.push(VisibleInput {
            name: &socket.name,
            height: row_height,
        });
    }

    let mut y = 0.0;
    y += w.row(&format!("    {}", node.display_title()), width, NODE_DY, "left", None);
    y += w.row(" ", width, NODE_DYS / 2.0, "left", None);

    for (k, name) in visible_outputs.iter().enumerate() {
        let port = PortAddress::output(position, k).port_tag();
        y += w.row(&format!("{name}    "), width, NODE_DY, "right", Some(&port));
        if k + 1 < visible_outputs.len() {
            y += w.row(" ", width, NODE_SOCKDY, "left", None);
        }
    }

    // Push the inputs to the bottom of the node.
    let mut spacer = height - y;
    if !visible_inputs.is_empty() {
        spacer -= visible_inputs.iter().map(|i| i.height).sum::<f64>();
        spacer -= (visible_inputs.len() - 1) as f64 * NODE_SOCKDY;
        spacer -= NODE_DYS / 2.0;
    }
    w.row("", width, spacer.max(0.0), "left", None);

    for (k, input) in visible_inputs.iter().enumerate() {
        let port = PortAddress::input(position, k).port_tag();
        w.row(&format!("    {}", input.name), width, NODE_DY, "left", Some(&port));
        if input.height > NODE_DY {
            w.row("", width, input.height - NODE_DY, "left", None);
        }
        if k + 1 < visible_inputs.len() {
            w.row(" ", width, NODE_SOCKDY, "left", None);
        }
    }
    if !visible_inputs.is_empty() {
        w.row("", width, NODE_DYS / 2.0, "left", None);
    }

    w.line("</table>>]");
    entry
}
