//! Applies a parsed layout to the tree: moves nodes and turns bent edges into reroute chains.

use gvarrange_graph::{NodeId, NodeTree, Point, Size, SocketRef, point};
use tracing::{debug, warn};

use crate::dot::{DPI, PortIndex};
use crate::error::{Error, Result};
use crate::plain::{EdgeLine, MIN_CONTROL_POINTS, NodeLine, PlainLayout};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteReport {
    pub placed: usize,
    /// Links replaced by a chain of reroute nodes.
    pub rerouted: usize,
    /// Reroute nodes created, in creation order.
    pub reroutes: Vec<NodeId>,
}

/// Number of reroute nodes needed for an edge with `control_points` spline points:
/// `ceil((n - 4) / 3)`, and none for a straight edge.
pub fn reroute_count(control_points: usize) -> usize {
    control_points
        .saturating_sub(MIN_CONTROL_POINTS)
        .div_ceil(3)
}

/// The control points that get a reroute node: indices 2, 5, 8, ... short of the last pair.
pub fn reroute_points(control_points: &[Point]) -> Vec<Point> {
    let n = control_points.len();
    (2..n.saturating_sub(2))
        .step_by(3)
        .map(|i| control_points[i])
        .collect()
}

/// Top-left corner in host units of a node reported by its center and size in inches.
pub fn node_location(center: Point, size: Size) -> Point {
    point(
        (center.x - size.width * 0.5) * DPI,
        (center.y + size.height * 0.5) * DPI,
    )
}

struct Placement {
    node: NodeId,
    location: Point,
}

struct Route {
    from: SocketRef,
    to: SocketRef,
    /// Reroute locations in host units.
    points: Vec<Point>,
}

/// Writes the layout into `tree`.
///
/// Every address is resolved before the first mutation, so an out-of-range index leaves the tree
/// untouched.
pub fn apply<T: NodeTree + ?Sized>(
    tree: &mut T,
    index: &PortIndex,
    layout: &PlainLayout,
) -> Result<RewriteReport> {
    let placements = layout
        .nodes
        .iter()
        .map(|n| place(index, n))
        .collect::<Result<Vec<_>>>()?;
    let mut routes = Vec::new();
    for edge in &layout.edges {
        if let Some(route) = route(index, edge)? {
            routes.push(route);
        }
    }

    let mut report = RewriteReport::default();
    for p in placements {
        tree.set_location(p.node, p.location)?;
        report.placed += 1;
    }

    for route in routes {
        let existing = tree
            .links()
            .into_iter()
            .find(|l| l.from == route.from && l.to == route.to);
        let Some(existing) = existing else {
            warn!(from = %route.from, to = %route.to, "no link between these sockets; edge left as is");
            continue;
        };
        tree.remove_link(existing.id);

        let mut last = route.from;
        for location in &route.points {
            let reroute = tree.add_reroute(*location);
            tree.add_link(last, SocketRef::new(reroute, 0))?;
            last = SocketRef::new(reroute, 0);
            report.reroutes.push(reroute);
        }
        tree.add_link(last, route.to)?;
        debug!(from = %route.from, to = %route.to, reroutes = route.points.len(), "rerouted link");
        report.rerouted += 1;
    }

    Ok(report)
}

fn place(index: &PortIndex, line: &NodeLine) -> Result<Placement> {
    let node = index.node(line.node).ok_or_else(|| {
        Error::layout_parse(
            line.line,
            format!("node index {} out of range ({} nodes)", line.node, index.len()),
        )
    })?;
    Ok(Placement {
        node,
        location: node_location(line.center, line.size),
    })
}

fn route(index: &PortIndex, edge: &EdgeLine) -> Result<Option<Route>> {
    let mut ends = [None, None];
    for (slot, address) in ends.iter_mut().zip([edge.tail, edge.head]) {
        if index.node(address.node).is_none() {
            return Err(Error::layout_parse(
                edge.line,
                format!("node index {} out of range ({} nodes)", address.node, index.len()),
            ));
        }
        if address.port.is_none() {
            continue;
        }
        let socket = index.resolve(address).ok_or_else(|| {
            Error::layout_parse(edge.line, format!("port {address} does not exist"))
        })?;
        *slot = Some(socket);
    }

    if edge.control_points.len() == MIN_CONTROL_POINTS {
        return Ok(None);
    }
    let [Some(from), Some(to)] = ends else {
        // A hidden socket; the host has nowhere to attach the chain.
        return Ok(None);
    };
    let points = reroute_points(&edge.control_points)
        .into_iter()
        .map(|p| point(p.x * DPI, p.y * DPI))
        .collect();
    Ok(Some(Route { from, to, points }))
}
