//! Reader for Graphviz `-Tplain-ext` output.
//!
//! One statement per line, fields separated by whitespace:
//!
//! ```text
//! graph scale width height
//! node name x y width height label style shape color fillcolor
//! edge tail head n x1 y1 .. xn yn [label xl yl] style color
//! stop
//! ```
//!
//! Coordinates are in inches with the origin at the bottom left. Only `node` and `edge` lines
//! are read. Quoted fields are not supported: a field this reader needs that starts with a quote
//! is reported as an error instead of being split at its spaces.

use gvarrange_graph::{Point, Size, point, size};

use crate::address::{Polarity, PortAddress, parse_node_name};
use crate::error::{Error, Result};

/// Fewest control points Graphviz emits for one edge (a single cubic segment).
pub const MIN_CONTROL_POINTS: usize = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct NodeLine {
    pub line: usize,
    /// Position of the node in the serialized order.
    pub node: usize,
    pub center: Point,
    pub size: Size,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeLine {
    pub line: usize,
    pub tail: PortAddress,
    pub head: PortAddress,
    pub control_points: Vec<Point>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlainLayout {
    pub nodes: Vec<NodeLine>,
    pub edges: Vec<EdgeLine>,
}

pub fn parse(text: &str) -> Result<PlainLayout> {
    let mut layout = PlainLayout::default();
    for (i, raw) in text.lines().enumerate() {
        let line = i + 1;
        let fields: Vec<&str> = raw.split_whitespace().collect();
        match fields.first().copied() {
            Some("node") => layout.nodes.push(parse_node(line, &fields)?),
            Some("edge") => layout.edges.push(parse_edge(line, &fields)?),
            _ => {}
        }
    }
    Ok(layout)
}

fn parse_node(line: usize, fields: &[&str]) -> Result<NodeLine> {
    if fields.len() < 6 {
        return Err(Error::layout_parse(
            line,
            format!("node statement needs 6 fields, found {}", fields.len()),
        ));
    }
    reject_quoted(line, &fields[1..6])?;

    let node = parse_node_name(fields[1])
        .ok_or_else(|| Error::layout_parse(line, format!("unexpected node name {:?}", fields[1])))?;
    let x = number(line, fields[2])?;
    let y = number(line, fields[3])?;
    let w = number(line, fields[4])?;
    let h = number(line, fields[5])?;
    Ok(NodeLine {
        line,
        node,
        center: point(x, y),
        size: size(w, h),
    })
}

fn parse_edge(line: usize, fields: &[&str]) -> Result<EdgeLine> {
    if fields.len() < 4 {
        return Err(Error::layout_parse(
            line,
            format!("edge statement needs at least 4 fields, found {}", fields.len()),
        ));
    }
    reject_quoted(line, &fields[1..4])?;

    let tail = PortAddress::parse(fields[1], Polarity::Output)
        .ok_or_else(|| Error::layout_parse(line, format!("bad edge tail {:?}", fields[1])))?;
    let head = PortAddress::parse(fields[2], Polarity::Input)
        .ok_or_else(|| Error::layout_parse(line, format!("bad edge head {:?}", fields[2])))?;
    let count: usize = fields[3].parse().map_err(|_| {
        Error::layout_parse(line, format!("bad control point count {:?}", fields[3]))
    })?;
    if count < MIN_CONTROL_POINTS {
        return Err(Error::layout_parse(
            line,
            format!("edge has {count} control points, expected at least {MIN_CONTROL_POINTS}"),
        ));
    }

    let coords_end = count.checked_mul(2).and_then(|n| n.checked_add(4));
    let Some(coords_end) = coords_end.filter(|&end| end <= fields.len()) else {
        return Err(Error::layout_parse(
            line,
            format!(
                "edge announces {count} control points but has {} coordinates",
                fields.len() - 4
            ),
        ));
    };
    let coords = &fields[4..coords_end];
    reject_quoted(line, coords)?;

    let control_points = coords
        .chunks_exact(2)
        .map(|xy| Ok(point(number(line, xy[0])?, number(line, xy[1])?)))
        .collect::<Result<Vec<_>>>()?;

    Ok(EdgeLine {
        line,
        tail,
        head,
        control_points,
    })
}

fn number(line: usize, field: &str) -> Result<f64> {
    match field.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(Error::layout_parse(line, format!("bad number {field:?}"))),
    }
}

fn reject_quoted(line: usize, fields: &[&str]) -> Result<()> {
    match fields.iter().find(|f| f.starts_with('"')) {
        Some(field) => Err(Error::layout_parse(
            line,
            format!("quoted fields are not supported: {field}"),
        )),
        None => Ok(()),
    }
}
