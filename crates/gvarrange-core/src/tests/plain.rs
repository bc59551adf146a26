use crate::address::{Polarity, PortAddress, node_name, parse_node_name};
use crate::error::Error;
use crate::plain::parse;
use gvarrange_graph::{point, size};

const SAMPLE: &str = "\
graph 1 4.5 2.25
node node_0 1.5 2.0 0.8 0.4 x solid rect black lightgrey
node node_1 3.5 1.0 1.2 0.6 x solid rect black lightgrey

edge node_0:o0 node_1:i1 4 1.9 2.0 2.4 2.0 2.6 1.0 2.9 1.0 solid black
edge node_0 node_1:i0 7 1 1 2 2 3 3 4 4 5 5 6 6 7 7 lbl 3.0 3.0 solid black
stop
";

fn parse_error(text: &str) -> (usize, String) {
    match parse(text).unwrap_err() {
        Error::LayoutParse { line, message } => (line, message),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn parse_reads_nodes_and_edges() {
    let layout = parse(SAMPLE).unwrap();

    assert_eq!(layout.nodes.len(), 2);
    assert_eq!(layout.nodes[0].node, 0);
    assert_eq!(layout.nodes[0].line, 2);
    assert_eq!(layout.nodes[0].center, point(1.5, 2.0));
    assert_eq!(layout.nodes[0].size, size(0.8, 0.4));
    assert_eq!(layout.nodes[1].node, 1);

    assert_eq!(layout.edges.len(), 2);
    let straight = &layout.edges[0];
    assert_eq!(straight.tail, PortAddress::output(0, 0));
    assert_eq!(straight.head, PortAddress::input(1, 1));
    assert_eq!(straight.control_points.len(), 4);
    assert_eq!(straight.control_points[2], point(2.6, 1.0));

    let bent = &layout.edges[1];
    assert_eq!(bent.line, 6);
    assert_eq!(bent.tail, PortAddress::bare(0, Polarity::Output));
    assert_eq!(bent.control_points.len(), 7);
    assert_eq!(bent.control_points[6], point(7.0, 7.0));
}

#[test]
fn parse_of_empty_output_is_empty() {
    let layout = parse("").unwrap();
    assert!(layout.nodes.is_empty());
    assert!(layout.edges.is_empty());
}

#[test]
fn quoted_label_after_the_geometry_is_ignored() {
    let layout = parse("node node_0 1 1 1 1 \"two words\" solid rect black grey\n").unwrap();
    assert_eq!(layout.nodes[0].center, point(1.0, 1.0));
}

#[test]
fn quoted_node_name_is_rejected() {
    let (line, message) = parse_error("graph 1 1 1\nnode \"node 0\" 1 1 1 1\n");
    assert_eq!(line, 2);
    assert!(message.contains("quoted fields are not supported"), "{message}");
}

#[test]
fn short_node_statement_is_rejected() {
    let (line, message) = parse_error("node node_0 1.5 2.0 0.8\n");
    assert_eq!(line, 1);
    assert_eq!(message, "node statement needs 6 fields, found 5");
}

#[test]
fn unknown_node_name_is_rejected() {
    let (_, message) = parse_error("node Principled 1 1 1 1\n");
    assert_eq!(message, "unexpected node name \"Principled\"");
}

#[test]
fn bad_number_is_rejected() {
    let (_, message) = parse_error("node node_0 1 one 1 1\n");
    assert_eq!(message, "bad number \"one\"");
    let (_, message) = parse_error("node node_0 1 NaN 1 1\n");
    assert_eq!(message, "bad number \"NaN\"");
}

#[test]
fn control_point_count_below_four_is_rejected() {
    let (_, message) = parse_error("edge node_0:o0 node_1:i0 3 1 1 2 2 3 3 solid black\n");
    assert_eq!(message, "edge has 3 control points, expected at least 4");
}

#[test]
fn missing_coordinates_are_rejected() {
    let (_, message) = parse_error("edge node_0:o0 node_1:i0 4 1 1 2 2 3\n");
    assert_eq!(message, "edge announces 4 control points but has 5 coordinates");
}

#[test]
fn oversized_control_point_count_is_rejected() {
    // Twice the count does not fit in a usize.
    let count = usize::MAX / 2 + 1;
    let (line, message) = parse_error(&format!(
        "edge node_0:o0 node_1:i0 {count} 0 0 1 1 2 2 3 3\n"
    ));
    assert_eq!(line, 1);
    assert_eq!(
        message,
        format!("edge announces {count} control points but has 8 coordinates")
    );

    let (_, message) = parse_error(&format!(
        "edge node_0:o0 node_1:i0 {} 0 0 1 1 2 2 3 3\n",
        usize::MAX
    ));
    assert!(message.starts_with("edge announces"), "{message}");
}

#[test]
fn edge_ports_must_have_the_right_polarity() {
    let (_, message) = parse_error("edge node_0:i0 node_1:i0 4 1 1 2 2 3 3 4 4\n");
    assert_eq!(message, "bad edge tail \"node_0:i0\"");
    let (_, message) = parse_error("edge node_0:o0 node_1:o0 4 1 1 2 2 3 3 4 4\n");
    assert_eq!(message, "bad edge head \"node_1:o0\"");
}

#[test]
fn layout_parse_error_names_the_line() {
    let err = parse("graph 1 1 1\n\nedge node_0:o0\n").unwrap_err();
    assert_eq!(
        err.to_string(),
        "layout output parse error (line 3): edge statement needs at least 4 fields, found 2"
    );
}

#[test]
fn node_names_round_trip() {
    for i in [0, 1, 9, 10, 12345] {
        assert_eq!(parse_node_name(&node_name(i)), Some(i));
    }
    assert_eq!(parse_node_name("node_"), None);
    assert_eq!(parse_node_name("node_1a"), None);
    assert_eq!(parse_node_name("node_+1"), None);
}

#[test]
fn port_address_display() {
    assert_eq!(PortAddress::output(3, 2).to_string(), "node_3:o2");
    assert_eq!(PortAddress::input(0, 0).to_string(), "node_0:i0");
    assert_eq!(PortAddress::bare(7, Polarity::Input).to_string(), "node_7");
    assert_eq!(PortAddress::parse("node_3:o2 ", Polarity::Output), None);
}
