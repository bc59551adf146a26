use super::*;
use crate::address::{Polarity, PortAddress};
use crate::config::ArrangeConfig;
use crate::dot::{DPI, write_description};
use crate::theme::Theme;

fn describe(g: &NodeGraph) -> crate::dot::Description {
    write_description(g, &ArrangeConfig::default(), &Theme::default())
}

/// `(tail, head)` of every edge statement, parsed back into addresses.
fn edges(text: &str) -> Vec<(PortAddress, PortAddress)> {
    text.lines()
        .filter_map(|line| {
            let (tail, rest) = line.split_once(" -> ")?;
            let head = rest.split_whitespace().next()?;
            Some((
                PortAddress::parse(tail, Polarity::Output).unwrap(),
                PortAddress::parse(head, Polarity::Input).unwrap(),
            ))
        })
        .collect()
}

fn mixed_graph() -> NodeGraph {
    let mut g = NodeGraph::new();
    let tex = g
        .add_node(NewNode::new("Texture", "Image Texture").with_outputs([
            Socket::new("Color"),
            Socket::new("Alpha").disabled(),
            Socket::new("Mask"),
        ]))
        .unwrap();
    let mix = g
        .add_node(
            NewNode::new("Mix", "Mix")
                .with_inputs([
                    Socket::new("Fac"),
                    Socket::new("Hidden").disabled(),
                    Socket::new("A"),
                    Socket::new("B"),
                ])
                .with_outputs([Socket::new("Result")]),
        )
        .unwrap();
    let out = sink(&mut g, "Output");
    g.add_link(SocketRef::new(tex, 0), SocketRef::new(mix, 2))
        .unwrap();
    g.add_link(SocketRef::new(tex, 2), SocketRef::new(mix, 3))
        .unwrap();
    g.add_link(SocketRef::new(mix, 0), SocketRef::new(out, 0))
        .unwrap();
    g
}

#[test]
fn every_port_address_resolves_to_its_socket() {
    let g = mixed_graph();
    let desc = describe(&g);

    assert_eq!(desc.index.len(), g.node_count());
    for (i, id) in g.node_ids().into_iter().enumerate() {
        assert_eq!(desc.index.node(i), Some(id));
        let node = g.node(id).unwrap();

        let visible_outputs = node.outputs.iter().enumerate().filter(|(_, s)| s.enabled);
        for (k, (raw, _)) in visible_outputs.enumerate() {
            let address = PortAddress::output(i, k);
            let reparsed = PortAddress::parse(&address.to_string(), Polarity::Output).unwrap();
            assert_eq!(reparsed, address);
            assert_eq!(desc.index.resolve(reparsed), Some(SocketRef::new(id, raw)));
            assert!(desc.text.contains(&format!("port=\"o{k}\"")));
        }

        let visible_inputs = node.inputs.iter().enumerate().filter(|(_, s)| s.enabled);
        for (k, (raw, _)) in visible_inputs.enumerate() {
            let address = PortAddress::input(i, k);
            let reparsed = PortAddress::parse(&address.to_string(), Polarity::Input).unwrap();
            assert_eq!(desc.index.resolve(reparsed), Some(SocketRef::new(id, raw)));
            assert!(desc.text.contains(&format!("port=\"i{k}\"")));
        }
    }
}

#[test]
fn edge_statements_resolve_to_the_linked_sockets() {
    let g = mixed_graph();
    let desc = describe(&g);

    let resolved: Vec<_> = edges(&desc.text)
        .into_iter()
        .map(|(tail, head)| {
            (
                desc.index.resolve(tail).unwrap(),
                desc.index.resolve(head).unwrap(),
            )
        })
        .collect();
    let expected: Vec<_> = g.links().iter().map(|l| (l.from, l.to)).collect();
    assert_eq!(resolved, expected);

    // Visible positions skip the disabled sockets.
    assert!(desc.text.contains("node_0:o1 -> node_1:i2 [];"));
}

#[test]
fn hidden_socket_link_uses_bare_node_name() {
    let mut g = NodeGraph::new();
    let a = g
        .add_node(NewNode::new("A", "Value").with_outputs([Socket::new("Value").disabled()]))
        .unwrap();
    let b = sink(&mut g, "B");
    g.add_link(SocketRef::new(a, 0), SocketRef::new(b, 0))
        .unwrap();

    let desc = describe(&g);

    assert!(desc.text.contains("node_0 -> node_1:i0 [];"));
    let (tail, _) = edges(&desc.text)[0];
    assert_eq!(tail, PortAddress::bare(0, Polarity::Output));
    assert_eq!(desc.index.resolve(tail), None);
}

#[test]
fn global_options_follow_config_and_theme() {
    let mut g = NodeGraph::new();
    source(&mut g, "A");
    let config = ArrangeConfig {
        node_sep: 36.0,
        font_name: Some("DejaVu Sans".to_string()),
        ..ArrangeConfig::default()
    };
    let theme = Theme::default();

    let text = write_description(&g, &config, &theme).text;
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "digraph G {");
    assert_eq!(*lines.last().unwrap(), "}");
    assert!(lines[1].starts_with("node["));
    assert!(lines[1].contains("fontname=\"DejaVu Sans\""));
    assert!(lines[1].contains("fontsize=\"11\""));
    assert!(lines[2].starts_with("graph["));
    assert!(lines[2].contains("rankdir=\"LR\""));
    assert!(lines[2].contains("splines=\"polyline\""));
    assert!(lines[2].contains("nodesep=\"0.5\""));
    assert!(lines[2].contains(&format!("bgcolor=\"{}\"", theme.background.to_dot())));
    assert!(lines[3].starts_with("edge["));
    assert!(lines[3].contains("arrowhead=\"none\""));
}

#[test]
fn node_record_is_sized_in_inches() {
    let mut g = NodeGraph::new();
    source(&mut g, "A");

    let text = describe(&g).text;

    let expected = format!(
        "node_0 [width=\"{}\",height=\"{}\",",
        140.0 / DPI,
        100.0 / DPI
    );
    assert!(text.contains(&expected), "{text}");
}

#[test]
fn labels_are_html_escaped() {
    let mut g = NodeGraph::new();
    g.add_node(NewNode::new("A", "Value").with_label("<A & B>"))
        .unwrap();

    let text = describe(&g).text;

    assert!(text.contains("&lt;A &amp; B&gt;"));
    assert!(!text.contains("<A & B>"));
}

#[test]
fn unlinked_vector_input_gets_value_rows() {
    let mut g = NodeGraph::new();
    g.add_node(NewNode::new("Map", "Mapping").with_inputs([Socket::vector("Vector")]))
        .unwrap();
    assert!(describe(&g).text.contains("<td height=\"60\""));

    let mut linked = NodeGraph::new();
    let a = source(&mut linked, "A");
    let map = linked
        .add_node(NewNode::new("Map", "Mapping").with_inputs([Socket::vector("Vector")]))
        .unwrap();
    linked
        .add_link(SocketRef::new(a, 0), SocketRef::new(map, 0))
        .unwrap();
    assert!(!describe(&linked).text.contains("<td height=\"60\""));
}

#[test]
fn spacer_never_goes_negative() {
    let mut g = NodeGraph::new();
    g.add_node(
        NewNode::new("Tall", "Tall")
            .with_inputs((0..6).map(|i| Socket::new(format!("In {i}"))))
            .sized(140.0, gvarrange_graph::size(140.0, 40.0)),
    )
    .unwrap();

    let text = describe(&g).text;

    assert!(!text.contains("height=\"-"));
}
