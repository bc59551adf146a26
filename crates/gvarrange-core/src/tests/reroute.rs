use super::*;
use crate::reroute::{ElisionReport, elide};

#[test]
fn elide_splices_single_pass_through_reroute() {
    let mut g = NodeGraph::new();
    let a = source(&mut g, "A");
    let r = reroute(&mut g, "R");
    let b = sink(&mut g, "B");
    link(&mut g, a, r);
    link(&mut g, r, b);

    let report = elide(&mut g).unwrap();

    assert_eq!(report.removed, vec![r]);
    assert_eq!(report.spliced, 1);
    assert!(g.node(r).is_none());
    assert_eq!(link_names(&g), vec![pair("A", "B")]);
}

#[test]
fn elide_collapses_a_chain_in_one_call() {
    let mut g = NodeGraph::new();
    let a = source(&mut g, "A");
    let r1 = reroute(&mut g, "R1");
    let r2 = reroute(&mut g, "R2");
    let r3 = reroute(&mut g, "R3");
    let b = sink(&mut g, "B");
    link(&mut g, a, r1);
    link(&mut g, r1, r2);
    link(&mut g, r2, r3);
    link(&mut g, r3, b);

    let report = elide(&mut g).unwrap();

    assert_eq!(report.removed, vec![r1, r2, r3]);
    assert_eq!(report.spliced, 3);
    assert_eq!(g.node_ids(), vec![a, b]);
    assert_eq!(link_names(&g), vec![pair("A", "B")]);
}

#[test]
fn elide_is_idempotent() {
    let mut g = NodeGraph::new();
    let a = source(&mut g, "A");
    let r1 = reroute(&mut g, "R1");
    let r2 = reroute(&mut g, "R2");
    let b = sink(&mut g, "B");
    let c = sink(&mut g, "C");
    link(&mut g, a, r1);
    link(&mut g, r1, r2);
    link(&mut g, r2, b);
    link(&mut g, r2, c);

    elide(&mut g).unwrap();
    let once = g.to_document();
    let second = elide(&mut g).unwrap();

    assert!(second.removed.is_empty());
    assert_eq!(second.spliced, 0);
    assert_eq!(g.to_document(), once);
}

#[test]
fn elide_keeps_fan_out_reroute() {
    let mut g = NodeGraph::new();
    let a = source(&mut g, "A");
    let r = reroute(&mut g, "R");
    let b = sink(&mut g, "B");
    let c = sink(&mut g, "C");
    link(&mut g, a, r);
    link(&mut g, r, b);
    link(&mut g, r, c);
    let before = g.to_document();

    let report = elide(&mut g).unwrap();

    assert!(report.removed.is_empty());
    assert_eq!(g.to_document(), before);
}

#[test]
fn elide_keeps_fan_in_reroute() {
    let mut g = NodeGraph::new();
    let a = source(&mut g, "A");
    let b = source(&mut g, "B");
    let r = g
        .add_node(NewNode::reroute("R").with_inputs([Socket {
            multi_input: true,
            ..Socket::new("Input")
        }]))
        .unwrap();
    let c = sink(&mut g, "C");
    link(&mut g, a, r);
    link(&mut g, b, r);
    link(&mut g, r, c);

    let report = elide(&mut g).unwrap();

    assert!(report.removed.is_empty());
    assert_eq!(g.link_count(), 3);
}

#[test]
fn elide_splices_into_a_fan_out_reroute() {
    let mut g = NodeGraph::new();
    let a = source(&mut g, "A");
    let r1 = reroute(&mut g, "R1");
    let r2 = reroute(&mut g, "R2");
    let b = sink(&mut g, "B");
    let c = sink(&mut g, "C");
    link(&mut g, a, r1);
    link(&mut g, r1, r2);
    link(&mut g, r2, b);
    link(&mut g, r2, c);

    let report = elide(&mut g).unwrap();

    assert_eq!(report.removed, vec![r1]);
    assert!(g.node(r2).is_some());
    let mut links = link_names(&g);
    links.sort();
    assert_eq!(
        links,
        vec![pair("A", "R2"), pair("R2", "B"), pair("R2", "C")]
    );
}

#[test]
fn elide_removes_dangling_reroute_without_splicing() {
    let mut g = NodeGraph::new();
    let a = source(&mut g, "A");
    let r = reroute(&mut g, "R");
    link(&mut g, a, r);

    let report = elide(&mut g).unwrap();

    assert_eq!(report.removed, vec![r]);
    assert_eq!(report.spliced, 0);
    assert_eq!(g.link_count(), 0);
}

#[test]
fn elide_keeps_unconnected_reroute() {
    let mut g = NodeGraph::new();
    let r = reroute(&mut g, "R");

    let report = elide(&mut g).unwrap();

    assert!(report.removed.is_empty());
    assert_eq!(g.node_ids(), vec![r]);
}

#[test]
fn elide_without_reroutes_is_a_no_op() {
    let mut g = NodeGraph::new();
    let a = source(&mut g, "A");
    let b = sink(&mut g, "B");
    link(&mut g, a, b);
    let before = g.to_document();

    let report = elide(&mut g).unwrap();

    assert_eq!(report, ElisionReport::default());
    assert_eq!(g.to_document(), before);
}
