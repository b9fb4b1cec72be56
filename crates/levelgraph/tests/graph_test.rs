use levelgraph::{EdgeKind, Error, Graph, Position, VertexKind, is_valid_vertex_name};
use std::collections::BTreeSet;

fn signature(g: &Graph) -> (BTreeSet<String>, BTreeSet<String>) {
    let vertices = g
        .vertices()
        .map(|v| {
            let p = v.position();
            format!("{}:{}:{},{}", v.name(), v.kind(), p.x, p.y)
        })
        .collect();
    let edges = g.edges().map(|e| g.edge_name(e)).collect();
    (vertices, edges)
}

fn graph_of(vertices: &[&str], edges: &[(&str, &str, EdgeKind)]) -> Graph {
    let mut g = Graph::new();
    for v in vertices {
        g.add_named_vertex(*v);
    }
    for &(from, to, kind) in edges {
        g.add_edge(from, to, kind).unwrap();
    }
    g
}

/// Six rooms with a self-loop, parallel typed edges and both directions of one pair.
fn tangled() -> Graph {
    use EdgeKind::*;
    graph_of(
        &["A", "B", "C", "D", "E", "F"],
        &[
            ("A", "B", Undirected),
            ("A", "B", Directed),
            ("B", "A", Undirected),
            ("B", "C", ShortCut),
            ("C", "C", Mechanism),
            ("C", "D", Undirected),
            ("D", "E", Directed),
            ("E", "F", Undirected),
            ("F", "F", Undirected),
            ("F", "A", Mechanism),
            ("E", "B", Undirected),
        ],
    )
}

#[test]
fn add_vertex_synthesizes_smallest_free_name() {
    let mut g = Graph::new();
    assert_eq!(g.add_vertex().name(), "V1");
    assert_eq!(g.add_vertex().name(), "V2");
    g.add_named_vertex("V4");
    assert_eq!(g.add_vertex().name(), "V3");
    g.remove_vertex("V1").unwrap();
    assert_eq!(g.add_vertex().name(), "V1");
    assert_eq!(g.add_vertex().name(), "V5");
    g.check_invariants().unwrap();
}

#[test]
fn add_named_vertex_returns_existing_on_duplicate() {
    let mut g = Graph::new();
    g.add_vertex_with_weight("Hall", 2.5);
    let again = g.add_vertex_with_weight("Hall", 9.0);
    assert_eq!(again.weight(), 2.5);
    assert_eq!(again.index(), 0);
    assert_eq!(g.vertex_count(), 1);
}

#[test]
fn vertex_index_matches_storage_slot() {
    let g = tangled();
    for (slot, v) in g.vertices().enumerate() {
        assert_eq!(v.index(), slot);
        assert_eq!(g.vertex_at(slot).map(|x| x.name()), Some(v.name()));
        assert_eq!(g.vertex(v.name()).map(|x| x.index()), Some(slot));
    }
    g.check_invariants().unwrap();
}

#[test]
fn add_edge_is_idempotent_per_kind() {
    let mut g = graph_of(&["A", "B"], &[]);
    let first = g.add_edge("A", "B", EdgeKind::Directed).unwrap().index();
    let second = g.add_edge("A", "B", EdgeKind::Directed).unwrap().index();
    assert_eq!(first, second);
    assert_eq!(g.edge_count(), 1);

    g.add_edge("A", "B", EdgeKind::ShortCut).unwrap();
    g.add_edge("B", "A", EdgeKind::Directed).unwrap();
    assert_eq!(g.edge_count(), 3);
    assert_eq!(g.neighbors("A").unwrap(), vec!["B"]);
    g.check_invariants().unwrap();
}

#[test]
fn add_edge_with_unknown_endpoint_fails() {
    let mut g = graph_of(&["A"], &[]);
    let err = g.add_edge("A", "Nope", EdgeKind::Undirected).unwrap_err();
    assert_eq!(
        err,
        Error::UnknownVertex {
            name: "Nope".to_string()
        }
    );
    assert_eq!(g.edge_count(), 0);
}

#[test]
fn find_edge_ignores_kind_but_not_direction() {
    let g = graph_of(
        &["A", "B"],
        &[("A", "B", EdgeKind::Mechanism), ("A", "B", EdgeKind::Directed)],
    );
    assert_eq!(g.find_edge("A", "B").map(|e| e.kind()), Some(EdgeKind::Directed));
    assert!(g.find_edge("B", "A").is_none());
    assert!(g.edge("A", "B", EdgeKind::Undirected).is_none());
}

#[test]
fn self_loop_counts_once_in_adjacency() {
    let mut g = graph_of(&["A", "B"], &[("A", "A", EdgeKind::Undirected)]);
    assert_eq!(g.neighbors("A").unwrap(), vec!["A"]);
    assert!(g.edge("A", "A", EdgeKind::Undirected).unwrap().is_self_loop());
    g.remove_edge("A", "A", EdgeKind::Undirected).unwrap();
    assert!(g.neighbors("A").unwrap().is_empty());
    g.check_invariants().unwrap();
}

#[test]
fn removing_one_parallel_edge_keeps_the_link() {
    let mut g = graph_of(
        &["A", "B"],
        &[("A", "B", EdgeKind::Undirected), ("B", "A", EdgeKind::ShortCut)],
    );
    g.remove_edge("A", "B", EdgeKind::Undirected).unwrap();
    assert!(g.is_connected());
    assert_eq!(g.neighbors("B").unwrap(), vec!["A"]);
    g.remove_edge("B", "A", EdgeKind::ShortCut).unwrap();
    assert!(!g.is_connected());
    g.check_invariants().unwrap();
}

#[test]
fn remove_edge_relocates_last_edge() {
    let mut g = graph_of(
        &["A", "B", "C"],
        &[
            ("A", "B", EdgeKind::Undirected),
            ("B", "C", EdgeKind::Undirected),
            ("C", "A", EdgeKind::Directed),
        ],
    );
    let removed = g.remove_edge("A", "B", EdgeKind::Undirected).unwrap();
    assert_eq!(removed.kind(), EdgeKind::Undirected);
    let moved = g.edge("C", "A", EdgeKind::Directed).unwrap();
    assert_eq!(moved.index(), 0);
    assert_eq!(g.edge_at(0).map(|e| g.edge_name(e)), Some("C->A".to_string()));
    g.check_invariants().unwrap();
}

#[test]
fn remove_missing_edge_or_index_is_an_error() {
    let mut g = graph_of(&["A", "B"], &[("A", "B", EdgeKind::Undirected)]);
    assert_eq!(
        g.remove_edge("B", "A", EdgeKind::Undirected).unwrap_err(),
        Error::UnknownEdge {
            name: "B--A".to_string()
        }
    );
    assert_eq!(
        g.remove_edge_at(5).unwrap_err(),
        Error::EdgeIndexOutOfRange { index: 5, len: 1 }
    );
    assert_eq!(
        g.remove_vertex_at(2).unwrap_err(),
        Error::VertexIndexOutOfRange { index: 2, len: 2 }
    );
    assert!(matches!(
        g.remove_vertex("Z"),
        Err(Error::UnknownVertex { .. })
    ));
    assert_eq!(g.edge_count(), 1);
}

#[test]
fn remove_vertex_cascades_to_incident_edges() {
    let mut g = tangled();
    let removed = g.remove_vertex("F").unwrap();
    assert_eq!(removed.name(), "F");
    assert!(g.vertex("F").is_none());
    assert!(g.edges().all(|e| {
        let (from, to) = g.edge_endpoints(e);
        from.name() != "F" && to.name() != "F"
    }));
    assert_eq!(g.edge_count(), 8);
    g.check_invariants().unwrap();
}

#[test]
fn remove_each_vertex_keeps_every_table_consistent() {
    let base = tangled();
    let names: Vec<String> = base.vertex_names().map(str::to_string).collect();
    for name in names.iter().map(String::as_str) {
        let mut g = base.clone();
        g.remove_vertex(name).unwrap();
        g.check_invariants()
            .unwrap_or_else(|e| panic!("after removing {name}: {e}\n{}", g.snapshot()));

        let (base_vertices, base_edges) = signature(&base);
        let (vertices, edges) = signature(&g);
        assert_eq!(vertices.len(), base_vertices.len() - 1);
        let expected_edges: BTreeSet<String> = base
            .edges()
            .filter(|e| {
                let (from, to) = base.edge_endpoints(e);
                from.name() != name && to.name() != name
            })
            .map(|e| base.edge_name(e))
            .collect();
        assert_eq!(edges, expected_edges, "after removing {name}");
        assert!(edges.is_subset(&base_edges));
    }
}

#[test]
fn removing_every_vertex_in_any_order_empties_the_graph() {
    // Deterministic LCG so every run walks the same removal orders.
    let mut state: u64 = 0x2545_f491_4f6c_dd1d;
    for _ in 0..25 {
        let mut g = tangled();
        while g.vertex_count() > 0 {
            state = state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            let slot = (state >> 33) as usize % g.vertex_count();
            g.remove_vertex_at(slot).unwrap();
            g.check_invariants()
                .unwrap_or_else(|e| panic!("{e}\n{}", g.snapshot()));
        }
        assert_eq!(g.edge_count(), 0);
    }
}

#[test]
fn add_then_remove_restores_structure() {
    let mut g = tangled();
    let before = signature(&g);
    let name = g.add_vertex().name().to_string();
    g.add_edge(&name, "A", EdgeKind::Undirected).unwrap();
    g.add_edge("C", &name, EdgeKind::Directed).unwrap();
    g.add_edge(&name, &name, EdgeKind::Mechanism).unwrap();
    g.remove_vertex(&name).unwrap();
    assert_eq!(signature(&g), before);
    g.check_invariants().unwrap();
}

#[test]
fn mutations_mark_the_graph_dirty() {
    let mut g = Graph::new();
    assert!(!g.is_dirty());
    g.add_named_vertex("A");
    assert!(g.is_dirty());
    g.set_dirty(false);
    g.set_vertex_kind("A", VertexKind::Boss).unwrap();
    assert!(g.is_dirty());
    g.set_dirty(false);
    g.set_vertex_position("A", Position::new(1.0, 2.0)).unwrap();
    assert!(g.is_dirty());
    g.set_dirty(false);
    g.add_named_vertex("A");
    assert!(!g.is_dirty(), "returning an existing vertex is not a mutation");
}

#[test]
fn rename_rejects_duplicates_and_keeps_edges_reachable() {
    let mut g = graph_of(
        &["A", "B", "C"],
        &[("A", "B", EdgeKind::Directed), ("C", "A", EdgeKind::Undirected)],
    );
    assert!(!g.rename_vertex("A", "B").unwrap());
    assert!(!g.rename_vertex("A", "").unwrap());
    assert!(g.vertex("A").is_some());

    assert!(g.rename_vertex("A", "Atrium").unwrap());
    assert!(g.vertex("A").is_none());
    assert!(g.edge("Atrium", "B", EdgeKind::Directed).is_some());
    assert!(g.edge("C", "Atrium", EdgeKind::Undirected).is_some());
    assert!(g.edge("A", "B", EdgeKind::Directed).is_none());
    g.check_invariants().unwrap();
}

#[test]
fn names_outside_the_text_alphabet_are_refused() {
    assert!(is_valid_vertex_name("East_Wing2"));
    assert!(is_valid_vertex_name("Säule"));
    for bad in ["", "east-wing", "Boss Room", "a#b", "x:y", "(0)", "room²"] {
        assert!(!is_valid_vertex_name(bad), "{bad:?}");
    }

    let mut g = Graph::new();
    assert_eq!(g.add_named_vertex("east-wing").name(), "V1");
    assert_eq!(g.add_vertex_with_weight("Boss Room", 2.0).name(), "V2");
    assert!(g.vertex("east-wing").is_none());
    assert_eq!(g.vertex_count(), 2);

    assert!(!g.rename_vertex("V1", "east-wing").unwrap());
    assert!(!g.rename_vertex("V1", "Boss Room").unwrap());
    assert!(g.vertex("V1").is_some());
    assert!(g.rename_vertex("V1", "east_wing").unwrap());
    g.check_invariants().unwrap();
}

#[test]
fn set_edge_kind_refuses_to_collide() {
    let mut g = graph_of(
        &["A", "B"],
        &[("A", "B", EdgeKind::Undirected), ("A", "B", EdgeKind::Directed)],
    );
    assert!(
        !g.set_edge_kind("A", "B", EdgeKind::Undirected, EdgeKind::Directed)
            .unwrap()
    );
    assert!(
        g.set_edge_kind("A", "B", EdgeKind::Undirected, EdgeKind::ShortCut)
            .unwrap()
    );
    assert!(g.edge("A", "B", EdgeKind::ShortCut).is_some());
    assert!(g.edge("A", "B", EdgeKind::Undirected).is_none());
    g.check_invariants().unwrap();
}

#[test]
fn snapshot_tracks_slot_moves() {
    let mut g = graph_of(
        &["A", "B", "C"],
        &[("A", "B", EdgeKind::Undirected), ("B", "C", EdgeKind::Undirected)],
    );
    assert_eq!(
        g.snapshot(),
        "Vertices: [0]A,[1]B,[2]C\nEdges: [0]A--B,[1]B--C\nAdjacency: [0]1 [1]0,2 [2]1\n"
    );
    g.remove_vertex("A").unwrap();
    assert_eq!(
        g.snapshot(),
        "Vertices: [0]C,[1]B\nEdges: [0]B--C\nAdjacency: [0]1 [1]0\n"
    );
}
