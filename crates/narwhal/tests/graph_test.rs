use narwhal::{Error, Graph, NodeOptions, PairKey, Spring, vec2};

fn graph_with(ids: &[&str]) -> Graph<&'static str> {
    let mut g = Graph::new();
    for (i, id) in ids.iter().enumerate() {
        g.add_node(*id, vec2(i as f64, 0.0), NodeOptions::default())
            .unwrap();
    }
    g
}

#[test]
fn add_node_assigns_dense_indices_in_insertion_order() {
    let g = graph_with(&["c", "a", "b"]);
    let order: Vec<_> = g.nodes().map(|n| (n.id().to_string(), n.index())).collect();
    assert_eq!(
        order,
        vec![
            ("c".to_string(), 0),
            ("a".to_string(), 1),
            ("b".to_string(), 2)
        ]
    );
    assert_eq!(g.positions().len(), 3);
    assert_eq!(g.get_node("a").unwrap().node().mass(), g.default_mass());
}

#[test]
fn duplicate_node_is_rejected() {
    let mut g = graph_with(&["a"]);
    let err = g
        .add_node("a", vec2(5.0, 5.0), NodeOptions::default())
        .unwrap_err();
    assert_eq!(err, Error::DuplicateNode { id: "a".into() });
    assert_eq!(g.node_count(), 1);
    assert_eq!(g.positions()[0], vec2(0.0, 0.0));
}

#[test]
fn non_positive_mass_is_rejected() {
    let mut g: Graph = Graph::new();
    let err = g
        .add_node("a", vec2(0.0, 0.0), NodeOptions::with_mass(0.0))
        .unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidForceConfiguration {
            parameter: "mass",
            ..
        }
    ));
    assert!(g.is_empty());
    assert!(Graph::<()>::with_default_mass(-1.0).is_err());
}

#[test]
fn remove_node_compacts_indices() {
    for victim in ["n0", "n1", "n2", "n3", "n4"] {
        let mut g = graph_with(&["n0", "n1", "n2", "n3", "n4"]);
        g.remove_node(victim).unwrap();

        let mut indices: Vec<usize> = g.nodes().map(|n| n.index()).collect();
        indices.sort();
        assert_eq!(indices, vec![0, 1, 2, 3], "after removing {victim}");
        assert!(g.get_node(victim).is_none());

        // positions stay aligned with their nodes
        for n in g.nodes() {
            assert_eq!(g.positions()[n.index()], n.position());
        }
    }
}

#[test]
fn remove_unknown_node_fails() {
    let mut g = graph_with(&["a"]);
    assert_eq!(
        g.remove_node("zzz").unwrap_err(),
        Error::UnknownNode { id: "zzz".into() }
    );
}

#[test]
fn node_at_follows_compaction() {
    let mut g = graph_with(&["a", "b", "c"]);
    g.remove_node("a").unwrap();
    assert_eq!(g.node_at(0).unwrap().id().as_str(), "b");
    assert_eq!(g.node_at(1).unwrap().id().as_str(), "c");
    assert!(g.node_at(2).is_none());
    assert_eq!(g.index_of("c"), Some(1));
}

#[test]
fn link_lookup_is_symmetric() {
    let mut g = graph_with(&["a", "b"]);
    g.add_link("a", "b", "solid").unwrap();

    let ab = g.link("a", "b").unwrap() as *const _;
    let ba = g.link("b", "a").unwrap() as *const _;
    assert_eq!(ab, ba);
    assert_eq!(g.link_count(), 1);
}

#[test]
fn add_link_overwrites_existing_pair() {
    let mut g = graph_with(&["a", "b"]);
    g.add_link("a", "b", "solid").unwrap();
    g.add_link("b", "a", "dashed").unwrap();
    assert_eq!(g.link_count(), 1);
    assert_eq!(*g.link("a", "b").unwrap().meta(), "dashed");
}

#[test]
fn link_endpoints_follow_key_order() {
    let mut g = graph_with(&["b", "a"]);
    g.add_link("b", "a", "").unwrap();
    let (key, link) = g.links().next().unwrap();
    assert_eq!(key, &PairKey::new("a", "b"));
    // "a" was added second, at x = 1
    assert_eq!(link.a(), vec2(1.0, 0.0));
    assert_eq!(link.b(), vec2(0.0, 0.0));
}

#[test]
fn link_requires_known_distinct_endpoints() {
    let mut g = graph_with(&["a"]);
    assert_eq!(
        g.add_link("a", "ghost", "").unwrap_err(),
        Error::UnknownNode { id: "ghost".into() }
    );
    assert_eq!(
        g.add_link("a", "a", "").unwrap_err(),
        Error::InvalidLink { id: "a".into() }
    );
}

#[test]
fn remove_link_accepts_either_order_and_fails_when_absent() {
    let mut g = graph_with(&["a", "b"]);
    g.add_link("a", "b", "x").unwrap();
    let link = g.remove_link("b", "a").unwrap();
    assert_eq!(link.into_meta(), "x");
    assert_eq!(
        g.remove_link("a", "b").unwrap_err(),
        Error::UnknownLink {
            a: "a".into(),
            b: "b".into()
        }
    );
}

#[test]
fn forces_stack_on_the_same_pair() {
    let mut g = graph_with(&["a", "b"]);
    g.add_force("a", "b", Spring::new(1.0, 1.0).unwrap()).unwrap();
    g.add_force("b", "a", Spring::new(2.0, 3.0).unwrap()).unwrap();
    assert_eq!(g.forces_between("a", "b").len(), 2);
    assert_eq!(g.force_pairs().count(), 1);
    assert_eq!(g.force_count(), 2);
}

#[test]
fn force_on_a_self_pair_is_stored() {
    let mut g = graph_with(&["a"]);
    g.add_force("a", "a", Spring::new(1.0, 1.0).unwrap()).unwrap();
    assert_eq!(g.forces_between("a", "a").len(), 1);
    assert_eq!(g.force_count(), 1);

    g.remove_node("a").unwrap();
    assert_eq!(g.force_count(), 0);
}

#[test]
fn force_requires_known_endpoints() {
    let mut g = graph_with(&["a"]);
    assert_eq!(
        g.add_force("a", "ghost", Spring::new(1.0, 1.0).unwrap())
            .unwrap_err(),
        Error::UnknownNode { id: "ghost".into() }
    );
    assert_eq!(
        g.add_force("ghost", "ghost", Spring::new(1.0, 1.0).unwrap())
            .unwrap_err(),
        Error::UnknownNode { id: "ghost".into() }
    );
    assert_eq!(g.force_count(), 0);
}

#[test]
fn remove_node_cascades_links_and_forces() {
    let mut g = graph_with(&["A", "B", "C"]);
    g.add_link("A", "B", "").unwrap();
    g.add_link("B", "C", "").unwrap();
    g.add_force("A", "B", Spring::new(1.0, 1.0).unwrap()).unwrap();
    g.add_force("A", "B", Spring::new(5.0, 2.0).unwrap()).unwrap();

    g.remove_node("B").unwrap();

    assert_eq!(g.link_count(), 0);
    assert!(g.links().all(|(key, _)| !key.contains("B")));
    assert_eq!(g.force_count(), 0);
    assert!(g.force_pairs().all(|key| !key.contains("B")));
    assert!(g.forces_between("A", "B").is_empty());
}

#[test]
fn cascade_keeps_unrelated_links() {
    let mut g = graph_with(&["A", "B", "C", "D"]);
    g.add_link("A", "B", "").unwrap();
    g.add_link("C", "D", "").unwrap();
    g.remove_node("A").unwrap();
    assert_eq!(g.link_count(), 1);
    assert!(g.link("C", "D").is_some());
}

#[test]
fn integer_ids_are_accepted() {
    let mut g: Graph = Graph::new();
    g.add_node(1, vec2(0.0, 0.0), NodeOptions::default()).unwrap();
    g.add_node(2u32, vec2(1.0, 0.0), NodeOptions::default())
        .unwrap();
    g.add_link("2", "1", ()).unwrap();
    assert!(g.get_node("1").is_some());
    assert!(g.link("1", "2").is_some());
}
