use burrow_core::{
    ForceConfig, GraphAction, GraphModel, NewNode, NodeId, PageRef, Point, Transition,
};
use burrow_force::{
    Error, ForceGraph, ForceSimulation, SimulationState, network_simulation,
};

fn star(leaves: usize) -> GraphModel {
    let mut model = GraphModel::new();
    let Transition::Inserted(root) = model
        .apply(GraphAction::InsertNode(
            NewNode::new(PageRef::new("Hub")).at(Point::new(200.0, 50.0)),
        ))
        .unwrap()
    else {
        panic!("expected insert");
    };
    for i in 0..leaves {
        model
            .apply(GraphAction::InsertNode(
                NewNode::new(PageRef::new(format!("Leaf {i}")))
                    .child_of(root.clone())
                    .at(Point::new(80.0 + 120.0 * i as f64, 190.0)),
            ))
            .unwrap();
    }
    model
}

#[test]
fn simulation_settles_after_about_three_hundred_ticks() {
    let model = star(4);
    let mut sim = network_simulation(&model, &ForceConfig::default(), Point::new(400.0, 300.0))
        .unwrap();
    let frames: Vec<_> = sim.by_ref().collect();
    assert!((299..=302).contains(&frames.len()), "{} frames", frames.len());
    assert_eq!(sim.state(), SimulationState::Settled);
    assert!(sim.tick().is_none());

    let last = frames.last().unwrap();
    assert_eq!(last.positions.len(), 5);
    assert!(last.positions.iter().all(|(_, p)| p.is_finite()));
    for w in frames.windows(2) {
        assert!(w[1].alpha < w[0].alpha);
        assert_eq!(w[1].tick, w[0].tick + 1);
    }
}

#[test]
fn snapshot_never_touches_tree_positions() {
    let model = star(3);
    let before: Vec<_> = model.positions().map(|(id, p)| (id.clone(), p)).collect();
    let mut sim = network_simulation(&model, &ForceConfig::default(), Point::new(0.0, 0.0))
        .unwrap();
    sim.run_to_completion();
    let after: Vec<_> = model.positions().map(|(id, p)| (id.clone(), p)).collect();
    assert_eq!(before, after);
    assert_ne!(sim.positions()[0].1, before[0].1);
}

#[test]
fn stop_handle_cancels_between_ticks() {
    let model = star(5);
    let mut sim = network_simulation(&model, &ForceConfig::default(), Point::new(0.0, 0.0))
        .unwrap();
    let handle = sim.stop_handle();
    assert!(sim.tick().is_some());
    assert!(sim.tick().is_some());
    handle.stop();
    assert!(sim.tick().is_none());
    assert_eq!(sim.state(), SimulationState::Stopped);
    assert_eq!(sim.ticks(), 2);
    assert!(sim.run_to_completion().is_none());
}

#[test]
fn relaxed_nodes_keep_collision_distance() {
    let model = star(6);
    let cfg = ForceConfig::default();
    let mut sim = network_simulation(&model, &cfg, Point::new(400.0, 300.0)).unwrap();
    let last = sim.run_to_completion().unwrap();
    let pts: Vec<Point> = last.positions.iter().map(|(_, p)| *p).collect();
    for (i, a) in pts.iter().enumerate() {
        for b in &pts[i + 1..] {
            assert!((a.x - b.x).hypot(a.y - b.y) > cfg.collide_radius);
        }
    }
}

#[test]
fn same_seed_is_deterministic() {
    let model = star(4);
    let run = || {
        network_simulation(&model, &ForceConfig::default(), Point::new(10.0, 10.0))
            .unwrap()
            .run_to_completion()
            .unwrap()
            .positions
    };
    assert_eq!(run(), run());
}

#[test]
fn pinned_node_holds_its_position() {
    let mut graph = ForceGraph::new();
    let a = NodeId::from("a");
    let b = NodeId::from("b");
    graph.add_node(a.clone(), Some(Point::new(0.0, 0.0))).unwrap();
    graph.add_node(b.clone(), Some(Point::new(5.0, 0.0))).unwrap();
    graph.add_link(&a, &b).unwrap();
    let mut sim =
        ForceSimulation::new(graph, ForceConfig::exploration(), Point::default()).unwrap();
    sim.pin(&a, Some(Point::new(-30.0, 12.0))).unwrap();
    for _ in 0..50 {
        sim.tick();
    }
    assert_eq!(sim.graph().position(&a), Some(Point::new(-30.0, 12.0)));
}

#[test]
fn invalid_parameters_are_rejected() {
    let cfg = ForceConfig {
        alpha_decay: 0.0,
        ..ForceConfig::default()
    };
    let err = ForceSimulation::new(ForceGraph::new(), cfg, Point::default()).unwrap_err();
    assert!(matches!(err, Error::InvalidParameter { name: "alphaDecay", .. }));
}

#[test]
fn empty_snapshot_settles_quietly() {
    let mut sim =
        ForceSimulation::new(ForceGraph::new(), ForceConfig::default(), Point::default()).unwrap();
    let last = sim.run_to_completion().unwrap();
    assert!(last.positions.is_empty());
}
