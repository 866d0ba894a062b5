use burrow_core::services::InMemoryContentSource;
use burrow_core::{
    DeviceProfile, GraphAction, GraphModel, NewNode, NodeId, PageRef, Point, SharedTopology,
    Transition,
};
use burrow_layout::collision;
use burrow_layout::compact::{self, levels, relax};

fn insert(model: &mut GraphModel, title: &str, parent: Option<&NodeId>) -> NodeId {
    let mut new = NewNode::new(PageRef::new(title));
    if let Some(p) = parent {
        new = new.child_of(p.clone());
    }
    match model.apply(GraphAction::InsertNode(new)).unwrap() {
        Transition::Inserted(id) => id,
        other => panic!("unexpected transition {other:?}"),
    }
}

/// Root with two children, each with three children of their own.
fn two_fans() -> (GraphModel, Vec<NodeId>) {
    let mut model = GraphModel::new();
    let root = insert(&mut model, "Root", None);
    let mut ids = vec![root.clone()];
    for c in 0..2 {
        let child = insert(&mut model, &format!("C{c}"), Some(&root));
        ids.push(child.clone());
        for g in 0..3 {
            ids.push(insert(&mut model, &format!("C{c}G{g}"), Some(&child)));
        }
    }
    (model, ids)
}

/// Root with `children` children, each with `grandchildren` children of their own.
fn bushy(children: usize, grandchildren: usize) -> GraphModel {
    let mut model = GraphModel::new();
    let root = insert(&mut model, "Root", None);
    for c in 0..children {
        let child = insert(&mut model, &format!("C{c}"), Some(&root));
        for g in 0..grandchildren {
            insert(&mut model, &format!("C{c}G{g}"), Some(&child));
        }
    }
    model
}

fn min_same_level_gap(model: &GraphModel, profile: &DeviceProfile) -> f64 {
    let spread = profile.spread_axis();
    let mut min_gap = f64::INFINITY;
    for ids in &levels::assign(model).by_level {
        let mut coords: Vec<f64> = ids
            .iter()
            .map(|id| model.position(id).unwrap().along(spread))
            .collect();
        coords.sort_by(f64::total_cmp);
        for w in coords.windows(2) {
            min_gap = min_gap.min(w[1] - w[0]);
        }
    }
    min_gap
}

#[test]
fn bushy_trees_end_without_overlaps() {
    for (children, grandchildren) in [(10, 10), (4, 40)] {
        for profile in [DeviceProfile::desktop(), DeviceProfile::mobile()] {
            let mut model = bushy(children, grandchildren);
            let report = compact::run(&mut model, &profile).unwrap();
            assert_eq!(report.nodes, 1 + children + children * grandchildren);
            assert!(
                min_same_level_gap(&model, &profile) >= profile.node_size - 1e-6,
                "{children}x{grandchildren}: siblings closer than node size"
            );
            assert_eq!(collision::residual_overlaps(&model, &profile), 0);

            let first: Vec<Point> = model.positions().map(|(_, p)| p).collect();
            compact::run(&mut model, &profile).unwrap();
            let second: Vec<Point> = model.positions().map(|(_, p)| p).collect();
            assert_eq!(first, second);
        }
    }
}

#[test]
fn compact_centres_children_under_root() {
    let profile = DeviceProfile::desktop();
    let mut model = GraphModel::new();
    let root = insert(&mut model, "Root", None);
    let kids: Vec<NodeId> = (0..3)
        .map(|i| insert(&mut model, &format!("K{i}"), Some(&root)))
        .collect();

    let report = compact::run(&mut model, &profile).unwrap();
    assert_eq!(report.levels, 2);
    assert_eq!(report.shift, Point::default());
    assert_eq!(model.position(&root), Some(Point::new(200.0, 50.0)));
    let xs: Vec<f64> = kids.iter().map(|k| model.position(k).unwrap().x).collect();
    assert_eq!(xs, vec![80.0, 200.0, 320.0]);
    assert!(kids.iter().all(|k| model.position(k).unwrap().y == 190.0));
}

#[test]
fn compact_is_idempotent() {
    let profile = DeviceProfile::desktop();
    let (mut model, ids) = two_fans();
    model
        .apply(GraphAction::LinkExisting {
            from: ids[0].clone(),
            to: ids[7].clone(),
        })
        .unwrap();

    compact::run(&mut model, &profile).unwrap();
    let first: Vec<(NodeId, Point)> = model.positions().map(|(id, p)| (id.clone(), p)).collect();
    compact::run(&mut model, &profile).unwrap();
    let second: Vec<(NodeId, Point)> = model.positions().map(|(id, p)| (id.clone(), p)).collect();
    assert_eq!(first, second);
    assert_eq!(first.len(), model.len());
}

#[test]
fn compact_separates_overlapping_cousins_and_respects_padding() {
    for profile in [DeviceProfile::desktop(), DeviceProfile::mobile()] {
        let (mut model, _) = two_fans();
        let report = compact::run(&mut model, &profile).unwrap();
        assert_eq!(report.swept_levels, 0);

        let spread = profile.spread_axis();
        let levels = levels::assign(&model);
        for ids in &levels.by_level {
            let mut coords: Vec<f64> = ids
                .iter()
                .map(|id| model.position(id).unwrap().along(spread))
                .collect();
            coords.sort_by(f64::total_cmp);
            for w in coords.windows(2) {
                assert!(w[1] - w[0] >= profile.node_size - 2.0 * relax::TOLERANCE);
            }
        }
        for (_, p) in model.positions() {
            assert!(p.x >= profile.min_padding - 1e-9);
            assert!(p.y >= profile.min_padding - 1e-9);
        }
    }
}

#[test]
fn mobile_levels_grow_to_the_right() {
    let profile = DeviceProfile::mobile();
    let (mut model, ids) = two_fans();
    compact::run(&mut model, &profile).unwrap();
    let root = model.position(&ids[0]).unwrap();
    let child = model.position(&ids[1]).unwrap();
    let grandchild = model.position(&ids[2]).unwrap();
    assert_eq!(child.x - root.x, profile.level_spacing);
    assert_eq!(grandchild.x - child.x, profile.level_spacing);
}

#[test]
fn imported_share_is_laid_out_and_round_trips() {
    let profile = DeviceProfile::desktop();
    let (mut original, _) = two_fans();
    compact::run(&mut original, &profile).unwrap();

    let mut source = InMemoryContentSource::new();
    for node in original.nodes() {
        source.insert_page(&node.title, "text");
    }
    source.remove_page("C1G2");

    let json = original.export_topology().to_json().unwrap();
    let (mut imported, report) = SharedTopology::from_json(&json)
        .unwrap()
        .import(&source)
        .unwrap();
    assert_eq!(report.dropped_nodes.len(), 1);
    assert_eq!(imported.positions().count(), 0);

    compact::run(&mut imported, &profile).unwrap();
    assert_eq!(imported.positions().count(), original.len() - 1);
    let kept: Vec<(NodeId, NodeId)> = original
        .edges()
        .filter(|(_, to)| imported.contains(to))
        .map(|(a, b)| (a.clone(), b.clone()))
        .collect();
    let rebuilt: Vec<(NodeId, NodeId)> = imported
        .edges()
        .map(|(a, b)| (a.clone(), b.clone()))
        .collect();
    assert_eq!(kept, rebuilt);
}

#[test]
fn unreachable_nodes_are_repaired_not_dropped() {
    let profile = DeviceProfile::desktop();
    let shared = SharedTopology::from_json(
        r#"{"nodes":[
            {"id":"1","title":"Root","children":["2"]},
            {"id":"2","title":"Child"},
            {"id":"3","title":"Island","children":["4"]},
            {"id":"4","title":"Shore"}
        ]}"#,
    )
    .unwrap();
    let source = InMemoryContentSource::new()
        .with_page("Root", "r")
        .with_page("Child", "c")
        .with_page("Island", "i")
        .with_page("Shore", "s");
    let (mut model, _) = shared.import(&source).unwrap();

    let report = compact::run(&mut model, &profile).unwrap();
    assert_eq!(report.repaired_levels, 2);
    assert_eq!(model.positions().count(), 4);
    let island = model.position(&NodeId::from("3")).unwrap();
    let shore = model.position(&NodeId::from("4")).unwrap();
    assert_eq!(shore.y - island.y, profile.level_spacing);
}

#[test]
fn empty_model_compacts_to_nothing() {
    let mut model = GraphModel::new();
    let report = compact::run(&mut model, &DeviceProfile::desktop()).unwrap();
    assert_eq!(report.nodes, 0);
}
