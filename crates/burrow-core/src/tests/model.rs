use crate::*;

fn page(title: &str) -> NewNode {
    NewNode::new(PageRef::new(title))
}

fn seed() -> (GraphModel, NodeId, NodeId, NodeId) {
    let mut model = GraphModel::new();
    let Transition::Inserted(root) = model.apply(GraphAction::InsertNode(page("Graph"))).unwrap()
    else {
        panic!("expected insert");
    };
    let Transition::Inserted(a) = model
        .apply(GraphAction::InsertNode(page("Tree").child_of(root.clone())))
        .unwrap()
    else {
        panic!("expected insert");
    };
    let Transition::Inserted(b) = model
        .apply(GraphAction::InsertNode(page("Forest").child_of(a.clone())))
        .unwrap()
    else {
        panic!("expected insert");
    };
    (model, root, a, b)
}

#[test]
fn first_insert_becomes_root_and_children_are_appended() {
    let (model, root, a, b) = seed();
    assert_eq!(model.root(), Some(&root));
    assert_eq!(model.node(&root).unwrap().children, vec![a.clone()]);
    assert_eq!(model.node(&a).unwrap().children, vec![b.clone()]);
    assert_eq!(model.node(&b).unwrap().parent_id.as_ref(), Some(&a));
    assert_eq!(model.len(), 3);
}

#[test]
fn second_parentless_insert_is_rejected() {
    let (mut model, root, _, _) = seed();
    let err = model
        .apply(GraphAction::InsertNode(page("Elsewhere")))
        .unwrap_err();
    assert!(matches!(err, Error::RootExists { root: r } if r == root));
    assert_eq!(model.len(), 3);
}

#[test]
fn insert_under_unknown_parent_is_rejected() {
    let (mut model, ..) = seed();
    let err = model
        .apply(GraphAction::InsertNode(page("Lost").child_of(NodeId::from("missing"))))
        .unwrap_err();
    assert!(matches!(err, Error::UnknownNode { .. }));
}

#[test]
fn link_rejects_cycles_and_tolerates_repeats() {
    let (mut model, root, a, b) = seed();
    let err = model
        .apply(GraphAction::LinkExisting {
            from: b.clone(),
            to: root.clone(),
        })
        .unwrap_err();
    assert!(matches!(err, Error::CycleDetected { .. }));
    assert!(model.would_create_cycle(&a, &a));

    assert_eq!(
        model
            .apply(GraphAction::LinkExisting {
                from: root.clone(),
                to: b.clone(),
            })
            .unwrap(),
        Transition::Linked
    );
    assert_eq!(
        model
            .apply(GraphAction::LinkExisting {
                from: root.clone(),
                to: b.clone(),
            })
            .unwrap(),
        Transition::Unchanged
    );
    let parents: Vec<_> = model.parents_of(&b).cloned().collect();
    assert_eq!(parents, vec![root.clone(), a.clone()]);
    assert_eq!(model.node(&b).unwrap().parent_id.as_ref(), Some(&a));
    assert_eq!(model.edges().count(), 3);
}

#[test]
fn reposition_is_all_or_nothing() {
    let (mut model, root, a, _) = seed();
    let err = model
        .apply(GraphAction::Reposition(vec![
            (root.clone(), Point::new(1.0, 2.0)),
            (NodeId::from("ghost"), Point::new(0.0, 0.0)),
        ]))
        .unwrap_err();
    assert!(matches!(err, Error::UnknownNode { .. }));
    assert_eq!(model.position(&root), None);

    let applied = model
        .apply(GraphAction::Reposition(vec![
            (root.clone(), Point::new(1.0, 2.0)),
            (a.clone(), Point::new(3.0, 4.0)),
        ]))
        .unwrap();
    assert_eq!(applied, Transition::Repositioned(2));
    assert_eq!(model.position(&a), Some(Point::new(3.0, 4.0)));
    let bounds = model.bounds(10.0).unwrap();
    assert_eq!(bounds.min_x, -9.0);
    assert_eq!(bounds.max_y, 14.0);
}

#[test]
fn history_truncates_forward_entries_on_new_visit() {
    let (mut model, root, a, b) = seed();
    for id in [&root, &a, &b] {
        model.apply(GraphAction::SetActive(id.clone())).unwrap();
    }
    assert_eq!(model.history(), &[root.clone(), a.clone(), b.clone()]);
    assert!(!model.can_navigate_forward());

    model.apply(GraphAction::NavigateBack).unwrap();
    model.apply(GraphAction::NavigateBack).unwrap();
    assert_eq!(model.active(), Some(&root));
    assert_eq!(
        model.apply(GraphAction::NavigateBack).unwrap(),
        Transition::Unchanged
    );
    assert!(model.can_navigate_forward());

    model.apply(GraphAction::SetActive(b.clone())).unwrap();
    assert_eq!(model.history(), &[root.clone(), b.clone()]);
    assert!(!model.can_navigate_forward());

    // Re-activating the current entry does not grow the history.
    model.apply(GraphAction::SetActive(b.clone())).unwrap();
    assert_eq!(model.history().len(), 2);
}

#[test]
fn reset_clears_everything() {
    let (mut model, root, ..) = seed();
    model.apply(GraphAction::SetActive(root)).unwrap();
    assert_eq!(model.apply(GraphAction::Reset).unwrap(), Transition::Cleared);
    assert!(model.is_empty());
    assert!(model.root().is_none());
    assert!(model.active().is_none());
    assert!(model.history().is_empty());
}

#[test]
fn titles_are_normalized_and_matched_case_insensitively() {
    let (model, _, a, _) = seed();
    assert_eq!(model.find_by_title("tree").map(|n| &n.id), Some(&a));
    assert_eq!(PageRef::new("Graph_theory").title, "Graph theory");
}

#[test]
fn page_ref_from_article_url() {
    let page = PageRef::from_url("https://en.wikipedia.org/wiki/Caf%C3%A9_society").unwrap();
    assert_eq!(page.title, "Café society");
    assert!(PageRef::from_url("https://example.com/wiki/Cafe").is_err());
    assert!(PageRef::from_url("not a url").is_err());
    assert!(PageRef::from_url("https://en.wikipedia.org/").is_err());
}

#[test]
fn article_urls_use_underscored_titles() {
    assert_eq!(article_url("Graph  theory"), "https://en.wikipedia.org/wiki/Graph_theory");
    assert_eq!(article_url("Graph_drawing"), "https://en.wikipedia.org/wiki/Graph_drawing");
}

#[test]
fn thumbnails_can_be_set_after_insert() {
    let (mut model, root, ..) = seed();
    model
        .apply(GraphAction::SetThumbnail {
            id: root.clone(),
            thumbnail: Some("thumb.png".to_string()),
        })
        .unwrap();
    assert_eq!(
        model.node(&root).unwrap().thumbnail.as_deref(),
        Some("thumb.png")
    );
}
