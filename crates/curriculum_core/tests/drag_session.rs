use curriculum_core::{
    Content, ContentKind, CurriculumTree, DragId, DragSession, DropOutcome, Topic, TopicKey,
};

fn lesson(id: &str) -> Content {
    Content::new(id, format!("Lesson {id}"), ContentKind::Lesson)
}

fn topic(id: &str, contents: &[&str]) -> Topic {
    Topic::saved(id, format!("Topic {id}"))
        .with_contents(contents.iter().map(|id| lesson(id)).collect())
}

fn content_ids(tree: &CurriculumTree, topic_id: &str) -> Vec<String> {
    tree.topic(&TopicKey::Saved(topic_id.to_string()))
        .unwrap()
        .contents
        .iter()
        .map(|content| content.id.raw().to_string())
        .collect()
}

fn topic_order(tree: &CurriculumTree) -> Vec<String> {
    tree.topics().iter().map(|topic| topic.key.to_string()).collect()
}

fn sorted_content_ids(tree: &CurriculumTree) -> Vec<DragId> {
    let mut ids = tree.content_ids();
    ids.sort();
    ids
}

#[test]
fn content_dropped_on_empty_topic_is_appended() {
    let mut tree = CurriculumTree::from_topics(vec![topic("A", &["L1", "L2"]), topic("B", &[])]);
    let mut session = DragSession::new();

    session.drag_start(&tree, DragId::content("L1")).unwrap();
    let report = session.drag_end(&mut tree, Some(&DragId::topic("B")));

    assert!(matches!(
        report.outcome,
        DropOutcome::ContentTransferred { ref content, .. } if content == &DragId::content("L1")
    ));
    assert_eq!(content_ids(&tree, "A"), vec!["L2"]);
    assert_eq!(content_ids(&tree, "B"), vec!["L1"]);

    let payload = report.payload.expect("accepted drop persists");
    let parent = payload.content_parent.expect("cross-topic move names parent");
    assert_eq!(parent.parent_topic_id, "B");
    assert_eq!(parent.content_id, "L1");
}

#[test]
fn topic_dropped_on_last_topic_moves_to_end() {
    let mut tree = CurriculumTree::from_topics(vec![
        topic("A", &["T1"]),
        topic("B", &["T2"]),
        topic("C", &["T3"]),
    ]);
    let mut session = DragSession::new();

    session.drag_start(&tree, DragId::topic("A")).unwrap();
    let report = session.drag_end(&mut tree, Some(&DragId::topic("C")));

    assert_eq!(report.outcome, DropOutcome::TopicsReordered { from: 0, to: 2 });
    assert_eq!(topic_order(&tree), vec!["topic-B", "topic-C", "topic-A"]);
    assert_eq!(content_ids(&tree, "A"), vec!["T1"]);
    assert_eq!(content_ids(&tree, "B"), vec!["T2"]);
    assert_eq!(content_ids(&tree, "C"), vec!["T3"]);

    let payload = report.payload.unwrap();
    assert_eq!(payload.sorting[&0].topic_id, "B");
    assert_eq!(payload.sorting[&2].topic_id, "A");
    assert!(payload.content_parent.is_none());
}

#[test]
fn content_dropped_on_collapsed_topic_is_rejected() {
    let mut tree = CurriculumTree::from_topics(vec![
        topic("A", &["L1"]),
        topic("B", &[]).collapsed(true),
        topic("C", &["L3"]).collapsed(true),
    ]);
    let before = tree.clone();
    let mut session = DragSession::new();

    session.drag_start(&tree, DragId::content("L1")).unwrap();
    assert!(!session.drag_over(&mut tree, &DragId::topic("B")));
    let report = session.drag_end(&mut tree, Some(&DragId::topic("B")));
    assert_eq!(report.outcome, DropOutcome::Rejected);
    assert!(report.payload.is_none());
    assert_eq!(tree, before);

    session.drag_start(&tree, DragId::content("L1")).unwrap();
    let report = session.drag_end(&mut tree, Some(&DragId::content("L3")));
    assert_eq!(report.outcome, DropOutcome::Rejected);
    assert_eq!(tree, before);
    assert!(!session.is_dragging());
}

#[test]
fn content_dropped_on_non_empty_topic_container_is_unchanged() {
    let mut tree =
        CurriculumTree::from_topics(vec![topic("A", &["L1"]), topic("B", &["L2", "L3"])]);
    let before = tree.clone();
    let mut session = DragSession::new();

    session.drag_start(&tree, DragId::content("L1")).unwrap();
    assert!(!session.drag_over(&mut tree, &DragId::topic("B")));
    let report = session.drag_end(&mut tree, Some(&DragId::topic("B")));

    assert_eq!(report.outcome, DropOutcome::Unchanged);
    assert_eq!(tree, before);
}

#[test]
fn content_reorders_within_same_topic() {
    let mut tree = CurriculumTree::from_topics(vec![topic("A", &["L1", "L2", "L3"])]);
    let mut session = DragSession::new();

    session.drag_start(&tree, DragId::content("L3")).unwrap();
    assert!(!session.drag_over(&mut tree, &DragId::content("L1")));
    let report = session.drag_end(&mut tree, Some(&DragId::content("L1")));

    assert_eq!(
        report.outcome,
        DropOutcome::ContentReordered {
            topic: TopicKey::Saved("A".to_string()),
            from: 2,
            to: 0,
        }
    );
    assert_eq!(content_ids(&tree, "A"), vec!["L3", "L1", "L2"]);
    assert!(report.payload.unwrap().content_parent.is_none());
}

#[test]
fn drag_over_moves_content_live_and_drop_keeps_it() {
    let mut tree =
        CurriculumTree::from_topics(vec![topic("A", &["L1", "L2"]), topic("B", &["L3", "L4"])]);
    let mut session = DragSession::new();

    session.drag_start(&tree, DragId::content("L1")).unwrap();
    assert!(session.drag_over(&mut tree, &DragId::content("L4")));
    assert_eq!(content_ids(&tree, "A"), vec!["L2"]);
    assert_eq!(content_ids(&tree, "B"), vec!["L3", "L1", "L4"]);

    // Now the same topic as the target: repeated hover events are no-ops.
    assert!(!session.drag_over(&mut tree, &DragId::content("L4")));

    let report = session.drag_end(&mut tree, Some(&DragId::content("L4")));
    assert_eq!(content_ids(&tree, "B"), vec!["L3", "L4", "L1"]);

    let parent = report.payload.unwrap().content_parent.unwrap();
    assert_eq!(parent.parent_topic_id, "B");
    assert_eq!(parent.content_id, "L1");
}

#[test]
fn drop_on_content_in_other_topic_splices_at_target_index() {
    let mut tree =
        CurriculumTree::from_topics(vec![topic("A", &["L1", "L2"]), topic("B", &["L3", "L4"])]);
    let mut session = DragSession::new();

    session.drag_start(&tree, DragId::content("L2")).unwrap();
    let report = session.drag_end(&mut tree, Some(&DragId::content("L4")));

    assert_eq!(
        report.outcome,
        DropOutcome::ContentTransferred {
            content: DragId::content("L2"),
            from_topic: TopicKey::Saved("A".to_string()),
            to_topic: TopicKey::Saved("B".to_string()),
        }
    );
    assert_eq!(content_ids(&tree, "A"), vec!["L1"]);
    assert_eq!(content_ids(&tree, "B"), vec!["L3", "L2", "L4"]);
}

#[test]
fn every_drop_conserves_content_ids() {
    let base = CurriculumTree::from_topics(vec![
        topic("A", &["L1", "L2"]),
        topic("B", &[]),
        topic("C", &["L3"]).collapsed(true),
        topic("D", &["L4", "L5"]),
    ]);
    let expected = sorted_content_ids(&base);

    let mut handles = vec![
        DragId::topic("A"),
        DragId::topic("B"),
        DragId::topic("C"),
        DragId::topic("D"),
    ];
    handles.extend(base.content_ids());

    for active in &handles {
        for over in &handles {
            let mut tree = base.clone();
            let mut session = DragSession::new();
            session.drag_start(&tree, active.clone()).unwrap();
            session.drag_over(&mut tree, over);
            session.drag_end(&mut tree, Some(over));

            assert_eq!(
                sorted_content_ids(&tree),
                expected,
                "active={active} over={over}"
            );
            assert_eq!(tree.len(), base.len());
            assert!(!session.is_dragging());
        }
    }
}

#[test]
fn cancel_leaves_tree_and_state_untouched() {
    let mut tree = CurriculumTree::from_topics(vec![topic("A", &["L1"]), topic("B", &[])]);
    let before = tree.clone();
    let mut session = DragSession::new();

    session.drag_start(&tree, DragId::content("L1")).unwrap();
    session.cancel(&mut tree);
    assert!(!session.is_dragging());
    assert!(!session.drag_over(&mut tree, &DragId::topic("B")));
    assert_eq!(tree, before);
}

#[test]
fn active_item_reports_title_and_kind() {
    let tree = CurriculumTree::from_topics(vec![topic("A", &["L1"])]);
    let mut session = DragSession::new();
    session.drag_start(&tree, DragId::content("L1")).unwrap();

    let item = session.active_item(&tree).unwrap();
    assert_eq!(item.title, "Lesson L1");
    assert_eq!(item.kind, Some(ContentKind::Lesson));
    assert!(session.is_topic_sorting_disabled(&tree));
}

#[test]
fn released_over_nothing_after_hover_restores_tree() {
    let mut tree = CurriculumTree::from_topics(vec![topic("A", &["L1", "L2"]), topic("B", &["L3"])]);
    let before = tree.clone();
    let mut session = DragSession::new();

    session.drag_start(&tree, DragId::content("L1")).unwrap();
    assert!(session.drag_over(&mut tree, &DragId::content("L3")));
    assert_eq!(content_ids(&tree, "B"), vec!["L1", "L3"]);

    let report = session.drag_end(&mut tree, None);
    assert_eq!(report.outcome, DropOutcome::Cancelled);
    assert!(report.payload.is_none());
    assert_eq!(tree, before);
}

#[test]
fn explicit_cancel_after_hover_restores_tree() {
    let mut tree = CurriculumTree::from_topics(vec![
        topic("A", &["L1", "L2", "L3"]),
        topic("B", &["L4"]),
        topic("C", &[]),
    ]);
    let before = tree.clone();
    let mut session = DragSession::new();

    session.drag_start(&tree, DragId::content("L2")).unwrap();
    assert!(session.drag_over(&mut tree, &DragId::content("L4")));
    assert!(session.drag_over(&mut tree, &DragId::topic("C")));
    assert_eq!(content_ids(&tree, "C"), vec!["L2"]);

    session.cancel(&mut tree);
    assert!(!session.is_dragging());
    assert_eq!(tree, before);
}

#[test]
fn rejected_drop_after_hover_restores_tree() {
    let mut tree = CurriculumTree::from_topics(vec![
        topic("A", &["L1"]),
        topic("B", &["L3"]),
        topic("C", &["L5"]).collapsed(true),
    ]);
    let before = tree.clone();
    let mut session = DragSession::new();

    session.drag_start(&tree, DragId::content("L1")).unwrap();
    assert!(session.drag_over(&mut tree, &DragId::content("L3")));

    let report = session.drag_end(&mut tree, Some(&DragId::content("L5")));
    assert_eq!(report.outcome, DropOutcome::Rejected);
    assert!(report.payload.is_none());
    assert_eq!(tree, before);
}
