use pagecraft_document::{
    DocumentError, DocumentTree, ElementType, Instance, InstancePatch, StyleReferenceCollector,
};

fn landing_page() -> DocumentTree {
    let mut tree = DocumentTree::new();
    tree.insert(Instance::new("header", ElementType::Header), None, None)
        .unwrap();
    tree.insert(Instance::new("hero", ElementType::Section), None, None)
        .unwrap();
    tree.insert(
        Instance::new("hero-box", ElementType::Container)
            .with_style_source("card")
            .with_child(
                Instance::new("hero-title", ElementType::Heading)
                    .with_prop("text", "Welcome")
                    .with_style_source("title"),
            ),
        Some("hero"),
        None,
    )
    .unwrap();
    tree
}

#[test]
fn region_inside_region_is_rejected_and_tree_unchanged() {
    let mut tree = landing_page();
    let before = tree.clone();

    let result = tree.insert(Instance::new("inner", ElementType::Section), Some("hero"), None);

    assert!(matches!(
        result,
        Err(DocumentError::PlacementViolation {
            child: ElementType::Section,
            parent: ElementType::Section,
            ..
        })
    ));
    assert_eq!(tree, before);
}

#[test]
fn region_nested_deep_inside_region_is_rejected() {
    let mut tree = landing_page();
    let result = tree.insert(Instance::new("f", ElementType::Footer), Some("hero-box"), None);
    assert!(matches!(result, Err(DocumentError::PlacementViolation { .. })));
}

#[test]
fn moving_into_own_descendant_is_a_cycle() {
    let mut tree = landing_page();
    let before = tree.clone();

    let result = tree.move_instance("hero-box", "hero-title", None);

    assert_eq!(
        result,
        Err(DocumentError::CycleViolation {
            id: "hero-box".into(),
            target: "hero-title".into(),
        })
    );
    assert_eq!(tree, before);
}

#[test]
fn moving_into_self_is_a_cycle() {
    let mut tree = landing_page();
    assert!(matches!(
        tree.move_instance("hero-box", "hero-box", None),
        Err(DocumentError::CycleViolation { .. })
    ));
}

#[test]
fn moving_region_under_region_is_a_placement_violation() {
    let mut tree = landing_page();
    let result = tree.move_instance("header", "hero", None);
    assert!(matches!(result, Err(DocumentError::PlacementViolation { .. })));
    assert_eq!(tree.parent_of("header").unwrap().id, "root");
}

#[test]
fn move_keeps_identity_and_styles() {
    let mut tree = landing_page();
    tree.move_instance("hero-title", "header", Some(0)).unwrap();

    let moved = tree.find("hero-title").unwrap();
    assert_eq!(moved.style_source_ids, vec!["title"]);
    assert_eq!(moved.prop_str("text"), Some("Welcome"));
    assert_eq!(tree.parent_of("hero-title").unwrap().id, "header");
    assert!(tree.find("hero-box").unwrap().children.is_empty());
}

#[test]
fn delete_removes_whole_subtree_but_leaves_references_to_caller() {
    let mut tree = landing_page();
    let removed = tree.delete("hero-box").unwrap();

    assert_eq!(removed.size(), 2);
    assert!(tree.find("hero-title").is_none());
    assert!(!StyleReferenceCollector::collect(tree.root()).contains("card"));
    assert!(StyleReferenceCollector::collect(&removed).contains("card"));
}

#[test]
fn delete_unknown_is_not_found() {
    let mut tree = landing_page();
    assert_eq!(tree.delete("ghost"), Err(DocumentError::NotFound("ghost".into())));
}

#[test]
fn update_merges_props_without_dropping_others() {
    let mut tree = landing_page();
    tree.update("hero-title", InstancePatch::new().prop("level", 1.0))
        .unwrap();

    let title = tree.find("hero-title").unwrap();
    assert_eq!(title.prop_str("text"), Some("Welcome"));
    assert_eq!(title.props.len(), 2);
}

#[test]
fn tree_survives_json_round_trip() {
    let tree = landing_page();
    let json = serde_json::to_string(&tree).unwrap();
    let restored: DocumentTree = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, tree);
}

#[test]
fn can_place_mirrors_insert_checks() {
    let tree = landing_page();
    assert!(tree.can_place(ElementType::Section, "hero-box").is_err());
    assert!(tree.can_place(ElementType::Button, "hero-box").is_ok());
    assert!(tree.can_place(ElementType::Text, "hero-title").is_err());
}
