//! Integration tests for editor crate

use pagecraft_document::{
    CompositeConfig, DocumentTree, ElementType, Instance, InstancePatch, SlotPosition,
};
use pagecraft_editor::{
    project_semantic_view, Document, EditSession, EditorConfig, EditorError, Location, Mutation,
    SemanticRole, UpdateOptions,
};
use pagecraft_styles::{InteractionState, NewSource, OverrideEntry, StyleSourceKind};
use std::collections::HashSet;

fn session() -> EditSession {
    let config = EditorConfig {
        id_seed: Some("it".into()),
        ..EditorConfig::default()
    };
    EditSession::new(Document::with_config("page.json", &config), &config)
}

fn legacy_navbar(id: &str) -> Instance {
    Instance::new(id, ElementType::Navbar)
        .with_child(
            Instance::new(format!("{}-brand", id), ElementType::NavBrand)
                .with_label("Acme")
                .with_prop("data-testid", "logo"),
        )
        .with_child(Instance::new(format!("{}-links", id), ElementType::NavMenu))
        .with_child(Instance::new(format!("{}-cta", id), ElementType::Button).with_label("Sign up"))
}

fn display_of(session: &EditSession, id: &str) -> Option<String> {
    session
        .resolve_instance_at(id, "base", InteractionState::Default)
        .unwrap()
        .get("display")
        .map(str::to_string)
}

#[test]
fn test_undo_redo_round_trip() {
    let mut session = session();
    let initial = session.tree().clone();

    session
        .insert(Instance::new("hero", ElementType::Section), None, None)
        .unwrap();
    session
        .update("hero", InstancePatch::new().label("Hero"))
        .unwrap();
    let edited = session.tree().clone();

    assert_eq!(session.history().undo_description(), Some("Update hero"));
    assert!(session.undo());
    assert!(session.undo());
    assert!(!session.undo());
    assert_eq!(session.tree(), &initial);

    assert!(session.redo());
    assert!(session.redo());
    assert!(!session.redo());
    assert_eq!(session.tree(), &edited);
}

#[test]
fn test_new_mutation_discards_redo_branch() {
    let mut session = session();
    session
        .insert(Instance::new("a", ElementType::Section), None, None)
        .unwrap();
    session.undo();
    assert!(session.can_redo());

    session
        .insert(Instance::new("b", ElementType::Section), None, None)
        .unwrap();

    assert!(!session.can_redo());
    assert!(session.find("a").is_err());
}

#[test]
fn test_undo_clears_selection_of_removed_instance() {
    let mut session = session();
    session
        .insert(Instance::new("hero", ElementType::Section), None, None)
        .unwrap();
    session.set_selection(Some("hero")).unwrap();

    session.undo();

    assert!(session.selection().is_none());
}

#[test]
fn test_paste_gives_fresh_ids_and_keeps_style_references() -> anyhow::Result<()> {
    let mut session = session();
    session.insert(
        Instance::new("card", ElementType::Container)
            .with_style_source("src-shared")
            .with_child(Instance::new("card-title", ElementType::Heading)),
        None,
        None,
    )?;
    session.copy("card")?;

    let first = session.paste(None, None)?;
    let second = session.paste(None, None)?;

    let ids = session.tree().ids();
    let unique: HashSet<&str> = ids.iter().copied().collect();
    assert_eq!(ids.len(), unique.len());
    assert_eq!(session.tree().len(), 7);
    assert_ne!(first, second);
    assert_ne!(first, "card");

    let pasted = session.find(&first)?;
    assert_eq!(pasted.style_source_ids, vec!["src-shared".to_string()]);
    assert_ne!(pasted.children[0].id, "card-title");
    Ok(())
}

#[test]
fn test_cut_then_paste_undoes_step_by_step() {
    let mut session = session();
    session
        .insert(Instance::new("hero", ElementType::Section), None, None)
        .unwrap();

    session.cut("hero").unwrap();
    assert!(session.find("hero").is_err());
    assert!(!session.clipboard().is_empty());

    let pasted = session.paste(None, None).unwrap();
    assert!(session.find(&pasted).is_ok());

    session.undo();
    assert!(session.find(&pasted).is_err());
    session.undo();
    assert!(session.find("hero").is_ok());
}

#[test]
fn test_paste_with_empty_clipboard() {
    let mut session = session();
    assert!(matches!(
        session.paste(None, None),
        Err(EditorError::EmptyClipboard)
    ));
}

#[test]
fn test_template_preserves_part_identity() {
    let mut session = session();
    session.insert(legacy_navbar("nav"), None, None).unwrap();

    session.apply_template("nav", "brand-center").unwrap();

    let view = project_semantic_view(session.find("nav").unwrap());
    assert_eq!(view.slot_of(SemanticRole::BrandMark), Some(SlotPosition::Center));
    assert_eq!(view.slot_of(SemanticRole::LinkList), Some(SlotPosition::Left));
    assert_eq!(view.slot_of(SemanticRole::CallToAction), Some(SlotPosition::Right));

    let brand = session.find("nav-brand").unwrap();
    assert_eq!(brand.label.as_deref(), Some("Acme"));
    assert_eq!(brand.prop_str("data-testid"), Some("logo"));

    let config = session.find("nav").unwrap().composite_config.clone().unwrap();
    assert_eq!(config.template_id.as_deref(), Some("brand-center"));
    assert_eq!(config.brand_position, Some(SlotPosition::Center));
}

#[test]
fn test_minimal_template_hides_links_and_back() {
    let mut session = session();
    session.insert(legacy_navbar("nav"), None, None).unwrap();

    session.apply_template("nav", "minimal").unwrap();
    assert_eq!(display_of(&session, "nav-links").as_deref(), Some("none"));

    session.apply_template("nav", "brand-left").unwrap();
    assert_eq!(display_of(&session, "nav-links"), None);
    assert!(session.find("nav-links").is_ok());
}

#[test]
fn test_empty_slots_are_hidden() {
    let mut session = session();
    session.insert(legacy_navbar("nav"), None, None).unwrap();
    session.set_brand_position("nav", SlotPosition::Left).unwrap();

    let view = project_semantic_view(session.find("nav").unwrap());
    let center = view.slot(SlotPosition::Center).unwrap().to_string();
    let right = view.slot(SlotPosition::Right).unwrap().to_string();
    assert_eq!(display_of(&session, &center).as_deref(), Some("none"));
    assert_eq!(display_of(&session, &right).as_deref(), Some("flex"));

    // A direct drag into the empty slot shows it again
    let result = session.move_instance("nav-cta", &center, None).unwrap();
    assert_eq!(result.follow_ups, 1);
    assert_eq!(display_of(&session, &center).as_deref(), Some("flex"));
}

#[test]
fn test_config_update_resyncs_composite() {
    let mut session = session();
    session.insert(legacy_navbar("nav"), None, None).unwrap();
    session.set_brand_position("nav", SlotPosition::Left).unwrap();

    let patch = InstancePatch::new().composite_config(CompositeConfig {
        template_id: None,
        brand_position: Some(SlotPosition::Right),
    });
    session
        .update_with(
            "nav",
            patch.clone(),
            UpdateOptions {
                skip_composite_sync: true,
            },
        )
        .unwrap();
    let view = project_semantic_view(session.find("nav").unwrap());
    assert_eq!(view.slot_of(SemanticRole::BrandMark), Some(SlotPosition::Left));

    let result = session.update("nav", patch).unwrap();
    assert_eq!(result.follow_ups, 1);
    let view = project_semantic_view(session.find("nav").unwrap());
    assert_eq!(view.slot_of(SemanticRole::BrandMark), Some(SlotPosition::Right));

    // Config change and re-sync are one undo step
    session.undo();
    let view = project_semantic_view(session.find("nav").unwrap());
    assert_eq!(view.slot_of(SemanticRole::BrandMark), Some(SlotPosition::Left));
}

#[test]
fn test_unknown_template_changes_nothing() {
    let mut session = session();
    session.insert(legacy_navbar("nav"), None, None).unwrap();
    let before = session.tree().clone();

    let result = session.apply_template("nav", "brand-diagonal");

    assert!(matches!(result, Err(EditorError::UnknownTemplate(_))));
    assert_eq!(session.tree(), &before);
}

#[test]
fn test_composite_inside_shared_header() {
    let mut session = session();
    let header = DocumentTree::from_root(
        Instance::new("site-header", ElementType::Header).with_child(legacy_navbar("site-nav")),
    )
    .unwrap();
    session.register_shared("header", header).unwrap();

    session.apply_template("site-nav", "brand-right").unwrap();

    let (location, nav) = session.locate("site-nav").unwrap();
    assert_eq!(location, Location::Shared("header".into()));
    let view = project_semantic_view(nav);
    assert_eq!(view.slot_of(SemanticRole::BrandMark), Some(SlotPosition::Right));
    assert_eq!(session.tree().len(), 1);
}

#[test]
fn test_shared_ids_must_not_clash_with_page() {
    let mut session = session();
    session
        .insert(Instance::new("hero", ElementType::Section), None, None)
        .unwrap();

    let header = DocumentTree::from_root(Instance::new("hero", ElementType::Header)).unwrap();
    assert!(session.register_shared("header", header).is_err());
}

#[test]
fn test_instance_style_forks_shared_token() -> anyhow::Result<()> {
    let mut session = session();
    let token = session.batch_import(
        vec![NewSource::named(StyleSourceKind::Token, "brand-button")],
        |ids| vec![OverrideEntry::base(&ids[0], "background", "indigo")],
    )?[0]
        .clone();
    session.insert(
        Instance::new("cta", ElementType::Button).with_style_source(token.clone()),
        None,
        None,
    )?;

    let direct = session.set_override(&token, "color", "white", None, None);
    assert!(direct.is_err());

    let forked = session.set_instance_style("cta", "color", "white", None, None)?;

    assert_ne!(forked, token);
    assert_eq!(session.styles().base_of(&forked), Some(token.as_str()));
    assert_eq!(session.styles().get_override(&token, "color", None, None), None);

    let resolved = session.resolve_instance("cta")?;
    assert_eq!(resolved.get("background"), Some("indigo"));
    assert_eq!(resolved.get("color"), Some("white"));

    session.undo();
    assert_eq!(session.find("cta")?.style_source_ids, vec![token]);
    assert!(!session.styles().contains(&forked));
    Ok(())
}

#[test]
fn test_batch_import_is_one_step_and_atomic() {
    let mut session = session();
    let levels = session.history().undo_levels();

    let result = session.batch_import(
        vec![NewSource::local("card"), NewSource::local("card")],
        |ids| {
            vec![
                OverrideEntry::base(&ids[0], "padding", "8px"),
                OverrideEntry::base(&ids[1], "padding", "16px").at("watch"),
            ]
        },
    );
    assert!(result.is_err());
    assert!(session.styles().is_empty());
    assert_eq!(session.history().undo_levels(), levels);

    let created = session
        .batch_import(vec![NewSource::local("card")], |ids| {
            vec![OverrideEntry::base(&ids[0], "padding", "8px")]
        })
        .unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(session.history().undo_levels(), levels + 1);
}

#[test]
fn test_transaction_is_one_undo_step() {
    let mut session = session();

    session
        .transaction("Add hero", |s| {
            s.insert(Instance::new("hero", ElementType::Section), None, None)?;
            s.insert(Instance::new("hero-title", ElementType::Heading), Some("hero"), None)?;
            s.set_instance_style("hero-title", "font-size", "48px", None, None)?;
            Ok(())
        })
        .unwrap();

    assert_eq!(session.history().undo_levels(), 1);
    assert_eq!(session.history().undo_description(), Some("Add hero"));

    session.undo();
    assert_eq!(session.tree().len(), 1);
    assert!(session.styles().is_empty());
}

#[test]
fn test_serialized_mutation_is_applied() {
    let mut session = session();
    let json = r#"{
        "type": "insertInstance",
        "instance": { "id": "promo", "type": "section", "label": "Promo" }
    }"#;

    let mutation: Mutation = serde_json::from_str(json).unwrap();
    let result = session.apply(mutation).unwrap();

    assert_eq!(result.created.as_deref(), Some("promo"));
    assert_eq!(result.version, session.version());
    assert_eq!(session.find("promo").unwrap().label.as_deref(), Some("Promo"));
}

#[test]
fn test_save_and_load_round_trip() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("page.json");

    let mut session = session();
    session.insert(legacy_navbar("nav"), None, None)?;
    session.apply_template("nav", "brand-center")?;
    session.set_instance_style(
        "nav-cta",
        "color",
        "red",
        Some("mobile"),
        Some(InteractionState::Hover),
    )?;

    let mut document = session.into_document();
    document.save_as(&path)?;
    assert!(!document.is_dirty());

    let loaded = Document::load(&path)?;
    assert_eq!(loaded.tree(), document.tree());
    assert_eq!(loaded.styles().len(), document.styles().len());

    let mut reopened = EditSession::new(loaded, &EditorConfig::default());
    assert_eq!(
        reopened
            .resolve_instance_at("nav-cta", "mobile", InteractionState::Hover)?
            .get("color"),
        Some("red")
    );

    reopened.insert(Instance::new("footer", ElementType::Footer), None, None)?;
    assert!(reopened.document().is_dirty());
    reopened.save()?;
    assert!(!reopened.document().is_dirty());
    Ok(())
}
