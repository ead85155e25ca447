//! Cascade precedence scenarios across sources, breakpoints and states

use pagecraft_styles::{
    resolve, InteractionState, OverrideEntry, StyleRegistry, StyleSourceId, StyleSourceKind,
};

fn local(registry: &mut StyleRegistry, name: &str) -> StyleSourceId {
    registry
        .create_source(StyleSourceKind::Local, Some(name), "div")
        .unwrap()
}

#[test]
fn test_resolution_is_deterministic() {
    let mut registry = StyleRegistry::new();
    let a = local(&mut registry, "a");
    let b = local(&mut registry, "b");
    registry.set_override(&a, "color", "red", None, None).unwrap();
    registry.set_override(&b, "margin", "4px", Some("tablet"), None).unwrap();
    registry
        .set_override(&b, "color", "teal", Some("tablet"), Some(InteractionState::Focus))
        .unwrap();

    let ids = [a, b];
    for bp in ["base", "tablet", "mobile"] {
        for state in InteractionState::ALL {
            assert_eq!(
                resolve(&registry, &ids, bp, state),
                resolve(&registry, &ids, bp, state),
            );
        }
    }
}

#[test]
fn test_later_source_overrides_per_property() {
    let mut registry = StyleRegistry::new();
    let a = local(&mut registry, "a");
    let b = local(&mut registry, "b");
    registry.set_override(&a, "color", "red", None, None).unwrap();
    registry.set_override(&a, "size", "1", None, None).unwrap();
    registry.set_override(&b, "color", "blue", None, None).unwrap();

    let decl = resolve(&registry, &[a.clone(), b.clone()], "base", InteractionState::Default);
    assert_eq!(decl.get("color"), Some("blue"));
    assert_eq!(decl.get("size"), Some("1"));

    // Array order, not creation order, decides
    let decl = resolve(&registry, &[b, a], "base", InteractionState::Default);
    assert_eq!(decl.get("color"), Some("red"));
}

#[test]
fn test_breakpoint_falls_back_to_base() {
    let mut registry = StyleRegistry::new();
    let a = local(&mut registry, "a");
    registry.set_override(&a, "color", "red", None, None).unwrap();
    registry.set_override(&a, "padding", "4px", Some("mobile"), None).unwrap();

    let decl = resolve(&registry, &[a], "mobile", InteractionState::Default);
    assert_eq!(decl.get("color"), Some("red"));
    assert_eq!(decl.get("padding"), Some("4px"));
}

#[test]
fn test_breakpoint_layer_respects_array_order() {
    let mut registry = StyleRegistry::new();
    let a = local(&mut registry, "a");
    let b = local(&mut registry, "b");
    registry.set_override(&a, "width", "10px", Some("tablet"), None).unwrap();
    registry.set_override(&b, "width", "20px", Some("tablet"), None).unwrap();
    // A base value on the later source never beats a breakpoint value
    registry.set_override(&b, "height", "1px", None, None).unwrap();
    registry.set_override(&a, "height", "2px", Some("tablet"), None).unwrap();

    let decl = resolve(&registry, &[a, b], "tablet", InteractionState::Default);
    assert_eq!(decl.get("width"), Some("20px"));
    assert_eq!(decl.get("height"), Some("2px"));
}

#[test]
fn test_state_falls_back_to_breakpoint_value() {
    let mut registry = StyleRegistry::new();
    let a = local(&mut registry, "a");
    registry.set_override(&a, "color", "red", None, None).unwrap();
    registry.set_override(&a, "color", "green", Some("tablet"), None).unwrap();
    registry.set_override(&a, "outline", "1px", None, Some(InteractionState::Hover)).unwrap();

    let decl = resolve(&registry, &[a.clone()], "tablet", InteractionState::Hover);
    assert_eq!(decl.get("color"), Some("green"));
    assert_eq!(decl.get("outline"), Some("1px"));

    let decl = resolve(&registry, &[a], "base", InteractionState::Active);
    assert_eq!(decl.get("color"), Some("red"));
    assert!(!decl.contains("outline"));
}

#[test]
fn test_state_at_breakpoint_beats_state_at_base() {
    let mut registry = StyleRegistry::new();
    let a = local(&mut registry, "a");
    registry.set_override(&a, "color", "red", None, Some(InteractionState::Hover)).unwrap();
    registry
        .set_override(&a, "color", "blue", Some("mobile"), Some(InteractionState::Hover))
        .unwrap();

    let ids = [a];
    assert_eq!(
        resolve(&registry, &ids, "mobile", InteractionState::Hover).get("color"),
        Some("blue")
    );
    assert_eq!(
        resolve(&registry, &ids, "tablet", InteractionState::Hover).get("color"),
        Some("red")
    );
}

#[test]
fn test_padding_scenario() {
    let mut registry = StyleRegistry::new();
    let a = local(&mut registry, "A");
    let b = local(&mut registry, "B");
    registry
        .batch_set_overrides(vec![
            OverrideEntry::base(&a, "padding", "8px"),
            OverrideEntry::base(&b, "padding", "16px"),
            OverrideEntry::base(&b, "padding", "24px").in_state(InteractionState::Hover),
        ])
        .unwrap();

    let ids = [a, b];
    let decl = resolve(&registry, &ids, "base", InteractionState::Default);
    assert_eq!(decl.len(), 1);
    assert_eq!(decl.get("padding"), Some("16px"));

    let decl = resolve(&registry, &ids, "base", InteractionState::Hover);
    assert_eq!(decl.get("padding"), Some("24px"));
}

#[test]
fn test_resolution_reflects_later_writes() {
    let mut registry = StyleRegistry::new();
    let a = local(&mut registry, "a");
    registry.set_override(&a, "color", "red", None, None).unwrap();
    let before = resolve(&registry, &[a.clone()], "base", InteractionState::Default);

    registry.set_override(&a, "color", "blue", None, None).unwrap();
    let after = resolve(&registry, &[a], "base", InteractionState::Default);

    assert_ne!(before, after);
    assert_eq!(after.get("color"), Some("blue"));
}
