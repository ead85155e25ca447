//! Declarative placement templates for composites.

use super::SemanticRole;
use pagecraft_document::SlotPosition;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Property → value pairs written at the base breakpoint, default state
pub type StyleValues = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutTemplate {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub left: Vec<SemanticRole>,
    #[serde(default)]
    pub center: Vec<SemanticRole>,
    #[serde(default)]
    pub right: Vec<SemanticRole>,
    #[serde(default)]
    pub container_styles: StyleValues,
    #[serde(default)]
    pub slot_styles: BTreeMap<SlotPosition, StyleValues>,
    /// Menu-less layout: the link list stays in the tree but is not displayed
    #[serde(default)]
    pub hide_link_list: bool,
}

impl LayoutTemplate {
    pub fn roles_in(&self, position: SlotPosition) -> &[SemanticRole] {
        match position {
            SlotPosition::Left => &self.left,
            SlotPosition::Center => &self.center,
            SlotPosition::Right => &self.right,
        }
    }

    pub fn position_of(&self, role: SemanticRole) -> Option<SlotPosition> {
        SlotPosition::ALL
            .into_iter()
            .find(|pos| self.roles_in(*pos).contains(&role))
    }

    pub fn brand_position(&self) -> Option<SlotPosition> {
        self.position_of(SemanticRole::BrandMark)
    }

    pub fn slot_styles(&self, position: SlotPosition) -> Option<&StyleValues> {
        self.slot_styles.get(&position)
    }
}

fn styles(pairs: &[(&str, &str)]) -> StyleValues {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn template(
    id: &str,
    label: &str,
    left: &[SemanticRole],
    center: &[SemanticRole],
    right: &[SemanticRole],
    justify: &str,
) -> LayoutTemplate {
    let slot = |justify: &str| {
        styles(&[
            ("display", "flex"),
            ("align-items", "center"),
            ("gap", "24px"),
            ("justify-content", justify),
        ])
    };

    let mut slot_styles = BTreeMap::new();
    slot_styles.insert(SlotPosition::Left, slot("flex-start"));
    slot_styles.insert(SlotPosition::Center, slot("center"));
    slot_styles.insert(SlotPosition::Right, slot("flex-end"));

    LayoutTemplate {
        id: id.to_string(),
        label: label.to_string(),
        left: left.to_vec(),
        center: center.to_vec(),
        right: right.to_vec(),
        container_styles: styles(&[
            ("display", "flex"),
            ("align-items", "center"),
            ("justify-content", justify),
            ("padding", "16px 24px"),
        ]),
        slot_styles,
        hide_link_list: false,
    }
}

/// Templates shipped with the editor
pub fn builtin_templates() -> Vec<LayoutTemplate> {
    use SemanticRole::*;

    let mut minimal = template(
        "minimal",
        "Brand and button",
        &[BrandMark],
        &[],
        &[LinkList, CallToAction],
        "space-between",
    );
    minimal.hide_link_list = true;

    vec![
        template(
            "brand-left",
            "Brand left",
            &[BrandMark],
            &[],
            &[LinkList, CallToAction],
            "space-between",
        ),
        template(
            "brand-center",
            "Brand centered",
            &[LinkList],
            &[BrandMark],
            &[CallToAction],
            "space-between",
        ),
        template(
            "brand-right",
            "Brand right",
            &[LinkList, CallToAction],
            &[],
            &[BrandMark],
            "space-between",
        ),
        minimal,
    ]
}

pub fn find_template(id: &str) -> Option<LayoutTemplate> {
    builtin_templates().into_iter().find(|t| t.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_ids_unique() {
        let templates = builtin_templates();
        let mut ids: Vec<&str> = templates.iter().map(|t| t.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), templates.len());
    }

    #[test]
    fn test_every_template_places_each_role_once() {
        for template in builtin_templates() {
            for role in SemanticRole::ALL {
                let count = SlotPosition::ALL
                    .into_iter()
                    .filter(|pos| template.roles_in(*pos).contains(&role))
                    .count();
                assert_eq!(count, 1, "{} places {} {} times", template.id, role, count);
            }
        }
    }

    #[test]
    fn test_brand_position() {
        assert_eq!(
            find_template("brand-center").unwrap().brand_position(),
            Some(SlotPosition::Center)
        );
        assert!(find_template("minimal").unwrap().hide_link_list);
        assert!(find_template("nope").is_none());
    }
}
