//! # Props and Prop Schemas
//!
//! Props are a key/value bag whose meaning depends on the element type.
//! Every type has a small schema naming the keys it understands and the
//! kind of value each holds. `data-*` and `aria-*` attributes are accepted
//! on every type as text.

use crate::element::ElementType;
use crate::errors::{DocumentError, DocumentResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type Props = BTreeMap<String, PropValue>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropValue {
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<String>),
}

impl PropValue {
    pub fn kind(&self) -> PropKind {
        match self {
            PropValue::Bool(_) => PropKind::Bool,
            PropValue::Number(_) => PropKind::Number,
            PropValue::Text(_) => PropKind::Text,
            PropValue::List(_) => PropKind::List,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            PropValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::Text(value.to_string())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        PropValue::Text(value)
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        PropValue::Bool(value)
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        PropValue::Number(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropKind {
    Bool,
    Number,
    Text,
    List,
}

/// Keys understood by one element type
#[derive(Debug, Clone, Copy)]
pub struct PropSchema {
    pub fields: &'static [(&'static str, PropKind)],
}

const LINK_FIELDS: &[(&str, PropKind)] = &[
    ("href", PropKind::Text),
    ("text", PropKind::Text),
    ("target", PropKind::Text),
];

/// Schema registry: element type → accepted props
pub fn schema_for(element_type: ElementType) -> PropSchema {
    use ElementType as E;
    use PropKind as K;

    let fields: &'static [(&'static str, PropKind)] = match element_type {
        E::Body | E::Container | E::Block | E::ListItem | E::NavMenu => &[],
        E::Section | E::Header | E::Footer => &[("tag", K::Text)],
        E::Heading => &[("level", K::Number), ("text", K::Text)],
        E::Paragraph | E::Text => &[("text", K::Text)],
        E::Link | E::NavLink => LINK_FIELDS,
        E::Button => &[("text", K::Text), ("href", K::Text), ("buttonType", K::Text)],
        E::Image => &[
            ("src", K::Text),
            ("alt", K::Text),
            ("width", K::Number),
            ("height", K::Number),
            ("srcset", K::List),
        ],
        E::List => &[("ordered", K::Bool)],
        E::Form => &[("action", K::Text), ("method", K::Text)],
        E::Input => &[
            ("name", K::Text),
            ("inputType", K::Text),
            ("placeholder", K::Text),
            ("required", K::Bool),
            ("options", K::List),
        ],
        E::Navbar => &[("sticky", K::Bool), ("collapseAt", K::Text)],
        E::NavBrand => &[("href", K::Text), ("text", K::Text), ("logoSrc", K::Text)],
    };

    PropSchema { fields }
}

impl PropSchema {
    pub fn kind_of(&self, key: &str) -> Option<PropKind> {
        self.fields
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, kind)| *kind)
    }
}

fn is_attribute_key(key: &str) -> bool {
    key.starts_with("data-") || key.starts_with("aria-")
}

/// Check one prop against the schema of `element_type`
pub fn validate_prop(
    element_type: ElementType,
    key: &str,
    value: &PropValue,
) -> DocumentResult<()> {
    let expected = if is_attribute_key(key) {
        Some(PropKind::Text)
    } else {
        schema_for(element_type).kind_of(key)
    };

    match expected {
        None => Err(DocumentError::InvalidProp {
            element_type,
            prop: key.to_string(),
            reason: "not part of this element's schema".to_string(),
        }),
        Some(kind) if kind != value.kind() => Err(DocumentError::InvalidProp {
            element_type,
            prop: key.to_string(),
            reason: format!("expected {:?}, got {:?}", kind, value.kind()),
        }),
        Some(_) => Ok(()),
    }
}

pub fn validate_props(element_type: ElementType, props: &Props) -> DocumentResult<()> {
    props
        .iter()
        .try_for_each(|(key, value)| validate_prop(element_type, key, value))
}
