//! # Pagecraft Document
//!
//! The instance tree of a page: element vocabulary, typed props, placement
//! rules, and the structural operations that keep the tree consistent.
//!
//! Styling is deliberately absent here; instances only carry style source
//! ids as opaque strings.

pub mod element;
pub mod errors;
pub mod instance;
pub mod placement;
pub mod props;
pub mod tree;
pub mod visitor;

pub use element::ElementType;
pub use errors::{DocumentError, DocumentResult};
pub use instance::{
    CompositeConfig, DataBinding, Instance, InstanceId, InstancePatch, SlotPosition, PART_PROP,
    ROLE_PROP, ROOT_ID, SLOT_PROP,
};
pub use placement::{can_place, check_subtree};
pub use props::{schema_for, validate_prop, validate_props, PropKind, PropSchema, PropValue, Props};
pub use tree::DocumentTree;
pub use visitor::{
    walk_instance, walk_instance_mut, StyleReferenceCollector, StyleReferenceRewriter, Visitor,
    VisitorMut,
};
