//! Nesting rules enforced on every structural mutation.
//!
//! A drag-and-drop surface can call [`can_place`] for live feedback; the tree
//! calls [`check_subtree`] before it commits anything.

use crate::element::ElementType;
use crate::errors::{DocumentError, DocumentResult};
use crate::instance::Instance;
use crate::props::validate_props;

/// Can an element of type `child` sit directly under `parent`, given the
/// types of every ancestor from the root down to `parent` (inclusive)?
pub fn can_place(child: ElementType, ancestors: &[ElementType]) -> DocumentResult<()> {
    let Some(&parent) = ancestors.last() else {
        return Ok(());
    };

    if !parent.accepts_children() {
        return Err(violation(child, parent, "parent does not accept children"));
    }

    if child == ElementType::Body {
        return Err(violation(child, parent, "body is only valid as the root"));
    }

    if child.is_page_region() {
        if let Some(&region) = ancestors.iter().rev().find(|t| t.is_page_region()) {
            return Err(violation(
                child,
                parent,
                &format!("page regions cannot nest (inside a {})", region),
            ));
        }
    }

    Ok(())
}

/// Validate `node` and everything below it as if placed under `ancestors`.
///
/// `ancestors` is used as scratch space and is restored before returning.
pub fn check_subtree(node: &Instance, ancestors: &mut Vec<ElementType>) -> DocumentResult<()> {
    can_place(node.element_type, ancestors)?;
    validate_props(node.element_type, &node.props)?;

    ancestors.push(node.element_type);
    let result = node
        .children
        .iter()
        .try_for_each(|child| check_subtree(child, ancestors));
    ancestors.pop();
    result
}

fn violation(child: ElementType, parent: ElementType, reason: &str) -> DocumentError {
    DocumentError::PlacementViolation {
        child,
        parent,
        reason: reason.to_string(),
    }
}
