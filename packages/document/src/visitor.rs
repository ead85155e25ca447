use crate::instance::Instance;
use std::collections::BTreeSet;

/// Visitor pattern for traversing an instance tree immutably
///
/// Default implementations walk the whole subtree. Override specific
/// visit_* methods to act on the nodes you care about.
pub trait Visitor: Sized {
    fn visit_instance(&mut self, instance: &Instance) {
        walk_instance(self, instance);
    }

    fn visit_style_reference(&mut self, _source_id: &str) {
        // Leaf
    }
}

/// Mutable counterpart of [`Visitor`]
pub trait VisitorMut: Sized {
    fn visit_instance_mut(&mut self, instance: &mut Instance) {
        walk_instance_mut(self, instance);
    }

    fn visit_style_reference_mut(&mut self, _source_id: &mut String) {
        // Leaf
    }
}

pub fn walk_instance<V: Visitor>(visitor: &mut V, instance: &Instance) {
    for source_id in &instance.style_source_ids {
        visitor.visit_style_reference(source_id);
    }
    for child in &instance.children {
        visitor.visit_instance(child);
    }
}

pub fn walk_instance_mut<V: VisitorMut>(visitor: &mut V, instance: &mut Instance) {
    for source_id in &mut instance.style_source_ids {
        visitor.visit_style_reference_mut(source_id);
    }
    for child in &mut instance.children {
        visitor.visit_instance_mut(child);
    }
}

/// Collects every style source id referenced anywhere in a subtree
#[derive(Debug, Default)]
pub struct StyleReferenceCollector {
    pub references: BTreeSet<String>,
}

impl StyleReferenceCollector {
    pub fn collect(root: &Instance) -> BTreeSet<String> {
        let mut collector = Self::default();
        collector.visit_instance(root);
        collector.references
    }
}

impl Visitor for StyleReferenceCollector {
    fn visit_style_reference(&mut self, source_id: &str) {
        self.references.insert(source_id.to_string());
    }
}

/// Repoints every reference to `from` so it names `to` instead
pub struct StyleReferenceRewriter<'a> {
    pub from: &'a str,
    pub to: &'a str,
    pub rewritten: usize,
}

impl<'a> StyleReferenceRewriter<'a> {
    pub fn new(from: &'a str, to: &'a str) -> Self {
        Self { from, to, rewritten: 0 }
    }
}

impl VisitorMut for StyleReferenceRewriter<'_> {
    fn visit_style_reference_mut(&mut self, source_id: &mut String) {
        if source_id == self.from {
            *source_id = self.to.to_string();
            self.rewritten += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementType;

    fn tree() -> Instance {
        Instance::new("root", ElementType::Body)
            .with_style_source("page")
            .with_child(
                Instance::new("a", ElementType::Container)
                    .with_style_source("card")
                    .with_style_source("shadow")
                    .with_child(Instance::new("b", ElementType::Button).with_style_source("card")),
            )
    }

    #[test]
    fn test_collects_unique_references() {
        let refs = StyleReferenceCollector::collect(&tree());
        let refs: Vec<&str> = refs.iter().map(String::as_str).collect();
        assert_eq!(refs, vec!["card", "page", "shadow"]);
    }

    #[test]
    fn test_rewriter_repoints_all_occurrences() {
        let mut root = tree();
        let mut rewriter = StyleReferenceRewriter::new("card", "card-local");
        rewriter.visit_instance_mut(&mut root);

        assert_eq!(rewriter.rewritten, 2);
        assert_eq!(root.find("b").unwrap().style_source_ids, vec!["card-local"]);
    }
}
