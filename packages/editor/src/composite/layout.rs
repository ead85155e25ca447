//! Structural layout operations on composites.
//!
//! Every function here works on whichever tree holds the composite (a page
//! or a shared component) and writes layout styles into local sources that
//! belong to the slot/container/part being styled.

use super::projection::{project_semantic_view, SemanticView, CONTAINER_PART};
use super::template::{LayoutTemplate, StyleValues};
use super::SemanticRole;
use crate::errors::{EditorError, EditorResult};
use pagecraft_common::IdGenerator;
use pagecraft_document::{
    CompositeConfig, DocumentTree, ElementType, Instance, InstancePatch, SlotPosition, PART_PROP,
    SLOT_PROP,
};
use pagecraft_styles::{StyleRegistry, StyleSourceId, StyleSourceKind};
use tracing::{debug, info, instrument};

const DISPLAY: &str = "display";
const HIDDEN: &str = "none";
const VISIBLE: &str = "flex";

/// Mutable state a layout operation needs
pub struct LayoutContext<'a> {
    pub tree: &'a mut DocumentTree,
    pub styles: &'a mut StyleRegistry,
    pub ids: &'a mut IdGenerator,
}

impl LayoutContext<'_> {
    fn composite(&self, id: &str) -> EditorResult<&Instance> {
        let instance = self.tree.get(id)?;
        if !instance.is_composite() {
            return Err(EditorError::NotComposite(id.to_string()));
        }
        Ok(instance)
    }

    fn view(&self, composite_id: &str) -> EditorResult<SemanticView> {
        Ok(project_semantic_view(self.composite(composite_id)?))
    }

    /// Last editable source on `instance_id`, creating and attaching one if
    /// it has none. Shared sources are never written through here.
    fn layout_source(&mut self, instance_id: &str) -> EditorResult<StyleSourceId> {
        if let Some(source) = self.existing_layout_source(instance_id)? {
            return Ok(source);
        }

        let instance = self.tree.get(instance_id)?;
        let mut source_ids = instance.style_source_ids.clone();
        let source = self
            .styles
            .create_source(StyleSourceKind::Local, None, instance.element_type.as_str())?;
        source_ids.push(source.clone());
        self.tree
            .update(instance_id, InstancePatch::new().style_source_ids(source_ids))?;
        Ok(source)
    }

    fn existing_layout_source(&self, instance_id: &str) -> EditorResult<Option<StyleSourceId>> {
        let instance = self.tree.get(instance_id)?;
        Ok(instance
            .style_source_ids
            .iter()
            .rev()
            .find(|id| self.styles.is_editable(id))
            .cloned())
    }

    fn write_styles(&mut self, instance_id: &str, values: &StyleValues) -> EditorResult<()> {
        if values.is_empty() {
            return Ok(());
        }
        let source = self.layout_source(instance_id)?;
        for (property, value) in values {
            self.styles.set_override(&source, property, value, None, None)?;
        }
        Ok(())
    }

    fn set_display(&mut self, instance_id: &str, value: &str) -> EditorResult<()> {
        let source = self.layout_source(instance_id)?;
        if self.styles.get_override(&source, DISPLAY, None, None) != Some(value) {
            self.styles.set_override(&source, DISPLAY, value, None, None)?;
        }
        Ok(())
    }

    fn clear_hidden(&mut self, instance_id: &str) -> EditorResult<()> {
        if let Some(source) = self.existing_layout_source(instance_id)? {
            if self.styles.get_override(&source, DISPLAY, None, None) == Some(HIDDEN) {
                self.styles.remove_override(&source, DISPLAY, None, None)?;
            }
        }
        Ok(())
    }

    fn new_container(
        &mut self,
        composite_type: ElementType,
        marker: (&str, &str),
    ) -> EditorResult<Instance> {
        let source = self.styles.create_source(
            StyleSourceKind::Local,
            None,
            &format!("{}-{}", composite_type.as_str(), marker.1),
        )?;
        Ok(Instance::new(self.ids.new_id(), ElementType::Container)
            .with_prop(marker.0, marker.1)
            .with_style_source(source))
    }
}

/// Make sure `composite_id` has the container → slots structure.
///
/// A legacy flat composite is migrated once: its children move into a new
/// container, the three slots are created, and the brand mark goes left
/// while the link list and call-to-action go right.
pub fn ensure_slots(ctx: &mut LayoutContext<'_>, composite_id: &str) -> EditorResult<SemanticView> {
    let view = ctx.view(composite_id)?;
    if view.container.is_some() && view.slots.len() == SlotPosition::ALL.len() {
        return Ok(view);
    }

    let composite_type = ctx.composite(composite_id)?.element_type;
    let migrating = !view.has_slots();

    let container_id = match view.container.clone() {
        Some(id) => id,
        None => {
            let legacy: Vec<String> = ctx
                .tree
                .get(composite_id)?
                .children
                .iter()
                .map(|c| c.id.clone())
                .collect();
            let container = ctx.new_container(composite_type, (PART_PROP, CONTAINER_PART))?;
            let container_id = ctx.tree.insert(container, Some(composite_id), Some(0))?;
            for child in legacy {
                ctx.tree.move_instance(&child, &container_id, None)?;
            }
            container_id
        }
    };

    for (index, position) in SlotPosition::ALL.into_iter().enumerate() {
        if view.slots.contains_key(&position) {
            continue;
        }
        let slot = ctx.new_container(composite_type, (SLOT_PROP, position.as_str()))?;
        ctx.tree.insert(slot, Some(&container_id), Some(index))?;
    }

    let view = ctx.view(composite_id)?;
    if migrating {
        for role in SemanticRole::ALL {
            let (Some(part), None) = (view.part(role), view.slot_of(role)) else {
                continue;
            };
            let target = match role {
                SemanticRole::BrandMark => SlotPosition::Left,
                _ => SlotPosition::Right,
            };
            if let Some(slot) = view.slot(target) {
                ctx.tree.move_instance(part, slot, None)?;
            }
        }
        info!(composite = %composite_id, "Migrated composite to slot layout");
    }

    refresh_slot_visibility(ctx, composite_id)?;
    ctx.view(composite_id)
}

/// Switch `composite_id` to `template`, moving existing parts into place
#[instrument(skip(ctx, template), fields(template = %template.id))]
pub fn apply_template(
    ctx: &mut LayoutContext<'_>,
    composite_id: &str,
    template: &LayoutTemplate,
) -> EditorResult<()> {
    arrange_template(ctx, composite_id, template)?;

    let config = CompositeConfig {
        template_id: Some(template.id.clone()),
        brand_position: template.brand_position(),
    };
    ctx.tree
        .update(composite_id, InstancePatch::new().composite_config(config))?;
    Ok(())
}

fn arrange_template(
    ctx: &mut LayoutContext<'_>,
    composite_id: &str,
    template: &LayoutTemplate,
) -> EditorResult<()> {
    let view = ensure_slots(ctx, composite_id)?;

    let arrangement: Vec<(SlotPosition, Vec<SemanticRole>)> = SlotPosition::ALL
        .into_iter()
        .map(|pos| (pos, template.roles_in(pos).to_vec()))
        .collect();
    place_parts(ctx, &view, &arrangement)?;

    if let Some(container) = &view.container {
        ctx.write_styles(container, &template.container_styles)?;
    }
    for (position, slot) in &view.slots {
        if let Some(values) = template.slot_styles(*position) {
            ctx.write_styles(slot, values)?;
        }
    }

    if let Some(links) = view.part(SemanticRole::LinkList) {
        if template.hide_link_list {
            ctx.set_display(links, HIDDEN)?;
        } else {
            ctx.clear_hidden(links)?;
        }
    }

    refresh_slot_visibility(ctx, composite_id)?;
    info!(composite = %composite_id, template = %template.id, "Applied layout template");
    Ok(())
}

/// Fixed arrangement for each brand position
fn brand_arrangement(position: SlotPosition) -> Vec<(SlotPosition, Vec<SemanticRole>)> {
    use SemanticRole::*;
    use SlotPosition::*;

    match position {
        Left => vec![
            (Left, vec![BrandMark]),
            (Center, vec![]),
            (Right, vec![LinkList, CallToAction]),
        ],
        Center => vec![
            (Left, vec![LinkList]),
            (Center, vec![BrandMark]),
            (Right, vec![CallToAction]),
        ],
        Right => vec![
            (Left, vec![LinkList, CallToAction]),
            (Center, vec![]),
            (Right, vec![BrandMark]),
        ],
    }
}

/// Redistribute the parts of `composite_id` around a brand position
pub fn set_brand_position(
    ctx: &mut LayoutContext<'_>,
    composite_id: &str,
    position: SlotPosition,
) -> EditorResult<()> {
    arrange_brand(ctx, composite_id, position)?;

    let mut config = ctx
        .tree
        .get(composite_id)?
        .composite_config
        .clone()
        .unwrap_or_default();
    config.brand_position = Some(position);
    ctx.tree
        .update(composite_id, InstancePatch::new().composite_config(config))?;
    Ok(())
}

fn arrange_brand(
    ctx: &mut LayoutContext<'_>,
    composite_id: &str,
    position: SlotPosition,
) -> EditorResult<()> {
    let view = ensure_slots(ctx, composite_id)?;
    place_parts(ctx, &view, &brand_arrangement(position))?;
    refresh_slot_visibility(ctx, composite_id)?;
    debug!(composite = %composite_id, position = %position, "Set brand position");
    Ok(())
}

/// Move each present part to the end of its target slot, in arrangement order
fn place_parts(
    ctx: &mut LayoutContext<'_>,
    view: &SemanticView,
    arrangement: &[(SlotPosition, Vec<SemanticRole>)],
) -> EditorResult<()> {
    for (position, roles) in arrangement {
        let Some(slot) = view.slot(*position) else {
            continue;
        };
        for role in roles {
            if let Some(part) = view.part(*role) {
                ctx.tree.move_instance(part, slot, None)?;
            }
        }
    }
    Ok(())
}

/// Hide empty slots and show occupied ones
pub fn refresh_slot_visibility(
    ctx: &mut LayoutContext<'_>,
    composite_id: &str,
) -> EditorResult<()> {
    let view = ctx.view(composite_id)?;
    for slot in view.slots.values() {
        let empty = ctx.tree.get(slot)?.children.is_empty();
        ctx.set_display(slot, if empty { HIDDEN } else { VISIBLE })?;
    }
    Ok(())
}

/// Re-derive the child tree from the composite's own config
pub fn sync_composite(ctx: &mut LayoutContext<'_>, composite_id: &str) -> EditorResult<()> {
    let config = ctx
        .composite(composite_id)?
        .composite_config
        .clone()
        .unwrap_or_default();

    if let Some(template_id) = &config.template_id {
        let template = super::find_template(template_id)
            .ok_or_else(|| EditorError::UnknownTemplate(template_id.clone()))?;
        arrange_template(ctx, composite_id, &template)?;
    }
    if let Some(position) = config.brand_position {
        arrange_brand(ctx, composite_id, position)?;
    }

    debug!(composite = %composite_id, "Synchronized composite");
    Ok(())
}
