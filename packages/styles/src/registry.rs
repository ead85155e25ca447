//! # Style Registry
//!
//! Owns the catalogue of style sources, the raw override table, the
//! breakpoint set, auto-naming counters and the fork dependency graph.
//!
//! ## Editability
//!
//! `local` sources are written through [`StyleRegistry::set_override`] and
//! friends. `token`/`preset` sources are shared; the normal write path
//! refuses them with [`StyleError::ImmutableSourceWrite`]. Callers are
//! expected to fork a local copy first (see the editor crate), record the
//! edge with [`StyleRegistry::set_dependency`], and write there. Shared
//! definitions themselves are authored through
//! [`StyleRegistry::edit_definition`].
//!
//! ## Batch path
//!
//! [`StyleRegistry::batch_create`] and [`StyleRegistry::batch_set_overrides`]
//! validate the whole batch up front, then apply it. Each item costs O(log n)
//! against the registry, never a scan of it.

use crate::breakpoint::{default_breakpoints, Breakpoint, BreakpointId, BASE_BREAKPOINT};
use crate::error::{StyleError, StyleResult};
use crate::metadata::StyleMetadata;
use crate::naming::NameCounters;
use crate::source::{
    DependencyEdge, NewSource, OverrideEntry, StyleSource, StyleSourceId, StyleSourceKind,
};
use crate::state::InteractionState;
use pagecraft_common::IdGenerator;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use tracing::{debug, info, instrument};

const SOURCE_ID_SEED: &str = "src";

/// Flat property → value map for one (source, breakpoint, state) layer
pub type PropertyMap = BTreeMap<String, String>;

#[derive(Debug, Clone, Default)]
struct SourceOverrides {
    by_breakpoint: BTreeMap<BreakpointId, BTreeMap<InteractionState, PropertyMap>>,
}

impl SourceOverrides {
    fn entry_count(&self) -> usize {
        self.by_breakpoint
            .values()
            .flat_map(BTreeMap::values)
            .map(BTreeMap::len)
            .sum()
    }

    fn is_empty(&self) -> bool {
        self.by_breakpoint.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct StyleRegistry {
    sources: BTreeMap<StyleSourceId, StyleSource>,
    names: HashMap<String, StyleSourceId>,
    overrides: HashMap<StyleSourceId, SourceOverrides>,
    breakpoints: Vec<Breakpoint>,
    dependencies: BTreeMap<StyleSourceId, BTreeSet<StyleSourceId>>,
    naming: NameCounters,
    ids: IdGenerator,
    version: u64,
}

impl StyleRegistry {
    pub fn new() -> Self {
        Self::with_breakpoints(default_breakpoints())
    }

    /// Create a registry with a custom breakpoint set.
    ///
    /// The base breakpoint is prepended when the set doesn't contain it.
    pub fn with_breakpoints(mut breakpoints: Vec<Breakpoint>) -> Self {
        if !breakpoints.iter().any(Breakpoint::is_base) {
            breakpoints.insert(0, Breakpoint::base());
        }

        Self {
            sources: BTreeMap::new(),
            names: HashMap::new(),
            overrides: HashMap::new(),
            breakpoints,
            dependencies: BTreeMap::new(),
            naming: NameCounters::new(),
            ids: IdGenerator::from_seed(SOURCE_ID_SEED),
            version: 0,
        }
    }

    /// Monotonic counter bumped by every mutation
    pub fn version(&self) -> u64 {
        self.version
    }

    fn touch(&mut self) {
        self.version += 1;
    }

    /// Replace the whole contents with an earlier copy, e.g. on undo.
    ///
    /// The version and the source id counter still move forward, so memoized
    /// resolutions keyed on the old number are never reused and an id that
    /// was handed out before the undo is never handed out again.
    pub fn restore(&mut self, snapshot: StyleRegistry) {
        let version = self.version.max(snapshot.version) + 1;
        let issued = self.ids.count();
        *self = snapshot;
        self.version = version;
        self.ids.advance_to(issued);
    }

    // ---------------------------------------------------------------------
    // Sources
    // ---------------------------------------------------------------------

    pub fn sources(&self) -> impl Iterator<Item = &StyleSource> {
        self.sources.values()
    }

    pub fn source(&self, id: &str) -> Option<&StyleSource> {
        self.sources.get(id)
    }

    pub fn source_by_name(&self, name: &str) -> Option<&StyleSource> {
        self.names.get(name).and_then(|id| self.sources.get(id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sources.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Allocate a new source.
    ///
    /// Without a `name`, the next auto-generated name for `component_type`
    /// is used.
    pub fn create_source(
        &mut self,
        kind: StyleSourceKind,
        name: Option<&str>,
        component_type: &str,
    ) -> StyleResult<StyleSourceId> {
        let name = match name {
            Some(name) => {
                if self.names.contains_key(name) {
                    return Err(StyleError::DuplicateName(name.to_string()));
                }
                name.to_string()
            }
            None => self.next_name(component_type),
        };

        let id = self.ids.new_id();
        debug!(source_id = %id, name = %name, kind = %kind, "Creating style source");
        self.insert_unchecked(StyleSource {
            id: id.clone(),
            kind,
            name,
            metadata: None,
        });
        self.touch();

        Ok(id)
    }

    fn insert_unchecked(&mut self, source: StyleSource) {
        self.names.insert(source.name.clone(), source.id.clone());
        self.sources.insert(source.id.clone(), source);
    }

    pub fn rename_source(&mut self, id: &str, new_name: &str) -> StyleResult<()> {
        let current = self
            .sources
            .get(id)
            .ok_or_else(|| StyleError::SourceNotFound(id.to_string()))?;

        if current.name == new_name {
            return Ok(());
        }
        if self.names.contains_key(new_name) {
            return Err(StyleError::DuplicateName(new_name.to_string()));
        }

        let old_name = current.name.clone();
        self.names.remove(&old_name);
        self.names.insert(new_name.to_string(), id.to_string());
        if let Some(source) = self.sources.get_mut(id) {
            source.name = new_name.to_string();
        }
        debug!(source_id = %id, old_name = %old_name, new_name = %new_name, "Renamed style source");
        self.touch();

        Ok(())
    }

    /// Remove a source with its overrides and fork edges.
    ///
    /// Instances still referencing `id` are left alone; the cascade skips
    /// unknown ids.
    pub fn delete_source(&mut self, id: &str) -> StyleResult<StyleSource> {
        let source = self
            .sources
            .remove(id)
            .ok_or_else(|| StyleError::SourceNotFound(id.to_string()))?;

        self.names.remove(&source.name);
        self.overrides.remove(id);
        self.dependencies.remove(id);
        for dependents in self.dependencies.values_mut() {
            dependents.remove(id);
        }
        self.dependencies.retain(|_, dependents| !dependents.is_empty());

        debug!(source_id = %id, name = %source.name, "Deleted style source");
        self.touch();

        Ok(source)
    }

    /// Ids of every source not contained in `referenced`
    pub fn unreferenced_sources(&self, referenced: &HashSet<&str>) -> Vec<StyleSourceId> {
        self.sources
            .keys()
            .filter(|id| !referenced.contains(id.as_str()))
            .cloned()
            .collect()
    }

    // ---------------------------------------------------------------------
    // Overrides
    // ---------------------------------------------------------------------

    fn check_writable(&self, source_id: &str) -> StyleResult<()> {
        let source = self
            .sources
            .get(source_id)
            .ok_or_else(|| StyleError::SourceNotFound(source_id.to_string()))?;

        if !source.is_editable() {
            return Err(StyleError::ImmutableSourceWrite {
                id: source_id.to_string(),
                kind: source.kind,
            });
        }
        Ok(())
    }

    fn check_breakpoint(&self, breakpoint_id: &str) -> StyleResult<()> {
        if self.has_breakpoint(breakpoint_id) {
            Ok(())
        } else {
            Err(StyleError::BreakpointNotFound(breakpoint_id.to_string()))
        }
    }

    fn write_unchecked(
        &mut self,
        source_id: &str,
        breakpoint_id: &str,
        state: InteractionState,
        property: &str,
        value: &str,
    ) {
        self.overrides
            .entry(source_id.to_string())
            .or_default()
            .by_breakpoint
            .entry(breakpoint_id.to_string())
            .or_default()
            .entry(state)
            .or_default()
            .insert(property.to_string(), value.to_string());
    }

    /// Write one entry on a local source.
    ///
    /// Omitted axes default to the base breakpoint and the default state.
    /// Writing the same key again replaces the value.
    pub fn set_override(
        &mut self,
        source_id: &str,
        property: &str,
        value: &str,
        breakpoint: Option<&str>,
        state: Option<InteractionState>,
    ) -> StyleResult<()> {
        self.check_writable(source_id)?;
        self.write_override(source_id, property, value, breakpoint, state)
    }

    /// Author the definition of any source, shared ones included
    pub fn edit_definition(
        &mut self,
        source_id: &str,
        property: &str,
        value: &str,
        breakpoint: Option<&str>,
        state: Option<InteractionState>,
    ) -> StyleResult<()> {
        if !self.contains(source_id) {
            return Err(StyleError::SourceNotFound(source_id.to_string()));
        }
        self.write_override(source_id, property, value, breakpoint, state)
    }

    fn write_override(
        &mut self,
        source_id: &str,
        property: &str,
        value: &str,
        breakpoint: Option<&str>,
        state: Option<InteractionState>,
    ) -> StyleResult<()> {
        let breakpoint = breakpoint.unwrap_or(BASE_BREAKPOINT);
        let state = state.unwrap_or_default();
        self.check_breakpoint(breakpoint)?;

        debug!(
            source_id = %source_id,
            breakpoint = %breakpoint,
            state = %state,
            property = %property,
            "Setting override"
        );
        self.write_unchecked(source_id, breakpoint, state, property, value);
        self.touch();
        Ok(())
    }

    /// Remove a single property; returns the previous value
    pub fn remove_override(
        &mut self,
        source_id: &str,
        property: &str,
        breakpoint: Option<&str>,
        state: Option<InteractionState>,
    ) -> StyleResult<Option<String>> {
        self.check_writable(source_id)?;

        let breakpoint = breakpoint.unwrap_or(BASE_BREAKPOINT);
        let state = state.unwrap_or_default();
        let Some(overrides) = self.overrides.get_mut(source_id) else {
            return Ok(None);
        };
        let Some(states) = overrides.by_breakpoint.get_mut(breakpoint) else {
            return Ok(None);
        };
        let Some(layer) = states.get_mut(&state) else {
            return Ok(None);
        };

        let removed = layer.remove(property);
        if layer.is_empty() {
            states.remove(&state);
        }
        if states.is_empty() {
            overrides.by_breakpoint.remove(breakpoint);
        }
        if overrides.is_empty() {
            self.overrides.remove(source_id);
        }
        if removed.is_some() {
            self.touch();
        }
        Ok(removed)
    }

    /// Clear every entry of `source_id` matching the given axes.
    ///
    /// An omitted axis matches all values on that axis. Returns the number
    /// of entries removed.
    pub fn reset_overrides(
        &mut self,
        source_id: &str,
        breakpoint: Option<&str>,
        state: Option<InteractionState>,
    ) -> StyleResult<usize> {
        self.check_writable(source_id)?;

        let Some(overrides) = self.overrides.get_mut(source_id) else {
            return Ok(0);
        };

        let mut removed = 0;
        overrides.by_breakpoint.retain(|bp, states| {
            if breakpoint.map_or(false, |b| b != bp) {
                return true;
            }
            states.retain(|st, layer| {
                let matches = state.map_or(true, |s| s == *st);
                if matches {
                    removed += layer.len();
                }
                !matches
            });
            !states.is_empty()
        });
        if overrides.is_empty() {
            self.overrides.remove(source_id);
        }

        if removed > 0 {
            debug!(source_id = %source_id, removed, "Reset overrides");
            self.touch();
        }
        Ok(removed)
    }

    pub fn get_override(
        &self,
        source_id: &str,
        property: &str,
        breakpoint: Option<&str>,
        state: Option<InteractionState>,
    ) -> Option<&str> {
        self.layer(source_id, breakpoint.unwrap_or(BASE_BREAKPOINT), state.unwrap_or_default())
            .and_then(|layer| layer.get(property))
            .map(String::as_str)
    }

    /// The raw entries of one (source, breakpoint, state) layer
    pub fn layer(
        &self,
        source_id: &str,
        breakpoint: &str,
        state: InteractionState,
    ) -> Option<&PropertyMap> {
        self.overrides
            .get(source_id)?
            .by_breakpoint
            .get(breakpoint)?
            .get(&state)
    }

    /// Every entry stored for `source_id`, ordered by breakpoint, state, property
    pub fn overrides_of(&self, source_id: &str) -> Vec<OverrideEntry> {
        let Some(overrides) = self.overrides.get(source_id) else {
            return Vec::new();
        };

        overrides
            .by_breakpoint
            .iter()
            .flat_map(|(bp, states)| {
                states.iter().flat_map(move |(state, layer)| {
                    layer.iter().map(move |(property, value)| OverrideEntry {
                        source_id: source_id.to_string(),
                        breakpoint_id: bp.clone(),
                        state: *state,
                        property: property.clone(),
                        value: value.clone(),
                    })
                })
            })
            .collect()
    }

    pub fn override_count(&self) -> usize {
        self.overrides.values().map(SourceOverrides::entry_count).sum()
    }

    /// Copy every entry and the metadata of `from` onto `to`
    pub fn copy_definition(&mut self, from: &str, to: &str) -> StyleResult<usize> {
        if !self.contains(from) {
            return Err(StyleError::SourceNotFound(from.to_string()));
        }
        if !self.contains(to) {
            return Err(StyleError::SourceNotFound(to.to_string()));
        }

        let entries = self.overrides_of(from);
        for entry in &entries {
            self.write_unchecked(
                to,
                &entry.breakpoint_id,
                entry.state,
                &entry.property,
                &entry.value,
            );
        }
        let metadata = self.sources.get(from).and_then(|s| s.metadata.clone());
        if let Some(target) = self.sources.get_mut(to) {
            target.metadata = metadata;
        }
        self.touch();

        Ok(entries.len())
    }

    // ---------------------------------------------------------------------
    // Metadata
    // ---------------------------------------------------------------------

    pub fn metadata(&self, source_id: &str) -> Option<&StyleMetadata> {
        self.sources.get(source_id).and_then(|s| s.metadata.as_ref())
    }

    /// Replace the structured metadata of a local source
    pub fn set_metadata(
        &mut self,
        source_id: &str,
        metadata: Option<StyleMetadata>,
    ) -> StyleResult<()> {
        self.check_writable(source_id)?;

        let metadata = metadata.filter(|m| !m.is_empty());
        if let Some(source) = self.sources.get_mut(source_id) {
            source.metadata = metadata;
        }
        debug!(source_id = %source_id, "Updated style metadata");
        self.touch();
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Naming
    // ---------------------------------------------------------------------

    /// Claim the next unused name for `component_type`
    pub fn next_name(&mut self, component_type: &str) -> String {
        let names = &self.names;
        self.naming.next_name(component_type, |name| names.contains_key(name))
    }

    /// The name [`next_name`](Self::next_name) would return, without claiming it
    pub fn preview_name(&self, component_type: &str) -> String {
        self.naming
            .preview_name(component_type, |name| self.names.contains_key(name))
    }

    /// Move naming counters past every generated-looking name already registered
    pub fn init_counters_from_existing(&mut self) {
        let names = &self.names;
        self.naming.init_from_existing(names.keys().map(String::as_str));
    }

    // ---------------------------------------------------------------------
    // Editability / dependency graph
    // ---------------------------------------------------------------------

    /// `true` for local sources; unknown ids are not editable
    pub fn is_editable(&self, source_id: &str) -> bool {
        self.sources.get(source_id).map_or(false, StyleSource::is_editable)
    }

    pub fn set_dependency(&mut self, base_id: &str, dependent_id: &str) -> StyleResult<()> {
        for id in [base_id, dependent_id] {
            if !self.contains(id) {
                return Err(StyleError::SourceNotFound(id.to_string()));
            }
        }

        let inserted = self
            .dependencies
            .entry(base_id.to_string())
            .or_default()
            .insert(dependent_id.to_string());
        if inserted {
            debug!(base_id = %base_id, dependent_id = %dependent_id, "Recorded fork dependency");
            self.touch();
        }
        Ok(())
    }

    /// Returns whether the edge existed
    pub fn remove_dependency(&mut self, base_id: &str, dependent_id: &str) -> bool {
        let Some(dependents) = self.dependencies.get_mut(base_id) else {
            return false;
        };
        let removed = dependents.remove(dependent_id);
        if dependents.is_empty() {
            self.dependencies.remove(base_id);
        }
        if removed {
            self.touch();
        }
        removed
    }

    pub fn dependents_of(&self, base_id: &str) -> Vec<&str> {
        self.dependencies
            .get(base_id)
            .map(|deps| deps.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// The shared source `dependent_id` was forked from, if any
    pub fn base_of(&self, dependent_id: &str) -> Option<&str> {
        self.dependencies
            .iter()
            .find(|(_, deps)| deps.contains(dependent_id))
            .map(|(base, _)| base.as_str())
    }

    pub fn dependency_edges(&self) -> Vec<DependencyEdge> {
        self.dependencies
            .iter()
            .flat_map(|(base, deps)| {
                deps.iter().map(move |dep| DependencyEdge {
                    base_id: base.clone(),
                    dependent_id: dep.clone(),
                })
            })
            .collect()
    }

    // ---------------------------------------------------------------------
    // Breakpoints
    // ---------------------------------------------------------------------

    pub fn breakpoints(&self) -> &[Breakpoint] {
        &self.breakpoints
    }

    pub fn breakpoint(&self, id: &str) -> Option<&Breakpoint> {
        self.breakpoints.iter().find(|bp| bp.id == id)
    }

    pub fn has_breakpoint(&self, id: &str) -> bool {
        self.breakpoint(id).is_some()
    }

    pub fn add_breakpoint(&mut self, breakpoint: Breakpoint) -> StyleResult<()> {
        if self.has_breakpoint(&breakpoint.id) {
            return Err(StyleError::DuplicateBreakpoint(breakpoint.id));
        }
        debug!(breakpoint = %breakpoint.id, "Adding breakpoint");
        self.breakpoints.push(breakpoint);
        self.touch();
        Ok(())
    }

    /// Remove a breakpoint and every override stored under it
    pub fn remove_breakpoint(&mut self, id: &str) -> StyleResult<Breakpoint> {
        if id == BASE_BREAKPOINT {
            return Err(StyleError::BaseBreakpointRequired);
        }
        let pos = self
            .breakpoints
            .iter()
            .position(|bp| bp.id == id)
            .ok_or_else(|| StyleError::BreakpointNotFound(id.to_string()))?;

        for overrides in self.overrides.values_mut() {
            overrides.by_breakpoint.remove(id);
        }
        self.overrides.retain(|_, o| !o.is_empty());
        self.touch();

        Ok(self.breakpoints.remove(pos))
    }

    // ---------------------------------------------------------------------
    // Batch path
    // ---------------------------------------------------------------------

    /// Create many sources in one pass.
    ///
    /// Same end state as calling [`create_source`](Self::create_source) for
    /// each item in order. On error nothing is created.
    #[instrument(skip(self, sources), fields(count = sources.len()))]
    pub fn batch_create(&mut self, sources: Vec<NewSource>) -> StyleResult<Vec<StyleSourceId>> {
        let mut naming = self.naming.clone();
        let mut ids = self.ids.clone();
        let mut pending_names: HashSet<String> = HashSet::with_capacity(sources.len());
        let mut planned = Vec::with_capacity(sources.len());

        for request in sources {
            let name = match request.name {
                Some(name) => {
                    if self.names.contains_key(&name) || pending_names.contains(&name) {
                        return Err(StyleError::DuplicateName(name));
                    }
                    name
                }
                None => naming.next_name(&request.component_type, |candidate| {
                    self.names.contains_key(candidate) || pending_names.contains(candidate)
                }),
            };
            pending_names.insert(name.clone());
            planned.push(StyleSource {
                id: ids.new_id(),
                kind: request.kind,
                name,
                metadata: None,
            });
        }

        let created: Vec<StyleSourceId> = planned.iter().map(|s| s.id.clone()).collect();
        for source in planned {
            self.insert_unchecked(source);
        }
        self.naming = naming;
        self.ids = ids;
        self.touch();

        info!(created = created.len(), "Batch-created style sources");
        Ok(created)
    }

    /// Write many overrides in one pass.
    ///
    /// Every entry is validated (source exists and is local, breakpoint
    /// exists) before anything is written. Later entries with the same key
    /// replace earlier ones, as sequential calls would.
    #[instrument(skip(self, entries), fields(count = entries.len()))]
    pub fn batch_set_overrides(&mut self, entries: Vec<OverrideEntry>) -> StyleResult<usize> {
        for entry in &entries {
            self.check_writable(&entry.source_id)?;
            self.check_breakpoint(&entry.breakpoint_id)?;
        }

        for entry in &entries {
            self.write_unchecked(
                &entry.source_id,
                &entry.breakpoint_id,
                entry.state,
                &entry.property,
                &entry.value,
            );
        }
        self.touch();

        info!(written = entries.len(), "Batch-set overrides");
        Ok(entries.len())
    }
}

impl Default for StyleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Persisted shape of the registry: flat tables, easy to diff and import
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryData {
    #[serde(default)]
    pub sources: Vec<StyleSource>,
    #[serde(default)]
    pub overrides: Vec<OverrideEntry>,
    #[serde(default = "default_breakpoints")]
    pub breakpoints: Vec<Breakpoint>,
    #[serde(default)]
    pub dependencies: Vec<DependencyEdge>,
}

impl From<StyleRegistry> for RegistryData {
    fn from(registry: StyleRegistry) -> Self {
        let mut overrides = Vec::with_capacity(registry.override_count());
        for id in registry.sources.keys() {
            overrides.extend(registry.overrides_of(id));
        }

        Self {
            dependencies: registry.dependency_edges(),
            sources: registry.sources.into_values().collect(),
            overrides,
            breakpoints: registry.breakpoints,
        }
    }
}

impl TryFrom<RegistryData> for StyleRegistry {
    type Error = StyleError;

    fn try_from(data: RegistryData) -> Result<Self, Self::Error> {
        let mut breakpoint_ids = HashSet::new();
        for bp in &data.breakpoints {
            if !breakpoint_ids.insert(bp.id.as_str()) {
                return Err(StyleError::DuplicateBreakpoint(bp.id.clone()));
            }
        }
        if !breakpoint_ids.contains(BASE_BREAKPOINT) {
            return Err(StyleError::BaseBreakpointRequired);
        }

        let mut registry = StyleRegistry::with_breakpoints(data.breakpoints.clone());

        for source in data.sources {
            if registry.sources.contains_key(&source.id) {
                return Err(StyleError::DuplicateId(source.id));
            }
            if registry.names.contains_key(&source.name) {
                return Err(StyleError::DuplicateName(source.name));
            }
            registry.ids.observe(&source.id);
            registry.insert_unchecked(source);
        }

        for entry in data.overrides {
            if !registry.contains(&entry.source_id) {
                return Err(StyleError::InvalidData(format!(
                    "override for unknown source {}",
                    entry.source_id
                )));
            }
            if !breakpoint_ids.contains(entry.breakpoint_id.as_str()) {
                return Err(StyleError::BreakpointNotFound(entry.breakpoint_id));
            }
            registry.write_unchecked(
                &entry.source_id,
                &entry.breakpoint_id,
                entry.state,
                &entry.property,
                &entry.value,
            );
        }

        for edge in data.dependencies {
            registry.set_dependency(&edge.base_id, &edge.dependent_id)?;
        }

        registry.init_counters_from_existing();
        registry.version = 0;
        Ok(registry)
    }
}

impl Serialize for StyleRegistry {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        RegistryData::from(self.clone()).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for StyleRegistry {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let data = RegistryData::deserialize(deserializer)?;
        StyleRegistry::try_from(data).map_err(serde::de::Error::custom)
    }
}
