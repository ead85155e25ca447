//! # Pagecraft Styles
//!
//! Style sources, the multi-axis override table and cascade resolution.
//!
//! ```text
//! Instance.style_source_ids ─┐
//! current breakpoint ────────┼──→ cascade::resolve ──→ Declaration
//! current state ─────────────┘          ↑
//!                                StyleRegistry (sources, overrides, breakpoints)
//! ```
//!
//! The override table is keyed by `(source, breakpoint, state, property)`;
//! at most one value exists per key. Properties are an open namespace.

pub mod breakpoint;
pub mod cascade;
pub mod error;
pub mod metadata;
pub mod naming;
pub mod registry;
pub mod source;
pub mod state;

pub use breakpoint::{
    breakpoint_for_width, default_breakpoints, Breakpoint, BreakpointId, BASE_BREAKPOINT,
};
pub use cascade::{resolve, resolve_with_metadata, Declaration};
pub use error::{StyleError, StyleResult};
pub use metadata::{
    Background, Filter, FilterFunction, Layer, Shadow, StyleMetadata, Transform, Transition,
};
pub use naming::NameCounters;
pub use registry::{PropertyMap, RegistryData, StyleRegistry};
pub use source::{
    DependencyEdge, NewSource, OverrideEntry, StyleSource, StyleSourceId, StyleSourceKind,
};
pub use state::InteractionState;
