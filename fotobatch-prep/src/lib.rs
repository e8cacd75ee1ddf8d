//! # Fotobatch Preparation Engine
//!
//! Turns tabular museum photo metadata into validated publication
//! documents plus the curated mapping tables that back them. The
//! pipeline stages, in run order:
//!
//! 1. [`tabular`] — parse the delimited source datasets.
//! 2. [`merge`] — unify two institutions' paired datasets, attaching
//!    archive cards and surfacing structural problems.
//! 3. [`builder`] — scan the unified records and update the mapping
//!    store for the next curation round.
//! 4. [`render`] — produce one document (or one tagged rejection) per
//!    record against the frozen, curator-edited store.
//! 5. [`report`] — serialize publication units and the reject report.
//!
//! The mapping builder must complete before any rendering: the renderer
//! assumes a stable, fully updated store for the whole run.

pub mod builder;
pub mod links;
pub mod merge;
pub mod render;
pub mod report;
pub mod tabular;

pub use builder::update_mappings;
pub use merge::{merge, MergeOutcome};
pub use render::{RenderOutcome, RenderedDocument, Renderer};
