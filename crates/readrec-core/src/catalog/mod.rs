//! Genre/mood/level catalog.
//!
//! Read-only lookup tables consumed when rendering option sets. The catalog
//! is loaded once at startup (built-in presets, optionally overridden by a
//! catalog file) and never mutated afterwards.

pub mod model;
pub mod preset;

pub use model::{Catalog, GenreEntry};
pub use preset::default_catalog;

/// The fixed reading levels, in display order.
pub const READING_LEVELS: [&str; 3] = ["Beginner", "Intermediate", "Expert"];
