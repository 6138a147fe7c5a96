//! Frame classifier orchestrating the terrain pipeline.
//!
//! Overview
//! - Converts raw depth to a smoothed metric height map with validity.
//! - Detects buildings on the height map through the hill-invariant local
//!   height difference, with an absolute-height fallback.
//! - Segments roads and parks on the color frame; road fragments inside the
//!   building shadow halo are dropped.
//! - Resolves overlaps with the fixed priority building > park > road.
//!
//! Modules
//! - [`params`] – every threshold of the pipeline, serde-configurable.
//! - `pipeline` – the [`TerrainClassifier`] implementation.
//!
//! The classifier holds parameters only. Each call works on its own buffers
//! and keeps nothing from previous frames, so one instance can serve several
//! threads at once.

pub mod params;
mod pipeline;

pub use params::{
    BuildingParams, ClassifierParams, HeightParams, HsvRange, NoiseParams, ParkParams,
    RoadParams, ShadowParams, SmoothingKind,
};
pub use pipeline::{classify, TerrainClassifier};
