#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod classifier;
pub mod diagnostics;
pub mod error;
pub mod image;
pub mod types;

// Pipeline stages, callable on their own.
pub mod building;
pub mod conflict;
pub mod height;
pub mod noise;
pub mod park;
pub mod road;

// Building blocks shared by the stages.
pub mod color;
pub mod filters;
pub mod regions;

// Command-line configuration.
pub mod config;

// --- High-level re-exports -------------------------------------------------

// Main entry points: classifier + results.
pub use crate::classifier::{classify, ClassifierParams, TerrainClassifier};
pub use crate::error::FrameError;
pub use crate::types::{LabelMap, TerrainClass, TerrainMasks, TerrainSummary};

// High-level diagnostics returned by the classifier.
pub use crate::diagnostics::{ClassificationReport, ClassificationTrace};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use sandbox_terrain::prelude::*;
///
/// # fn main() {
/// let (w, h) = (64usize, 48usize);
/// let depth = vec![300u16; w * h];
/// let bgr = vec![128u8; w * h * 3];
///
/// let masks = classify(
///     &DepthImage::new(w, h, &depth),
///     &ColorImage::new(w, h, ChannelOrder::Bgr, &bgr),
///     0.001,
///     None,
/// )
/// .expect("well-formed frame");
/// println!("building px: {}", masks.building.count());
/// # }
/// ```
pub mod prelude {
    pub use crate::image::{ChannelOrder, ColorImage, DepthImage, Mask};
    pub use crate::{classify, ClassifierParams, FrameError, TerrainClassifier, TerrainMasks};
}

// --- Stage-level API (for tools & advanced users) --------------------------

pub mod stages {
    // Stage runners.
    pub use crate::building::{detect_buildings, BuildingDetection};
    pub use crate::color::ColorPlanes;
    pub use crate::conflict::{resolve_conflicts, ResolvedMasks};
    pub use crate::height::{extract_height, HeightField};
    pub use crate::noise::propagate_noise;
    pub use crate::park::{detect_parks, ParkDetection};
    pub use crate::road::{correct_shadows, detect_roads, RoadDetection, ShadowCorrection};

    // Structured diagnostics types.
    pub use crate::diagnostics::{
        BuildingStage, ConflictStage, HeightStage, InputDescriptor, ParkStage,
        RegionFilterCounts, RoadStage, ShadowStage, StageTiming, TimingBreakdown,
    };
}
