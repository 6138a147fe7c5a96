//! Diagnostics data model exposed by the classifier and the command-line tool.
//!
//! [`ClassificationReport`] is the main entry point: the final masks plus a
//! [`ClassificationTrace`] with one record per stage. Every record is
//! `Serialize` (camelCase) so the tool can dump it as JSON next to the masks.

pub mod building;
pub mod conflict;
pub mod height;
pub mod park;
pub mod pipeline;
pub mod road;
pub mod timing;

pub use building::BuildingStage;
pub use conflict::ConflictStage;
pub use height::HeightStage;
pub use park::ParkStage;
pub use pipeline::{ClassificationReport, ClassificationTrace, InputDescriptor};
pub use road::{RegionFilterCounts, RoadStage, ShadowStage};
pub use timing::{StageTiming, TimingBreakdown};
