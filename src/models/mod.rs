//! Core data models for region resolution.

pub mod artifact;
pub mod bbox;
pub mod candidate;

pub use artifact::{BboxReport, ChosenOsmObject, NominatimAudit, RegionArtifact, RegionMeta};
pub use bbox::{BboxDiff, BboxSource, BoundingBox, Thresholds};
pub use candidate::{Candidate, OsmRef, OsmType};
