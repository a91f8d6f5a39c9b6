//! Tamarack - administrative region and bounding box resolution via Nominatim
//!
//! This library provides shared types and modules for the resolve, render
//! and pipeline binaries.

pub mod error;
pub mod geometry;
pub mod mapbox;
pub mod models;
pub mod nominatim;
pub mod output;
pub mod reconcile;
pub mod resolver;
pub mod select;

pub use models::{BboxDiff, BboxSource, BoundingBox, Candidate, OsmRef, OsmType, RegionArtifact};
