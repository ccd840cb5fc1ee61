//! Emotia Processing Library
//!
//! The CPU- and process-bound stages of the ingest pipeline:
//! - `decoder`: validates the declared format and computes canonical geometry
//! - `planner`: fits the source into each rendition tier
//! - `transcoder`: produces one encoded rendition per tier
//! - `workspace`: per-run scratch directory, removed on drop
//! - `validator`: request-level checks (size, content type, name, owner id)

pub mod decoder;
pub mod planner;
pub mod transcoder;
pub mod validator;
pub mod workspace;

pub use decoder::{bounding_box, DecodeError, Decoder, FrameRect, SourceFormat, SourceGeometry};
pub use planner::{
    dimension_arrays, fit_within, PlanError, PlannedRendition, RenditionPlanner, Tier, TIERS,
};
pub use transcoder::{MagickTranscoder, TranscodeError, Transcoder};
pub use validator::{UploadValidator, ValidationError};
pub use workspace::ScratchWorkspace;
