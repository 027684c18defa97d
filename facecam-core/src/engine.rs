//! Seam to the external face-detection engine.
//!
//! The engine itself (ML Kit, or any other backend) is a black box that
//! turns camera frames into buffer-space [`FaceObservation`]s; everything
//! downstream of this trait is engine-agnostic.

use anyhow::Result;
use image::DynamicImage;

use crate::observation::FaceObservation;
use facecam_utils::DetectorSettings;

/// A face-detection backend operating on raw camera frames.
///
/// Implementations may hold sessions, models, or native handles; `detect`
/// is called once per delivered frame from a single producer, so `&mut self`
/// is fine.
pub trait DetectionEngine: Send {
    /// Detect faces in one frame, reporting geometry in the frame's own
    /// pixel space.
    fn detect(&mut self, frame: &DynamicImage) -> Result<Vec<FaceObservation>>;

    /// Apply new detector options, rebuilding internal state as needed.
    fn reconfigure(&mut self, settings: &DetectorSettings) -> Result<()>;
}
