//! Core geometry and encoding for the facecam face-detection bridge.
//!
//! This crate reconciles the two coordinate spaces a camera face detector
//! lives between: the raw video buffer's sensor-native pixel space, and the
//! presentation space consumers overlay on screen. It builds the affine
//! transform for any orientation/mirroring/aspect combination, and encodes
//! raw face observations into the stable presentation-space record format.

/// Face result encoding into consumer-facing records.
pub mod encoder;
/// Seam to the external detection engine.
pub mod engine;
/// Detection-manager capability interface for host camera views.
pub mod manager;
/// Buffer-space face observation data model.
pub mod observation;
/// Per-frame session glue: geometry epochs, interval gating.
pub mod session;
/// Orientation transforms between buffer and presentation space.
pub mod transform;

pub use encoder::{EncodedBounds, EncodedFace, EncodedSize, FaceEncoder};
pub use engine::DetectionEngine;
pub use manager::{
    FaceDetectorManager, FaceDetectorProvider, FacesCallback, SessionFaceDetector,
    UnavailableFaceDetector,
};
pub use observation::{BoundingBox, ContourKind, EulerAngles, FaceObservation, LandmarkKind};
pub use session::{FaceDetectorSession, SessionGeometry};
pub use transform::{
    AffineTransform, AngleTransform, Orientation, normalize_degrees, point_transform,
};

/// Returns the crate version for diagnostics.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
