//! Capability interface over face detection for host camera views.
//!
//! The host camera layer talks to detection exclusively through
//! [`FaceDetectorManager`]; on platforms where no engine is linked in, a
//! provider hands back [`UnavailableFaceDetector`] instead of hiding the
//! whole surface behind conditional compilation.

use anyhow::Result;
use image::DynamicImage;
use log::{error, warn};

use crate::encoder::EncodedFace;
use crate::engine::DetectionEngine;
use crate::session::{FaceDetectorSession, SessionGeometry};
use facecam_utils::DetectorSettings;

/// Called once per processed frame with that frame's encoded faces.
pub type FacesCallback = Box<dyn Fn(&[EncodedFace]) + Send>;

/// What a camera view needs from a face-detection backend.
///
/// Enable/disable, settings and mirroring updates, attach/detach of a
/// running session.
pub trait FaceDetectorManager {
    fn set_enabled(&mut self, enabled: bool);
    fn set_on_faces_detected(&mut self, callback: FacesCallback);
    fn update_settings(&mut self, settings: &DetectorSettings);
    fn update_mirrored(&mut self, mirrored: bool);
    /// Attach to a running camera session with its current geometry.
    fn start(&mut self, geometry: SessionGeometry);
    fn stop(&mut self);
}

/// Creates a manager for the current platform.
pub trait FaceDetectorProvider {
    fn create_manager(&self) -> Box<dyn FaceDetectorManager>;
}

/// Manager backed by a real detection engine.
pub struct SessionFaceDetector<E> {
    session: FaceDetectorSession<E>,
    geometry: Option<SessionGeometry>,
    on_faces_detected: Option<FacesCallback>,
}

impl<E: DetectionEngine> SessionFaceDetector<E> {
    pub fn new(engine: E, settings: DetectorSettings) -> SessionFaceDetector<E> {
        SessionFaceDetector {
            session: FaceDetectorSession::new(engine, settings),
            geometry: None,
            on_faces_detected: None,
        }
    }

    /// Deliver one camera frame; invokes the faces callback when detection
    /// ran. The camera layer calls this from its frame queue.
    pub fn analyze(&mut self, frame: &DynamicImage) -> Result<()> {
        let records = self.session.process_frame(frame)?;
        if let Some(callback) = &self.on_faces_detected {
            callback(&records);
        }
        Ok(())
    }

    pub fn session(&self) -> &FaceDetectorSession<E> {
        &self.session
    }
}

impl<E: DetectionEngine> FaceDetectorManager for SessionFaceDetector<E> {
    fn set_enabled(&mut self, enabled: bool) {
        self.session.set_enabled(enabled);
    }

    fn set_on_faces_detected(&mut self, callback: FacesCallback) {
        self.on_faces_detected = Some(callback);
    }

    fn update_settings(&mut self, settings: &DetectorSettings) {
        if let Err(err) = self.session.update_settings(settings.clone()) {
            error!("failed to apply detector settings: {err:#}");
        }
    }

    fn update_mirrored(&mut self, mirrored: bool) {
        if let Some(mut geometry) = self.geometry {
            if geometry.mirrored != mirrored {
                geometry.mirrored = mirrored;
                self.geometry = Some(geometry);
                self.session.set_geometry(geometry);
            }
        }
    }

    fn start(&mut self, geometry: SessionGeometry) {
        self.geometry = Some(geometry);
        self.session.set_geometry(geometry);
        self.session.set_enabled(true);
    }

    fn stop(&mut self) {
        self.session.set_enabled(false);
        self.geometry = None;
    }
}

/// No-op manager for platforms without a detection engine.
///
/// Every operation is accepted and ignored; enabling detection logs a single
/// warning so misconfigured hosts are diagnosable.
#[derive(Debug, Default)]
pub struct UnavailableFaceDetector {
    warned: bool,
}

impl UnavailableFaceDetector {
    pub fn new() -> UnavailableFaceDetector {
        UnavailableFaceDetector::default()
    }
}

impl FaceDetectorManager for UnavailableFaceDetector {
    fn set_enabled(&mut self, enabled: bool) {
        if enabled && !self.warned {
            warn!("face detection requested but no detection engine is available");
            self.warned = true;
        }
    }

    fn set_on_faces_detected(&mut self, _callback: FacesCallback) {}

    fn update_settings(&mut self, _settings: &DetectorSettings) {}

    fn update_mirrored(&mut self, _mirrored: bool) {}

    fn start(&mut self, _geometry: SessionGeometry) {}

    fn stop(&mut self) {}
}
