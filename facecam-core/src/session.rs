//! Per-frame glue between the camera pipeline and the geometry core.
//!
//! A session owns the detection engine and the current [`FaceEncoder`]. The
//! encoder is rebuilt whenever the orientation/geometry/mirroring triple
//! changes and swapped in atomically: concurrent readers observe either the
//! old or the new encoder, never a torn one. Frame delivery comes from a
//! single producer (the camera queue), so engine access is `&mut`.

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};
use std::time::Instant;

use anyhow::Result;
use image::DynamicImage;
use log::{Level, debug};
use serde::{Deserialize, Serialize};

use crate::encoder::{EncodedFace, FaceEncoder};
use crate::engine::DetectionEngine;
use crate::observation::FaceObservation;
use crate::transform::{AffineTransform, Orientation, point_transform};
use facecam_utils::{DetectorSettings, timing_guard};

/// The orientation/geometry/mirroring triple a transform epoch is built
/// from.
///
/// Encoding with a transform derived from stale geometry produces silently
/// wrong coordinates; the camera layer must push a new geometry value on
/// every orientation or surface change before further frames are encoded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionGeometry {
    pub orientation: Orientation,
    /// Raw camera buffer dimensions, sensor-native orientation.
    pub buffer_width: f32,
    pub buffer_height: f32,
    /// Target rendering surface dimensions.
    pub video_width: f32,
    pub video_height: f32,
    /// Front-camera mirror-preview convention.
    pub mirrored: bool,
}

impl SessionGeometry {
    /// The buffer-to-presentation transform for this geometry.
    pub fn point_transform(&self) -> AffineTransform {
        point_transform(
            self.orientation,
            self.buffer_width,
            self.buffer_height,
            self.video_width,
            self.video_height,
            self.mirrored,
        )
    }
}

/// Owns the engine and the current encoder epoch; processes frames.
pub struct FaceDetectorSession<E> {
    engine: E,
    settings: DetectorSettings,
    encoder: Mutex<Arc<FaceEncoder>>,
    enabled: AtomicBool,
    busy: AtomicBool,
    last_detection: Mutex<Option<Instant>>,
}

impl<E: DetectionEngine> FaceDetectorSession<E> {
    pub fn new(engine: E, settings: DetectorSettings) -> FaceDetectorSession<E> {
        FaceDetectorSession {
            engine,
            settings,
            encoder: Mutex::new(Arc::new(FaceEncoder::new(AffineTransform::IDENTITY))),
            enabled: AtomicBool::new(false),
            busy: AtomicBool::new(false),
            last_detection: Mutex::new(None),
        }
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Release);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    pub fn settings(&self) -> &DetectorSettings {
        &self.settings
    }

    /// Replace the active settings, reconfiguring the engine only when the
    /// diff requires a new detector.
    pub fn update_settings(&mut self, mut settings: DetectorSettings) -> Result<()> {
        settings.sanitize();
        if self.settings.requires_new_detector(&settings) {
            debug!("detector settings changed; reconfiguring engine");
            self.engine.reconfigure(&settings)?;
        }
        self.settings = settings;
        Ok(())
    }

    /// Rebuild the encoder for a new orientation/geometry/mirroring triple.
    ///
    /// The swap is atomic with respect to concurrent `current_encoder`
    /// readers.
    pub fn set_geometry(&self, geometry: SessionGeometry) {
        let encoder = Arc::new(FaceEncoder::new(geometry.point_transform()));
        *self.encoder.lock().unwrap_or_else(|e| e.into_inner()) = encoder;
        debug!(
            "rebuilt encoder: {} {}x{} -> {}x{} mirrored={}",
            geometry.orientation,
            geometry.buffer_width,
            geometry.buffer_height,
            geometry.video_width,
            geometry.video_height,
            geometry.mirrored
        );
    }

    /// The encoder for the current geometry epoch.
    pub fn current_encoder(&self) -> Arc<FaceEncoder> {
        Arc::clone(&self.encoder.lock().unwrap_or_else(|e| e.into_inner()))
    }

    /// Encode observations the caller already holds, without running the
    /// engine. Pure with respect to session state.
    pub fn encode_observations(&self, faces: &[FaceObservation]) -> Vec<EncodedFace> {
        let encoder = self.current_encoder();
        faces.iter().map(|face| encoder.encode(face)).collect()
    }

    /// Run detection on one frame and encode the results.
    ///
    /// Returns an empty list without touching the engine when detection is
    /// disabled, when the minimum detection interval has not elapsed, or
    /// when a previous detection is still in flight.
    pub fn process_frame(&mut self, frame: &DynamicImage) -> Result<Vec<EncodedFace>> {
        if !self.is_enabled() {
            return Ok(Vec::new());
        }

        if !self.min_interval_elapsed() {
            debug!("skipping frame: minimum detection interval not elapsed");
            return Ok(Vec::new());
        }

        if self.busy.swap(true, Ordering::AcqRel) {
            debug!("skipping frame: detection already in flight");
            return Ok(Vec::new());
        }

        let result = {
            let _guard = timing_guard("facecam_core::process_frame", Level::Debug);
            self.engine
                .detect(frame)
                .map(|faces| self.encode_observations(&faces))
        };
        self.busy.store(false, Ordering::Release);
        result
    }

    fn min_interval_elapsed(&self) -> bool {
        let interval_ms = self.settings.min_detection_interval_ms;
        let mut last = self.last_detection.lock().unwrap_or_else(|e| e.into_inner());
        let now = Instant::now();
        if interval_ms > 0 {
            if let Some(previous) = *last {
                if now.duration_since(previous).as_millis() < u128::from(interval_ms) {
                    return false;
                }
            }
        }
        *last = Some(now);
        true
    }
}
