//! Validated configuration for the face-detection bridge.
//!
//! Every recognized detector option is an enumerated field, with an explicit
//! diff operation (`requires_new_detector`) deciding whether the underlying
//! detection engine must be rebuilt when settings change.

use anyhow::{Context, Result};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::{fmt, fs, path::Path, str::FromStr};

/// Detection speed/accuracy trade-off.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceMode {
    /// Favor frame rate over detection quality (default).
    #[default]
    Fast,
    /// Favor detection quality over frame rate.
    Accurate,
}

impl fmt::Display for PerformanceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                PerformanceMode::Fast => "fast",
                PerformanceMode::Accurate => "accurate",
            }
        )
    }
}

impl FromStr for PerformanceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fast" => Ok(PerformanceMode::Fast),
            "accurate" => Ok(PerformanceMode::Accurate),
            other => Err(format!(
                "invalid performance mode '{other}'; expected 'fast' or 'accurate'"
            )),
        }
    }
}

/// Whether the engine should report named landmark points.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum LandmarkMode {
    #[default]
    None,
    All,
}

/// Whether the engine should report facial contour polylines.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ContourMode {
    #[default]
    None,
    All,
}

/// Whether the engine should run smile / eye-open classifiers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationMode {
    #[default]
    None,
    All,
}

/// The full set of recognized detector options.
///
/// Defaults are the cheapest useful configuration: fast mode, no landmarks,
/// no contours, no classifications, tracking off, minimum face size 0.15.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DetectorSettings {
    pub performance_mode: PerformanceMode,
    pub landmark_mode: LandmarkMode,
    pub contour_mode: ContourMode,
    pub classification_mode: ClassificationMode,
    /// Assign stable tracking ids to faces across frames.
    pub tracking_enabled: bool,
    /// Smallest face to report, as a fraction of the frame's larger side.
    pub min_face_size: f32,
    /// Minimum milliseconds between processed frames; 0 processes every frame.
    pub min_detection_interval_ms: u64,
}

impl Default for DetectorSettings {
    fn default() -> Self {
        Self {
            performance_mode: PerformanceMode::Fast,
            landmark_mode: LandmarkMode::None,
            contour_mode: ContourMode::None,
            classification_mode: ClassificationMode::None,
            tracking_enabled: false,
            min_face_size: 0.15,
            min_detection_interval_ms: 0,
        }
    }
}

impl DetectorSettings {
    /// Clamp values to sensible ranges.
    pub fn sanitize(&mut self) {
        if !self.min_face_size.is_finite() || self.min_face_size <= 0.0 {
            self.min_face_size = DetectorSettings::default().min_face_size;
        }
        self.min_face_size = self.min_face_size.min(1.0);
    }

    /// Returns `true` when switching to `other` requires tearing down and
    /// rebuilding the underlying detection engine.
    ///
    /// The detection interval only gates frame delivery, so changing it never
    /// rebuilds; every option baked into the engine configuration does.
    pub fn requires_new_detector(&self, other: &DetectorSettings) -> bool {
        self.performance_mode != other.performance_mode
            || self.landmark_mode != other.landmark_mode
            || self.contour_mode != other.contour_mode
            || self.classification_mode != other.classification_mode
            || self.tracking_enabled != other.tracking_enabled
            || self.min_face_size != other.min_face_size
    }
}

/// Settings controlling optional runtime telemetry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TelemetrySettings {
    /// Whether telemetry timing logs are enabled.
    pub enabled: bool,
    /// Logging level for telemetry output (error, warn, info, debug, trace).
    pub level: String,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            enabled: false,
            level: "debug".to_string(),
        }
    }
}

impl TelemetrySettings {
    /// Resolve the configured level string into a `LevelFilter`.
    pub fn level_filter(&self) -> LevelFilter {
        match self.level.trim().to_ascii_lowercase().as_str() {
            "off" => LevelFilter::Off,
            "error" => LevelFilter::Error,
            "warn" | "warning" => LevelFilter::Warn,
            "info" => LevelFilter::Info,
            "trace" => LevelFilter::Trace,
            _ => LevelFilter::Debug,
        }
    }
}

/// Persistent settings for embedders of the face-detection bridge.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct FaceCamSettings {
    /// Detector options applied when detection starts.
    pub detector: DetectorSettings,
    /// Telemetry and diagnostics preferences.
    pub telemetry: TelemetrySettings,
}

impl FaceCamSettings {
    /// Load settings from a JSON file.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file {}", path.display()))?;
        let mut settings: FaceCamSettings = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse settings JSON at {}", path.display()))?;
        settings.detector.sanitize();
        Ok(settings)
    }

    /// Serialize settings to disk in pretty-printed JSON, overwriting any
    /// existing file.
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let payload =
            serde_json::to_string_pretty(self).context("failed to serialize settings JSON")?;
        fs::write(path, payload)
            .with_context(|| format!("failed to write settings file {}", path.display()))?;
        Ok(())
    }
}
