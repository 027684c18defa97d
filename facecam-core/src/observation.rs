//! Read-only model of what the detection engine reports for one face.
//!
//! Everything here is in buffer pixel space with buffer-native axis
//! conventions; the encoder owns the conversion into presentation space.
//! Landmark and contour name sets follow the ML Kit face API, which is what
//! downstream overlay code keys off.

use std::collections::BTreeMap;

use facecam_utils::Point;

/// Axis-aligned bounding box, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> BoundingBox {
        BoundingBox {
            x,
            y,
            width,
            height,
        }
    }

    /// The four corners, clockwise from the origin.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.x, self.y),
            Point::new(self.x + self.width, self.y),
            Point::new(self.x + self.width, self.y + self.height),
            Point::new(self.x, self.y + self.height),
        ]
    }

    /// The axis-aligned bounding rectangle of a set of points.
    ///
    /// Returns a zero-sized box at the origin for an empty set.
    pub fn enclosing(points: &[Point]) -> BoundingBox {
        let Some(first) = points.first() else {
            return BoundingBox::default();
        };
        let mut min = *first;
        let mut max = *first;
        for p in &points[1..] {
            min = min.min(*p);
            max = max.max(*p);
        }
        BoundingBox {
            x: min.x,
            y: min.y,
            width: max.x - min.x,
            height: max.y - min.y,
        }
    }
}

/// Named landmark points the engine can report.
///
/// Order and wire names follow the ML Kit landmark constants; the wire name
/// is the key overlay consumers index the encoded record with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LandmarkKind {
    BottomMouth,
    RightMouth,
    LeftMouth,
    LeftCheek,
    RightEye,
    LeftEye,
    LeftEar,
    RightCheek,
    RightEar,
    NoseBase,
}

impl LandmarkKind {
    pub const ALL: [LandmarkKind; 10] = [
        LandmarkKind::BottomMouth,
        LandmarkKind::RightMouth,
        LandmarkKind::LeftMouth,
        LandmarkKind::LeftCheek,
        LandmarkKind::RightEye,
        LandmarkKind::LeftEye,
        LandmarkKind::LeftEar,
        LandmarkKind::RightCheek,
        LandmarkKind::RightEar,
        LandmarkKind::NoseBase,
    ];

    /// Stable field name in the encoded record.
    pub fn wire_name(self) -> &'static str {
        match self {
            LandmarkKind::BottomMouth => "bottomMouthPosition",
            LandmarkKind::RightMouth => "rightMouthPosition",
            LandmarkKind::LeftMouth => "leftMouthPosition",
            LandmarkKind::LeftCheek => "leftCheekPosition",
            LandmarkKind::RightEye => "rightEyePosition",
            LandmarkKind::LeftEye => "leftEyePosition",
            LandmarkKind::LeftEar => "leftEarPosition",
            LandmarkKind::RightCheek => "rightCheekPosition",
            LandmarkKind::RightEar => "rightEarPosition",
            LandmarkKind::NoseBase => "noseBasePosition",
        }
    }
}

/// Facial contour polylines the engine can report.
///
/// Point order within a contour traces the feature outline and is
/// semantically meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ContourKind {
    Face,
    LeftEyebrowTop,
    LeftEyebrowBottom,
    RightEyebrowTop,
    RightEyebrowBottom,
    LeftEye,
    RightEye,
    UpperLipTop,
    UpperLipBottom,
    LowerLipTop,
    LowerLipBottom,
    NoseBridge,
    NoseBottom,
    LeftCheek,
    RightCheek,
}

impl ContourKind {
    /// Stable key in the encoded record's contour map.
    pub fn wire_name(self) -> &'static str {
        match self {
            ContourKind::Face => "face",
            ContourKind::LeftEyebrowTop => "leftEyebrowTop",
            ContourKind::LeftEyebrowBottom => "leftEyebrowBottom",
            ContourKind::RightEyebrowTop => "rightEyebrowTop",
            ContourKind::RightEyebrowBottom => "rightEyebrowBottom",
            ContourKind::LeftEye => "leftEye",
            ContourKind::RightEye => "rightEye",
            ContourKind::UpperLipTop => "upperLipTop",
            ContourKind::UpperLipBottom => "upperLipBottom",
            ContourKind::LowerLipTop => "lowerLipTop",
            ContourKind::LowerLipBottom => "lowerLipBottom",
            ContourKind::NoseBridge => "noseBridge",
            ContourKind::NoseBottom => "noseBottom",
            ContourKind::LeftCheek => "leftCheek",
            ContourKind::RightCheek => "rightCheek",
        }
    }
}

/// Head pose as reported by the engine, in buffer-space axes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EulerAngles {
    /// Rotation about the X axis (nodding up/down), degrees.
    pub pitch: f32,
    /// Rotation about the Y axis (turning left/right), degrees.
    pub yaw: f32,
    /// Rotation about the Z axis (tilting in the image plane), degrees.
    pub roll: f32,
}

/// One detected face, as produced by the engine for a single frame.
///
/// Landmark and contour sets depend on the detector configuration; absent
/// categories are simply missing from the maps. Classification probabilities
/// are `None` unless the classification mode requested them.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceObservation {
    pub bounds: BoundingBox,
    pub landmarks: BTreeMap<LandmarkKind, Point>,
    pub contours: BTreeMap<ContourKind, Vec<Point>>,
    pub angles: EulerAngles,
    pub tracking_id: Option<i32>,
    pub smiling_probability: Option<f32>,
    pub left_eye_open_probability: Option<f32>,
    pub right_eye_open_probability: Option<f32>,
}

impl FaceObservation {
    /// An observation with only a bounding box; everything else absent.
    pub fn new(bounds: BoundingBox) -> FaceObservation {
        FaceObservation {
            bounds,
            landmarks: BTreeMap::new(),
            contours: BTreeMap::new(),
            angles: EulerAngles::default(),
            tracking_id: None,
            smiling_probability: None,
            left_eye_open_probability: None,
            right_eye_open_probability: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enclosing_box_of_corners_round_trips() {
        let bbox = BoundingBox::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(BoundingBox::enclosing(&bbox.corners()), bbox);
    }

    #[test]
    fn enclosing_box_of_nothing_is_empty() {
        assert_eq!(BoundingBox::enclosing(&[]), BoundingBox::default());
    }

    #[test]
    fn landmark_wire_names_are_unique() {
        let mut names: Vec<_> = LandmarkKind::ALL.iter().map(|k| k.wire_name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), LandmarkKind::ALL.len());
    }
}
