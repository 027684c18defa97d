//! Face result encoding into the consumer-facing record.
//!
//! A [`FaceEncoder`] holds one point transform and one angle transform, both
//! immutable after construction, and turns raw buffer-space observations
//! into presentation-space [`EncodedFace`] records. The record's field set
//! and naming are a stable contract: overlay consumers key off them
//! directly.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::observation::{BoundingBox, FaceObservation};
use crate::transform::{AffineTransform, AngleTransform, normalize_degrees};
use facecam_utils::Point;

/// Width/height pair inside an encoded bounds record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EncodedSize {
    pub width: f32,
    pub height: f32,
}

/// Encoded bounding box: origin plus size, axis-aligned in presentation
/// space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EncodedBounds {
    pub origin: Point,
    pub size: EncodedSize,
}

/// One face in presentation space, ready for serialization to the consumer.
///
/// Landmark points are flattened into the record under their wire names
/// (`leftEyePosition`, ...), the keys overlay consumers index with.
/// Optional fields are omitted when absent, never emitted as null
/// placeholders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncodedFace {
    pub bounds: EncodedBounds,
    #[serde(flatten)]
    pub landmarks: BTreeMap<&'static str, Point>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub contours: BTreeMap<&'static str, Vec<Point>>,
    #[serde(rename = "rollAngle")]
    pub roll_angle: f32,
    #[serde(rename = "yawAngle")]
    pub yaw_angle: f32,
    #[serde(rename = "pitchAngle")]
    pub pitch_angle: f32,
    #[serde(rename = "faceID", skip_serializing_if = "Option::is_none")]
    pub face_id: Option<i32>,
    #[serde(rename = "smilingProbability", skip_serializing_if = "Option::is_none")]
    pub smiling_probability: Option<f32>,
    #[serde(rename = "leftEyeOpenProbability", skip_serializing_if = "Option::is_none")]
    pub left_eye_open_probability: Option<f32>,
    #[serde(rename = "rightEyeOpenProbability", skip_serializing_if = "Option::is_none")]
    pub right_eye_open_probability: Option<f32>,
}

/// Stateless adapter from raw observations to encoded records.
///
/// Instances are built once per orientation/geometry epoch and shared
/// freely: `encode` takes `&self` and touches no mutable state, so one
/// encoder may serve concurrent frame queues.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceEncoder {
    transform: AffineTransform,
    angles: AngleTransform,
}

impl FaceEncoder {
    /// Build an encoder from a point transform; the angle transform is
    /// derived from the transform's rotation and mirror components.
    pub fn new(transform: AffineTransform) -> FaceEncoder {
        let angles = AngleTransform::from_affine(&transform);
        FaceEncoder { transform, angles }
    }

    /// Build an encoder from an explicit angle transform alone.
    ///
    /// The point transform defaults to identity; used when orientation
    /// correction of the geometry is pre-applied upstream.
    pub fn from_angle_transform(angles: AngleTransform) -> FaceEncoder {
        FaceEncoder {
            transform: AffineTransform::IDENTITY,
            angles,
        }
    }

    /// Build an encoder from both transforms, overriding the derived angle
    /// transform.
    pub fn with_transforms(transform: AffineTransform, angles: AngleTransform) -> FaceEncoder {
        FaceEncoder { transform, angles }
    }

    pub fn point_transform(&self) -> &AffineTransform {
        &self.transform
    }

    pub fn angle_transform(&self) -> &AngleTransform {
        &self.angles
    }

    /// Encode one observation into a presentation-space record.
    pub fn encode(&self, face: &FaceObservation) -> EncodedFace {
        EncodedFace {
            bounds: self.encode_bounds(&face.bounds),
            landmarks: face
                .landmarks
                .iter()
                .map(|(kind, p)| (kind.wire_name(), self.transform.apply(*p)))
                .collect(),
            contours: face
                .contours
                .iter()
                .map(|(kind, points)| {
                    let mapped = points.iter().map(|p| self.transform.apply(*p)).collect();
                    (kind.wire_name(), mapped)
                })
                .collect(),
            roll_angle: self.angles.map(face.angles.roll),
            // Yaw is about an axis the in-plane rotation does not touch; only
            // mirroring flips its apparent direction. Pitch is unaffected by
            // both.
            yaw_angle: if self.angles.is_mirrored() {
                normalize_degrees(-face.angles.yaw)
            } else {
                face.angles.yaw
            },
            pitch_angle: face.angles.pitch,
            face_id: face.tracking_id,
            smiling_probability: valid_probability(face.smiling_probability),
            left_eye_open_probability: valid_probability(face.left_eye_open_probability),
            right_eye_open_probability: valid_probability(face.right_eye_open_probability),
        }
    }

    /// Map the box through the transform corner-by-corner and take the
    /// axis-aligned bounding rectangle of the result.
    ///
    /// A rotated transform turns an axis-aligned rectangle into a rotated
    /// one; transforming origin and size naively would produce a box that is
    /// wrong in both position and extent.
    fn encode_bounds(&self, bounds: &BoundingBox) -> EncodedBounds {
        let mapped: Vec<Point> = bounds
            .corners()
            .iter()
            .map(|p| self.transform.apply(*p))
            .collect();
        let rect = BoundingBox::enclosing(&mapped);
        EncodedBounds {
            origin: Point::new(rect.x, rect.y),
            size: EncodedSize {
                width: rect.width,
                height: rect.height,
            },
        }
    }
}

/// Engines report unavailable classifier outputs as negative sentinels;
/// treat those as absent.
fn valid_probability(value: Option<f32>) -> Option<f32> {
    value.filter(|p| *p >= 0.0)
}
