//! Buffer-to-presentation coordinate reconciliation.
//!
//! The camera delivers frames in the sensor's native landscape pixel space,
//! while consumers overlay results on a presentation surface that may be
//! rotated, mirrored (front camera preview), and scaled with fill/cover
//! semantics. [`point_transform`] builds the single affine transform that
//! reconciles the two spaces; [`AngleTransform`] carries the matching
//! correction for in-plane rotation angles.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use facecam_utils::Point;

/// Device interface orientation.
///
/// The raw buffer is sensor-native landscape; `LandscapeRight` is the
/// orientation in which buffer and presentation axes already agree.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    #[default]
    Portrait,
    PortraitUpsideDown,
    LandscapeLeft,
    LandscapeRight,
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Orientation::Portrait => "portrait",
                Orientation::PortraitUpsideDown => "portrait_upside_down",
                Orientation::LandscapeLeft => "landscape_left",
                Orientation::LandscapeRight => "landscape_right",
            }
        )
    }
}

impl FromStr for Orientation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "portrait" => Ok(Orientation::Portrait),
            "portrait_upside_down" => Ok(Orientation::PortraitUpsideDown),
            "landscape_left" => Ok(Orientation::LandscapeLeft),
            "landscape_right" => Ok(Orientation::LandscapeRight),
            other => Err(format!("unknown orientation '{other}'")),
        }
    }
}

impl Orientation {
    /// Portrait orientations swap the buffer's width and height on screen.
    pub fn swaps_dimensions(self) -> bool {
        matches!(self, Orientation::Portrait | Orientation::PortraitUpsideDown)
    }
}

/// Immutable 2D affine transform, row-major:
///
/// ```text
/// x' = a*x + b*y + tx
/// y' = c*x + d*y + ty
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineTransform {
    pub a: f32,
    pub b: f32,
    pub tx: f32,
    pub c: f32,
    pub d: f32,
    pub ty: f32,
}

impl AffineTransform {
    pub const IDENTITY: AffineTransform = AffineTransform {
        a: 1.0,
        b: 0.0,
        tx: 0.0,
        c: 0.0,
        d: 1.0,
        ty: 0.0,
    };

    /// Map a point through the transform.
    pub fn apply(&self, p: Point) -> Point {
        Point {
            x: self.a * p.x + self.b * p.y + self.tx,
            y: self.c * p.x + self.d * p.y + self.ty,
        }
    }

    pub fn determinant(&self) -> f32 {
        self.a * self.d - self.b * self.c
    }

    /// `true` when the transform flips handedness (front-camera mirroring).
    pub fn is_mirrored(&self) -> bool {
        self.determinant() < 0.0
    }

    /// The in-plane rotation component in degrees, mirror-aware.
    ///
    /// Screen coordinates have y pointing down, so a +90° result is the
    /// clockwise quarter turn that maps landscape buffers onto portrait
    /// displays.
    pub fn rotation_degrees(&self) -> f32 {
        if self.is_mirrored() {
            (-self.c).atan2(-self.a).to_degrees()
        } else {
            self.c.atan2(self.a).to_degrees()
        }
    }

    /// The inverse transform, or `None` when the matrix is singular.
    pub fn invert(&self) -> Option<AffineTransform> {
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        Some(AffineTransform {
            a: self.d / det,
            b: -self.b / det,
            tx: (self.b * self.ty - self.d * self.tx) / det,
            c: -self.c / det,
            d: self.a / det,
            ty: (self.c * self.tx - self.a * self.ty) / det,
        })
    }

    /// Compose so that `self` runs first, then `after`.
    pub fn then(&self, after: &AffineTransform) -> AffineTransform {
        AffineTransform {
            a: after.a * self.a + after.b * self.c,
            b: after.a * self.b + after.b * self.d,
            tx: after.a * self.tx + after.b * self.ty + after.tx,
            c: after.c * self.a + after.d * self.c,
            d: after.c * self.b + after.d * self.d,
            ty: after.c * self.tx + after.d * self.ty + after.ty,
        }
    }
}

/// Build the transform mapping buffer pixel coordinates onto the
/// presentation rectangle for the given orientation.
///
/// The result composes, in order: an optional horizontal flip in the buffer's
/// own X axis (front-camera preview convention), the orientation rotation,
/// and per-axis fill/cover scaling. Translation places the mapped buffer
/// origin at the presentation origin so in-bounds buffer points never map to
/// negative coordinates.
///
/// Degenerate geometry (any zero dimension) yields the identity transform;
/// this is a defined edge case, not an error.
pub fn point_transform(
    orientation: Orientation,
    buffer_width: f32,
    buffer_height: f32,
    video_width: f32,
    video_height: f32,
    mirrored: bool,
) -> AffineTransform {
    if buffer_width <= 0.0 || buffer_height <= 0.0 || video_width <= 0.0 || video_height <= 0.0 {
        return AffineTransform::IDENTITY;
    }

    // Cover scaling works on the post-rotation effective buffer dimensions.
    let (sx, sy) = if orientation.swaps_dimensions() {
        (video_width / buffer_height, video_height / buffer_width)
    } else {
        (video_width / buffer_width, video_height / buffer_height)
    };

    let mirror = if mirrored {
        // Flip in the buffer's own X axis, applied before rotation.
        AffineTransform {
            a: -1.0,
            b: 0.0,
            tx: buffer_width,
            c: 0.0,
            d: 1.0,
            ty: 0.0,
        }
    } else {
        AffineTransform::IDENTITY
    };

    let rotation = match orientation {
        // Sensor-native; nothing to rotate.
        Orientation::LandscapeRight => AffineTransform::IDENTITY,
        // Half turn: (x, y) -> (w - x, h - y).
        Orientation::LandscapeLeft => AffineTransform {
            a: -1.0,
            b: 0.0,
            tx: buffer_width,
            c: 0.0,
            d: -1.0,
            ty: buffer_height,
        },
        // Quarter turn clockwise: (x, y) -> (h - y, x).
        Orientation::Portrait => AffineTransform {
            a: 0.0,
            b: -1.0,
            tx: buffer_height,
            c: 1.0,
            d: 0.0,
            ty: 0.0,
        },
        // Quarter turn counter-clockwise: (x, y) -> (y, w - x).
        Orientation::PortraitUpsideDown => AffineTransform {
            a: 0.0,
            b: 1.0,
            tx: 0.0,
            c: -1.0,
            d: 0.0,
            ty: buffer_width,
        },
    };

    let scale = AffineTransform {
        a: sx,
        b: 0.0,
        tx: 0.0,
        c: 0.0,
        d: sy,
        ty: 0.0,
    };

    mirror.then(&rotation).then(&scale)
}

/// Orientation correction for in-plane rotation angles.
///
/// The detection engine reports head rotation relative to the buffer's
/// native axes; rotating or mirroring the buffer for display rotates or
/// mirrors the apparent angle identically. This is a plain value type rather
/// than a stored closure: a rotation plus a mirror flag expresses every
/// correction the point transform can induce.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleTransform {
    rotation_degrees: f32,
    mirrored: bool,
}

impl AngleTransform {
    /// The identity correction.
    pub const IDENTITY: AngleTransform = AngleTransform {
        rotation_degrees: 0.0,
        mirrored: false,
    };

    pub fn new(rotation_degrees: f32, mirrored: bool) -> AngleTransform {
        AngleTransform {
            rotation_degrees,
            mirrored,
        }
    }

    /// Derive the correction from an affine point transform's rotation and
    /// mirror components.
    pub fn from_affine(transform: &AffineTransform) -> AngleTransform {
        AngleTransform {
            rotation_degrees: transform.rotation_degrees(),
            mirrored: transform.is_mirrored(),
        }
    }

    pub fn is_mirrored(&self) -> bool {
        self.mirrored
    }

    /// Map a raw detector angle (degrees) into presentation space,
    /// normalized into (-180, 180].
    pub fn map(&self, raw_degrees: f32) -> f32 {
        let corrected = if self.mirrored {
            -raw_degrees
        } else {
            raw_degrees
        };
        normalize_degrees(corrected + self.rotation_degrees)
    }
}

/// Normalize an angle into (-180, 180].
pub fn normalize_degrees(degrees: f32) -> f32 {
    let mut deg = degrees % 360.0;
    if deg <= -180.0 {
        deg += 360.0;
    } else if deg > 180.0 {
        deg -= 360.0;
    }
    deg
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn assert_close(p: Point, x: f32, y: f32) {
        assert!(
            (p.x - x).abs() < EPS && (p.y - y).abs() < EPS,
            "expected ({x}, {y}), got ({}, {})",
            p.x,
            p.y
        );
    }

    const ALL_ORIENTATIONS: [Orientation; 4] = [
        Orientation::Portrait,
        Orientation::PortraitUpsideDown,
        Orientation::LandscapeLeft,
        Orientation::LandscapeRight,
    ];

    #[test]
    fn corners_tile_the_presentation_rect() {
        // Same buffer and video dimensions: the mapped corners must be
        // exactly the presentation rectangle's corners in every orientation.
        let (w, h) = (640.0, 480.0);
        for orientation in ALL_ORIENTATIONS {
            let t = point_transform(orientation, w, h, w, h, false);
            let corners = [
                Point::new(0.0, 0.0),
                Point::new(w, 0.0),
                Point::new(0.0, h),
                Point::new(w, h),
            ];
            let mut min = Point::new(f32::MAX, f32::MAX);
            let mut max = Point::new(f32::MIN, f32::MIN);
            for corner in corners {
                let mapped = t.apply(corner);
                min = min.min(mapped);
                max = max.max(mapped);
            }
            assert_close(min, 0.0, 0.0);
            assert_close(max, w, h);
        }
    }

    #[test]
    fn round_trip_through_inverse_is_identity() {
        let samples = [
            Point::new(0.0, 0.0),
            Point::new(123.0, 45.0),
            Point::new(639.0, 479.0),
            Point::new(320.0, 240.0),
        ];
        for orientation in ALL_ORIENTATIONS {
            for mirrored in [false, true] {
                let t = point_transform(orientation, 640.0, 480.0, 375.0, 812.0, mirrored);
                let inv = t.invert().expect("cover transform must be invertible");
                for p in samples {
                    let back = inv.apply(t.apply(p));
                    assert_close(back, p.x, p.y);
                }
            }
        }
    }

    #[test]
    fn portrait_rotates_clockwise() {
        // 100x200 buffer onto a 200x100 presentation: unit scale quarter
        // turn. Buffer origin lands at the presentation's top-right corner.
        let t = point_transform(Orientation::Portrait, 100.0, 200.0, 200.0, 100.0, false);
        assert_close(t.apply(Point::new(0.0, 0.0)), 200.0, 0.0);
        assert_close(t.apply(Point::new(100.0, 0.0)), 200.0, 100.0);
        assert_close(t.apply(Point::new(0.0, 200.0)), 0.0, 0.0);
    }

    #[test]
    fn mirror_flips_in_buffer_x_before_rotation() {
        let (bw, bh) = (640.0, 480.0);
        let plain = point_transform(Orientation::Portrait, bw, bh, 480.0, 640.0, false);
        let mirrored = point_transform(Orientation::Portrait, bw, bh, 480.0, 640.0, true);
        let p = Point::new(100.0, 50.0);
        let flipped = Point::new(bw - p.x, p.y);
        assert_close(
            mirrored.apply(p),
            plain.apply(flipped).x,
            plain.apply(flipped).y,
        );
        assert!(mirrored.is_mirrored());
        assert!(!plain.is_mirrored());
    }

    #[test]
    fn cover_scale_is_per_axis() {
        // 4:3 buffer onto a portrait 9:16 surface: each axis scales
        // independently from the post-rotation effective dimensions.
        let t = point_transform(Orientation::Portrait, 640.0, 480.0, 360.0, 640.0, false);
        let mapped = t.apply(Point::new(0.0, 0.0));
        assert_close(mapped, 360.0, 0.0);
        let far = t.apply(Point::new(640.0, 480.0));
        assert_close(far, 0.0, 640.0);
    }

    #[test]
    fn degenerate_geometry_yields_identity() {
        for (bw, bh, vw, vh) in [
            (0.0, 480.0, 375.0, 812.0),
            (640.0, 0.0, 375.0, 812.0),
            (640.0, 480.0, 0.0, 812.0),
            (640.0, 480.0, 375.0, 0.0),
        ] {
            let t = point_transform(Orientation::Portrait, bw, bh, vw, vh, true);
            assert_eq!(t, AffineTransform::IDENTITY);
        }
    }

    #[test]
    fn rotation_decomposition_matches_orientation() {
        let cases = [
            (Orientation::LandscapeRight, 0.0),
            (Orientation::LandscapeLeft, 180.0),
            (Orientation::Portrait, 90.0),
            (Orientation::PortraitUpsideDown, -90.0),
        ];
        for (orientation, expected) in cases {
            for mirrored in [false, true] {
                let t = point_transform(orientation, 640.0, 480.0, 375.0, 812.0, mirrored);
                let got = normalize_degrees(t.rotation_degrees());
                assert!(
                    (normalize_degrees(got - expected)).abs() < EPS,
                    "{orientation} mirrored={mirrored}: expected {expected}, got {got}"
                );
                assert_eq!(t.is_mirrored(), mirrored);
            }
        }
    }

    #[test]
    fn angle_transform_composes_rotation() {
        let t = AngleTransform::new(90.0, false);
        assert!((t.map(0.0) - 90.0).abs() < EPS);
        assert!(t.map(-90.0).abs() < EPS);
    }

    #[test]
    fn angle_transform_mirrors_before_rotating() {
        let t = AngleTransform::new(90.0, true);
        assert!((t.map(30.0) - 60.0).abs() < EPS);
        assert!((t.map(-30.0) - 120.0).abs() < EPS);
    }

    #[test]
    fn angle_normalization_range_is_half_open() {
        assert_eq!(normalize_degrees(180.0), 180.0);
        assert_eq!(normalize_degrees(-180.0), 180.0);
        assert_eq!(normalize_degrees(540.0), 180.0);
        assert_eq!(normalize_degrees(-270.0), 90.0);
    }

    #[test]
    fn derived_angle_transform_matches_point_transform() {
        for orientation in ALL_ORIENTATIONS {
            for mirrored in [false, true] {
                let t = point_transform(orientation, 640.0, 480.0, 375.0, 812.0, mirrored);
                let angles = AngleTransform::from_affine(&t);
                assert_eq!(angles.is_mirrored(), mirrored);
            }
        }
    }
}
