//! Round-trip and tiling laws for the buffer-to-presentation transform,
//! exercised across every orientation and mirror combination.

use facecam_core::{AngleTransform, Orientation, normalize_degrees, point_transform};
use facecam_utils::Point;

const EPS: f32 = 1e-3;

const ALL_ORIENTATIONS: [Orientation; 4] = [
    Orientation::Portrait,
    Orientation::PortraitUpsideDown,
    Orientation::LandscapeLeft,
    Orientation::LandscapeRight,
];

fn assert_close(p: Point, expected: Point, context: &str) {
    assert!(
        (p.x - expected.x).abs() < EPS && (p.y - expected.y).abs() < EPS,
        "{context}: expected ({}, {}), got ({}, {})",
        expected.x,
        expected.y,
        p.x,
        p.y
    );
}

#[test]
fn inverse_composition_is_identity_for_every_combination() {
    let samples = [
        Point::new(0.0, 0.0),
        Point::new(1.0, 1.0),
        Point::new(320.0, 240.0),
        Point::new(639.0, 1.0),
        Point::new(17.5, 451.25),
    ];

    // Deliberately mismatched aspect ratios so cover-cropping is in play.
    let geometries = [
        (640.0, 480.0, 375.0, 812.0),
        (1920.0, 1080.0, 414.0, 896.0),
        (640.0, 480.0, 640.0, 480.0),
    ];

    for orientation in ALL_ORIENTATIONS {
        for mirrored in [false, true] {
            for (bw, bh, vw, vh) in geometries {
                let t = point_transform(orientation, bw, bh, vw, vh, mirrored);
                let inv = t
                    .invert()
                    .expect("non-degenerate geometry must be invertible");
                for p in samples {
                    let context =
                        format!("{orientation} mirrored={mirrored} {bw}x{bh}->{vw}x{vh}");
                    assert_close(inv.apply(t.apply(p)), p, &context);
                }
            }
        }
    }
}

#[test]
fn equal_dimensions_map_corners_onto_the_presentation_rect() {
    let (w, h) = (800.0, 600.0);
    let corners = [
        Point::new(0.0, 0.0),
        Point::new(w, 0.0),
        Point::new(0.0, h),
        Point::new(w, h),
    ];

    for orientation in ALL_ORIENTATIONS {
        let t = point_transform(orientation, w, h, w, h, false);
        for corner in corners {
            let mapped = t.apply(corner);
            let on_x_edge = mapped.x.abs() < EPS || (mapped.x - w).abs() < EPS;
            let on_y_edge = mapped.y.abs() < EPS || (mapped.y - h).abs() < EPS;
            assert!(
                on_x_edge && on_y_edge,
                "{orientation}: corner ({}, {}) mapped off the rect to ({}, {})",
                corner.x,
                corner.y,
                mapped.x,
                mapped.y
            );
        }
    }
}

#[test]
fn mirrored_transform_still_covers_the_presentation_rect() {
    for orientation in ALL_ORIENTATIONS {
        let t = point_transform(orientation, 640.0, 480.0, 480.0, 640.0, true);
        assert!(t.is_mirrored());

        let corners = [
            Point::new(0.0, 0.0),
            Point::new(640.0, 0.0),
            Point::new(0.0, 480.0),
            Point::new(640.0, 480.0),
        ];
        let mut min = Point::new(f32::MAX, f32::MAX);
        let mut max = Point::new(f32::MIN, f32::MIN);
        for corner in corners {
            let mapped = t.apply(corner);
            min = min.min(mapped);
            max = max.max(mapped);
        }
        assert_close(min, Point::new(0.0, 0.0), &format!("{orientation} min"));
        assert_close(max, Point::new(480.0, 640.0), &format!("{orientation} max"));
    }
}

#[test]
fn derived_angle_transform_reports_the_base_rotation() {
    let expected = [
        (Orientation::LandscapeRight, 0.0),
        (Orientation::LandscapeLeft, 180.0),
        (Orientation::Portrait, 90.0),
        (Orientation::PortraitUpsideDown, -90.0),
    ];

    for (orientation, theta) in expected {
        for mirrored in [false, true] {
            let t = point_transform(orientation, 640.0, 480.0, 375.0, 812.0, mirrored);
            let angles = AngleTransform::from_affine(&t);
            // A raw angle of zero reports the pure rotation component,
            // regardless of mirroring.
            let got = angles.map(0.0);
            assert!(
                normalize_degrees(got - theta).abs() < EPS,
                "{orientation} mirrored={mirrored}: angle(0) = {got}, expected {theta}"
            );
        }
    }
}
