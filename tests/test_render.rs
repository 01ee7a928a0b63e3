//! Integration tests for the annotation render pipeline and raster canvas.

mod common;

use counterscan::render::{
    DrawOp, HOVER_COLOR, RasterCanvas, RecordingCanvas, Stroke, annotation_pipeline,
    render_annotations,
};
use counterscan::{BoundingBox, Canvas, Color};
use common::*;

fn render(state: &EditorState) -> anyhow::Result<RecordingCanvas> {
    let mut canvas = RecordingCanvas::new(200, 100);
    let drawn = render_annotations(&annotation_pipeline(), state, &mut canvas)?;
    assert!(drawn);
    Ok(canvas)
}

#[test]
fn test_nothing_drawn_without_image() -> anyhow::Result<()> {
    let state = with_points(EditorState::new(), PointSetName::Countertop, &[(1.0, 1.0)]);
    let mut canvas = RecordingCanvas::new(200, 100);

    let drawn = render_annotations(&annotation_pipeline(), &state, &mut canvas)?;
    assert!(!drawn);
    assert!(canvas.ops.is_empty());
    Ok(())
}

#[test]
fn test_redraw_starts_with_clear_and_image() -> anyhow::Result<()> {
    let canvas = render(&editor_with_image())?;
    assert_eq!(
        canvas.ops,
        vec![
            DrawOp::Clear,
            DrawOp::Image {
                width: 200,
                height: 100
            }
        ]
    );
    Ok(())
}

#[test]
fn test_single_point_draws_marker_only() -> anyhow::Result<()> {
    let state = with_points(editor_with_image(), PointSetName::Countertop, &[(20.0, 20.0)]);
    let canvas = render(&state)?;

    assert!(canvas.polylines().is_empty());
    assert!(canvas.texts().is_empty());
    assert_eq!(canvas.circles(), vec![(Point::new(20.0, 20.0), Color::BLUE)]);
    Ok(())
}

#[test]
fn test_two_points_draw_one_label() -> anyhow::Result<()> {
    let state = with_points(
        editor_with_image(),
        PointSetName::Countertop,
        &[(0.0, 0.0), (100.0, 0.0)],
    );
    let canvas = render(&state)?;

    assert_eq!(canvas.texts(), vec!["2.00 in"]);
    let polylines = canvas.polylines();
    assert_eq!(polylines.len(), 1);
    assert!(!polylines[0].1, "two points must not be closed");
    Ok(())
}

#[test]
fn test_four_points_draw_four_labels() -> anyhow::Result<()> {
    let state = with_points(
        editor_with_image(),
        PointSetName::CreditCard,
        &[(0.0, 0.0), (100.0, 0.0), (100.0, 25.0), (0.0, 25.0)],
    );
    let canvas = render(&state)?;

    assert_eq!(
        canvas.texts(),
        vec!["2.00 in", "0.50 in", "2.00 in", "0.50 in"]
    );
    assert!(canvas.polylines()[0].1);

    let label_positions: Vec<Point> = canvas
        .ops
        .iter()
        .filter_map(|op| match op {
            DrawOp::Text { at, color, .. } => {
                assert_eq!(*color, Color::GREEN);
                Some(*at)
            }
            _ => None,
        })
        .collect();
    // Closing segment label sits between the last and first point
    assert_eq!(label_positions[3], Point::new(0.0, 12.5));
    Ok(())
}

#[test]
fn test_hovered_marker_is_highlighted() -> anyhow::Result<()> {
    let state = with_points(
        editor_with_image(),
        PointSetName::Countertop,
        &[(20.0, 20.0), (80.0, 20.0)],
    );
    let state = with_points(state, PointSetName::CreditCard, &[(150.0, 50.0)]);
    let state = state.pointer_move(Point::new(81.0, 21.0))?;

    let canvas = render(&state)?;
    assert_eq!(
        canvas.circles(),
        vec![
            (Point::new(20.0, 20.0), Color::BLUE),
            (Point::new(80.0, 20.0), HOVER_COLOR),
            (Point::new(150.0, 50.0), Color::GREEN),
        ]
    );
    Ok(())
}

#[test]
fn test_raster_canvas_draws_pixels() -> anyhow::Result<()> {
    let state = with_points(
        editor_with_image(),
        PointSetName::Countertop,
        &[(20.0, 50.0), (180.0, 50.0)],
    );
    let mut canvas = RasterCanvas::new(200, 100);
    render_annotations(&annotation_pipeline(), &state, &mut canvas)?;

    let img = canvas.image();
    // Marker centre and line midpoint are blue, far corner keeps the image
    assert_eq!(img.get_pixel(20, 50).0, [0, 0, 255, 255]);
    assert_eq!(img.get_pixel(100, 50).0, [0, 0, 255, 255]);
    assert_eq!(img.get_pixel(5, 95).0, [128, 128, 128, 255]);
    assert_eq!(canvas.size(), (200, 100));
    Ok(())
}

#[test]
fn test_raster_canvas_skips_far_off_shapes() {
    let mut canvas = RasterCanvas::new(200, 100);
    let stroke = Stroke {
        color: Color::RED,
        width: 2.0,
    };

    canvas.stroke_rect(
        BoundingBox {
            x: 3.0e9,
            y: 10.0,
            width: 20.0,
            height: 20.0,
        },
        stroke,
    );
    canvas.stroke_polyline(&[Point::new(3.0e9, 10.0), Point::new(4.0e9, 90.0)], false, stroke);
    canvas.fill_circle(Point::new(-3.0e9, 50.0), 8.0, Color::RED);
    canvas.fill_circle(Point::new(f32::NAN, 50.0), 8.0, Color::RED);
    canvas.fill_text("far", Point::new(3.0e9, 3.0e9), 16.0, Color::RED);

    assert!(canvas.image().pixels().all(|p| p.0 == [0, 0, 0, 0]));
}

#[test]
fn test_raster_canvas_clips_huge_shapes() {
    let mut canvas = RasterCanvas::new(200, 100);
    let stroke = Stroke {
        color: Color::RED,
        width: 1.0,
    };

    // Left and top edges land on the canvas, the rest is far away
    canvas.stroke_rect(
        BoundingBox {
            x: 10.0,
            y: 20.0,
            width: 1.0e10,
            height: 1.0e10,
        },
        stroke,
    );
    assert_eq!(canvas.image().get_pixel(10, 60).0, [255, 0, 0, 255]);
    assert_eq!(canvas.image().get_pixel(100, 20).0, [255, 0, 0, 255]);
    assert_eq!(canvas.image().get_pixel(100, 60).0, [0, 0, 0, 0]);

    // A horizontal line from far left to far right crosses the whole canvas
    canvas.stroke_polyline(&[Point::new(-3.0e9, 80.0), Point::new(3.0e9, 80.0)], false, stroke);
    assert_eq!(canvas.image().get_pixel(0, 80).0, [255, 0, 0, 255]);
    assert_eq!(canvas.image().get_pixel(199, 80).0, [255, 0, 0, 255]);

    // A circle far bigger than the canvas covers it
    canvas.fill_circle(Point::new(100.0, 50.0), 1.0e9, Color::BLUE);
    assert!(canvas.image().pixels().all(|p| p.0 == [0, 0, 255, 255]));
}

#[test]
fn test_far_off_point_renders_without_panic() -> anyhow::Result<()> {
    let state = with_points(
        editor_with_image(),
        PointSetName::Countertop,
        &[(20.0, 50.0), (3.0e9, 10.0), (180.0, 90.0)],
    );
    let mut canvas = RasterCanvas::new(200, 100);
    render_annotations(&annotation_pipeline(), &state, &mut canvas)?;

    // The on-canvas marker is still drawn
    assert_eq!(canvas.image().get_pixel(20, 50).0, [0, 0, 255, 255]);
    Ok(())
}

#[test]
fn test_debug_mode_saves_layer_snapshots() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let out = dir.path().join("debug");
    let pipeline = annotation_pipeline().with_debug(out.clone())?;

    let state = with_points(editor_with_image(), PointSetName::Countertop, &[(5.0, 5.0)]);
    let mut canvas = RasterCanvas::new(200, 100);
    render_annotations(&pipeline, &state, &mut canvas)?;

    for name in [
        "00_input.png",
        "01_background.png",
        "02_countertop_outline.png",
        "03_credit_card_outline.png",
    ] {
        assert!(out.join(name).exists(), "missing {}", name);
    }
    Ok(())
}

#[test]
fn test_debug_mode_rejects_non_empty_dir() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    std::fs::write(dir.path().join("stale.png"), b"x")?;

    assert!(annotation_pipeline().with_debug(dir.path().to_path_buf()).is_err());
    Ok(())
}
