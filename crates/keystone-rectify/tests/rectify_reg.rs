//! Rectification regression test
//!
//! Photographs are stood in for by synthetic ruled pages whose rulings
//! converge on a known vanishing point. Checks that the detected camera
//! roll is close to the true one, that the warp straightens the rulings,
//! that an already-straight page is left (nearly) alone, and that the file
//! round trip writes what the rectification promises. One page is instead
//! photographed by warping a flat page through the inverse of a known
//! camera homography, and the roll of that camera is recovered.

use keystone_core::{Matrix3, Pix};
use keystone_hough::{EmphasisMethod, VanishingPoint};
use keystone_rectify::{
    MemorySink, NullSink, RectifyModel, RectifyOptions, Rectifier, camera_rectification,
    rectify_file,
};
use keystone_transform::{Interpolation, ProjectiveFill, projective};
use keystone_test::RegParams;
use keystone_test::synth::{Segment, converging_rulings, ruled_page};

const COLS: u32 = 640;
const ROWS: u32 = 480;
const VP: (f64, f64) = (384.0, -384.0);

fn page(vp: (f64, f64)) -> (Pix, Vec<Segment>) {
    let rulings = converging_rulings(COLS, ROWS, vp, 9);
    (ruled_page(COLS, ROWS, &rulings, 3), rulings)
}

/// Largest deviation from vertical of the warped rulings, in degrees.
fn worst_lean(m: &Matrix3, rulings: &[Segment]) -> f64 {
    rulings
        .iter()
        .map(|&(top, bottom)| {
            let a = m.transform_point(top.0, top.1).unwrap();
            let b = m.transform_point(bottom.0, bottom.1).unwrap();
            (a.0 - b.0).abs().atan2((a.1 - b.1).abs()).to_degrees()
        })
        .fold(0.0, f64::max)
}

#[test]
fn rectify_reg_camera() {
    let mut rp = RegParams::new("rectify_camera");

    let (pix, rulings) = page(VP);
    let true_tilt = (-(VP.0 - 320.0)).atan2(-(VP.1 - 240.0)).to_degrees();

    for emphasis in [EmphasisMethod::Gradient, EmphasisMethod::RowVariance] {
        let rectifier = Rectifier::new(RectifyOptions::new().with_emphasis(emphasis)).unwrap();
        let (out, rect) = rectifier.rectify(&pix, &mut NullSink).unwrap();

        let pose = rect.pose.unwrap();
        rp.compare_values(true_tilt, pose.tilt_angle.to_degrees(), 2.0);
        rp.compare_values(0.0, worst_lean(&rect.matrix, &rulings), 1.0);

        rp.compare_values(rect.width as f64, out.width() as f64, 0.0);
        rp.compare_values(rect.height as f64, out.height() as f64, 0.0);
        // The page is widened, never shrunk
        rp.compare_values(1.0, (rect.width > COLS && rect.height > ROWS) as u8 as f64, 0.0);

        if rp.display() {
            rp.write_pix(&out, emphasis.name()).unwrap();
        }
    }

    assert!(rp.cleanup(), "rectify_reg camera tests failed");
}

#[test]
fn rectify_reg_homography_round_trip() {
    let mut rp = RegParams::new("rectify_round_trip");

    // Vertical rulings on a flat page
    let (flat, _) = page((320.0, -1.0e9));
    let opts = RectifyOptions::new();
    let vp = VanishingPoint::Finite { x: -64.0, y: -720.0 };
    let known = camera_rectification(vp, COLS, ROWS, opts.max_canvas_scale).unwrap();
    let true_pose = known.pose.unwrap();

    // Photograph it: the inverse homography sends the vertical direction
    // back to the vanishing point
    let photo = projective(
        &flat,
        &known.homography.inverse().unwrap(),
        COLS,
        ROWS,
        Interpolation::Linear,
        ProjectiveFill::White,
    )
    .unwrap();

    let rectifier = Rectifier::new(opts).unwrap();
    let (_, rect) = rectifier.rectify(&photo, &mut NullSink).unwrap();
    let pose = rect.pose.unwrap();
    rp.compare_values(
        true_pose.tilt_angle.to_degrees(),
        pose.tilt_angle.to_degrees(),
        1.0,
    );

    if rp.display() {
        rp.write_pix(&photo, "photo").unwrap();
    }

    assert!(rp.cleanup(), "rectify_reg round trip tests failed");
}

#[test]
fn rectify_reg_shear() {
    let mut rp = RegParams::new("rectify_shear");

    let (pix, rulings) = page(VP);
    let opts = RectifyOptions::new().with_model(RectifyModel::Shear);
    let rectifier = Rectifier::new(opts).unwrap();
    let (out, rect) = rectifier.rectify(&pix, &mut NullSink).unwrap();

    rp.compare_values(1.0, rect.pose.is_none() as u8 as f64, 0.0);
    rp.compare_values(0.0, worst_lean(&rect.matrix, &rulings), 1.0);

    // The bottom edge keeps its length and stays on the last row
    let left = rect.matrix.transform_point(0.0, ROWS as f64).unwrap();
    let right = rect.matrix.transform_point(COLS as f64, ROWS as f64).unwrap();
    rp.compare_values(COLS as f64, right.0 - left.0, 1e-6);
    rp.compare_values(left.1, right.1, 1e-6);
    rp.compare_values(rect.height as f64, left.1, 1.5);

    rp.compare_values(rect.width as f64, out.width() as f64, 0.0);
    rp.write_pix(&out, "shear").unwrap();

    assert!(rp.cleanup(), "rectify_reg shear tests failed");
}

#[test]
fn rectify_reg_straight_page() {
    let mut rp = RegParams::new("rectify_straight");

    // Parallel rulings: the rectification is close to the identity
    let (pix, _) = page((320.0, -1.0e9));
    let rectifier = Rectifier::new(RectifyOptions::new()).unwrap();
    let (out, rect) = rectifier.rectify(&pix, &mut NullSink).unwrap();

    rp.compare_values(COLS as f64, out.width() as f64, 0.02 * COLS as f64);
    rp.compare_values(ROWS as f64, out.height() as f64, 0.02 * ROWS as f64);
    if let Some(pose) = rect.pose {
        rp.compare_values(0.0, pose.tilt_angle.to_degrees(), 1.0);
    }

    assert!(rp.cleanup(), "rectify_reg straight tests failed");
}

#[test]
fn rectify_reg_debug_artifacts() {
    let mut rp = RegParams::new("rectify_debug");

    let (pix, _) = page(VP);
    let opts = RectifyOptions::new().with_working_size(256).with_debug(true);
    let rectifier = Rectifier::new(opts).unwrap();
    let mut sink = MemorySink::new();
    let detection = rectifier.detect(&pix, &mut sink).unwrap();

    rp.compare_values(7.0, sink.images.len() as f64, 0.0);
    for (name, img) in &sink.images {
        let expected = match name.as_str() {
            "resized" | "hough1" | "emphasis" | "hough2" => 256,
            _ => COLS,
        };
        rp.compare_values(expected as f64, img.width() as f64, 0.0);
        rp.write_pix(img, name).unwrap();
    }
    rp.compare_values(1.0, detection.slope_height.is_some() as u8 as f64, 0.0);

    assert!(rp.cleanup(), "rectify_reg debug tests failed");
}

#[test]
fn rectify_reg_file_round_trip() {
    let mut rp = RegParams::new("rectify_file");

    let dir = std::env::temp_dir().join(format!("keystone_rectify_reg_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let input = dir.join("page.png");
    let output = dir.join("flat.png");

    let (pix, _) = page(VP);
    keystone_io::write_image_auto(&pix, &input).unwrap();

    let rect = rectify_file(&input, &output, &RectifyOptions::new()).unwrap();
    let written = keystone_io::read_image(&output).unwrap();
    rp.compare_values(rect.width as f64, written.width() as f64, 0.0);
    rp.compare_values(rect.height as f64, written.height() as f64, 0.0);

    // A failing run leaves no output behind
    let missing = dir.join("missing.png");
    let never = dir.join("never.png");
    rp.compare_values(
        1.0,
        rectify_file(&missing, &never, &RectifyOptions::new()).is_err() as u8 as f64,
        0.0,
    );
    rp.compare_values(0.0, never.exists() as u8 as f64, 0.0);

    let _ = std::fs::remove_dir_all(&dir);
    assert!(rp.cleanup(), "rectify_reg file tests failed");
}
