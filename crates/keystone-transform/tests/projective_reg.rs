//! Projective warp regression test
//!
//! Tests integer translations (exact with sampling), the invertability of
//! a mild perspective with bilinear interpolation, and resizing a page to
//! the square working resolution.

use keystone_core::{Matrix3, Pix};
use keystone_test::RegParams;
use keystone_test::synth::{converging_rulings, ruled_page};
use keystone_transform::{Interpolation, ProjectiveFill, projective, scale_to_size};

fn gray_page() -> Pix {
    let rulings = converging_rulings(320, 240, (200.0, -400.0), 7);
    ruled_page(320, 240, &rulings, 3).convert_to_8().unwrap()
}

#[test]
fn projective_reg_translation() {
    let mut rp = RegParams::new("projective_translation");

    let pix = gray_page();
    let (w, h) = (pix.width(), pix.height());
    let out = projective(
        &pix,
        &Matrix3::translation(7.0, -4.0),
        w,
        h,
        Interpolation::Sampled,
        ProjectiveFill::White,
    )
    .unwrap();

    let mut same = true;
    for y in 0..h - 4 {
        for x in 0..w - 7 {
            same &= out.get_pixel(x + 7, y) == pix.get_pixel(x, y + 4);
        }
    }
    rp.compare_values(1.0, same as u8 as f64, 0.0);
    // Uncovered strips take the fill
    rp.compare_values(255.0, out.get_pixel(3, 100).unwrap() as f64, 0.0);
    rp.compare_values(255.0, out.get_pixel(100, h - 2).unwrap() as f64, 0.0);

    assert!(rp.cleanup(), "projective_reg translation tests failed");
}

#[test]
fn projective_reg_invertability() {
    let mut rp = RegParams::new("projective_invert");

    let pix = gray_page();
    let (w, h) = (pix.width(), pix.height());
    let m = Matrix3::new([
        [1.0, 0.05, 6.0],
        [0.02, 1.0, 4.0],
        [0.0002, 0.0001, 1.0],
    ]);
    let minv = m.inverse().unwrap();

    let fwd = projective(&pix, &m, w, h, Interpolation::Linear, ProjectiveFill::White).unwrap();
    let back = projective(&fwd, &minv, w, h, Interpolation::Linear, ProjectiveFill::White).unwrap();

    // Compare where the forward image stayed well inside the canvas
    let (mut total, mut count) = (0u64, 0u64);
    for y in 0..h {
        for x in 0..w {
            let Some((fx, fy)) = m.transform_point(x as f64, y as f64) else {
                continue;
            };
            if fx < 2.0 || fy < 2.0 || fx > (w - 3) as f64 || fy > (h - 3) as f64 {
                continue;
            }
            let a = pix.get_pixel(x, y).unwrap() as i64;
            let b = back.get_pixel(x, y).unwrap() as i64;
            total += (a - b).unsigned_abs();
            count += 1;
        }
    }
    rp.compare_values(1.0, (count > (w * h / 2) as u64) as u8 as f64, 0.0);
    let mean = total as f64 / count.max(1) as f64;
    rp.compare_values(0.0, mean, 12.0);

    rp.write_pix(&fwd, "forward").unwrap();
    rp.write_pix(&back, "back").unwrap();

    assert!(rp.cleanup(), "projective_reg invertability tests failed");
}

#[test]
fn projective_reg_working_size() {
    let mut rp = RegParams::new("projective_working_size");

    let pix = gray_page();
    let small = scale_to_size(&pix, 128, 128).unwrap();
    rp.compare_values(128.0, small.width() as f64, 0.0);
    rp.compare_values(128.0, small.height() as f64, 0.0);

    // Rulings survive as darker columns on the bottom row
    let row: Vec<u32> = (0..128).map(|x| small.get_pixel(x, 127).unwrap()).collect();
    let (lo, hi) = (*row.iter().min().unwrap(), *row.iter().max().unwrap());
    rp.compare_values(1.0, (hi - lo > 60) as u8 as f64, 0.0);

    assert!(rp.cleanup(), "projective_reg working size tests failed");
}
