use crate::bbox::{BBox, Ltwh};
use crate::config::TrackerConfig;
use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use nalgebra as na;

/// Mean Lab color of a player crop, in 8-bit Lab scale.
pub type Feature = na::Vector3<f32>;

/// RGB to HSV in OpenCV 8-bit scale: H in 0..180, S and V in 0..=255.
pub fn rgb_to_hsv(Rgb([r, g, b]): Rgb<u8>) -> [u8; 3] {
    let (rf, gf, bf) = (r as f32, g as f32, b as f32);
    let v = rf.max(gf).max(bf);
    let min = rf.min(gf).min(bf);
    let diff = v - min;

    let s = if v > 0.0 { 255.0 * diff / v } else { 0.0 };

    let mut h = if diff == 0.0 {
        0.0
    } else if v == rf {
        60.0 * (gf - bf) / diff
    } else if v == gf {
        120.0 + 60.0 * (bf - rf) / diff
    } else {
        240.0 + 60.0 * (rf - gf) / diff
    };

    if h < 0.0 {
        h += 360.0;
    }

    let h = (h / 2.0).round() as u32 % 180;

    [h as u8, s.round() as u8, v as u8]
}

#[inline]
fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[inline]
fn lab_f(t: f32) -> f32 {
    if t > 0.008856 {
        t.cbrt()
    } else {
        7.787 * t + 16.0 / 116.0
    }
}

/// RGB to CIE Lab (D65), packed the way 8-bit images carry it:
/// L scaled to 0..=255, a and b offset by 128, everything rounded.
pub fn rgb_to_lab(Rgb([r, g, b]): Rgb<u8>) -> Feature {
    let r = srgb_to_linear(r as f32 / 255.0);
    let g = srgb_to_linear(g as f32 / 255.0);
    let b = srgb_to_linear(b as f32 / 255.0);

    let x = (0.412453 * r + 0.357580 * g + 0.180423 * b) / 0.950456;
    let y = 0.212671 * r + 0.715160 * g + 0.072169 * b;
    let z = (0.019334 * r + 0.119193 * g + 0.950227 * b) / 1.088754;

    let (fx, fy, fz) = (lab_f(x), lab_f(y), lab_f(z));

    let l = if y > 0.008856 {
        116.0 * fy - 16.0
    } else {
        903.3 * y
    };
    let a = 500.0 * (fx - fy);
    let bb = 200.0 * (fy - fz);

    let pack = |v: f32| v.round().clamp(0.0, 255.0);

    Feature::new(
        pack(l * 255.0 / 100.0),
        pack(a + 128.0),
        pack(bb + 128.0),
    )
}

/// Averages the most intense non-field pixels of a canonical-size patch.
///
/// Pixels inside the field HSV range are ignored. The rest are ranked by
/// their Lab vector norm and only the top `pixel_budget` contribute. A patch
/// made entirely of field pixels yields the zero vector.
pub fn patch_feature(patch: &RgbImage, cfg: &TrackerConfig) -> Feature {
    let mut pixels: Vec<Feature> = patch
        .pixels()
        .filter(|px| !cfg.field_hsv.contains(rgb_to_hsv(**px)))
        .map(|px| rgb_to_lab(*px))
        .collect();

    if pixels.is_empty() {
        return Feature::zeros();
    }

    pixels.sort_by(|a, b| b.norm().total_cmp(&a.norm()));

    let n = pixels.len().min(cfg.pixel_budget.max(1));
    let sum = pixels[..n].iter().fold(Feature::zeros(), |acc, p| acc + p);

    sum / n as f32
}

/// Color feature of one player box. Boxes that vanish after clipping to the
/// frame produce the zero vector.
pub fn extract_feature(image: &RgbImage, bbox: &BBox<Ltwh>, cfg: &TrackerConfig) -> Feature {
    let (fw, fh) = image.dimensions();
    let roi = bbox.clip(fw, fh);

    if roi.is_empty() {
        return Feature::zeros();
    }

    let crop = imageops::crop_imm(
        image,
        roi.left() as u32,
        roi.top() as u32,
        roi.width() as u32,
        roi.height() as u32,
    )
    .to_image();

    let (pw, ph) = cfg.patch_size;
    let patch = imageops::resize(&crop, pw, ph, FilterType::Triangle);

    patch_feature(&patch, cfg)
}
