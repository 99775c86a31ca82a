//! Scientific raster conversion: multi-band TIFF → 8-bit RGB PNG.
//!
//! Aerial survey folders often mix plain JPEG/PNG previews with multi-band
//! TIFF captures that vision models cannot ingest directly. This module
//! turns such a TIFF into a standard PNG written next to the original:
//! three fixed band indices become the red, green, and blue channels, and
//! each band is normalised against its own maximum so dark captures still
//! produce a visible composite.
//!
//! The conversion is idempotent: if the sibling PNG already exists it is
//! neither re-decoded nor overwritten.

use crate::error::AeroscribeError;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tiff::decoder::{Decoder, DecodingResult};
use tracing::{debug, info};

/// Source band indices used as (red, green, blue).
///
/// Fixed policy, not user-configurable.
pub const RGB_BANDS: [usize; 3] = [2, 1, 0];

/// Whether `path` carries a recognised scientific raster extension.
pub fn is_scientific_raster(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some(ext) if ext.eq_ignore_ascii_case("tif") || ext.eq_ignore_ascii_case("tiff")
    )
}

/// The standard-format sibling a raster converts into.
pub fn converted_path(path: &Path) -> PathBuf {
    path.with_extension("png")
}

/// Convert the raster at `path` into an RGB PNG next to it, returning the
/// PNG path. Skips the decode entirely when the PNG already exists.
pub fn convert_raster(path: &Path) -> Result<PathBuf, AeroscribeError> {
    let target = converted_path(path);
    if target.exists() {
        debug!("Skipping {}: {} already exists", path.display(), target.display());
        return Ok(target);
    }

    let decode_err = |detail: String| AeroscribeError::RasterDecodeFailed {
        path: path.to_path_buf(),
        detail,
    };

    let file = File::open(path).map_err(|e| decode_err(e.to_string()))?;
    let mut decoder = Decoder::new(BufReader::new(file)).map_err(|e| decode_err(e.to_string()))?;
    let (width, height) = decoder.dimensions().map_err(|e| decode_err(e.to_string()))?;
    let result = decoder.read_image().map_err(|e| decode_err(e.to_string()))?;

    let pixels = (width as usize) * (height as usize);
    let rgb = match result {
        DecodingResult::U8(data) => compose_rgb(&data, pixels),
        DecodingResult::U16(data) => compose_rgb(&data, pixels),
        DecodingResult::U32(data) => compose_rgb(&data, pixels),
        DecodingResult::F32(data) => compose_rgb(&data, pixels),
        DecodingResult::F64(data) => compose_rgb(&data, pixels),
        _ => Err("unsupported sample format".to_string()),
    }
    .map_err(decode_err)?;

    let img = image::RgbImage::from_raw(width, height, rgb)
        .ok_or_else(|| decode_err("band buffer does not match dimensions".to_string()))?;
    img.save(&target)
        .map_err(|e| AeroscribeError::RasterWriteFailed {
            path: target.clone(),
            detail: e.to_string(),
        })?;

    info!("Converted {} → {}", path.display(), target.display());
    Ok(target)
}

/// Pick [`RGB_BANDS`] out of interleaved samples and normalise each band
/// against its own maximum into 8-bit.
fn compose_rgb<T>(data: &[T], pixels: usize) -> Result<Vec<u8>, String>
where
    T: Copy + Into<f64>,
{
    if pixels == 0 || data.len() % pixels != 0 {
        return Err("sample count is not a multiple of the pixel count".to_string());
    }
    let samples = data.len() / pixels;
    let needed = RGB_BANDS.iter().max().copied().unwrap_or(0) + 1;
    if samples < needed {
        return Err(format!(
            "raster has {samples} band(s), at least {needed} required"
        ));
    }

    // Per-band maxima for normalisation.
    let mut maxes = [0.0f64; 3];
    for (slot, &band) in RGB_BANDS.iter().enumerate() {
        for px in 0..pixels {
            let v: f64 = data[px * samples + band].into();
            if v > maxes[slot] {
                maxes[slot] = v;
            }
        }
    }

    let mut rgb = Vec::with_capacity(pixels * 3);
    for px in 0..pixels {
        for (slot, &band) in RGB_BANDS.iter().enumerate() {
            let v: f64 = data[px * samples + band].into();
            let scaled = if maxes[slot] > 0.0 {
                (v / maxes[slot] * 255.0).round()
            } else {
                0.0
            };
            rgb.push(scaled.clamp(0.0, 255.0) as u8);
        }
    }
    Ok(rgb)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiff::encoder::{colortype, TiffEncoder};

    fn write_rgb8_tiff(path: &Path, width: u32, height: u32, data: &[u8]) {
        let mut file = File::create(path).expect("create tiff");
        let mut encoder = TiffEncoder::new(&mut file).expect("encoder");
        encoder
            .write_image::<colortype::RGB8>(width, height, data)
            .expect("write tiff");
    }

    #[test]
    fn recognises_tif_and_tiff_case_insensitively() {
        assert!(is_scientific_raster(Path::new("a.tif")));
        assert!(is_scientific_raster(Path::new("a.TIFF")));
        assert!(!is_scientific_raster(Path::new("a.jpg")));
        assert!(!is_scientific_raster(Path::new("tif")));
    }

    #[test]
    fn converts_bands_with_per_band_normalisation() {
        let dir = tempfile::tempdir().expect("tempdir");
        let tif = dir.path().join("scene.tif");
        // Two pixels, bands interleaved (b0, b1, b2).
        // Band maxima: b0 = 20, b1 = 50, b2 = 200.
        write_rgb8_tiff(&tif, 2, 1, &[10, 0, 200, 20, 50, 100]);

        let png = convert_raster(&tif).expect("convert");
        assert_eq!(png, dir.path().join("scene.png"));

        let img = image::open(&png).expect("open png").to_rgb8();
        assert_eq!(img.dimensions(), (2, 1));
        // red ← band 2, green ← band 1, blue ← band 0, each scaled to its max
        assert_eq!(img.get_pixel(0, 0).0, [255, 0, 128]);
        assert_eq!(img.get_pixel(1, 0).0, [128, 255, 255]);
    }

    #[test]
    fn existing_png_is_not_overwritten() {
        let dir = tempfile::tempdir().expect("tempdir");
        let tif = dir.path().join("scene.tif");
        write_rgb8_tiff(&tif, 1, 1, &[1, 2, 3]);

        let png = dir.path().join("scene.png");
        std::fs::write(&png, b"sentinel").expect("seed png");

        let out = convert_raster(&tif).expect("convert");
        assert_eq!(out, png);
        assert_eq!(std::fs::read(&png).expect("read"), b"sentinel");
    }

    #[test]
    fn too_few_bands_is_a_decode_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let tif = dir.path().join("gray.tif");
        let mut file = File::create(&tif).expect("create tiff");
        let mut encoder = TiffEncoder::new(&mut file).expect("encoder");
        encoder
            .write_image::<colortype::Gray8>(2, 2, &[0, 1, 2, 3])
            .expect("write tiff");

        let err = convert_raster(&tif).unwrap_err();
        assert!(
            matches!(err, AeroscribeError::RasterDecodeFailed { .. }),
            "got: {err}"
        );
    }

    #[test]
    fn all_zero_band_maps_to_black() {
        let rgb = compose_rgb::<u8>(&[0, 0, 0], 1).expect("compose");
        assert_eq!(rgb, vec![0, 0, 0]);
    }
}
