/// False-colour views of the raw scalar field.
///
/// | File             | Range   | Description                                   |
/// |------------------|---------|-----------------------------------------------|
/// | height.png       | [-1, 1] | Fractal sum as sampled on the surface         |
/// | octave_N.png     | [-1, 1] | Unweighted layer N (frequency 2^N) of the sum |
///
/// Colour encoding
/// ───────────────
/// Both use the "jet" ramp, blue (low) → cyan → green → yellow → red (high),
/// rescaled so that 0.0 → green, -1.0 → blue, +1.0 → red.
use crate::error::NoiseError;
use crate::generation::{FieldMap, SampleSettings, grid_len};
use crate::noise::FractalSum;
use crate::surface::{Surface, grid_param, noise_coord};
use image::{Rgb, RgbImage};
use log::info;
use std::path::Path;

// ── Colour map ────────────────────────────────────────────────────────────────

/// "Jet" ramp: blue → cyan → green → yellow → red.
/// `t` ∈ [0.0, 1.0].
pub fn jet(t: f32) -> [u8; 3] {
    let t = t.clamp(0.0, 1.0);
    // Piecewise linear hat functions shifted to R, G, B channels.
    let r = (1.5 - (4.0 * t - 3.0).abs()).clamp(0.0, 1.0);
    let g = (1.5 - (4.0 * t - 2.0).abs()).clamp(0.0, 1.0);
    let b = (1.5 - (4.0 * t - 1.0).abs()).clamp(0.0, 1.0);
    [(r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8]
}

/// Colourize a signed value v ∈ [-1.0, 1.0] → jet(0.0 … 1.0).
#[inline]
pub fn diverge(v: f64) -> [u8; 3] {
    jet(((v.clamp(-1.0, 1.0) + 1.0) * 0.5) as f32)
}

// ── PNG writer ────────────────────────────────────────────────────────────────

/// Writes `data` (row-major, length == width × height) to a PNG at `path`.
fn save_map(data: &[f64], width: u32, height: u32, path: &Path) -> Result<(), NoiseError> {
    debug_assert_eq!(data.len(), grid_len(width, height));
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb(diverge(data[y as usize * width as usize + x as usize]))
    });
    img.save(path)?;
    info!("wrote {}", path.display());
    Ok(())
}

// ── Public entry points ───────────────────────────────────────────────────────

/// The sampled heights of `map` as a diverging false-colour PNG.
pub fn export_height_map(map: &FieldMap, path: impl AsRef<Path>) -> Result<(), NoiseError> {
    let heights: Vec<f64> = map.samples.iter().map(|s| s.height).collect();
    save_map(&heights, map.width, map.height, path.as_ref())
}

/// Re-samples `surface` once per octave of `noise` and writes each unweighted
/// layer to `dir/octave_N.png`, so the contribution of every frequency can be
/// inspected on its own.
pub fn export_octave_maps(
    surface: Surface,
    noise: &FractalSum,
    settings: &SampleSettings,
    dir: impl AsRef<Path>,
) -> Result<(), NoiseError> {
    surface.validate()?;
    settings.validate()?;
    let dir = dir.as_ref();
    let (w, h) = (settings.width, settings.height);
    let (periodic_s, periodic_t) = surface.periodic();

    // Surface points are shared by every layer.
    let mut coords = Vec::with_capacity(settings.sample_count());
    for row in 0..h {
        let t = grid_param(row, h, periodic_t);
        for col in 0..w {
            let s = grid_param(col, w, periodic_s);
            coords.push(noise_coord(surface.point(s, t), settings.noise_scale));
        }
    }

    let mut layer = vec![0.0f64; coords.len()];
    for octave in 0..noise.octaves() {
        for (value, &[x, y, z]) in layer.iter_mut().zip(&coords) {
            *value = noise.octave(octave, x, y, z);
        }
        save_map(&layer, w, h, &dir.join(format!("octave_{octave}.png")))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jet_endpoints() {
        assert_eq!(diverge(-1.0), [0, 0, 127]);
        assert_eq!(diverge(0.0), [127, 255, 127]);
        assert_eq!(diverge(1.0), [127, 0, 0]);
        assert_eq!(diverge(-5.0), diverge(-1.0));
    }

    #[test]
    fn writes_one_map_per_octave() {
        let dir = tempfile::tempdir().unwrap();
        let noise = FractalSum::new(10, 3, 0.5).unwrap();
        let settings = SampleSettings {
            width: 8,
            height: 4,
            ..SampleSettings::default()
        };
        export_octave_maps(Surface::Sphere, &noise, &settings, dir.path()).unwrap();
        for i in 0..3 {
            let img = image::open(dir.path().join(format!("octave_{i}.png"))).unwrap();
            assert_eq!((img.width(), img.height()), (8, 4));
        }
        assert!(!dir.path().join("octave_3.png").exists());
    }
}
