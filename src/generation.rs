use crate::error::NoiseError;
use crate::noise::FractalSum;
use crate::palette::ColorRamp;
use crate::surface::{Surface, grid_param, noise_coord};
use log::{info, warn};
use noise::NoiseFn;
use serde::{Deserialize, Serialize};

/// How a surface is gridded and how its samples are scaled.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleSettings {
    /// Samples along `s` (image columns).
    pub width: u32,
    /// Samples along `t` (image rows).
    pub height: u32,
    /// Multiplier from surface space into noise space. With the default
    /// period of 10 a scale of 3 keeps `(p + 1) * scale` inside one tile.
    pub noise_scale: f64,
    /// Radial offset per unit of height along the surface normal.
    pub displacement: f64,
}

impl Default for SampleSettings {
    fn default() -> Self {
        Self {
            width: 400,
            height: 200,
            noise_scale: 3.0,
            displacement: 0.1,
        }
    }
}

impl SampleSettings {
    /// Number of grid points, computed in `usize` so large grids don't wrap.
    pub fn sample_count(&self) -> usize {
        grid_len(self.width, self.height)
    }

    pub fn validate(&self) -> Result<(), NoiseError> {
        if self.width == 0 || self.height == 0 {
            return Err(NoiseError::invalid(
                "resolution",
                format!("must be non-zero, got {}x{}", self.width, self.height),
            ));
        }
        if !(self.noise_scale.is_finite() && self.noise_scale > 0.0) {
            return Err(NoiseError::invalid(
                "noise_scale",
                format!("must be positive, got {}", self.noise_scale),
            ));
        }
        if !self.displacement.is_finite() {
            return Err(NoiseError::invalid("displacement", "must be finite"));
        }
        Ok(())
    }
}

pub(crate) fn grid_len(width: u32, height: u32) -> usize {
    width as usize * height as usize
}

#[derive(Clone, Debug, Serialize)]
pub struct FieldSample {
    pub col: u32,
    pub row: u32,
    pub s: f64,
    pub t: f64,
    /// Undisplaced surface point.
    pub position: [f64; 3],
    /// `position + normal * displacement * height`.
    pub displaced: [f64; 3],
    pub height: f64,
    pub color: [u8; 3],
}

/// A sampled surface. Row-major: `index = row * width + col`.
#[derive(Clone, Debug, Serialize)]
pub struct FieldMap {
    pub width: u32,
    pub height: u32,
    pub surface: Surface,
    pub settings: SampleSettings,
    pub samples: Vec<FieldSample>,
}

impl FieldMap {
    pub fn get(&self, col: u32, row: u32) -> Option<&FieldSample> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.samples.get(row as usize * self.width as usize + col as usize)
    }

    /// Smallest and largest finite height, or `None` if there are none.
    pub fn height_range(&self) -> Option<(f64, f64)> {
        self.samples
            .iter()
            .map(|s| s.height)
            .filter(|h| h.is_finite())
            .fold(None, |acc, h| match acc {
                None => Some((h, h)),
                Some((lo, hi)) => Some((lo.min(h), hi.max(h))),
            })
    }
}

/// Samples `noise` once per grid point of `surface` and colours the result.
pub fn generate_field(
    surface: Surface,
    noise: &FractalSum,
    ramp: &ColorRamp,
    settings: &SampleSettings,
) -> Result<FieldMap, NoiseError> {
    generate_field_with(surface, noise, ramp, settings)
}

/// As [`generate_field`], for any 3D `noise` function.
pub fn generate_field_with<N: NoiseFn<f64, 3>>(
    surface: Surface,
    noise: &N,
    ramp: &ColorRamp,
    settings: &SampleSettings,
) -> Result<FieldMap, NoiseError> {
    surface.validate()?;
    settings.validate()?;

    let (w, h) = (settings.width, settings.height);
    let (periodic_s, periodic_t) = surface.periodic();
    let mut samples = Vec::with_capacity(settings.sample_count());
    let mut non_finite = 0usize;

    for row in 0..h {
        let t = grid_param(row, h, periodic_t);
        for col in 0..w {
            let s = grid_param(col, w, periodic_s);

            let position = surface.point(s, t);
            let height = noise.get(noise_coord(position, settings.noise_scale));
            if !height.is_finite() {
                non_finite += 1;
            }

            let normal = surface.normal(s, t);
            let lift = settings.displacement * height;
            let displaced = [
                position[0] + normal[0] * lift,
                position[1] + normal[1] * lift,
                position[2] + normal[2] * lift,
            ];

            samples.push(FieldSample {
                col,
                row,
                s,
                t,
                position,
                displaced,
                height,
                color: ramp.sample_rgb8(height),
            });
        }
    }

    if non_finite > 0 {
        warn!("{non_finite} non-finite samples on {surface}");
    }

    let map = FieldMap {
        width: w,
        height: h,
        surface,
        settings: settings.clone(),
        samples,
    };
    if let Some((lo, hi)) = map.height_range() {
        info!("sampled {surface} at {w}x{h}: height in [{lo:.4}, {hi:.4}]");
    }
    Ok(map)
}
