//! Caller-side colour lookup: an ordered list of `(threshold, colour)` stops
//! with piecewise-linear blending between neighbours.
//!
//! The noise engine never sees this module; it only turns the scalar returned
//! by a [`crate::noise::FractalSum`] into something a surface can be painted
//! with.
use crate::error::NoiseError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    /// Upper bound (exclusive) of the band this stop closes.
    pub threshold: f64,
    /// Linear RGB in `[0, 1]`.
    pub color: [f32; 3],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl ColorStop {
    pub fn new(threshold: f64, color: [f32; 3]) -> Self {
        Self {
            threshold,
            color,
            label: None,
        }
    }

    pub fn labeled(threshold: f64, color: [f32; 3], label: &str) -> Self {
        Self {
            threshold,
            color,
            label: Some(label.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ColorStop>", into = "Vec<ColorStop>")]
pub struct ColorRamp {
    stops: Vec<ColorStop>,
}

impl ColorRamp {
    /// Thresholds must be finite and strictly ascending; channels must lie in
    /// `[0, 1]`.
    pub fn new(stops: Vec<ColorStop>) -> Result<Self, NoiseError> {
        if stops.is_empty() {
            return Err(NoiseError::invalid("ramp", "needs at least one stop"));
        }
        for (i, stop) in stops.iter().enumerate() {
            if !stop.threshold.is_finite() {
                return Err(NoiseError::invalid(
                    "ramp",
                    format!("stop {i} has non-finite threshold"),
                ));
            }
            if stop.color.iter().any(|c| !(0.0..=1.0).contains(c)) {
                return Err(NoiseError::invalid(
                    "ramp",
                    format!("stop {i} colour {:?} outside [0, 1]", stop.color),
                ));
            }
        }
        if let Some(w) = stops.windows(2).find(|w| w[0].threshold >= w[1].threshold) {
            return Err(NoiseError::invalid(
                "ramp",
                format!(
                    "thresholds must ascend strictly ({} then {})",
                    w[0].threshold, w[1].threshold
                ),
            ));
        }
        Ok(Self { stops })
    }

    /// Water → sand → grass ramp tuned for fractal sums centred on zero.
    pub fn terrain() -> Self {
        Self {
            stops: vec![
                ColorStop::labeled(-0.05, [0.2, 0.2, 0.6], "deep water"),
                ColorStop::labeled(0.0, [0.2, 0.7, 0.8], "shallows"),
                ColorStop::labeled(0.05, [0.9, 0.7, 0.6], "beach"),
                ColorStop::labeled(0.1, [0.2, 0.5, 0.3], "marsh"),
                ColorStop::labeled(0.15, [0.2, 0.6, 0.4], "lowland"),
                ColorStop::labeled(0.2, [0.2, 0.7, 0.2], "meadow"),
                ColorStop::labeled(0.25, [0.25, 0.8, 0.1], "grassland"),
                ColorStop::labeled(0.3, [0.25, 0.7, 0.1], "upland"),
                ColorStop::labeled(0.35, [0.25, 0.6, 0.1], "hills"),
                ColorStop::labeled(1.0, [0.25, 0.5, 0.1], "highland"),
            ],
        }
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    pub fn thresholds(&self) -> impl Iterator<Item = f64> + '_ {
        self.stops.iter().map(|s| s.threshold)
    }

    /// The first stop whose threshold exceeds `value` decides the band: below
    /// the first threshold the first colour is used as-is, otherwise the colour
    /// is blended from the previous stop. At or above the last threshold the
    /// last colour is used. NaN maps to the first colour.
    pub fn sample(&self, value: f64) -> [f32; 3] {
        let first = &self.stops[0];
        if value.is_nan() {
            return first.color;
        }
        match self.stops.iter().position(|s| value < s.threshold) {
            Some(0) => first.color,
            Some(k) => {
                let (lo, hi) = (&self.stops[k - 1], &self.stops[k]);
                let t = ((value - lo.threshold) / (hi.threshold - lo.threshold)) as f32;
                lerp3(lo.color, hi.color, t)
            }
            None => self.stops[self.stops.len() - 1].color,
        }
    }

    pub fn sample_rgb8(&self, value: f64) -> [u8; 3] {
        to_rgb8(self.sample(value))
    }
}

impl Default for ColorRamp {
    fn default() -> Self {
        Self::terrain()
    }
}

impl TryFrom<Vec<ColorStop>> for ColorRamp {
    type Error = NoiseError;

    fn try_from(stops: Vec<ColorStop>) -> Result<Self, Self::Error> {
        Self::new(stops)
    }
}

impl From<ColorRamp> for Vec<ColorStop> {
    fn from(ramp: ColorRamp) -> Self {
        ramp.stops
    }
}

fn lerp3(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}

pub fn to_rgb8(c: [f32; 3]) -> [u8; 3] {
    c.map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
}
