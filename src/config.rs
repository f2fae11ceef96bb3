//! Render configuration with documented defaults.
//!
//! Every field has a default, so a JSON file only needs the keys it changes:
//!
//! ```json
//! { "surface": { "kind": "torus", "major": 0.6, "minor": 0.25 }, "octaves": 5 }
//! ```
use crate::error::NoiseError;
use crate::generation::SampleSettings;
use crate::noise::{DEFAULT_OCTAVES, DEFAULT_PERIOD, DEFAULT_PERSISTENCE, FractalSum};
use crate::palette::ColorRamp;
use crate::perlin::GradientField;
use crate::surface::Surface;
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Coordinate wrap modulus of the gradient field.
    pub period: u32,
    /// Fractal layers; each doubles the frequency of the last.
    pub octaves: u32,
    /// Amplitude decay per octave.
    pub persistence: f64,
    /// Shuffle seed for the permutation table. `None` keeps the reference
    /// table and therefore the reference outputs.
    pub seed: Option<u64>,
    pub surface: Surface,
    pub sampling: SampleSettings,
    pub ramp: ColorRamp,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            period: DEFAULT_PERIOD,
            octaves: DEFAULT_OCTAVES,
            persistence: DEFAULT_PERSISTENCE,
            seed: None,
            surface: Surface::Sphere,
            sampling: SampleSettings::default(),
            ramp: ColorRamp::terrain(),
        }
    }
}

impl RenderConfig {
    /// Reads a JSON config and validates it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, NoiseError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        debug!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), NoiseError> {
        self.build_noise()?;
        self.surface.validate()?;
        self.sampling.validate()
    }

    /// Builds the fractal sum described by this config.
    pub fn build_noise(&self) -> Result<FractalSum, NoiseError> {
        let field = match self.seed {
            Some(seed) => GradientField::from_seed(self.period, seed)?,
            None => GradientField::new(self.period)?,
        };
        FractalSum::with_field(field, self.octaves, self.persistence)
    }
}
