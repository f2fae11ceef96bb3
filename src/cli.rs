//! Command-line argument parsing.

use crate::config::RenderConfig;
use crate::error::NoiseError;
use clap::Parser;
use std::path::PathBuf;

/// Command line arguments. Every value flag overrides the config file.
#[derive(Parser, Debug)]
#[command(name = "surface-noise")]
#[command(about = "Samples tileable fractal noise over planes, spheres and tori", long_about = None)]
pub struct Args {
    /// JSON render config; missing keys take their defaults
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Surface to sample: plane, sphere or torus
    #[arg(long, value_name = "SURFACE")]
    pub surface: Option<String>,

    /// Samples per row
    #[arg(long)]
    pub width: Option<u32>,

    /// Samples per column
    #[arg(long)]
    pub height: Option<u32>,

    /// Coordinate wrap period of the gradient field
    #[arg(long)]
    pub period: Option<u32>,

    /// Number of fractal octaves
    #[arg(long)]
    pub octaves: Option<u32>,

    /// Amplitude decay per octave
    #[arg(long)]
    pub persistence: Option<f64>,

    /// Shuffle the permutation table with this seed instead of using the reference table
    #[arg(long)]
    pub seed: Option<u64>,

    /// Surface-to-noise coordinate scale
    #[arg(long)]
    pub scale: Option<f64>,

    /// Displacement per unit height along the surface normal
    #[arg(long)]
    pub displacement: Option<f64>,

    /// Output directory
    #[arg(long, value_name = "DIR", default_value = "surfaces")]
    pub out: PathBuf,

    /// Also write a legend for the colour ramp
    #[arg(long)]
    pub legend: bool,

    /// Also write the raw height field as a false-colour map
    #[arg(long)]
    pub height_map: bool,

    /// Also write one false-colour map per octave
    #[arg(long)]
    pub octave_maps: bool,

    /// Also write every sample as JSON
    #[arg(long)]
    pub json: bool,
}

impl Args {
    /// Applies flag overrides on top of `config` and re-validates it.
    pub fn apply(&self, config: &mut RenderConfig) -> Result<(), NoiseError> {
        if let Some(surface) = &self.surface {
            config.surface = surface.parse()?;
        }
        if let Some(width) = self.width {
            config.sampling.width = width;
        }
        if let Some(height) = self.height {
            config.sampling.height = height;
        }
        if let Some(period) = self.period {
            config.period = period;
        }
        if let Some(octaves) = self.octaves {
            config.octaves = octaves;
        }
        if let Some(persistence) = self.persistence {
            config.persistence = persistence;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(scale) = self.scale {
            config.sampling.noise_scale = scale;
        }
        if let Some(displacement) = self.displacement {
            config.sampling.displacement = displacement;
        }
        config.validate()
    }
}
