//! Seeded, tileable fractal noise for colouring and displacing procedural
//! surfaces.
//!
//! The engine is two layers: [`GradientField`], a periodic 3D gradient-noise
//! primitive, and [`FractalSum`], which stacks octaves of it into one
//! normalised scalar field. Both are immutable once built and can be queried
//! from any number of threads. The remaining modules are consumers: they grid
//! a [`Surface`], sample the field, map heights through a [`ColorRamp`] and
//! write the result out.
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod generation;
pub mod noise;
pub mod palette;
pub mod perlin;
pub mod surface;

pub use crate::error::NoiseError;
pub use crate::generation::{FieldMap, FieldSample, SampleSettings, generate_field, generate_field_with};
pub use crate::noise::FractalSum;
pub use crate::palette::{ColorRamp, ColorStop};
pub use crate::perlin::{GradientField, PermutationTable, REFERENCE_PERMUTATION};
pub use crate::surface::Surface;
