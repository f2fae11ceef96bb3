//! Parametric surfaces the noise is sampled over.
//!
//! Only the coordinate domain is modelled here: a surface maps grid
//! parameters `(s, t) ∈ [0, 1]²` to a point in `[-1, 1]³` and an outward
//! direction for displacement. Tessellation is left to the renderer.
use crate::error::NoiseError;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_TORUS_MAJOR: f64 = 0.7;
pub const DEFAULT_TORUS_MINOR: f64 = 0.3;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Surface {
    /// Square in the `z = 0` plane; `s` → x, `t` → y.
    Plane,
    /// Unit sphere; `s` → longitude, `t` → z from the north pole down.
    Sphere,
    /// Ring around the z axis; `s` → angle around the axis, `t` → angle around the tube.
    Torus { major: f64, minor: f64 },
}

impl Surface {
    pub fn torus() -> Self {
        Surface::Torus {
            major: DEFAULT_TORUS_MAJOR,
            minor: DEFAULT_TORUS_MINOR,
        }
    }

    pub fn validate(&self) -> Result<(), NoiseError> {
        if let Surface::Torus { major, minor } = *self {
            if !(major.is_finite() && minor.is_finite() && minor > 0.0 && major > minor) {
                return Err(NoiseError::invalid(
                    "surface",
                    format!("torus needs major > minor > 0, got {major}/{minor}"),
                ));
            }
        }
        Ok(())
    }

    /// Whether the `s` and `t` axes close on themselves. Periodic axes sample
    /// `i / n` so the seam is not duplicated; open axes sample `i / (n - 1)`
    /// to reach both edges.
    pub fn periodic(&self) -> (bool, bool) {
        match self {
            Surface::Plane => (false, false),
            Surface::Sphere => (true, false),
            Surface::Torus { .. } => (true, true),
        }
    }

    pub fn point(&self, s: f64, t: f64) -> [f64; 3] {
        match *self {
            Surface::Plane => [2.0 * s - 1.0, 2.0 * t - 1.0, 0.0],
            Surface::Sphere => {
                let z = 1.0 - 2.0 * t;
                let ring = (1.0 - z * z).max(0.0).sqrt();
                let phi = TAU * s;
                [ring * phi.cos(), ring * phi.sin(), z]
            }
            Surface::Torus { major, minor } => {
                let (u, v) = (TAU * s, TAU * t);
                let r = major + minor * v.cos();
                [r * u.cos(), r * u.sin(), minor * v.sin()]
            }
        }
    }

    /// Unit outward direction at `(s, t)`.
    pub fn normal(&self, s: f64, t: f64) -> [f64; 3] {
        match *self {
            Surface::Plane => [0.0, 0.0, 1.0],
            Surface::Sphere => self.point(s, t),
            Surface::Torus { .. } => {
                let (u, v) = (TAU * s, TAU * t);
                [v.cos() * u.cos(), v.cos() * u.sin(), v.sin()]
            }
        }
    }
}

/// Shifts a surface point out of the negative octants and scales it into
/// noise space: `(p + 1) * scale` per axis.
pub fn noise_coord(p: [f64; 3], scale: f64) -> [f64; 3] {
    p.map(|c| (c + 1.0) * scale)
}

/// Parameter for grid index `i` of `n` along one axis.
pub fn grid_param(i: u32, n: u32, periodic: bool) -> f64 {
    if periodic {
        f64::from(i) / f64::from(n)
    } else if n > 1 {
        f64::from(i) / f64::from(n - 1)
    } else {
        0.5
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Surface::Plane => "plane",
            Surface::Sphere => "sphere",
            Surface::Torus { .. } => "torus",
        };
        f.write_str(s)
    }
}

impl FromStr for Surface {
    type Err = NoiseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "plane" => Ok(Surface::Plane),
            "sphere" => Ok(Surface::Sphere),
            "torus" => Ok(Surface::torus()),
            other => Err(NoiseError::invalid(
                "surface",
                format!("unknown surface '{other}' (expected plane, sphere or torus)"),
            )),
        }
    }
}
