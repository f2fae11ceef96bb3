/// Fractal (multi-octave) summation over a [`GradientField`].
use crate::error::NoiseError;
use crate::perlin::GradientField;
pub use crate::perlin::DEFAULT_PERIOD;
use log::debug;
use noise::NoiseFn;

pub const DEFAULT_OCTAVES: u32 = 7;
pub const DEFAULT_PERSISTENCE: f64 = 0.5;

/// Fractional Brownian Motion over one gradient field. Each octave doubles
/// the frequency and scales the amplitude by `persistence`; the sum is divided
/// by the total amplitude so the result keeps the single-octave bound.
#[derive(Debug, Clone, PartialEq)]
pub struct FractalSum {
    field: GradientField,
    octaves: u32,
    persistence: f64,
}

impl FractalSum {
    /// * `period`: coordinate wrap modulus of the underlying field.
    /// * `octaves`: number of layers; must be at least 1.
    /// * `persistence`: per-octave amplitude decay, normally in `(0, 1)`.
    pub fn new(period: u32, octaves: u32, persistence: f64) -> Result<Self, NoiseError> {
        Self::with_field(GradientField::new(period)?, octaves, persistence)
    }

    /// Wraps an already-built field, e.g. one with a seeded permutation.
    pub fn with_field(
        field: GradientField,
        octaves: u32,
        persistence: f64,
    ) -> Result<Self, NoiseError> {
        if octaves == 0 {
            return Err(NoiseError::invalid("octaves", "must be a positive integer"));
        }
        if !persistence.is_finite() {
            return Err(NoiseError::invalid(
                "persistence",
                format!("must be finite, got {persistence}"),
            ));
        }
        debug!(
            "fractal sum: period={} octaves={octaves} persistence={persistence}",
            field.period()
        );
        Ok(Self {
            field,
            octaves,
            persistence,
        })
    }

    pub fn field(&self) -> &GradientField {
        &self.field
    }

    pub fn octaves(&self) -> u32 {
        self.octaves
    }

    pub fn persistence(&self) -> f64 {
        self.persistence
    }

    /// `(frequency, amplitude)` of each octave: frequency doubles, amplitude
    /// decays by `persistence`.
    pub fn layers(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        std::iter::successors(Some((1.0f64, 1.0f64)), move |&(frequency, amplitude)| {
            Some((frequency * 2.0, amplitude * self.persistence))
        })
        .take(self.octaves as usize)
    }

    /// Unweighted field value of octave `index` (0-based).
    pub fn octave(&self, index: u32, x: f64, y: f64, z: f64) -> f64 {
        let frequency = 2.0f64.powi(index as i32);
        self.field.evaluate(x * frequency, y * frequency, z * frequency)
    }

    /// Octaves whose scaled coordinates overflow are skipped: past 2^53 every
    /// sample sits on a lattice point anyway, so they contribute nothing.
    pub fn evaluate(&self, x: f64, y: f64, z: f64) -> f64 {
        let finite_input = x.is_finite() && y.is_finite() && z.is_finite();
        let mut total = 0.0f64;
        let mut normalizer = 0.0f64;

        for (frequency, amplitude) in self.layers() {
            let (sx, sy, sz) = (x * frequency, y * frequency, z * frequency);
            if finite_input && !(sx.is_finite() && sy.is_finite() && sz.is_finite()) {
                break;
            }
            total += self.field.evaluate(sx, sy, sz) * amplitude;
            normalizer += amplitude;
        }
        total / normalizer
    }
}

impl Default for FractalSum {
    fn default() -> Self {
        Self {
            field: GradientField::default(),
            octaves: DEFAULT_OCTAVES,
            persistence: DEFAULT_PERSISTENCE,
        }
    }
}

impl NoiseFn<f64, 3> for FractalSum {
    fn get(&self, point: [f64; 3]) -> f64 {
        self.evaluate(point[0], point[1], point[2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let f = FractalSum::default();
        assert_eq!(f.field().period(), 10);
        assert_eq!(f.octaves(), 7);
        assert_eq!(f.persistence(), 0.5);
        assert_eq!(f, FractalSum::new(10, 7, 0.5).unwrap());
    }

    #[test]
    fn pinned_values() {
        let f = FractalSum::default();
        let cases = [
            ((0.0, 0.0, 0.0), 0.0),
            ((0.5, 0.5, 0.5), -0.12598425196850394),
            ((1.25, 2.5, 3.75), 0.1066514863742618),
            ((3.3, 7.1, 0.6), 0.12001861527493299),
            ((9.9, 9.9, 9.9), -0.19492777870473044),
        ];
        for ((x, y, z), expected) in cases {
            let v = f.evaluate(x, y, z);
            assert!(
                (v - expected).abs() < 1e-12,
                "evaluate({x}, {y}, {z}) = {v}, expected {expected}"
            );
        }
    }

    #[test]
    fn single_octave_is_the_raw_field() {
        let f = FractalSum::new(10, 1, 0.5).unwrap();
        for &(x, y, z) in &[(0.5, 0.5, 0.5), (1.25, 2.5, 3.75), (7.7, 0.1, 4.2)] {
            assert_eq!(f.evaluate(x, y, z), f.field().evaluate(x, y, z));
        }
    }

    #[test]
    fn invalid_construction() {
        assert!(matches!(
            FractalSum::new(0, 7, 0.5),
            Err(NoiseError::InvalidParameter { name: "period", .. })
        ));
        assert!(matches!(
            FractalSum::new(10, 0, 0.5),
            Err(NoiseError::InvalidParameter { name: "octaves", .. })
        ));
        assert!(matches!(
            FractalSum::new(10, 7, f64::NAN),
            Err(NoiseError::InvalidParameter { name: "persistence", .. })
        ));
    }

    #[test]
    fn normalized_across_octave_counts() {
        for octaves in [1, 2, 4, 7, 12] {
            for persistence in [0.25, 0.5, 0.75, 0.95] {
                let f = FractalSum::new(10, octaves, persistence).unwrap();
                for i in 0..200 {
                    let t = i as f64 * 0.0731;
                    let v = f.evaluate(t * 1.3, t * 0.7 + 2.0, t * 2.1 + 5.0);
                    assert!(
                        v.abs() <= 1.05,
                        "octaves={octaves} persistence={persistence}: {v}"
                    );
                }
            }
        }
    }

    #[test]
    fn layers_double_and_decay() {
        let f = FractalSum::new(10, 4, 0.5).unwrap();
        let layers: Vec<_> = f.layers().collect();
        assert_eq!(
            layers,
            vec![(1.0, 1.0), (2.0, 0.5), (4.0, 0.25), (8.0, 0.125)]
        );
    }

    #[test]
    fn octaves_recombine_into_the_sum() {
        let f = FractalSum::new(10, 5, 0.6).unwrap();
        let (x, y, z) = (2.2, 3.3, 4.4);
        let mut total = 0.0;
        let mut normalizer = 0.0;
        for (i, (_, amplitude)) in f.layers().enumerate() {
            total += f.octave(i as u32, x, y, z) * amplitude;
            normalizer += amplitude;
        }
        assert!((total / normalizer - f.evaluate(x, y, z)).abs() < 1e-12);
    }

    #[test]
    fn huge_octave_counts_stay_bounded() {
        let deep = FractalSum::new(10, 2000, 0.5).unwrap();
        let shallow = FractalSum::new(10, 64, 0.5).unwrap();
        let v = deep.evaluate(1.3, 2.7, 4.1);
        assert!(v.is_finite() && v.abs() <= 1.05, "{v}");
        assert!((v - shallow.evaluate(1.3, 2.7, 4.1)).abs() < 1e-12);
        assert_eq!(deep.evaluate(0.0, 0.0, 0.0), 0.0);
        for octaves in [1024, 1025, 1100] {
            let f = FractalSum::new(10, octaves, 0.5).unwrap();
            assert!(f.evaluate(1.3, 2.7, 4.1).is_finite(), "octaves={octaves}");
        }
    }

    #[test]
    fn nan_propagates() {
        assert!(FractalSum::default().evaluate(f64::NAN, 0.0, 0.0).is_nan());
    }
}
