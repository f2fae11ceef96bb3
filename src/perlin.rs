//! Seeded, periodic 3D gradient noise.
//!
//! [`GradientField`] is the leaf primitive of the engine: a classic improved
//! Perlin lattice with a quintic fade, whose coordinates are wrapped by an
//! integer `period` before hashing. [`PermutationTable`] holds the doubled
//! 512-entry lookup it hashes through.
use crate::error::NoiseError;
use log::debug;
use noise::NoiseFn;
use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};

/// The published reference permutation. Must stay bit-exact: every pinned
/// output of the engine depends on it.
pub const REFERENCE_PERMUTATION: [u8; 256] = [
    151, 160, 137, 91, 90, 15, 131, 13, 201, 95, 96, 53, 194, 233, 7, 225,
    140, 36, 103, 30, 69, 142, 8, 99, 37, 240, 21, 10, 23, 190, 6, 148,
    247, 120, 234, 75, 0, 26, 197, 62, 94, 252, 219, 203, 117, 35, 11, 32,
    57, 177, 33, 88, 237, 149, 56, 87, 174, 20, 125, 136, 171, 168, 68, 175,
    74, 165, 71, 134, 139, 48, 27, 166, 77, 146, 158, 231, 83, 111, 229, 122,
    60, 211, 133, 230, 220, 105, 92, 41, 55, 46, 245, 40, 244, 102, 143, 54,
    65, 25, 63, 161, 1, 216, 80, 73, 209, 76, 132, 187, 208, 89, 18, 169,
    200, 196, 135, 130, 116, 188, 159, 86, 164, 100, 109, 198, 173, 186, 3, 64,
    52, 217, 226, 250, 124, 123, 5, 202, 38, 147, 118, 126, 255, 82, 85, 212,
    207, 206, 59, 227, 47, 16, 58, 17, 182, 189, 28, 42, 223, 183, 170, 213,
    119, 248, 152, 2, 44, 154, 163, 70, 221, 153, 101, 155, 167, 43, 172, 9,
    129, 22, 39, 253, 19, 98, 108, 110, 79, 113, 224, 232, 178, 185, 112, 104,
    218, 246, 97, 228, 251, 34, 242, 193, 238, 210, 144, 12, 191, 179, 162, 241,
    81, 51, 145, 235, 249, 14, 239, 107, 49, 192, 214, 31, 181, 199, 106, 157,
    184, 84, 204, 176, 115, 121, 50, 45, 127, 4, 150, 254, 138, 236, 205, 93,
    222, 114, 67, 29, 24, 72, 243, 141, 128, 195, 78, 66, 215, 61, 156, 180,
];

/// Default coordinate wrap modulus.
pub const DEFAULT_PERIOD: u32 = 10;

/// Hashing is confined to a 256-cell torus regardless of the field's period.
const LATTICE_MASK: i64 = 255;

// ── Permutation table ─────────────────────────────────────────────────────────

/// A 256-byte permutation doubled into 512 entries (`p[i] = base[i % 256]`),
/// so chained lookups never need to re-wrap their index.
#[derive(Clone, PartialEq, Eq)]
pub struct PermutationTable {
    p: [u8; 512],
}

impl PermutationTable {
    /// The reference table.
    pub fn reference() -> Self {
        Self::doubled(&REFERENCE_PERMUTATION)
    }

    /// Builds a table from a caller-supplied base sequence. Every byte value
    /// must appear exactly once.
    pub fn new(base: [u8; 256]) -> Result<Self, NoiseError> {
        let mut seen = [false; 256];
        for &b in &base {
            if seen[b as usize] {
                return Err(NoiseError::invalid(
                    "permutation",
                    format!("byte {b} appears more than once"),
                ));
            }
            seen[b as usize] = true;
        }
        Ok(Self::doubled(&base))
    }

    /// Identity sequence shuffled by a seeded `StdRng`. Same seed, same table.
    pub fn shuffled(seed: u64) -> Self {
        let mut base: [u8; 256] = std::array::from_fn(|i| i as u8);
        let mut rng = StdRng::seed_from_u64(seed);
        base.shuffle(&mut rng);
        Self::doubled(&base)
    }

    fn doubled(base: &[u8; 256]) -> Self {
        let mut p = [0u8; 512];
        for (i, slot) in p.iter_mut().enumerate() {
            *slot = base[i % 256];
        }
        Self { p }
    }

    /// The underlying 256-entry base sequence.
    pub fn base(&self) -> &[u8] {
        &self.p[..256]
    }

    /// Three chained lookups: `p[p[p[x] + y] + z]`. Each index must be `<= 256`,
    /// which holds for masked lattice indices and their increments.
    #[inline]
    pub(crate) fn hash(&self, x: usize, y: usize, z: usize) -> u8 {
        let p = &self.p;
        p[p[p[x] as usize + y] as usize + z]
    }
}

impl std::fmt::Debug for PermutationTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermutationTable")
            .field("head", &&self.p[..8])
            .finish_non_exhaustive()
    }
}

// ── Gradient field ────────────────────────────────────────────────────────────

/// Periodic 3D gradient noise. Immutable after construction; safe to share
/// across threads and query concurrently.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientField {
    table: PermutationTable,
    period: u32,
}

impl GradientField {
    /// Field over the reference permutation, wrapping every axis at `period`.
    pub fn new(period: u32) -> Result<Self, NoiseError> {
        Self::with_table(period, PermutationTable::reference())
    }

    /// Field over a caller-supplied base permutation.
    pub fn with_permutation(period: u32, base: [u8; 256]) -> Result<Self, NoiseError> {
        Self::with_table(period, PermutationTable::new(base)?)
    }

    /// Field over a permutation shuffled from `seed`.
    pub fn from_seed(period: u32, seed: u64) -> Result<Self, NoiseError> {
        Self::with_table(period, PermutationTable::shuffled(seed))
    }

    pub fn with_table(period: u32, table: PermutationTable) -> Result<Self, NoiseError> {
        if period == 0 {
            return Err(NoiseError::invalid("period", "must be a positive integer"));
        }
        debug!("gradient field: period={period}");
        Ok(Self { table, period })
    }

    pub fn period(&self) -> u32 {
        self.period
    }

    pub fn table(&self) -> &PermutationTable {
        &self.table
    }

    /// Upper neighbour of a lattice index. Wraps at the period so the lattice
    /// itself tiles; with `period > 256` it may yield 256, which the doubled
    /// table absorbs.
    #[inline]
    fn inc(&self, i: usize) -> usize {
        (i + 1) % self.period as usize
    }

    /// Samples the field. Coordinates are reduced with the floating-point
    /// remainder (sign of the dividend is kept). Output lies roughly in
    /// `[-1, 1]` and is not clamped; non-finite input yields NaN.
    pub fn evaluate(&self, x: f64, y: f64, z: f64) -> f64 {
        let period = f64::from(self.period);
        let (x, y, z) = (x % period, y % period, z % period);

        let (x_floor, y_floor, z_floor) = (x.floor(), y.floor(), z.floor());
        let xi = (x_floor as i64 & LATTICE_MASK) as usize;
        let yi = (y_floor as i64 & LATTICE_MASK) as usize;
        let zi = (z_floor as i64 & LATTICE_MASK) as usize;
        let (xj, yj, zj) = (self.inc(xi), self.inc(yi), self.inc(zi));

        let xf = x - x_floor;
        let yf = y - y_floor;
        let zf = z - z_floor;

        let u = fade(xf);
        let v = fade(yf);
        let w = fade(zf);

        let t = &self.table;

        // Near face (z = zi), interpolated along x then y.
        let x1 = lerp(
            grad(t.hash(xi, yi, zi), xf, yf, zf),
            grad(t.hash(xj, yi, zi), xf - 1.0, yf, zf),
            u,
        );
        let x2 = lerp(
            grad(t.hash(xi, yj, zi), xf, yf - 1.0, zf),
            grad(t.hash(xj, yj, zi), xf - 1.0, yf - 1.0, zf),
            u,
        );
        let y1 = lerp(x1, x2, v);

        // Far face (z = zi + 1).
        let x1 = lerp(
            grad(t.hash(xi, yi, zj), xf, yf, zf - 1.0),
            grad(t.hash(xj, yi, zj), xf - 1.0, yf, zf - 1.0),
            u,
        );
        let x2 = lerp(
            grad(t.hash(xi, yj, zj), xf, yf - 1.0, zf - 1.0),
            grad(t.hash(xj, yj, zj), xf - 1.0, yf - 1.0, zf - 1.0),
            u,
        );
        let y2 = lerp(x1, x2, v);

        lerp(y1, y2, w)
    }
}

impl Default for GradientField {
    fn default() -> Self {
        Self {
            table: PermutationTable::reference(),
            period: DEFAULT_PERIOD,
        }
    }
}

impl NoiseFn<f64, 3> for GradientField {
    fn get(&self, point: [f64; 3]) -> f64 {
        self.evaluate(point[0], point[1], point[2])
    }
}

// ── Interpolation helpers ─────────────────────────────────────────────────────

/// Quintic fade `6t⁵ − 15t⁴ + 10t³`, C² at cell boundaries.
#[inline]
pub fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

/// Dot product of the offset with one of the 12 cube-edge gradients, picked
/// by the low four bits of `hash` (16 cases, four of them repeated).
#[inline]
fn grad(hash: u8, x: f64, y: f64, z: f64) -> f64 {
    let h = hash & 15;
    let u = if h < 8 { x } else { y };
    let v = if h < 4 {
        y
    } else if h == 12 || h == 14 {
        x
    } else {
        z
    };
    (if h & 1 == 0 { u } else { -u }) + (if h & 2 == 0 { v } else { -v })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    fn field() -> GradientField {
        GradientField::new(10).unwrap()
    }

    #[test]
    fn reference_table_is_a_permutation() {
        let mut sorted = REFERENCE_PERMUTATION;
        sorted.sort_unstable();
        for (i, &b) in sorted.iter().enumerate() {
            assert_eq!(b as usize, i);
        }
    }

    #[test]
    fn table_is_doubled() {
        let t = PermutationTable::reference();
        for i in 0..256 {
            assert_eq!(t.p[i], t.p[i + 256]);
        }
        assert_eq!(t.base(), &REFERENCE_PERMUTATION[..]);
    }

    #[test]
    fn origin_hash_chains_three_lookups() {
        let t = PermutationTable::reference();
        let p = &REFERENCE_PERMUTATION;
        let expected = p[p[p[0] as usize] as usize];
        assert_eq!(t.hash(0, 0, 0), expected);
        assert_eq!(expected & 15, 4);
    }

    #[test]
    fn origin_is_zero() {
        // All fade weights are zero at a lattice point, leaving the origin
        // corner's gradient dotted with a zero offset.
        assert_eq!(field().evaluate(0.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn pinned_values() {
        let f = field();
        let cases = [
            ((0.5, 0.5, 0.5), -0.25),
            ((1.25, 2.5, 3.75), -0.03836345672607422),
            ((3.3, 7.1, 0.6), 0.09373086190694413),
            ((9.9, 9.9, 9.9), -0.18830733817835388),
        ];
        for ((x, y, z), expected) in cases {
            let v = f.evaluate(x, y, z);
            assert!(
                (v - expected).abs() < EPS,
                "evaluate({x}, {y}, {z}) = {v}, expected {expected}"
            );
        }
    }

    #[test]
    fn gradient_selection_matches_edge_table() {
        let (x, y, z) = (0.3, -0.7, 1.9);
        let expected = |h: u8| match h {
            0 | 12 => x + y,
            1 | 14 => y - x,
            2 => x - y,
            3 => -x - y,
            4 => x + z,
            5 => z - x,
            6 => x - z,
            7 => -x - z,
            8 => y + z,
            9 | 13 => z - y,
            10 => y - z,
            _ => -y - z,
        };
        for h in 0u8..=255 {
            assert_eq!(grad(h, x, y, z), expected(h & 15), "hash {h}");
        }
    }

    #[test]
    fn fade_endpoints_and_midpoint() {
        assert_eq!(fade(0.0), 0.0);
        assert_eq!(fade(1.0), 1.0);
        assert!((fade(0.5) - 0.5).abs() < EPS);
    }

    #[test]
    fn zero_period_is_rejected() {
        assert!(matches!(
            GradientField::new(0),
            Err(NoiseError::InvalidParameter { name: "period", .. })
        ));
    }

    #[test]
    fn duplicate_permutation_is_rejected() {
        let mut base = REFERENCE_PERMUTATION;
        base[1] = base[0];
        assert!(matches!(
            GradientField::with_permutation(10, base),
            Err(NoiseError::InvalidParameter { name: "permutation", .. })
        ));
    }

    #[test]
    fn supplied_reference_permutation_matches_default() {
        let a = field();
        let b = GradientField::with_permutation(10, REFERENCE_PERMUTATION).unwrap();
        assert_eq!(a.evaluate(1.25, 2.5, 3.75), b.evaluate(1.25, 2.5, 3.75));
    }

    #[test]
    fn seeded_tables_are_reproducible() {
        let a = GradientField::from_seed(10, 42).unwrap();
        let b = GradientField::from_seed(10, 42).unwrap();
        let c = GradientField::from_seed(10, 43).unwrap();
        assert_eq!(a.table(), b.table());
        assert_ne!(a.table().base(), c.table().base());
        assert_ne!(a.table().base(), &REFERENCE_PERMUTATION[..]);

        let mut sorted = a.table().base().to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..=255).collect::<Vec<u8>>());
    }

    #[test]
    fn repeated_queries_are_bit_identical() {
        let f = field();
        let first = f.evaluate(4.123, 5.456, 6.789);
        for _ in 0..10 {
            assert_eq!(f.evaluate(4.123, 5.456, 6.789).to_bits(), first.to_bits());
        }
    }

    #[test]
    fn wraps_at_period_on_every_axis() {
        let f = field();
        let (x, y, z) = (1.37, 4.21, 8.05);
        let base = f.evaluate(x, y, z);
        for shifted in [
            f.evaluate(x + 10.0, y, z),
            f.evaluate(x, y + 10.0, z),
            f.evaluate(x, y, z + 10.0),
            f.evaluate(x + 30.0, y + 20.0, z + 10.0),
        ] {
            assert!((shifted - base).abs() < 1e-9);
        }
    }

    #[test]
    fn continuous_across_cell_boundaries_and_seam() {
        let f = field();
        let eps = 1e-7;
        for boundary in [1.0, 2.0, 5.0, 9.0] {
            let below = f.evaluate(boundary - eps, 3.3, 4.4);
            let above = f.evaluate(boundary + eps, 3.3, 4.4);
            assert!((below - above).abs() < 1e-5, "jump at x={boundary}");
        }
        // Tile seam: x → period wraps to 0.
        let below = f.evaluate(10.0 - eps, 3.3, 4.4);
        let above = f.evaluate(0.0, 3.3, 4.4);
        assert!((below - above).abs() < 1e-5);
    }

    #[test]
    fn large_period_uses_doubled_table() {
        let f = GradientField::new(512).unwrap();
        let v = f.evaluate(255.5, 255.5, 255.5);
        assert!(v.is_finite() && v.abs() <= 1.05);
    }

    #[test]
    fn hash_lattice_aliases_every_256_cells() {
        // The period wraps the coordinate space at 512, but the hash lattice
        // repeats every 256 cells.
        let f = GradientField::new(512).unwrap();
        for x in [0.25, 100.5, 199.75] {
            let low = f.evaluate(x, 1.25, 2.75);
            assert_eq!(f.evaluate(x + 256.0, 1.25, 2.75).to_bits(), low.to_bits());
        }
        let v = f.evaluate(100.5, 1.25, 2.75);
        assert!((v - -0.29246044158935547).abs() < EPS, "{v}");
    }

    #[test]
    fn period_above_lattice_size() {
        let f = GradientField::new(300).unwrap();
        let high = f.evaluate(270.25, 1.25, 2.75);
        assert!((high - 0.21759095415472984).abs() < EPS, "{high}");
        assert_eq!(high.to_bits(), f.evaluate(14.25, 1.25, 2.75).to_bits());
    }

    #[test]
    fn negative_coordinates_keep_remainder_sign() {
        // -0.5 stays negative after the remainder, lands in cell 255 and is
        // not the value at -0.5 + period.
        let f = field();
        let v = f.evaluate(-0.5, 1.25, 2.75);
        assert!((v - -0.020599842071533203).abs() < EPS, "{v}");
        assert!((f.evaluate(9.5, 1.25, 2.75) - 0.2005448341369629).abs() < EPS);
    }

    #[test]
    fn non_finite_input_propagates() {
        let f = field();
        assert!(f.evaluate(f64::NAN, 1.0, 1.0).is_nan());
        assert!(!f.evaluate(f64::INFINITY, 1.0, 1.0).is_finite());
    }

    #[test]
    fn noise_fn_matches_evaluate() {
        let f = field();
        assert_eq!(f.get([3.3, 7.1, 0.6]), f.evaluate(3.3, 7.1, 0.6));
    }
}
