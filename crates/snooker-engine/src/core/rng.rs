//! Seedable pseudo-random numbers (xorshift64) and a smooth 1-D noise field.
//! Deterministic for a given seed.

/// Seedable pseudo-random number generator (xorshift64).
#[derive(Debug, Clone)]
pub struct Rng {
    state: u64,
}

impl Rng {
    /// Small seeds are spread with one splitmix64 round, so early outputs are
    /// not clustered near zero.
    pub fn new(seed: u64) -> Self {
        let mut z = seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^= z >> 31;
        Rng {
            state: if z == 0 { 1 } else { z },
        }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Uniform float in [0, 1).
    pub fn next_f32(&mut self) -> f32 {
        // 24 bits fit an f32 mantissa exactly.
        (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32
    }

    /// Uniform float in [lo, hi).
    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.next_f32()
    }

    /// `true` with probability `p`.
    pub fn chance(&mut self, p: f32) -> bool {
        self.next_f32() < p
    }
}

const LATTICE: usize = 256;
const OCTAVES: u32 = 4;
const FALLOFF: f32 = 0.5;

/// Layered value noise over one dimension, output in [0, 1).
///
/// Nearby inputs give nearby outputs, so sampling at small steps yields
/// clustered rather than uniform placements.
#[derive(Debug, Clone)]
pub struct NoiseField {
    lattice: Vec<f32>,
}

impl NoiseField {
    pub fn new(rng: &mut Rng) -> Self {
        let lattice = (0..LATTICE).map(|_| rng.next_f32()).collect();
        Self { lattice }
    }

    fn value_at(&self, i: i64) -> f32 {
        self.lattice[i.rem_euclid(LATTICE as i64) as usize]
    }

    fn octave(&self, x: f32) -> f32 {
        let floor = x.floor();
        let t = x - floor;
        let i = floor as i64;
        let smooth = t * t * (3.0 - 2.0 * t);
        let a = self.value_at(i);
        let b = self.value_at(i + 1);
        a + (b - a) * smooth
    }

    pub fn sample(&self, x: f32) -> f32 {
        let mut total = 0.0;
        let mut amplitude = FALLOFF;
        let mut norm = 0.0;
        let mut frequency = 1.0;
        for _ in 0..OCTAVES {
            total += self.octave(x * frequency) * amplitude;
            norm += amplitude;
            amplitude *= FALLOFF;
            frequency *= 2.0;
        }
        (total / norm).clamp(0.0, 0.999_999)
    }
}
