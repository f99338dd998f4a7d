// SPDX-License-Identifier: Apache-2.0

//! Test-only helpers: reproducible inputs and the list of configurations every
//! multi-path test runs through.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::types::{ScanConfig, SimdMode};

/// Modes that must all produce the same scan result.
pub const PATH_MODES: [SimdMode; 4] = [
    SimdMode::Auto,
    SimdMode::ForceSingleLane,
    SimdMode::ForceScalar,
    SimdMode::DisableSimd,
];

pub fn path_configs() -> impl Iterator<Item = ScanConfig> {
    PATH_MODES.into_iter().map(ScanConfig::new)
}

/// `len` finite values in `[-range, range)`, same sequence for the same seed.
pub fn random_finite_f32(seed: u64, len: usize, range: f32) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen_range(-range..range)).collect()
}

/// Random finite values with NaN and infinities sprinkled in at roughly
/// `special_ratio` of the positions.
pub fn random_with_specials(seed: u64, len: usize, special_ratio: f64) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len)
        .map(|_| {
            if rng.gen_bool(special_ratio) {
                match rng.gen_range(0..3) {
                    0 => f32::NAN,
                    1 => f32::INFINITY,
                    _ => f32::NEG_INFINITY,
                }
            } else {
                rng.gen_range(-1.0e3f32..1.0e3f32)
            }
        })
        .collect()
}

/// Interleave `channel` at `offset` of a `stride`-wide buffer, filling every
/// other slot with `filler`.
pub fn interleave(channel: &[f32], stride: usize, offset: usize, filler: f32) -> Vec<f32> {
    assert!(offset < stride);
    let mut buffer = vec![filler; channel.len() * stride];
    for (i, &val) in channel.iter().enumerate() {
        buffer[i * stride + offset] = val;
    }
    buffer
}
