// SPDX-License-Identifier: Apache-2.0

//! Common constants used across implementations
//!
//! This module centralizes lane counts, dispatch thresholds and the name of the
//! override variable used by the scalar/SIMD paths.

// =============================================================================
// SIMD Lane Counts by Architecture
// =============================================================================

// x86/x86_64 (SSE2, 128-bit registers)
#[cfg(all(
    any(
        target_arch = "x86_64",
        all(target_arch = "x86", target_feature = "sse2")
    ),
    not(feature = "disable-simd")
))]
pub const LANES_SSE2_F32: usize = 4; // 128/32 = 4 f32 elements

// NEON (ARM64 only, 128-bit registers)
#[cfg(all(target_arch = "aarch64", not(feature = "disable-simd")))]
pub const LANES_NEON_F32: usize = 4; // 128/32 = 4 f32 elements

// =============================================================================
// Dispatch Thresholds
// =============================================================================

/// Unit-stride scans with more elements than this use the bulk kernel.
/// At or below it the single-lane kernel is cheaper than the reduction setup.
pub const SIMD_THRESHOLD_BULK: usize = 8;

// =============================================================================
// Override Configuration
// =============================================================================

/// Environment variable holding the override mode. For testing and
/// benchmarking only; see [`crate::types::SimdMode`].
pub const SIMD_MODE_ENV: &str = "MINMAXSCAN_SIMD_MODE";

/// Mode used when the variable is unset, blank or unparsable.
pub const SIMD_MODE_DEFAULT: i64 = 0;

// =============================================================================
// IEEE-754 Bit Patterns
// =============================================================================

/// Everything except the sign bit of an f32.
pub const F32_ABS_MASK: u32 = 0x7FFF_FFFF;

/// All-ones exponent; any magnitude at or above it is an infinity or a NaN.
pub const F32_EXP_MASK: u32 = 0x7F80_0000;
