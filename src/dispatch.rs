// SPDX-License-Identifier: Apache-2.0

//! # minmaxscan dispatch
//!
//! This module chooses between the scalar kernels and the SIMD kernels for every
//! scan, based on what was compiled in, the override mode, the stride and the
//! number of elements.
//!
//! Selection order:
//! 1. SIMD not compiled in, or mode `2`/`3`: scalar.
//! 2. Mode `1`, `stride != 1`, or `size <= 8`: single-lane SIMD.
//! 3. Otherwise: bulk SIMD.
//!
//! Every kernel returns the same `(min, max)` for the same input, so the choice
//! only affects speed.

use lazy_static::lazy_static;
use log::trace;

use super::constants::SIMD_THRESHOLD_BULK;
use crate::kernels;
use crate::types::{Kernel, ScanCapabilities, ScanConfig, SimdMode};

// =============================================================================
//  HARDWARE DETECTION & SIMD CAPABILITIES
// =============================================================================

/// SIMD kernels were compiled for this target.
///
/// SSE2 is part of the x86_64 baseline and NEON of the aarch64 baseline, so no
/// runtime detection is needed. 32-bit x86 needs `target-feature=+sse2`.
pub const SIMD_COMPILED: bool = cfg!(all(
    any(
        target_arch = "x86_64",
        all(target_arch = "x86", target_feature = "sse2"),
        target_arch = "aarch64"
    ),
    not(feature = "disable-simd")
));

/// Name of the compiled-in instruction set, `"none"` for scalar-only builds.
pub const SIMD_INSTRUCTION_SET: &str = if !SIMD_COMPILED {
    "none"
} else if cfg!(target_arch = "aarch64") {
    "neon"
} else {
    "sse2"
};

lazy_static! {
    // Read once; every later call observes the same value.
    static ref SCAN_CONFIG: ScanConfig = ScanConfig::from_env();
}

/// Process-wide configuration, read from the environment on first use.
#[inline]
pub fn scan_config() -> ScanConfig {
    *SCAN_CONFIG
}

/// Process-wide override mode.
#[inline]
pub fn simd_mode() -> SimdMode {
    SCAN_CONFIG.mode
}

/// Snapshot of the dispatch decisions for this process.
pub fn capabilities() -> ScanCapabilities {
    let config = scan_config();
    ScanCapabilities {
        simd_compiled: SIMD_COMPILED,
        instruction_set: SIMD_INSTRUCTION_SET,
        mode: config.mode,
        has_simd_support: has_simd_support_with(&config),
        should_use_simd: should_use_simd_with(&config),
    }
}

// =============================================================================
// KERNEL SELECTION
// =============================================================================

/// Pick the kernel for one scan. Pure; `simd_compiled` is a parameter so the
/// table can be tested on any target.
#[inline]
pub fn select_kernel(simd_compiled: bool, mode: SimdMode, size: usize, stride: usize) -> Kernel {
    if !simd_compiled || mode.forces_scalar() {
        Kernel::Scalar
    } else if mode.forces_single_lane() || stride != 1 || size <= SIMD_THRESHOLD_BULK {
        Kernel::SingleLaneSimd
    } else {
        Kernel::BulkSimd
    }
}

// =============================================================================
// CAPABILITY QUERIES
// =============================================================================

/// SIMD kernels are compiled in and the override does not force scalar.
#[inline]
pub fn has_simd_support() -> bool {
    has_simd_support_with(&scan_config())
}

/// Advisory: callers with their own SIMD paths may use them.
///
/// Weaker than [`has_simd_support`]; only mode `3` turns it off.
#[inline]
pub fn should_use_simd() -> bool {
    should_use_simd_with(&scan_config())
}

#[inline]
pub fn has_simd_support_with(config: &ScanConfig) -> bool {
    SIMD_COMPILED && !config.mode.forces_scalar()
}

#[inline]
pub fn should_use_simd_with(config: &ScanConfig) -> bool {
    SIMD_COMPILED && config.mode != SimdMode::DisableSimd
}

// =============================================================================
// SCAN ENTRY POINTS
// =============================================================================

/// Minimum and maximum of the finite values among `values[0]`, `values[stride]`,
/// ..., `values[(size - 1) * stride]`.
///
/// NaN and infinities are skipped. Returns `(f32::INFINITY, f32::NEG_INFINITY)`
/// when `size == 0` or no element is finite.
///
/// # Panics
/// If `size > 0` and `stride == 0`, or `values` is shorter than
/// `1 + (size - 1) * stride`.
///
/// # Examples
/// ```rust
/// let values = [1.0, f32::NAN, 3.0, f32::INFINITY];
/// assert_eq!(minmaxscan::scan(&values, 4, 1), (1.0, 3.0));
/// ```
#[inline]
pub fn scan(values: &[f32], size: usize, stride: usize) -> (f32, f32) {
    scan_with(values, size, stride, &scan_config())
}

/// Minimum and maximum using plain ordered comparisons.
///
/// NaN never compares less or greater, so it is never adopted. Infinities are
/// ordinary values here and can be returned. Same sentinel and panics as
/// [`scan`].
///
/// # Examples
/// ```rust
/// let values = [1.0, f32::NAN, 3.0, f32::INFINITY];
/// assert_eq!(minmaxscan::scan_unsafe(&values, 4, 1), (1.0, f32::INFINITY));
/// ```
#[inline]
pub fn scan_unsafe(values: &[f32], size: usize, stride: usize) -> (f32, f32) {
    scan_unsafe_with(values, size, stride, &scan_config())
}

/// [`scan`] with an explicit configuration instead of the process-wide one.
#[inline]
pub fn scan_with(values: &[f32], size: usize, stride: usize, config: &ScanConfig) -> (f32, f32) {
    if size == 0 {
        return (f32::INFINITY, f32::NEG_INFINITY);
    }
    check_scan_args(values, size, stride);

    let kernel = select_kernel(SIMD_COMPILED, config.mode, size, stride);
    trace!(
        "SCAN DISPATCH: size={} stride={} mode={} kernel={:?}",
        size,
        stride,
        config.mode,
        kernel
    );

    match kernel {
        Kernel::Scalar => kernels::find_min_max_strided_f32_finite_scalar(values, size, stride),
        simd => simd_kernel::<true>(simd, values, size, stride),
    }
}

/// [`scan_unsafe`] with an explicit configuration instead of the process-wide one.
#[inline]
pub fn scan_unsafe_with(
    values: &[f32],
    size: usize,
    stride: usize,
    config: &ScanConfig,
) -> (f32, f32) {
    if size == 0 {
        return (f32::INFINITY, f32::NEG_INFINITY);
    }
    check_scan_args(values, size, stride);

    let kernel = select_kernel(SIMD_COMPILED, config.mode, size, stride);
    trace!(
        "SCAN_UNSAFE DISPATCH: size={} stride={} mode={} kernel={:?}",
        size,
        stride,
        config.mode,
        kernel
    );

    match kernel {
        Kernel::Scalar => kernels::find_min_max_strided_f32_scalar(values, size, stride),
        simd => simd_kernel::<false>(simd, values, size, stride),
    }
}

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

#[inline]
fn check_scan_args(values: &[f32], size: usize, stride: usize) {
    assert!(stride >= 1, "stride must be at least 1, got 0");
    let required = (size - 1)
        .checked_mul(stride)
        .and_then(|last| last.checked_add(1));
    assert!(
        matches!(required, Some(needed) if needed <= values.len()),
        "buffer of {} elements too short for size={} stride={}",
        values.len(),
        size,
        stride
    );
}

#[cfg(all(
    any(
        target_arch = "x86_64",
        all(target_arch = "x86", target_feature = "sse2"),
        target_arch = "aarch64"
    ),
    not(feature = "disable-simd")
))]
#[inline]
fn simd_kernel<const FINITE: bool>(
    kernel: Kernel,
    values: &[f32],
    size: usize,
    stride: usize,
) -> (f32, f32) {
    unsafe {
        if kernel == Kernel::BulkSimd {
            kernels::find_min_max_f32_simd::<FINITE>(&values[..size])
        } else {
            kernels::find_min_max_strided_f32_simd::<FINITE>(values, size, stride)
        }
    }
}

// Not reachable through select_kernel on scalar-only builds.
#[cfg(not(all(
    any(
        target_arch = "x86_64",
        all(target_arch = "x86", target_feature = "sse2"),
        target_arch = "aarch64"
    ),
    not(feature = "disable-simd")
)))]
#[inline]
fn simd_kernel<const FINITE: bool>(
    _kernel: Kernel,
    values: &[f32],
    size: usize,
    stride: usize,
) -> (f32, f32) {
    if FINITE {
        kernels::find_min_max_strided_f32_finite_scalar(values, size, stride)
    } else {
        kernels::find_min_max_strided_f32_scalar(values, size, stride)
    }
}
