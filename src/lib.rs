// SPDX-License-Identifier: Apache-2.0

//! minmaxscan
//!
//! Minimum and maximum of a sequence of `f32` values, optionally read at a fixed
//! stride (one channel of an interleaved buffer), with SIMD kernels where the
//! target has them and a portable scalar fallback everywhere else.
//!
//! - [`scan`]: skips NaN and infinities
//! - [`scan_unsafe`]: plain ordered comparisons; NaN is never adopted but
//!   infinities are
//! - [`has_simd_support`] / [`should_use_simd`]: capability queries for callers
//!
//! Both scans return `(f32::INFINITY, f32::NEG_INFINITY)` when there is nothing
//! to report, so a later comparison against real data always replaces it.
//!
//! ## Hardware support
//! - **SSE2** on x86_64 (and x86 built with `+sse2`)
//! - **NEON** on aarch64
//! - The `disable-simd` feature compiles both out
//!
//! ## Override
//! `MINMAXSCAN_SIMD_MODE` is read once per process and can force a specific code
//! path for testing and benchmarking; see [`SimdMode`]. The `*_with` entry
//! points take a [`ScanConfig`] directly and ignore the environment.
//!
//! ## Usage
//!
//! ```rust
//! // Second channel of an interleaved two-channel buffer
//! let interleaved = [0.0, 10.0, 1.0, 20.0, 2.0, 30.0];
//! let (min, max) = minmaxscan::scan(&interleaved[1..], 3, 2);
//! assert_eq!((min, max), (10.0, 30.0));
//!
//! let caps = minmaxscan::capabilities();
//! println!("SIMD: {} ({})", caps.has_simd_support, caps.instruction_set);
//! ```

pub mod constants;
pub mod dispatch;
pub mod kernels;
pub mod types;

pub use dispatch::*;
pub use kernels::is_finite_f32;
pub use types::*;

#[cfg(test)]
pub mod test_utils;

#[cfg(test)]
#[path = "tests/dispatch_tests.rs"]
mod dispatch_tests;
#[cfg(test)]
#[path = "tests/kernels_tests.rs"]
mod kernels_tests;
#[cfg(test)]
#[path = "tests/scan_tests.rs"]
mod scan_tests;
#[cfg(test)]
#[path = "tests/types_tests.rs"]
mod types_tests;
