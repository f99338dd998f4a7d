// SPDX-License-Identifier: Apache-2.0

// types.rs for minmaxscan
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::constants::{SIMD_MODE_DEFAULT, SIMD_MODE_ENV};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("Invalid SIMD mode {value:?}: expected an integer")]
    InvalidMode { value: String },
}

pub type Result<T> = std::result::Result<T, ScanError>;

// =============================================================================
// OVERRIDE MODE
// =============================================================================

/// Code path override for testing and performance measurements.
///
/// * `0` ([`SimdMode::Auto`]): normal operation, SIMD when compiled in.
///   Inputs with `size <= 8` or `stride != 1` take the single-lane kernel.
/// * `1` ([`SimdMode::ForceSingleLane`]): always take the single-lane SIMD kernel,
///   which would otherwise be hard to reach with realistic inputs.
/// * `2` ([`SimdMode::ForceScalar`]): always take the scalar fallback.
/// * `3` ([`SimdMode::DisableSimd`]): like `2`, and [`crate::should_use_simd`]
///   also reports `false` so callers skip their own SIMD code.
///
/// Any other value is reserved and currently behaves like `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum SimdMode {
    #[default]
    Auto,
    ForceSingleLane,
    ForceScalar,
    DisableSimd,
    Reserved(i64),
}

impl SimdMode {
    /// Scans must use the scalar kernel.
    #[inline]
    pub fn forces_scalar(self) -> bool {
        matches!(self, SimdMode::ForceScalar | SimdMode::DisableSimd)
    }

    /// Scans must not use the bulk kernel.
    #[inline]
    pub fn forces_single_lane(self) -> bool {
        matches!(self, SimdMode::ForceSingleLane)
    }
}

impl From<i64> for SimdMode {
    fn from(value: i64) -> Self {
        match value {
            0 => SimdMode::Auto,
            1 => SimdMode::ForceSingleLane,
            2 => SimdMode::ForceScalar,
            3 => SimdMode::DisableSimd,
            other => SimdMode::Reserved(other),
        }
    }
}

impl From<SimdMode> for i64 {
    fn from(mode: SimdMode) -> Self {
        match mode {
            SimdMode::Auto => 0,
            SimdMode::ForceSingleLane => 1,
            SimdMode::ForceScalar => 2,
            SimdMode::DisableSimd => 3,
            SimdMode::Reserved(other) => other,
        }
    }
}

impl FromStr for SimdMode {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse::<i64>()
            .map(SimdMode::from)
            .map_err(|_| ScanError::InvalidMode {
                value: s.to_string(),
            })
    }
}

impl fmt::Display for SimdMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", i64::from(*self))
    }
}

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Explicit scan configuration.
///
/// The `*_with` entry points take this directly and never consult process-wide
/// state, which keeps them pure. The plain entry points use the value read once
/// from the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScanConfig {
    #[serde(default)]
    pub mode: SimdMode,
}

impl ScanConfig {
    #[inline]
    pub fn new(mode: SimdMode) -> Self {
        Self { mode }
    }

    /// Read the override mode from `MINMAXSCAN_SIMD_MODE`.
    pub fn from_env() -> Self {
        let raw = std::env::var(SIMD_MODE_ENV).ok();
        Self::from_env_value(raw.as_deref())
    }

    /// Resolve a raw environment value. Unset, blank and unparsable values fall
    /// back to the default mode.
    pub fn from_env_value(raw: Option<&str>) -> Self {
        let mode = match raw.map(str::trim) {
            None | Some("") => SimdMode::from(SIMD_MODE_DEFAULT),
            Some(text) => match text.parse::<SimdMode>() {
                Ok(mode) => mode,
                Err(e) => {
                    warn!("{}: {}, using {}", SIMD_MODE_ENV, e, SIMD_MODE_DEFAULT);
                    SimdMode::from(SIMD_MODE_DEFAULT)
                }
            },
        };

        if let SimdMode::Reserved(value) = mode {
            warn!("{}={} is reserved, treating as 0", SIMD_MODE_ENV, value);
        }
        debug!("{} resolved to mode {}", SIMD_MODE_ENV, mode);

        Self { mode }
    }
}

// =============================================================================
// KERNEL SELECTION & CAPABILITIES
// =============================================================================

/// Implementation chosen for one scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kernel {
    /// Portable loop, correct everywhere.
    Scalar,
    /// One element per step through SIMD registers; small or strided inputs.
    SingleLaneSimd,
    /// Full-width groups with a final horizontal reduction; unit stride only.
    BulkSimd,
}

/// Snapshot of what the dispatch layer will do in this process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanCapabilities {
    pub simd_compiled: bool,
    pub instruction_set: &'static str,
    pub mode: SimdMode,
    pub has_simd_support: bool,
    pub should_use_simd: bool,
}
