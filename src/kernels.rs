// SPDX-License-Identifier: Apache-2.0

//! Min/max scan kernels
//!
//! Scalar kernels are the reference: every SIMD kernel must produce the same
//! `(min, max)` for the same input. SIMD kernels are written once against
//! `LaneAccumulator` and instantiated per architecture (SSE2 on x86/x86_64,
//! NEON on aarch64).
//!
//! Two flavours exist for every kernel:
//! - plain: ordered `<` / `>` semantics. NaN never wins a comparison and is
//!   therefore never adopted; infinities participate normally.
//! - finite: NaN and both infinities are skipped entirely.
//!
//! Accumulators start at `(+inf, -inf)` and candidates are always folded so an
//! unordered comparison keeps the accumulator. That is what keeps NaN out of
//! every lane on every path.

// Some clippy lints are noisy for low-level SIMD code; we opt out at the module level.
#![allow(unsafe_op_in_unsafe_fn)]
#![allow(clippy::missing_safety_doc)]

use super::constants::{F32_ABS_MASK, F32_EXP_MASK};

// =============================================================================
// FINITE-VALUE PREDICATE
// =============================================================================

/// `true` unless `value` is NaN or an infinity.
///
/// Works on the raw bits: with the sign masked off, every finite value sorts
/// strictly below the all-ones exponent pattern.
#[inline(always)]
pub fn is_finite_f32(value: f32) -> bool {
  (value.to_bits() & F32_ABS_MASK) < F32_EXP_MASK
}

// =============================================================================
// SCALAR KERNELS
// =============================================================================

/// Reference min/max over `values[0], values[stride], ...`, `size` elements.
#[inline]
pub(crate) fn find_min_max_strided_f32_scalar(
  values: &[f32],
  size: usize,
  stride: usize,
) -> (f32, f32) {
  let mut min = f32::INFINITY;
  let mut max = f32::NEG_INFINITY;

  for &val in values.iter().step_by(stride).take(size) {
    if val < min {
      min = val;
    }
    if val > max {
      max = val;
    }
  }

  (min, max)
}

/// As [`find_min_max_strided_f32_scalar`], skipping NaN and infinities.
#[inline]
pub(crate) fn find_min_max_strided_f32_finite_scalar(
  values: &[f32],
  size: usize,
  stride: usize,
) -> (f32, f32) {
  let mut min = f32::INFINITY;
  let mut max = f32::NEG_INFINITY;

  for &val in values.iter().step_by(stride).take(size) {
    if !is_finite_f32(val) {
      continue;
    }
    if val < min {
      min = val;
    }
    if val > max {
      max = val;
    }
  }

  (min, max)
}

// =============================================================================
// LANE ACCUMULATOR INTERFACE
// =============================================================================

/// Running per-lane minimum and maximum held in SIMD registers.
///
/// Implementations only need the architecture-specific pieces; traversal lives
/// in the kernels below, written once against `SimdMinMax`.
#[cfg(all(
  any(
    target_arch = "x86_64",
    all(target_arch = "x86", target_feature = "sse2"),
    target_arch = "aarch64"
  ),
  not(feature = "disable-simd")
))]
pub(crate) trait LaneAccumulator: Copy {
  const LANES: usize;

  /// Every min lane at `+inf`, every max lane at `-inf`.
  unsafe fn empty() -> Self;

  /// Fold `LANES` contiguous values, one per lane.
  unsafe fn fold_group(&mut self, group: &[f32]);

  /// As `fold_group`, ignoring lanes that hold a non-finite value.
  unsafe fn fold_group_finite(&mut self, group: &[f32]);

  /// Fold one value into lane 0, leaving the other lanes untouched.
  unsafe fn fold_one(&mut self, value: f32);

  /// As `fold_one`, ignoring a non-finite value.
  unsafe fn fold_one_finite(&mut self, value: f32);

  /// Horizontal reduction of all lanes.
  unsafe fn reduce(self) -> (f32, f32);

  /// Lane 0 only, for kernels that never touch the other lanes.
  unsafe fn lane0(self) -> (f32, f32);
}

#[cfg(all(
  any(target_arch = "x86_64", all(target_arch = "x86", target_feature = "sse2")),
  not(feature = "disable-simd")
))]
pub(crate) use sse2::Sse2MinMax as SimdMinMax;

#[cfg(all(target_arch = "aarch64", not(feature = "disable-simd")))]
pub(crate) use neon::NeonMinMax as SimdMinMax;

// =============================================================================
// SIMD KERNELS
// =============================================================================

/// Bulk kernel: full groups lane-wise, remainder through lane 0, one reduction.
/// Unit stride only; `values` is exactly the scanned range.
#[cfg(all(
  any(
    target_arch = "x86_64",
    all(target_arch = "x86", target_feature = "sse2"),
    target_arch = "aarch64"
  ),
  not(feature = "disable-simd")
))]
#[inline]
pub(crate) unsafe fn find_min_max_f32_simd<const FINITE: bool>(values: &[f32]) -> (f32, f32) {
  let mut acc = SimdMinMax::empty();

  let mut groups = values.chunks_exact(SimdMinMax::LANES);
  for group in &mut groups {
    if FINITE {
      acc.fold_group_finite(group);
    } else {
      acc.fold_group(group);
    }
  }

  for &val in groups.remainder() {
    if FINITE {
      acc.fold_one_finite(val);
    } else {
      acc.fold_one(val);
    }
  }

  let (mut min, mut max) = acc.reduce();

  // +0.0 and -0.0 compare equal, so the lanes and the reduction can settle on
  // either. The scalar rule keeps the first one seen.
  if min == 0.0 {
    min = first_zero(values, min);
  }
  if max == 0.0 {
    max = first_zero(values, max);
  }

  (min, max)
}

/// Single-lane kernel: one logical element per step, any stride.
#[cfg(all(
  any(
    target_arch = "x86_64",
    all(target_arch = "x86", target_feature = "sse2"),
    target_arch = "aarch64"
  ),
  not(feature = "disable-simd")
))]
#[inline]
pub(crate) unsafe fn find_min_max_strided_f32_simd<const FINITE: bool>(
  values: &[f32],
  size: usize,
  stride: usize,
) -> (f32, f32) {
  let mut acc = SimdMinMax::empty();

  for &val in values.iter().step_by(stride).take(size) {
    if FINITE {
      acc.fold_one_finite(val);
    } else {
      acc.fold_one(val);
    }
  }

  acc.lane0()
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
fn first_zero(values: &[f32], fallback: f32) -> f32 {
  values.iter().copied().find(|&v| v == 0.0).unwrap_or(fallback)
}

// =============================================================================
// SSE2 (x86 / x86_64)
// =============================================================================

#[cfg(all(
  any(target_arch = "x86_64", all(target_arch = "x86", target_feature = "sse2")),
  not(feature = "disable-simd")
))]
mod sse2 {
  #[cfg(target_arch = "x86")]
  use std::arch::x86::{
    __m128, _mm_and_ps, _mm_andnot_ps, _mm_cmpneq_ps, _mm_cmpord_ps, _mm_cvtss_f32, _mm_loadu_ps,
    _mm_max_ps, _mm_max_ss, _mm_min_ps, _mm_min_ss, _mm_move_ss, _mm_or_ps, _mm_set1_ps,
    _mm_set_ss, _mm_shuffle_ps,
  };
  #[cfg(target_arch = "x86_64")]
  use std::arch::x86_64::{
    __m128, _mm_and_ps, _mm_andnot_ps, _mm_cmpneq_ps, _mm_cmpord_ps, _mm_cvtss_f32, _mm_loadu_ps,
    _mm_max_ps, _mm_max_ss, _mm_min_ps, _mm_min_ss, _mm_move_ss, _mm_or_ps, _mm_set1_ps,
    _mm_set_ss, _mm_shuffle_ps,
  };

  use super::LaneAccumulator;
  use crate::constants::LANES_SSE2_F32;

  #[derive(Clone, Copy)]
  pub(crate) struct Sse2MinMax {
    min: __m128,
    max: __m128,
  }

  impl Sse2MinMax {
    // All ones where the lane is neither NaN nor +/-inf.
    #[inline(always)]
    unsafe fn finite_mask(v: __m128) -> __m128 {
      let pos_inf = _mm_set1_ps(f32::INFINITY);
      let neg_inf = _mm_set1_ps(f32::NEG_INFINITY);
      _mm_and_ps(
        _mm_and_ps(_mm_cmpord_ps(v, v), _mm_cmpneq_ps(v, pos_inf)),
        _mm_cmpneq_ps(v, neg_inf),
      )
    }

    #[inline(always)]
    unsafe fn select(mask: __m128, if_set: __m128, otherwise: __m128) -> __m128 {
      _mm_or_ps(_mm_and_ps(mask, if_set), _mm_andnot_ps(mask, otherwise))
    }
  }

  // minps/maxps return the second operand when either lane is NaN, so the
  // accumulator always goes second.
  impl LaneAccumulator for Sse2MinMax {
    const LANES: usize = LANES_SSE2_F32;

    #[inline(always)]
    unsafe fn empty() -> Self {
      Self {
        min: _mm_set1_ps(f32::INFINITY),
        max: _mm_set1_ps(f32::NEG_INFINITY),
      }
    }

    #[inline(always)]
    unsafe fn fold_group(&mut self, group: &[f32]) {
      debug_assert!(group.len() >= Self::LANES);
      let v = _mm_loadu_ps(group.as_ptr());
      self.min = _mm_min_ps(v, self.min);
      self.max = _mm_max_ps(v, self.max);
    }

    #[inline(always)]
    unsafe fn fold_group_finite(&mut self, group: &[f32]) {
      debug_assert!(group.len() >= Self::LANES);
      let v = _mm_loadu_ps(group.as_ptr());
      let valid = Self::finite_mask(v);

      let masked_min = Self::select(valid, v, self.min);
      let masked_max = Self::select(valid, v, self.max);

      self.min = _mm_min_ps(masked_min, self.min);
      self.max = _mm_max_ps(masked_max, self.max);
    }

    #[inline(always)]
    unsafe fn fold_one(&mut self, value: f32) {
      let v = _mm_set_ss(value);
      // min_ss takes lanes 1..3 from its first operand; move_ss puts ours back.
      self.min = _mm_move_ss(self.min, _mm_min_ss(v, self.min));
      self.max = _mm_move_ss(self.max, _mm_max_ss(v, self.max));
    }

    #[inline(always)]
    unsafe fn fold_one_finite(&mut self, value: f32) {
      let v = _mm_set_ss(value);
      let valid = Self::finite_mask(v);

      let masked_min = Self::select(valid, v, self.min);
      let masked_max = Self::select(valid, v, self.max);

      self.min = _mm_move_ss(self.min, _mm_min_ss(masked_min, self.min));
      self.max = _mm_move_ss(self.max, _mm_max_ss(masked_max, self.max));
    }

    #[inline(always)]
    unsafe fn reduce(self) -> (f32, f32) {
      // Rotate by one lane, then by two: every lane ends up holding the extreme.
      // 0x93 = _MM_SHUFFLE(2, 1, 0, 3), 0x4E = _MM_SHUFFLE(1, 0, 3, 2)
      let mut min = self.min;
      min = _mm_min_ps(min, _mm_shuffle_ps::<0x93>(min, min));
      min = _mm_min_ps(min, _mm_shuffle_ps::<0x4E>(min, min));

      let mut max = self.max;
      max = _mm_max_ps(max, _mm_shuffle_ps::<0x93>(max, max));
      max = _mm_max_ps(max, _mm_shuffle_ps::<0x4E>(max, max));

      (_mm_cvtss_f32(min), _mm_cvtss_f32(max))
    }

    #[inline(always)]
    unsafe fn lane0(self) -> (f32, f32) {
      (_mm_cvtss_f32(self.min), _mm_cvtss_f32(self.max))
    }
  }
}

// =============================================================================
// NEON (aarch64)
// =============================================================================

#[cfg(all(target_arch = "aarch64", not(feature = "disable-simd")))]
mod neon {
  use std::arch::aarch64::{
    float32x4_t, uint32x4_t, vandq_u32, vbslq_f32, vceqq_f32, vcgtq_f32, vcltq_f32, vdupq_n_f32,
    vextq_f32, vgetq_lane_f32, vld1q_f32, vmaxq_f32, vminq_f32, vmvnq_u32, vsetq_lane_f32,
  };

  use super::LaneAccumulator;
  use crate::constants::LANES_NEON_F32;

  #[derive(Clone, Copy)]
  pub(crate) struct NeonMinMax {
    min: float32x4_t,
    max: float32x4_t,
  }

  impl NeonMinMax {
    // All ones where the lane is neither NaN nor +/-inf.
    #[inline(always)]
    unsafe fn finite_mask(v: float32x4_t) -> uint32x4_t {
      let pos_inf = vdupq_n_f32(f32::INFINITY);
      let neg_inf = vdupq_n_f32(f32::NEG_INFINITY);
      vandq_u32(
        vandq_u32(vceqq_f32(v, v), vmvnq_u32(vceqq_f32(v, pos_inf))),
        vmvnq_u32(vceqq_f32(v, neg_inf)),
      )
    }
  }

  // vminq/vmaxq propagate NaN, so lanes are updated with compare-and-select,
  // which is exactly the scalar `<` / `>` rule.
  impl LaneAccumulator for NeonMinMax {
    const LANES: usize = LANES_NEON_F32;

    #[inline(always)]
    unsafe fn empty() -> Self {
      Self {
        min: vdupq_n_f32(f32::INFINITY),
        max: vdupq_n_f32(f32::NEG_INFINITY),
      }
    }

    #[inline(always)]
    unsafe fn fold_group(&mut self, group: &[f32]) {
      debug_assert!(group.len() >= Self::LANES);
      let v = vld1q_f32(group.as_ptr());
      self.min = vbslq_f32(vcltq_f32(v, self.min), v, self.min);
      self.max = vbslq_f32(vcgtq_f32(v, self.max), v, self.max);
    }

    #[inline(always)]
    unsafe fn fold_group_finite(&mut self, group: &[f32]) {
      debug_assert!(group.len() >= Self::LANES);
      let v = vld1q_f32(group.as_ptr());
      let valid = Self::finite_mask(v);

      let take_min = vandq_u32(valid, vcltq_f32(v, self.min));
      let take_max = vandq_u32(valid, vcgtq_f32(v, self.max));

      self.min = vbslq_f32(take_min, v, self.min);
      self.max = vbslq_f32(take_max, v, self.max);
    }

    #[inline(always)]
    unsafe fn fold_one(&mut self, value: f32) {
      // Upper lanes of the candidate equal the accumulator, so they never compare true.
      let cand_min = vsetq_lane_f32::<0>(value, self.min);
      let cand_max = vsetq_lane_f32::<0>(value, self.max);
      self.min = vbslq_f32(vcltq_f32(cand_min, self.min), cand_min, self.min);
      self.max = vbslq_f32(vcgtq_f32(cand_max, self.max), cand_max, self.max);
    }

    #[inline(always)]
    unsafe fn fold_one_finite(&mut self, value: f32) {
      let valid = Self::finite_mask(vdupq_n_f32(value));

      let cand_min = vsetq_lane_f32::<0>(value, self.min);
      let cand_max = vsetq_lane_f32::<0>(value, self.max);
      let take_min = vandq_u32(valid, vcltq_f32(cand_min, self.min));
      let take_max = vandq_u32(valid, vcgtq_f32(cand_max, self.max));

      self.min = vbslq_f32(take_min, cand_min, self.min);
      self.max = vbslq_f32(take_max, cand_max, self.max);
    }

    #[inline(always)]
    unsafe fn reduce(self) -> (f32, f32) {
      // Accumulators never hold NaN, so vminq/vmaxq are safe here.
      let mut min = self.min;
      min = vminq_f32(min, vextq_f32::<1>(min, min));
      min = vminq_f32(min, vextq_f32::<2>(min, min));

      let mut max = self.max;
      max = vmaxq_f32(max, vextq_f32::<1>(max, max));
      max = vmaxq_f32(max, vextq_f32::<2>(max, max));

      (vgetq_lane_f32::<0>(min), vgetq_lane_f32::<0>(max))
    }

    #[inline(always)]
    unsafe fn lane0(self) -> (f32, f32) {
      (vgetq_lane_f32::<0>(self.min), vgetq_lane_f32::<0>(self.max))
    }
  }
}
