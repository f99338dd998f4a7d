// SPDX-License-Identifier: Apache-2.0

// =============================================================================
// KERNEL TESTS
// =============================================================================

#[cfg(test)]
mod tests {
  use crate::kernels::{
    find_min_max_strided_f32_finite_scalar, find_min_max_strided_f32_scalar, is_finite_f32,
  };
  use crate::test_utils::{random_finite_f32, random_with_specials};

  const EMPTY: (f32, f32) = (f32::INFINITY, f32::NEG_INFINITY);

  fn bits(pair: (f32, f32)) -> (u32, u32) {
    (pair.0.to_bits(), pair.1.to_bits())
  }

  // =============================================================================
  //   FINITE PREDICATE
  // =============================================================================

  #[test]
  fn test_is_finite_f32_special_values() {
    assert!(is_finite_f32(0.0));
    assert!(is_finite_f32(-0.0));
    assert!(is_finite_f32(1.5));
    assert!(is_finite_f32(-1.5));
    assert!(is_finite_f32(f32::MAX));
    assert!(is_finite_f32(f32::MIN));
    assert!(is_finite_f32(f32::MIN_POSITIVE));
    assert!(is_finite_f32(f32::from_bits(1))); // smallest subnormal
    assert!(is_finite_f32(-f32::from_bits(1)));

    assert!(!is_finite_f32(f32::INFINITY));
    assert!(!is_finite_f32(f32::NEG_INFINITY));
    assert!(!is_finite_f32(f32::NAN));
    assert!(!is_finite_f32(-f32::NAN));
  }

  #[test]
  fn test_is_finite_f32_nan_payloads() {
    // Quiet and signalling NaNs with various payloads, both signs.
    for payload in [0x0000_0001u32, 0x0040_0000, 0x007F_FFFF, 0x0012_3456] {
      let nan = f32::from_bits(0x7F80_0000 | payload);
      assert!(nan.is_nan());
      assert!(!is_finite_f32(nan), "payload {:#x}", payload);
      assert!(!is_finite_f32(-nan), "negative payload {:#x}", payload);
    }
  }

  #[test]
  fn test_is_finite_f32_agrees_with_std() {
    // Walk the exponent range and the boundaries around it.
    let mut patterns = Vec::new();
    for exp in 0u32..=0xFF {
      for mantissa in [0u32, 1, 0x40_0000, 0x7F_FFFF] {
        patterns.push((exp << 23) | mantissa);
        patterns.push(0x8000_0000 | (exp << 23) | mantissa);
      }
    }
    for raw in patterns {
      let val = f32::from_bits(raw);
      assert_eq!(is_finite_f32(val), val.is_finite(), "bits {:#010x}", raw);
    }
  }

  // =============================================================================
  //   SCALAR KERNELS
  // =============================================================================

  #[test]
  fn test_scalar_basic() {
    let values = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0];
    assert_eq!(find_min_max_strided_f32_scalar(&values, 8, 1), (1.0, 9.0));
    assert_eq!(find_min_max_strided_f32_finite_scalar(&values, 8, 1), (1.0, 9.0));
  }

  #[test]
  fn test_scalar_empty() {
    assert_eq!(find_min_max_strided_f32_scalar(&[], 0, 1), EMPTY);
    assert_eq!(find_min_max_strided_f32_finite_scalar(&[], 0, 1), EMPTY);
    assert_eq!(find_min_max_strided_f32_scalar(&[5.0], 0, 3), EMPTY);
  }

  #[test]
  fn test_scalar_nan_and_infinity_semantics() {
    let values = [1.0, f32::NAN, 3.0, f32::INFINITY];
    assert_eq!(find_min_max_strided_f32_scalar(&values, 4, 1), (1.0, f32::INFINITY));
    assert_eq!(find_min_max_strided_f32_finite_scalar(&values, 4, 1), (1.0, 3.0));

    let leading_nan = [f32::NAN, 2.0, -2.0];
    assert_eq!(find_min_max_strided_f32_scalar(&leading_nan, 3, 1), (-2.0, 2.0));

    let neg_inf = [f32::NEG_INFINITY, 0.5];
    assert_eq!(find_min_max_strided_f32_scalar(&neg_inf, 2, 1), (f32::NEG_INFINITY, 0.5));
    assert_eq!(find_min_max_strided_f32_finite_scalar(&neg_inf, 2, 1), (0.5, 0.5));
  }

  #[test]
  fn test_scalar_strided_reads_only_selected_offsets() {
    let values = [0.0, 10.0, 1.0, 20.0, 2.0, 30.0];
    assert_eq!(find_min_max_strided_f32_scalar(&values, 3, 2), (0.0, 2.0));
    assert_eq!(find_min_max_strided_f32_finite_scalar(&values, 3, 2), (0.0, 2.0));
    // size limits how far the stride walks even when the buffer is longer
    assert_eq!(find_min_max_strided_f32_scalar(&values, 2, 2), (0.0, 1.0));
  }

  // =============================================================================
  //   SIMD KERNELS AGAINST THE SCALAR REFERENCE
  // =============================================================================

  #[cfg(all(
    any(
      target_arch = "x86_64",
      all(target_arch = "x86", target_feature = "sse2"),
      target_arch = "aarch64"
    ),
    not(feature = "disable-simd")
  ))]
  mod simd {
    use super::*;
    use crate::kernels::{find_min_max_f32_simd, find_min_max_strided_f32_simd};

    fn check(values: &[f32]) {
      let len = values.len();
      let fast = find_min_max_strided_f32_scalar(values, len, 1);
      let safe = find_min_max_strided_f32_finite_scalar(values, len, 1);
      unsafe {
        assert_eq!(bits(find_min_max_f32_simd::<false>(values)), bits(fast), "bulk {:?}", values);
        assert_eq!(
          bits(find_min_max_f32_simd::<true>(values)),
          bits(safe),
          "bulk finite {:?}",
          values
        );
        assert_eq!(
          bits(find_min_max_strided_f32_simd::<false>(values, len, 1)),
          bits(fast),
          "single-lane {:?}",
          values
        );
        assert_eq!(
          bits(find_min_max_strided_f32_simd::<true>(values, len, 1)),
          bits(safe),
          "single-lane finite {:?}",
          values
        );
      }
    }

    #[test]
    fn test_simd_matches_scalar_every_tail_length() {
      for len in 0..=19 {
        check(&random_finite_f32(len as u64, len, 100.0));
      }
    }

    #[test]
    fn test_simd_extremes_in_tail() {
      // 8 full-group elements then the extremes in the remainder
      let mut values = vec![0.5; 8];
      values.extend_from_slice(&[-7.0, 7.0, 0.25]);
      check(&values);
      assert_eq!(unsafe { find_min_max_f32_simd::<false>(&values) }, (-7.0, 7.0));
    }

    #[test]
    fn test_simd_nan_in_first_group_is_not_adopted() {
      let values = [f32::NAN, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, f32::NAN];
      check(&values);
      assert_eq!(unsafe { find_min_max_f32_simd::<false>(&values) }, (1.0, 8.0));
    }

    #[test]
    fn test_simd_finite_mask_does_not_leak_across_lanes() {
      // one bad lane per group, the good lanes of the same group still count
      let values = [
        f32::INFINITY, -3.0, 2.0, 1.0, 4.0, f32::NAN, 9.0, 0.0, -1.0, 5.0, f32::NEG_INFINITY, 6.0,
      ];
      check(&values);
      assert_eq!(unsafe { find_min_max_f32_simd::<true>(&values) }, (-3.0, 9.0));
      assert_eq!(
        unsafe { find_min_max_f32_simd::<false>(&values) },
        (f32::NEG_INFINITY, f32::INFINITY)
      );
    }

    #[test]
    fn test_simd_signed_zero_ties_keep_first_seen() {
      // zeros land in different lanes; the reduction alone could pick either sign
      let mut pos_first = vec![1.0f32; 12];
      pos_first[0] = 0.0;
      pos_first[1] = -0.0;
      check(&pos_first);
      let (min, _) = unsafe { find_min_max_f32_simd::<false>(&pos_first) };
      assert_eq!(min.to_bits(), 0.0f32.to_bits());

      let mut neg_first = vec![-1.0f32; 13];
      neg_first[5] = -0.0;
      neg_first[6] = 0.0;
      neg_first[12] = 0.0;
      check(&neg_first);
      let (_, max) = unsafe { find_min_max_f32_simd::<true>(&neg_first) };
      assert_eq!(max.to_bits(), (-0.0f32).to_bits());
    }

    #[test]
    fn test_simd_random_with_specials() {
      for seed in 0..32 {
        check(&random_with_specials(seed, 257, 0.1));
      }
    }

    #[test]
    fn test_simd_strided_matches_scalar() {
      let values = random_with_specials(7, 999, 0.05);
      for stride in 1..=9 {
        let size = (values.len() - 1) / stride + 1;
        let fast = find_min_max_strided_f32_scalar(&values, size, stride);
        let safe = find_min_max_strided_f32_finite_scalar(&values, size, stride);
        unsafe {
          assert_eq!(bits(find_min_max_strided_f32_simd::<false>(&values, size, stride)), bits(fast));
          assert_eq!(bits(find_min_max_strided_f32_simd::<true>(&values, size, stride)), bits(safe));
        }
      }
    }
  }
}
