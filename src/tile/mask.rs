//! Pyramidal blend weight masks.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use ndarray::Array2;
use once_cell::sync::Lazy;

/// Lower bound on mask weights. Exact-zero corner weights would let a corner
/// pixel contribute nothing and risk a zero divisor where a single patch
/// covers it.
const WEIGHT_FLOOR: f32 = 1e-6;

/// Masks are a pure function of the patch size, so they are computed once
/// per size and shared read-only across all reconstructions.
static MASK_CACHE: Lazy<Mutex<HashMap<usize, Arc<Array2<f32>>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// The blend weight mask for a given patch size.
///
/// The mask is a separable pyramid: 1.0 at the center, falling off linearly
/// to (almost) zero at the edges along each axis independently. Weights stay
/// within `(0, 1]`.
pub fn blend_mask(patch_size: usize) -> Arc<Array2<f32>> {
    let mut cache = MASK_CACHE.lock().expect("mask cache lock");
    Arc::clone(
        cache
            .entry(patch_size)
            .or_insert_with(|| Arc::new(build_mask(patch_size))),
    )
}

#[allow(clippy::cast_precision_loss)]
fn build_mask(patch_size: usize) -> Array2<f32> {
    // Linear ramp from -1 to 1 across the patch; a 1x1 patch has no ramp.
    let ramp: Vec<f32> = if patch_size == 1 {
        vec![1.0]
    } else {
        (0..patch_size)
            .map(|i| {
                let u = 2.0 * i as f32 / (patch_size - 1) as f32 - 1.0;
                1.0 - u.abs()
            })
            .collect()
    };

    Array2::from_shape_fn((patch_size, patch_size), |(i, j)| {
        (ramp[i] * ramp[j]).max(WEIGHT_FLOOR)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_is_one_for_odd_size() {
        let mask = build_mask(5);
        assert_eq!(mask[[2, 2]], 1.0);
    }

    #[test]
    fn test_peak_sits_at_center_for_even_size() {
        // The two central ramp values differ by float rounding, so compare
        // with a tolerance rather than bit-exactly.
        let mask = build_mask(4);
        let peak = mask.iter().copied().fold(f32::MIN, f32::max);
        for cell in [[1, 1], [1, 2], [2, 1], [2, 2]] {
            assert!((mask[cell] - peak).abs() < 1e-6);
        }
        assert!(mask[[0, 0]] < peak);
    }

    #[test]
    fn test_corners_are_floored_not_zero() {
        for size in [2, 5, 8, 256] {
            let mask = build_mask(size);
            assert_eq!(mask[[0, 0]], WEIGHT_FLOOR);
            assert_eq!(mask[[size - 1, size - 1]], WEIGHT_FLOOR);
        }
    }

    #[test]
    fn test_values_in_unit_interval() {
        let mask = build_mask(17);
        for &w in &mask {
            assert!(w > 0.0 && w <= 1.0);
        }
    }

    #[test]
    fn test_monotone_non_increasing_outward() {
        // Tolerance covers the float asymmetry between mirrored ramp cells.
        const EPS: f32 = 1e-6;
        for size in [7, 8] {
            let mask = build_mask(size);
            let mid = size / 2;
            for i in 0..size {
                // Moving away from the center column, weights never grow.
                for j in mid..size - 1 {
                    assert!(mask[[i, j + 1]] <= mask[[i, j]] + EPS);
                }
                for j in (1..=mid).rev() {
                    assert!(mask[[i, j - 1]] <= mask[[i, j]] + EPS);
                }
            }
        }
    }

    #[test]
    fn test_one_by_one_mask() {
        let mask = build_mask(1);
        assert_eq!(mask.dim(), (1, 1));
        assert_eq!(mask[[0, 0]], 1.0);
    }

    #[test]
    fn test_cache_returns_shared_mask() {
        let a = blend_mask(12);
        let b = blend_mask(12);
        assert!(Arc::ptr_eq(&a, &b));
    }
}
