//! Bracket-expanding ternary search for single-dip functions.

use crate::error::{SolverError, SolverResult};

/// Half-width of the starting bracket.
pub const INITIAL_HALF_WIDTH: f64 = 10.0;
/// Doublings tried on each side before giving up on that side.
pub const MAX_EXPANSIONS: usize = 50;
/// Ternary steps taken once the bracket holds the minimum.
pub const NARROWING_STEPS: usize = 50;

fn thirds(low: f64, high: f64) -> (f64, f64) {
    let third = (high - low) / 3.0;
    (low + third, high - third)
}

/// Samples at `low`, both thirds and `high`.
fn sample<F>(f: &mut F, low: f64, high: f64) -> SolverResult<[f64; 4]>
where
    F: FnMut(f64) -> SolverResult<f64>,
{
    let (mid1, mid2) = thirds(low, high);
    Ok([f(low)?, f(mid1)?, f(mid2)?, f(high)?])
}

/// Abscissa of the global minimum of `f`, assumed to have a single dip.
///
/// Starts from `[-10, 10]`. While the four samples rise left to right the dip
/// lies below the bracket and it is doubled downwards; while they fall it lies
/// above and it is doubled upwards, at most [`MAX_EXPANSIONS`] times per side.
/// If neither side settles, `f` is flat or monotone everywhere it was sampled
/// and `0.0` is returned. Otherwise [`NARROWING_STEPS`] ternary steps shrink
/// the bracket and its lower end is returned.
///
/// For a single-dip function each third stays at or below its neighbouring end
/// on every step. A step where either third rises above it is reported as
/// [`SolverError::NotUnimodal`].
pub fn ternary_search_for_global_min<F>(mut f: F) -> SolverResult<f64>
where
    F: FnMut(f64) -> SolverResult<f64>,
{
    let mut low = -INITIAL_HALF_WIDTH;
    let mut high = INITIAL_HALF_WIDTH;

    let mut low_escaped = true;
    for _ in 0..MAX_EXPANSIONS {
        let [f_low, f_mid1, f_mid2, f_high] = sample(&mut f, low, high)?;
        if f_low <= f_mid1 && f_mid1 <= f_mid2 && f_mid2 <= f_high {
            low -= high - low;
        } else {
            low_escaped = false;
            break;
        }
    }

    let mut high_escaped = true;
    for _ in 0..MAX_EXPANSIONS {
        let [f_low, f_mid1, f_mid2, f_high] = sample(&mut f, low, high)?;
        if f_low >= f_mid1 && f_mid1 >= f_mid2 && f_mid2 >= f_high {
            high += high - low;
        } else {
            high_escaped = false;
            break;
        }
    }

    if low_escaped && high_escaped {
        return Ok(0.0);
    }

    for _ in 0..NARROWING_STEPS {
        let (mid1, mid2) = thirds(low, high);
        let [f_low, f_mid1, f_mid2, f_high] = sample(&mut f, low, high)?;
        if f_mid1 > f_low || f_mid2 > f_high {
            return Err(SolverError::NotUnimodal { low, high });
        }
        if f_mid1 < f_mid2 {
            high = mid2;
        } else {
            low = mid1;
        }
    }

    Ok(low)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn finds_parabola_minimum() {
        let x = ternary_search_for_global_min(|x| Ok((x - 3.0).powi(2))).unwrap();
        assert!((x - 3.0).abs() < 1e-3, "{x}");
    }

    #[test]
    fn expands_beyond_initial_bracket() {
        let x = ternary_search_for_global_min(|x| Ok((x + 75.0).abs())).unwrap();
        assert!((x + 75.0).abs() < 1e-3, "{x}");
        let x = ternary_search_for_global_min(|x| Ok((x - 250.0).powi(2))).unwrap();
        assert!((x - 250.0).abs() < 1e-3, "{x}");
    }

    #[test]
    fn flat_function_returns_zero() {
        let x = ternary_search_for_global_min(|_| Ok(4.0)).unwrap();
        assert_eq!(x, 0.0);
    }

    #[test]
    fn rejects_double_dip() {
        // Peak in the middle, dips at both ends of the starting bracket.
        let err = ternary_search_for_global_min(|x| Ok(-(x * x) + 50.0 * (x / 9.0).powi(4)))
            .unwrap_err();
        assert!(matches!(err, SolverError::NotUnimodal { .. }));
    }

    #[test]
    fn rejects_uneven_double_dip() {
        // Deeper dip at -8, shallower one at 5; the first step already sees
        // the left third above the bracket's left end.
        let err = ternary_search_for_global_min(|x| {
            Ok(((x + 8.0).powi(2)).min((x - 5.0).powi(2) + 1.0))
        })
        .unwrap_err();
        assert!(matches!(err, SolverError::NotUnimodal { low, high } if low == -10.0 && high == 10.0));
    }

    #[test]
    fn accepts_monotone_residual_with_a_kink() {
        // |cubic| crossing zero at 0.4: single dip, but neither convex nor smooth.
        let x = ternary_search_for_global_min(|x| Ok((x - 0.4).powi(3).abs() + (x - 0.4).abs()))
            .unwrap();
        assert!((x - 0.4).abs() < 1e-3, "{x}");
    }

    #[test]
    fn propagates_evaluation_errors() {
        let err = ternary_search_for_global_min(|_| {
            Err(SolverError::Numeric {
                what: "boom".into(),
            })
        })
        .unwrap_err();
        assert!(matches!(err, SolverError::Numeric { .. }));
    }

    proptest! {
        #[test]
        fn locates_shifted_abs_minimum(center in -500.0f64..500.0, slope in 0.1f64..100.0) {
            let x = ternary_search_for_global_min(|x| Ok(slope * (x - center).abs())).unwrap();
            prop_assert!((x - center).abs() < 1e-3);
        }
    }
}
