use crate::PfError;

/// Floating point type used throughout system
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, PfError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(PfError::NonFinite { what, value: v })
    }
}

/// Piecewise-linear lookup in a table of `(x, y)` points sorted by ascending `x`.
///
/// Queries outside the table are clamped to the first/last point. Returns `None`
/// for an empty table.
pub fn interpolate(table: &[(Real, Real)], x: Real) -> Option<Real> {
    let (first, last) = (table.first()?, table.last()?);
    if x <= first.0 {
        return Some(first.1);
    }
    if x >= last.0 {
        return Some(last.1);
    }

    // First point strictly right of x; guaranteed in 1..len by the clamps above.
    let hi = table.partition_point(|&(px, _)| px <= x);
    let (x0, y0) = table[hi - 1];
    let (x1, y1) = table[hi];
    if x1 == x0 {
        return Some(y1);
    }
    Some(y0 + (y1 - y0) * (x - x0) / (x1 - x0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        };
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn interpolate_inside_and_clamped() {
        let table = [(10.0, 1.0), (20.0, 3.0), (40.0, 4.0)];
        assert_eq!(interpolate(&table, 15.0), Some(2.0));
        assert_eq!(interpolate(&table, 30.0), Some(3.5));
        assert_eq!(interpolate(&table, 20.0), Some(3.0));
        assert_eq!(interpolate(&table, 0.0), Some(1.0));
        assert_eq!(interpolate(&table, 100.0), Some(4.0));
    }

    #[test]
    fn interpolate_empty_table() {
        assert_eq!(interpolate(&[], 1.0), None);
    }
}
