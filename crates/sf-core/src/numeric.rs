use crate::CoreError;

/// Floating point type used throughout system
pub type Real = f64;

/// Absolute and relative slack for comparing floats that went through
/// separate rounding paths, e.g. an axis range echoed back by a plot widget.
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

/// `true` if `a` and `b` differ by at most `tol.abs`, or by at most
/// `tol.rel` of the larger magnitude.
pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CoreError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// `n` evenly spaced samples over `[start, end]`, both endpoints included.
///
/// `n == 0` yields an empty vector and `n == 1` yields `[start]`. The last
/// sample is pinned to `end` exactly so accumulated rounding never leaves a
/// gap at the right edge of a plotted curve.
pub fn linspace(start: Real, end: Real, n: usize) -> Vec<Real> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as Real;
            let mut out: Vec<Real> = (0..n).map(|i| start + step * i as Real).collect();
            out[n - 1] = end;
            out
        }
    }
}
