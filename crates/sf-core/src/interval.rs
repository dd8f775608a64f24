//! Validated closed intervals.
//!
//! Every axis range and curve domain in slidefig is an `Interval`. The
//! constructor is the single place the `min < max` rule is enforced, so any
//! `Interval` value that exists is already valid.

use crate::error::{CoreError, CoreResult};
use crate::numeric::{Real, Tolerances, ensure_finite, nearly_equal};

/// Closed interval `[min, max]` with finite bounds and `min < max`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "(Real, Real)", into = "(Real, Real)"))]
pub struct Interval {
    min: Real,
    max: Real,
}

impl Interval {
    /// Create an interval, rejecting non-finite bounds and `min >= max`.
    pub fn new(min: Real, max: Real) -> CoreResult<Self> {
        Self::named("interval", min, max)
    }

    /// Same as [`Interval::new`] but reports `what` in the error.
    pub fn named(what: &'static str, min: Real, max: Real) -> CoreResult<Self> {
        let min = ensure_finite(min, what)?;
        let max = ensure_finite(max, what)?;
        if min >= max {
            return Err(CoreError::InvalidRange { what, min, max });
        }
        Ok(Self { min, max })
    }

    /// Compile-time constructor for literal bounds. Use it in `const` items
    /// so an invalid literal fails the build instead of panicking at runtime.
    pub const fn const_new(min: Real, max: Real) -> Self {
        assert!(min.is_finite() && max.is_finite() && min < max);
        Self { min, max }
    }

    pub fn min(&self) -> Real {
        self.min
    }

    pub fn max(&self) -> Real {
        self.max
    }

    pub fn span(&self) -> Real {
        self.max - self.min
    }

    pub fn contains(&self, v: Real) -> bool {
        self.min <= v && v <= self.max
    }

    /// Smallest interval covering both `self` and `other`.
    pub fn union(&self, other: &Interval) -> Interval {
        Interval {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn as_tuple(&self) -> (Real, Real) {
        (self.min, self.max)
    }

    /// Both bounds equal within `tol`. Tolerances are taken relative to the
    /// span so the check scales with zoom level.
    pub fn approx_eq(&self, other: &Interval, tol: Tolerances) -> bool {
        let scale = self.span().max(other.span());
        let close = |a: Real, b: Real| nearly_equal(a, b, tol) || (a - b).abs() <= tol.rel * scale;
        close(self.min, other.min) && close(self.max, other.max)
    }
}

impl TryFrom<(Real, Real)> for Interval {
    type Error = CoreError;

    fn try_from((min, max): (Real, Real)) -> CoreResult<Self> {
        Interval::new(min, max)
    }
}

impl From<Interval> for (Real, Real) {
    fn from(iv: Interval) -> Self {
        iv.as_tuple()
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}
