//! Coercion of raw input values to numbers.
//!
//! Raw values arrive from two places: the author's code (numbers, constant
//! expressions such as `pi/2`) and user text typed into a parameter control.
//! The [`ValueCoercion`] boundary keeps the parser swappable; the plotting
//! engine only relies on the trait.

use crate::error::CoerceError;
use crate::expr::Expr;
use crate::parser::{parse, parse_prefix};
use sf_core::Real;
use std::fmt;

/// Unconverted input value.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Real(Real),
    Integer(i64),
    Text(String),
    Symbolic(Expr),
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Real(v) => write!(f, "{v}"),
            RawValue::Integer(v) => write!(f, "{v}"),
            RawValue::Text(s) => write!(f, "'{s}'"),
            RawValue::Symbolic(e) => write!(f, "{e}"),
        }
    }
}

impl From<Real> for RawValue {
    fn from(v: Real) -> Self {
        RawValue::Real(v)
    }
}

impl From<i64> for RawValue {
    fn from(v: i64) -> Self {
        RawValue::Integer(v)
    }
}

impl From<i32> for RawValue {
    fn from(v: i32) -> Self {
        RawValue::Integer(i64::from(v))
    }
}

impl From<usize> for RawValue {
    fn from(v: usize) -> Self {
        i64::try_from(v).map_or(RawValue::Real(v as Real), RawValue::Integer)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Text(s)
    }
}

impl From<Expr> for RawValue {
    fn from(e: Expr) -> Self {
        RawValue::Symbolic(e)
    }
}

/// Requested numeric kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericKind {
    Real,
    Integer,
    PositiveInteger,
}

impl NumericKind {
    fn describe(self) -> &'static str {
        match self {
            NumericKind::Real => "a real number",
            NumericKind::Integer => "an integer",
            NumericKind::PositiveInteger => "a positive integer",
        }
    }
}

/// Coerced numeric value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeric {
    Real(Real),
    Integer(i64),
}

impl Numeric {
    pub fn as_f64(self) -> Real {
        match self {
            Numeric::Real(v) => v,
            Numeric::Integer(v) => v as Real,
        }
    }
}

/// Converts raw values into numbers of a requested kind.
///
/// With `truncate`, implementations may accept partial input: text may be
/// cut back to a numeric prefix and integer kinds may drop a fractional part.
pub trait ValueCoercion: Send + Sync {
    fn coerce(
        &self,
        raw: &RawValue,
        kind: NumericKind,
        truncate: bool,
    ) -> Result<Numeric, CoerceError>;

    fn coerce_real(&self, raw: &RawValue, truncate: bool) -> Result<Real, CoerceError> {
        self.coerce(raw, NumericKind::Real, truncate)
            .map(Numeric::as_f64)
    }

    /// Positive count, e.g. a sampling resolution.
    fn coerce_count(&self, raw: &RawValue) -> Result<usize, CoerceError> {
        match self.coerce(raw, NumericKind::PositiveInteger, false)? {
            Numeric::Integer(v) => usize::try_from(v).map_err(|_| CoerceError::NotPositive { value: v }),
            Numeric::Real(v) => Err(CoerceError::Kind {
                expected: NumericKind::PositiveInteger.describe(),
                found: v.to_string(),
            }),
        }
    }
}

/// Default coercion: numbers pass through, text is parsed as an expression
/// that must fold to a constant.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExprCoercion;

impl ExprCoercion {
    fn to_real(&self, raw: &RawValue, truncate: bool) -> Result<Real, CoerceError> {
        match raw {
            RawValue::Real(v) => Ok(*v),
            RawValue::Integer(v) => Ok(*v as Real),
            RawValue::Symbolic(expr) => expr.as_constant().ok_or_else(|| CoerceError::Kind {
                expected: "a constant expression",
                found: expr.to_string(),
            }),
            RawValue::Text(text) => {
                let text = text.trim();
                match parse(text) {
                    Ok(expr) => expr.as_constant().ok_or_else(|| CoerceError::Kind {
                        expected: "a constant expression",
                        found: text.to_string(),
                    }),
                    Err(source) => {
                        if truncate {
                            if let Some(v) = constant_prefix(text) {
                                return Ok(v);
                            }
                        }
                        Err(CoerceError::Parse {
                            text: text.to_string(),
                            source,
                        })
                    }
                }
            }
        }
    }
}

/// Value of the longest constant-valued prefix of `text`.
fn constant_prefix(text: &str) -> Option<Real> {
    let mut end = text.len();
    while end > 0 {
        let (expr, used) = parse_prefix(&text[..end])?;
        if let Some(v) = expr.as_constant() {
            return Some(v);
        }
        end = text[..used]
            .char_indices()
            .next_back()
            .map_or(0, |(i, _)| i);
    }
    None
}

impl ValueCoercion for ExprCoercion {
    fn coerce(
        &self,
        raw: &RawValue,
        kind: NumericKind,
        truncate: bool,
    ) -> Result<Numeric, CoerceError> {
        if kind != NumericKind::Real {
            if let RawValue::Integer(v) = raw {
                return check_sign(*v, kind);
            }
        }

        let value = self.to_real(raw, truncate)?;
        if !value.is_finite() {
            return Err(CoerceError::NonFinite { value });
        }

        match kind {
            NumericKind::Real => Ok(Numeric::Real(value)),
            NumericKind::Integer | NumericKind::PositiveInteger => {
                let whole = if value.fract() == 0.0 {
                    value
                } else if truncate {
                    value.trunc()
                } else {
                    return Err(CoerceError::Kind {
                        expected: kind.describe(),
                        found: value.to_string(),
                    });
                };
                if whole.abs() > i64::MAX as Real {
                    return Err(CoerceError::Kind {
                        expected: kind.describe(),
                        found: value.to_string(),
                    });
                }
                check_sign(whole as i64, kind)
            }
        }
    }
}

fn check_sign(value: i64, kind: NumericKind) -> Result<Numeric, CoerceError> {
    if kind == NumericKind::PositiveInteger && value <= 0 {
        return Err(CoerceError::NotPositive { value });
    }
    Ok(Numeric::Integer(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_pass_through() {
        let c = ExprCoercion;
        assert_eq!(c.coerce_real(&RawValue::from(2.5), false).unwrap(), 2.5);
        assert_eq!(c.coerce_real(&RawValue::from(-3), false).unwrap(), -3.0);
    }

    #[test]
    fn text_expressions_fold() {
        let c = ExprCoercion;
        let v = c.coerce_real(&"pi/2".into(), false).unwrap();
        assert!((v - std::f64::consts::FRAC_PI_2).abs() < 1e-15);
        assert_eq!(c.coerce_real(&" 0.75 ".into(), false).unwrap(), 0.75);
    }

    #[test]
    fn malformed_text_fails_without_truncation() {
        let c = ExprCoercion;
        let err = c.coerce_real(&"0.25abc".into(), false).unwrap_err();
        assert!(matches!(err, CoerceError::Parse { .. }));
        assert!(c.coerce_real(&"abc".into(), true).is_err());
    }

    #[test]
    fn truncation_uses_numeric_prefix() {
        let c = ExprCoercion;
        assert_eq!(c.coerce_real(&"0.25abc".into(), true).unwrap(), 0.25);
        assert_eq!(c.coerce_real(&"3 + ".into(), true).unwrap(), 3.0);
    }

    #[test]
    fn symbolic_must_be_constant() {
        let c = ExprCoercion;
        let err = c
            .coerce_real(&RawValue::from(Expr::sym("x") + 1.0), false)
            .unwrap_err();
        assert!(matches!(err, CoerceError::Kind { .. }));
        assert!(c.coerce_real(&"x".into(), false).is_err());
    }

    #[test]
    fn counts_must_be_positive_integers() {
        let c = ExprCoercion;
        assert_eq!(c.coerce_count(&RawValue::from(500)).unwrap(), 500);
        assert_eq!(c.coerce_count(&"2*50".into()).unwrap(), 100);
        assert_eq!(c.coerce_count(&RawValue::from(4.0)).unwrap(), 4);
        assert!(matches!(
            c.coerce_count(&RawValue::from(0)),
            Err(CoerceError::NotPositive { value: 0 })
        ));
        assert!(matches!(
            c.coerce_count(&RawValue::from(2.5)),
            Err(CoerceError::Kind { .. })
        ));
    }

    #[test]
    fn integer_truncation_drops_fraction() {
        let c = ExprCoercion;
        let n = c
            .coerce(&RawValue::from(-2.7), NumericKind::Integer, true)
            .unwrap();
        assert_eq!(n, Numeric::Integer(-2));
    }

    #[test]
    fn non_finite_rejected() {
        let c = ExprCoercion;
        assert!(matches!(
            c.coerce_real(&"1/0".into(), false),
            Err(CoerceError::NonFinite { .. })
        ));
    }
}
