//! Symbolic expressions.
//!
//! An [`Expr`] is expression source text that is known to build into an
//! evalexpr operator tree. Arithmetic on `Expr` values composes text with
//! explicit grouping, so a built expression always re-parses to the tree its
//! construction describes.

use crate::error::ParseError;
use crate::parser::operator_tree;
use evalexpr::{
    ContextWithMutableFunctions, ContextWithMutableVariables, EvalexprResult, Function,
    HashMapContext, Node, Value,
};
use sf_core::Real;
use std::borrow::{Borrow, Cow};
use std::fmt;
use std::sync::Arc;

/// Named symbol (independent variable or parameter).
///
/// Cheap to clone; hashes and compares like its name, so maps keyed by
/// `Symbol` can be queried with `&str`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "String", into = "String"))]
pub struct Symbol(Arc<str>);

impl Symbol {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// This symbol as a leaf expression.
    pub fn expr(&self) -> Expr {
        Expr::sym(self.as_str())
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.0)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Symbol {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Symbol::new(name)
    }
}

impl From<String> for Symbol {
    fn from(name: String) -> Self {
        Symbol(Arc::from(name))
    }
}

impl From<Symbol> for String {
    fn from(sym: Symbol) -> Self {
        sym.0.to_string()
    }
}

fn sign(v: Real) -> Real {
    // sign(0) == 0, unlike f64::signum
    if v == 0.0 { 0.0 } else { v.signum() }
}

/// Unary functions callable from expressions.
const FUNCTIONS: &[(&str, fn(Real) -> Real)] = &[
    ("sin", Real::sin),
    ("cos", Real::cos),
    ("tan", Real::tan),
    ("asin", Real::asin),
    ("acos", Real::acos),
    ("atan", Real::atan),
    ("sinh", Real::sinh),
    ("cosh", Real::cosh),
    ("tanh", Real::tanh),
    ("exp", Real::exp),
    ("ln", Real::ln),
    ("log", Real::ln),
    ("sqrt", Real::sqrt),
    ("abs", Real::abs),
    ("sign", sign),
    ("floor", Real::floor),
    ("ceil", Real::ceil),
];

/// Named constants. They are bound in every evaluation context and never
/// count as free symbols.
const CONSTANTS: &[(&str, Real)] = &[("pi", std::f64::consts::PI), ("e", std::f64::consts::E)];

pub fn is_function(name: &str) -> bool {
    FUNCTIONS.iter().any(|(f, _)| *f == name)
}

pub fn is_constant(name: &str) -> bool {
    CONSTANTS.iter().any(|(c, _)| *c == name)
}

/// Context with every function and constant bound. Callers add symbol
/// values on a clone.
pub(crate) fn evaluation_context() -> EvalexprResult<HashMapContext> {
    let mut context = HashMapContext::new();
    for &(name, f) in FUNCTIONS {
        context.set_function(
            name.to_string(),
            Function::new(move |argument| Ok(Value::Float(f(argument.as_number()?)))),
        )?;
    }
    for &(name, value) in CONSTANTS {
        context.set_value(name.to_string(), Value::Float(value))?;
    }
    Ok(context)
}

/// Free symbol names of a tree in first-occurrence order.
pub(crate) fn free_symbol_names(tree: &Node) -> Vec<&str> {
    let mut out: Vec<&str> = Vec::new();
    for name in tree.iter_variable_identifiers() {
        if !is_constant(name) && !out.contains(&name) {
            out.push(name);
        }
    }
    out
}

/// Symbolic expression in any number of symbols.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Expr(Arc<str>);

impl Expr {
    /// Wrap text that [`operator_tree`] already accepted.
    pub(crate) fn from_source(text: &str) -> Self {
        Expr(Arc::from(text))
    }

    pub fn num(v: Real) -> Self {
        let text = if v.is_nan() {
            Cow::Borrowed("(0/0)")
        } else if v.is_infinite() {
            Cow::Borrowed(if v > 0.0 { "(1/0)" } else { "(-1/0)" })
        } else {
            Cow::Owned(v.to_string())
        };
        Expr(Arc::from(text.as_ref()))
    }

    pub fn sym(name: impl AsRef<str>) -> Self {
        Expr(Arc::from(name.as_ref()))
    }

    pub fn pi() -> Self {
        Expr::sym("pi")
    }

    pub fn pow(self, exponent: impl Into<Expr>) -> Self {
        self.binary("^", &exponent.into())
    }

    /// `func(arg)`. Unknown names are reported when the expression is
    /// parsed or compiled.
    pub fn call(func: &str, arg: impl Into<Expr>) -> Self {
        Expr(Arc::from(format!("{func}({})", arg.into().0)))
    }

    pub fn sin(self) -> Self {
        Expr::call("sin", self)
    }

    pub fn cos(self) -> Self {
        Expr::call("cos", self)
    }

    pub fn exp(self) -> Self {
        Expr::call("exp", self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Build the evalexpr operator tree for this expression.
    pub fn tree(&self) -> Result<Node, ParseError> {
        operator_tree(&self.0)
    }

    /// Free symbols in order of first occurrence (left to right), excluding
    /// the named constants.
    pub fn free_symbols(&self) -> Result<Vec<Symbol>, ParseError> {
        let tree = self.tree()?;
        Ok(free_symbol_names(&tree).into_iter().map(Symbol::new).collect())
    }

    /// Numeric value if the expression has no free symbols.
    pub fn as_constant(&self) -> Option<Real> {
        let tree = self.tree().ok()?;
        if !free_symbol_names(&tree).is_empty() {
            return None;
        }
        let context = evaluation_context().ok()?;
        tree.eval_number_with_context(&context).ok()
    }

    fn is_atomic(&self) -> bool {
        !self.0.is_empty()
            && self
                .0
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
    }

    fn operand(&self) -> Cow<'_, str> {
        if self.is_atomic() {
            Cow::Borrowed(&self.0)
        } else {
            Cow::Owned(format!("({})", self.0))
        }
    }

    fn binary(&self, op: &str, rhs: &Expr) -> Expr {
        Expr(Arc::from(format!("{}{op}{}", self.operand(), rhs.operand())))
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Real> for Expr {
    fn from(v: Real) -> Self {
        Expr::num(v)
    }
}

impl From<i32> for Expr {
    fn from(v: i32) -> Self {
        Expr::num(Real::from(v))
    }
}

impl From<Symbol> for Expr {
    fn from(s: Symbol) -> Self {
        s.expr()
    }
}

impl From<&Symbol> for Expr {
    fn from(s: &Symbol) -> Self {
        s.expr()
    }
}

macro_rules! impl_binop {
    ($trait:ident, $method:ident, $op:expr) => {
        impl<R: Into<Expr>> std::ops::$trait<R> for Expr {
            type Output = Expr;

            fn $method(self, rhs: R) -> Expr {
                self.binary($op, &rhs.into())
            }
        }

        impl std::ops::$trait<Expr> for Real {
            type Output = Expr;

            fn $method(self, rhs: Expr) -> Expr {
                Expr::num(self).binary($op, &rhs)
            }
        }
    };
}

impl_binop!(Add, add, " + ");
impl_binop!(Sub, sub, " - ");
impl_binop!(Mul, mul, "*");
impl_binop!(Div, div, "/");

impl std::ops::Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        Expr(Arc::from(format!("-{}", self.operand())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(expr: &Expr) -> Vec<String> {
        expr.free_symbols()
            .unwrap()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn free_symbols_first_occurrence_order() {
        let x = Expr::sym("x");
        let a = Expr::sym("a");
        let b = Expr::sym("b");
        let e = b.clone() * x.clone() + a * x + b;
        assert_eq!(names(&e), vec!["b", "x", "a"]);
    }

    #[test]
    fn constants_are_not_free() {
        let e = Expr::pi() * Expr::sym("x") + Expr::sym("e");
        assert_eq!(names(&e), vec!["x"]);
    }

    #[test]
    fn constant_folding() {
        let e = Expr::pi() / 2.0;
        let v = e.as_constant().unwrap();
        assert!((v - std::f64::consts::FRAC_PI_2).abs() < 1e-15);
        assert_eq!((Expr::sym("x") + 1.0).as_constant(), None);
    }

    #[test]
    fn composition_groups_compound_operands() {
        let x = Expr::sym("x");
        assert_eq!((x.clone() * x.clone()).to_string(), "x*x");
        assert_eq!(((x.clone() + 1.0) * 2.0).to_string(), "(x + 1)*2");
        assert_eq!((x.clone() - (x.clone() - 1.0)).to_string(), "x - (x - 1)");
        assert_eq!((-x.clone().pow(2)).to_string(), "-(x^2)");
        assert_eq!((-x.clone()).pow(2).to_string(), "(-x)^2");
        assert_eq!((2.0 * x.clone()).sin().to_string(), "sin(2*x)");
        assert_eq!((x * -3.0).to_string(), "x*(-3)");
    }

    #[test]
    fn composed_expressions_evaluate_as_grouped() {
        let two = Expr::num(2.0);
        assert_eq!((-two.clone()).pow(2).as_constant(), Some(4.0));
        assert_eq!((-two.clone().pow(2)).as_constant(), Some(-4.0));
        assert_eq!((1.0 - (two.clone() - 1.0)).as_constant(), Some(0.0));
        assert_eq!((Expr::num(1.0) / two).as_constant(), Some(0.5));
    }

    #[test]
    fn non_finite_numbers_stay_numbers() {
        assert!(Expr::num(Real::NAN).as_constant().unwrap().is_nan());
        assert_eq!(Expr::num(Real::INFINITY).as_constant(), Some(Real::INFINITY));
        assert_eq!(
            Expr::num(Real::NEG_INFINITY).as_constant(),
            Some(Real::NEG_INFINITY)
        );
    }

    #[test]
    fn sign_of_zero_is_zero() {
        assert_eq!(Expr::call("sign", 0).as_constant(), Some(0.0));
        assert_eq!(Expr::call("sign", -3).as_constant(), Some(-1.0));
    }

    #[test]
    fn symbol_borrows_as_str() {
        let mut map = std::collections::HashMap::new();
        map.insert(Symbol::new("a"), 1.0);
        assert_eq!(map.get("a"), Some(&1.0));
    }
}
