//! Compilation of symbolic expressions to fast numeric callables.
//!
//! A compiled function takes the independent variable as a sample vector and
//! every further argument symbol as a positional scalar:
//! `f(xs, [p0, p1, ...]) -> ys`. The argument order is fixed at compile time.

use crate::error::{CompileError, EvalError};
use crate::expr::{Expr, Symbol, evaluation_context, free_symbol_names};
use evalexpr::{ContextWithMutableVariables, HashMapContext, Node, Value};
use sf_core::Real;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::trace;

/// Vectorized numeric callable produced by a [`NumericCompiler`].
pub trait NumericFunction: Send + Sync {
    /// Number of scalar parameters expected after the sample vector.
    fn arity(&self) -> usize;

    /// Evaluate over `xs` with `params` bound positionally.
    fn evaluate(&self, xs: &[Real], params: &[Real]) -> Result<Vec<Real>, EvalError>;
}

/// Turns an expression and an ordered argument list into a [`NumericFunction`].
///
/// `arguments[0]` is the independent variable; the rest are scalar
/// parameters in positional order.
pub trait NumericCompiler: Send + Sync {
    fn compile(
        &self,
        expr: &Expr,
        arguments: &[Symbol],
    ) -> Result<Arc<dyn NumericFunction>, CompileError>;
}

impl<C: NumericCompiler + ?Sized> NumericCompiler for Arc<C> {
    fn compile(
        &self,
        expr: &Expr,
        arguments: &[Symbol],
    ) -> Result<Arc<dyn NumericFunction>, CompileError> {
        (**self).compile(expr, arguments)
    }
}

/// Expression compiled to an evalexpr operator tree with its argument order
/// fixed.
#[derive(Clone)]
pub struct CompiledExpr {
    tree: Node,
    context: HashMapContext,
    variable: Symbol,
    params: Vec<Symbol>,
    source: String,
}

impl CompiledExpr {
    /// Text of the expression this was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl fmt::Debug for CompiledExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledExpr")
            .field("source", &self.source)
            .field("variable", &self.variable)
            .field("params", &self.params)
            .finish()
    }
}

fn bind(context: &mut HashMapContext, sym: &Symbol, value: Real) -> Result<(), EvalError> {
    context
        .set_value(sym.to_string(), Value::Float(value))
        .map_err(|err| EvalError::Evaluation {
            message: format!("binding {sym}: {err}"),
        })
}

impl NumericFunction for CompiledExpr {
    fn arity(&self) -> usize {
        self.params.len()
    }

    fn evaluate(&self, xs: &[Real], params: &[Real]) -> Result<Vec<Real>, EvalError> {
        if params.len() != self.params.len() {
            return Err(EvalError::Arity {
                expected: self.params.len(),
                found: params.len(),
            });
        }
        let mut context = self.context.clone();
        for (sym, &value) in self.params.iter().zip(params) {
            bind(&mut context, sym, value)?;
        }
        xs.iter()
            .map(|&x| {
                bind(&mut context, &self.variable, x)?;
                self.tree
                    .eval_number_with_context(&context)
                    .map_err(|err| EvalError::Evaluation {
                        message: format!("{} at {} = {x}: {err}", self.source, self.variable),
                    })
            })
            .collect()
    }
}

/// Compiler backed by evalexpr operator trees.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeCompiler;

impl TreeCompiler {
    /// Compile to the concrete tree-backed type.
    pub fn compile_expr(
        &self,
        expr: &Expr,
        arguments: &[Symbol],
    ) -> Result<CompiledExpr, CompileError> {
        let (variable, params) = arguments
            .split_first()
            .ok_or(CompileError::MissingVariable)?;
        for (i, sym) in arguments.iter().enumerate() {
            if arguments[..i].contains(sym) {
                return Err(CompileError::DuplicateArgument {
                    name: sym.to_string(),
                });
            }
        }

        let tree = expr.tree()?;
        if let Some(name) = free_symbol_names(&tree)
            .into_iter()
            .find(|name| !arguments.iter().any(|a| a.as_str() == *name))
        {
            return Err(CompileError::UnboundSymbol {
                name: name.to_string(),
                arguments: arguments
                    .iter()
                    .map(|s| s.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            });
        }

        let context = evaluation_context().map_err(|err| CompileError::Context {
            message: err.to_string(),
        })?;
        Ok(CompiledExpr {
            tree,
            context,
            variable: variable.clone(),
            params: params.to_vec(),
            source: expr.to_string(),
        })
    }
}

impl NumericCompiler for TreeCompiler {
    fn compile(
        &self,
        expr: &Expr,
        arguments: &[Symbol],
    ) -> Result<Arc<dyn NumericFunction>, CompileError> {
        Ok(Arc::new(self.compile_expr(expr, arguments)?))
    }
}

type CacheKey = (String, Vec<Symbol>);

/// Default number of callables a [`CachedCompiler`] keeps.
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

#[derive(Default)]
struct Entries {
    map: HashMap<CacheKey, Arc<dyn NumericFunction>>,
    /// Least recently used first.
    order: VecDeque<CacheKey>,
}

impl Entries {
    fn touch(&mut self, key: &CacheKey) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            if let Some(k) = self.order.remove(pos) {
                self.order.push_back(k);
            }
        }
    }
}

/// Memoizing wrapper around another compiler.
///
/// Entries are keyed by the expression's text and the argument order, so
/// recompiling the same curve definition reuses the callable. At most
/// `capacity` entries are kept; the least recently used one is evicted.
pub struct CachedCompiler<C> {
    inner: C,
    capacity: usize,
    cache: Mutex<Entries>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<C: NumericCompiler> CachedCompiler<C> {
    pub fn new(inner: C) -> Self {
        Self::with_capacity(inner, DEFAULT_CACHE_CAPACITY)
    }

    /// A capacity of zero is raised to one.
    pub fn with_capacity(inner: C, capacity: usize) -> Self {
        Self {
            inner,
            capacity: capacity.max(1),
            cache: Mutex::new(Entries::default()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn len(&self) -> usize {
        self.lock().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut entries = self.lock();
        entries.map.clear();
        entries.order.clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Entries> {
        // A panic mid-insert cannot leave the map logically inconsistent.
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for CachedCompiler<TreeCompiler> {
    fn default() -> Self {
        Self::new(TreeCompiler)
    }
}

impl<C: NumericCompiler> NumericCompiler for CachedCompiler<C> {
    fn compile(
        &self,
        expr: &Expr,
        arguments: &[Symbol],
    ) -> Result<Arc<dyn NumericFunction>, CompileError> {
        let key = (expr.to_string(), arguments.to_vec());
        {
            let mut entries = self.lock();
            if let Some(hit) = entries.map.get(&key).cloned() {
                entries.touch(&key);
                self.hits.fetch_add(1, Ordering::Relaxed);
                trace!(expr = %key.0, "compile cache hit");
                return Ok(hit);
            }
        }

        let compiled = self.inner.compile(expr, arguments)?;
        self.misses.fetch_add(1, Ordering::Relaxed);

        let mut entries = self.lock();
        if entries.map.insert(key.clone(), Arc::clone(&compiled)).is_some() {
            // Another caller compiled the same key meanwhile.
            entries.touch(&key);
        } else {
            entries.order.push_back(key);
        }
        while entries.map.len() > self.capacity {
            let Some(oldest) = entries.order.pop_front() else {
                break;
            };
            entries.map.remove(&oldest);
            trace!(expr = %oldest.0, "compile cache eviction");
        }
        Ok(compiled)
    }
}

impl<C> fmt::Debug for CachedCompiler<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedCompiler")
            .field("capacity", &self.capacity)
            .field("hits", &self.hits.load(Ordering::Relaxed))
            .field("misses", &self.misses.load(Ordering::Relaxed))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn syms(names: &[&str]) -> Vec<Symbol> {
        names.iter().map(|n| Symbol::new(n)).collect()
    }

    #[test]
    fn evaluates_over_vector() {
        let f = TreeCompiler
            .compile(&parse("x^2").unwrap(), &syms(&["x"]))
            .unwrap();
        let ys = f.evaluate(&[0.0, 1.0, 2.0, 3.0], &[]).unwrap();
        assert_eq!(ys, vec![0.0, 1.0, 4.0, 9.0]);
    }

    #[test]
    fn parameters_bind_positionally() {
        let expr = parse("a*x + b").unwrap();
        let f = TreeCompiler.compile(&expr, &syms(&["x", "a", "b"])).unwrap();
        assert_eq!(f.arity(), 2);
        assert_eq!(f.evaluate(&[1.0, 2.0], &[10.0, 1.0]).unwrap(), vec![11.0, 21.0]);

        let swapped = TreeCompiler.compile(&expr, &syms(&["x", "b", "a"])).unwrap();
        assert_eq!(swapped.evaluate(&[1.0, 2.0], &[10.0, 1.0]).unwrap(), vec![11.0, 12.0]);
    }

    #[test]
    fn constant_expression_broadcasts() {
        let f = TreeCompiler
            .compile(&parse("2*pi").unwrap(), &syms(&["x"]))
            .unwrap();
        let ys = f.evaluate(&[0.0, 5.0], &[]).unwrap();
        assert_eq!(ys, vec![2.0 * std::f64::consts::PI; 2]);
    }

    #[test]
    fn integer_literals_do_not_truncate() {
        let f = TreeCompiler
            .compile(&parse("1/2*x + x/4").unwrap(), &syms(&["x"]))
            .unwrap();
        assert_eq!(f.evaluate(&[4.0], &[]).unwrap(), vec![3.0]);
    }

    #[test]
    fn poles_yield_non_finite_samples() {
        let f = TreeCompiler
            .compile(&parse("1/x").unwrap(), &syms(&["x"]))
            .unwrap();
        let ys = f.evaluate(&[-1.0, 0.0, 1.0], &[]).unwrap();
        assert_eq!(ys[0], -1.0);
        assert!(ys[1].is_infinite());
        assert_eq!(ys[2], 1.0);
    }

    #[test]
    fn unbound_and_duplicate_symbols_rejected() {
        let err = TreeCompiler
            .compile(&parse("a*x").unwrap(), &syms(&["x"]))
            .err()
            .unwrap();
        assert!(matches!(err, CompileError::UnboundSymbol { ref name, .. } if name == "a"));

        let err = TreeCompiler
            .compile(&parse("x").unwrap(), &syms(&["x", "x"]))
            .err()
            .unwrap();
        assert!(matches!(err, CompileError::DuplicateArgument { .. }));

        let err = TreeCompiler.compile(&parse("1").unwrap(), &[]).err().unwrap();
        assert_eq!(err, CompileError::MissingVariable);
    }

    #[test]
    fn unparsable_built_expression_is_a_compile_error() {
        let err = TreeCompiler
            .compile(&Expr::call("nope", Expr::sym("x")), &syms(&["x"]))
            .err()
            .unwrap();
        assert!(matches!(err, CompileError::Syntax(_)));
    }

    #[test]
    fn non_numeric_result_is_an_evaluation_error() {
        let f = TreeCompiler
            .compile(&parse("x > 1").unwrap(), &syms(&["x"]))
            .unwrap();
        assert!(matches!(
            f.evaluate(&[2.0], &[]),
            Err(EvalError::Evaluation { .. })
        ));
    }

    #[test]
    fn arity_mismatch_is_an_error() {
        let f = TreeCompiler
            .compile(&parse("a*x").unwrap(), &syms(&["x", "a"]))
            .unwrap();
        assert_eq!(
            f.evaluate(&[1.0], &[]).unwrap_err(),
            EvalError::Arity {
                expected: 1,
                found: 0
            }
        );
    }

    #[test]
    fn cache_reuses_callables() {
        let compiler = CachedCompiler::default();
        let expr = parse("sin(x)").unwrap();
        let a = compiler.compile(&expr, &syms(&["x"])).unwrap();
        let b = compiler.compile(&expr, &syms(&["x"])).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!((compiler.hits(), compiler.misses()), (1, 1));

        // Different argument order is a different entry.
        compiler.compile(&expr, &syms(&["x", "a"])).unwrap();
        assert_eq!(compiler.len(), 2);

        compiler.clear();
        assert!(compiler.is_empty());
    }

    #[test]
    fn cache_evicts_least_recently_used() {
        let compiler = CachedCompiler::with_capacity(TreeCompiler, 2);
        let x = syms(&["x"]);
        let (a, b, c) = (parse("x").unwrap(), parse("2*x").unwrap(), parse("3*x").unwrap());

        let first = compiler.compile(&a, &x).unwrap();
        compiler.compile(&b, &x).unwrap();
        // Touch `a` so `b` becomes the oldest entry.
        compiler.compile(&a, &x).unwrap();
        compiler.compile(&c, &x).unwrap();
        assert_eq!(compiler.len(), 2);

        assert!(Arc::ptr_eq(&first, &compiler.compile(&a, &x).unwrap()));
        let misses = compiler.misses();
        compiler.compile(&b, &x).unwrap();
        assert_eq!(compiler.misses(), misses + 1);
        assert_eq!(compiler.len(), 2);
    }

    #[test]
    fn zero_capacity_still_caches_one() {
        let compiler = CachedCompiler::with_capacity(TreeCompiler, 0);
        assert_eq!(compiler.capacity(), 1);
        let expr = parse("x").unwrap();
        compiler.compile(&expr, &syms(&["x"])).unwrap();
        compiler.compile(&expr, &syms(&["x"])).unwrap();
        assert_eq!(compiler.hits(), 1);
    }

    #[test]
    fn cache_does_not_store_failures() {
        let compiler = CachedCompiler::default();
        assert!(compiler.compile(&parse("y").unwrap(), &syms(&["x"])).is_err());
        assert!(compiler.is_empty());
        assert_eq!(compiler.misses(), 0);
    }
}
