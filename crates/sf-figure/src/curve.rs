//! One plotted expression bound to a figure trace.
//!
//! A [`Curve`] owns its definition (variable, expression, fixed parameter
//! order, overrides) and the compiled numeric function. Mutation goes through
//! [`CurveMut`], which pairs the curve with the surface context it needs to
//! recompile, coerce input and re-render. Every setter follows the same
//! shape: validate, then commit, then render.

use crate::error::{FigureError, FigureResult};
use crate::figure::FigureWidget;
use crate::trace::TraceId;
use sf_controls::ParameterControl;
use sf_core::{Interval, Real, linspace};
use sf_expr::{Expr, NumericCompiler, NumericFunction, RawValue, Symbol, ValueCoercion};
use std::collections::HashMap;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

pub(crate) type ParamMap = HashMap<Symbol, ParameterControl>;

/// Unvalidated `(min, max)` pair, coerced to reals on use.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRange {
    pub min: RawValue,
    pub max: RawValue,
}

impl<A: Into<RawValue>, B: Into<RawValue>> From<(A, B)> for RawRange {
    fn from((min, max): (A, B)) -> Self {
        Self {
            min: min.into(),
            max: max.into(),
        }
    }
}

impl From<Interval> for RawRange {
    fn from(iv: Interval) -> Self {
        (iv.min(), iv.max()).into()
    }
}

/// Coerce both bounds to reals and validate `min < max`.
pub(crate) fn resolve_range(
    coercion: &dyn ValueCoercion,
    what: &'static str,
    raw: &RawRange,
) -> FigureResult<Interval> {
    let min = coercion.coerce_real(&raw.min, false)?;
    let max = coercion.coerce_real(&raw.max, false)?;
    Ok(Interval::named(what, min, max)?)
}

/// Three-way field update: leave as is, clear back to the surface default,
/// or set a value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Override<T> {
    #[default]
    Unchanged,
    FigureDefault,
    Value(T),
}

impl<T> Override<T> {
    /// `None` for `Unchanged`, `Some(None)` to clear, `Some(Some(v))` to set.
    fn try_map<U>(self, f: impl FnOnce(T) -> FigureResult<U>) -> FigureResult<Option<Option<U>>> {
        Ok(match self {
            Override::Unchanged => None,
            Override::FigureDefault => Some(None),
            Override::Value(v) => Some(Some(f(v)?)),
        })
    }
}

/// Field-wise curve update. Unset fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct CurveUpdate {
    pub variable: Option<Symbol>,
    pub expression: Option<Expr>,
    pub label: Option<String>,
    pub x_domain: Override<RawRange>,
    pub sampling_points: Override<RawValue>,
}

impl CurveUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn variable(mut self, variable: impl Into<Symbol>) -> Self {
        self.variable = Some(variable.into());
        self
    }

    pub fn expression(mut self, expression: impl Into<Expr>) -> Self {
        self.expression = Some(expression.into());
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn x_domain(mut self, domain: impl Into<RawRange>) -> Self {
        self.x_domain = Override::Value(domain.into());
        self
    }

    pub fn default_x_domain(mut self) -> Self {
        self.x_domain = Override::FigureDefault;
        self
    }

    pub fn sampling_points(mut self, n: impl Into<RawValue>) -> Self {
        self.sampling_points = Override::Value(n.into());
        self
    }

    pub fn default_sampling_points(mut self) -> Self {
        self.sampling_points = Override::FigureDefault;
        self
    }
}

/// A plotted expression.
pub struct Curve {
    id: String,
    trace: TraceId,
    variable: Symbol,
    expression: Expr,
    parameters: Vec<Symbol>,
    function: Arc<dyn NumericFunction>,
    x_domain: Option<Interval>,
    sampling_points: Option<usize>,
    label: String,
    visible: bool,
    suspend_render: bool,
}

impl Curve {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn trace_id(&self) -> TraceId {
        self.trace
    }

    pub fn variable(&self) -> &Symbol {
        &self.variable
    }

    pub fn expression(&self) -> &Expr {
        &self.expression
    }

    /// Parameter symbols in the positional order used by the compiled function.
    pub fn parameters(&self) -> &[Symbol] {
        &self.parameters
    }

    pub fn x_domain(&self) -> Option<Interval> {
        self.x_domain
    }

    pub fn sampling_points(&self) -> Option<usize> {
        self.sampling_points
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Build a curve whose trace has already been registered on `figure`.
    ///
    /// Overrides and label are applied with rendering suspended, followed by
    /// exactly one render.
    pub(crate) fn create(
        def: CurveDef,
        trace: TraceId,
        scene: Scene<'_>,
    ) -> FigureResult<Curve> {
        let function = compile(scene.compiler, &def.variable, &def.expression, &def.parameters)?;
        let mut curve = Curve {
            id: def.id,
            trace,
            variable: def.variable,
            expression: def.expression,
            parameters: def.parameters,
            function,
            x_domain: None,
            sampling_points: None,
            label: String::new(),
            visible: true,
            suspend_render: false,
        };
        CurveMut {
            curve: &mut curve,
            scene,
        }
        .batch(|c| {
            c.set_x_domain(def.x_domain)?;
            c.set_sampling_points(def.sampling_points)?;
            c.set_label(def.label);
            c.set_visible(true)
        })?;
        Ok(curve)
    }

    /// Sample the curve over its resolved domain.
    ///
    /// The domain is the figure's current x viewport, widened to cover the
    /// curve's own domain override when one is set.
    pub(crate) fn sample(
        &self,
        figure: &FigureWidget,
        params: &ParamMap,
        default_samples: usize,
    ) -> FigureResult<(Vec<Real>, Vec<Real>)> {
        let viewport = figure.x_range();
        let domain = match &self.x_domain {
            Some(d) => viewport.union(d),
            None => viewport,
        };
        let num = self.sampling_points.unwrap_or(default_samples);
        let xs = linspace(domain.min(), domain.max(), num);

        let values = self
            .parameters
            .iter()
            .map(|p| {
                params
                    .get(p)
                    .map(ParameterControl::value)
                    .ok_or_else(|| FigureError::UnknownParameter(p.to_string()))
            })
            .collect::<FigureResult<Vec<_>>>()?;
        let ys = self.function.evaluate(&xs, &values)?;
        Ok((xs, ys))
    }

    /// Write fresh samples into this curve's trace. No-op while suspended or
    /// hidden.
    pub(crate) fn draw(
        &self,
        figure: &mut FigureWidget,
        params: &ParamMap,
        default_samples: usize,
    ) -> FigureResult<()> {
        if self.suspend_render || !self.visible {
            return Ok(());
        }
        let (xs, ys) = self.sample(figure, params, default_samples)?;
        figure.update_trace(self.trace, |t| {
            t.x = xs;
            t.y = ys;
        });
        Ok(())
    }
}

impl fmt::Debug for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Curve")
            .field("id", &self.id)
            .field("trace", &self.trace)
            .field("variable", &self.variable)
            .field("expression", &format_args!("{}", self.expression))
            .field("parameters", &self.parameters)
            .field("x_domain", &self.x_domain)
            .field("sampling_points", &self.sampling_points)
            .field("label", &self.label)
            .field("visible", &self.visible)
            .finish_non_exhaustive()
    }
}

/// Everything needed to construct a curve.
pub(crate) struct CurveDef {
    pub id: String,
    pub variable: Symbol,
    pub expression: Expr,
    pub parameters: Vec<Symbol>,
    pub x_domain: Option<RawRange>,
    pub sampling_points: Option<RawValue>,
    pub label: String,
}

/// Borrowed surface state a curve needs while being mutated.
pub(crate) struct Scene<'a> {
    pub figure: &'a mut FigureWidget,
    pub params: &'a ParamMap,
    pub default_samples: usize,
    pub compiler: &'a dyn NumericCompiler,
    pub coercion: &'a dyn ValueCoercion,
}

fn compile(
    compiler: &dyn NumericCompiler,
    variable: &Symbol,
    expression: &Expr,
    parameters: &[Symbol],
) -> FigureResult<Arc<dyn NumericFunction>> {
    let mut args = Vec::with_capacity(parameters.len() + 1);
    args.push(variable.clone());
    args.extend_from_slice(parameters);
    Ok(compiler.compile(expression, &args)?)
}

/// Mutable handle to a curve together with its surface.
///
/// Dereferences to [`Curve`] for reads.
pub struct CurveMut<'a> {
    curve: &'a mut Curve,
    scene: Scene<'a>,
}

impl<'a> CurveMut<'a> {
    pub(crate) fn new(curve: &'a mut Curve, scene: Scene<'a>) -> Self {
        Self { curve, scene }
    }

    /// Replace the expression. Compiles against the existing variable and
    /// parameter order before anything is changed.
    pub fn set_expression(&mut self, expression: impl Into<Expr>) -> FigureResult<()> {
        let expression = expression.into();
        let function = compile(
            self.scene.compiler,
            &self.curve.variable,
            &expression,
            &self.curve.parameters,
        )?;
        self.curve.expression = expression;
        self.curve.function = function;
        self.render()
    }

    /// Change the independent variable, recompiling the current expression.
    pub fn set_variable(&mut self, variable: impl Into<Symbol>) -> FigureResult<()> {
        let variable = variable.into();
        let function = compile(
            self.scene.compiler,
            &variable,
            &self.curve.expression,
            &self.curve.parameters,
        )?;
        self.curve.variable = variable;
        self.curve.function = function;
        self.render()
    }

    /// `None` samples the viewport only; `Some` must coerce to `min < max`.
    pub fn set_x_domain(&mut self, domain: Option<impl Into<RawRange>>) -> FigureResult<()> {
        self.curve.x_domain = match domain {
            Some(raw) => Some(resolve_range(self.scene.coercion, "x_domain", &raw.into())?),
            None => None,
        };
        self.render()
    }

    pub fn clear_x_domain(&mut self) -> FigureResult<()> {
        self.set_x_domain(None::<RawRange>)
    }

    /// `None` uses the surface default; `Some` must coerce to a positive count.
    pub fn set_sampling_points(&mut self, n: Option<impl Into<RawValue>>) -> FigureResult<()> {
        self.curve.sampling_points = match n {
            Some(raw) => Some(self.scene.coercion.coerce_count(&raw.into())?),
            None => None,
        };
        self.render()
    }

    pub fn clear_sampling_points(&mut self) -> FigureResult<()> {
        self.set_sampling_points(None::<RawValue>)
    }

    /// Legend label. Does not resample.
    pub fn set_label(&mut self, label: impl Into<String>) {
        self.curve.label = label.into();
        let name = self.curve.label.clone();
        self.scene.figure.update_trace(self.curve.trace, |t| t.name = name);
    }

    pub fn set_visible(&mut self, visible: bool) -> FigureResult<()> {
        self.curve.visible = visible;
        self.scene
            .figure
            .update_trace(self.curve.trace, |t| t.visible = visible);
        self.render()
    }

    /// Apply the set fields of `update` together.
    ///
    /// All inputs are validated and the expression recompiled before any
    /// field changes, so a failing update leaves the curve as it was. The
    /// curve is rendered once at the end.
    pub fn update(&mut self, update: CurveUpdate) -> FigureResult<()> {
        let CurveUpdate {
            variable,
            expression,
            label,
            x_domain,
            sampling_points,
        } = update;

        let definition = if variable.is_some() || expression.is_some() {
            let variable = variable.unwrap_or_else(|| self.curve.variable.clone());
            let expression = expression.unwrap_or_else(|| self.curve.expression.clone());
            let function = compile(
                self.scene.compiler,
                &variable,
                &expression,
                &self.curve.parameters,
            )?;
            Some((variable, expression, function))
        } else {
            None
        };
        let coercion = self.scene.coercion;
        let x_domain = x_domain.try_map(|raw| resolve_range(coercion, "x_domain", &raw))?;
        let sampling_points =
            sampling_points.try_map(|raw| Ok(coercion.coerce_count(&raw)?))?;

        if let Some((variable, expression, function)) = definition {
            self.curve.variable = variable;
            self.curve.expression = expression;
            self.curve.function = function;
        }
        if let Some(domain) = x_domain {
            self.curve.x_domain = domain;
        }
        if let Some(n) = sampling_points {
            self.curve.sampling_points = n;
        }
        if let Some(label) = label {
            self.set_label(label);
        }
        self.render()
    }

    /// Current samples `(xs, ys)` without touching the trace.
    pub fn compute_data(&self) -> FigureResult<(Vec<Real>, Vec<Real>)> {
        self.curve
            .sample(&*self.scene.figure, self.scene.params, self.scene.default_samples)
    }

    pub fn render(&mut self) -> FigureResult<()> {
        self.curve
            .draw(&mut *self.scene.figure, self.scene.params, self.scene.default_samples)
    }

    /// Run several mutations with rendering suspended, then render once.
    ///
    /// The suspension is lifted and the render attempted on every exit path,
    /// including when `f` fails; the first error is returned.
    pub fn batch<R>(
        &mut self,
        f: impl FnOnce(&mut CurveMut<'a>) -> FigureResult<R>,
    ) -> FigureResult<R> {
        let result = {
            let mut guard = SuspendGuard::new(self);
            f(&mut *guard)
        };
        let rendered = self.render();
        let out = result?;
        rendered?;
        Ok(out)
    }
}

impl Deref for CurveMut<'_> {
    type Target = Curve;

    fn deref(&self) -> &Curve {
        self.curve
    }
}

impl fmt::Debug for CurveMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.curve.fmt(f)
    }
}

/// Holds render suspension for its lifetime and restores the previous
/// state on drop, so nested batches only render at the outermost level.
struct SuspendGuard<'g, 'a> {
    inner: &'g mut CurveMut<'a>,
    previous: bool,
}

impl<'g, 'a> SuspendGuard<'g, 'a> {
    fn new(inner: &'g mut CurveMut<'a>) -> Self {
        let previous = std::mem::replace(&mut inner.curve.suspend_render, true);
        Self { inner, previous }
    }
}

impl<'a> Deref for SuspendGuard<'_, 'a> {
    type Target = CurveMut<'a>;

    fn deref(&self) -> &CurveMut<'a> {
        self.inner
    }
}

impl<'a> DerefMut for SuspendGuard<'_, 'a> {
    fn deref_mut(&mut self) -> &mut CurveMut<'a> {
        self.inner
    }
}

impl Drop for SuspendGuard<'_, '_> {
    fn drop(&mut self) {
        self.inner.curve.suspend_render = self.previous;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sf_controls::ParamConfig;
    use sf_expr::{TreeCompiler, ExprCoercion};

    struct Fixture {
        figure: FigureWidget,
        params: ParamMap,
    }

    impl Fixture {
        fn new(x: (Real, Real)) -> Self {
            Self {
                figure: FigureWidget::new(
                    Interval::new(x.0, x.1).unwrap(),
                    Interval::new(-3.0, 3.0).unwrap(),
                    600,
                ),
                params: ParamMap::new(),
            }
        }

        fn scene(&mut self, default_samples: usize) -> Scene<'_> {
            Scene {
                figure: &mut self.figure,
                params: &self.params,
                default_samples,
                compiler: &TreeCompiler,
                coercion: &ExprCoercion,
            }
        }

        fn curve(&mut self, def: CurveDef, samples: usize) -> FigureResult<Curve> {
            let trace = self.figure.add_trace();
            Curve::create(def, trace, self.scene(samples))
        }
    }

    fn def(expression: Expr) -> CurveDef {
        CurveDef {
            id: "c".into(),
            variable: Symbol::from("x"),
            expression,
            parameters: Vec::new(),
            x_domain: None,
            sampling_points: None,
            label: "c".into(),
        }
    }

    #[test]
    fn create_renders_once_with_label() {
        let mut fx = Fixture::new((0.0, 1.0));
        let x = Expr::sym("x");
        let curve = fx.curve(def(x.clone() * x), 3).unwrap();
        let trace = fx.figure.trace(curve.trace_id()).unwrap();
        assert_eq!(trace.name, "c");
        assert_eq!(trace.x, vec![0.0, 0.5, 1.0]);
        assert_eq!(trace.y, vec![0.0, 0.25, 1.0]);
    }

    #[test]
    fn domain_override_widens_viewport() {
        let mut fx = Fixture::new((0.0, 1.0));
        let mut d = def(Expr::sym("x"));
        d.x_domain = Some((-1.0, 0.5).into());
        d.sampling_points = Some(RawValue::from(3));
        let curve = fx.curve(d, 100).unwrap();
        let (xs, _) = curve.sample(&fx.figure, &fx.params, 100).unwrap();
        assert_eq!(xs, vec![-1.0, 0.0, 1.0]);
    }

    #[test]
    fn failed_setter_keeps_domain() {
        let mut fx = Fixture::new((0.0, 1.0));
        let mut d = def(Expr::sym("x"));
        d.x_domain = Some((2, 5).into());
        let mut curve = fx.curve(d, 10).unwrap();

        let mut handle = CurveMut::new(&mut curve, fx.scene(10));
        let err = handle.set_x_domain(Some((5, 2))).unwrap_err();
        assert!(matches!(err, FigureError::Range(_)));
        assert_eq!(handle.x_domain().map(|d| d.as_tuple()), Some((2.0, 5.0)));
    }

    #[test]
    fn update_is_all_or_nothing() {
        let mut fx = Fixture::new((0.0, 1.0));
        let mut curve = fx.curve(def(Expr::sym("x")), 5).unwrap();

        let mut handle = CurveMut::new(&mut curve, fx.scene(5));
        let err = handle
            .update(
                CurveUpdate::new()
                    .expression(Expr::sym("x") * 2)
                    .label("new")
                    .sampling_points(0),
            )
            .unwrap_err();
        assert!(matches!(err, FigureError::Coercion(_)));
        assert_eq!(handle.expression(), &Expr::sym("x"));
        assert_eq!(handle.label(), "c");
        assert_eq!(handle.sampling_points(), None);
    }

    #[test]
    fn update_clears_overrides_with_figure_default() {
        let mut fx = Fixture::new((0.0, 1.0));
        let mut d = def(Expr::sym("x"));
        d.x_domain = Some((2, 5).into());
        d.sampling_points = Some(7.into());
        let mut curve = fx.curve(d, 5).unwrap();

        let mut handle = CurveMut::new(&mut curve, fx.scene(5));
        handle
            .update(CurveUpdate::new().default_x_domain().default_sampling_points())
            .unwrap();
        assert_eq!(handle.x_domain(), None);
        assert_eq!(handle.sampling_points(), None);
        let (xs, _) = handle.compute_data().unwrap();
        assert_eq!(xs.len(), 5);
        assert_eq!((xs[0], xs[4]), (0.0, 1.0));
    }

    #[test]
    fn hidden_curve_does_not_resample() {
        let mut fx = Fixture::new((0.0, 1.0));
        let mut curve = fx.curve(def(Expr::sym("x")), 2).unwrap();
        let mut handle = CurveMut::new(&mut curve, fx.scene(2));
        handle.set_visible(false).unwrap();
        handle.set_sampling_points(Some(9)).unwrap();
        let trace_id = curve.trace_id();
        let trace = fx.figure.trace(trace_id).unwrap();
        assert!(!trace.visible);
        assert_eq!(trace.len(), 2);
    }

    #[test]
    fn batch_restores_suspension_on_error() {
        let mut fx = Fixture::new((0.0, 1.0));
        let mut curve = fx.curve(def(Expr::sym("x")), 2).unwrap();
        let mut handle = CurveMut::new(&mut curve, fx.scene(2));
        let res = handle.batch(|c| {
            c.set_sampling_points(Some(4))?;
            c.set_x_domain(Some((1, 0)))
        });
        assert!(res.is_err());
        assert!(!curve.suspend_render);
        // The sampling change made before the failure was still flushed.
        assert_eq!(fx.figure.trace(curve.trace_id()).unwrap().len(), 4);
    }

    #[test]
    fn missing_parameter_is_reported() {
        let mut fx = Fixture::new((0.0, 1.0));
        fx.params.insert(
            Symbol::from("a"),
            ParameterControl::new("a", ParamConfig::new().value(0.5)).unwrap(),
        );
        let mut d = def(Expr::sym("a") * Expr::sym("x"));
        d.parameters = vec![Symbol::from("a")];
        let curve = fx.curve(d, 3).unwrap();

        fx.params.clear();
        let err = curve.sample(&fx.figure, &fx.params, 3).unwrap_err();
        assert_eq!(err, FigureError::UnknownParameter("a".into()));
    }
}
