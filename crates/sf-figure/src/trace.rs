//! Traces held by a figure.

use sf_core::Real;

/// Stable handle to a trace within its figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TraceId(pub(crate) usize);

impl TraceId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// How the host draws a trace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TraceMode {
    /// Connected polyline, broken at non-finite samples. Used by curves.
    #[default]
    Lines,
    /// Unconnected points.
    Markers,
}

/// One series on the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    pub name: String,
    pub visible: bool,
    pub mode: TraceMode,
    pub x: Vec<Real>,
    pub y: Vec<Real>,
}

impl Trace {
    pub(crate) fn empty() -> Self {
        Self {
            name: String::new(),
            visible: true,
            mode: TraceMode::Lines,
            x: Vec::new(),
            y: Vec::new(),
        }
    }

    /// Finite `[x, y]` points, in order.
    pub fn points(&self) -> Vec<[Real; 2]> {
        self.x
            .iter()
            .zip(&self.y)
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .map(|(&x, &y)| [x, y])
            .collect()
    }

    /// Runs of finite `[x, y]` points. Non-finite samples (poles, values
    /// outside a function's domain) break the line instead of bridging it.
    pub fn segments(&self) -> Vec<Vec<[Real; 2]>> {
        let mut out = Vec::new();
        let mut current = Vec::new();
        for (&x, &y) in self.x.iter().zip(&self.y) {
            if x.is_finite() && y.is_finite() {
                current.push([x, y]);
            } else if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
        }
        if !current.is_empty() {
            out.push(current);
        }
        out
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}
