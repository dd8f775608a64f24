//! In-memory figure model shared with the display host.
//!
//! The figure owns the traces and the axis layout. The engine writes trace
//! data; the host reads it to draw and writes back the visible axis ranges
//! when the user pans or zooms. Mutations inside [`FigureWidget::batch_update`]
//! are applied as a single redraw.

use crate::trace::{Trace, TraceId};
use sf_core::Interval;

/// Which axis a range refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// Layout attribute path, as reported in relayout events.
    pub fn range_path(self) -> &'static str {
        match self {
            Axis::X => "xaxis.range",
            Axis::Y => "yaxis.range",
        }
    }
}

/// Per-axis layout settings.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisLayout {
    pub title: String,
    pub range: Interval,
}

/// Figure-wide layout settings.
#[derive(Debug, Clone, PartialEq)]
pub struct FigureLayout {
    pub title: Option<String>,
    pub height: u32,
    pub show_legend: bool,
    pub x_axis: AxisLayout,
    pub y_axis: AxisLayout,
}

/// Partial layout edit. `None` fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutUpdate {
    pub x_title: Option<String>,
    pub y_title: Option<String>,
    pub show_legend: Option<bool>,
    pub height: Option<u32>,
}

impl LayoutUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn x_title(mut self, title: impl Into<String>) -> Self {
        self.x_title = Some(title.into());
        self
    }

    pub fn y_title(mut self, title: impl Into<String>) -> Self {
        self.y_title = Some(title.into());
        self
    }

    pub fn show_legend(mut self, show: bool) -> Self {
        self.show_legend = Some(show);
        self
    }

    pub fn height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Traces plus layout, with batched redraw accounting.
#[derive(Debug, Clone)]
pub struct FigureWidget {
    traces: Vec<Trace>,
    layout: FigureLayout,
    batch_depth: usize,
    dirty: bool,
    redraws: u64,
}

impl FigureWidget {
    pub fn new(x_range: Interval, y_range: Interval, height: u32) -> Self {
        Self {
            traces: Vec::new(),
            layout: FigureLayout {
                title: None,
                height,
                show_legend: true,
                x_axis: AxisLayout {
                    title: "x".to_string(),
                    range: x_range,
                },
                y_axis: AxisLayout {
                    title: "y".to_string(),
                    range: y_range,
                },
            },
            batch_depth: 0,
            dirty: false,
            redraws: 0,
        }
    }

    pub fn layout(&self) -> &FigureLayout {
        &self.layout
    }

    pub fn traces(&self) -> &[Trace] {
        &self.traces
    }

    pub fn trace(&self, id: TraceId) -> Option<&Trace> {
        self.traces.get(id.0)
    }

    /// Number of redraws the host would have performed so far.
    pub fn redraw_count(&self) -> u64 {
        self.redraws
    }

    /// Append an empty trace and return its handle.
    pub fn add_trace(&mut self) -> TraceId {
        self.traces.push(Trace::empty());
        self.touch();
        TraceId(self.traces.len() - 1)
    }

    /// Undo the most recent `add_trace`. Only the last trace can be removed,
    /// so every other `TraceId` stays valid.
    pub(crate) fn pop_trace(&mut self, id: TraceId) -> bool {
        if id.0 + 1 == self.traces.len() {
            self.traces.pop();
            self.touch();
            true
        } else {
            false
        }
    }

    /// Mutate a trace in place.
    pub fn update_trace<R>(&mut self, id: TraceId, f: impl FnOnce(&mut Trace) -> R) -> Option<R> {
        let trace = self.traces.get_mut(id.0)?;
        let out = f(trace);
        self.touch();
        Some(out)
    }

    /// Current (possibly user-adjusted) range of an axis.
    pub fn range(&self, axis: Axis) -> Interval {
        match axis {
            Axis::X => self.layout.x_axis.range,
            Axis::Y => self.layout.y_axis.range,
        }
    }

    pub fn x_range(&self) -> Interval {
        self.range(Axis::X)
    }

    pub fn y_range(&self) -> Interval {
        self.range(Axis::Y)
    }

    /// Set an axis range from the engine side.
    pub fn set_range(&mut self, axis: Axis, range: Interval) {
        self.apply_relayout(axis, range);
        self.touch();
    }

    /// Record a range chosen by the user on the host side (pan/zoom).
    /// Returns the previous range.
    pub fn apply_relayout(&mut self, axis: Axis, range: Interval) -> Interval {
        let slot = match axis {
            Axis::X => &mut self.layout.x_axis.range,
            Axis::Y => &mut self.layout.y_axis.range,
        };
        std::mem::replace(slot, range)
    }

    pub fn set_title(&mut self, title: Option<String>) {
        self.layout.title = title;
        self.touch();
    }

    /// Apply a partial layout edit as one redraw. Returns whether anything
    /// changed; an edit that matches the current layout does not redraw.
    pub fn update_layout(&mut self, update: LayoutUpdate) -> bool {
        let before = self.layout.clone();
        let layout = &mut self.layout;
        if let Some(title) = update.x_title {
            layout.x_axis.title = title;
        }
        if let Some(title) = update.y_title {
            layout.y_axis.title = title;
        }
        if let Some(show) = update.show_legend {
            layout.show_legend = show;
        }
        if let Some(height) = update.height {
            layout.height = height;
        }
        let changed = self.layout != before;
        if changed {
            self.touch();
        }
        changed
    }

    /// Apply every mutation made by `f` as one redraw.
    pub fn batch_update<R>(&mut self, f: impl FnOnce(&mut FigureWidget) -> R) -> R {
        self.batch_depth += 1;
        let out = f(self);
        self.batch_depth -= 1;
        if self.batch_depth == 0 && self.dirty {
            self.dirty = false;
            self.redraws += 1;
        }
        out
    }

    fn touch(&mut self) {
        if self.batch_depth > 0 {
            self.dirty = true;
        } else {
            self.redraws += 1;
        }
    }
}
