use egui_plot::{Legend, Line, Plot, PlotBounds, PlotPoints, Points};
use sf_core::{Interval, Tolerances};
use sf_figure::{Axis, FigureError, PlotSurface, TraceMode};

/// Draws the surface's figure and reports pan/zoom back as relayouts.
#[derive(Default)]
pub struct PlotView {
    /// Axis ranges last pushed to (or read from) the plot widget.
    shown: Option<(Interval, Interval)>,
}

impl PlotView {
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        surface: &mut PlotSurface,
        width: f32,
    ) -> Result<(), FigureError> {
        let tol = Tolerances::default();
        let figure = surface.figure();
        let layout = figure.layout();
        let wanted = (figure.x_range(), figure.y_range());
        // Engine-side range changes (setters, startup) win over the widget.
        let push_bounds = !self
            .shown
            .is_some_and(|(x, y)| x.approx_eq(&wanted.0, tol) && y.approx_eq(&wanted.1, tol));

        if let Some(title) = &layout.title {
            ui.strong(title);
        }

        let mut plot = Plot::new("slidefig_plot")
            .width(width)
            .height(layout.height as f32);
        if layout.show_legend {
            plot = plot.legend(Legend::default());
        }
        let response = plot
            .x_axis_label(layout.x_axis.title.clone())
            .y_axis_label(layout.y_axis.title.clone())
            .show(ui, |plot_ui| {
                if push_bounds {
                    plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                        [wanted.0.min(), wanted.1.min()],
                        [wanted.0.max(), wanted.1.max()],
                    ));
                }
                for trace in figure.traces().iter().filter(|t| t.visible) {
                    match trace.mode {
                        // One legend entry per trace even when poles split it.
                        TraceMode::Lines => {
                            for segment in trace.segments() {
                                plot_ui
                                    .line(Line::new(PlotPoints::from(segment)).name(&trace.name));
                            }
                        }
                        TraceMode::Markers => {
                            plot_ui.points(
                                Points::new(PlotPoints::from(trace.points()))
                                    .radius(3.0)
                                    .name(&trace.name),
                            );
                        }
                    }
                }
            });

        let bounds = response.transform.bounds();
        let seen = (
            Interval::new(bounds.min()[0], bounds.max()[0]),
            Interval::new(bounds.min()[1], bounds.max()[1]),
        );
        let (Ok(x), Ok(y)) = seen else {
            // Degenerate bounds while the widget is being resized.
            return Ok(());
        };

        if push_bounds {
            self.shown = Some(wanted);
            return Ok(());
        }
        // The widget echoes bounds back through its own transform; ignore
        // round-off so an idle plot never counts as a pan.
        if !x.approx_eq(&wanted.0, tol) {
            surface.relayout(Axis::X, x)?;
        }
        if !y.approx_eq(&wanted.1, tol) {
            surface.relayout(Axis::Y, y)?;
        }
        self.shown = Some((x, y));
        Ok(())
    }
}
