use egui::{Color32, DragValue, Slider, TextEdit};
use sf_expr::Symbol;
use sf_figure::{FigureResult, PlotSurface};
use std::collections::HashMap;

/// Slider rows for the parameter panel.
#[derive(Default)]
pub struct ParamPanel {
    /// Text being typed per parameter; mirrors the control while unfocused.
    edits: HashMap<Symbol, String>,
}

impl ParamPanel {
    pub fn show_slider(
        &mut self,
        ui: &mut egui::Ui,
        surface: &mut PlotSurface,
        id: &Symbol,
    ) -> FigureResult<()> {
        let Some(control) = surface.param(id.as_str()) else {
            ui.colored_label(Color32::RED, format!("missing parameter {id}"));
            return Ok(());
        };
        let (min, max) = control.bounds();
        let step = control.step();
        let mut position = control.position();
        let mut live = control.live_update();
        let settings_open = control.settings_open();
        let control_text = control.text().to_string();
        let label = control.label().to_string();

        let key = id.as_str();
        ui.horizontal(|ui| -> FigureResult<()> {
            ui.label(label);
            let slider = ui.add(
                Slider::new(&mut position, min..=max)
                    .step_by(step)
                    .show_value(false),
            );
            if slider.changed() {
                surface.drag_param(key, position)?;
            }
            if slider.drag_stopped() || (slider.changed() && !slider.dragged()) {
                surface.release_param(key)?;
            }

            let buffer = self
                .edits
                .entry(id.clone())
                .or_insert_with(|| control_text.clone());
            let edit = ui.add(TextEdit::singleline(buffer).desired_width(64.0));
            if edit.lost_focus() {
                let typed = std::mem::take(buffer);
                surface.submit_param_text(key, &typed)?;
            }
            if !edit.has_focus() {
                if let Some(control) = surface.param(key) {
                    *self.edits.entry(id.clone()).or_default() = control.text().to_string();
                }
            }

            if ui.button("↺").on_hover_text("Reset").clicked() {
                surface.reset_param(key)?;
            }
            if ui.selectable_label(settings_open, "⚙").clicked() {
                surface.toggle_param_settings(key)?;
            }
            Ok(())
        })
        .inner?;

        if settings_open {
            let (mut new_min, mut new_max, mut new_step) = (min, max, step);
            let mut bounds_error = None;
            ui.indent(("settings", key), |ui| {
                ui.horizontal(|ui| {
                    ui.label("min");
                    ui.add(DragValue::new(&mut new_min).speed(step));
                    ui.label("max");
                    ui.add(DragValue::new(&mut new_max).speed(step));
                    ui.label("step");
                    ui.add(DragValue::new(&mut new_step).speed(0.001).range(1e-6..=f64::MAX));
                });
                ui.checkbox(&mut live, "Continuous update");
            });
            if (new_min, new_max) != (min, max) {
                if let Err(err) = surface.set_param_bounds(key, new_min, new_max) {
                    bounds_error = Some(err.to_string());
                }
            }
            if new_step != step {
                surface.set_param_step(key, new_step)?;
            }
            if live != surface.param(key).is_some_and(|c| c.live_update()) {
                surface.set_param_live_update(key, live)?;
            }
            if let Some(message) = bounds_error {
                ui.colored_label(Color32::RED, message);
            }
        }
        Ok(())
    }
}
