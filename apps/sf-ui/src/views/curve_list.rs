use egui::{Color32, TextEdit};
use sf_expr::parse;
use sf_figure::PlotSurface;
use std::collections::HashMap;

/// Editable list of the surface's curves: expression text and visibility.
#[derive(Default)]
pub struct CurveList {
    edits: HashMap<String, String>,
    errors: HashMap<String, String>,
}

impl CurveList {
    pub fn show(&mut self, ui: &mut egui::Ui, surface: &mut PlotSurface) {
        let rows: Vec<(String, String, String, bool)> = surface
            .curves()
            .map(|c| {
                (
                    c.id().to_string(),
                    c.label().to_string(),
                    c.expression().to_string(),
                    c.visible(),
                )
            })
            .collect();

        for (id, label, expression, visible) in rows {
            ui.horizontal(|ui| {
                let mut shown = visible;
                if ui.checkbox(&mut shown, label).changed() {
                    if let Err(err) = surface.curve_mut(&id).and_then(|mut c| c.set_visible(shown)) {
                        self.errors.insert(id.clone(), err.to_string());
                    }
                }
                let buffer = self.edits.entry(id.clone()).or_insert(expression.clone());
                let edit = ui.add(TextEdit::singleline(buffer).desired_width(260.0));
                if edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    let result = parse(buffer)
                        .map_err(|e| e.to_string())
                        .and_then(|expr| {
                            surface
                                .curve_mut(&id)
                                .and_then(|mut c| c.set_expression(expr))
                                .map_err(|e| e.to_string())
                        });
                    match result {
                        Ok(()) => {
                            self.errors.remove(&id);
                        }
                        Err(message) => {
                            self.errors.insert(id.clone(), message);
                        }
                    }
                } else if !edit.has_focus() {
                    *buffer = expression;
                }
            });
            if let Some(message) = self.errors.get(&id) {
                ui.colored_label(Color32::RED, message);
            }
        }
    }
}
