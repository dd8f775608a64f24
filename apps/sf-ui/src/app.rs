use crate::demo;
use crate::views::{CurveList, ParamPanel, PlotView};
use egui::Color32;
use sf_figure::{FigureResult, LayoutNode, PlotSurface};
use tracing::error;

const PANEL_WIDTH: f32 = 360.0;

pub struct SlidefigApp {
    surface: Option<PlotSurface>,
    tree: Option<LayoutNode>,
    plot_view: PlotView,
    param_panel: ParamPanel,
    curve_list: CurveList,
    last_error: Option<String>,
}

impl SlidefigApp {
    pub fn new() -> Self {
        let mut app = Self {
            surface: None,
            tree: None,
            plot_view: PlotView::default(),
            param_panel: ParamPanel::default(),
            curve_list: CurveList::default(),
            last_error: None,
        };
        match demo::build().and_then(|mut s| s.show().map(|tree| (s, tree))) {
            Ok((surface, tree)) => {
                app.surface = Some(surface);
                app.tree = Some(tree);
            }
            Err(err) => {
                error!(error = %err, "failed to build demo figure");
                app.last_error = Some(err.to_string());
            }
        }
        app
    }

    fn show_node(&mut self, ui: &mut egui::Ui, node: &LayoutNode) -> FigureResult<()> {
        match node {
            LayoutNode::HBox(children) => {
                ui.horizontal_top(|ui| children.iter().try_for_each(|c| self.show_node(ui, c)))
                    .inner
            }
            LayoutNode::VBox(children) => {
                ui.vertical(|ui| children.iter().try_for_each(|c| self.show_node(ui, c)))
                    .inner
            }
            LayoutNode::Html(markup) => {
                ui.strong(strip_tags(markup));
                Ok(())
            }
            LayoutNode::Figure => {
                let Some(surface) = self.surface.as_mut() else {
                    return Ok(());
                };
                let width = (ui.available_width() - PANEL_WIDTH).max(200.0);
                self.plot_view.show(ui, surface, width)
            }
            LayoutNode::Slider(id) => match self.surface.as_mut() {
                Some(surface) => self.param_panel.show_slider(ui, surface, id),
                None => Ok(()),
            },
        }
    }
}

impl eframe::App for SlidefigApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::bottom("curves").show(ctx, |ui| {
            if let Some(surface) = self.surface.as_mut() {
                ui.heading("Curves");
                self.curve_list.show(ui, surface);
            }
            if let Some(message) = &self.last_error {
                ui.colored_label(Color32::RED, message);
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(tree) = self.tree.clone() {
                if let Err(err) = self.show_node(ui, &tree) {
                    error!(error = %err, "render failed");
                    self.last_error = Some(err.to_string());
                }
            }
        });
    }
}

/// Plain text of simple inline markup such as `<b>Parameters</b>`.
fn strip_tags(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut in_tag = false;
    for ch in markup.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_markup() {
        assert_eq!(strip_tags("<b>Parameters</b>"), "Parameters");
        assert_eq!(strip_tags("plain"), "plain");
    }
}
