//! Widget tree handed to the display host.

use sf_expr::Symbol;

/// Nested layout containers. The host walks this tree and draws the figure
/// and parameter controls it references.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutNode {
    /// Children side by side.
    HBox(Vec<LayoutNode>),
    /// Children stacked vertically.
    VBox(Vec<LayoutNode>),
    /// Static markup (panel headings).
    Html(String),
    /// The surface's figure.
    Figure,
    /// The control bound to this parameter.
    Slider(Symbol),
}

impl LayoutNode {
    /// Parameter symbols referenced by sliders, in tree order.
    pub fn sliders(&self) -> Vec<&Symbol> {
        let mut out = Vec::new();
        self.collect_sliders(&mut out);
        out
    }

    fn collect_sliders<'a>(&'a self, out: &mut Vec<&'a Symbol>) {
        match self {
            LayoutNode::HBox(children) | LayoutNode::VBox(children) => {
                for child in children {
                    child.collect_sliders(out);
                }
            }
            LayoutNode::Slider(sym) => out.push(sym),
            LayoutNode::Html(_) | LayoutNode::Figure => {}
        }
    }

    /// Plot area on the left, parameter panel on the right.
    pub(crate) fn plot_with_panel<'a>(params: impl IntoIterator<Item = &'a Symbol>) -> Self {
        let mut panel = vec![LayoutNode::Html("<b>Parameters</b>".to_string())];
        panel.extend(params.into_iter().cloned().map(LayoutNode::Slider));
        LayoutNode::HBox(vec![
            LayoutNode::VBox(vec![LayoutNode::Figure]),
            LayoutNode::VBox(panel),
        ])
    }
}
