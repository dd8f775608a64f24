pub mod curve_list;
pub mod param_panel;
pub mod plot_view;

pub use curve_list::CurveList;
pub use param_panel::ParamPanel;
pub use plot_view::PlotView;
