//! Charts module - Bar chart styling and rendering

mod labels;
mod renderer;
mod style;

pub use renderer::{BarChartRenderer, RenderContext};
pub use style::{ChartStyle, StyleError};
