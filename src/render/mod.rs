//! Scene pieces drawn by the chart.
//!
//! Each piece owns its animation state and emits [`crate::output::SvgElement`]s
//! for a given instant:
//!
//! - [`ChartLayout`]: surface size, margins and group transforms
//! - [`AxisRenderer`]: domain line and animated ticks
//! - [`MarkerLayer`]: one circle and state-code label per record
//! - [`Tooltip`]: hover box bound to the current view state

mod axis;
mod layout;
mod markers;
mod tooltip;

pub use axis::{AxisRenderer, Orientation, TickFrame};
pub use layout::ChartLayout;
pub use markers::{MarkerLayer, MarkerStyle};
pub use tooltip::{HoverTarget, Tooltip, TooltipContent};
