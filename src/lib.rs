//! # Healthrisk-Viz
//!
//! Interactive scatter chart of U.S. state health-risk metrics.
//!
//! One marker per state is placed by two selectable metrics. Clicking one of
//! the three labels under an axis switches that axis to a different metric:
//! the axis ticks, markers and tooltips animate to the new scale over one
//! second. Built on the [trueno](https://crates.io/crates/trueno) core
//! library for the extent reductions behind every scale.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use healthrisk_viz::prelude::*;
//! use std::time::Duration;
//!
//! let dataset = Dataset::from_path("assets/data/healthRisk.csv")?;
//! let mut chart = ChartController::new(dataset, &Config::default())?;
//!
//! chart.click(AxisLabel::Age, Duration::ZERO);
//! let svg = chart.render_svg(Duration::from_secs(1));
//! ```
//!
//! ## Feature Flags
//!
//! - `cli`: the `healthrisk-chart` binary (default)
//! - `wasm`: browser mount via wasm-bindgen

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
// Allow unwrap() in tests only - banned in production code
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Core Modules
// ============================================================================

/// Color types and CSS conversion.
pub mod color;

/// Points and margins.
pub mod geometry;

/// Selectable metrics and the axes they belong to.
pub mod field;

/// Health-risk records and CSV loading.
pub mod dataset;

/// Scale functions for data-to-pixel mappings.
pub mod scale;

/// View state and axis labels.
pub mod state;

/// Time-based interpolation.
pub mod transition;

// ============================================================================
// Rendering Modules
// ============================================================================

/// Layout, axes, markers and tooltip.
pub mod render;

/// Output encoders (SVG).
pub mod output;

/// Chart controller.
pub mod chart;

/// YAML configuration.
pub mod config;

/// WebAssembly bindings for browser usage.
#[cfg(feature = "wasm")]
#[cfg_attr(docsrs, doc(cfg(feature = "wasm")))]
pub mod wasm;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for healthrisk-viz operations.
pub mod error;

pub use error::{Error, Result};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and traits for convenient imports.
///
/// ```rust,ignore
/// use healthrisk_viz::prelude::*;
/// ```
pub mod prelude {
    pub use batuta_common::display::WithDimensions;
    pub use crate::chart::ChartController;
    pub use crate::color::Rgba;
    pub use crate::config::Config;
    pub use crate::dataset::{Dataset, Record};
    pub use crate::error::{Error, Result};
    pub use crate::field::{Axis, Field, XField, YField};
    pub use crate::geometry::{Margin, Point};
    pub use crate::render::{ChartLayout, HoverTarget, TooltipContent};
    pub use crate::scale::{LinearScale, Scale};
    pub use crate::state::{AxisLabel, LabelClass, Selection, ViewState};
}

// ============================================================================
// Re-exports
// ============================================================================

/// Re-export trueno for direct access to SIMD operations.
pub use trueno;
