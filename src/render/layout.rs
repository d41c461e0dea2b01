//! Surface geometry: outer size, margins and the inner plot area.

use batuta_common::display::WithDimensions;

use crate::config::SurfaceConfig;
use crate::error::{Error, Result};
use crate::field::Axis;
use crate::geometry::{Margin, Point};

/// Outer drawing surface and the plot area inside its margins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartLayout {
    width: u32,
    height: u32,
    margin: Margin,
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self {
            width: 800,
            height: 500,
            margin: Margin::default(),
        }
    }
}

impl ChartLayout {
    /// Create a layout.
    ///
    /// # Errors
    ///
    /// Returns an error if the margins leave no plot area.
    pub fn new(width: u32, height: u32, margin: Margin) -> Result<Self> {
        let layout = Self { width, height, margin };
        if layout.inner_width() <= 0.0 || layout.inner_height() <= 0.0 {
            return Err(Error::Rendering(format!(
                "margins leave no plot area in a {width}x{height} surface"
            )));
        }
        Ok(layout)
    }

    /// Create a layout from configuration.
    ///
    /// # Errors
    ///
    /// See [`ChartLayout::new`].
    pub fn from_config(config: &SurfaceConfig) -> Result<Self> {
        Self::new(config.width, config.height, config.margin)
    }

    /// Outer width.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Outer height.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Margins.
    #[must_use]
    pub fn margin(&self) -> Margin {
        self.margin
    }

    /// Plot area width.
    #[must_use]
    pub fn inner_width(&self) -> f32 {
        self.width as f32 - self.margin.left - self.margin.right
    }

    /// Plot area height.
    #[must_use]
    pub fn inner_height(&self) -> f32 {
        self.height as f32 - self.margin.top - self.margin.bottom
    }

    /// Pixel range of an axis. The y range is inverted so larger values sit
    /// higher on screen.
    #[must_use]
    pub fn range(&self, axis: Axis) -> (f32, f32) {
        match axis {
            Axis::X => (0.0, self.inner_width()),
            Axis::Y => (self.inner_height(), 0.0),
        }
    }

    /// Transform placing the plot group inside the margins.
    #[must_use]
    pub fn plot_transform(&self) -> String {
        format!("translate({}, {})", self.margin.left, self.margin.top)
    }

    /// Transform of an axis group inside the plot group.
    #[must_use]
    pub fn axis_transform(&self, axis: Axis) -> Option<String> {
        match axis {
            Axis::X => Some(format!("translate(0, {})", self.inner_height())),
            Axis::Y => None,
        }
    }

    /// Transform of an axis-label group inside the plot group.
    #[must_use]
    pub fn label_group_transform(&self, axis: Axis) -> String {
        match axis {
            Axis::X => format!(
                "translate({}, {})",
                self.inner_width() / 2.0,
                self.inner_height() + 20.0
            ),
            Axis::Y => format!("translate(-25, {})", self.inner_height() / 2.0),
        }
    }

    /// Convert a surface coordinate to plot-area coordinates.
    #[must_use]
    pub fn to_plot(&self, point: Point) -> Point {
        point.offset(-self.margin.left, -self.margin.top)
    }

    /// Convert a plot-area coordinate to surface coordinates.
    #[must_use]
    pub fn to_surface(&self, point: Point) -> Point {
        point.offset(self.margin.left, self.margin.top)
    }
}

impl WithDimensions for ChartLayout {
    /// Resize the surface. Sizes too small for the margins are raised so at
    /// least one pixel of plot area remains.
    fn set_dimensions(&mut self, width: u32, height: u32) {
        let min_width = (self.margin.left + self.margin.right).ceil().max(0.0) as u32 + 1;
        let min_height = (self.margin.top + self.margin.bottom).ceil().max(0.0) as u32 + 1;
        self.width = width.max(min_width);
        self.height = height.max(min_height);
    }
}
