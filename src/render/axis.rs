//! Axis renderer with animated tick updates.
//!
//! When the scale changes, ticks shared by both scales slide to their new
//! positions. New ticks enter from where the old scale would have put them
//! and fade in; stale ticks slide to their new-scale position while fading
//! out, then disappear.

use std::time::Duration;

use crate::color::Rgba;
use crate::output::{SvgElement, TextAnchor};
use crate::scale::{LinearScale, Scale, TickFormat};
use crate::transition::Transition;

const TICK_SIZE: f32 = 6.0;
const TICK_PADDING: f32 = 3.0;
const TICK_FONT_SIZE: f32 = 10.0;

/// Which side of the plot the axis is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Horizontal axis below the plot, labels under the ticks.
    Bottom,
    /// Vertical axis left of the plot, labels left of the ticks.
    Left,
}

#[derive(Debug, Clone)]
struct TickState {
    value: f32,
    label: String,
    position: Transition<f32>,
    opacity: Transition<f32>,
    exiting: bool,
}

/// One tick evaluated at a point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct TickFrame {
    /// Domain value.
    pub value: f32,
    /// Pixel position along the axis.
    pub position: f32,
    /// Opacity in `[0, 1]`.
    pub opacity: f32,
    /// Formatted label.
    pub label: String,
}

/// Draws one axis and animates it between scales.
#[derive(Debug, Clone)]
pub struct AxisRenderer {
    orientation: Orientation,
    scale: LinearScale,
    tick_count: usize,
    duration: Duration,
    ticks: Vec<TickState>,
}

impl AxisRenderer {
    /// Create an axis already at rest on `scale`.
    #[must_use]
    pub fn new(
        orientation: Orientation,
        scale: LinearScale,
        tick_count: usize,
        duration: Duration,
    ) -> Self {
        let format = scale.tick_format(tick_count);
        let ticks = scale
            .ticks(tick_count)
            .into_iter()
            .map(|value| TickState {
                value,
                label: format.format(value),
                position: Transition::settled(scale.scale(value)),
                opacity: Transition::settled(1.0),
                exiting: false,
            })
            .collect();

        Self {
            orientation,
            scale,
            tick_count,
            duration,
            ticks,
        }
    }

    /// Orientation of the axis.
    #[must_use]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Scale the axis is drawn for (the target scale during a transition).
    #[must_use]
    pub fn scale(&self) -> &LinearScale {
        &self.scale
    }

    /// Transition to a new scale starting at `now`. Rendering the current
    /// scale again changes nothing.
    pub fn render(&mut self, scale: LinearScale, now: Duration) {
        if scale == self.scale {
            return;
        }

        let old = self.scale;
        let format: TickFormat = scale.tick_format(self.tick_count);
        let values = scale.ticks(self.tick_count);

        self.ticks.retain(|t| !t.exiting || t.opacity.is_running(now));

        for tick in &mut self.ticks {
            // An unmapped scale has no position for the tick; it fades in place.
            let target = Some(scale.scale(tick.value))
                .filter(|p| p.is_finite())
                .unwrap_or_else(|| tick.position.value_at(now));
            tick.position.retarget(target, now, self.duration);
            if values.contains(&tick.value) {
                tick.label = format.format(tick.value);
                tick.opacity.retarget(1.0, now, self.duration);
                tick.exiting = false;
            } else {
                tick.opacity.retarget(0.0, now, self.duration);
                tick.exiting = true;
            }
        }

        for value in values {
            if self.ticks.iter().any(|t| t.value == value) {
                continue;
            }
            let to = scale.scale(value);
            let from = Some(old.scale(value)).filter(|p| p.is_finite()).unwrap_or(to);
            self.ticks.push(TickState {
                value,
                label: format.format(value),
                position: Transition::new(from, to, now, self.duration),
                opacity: Transition::new(0.0, 1.0, now, self.duration),
                exiting: false,
            });
        }

        self.ticks.sort_by(|a, b| a.value.total_cmp(&b.value));
        self.scale = scale;
    }

    /// Ticks visible at `now`.
    #[must_use]
    pub fn ticks_at(&self, now: Duration) -> Vec<TickFrame> {
        self.ticks
            .iter()
            .filter(|t| !t.exiting || t.opacity.is_running(now))
            .map(|t| TickFrame {
                value: t.value,
                position: t.position.value_at(now),
                opacity: t.opacity.value_at(now),
                label: t.label.clone(),
            })
            .collect()
    }

    /// Whether any tick is still moving at `now`.
    #[must_use]
    pub fn is_animating(&self, now: Duration) -> bool {
        self.ticks
            .iter()
            .any(|t| t.position.is_running(now) || t.opacity.is_running(now))
    }

    /// SVG group for the axis at `now`.
    #[must_use]
    pub fn to_svg(&self, now: Duration) -> SvgElement {
        let (r0, r1) = self.scale.range();
        let domain = match self.orientation {
            Orientation::Bottom => format!("M{r0},{TICK_SIZE}V0H{r1}V{TICK_SIZE}"),
            Orientation::Left => format!("M{},{r0}H0V{r1}H{}", -TICK_SIZE, -TICK_SIZE),
        };

        let path = SvgElement::path(&domain, None, Some(Rgba::BLACK), 1.0).with_class("domain");
        let mut children = vec![path];
        for tick in self.ticks_at(now) {
            children.push(self.tick_to_svg(&tick));
        }

        let class = match self.orientation {
            Orientation::Bottom => "x-axis",
            Orientation::Left => "y-axis",
        };
        SvgElement::group(children).with_class(class)
    }

    fn tick_to_svg(&self, tick: &TickFrame) -> SvgElement {
        let (transform, line, text) = match self.orientation {
            Orientation::Bottom => (
                format!("translate({},0)", tick.position),
                SvgElement::line(0.0, 0.0, 0.0, TICK_SIZE, Rgba::BLACK, 1.0),
                SvgElement::text(
                    0.0,
                    TICK_SIZE + TICK_PADDING,
                    &tick.label,
                    TICK_FONT_SIZE,
                    Rgba::BLACK,
                    TextAnchor::Middle,
                )
                .with_dy("0.71em"),
            ),
            Orientation::Left => (
                format!("translate(0,{})", tick.position),
                SvgElement::line(0.0, 0.0, -TICK_SIZE, 0.0, Rgba::BLACK, 1.0),
                SvgElement::text(
                    -(TICK_SIZE + TICK_PADDING),
                    0.0,
                    &tick.label,
                    TICK_FONT_SIZE,
                    Rgba::BLACK,
                    TextAnchor::End,
                )
                .with_dy("0.32em"),
            ),
        };

        SvgElement::group(vec![line, text])
            .with_class("tick")
            .with_opacity(tick.opacity)
            .with_transform(transform)
    }
}
