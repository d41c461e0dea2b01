//! Chart controller: owns the view state and every animated piece.
//!
//! [`ChartController::click`] is the only entry point that mutates the view
//! state. Everything drawn is re-derived from that state, the dataset and the
//! caller-supplied time.

use std::time::Duration;

use crate::color::Rgba;
use crate::config::Config;
use crate::dataset::Dataset;
use crate::error::{Error, Result};
use crate::field::Axis;
use crate::geometry::Point;
use crate::output::{SvgElement, SvgEncoder, TextAnchor};
use crate::render::{
    AxisRenderer, ChartLayout, HoverTarget, MarkerLayer, MarkerStyle, Orientation, Tooltip,
    TooltipContent,
};
use crate::scale::{LinearScale, Scale};
use crate::state::{AxisLabel, LabelClass, ViewState};

const LABEL_FONT_SIZE: f32 = 14.0;

/// Interactive scatter chart over a loaded dataset.
#[derive(Debug, Clone)]
pub struct ChartController {
    dataset: Dataset,
    state: ViewState,
    layout: ChartLayout,
    duration: Duration,
    // One scale per axis label, in `AxisLabel::ALL` order.
    scales: Vec<LinearScale>,
    x_axis: AxisRenderer,
    y_axis: AxisRenderer,
    markers: MarkerLayer,
    tooltip: Tooltip,
}

impl ChartController {
    /// Build a chart at rest under the default selection.
    ///
    /// # Errors
    ///
    /// Returns an error if the dataset is empty, the layout leaves no plot
    /// area, or the marker color is invalid. A field without a single finite
    /// value is not an error: it gets an unmapped scale and its markers are
    /// not drawn.
    pub fn new(dataset: Dataset, config: &Config) -> Result<Self> {
        if dataset.is_empty() {
            return Err(Error::EmptyData);
        }
        let layout = ChartLayout::from_config(&config.chart)?;
        let style = MarkerStyle::from_config(config)?;
        let duration = config.transition_duration();
        let tick_count = config.axis.tick_count;
        let state = ViewState::new();

        let scales = AxisLabel::ALL
            .iter()
            .map(|label| field_scale(&dataset, *label, &layout))
            .collect::<Result<Vec<_>>>()?;

        let x_scale = scales[AxisLabel::from(state.selection(Axis::X)) as usize];
        let y_scale = scales[AxisLabel::from(state.selection(Axis::Y)) as usize];
        let positions = marker_positions(&dataset, &state, &x_scale, &y_scale);
        let labels = dataset.iter().map(|r| r.abbr.clone());
        let markers = MarkerLayer::new(labels, &positions, style, duration);

        tracing::debug!(records = dataset.len(), ?state, "chart initialized");

        Ok(Self {
            x_axis: AxisRenderer::new(Orientation::Bottom, x_scale, tick_count, duration),
            y_axis: AxisRenderer::new(Orientation::Left, y_scale, tick_count, duration),
            tooltip: Tooltip::new(state, config.tooltip.offset),
            dataset,
            state,
            layout,
            duration,
            scales,
            markers,
        })
    }

    /// Current view state.
    #[must_use]
    pub fn state(&self) -> ViewState {
        self.state
    }

    /// Loaded dataset.
    #[must_use]
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Surface layout.
    #[must_use]
    pub fn layout(&self) -> &ChartLayout {
        &self.layout
    }

    /// Transition duration.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Scale of the active field on an axis.
    #[must_use]
    pub fn scale(&self, axis: Axis) -> &LinearScale {
        self.label_scale(self.active_label(axis))
    }

    fn label_scale(&self, label: AxisLabel) -> &LinearScale {
        &self.scales[label as usize]
    }

    /// Label of the active field on an axis.
    #[must_use]
    pub fn active_label(&self, axis: Axis) -> AxisLabel {
        AxisLabel::from(self.state.selection(axis))
    }

    /// Styling class of a label.
    #[must_use]
    pub fn label_class(&self, label: AxisLabel) -> LabelClass {
        label.class(&self.state)
    }

    /// Handle a click on an axis label at time `now`.
    ///
    /// Returns the axis that changed, or `None` if the label was already
    /// active, in which case nothing changes.
    pub fn click(&mut self, label: AxisLabel, now: Duration) -> Option<Axis> {
        let axis = self.state.apply(label.selection())?;
        let scale = *self.label_scale(label);

        match axis {
            Axis::X => self.x_axis.render(scale, now),
            Axis::Y => self.y_axis.render(scale, now),
        }

        let positions = marker_positions(
            &self.dataset,
            &self.state,
            self.scale(Axis::X),
            self.scale(Axis::Y),
        );
        self.markers.update(&positions, now);
        self.tooltip.bind(self.state, &self.dataset);

        tracing::debug!(%label, ?axis, state = ?self.state, "axis selection changed");
        Some(axis)
    }

    /// Show the tooltip for a hovered marker or label. The tooltip anchors at
    /// the marker's position at `now`.
    pub fn hover(&mut self, target: HoverTarget, now: Duration) -> Option<&TooltipContent> {
        let Some(position) = self.markers.position_at(target.index(), now) else {
            self.tooltip.hide();
            return None;
        };
        let anchor = self.layout.to_surface(position);
        self.tooltip.show(&self.dataset, target.index(), anchor)
    }

    /// Show or hide the tooltip for whatever marker lies under `point`
    /// (surface coordinates).
    pub fn hover_at(&mut self, point: Point, now: Duration) -> Option<&TooltipContent> {
        match self.hit_test(point, now) {
            Some(index) => self.hover(HoverTarget::Marker(index), now),
            None => {
                self.tooltip.hide();
                None
            }
        }
    }

    /// Hide the tooltip.
    pub fn unhover(&mut self) {
        self.tooltip.hide();
    }

    /// Tooltip state.
    #[must_use]
    pub fn tooltip(&self) -> &Tooltip {
        &self.tooltip
    }

    /// Index of the topmost marker under `point` (surface coordinates).
    #[must_use]
    pub fn hit_test(&self, point: Point, now: Duration) -> Option<usize> {
        self.markers.hit_test(self.layout.to_plot(point), now)
    }

    /// Marker centers in plot coordinates at `now`.
    #[must_use]
    pub fn marker_positions(&self, now: Duration) -> Vec<Point> {
        self.markers.positions_at(now)
    }

    /// Whether any transition is still running at `now`.
    #[must_use]
    pub fn is_animating(&self, now: Duration) -> bool {
        self.markers.is_animating(now)
            || self.x_axis.is_animating(now)
            || self.y_axis.is_animating(now)
    }

    /// The whole chart as an SVG scene at `now`.
    #[must_use]
    pub fn scene(&self, now: Duration) -> SvgEncoder {
        let mut x_axis = self.x_axis.to_svg(now);
        if let Some(transform) = self.layout.axis_transform(Axis::X) {
            x_axis = x_axis.with_transform(transform);
        }

        let mut plot = vec![x_axis, self.y_axis.to_svg(now)];
        plot.extend(self.markers.to_svg(now));
        plot.push(self.label_group(Axis::X));
        plot.push(self.label_group(Axis::Y));

        let mut encoder = SvgEncoder::new(self.layout.width(), self.layout.height());
        encoder.add_element(SvgElement::group(plot).with_transform(self.layout.plot_transform()));
        if let Some(tooltip) = self.tooltip.to_svg() {
            encoder.add_element(tooltip);
        }
        encoder
    }

    /// Render the frame at `now` to an SVG document.
    #[must_use]
    pub fn render_svg(&self, now: Duration) -> String {
        self.scene(now).render()
    }

    fn label_group(&self, axis: Axis) -> SvgElement {
        let labels = AxisLabel::for_axis(axis)
            .map(|label| {
                let class = self.label_class(label);
                let fill = match class {
                    LabelClass::Active => Rgba::BLACK,
                    LabelClass::Inactive => Rgba::GREY,
                };
                let text = SvgElement::text(
                    0.0,
                    label.offset(),
                    label.text(),
                    LABEL_FONT_SIZE,
                    fill,
                    TextAnchor::Middle,
                )
                .with_id(label.element_id());
                match axis {
                    Axis::X => text.with_class(class.as_str()),
                    Axis::Y => text
                        .with_class(format!("axis-text {}", class.as_str()))
                        .with_transform("rotate(-90)")
                        .with_dy("1em"),
                }
            })
            .collect();

        SvgElement::group(labels)
            .with_class(match axis {
                Axis::X => "x-labels",
                Axis::Y => "y-labels",
            })
            .with_transform(self.layout.label_group_transform(axis))
    }
}

/// Scale for one label's field. A field with no finite value maps nowhere.
fn field_scale(dataset: &Dataset, label: AxisLabel, layout: &ChartLayout) -> Result<LinearScale> {
    let range = layout.range(label.axis());
    match LinearScale::for_field(dataset, label.field(), range) {
        Err(Error::EmptyData) => {
            tracing::warn!(field = %label.field(), "no finite values, markers will not be drawn");
            Ok(LinearScale::unmapped(range))
        }
        other => other,
    }
}

/// Marker centers for every record under `state`.
fn marker_positions(
    dataset: &Dataset,
    state: &ViewState,
    x: &LinearScale,
    y: &LinearScale,
) -> Vec<Point> {
    let (fx, fy) = (state.field(Axis::X), state.field(Axis::Y));
    dataset
        .iter()
        .map(|r| Point::new(x.scale(r.value(fx)), y.scale(r.value(fy))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Record;
    use crate::field::{Field, XField, YField};
    use approx::assert_relative_eq;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn dataset() -> Dataset {
        Dataset::new(vec![
            Record::new("Alabama", "AL", [18.0, 38.6, 42830.0, 33.5, 21.1, 13.9]),
            Record::new("Ohio", "OH", [12.0, 39.3, 49644.0, 31.5, 21.6, 20.0]),
            Record::new("Texas", "TX", [15.9, 34.4, 53207.0, 30.9, 14.5, 22.1]),
        ])
    }

    fn chart() -> ChartController {
        ChartController::new(dataset(), &Config::default()).unwrap()
    }

    #[test]
    fn test_initial_state() {
        let chart = chart();
        assert_eq!(chart.state(), ViewState::new());
        assert_relative_eq!(chart.scale(Axis::X).domain().0, 0.8 * 12.0);
        assert_relative_eq!(chart.scale(Axis::X).domain().1, 1.2 * 18.0);
        assert_eq!(chart.scale(Axis::Y).range(), (400.0, 0.0));
        assert!(!chart.is_animating(Duration::ZERO));
    }

    #[test]
    fn test_click_active_label_is_noop() {
        let mut chart = chart();
        let before = chart.marker_positions(Duration::ZERO);

        assert_eq!(chart.click(AxisLabel::Poverty, ms(10)), None);
        assert_eq!(chart.state(), ViewState::new());
        assert!(!chart.is_animating(ms(10)));
        assert_eq!(chart.marker_positions(ms(10)), before);
    }

    #[test]
    fn test_click_changes_one_axis() {
        let mut chart = chart();
        let y_scale = *chart.scale(Axis::Y);

        assert_eq!(chart.click(AxisLabel::Age, ms(0)), Some(Axis::X));
        assert_eq!(chart.state().x, XField::Age);
        assert_eq!(chart.state().y, YField::Healthcare);
        assert_eq!(*chart.scale(Axis::Y), y_scale);
        assert_relative_eq!(chart.scale(Axis::X).domain().0, 0.8 * 34.4);

        assert!(chart.is_animating(ms(500)));
        assert!(!chart.is_animating(ms(1000)));

        let settled = chart.marker_positions(ms(1000));
        let expected = chart.scale(Axis::X).scale(38.6);
        assert_relative_eq!(settled[0].x, expected, epsilon = 1e-3);
    }

    #[test]
    fn test_one_active_label_per_axis() {
        let mut chart = chart();
        chart.click(AxisLabel::Income, ms(0));
        chart.click(AxisLabel::Obesity, ms(100));

        for axis in [Axis::X, Axis::Y] {
            let active = AxisLabel::for_axis(axis)
                .filter(|l| chart.label_class(*l) == LabelClass::Active)
                .count();
            assert_eq!(active, 1);
        }
        assert_eq!(chart.active_label(Axis::X), AxisLabel::Income);
        assert_eq!(chart.active_label(Axis::Y), AxisLabel::Obesity);
    }

    #[test]
    fn test_round_trip_restores_positions() {
        let mut chart = chart();
        let start = chart.marker_positions(Duration::ZERO);

        chart.click(AxisLabel::Smokes, ms(0));
        chart.click(AxisLabel::Healthcare, ms(2000));

        let back = chart.marker_positions(ms(3000));
        assert_eq!(back, start);
    }

    #[test]
    fn test_click_mid_transition_retargets() {
        let mut chart = chart();
        chart.click(AxisLabel::Age, ms(0));
        let mid = chart.marker_positions(ms(500));
        chart.click(AxisLabel::Income, ms(500));

        // Continues from the interpolated position.
        assert_eq!(chart.marker_positions(ms(500)), mid);
        assert!(chart.is_animating(ms(1400)));
        assert!(!chart.is_animating(ms(1500)));
    }

    #[test]
    fn test_hover_tooltip_text() {
        let mut chart = chart();
        let content = chart.hover(HoverTarget::Marker(1), Duration::ZERO).unwrap();
        assert_eq!(content.to_plain(), "Ohio / Poverty (%) 12 / Lacks Healthcare (%) 20");

        chart.click(AxisLabel::Obesity, ms(0));
        assert_eq!(
            chart.tooltip().content().unwrap().to_plain(),
            "Ohio / Poverty (%) 12 / Obese (%) 31.5"
        );

        chart.unhover();
        assert!(!chart.tooltip().is_visible());
    }

    #[test]
    fn test_hover_at_uses_surface_coordinates() {
        let mut chart = chart();
        let ohio = chart.marker_positions(Duration::ZERO)[1];
        let surface = chart.layout().to_surface(ohio);

        assert_eq!(chart.hit_test(surface, Duration::ZERO), Some(1));
        assert!(chart.hover_at(surface, Duration::ZERO).is_some());
        assert!(chart.hover_at(Point::ORIGIN, Duration::ZERO).is_none());
        assert!(!chart.tooltip().is_visible());
    }

    #[test]
    fn test_hover_out_of_range() {
        let mut chart = chart();
        assert!(chart.hover(HoverTarget::Label(42), Duration::ZERO).is_none());
    }

    #[test]
    fn test_render_svg() {
        let chart = chart();
        let svg = chart.render_svg(Duration::ZERO);

        assert!(svg.contains(r#"transform="translate(100, 20)""#));
        assert!(svg.contains(r#"class="x-axis" transform="translate(0, 400)""#));
        assert!(svg.contains(r#"class="y-axis""#));
        assert_eq!(svg.matches(r#"class="stateCircle""#).count(), 3);
        assert!(svg.contains(r#"id="label-poverty" class="active""#));
        assert!(svg.contains(r#"id="label-age" class="inactive""#));
        assert!(svg.contains(
            r#"id="label-healthcare" class="axis-text active" transform="rotate(-90)""#
        ));
        assert!(svg.contains(r#"transform="translate(-25, 200)""#));
        assert!(!svg.contains("d3-tip"));
    }

    #[test]
    fn test_scale_matches_field() {
        let chart = chart();
        let (lo, hi) = chart.scale(Axis::Y).domain();
        let values = chart.dataset().values(Field::Healthcare);
        assert!(values.iter().all(|v| (lo..=hi).contains(v)));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = Config::default();
        config.marker.color = "nope".to_string();
        assert!(ChartController::new(dataset(), &config).is_err());
    }

    #[test]
    fn test_field_without_values_does_not_block_chart() {
        let nan = f32::NAN;
        let data = Dataset::new(vec![
            Record::new("Alabama", "AL", [18.0, 38.6, nan, 33.5, 21.1, 13.9]),
            Record::new("Ohio", "OH", [12.0, 39.3, nan, 31.5, 21.6, 20.0]),
        ]);
        let mut chart = ChartController::new(data, &Config::default()).unwrap();
        assert_eq!(chart.render_svg(Duration::ZERO).matches(r#"class="stateCircle""#).count(), 2);

        assert_eq!(chart.click(AxisLabel::Income, ms(0)), Some(Axis::X));
        assert!(!chart.scale(Axis::X).is_mapped());
        assert!(chart.marker_positions(ms(1000)).iter().all(|p| p.x.is_nan()));
        let svg = chart.render_svg(ms(1000));
        assert_eq!(svg.matches(r#"class="stateCircle""#).count(), 0);
        assert!(svg.contains(r#"id="label-income" class="active""#));

        chart.click(AxisLabel::Poverty, ms(1000));
        assert_eq!(chart.render_svg(ms(2000)).matches(r#"class="stateCircle""#).count(), 2);
    }

    #[test]
    fn test_empty_dataset_is_rejected() {
        assert!(ChartController::new(Dataset::default(), &Config::default()).is_err());
    }
}
