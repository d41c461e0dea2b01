//! Point markers and their state-code labels.

use std::time::Duration;

use crate::color::Rgba;
use crate::config::Config;
use crate::error::Result;
use crate::geometry::Point;
use crate::output::{SvgElement, TextAnchor};
use crate::transition::Transition;

/// Marker appearance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerStyle {
    /// Circle radius.
    pub radius: f32,
    /// Circle fill.
    pub fill: Rgba,
    /// Circle opacity.
    pub opacity: f32,
    /// Label font size.
    pub label_size: f32,
    /// Label color.
    pub label_color: Rgba,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            radius: 10.0,
            fill: Rgba::BLUE,
            opacity: 0.5,
            label_size: 12.0,
            label_color: Rgba::WHITE,
        }
    }
}

impl MarkerStyle {
    /// Build a style from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color is not valid hex.
    pub fn from_config(config: &Config) -> Result<Self> {
        let marker = &config.marker;
        Ok(Self {
            radius: marker.radius,
            fill: config.marker_color()?,
            opacity: marker.opacity,
            label_size: marker.label_size,
            label_color: Rgba::WHITE,
        })
    }
}

#[derive(Debug, Clone)]
struct Marker {
    label: String,
    position: Transition<Point>,
}

/// One circle plus label per record, animated together.
#[derive(Debug, Clone)]
pub struct MarkerLayer {
    style: MarkerStyle,
    duration: Duration,
    markers: Vec<Marker>,
}

impl MarkerLayer {
    /// Create a layer at rest. `labels` and `positions` are paired by index.
    #[must_use]
    pub fn new<S: Into<String>>(
        labels: impl IntoIterator<Item = S>,
        positions: &[Point],
        style: MarkerStyle,
        duration: Duration,
    ) -> Self {
        let markers = labels
            .into_iter()
            .zip(positions)
            .map(|(label, &p)| Marker {
                label: label.into(),
                position: Transition::settled(p),
            })
            .collect();

        Self {
            style,
            duration,
            markers,
        }
    }

    /// Style in use.
    #[must_use]
    pub fn style(&self) -> &MarkerStyle {
        &self.style
    }

    /// Number of markers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// Whether the layer has no markers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Move every marker toward a new position, starting at `now`.
    /// Extra positions are ignored.
    pub fn update(&mut self, positions: &[Point], now: Duration) {
        for (marker, &target) in self.markers.iter_mut().zip(positions) {
            if marker.position.target() == target {
                continue;
            }
            marker.position.retarget(target, now, self.duration);
        }
    }

    /// Positions at `now`.
    #[must_use]
    pub fn positions_at(&self, now: Duration) -> Vec<Point> {
        self.markers.iter().map(|m| m.position.value_at(now)).collect()
    }

    /// Position of one marker at `now`.
    #[must_use]
    pub fn position_at(&self, index: usize, now: Duration) -> Option<Point> {
        self.markers.get(index).map(|m| m.position.value_at(now))
    }

    /// Whether any marker is still moving.
    #[must_use]
    pub fn is_animating(&self, now: Duration) -> bool {
        self.markers.iter().any(|m| m.position.is_running(now))
    }

    /// Topmost marker whose circle contains `point` (plot coordinates).
    #[must_use]
    pub fn hit_test(&self, point: Point, now: Duration) -> Option<usize> {
        self.markers
            .iter()
            .enumerate()
            .rev()
            .find(|(_, m)| {
                let p = m.position.value_at(now);
                p.is_finite() && p.distance(point) <= self.style.radius
            })
            .map(|(i, _)| i)
    }

    /// Circles then labels, as two groups. Markers at a non-finite position
    /// are left out.
    #[must_use]
    pub fn to_svg(&self, now: Duration) -> Vec<SvgElement> {
        let mut circles = Vec::with_capacity(self.markers.len());
        let mut labels = Vec::with_capacity(self.markers.len());

        for (i, marker) in self.markers.iter().enumerate() {
            let p = marker.position.value_at(now);
            if !p.is_finite() {
                continue;
            }
            circles.push(
                SvgElement::circle(p.x, p.y, self.style.radius, self.style.fill)
                    .with_id(format!("marker-{i}"))
                    .with_class("stateCircle")
                    .with_opacity(self.style.opacity),
            );
            labels.push(
                SvgElement::text(
                    p.x,
                    p.y,
                    &marker.label,
                    self.style.label_size,
                    self.style.label_color,
                    TextAnchor::Middle,
                )
                .with_dy("0.35em")
                .with_id(format!("marker-label-{i}"))
                .with_class("stateText"),
            );
        }

        vec![
            SvgElement::group(circles).with_class("markers"),
            SvgElement::group(labels).with_class("marker-labels"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::SvgEncoder;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn layer() -> MarkerLayer {
        MarkerLayer::new(
            ["AL", "OH"],
            &[Point::new(10.0, 10.0), Point::new(100.0, 50.0)],
            MarkerStyle::default(),
            ms(1000),
        )
    }

    #[test]
    fn test_new_is_settled() {
        let layer = layer();
        assert_eq!(layer.len(), 2);
        assert!(!layer.is_animating(Duration::ZERO));
        assert_eq!(layer.position_at(1, Duration::ZERO), Some(Point::new(100.0, 50.0)));
    }

    #[test]
    fn test_update_animates() {
        let mut layer = layer();
        layer.update(&[Point::new(20.0, 10.0), Point::new(100.0, 50.0)], ms(0));

        assert!(layer.is_animating(ms(500)));
        let mid = layer.position_at(0, ms(500)).unwrap();
        assert!(mid.x > 10.0 && mid.x < 20.0);
        assert_eq!(layer.position_at(0, ms(1000)), Some(Point::new(20.0, 10.0)));
        assert!(!layer.is_animating(ms(1000)));
    }

    #[test]
    fn test_update_to_same_positions_is_noop() {
        let mut layer = layer();
        let before = layer.positions_at(Duration::ZERO);
        layer.update(&before, ms(100));
        assert!(!layer.is_animating(ms(100)));
        assert_eq!(layer.positions_at(ms(100)), before);
    }

    #[test]
    fn test_hit_test() {
        let layer = layer();
        assert_eq!(layer.hit_test(Point::new(105.0, 52.0), Duration::ZERO), Some(1));
        assert_eq!(layer.hit_test(Point::new(50.0, 50.0), Duration::ZERO), None);
    }

    #[test]
    fn test_svg_skips_non_finite() {
        let layer = MarkerLayer::new(
            ["AL", "XX"],
            &[Point::new(10.0, 10.0), Point::new(f32::NAN, 5.0)],
            MarkerStyle::default(),
            ms(1000),
        );
        let mut encoder = SvgEncoder::new(100, 100).background(None);
        for el in layer.to_svg(Duration::ZERO) {
            encoder.add_element(el);
        }
        let svg = encoder.render();

        assert_eq!(svg.matches(r#"class="stateCircle""#).count(), 1);
        assert_eq!(svg.matches(r#"class="stateText""#).count(), 1);
        assert!(svg.contains(">AL</text>"));
        assert!(!svg.contains("XX"));
        assert!(svg.contains(r#"opacity="0.5""#));
        assert!(svg.contains(r#"text-anchor="middle""#));
    }

    #[test]
    fn test_style_from_config() {
        let config = Config::parse("marker:\n  color: \"#ff0000\"\n  radius: 6\n").unwrap();
        let style = MarkerStyle::from_config(&config).unwrap();
        assert_eq!(style.fill, Rgba::rgb(255, 0, 0));
        assert!((style.radius - 6.0).abs() < f32::EPSILON);
        assert!((style.opacity - 0.5).abs() < f32::EPSILON);

        let bad = Config::parse("marker:\n  color: blue\n").unwrap();
        assert!(MarkerStyle::from_config(&bad).is_err());
    }
}
