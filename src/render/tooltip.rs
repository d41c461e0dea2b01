//! Hover tooltip for markers and marker labels.
//!
//! The tooltip is bound to a [`ViewState`]. Rebinding replaces the previous
//! binding outright and re-derives a visible tooltip's text, so repeated
//! label clicks never stack handlers or leave stale metric names behind.

use crate::color::Rgba;
use crate::dataset::{Dataset, Record};
use crate::field::Axis;
use crate::geometry::Point;
use crate::output::{SvgElement, TextAnchor};
use crate::state::ViewState;

const FONT_SIZE: f32 = 12.0;
const LINE_HEIGHT: f32 = 16.0;
const PADDING: f32 = 6.0;
// Rough advance of a sans-serif glyph relative to the font size.
const GLYPH_WIDTH: f32 = 0.6;

/// Text shown for one record.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipContent {
    /// State name.
    pub title: String,
    /// One line per axis: label, space, value.
    pub lines: Vec<String>,
}

impl TooltipContent {
    /// Content for `record` under the active fields of `state`.
    #[must_use]
    pub fn for_record(record: &Record, state: &ViewState) -> Self {
        let lines = [Axis::X, Axis::Y]
            .into_iter()
            .map(|axis| {
                let field = state.field(axis);
                format!("{} {}", field.label(), record.value(field))
            })
            .collect();

        Self {
            title: record.state.clone(),
            lines,
        }
    }

    /// Title and lines joined with `" / "`.
    #[must_use]
    pub fn to_plain(&self) -> String {
        std::iter::once(self.title.as_str())
            .chain(self.lines.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" / ")
    }

    /// HTML body for a browser tooltip.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut html = format!("<strong>{}</strong>", escape_html(&self.title));
        for line in &self.lines {
            html.push_str("<br>");
            html.push_str(&escape_html(line));
        }
        html
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Element that can be hovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverTarget {
    /// Circle of the record at this index.
    Marker(usize),
    /// State-code label of the record at this index.
    Label(usize),
}

impl HoverTarget {
    /// Record index behind the target.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Marker(i) | Self::Label(i) => i,
        }
    }

    /// Element id in the rendered document.
    #[must_use]
    pub fn element_id(self) -> String {
        match self {
            Self::Marker(i) => format!("marker-{i}"),
            Self::Label(i) => format!("marker-label-{i}"),
        }
    }

    /// Resolve a target from a rendered element id.
    #[must_use]
    pub fn from_element_id(id: &str) -> Option<Self> {
        if let Some(rest) = id.strip_prefix("marker-label-") {
            return rest.parse().ok().map(Self::Label);
        }
        id.strip_prefix("marker-")
            .and_then(|rest| rest.parse().ok())
            .map(Self::Marker)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Visible {
    index: usize,
    anchor: Point,
    content: TooltipContent,
}

/// Tooltip manager: one binding, at most one visible tooltip.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    binding: ViewState,
    offset: [f32; 2],
    visible: Option<Visible>,
}

impl Tooltip {
    /// Create a hidden tooltip bound to `state`. `offset` is `[top, left]`.
    #[must_use]
    pub fn new(state: ViewState, offset: [f32; 2]) -> Self {
        Self {
            binding: state,
            offset,
            visible: None,
        }
    }

    /// View state the tooltip currently reads.
    #[must_use]
    pub fn binding(&self) -> ViewState {
        self.binding
    }

    /// Replace the binding. A visible tooltip is re-derived from the new
    /// state.
    pub fn bind(&mut self, state: ViewState, dataset: &Dataset) {
        self.binding = state;
        self.visible = self.visible.take().and_then(|mut visible| {
            let record = dataset.get(visible.index)?;
            visible.content = TooltipContent::for_record(record, &state);
            Some(visible)
        });
    }

    /// Show the tooltip for record `index` anchored at `anchor`. Returns
    /// `None` and hides the tooltip when the index is out of range.
    pub fn show(
        &mut self,
        dataset: &Dataset,
        index: usize,
        anchor: Point,
    ) -> Option<&TooltipContent> {
        let Some(record) = dataset.get(index) else {
            self.visible = None;
            return None;
        };
        let content = TooltipContent::for_record(record, &self.binding);
        self.visible = Some(Visible { index, anchor, content });
        self.visible.as_ref().map(|v| &v.content)
    }

    /// Hide the tooltip.
    pub fn hide(&mut self) {
        self.visible = None;
    }

    /// Whether the tooltip is showing.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible.is_some()
    }

    /// Content of the visible tooltip.
    #[must_use]
    pub fn content(&self) -> Option<&TooltipContent> {
        self.visible.as_ref().map(|v| &v.content)
    }

    /// Record index of the visible tooltip.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        self.visible.as_ref().map(|v| v.index)
    }

    /// Top-left corner of the visible tooltip.
    #[must_use]
    pub fn position(&self) -> Option<Point> {
        self.visible
            .as_ref()
            .map(|v| v.anchor.offset(self.offset[1], self.offset[0]))
    }

    /// Tooltip box as SVG, if visible.
    #[must_use]
    pub fn to_svg(&self) -> Option<SvgElement> {
        let visible = self.visible.as_ref()?;
        let origin = self.position()?;
        let content = &visible.content;

        let longest = std::iter::once(&content.title)
            .chain(&content.lines)
            .map(|s| s.chars().count())
            .max()
            .unwrap_or(0);
        let width = longest as f32 * FONT_SIZE * GLYPH_WIDTH + 2.0 * PADDING;
        let height = (content.lines.len() + 1) as f32 * LINE_HEIGHT + 2.0 * PADDING;

        let background = Rgba::BLACK.with_alpha(204);
        let mut children = vec![SvgElement::rect(0.0, 0.0, width, height, background)];
        let mut y = PADDING + FONT_SIZE;
        for text in std::iter::once(&content.title).chain(&content.lines) {
            children.push(SvgElement::text(
                PADDING,
                y,
                text,
                FONT_SIZE,
                Rgba::WHITE,
                TextAnchor::Start,
            ));
            y += LINE_HEIGHT;
        }

        Some(
            SvgElement::group(children)
                .with_class("tooltip d3-tip")
                .with_transform(format!("translate({}, {})", origin.x, origin.y)),
        )
    }
}
