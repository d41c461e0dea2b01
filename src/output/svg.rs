//! SVG output encoder.
//!
//! Builds a vector document from a flat list of elements and nested groups.
//! Every element can carry `id`, `class`, `opacity` and `transform`
//! attributes, which is what the chart's interaction layer keys on.

use crate::color::Rgba;
use crate::error::Result;
use std::fmt::Write as FmtWrite;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// SVG encoder for vector output.
#[derive(Debug, Clone)]
pub struct SvgEncoder {
    /// SVG width
    width: u32,
    /// SVG height
    height: u32,
    /// Background color (None for transparent)
    background: Option<Rgba>,
    /// SVG elements
    elements: Vec<SvgElement>,
}

/// Presentation attributes shared by every element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attrs {
    /// Element id.
    pub id: Option<String>,
    /// Space separated class list.
    pub class: Option<String>,
    /// Opacity in `[0, 1]`.
    pub opacity: Option<f32>,
    /// SVG transform list.
    pub transform: Option<String>,
}

/// An SVG element.
///
/// Field names are self-documenting and match SVG attribute names.
#[derive(Debug, Clone)]
#[allow(missing_docs)]
pub enum SvgElement {
    /// Rectangle
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Rgba,
        attrs: Attrs,
    },
    /// Circle
    Circle {
        cx: f32,
        cy: f32,
        r: f32,
        fill: Rgba,
        attrs: Attrs,
    },
    /// Line
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        stroke: Rgba,
        stroke_width: f32,
        attrs: Attrs,
    },
    /// Path (SVG path data)
    Path {
        d: String,
        fill: Option<Rgba>,
        stroke: Option<Rgba>,
        stroke_width: f32,
        attrs: Attrs,
    },
    /// Text
    Text {
        x: f32,
        y: f32,
        text: String,
        font_size: f32,
        fill: Rgba,
        anchor: TextAnchor,
        dy: Option<&'static str>,
        attrs: Attrs,
    },
    /// Group of child elements
    Group {
        children: Vec<SvgElement>,
        attrs: Attrs,
    },
}

/// Text anchor position for SVG text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum TextAnchor {
    /// Align text start at position (left-aligned for LTR)
    #[default]
    Start,
    /// Center text at position
    Middle,
    /// Align text end at position (right-aligned for LTR)
    End,
}

impl TextAnchor {
    fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

impl SvgElement {
    /// A filled circle.
    #[must_use]
    pub fn circle(cx: f32, cy: f32, r: f32, fill: Rgba) -> Self {
        Self::Circle {
            cx,
            cy,
            r,
            fill,
            attrs: Attrs::default(),
        }
    }

    /// A filled rectangle.
    #[must_use]
    pub fn rect(x: f32, y: f32, width: f32, height: f32, fill: Rgba) -> Self {
        Self::Rect {
            x,
            y,
            width,
            height,
            fill,
            attrs: Attrs::default(),
        }
    }

    /// A straight line.
    #[must_use]
    pub fn line(x1: f32, y1: f32, x2: f32, y2: f32, stroke: Rgba, stroke_width: f32) -> Self {
        Self::Line {
            x1,
            y1,
            x2,
            y2,
            stroke,
            stroke_width,
            attrs: Attrs::default(),
        }
    }

    /// A path with optional fill and stroke.
    #[must_use]
    pub fn path(d: &str, fill: Option<Rgba>, stroke: Option<Rgba>, stroke_width: f32) -> Self {
        Self::Path {
            d: d.to_string(),
            fill,
            stroke,
            stroke_width,
            attrs: Attrs::default(),
        }
    }

    /// Anchored text.
    #[must_use]
    pub fn text(
        x: f32,
        y: f32,
        text: &str,
        font_size: f32,
        fill: Rgba,
        anchor: TextAnchor,
    ) -> Self {
        Self::Text {
            x,
            y,
            text: text.to_string(),
            font_size,
            fill,
            anchor,
            dy: None,
            attrs: Attrs::default(),
        }
    }

    /// A group of children.
    #[must_use]
    pub fn group(children: Vec<SvgElement>) -> Self {
        Self::Group {
            children,
            attrs: Attrs::default(),
        }
    }

    /// Set a text baseline shift (`dy`); other elements are unchanged.
    #[must_use]
    pub fn with_dy(mut self, value: &'static str) -> Self {
        if let Self::Text { dy, .. } = &mut self {
            *dy = Some(value);
        }
        self
    }

    fn attrs_mut(&mut self) -> &mut Attrs {
        match self {
            Self::Rect { attrs, .. }
            | Self::Circle { attrs, .. }
            | Self::Line { attrs, .. }
            | Self::Path { attrs, .. }
            | Self::Text { attrs, .. }
            | Self::Group { attrs, .. } => attrs,
        }
    }

    /// Set the element id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.attrs_mut().id = Some(id.into());
        self
    }

    /// Set the class list.
    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.attrs_mut().class = Some(class.into());
        self
    }

    /// Set the opacity.
    #[must_use]
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.attrs_mut().opacity = Some(opacity);
        self
    }

    /// Set the transform list.
    #[must_use]
    pub fn with_transform(mut self, transform: impl Into<String>) -> Self {
        self.attrs_mut().transform = Some(transform.into());
        self
    }
}

impl Default for SvgEncoder {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

impl SvgEncoder {
    /// Create a new SVG encoder with given dimensions.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            background: Some(Rgba::WHITE),
            elements: Vec::new(),
        }
    }

    /// Set background color (None for transparent).
    #[must_use]
    pub fn background(mut self, color: Option<Rgba>) -> Self {
        self.background = color;
        self
    }

    /// Add a raw element.
    pub fn add_element(&mut self, element: SvgElement) {
        self.elements.push(element);
    }

    /// Number of top-level elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether no element has been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Render to SVG string.
    #[must_use]
    pub fn render(&self) -> String {
        let mut svg = String::with_capacity(4096);

        // SVG header
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
            self.width, self.height, self.width, self.height
        );

        // Background
        if let Some(bg) = self.background {
            let _ = writeln!(
                svg,
                r#"  <rect width="100%" height="100%" fill="{}"/>"#,
                bg.to_css()
            );
        }

        // Elements
        for element in &self.elements {
            write_element(&mut svg, element, 1);
        }

        // Close SVG
        svg.push_str("</svg>\n");
        svg
    }

    /// Write to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if file writing fails.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(self.render().as_bytes())?;
        Ok(())
    }
}

/// Escape XML special characters in text and attribute values.
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn attrs_to_svg(attrs: &Attrs) -> String {
    let mut out = String::new();
    if let Some(id) = &attrs.id {
        let _ = write!(out, r#" id="{}""#, escape(id));
    }
    if let Some(class) = &attrs.class {
        let _ = write!(out, r#" class="{}""#, escape(class));
    }
    if let Some(opacity) = attrs.opacity {
        let _ = write!(out, r#" opacity="{opacity}""#);
    }
    if let Some(transform) = &attrs.transform {
        let _ = write!(out, r#" transform="{}""#, escape(transform));
    }
    out
}

fn stroke_to_svg(stroke: Option<Rgba>, stroke_width: f32) -> String {
    stroke
        .map(|s| format!(r#" stroke="{}" stroke-width="{stroke_width}""#, s.to_css()))
        .unwrap_or_default()
}

/// Append an element (and any children) at the given indent depth.
fn write_element(svg: &mut String, element: &SvgElement, depth: usize) {
    let indent = "  ".repeat(depth);
    match element {
        SvgElement::Rect {
            x,
            y,
            width,
            height,
            fill,
            attrs,
        } => {
            let _ = writeln!(
                svg,
                r#"{indent}<rect x="{x}" y="{y}" width="{width}" height="{height}" fill="{}"{}/>"#,
                fill.to_css(),
                attrs_to_svg(attrs)
            );
        }
        SvgElement::Circle {
            cx,
            cy,
            r,
            fill,
            attrs,
        } => {
            let _ = writeln!(
                svg,
                r#"{indent}<circle cx="{cx}" cy="{cy}" r="{r}" fill="{}"{}/>"#,
                fill.to_css(),
                attrs_to_svg(attrs)
            );
        }
        SvgElement::Line {
            x1,
            y1,
            x2,
            y2,
            stroke,
            stroke_width,
            attrs,
        } => {
            let _ = writeln!(
                svg,
                r#"{indent}<line x1="{x1}" y1="{y1}" x2="{x2}" y2="{y2}" stroke="{}" stroke-width="{stroke_width}"{}/>"#,
                stroke.to_css(),
                attrs_to_svg(attrs)
            );
        }
        SvgElement::Path {
            d,
            fill,
            stroke,
            stroke_width,
            attrs,
        } => {
            let fill_attr = fill.map_or_else(|| "none".to_string(), |f| f.to_css());
            let _ = writeln!(
                svg,
                r#"{indent}<path d="{d}" fill="{fill_attr}"{}{}/>"#,
                stroke_to_svg(*stroke, *stroke_width),
                attrs_to_svg(attrs)
            );
        }
        SvgElement::Text {
            x,
            y,
            text,
            font_size,
            fill,
            anchor,
            dy,
            attrs,
        } => {
            let dy_attr = dy.map(|d| format!(r#" dy="{d}""#)).unwrap_or_default();
            let _ = writeln!(
                svg,
                r#"{indent}<text x="{x}" y="{y}"{dy_attr} font-size="{font_size}" fill="{}" text-anchor="{}" font-family="sans-serif"{}>{}</text>"#,
                fill.to_css(),
                anchor.as_str(),
                attrs_to_svg(attrs),
                escape(text)
            );
        }
        SvgElement::Group { children, attrs } => {
            let _ = writeln!(svg, "{indent}<g{}>", attrs_to_svg(attrs));
            for child in children {
                write_element(svg, child, depth + 1);
            }
            let _ = writeln!(svg, "{indent}</g>");
        }
    }
}
