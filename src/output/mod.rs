//! Output encoders.

mod svg;

pub use svg::{Attrs, SvgElement, SvgEncoder, TextAnchor};
