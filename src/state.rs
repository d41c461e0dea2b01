//! View state and the six clickable axis labels.
//!
//! [`ViewState`] is the only mutable input to rendering. Labels are a static
//! enum mapped to their axis and field through [`AxisLabel::selection`], so
//! nothing downstream reads a field name back out of a string attribute.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::field::{Axis, Field, XField, YField};

/// One axis selection, typed by axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Selection {
    /// Select an x field.
    X(XField),
    /// Select a y field.
    Y(YField),
}

impl Selection {
    /// Axis the selection applies to.
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Self::X(_) => Axis::X,
            Self::Y(_) => Axis::Y,
        }
    }

    /// Selected metric.
    #[must_use]
    pub const fn field(self) -> Field {
        match self {
            Self::X(x) => x.field(),
            Self::Y(y) => y.field(),
        }
    }
}

/// Currently selected x and y fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ViewState {
    /// Active x field.
    pub x: XField,
    /// Active y field.
    pub y: YField,
}

impl ViewState {
    /// Default selection: poverty against healthcare.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Active field on an axis.
    #[must_use]
    pub const fn field(&self, axis: Axis) -> Field {
        match axis {
            Axis::X => self.x.field(),
            Axis::Y => self.y.field(),
        }
    }

    /// Active selection on an axis.
    #[must_use]
    pub const fn selection(&self, axis: Axis) -> Selection {
        match axis {
            Axis::X => Selection::X(self.x),
            Axis::Y => Selection::Y(self.y),
        }
    }

    /// Whether a selection is already active.
    #[must_use]
    pub fn is_active(&self, selection: Selection) -> bool {
        match selection {
            Selection::X(x) => self.x == x,
            Selection::Y(y) => self.y == y,
        }
    }

    /// Apply a selection. Returns the changed axis, or `None` when the
    /// selection was already active.
    pub fn apply(&mut self, selection: Selection) -> Option<Axis> {
        if self.is_active(selection) {
            return None;
        }
        match selection {
            Selection::X(x) => self.x = x,
            Selection::Y(y) => self.y = y,
        }
        Some(selection.axis())
    }
}

/// Styling class of an axis label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelClass {
    /// Label of the selected field.
    Active,
    /// Any other label.
    Inactive,
}

impl LabelClass {
    /// CSS class name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

/// The six clickable axis labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisLabel {
    /// "Poverty (%)" under the x axis.
    Poverty,
    /// "Age (Median)" under the x axis.
    Age,
    /// "Household Income (Median)" under the x axis.
    Income,
    /// "Lacks Healthcare (%)" beside the y axis.
    Healthcare,
    /// "Smokes (%)" beside the y axis.
    Smokes,
    /// "Obese (%)" beside the y axis.
    Obesity,
}

struct LabelInfo {
    selection: Selection,
    element_id: &'static str,
    offset: f32,
}

// Same order as the enum. Offsets are the label's `y` inside its group.
const LABELS: [LabelInfo; 6] = [
    LabelInfo {
        selection: Selection::X(XField::Poverty),
        element_id: "label-poverty",
        offset: 20.0,
    },
    LabelInfo {
        selection: Selection::X(XField::Age),
        element_id: "label-age",
        offset: 40.0,
    },
    LabelInfo {
        selection: Selection::X(XField::Income),
        element_id: "label-income",
        offset: 60.0,
    },
    LabelInfo {
        selection: Selection::Y(YField::Healthcare),
        element_id: "label-healthcare",
        offset: -30.0,
    },
    LabelInfo {
        selection: Selection::Y(YField::Smokes),
        element_id: "label-smokes",
        offset: -50.0,
    },
    LabelInfo {
        selection: Selection::Y(YField::Obesity),
        element_id: "label-obesity",
        offset: -70.0,
    },
];

impl AxisLabel {
    /// All labels, x labels first.
    pub const ALL: [Self; 6] = [
        Self::Poverty,
        Self::Age,
        Self::Income,
        Self::Healthcare,
        Self::Smokes,
        Self::Obesity,
    ];

    fn info(self) -> &'static LabelInfo {
        &LABELS[self as usize]
    }

    /// Labels belonging to one axis, in drawing order.
    pub fn for_axis(axis: Axis) -> impl Iterator<Item = Self> {
        Self::ALL.into_iter().filter(move |l| l.axis() == axis)
    }

    /// Selection made by clicking this label.
    #[must_use]
    pub fn selection(self) -> Selection {
        self.info().selection
    }

    /// Axis this label switches.
    #[must_use]
    pub fn axis(self) -> Axis {
        self.selection().axis()
    }

    /// Field this label selects.
    #[must_use]
    pub fn field(self) -> Field {
        self.selection().field()
    }

    /// Display text.
    #[must_use]
    pub fn text(self) -> &'static str {
        self.field().label()
    }

    /// Element id used in the rendered document.
    #[must_use]
    pub fn element_id(self) -> &'static str {
        self.info().element_id
    }

    /// Offset of the label inside its axis label group.
    #[must_use]
    pub fn offset(self) -> f32 {
        self.info().offset
    }

    /// Resolve a label from a rendered element id.
    #[must_use]
    pub fn from_element_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.element_id() == id)
    }

    /// Styling class under a view state.
    #[must_use]
    pub fn class(self, state: &ViewState) -> LabelClass {
        if state.is_active(self.selection()) {
            LabelClass::Active
        } else {
            LabelClass::Inactive
        }
    }
}

impl From<Selection> for AxisLabel {
    fn from(selection: Selection) -> Self {
        match selection {
            Selection::X(XField::Poverty) => Self::Poverty,
            Selection::X(XField::Age) => Self::Age,
            Selection::X(XField::Income) => Self::Income,
            Selection::Y(YField::Healthcare) => Self::Healthcare,
            Selection::Y(YField::Smokes) => Self::Smokes,
            Selection::Y(YField::Obesity) => Self::Obesity,
        }
    }
}

impl fmt::Display for AxisLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field().column())
    }
}

impl FromStr for AxisLabel {
    type Err = Error;

    /// Parse a label from its field name (`poverty`, `smokes`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let field: Field = s.parse()?;
        Self::ALL
            .into_iter()
            .find(|l| l.field() == field)
            .ok_or_else(|| Error::UnknownLabel(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state() {
        let state = ViewState::new();
        assert_eq!(state.field(Axis::X), Field::Poverty);
        assert_eq!(state.field(Axis::Y), Field::Healthcare);
    }

    #[test]
    fn test_apply_active_is_noop() {
        let mut state = ViewState::new();
        assert_eq!(state.apply(Selection::X(XField::Poverty)), None);
        assert_eq!(state, ViewState::new());
    }

    #[test]
    fn test_apply_changes_one_axis() {
        let mut state = ViewState::new();
        assert_eq!(state.apply(Selection::Y(YField::Smokes)), Some(Axis::Y));
        assert_eq!(state.x, XField::Poverty);
        assert_eq!(state.y, YField::Smokes);
    }

    #[test]
    fn test_label_table_order() {
        for (i, label) in AxisLabel::ALL.iter().enumerate() {
            assert_eq!(*label as usize, i);
            assert_eq!(label.element_id(), format!("label-{}", label.field().column()));
        }
    }

    #[test]
    fn test_labels_per_axis() {
        let x: Vec<_> = AxisLabel::for_axis(Axis::X).collect();
        assert_eq!(x, vec![AxisLabel::Poverty, AxisLabel::Age, AxisLabel::Income]);
        let y: Vec<_> = AxisLabel::for_axis(Axis::Y).collect();
        assert_eq!(y, vec![AxisLabel::Healthcare, AxisLabel::Smokes, AxisLabel::Obesity]);
    }

    #[test]
    fn test_exactly_one_active_per_axis() {
        let mut state = ViewState::new();
        state.apply(AxisLabel::Income.selection());
        state.apply(AxisLabel::Obesity.selection());

        for axis in [Axis::X, Axis::Y] {
            let active = AxisLabel::for_axis(axis)
                .filter(|l| l.class(&state) == LabelClass::Active)
                .count();
            assert_eq!(active, 1);
        }
        assert_eq!(AxisLabel::Income.class(&state), LabelClass::Active);
        assert_eq!(AxisLabel::Poverty.class(&state), LabelClass::Inactive);
    }

    #[test]
    fn test_parse_and_element_id() {
        assert_eq!("age".parse::<AxisLabel>().unwrap(), AxisLabel::Age);
        assert!("state".parse::<AxisLabel>().is_err());
        assert_eq!(AxisLabel::from_element_id("label-smokes"), Some(AxisLabel::Smokes));
        assert_eq!(AxisLabel::from_element_id("label-bmi"), None);
    }

    #[test]
    fn test_selection_maps_back_to_label() {
        for label in AxisLabel::ALL {
            assert_eq!(AxisLabel::from(label.selection()), label);
        }
        let state = ViewState::new();
        assert_eq!(AxisLabel::from(state.selection(Axis::Y)), AxisLabel::Healthcare);
    }

    #[test]
    fn test_label_text() {
        assert_eq!(AxisLabel::Healthcare.text(), "Lacks Healthcare (%)");
        assert_eq!(AxisLabel::Poverty.offset(), 20.0);
        assert_eq!(AxisLabel::Obesity.offset(), -70.0);
    }
}
