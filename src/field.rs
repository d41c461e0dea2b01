//! Metric fields and per-axis selector types.
//!
//! Display text and column names live in one lookup table keyed by [`Field`],
//! so adding a metric means adding a row rather than another branch.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Chart axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal axis.
    X,
    /// Vertical axis.
    Y,
}

/// One of the six numeric metrics carried by every record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Population share in poverty (%).
    Poverty,
    /// Median age.
    Age,
    /// Median household income.
    Income,
    /// Share of obese adults (%).
    Obesity,
    /// Share of smokers (%).
    Smokes,
    /// Share lacking healthcare coverage (%).
    Healthcare,
}

struct FieldInfo {
    field: Field,
    column: &'static str,
    label: &'static str,
}

const FIELDS: [FieldInfo; 6] = [
    FieldInfo { field: Field::Poverty, column: "poverty", label: "Poverty (%)" },
    FieldInfo { field: Field::Age, column: "age", label: "Age (Median)" },
    FieldInfo { field: Field::Income, column: "income", label: "Household Income (Median)" },
    FieldInfo { field: Field::Obesity, column: "obesity", label: "Obese (%)" },
    FieldInfo { field: Field::Smokes, column: "smokes", label: "Smokes (%)" },
    FieldInfo { field: Field::Healthcare, column: "healthcare", label: "Lacks Healthcare (%)" },
];

impl Field {
    /// All fields, in data-file column order.
    pub const ALL: [Self; 6] = [
        Self::Poverty,
        Self::Age,
        Self::Income,
        Self::Obesity,
        Self::Smokes,
        Self::Healthcare,
    ];

    fn info(self) -> &'static FieldInfo {
        // FIELDS is ordered like the enum discriminants.
        &FIELDS[self as usize]
    }

    /// Column name in the data file.
    #[must_use]
    pub fn column(self) -> &'static str {
        self.info().column
    }

    /// Human-readable label used on axes and in tooltips.
    #[must_use]
    pub fn label(self) -> &'static str {
        self.info().label
    }

    /// Position of the field in [`Field::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for Field {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        FIELDS
            .iter()
            .find(|info| info.column.eq_ignore_ascii_case(key))
            .map(|info| info.field)
            .ok_or_else(|| Error::UnknownLabel(s.to_string()))
    }
}

/// Fields selectable on the x axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum XField {
    /// Poverty (%).
    #[default]
    Poverty,
    /// Age (Median).
    Age,
    /// Household Income (Median).
    Income,
}

impl XField {
    /// All x selections in label order.
    pub const ALL: [Self; 3] = [Self::Poverty, Self::Age, Self::Income];

    /// The underlying metric.
    #[must_use]
    pub const fn field(self) -> Field {
        match self {
            Self::Poverty => Field::Poverty,
            Self::Age => Field::Age,
            Self::Income => Field::Income,
        }
    }
}

/// Fields selectable on the y axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum YField {
    /// Lacks Healthcare (%).
    #[default]
    Healthcare,
    /// Smokes (%).
    Smokes,
    /// Obese (%).
    Obesity,
}

impl YField {
    /// All y selections in label order.
    pub const ALL: [Self; 3] = [Self::Healthcare, Self::Smokes, Self::Obesity];

    /// The underlying metric.
    #[must_use]
    pub const fn field(self) -> Field {
        match self {
            Self::Healthcare => Field::Healthcare,
            Self::Smokes => Field::Smokes,
            Self::Obesity => Field::Obesity,
        }
    }
}

impl From<XField> for Field {
    fn from(x: XField) -> Self {
        x.field()
    }
}

impl From<YField> for Field {
    fn from(y: YField) -> Self {
        y.field()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_order_matches_enum() {
        for (i, field) in Field::ALL.iter().enumerate() {
            assert_eq!(FIELDS[i].field, *field);
            assert_eq!(field.index(), i);
        }
    }

    #[test]
    fn test_labels() {
        assert_eq!(Field::Poverty.label(), "Poverty (%)");
        assert_eq!(Field::Income.label(), "Household Income (Median)");
        assert_eq!(Field::Healthcare.label(), "Lacks Healthcare (%)");
        assert_eq!(Field::Obesity.label(), "Obese (%)");
    }

    #[test]
    fn test_from_str() {
        assert_eq!("smokes".parse::<Field>().unwrap(), Field::Smokes);
        assert_eq!(" Age ".parse::<Field>().unwrap(), Field::Age);
        assert!("bmi".parse::<Field>().is_err());
    }

    #[test]
    fn test_axis_selectors() {
        assert_eq!(XField::default().field(), Field::Poverty);
        assert_eq!(YField::default().field(), Field::Healthcare);
        assert_eq!(Field::from(XField::Income), Field::Income);
        assert_eq!(Field::from(YField::Smokes), Field::Smokes);
    }
}
