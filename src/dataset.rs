//! State records and CSV loading.
//!
//! Numeric columns arrive as text and are coerced leniently: blank text is
//! `0`, anything that is not a number is `NaN`. Coercion never fails; a bad
//! cell becomes a marker that is silently not drawn.

use std::io::Read;
use std::path::Path;

use crate::error::{Error, Result};
use crate::field::Field;

/// One row of the data file.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// State name.
    pub state: String,
    /// Two-letter state code.
    pub abbr: String,
    metrics: [f32; 6],
}

impl Record {
    /// Create a record from its metric values, indexed like [`Field::ALL`].
    #[must_use]
    pub fn new(state: impl Into<String>, abbr: impl Into<String>, metrics: [f32; 6]) -> Self {
        Self {
            state: state.into(),
            abbr: abbr.into(),
            metrics,
        }
    }

    /// Value of a metric.
    #[must_use]
    pub fn value(&self, field: Field) -> f32 {
        self.metrics[field.index()]
    }
}

/// Column positions resolved from the header row, so extra columns and
/// column order do not matter.
struct ColumnIndex {
    state: usize,
    abbr: usize,
    metrics: [usize; 6],
}

impl ColumnIndex {
    fn resolve(headers: &csv::StringRecord) -> Result<Self> {
        let find = |column: &'static str| {
            headers
                .iter()
                .position(|h| h == column)
                .ok_or(Error::MissingColumn(column))
        };

        let mut metrics = [0; 6];
        for field in Field::ALL {
            metrics[field.index()] = find(field.column())?;
        }

        Ok(Self {
            state: find("state")?,
            abbr: find("abbr")?,
            metrics,
        })
    }

    fn record(&self, row: &csv::StringRecord) -> Record {
        let text = |i: usize| row.get(i).unwrap_or_default().to_string();
        let metrics = self.metrics.map(|i| coerce(row.get(i)));
        Record::new(text(self.state), text(self.abbr), metrics)
    }
}

/// Text-to-number coercion for metric cells.
///
/// Blank cells read as `0`. Decimal and exponent notation, unsigned
/// `0x`/`0o`/`0b` integers and a signed `Infinity` are accepted; anything
/// else, including `inf` or `nan` spellings, is `NaN`.
#[must_use]
pub fn coerce(text: Option<&str>) -> f32 {
    match text.map(str::trim) {
        None => f32::NAN,
        Some("") => 0.0,
        Some(t) => parse_number(t).unwrap_or(f32::NAN),
    }
}

fn parse_number(text: &str) -> Option<f32> {
    let radix = match text.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return u64::from_str_radix(&text[2..], radix).ok().map(|v| v as f32);
    }

    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    if unsigned == "Infinity" {
        let inf = if text.starts_with('-') { f32::NEG_INFINITY } else { f32::INFINITY };
        return Some(inf);
    }
    let numeric = |b: u8| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-');
    if !unsigned.bytes().all(numeric) {
        return None;
    }
    text.parse().ok()
}

/// Ordered, immutable collection of records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    /// Wrap already-parsed records.
    #[must_use]
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Parse CSV from any reader.
    ///
    /// # Errors
    ///
    /// Returns an error if the header lacks a required column or the CSV
    /// itself is malformed.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let columns = ColumnIndex::resolve(rdr.headers()?)?;

        let mut records = Vec::new();
        for row in rdr.records() {
            records.push(columns.record(&row?));
        }

        tracing::debug!(rows = records.len(), "parsed dataset");
        Ok(Self { records })
    }

    /// Parse CSV text.
    ///
    /// # Errors
    ///
    /// See [`Dataset::from_reader`].
    pub fn from_csv_str(text: &str) -> Result<Self> {
        Self::from_reader(text.as_bytes())
    }

    /// Load a CSV file from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let dataset = Self::from_reader(std::io::BufReader::new(file))?;
        tracing::info!(path = %path.display(), rows = dataset.len(), "loaded dataset");
        Ok(dataset)
    }

    /// All records in file order.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Iterate over records.
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record at an index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    /// Index of the record with the given state code (case-insensitive).
    #[must_use]
    pub fn position_by_abbr(&self, abbr: &str) -> Option<usize> {
        self.records
            .iter()
            .position(|r| r.abbr.eq_ignore_ascii_case(abbr.trim()))
    }

    /// Column of values for one field, in record order.
    #[must_use]
    pub fn values(&self, field: Field) -> Vec<f32> {
        self.records.iter().map(|r| r.value(field)).collect()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
id,state,abbr,poverty,povertyMoe,age,ageMoe,income,incomeMoe,healthcare,healthcareLow,healthcareHigh,obesity,obesityLow,obesityHigh,smokes,smokesLow,smokesHigh
1,Alabama,AL,19.3,0.5,38.6,0.2,42830,598,13.9,12.7,15.1,33.5,32.1,35,21.1,19.8,22.5
39,Ohio,OH,15.8,0.3,39.3,0.1,49429,216,9.6,8.9,10.3,29.8,28.7,30.9,21.6,20.6,22.7
";

    #[test]
    fn test_parse_with_extra_columns() {
        let ds = Dataset::from_csv_str(SAMPLE).unwrap();
        assert_eq!(ds.len(), 2);

        let al = ds.get(0).unwrap();
        assert_eq!(al.state, "Alabama");
        assert_eq!(al.abbr, "AL");
        assert!((al.value(Field::Poverty) - 19.3).abs() < 1e-4);
        assert!((al.value(Field::Income) - 42830.0).abs() < 1e-2);
        assert!((al.value(Field::Healthcare) - 13.9).abs() < 1e-4);
        assert!((al.value(Field::Smokes) - 21.1).abs() < 1e-4);
    }

    #[test]
    fn test_minimal_header() {
        let csv = "state,abbr,poverty,age,income,obesity,smokes,healthcare\n\
                   Ohio,OH,12,39,49000,30,21,20\n";
        let ds = Dataset::from_csv_str(csv).unwrap();
        let oh = ds.get(0).unwrap();
        assert!((oh.value(Field::Poverty) - 12.0).abs() < f32::EPSILON);
        assert!((oh.value(Field::Healthcare) - 20.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_malformed_number_becomes_nan() {
        let csv = "state,abbr,poverty,age,income,obesity,smokes,healthcare\n\
                   Ohio,OH,n/a,39,,30,21,20\n";
        let ds = Dataset::from_csv_str(csv).unwrap();
        let oh = ds.get(0).unwrap();
        assert!(oh.value(Field::Poverty).is_nan());
        assert!((oh.value(Field::Income) - 0.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_short_row_yields_nan() {
        let csv = "state,abbr,poverty,age,income,obesity,smokes,healthcare\n\
                   Ohio,OH,12,39\n";
        let ds = Dataset::from_csv_str(csv).unwrap();
        let oh = ds.get(0).unwrap();
        assert!((oh.value(Field::Age) - 39.0).abs() < f32::EPSILON);
        assert!(oh.value(Field::Healthcare).is_nan());
    }

    #[test]
    fn test_missing_column() {
        let csv = "state,abbr,poverty,age,income,obesity,smokes\nOhio,OH,1,2,3,4,5\n";
        let err = Dataset::from_csv_str(csv).unwrap_err();
        assert!(matches!(err, Error::MissingColumn("healthcare")));
    }

    #[test]
    fn test_coerce() {
        assert!((coerce(Some(" 12.5 ")) - 12.5).abs() < f32::EPSILON);
        assert!((coerce(Some("   ")) - 0.0).abs() < f32::EPSILON);
        assert!(coerce(Some("abc")).is_nan());
        assert!(coerce(None).is_nan());
    }

    #[test]
    fn test_coerce_special_spellings() {
        assert!(coerce(Some("inf")).is_nan());
        assert!(coerce(Some("infinity")).is_nan());
        assert!(coerce(Some("NaN")).is_nan());
        assert!(coerce(Some("-INF")).is_nan());
        assert_eq!(coerce(Some("Infinity")), f32::INFINITY);
        assert_eq!(coerce(Some("-Infinity")), f32::NEG_INFINITY);
        assert!((coerce(Some("1.5e3")) - 1500.0).abs() < f32::EPSILON);
        assert!((coerce(Some("+.5")) - 0.5).abs() < f32::EPSILON);
        assert!((coerce(Some("0x1A")) - 26.0).abs() < f32::EPSILON);
        assert!(coerce(Some("0x")).is_nan());
        assert!(coerce(Some("-0x1A")).is_nan());
    }

    #[test]
    fn test_values_and_lookup() {
        let ds = Dataset::from_csv_str(SAMPLE).unwrap();
        let poverty = ds.values(Field::Poverty);
        assert_eq!(poverty.len(), 2);
        assert_eq!(ds.position_by_abbr("oh"), Some(1));
        assert_eq!(ds.position_by_abbr("TX"), None);
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let ds = Dataset::from_path(file.path()).unwrap();
        assert_eq!(ds.len(), 2);
    }

    #[test]
    fn test_from_path_missing_file() {
        let result = Dataset::from_path("/nonexistent/healthRisk.csv");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
