use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single loosely-typed cell from the source file
// ---------------------------------------------------------------------------

/// A dynamically-typed cell as read from CSV / JSON / Parquet, before the
/// record normaliser decides what it means.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Interpret the value as an `f64`, accepting numeric text.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Categorical codes
// ---------------------------------------------------------------------------

/// Patient gender, stored as the binary code used by the cleaned dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gender {
    Female = 0,
    Male = 1,
}

impl Gender {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Gender::Female),
            1 => Some(Gender::Male),
            _ => None,
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Female" => Some(Gender::Female),
            "Male" => Some(Gender::Male),
            _ => None,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Female => write!(f, "Female"),
            Gender::Male => write!(f, "Male"),
        }
    }
}

/// Diagnostic outcome: `Normal` → 0, `Abnormal` → 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Diagnosis {
    Normal = 0,
    Abnormal = 1,
}

impl Diagnosis {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Diagnosis::Normal),
            1 => Some(Diagnosis::Abnormal),
            _ => None,
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Normal" => Some(Diagnosis::Normal),
            "Abnormal" => Some(Diagnosis::Abnormal),
            _ => None,
        }
    }

    pub fn is_abnormal(self) -> bool {
        self == Diagnosis::Abnormal
    }
}

impl fmt::Display for Diagnosis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnosis::Normal => write!(f, "Normal"),
            Diagnosis::Abnormal => write!(f, "Abnormal"),
        }
    }
}

// ---------------------------------------------------------------------------
// Field – numeric columns the pipeline aggregates over
// ---------------------------------------------------------------------------

/// Numeric record fields addressable by views and the table sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Age,
    HeartRate,
    CkMb,
    Troponin,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Age, Field::HeartRate, Field::CkMb, Field::Troponin];

    /// Column header as it appears in the source dataset.
    pub fn name(self) -> &'static str {
        match self {
            Field::Age => "Age",
            Field::HeartRate => "Heart rate",
            Field::CkMb => "CK-MB",
            Field::Troponin => "Troponin",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Cardiac marker plotted against age in the scatter view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Marker {
    #[default]
    CkMb,
    Troponin,
}

impl Marker {
    pub const ALL: [Marker; 2] = [Marker::CkMb, Marker::Troponin];

    pub fn field(self) -> Field {
        match self {
            Marker::CkMb => Field::CkMb,
            Marker::Troponin => Field::Troponin,
        }
    }
}

/// Metric averaged per age bin in the trend view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrendMetric {
    #[default]
    HeartRate,
    CkMb,
    Troponin,
}

impl TrendMetric {
    pub const ALL: [TrendMetric; 3] = [TrendMetric::HeartRate, TrendMetric::CkMb, TrendMetric::Troponin];

    pub fn field(self) -> Field {
        match self {
            TrendMetric::HeartRate => Field::HeartRate,
            TrendMetric::CkMb => Field::CkMb,
            TrendMetric::Troponin => Field::Troponin,
        }
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the cleaned dataset
// ---------------------------------------------------------------------------

/// One patient observation.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub age: u32,
    pub gender: Gender,
    pub heart_rate: f64,
    pub ck_mb: f64,
    pub troponin: f64,
    pub result: Diagnosis,
    /// Columns outside the required set (blood pressure, blood sugar, ...),
    /// carried through for the table.
    pub extra: BTreeMap<String, CellValue>,
}

impl Record {
    pub fn value(&self, field: Field) -> f64 {
        match field {
            Field::Age => self.age as f64,
            Field::HeartRate => self.heart_rate,
            Field::CkMb => self.ck_mb,
            Field::Troponin => self.troponin,
        }
    }
}

// ---------------------------------------------------------------------------
// RecordStore – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The normalised dataset. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<Record>,
    /// Names of the `extra` columns, in source order.
    extra_columns: Vec<String>,
    /// Observed (min, max) age, `None` when there are no records.
    age_span: Option<(u32, u32)>,
}

impl RecordStore {
    /// Build the store and its age span from normalised records.
    pub fn from_records(records: Vec<Record>, extra_columns: Vec<String>) -> Self {
        let age_span = records.iter().fold(None, |span, r| match span {
            None => Some((r.age, r.age)),
            Some((lo, hi)) => Some((lo.min(r.age), hi.max(r.age))),
        });
        RecordStore {
            records,
            extra_columns,
            age_span,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn extra_columns(&self) -> &[String] {
        &self.extra_columns
    }

    pub fn age_span(&self) -> Option<(u32, u32)> {
        self.age_span
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_store_age_span() {
        let store = RecordStore::from_records(cohort(), Vec::new());
        assert_eq!(store.len(), 8);
        assert_eq!(store.age_span(), Some((25, 85)));
    }

    #[test]
    fn test_empty_store_has_no_span() {
        let store = RecordStore::from_records(Vec::new(), Vec::new());
        assert!(store.is_empty());
        assert_eq!(store.age_span(), None);
    }

    #[test]
    fn test_category_codes() {
        assert_eq!(Gender::Male.code(), 1);
        assert_eq!(Gender::from_code(0), Some(Gender::Female));
        assert_eq!(Gender::from_code(2), None);
        assert_eq!(Diagnosis::from_label("Abnormal"), Some(Diagnosis::Abnormal));
        assert_eq!(Diagnosis::from_label("abnormal"), None);
        assert_eq!(Diagnosis::Normal.code(), 0);
    }

    #[test]
    fn test_cell_as_f64() {
        assert_eq!(CellValue::Integer(4).as_f64(), Some(4.0));
        assert_eq!(CellValue::String(" 2.5 ".into()).as_f64(), Some(2.5));
        assert_eq!(CellValue::String("n/a".into()).as_f64(), None);
        assert_eq!(CellValue::Null.as_f64(), None);
    }

    #[test]
    fn test_record_value_by_field() {
        let r = record(50, Gender::Male, 80.0, 3.5, 0.02, Diagnosis::Normal);
        assert_eq!(r.value(Field::Age), 50.0);
        assert_eq!(r.value(Field::HeartRate), 80.0);
        assert_eq!(r.value(Field::CkMb), 3.5);
        assert_eq!(r.value(Field::Troponin), 0.02);
    }
}
