use std::fmt;

use super::model::{Gender, Record};

/// Initial age window before the user touches the sliders.
pub const DEFAULT_AGE_RANGE: (u32, u32) = (30, 70);

// ---------------------------------------------------------------------------
// Filter parameters
// ---------------------------------------------------------------------------

/// Inclusive age interval. `lo <= hi` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeRange {
    lo: u32,
    hi: u32,
}

impl AgeRange {
    /// Build a range from two bounds in either order.
    pub fn new(a: u32, b: u32) -> Self {
        AgeRange {
            lo: a.min(b),
            hi: a.max(b),
        }
    }

    pub fn lo(&self) -> u32 {
        self.lo
    }

    pub fn hi(&self) -> u32 {
        self.hi
    }

    pub fn contains(&self, age: u32) -> bool {
        self.lo <= age && age <= self.hi
    }

    /// Clamp both bounds into `span` (the dataset's observed min/max age).
    pub fn clamped_to(&self, span: (u32, u32)) -> Self {
        let (min, max) = span;
        AgeRange::new(self.lo.clamp(min, max), self.hi.clamp(min, max))
    }
}

impl Default for AgeRange {
    fn default() -> Self {
        AgeRange::new(DEFAULT_AGE_RANGE.0, DEFAULT_AGE_RANGE.1)
    }
}

/// Gender selector offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenderSelector {
    #[default]
    All,
    Male,
    Female,
}

impl GenderSelector {
    pub const ALL: [GenderSelector; 3] = [GenderSelector::All, GenderSelector::Male, GenderSelector::Female];

    /// The gender this selector pins, `None` for `All`.
    pub fn gender(self) -> Option<Gender> {
        match self {
            GenderSelector::All => None,
            GenderSelector::Male => Some(Gender::Male),
            GenderSelector::Female => Some(Gender::Female),
        }
    }
}

impl fmt::Display for GenderSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenderSelector::All => write!(f, "All"),
            GenderSelector::Male => write!(f, "Male"),
            GenderSelector::Female => write!(f, "Female"),
        }
    }
}

/// Per-request filter selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterParams {
    pub age_range: AgeRange,
    pub gender: GenderSelector,
}

impl FilterParams {
    pub fn matches(&self, record: &Record) -> bool {
        self.age_range.contains(record.age)
            && self.gender.gender().map_or(true, |g| record.gender == g)
    }
}

// ---------------------------------------------------------------------------
// filter
// ---------------------------------------------------------------------------

/// Indices of the records that pass the filter, in input order.
///
/// An empty result is valid; every view downstream degrades to empty or
/// zero output on it.
pub fn filtered_indices(records: &[Record], params: &FilterParams) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| params.matches(r))
        .map(|(i, _)| i)
        .collect()
}

/// Records that pass the filter, in input order.
pub fn filter<'a>(records: &'a [Record], params: &FilterParams) -> Vec<&'a Record> {
    filtered_indices(records, params)
        .into_iter()
        .map(|i| &records[i])
        .collect()
}
