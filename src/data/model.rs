use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Outcome – the `class` column
// ---------------------------------------------------------------------------

/// Binary launch result as stored in the `class` column (0 = failure, 1 = success).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "u8")]
pub enum Outcome {
    Failure,
    Success,
}

impl Outcome {
    /// Interpret a raw `class` value. Anything other than exactly 0 or 1
    /// (including 0.5 or 1.7 from float columns) is rejected.
    pub fn from_class(value: f64) -> Option<Self> {
        if value == 0.0 {
            Some(Outcome::Failure)
        } else if value == 1.0 {
            Some(Outcome::Success)
        } else {
            None
        }
    }

    pub fn as_class(self) -> u8 {
        match self {
            Outcome::Failure => 0,
            Outcome::Success => 1,
        }
    }

    pub fn is_success(self) -> bool {
        self == Outcome::Success
    }
}

impl From<Outcome> for u8 {
    fn from(outcome: Outcome) -> Self {
        outcome.as_class()
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_class())
    }
}

// ---------------------------------------------------------------------------
// LaunchRecord – one row of the source table
// ---------------------------------------------------------------------------

/// A single launch (one row of the source table).
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchRecord {
    pub site: String,
    pub payload_mass_kg: f64,
    pub booster_version: String,
    pub booster_version_category: String,
    pub outcome: Outcome,
}

// ---------------------------------------------------------------------------
// Selector values owned by the UI
// ---------------------------------------------------------------------------

/// The sentinel label used for "every site" in the site control.
pub const ALL_SITES: &str = "ALL";

/// Which site(s) the charts are restricted to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(into = "String")]
pub enum SiteSelector {
    #[default]
    All,
    Site(String),
}

impl SiteSelector {
    /// Build a selector from a control value; `"ALL"` maps to the sentinel.
    pub fn parse(value: &str) -> Self {
        if value == ALL_SITES {
            SiteSelector::All
        } else {
            SiteSelector::Site(value.to_string())
        }
    }

    /// Whether a record's site passes this selector.
    pub fn matches(&self, site: &str) -> bool {
        match self {
            SiteSelector::All => true,
            SiteSelector::Site(s) => s == site,
        }
    }
}

impl From<SiteSelector> for String {
    fn from(selector: SiteSelector) -> Self {
        selector.to_string()
    }
}

impl fmt::Display for SiteSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SiteSelector::All => write!(f, "{ALL_SITES}"),
            SiteSelector::Site(s) => write!(f, "{s}"),
        }
    }
}

/// Rejected range control values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RangeError {
    #[error("payload range bounds must be finite numbers (got {low}, {high})")]
    NonFinite { low: f64, high: f64 },
    #[error("payload range lower bound {low} exceeds upper bound {high}")]
    Inverted { low: f64, high: f64 },
}

/// Closed payload interval `[low, high]` in kg. Always `low <= high`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PayloadRange {
    low: f64,
    high: f64,
}

impl PayloadRange {
    pub fn new(low: f64, high: f64) -> Result<Self, RangeError> {
        if !low.is_finite() || !high.is_finite() {
            return Err(RangeError::NonFinite { low, high });
        }
        if low > high {
            return Err(RangeError::Inverted { low, high });
        }
        Ok(Self { low, high })
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    /// Inclusive on both ends.
    pub fn contains(&self, payload_mass_kg: f64) -> bool {
        self.low <= payload_mass_kg && payload_mass_kg <= self.high
    }
}

impl fmt::Display for PayloadRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}] kg", self.low, self.high)
    }
}

// ---------------------------------------------------------------------------
// Derived data products
// ---------------------------------------------------------------------------

/// A `(group key, count)` pair feeding the proportion chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregateRow {
    pub group_key: String,
    pub count: usize,
}

/// The fields of a launch the scatter chart needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub payload_mass_kg: f64,
    pub booster_version_category: String,
    pub booster_version: String,
    pub outcome: Outcome,
}

impl From<&LaunchRecord> for ScatterPoint {
    fn from(record: &LaunchRecord) -> Self {
        Self {
            payload_mass_kg: record.payload_mass_kg,
            booster_version_category: record.booster_version_category.clone(),
            booster_version: record.booster_version.clone(),
            outcome: record.outcome,
        }
    }
}

// ---------------------------------------------------------------------------
// LaunchDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full loaded table with indices computed once at load time.
#[derive(Debug, Clone)]
pub struct LaunchDataset {
    records: Vec<LaunchRecord>,
    /// Distinct sites in first-seen order.
    sites: Vec<String>,
    /// Distinct booster categories, sorted.
    categories: BTreeSet<String>,
    payload_bounds: PayloadRange,
}

impl LaunchDataset {
    /// Build the indices. Returns `None` for an empty table, which has no
    /// observed payload bounds.
    pub fn from_records(records: Vec<LaunchRecord>) -> Option<Self> {
        let mut sites: Vec<String> = Vec::new();
        let mut categories = BTreeSet::new();
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;

        for rec in &records {
            if !sites.iter().any(|s| s == &rec.site) {
                sites.push(rec.site.clone());
            }
            categories.insert(rec.booster_version_category.clone());
            min = min.min(rec.payload_mass_kg);
            max = max.max(rec.payload_mass_kg);
        }

        let payload_bounds = PayloadRange::new(min, max).ok()?;
        Some(LaunchDataset {
            records,
            sites,
            categories,
            payload_bounds,
        })
    }

    pub fn records(&self) -> &[LaunchRecord] {
        &self.records
    }

    pub fn sites(&self) -> &[String] {
        &self.sites
    }

    pub fn categories(&self) -> &BTreeSet<String> {
        &self.categories
    }

    /// Observed `[min, max]` payload; the default range control value.
    pub fn payload_bounds(&self) -> PayloadRange {
        self.payload_bounds
    }

    /// Options for the site control: the sentinel followed by every site.
    pub fn site_options(&self) -> Vec<SiteSelector> {
        std::iter::once(SiteSelector::All)
            .chain(self.sites.iter().cloned().map(SiteSelector::Site))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}
