use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Dropdown value that selects every launch site.
pub const ALL_SITES: &str = "ALL";

/// A latitude/longitude pair in degrees.
///
/// Ranges are not enforced on construction; use [`GeoPoint::is_valid`] when
/// the caller wants to reject out-of-range coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Both components present; a blank dataset cell is read as NaN.
    pub fn is_complete(&self) -> bool {
        !self.latitude.is_nan() && !self.longitude.is_nan()
    }

    /// (latitude, longitude) in radians.
    pub fn to_radians(self) -> (f64, f64) {
        (self.latitude.to_radians(), self.longitude.to_radians())
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.5}, {:.5})", self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    /// Dataset `class` column: 1 is a success, anything else a failure.
    pub fn from_class(class: i64) -> Self {
        if class == 1 {
            Outcome::Success
        } else {
            Outcome::Failure
        }
    }

    pub fn class(self) -> u8 {
        match self {
            Outcome::Success => 1,
            Outcome::Failure => 0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Outcome::Success => "Success",
            Outcome::Failure => "Failure",
        }
    }

    pub fn marker_color(self) -> &'static str {
        match self {
            Outcome::Success => "green",
            Outcome::Failure => "red",
        }
    }
}

/// One launch attempt. Records are read-only once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchRecord {
    pub site: String,
    pub coordinate: GeoPoint,
    pub outcome: Outcome,
    pub payload_mass_kg: f64,
    pub booster_category: String,
}

impl LaunchRecord {
    pub fn is_success(&self) -> bool {
        self.outcome == Outcome::Success
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum SiteSelection {
    #[default]
    All,
    Site(String),
}

impl SiteSelection {
    pub fn matches(&self, site: &str) -> bool {
        match self {
            SiteSelection::All => true,
            SiteSelection::Site(name) => name == site,
        }
    }
}

impl FromStr for SiteSelection {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(SiteSelection::from(s.to_string()))
    }
}

impl From<String> for SiteSelection {
    fn from(value: String) -> Self {
        if value == ALL_SITES {
            SiteSelection::All
        } else {
            SiteSelection::Site(value)
        }
    }
}

impl From<SiteSelection> for String {
    fn from(value: SiteSelection) -> Self {
        match value {
            SiteSelection::All => ALL_SITES.to_string(),
            SiteSelection::Site(name) => name,
        }
    }
}

impl fmt::Display for SiteSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SiteSelection::All => f.write_str(ALL_SITES),
            SiteSelection::Site(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OutcomeCounts {
    pub success: usize,
    pub failure: usize,
}

impl OutcomeCounts {
    pub fn total(&self) -> usize {
        self.success + self.failure
    }

    /// Both keys are always present, even when zero.
    pub fn as_map(&self) -> BTreeMap<String, usize> {
        BTreeMap::from([
            (Outcome::Success.label().to_string(), self.success),
            (Outcome::Failure.label().to_string(), self.failure),
        ])
    }
}

/// A named point near a launch site, such as the closest coastline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proximity {
    pub name: String,
    pub site: String,
    pub coordinate: GeoPoint,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProximityDistance {
    pub site: String,
    pub proximity: String,
    pub site_coordinate: GeoPoint,
    pub proximity_coordinate: GeoPoint,
    pub distance_km: f64,
    pub label_anchor: GeoPoint,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub site: String,
    pub payload_mass_kg: f64,
    pub class: u8,
    pub booster_category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "counts", rename_all = "snake_case")]
pub enum SuccessBreakdown {
    /// Successful launches per site, used when every site is selected.
    BySite(BTreeMap<String, usize>),
    /// Success versus failure for a single site.
    ByOutcome(OutcomeCounts),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteSummary {
    pub site: String,
    pub coordinate: GeoPoint,
    pub outcomes: OutcomeCounts,
}

/// Output of the transform phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchReport {
    pub generated_at: DateTime<Utc>,
    pub record_count: usize,
    pub selection: SiteSelection,
    pub sites: Vec<SiteSummary>,
    pub success_counts_by_site: BTreeMap<String, usize>,
    pub overall_outcomes: OutcomeCounts,
    pub breakdown: SuccessBreakdown,
    pub payload_bounds: Option<(f64, f64)>,
    pub payload_range: (f64, f64),
    pub scatter: Vec<ScatterPoint>,
    pub proximities: Vec<ProximityDistance>,
    #[serde(skip)]
    pub records: Vec<LaunchRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_selection_parsing() {
        assert_eq!("ALL".parse::<SiteSelection>().unwrap(), SiteSelection::All);
        assert_eq!(
            "CCAFS LC-40".parse::<SiteSelection>().unwrap(),
            SiteSelection::Site("CCAFS LC-40".to_string())
        );
        // case sensitive, like the dropdown value
        assert_eq!(
            "all".parse::<SiteSelection>().unwrap(),
            SiteSelection::Site("all".to_string())
        );
    }

    #[test]
    fn test_outcome_from_class() {
        assert_eq!(Outcome::from_class(1), Outcome::Success);
        assert_eq!(Outcome::from_class(0), Outcome::Failure);
        assert_eq!(Outcome::from_class(2), Outcome::Failure);
        assert_eq!(Outcome::Success.marker_color(), "green");
        assert_eq!(Outcome::Failure.marker_color(), "red");
    }

    #[test]
    fn test_outcome_counts_map_has_both_keys() {
        let map = OutcomeCounts::default().as_map();
        assert_eq!(map.get("Success"), Some(&0));
        assert_eq!(map.get("Failure"), Some(&0));
    }

    #[test]
    fn test_geo_point_validity() {
        assert!(GeoPoint::new(28.5, -80.5).is_valid());
        assert!(GeoPoint::new(-90.0, 180.0).is_valid());
        assert!(!GeoPoint::new(90.5, 0.0).is_valid());
        assert!(!GeoPoint::new(0.0, -180.1).is_valid());
    }
}
