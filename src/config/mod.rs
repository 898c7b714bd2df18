pub mod toml_config;

use crate::domain::model::{GeoPoint, Proximity, SiteSelection};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
use serde::{Deserialize, Serialize};

/// Launch records with site coordinates, published with the SpaceX geo lab.
pub const DEFAULT_DATASET_URL: &str = "https://cf-courses-data.s3.us.cloud-object-storage.appdomain.cloud/IBM-DS0321EN-SkillsNetwork/datasets/spacex_launch_geo.csv";

/// Closest coastline point to CCAFS LC-40.
pub const DEFAULT_PROXIMITY: &str = "Coastline@CCAFS LC-40:28.56260,-80.56786";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(Parser))]
#[cfg_attr(feature = "cli", command(name = "launch-analytics"))]
#[cfg_attr(
    feature = "cli",
    command(about = "Aggregate launch outcomes and site distances from a launch dataset")
)]
pub struct CliConfig {
    #[cfg_attr(feature = "cli", arg(long, default_value = DEFAULT_DATASET_URL))]
    pub dataset_url: String,

    #[cfg_attr(feature = "cli", arg(long, default_value = "./output"))]
    pub output_path: String,

    /// Launch site to break down, or ALL
    #[cfg_attr(feature = "cli", arg(long, default_value = "ALL"))]
    pub site: String,

    #[cfg_attr(feature = "cli", arg(long))]
    pub payload_min: Option<f64>,

    #[cfg_attr(feature = "cli", arg(long))]
    pub payload_max: Option<f64>,

    /// Point to measure from a site, as NAME@SITE:LAT,LON
    #[cfg_attr(
        feature = "cli",
        arg(long = "proximity", default_value = DEFAULT_PROXIMITY, value_parser = parse_proximity)
    )]
    pub proximities: Vec<Proximity>,

    #[cfg_attr(feature = "cli", arg(long, help = "Reject records with out-of-range coordinates"))]
    pub strict_coordinates: bool,

    #[cfg_attr(feature = "cli", arg(long))]
    pub timeout_seconds: Option<u64>,

    #[cfg_attr(feature = "cli", arg(long, help = "Emit logs as JSON lines"))]
    pub json_logs: bool,

    #[cfg_attr(feature = "cli", arg(long, help = "Enable verbose output"))]
    pub verbose: bool,

    #[cfg_attr(feature = "cli", arg(long, help = "Log CPU and memory usage per phase"))]
    pub monitor: bool,
}

/// Parses `NAME@SITE:LAT,LON`, e.g. `Coastline@CCAFS LC-40:28.56260,-80.56786`.
pub fn parse_proximity(spec: &str) -> std::result::Result<Proximity, String> {
    let (name, rest) = spec
        .split_once('@')
        .ok_or_else(|| format!("expected NAME@SITE:LAT,LON, got '{}'", spec))?;
    let (site, coordinate) = rest
        .rsplit_once(':')
        .ok_or_else(|| format!("missing ':LAT,LON' in '{}'", spec))?;
    let (lat, lon) = coordinate
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LON in '{}'", spec))?;

    let latitude = lat
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("bad latitude '{}': {}", lat, e))?;
    let longitude = lon
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("bad longitude '{}': {}", lon, e))?;

    Ok(Proximity {
        name: name.trim().to_string(),
        site: site.trim().to_string(),
        coordinate: GeoPoint::new(latitude, longitude),
    })
}

pub(crate) fn validate_proximities(field_name: &str, proximities: &[Proximity]) -> Result<()> {
    for (i, proximity) in proximities.iter().enumerate() {
        let field = format!("{}[{}]", field_name, i);
        validation::validate_non_empty_string(&format!("{}.name", field), &proximity.name)?;
        validation::validate_non_empty_string(&format!("{}.site", field), &proximity.site)?;
        validation::validate_coordinate(&field, proximity.coordinate)?;
    }
    Ok(())
}

pub(crate) fn validate_payload_bounds(
    field_name: &str,
    min: Option<f64>,
    max: Option<f64>,
) -> Result<()> {
    match (min, max) {
        (Some(min), Some(max)) => validation::validate_payload_range(field_name, min, max),
        (Some(bound), None) | (None, Some(bound)) => {
            validation::validate_payload_range(field_name, bound, bound)
        }
        (None, None) => Ok(()),
    }
}

impl ConfigProvider for CliConfig {
    fn dataset_url(&self) -> &str {
        &self.dataset_url
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn site_selection(&self) -> SiteSelection {
        SiteSelection::from(self.site.clone())
    }

    fn payload_min(&self) -> Option<f64> {
        self.payload_min
    }

    fn payload_max(&self) -> Option<f64> {
        self.payload_max
    }

    fn proximities(&self) -> Vec<Proximity> {
        self.proximities.clone()
    }

    fn strict_coordinates(&self) -> bool {
        self.strict_coordinates
    }

    fn request_timeout_seconds(&self) -> Option<u64> {
        self.timeout_seconds
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("dataset_url", &self.dataset_url)?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_non_empty_string("site", &self.site)?;
        validate_payload_bounds("payload", self.payload_min, self.payload_max)?;
        validate_proximities("proximity", &self.proximities)?;
        if let Some(timeout) = self.timeout_seconds {
            validation::validate_range("timeout_seconds", timeout, 1, 3600)?;
        }
        Ok(())
    }
}
