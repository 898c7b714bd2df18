pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::LocalStorage;
pub use app::pipelines::{parse_launch_records, LaunchPipeline};
pub use config::{toml_config::TomlConfig, CliConfig};
pub use crate::core::aggregate::{
    filter_by_payload_range, group_first_coordinate_by_site, outcome_counts,
    success_counts_by_site,
};
pub use crate::core::etl::EtlEngine;
pub use crate::core::geodesy::distance_km;
pub use domain::model::{
    GeoPoint, LaunchRecord, LaunchReport, Outcome, OutcomeCounts, Proximity, SiteSelection,
};
pub use utils::error::{EtlError, Result};
