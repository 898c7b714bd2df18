use crate::core::aggregate;
use crate::core::{ConfigProvider, LaunchRecord, LaunchReport, Pipeline, Storage};
use crate::domain::model::{GeoPoint, Outcome, SiteSelection, SiteSummary, SuccessBreakdown};
use crate::utils::error::{EtlError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use zip::write::{SimpleFileOptions, ZipWriter};

/// One row of the launch CSV. The geo and dashboard datasets each carry a
/// subset of the optional columns.
#[derive(Debug, Deserialize)]
struct LaunchRow {
    #[serde(rename = "Launch Site")]
    site: String,
    #[serde(rename = "Lat", default)]
    latitude: Option<f64>,
    #[serde(rename = "Long", default)]
    longitude: Option<f64>,
    class: i64,
    #[serde(rename = "Payload Mass (kg)", default)]
    payload_mass_kg: Option<f64>,
    #[serde(rename = "Booster Version Category", default)]
    booster_category: Option<String>,
}

/// Which optional columns the dataset header carries.
#[derive(Debug, Clone, Copy)]
struct OptionalColumns {
    latitude: bool,
    longitude: bool,
    payload: bool,
}

impl OptionalColumns {
    fn from_headers(headers: &csv::StringRecord) -> Self {
        let has = |name: &str| headers.iter().any(|h| h == name);
        Self {
            latitude: has("Lat"),
            longitude: has("Long"),
            payload: has("Payload Mass (kg)"),
        }
    }
}

/// A blank cell in a present column is NaN; an absent column reads as 0.0.
fn numeric_cell(value: Option<f64>, column_present: bool) -> f64 {
    match value {
        Some(v) => v,
        None if column_present => f64::NAN,
        None => 0.0,
    }
}

impl LaunchRow {
    fn into_record(self, columns: OptionalColumns) -> LaunchRecord {
        LaunchRecord {
            site: self.site,
            coordinate: GeoPoint::new(
                numeric_cell(self.latitude, columns.latitude),
                numeric_cell(self.longitude, columns.longitude),
            ),
            outcome: Outcome::from_class(self.class),
            payload_mass_kg: numeric_cell(self.payload_mass_kg, columns.payload),
            booster_category: self.booster_category.unwrap_or_default(),
        }
    }
}

/// Parses launch CSV bytes into records, keeping file order.
///
/// Blank coordinate or payload cells become NaN. With `strict_coordinates`
/// a record whose coordinate is blank or outside the valid latitude/longitude
/// ranges is a validation error; otherwise it is kept as-is.
pub fn parse_launch_records(data: &[u8], strict_coordinates: bool) -> Result<Vec<LaunchRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(data);
    let columns = OptionalColumns::from_headers(reader.headers()?);

    let mut records = Vec::new();
    for (index, row) in reader.deserialize::<LaunchRow>().enumerate() {
        let record = row?.into_record(columns);

        if !record.coordinate.is_valid() {
            if strict_coordinates {
                return Err(EtlError::ValidationError {
                    message: format!(
                        "row {} ({}): coordinate {} missing or out of range",
                        index + 1,
                        record.site,
                        record.coordinate
                    ),
                });
            }
            tracing::debug!(
                "Row {} ({}) has missing or out-of-range coordinate {}",
                index + 1,
                record.site,
                record.coordinate
            );
        }

        records.push(record);
    }

    Ok(records)
}

/// Builds a CSV document with an explicit header so empty tables still
/// carry their column names.
fn to_csv<T: Serialize>(headers: &[&str], rows: impl IntoIterator<Item = T>) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(headers)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| EtlError::IoError(e.into_error()))
}

pub struct LaunchPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    client: Client,
}

impl<S: Storage, C: ConfigProvider> LaunchPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self {
            storage,
            config,
            client: Client::new(),
        }
    }

    fn build_archive(&self, report: &LaunchReport) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();

        let sites = to_csv(
            &["site", "latitude", "longitude", "success", "failure"],
            report.sites.iter().map(|s| {
                (
                    &s.site,
                    s.coordinate.latitude,
                    s.coordinate.longitude,
                    s.outcomes.success,
                    s.outcomes.failure,
                )
            }),
        )?;
        zip.start_file("launch_sites.csv", options)?;
        zip.write_all(&sites)?;

        let markers = to_csv(
            &["site", "latitude", "longitude", "outcome", "marker_color"],
            report.records.iter().map(|r| {
                (
                    &r.site,
                    r.coordinate.latitude,
                    r.coordinate.longitude,
                    r.outcome.label(),
                    r.outcome.marker_color(),
                )
            }),
        )?;
        zip.start_file("launch_markers.csv", options)?;
        zip.write_all(&markers)?;

        let breakdown_rows: Vec<(String, usize)> = match &report.breakdown {
            SuccessBreakdown::BySite(counts) => {
                counts.iter().map(|(site, n)| (site.clone(), *n)).collect()
            }
            SuccessBreakdown::ByOutcome(counts) => counts.as_map().into_iter().collect(),
        };
        let breakdown = to_csv(&["label", "count"], breakdown_rows)?;
        zip.start_file("outcome_counts.csv", options)?;
        zip.write_all(&breakdown)?;

        let scatter = to_csv(
            &["site", "payload_mass_kg", "class", "booster_category"],
            report.scatter.iter().map(|p| {
                (
                    &p.site,
                    p.payload_mass_kg,
                    p.class,
                    &p.booster_category,
                )
            }),
        )?;
        zip.start_file("payload_scatter.csv", options)?;
        zip.write_all(&scatter)?;

        let distances = to_csv(
            &[
                "site",
                "proximity",
                "site_latitude",
                "site_longitude",
                "proximity_latitude",
                "proximity_longitude",
                "distance_km",
                "label_latitude",
                "label_longitude",
            ],
            report.proximities.iter().map(|d| {
                (
                    &d.site,
                    &d.proximity,
                    d.site_coordinate.latitude,
                    d.site_coordinate.longitude,
                    d.proximity_coordinate.latitude,
                    d.proximity_coordinate.longitude,
                    format!("{:.2}", d.distance_km),
                    d.label_anchor.latitude,
                    d.label_anchor.longitude,
                )
            }),
        )?;
        zip.start_file("proximity_distances.csv", options)?;
        zip.write_all(&distances)?;

        zip.start_file("report.json", options)?;
        zip.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for LaunchPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<LaunchRecord>> {
        let url = self.config.dataset_url();
        tracing::debug!("Requesting launch dataset from: {}", url);

        let mut request = self.client.get(url);
        if let Some(timeout) = self.config.request_timeout_seconds() {
            request = request.timeout(Duration::from_secs(timeout));
        }

        // no retry and no fallback data: a failed download ends the run
        let response = request.send().await?;
        tracing::debug!("Dataset response status: {}", response.status());
        let response = response.error_for_status()?;

        let body = response.bytes().await?;
        tracing::debug!("Downloaded {} bytes", body.len());

        parse_launch_records(&body, self.config.strict_coordinates())
    }

    async fn transform(&self, records: Vec<LaunchRecord>) -> Result<LaunchReport> {
        if records.is_empty() {
            return Err(EtlError::ProcessingError {
                message: "launch dataset contained no records".to_string(),
            });
        }

        let selection = self.config.site_selection();
        let first_coordinates = aggregate::group_first_coordinate_by_site(&records);

        if let SiteSelection::Site(name) = &selection {
            if !first_coordinates.iter().any(|(site, _)| site == name) {
                tracing::warn!("Selected site '{}' does not appear in the dataset", name);
            }
        }

        let sites = first_coordinates
            .iter()
            .map(|(site, coordinate)| SiteSummary {
                site: site.clone(),
                coordinate: *coordinate,
                outcomes: aggregate::outcome_counts(&records, &SiteSelection::Site(site.clone())),
            })
            .collect();

        let payload_bounds = aggregate::payload_bounds(&records);
        let (data_min, data_max) = payload_bounds.unwrap_or((0.0, 0.0));
        let payload_range = (
            self.config.payload_min().unwrap_or(data_min),
            self.config.payload_max().unwrap_or(data_max),
        );
        tracing::debug!(
            "Payload range {:?} (dataset bounds {:?})",
            payload_range,
            payload_bounds
        );

        let proximities =
            aggregate::proximity_distances(&first_coordinates, &self.config.proximities());
        for distance in &proximities {
            tracing::info!(
                "Distance from {} to {}: {:.2} km",
                distance.site,
                distance.proximity,
                distance.distance_km
            );
        }

        Ok(LaunchReport {
            generated_at: chrono::Utc::now(),
            record_count: records.len(),
            sites,
            success_counts_by_site: aggregate::success_counts_by_site(&records),
            overall_outcomes: aggregate::outcome_counts(&records, &SiteSelection::All),
            breakdown: aggregate::success_breakdown(&records, &selection),
            payload_bounds,
            payload_range,
            scatter: aggregate::scatter_points(
                &records,
                &selection,
                payload_range.0,
                payload_range.1,
            ),
            proximities,
            selection,
            records,
        })
    }

    async fn load(&self, report: LaunchReport) -> Result<String> {
        let filename = self.config.archive_filename();
        let output_path = Path::new(self.config.output_path())
            .join(filename)
            .display()
            .to_string();

        let zip_data = self.build_archive(&report)?;

        tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
        self.storage.write_file(filename, &zip_data).await?;

        Ok(output_path)
    }
}
