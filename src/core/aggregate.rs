//! Grouping, counting and filtering of launch records.
//!
//! Everything here is a pure function over a borrowed slice; callers pass the
//! dataset in explicitly and may re-run any function on demand.

use crate::core::geodesy::{distance_km, label_anchor};
use crate::domain::model::{
    GeoPoint, LaunchRecord, OutcomeCounts, Proximity, ProximityDistance, ScatterPoint,
    SiteSelection, SuccessBreakdown,
};
use std::collections::{BTreeMap, HashMap};

/// Coordinate of each site's first record, in first-appearance order.
///
/// When the first record's coordinate has a blank (NaN) component, the first
/// later record of that site with a complete coordinate is used instead.
pub fn group_first_coordinate_by_site(records: &[LaunchRecord]) -> Vec<(String, GeoPoint)> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut sites: Vec<(String, GeoPoint)> = Vec::new();

    for record in records {
        match positions.get(record.site.as_str()) {
            None => {
                positions.insert(record.site.as_str(), sites.len());
                sites.push((record.site.clone(), record.coordinate));
            }
            Some(&i) => {
                if !sites[i].1.is_complete() && record.coordinate.is_complete() {
                    sites[i].1 = record.coordinate;
                }
            }
        }
    }

    sites
}

/// Number of successful launches per site. Sites without a success are absent.
pub fn success_counts_by_site(records: &[LaunchRecord]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for record in records.iter().filter(|r| r.is_success()) {
        *counts.entry(record.site.clone()).or_insert(0) += 1;
    }
    counts
}

pub fn outcome_counts(records: &[LaunchRecord], selection: &SiteSelection) -> OutcomeCounts {
    records
        .iter()
        .filter(|r| selection.matches(&r.site))
        .fold(OutcomeCounts::default(), |mut counts, record| {
            if record.is_success() {
                counts.success += 1;
            } else {
                counts.failure += 1;
            }
            counts
        })
}

/// Records with `min <= payload <= max`, in input order.
///
/// A NaN payload never satisfies the bounds and is dropped.
pub fn filter_by_payload_range(records: &[LaunchRecord], min: f64, max: f64) -> Vec<LaunchRecord> {
    records
        .iter()
        .filter(|r| r.payload_mass_kg >= min && r.payload_mass_kg <= max)
        .cloned()
        .collect()
}

pub fn filter_by_site(records: &[LaunchRecord], selection: &SiteSelection) -> Vec<LaunchRecord> {
    records
        .iter()
        .filter(|r| selection.matches(&r.site))
        .cloned()
        .collect()
}

/// Distinct site names in first-appearance order.
pub fn distinct_sites(records: &[LaunchRecord]) -> Vec<String> {
    group_first_coordinate_by_site(records)
        .into_iter()
        .map(|(site, _)| site)
        .collect()
}

/// Smallest and largest payload mass, ignoring NaN values.
pub fn payload_bounds(records: &[LaunchRecord]) -> Option<(f64, f64)> {
    let mut payloads = records
        .iter()
        .map(|r| r.payload_mass_kg)
        .filter(|p| !p.is_nan());
    let first = payloads.next()?;
    Some(payloads.fold((first, first), |(min, max), p| (min.min(p), max.max(p))))
}

pub fn success_breakdown(records: &[LaunchRecord], selection: &SiteSelection) -> SuccessBreakdown {
    match selection {
        SiteSelection::All => SuccessBreakdown::BySite(success_counts_by_site(records)),
        SiteSelection::Site(_) => SuccessBreakdown::ByOutcome(outcome_counts(records, selection)),
    }
}

/// Payload-versus-outcome points: payload range first, then site.
pub fn scatter_points(
    records: &[LaunchRecord],
    selection: &SiteSelection,
    min: f64,
    max: f64,
) -> Vec<ScatterPoint> {
    let in_range = filter_by_payload_range(records, min, max);
    filter_by_site(&in_range, selection)
        .into_iter()
        .map(|r| ScatterPoint {
            class: r.outcome.class(),
            site: r.site,
            payload_mass_kg: r.payload_mass_kg,
            booster_category: r.booster_category,
        })
        .collect()
}

/// Distance from each proximity to the site it names.
///
/// Proximities that refer to a site not present in `sites` are skipped.
pub fn proximity_distances(
    sites: &[(String, GeoPoint)],
    proximities: &[Proximity],
) -> Vec<ProximityDistance> {
    let lookup: HashMap<&str, GeoPoint> = sites
        .iter()
        .map(|(site, coordinate)| (site.as_str(), *coordinate))
        .collect();

    proximities
        .iter()
        .filter_map(|proximity| {
            let Some(site_coordinate) = lookup.get(proximity.site.as_str()).copied() else {
                tracing::warn!(
                    "Skipping proximity '{}': launch site '{}' not in dataset",
                    proximity.name,
                    proximity.site
                );
                return None;
            };

            Some(ProximityDistance {
                site: proximity.site.clone(),
                proximity: proximity.name.clone(),
                site_coordinate,
                proximity_coordinate: proximity.coordinate,
                distance_km: distance_km(site_coordinate, proximity.coordinate),
                label_anchor: label_anchor(site_coordinate, proximity.coordinate),
            })
        })
        .collect()
}
