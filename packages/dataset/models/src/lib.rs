#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Canonical outbreak dataset types.
//!
//! These are the shapes every dataset takes after loading: identifiers
//! are already [`RegionKey`]s, dates are parsed, and "unknown" is a
//! distinct state rather than a sentinel number. The raw bundled schemas
//! live with the loaders in `outbreak_map_dataset`.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use outbreak_map_region_models::RegionKey;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Kindergarten MMR vaccination coverage for a region.
///
/// `Unknown` is never coerced to `0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "Option<f64>", into = "Option<f64>")]
pub enum VaccinationRate {
    /// Fraction of students vaccinated, nominally in `[0, 1]`.
    Known(f64),
    /// The source reports no figure for this region.
    Unknown,
}

impl VaccinationRate {
    /// Returns the fraction, or `None` when unknown.
    #[must_use]
    pub const fn value(self) -> Option<f64> {
        match self {
            Self::Known(rate) => Some(rate),
            Self::Unknown => None,
        }
    }
}

impl From<Option<f64>> for VaccinationRate {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Unknown, Self::Known)
    }
}

impl From<VaccinationRate> for Option<f64> {
    fn from(rate: VaccinationRate) -> Self {
        rate.value()
    }
}

/// Vaccination coverage for one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaccinationRecord {
    /// Canonical region key.
    pub key: RegionKey,
    /// Region name as displayed (qualifier stripped, original casing).
    pub name: String,
    /// Coverage fraction or unknown.
    pub rate: VaccinationRate,
}

/// Cumulative case count for one region.
///
/// Regions absent from the case dataset implicitly have zero cases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseRecord {
    /// Canonical region key.
    pub key: RegionKey,
    /// Region name as displayed.
    pub name: String,
    /// Confirmed cases.
    pub cases: u64,
}

/// Conscientious exemption rates for one region, by school year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExemptionRecord {
    /// Canonical region key.
    pub key: RegionKey,
    /// Region name as displayed.
    pub name: String,
    /// School-year label (e.g. `"2023-2024"`) to exemption fraction.
    pub rates: BTreeMap<String, f64>,
}

impl ExemptionRecord {
    /// Returns the exemption rate for a school year, if reported.
    #[must_use]
    pub fn rate(&self, school_year: &str) -> Option<f64> {
        self.rates.get(school_year).copied()
    }
}

/// A single dated case observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    /// Report date.
    pub date: NaiveDate,
    /// Cases reported on that date.
    pub cases: u64,
}

/// Case time series for one region.
///
/// Observations are kept in source order; they are not guaranteed to be
/// sorted or free of duplicate dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineRecord {
    /// Canonical region key.
    pub key: RegionKey,
    /// Region name as displayed.
    pub name: String,
    /// Dated observations.
    pub observations: Vec<Observation>,
}

/// Case count for one age group. Not region-keyed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeBucket {
    /// Age-group label (e.g. `"0-4 years"`).
    pub label: String,
    /// Cases in this group.
    pub cases: u64,
}

/// Vaccination status of confirmed cases.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum VaccinationStatus {
    /// Not vaccinated, or status unknown.
    UnvaccinatedOrUnknown,
    /// At least one MMR dose.
    OneDose,
    /// Two or more MMR doses.
    TwoDose,
}

impl VaccinationStatus {
    /// All statuses, in display order.
    pub const ALL: &[Self] = &[Self::UnvaccinatedOrUnknown, Self::OneDose, Self::TwoDose];

    /// Human-readable chart label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::UnvaccinatedOrUnknown => "Unvaccinated/Unknown",
            Self::OneDose => "Vaccinated 1+ Dose",
            Self::TwoDose => "Vaccinated 2+ Dose",
        }
    }
}

/// Jurisdiction-wide breakdown of cases by vaccination status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaccinationStatusSummary {
    /// Cases with no recorded dose, or unknown status.
    pub unvaccinated_or_unknown: u64,
    /// Cases with one dose.
    pub one_dose: u64,
    /// Cases with two doses.
    pub two_dose: u64,
}

impl VaccinationStatusSummary {
    /// Returns the count for a status.
    #[must_use]
    pub const fn count(&self, status: VaccinationStatus) -> u64 {
        match status {
            VaccinationStatus::UnvaccinatedOrUnknown => self.unvaccinated_or_unknown,
            VaccinationStatus::OneDose => self.one_dose,
            VaccinationStatus::TwoDose => self.two_dose,
        }
    }

    /// Total cases across all statuses.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.unvaccinated_or_unknown + self.one_dose + self.two_dose
    }
}

/// A region boundary retained from the remote boundary source.
#[derive(Debug, Clone, PartialEq)]
pub struct GeographicShape {
    /// Canonical region key.
    pub key: RegionKey,
    /// Region name as the boundary source spells it.
    pub name: String,
    /// Source geometry, for rendering.
    pub geometry: geojson::Geometry,
    /// The same boundary as polygons, for spatial queries.
    pub polygon: geo::MultiPolygon<f64>,
    /// Remaining feature properties.
    pub properties: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_rate_is_not_zero() {
        assert_ne!(VaccinationRate::Unknown, VaccinationRate::Known(0.0));
        assert_eq!(VaccinationRate::Unknown.value(), None);
    }

    #[test]
    fn rate_serializes_as_nullable_number() {
        assert_eq!(
            serde_json::to_string(&VaccinationRate::Unknown).unwrap(),
            "null"
        );
        let parsed: VaccinationRate = serde_json::from_str("0.93").unwrap();
        assert_eq!(parsed, VaccinationRate::Known(0.93));
    }

    #[test]
    fn status_summary_counts() {
        let summary = VaccinationStatusSummary {
            unvaccinated_or_unknown: 40,
            one_dose: 3,
            two_dose: 2,
        };
        assert_eq!(summary.total(), 45);
        assert_eq!(summary.count(VaccinationStatus::OneDose), 3);
    }

    #[test]
    fn status_parses_from_kebab_case() {
        assert_eq!(
            "two-dose".parse::<VaccinationStatus>().unwrap(),
            VaccinationStatus::TwoDose
        );
        assert_eq!(
            VaccinationStatus::UnvaccinatedOrUnknown.to_string(),
            "unvaccinated-or-unknown"
        );
    }
}
