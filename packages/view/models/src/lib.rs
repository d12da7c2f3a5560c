#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filter state and derived view types.
//!
//! Every view is a snapshot produced from a registry and a
//! [`FilterState`]. Consumers render them as-is and request a fresh one
//! whenever the filter changes.

pub mod filter;

pub use filter::{DateRange, FilterState, FilterUpdate};

use chrono::NaiveDate;
use outbreak_map_dataset_models::{VaccinationRate, VaccinationStatus};
use outbreak_map_region_models::RegionKey;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Vaccination coverage band used for map coloring and legends.
///
/// Variants are declared in ascending coverage order, with
/// [`Band::NoData`] first.
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
pub enum Band {
    /// Coverage unknown.
    NoData,
    /// Below 75%.
    Low,
    /// 75% up to 80%.
    ModerateLow,
    /// 80% up to 85%.
    Moderate,
    /// 85% up to 90%.
    ModerateHigh,
    /// 90% up to 95%.
    High,
    /// 95% and above.
    VeryHigh,
}

impl Band {
    /// All bands, in ascending order.
    pub const ALL: &[Self] = &[
        Self::NoData,
        Self::Low,
        Self::ModerateLow,
        Self::Moderate,
        Self::ModerateHigh,
        Self::High,
        Self::VeryHigh,
    ];

    /// Inclusive lower coverage bound, or `None` for [`Band::NoData`].
    /// [`Band::Low`] starts at zero.
    #[must_use]
    pub const fn lower_bound(self) -> Option<f64> {
        match self {
            Self::NoData => None,
            Self::Low => Some(0.0),
            Self::ModerateLow => Some(0.75),
            Self::Moderate => Some(0.80),
            Self::ModerateHigh => Some(0.85),
            Self::High => Some(0.90),
            Self::VeryHigh => Some(0.95),
        }
    }

    /// Legend caption.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NoData => "No data",
            Self::Low => "<75%",
            Self::ModerateLow => "75-80%",
            Self::Moderate => "80-85%",
            Self::ModerateHigh => "85-90%",
            Self::High => "90-95%",
            Self::VeryHigh => "95%+",
        }
    }

    /// Fill color as a CSS hex string.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::NoData => "#cccccc",
            Self::Low => "#d73027",
            Self::ModerateLow => "#fc8d59",
            Self::Moderate => "#fee08b",
            Self::ModerateHigh => "#d9ef8b",
            Self::High => "#91cf60",
            Self::VeryHigh => "#1a9850",
        }
    }
}

/// One row of the map legend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendEntry {
    /// Band.
    pub band: Band,
    /// Caption.
    pub label: String,
    /// Fill color.
    pub color: String,
}

/// A region that passes every active predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibleRegion {
    /// Canonical key.
    pub key: RegionKey,
    /// Display name.
    pub name: String,
    /// Vaccination coverage.
    pub vaccination_rate: VaccinationRate,
    /// Coverage band.
    pub band: Band,
    /// Case count (zero when the case dataset omits the region).
    pub cases: u64,
}

/// A selectable region for the region picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionOption {
    /// Canonical key to pass back as the selected region.
    pub key: RegionKey,
    /// Display name.
    pub name: String,
}

/// One region's case counts aligned to a shared date axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineSeries {
    /// Canonical key.
    pub key: RegionKey,
    /// Display name.
    pub name: String,
    /// One count per axis date; zero where the region has no observation.
    pub counts: Vec<u64>,
}

/// Case timelines for several regions on one date axis.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinedTimeline {
    /// Strictly increasing dates.
    pub dates: Vec<NaiveDate>,
    /// One series per region, each exactly `dates.len()` long.
    pub series: Vec<TimelineSeries>,
}

/// Field a ranking sorts by.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum RankField {
    /// Exemption rate for the filter's school year (or the latest year).
    ExemptionRate,
    /// Vaccination coverage.
    VaccinationRate,
    /// Case count.
    Cases,
}

/// Sort direction for a ranking.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum SortOrder {
    /// Smallest first.
    Asc,
    /// Largest first.
    Desc,
}

/// A ranked region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedRegion {
    /// Canonical key.
    pub key: RegionKey,
    /// Display name.
    pub name: String,
    /// The ranked value; `None` when the region does not report it.
    pub value: Option<f64>,
}

/// The first `n` regions by some field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ranking {
    /// Field ranked by.
    pub field: RankField,
    /// Direction.
    pub order: SortOrder,
    /// School year used, for exemption rankings.
    pub school_year: Option<String>,
    /// Ranked regions.
    pub entries: Vec<RankedRegion>,
}

/// Cases for one age group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeGroupCount {
    /// Age-group label.
    pub label: String,
    /// Cases.
    pub cases: u64,
}

/// Cases for one vaccination status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSlice {
    /// Status.
    pub status: VaccinationStatus,
    /// Chart label.
    pub label: String,
    /// Cases.
    pub cases: u64,
    /// Fraction of all cases (zero when there are none).
    pub share: f64,
}

/// How a map feature should be drawn.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Emphasis {
    /// Passes the filters and has cases.
    Highlighted,
    /// Passes the filters.
    Normal,
    /// Fails at least one active filter.
    Dimmed,
}

/// A boundary shape joined with its datasets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapFeature {
    /// Canonical key; look the geometry up in the registry.
    pub key: RegionKey,
    /// Display name.
    pub name: String,
    /// Jurisdiction-qualified label (e.g. `"Gaines County, TX"`).
    pub label: String,
    /// Vaccination coverage.
    pub vaccination_rate: VaccinationRate,
    /// Coverage band.
    pub band: Band,
    /// Case count.
    pub cases: u64,
    /// Drawing emphasis.
    pub emphasis: Emphasis,
}

/// Longitude/latitude bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    /// Minimum longitude.
    pub west: f64,
    /// Minimum latitude.
    pub south: f64,
    /// Maximum longitude.
    pub east: f64,
    /// Maximum latitude.
    pub north: f64,
}

/// Everything the map needs for one filter state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapLayer {
    /// One entry per boundary shape.
    pub features: Vec<MapFeature>,
    /// Bounds of the non-dimmed features, if any.
    pub bounds: Option<Bounds>,
}

/// A view that needs region boundaries.
///
/// `Unavailable` is how a failed boundary fetch reaches the consumer; it
/// is distinct from an available but empty result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum MapDependent<T> {
    /// Boundaries are loaded.
    Available {
        /// The view.
        view: T,
    },
    /// Boundaries failed to load.
    Unavailable {
        /// Why.
        reason: String,
    },
}

impl<T> MapDependent<T> {
    /// Returns the view if available.
    #[must_use]
    pub fn available(self) -> Option<T> {
        match self {
            Self::Available { view } => Some(view),
            Self::Unavailable { .. } => None,
        }
    }

    /// Whether boundaries were unavailable.
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_are_ordered() {
        let mut sorted = Band::ALL.to_vec();
        sorted.sort();
        assert_eq!(sorted, Band::ALL);
        assert_eq!(Band::ALL.len(), 7);
    }

    #[test]
    fn lower_bounds_increase() {
        let bounds: Vec<f64> = Band::ALL.iter().filter_map(|b| b.lower_bound()).collect();
        assert_eq!(bounds.len(), 6);
        assert!(bounds.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn band_names_are_kebab_case() {
        assert_eq!(Band::ModerateHigh.to_string(), "moderate-high");
        assert_eq!("no-data".parse::<Band>().unwrap(), Band::NoData);
    }

    #[test]
    fn unavailable_serializes_with_status_tag() {
        let view: MapDependent<MapLayer> = MapDependent::Unavailable {
            reason: "offline".to_string(),
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["status"], "unavailable");
        assert!(view.is_unavailable());
    }
}
