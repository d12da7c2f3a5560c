//! The dashboard's single piece of mutable state.
//!
//! [`FilterState`] is a plain value: updates produce a new state and
//! leave the old one untouched, so derived views can be recomputed from
//! whichever state the caller holds. Values are not validated here.

use chrono::NaiveDate;
use outbreak_map_dataset_models::VaccinationStatus;
use outbreak_map_region_models::RegionKey;
use serde::{Deserialize, Serialize};

/// Inclusive date window. Either end may be open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    /// First date included.
    pub start: Option<NaiveDate>,
    /// Last date included.
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// Whether `date` falls inside the window.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|start| date >= start) && self.end.is_none_or(|end| date <= end)
    }
}

/// The active filter predicate shared by every view.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterState {
    /// Show only this region.
    pub selected_region: Option<RegionKey>,
    /// Minimum vaccination coverage; `None` means no minimum.
    pub min_vaccination_rate: Option<f64>,
    /// Minimum case count.
    pub min_cases: u64,
    /// Show only regions with at least one case.
    pub cases_only: bool,
    /// Clip timelines to this window.
    pub date_range: Option<DateRange>,
    /// Show only this age group.
    pub age_group: Option<String>,
    /// School year for exemption views; `None` means the latest year.
    pub school_year: Option<String>,
    /// Show only this vaccination status.
    pub vaccination_status: Option<VaccinationStatus>,
}

/// A single-field change to a [`FilterState`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum FilterUpdate {
    /// Sets or clears the selected region.
    SelectedRegion(Option<RegionKey>),
    /// Sets or clears the vaccination coverage threshold.
    MinVaccinationRate(Option<f64>),
    /// Sets the case threshold.
    MinCases(u64),
    /// Toggles the cases-only predicate.
    CasesOnly(bool),
    /// Sets or clears the timeline window.
    DateRange(Option<DateRange>),
    /// Sets or clears the age group.
    AgeGroup(Option<String>),
    /// Sets or clears the school year.
    SchoolYear(Option<String>),
    /// Sets or clears the vaccination status.
    VaccinationStatus(Option<VaccinationStatus>),
}

impl FilterState {
    /// The documented defaults: no region, no thresholds, cases-only off,
    /// no date window, no age group, latest school year, any status.
    #[must_use]
    pub fn reset() -> Self {
        Self::default()
    }

    /// Returns a new state with one field replaced.
    #[must_use]
    pub fn update(&self, update: FilterUpdate) -> Self {
        log::debug!("Applying filter update {update:?}");

        let mut next = self.clone();
        match update {
            FilterUpdate::SelectedRegion(region) => next.selected_region = region,
            FilterUpdate::MinVaccinationRate(rate) => next.min_vaccination_rate = rate,
            FilterUpdate::MinCases(cases) => next.min_cases = cases,
            FilterUpdate::CasesOnly(enabled) => next.cases_only = enabled,
            FilterUpdate::DateRange(range) => next.date_range = range,
            FilterUpdate::AgeGroup(group) => next.age_group = group,
            FilterUpdate::SchoolYear(year) => next.school_year = year,
            FilterUpdate::VaccinationStatus(status) => next.vaccination_status = status,
        }
        next
    }

    /// Applies updates in order.
    #[must_use]
    pub fn update_all(&self, updates: impl IntoIterator<Item = FilterUpdate>) -> Self {
        updates
            .into_iter()
            .fold(self.clone(), |state, update| state.update(update))
    }

    /// Whether any region-level predicate is active.
    #[must_use]
    pub fn has_region_predicates(&self) -> bool {
        self.selected_region.is_some()
            || self.min_vaccination_rate.is_some()
            || self.min_cases > 0
            || self.cases_only
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn defaults_have_no_active_predicates() {
        let state = FilterState::reset();
        assert_eq!(state.selected_region, None);
        assert_eq!(state.min_vaccination_rate, None);
        assert_eq!(state.min_cases, 0);
        assert!(!state.cases_only);
        assert_eq!(state.date_range, None);
        assert_eq!(state.age_group, None);
        assert_eq!(state.school_year, None);
        assert_eq!(state.vaccination_status, None);
        assert!(!state.has_region_predicates());
    }

    #[test]
    fn update_leaves_original_untouched() {
        let original = FilterState::reset();
        let updated = original.update(FilterUpdate::MinCases(5));
        assert_eq!(original.min_cases, 0);
        assert_eq!(updated.min_cases, 5);
        assert_ne!(original, updated);
    }

    #[test]
    fn reset_matches_defaults_after_any_history() {
        let busy = FilterState::reset().update_all([
            FilterUpdate::SelectedRegion(Some("Gaines, TX".into())),
            FilterUpdate::MinVaccinationRate(Some(0.9)),
            FilterUpdate::MinCases(3),
            FilterUpdate::CasesOnly(true),
            FilterUpdate::DateRange(Some(DateRange {
                start: Some(date(2025, 2, 1)),
                end: None,
            })),
            FilterUpdate::AgeGroup(Some("0-4 years".to_string())),
            FilterUpdate::SchoolYear(Some("2022-2023".to_string())),
            FilterUpdate::VaccinationStatus(Some(VaccinationStatus::OneDose)),
        ]);
        assert!(busy.has_region_predicates());
        assert_eq!(FilterState::reset(), FilterState::default());
        assert_ne!(busy, FilterState::reset());
    }

    #[test]
    fn equality_is_field_by_field() {
        let a = FilterState::reset().update(FilterUpdate::CasesOnly(true));
        let b = FilterState::reset().update(FilterUpdate::CasesOnly(true));
        assert_eq!(a, b);
        assert_ne!(a, b.update(FilterUpdate::AgeGroup(Some("5-17 years".to_string()))));
    }

    #[test]
    fn accepts_unvalidated_values() {
        let state = FilterState::reset().update(FilterUpdate::MinVaccinationRate(Some(7.5)));
        assert_eq!(state.min_vaccination_rate, Some(7.5));
    }

    #[test]
    fn date_range_is_inclusive_and_open_ended() {
        let range = DateRange {
            start: Some(date(2025, 2, 1)),
            end: Some(date(2025, 2, 28)),
        };
        assert!(range.contains(date(2025, 2, 1)));
        assert!(range.contains(date(2025, 2, 28)));
        assert!(!range.contains(date(2025, 3, 1)));
        assert!(DateRange::default().contains(date(1999, 1, 1)));
    }

    #[test]
    fn deserializes_partial_state_with_defaults() {
        let state: FilterState =
            serde_json::from_str(r#"{"selectedRegion": "Gaines County, TX", "casesOnly": true}"#)
                .unwrap();
        assert_eq!(
            state.selected_region,
            Some(RegionKey::Canonical("GAINES".to_string()))
        );
        assert!(state.cases_only);
        assert_eq!(state.min_cases, 0);
    }

    #[test]
    fn updates_round_trip_as_field_value_pairs() {
        let update: FilterUpdate =
            serde_json::from_str(r#"{"field": "minCases", "value": 10}"#).unwrap();
        assert_eq!(update, FilterUpdate::MinCases(10));
    }
}
