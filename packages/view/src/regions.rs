//! Region-level filtering.

use outbreak_map_dataset::{Datasets, Registry};
use outbreak_map_region_models::RegionKey;
use outbreak_map_view_models::{FilterState, RegionOption, VisibleRegion};

use crate::bands::classify;

/// Whether a region passes every active region predicate.
///
/// Predicates are conjunctive. Once a coverage threshold is set, regions
/// with unknown coverage fail it. Regions absent from the case dataset
/// count as zero cases.
pub(crate) fn passes(datasets: &Datasets, filter: &FilterState, key: &RegionKey) -> bool {
    if !key.is_valid() {
        return false;
    }
    if !filter.has_region_predicates() {
        return true;
    }
    if filter
        .selected_region
        .as_ref()
        .is_some_and(|selected| selected != key)
    {
        return false;
    }
    if let Some(min) = filter.min_vaccination_rate
        && datasets.vaccination_rate(key).value().is_none_or(|rate| rate < min)
    {
        return false;
    }

    let cases = datasets.case_count(key);
    cases >= filter.min_cases && (!filter.cases_only || cases > 0)
}

/// Display name for a key, falling back to the key itself.
pub(crate) fn name_of(datasets: &Datasets, key: &RegionKey) -> String {
    datasets
        .display_name(key)
        .unwrap_or_else(|| key.as_str())
        .to_string()
}

/// Regions passing the filter, in registry order.
///
/// Regions without a boundary shape are included.
#[must_use]
pub fn visible_regions(registry: &Registry, filter: &FilterState) -> Vec<VisibleRegion> {
    let datasets = registry.datasets();

    datasets
        .entities()
        .iter()
        .filter(|key| passes(datasets, filter, key))
        .map(|key| {
            let vaccination_rate = datasets.vaccination_rate(key);
            VisibleRegion {
                key: key.clone(),
                name: name_of(datasets, key),
                vaccination_rate,
                band: classify(vaccination_rate),
                cases: datasets.case_count(key),
            }
        })
        .collect()
}

/// Every selectable region, sorted by display name.
#[must_use]
pub fn region_options(registry: &Registry) -> Vec<RegionOption> {
    let datasets = registry.datasets();

    let mut options: Vec<RegionOption> = datasets
        .entities()
        .iter()
        .map(|key| RegionOption {
            key: key.clone(),
            name: name_of(datasets, key),
        })
        .collect();
    options.sort_by(|a, b| a.name.cmp(&b.name));
    options
}

/// School years the exemption dataset reports, oldest first.
#[must_use]
pub fn available_school_years(registry: &Registry) -> Vec<String> {
    registry.datasets().school_years().to_vec()
}

/// The school year exemption views use: the selected one, else the
/// latest available.
pub(crate) fn resolve_school_year(registry: &Registry, filter: &FilterState) -> Option<String> {
    filter
        .school_year
        .clone()
        .or_else(|| registry.datasets().latest_school_year().map(str::to_string))
}
