//! Jurisdiction-wide breakdowns that are not keyed by region.
//!
//! Region predicates do not apply here; only the age-group and
//! vaccination-status selections narrow these views.

use outbreak_map_dataset::Registry;
use outbreak_map_dataset_models::VaccinationStatus;
use outbreak_map_view_models::{AgeGroupCount, FilterState, StatusSlice};

/// Cases per age group, narrowed to the selected group if any.
#[must_use]
pub fn age_distribution(registry: &Registry, filter: &FilterState) -> Vec<AgeGroupCount> {
    registry
        .datasets()
        .age_buckets()
        .iter()
        .filter(|bucket| {
            filter
                .age_group
                .as_deref()
                .is_none_or(|group| group.trim() == bucket.label)
        })
        .map(|bucket| AgeGroupCount {
            label: bucket.label.clone(),
            cases: bucket.cases,
        })
        .collect()
}

/// Cases per vaccination status, narrowed to the selected status if any.
///
/// Shares are always relative to all cases, so a narrowed slice keeps
/// its share of the whole.
#[must_use]
pub fn vaccination_status(registry: &Registry, filter: &FilterState) -> Vec<StatusSlice> {
    let summary = registry.datasets().vaccination_status();
    let total = summary.total();

    VaccinationStatus::ALL
        .iter()
        .copied()
        .filter(|&status| filter.vaccination_status.is_none_or(|selected| selected == status))
        .map(|status| {
            let cases = summary.count(status);
            StatusSlice {
                status,
                label: status.label().to_string(),
                cases,
                share: share(cases, total),
            }
        })
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn share(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}
