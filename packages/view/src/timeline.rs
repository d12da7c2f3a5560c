//! Case timelines aligned to a shared date axis.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use outbreak_map_dataset::Registry;
use outbreak_map_view_models::{FilterState, JoinedTimeline, TimelineSeries};

use crate::regions::{name_of, passes};

/// Joins the timelines of every region passing the filter.
///
/// The axis is the sorted union of observation dates inside the filter's
/// date range. Every series has one count per axis date, with zero where
/// the region reported nothing. Repeated observations for the same date
/// are summed.
#[must_use]
pub fn joined_timeline(registry: &Registry, filter: &FilterState) -> JoinedTimeline {
    let datasets = registry.datasets();
    let in_range = |date: NaiveDate| filter.date_range.is_none_or(|range| range.contains(date));

    let per_region: Vec<_> = datasets
        .timelines()
        .iter()
        .filter(|record| passes(datasets, filter, &record.key))
        .map(|record| {
            let mut by_date: BTreeMap<NaiveDate, u64> = BTreeMap::new();
            for observation in &record.observations {
                if in_range(observation.date) {
                    *by_date.entry(observation.date).or_default() += observation.cases;
                }
            }
            (record, by_date)
        })
        .collect();

    let dates: Vec<NaiveDate> = per_region
        .iter()
        .flat_map(|(_, by_date)| by_date.keys().copied())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let series = per_region
        .into_iter()
        .map(|(record, by_date)| TimelineSeries {
            key: record.key.clone(),
            name: name_of(datasets, &record.key),
            counts: dates
                .iter()
                .map(|date| by_date.get(date).copied().unwrap_or(0))
                .collect(),
        })
        .collect::<Vec<_>>();

    log::debug!(
        "Joined {} timelines over {} dates",
        series.len(),
        dates.len()
    );

    JoinedTimeline { dates, series }
}
