//! Top-N leaderboards.

use std::cmp::Ordering;

use outbreak_map_dataset::{Datasets, Registry};
use outbreak_map_region_models::RegionKey;
use outbreak_map_view_models::{FilterState, RankField, RankedRegion, Ranking, SortOrder};

use crate::regions::{name_of, passes, resolve_school_year};

/// The first `n` regions passing the filter, sorted by `field`.
///
/// The sort is stable: ties keep registry order. Regions without a value
/// for the field sort after every region that has one, in either order.
/// Exemption rankings use the filter's school year, or the latest one, and
/// only cover regions the exemption dataset lists.
#[must_use]
pub fn top_ranked(
    registry: &Registry,
    filter: &FilterState,
    n: usize,
    field: RankField,
    order: SortOrder,
) -> Ranking {
    let datasets = registry.datasets();
    let school_year = match field {
        RankField::ExemptionRate => resolve_school_year(registry, filter),
        RankField::VaccinationRate | RankField::Cases => None,
    };

    let mut entries: Vec<RankedRegion> = datasets
        .entities()
        .iter()
        .filter(|key| passes(datasets, filter, key))
        .filter(|key| field != RankField::ExemptionRate || datasets.exemption(key).is_some())
        .map(|key| RankedRegion {
            key: key.clone(),
            name: name_of(datasets, key),
            value: value_of(datasets, key, field, school_year.as_deref()),
        })
        .collect();

    entries.sort_by(|a, b| compare(a.value, b.value, order));
    entries.truncate(n);

    Ranking {
        field,
        order,
        school_year,
        entries,
    }
}

#[allow(clippy::cast_precision_loss)]
fn value_of(
    datasets: &Datasets,
    key: &RegionKey,
    field: RankField,
    school_year: Option<&str>,
) -> Option<f64> {
    match field {
        RankField::ExemptionRate => school_year
            .and_then(|year| datasets.exemption(key).and_then(|record| record.rate(year))),
        RankField::VaccinationRate => datasets.vaccination_rate(key).value(),
        RankField::Cases => Some(datasets.case_count(key) as f64),
    }
}

fn compare(a: Option<f64>, b: Option<f64>, order: SortOrder) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => match order {
            SortOrder::Asc => a.total_cmp(&b),
            SortOrder::Desc => b.total_cmp(&a),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
