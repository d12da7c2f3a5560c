//! Vaccination coverage classification.

use outbreak_map_dataset_models::VaccinationRate;
use outbreak_map_view_models::{Band, LegendEntry};

/// Maps a coverage figure to its band.
///
/// Lower bounds are inclusive, so `0.95` is [`Band::VeryHigh`] and
/// anything below `0.75` (including negative figures) is [`Band::Low`].
/// Unknown and NaN figures are [`Band::NoData`].
#[must_use]
pub fn classify(rate: VaccinationRate) -> Band {
    let VaccinationRate::Known(rate) = rate else {
        return Band::NoData;
    };
    if rate.is_nan() {
        return Band::NoData;
    }

    Band::ALL
        .iter()
        .rev()
        .copied()
        .find(|band| band.lower_bound().is_some_and(|lower| rate >= lower))
        .unwrap_or(Band::Low)
}

/// Legend rows in band order, [`Band::NoData`] first.
#[must_use]
pub fn legend() -> Vec<LegendEntry> {
    Band::ALL
        .iter()
        .map(|&band| LegendEntry {
            band,
            label: band.label().to_string(),
            color: band.color().to_string(),
        })
        .collect()
}
