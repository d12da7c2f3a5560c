//! Views that need region boundaries.

use geo::BoundingRect;
use outbreak_map_dataset::{Geography, GeographyStatus, Registry};
use outbreak_map_view_models::{
    Bounds, Emphasis, FilterState, MapDependent, MapFeature, MapLayer, RegionOption,
};

use crate::bands::classify;
use crate::regions::{name_of, passes};

/// Runs `derive` against the registry's boundaries, or reports why there
/// are none.
fn with_geography<T>(registry: &Registry, derive: impl FnOnce(&Geography) -> T) -> MapDependent<T> {
    match registry.geography_status() {
        GeographyStatus::Loaded(geography) => MapDependent::Available {
            view: derive(geography),
        },
        GeographyStatus::Unavailable { reason } => MapDependent::Unavailable {
            reason: format!("Geographic data unavailable: {reason}"),
        },
    }
}

/// One feature per boundary shape, with regions failing the filter
/// dimmed rather than dropped.
///
/// Bounds cover the features that are not dimmed.
#[must_use]
pub fn map_layer(registry: &Registry, filter: &FilterState) -> MapDependent<MapLayer> {
    let datasets = registry.datasets();

    with_geography(registry, |geography| {
        let suffix = geography
            .jurisdiction()
            .map(|jurisdiction| format!(", {}", jurisdiction.abbr))
            .unwrap_or_default();

        let mut bounds: Option<Bounds> = None;
        let features = geography
            .shapes()
            .iter()
            .map(|shape| {
                let vaccination_rate = datasets.vaccination_rate(&shape.key);
                let cases = datasets.case_count(&shape.key);
                let name = datasets
                    .display_name(&shape.key)
                    .map_or_else(|| shape.name.clone(), str::to_string);

                let emphasis = match (passes(datasets, filter, &shape.key), cases > 0) {
                    (false, _) => Emphasis::Dimmed,
                    (true, true) => Emphasis::Highlighted,
                    (true, false) => Emphasis::Normal,
                };

                if emphasis != Emphasis::Dimmed
                    && let Some(rect) = shape.polygon.bounding_rect()
                {
                    bounds = Some(extend(
                        bounds,
                        Bounds {
                            west: rect.min().x,
                            south: rect.min().y,
                            east: rect.max().x,
                            north: rect.max().y,
                        },
                    ));
                }

                MapFeature {
                    key: shape.key.clone(),
                    label: feature_label(&name, &suffix),
                    name,
                    vaccination_rate,
                    band: classify(vaccination_rate),
                    cases,
                    emphasis,
                }
            })
            .collect();

        MapLayer { features, bounds }
    })
}

/// The region under a point (longitude, latitude), if any.
#[must_use]
pub fn region_at(registry: &Registry, lng: f64, lat: f64) -> MapDependent<Option<RegionOption>> {
    let datasets = registry.datasets();

    with_geography(registry, |geography| {
        geography.region_at(lng, lat).map(|shape| RegionOption {
            key: shape.key.clone(),
            name: name_of(datasets, &shape.key),
        })
    })
}

/// `"Gaines"` becomes `"Gaines County, TX"`; a name that already ends in
/// "County" is not given a second one.
fn feature_label(name: &str, suffix: &str) -> String {
    let has_county = name
        .rsplit(' ')
        .next()
        .is_some_and(|word| word.eq_ignore_ascii_case("county"))
        && name.contains(' ');

    if has_county {
        format!("{name}{suffix}")
    } else {
        format!("{name} County{suffix}")
    }
}

fn extend(current: Option<Bounds>, next: Bounds) -> Bounds {
    current.map_or(next, |current| Bounds {
        west: current.west.min(next.west),
        south: current.south.min(next.south),
        east: current.east.max(next.east),
        north: current.north.max(next.north),
    })
}

#[cfg(test)]
mod tests {
    use outbreak_map_view_models::FilterUpdate;

    use super::*;
    use crate::fixtures::{degraded_registry, key, registry};
    use crate::{age_distribution, visible_regions};

    fn layer(filter: &FilterState) -> MapLayer {
        map_layer(&registry(), filter)
            .available()
            .expect("geography is loaded")
    }

    #[test]
    fn every_shape_becomes_a_feature() {
        let layer = layer(&FilterState::reset());
        assert_eq!(layer.features.len(), 2);

        let gaines = &layer.features[0];
        assert_eq!(gaines.key, key("GAINES"));
        assert_eq!(gaines.label, "Gaines County, TX");
        assert_eq!(gaines.cases, 57);
        assert_eq!(gaines.emphasis, Emphasis::Highlighted);

        let lubbock = &layer.features[1];
        assert_eq!(lubbock.emphasis, Emphasis::Normal);

        let bounds = layer.bounds.unwrap();
        assert!((bounds.west - -103.06).abs() < 1e-9);
        assert!((bounds.north - 33.82).abs() < 1e-9);
    }

    #[test]
    fn filtered_out_shapes_are_dimmed_and_leave_the_bounds() {
        let layer = layer(&FilterState::reset().update(FilterUpdate::CasesOnly(true)));
        assert_eq!(layer.features[1].emphasis, Emphasis::Dimmed);

        let bounds = layer.bounds.unwrap();
        assert!((bounds.east - -102.21).abs() < 1e-9);
        assert!((bounds.north - 33.0).abs() < 1e-9);
    }

    #[test]
    fn labels_never_repeat_the_county_word() {
        assert_eq!(feature_label("Gaines", ", TX"), "Gaines County, TX");
        assert_eq!(feature_label("Gaines County", ", TX"), "Gaines County, TX");
        assert_eq!(feature_label("Gaines county", ""), "Gaines county");
        assert_eq!(feature_label("County", ""), "County County");
    }

    #[test]
    fn nothing_visible_has_no_bounds() {
        let layer = layer(&FilterState::reset().update(FilterUpdate::MinCases(1_000)));
        assert!(layer.bounds.is_none());
        assert!(layer.features.iter().all(|f| f.emphasis == Emphasis::Dimmed));
    }

    #[test]
    fn finds_the_region_under_a_point() {
        let registry = registry();
        let hit = region_at(&registry, -102.6, 32.7).available().unwrap();
        assert_eq!(hit.map(|option| option.name).as_deref(), Some("Gaines"));

        let miss = region_at(&registry, -90.0, 40.0).available().unwrap();
        assert!(miss.is_none());
    }

    #[test]
    fn degraded_registry_marks_map_views_unavailable() {
        let registry = degraded_registry();
        let filter = FilterState::reset();

        let layer = map_layer(&registry, &filter);
        assert!(layer.is_unavailable());
        match layer {
            MapDependent::Unavailable { reason } => assert!(reason.contains("connection refused")),
            MapDependent::Available { .. } => unreachable!(),
        }
        assert!(region_at(&registry, -102.6, 32.7).is_unavailable());

        assert!(!visible_regions(&registry, &filter).is_empty());
        assert!(!age_distribution(&registry, &filter).is_empty());
    }
}
