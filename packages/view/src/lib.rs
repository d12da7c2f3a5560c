#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! View derivation engine.
//!
//! One pure function per visual need. Each takes the [`Registry`] and the
//! current [`FilterState`] and returns a fresh snapshot; nothing here
//! caches or mutates. Views that need region boundaries return
//! [`MapDependent::Unavailable`] when the registry is degraded.
//!
//! [`Registry`]: outbreak_map_dataset::Registry
//! [`FilterState`]: outbreak_map_view_models::FilterState
//! [`MapDependent::Unavailable`]: outbreak_map_view_models::MapDependent::Unavailable

pub mod bands;
pub mod map;
pub mod ranking;
pub mod regions;
pub mod summary;
pub mod timeline;

pub use bands::{classify, legend};
pub use map::{map_layer, region_at};
pub use ranking::top_ranked;
pub use regions::{available_school_years, region_options, visible_regions};
pub use summary::{age_distribution, vaccination_status};
pub use timeline::joined_timeline;

#[cfg(test)]
pub(crate) mod fixtures {
    use outbreak_map_dataset::bundled::BundledSources;
    use outbreak_map_dataset::{Datasets, Geography, GeographyStatus, Registry, boundaries};
    use outbreak_map_region_models::RegionKey;

    const VACCINATION_JSON: &str = r#"[
        {"county": "County Name", "percentage": "Percent Vaccinated"},
        {"county": "Gaines", "percentage": 0.82},
        {"county": "Lubbock", "percentage": 0.96},
        {"county": "Terry", "percentage": null},
        {"county": "Dawson", "percentage": 0.74},
        {"county": "Yoakum", "percentage": 0.90},
        {"county": "State", "percentage": 0.93}
    ]"#;

    const CASES_JSON: &str = r#"[
        {"county": "Gaines, TX", "cases": 57},
        {"county": "Terry, TX", "cases": 6},
        {"county": "Dawson, TX", "cases": 1},
        {"county": "Lubbock, TX", "cases": 0}
    ]"#;

    const EXEMPTIONS_JSON: &str = r#"[
        {"county": "Gaines", "2022-2023": 0.60, "2023-2024": 0.10},
        {"county": "Lubbock", "2022-2023": 0.02, "2023-2024": 0.50},
        {"county": "Terry", "2022-2023": 0.04, "2023-2024": 0.30},
        {"county": "Dawson", "2022-2023": 0.03, "2023-2024": 0.50}
    ]"#;

    const AGES_JSON: &str = r#"[
        {"age": "0-4 years", "cases": 29},
        {"age": "5-17 years", "cases": 28},
        {"age": "18+ years", "cases": 7}
    ]"#;

    const STATUS_JSON: &str =
        r#"{"notVaccinatedUnknown": 62, "vaccinated1Dose": 1, "vaccinated2Dose": 1}"#;

    const TIMELINES_JSON: &str = r#"[
        {"county": "Gaines, TX", "cases": [
            {"date": "2025-02-04", "case": 20},
            {"date": "2025-01-28", "case": 6}
        ]},
        {"county": "Terry, TX", "cases": [
            {"date": "02/04/2025", "case": 2},
            {"date": "2025-02-11", "case": 1}
        ]},
        {"county": "Lubbock, TX", "cases": [{"date": "2025-01-21", "case": 0}]}
    ]"#;

    pub const COUNTIES_GEOJSON: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "id": "48165",
             "properties": {"STATE": "48", "NAME": "Gaines"},
             "geometry": {"type": "Polygon", "coordinates": [[
                [-103.06, 32.52], [-102.21, 32.52], [-102.21, 33.0], [-103.06, 33.0], [-103.06, 32.52]
             ]]}},
            {"type": "Feature", "id": "48303",
             "properties": {"STATE": "48", "NAME": "Lubbock"},
             "geometry": {"type": "Polygon", "coordinates": [[
                [-102.08, 33.39], [-101.56, 33.39], [-101.56, 33.82], [-102.08, 33.82], [-102.08, 33.39]
             ]]}}
        ]
    }"#;

    pub fn key(name: &str) -> RegionKey {
        RegionKey::Canonical(name.to_string())
    }

    pub fn keys(names: &[&str]) -> Vec<RegionKey> {
        names.iter().map(|name| key(name)).collect()
    }

    fn datasets() -> Datasets {
        datasets_with_timelines(TIMELINES_JSON)
    }

    fn datasets_with_timelines(timelines: &str) -> Datasets {
        Datasets::parse(&BundledSources {
            vaccination: VACCINATION_JSON,
            cases: CASES_JSON,
            exemptions: EXEMPTIONS_JSON,
            age_buckets: AGES_JSON,
            vaccination_status: STATUS_JSON,
            timelines,
        })
        .unwrap()
    }

    /// Registry order: Gaines, Lubbock, Terry, Dawson, Yoakum.
    pub fn registry() -> Registry {
        let shapes = boundaries::parse(COUNTIES_GEOJSON, "48").unwrap();
        Registry::new(
            datasets(),
            GeographyStatus::Loaded(Geography::new("48", shapes)),
        )
    }

    /// The standard datasets with their timelines replaced.
    pub fn registry_with_timelines(timelines: &str) -> Registry {
        Registry::new(
            datasets_with_timelines(timelines),
            GeographyStatus::Unavailable {
                reason: "not needed".to_string(),
            },
        )
    }

    pub fn degraded_registry() -> Registry {
        Registry::new(
            datasets(),
            GeographyStatus::Unavailable {
                reason: "connection refused".to_string(),
            },
        )
    }
}
