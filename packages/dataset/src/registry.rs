//! The dataset registry: bundled datasets plus best-effort geography.
//!
//! A [`Registry`] is immutable once built. Bundled datasets must load or
//! the whole load fails; the boundary fetch may fail and only degrades
//! the map-dependent views. Retrying geography builds a new registry that
//! shares the already-loaded bundled datasets.

use std::collections::BTreeMap;
use std::sync::Arc;

use outbreak_map_dataset_models::GeographicShape;
use outbreak_map_region_models::{RegionKey, jurisdiction};

use crate::LoadError;
use crate::boundaries::{self, BoundarySource};
use crate::bundled::Datasets;
use crate::spatial::ShapeIndex;

/// Region boundaries for one jurisdiction.
#[derive(Debug, Clone)]
pub struct Geography {
    jurisdiction_code: String,
    shapes: Vec<GeographicShape>,
    by_key: BTreeMap<RegionKey, usize>,
    index: ShapeIndex,
}

impl Geography {
    /// Indexes a set of shapes. When two shapes share a key the first
    /// one is kept for key lookups.
    #[must_use]
    pub fn new(jurisdiction_code: impl Into<String>, shapes: Vec<GeographicShape>) -> Self {
        let mut by_key = BTreeMap::new();
        for (position, shape) in shapes.iter().enumerate() {
            if by_key.contains_key(&shape.key) {
                log::warn!("Duplicate boundary for {}; keeping the first", shape.key);
            } else {
                by_key.insert(shape.key.clone(), position);
            }
        }
        let index = ShapeIndex::build(&shapes);

        Self {
            jurisdiction_code: jurisdiction_code.into(),
            shapes,
            by_key,
            index,
        }
    }

    /// FIPS code the shapes were filtered to.
    #[must_use]
    pub fn jurisdiction_code(&self) -> &str {
        &self.jurisdiction_code
    }

    /// The jurisdiction the shapes belong to, if the code is known.
    #[must_use]
    pub fn jurisdiction(&self) -> Option<&'static jurisdiction::Jurisdiction> {
        jurisdiction::by_fips(&self.jurisdiction_code)
    }

    /// All retained shapes, in source order.
    #[must_use]
    pub fn shapes(&self) -> &[GeographicShape] {
        &self.shapes
    }

    /// The boundary of a region, if the source has one.
    #[must_use]
    pub fn shape(&self, key: &RegionKey) -> Option<&GeographicShape> {
        self.by_key
            .get(key)
            .and_then(|&position| self.shapes.get(position))
    }

    /// The region containing a point (longitude, latitude).
    #[must_use]
    pub fn region_at(&self, lng: f64, lat: f64) -> Option<&GeographicShape> {
        self.index
            .locate(&self.shapes, lng, lat)
            .and_then(|position| self.shapes.get(position))
    }
}

/// Outcome of the boundary fetch.
#[derive(Debug, Clone)]
pub enum GeographyStatus {
    /// Boundaries fetched and indexed.
    Loaded(Geography),
    /// The fetch failed; map-dependent views report "unavailable".
    Unavailable {
        /// Why the boundaries could not be loaded.
        reason: String,
    },
}

/// Immutable snapshot of every dataset for the session.
#[derive(Debug, Clone)]
pub struct Registry {
    datasets: Arc<Datasets>,
    geography: Arc<GeographyStatus>,
}

impl Registry {
    /// Loads the bundled datasets, then fetches region boundaries.
    ///
    /// A failed boundary fetch does not fail the load; the returned
    /// registry is degraded instead.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if any bundled dataset is malformed.
    pub async fn load(
        client: &reqwest::Client,
        source: &BoundarySource,
    ) -> Result<Self, LoadError> {
        let datasets = Datasets::load_embedded()?;
        let geography = load_geography(client, source).await;

        Ok(Self::new(datasets, geography))
    }

    /// Builds a registry from already loaded parts.
    #[must_use]
    pub fn new(datasets: Datasets, geography: GeographyStatus) -> Self {
        Self {
            datasets: Arc::new(datasets),
            geography: Arc::new(geography),
        }
    }

    /// Re-runs only the boundary fetch, keeping the bundled datasets.
    ///
    /// The current registry is left untouched.
    pub async fn reload_geography(
        &self,
        client: &reqwest::Client,
        source: &BoundarySource,
    ) -> Self {
        Self {
            datasets: Arc::clone(&self.datasets),
            geography: Arc::new(load_geography(client, source).await),
        }
    }

    /// The bundled datasets.
    #[must_use]
    pub fn datasets(&self) -> &Datasets {
        &self.datasets
    }

    /// The boundary fetch outcome.
    #[must_use]
    pub fn geography_status(&self) -> &GeographyStatus {
        &self.geography
    }

    /// Region boundaries, unless the fetch failed.
    #[must_use]
    pub fn geography(&self) -> Option<&Geography> {
        match self.geography.as_ref() {
            GeographyStatus::Loaded(geography) => Some(geography),
            GeographyStatus::Unavailable { .. } => None,
        }
    }

    /// Whether map-dependent views are unavailable.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.geography().is_none()
    }

    /// Whether two registries share the same bundled dataset snapshot.
    #[must_use]
    pub fn shares_datasets_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.datasets, &other.datasets)
    }
}

async fn load_geography(client: &reqwest::Client, source: &BoundarySource) -> GeographyStatus {
    match boundaries::fetch(client, source).await {
        Ok(shapes) => GeographyStatus::Loaded(Geography::new(&source.jurisdiction_code, shapes)),
        Err(e) => {
            log::warn!("Geographic data unavailable: {e}");
            GeographyStatus::Unavailable {
                reason: e.to_string(),
            }
        }
    }
}
