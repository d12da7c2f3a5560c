#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Load-once registry of outbreak datasets.
//!
//! Bundled datasets (vaccination coverage, case counts, exemption rates,
//! age buckets, vaccination status, case timelines) are embedded at
//! compile time and parsed synchronously. Region boundaries come from a
//! remote `GeoJSON` document; when that fetch fails the registry is still
//! usable and simply reports geography as unavailable.

pub mod boundaries;
pub mod bundled;
pub mod registry;
pub mod spatial;

pub use boundaries::BoundarySource;
pub use bundled::{Datasets, InvalidRecord};
pub use registry::{Geography, GeographyStatus, Registry};

use thiserror::Error;

/// Errors raised while parsing a bundled dataset.
///
/// Any of these is fatal for the dashboard: bundled data is part of the
/// build, so a failure means the embedded content is malformed.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The dataset is not valid JSON for its schema.
    #[error("Failed to parse {dataset} dataset: {source}")]
    Json {
        /// Dataset name.
        dataset: &'static str,
        /// Underlying parse error.
        source: serde_json::Error,
    },

    /// The dataset parsed but its content is unusable.
    #[error("Malformed {dataset} dataset: {message}")]
    Malformed {
        /// Dataset name.
        dataset: &'static str,
        /// Description of what went wrong.
        message: String,
    },
}

/// Errors raised while fetching the remote boundary document.
///
/// These never abort a load; the registry records them as
/// [`GeographyStatus::Unavailable`].
#[derive(Debug, Error)]
pub enum RemoteFetchError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("Boundary request failed with status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// The body is not a `GeoJSON` feature collection.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// Data conversion error.
    #[error("Conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}
