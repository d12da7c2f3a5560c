//! Remote region boundary fetcher.
//!
//! Fetches a `GeoJSON` `FeatureCollection` of county polygons for the
//! whole country and keeps only the features tagged with the configured
//! jurisdiction code.

use geojson::{Feature, FeatureCollection, GeoJson};
use outbreak_map_dataset_models::GeographicShape;
use outbreak_map_region_models::normalize;
use serde::{Deserialize, Serialize};

use crate::RemoteFetchError;

/// Property holding the two-digit state FIPS code of a feature.
const JURISDICTION_PROPERTY: &str = "STATE";

/// Property holding the region name of a feature.
const NAME_PROPERTY: &str = "NAME";

/// Where region boundaries come from and which jurisdiction to keep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundarySource {
    /// URL of a `GeoJSON` `FeatureCollection`.
    pub url: String,
    /// Two-digit FIPS code of the jurisdiction to retain (e.g. `"48"`).
    pub jurisdiction_code: String,
}

/// Fetches and filters region boundaries.
///
/// The core imposes no timeout; configure one on `client` if needed.
///
/// # Errors
///
/// Returns [`RemoteFetchError`] if the request fails, the server answers
/// with a non-success status, or the body is not a usable feature
/// collection.
pub async fn fetch(
    client: &reqwest::Client,
    source: &BoundarySource,
) -> Result<Vec<GeographicShape>, RemoteFetchError> {
    log::info!(
        "Fetching region boundaries for jurisdiction {} from {}",
        source.jurisdiction_code,
        source.url
    );

    let resp = client.get(&source.url).send().await?;
    if !resp.status().is_success() {
        return Err(RemoteFetchError::Status {
            status: resp.status().as_u16(),
        });
    }
    let body = resp.text().await?;

    parse(&body, &source.jurisdiction_code)
}

/// Parses a boundary document and keeps the jurisdiction's features.
///
/// Features without a name or without polygon geometry are skipped with
/// a warning; they cannot be joined to any dataset.
///
/// # Errors
///
/// Returns [`RemoteFetchError`] if the body is not a `GeoJSON`
/// `FeatureCollection`, or if no feature carries a jurisdiction code.
pub fn parse(
    body: &str,
    jurisdiction_code: &str,
) -> Result<Vec<GeographicShape>, RemoteFetchError> {
    let geojson: GeoJson = body.parse()?;
    let collection = FeatureCollection::try_from(geojson)?;
    let total = collection.features.len();

    if total > 0
        && !collection
            .features
            .iter()
            .any(|feature| feature.contains_property(JURISDICTION_PROPERTY))
    {
        return Err(RemoteFetchError::Conversion {
            message: format!("No feature carries a {JURISDICTION_PROPERTY} property"),
        });
    }

    let shapes: Vec<GeographicShape> = collection
        .features
        .into_iter()
        .filter(|feature| jurisdiction_of(feature) == Some(jurisdiction_code))
        .filter_map(to_shape)
        .collect();

    log::info!(
        "Retained {} of {total} boundary features for jurisdiction {jurisdiction_code}",
        shapes.len()
    );
    if shapes.is_empty() {
        log::warn!("No boundary features matched jurisdiction {jurisdiction_code}");
    }

    Ok(shapes)
}

fn jurisdiction_of(feature: &Feature) -> Option<&str> {
    feature
        .property(JURISDICTION_PROPERTY)
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
}

fn to_shape(feature: Feature) -> Option<GeographicShape> {
    let name = feature
        .property(NAME_PROPERTY)
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .unwrap_or_default()
        .to_string();

    let key = normalize(&name);
    if !key.is_valid() {
        log::warn!("Skipping boundary feature {:?} without a name", feature.id);
        return None;
    }

    let Some(geometry) = feature.geometry else {
        log::warn!("Skipping boundary feature {name} without geometry");
        return None;
    };

    let polygon = match geo::Geometry::<f64>::try_from(geometry.clone()) {
        Ok(geo::Geometry::MultiPolygon(multi)) => multi,
        Ok(geo::Geometry::Polygon(single)) => geo::MultiPolygon(vec![single]),
        Ok(_) | Err(_) => {
            log::warn!("Skipping boundary feature {name}: geometry is not a polygon");
            return None;
        }
    };

    let mut properties = feature.properties.unwrap_or_default();
    properties.remove(NAME_PROPERTY);

    Some(GeographicShape {
        key,
        name,
        geometry,
        polygon,
        properties,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub const COUNTIES_GEOJSON: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "id": "48165",
             "properties": {"STATE": "48", "COUNTY": "165", "NAME": "Gaines"},
             "geometry": {"type": "Polygon", "coordinates": [[
                [-103.06, 32.52], [-102.21, 32.52], [-102.21, 33.0], [-103.06, 33.0], [-103.06, 32.52]
             ]]}},
            {"type": "Feature", "id": "48303",
             "properties": {"STATE": "48", "COUNTY": "303", "NAME": "Lubbock"},
             "geometry": {"type": "MultiPolygon", "coordinates": [[[
                [-102.08, 33.39], [-101.56, 33.39], [-101.56, 33.82], [-102.08, 33.82], [-102.08, 33.39]
             ]]]}},
            {"type": "Feature", "id": "48999",
             "properties": {"STATE": "48", "NAME": "  "},
             "geometry": {"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]]}},
            {"type": "Feature", "id": "48998",
             "properties": {"STATE": "48", "NAME": "Nowhere"},
             "geometry": {"type": "Point", "coordinates": [0, 0]}},
            {"type": "Feature", "id": "35025",
             "properties": {"STATE": "35", "NAME": "Lea"},
             "geometry": {"type": "Polygon", "coordinates": [[
                [-103.8, 32.0], [-103.06, 32.0], [-103.06, 33.57], [-103.8, 33.57], [-103.8, 32.0]
             ]]}}
        ]
    }"#;

    #[test]
    fn keeps_only_jurisdiction_polygons() {
        let shapes = parse(COUNTIES_GEOJSON, "48").unwrap();
        let names: Vec<&str> = shapes.iter().map(|shape| shape.name.as_str()).collect();
        assert_eq!(names, ["Gaines", "Lubbock"]);
        assert_eq!(shapes[0].key.as_str(), "GAINES");
        assert_eq!(shapes[1].polygon.0.len(), 1);
    }

    #[test]
    fn keeps_remaining_properties() {
        let shapes = parse(COUNTIES_GEOJSON, "48").unwrap();
        assert_eq!(
            shapes[0].properties.get("COUNTY"),
            Some(&serde_json::json!("165"))
        );
        assert!(!shapes[0].properties.contains_key(NAME_PROPERTY));
    }

    #[test]
    fn other_jurisdictions_filter_differently() {
        let shapes = parse(COUNTIES_GEOJSON, "35").unwrap();
        assert_eq!(shapes.len(), 1);
        assert_eq!(shapes[0].name, "Lea");
    }

    #[test]
    fn unmatched_jurisdiction_is_empty_not_an_error() {
        assert!(parse(COUNTIES_GEOJSON, "06").unwrap().is_empty());
    }

    #[test]
    fn rejects_non_geojson() {
        assert!(matches!(
            parse("<html>rate limited</html>", "48"),
            Err(RemoteFetchError::GeoJson(_))
        ));
    }

    #[test]
    fn rejects_documents_without_jurisdiction_codes() {
        let body = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {"NAME": "Gaines"}, "geometry": null}
        ]}"#;
        assert!(matches!(
            parse(body, "48"),
            Err(RemoteFetchError::Conversion { .. })
        ));
    }

    #[tokio::test]
    async fn unreachable_source_is_an_http_error() {
        let source = BoundarySource {
            url: "http://127.0.0.1:9/counties.json".to_string(),
            jurisdiction_code: "48".to_string(),
        };
        let result = fetch(&reqwest::Client::new(), &source).await;
        assert!(matches!(result, Err(RemoteFetchError::Http(_))));
    }
}
