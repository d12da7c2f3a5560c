//! R-tree index over region boundaries for point lookups.

use geo::{BoundingRect, Contains, MultiPolygon};
use outbreak_map_dataset_models::GeographicShape;
use rstar::{AABB, RTree, RTreeObject};

/// Envelope of one shape, pointing back into the shape list.
#[derive(Debug, Clone)]
struct IndexedShape {
    position: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedShape {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Spatial index built once over a fixed list of shapes.
#[derive(Clone)]
pub struct ShapeIndex {
    tree: RTree<IndexedShape>,
}

impl std::fmt::Debug for ShapeIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShapeIndex")
            .field("len", &self.tree.size())
            .finish()
    }
}

impl ShapeIndex {
    /// Bulk-loads an index over `shapes`. Positions returned by
    /// [`Self::locate`] refer to this slice.
    #[must_use]
    pub fn build(shapes: &[GeographicShape]) -> Self {
        let entries = shapes
            .iter()
            .enumerate()
            .filter_map(|(position, shape)| {
                envelope_of(&shape.polygon).map(|envelope| IndexedShape { position, envelope })
            })
            .collect();

        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// Finds the shape containing a point.
    ///
    /// Counties tile the jurisdiction without overlap, so the first match
    /// wins.
    #[must_use]
    pub fn locate(&self, shapes: &[GeographicShape], lng: f64, lat: f64) -> Option<usize> {
        let point = geo::Point::new(lng, lat);
        let query_env = AABB::from_point([lng, lat]);

        self.tree
            .locate_in_envelope_intersecting(&query_env)
            .map(|entry| entry.position)
            .find(|&position| {
                shapes
                    .get(position)
                    .is_some_and(|shape| shape.polygon.contains(&point))
            })
    }

    /// Number of indexed shapes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Whether the index holds no shapes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

/// Bounding box of a polygon set as an R-tree envelope. Empty polygon
/// sets have none.
fn envelope_of(polygon: &MultiPolygon<f64>) -> Option<AABB<[f64; 2]>> {
    polygon.bounding_rect().map(|rect| {
        AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y])
    })
}
