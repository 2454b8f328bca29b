use foundation::bounds::Aabb2;
use geo::{BoundingRect, Centroid, Geometry, Intersects};

pub struct SpatialAnalysis;

impl SpatialAnalysis {
    /// Bounding box of a geometry, `None` for empty geometries.
    pub fn bounds(geom: &Geometry<f64>) -> Option<Aabb2> {
        let rect = geom.bounding_rect()?;
        Some(Aabb2::new(
            [rect.min().x, rect.min().y],
            [rect.max().x, rect.max().y],
        ))
    }

    /// Returns `[lon, lat]`.
    pub fn centroid_lon_lat(geom: &Geometry<f64>) -> Option<[f64; 2]> {
        let c = geom.centroid()?;
        Some([c.x(), c.y()])
    }

    /// Candidates whose bounding box intersects `target`.
    ///
    /// This is a coarse neighbourhood test: two regions whose boxes overlap
    /// are reported even when their outlines never touch. Entries for which
    /// `is_target` holds, and entries without a bounding box, are skipped.
    pub fn adjacent_by_bounds<'a, T>(
        target: &Aabb2,
        candidates: &'a [T],
        geometry_of: impl Fn(&T) -> &Geometry<f64>,
        is_target: impl Fn(&T) -> bool,
    ) -> Vec<&'a T> {
        candidates
            .iter()
            .filter(|c| !is_target(*c))
            .filter(|c| {
                Self::bounds(geometry_of(*c))
                    .map(|b| b.intersects(target))
                    .unwrap_or(false)
            })
            .collect()
    }

    /// Candidates whose geometry intersects `target` exactly.
    pub fn intersecting<'a, T>(
        target: &Geometry<f64>,
        candidates: &'a [T],
        geometry_of: impl Fn(&T) -> &Geometry<f64>,
    ) -> Vec<&'a T> {
        candidates
            .iter()
            .filter(|c| geometry_of(*c).intersects(target))
            .collect()
    }
}
