use formats::{GeoPoint, TopoRegion};
use foundation::projection::Mercator;
use scene::components::RegionShape;

/// Projects one region's geographic rings into a screen-space shape.
pub fn project_region(rings: &[Vec<GeoPoint>], projection: &Mercator) -> RegionShape {
    let rings = rings
        .iter()
        .map(|ring| {
            ring.iter()
                .map(|p| projection.project(p.lon_deg, p.lat_deg))
                .collect()
        })
        .collect();
    RegionShape::new(rings)
}

/// Undistorted screen-space baseline for a topology object, in region
/// order.
pub fn project_regions(regions: &[TopoRegion], projection: &Mercator) -> Vec<RegionShape> {
    regions
        .iter()
        .map(|r| project_region(&r.rings, projection))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::project_region;
    use formats::GeoPoint;
    use foundation::math::Vec2;
    use foundation::projection::Mercator;

    #[test]
    fn ring_structure_survives_projection() {
        let proj = Mercator::new(0.0, 0.0, 100.0, Vec2::new(0.0, 0.0));
        let rings = vec![vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(1.0, 0.0),
            GeoPoint::new(1.0, 1.0),
            GeoPoint::new(0.0, 0.0),
        ]];
        let shape = project_region(&rings, &proj);
        assert_eq!(shape.rings.len(), 1);
        assert_eq!(shape.rings[0].len(), 4);
        assert_eq!(shape.rings[0][0], Vec2::new(0.0, 0.0));
        assert_eq!(shape.rings[0].first(), shape.rings[0].last());
    }
}
