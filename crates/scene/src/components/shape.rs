use foundation::math::Vec2;

/// Screen-space outline of a region: outer ring first, holes after.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RegionShape {
    pub rings: Vec<Vec<Vec2>>,
}

impl RegionShape {
    pub fn new(rings: Vec<Vec<Vec2>>) -> Self {
        Self { rings }
    }

    pub fn is_empty(&self) -> bool {
        self.rings.iter().all(|r| r.is_empty())
    }

    /// Mean of the outer ring's points (ignoring the closing duplicate).
    pub fn centroid(&self) -> Vec2 {
        let Some(outer) = self.rings.first() else {
            return Vec2::new(0.0, 0.0);
        };
        let mut points: &[Vec2] = outer;
        if points.len() >= 2 && points.first() == points.last() {
            points = &points[..points.len() - 1];
        }
        if points.is_empty() {
            return Vec2::new(0.0, 0.0);
        }
        let mut sum = Vec2::new(0.0, 0.0);
        for p in points {
            sum = sum + *p;
        }
        sum * (1.0 / points.len() as f64)
    }

    /// Same ring count and per-ring point counts: the shapes can be
    /// interpolated pairwise.
    pub fn structure_matches(&self, other: &Self) -> bool {
        self.rings.len() == other.rings.len()
            && self
                .rings
                .iter()
                .zip(other.rings.iter())
                .all(|(a, b)| a.len() == b.len())
    }

    /// Scales every point about `origin` by `factor`.
    pub fn scaled_about(&self, origin: Vec2, factor: f64) -> Self {
        let rings = self
            .rings
            .iter()
            .map(|ring| {
                ring.iter()
                    .map(|p| origin + (*p - origin) * factor)
                    .collect()
            })
            .collect();
        Self { rings }
    }
}
