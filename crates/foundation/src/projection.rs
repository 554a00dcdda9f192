use crate::math::Vec2;

/// Spherical Mercator projection with a configurable center, scale, and
/// screen translation.
///
/// Screen coordinates grow rightward/downward; the configured center lands
/// on the translate point.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Mercator {
    center_lon_deg: f64,
    center_lat_deg: f64,
    scale: f64,
    translate: Vec2,
}

impl Mercator {
    pub fn new(center_lon_deg: f64, center_lat_deg: f64, scale: f64, translate: Vec2) -> Self {
        Self {
            center_lon_deg,
            center_lat_deg,
            scale,
            translate,
        }
    }

    pub fn project(&self, lon_deg: f64, lat_deg: f64) -> Vec2 {
        let (cx, cy) = mercator_unit(self.center_lon_deg, self.center_lat_deg);
        let (x, y) = mercator_unit(lon_deg, lat_deg);
        Vec2::new(
            self.translate.x + self.scale * (x - cx),
            self.translate.y - self.scale * (y - cy),
        )
    }
}

impl Default for Mercator {
    fn default() -> Self {
        Self {
            center_lon_deg: 0.0,
            center_lat_deg: 0.0,
            scale: 150.0,
            translate: Vec2::new(480.0, 250.0),
        }
    }
}

fn mercator_unit(lon_deg: f64, lat_deg: f64) -> (f64, f64) {
    // Clamp latitude away from the poles where the Mercator y diverges.
    let lat = lat_deg.clamp(-85.0, 85.0).to_radians();
    let x = lon_deg.to_radians();
    let y = (std::f64::consts::FRAC_PI_4 + lat / 2.0).tan().ln();
    (x, y)
}

#[cfg(test)]
mod tests {
    use super::Mercator;
    use crate::math::Vec2;

    #[test]
    fn center_projects_to_translate() {
        let proj = Mercator::new(138.0, 36.0, 1000.0, Vec2::new(400.0, 250.0));
        let p = proj.project(138.0, 36.0);
        assert!((p.x - 400.0).abs() < 1e-9);
        assert!((p.y - 250.0).abs() < 1e-9);
    }

    #[test]
    fn east_is_right_and_north_is_up() {
        let proj = Mercator::new(0.0, 0.0, 100.0, Vec2::new(0.0, 0.0));
        let east = proj.project(10.0, 0.0);
        let north = proj.project(0.0, 10.0);
        assert!(east.x > 0.0);
        assert_eq!(east.y, 0.0);
        assert_eq!(north.x, 0.0);
        assert!(north.y < 0.0);
    }

    #[test]
    fn scale_is_linear_in_screen_space() {
        let small = Mercator::new(0.0, 0.0, 100.0, Vec2::new(0.0, 0.0));
        let large = Mercator::new(0.0, 0.0, 200.0, Vec2::new(0.0, 0.0));
        let a = small.project(5.0, 5.0);
        let b = large.project(5.0, 5.0);
        assert!((b.x - 2.0 * a.x).abs() < 1e-9);
        assert!((b.y - 2.0 * a.y).abs() < 1e-9);
    }
}
