use foundation::time::{Time, TimeSpan};

use crate::components::{RegionShape, Rgba};

/// Attribute value that can be interpolated toward a target.
pub trait Animatable: Clone {
    /// Value at normalized progress `t` in (0, 1) between `self` and
    /// `target`.
    fn interpolate(&self, target: &Self, t: f64) -> Self;
}

impl Animatable for Rgba {
    fn interpolate(&self, target: &Self, t: f64) -> Self {
        self.lerp(*target, t)
    }
}

impl Animatable for RegionShape {
    fn interpolate(&self, target: &Self, t: f64) -> Self {
        if !self.structure_matches(target) {
            // No pairwise correspondence: snap to the target at the start
            // of the transition.
            return target.clone();
        }
        let rings = self
            .rings
            .iter()
            .zip(target.rings.iter())
            .map(|(a, b)| {
                a.iter()
                    .zip(b.iter())
                    .map(|(p, q)| p.lerp(*q, t))
                    .collect()
            })
            .collect();
        RegionShape { rings }
    }
}

/// A linearly-eased attribute transition.
///
/// Retargeting samples the current value as the new start, so a newer
/// write simply takes over from wherever the attribute happens to be
/// (last-write-wins per attribute).
#[derive(Debug, Clone, PartialEq)]
pub struct Transition<T: Animatable> {
    from: T,
    to: T,
    span: TimeSpan,
}

impl<T: Animatable> Transition<T> {
    /// A settled transition holding a single value.
    pub fn fixed(value: T) -> Self {
        Self {
            from: value.clone(),
            to: value,
            // Settled at any observable time.
            span: TimeSpan::instant(Time(f64::NEG_INFINITY)),
        }
    }

    pub fn target(&self) -> &T {
        &self.to
    }

    pub fn sample(&self, now: Time) -> T {
        let t = self.span.progress(now);
        if t <= 0.0 {
            self.from.clone()
        } else if t >= 1.0 {
            self.to.clone()
        } else {
            self.from.interpolate(&self.to, t)
        }
    }

    pub fn retarget(&mut self, target: T, now: Time, duration_s: f64) {
        self.from = self.sample(now);
        self.to = target;
        self.span = TimeSpan::starting_at(now, duration_s);
    }

    pub fn is_done(&self, now: Time) -> bool {
        self.span.progress(now) >= 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::Transition;
    use crate::components::{RegionShape, Rgba};
    use foundation::math::Vec2;
    use foundation::time::Time;

    #[test]
    fn samples_linearly_between_endpoints() {
        let mut t = Transition::fixed(Rgba::new(0, 0, 0));
        t.retarget(Rgba::new(100, 100, 100), Time(0.0), 1.0);
        assert_eq!(t.sample(Time(0.0)), Rgba::new(0, 0, 0));
        assert_eq!(t.sample(Time(0.5)), Rgba::new(50, 50, 50));
        assert_eq!(t.sample(Time(2.0)), Rgba::new(100, 100, 100));
        assert!(t.is_done(Time(1.0)));
    }

    #[test]
    fn retarget_starts_from_the_sampled_value() {
        let mut t = Transition::fixed(Rgba::new(0, 0, 0));
        t.retarget(Rgba::new(100, 0, 0), Time(0.0), 1.0);
        // Halfway through, a new target arrives.
        t.retarget(Rgba::new(0, 0, 0), Time(0.5), 1.0);
        assert_eq!(t.sample(Time(0.5)), Rgba::new(50, 0, 0));
        assert_eq!(t.sample(Time(1.5)), Rgba::new(0, 0, 0));
    }

    #[test]
    fn mismatched_shapes_snap_to_the_target() {
        let a = RegionShape::new(vec![vec![Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0)]]);
        let b = RegionShape::new(vec![vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
        ]]);
        let mut t = Transition::fixed(a);
        t.retarget(b.clone(), Time(0.0), 1.0);
        assert_eq!(t.sample(Time(0.25)), b);
    }

    #[test]
    fn matching_shapes_interpolate_pairwise() {
        let a = RegionShape::new(vec![vec![Vec2::new(0.0, 0.0), Vec2::new(2.0, 0.0)]]);
        let b = RegionShape::new(vec![vec![Vec2::new(0.0, 2.0), Vec2::new(4.0, 0.0)]]);
        let mut t = Transition::fixed(a);
        t.retarget(b, Time(0.0), 2.0);
        let mid = t.sample(Time(1.0));
        assert_eq!(mid.rings[0][0], Vec2::new(0.0, 1.0));
        assert_eq!(mid.rings[0][1], Vec2::new(3.0, 0.0));
    }
}
