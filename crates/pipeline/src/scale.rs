use scene::components::Rgba;

/// Fill used for the undistorted view and for values the color scale
/// cannot place (NaN).
pub const NEUTRAL_FILL: Rgba = Rgba::new(0xfa, 0xfa, 0xfa);

/// Distortion weights must be strictly positive, so the value domain maps
/// onto this range regardless of the sign of the underlying field.
pub const WEIGHT_RANGE: (f64, f64) = (1.0, 1000.0);

/// Affine map from a value domain onto a target range.
///
/// Inputs outside the domain extrapolate linearly; a degenerate domain
/// collapses onto the start of the range.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn map(&self, v: f64) -> f64 {
        if v.is_nan() {
            return f64::NAN;
        }
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d0 == d1 {
            return r0;
        }
        r0 + (v - d0) / (d1 - d0) * (r1 - r0)
    }
}

// The nine-stop blues ramp, lightest to darkest.
const BLUES: [Rgba; 9] = [
    Rgba::new(0xf7, 0xfb, 0xff),
    Rgba::new(0xde, 0xeb, 0xf7),
    Rgba::new(0xc6, 0xdb, 0xef),
    Rgba::new(0x9e, 0xca, 0xe1),
    Rgba::new(0x6b, 0xae, 0xd6),
    Rgba::new(0x42, 0x92, 0xc6),
    Rgba::new(0x21, 0x71, 0xb5),
    Rgba::new(0x08, 0x51, 0x9c),
    Rgba::new(0x08, 0x30, 0x6b),
];

/// Sequential blue-hued color scale over a value domain.
///
/// Out-of-domain inputs clamp to the endpoint colors; NaN yields `None`
/// so callers can substitute the neutral fill.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SequentialBlues {
    lo: f64,
    hi: f64,
}

impl SequentialBlues {
    pub fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    pub fn color(&self, v: f64) -> Option<Rgba> {
        if v.is_nan() {
            return None;
        }
        let t = if self.lo == self.hi {
            // Single-value domain: every region sits mid-ramp.
            0.5
        } else {
            ((v - self.lo) / (self.hi - self.lo)).clamp(0.0, 1.0)
        };
        Some(ramp(t))
    }
}

fn ramp(t: f64) -> Rgba {
    let scaled = t * (BLUES.len() - 1) as f64;
    let i = (scaled.floor() as usize).min(BLUES.len() - 2);
    BLUES[i].lerp(BLUES[i + 1], scaled - i as f64)
}

#[cfg(test)]
mod tests {
    use super::{LinearScale, SequentialBlues, WEIGHT_RANGE};
    use scene::components::Rgba;

    #[test]
    fn linear_scale_maps_and_extrapolates() {
        let s = LinearScale::new((10.0, 30.0), WEIGHT_RANGE);
        assert_eq!(s.map(10.0), 1.0);
        assert_eq!(s.map(30.0), 1000.0);
        assert_eq!(s.map(20.0), 500.5);
        // Outside the domain the map keeps going linearly.
        assert_eq!(s.map(40.0), 1499.5);
        assert!(s.map(f64::NAN).is_nan());
    }

    #[test]
    fn degenerate_domain_collapses_to_range_start() {
        let s = LinearScale::new((5.0, 5.0), (1.0, 1000.0));
        assert_eq!(s.map(5.0), 1.0);
        assert_eq!(s.map(99.0), 1.0);
    }

    #[test]
    fn blues_hits_the_ramp_endpoints() {
        let c = SequentialBlues::new(10.0, 30.0);
        assert_eq!(c.color(10.0), Some(Rgba::new(0xf7, 0xfb, 0xff)));
        assert_eq!(c.color(30.0), Some(Rgba::new(0x08, 0x30, 0x6b)));
    }

    #[test]
    fn out_of_domain_clamps_and_nan_is_none() {
        let c = SequentialBlues::new(10.0, 30.0);
        assert_eq!(c.color(-100.0), c.color(10.0));
        assert_eq!(c.color(1e9), c.color(30.0));
        assert_eq!(c.color(f64::NAN), None);
    }

    #[test]
    fn single_value_domain_sits_mid_ramp() {
        let c = SequentialBlues::new(7.0, 7.0);
        let mid = c.color(7.0).unwrap();
        assert_eq!(mid, c.color(123.0).unwrap());
        // Midway along the ramp, not at either endpoint.
        assert_ne!(mid, Rgba::new(0xf7, 0xfb, 0xff));
        assert_ne!(mid, Rgba::new(0x08, 0x30, 0x6b));
    }
}
