use scene::components::RegionShape;

/// The geometry distortion seam.
///
/// Contract:
/// - `weights` holds one strictly-positive weight per shape, in shape
///   order.
/// - Output shapes keep the input's ring/point structure so transitions
///   can interpolate pairwise.
/// - All-equal weights (the "no relative scaling" call, conventionally
///   all ones) return the input shapes unchanged.
///
/// The algorithm behind the trait is replaceable without touching the
/// render pipeline.
pub trait Distortion {
    fn distort(&self, shapes: &[RegionShape], weights: &[f64]) -> Vec<RegionShape>;
}

/// Bundled engine: scales each region about its own centroid so that its
/// area is proportional to its weight relative to the mean weight.
#[derive(Debug, Copy, Clone, Default)]
pub struct AreaScaling;

impl Distortion for AreaScaling {
    fn distort(&self, shapes: &[RegionShape], weights: &[f64]) -> Vec<RegionShape> {
        debug_assert_eq!(shapes.len(), weights.len());
        if shapes.is_empty() || weights.windows(2).all(|w| w[0] == w[1]) {
            return shapes.to_vec();
        }

        let mean = weights.iter().sum::<f64>() / weights.len() as f64;
        shapes
            .iter()
            .zip(weights.iter())
            .map(|(shape, w)| {
                // Area scales with the square of the linear factor.
                let factor = (w / mean).sqrt();
                if factor.is_finite() && factor > 0.0 {
                    shape.scaled_about(shape.centroid(), factor)
                } else {
                    shape.clone()
                }
            })
            .collect()
    }
}
