use std::fmt::Write as _;

use scene::components::RegionShape;

/// SVG path data for a screen-space shape: one `M … Z` subpath per ring,
/// with the closing duplicate point folded into the `Z`.
pub fn path_data(shape: &RegionShape) -> String {
    let mut out = String::new();
    for ring in &shape.rings {
        let mut points = ring.as_slice();
        if points.len() >= 2 && points.first() == points.last() {
            points = &points[..points.len() - 1];
        }
        if points.is_empty() {
            continue;
        }
        for (i, p) in points.iter().enumerate() {
            let cmd = if i == 0 { 'M' } else { 'L' };
            let _ = write!(out, "{}{},{}", cmd, fmt_coord(p.x), fmt_coord(p.y));
        }
        out.push('Z');
    }
    out
}

/// Fixed two-decimal coordinates, with the fraction dropped when zero.
fn fmt_coord(v: f64) -> String {
    let s = format!("{v:.2}");
    match s.strip_suffix(".00") {
        Some(head) => head.to_string(),
        None => s,
    }
}
