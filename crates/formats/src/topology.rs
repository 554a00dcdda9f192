use std::collections::BTreeMap;

use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct GeoPoint {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

impl GeoPoint {
    pub fn new(lon_deg: f64, lat_deg: f64) -> Self {
        Self { lon_deg, lat_deg }
    }
}

/// One areal region of a topology object: its property bag plus its rings
/// resolved to geographic coordinates (outer ring first, holes after).
#[derive(Debug, Clone, PartialEq)]
pub struct TopoRegion {
    pub properties: Map<String, Value>,
    pub rings: Vec<Vec<GeoPoint>>,
}

impl TopoRegion {
    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(|v| v.as_str())
    }
}

/// A decoded TopoJSON topology, reduced to its areal regions.
///
/// Arcs are resolved eagerly: quantized topologies are de-quantized through
/// their transform and delta-decoded, and geometry arc references (including
/// `~i` complements) are stitched into closed rings. Non-areal geometries
/// (points, lines) are skipped.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Topology {
    objects: BTreeMap<String, Vec<TopoRegion>>,
}

#[derive(Debug)]
pub enum TopologyError {
    Json(String),
    NotATopology,
    InvalidTransform(String),
    InvalidArc { index: usize, reason: String },
    InvalidGeometry { object: String, reason: String },
}

impl std::fmt::Display for TopologyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TopologyError::Json(reason) => write!(f, "topology JSON error: {reason}"),
            TopologyError::NotATopology => write!(f, "expected a TopoJSON Topology"),
            TopologyError::InvalidTransform(reason) => {
                write!(f, "invalid topology transform: {reason}")
            }
            TopologyError::InvalidArc { index, reason } => {
                write!(f, "invalid arc at index {index}: {reason}")
            }
            TopologyError::InvalidGeometry { object, reason } => {
                write!(f, "invalid geometry in object {object:?}: {reason}")
            }
        }
    }
}

impl std::error::Error for TopologyError {}

impl Topology {
    pub fn from_json_str(payload: &str) -> Result<Self, TopologyError> {
        let value: Value = serde_json::from_str(payload)
            .map_err(|e| TopologyError::Json(e.to_string()))?;
        Self::from_json_value(value)
    }

    pub fn from_json_value(value: Value) -> Result<Self, TopologyError> {
        let obj = value.as_object().ok_or(TopologyError::NotATopology)?;
        let ty = obj
            .get("type")
            .and_then(|v| v.as_str())
            .ok_or(TopologyError::NotATopology)?;
        if ty != "Topology" {
            return Err(TopologyError::NotATopology);
        }

        let transform = match obj.get("transform") {
            Some(t) => Some(parse_transform(t)?),
            None => None,
        };

        let arcs_val = obj
            .get("arcs")
            .and_then(|v| v.as_array())
            .ok_or(TopologyError::NotATopology)?;
        let mut arcs: Vec<Vec<GeoPoint>> = Vec::with_capacity(arcs_val.len());
        for (index, arc_val) in arcs_val.iter().enumerate() {
            arcs.push(decode_arc(arc_val, transform.as_ref(), index)?);
        }

        let mut objects = BTreeMap::new();
        if let Some(objects_val) = obj.get("objects").and_then(|v| v.as_object()) {
            for (name, geom) in objects_val {
                let mut regions = Vec::new();
                collect_regions(name, geom, &arcs, &mut regions)?;
                objects.insert(name.clone(), regions);
            }
        }

        Ok(Self { objects })
    }

    pub fn object(&self, name: &str) -> Option<&[TopoRegion]> {
        self.objects.get(name).map(|v| v.as_slice())
    }

    pub fn object_names(&self) -> impl Iterator<Item = &str> {
        self.objects.keys().map(|s| s.as_str())
    }

    /// The first object in name order; convenient for single-object files.
    pub fn first_object(&self) -> Option<(&str, &[TopoRegion])> {
        self.objects
            .iter()
            .next()
            .map(|(name, regions)| (name.as_str(), regions.as_slice()))
    }
}

#[derive(Debug, Copy, Clone)]
struct Transform {
    scale: (f64, f64),
    translate: (f64, f64),
}

fn parse_transform(value: &Value) -> Result<Transform, TopologyError> {
    let obj = value
        .as_object()
        .ok_or_else(|| TopologyError::InvalidTransform("transform must be an object".into()))?;
    let pair = |key: &str| -> Result<(f64, f64), TopologyError> {
        let arr = obj.get(key).and_then(|v| v.as_array()).ok_or_else(|| {
            TopologyError::InvalidTransform(format!("transform missing {key} pair"))
        })?;
        match (
            arr.first().and_then(|v| v.as_f64()),
            arr.get(1).and_then(|v| v.as_f64()),
        ) {
            (Some(a), Some(b)) => Ok((a, b)),
            _ => Err(TopologyError::InvalidTransform(format!(
                "transform {key} must hold two numbers"
            ))),
        }
    };
    Ok(Transform {
        scale: pair("scale")?,
        translate: pair("translate")?,
    })
}

fn decode_arc(
    value: &Value,
    transform: Option<&Transform>,
    index: usize,
) -> Result<Vec<GeoPoint>, TopologyError> {
    let positions = value.as_array().ok_or_else(|| TopologyError::InvalidArc {
        index,
        reason: "arc must be an array of positions".into(),
    })?;

    let mut out = Vec::with_capacity(positions.len());
    // Quantized arcs are delta-encoded; the running sums are the positions.
    let mut x_acc = 0.0;
    let mut y_acc = 0.0;
    for pos in positions {
        let coords = pos.as_array().ok_or_else(|| TopologyError::InvalidArc {
            index,
            reason: "position must be an array".into(),
        })?;
        let (x, y) = match (
            coords.first().and_then(|v| v.as_f64()),
            coords.get(1).and_then(|v| v.as_f64()),
        ) {
            (Some(x), Some(y)) => (x, y),
            _ => {
                return Err(TopologyError::InvalidArc {
                    index,
                    reason: "position must hold two numbers".into(),
                });
            }
        };

        let point = match transform {
            Some(t) => {
                x_acc += x;
                y_acc += y;
                GeoPoint::new(
                    x_acc * t.scale.0 + t.translate.0,
                    y_acc * t.scale.1 + t.translate.1,
                )
            }
            None => GeoPoint::new(x, y),
        };
        out.push(point);
    }
    Ok(out)
}

fn collect_regions(
    object: &str,
    geom: &Value,
    arcs: &[Vec<GeoPoint>],
    out: &mut Vec<TopoRegion>,
) -> Result<(), TopologyError> {
    let obj = geom
        .as_object()
        .ok_or_else(|| TopologyError::InvalidGeometry {
            object: object.to_string(),
            reason: "geometry must be an object".into(),
        })?;
    let ty = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or_else(|| TopologyError::InvalidGeometry {
            object: object.to_string(),
            reason: "geometry missing type".into(),
        })?;

    let properties = obj
        .get("properties")
        .and_then(|v| v.as_object())
        .cloned()
        .unwrap_or_default();

    match ty {
        "GeometryCollection" => {
            let geometries = obj.get("geometries").and_then(|v| v.as_array()).ok_or_else(
                || TopologyError::InvalidGeometry {
                    object: object.to_string(),
                    reason: "GeometryCollection missing geometries".into(),
                },
            )?;
            for child in geometries {
                collect_regions(object, child, arcs, out)?;
            }
        }
        "Polygon" => {
            let rings = polygon_rings(object, obj.get("arcs"), arcs)?;
            out.push(TopoRegion { properties, rings });
        }
        "MultiPolygon" => {
            let polys = obj.get("arcs").and_then(|v| v.as_array()).ok_or_else(|| {
                TopologyError::InvalidGeometry {
                    object: object.to_string(),
                    reason: "MultiPolygon missing arcs".into(),
                }
            })?;
            let mut rings = Vec::new();
            for poly in polys {
                rings.extend(polygon_rings(object, Some(poly), arcs)?);
            }
            out.push(TopoRegion { properties, rings });
        }
        // Points and lines have no area to scale or fill; skip them.
        _ => {}
    }
    Ok(())
}

fn polygon_rings(
    object: &str,
    arcs_val: Option<&Value>,
    arcs: &[Vec<GeoPoint>],
) -> Result<Vec<Vec<GeoPoint>>, TopologyError> {
    let ring_refs = arcs_val.and_then(|v| v.as_array()).ok_or_else(|| {
        TopologyError::InvalidGeometry {
            object: object.to_string(),
            reason: "Polygon missing arcs".into(),
        }
    })?;

    let mut rings = Vec::with_capacity(ring_refs.len());
    for ring_val in ring_refs {
        let refs = ring_val
            .as_array()
            .ok_or_else(|| TopologyError::InvalidGeometry {
                object: object.to_string(),
                reason: "ring must be an array of arc indexes".into(),
            })?;
        rings.push(stitch_ring(object, refs, arcs)?);
    }
    Ok(rings)
}

fn stitch_ring(
    object: &str,
    refs: &[Value],
    arcs: &[Vec<GeoPoint>],
) -> Result<Vec<GeoPoint>, TopologyError> {
    let mut ring: Vec<GeoPoint> = Vec::new();
    for r in refs {
        let raw = r
            .as_i64()
            .ok_or_else(|| TopologyError::InvalidGeometry {
                object: object.to_string(),
                reason: "arc index must be an integer".into(),
            })?;
        // A negative reference `~i` means arc i traversed in reverse.
        let (index, reversed) = if raw >= 0 {
            (raw as usize, false)
        } else {
            (!raw as usize, true)
        };
        let arc = arcs
            .get(index)
            .ok_or_else(|| TopologyError::InvalidGeometry {
                object: object.to_string(),
                reason: format!("arc index {raw} out of range"),
            })?;

        let mut points: Vec<GeoPoint> = arc.clone();
        if reversed {
            points.reverse();
        }
        // Consecutive arcs share their junction point; keep it once.
        let skip = usize::from(!ring.is_empty());
        ring.extend(points.into_iter().skip(skip));
    }
    Ok(ring)
}

#[cfg(test)]
mod tests {
    use super::Topology;
    use serde_json::json;

    fn quantized_fixture() -> Topology {
        // Two adjacent unit squares sharing one vertical edge, quantized with
        // a 0.5 scale. Arc 0 is the shared edge; each square closes with its
        // own outline arc.
        let value = json!({
            "type": "Topology",
            "transform": {"scale": [0.5, 0.5], "translate": [100.0, 30.0]},
            "arcs": [
                // shared edge, bottom to top: (2,0) -> (2,2) quantized
                [[2, 0], [0, 2]],
                // left square outline from (2,2) back to (2,0)
                [[2, 2], [-2, 0], [0, -2], [2, 0]],
                // right square outline from (2,0) around to (2,2)
                [[2, 0], [2, 0], [0, 2], [-2, 0]]
            ],
            "objects": {
                "demo": {
                    "type": "GeometryCollection",
                    "geometries": [
                        {"type": "Polygon", "arcs": [[0, 1]], "properties": {"name": "west"}},
                        {"type": "Polygon", "arcs": [[-1, 2]], "properties": {"name": "east"}}
                    ]
                }
            }
        });
        Topology::from_json_value(value).unwrap()
    }

    #[test]
    fn rejects_non_topology_payloads() {
        let err = Topology::from_json_str(r#"{"type": "FeatureCollection"}"#).unwrap_err();
        assert!(err.to_string().contains("Topology"));
    }

    #[test]
    fn dequantizes_arcs_through_the_transform() {
        let topo = quantized_fixture();
        let regions = topo.object("demo").unwrap();
        let west = &regions[0];
        // First point of the shared edge: (2 * 0.5 + 100, 0 * 0.5 + 30).
        assert_eq!(west.rings[0][0].lon_deg, 101.0);
        assert_eq!(west.rings[0][0].lat_deg, 30.0);
    }

    #[test]
    fn stitches_rings_and_closes_them() {
        let topo = quantized_fixture();
        let regions = topo.object("demo").unwrap();
        for region in regions {
            let ring = &region.rings[0];
            assert_eq!(ring.first(), ring.last());
            // 4 corners + closing point, junctions deduplicated.
            assert_eq!(ring.len(), 5);
        }
    }

    #[test]
    fn complement_references_reverse_the_shared_arc() {
        let topo = quantized_fixture();
        let regions = topo.object("demo").unwrap();
        let east = &regions[1];
        // The east square starts where the reversed shared edge starts: (2,2).
        assert_eq!(east.rings[0][0].lon_deg, 101.0);
        assert_eq!(east.rings[0][0].lat_deg, 31.0);
        assert_eq!(east.property_str("name"), Some("east"));
    }

    #[test]
    fn skips_non_areal_geometries() {
        let value = json!({
            "type": "Topology",
            "arcs": [],
            "objects": {
                "demo": {
                    "type": "GeometryCollection",
                    "geometries": [
                        {"type": "Point", "coordinates": [1.0, 2.0]}
                    ]
                }
            }
        });
        let topo = Topology::from_json_value(value).unwrap();
        assert!(topo.object("demo").unwrap().is_empty());
    }
}
