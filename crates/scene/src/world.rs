use foundation::time::Time;

use crate::components::{RegionProperties, RegionShape, Rgba};
use crate::transition::Transition;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct RegionId(pub u32);

impl RegionId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// The bound region collection behind the rendered map.
///
/// Regions are stored in bind order and keep that order for the life of
/// the world; every render pass retargets attributes on the same nodes.
#[derive(Debug, Default)]
pub struct World {
    names: Vec<String>,
    properties: Vec<RegionProperties>,
    fills: Vec<Transition<Rgba>>,
    shapes: Vec<Transition<RegionShape>>,
    tooltips: Vec<String>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(
        &mut self,
        name: impl Into<String>,
        properties: RegionProperties,
        shape: RegionShape,
        fill: Rgba,
    ) -> RegionId {
        let name = name.into();
        let id = RegionId(self.names.len() as u32);
        self.tooltips.push(name.clone());
        self.names.push(name);
        self.properties.push(properties);
        self.fills.push(Transition::fixed(fill));
        self.shapes.push(Transition::fixed(shape));
        id
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Region ids in bind order.
    pub fn ids(&self) -> impl Iterator<Item = RegionId> + '_ {
        (0..self.names.len() as u32).map(RegionId)
    }

    pub fn name(&self, id: RegionId) -> Option<&str> {
        self.names.get(id.index()).map(|s| s.as_str())
    }

    pub fn properties(&self, id: RegionId) -> Option<&RegionProperties> {
        self.properties.get(id.index())
    }

    pub fn tooltip(&self, id: RegionId) -> Option<&str> {
        self.tooltips.get(id.index()).map(|s| s.as_str())
    }

    pub fn set_tooltip(&mut self, id: RegionId, text: impl Into<String>) {
        if let Some(slot) = self.tooltips.get_mut(id.index()) {
            *slot = text.into();
        }
    }

    pub fn set_fill_target(&mut self, id: RegionId, target: Rgba, now: Time, duration_s: f64) {
        if let Some(t) = self.fills.get_mut(id.index()) {
            t.retarget(target, now, duration_s);
        }
    }

    pub fn set_shape_target(
        &mut self,
        id: RegionId,
        target: RegionShape,
        now: Time,
        duration_s: f64,
    ) {
        if let Some(t) = self.shapes.get_mut(id.index()) {
            t.retarget(target, now, duration_s);
        }
    }

    pub fn fill_at(&self, id: RegionId, now: Time) -> Option<Rgba> {
        self.fills.get(id.index()).map(|t| t.sample(now))
    }

    pub fn shape_at(&self, id: RegionId, now: Time) -> Option<RegionShape> {
        self.shapes.get(id.index()).map(|t| t.sample(now))
    }

    pub fn shape_target(&self, id: RegionId) -> Option<&RegionShape> {
        self.shapes.get(id.index()).map(|t| t.target())
    }

    pub fn is_animating(&self, now: Time) -> bool {
        self.fills.iter().any(|t| !t.is_done(now))
            || self.shapes.iter().any(|t| !t.is_done(now))
    }
}
