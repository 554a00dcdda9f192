use catalog::{Field, FieldCatalog, RegionTable};
use distortion::{Distortion, project_regions};
use formats::{DataTable, TopoRegion};
use foundation::projection::Mercator;
use foundation::time::Time;
use runtime::{Clock, Debouncer};
use scene::components::{RegionProperties, RegionShape};
use scene::{RegionId, World};
use tracing::{debug, info, warn};

use crate::fmt::group_thousands;
use crate::scale::{LinearScale, NEUTRAL_FILL, SequentialBlues, WEIGHT_RANGE};
use crate::state::SelectionState;
use crate::surfaces::Surfaces;

/// Fill/shape transition length, linear easing.
pub const TRANSITION_DURATION_S: f64 = 0.75;

/// Recompute debounce delay: long enough to coalesce a burst of selection
/// changes, short enough to feel instantaneous.
pub const RECOMPUTE_DELAY_S: f64 = 0.01;

#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    /// Topology property carrying a region's display name, which is also
    /// the join key against the data table.
    pub name_property: String,
    /// Data table column holding region names.
    pub join_column: String,
    pub projection: Mercator,
}

/// The interactive recompute-and-render core.
///
/// Owns the field catalog, the selection state, the bound region world,
/// and the debounce; talks to the host only through [`Surfaces`], the
/// [`Distortion`] engine, and a [`Clock`].
pub struct Viewer<S: Surfaces, E: Distortion, C: Clock> {
    surfaces: S,
    engine: E,
    clock: C,
    catalog: FieldCatalog,
    selection: SelectionState,
    world: World,
    base_shapes: Vec<RegionShape>,
    debounce: Debouncer,
}

impl<S: Surfaces, E: Distortion, C: Clock> Viewer<S, E, C> {
    pub fn new(surfaces: S, engine: E, clock: C) -> Self {
        Self {
            surfaces,
            engine,
            clock,
            catalog: FieldCatalog::empty(),
            selection: SelectionState::default(),
            world: World::new(),
            base_shapes: Vec::new(),
            debounce: Debouncer::new(RECOMPUTE_DELAY_S),
        }
    }

    pub fn surfaces(&self) -> &S {
        &self.surfaces
    }

    pub fn surfaces_mut(&mut self) -> &mut S {
        &mut self.surfaces
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    pub fn selection(&self) -> Option<&Field> {
        self.selection.field()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Ingestion complete: derive the catalog from the table headers, join
    /// records onto the geometry by exact region name, bind every region
    /// in neutral fill at its undistorted projection, and repopulate the
    /// selector. Zero data rows produce an empty catalog and an empty
    /// selector; nothing further will ever be scheduled.
    pub fn ingest(&mut self, regions: &[TopoRegion], table: &DataTable, config: &ViewerConfig) {
        self.catalog = if table.is_empty() {
            FieldCatalog::empty()
        } else {
            FieldCatalog::from_headers(&table.headers, &config.join_column)
        };
        self.surfaces.set_selector_options(self.catalog.fields());
        self.selection.initialize(&self.catalog);

        let records = RegionTable::from_rows(&table.headers, &table.rows, &config.join_column);
        self.world = World::new();
        self.base_shapes = project_regions(regions, &config.projection);
        for (region, shape) in regions.iter().zip(self.base_shapes.iter()) {
            let name = region
                .property_str(&config.name_property)
                .unwrap_or_default()
                .to_string();

            let mut props = RegionProperties::default();
            props.push(config.name_property.clone(), name.clone());
            if let Some(record) = records.get(&name) {
                for (key, value) in record.cells() {
                    if key != config.name_property {
                        props.push(key, value);
                    }
                }
            }

            self.world.bind(name, props, shape.clone(), NEUTRAL_FILL);
        }

        debug!(
            regions = self.world.len(),
            fields = self.catalog.fields().len(),
            "dataset ingested"
        );
    }

    /// Resolves the current address fragment into the active field and
    /// applies it: selector index synced, then either the reset pass
    /// (sentinel, address left alone) or a debounced recompute with the
    /// fragment canonicalized to `#<field.id>` and share links rewritten.
    pub fn parse_fragment(&mut self, now: Time) {
        let desired = self.surfaces.fragment();
        let Some(field) = self.catalog.lookup(&desired).cloned() else {
            // Empty catalog: nothing to show, nothing to schedule.
            return;
        };
        let index = self.catalog.index_of(&field.id).unwrap_or(0);
        self.selection.set(field.clone());
        self.surfaces.set_selected_index(index);

        if field.key.is_none() {
            // A recompute queued for a previous field must not fire into
            // the reset view.
            self.debounce.cancel();
            self.reset(now);
        } else {
            self.schedule_recompute(now);
            self.surfaces.replace_fragment(&field.id);
            self.surfaces.rewrite_share_links(&field.id);
        }
    }

    /// Selector change. The address fragment stays the single source of
    /// truth; this sets it and re-parses directly instead of relying on a
    /// change-event round trip.
    pub fn select_index(&mut self, index: usize, now: Time) {
        let Some(field) = self.catalog.fields().get(index) else {
            return;
        };
        let id = field.id.clone();
        self.surfaces.set_fragment(&id);
        self.parse_fragment(now);
    }

    fn schedule_recompute(&mut self, now: Time) {
        self.debounce.schedule(now);
        self.surfaces.set_status("calculating...");
    }

    /// Host event-loop tick: fires the recompute once its deadline passes.
    /// Returns whether the scene still needs redrawing.
    pub fn tick(&mut self, now: Time) -> bool {
        if self.debounce.poll(now) {
            self.update(now);
        }
        self.debounce.is_pending() || self.world.is_animating(now)
    }

    /// Reset pass: neutral fills, undistorted geometry, plain-name
    /// tooltips, empty status.
    fn reset(&mut self, now: Time) {
        self.surfaces.set_status("");
        self.surfaces.set_updating(false);

        let weights = vec![1.0; self.base_shapes.len()];
        let features = self.engine.distort(&self.base_shapes, &weights);

        let ids: Vec<RegionId> = self.world.ids().collect();
        for (id, shape) in ids.into_iter().zip(features) {
            let name = self.world.name(id).unwrap_or_default().to_string();
            self.world.set_tooltip(id, name);
            self.world
                .set_fill_target(id, NEUTRAL_FILL, now, TRANSITION_DURATION_S);
            self.world
                .set_shape_target(id, shape, now, TRANSITION_DURATION_S);
        }

        debug!("reset to the undistorted view");
    }

    /// Scaled pass: domain from the finite values of the active field,
    /// blues fill, positive distortion weights, grouped-value tooltips,
    /// and the timing readout.
    fn update(&mut self, now: Time) {
        let Some(key) = self.selection.field().and_then(|f| f.key.clone()) else {
            return;
        };

        let started = self.clock.now();
        self.surfaces.set_updating(true);

        let ids: Vec<RegionId> = self.world.ids().collect();
        let values: Vec<f64> = ids
            .iter()
            .map(|id| {
                self.world
                    .properties(*id)
                    .map(|p| p.numeric(&key))
                    .unwrap_or(f64::NAN)
            })
            .collect();

        let mut finite: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        finite.sort_by(f64::total_cmp);

        let features;
        let color;
        if finite.is_empty() {
            // Nothing joined (or the column is wholly non-numeric): render
            // the neutral, undistorted view instead of a NaN domain.
            warn!(field = %key, "no numeric values for field");
            color = None;
            let weights = vec![1.0; self.base_shapes.len()];
            features = self.engine.distort(&self.base_shapes, &weights);
        } else {
            let (lo, hi) = (finite[0], finite[finite.len() - 1]);
            color = Some(SequentialBlues::new(lo, hi));
            let weight_scale = LinearScale::new((lo, hi), WEIGHT_RANGE);
            let weights: Vec<f64> = values
                .iter()
                .map(|v| {
                    let w = weight_scale.map(*v);
                    // NaN never joined; weigh it as "no relative scaling".
                    if w.is_nan() { 1.0 } else { w }
                })
                .collect();
            features = self.engine.distort(&self.base_shapes, &weights);
            debug!(field = %key, lo, hi, "domain computed");
        }

        for ((id, value), shape) in ids.into_iter().zip(values).zip(features) {
            let name = self.world.name(id).unwrap_or_default().to_string();
            self.world
                .set_tooltip(id, format!("{name}: {}", group_thousands(value)));
            let fill = color
                .and_then(|c| c.color(value))
                .unwrap_or(NEUTRAL_FILL);
            self.world
                .set_fill_target(id, fill, now, TRANSITION_DURATION_S);
            self.world
                .set_shape_target(id, shape, now, TRANSITION_DURATION_S);
        }

        let elapsed = (self.clock.now().0 - started.0).max(0.0);
        self.surfaces
            .set_status(&format!("calculated in {elapsed:.1} seconds"));
        self.surfaces.set_updating(false);
        info!(field = %key, elapsed_s = elapsed, "recomputed cartogram");
    }
}
