use std::cell::RefCell;

use console_error_panic_hook::set_once;
use gloo_net::http::Request;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use catalog::Field;
use distortion::{AreaScaling, path_data};
use formats::{DataTable, Topology};
use foundation::math::Vec2;
use foundation::projection::Mercator;
use foundation::time::Time;
use pipeline::{Surfaces, Viewer, ViewerConfig};
use runtime::Clock;

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Wall clock in seconds, from `performance.now()` when available.
#[derive(Debug, Clone)]
struct PerformanceClock {
    performance: Option<web_sys::Performance>,
}

impl PerformanceClock {
    fn from_window() -> Self {
        Self {
            performance: web_sys::window().and_then(|w| w.performance()),
        }
    }
}

impl Clock for PerformanceClock {
    fn now(&self) -> Time {
        match &self.performance {
            Some(p) => Time(p.now() / 1000.0),
            None => Time(js_sys::Date::now() / 1000.0),
        }
    }
}

/// The pipeline's rendering seam, bound to the page.
struct DomSurfaces {
    document: web_sys::Document,
    location: web_sys::Location,
    select: web_sys::HtmlSelectElement,
    status: web_sys::Element,
}

impl Surfaces for DomSurfaces {
    fn fragment(&self) -> String {
        self.location
            .hash()
            .unwrap_or_default()
            .trim_start_matches('#')
            .to_string()
    }

    fn set_fragment(&mut self, id: &str) {
        // Assigning the hash also raises a hashchange event; the handler
        // re-parses, which is idempotent for the same field.
        let _ = self.location.set_hash(&format!("#{id}"));
    }

    fn replace_fragment(&mut self, id: &str) {
        let _ = self.location.replace(&format!("#{id}"));
    }

    fn rewrite_share_links(&mut self, id: &str) {
        let Ok(links) = self.document.query_selector_all("a.hashish") else {
            return;
        };
        for i in 0..links.length() {
            let Some(node) = links.item(i) else { continue };
            let Ok(anchor) = node.dyn_into::<web_sys::HtmlAnchorElement>() else {
                continue;
            };
            let href = anchor.href();
            let base = href.split('#').next().unwrap_or_default();
            anchor.set_href(&format!("{base}#{id}"));
        }
    }

    fn set_selector_options(&mut self, fields: &[Field]) {
        self.select.set_inner_html("");
        for field in fields {
            let Ok(option) = web_sys::HtmlOptionElement::new_with_text(&field.name) else {
                continue;
            };
            option.set_value(&field.id);
            let _ = self.select.append_child(&option);
        }
    }

    fn set_selected_index(&mut self, index: usize) {
        self.select.set_selected_index(index as i32);
    }

    fn set_status(&mut self, text: &str) {
        self.status.set_text_content(Some(text));
    }

    fn set_updating(&mut self, updating: bool) {
        let Some(body) = self.document.body() else {
            return;
        };
        let class_list = body.class_list();
        let _ = if updating {
            class_list.add_1("updating")
        } else {
            class_list.remove_1("updating")
        };
    }
}

struct App {
    viewer: Viewer<DomSurfaces, AreaScaling, PerformanceClock>,
    // One path (with a title child) per bound region, in bind order.
    paths: Vec<web_sys::Element>,
    titles: Vec<web_sys::Element>,
    needs_flush: bool,
}

thread_local! {
    static STATE: RefCell<Option<App>> = const { RefCell::new(None) };
}

fn with_app(f: impl FnOnce(&mut App)) {
    STATE.with(|state| {
        if let Some(app) = state.borrow_mut().as_mut() {
            f(app);
        }
    });
}

fn console_log(message: &str) {
    web_sys::console::log_1(&JsValue::from_str(message));
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_once();
    Ok(())
}

/// Fetches the topology and data table, binds the map, and applies the
/// initial address fragment.
#[wasm_bindgen]
#[allow(clippy::too_many_arguments)]
pub fn boot(
    topology_url: String,
    table_url: String,
    object: Option<String>,
    name_property: Option<String>,
    join_column: Option<String>,
    center_lon: f64,
    center_lat: f64,
    scale: f64,
) {
    spawn_local(async move {
        if let Err(err) = boot_inner(
            topology_url,
            table_url,
            object,
            name_property,
            join_column,
            center_lon,
            center_lat,
            scale,
        )
        .await
        {
            // Failures degrade to an unchanged page, never an alert.
            console_log(&format!("boot error: {err:?}"));
        }
    });
}

#[allow(clippy::too_many_arguments)]
async fn boot_inner(
    topology_url: String,
    table_url: String,
    object: Option<String>,
    name_property: Option<String>,
    join_column: Option<String>,
    center_lon: f64,
    center_lat: f64,
    scale: f64,
) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    // Capability detection: without vector-graphics support the control is
    // hidden and nothing else is attempted.
    if document.create_element_ns(Some(SVG_NS), "svg").is_err() {
        if let Some(form) = document
            .query_selector("form")
            .ok()
            .flatten()
            .and_then(|e| e.dyn_into::<web_sys::HtmlElement>().ok())
        {
            let _ = form.style().set_property("display", "none");
        }
        return Ok(());
    }

    let topo_payload = fetch_text(&topology_url).await?;
    let table_payload = fetch_text(&table_url).await?;

    let topology = match Topology::from_json_str(&topo_payload) {
        Ok(t) => t,
        Err(e) => {
            console_log(&format!("topology parse error: {e}"));
            return Ok(());
        }
    };
    let table = match DataTable::from_csv_str(&table_payload) {
        Ok(t) => t,
        Err(e) => {
            console_log(&format!("table parse error: {e}"));
            return Ok(());
        }
    };

    let regions = match &object {
        Some(name) => topology.object(name),
        None => topology.first_object().map(|(_, regions)| regions),
    }
    .unwrap_or_default()
    .to_vec();

    let map = document
        .get_element_by_id("map")
        .ok_or_else(|| JsValue::from_str("missing #map"))?;
    let select = document
        .get_element_by_id("field")
        .ok_or_else(|| JsValue::from_str("missing #field"))?
        .dyn_into::<web_sys::HtmlSelectElement>()?;
    let status = document
        .get_element_by_id("status")
        .ok_or_else(|| JsValue::from_str("missing #status"))?;

    let (width, height) = (
        attr_f64(&map, "width").unwrap_or(800.0),
        attr_f64(&map, "height").unwrap_or(500.0),
    );

    let config = ViewerConfig {
        name_property: name_property.unwrap_or_else(|| "name".to_string()),
        join_column: join_column.unwrap_or_else(|| "name".to_string()),
        projection: Mercator::new(
            center_lon,
            center_lat,
            scale,
            Vec2::new(width / 2.0, height / 2.0),
        ),
    };

    let surfaces = DomSurfaces {
        document: document.clone(),
        location: window.location(),
        select,
        status,
    };
    let clock = PerformanceClock::from_window();
    let now = clock.now();

    let mut viewer = Viewer::new(surfaces, AreaScaling, clock);
    viewer.ingest(&regions, &table, &config);

    // Region nodes: a group of paths with title children, neutral fill at
    // the undistorted projection.
    let layer = document.create_element_ns(Some(SVG_NS), "g")?;
    layer.set_attribute("id", "layer")?;
    let states = document.create_element_ns(Some(SVG_NS), "g")?;
    states.set_attribute("id", "states")?;
    layer.append_child(&states)?;
    map.append_child(&layer)?;

    let mut paths = Vec::with_capacity(viewer.world().len());
    let mut titles = Vec::with_capacity(viewer.world().len());
    for id in viewer.world().ids() {
        let path = document.create_element_ns(Some(SVG_NS), "path")?;
        path.set_attribute("class", "state")?;
        if let Some(name) = viewer.world().name(id) {
            path.set_attribute("id", name)?;
        }
        if let Some(fill) = viewer.world().fill_at(id, now) {
            path.set_attribute("fill", &fill.to_hex_string())?;
        }
        if let Some(shape) = viewer.world().shape_at(id, now) {
            path.set_attribute("d", &path_data(&shape))?;
        }

        let title = document.create_element_ns(Some(SVG_NS), "title")?;
        title.set_text_content(viewer.world().tooltip(id));
        path.append_child(&title)?;
        states.append_child(&path)?;

        paths.push(path);
        titles.push(title);
    }

    viewer.parse_fragment(now);

    STATE.with(|state| {
        *state.borrow_mut() = Some(App {
            viewer,
            paths,
            titles,
            needs_flush: true,
        });
    });
    Ok(())
}

/// Address-fragment change: re-resolve the selection from the hash.
#[wasm_bindgen]
pub fn on_hash_change() {
    with_app(|app| {
        let now = app.viewer.clock().now();
        app.viewer.parse_fragment(now);
        app.needs_flush = true;
    });
}

/// Selector change, routed through the canonical address fragment.
#[wasm_bindgen]
pub fn on_field_change(index: u32) {
    with_app(|app| {
        let now = app.viewer.clock().now();
        app.viewer.select_index(index as usize, now);
        app.needs_flush = true;
    });
}

/// Frame tick: fires the debounced recompute when due and flushes the
/// animated attributes to the SVG nodes.
#[wasm_bindgen]
pub fn tick() {
    with_app(|app| {
        let now = app.viewer.clock().now();
        let active = app.viewer.tick(now);
        if active || app.needs_flush {
            flush_dom(app, now);
            app.needs_flush = active;
        }
    });
}

fn flush_dom(app: &App, now: Time) {
    let world = app.viewer.world();
    for (id, (path, title)) in world.ids().zip(app.paths.iter().zip(app.titles.iter())) {
        if let Some(fill) = world.fill_at(id, now) {
            let _ = path.set_attribute("fill", &fill.to_hex_string());
        }
        if let Some(shape) = world.shape_at(id, now) {
            let _ = path.set_attribute("d", &path_data(&shape));
        }
        title.set_text_content(world.tooltip(id));
    }
}

async fn fetch_text(url: &str) -> Result<String, JsValue> {
    let response = Request::get(url)
        .send()
        .await
        .map_err(|e| JsValue::from_str(&format!("fetch {url}: {e}")))?;
    response
        .text()
        .await
        .map_err(|e| JsValue::from_str(&format!("read {url}: {e}")))
}

fn attr_f64(element: &web_sys::Element, name: &str) -> Option<f64> {
    element.get_attribute(name)?.trim().parse().ok()
}
