use std::env;
use std::fs;
use std::path::PathBuf;

use catalog::{FieldCatalog, RegionTable};
use distortion::{AreaScaling, path_data};
use formats::{DataTable, Topology};
use foundation::math::Vec2;
use foundation::projection::Mercator;
use foundation::time::Time;
use pipeline::{
    HeadlessSurfaces, RECOMPUTE_DELAY_S, TRANSITION_DURATION_S, Viewer, ViewerConfig,
};
use runtime::MonotonicClock;

fn main() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    let mut args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err(usage());
    }

    let cmd = args[1].clone();
    args.drain(0..2);

    match cmd.as_str() {
        "fields" => cmd_fields(args),
        "domain" => cmd_domain(args),
        "render" => cmd_render(args),
        _ => Err(usage()),
    }
}

fn usage() -> String {
    [
        "usage:",
        "  carto fields <table.csv>",
        "  carto domain <table.csv> <field-id>",
        "  carto render <topology.json> <table.csv> <field-id> <out.svg> [options]",
        "",
        "render options:",
        "  --object NAME         topology object to render (default: first)",
        "  --name-property KEY   region name property (default: name)",
        "  --join-column NAME    table join column (default: name)",
        "  --center LON,LAT      projection center (default: 0,0)",
        "  --scale K             projection scale (default: 150)",
        "  --size WxH            canvas size in px (default: 800x500)",
    ]
    .join("\n")
}

fn read_table(path: &str) -> Result<DataTable, String> {
    let payload = fs::read_to_string(path).map_err(|e| format!("read {path}: {e}"))?;
    DataTable::from_csv_str(&payload).map_err(|e| format!("parse {path}: {e}"))
}

fn cmd_fields(args: Vec<String>) -> Result<(), String> {
    // carto fields <table.csv>
    let Some(table_path) = args.first() else {
        return Err(usage());
    };
    let table = read_table(table_path)?;
    if table.is_empty() {
        eprintln!("no data rows; no fields to derive");
        return Ok(());
    }

    let join_column = table.headers.first().cloned().unwrap_or_default();
    let catalog = FieldCatalog::from_headers(&table.headers, &join_column);
    for field in catalog.fields() {
        match &field.key {
            Some(key) => println!("{}\t{}\t{}", field.id, field.name, key),
            None => println!("{}\t{}\t-", field.id, field.name),
        }
    }
    Ok(())
}

fn cmd_domain(args: Vec<String>) -> Result<(), String> {
    // carto domain <table.csv> <field-id>
    if args.len() < 2 {
        return Err(usage());
    }
    let table = read_table(&args[0])?;
    if table.is_empty() {
        return Err("no data rows".to_string());
    }

    let join_column = table.headers.first().cloned().unwrap_or_default();
    let catalog = FieldCatalog::from_headers(&table.headers, &join_column);
    let field = catalog
        .lookup(&args[1])
        .ok_or_else(|| "empty catalog".to_string())?;
    let Some(key) = field.key.as_deref() else {
        return Err(format!("field {:?} has no data column", field.id));
    };

    let records = RegionTable::from_rows(&table.headers, &table.rows, &join_column);
    let mut values: Vec<f64> = table
        .rows
        .iter()
        .filter_map(|row| row.first())
        .filter_map(|name| records.get(name))
        .map(|record| record.numeric(key))
        .filter(|v| !v.is_nan())
        .collect();
    values.sort_by(f64::total_cmp);

    match (values.first(), values.last()) {
        (Some(lo), Some(hi)) => {
            println!("{}: lo={} hi={} n={}", field.id, lo, hi, values.len());
            Ok(())
        }
        _ => Err(format!("field {:?} has no numeric values", field.id)),
    }
}

fn cmd_render(args: Vec<String>) -> Result<(), String> {
    // carto render <topology.json> <table.csv> <field-id> <out.svg> [options]
    if args.len() < 4 {
        return Err(usage());
    }
    let topo_path = args[0].clone();
    let table_path = args[1].clone();
    let field_id = args[2].clone();
    let out_path = PathBuf::from(&args[3]);

    let mut object: Option<String> = None;
    let mut name_property = "name".to_string();
    let mut join_column = "name".to_string();
    let mut center = (0.0, 0.0);
    let mut scale = 150.0;
    let mut size = (800.0, 500.0);

    let mut i = 4;
    while i < args.len() {
        let flag = args[i].as_str();
        i += 1;
        let value = args
            .get(i)
            .ok_or_else(|| format!("{flag} requires a value"))?
            .clone();
        match flag {
            "--object" => object = Some(value),
            "--name-property" => name_property = value,
            "--join-column" => join_column = value,
            "--center" => center = parse_pair(&value, ',').ok_or("--center expects LON,LAT")?,
            "--scale" => {
                scale = value
                    .parse::<f64>()
                    .map_err(|e| format!("--scale: {e}"))?;
            }
            "--size" => size = parse_pair(&value, 'x').ok_or("--size expects WxH")?,
            other => return Err(format!("unknown arg: {other}\n\n{}", usage())),
        }
        i += 1;
    }

    let topo_payload =
        fs::read_to_string(&topo_path).map_err(|e| format!("read {topo_path}: {e}"))?;
    let topology =
        Topology::from_json_str(&topo_payload).map_err(|e| format!("parse {topo_path}: {e}"))?;
    let regions = match &object {
        Some(name) => topology
            .object(name)
            .ok_or_else(|| format!("topology has no object {name:?}"))?,
        None => {
            topology
                .first_object()
                .ok_or_else(|| "topology has no objects".to_string())?
                .1
        }
    };
    let table = read_table(&table_path)?;

    let config = ViewerConfig {
        name_property,
        join_column,
        projection: Mercator::new(
            center.0,
            center.1,
            scale,
            Vec2::new(size.0 / 2.0, size.1 / 2.0),
        ),
    };

    let mut viewer = Viewer::new(HeadlessSurfaces::new(), AreaScaling, MonotonicClock::new());
    viewer.ingest(regions, &table, &config);
    viewer.surfaces_mut().fragment = field_id;
    viewer.parse_fragment(Time(0.0));

    // Drive the debounce and let the transitions settle.
    viewer.tick(Time(RECOMPUTE_DELAY_S));
    let settled = Time(RECOMPUTE_DELAY_S + TRANSITION_DURATION_S);

    let svg = render_svg(&viewer, settled, size);
    fs::write(&out_path, svg).map_err(|e| format!("write {out_path:?}: {e}"))?;

    let status = viewer.surfaces().status.clone();
    tracing::info!(out = %out_path.display(), status = %status, "rendered");
    eprintln!("wrote {}", out_path.display());
    Ok(())
}

fn render_svg(
    viewer: &Viewer<HeadlessSurfaces, AreaScaling, MonotonicClock>,
    at: Time,
    size: (f64, f64),
) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" \
         viewBox=\"0 0 {} {}\">\n",
        size.0, size.1, size.0, size.1
    ));
    let world = viewer.world();
    for id in world.ids() {
        let Some(shape) = world.shape_at(id, at) else {
            continue;
        };
        let fill = world
            .fill_at(id, at)
            .map(|c| c.to_hex_string())
            .unwrap_or_default();
        let title = world.tooltip(id).unwrap_or_default();
        out.push_str(&format!(
            "  <path fill=\"{}\" stroke=\"#666\" stroke-width=\"0.5\" d=\"{}\">\
             <title>{}</title></path>\n",
            fill,
            path_data(&shape),
            xml_escape(title)
        ));
    }
    out.push_str("</svg>\n");
    out
}

fn parse_pair(value: &str, sep: char) -> Option<(f64, f64)> {
    let (a, b) = value.split_once(sep)?;
    Some((a.trim().parse().ok()?, b.trim().parse().ok()?))
}

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
