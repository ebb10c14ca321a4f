use crate::markers::{MapMarker, MAP_CENTER, MAP_TILES, MAP_ZOOM};
use crate::types::{ExportRow, OriginTable, VisitorRecord};
use crate::util::format_int;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tabled::{builder::Builder, settings::Style, Table, Tabled};
use tracing::debug;

pub const EXPORT_FILE: &str = "data_wisata.csv";
pub const DASHBOARD_FILE: &str = "dashboard.json";
pub const MAP_FILE: &str = "peta_wisata.html";

/// Write the filtered records with the same four columns as the source file.
pub fn write_records_csv(path: &Path, records: &[VisitorRecord]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {:?}", path))?;
    if records.is_empty() {
        // serde only emits headers with the first row
        wtr.write_record(crate::loader::REQUIRED_COLUMNS)?;
    }
    for r in records {
        wtr.serialize(ExportRow::from(r))?;
    }
    wtr.flush()?;
    debug!(path = %path.display(), rows = records.len(), "wrote CSV export");
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    fs::write(path, s).with_context(|| format!("Failed to write {:?}", path))?;
    debug!(path = %path.display(), "wrote JSON");
    Ok(())
}

/// Self-contained Leaflet page with one layer per marker.
pub fn render_map_html(markers: &[MapMarker]) -> Result<String> {
    let markers_json = serde_json::to_string(markers)?;
    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Peta Sebaran Lokasi Wisata Kebumen</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<style>html, body, #map {{ height: 100%; margin: 0; }}</style>
</head>
<body>
<div id="map"></div>
<script>
const markers = {markers_json};
const map = L.map('map').setView([{lat}, {lon}], {zoom});
L.tileLayer('{tiles}', {{
  attribution: '&copy; OpenStreetMap contributors &copy; CARTO',
  subdomains: 'abcd'
}}).addTo(map);
for (const m of markers) {{
  const pos = [m.position.lat, m.position.lon];
  const layer = m.radius === null
    ? L.marker(pos, {{ icon: L.divIcon({{ html: '<div style="background:' + m.color + ';width:14px;height:14px;border-radius:50%;border:2px solid white"></div>' }}) }})
    : L.circleMarker(pos, {{ radius: m.radius, color: m.color, fill: true, fillColor: m.color, fillOpacity: 0.7 }});
  layer.bindPopup(m.popup_html, {{ maxWidth: 250 }}).bindTooltip(m.tooltip).addTo(map);
}}
</script>
</body>
</html>
"#,
        markers_json = markers_json,
        lat = MAP_CENTER.lat,
        lon = MAP_CENTER.lon,
        zoom = MAP_ZOOM,
        tiles = MAP_TILES,
    ))
}

pub fn write_map_html(path: &Path, markers: &[MapMarker]) -> Result<()> {
    let html = render_map_html(markers)?;
    fs::write(path, html).with_context(|| format!("Failed to write {:?}", path))?;
    debug!(path = %path.display(), markers = markers.len(), "wrote map");
    Ok(())
}

/// Print one dashboard panel: its title, then up to `max_rows` rows as a
/// markdown table. Empty views print `(no rows)` instead of a chart.
pub fn preview_panel<T>(title: &str, rows: &[T], max_rows: usize)
where
    T: Tabled,
{
    println!("{}", title);
    match render_panel(rows, max_rows) {
        Some(table) => println!("{}\n", table),
        None => println!("(no rows)\n"),
    }
}

pub fn render_panel<T>(rows: &[T], max_rows: usize) -> Option<String>
where
    T: Tabled,
{
    if rows.is_empty() {
        return None;
    }
    let mut table = Table::new(rows.iter().take(max_rows)).with(Style::markdown()).to_string();
    let hidden = rows.len().saturating_sub(max_rows);
    if hidden > 0 {
        table.push_str(&format!("\n(+{} more rows in {})", format_int(hidden), DASHBOARD_FILE));
    }
    Some(table)
}

/// The pivot has one column per visitor type, so its header is built at
/// runtime. Rows print largest first, the way the bar chart reads.
pub fn render_origin_table(table: &OriginTable, max_rows: usize) -> Option<String> {
    if table.rows.is_empty() {
        return None;
    }
    let mut builder = Builder::default();
    let mut header = vec!["Site".to_string()];
    header.extend(table.visitor_types.iter().cloned());
    header.push("Total".to_string());
    builder.push_record(header);
    for row in table.rows.iter().rev().take(max_rows) {
        let mut rec = vec![row.site_name.clone()];
        rec.extend(row.counts.iter().map(|c| format_int(*c)));
        rec.push(format_int(row.total));
        builder.push_record(rec);
    }
    Some(builder.build().with(Style::markdown()).to_string())
}

pub fn preview_origin_table(title: &str, table: &OriginTable, max_rows: usize) {
    println!("{}", title);
    match render_origin_table(table, max_rows) {
        Some(s) => println!("{}\n", s),
        None => println!("(no rows)\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markers::{build_markers, MarkerShape};
    use crate::types::{Month, OriginRow, SiteTotalRow};
    use std::env;

    #[test]
    fn empty_export_still_has_header() {
        let path = env::temp_dir().join("wisata_output_empty.csv");
        write_records_csv(&path, &[]).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content.trim(),
            "Nama_Wisata,Bulan,Tipe_Wisatawan,Jumlah_Pengunjung"
        );
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn export_uses_source_columns() {
        let path = env::temp_dir().join("wisata_output_rows.csv");
        let rec = VisitorRecord {
            site_name: "Goa Petruk".to_string(),
            month: Some(Month::Agustus),
            visitor_type: "Domestik".to_string(),
            visitor_count: 1_234,
            coordinates: None,
        };
        write_records_csv(&path, &[rec]).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines[0], "Nama_Wisata,Bulan,Tipe_Wisatawan,Jumlah_Pengunjung");
        assert_eq!(lines[1], "Goa Petruk,Agustus,Domestik,1234");
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn map_embeds_markers() {
        let markers = build_markers(
            &[SiteTotalRow {
                site_name: "Pantai Suwuk".to_string(),
                total: 52_000,
            }],
            MarkerShape::ProportionalCircle,
        );
        let html = render_map_html(&markers).unwrap();
        assert!(html.contains("\"site_name\":\"Pantai Suwuk\""));
        assert!(html.contains("setView([-7.65, 109.6], 10)"));
        assert!(html.contains("\"color\":\"red\""));
    }

    #[test]
    fn map_without_markers_is_valid() {
        let html = render_map_html(&[]).unwrap();
        assert!(html.contains("const markers = [];"));
    }

    #[test]
    fn panel_notes_hidden_rows() {
        let rows: Vec<SiteTotalRow> = ["Goa Petruk", "PAP Krakal", "Waduk Sempor"]
            .iter()
            .map(|s| SiteTotalRow {
                site_name: s.to_string(),
                total: 1,
            })
            .collect();
        let s = render_panel(&rows, 2).unwrap();
        assert!(s.contains("PAP Krakal"));
        assert!(!s.contains("Waduk Sempor"));
        assert!(s.ends_with("(+1 more rows in dashboard.json)"));
        assert!(!render_panel(&rows, 5).unwrap().contains("more rows"));
        assert!(render_panel::<SiteTotalRow>(&[], 5).is_none());
    }

    #[test]
    fn origin_table_lists_largest_first() {
        let table = OriginTable {
            visitor_types: vec!["Domestik".to_string(), "Mancanegara".to_string()],
            rows: vec![
                OriginRow {
                    site_name: "Goa Petruk".to_string(),
                    counts: vec![10, 0],
                    total: 10,
                },
                OriginRow {
                    site_name: "Pantai Suwuk".to_string(),
                    counts: vec![52_000, 500],
                    total: 52_500,
                },
            ],
        };
        let s = render_origin_table(&table, 10).unwrap();
        assert!(s.contains("Mancanegara"));
        assert!(s.find("Pantai Suwuk").unwrap() < s.find("Goa Petruk").unwrap());
        assert!(s.contains("52,500"));
        assert!(render_origin_table(&OriginTable::default(), 10).is_none());
    }
}
