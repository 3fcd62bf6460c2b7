//! Map and run-artifact output: a self-contained Leaflet page with one
//! marker per resolved institution and a toggleable "not found" sidebar,
//! plus plain newline-delimited name lists for the two failure buckets.

use crate::core::report::ReportSummary;
use crate::domain::model::Coordinate;
use crate::domain::ports::Storage;
use crate::utils::error::Result;

pub const NOT_FOUND_FILENAME: &str = "not_found_institutions.txt";
pub const OUT_OF_REGION_FILENAME: &str = "out_of_region_institutions.txt";

/// Renders the whole map page. Marker population happens in one place;
/// every resolved record becomes exactly one marker.
pub fn render_map(summary: &ReportSummary, center: Coordinate, generated_on: &str) -> String {
    let mut markers = Vec::new();
    for (record, coordinate, _source) in summary.resolved() {
        let popup = format!(
            "<b>{}</b><br>Instituição: {}<br>Vagas: {}<br>Prazo inscrição: {}",
            escape_html(&record.name),
            escape_html(&record.location).replace('\n', " "),
            escape_html(&record.vacancies),
            escape_html(&record.deadline),
        );
        markers.push(serde_json::json!({
            "lat": coordinate.lat,
            "lon": coordinate.lon,
            "popup": popup,
        }));
    }

    let mut sidebar = String::new();
    for record in summary.not_found() {
        sidebar.push_str(&format!(
            "<li><b>{}</b>: {} - {} - {}</li>\n",
            escape_html(&record.name),
            escape_html(&record.location).replace('\n', " "),
            escape_html(&record.vacancies),
            escape_html(&record.deadline),
        ));
    }

    let markers_json =
        serde_json::to_string(&markers).unwrap_or_else(|_| "[]".to_string());

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Concursos Para Professor</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<style>
  #map {{ height: 100vh; }}
  #title {{ position: fixed; top: 10px; left: 50px; z-index: 1000;
            background: white; padding: 4px 12px; text-align: center;
            font-family: Arial, sans-serif; }}
  #notFoundButton {{ position: fixed; top: 10px; right: 10px; z-index: 1000; }}
  #notFoundList {{ display: none; background-color: white; border: 1px solid black;
                   padding: 10px; max-width: 300px; max-height: 300px;
                   overflow-y: auto; position: fixed; top: 50px; right: 10px;
                   z-index: 1000; }}
</style>
</head>
<body>
<div id="title">
  <h1>Concursos Para Professor</h1>
  <h3 style="color: gray;">Gerado em: {generated_on}</h3>
</div>
<div id="notFoundButton">
  <button onclick="var l = document.getElementById('notFoundList');
                   l.style.display = l.style.display === 'none' || l.style.display === '' ? 'block' : 'none';">
    Show/Hide Not Found List
  </button>
</div>
<div id="notFoundList">
  <h4>Coordinates not found:</h4>
  <ul>
{sidebar}  </ul>
</div>
<div id="map"></div>
<script>
  var map = L.map('map').setView([{lat}, {lon}], 7);
  L.tileLayer('https://tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png', {{
    attribution: '&copy; OpenStreetMap contributors'
  }}).addTo(map);
  var markers = {markers_json};
  markers.forEach(function (m) {{
    L.marker([m.lat, m.lon]).addTo(map).bindPopup(m.popup, {{maxWidth: 300}});
  }});
</script>
</body>
</html>
"#,
        generated_on = generated_on,
        sidebar = sidebar,
        lat = center.lat,
        lon = center.lon,
        markers_json = markers_json,
    )
}

/// Writes the map page and the two newline-delimited name lists.
pub async fn write_artifacts<S: Storage>(
    storage: &S,
    summary: &ReportSummary,
    map_html: &str,
    map_filename: &str,
) -> Result<()> {
    storage.write_file(map_filename, map_html.as_bytes()).await?;

    let not_found = names_list(summary.not_found().map(|r| r.name.as_str()));
    storage
        .write_file(NOT_FOUND_FILENAME, not_found.as_bytes())
        .await?;

    let out_of_region = names_list(summary.out_of_region().map(|r| r.name.as_str()));
    storage
        .write_file(OUT_OF_REGION_FILENAME, out_of_region.as_bytes())
        .await?;

    Ok(())
}

fn names_list<'a>(names: impl Iterator<Item = &'a str>) -> String {
    names.collect::<Vec<_>>().join("\n")
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
