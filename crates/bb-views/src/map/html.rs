use bb_data::table::GeoPoint;
use serde::{Deserialize, Serialize};

use super::TripMap;

/// Tiles, colors and zoom used when rendering a [`TripMap`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapStyle {
    pub tile_url: String,
    pub attribution: String,
    pub zoom_start: u8,
    /// Center used when the map has no start marker
    pub fallback_center: GeoPoint,
    pub start_color: String,
    pub end_color: String,
    pub path_color: String,
    pub path_weight: f32,
}

impl Default for MapStyle {
    fn default() -> Self {
        Self {
            tile_url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            attribution: "&copy; OpenStreetMap contributors".to_string(),
            zoom_start: 11,
            fallback_center: GeoPoint::new(42.3601, -71.0589),
            start_color: "blue".to_string(),
            end_color: "red".to_string(),
            path_color: "blue".to_string(),
            path_weight: 3.0,
        }
    }
}

#[derive(Serialize)]
struct Pin {
    lat: f64,
    lon: f64,
    popup: String,
}

#[derive(Serialize)]
struct MapPayload<'a> {
    center: [f64; 2],
    zoom: u8,
    tile_url: &'a str,
    attribution: &'a str,
    start_color: &'a str,
    end_color: &'a str,
    path_color: &'a str,
    path_weight: f32,
    start: Option<Pin>,
    ends: Vec<Pin>,
    paths: Vec<[[f64; 2]; 2]>,
}

pub(super) fn render(map: &TripMap, style: &MapStyle) -> Result<String, serde_json::Error> {
    let center = map.center().unwrap_or(style.fallback_center);
    let payload = MapPayload {
        center: [center.lat, center.lon],
        zoom: style.zoom_start,
        tile_url: &style.tile_url,
        attribution: &style.attribution,
        start_color: &style.start_color,
        end_color: &style.end_color,
        path_color: &style.path_color,
        path_weight: style.path_weight,
        start: map.start.as_ref().map(|s| Pin {
            lat: s.point.lat,
            lon: s.point.lon,
            popup: escape_html(&s.name),
        }),
        ends: map
            .end_stations
            .iter()
            .map(|e| Pin {
                lat: e.point.lat,
                lon: e.point.lon,
                popup: format!(
                    "<b>Station Name:</b> {}<br><b>Number of rides:</b> {}",
                    escape_html(&e.name),
                    e.trips
                ),
            })
            .collect(),
        paths: map
            .paths
            .iter()
            .map(|p| [[p.from.lat, p.from.lon], [p.to.lat, p.to.lon]])
            .collect(),
    };

    // A literal "</script>" inside the data would close the script element
    let json = serde_json::to_string(&payload)?.replace("</", "<\\/");
    Ok(TEMPLATE.replace("__MAP_DATA__", &json))
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Trip map</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
<link rel="stylesheet" href="https://unpkg.com/leaflet.markercluster@1.5.3/dist/MarkerCluster.css">
<link rel="stylesheet" href="https://unpkg.com/leaflet.markercluster@1.5.3/dist/MarkerCluster.Default.css">
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<script src="https://unpkg.com/leaflet.markercluster@1.5.3/dist/leaflet.markercluster.js"></script>
<style>
  html, body, #map { height: 100%; margin: 0; }
  .pin { width: 14px; height: 14px; border-radius: 50%; border: 2px solid #fff; box-shadow: 0 0 3px rgba(0,0,0,.6); }
</style>
</head>
<body>
<div id="map"></div>
<script>
  const D = __MAP_DATA__;
  const map = L.map('map').setView(D.center, D.zoom);
  L.tileLayer(D.tile_url, { attribution: D.attribution, maxZoom: 19 }).addTo(map);

  const pin = (color) => L.divIcon({
    className: '',
    html: `<div class="pin" style="background:${color}"></div>`,
    iconSize: [18, 18],
    iconAnchor: [9, 9],
  });

  if (D.start) {
    L.marker([D.start.lat, D.start.lon], { icon: pin(D.start_color) })
      .bindPopup(D.start.popup)
      .addTo(map);
  }

  const cluster = L.markerClusterGroup();
  for (const end of D.ends) {
    cluster.addLayer(L.marker([end.lat, end.lon], { icon: pin(D.end_color) }).bindPopup(end.popup));
  }
  map.addLayer(cluster);

  for (const path of D.paths) {
    L.polyline(path, { color: D.path_color, weight: D.path_weight }).addTo(map);
  }
</script>
</body>
</html>
"##;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{EndStationMarker, StationMarker};

    fn sample() -> TripMap {
        let a = GeoPoint::new(42.36, -71.06);
        let b = GeoPoint::new(42.37, -71.10);
        TripMap {
            start: Some(StationMarker {
                name: "A".to_string(),
                point: a,
            }),
            end_stations: vec![EndStationMarker {
                name: "B & Sons".to_string(),
                point: b,
                trips: 2,
            }],
            paths: vec![
                crate::map::PathSegment { from: a, to: b },
                crate::map::PathSegment { from: a, to: b },
            ],
        }
    }

    #[test]
    fn test_popup_text_and_escaping() {
        let html = render(&sample(), &MapStyle::default()).unwrap();
        assert!(html.contains("<b>Station Name:<\\/b> B &amp; Sons<br><b>Number of rides:<\\/b> 2"));
        assert!(!html.contains("__MAP_DATA__"));
    }

    #[test]
    fn test_script_close_in_name_is_neutralized() {
        let mut map = sample();
        map.start.as_mut().unwrap().name = "</script><b>".to_string();
        let html = render(&map, &MapStyle::default()).unwrap();
        assert_eq!(html.matches("</script>").count(), 3);
    }

    #[test]
    fn test_empty_map_uses_fallback_center() {
        let style = MapStyle::default();
        let html = render(&TripMap::default(), &style).unwrap();
        assert!(html.contains("\"center\":[42.3601,-71.0589]"));
        assert!(html.contains("\"start\":null"));
        assert!(html.contains("\"paths\":[]"));
    }

    #[test]
    fn test_style_deserializes_with_defaults() {
        let style: MapStyle = serde_json::from_str(r#"{"zoom_start": 13}"#).unwrap();
        assert_eq!(style.zoom_start, 13);
        assert_eq!(style.end_color, "red");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"<a href="x">'"#), "&lt;a href=&quot;x&quot;&gt;&#39;");
    }
}
