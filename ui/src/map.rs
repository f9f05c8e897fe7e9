use anyhow::Result;

/// One size-encoded circle on the map, with pre-rendered HTML payloads.
pub struct Marker {
    pub lat: f64,
    pub lon: f64,
    pub radius: f64,
    pub tooltip: String,
    pub popup: String,
}

/// A self-contained Leaflet page: satellite tiles, circle markers sized per
/// stop, sticky hover tooltips, and click popups.
pub struct MapPage {
    pub title: String,
    pub center: (f64, f64),
    pub zoom: usize,
    pub markers: Vec<Marker>,
}

impl MapPage {
    pub fn render(&self) -> Result<String> {
        let mut out = String::new();
        out.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
        out.push_str("<meta charset=\"utf-8\">\n");
        out.push_str(&format!(
            "<title>{}</title>\n",
            crate::html::escape(&self.title)
        ));
        out.push_str(
            "<link rel=\"stylesheet\" href=\"https://unpkg.com/leaflet@1.9.4/dist/leaflet.css\">\n",
        );
        out.push_str("<script src=\"https://unpkg.com/leaflet@1.9.4/dist/leaflet.js\"></script>\n");
        out.push_str("<style>html, body, #map { height: 100%; margin: 0; }</style>\n");
        out.push_str("</head>\n<body>\n<div id=\"map\"></div>\n<script>\n");

        out.push_str(&format!(
            "var map = L.map('map').setView([{}, {}], {});\n",
            self.center.0, self.center.1, self.zoom
        ));
        out.push_str(concat!(
            "var satellite = L.tileLayer('https://server.arcgisonline.com/ArcGIS/rest/services",
            "/World_Imagery/MapServer/tile/{z}/{y}/{x}', { attribution: 'Esri' }).addTo(map);\n",
        ));
        out.push_str("var stops = L.layerGroup().addTo(map);\n");

        for marker in &self.markers {
            let tooltip = js_string(&marker.tooltip)?;
            let popup = js_string(&marker.popup)?;
            out.push_str(&format!(
                "L.circleMarker([{}, {}], {{ radius: {}, weight: 0, color: 'blue', fill: true, \
                 fillColor: 'green', fillOpacity: 0.9 }})\
                 .bindTooltip({tooltip}, {{ sticky: true }})\
                 .bindPopup({popup}, {{ maxWidth: 350 }})\
                 .addTo(stops);\n",
                marker.lat, marker.lon, marker.radius
            ));
        }

        out.push_str(
            "L.control.layers({ 'Esri Satellite': satellite }, { 'Stops': stops }).addTo(map);\n",
        );
        out.push_str("</script>\n</body>\n</html>\n");
        Ok(out)
    }
}

// JSON string literals are valid JS, so arbitrary attribute text can't break
// out of the script. The one gap is a literal </script> closing our tag, so
// escape the slash too.
fn js_string(text: &str) -> Result<String> {
    Ok(serde_json::to_string(text)?.replace("</", "<\\/"))
}
