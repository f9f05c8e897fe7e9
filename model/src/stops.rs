use geojson::Feature;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One bus stop from the GIS layer, in WGS84.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Stop {
    pub lon: f64,
    pub lat: f64,
    pub stop_id: Option<String>,
    pub name: Option<String>,
    pub routes: Option<String>,
    pub direction: Option<String>,
    pub on_street: Option<String>,
    pub at_street: Option<String>,
    /// The ridership metric this stop is sized by, if it coerced to a number
    pub size_value: Option<f64>,
    /// The metric's original text, for display
    pub size_label: Option<String>,
}

impl Stop {
    /// None if the feature has no usable Point geometry.
    pub(crate) fn from_feature(feature: &Feature, size_column: &str) -> Option<Self> {
        let (lon, lat) = match feature.geometry.as_ref().map(|g| &g.value) {
            Some(geojson::Value::Point(pt)) if pt.len() >= 2 => (pt[0], pt[1]),
            _ => {
                return None;
            }
        };
        let size_property = feature.property(size_column);
        Some(Self {
            lon,
            lat,
            stop_id: text_property(feature, "StopID"),
            name: text_property(feature, "StopName"),
            routes: text_property(feature, "Routes"),
            direction: text_property(feature, "Direction"),
            on_street: text_property(feature, "OnStreet"),
            at_street: text_property(feature, "AtStreet"),
            size_value: size_property.and_then(coerce_number),
            size_label: size_property.and_then(display_text),
        })
    }

    /// The attributes shown in tooltips and popups, in display order, skipping
    /// anything this stop doesn't have.
    pub fn display_attributes(&self) -> Vec<(&'static str, &str)> {
        let mut attributes = Vec::new();
        for (column, value) in [
            ("StopID", &self.stop_id),
            ("StopName", &self.name),
            ("Routes", &self.routes),
            ("Direction", &self.direction),
            ("OnStreet", &self.on_street),
            ("AtStreet", &self.at_street),
        ] {
            if let Some(value) = value {
                attributes.push((column, value.as_str()));
            }
        }
        attributes
    }

    /// A Google Street View deep link pointed at this stop.
    pub fn streetview_url(&self) -> String {
        format!(
            "https://www.google.com/maps/@?api=1&map_action=pano&viewpoint={:.6},{:.6}",
            self.lat, self.lon
        )
    }
}

fn text_property(feature: &Feature, key: &str) -> Option<String> {
    feature.property(key).and_then(display_text)
}

fn display_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(x) => Some(x.clone()),
        x => Some(x.to_string()),
    }
}

/// Parse-or-mark-missing: JSON numbers and numeric strings become values,
/// everything else (null, text, non-finite) counts as missing.
pub(crate) fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(x) => x.as_f64().filter(|v| v.is_finite()),
        Value::String(x) => x.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}
