#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod radius;
mod stops;

use anyhow::Result;
use geojson::GeoJson;

pub use self::radius::{compute_radii, Scale, Sizing};
pub use self::stops::Stop;

pub struct Model {
    pub stops: Vec<Stop>,
    pub size_column: String,
}

impl Model {
    /// Parses an ArcGIS GeoJSON query response. Features without a Point
    /// geometry are skipped; a size column that no feature carries is an
    /// error, since every marker would silently size identically.
    pub fn parse_geojson(raw: &str, size_column: &str) -> Result<Self> {
        let collection = match raw.parse::<GeoJson>()? {
            GeoJson::FeatureCollection(collection) => collection,
            _ => bail!("expected a GeoJSON FeatureCollection"),
        };

        let mut stops = Vec::new();
        let mut has_size_column = false;
        let mut skipped = 0;
        for feature in &collection.features {
            if feature.contains_property(size_column) {
                has_size_column = true;
            }
            match Stop::from_feature(feature, size_column) {
                Some(stop) => stops.push(stop),
                None => {
                    skipped += 1;
                }
            }
        }
        if skipped > 0 {
            warn!("Skipped {skipped} features without a Point geometry");
        }
        if !stops.is_empty() && !has_size_column {
            bail!("Column \"{size_column}\" not found in any feature");
        }

        Ok(Self {
            stops,
            size_column: size_column.to_string(),
        })
    }

    /// Mean position of all stops, for centering the initial view.
    pub fn center(&self) -> Option<(f64, f64)> {
        if self.stops.is_empty() {
            return None;
        }
        let n = self.stops.len() as f64;
        let lat = self.stops.iter().map(|s| s.lat).sum::<f64>() / n;
        let lon = self.stops.iter().map(|s| s.lon).sum::<f64>() / n;
        Some((lat, lon))
    }

    /// Per-stop pixel radii, sized by the batch of ridership values.
    pub fn radii(&self, sizing: &Sizing) -> Vec<f64> {
        let values: Vec<Option<f64>> = self.stops.iter().map(|s| s.size_value).collect();
        compute_radii(&values, sizing)
    }
}
