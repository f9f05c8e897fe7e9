#[macro_use]
extern crate log;

mod fetch;
mod html;
mod map;

use anyhow::Result;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use structopt::StructOpt;

use model::{Model, Scale, Sizing};

use self::map::{MapPage, Marker};

const ART_STOPS_URL: &str = "https://gis.ashevillenc.gov/server/rest/services/Transportation/ARTBusStops/MapServer/10/query?outFields=*&where=1%3D1&f=geojson";

#[derive(StructOpt)]
struct Args {
    /// The ArcGIS GeoJSON query endpoint to fetch stops from, if not the ART
    /// layer
    #[structopt(long)]
    url: Option<String>,
    /// The path to a local GeoJSON file, instead of fetching
    #[structopt(long)]
    geojson: Option<String>,
    /// The numeric property to size stops by
    #[structopt(long, default_value = "rider_total")]
    size_column: String,
    /// "log" suits skewed ridership counts; "linear" is available too
    #[structopt(long, default_value = "log")]
    scale: Scale,
    /// Smallest circle radius, in pixels
    #[structopt(long, default_value = "1")]
    min_radius: f64,
    /// Largest circle radius, in pixels
    #[structopt(long, default_value = "10")]
    max_radius: f64,
    /// Winsorize both tails by this percentage (2 clips to the 2nd-98th
    /// percentiles); 0 disables clipping
    #[structopt(long, default_value = "2")]
    clip_pct: f64,
    /// Where to cache the fetched GeoJSON
    #[structopt(long, default_value = "data/cache/stops.geojson")]
    cache: String,
    /// Cache freshness in seconds; 0 always refetches
    #[structopt(long, default_value = "3600")]
    cache_ttl: u64,
    /// The output HTML file
    #[structopt(long, default_value = "map.html")]
    out: String,
}

impl Args {
    fn load_geojson(&self) -> Result<String> {
        if let Some(path) = &self.geojson {
            return Ok(fs_err::read_to_string(path)?);
        }
        let url = self.url.as_deref().unwrap_or(ART_STOPS_URL);
        fetch::fetch_cached(url, &self.cache, self.cache_ttl)
    }
}

pub fn run() -> Result<()> {
    TermLogger::init(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;
    let args = Args::from_args();
    if args.min_radius > args.max_radius {
        warn!(
            "--min-radius {} exceeds --max-radius {}; radii will fall outside the interval",
            args.min_radius, args.max_radius
        );
    }

    let raw = args.load_geojson()?;
    let model = Model::parse_geojson(&raw, &args.size_column)?;
    info!("{} stops loaded", model.stops.len());

    let sizing = Sizing {
        scale: args.scale,
        min_radius: args.min_radius,
        max_radius: args.max_radius,
        clip_pct: args.clip_pct,
    };
    let radii = model.radii(&sizing);

    let markers = model
        .stops
        .iter()
        .zip(radii)
        .map(|(stop, radius)| Marker {
            lat: stop.lat,
            lon: stop.lon,
            radius,
            tooltip: html::tooltip(stop, &model.size_column),
            popup: html::popup(stop, &model.size_column),
        })
        .collect();

    let page = MapPage {
        title: format!("ART Bus Stops, sized by {}", model.size_column),
        center: model.center().unwrap_or((0.0, 0.0)),
        zoom: 12,
        markers,
    };
    fs_err::write(&args.out, page.render()?)?;
    info!("Wrote {}", args.out);
    Ok(())
}
