use std::path::Path;

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};

/// One-shot GET with a fixed-TTL file cache. A cache file younger than
/// ttl_seconds is reused without touching the network; ttl_seconds = 0
/// disables the cache entirely.
pub fn fetch_cached(url: &str, cache_path: &str, ttl_seconds: u64) -> Result<String> {
    if ttl_seconds > 0 {
        if let Some(body) = read_fresh(cache_path, ttl_seconds)? {
            info!("Using cached copy at {cache_path}");
            return Ok(body);
        }
    }

    info!("Fetching {url}");
    let body = ureq::get(url).call()?.into_string()?;

    if ttl_seconds > 0 {
        if let Some(dir) = Path::new(cache_path).parent() {
            fs_err::create_dir_all(dir)?;
        }
        fs_err::write(cache_path, &body)?;
    }
    Ok(body)
}

fn read_fresh(cache_path: &str, ttl_seconds: u64) -> Result<Option<String>> {
    let metadata = match fs_err::metadata(cache_path) {
        Ok(metadata) => metadata,
        Err(_) => {
            return Ok(None);
        }
    };
    let modified: DateTime<Utc> = metadata.modified()?.into();
    if Utc::now() - modified > Duration::seconds(ttl_seconds as i64) {
        debug!("Cache at {cache_path} is stale");
        return Ok(None);
    }
    Ok(Some(fs_err::read_to_string(cache_path)?))
}
