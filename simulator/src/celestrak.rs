//! CelesTrak relay element retrieval
//!
//! Fetches a satellite group in the plain TLE text format (free, no auth)
//! and parses it into element pairs. Network and HTTP failures are
//! reported to the caller; the simulation core never sees them.

use anyhow::Result;
use orbital_mechanics::{parse_tle_text, TwoLineElements};
use std::time::Duration;
use tracing::{info, warn};

const CELESTRAK_BASE: &str = "https://celestrak.org/NORAD/elements/gp.php";

/// Iridium NEXT, 66 operational relays plus spares
pub const DEFAULT_GROUP: &str = "iridium-NEXT";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub fn group_url(group: &str) -> String {
    format!("{}?FORMAT=tle&GROUP={}", CELESTRAK_BASE, group)
}

/// Fetch and parse the TLEs of a CelesTrak group
pub async fn fetch_group_tles(group: &str) -> Result<Vec<TwoLineElements>> {
    let url = group_url(group);
    info!("Fetching TLEs from CelesTrak: {}", group);

    let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
    let response = client.get(&url).send().await?;

    if !response.status().is_success() {
        anyhow::bail!("CelesTrak returned status: {}", response.status());
    }

    let text = response.text().await?;
    let tles = parse_tle_text(&text);
    if tles.is_empty() {
        warn!("CelesTrak group {} returned no element sets", group);
    } else {
        info!("Fetched {} TLEs from CelesTrak", tles.len());
    }

    Ok(tles)
}
