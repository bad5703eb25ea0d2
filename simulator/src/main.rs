//! Beacon Link Simulator CLI
//!
//! Propagates two anti-phase beacons on an operator-chosen circular orbit
//! against a relay constellation for 24 hours and reports handshakes,
//! outages and the outage duration histogram.
//!
//! Usage:
//!   beacon-sim --altitude-km 600 --lst 11:00 --cone-half-angle-deg 20
//!   beacon-sim --inclination-deg 45 --tle-file iridium.tle --output run.json
//!   beacon-sim --config sim.json --celestrak-group iridium-NEXT

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use link_availability::{OrbitSelection, Simulation, SimulationConfig, VisibilityFormulation};
use orbital_mechanics::{parse_tle_text, Horizon, TwoLineElements};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod celestrak;
mod report;

use report::SimulationReport;

#[derive(Parser, Debug)]
#[command(
    name = "beacon-sim",
    about = "Simulate beacon-to-relay link availability over one day"
)]
struct Args {
    /// JSON simulation config (replaces the orbit and cone flags)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Beacon altitude in km
    #[arg(long, default_value_t = 600.0)]
    altitude_km: f64,

    /// Beacon inclination in degrees; sun-synchronous (97.5°) when omitted
    #[arg(long)]
    inclination_deg: Option<f64>,

    /// Local solar time of the beacon orbit, HH:MM
    #[arg(long, default_value = "11:00")]
    lst: String,

    /// Communication cone half-angle in degrees
    #[arg(long, default_value_t = 20.0)]
    cone_half_angle_deg: f64,

    /// Test the beacon→relay vector against the beacon zenith instead of
    /// the angle between position vectors
    #[arg(long)]
    zenith: bool,

    /// Maximum link range in km (zenith geometry only)
    #[arg(long, requires = "zenith")]
    max_range_km: Option<f64>,

    /// Read relay TLEs from a file
    #[arg(long, conflicts_with_all = ["celestrak_group", "no_relays"])]
    tle_file: Option<PathBuf>,

    /// Fetch relay TLEs for this CelesTrak group [default: iridium-NEXT]
    #[arg(long, conflicts_with = "no_relays")]
    celestrak_group: Option<String>,

    /// Run with an empty relay constellation
    #[arg(long)]
    no_relays: bool,

    /// Output JSON file (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Include per-body trajectories in the report
    #[arg(long)]
    include_positions: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn simulation_config(&self) -> Result<SimulationConfig> {
        if let Some(path) = &self.config {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            return serde_json::from_str(&text)
                .with_context(|| format!("parsing config {}", path.display()));
        }

        let orbit = match self.inclination_deg {
            Some(inclination_deg) => OrbitSelection::Inclined { inclination_deg },
            None => OrbitSelection::SunSynchronous,
        };
        let visibility = if self.zenith {
            VisibilityFormulation::Zenith {
                max_range_km: self.max_range_km,
            }
        } else {
            VisibilityFormulation::PositionAngle
        };

        Ok(SimulationConfig {
            altitude_km: self.altitude_km,
            orbit,
            local_solar_time: self.lst.clone(),
            cone_half_angle_deg: self.cone_half_angle_deg,
            visibility,
            horizon: Horizon::DAY,
        })
    }

    async fn load_relays(&self) -> Result<Vec<TwoLineElements>> {
        if self.no_relays {
            return Ok(Vec::new());
        }

        if let Some(path) = &self.tle_file {
            let text = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("reading TLE file {}", path.display()))?;
            let tles = parse_tle_text(&text);
            info!("Loaded {} TLEs from {}", tles.len(), path.display());
            return Ok(tles);
        }

        let group = self
            .celestrak_group
            .as_deref()
            .unwrap_or(celestrak::DEFAULT_GROUP);
        celestrak::fetch_group_tles(group).await
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let default_filter = if args.verbose {
        "beacon_sim=debug,link_availability=debug,orbital_mechanics=debug"
    } else {
        "beacon_sim=info,link_availability=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = args.simulation_config()?;
    let simulation = Simulation::new(config.clone())?;

    info!(
        "Beacon orbit: {:.1} km, {:.1}°, LST {}, cone {:.1}°",
        config.altitude_km,
        config.orbit.inclination_deg(),
        config.local_solar_time,
        config.cone_half_angle_deg
    );

    let relays = args.load_relays().await?;
    let epoch = Utc::now();

    info!("Propagating {} relays over {} samples", relays.len(), config.horizon.samples);
    let run = tokio::task::spawn_blocking(move || simulation.run(epoch, &relays)).await?;

    info!("{}", "=".repeat(60));
    info!("Handshakes:     {}", run.handshake_count());
    info!("Outages:        {}", run.statistics.outage_count);
    info!("Total outage:   {} s", run.statistics.total_outage_seconds);
    match run.statistics.mean_outage_seconds {
        Some(mean) => info!("Mean outage:    {:.1} s", mean),
        None => info!("Mean outage:    -"),
    }
    if !run.excluded_relays.is_empty() {
        info!("Excluded relays: {}", run.excluded_relays.len());
    }
    info!("{}", "=".repeat(60));

    let report = SimulationReport::new(&config, &run, args.include_positions);
    report.write(args.output.as_deref())?;
    if let Some(path) = &args.output {
        info!("Report written to {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_flags_are_sun_synchronous() {
        let args = Args::parse_from(["beacon-sim", "--no-relays"]);
        let config = args.simulation_config().unwrap();
        assert_eq!(config.orbit, OrbitSelection::SunSynchronous);
        assert_eq!(config.local_solar_time, "11:00");
        assert_eq!(config.visibility, VisibilityFormulation::PositionAngle);
    }

    #[test]
    fn test_inclined_zenith_flags() {
        let args = Args::parse_from([
            "beacon-sim",
            "--inclination-deg",
            "45",
            "--zenith",
            "--max-range-km",
            "4000",
        ]);
        let config = args.simulation_config().unwrap();
        assert_eq!(config.orbit.inclination_deg(), 45.0);
        assert_eq!(
            config.visibility,
            VisibilityFormulation::Zenith { max_range_km: Some(4000.0) }
        );
    }

    #[test]
    fn test_relay_sources_conflict() {
        let parsed = Args::try_parse_from(["beacon-sim", "--tle-file", "a.tle", "--no-relays"]);
        assert!(parsed.is_err());
        let parsed = Args::try_parse_from(["beacon-sim", "--max-range-km", "100"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sim.json");
        std::fs::write(
            &path,
            r#"{"altitude_km": 550.0, "orbit": {"kind": "sun_synchronous"},
                "local_solar_time": "13:30", "cone_half_angle_deg": 12.5}"#,
        )
        .unwrap();

        let args = Args::parse_from(["beacon-sim", "--config", path.to_str().unwrap()]);
        let config = args.simulation_config().unwrap();
        assert_eq!(config.altitude_km, 550.0);
        assert_eq!(config.cone_half_angle_deg, 12.5);
        assert_eq!(config.horizon, Horizon::DAY);
    }
}
