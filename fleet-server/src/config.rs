//! Application configuration from `FLEET_*` environment variables.
//!
//! | Variable | Default |
//! |---|---|
//! | `FLEET_BIND_ADDR` | `127.0.0.1:3000` |
//! | `FLEET_GEOCODER_URL` | public Nominatim |
//! | `FLEET_USER_AGENT` | `fleet-server/<version>` |
//! | `FLEET_PLACES_FILE` | unset (use the live geocoder) |
//! | `FLEET_OSRM_URL` | public OSRM demo server |
//! | `FLEET_HTTP_TIMEOUT_SECS` | `10` |
//! | `FLEET_TICK_MS` | `100` |
//! | `FLEET_STRIDE` | `1` |
//! | `FLEET_WAYPOINTS` | `first_leg` |
//! | `FLEET_STRAIGHT_LINE_FALLBACK` | `false` |
//! | `FLEET_FALLBACK_POINTS` | `50` |
//! | `FLEET_SESSION_IDLE_SECS` | `1800` |

use std::fmt::Display;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::CacheConfig;
use crate::geocode::GeocoderConfig;
use crate::osrm::OsrmConfig;
use crate::planner::{PlannerConfig, WaypointMode};
use crate::simulator::{SimulationConfig, SimulationError};
use crate::storage::StorageConfig;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Error from reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?} ({message})")]
    Invalid {
        var: &'static str,
        value: String,
        message: String,
    },
}

/// Everything needed to assemble the server.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub geocoder: GeocoderConfig,
    /// Serve geocoding from this places file instead of the live service.
    pub places_file: Option<PathBuf>,
    pub osrm: OsrmConfig,
    pub cache: CacheConfig,
    pub planner: PlannerConfig,
    pub simulation: SimulationConfig,
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through `lookup`, which returns a variable's
    /// value or `None` if unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let bind_addr: SocketAddr = parse_or(&get, "FLEET_BIND_ADDR", || {
            DEFAULT_BIND_ADDR
                .parse::<SocketAddr>()
                .map_err(|e| e.to_string())
        })?;

        let timeout_secs: u64 = parse_or(&get, "FLEET_HTTP_TIMEOUT_SECS", || Ok(10))?;

        let mut geocoder = GeocoderConfig::new().with_timeout(timeout_secs);
        if let Some(url) = get("FLEET_GEOCODER_URL") {
            geocoder = geocoder.with_base_url(url);
        }
        if let Some(agent) = get("FLEET_USER_AGENT") {
            geocoder = geocoder.with_user_agent(agent);
        }

        let mut osrm = OsrmConfig::new().with_timeout(timeout_secs);
        if let Some(url) = get("FLEET_OSRM_URL") {
            osrm = osrm.with_base_url(url);
        }

        let places_file = get("FLEET_PLACES_FILE").map(PathBuf::from);

        let tick_ms: u64 = parse_or(&get, "FLEET_TICK_MS", || Ok(100))?;
        let stride: usize = parse_or(&get, "FLEET_STRIDE", || Ok(1))?;
        let simulation = SimulationConfig::new(Duration::from_millis(tick_ms), stride)
            .map_err(|e| {
                let (var, value) = match e {
                    SimulationError::ZeroStride => ("FLEET_STRIDE", stride.to_string()),
                    SimulationError::ZeroPeriod => ("FLEET_TICK_MS", tick_ms.to_string()),
                };
                ConfigError::Invalid {
                    var,
                    value,
                    message: e.to_string(),
                }
            })?;

        let defaults = PlannerConfig::default();
        let waypoint_mode: WaypointMode =
            parse_or(&get, "FLEET_WAYPOINTS", || Ok(defaults.waypoint_mode))?;
        let straight_line_fallback = match get("FLEET_STRAIGHT_LINE_FALLBACK") {
            Some(v) => parse_bool("FLEET_STRAIGHT_LINE_FALLBACK", &v)?,
            None => defaults.straight_line_fallback,
        };
        let fallback_points: usize =
            parse_or(&get, "FLEET_FALLBACK_POINTS", || Ok(defaults.fallback_points))?;
        if fallback_points < 2 {
            return Err(ConfigError::Invalid {
                var: "FLEET_FALLBACK_POINTS",
                value: fallback_points.to_string(),
                message: "must be at least 2".to_string(),
            });
        }
        let planner = PlannerConfig::new(
            waypoint_mode,
            straight_line_fallback,
            fallback_points,
            defaults.fallback_speed_kmh,
        );

        let idle_secs: u64 = parse_or(&get, "FLEET_SESSION_IDLE_SECS", || Ok(30 * 60))?;
        let storage = StorageConfig::default().with_time_to_idle(Duration::from_secs(idle_secs));

        Ok(Self {
            bind_addr,
            geocoder,
            places_file,
            osrm,
            cache: CacheConfig::default(),
            planner,
            simulation,
            storage,
        })
    }
}

/// Parse `var` if set, otherwise use `default`.
fn parse_or<T, G, D>(get: &G, var: &'static str, default: D) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
    G: Fn(&str) -> Option<String>,
    D: FnOnce() -> Result<T, String>,
{
    match get(var) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            value: raw.clone(),
            message: e.to_string(),
        }),
        None => default().map_err(|message| ConfigError::Invalid {
            var,
            value: String::new(),
            message,
        }),
    }
}

fn parse_bool(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            var,
            value: raw.to_string(),
            message: "expected true or false".to_string(),
        }),
    }
}
