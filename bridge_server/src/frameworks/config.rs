use crate::domain::scenario::ScenarioSettings;
use std::{env, net::IpAddr, str::FromStr, time::Duration};

// Runtime/server settings (not gameplay tuning).

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

pub fn http_port() -> u16 {
    env_or("BRIDGE_SERVER_PORT", 3001)
}

pub fn http_host() -> IpAddr {
    env_or("BRIDGE_SERVER_HOST", IpAddr::from([127, 0, 0, 1]))
}

/// Fixed simulation step derived from `TICK_RATE_HZ`.
pub fn tick_interval() -> Duration {
    let hz: u32 = env_or("TICK_RATE_HZ", 30).clamp(1, 240);
    Duration::from_secs_f64(1.0 / f64::from(hz))
}

pub fn snapshot_interval() -> Duration {
    Duration::from_millis(env_or("SNAPSHOT_INTERVAL_MS", 50u64).max(1))
}

pub fn max_in_flight_snapshots() -> usize {
    env_or("MAX_IN_FLIGHT_SNAPSHOTS", 3)
}

pub fn scenario() -> ScenarioSettings {
    let defaults = ScenarioSettings::default();
    ScenarioSettings {
        pirates: env_or("SCENARIO_PIRATES", defaults.pirates),
        traders: env_or("SCENARIO_TRADERS", defaults.traders),
        asteroids: env_or("SCENARIO_ASTEROIDS", defaults.asteroids),
    }
}

pub const INPUT_CHANNEL_CAPACITY: usize = 1024;
