use std::{env, net::IpAddr, path::PathBuf, time::Duration};

// Runtime/server constants (not gameplay tuning).

pub fn bind_address() -> IpAddr {
    env::var("ARENA_BIND_ADDR")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(IpAddr::from([0, 0, 0, 0]))
}

pub fn http_port() -> u16 {
    env::var("ARENA_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000)
}

/// Directory holding the browser client, served at `/`.
pub fn static_dir() -> PathBuf {
    env::var("ARENA_STATIC_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("docs"))
}

pub fn tick_interval() -> Duration {
    let millis = env::var("ARENA_TICK_INTERVAL_MS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(16);
    Duration::from_millis(millis)
}

/// Output style for structured logs, picked with `LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Compact,
        }
    }
}

pub fn log_format() -> LogFormat {
    LogFormat::parse(env::var("LOG_FORMAT").ok().as_deref())
}

pub const OUTBOUND_QUEUE_CAPACITY: usize = 32;

// Simulated time per tick, independent of the wall-clock tick interval.
pub const SIMULATION_STEP_SECONDS: f64 = 1.0 / 60.0;
