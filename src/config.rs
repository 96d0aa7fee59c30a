//! Runner configuration loaded from environment variables.
//!
//! Every setting has a default; no config file is read.
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `AQUA_LEVEL` | `1` | Level to start on |
//! | `AQUA_SEED` | wall clock | Seed for the session RNG |
//! | `AQUA_SAVE_PATH` | `aqua-match-save.json` | Player profile file |
//! | `AQUA_LOG_PATH` | unset | Log file; logging is off when unset |
//! | `AQUA_LOG_LEVEL` | `info` | tracing filter, e.g. `aqua_match_core=debug,info` |
//! | `AQUA_STARTER_POWERUPS` | `0` | Units of each power-up in a fresh profile |
//! | `AQUA_DENSITY_LAYOUT` | `false` | Random density layout instead of full rows |

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::engine::{LayoutStyle, SessionConfig};

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub level: u32,
    pub seed: u32,
    pub save_path: PathBuf,
    pub log_path: Option<PathBuf>,
    /// Tracing filter string.
    pub log_level: String,
    pub starter_powerups: u32,
    pub density_layout: bool,
}

impl RunConfig {
    pub fn from_env() -> Self {
        Self {
            level:            env_parse("AQUA_LEVEL", 1),
            seed:             env_parse("AQUA_SEED", clock_seed()),
            save_path:        PathBuf::from(env_str("AQUA_SAVE_PATH", "aqua-match-save.json")),
            log_path:         std::env::var_os("AQUA_LOG_PATH").map(PathBuf::from),
            log_level:        env_str("AQUA_LOG_LEVEL", "info"),
            starter_powerups: env_parse("AQUA_STARTER_POWERUPS", 0),
            density_layout:   env_bool("AQUA_DENSITY_LAYOUT"),
        }
    }

    /// Session tunables for this run
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            layout: if self.density_layout {
                LayoutStyle::Density
            } else {
                LayoutStyle::Initial
            },
            ..SessionConfig::default()
        }
    }
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}

fn env_bool(key: &str) -> bool {
    std::env::var(key).map(|v| v == "1" || v.eq_ignore_ascii_case("true")).unwrap_or(false)
}

fn env_str(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_overrides_and_defaults() {
        std::env::set_var("AQUA_LEVEL", "7");
        std::env::set_var("AQUA_SEED", "99");
        std::env::set_var("AQUA_DENSITY_LAYOUT", "TRUE");
        std::env::set_var("AQUA_STARTER_POWERUPS", "not-a-number");
        let cfg = RunConfig::from_env();
        std::env::remove_var("AQUA_LEVEL");
        std::env::remove_var("AQUA_SEED");
        std::env::remove_var("AQUA_DENSITY_LAYOUT");
        std::env::remove_var("AQUA_STARTER_POWERUPS");

        assert_eq!(cfg.level, 7);
        assert_eq!(cfg.seed, 99);
        assert_eq!(cfg.starter_powerups, 0);
        assert_eq!(cfg.session_config().layout, LayoutStyle::Density);
        assert_eq!(cfg.session_config().height, 12);
    }
}
