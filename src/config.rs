//! Server settings read from the environment.
//!
//! - `HOST` (default `0.0.0.0`)
//! - `PORT` (default `8080`)
//! - `BRACKET_SEED`: fixed seed for the bracket shuffle; random when unset.

use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub bracket_seed: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            bracket_seed: None,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unparsable values fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let host = lookup("HOST").unwrap_or_else(default_host);
        let port = lookup("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or_else(default_port);
        let bracket_seed = lookup("BRACKET_SEED").and_then(|s| s.parse().ok());
        Self {
            host,
            port,
            bracket_seed,
        }
    }

    /// Random source for bracket generation.
    pub fn rng(&self) -> StdRng {
        match self.bracket_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}
