use crate::engine::BucketSet;
use std::collections::HashMap;
use thiserror::Error;

pub const DEFAULT_REVENUE_WINDOW_SECS: f64 = 60.0 * 60.0 * 24.0 * 14.0;
pub const DEFAULT_REPUTATION_MULTIPLIER: u32 = 12;
pub const DEFAULT_LOOKBACK_SECS: f64 = 60.0 * 60.0 * 24.0 * 30.0 * 6.0;
pub const DEFAULT_HTLC_RESOLUTION_SECS: f64 = 60.0;
pub const DEFAULT_SLOT_BUCKETS: &str = "0,1,2,5,10,20,50,100,200,400";
pub const DEFAULT_LIQUIDITY_BUCKETS: &str = "0,0.5,1,2,5,10,15,25,50,75,90,95";

#[derive(Debug, Clone)]
pub struct Config {
    pub revenue_window_secs: f64,
    pub reputation_multiplier: u32,
    pub lookback_secs: f64,
    pub htlc_resolution_secs: f64,
    pub slot_buckets: BucketSet,
    pub liquidity_buckets: BucketSet,
    pub channel_id_mode: ChannelIdMode,
    pub track_utilization: bool,
}

/// How channel ids appear in score output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelIdMode {
    /// The id as read from the input.
    Raw,
    /// 1..n in sorted id order.
    Sequential,
    /// Truncated SHA-256 of the id.
    Hashed,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env_map(HashMap::new()).expect("default configuration is valid")
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let revenue_window_secs = parse_positive_secs(
            &env_map,
            "REVENUE_WINDOW_SECS",
            DEFAULT_REVENUE_WINDOW_SECS,
        )?;

        let reputation_multiplier = match env_map.get("REPUTATION_MULTIPLIER") {
            None => DEFAULT_REPUTATION_MULTIPLIER,
            Some(s) => s.trim().parse::<u32>().ok().filter(|m| *m >= 1).ok_or_else(|| {
                ConfigError::InvalidValue(
                    "REPUTATION_MULTIPLIER".to_string(),
                    "must be an integer >= 1".to_string(),
                )
            })?,
        };

        let lookback_secs = parse_positive_secs(&env_map, "LOOKBACK_SECS", DEFAULT_LOOKBACK_SECS)?;

        let htlc_resolution_secs = parse_positive_secs(
            &env_map,
            "HTLC_RESOLUTION_SECS",
            DEFAULT_HTLC_RESOLUTION_SECS,
        )?;

        let slot_buckets = parse_buckets(&env_map, "SLOT_BUCKETS", DEFAULT_SLOT_BUCKETS)?;
        let liquidity_buckets =
            parse_buckets(&env_map, "LIQUIDITY_BUCKETS", DEFAULT_LIQUIDITY_BUCKETS)?;

        let channel_id_mode = match env_map
            .get("CHANNEL_ID_MODE")
            .map(|s| s.as_str())
            .unwrap_or("raw")
        {
            "raw" => ChannelIdMode::Raw,
            "sequential" => ChannelIdMode::Sequential,
            "hashed" => ChannelIdMode::Hashed,
            other => {
                return Err(ConfigError::InvalidValue(
                    "CHANNEL_ID_MODE".to_string(),
                    format!("must be raw, sequential, or hashed, got {}", other),
                ))
            }
        };

        let track_utilization = match env_map
            .get("TRACK_UTILIZATION")
            .map(|s| s.as_str())
            .unwrap_or("false")
        {
            "true" | "1" => true,
            "false" | "0" => false,
            other => {
                return Err(ConfigError::InvalidValue(
                    "TRACK_UTILIZATION".to_string(),
                    format!("must be true or false, got {}", other),
                ))
            }
        };

        Ok(Config {
            revenue_window_secs,
            reputation_multiplier,
            lookback_secs,
            htlc_resolution_secs,
            slot_buckets,
            liquidity_buckets,
            channel_id_mode,
            track_utilization,
        })
    }

    /// Replace the HTLC resolution delay, rejecting non-positive values.
    pub fn with_htlc_resolution_secs(mut self, secs: f64) -> Result<Self, ConfigError> {
        if !(secs.is_finite() && secs > 0.0) {
            return Err(ConfigError::InvalidValue(
                "HTLC_RESOLUTION_SECS".to_string(),
                "must be a positive number".to_string(),
            ));
        }
        self.htlc_resolution_secs = secs;
        Ok(self)
    }

    /// Period of the reputation accumulator.
    pub fn reputation_period_secs(&self) -> f64 {
        self.revenue_window_secs * f64::from(self.reputation_multiplier)
    }
}

fn parse_positive_secs(
    env_map: &HashMap<String, String>,
    key: &str,
    default: f64,
) -> Result<f64, ConfigError> {
    let Some(raw) = env_map.get(key) else {
        return Ok(default);
    };
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
        .ok_or_else(|| {
            ConfigError::InvalidValue(key.to_string(), "must be a positive number".to_string())
        })
}

fn parse_buckets(
    env_map: &HashMap<String, String>,
    key: &str,
    default: &str,
) -> Result<BucketSet, ConfigError> {
    let raw = env_map.get(key).map(|s| s.as_str()).unwrap_or(default);
    let thresholds = raw
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<f64>().map_err(|_| {
                ConfigError::InvalidValue(key.to_string(), format!("not a number: {}", s))
            })
        })
        .collect::<Result<Vec<f64>, _>>()?;

    BucketSet::new(thresholds).map_err(|e| ConfigError::InvalidValue(key.to_string(), e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_env_map(HashMap::new()).unwrap();
        assert_eq!(config.revenue_window_secs, 1_209_600.0);
        assert_eq!(config.reputation_multiplier, 12);
        assert_eq!(config.htlc_resolution_secs, 60.0);
        assert_eq!(config.slot_buckets.thresholds().len(), 10);
        assert_eq!(config.liquidity_buckets.thresholds()[1], 0.5);
        assert_eq!(config.channel_id_mode, ChannelIdMode::Raw);
        assert!(!config.track_utilization);
        assert_eq!(config.reputation_period_secs(), 1_209_600.0 * 12.0);
    }

    #[test]
    fn test_overrides() {
        let mut env_map = HashMap::new();
        env_map.insert("HTLC_RESOLUTION_SECS".to_string(), "0.5".to_string());
        env_map.insert("SLOT_BUCKETS".to_string(), "0, 1, 483".to_string());
        env_map.insert("CHANNEL_ID_MODE".to_string(), "sequential".to_string());
        env_map.insert("TRACK_UTILIZATION".to_string(), "true".to_string());

        let config = Config::from_env_map(env_map).unwrap();
        assert_eq!(config.htlc_resolution_secs, 0.5);
        assert_eq!(config.slot_buckets.thresholds(), &[0.0, 1.0, 483.0]);
        assert_eq!(config.channel_id_mode, ChannelIdMode::Sequential);
        assert!(config.track_utilization);
    }

    #[test]
    fn test_invalid_multiplier() {
        let mut env_map = HashMap::new();
        env_map.insert("REPUTATION_MULTIPLIER".to_string(), "0".to_string());
        match Config::from_env_map(env_map) {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "REPUTATION_MULTIPLIER"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_invalid_resolution_time() {
        let mut env_map = HashMap::new();
        env_map.insert("HTLC_RESOLUTION_SECS".to_string(), "-3".to_string());
        match Config::from_env_map(env_map) {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "HTLC_RESOLUTION_SECS"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_unsorted_buckets() {
        let mut env_map = HashMap::new();
        env_map.insert("LIQUIDITY_BUCKETS".to_string(), "0,5,1".to_string());
        match Config::from_env_map(env_map) {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "LIQUIDITY_BUCKETS"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_resolution_override() {
        let config = Config::default().with_htlc_resolution_secs(5.0).unwrap();
        assert_eq!(config.htlc_resolution_secs, 5.0);
        assert!(Config::default().with_htlc_resolution_secs(0.0).is_err());
        assert!(Config::default().with_htlc_resolution_secs(f64::NAN).is_err());
    }

    #[test]
    fn test_invalid_channel_id_mode() {
        let mut env_map = HashMap::new();
        env_map.insert("CHANNEL_ID_MODE".to_string(), "secret".to_string());
        match Config::from_env_map(env_map) {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "CHANNEL_ID_MODE"),
            _ => panic!("Expected InvalidValue error"),
        }
    }
}
