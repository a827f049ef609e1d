use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;

/// Construction parameters for a [`crate::ctrl::MessMemCtrl`]. Immutable
/// after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemCtrlConfig {
    /// Directory holding the `bwlat_{0,2,..100}.txt` curve family.
    pub curve_path: PathBuf,
    /// Frequency (GHz) at which the curve latencies were measured.
    pub curve_frequency: f64,
    /// Number of accesses per measurement window. Simulators typically use
    /// 500-5000; toy/unit-test scenarios use much smaller windows.
    pub window_size: u32,
    /// Frequency (GHz) of the simulated CPU whose cycles `access()`
    /// accepts and returns.
    pub cpu_frequency: f64,
    /// Constant on-core latency portion (cycles) subtracted from curve
    /// values during loading.
    pub on_core_latency: f64,
}

impl MemCtrlConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_size < 1 {
            return Err(ConfigError::InvalidWindowSize(self.window_size as usize));
        }
        if self.cpu_frequency <= 0.0 {
            return Err(ConfigError::InvalidCpuFrequency(self.cpu_frequency));
        }
        if self.curve_frequency <= 0.0 {
            return Err(ConfigError::InvalidCurveFrequency(self.curve_frequency));
        }
        Ok(())
    }

    /// Load a config from a JSON file on disk, following the teacher's
    /// config-as-JSON convention for the CLI driver.
    pub fn load_json(path: &std::path::Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: MemCtrlConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> MemCtrlConfig {
        MemCtrlConfig {
            curve_path: PathBuf::from("/tmp/curves"),
            curve_frequency: 2.1,
            window_size: 1000,
            cpu_frequency: 1.5,
            on_core_latency: 51.0,
        }
    }

    #[test]
    fn rejects_zero_window_size() {
        let mut config = valid_config();
        config.window_size = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidWindowSize(0))
        ));
    }

    #[test]
    fn rejects_non_positive_frequencies() {
        let mut config = valid_config();
        config.cpu_frequency = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidCpuFrequency(_))
        ));

        let mut config = valid_config();
        config.curve_frequency = -1.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidCurveFrequency(_))
        ));
    }

    #[test]
    fn accepts_well_formed_config() {
        assert!(valid_config().validate().is_ok());
    }
}
