// Configuration management
//
// Settings that change console behaviour at power-on. Persisted as TOML
// so frontends can keep them next to their own configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::path::Path;

/// Video region, selecting NTSC or PAL frame timing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Region {
    Ntsc,
    Pal,
}

impl Region {
    pub fn is_pal(self) -> bool {
        self == Region::Pal
    }
}

/// Emulator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmulatorConfig {
    /// Video region (frame length, PPU status flag)
    pub region: Region,

    /// Byte pattern work RAM is filled with on a hard reset
    pub ram_fill: u8,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        EmulatorConfig {
            region: Region::Ntsc,
            ram_fill: 0x00,
        }
    }
}

/// Errors that can occur loading or saving a configuration
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error
    Io(io::Error),

    /// Malformed configuration file
    Parse(toml::de::Error),

    /// Serialization error
    Serialize(toml::ser::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "I/O error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Serialize(e) => write!(f, "Serialization error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<io::Error> for ConfigError {
    fn from(e: io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(e: toml::ser::Error) -> Self {
        ConfigError::Serialize(e)
    }
}

impl EmulatorConfig {
    /// Load a configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Save the configuration as TOML
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_region_is_ntsc() {
        let config = EmulatorConfig::default();
        assert_eq!(config.region, Region::Ntsc);
        assert!(!config.region.is_pal());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = EmulatorConfig {
            region: Region::Pal,
            ram_fill: 0x55,
        };
        let text = toml::to_string_pretty(&config).unwrap();
        let back: EmulatorConfig = toml::from_str(&text).unwrap();
        assert_eq!(back.region, Region::Pal);
        assert_eq!(back.ram_fill, 0x55);
    }
}
