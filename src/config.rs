//! Configuration management for the display driver.
//!
//! Handles loading, saving, and validating the wiring and bus settings from
//! JSON files.

use crate::display::Orientation;
use crate::display::registers::{TFT_HEIGHT, TFT_WIDTH};
use crate::display::spi::CHUNK_SIZE;
use crate::transport::DEFAULT_CLOCK_HZ;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "/etc/ili9486/config.json";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config JSON: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// SPI bus selection
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpiSettings {
    /// SPI bus number (`/dev/spidevB.x`)
    #[serde(default)]
    pub bus: u8,
    /// Chip enable line (`/dev/spidevx.S`)
    #[serde(default)]
    pub slave_select: u8,
    /// Clock speed in Hz
    #[serde(default = "default_clock_hz")]
    pub clock_hz: u32,
}

impl Default for SpiSettings {
    fn default() -> Self {
        Self {
            bus: 0,
            slave_select: 0,
            clock_hz: default_clock_hz(),
        }
    }
}

/// Display wiring and panel settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DisplayConfig {
    /// Data/command select pin (BCM)
    #[serde(default = "default_dc_pin")]
    pub dc_pin: u8,

    /// Reset pin (BCM), `null` if not wired
    #[serde(default = "default_rst_pin")]
    pub rst_pin: Option<u8>,

    /// Corner holding pixel (0, 0)
    #[serde(default)]
    pub orientation: Orientation,

    /// Nominal panel width in pixels (before orientation swap)
    #[serde(default = "default_width")]
    pub width: u16,

    /// Nominal panel height in pixels (before orientation swap)
    #[serde(default = "default_height")]
    pub height: u16,

    #[serde(default)]
    pub spi: SpiSettings,

    /// Maximum bytes per SPI write
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

fn default_dc_pin() -> u8 {
    24
}

fn default_rst_pin() -> Option<u8> {
    Some(25)
}

fn default_width() -> u16 {
    TFT_WIDTH
}

fn default_height() -> u16 {
    TFT_HEIGHT
}

fn default_clock_hz() -> u32 {
    DEFAULT_CLOCK_HZ
}

fn default_chunk_size() -> usize {
    CHUNK_SIZE
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            dc_pin: default_dc_pin(),
            rst_pin: default_rst_pin(),
            orientation: Orientation::default(),
            width: default_width(),
            height: default_height(),
            spi: SpiSettings::default(),
            chunk_size: default_chunk_size(),
        }
    }
}

impl DisplayConfig {
    /// Load configuration from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: DisplayConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default path, or return default config if not found
    pub fn load_or_default() -> Self {
        Self::load(DEFAULT_CONFIG_PATH).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config: {}, using defaults", e);
            Self::default()
        })
    }

    /// Save configuration to a JSON file atomically
    ///
    /// Writes to a temporary file first and renames it over the target, so
    /// a power cut never leaves a half-written config behind.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self)?;

        let tmp_path = path.with_extension("json.tmp");
        std::fs::write(&tmp_path, &content)?;

        std::fs::rename(&tmp_path, path).map_err(|e| {
            let _ = std::fs::remove_file(&tmp_path);
            ConfigError::ReadError(e)
        })?;

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::ValidationError(format!(
                "panel size {}x{} must be non-zero",
                self.width, self.height
            )));
        }

        if self.chunk_size == 0 {
            return Err(ConfigError::ValidationError(
                "chunk_size must be greater than 0".to_string(),
            ));
        }

        if self.spi.clock_hz == 0 {
            return Err(ConfigError::ValidationError(
                "spi.clock_hz must be greater than 0".to_string(),
            ));
        }

        if self.rst_pin == Some(self.dc_pin) {
            return Err(ConfigError::ValidationError(format!(
                "dc_pin and rst_pin both use GPIO {}",
                self.dc_pin
            )));
        }

        if self.spi.bus > 6 {
            return Err(ConfigError::ValidationError(format!(
                "spi.bus {} must be between 0 and 6",
                self.spi.bus
            )));
        }

        if self.spi.slave_select > 2 {
            return Err(ConfigError::ValidationError(format!(
                "spi.slave_select {} must be between 0 and 2",
                self.spi.slave_select
            )));
        }

        Ok(())
    }
}
