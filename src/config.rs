//! Configuration for nvsgen
//!
//! The only knob is the size of the partition image. It must be a multiple
//! of the page size and leave at least two usable pages once the trailing
//! reserved page is set aside.

use crate::error::{NvsError, Result};
use crate::nvs::PAGE_SIZE;

/// Smallest accepted partition: two data pages plus the reserved page (0x3000)
pub const MIN_PARTITION_SIZE: usize = 3 * PAGE_SIZE;

/// Main configuration for a generation run
#[derive(Debug, Clone)]
pub struct Config {
    /// Total size of the partition image in bytes
    pub partition_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            partition_size: 0x6000, // 24 KiB
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Config with the given partition size and defaults elsewhere
    pub fn with_size(partition_size: usize) -> Self {
        Self { partition_size }
    }

    /// Validate the partition size and return the byte budget available for
    /// data pages (everything except the reserved page).
    pub fn usable_size(&self) -> Result<usize> {
        let size = self.partition_size;
        if size == 0 || size % PAGE_SIZE != 0 {
            return Err(NvsError::Config(format!(
                "Size of partition must be a positive multiple of {} (got {})",
                PAGE_SIZE, size
            )));
        }

        let usable = size - PAGE_SIZE;
        if usable < 2 * PAGE_SIZE {
            return Err(NvsError::Config(format!(
                "Minimum NVS partition size needed is 0x{:x} bytes (got 0x{:x})",
                MIN_PARTITION_SIZE, size
            )));
        }

        Ok(usable)
    }
}

/// Parse a size given as decimal (`24576`) or hexadecimal (`0x6000`)
pub fn parse_size(text: &str) -> Result<usize> {
    let text = text.trim();
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex_digits) => usize::from_str_radix(hex_digits, 16),
        None => text.parse::<usize>(),
    };

    parsed.map_err(|e| NvsError::Config(format!("Invalid partition size `{}`: {}", text, e)))
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the total partition size (in bytes)
    pub fn partition_size(mut self, size: usize) -> Self {
        self.config.partition_size = size;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
