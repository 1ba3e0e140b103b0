//! Tunable parameters for the quality back-off search.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Quality;

/// Quality used for the first encode attempt.
pub const INITIAL_QUALITY: u8 = 100;

/// Lowest quality the engine will try before accepting an oversized result.
///
/// Encoders produce visually degenerate output below this level.
pub const QUALITY_FLOOR: u8 = 5;

/// Fraction of the current quality removed after each oversized attempt.
pub const DECAY_FACTOR: f64 = 0.1;

/// Errors produced when validating a [`CompressionConfig`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A quality value lies outside 1-100.
    #[error("{field} must be between 1 and 100, got {value}")]
    QualityOutOfRange { field: &'static str, value: u8 },

    /// The floor is above the starting quality, so no search is possible.
    #[error("quality floor ({floor}) must not exceed initial quality ({initial})")]
    FloorAboveInitial { floor: u8, initial: u8 },

    /// The decay factor must lie strictly between 0 and 1.
    #[error("decay factor must be finite and in (0, 1), got {0}")]
    InvalidDecayFactor(f64),
}

/// Configuration for a [`CompressionEngine`](crate::CompressionEngine).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompressionConfig {
    /// Quality of the first attempt (1 to 100)
    pub initial_quality: u8,
    /// Minimum quality (1 to 100, not above `initial_quality`)
    pub quality_floor: u8,
    /// Geometric decay per step (0 to 1, exclusive)
    pub decay_factor: f64,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            initial_quality: INITIAL_QUALITY,
            quality_floor: QUALITY_FLOOR,
            decay_factor: DECAY_FACTOR,
        }
    }
}

impl CompressionConfig {
    /// Create a configuration with the default constants.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the initial quality.
    pub fn with_initial_quality(mut self, quality: u8) -> Self {
        self.initial_quality = quality;
        self
    }

    /// Set the quality floor.
    pub fn with_quality_floor(mut self, floor: u8) -> Self {
        self.quality_floor = floor;
        self
    }

    /// Set the decay factor.
    pub fn with_decay_factor(mut self, decay: f64) -> Self {
        self.decay_factor = decay;
        self
    }

    /// Check every field, returning the first violation found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.initial()?;
        let floor = self.floor()?;
        if floor.get() > self.initial_quality {
            return Err(ConfigError::FloorAboveInitial {
                floor: self.quality_floor,
                initial: self.initial_quality,
            });
        }
        if !self.decay_factor.is_finite() || self.decay_factor <= 0.0 || self.decay_factor >= 1.0
        {
            return Err(ConfigError::InvalidDecayFactor(self.decay_factor));
        }
        Ok(())
    }

    /// The initial quality as a validated [`Quality`].
    pub fn initial(&self) -> Result<Quality, ConfigError> {
        Quality::new(self.initial_quality).ok_or(ConfigError::QualityOutOfRange {
            field: "initialQuality",
            value: self.initial_quality,
        })
    }

    /// The floor as a validated [`Quality`].
    pub fn floor(&self) -> Result<Quality, ConfigError> {
        Quality::new(self.quality_floor).ok_or(ConfigError::QualityOutOfRange {
            field: "qualityFloor",
            value: self.quality_floor,
        })
    }
}
