use crate::fft::WindowKind;
use thiserror::Error;

// Configuration constants.
pub const DEFAULT_WINDOW_SIZE: usize = 4096; // Transform length.
pub const DEFAULT_BLOCK_SIZE: usize = 512; // Samples per queued audio block.
pub const DEFAULT_FIFO_CAPACITY: usize = 100;
pub const DEFAULT_FRAME_CAPACITY: usize = 16;
pub const DEFAULT_PATH_CAPACITY: usize = 8;
pub const DEFAULT_DB_FLOOR: f32 = -48.0;
pub const DEFAULT_SMOOTHING_RATE: f32 = 0.2;
pub const DEFAULT_TICK_HZ: u32 = 60;
pub const MIN_FREQUENCY: f32 = 20.0;
pub const MAX_FREQUENCY: f32 = 20_000.0;
pub const RESPONSE_DB_RANGE: f32 = 24.0;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("transform window size must be at least 2, got {0}")]
    WindowSize(usize),
    #[error("block size {block} must be in 1..={window}")]
    BlockSize { block: usize, window: usize },
    #[error("{what} capacity must be non-zero")]
    Capacity { what: &'static str },
    #[error("decibel floor must be finite and negative, got {0}")]
    DbFloor(f32),
    #[error("smoothing rate must be in (0, 1], got {0}")]
    SmoothingRate(f32),
    #[error("tick rate must be non-zero")]
    TickRate,
    #[error("hop size {hop} must be in 1..={window}")]
    HopSize { hop: usize, window: usize },
    #[error("frequency range {min}..{max} Hz is invalid")]
    FrequencyRange { min: f32, max: f32 },
    #[error("display gain range must be positive, got {0}")]
    GainRange(f32),
    #[error("parameter {name} = {value} is out of range")]
    Parameter { name: &'static str, value: f32 },
    #[error("sample rate must be positive and finite, got {0}")]
    SampleRate(f64),
}

/// Analysis and display settings shared by the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerConfig {
    pub window_size: usize,
    pub window_kind: WindowKind,
    pub block_size: usize,
    pub fifo_capacity: usize,
    pub frame_capacity: usize,
    pub path_capacity: usize,
    pub db_floor: f32,
    pub smoothing_rate: f32,
    pub tick_hz: u32,
    /// `None` runs one transform per consumed block.
    pub hop_size: Option<usize>,
    pub min_frequency: f32,
    pub max_frequency: f32,
    pub response_db_range: f32,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            window_kind: WindowKind::BlackmanHarris,
            block_size: DEFAULT_BLOCK_SIZE,
            fifo_capacity: DEFAULT_FIFO_CAPACITY,
            frame_capacity: DEFAULT_FRAME_CAPACITY,
            path_capacity: DEFAULT_PATH_CAPACITY,
            db_floor: DEFAULT_DB_FLOOR,
            smoothing_rate: DEFAULT_SMOOTHING_RATE,
            tick_hz: DEFAULT_TICK_HZ,
            hop_size: None,
            min_frequency: MIN_FREQUENCY,
            max_frequency: MAX_FREQUENCY,
            response_db_range: RESPONSE_DB_RANGE,
        }
    }
}

impl AnalyzerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_size < 2 {
            return Err(ConfigError::WindowSize(self.window_size));
        }
        if self.block_size == 0 || self.block_size > self.window_size {
            return Err(ConfigError::BlockSize {
                block: self.block_size,
                window: self.window_size,
            });
        }
        for (what, capacity) in [
            ("block queue", self.fifo_capacity),
            ("frame queue", self.frame_capacity),
            ("path queue", self.path_capacity),
        ] {
            if capacity == 0 {
                return Err(ConfigError::Capacity { what });
            }
        }
        if !self.db_floor.is_finite() || self.db_floor >= 0.0 {
            return Err(ConfigError::DbFloor(self.db_floor));
        }
        if !(self.smoothing_rate > 0.0 && self.smoothing_rate <= 1.0) {
            return Err(ConfigError::SmoothingRate(self.smoothing_rate));
        }
        if self.tick_hz == 0 {
            return Err(ConfigError::TickRate);
        }
        if let Some(hop) = self.hop_size {
            if hop == 0 || hop > self.window_size {
                return Err(ConfigError::HopSize {
                    hop,
                    window: self.window_size,
                });
            }
        }
        if !(self.min_frequency > 0.0 && self.min_frequency < self.max_frequency) {
            return Err(ConfigError::FrequencyRange {
                min: self.min_frequency,
                max: self.max_frequency,
            });
        }
        if !(self.response_db_range > 0.0) {
            return Err(ConfigError::GainRange(self.response_db_range));
        }
        Ok(())
    }

    /// Number of magnitude bins in a spectral frame.
    pub fn bin_count(&self) -> usize {
        self.window_size / 2 + 1
    }

    pub fn bin_width(&self, sample_rate: f64) -> f64 {
        sample_rate / self.window_size as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.bin_count(), 2049);
        assert!((config.bin_width(48_000.0) - 11.71875).abs() < 1e-9);
    }

    #[test]
    fn rejects_positive_floor() {
        let config = AnalyzerConfig {
            db_floor: 3.0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::DbFloor(3.0)));
    }

    #[test]
    fn rejects_block_longer_than_window() {
        let config = AnalyzerConfig {
            window_size: 256,
            block_size: 512,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BlockSize { block: 512, window: 256 })
        ));
    }

    #[test]
    fn rejects_zero_hop_and_capacity() {
        let config = AnalyzerConfig {
            hop_size: Some(0),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::HopSize { .. })));

        let config = AnalyzerConfig {
            frame_capacity: 0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::Capacity {
                what: "frame queue"
            })
        );
    }
}
