//! Filter chain model: low-cut, peak and high-cut sections, their
//! coefficients, and the combined magnitude response drawn by the editor.

pub mod biquad;
pub mod chain;

pub use biquad::Coefficients;
pub use chain::{BypassFlags, ChainState, MonoChain, MAX_CUT_STAGES};

use crate::config::ConfigError;
use chain::clamp_frequency;
use std::fmt;

/// Cut filter steepness. Each step adds one cascaded biquad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Slope {
    #[default]
    Db12,
    Db24,
    Db36,
    Db48,
}

impl Slope {
    pub const ALL: [Slope; 4] = [Slope::Db12, Slope::Db24, Slope::Db36, Slope::Db48];

    pub fn db_per_octave(self) -> i32 {
        12 * self.stages() as i32
    }

    /// Number of active biquad stages.
    pub fn stages(self) -> usize {
        self.index() + 1
    }

    /// Butterworth filter order.
    pub fn order(self) -> usize {
        2 * self.stages()
    }

    pub fn index(self) -> usize {
        match self {
            Slope::Db12 => 0,
            Slope::Db24 => 1,
            Slope::Db36 => 2,
            Slope::Db48 => 3,
        }
    }

    pub fn from_index(index: usize) -> Self {
        Self::ALL[index.min(Self::ALL.len() - 1)]
    }
}

impl fmt::Display for Slope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} dB/Oct", self.db_per_octave())
    }
}

/// Snapshot of every user-facing parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainSettings {
    pub peak_freq: f32,
    pub peak_gain_db: f32,
    pub peak_quality: f32,
    pub low_cut_freq: f32,
    pub high_cut_freq: f32,
    pub low_cut_slope: Slope,
    pub high_cut_slope: Slope,
    pub low_cut_bypassed: bool,
    pub peak_bypassed: bool,
    pub high_cut_bypassed: bool,
    pub analyzer_enabled: bool,
}

impl Default for ChainSettings {
    fn default() -> Self {
        Self {
            peak_freq: 750.0,
            peak_gain_db: 0.0,
            peak_quality: 1.0,
            low_cut_freq: 20.0,
            high_cut_freq: 20_000.0,
            low_cut_slope: Slope::Db12,
            high_cut_slope: Slope::Db12,
            low_cut_bypassed: false,
            peak_bypassed: false,
            high_cut_bypassed: false,
            analyzer_enabled: true,
        }
    }
}

impl ChainSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let check = |name: &'static str, value: f32, ok: bool| {
            if ok && value.is_finite() {
                Ok(())
            } else {
                Err(ConfigError::Parameter { name, value })
            }
        };
        check("peak frequency", self.peak_freq, self.peak_freq > 0.0)?;
        check("peak gain", self.peak_gain_db, true)?;
        check("peak quality", self.peak_quality, self.peak_quality > 0.0)?;
        check("low-cut frequency", self.low_cut_freq, self.low_cut_freq > 0.0)?;
        check("high-cut frequency", self.high_cut_freq, self.high_cut_freq > 0.0)?;
        Ok(())
    }

    pub fn bypass_flags(&self) -> BypassFlags {
        BypassFlags {
            low_cut: self.low_cut_bypassed,
            peak: self.peak_bypassed,
            high_cut: self.high_cut_bypassed,
        }
    }
}

/// Coefficients for the whole chain, computed from one settings snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainCoefficients {
    pub low_cut: Vec<Coefficients>,
    pub peak: Coefficients,
    pub high_cut: Vec<Coefficients>,
}

pub fn make_peak_filter(settings: &ChainSettings, sample_rate: f64) -> Coefficients {
    Coefficients::peak(
        sample_rate,
        clamp_frequency(settings.peak_freq as f64, sample_rate),
        settings.peak_quality as f64,
        settings.peak_gain_db as f64,
    )
}

pub fn make_low_cut_filter(settings: &ChainSettings, sample_rate: f64) -> Vec<Coefficients> {
    biquad::butterworth_high_pass(
        clamp_frequency(settings.low_cut_freq as f64, sample_rate),
        sample_rate,
        settings.low_cut_slope.order(),
    )
}

pub fn make_high_cut_filter(settings: &ChainSettings, sample_rate: f64) -> Vec<Coefficients> {
    biquad::butterworth_low_pass(
        clamp_frequency(settings.high_cut_freq as f64, sample_rate),
        sample_rate,
        settings.high_cut_slope.order(),
    )
}

/// Pure function of its inputs: identical settings give identical sets.
/// Design frequencies are kept inside the display range and below Nyquist.
pub fn compute_coefficients(settings: &ChainSettings, sample_rate: f64) -> ChainCoefficients {
    ChainCoefficients {
        low_cut: make_low_cut_filter(settings, sample_rate),
        peak: make_peak_filter(settings, sample_rate),
        high_cut: make_high_cut_filter(settings, sample_rate),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slope_stage_counts() {
        let stages: Vec<usize> = Slope::ALL.iter().map(|s| s.stages()).collect();
        assert_eq!(stages, vec![1, 2, 3, 4]);
        assert_eq!(Slope::Db24.to_string(), "24 dB/Oct");
    }

    #[test]
    fn coefficients_are_bit_identical_for_same_input() {
        let settings = ChainSettings {
            peak_freq: 1_234.5,
            peak_gain_db: -7.5,
            peak_quality: 2.2,
            low_cut_freq: 88.0,
            high_cut_freq: 9_000.0,
            low_cut_slope: Slope::Db36,
            high_cut_slope: Slope::Db48,
            ..Default::default()
        };
        let a = compute_coefficients(&settings, 44_100.0);
        let b = compute_coefficients(&settings, 44_100.0);
        assert_eq!(a, b);
        assert_eq!(a.low_cut.len(), 3);
        assert_eq!(a.high_cut.len(), 4);
    }

    #[test]
    fn rejects_non_positive_quality() {
        let settings = ChainSettings {
            peak_quality: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::Parameter { name: "peak quality", .. })
        ));
        assert_eq!(ChainSettings::default().validate(), Ok(()));
    }
}
