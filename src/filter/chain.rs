use super::{ChainCoefficients, Coefficients};
use crate::config::{MAX_FREQUENCY, MIN_FREQUENCY};
use parking_lot::RwLock;
use std::sync::Arc;

/// Stage slots in a cut filter (48 dB/oct).
pub const MAX_CUT_STAGES: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BypassFlags {
    pub low_cut: bool,
    pub peak: bool,
    pub high_cut: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterStage {
    pub coefficients: Coefficients,
    pub bypassed: bool,
}

impl Default for FilterStage {
    fn default() -> Self {
        Self {
            coefficients: Coefficients::IDENTITY,
            bypassed: true,
        }
    }
}

impl FilterStage {
    fn magnitude_at(&self, frequency: f64, sample_rate: f64) -> f64 {
        if self.bypassed {
            1.0
        } else {
            self.coefficients.magnitude_at(frequency, sample_rate)
        }
    }
}

/// Cascade of up to four biquads; unused slots stay bypassed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CutFilter {
    pub stages: [FilterStage; MAX_CUT_STAGES],
}

impl CutFilter {
    fn from_coefficients(coefficients: &[Coefficients]) -> Self {
        let mut filter = Self::default();
        for (stage, coefficients) in filter.stages.iter_mut().zip(coefficients) {
            *stage = FilterStage {
                coefficients: *coefficients,
                bypassed: false,
            };
        }
        filter
    }

    pub fn active_stages(&self) -> usize {
        self.stages.iter().filter(|s| !s.bypassed).count()
    }

    fn magnitude_at(&self, frequency: f64, sample_rate: f64) -> f64 {
        self.stages
            .iter()
            .map(|s| s.magnitude_at(frequency, sample_rate))
            .product()
    }
}

/// Immutable view of the chain at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChainState {
    pub low_cut: CutFilter,
    pub peak: FilterStage,
    pub high_cut: CutFilter,
    pub bypass: BypassFlags,
}

impl ChainState {
    pub fn new(coefficients: &ChainCoefficients, bypass: BypassFlags) -> Self {
        Self {
            low_cut: CutFilter::from_coefficients(&coefficients.low_cut),
            peak: FilterStage {
                coefficients: coefficients.peak,
                bypassed: false,
            },
            high_cut: CutFilter::from_coefficients(&coefficients.high_cut),
            bypass,
        }
    }

    /// Product of every active stage; bypassed positions contribute 1.0.
    pub fn magnitude_at(&self, frequency: f64, sample_rate: f64) -> f64 {
        let mut mag = 1.0;

        if !self.bypass.peak {
            mag *= self.peak.magnitude_at(frequency, sample_rate);
        }
        if !self.bypass.low_cut {
            mag *= self.low_cut.magnitude_at(frequency, sample_rate);
        }
        if !self.bypass.high_cut {
            mag *= self.high_cut.magnitude_at(frequency, sample_rate);
        }
        mag
    }
}

/// Keeps queries inside the visible range and below Nyquist.
pub fn clamp_frequency(frequency: f64, sample_rate: f64) -> f64 {
    let nyquist = sample_rate * 0.5;
    let upper = (MAX_FREQUENCY as f64).min(nyquist * 0.999);
    let lower = (MIN_FREQUENCY as f64).min(upper);
    if frequency.is_nan() {
        return lower;
    }
    frequency.clamp(lower, upper)
}

/// Shared handle to the current chain.
///
/// Updates build a complete [`ChainState`] and publish it with a single
/// pointer swap, so readers see either the old chain or the new one.
#[derive(Debug, Default)]
pub struct MonoChain {
    current: RwLock<Arc<ChainState>>,
}

impl MonoChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&self, coefficients: &ChainCoefficients, bypass: BypassFlags) {
        let next = Arc::new(ChainState::new(coefficients, bypass));
        *self.current.write() = next;
    }

    pub fn snapshot(&self) -> Arc<ChainState> {
        self.current.read().clone()
    }

    pub fn magnitude_at(&self, frequency: f64, sample_rate: f64) -> f64 {
        let frequency = clamp_frequency(frequency, sample_rate);
        self.snapshot().magnitude_at(frequency, sample_rate)
    }
}
