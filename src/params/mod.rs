//! Parameter store shared by the editor and the curve renderer.
//!
//! Writers replace the whole [`ChainSettings`] snapshot and bump a
//! generation counter. The renderer polls the counter from its tick instead of
//! registering listeners, so there is nothing to deregister on shutdown.

use crate::config::{MAX_FREQUENCY, MIN_FREQUENCY};
use crate::filter::{ChainSettings, Slope};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Every automatable parameter of the equalizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamId {
    LowCutFreq,
    LowCutSlope,
    PeakFreq,
    PeakGain,
    PeakQuality,
    HighCutFreq,
    HighCutSlope,
    LowCutBypassed,
    PeakBypassed,
    HighCutBypassed,
    AnalyzerEnabled,
}

/// Value range and unit of a continuous or choice parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    pub min: f32,
    pub max: f32,
    pub default: f32,
    /// Logarithmic mapping between normalised and plain values.
    pub log_scale: bool,
}

impl ParamRange {
    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }

    pub fn to_normalized(&self, value: f32) -> f32 {
        let value = self.clamp(value);
        if self.log_scale {
            (value / self.min).ln() / (self.max / self.min).ln()
        } else {
            (value - self.min) / (self.max - self.min)
        }
    }

    pub fn from_normalized(&self, normalized: f32) -> f32 {
        let t = normalized.clamp(0.0, 1.0);
        if self.log_scale {
            self.min * (self.max / self.min).powf(t)
        } else {
            self.min + t * (self.max - self.min)
        }
    }
}

const FREQUENCY_RANGE: ParamRange = ParamRange {
    min: MIN_FREQUENCY,
    max: MAX_FREQUENCY,
    default: MIN_FREQUENCY,
    log_scale: true,
};

impl ParamId {
    pub const ALL: [ParamId; 11] = [
        ParamId::LowCutFreq,
        ParamId::LowCutSlope,
        ParamId::PeakFreq,
        ParamId::PeakGain,
        ParamId::PeakQuality,
        ParamId::HighCutFreq,
        ParamId::HighCutSlope,
        ParamId::LowCutBypassed,
        ParamId::PeakBypassed,
        ParamId::HighCutBypassed,
        ParamId::AnalyzerEnabled,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ParamId::LowCutFreq => "LowCut Freq",
            ParamId::LowCutSlope => "LowCut Slope",
            ParamId::PeakFreq => "Peak Freq",
            ParamId::PeakGain => "Peak Gain",
            ParamId::PeakQuality => "Peak Quality",
            ParamId::HighCutFreq => "HighCut Freq",
            ParamId::HighCutSlope => "HighCut Slope",
            ParamId::LowCutBypassed => "LowCut Bypassed",
            ParamId::PeakBypassed => "Peak Bypassed",
            ParamId::HighCutBypassed => "HighCut Bypassed",
            ParamId::AnalyzerEnabled => "Analyzer Enabled",
        }
    }

    pub fn is_toggle(self) -> bool {
        matches!(
            self,
            ParamId::LowCutBypassed
                | ParamId::PeakBypassed
                | ParamId::HighCutBypassed
                | ParamId::AnalyzerEnabled
        )
    }

    pub fn is_choice(self) -> bool {
        matches!(self, ParamId::LowCutSlope | ParamId::HighCutSlope)
    }

    pub fn unit(self) -> &'static str {
        match self {
            ParamId::LowCutFreq | ParamId::PeakFreq | ParamId::HighCutFreq => "Hz",
            ParamId::PeakGain => "dB",
            _ => "",
        }
    }

    /// Text shown on a control, e.g. "750 Hz", "1.50 kHz" or "24 dB/Oct".
    pub fn display_string(self, value: f32) -> String {
        if self.is_choice() {
            return Slope::from_index(value.round() as usize).to_string();
        }

        let (value, kilo, decimals) = if value > 999.0 {
            (value / 1000.0, true, 2)
        } else if self == ParamId::PeakQuality {
            (value, false, 2)
        } else {
            (value, false, 0)
        };

        let mut text = format!("{:.*}", decimals, value);
        let unit = self.unit();
        if kilo || !unit.is_empty() {
            text.push(' ');
            if kilo {
                text.push('k');
            }
            text.push_str(unit);
        }
        text
    }

    pub fn range(self) -> ParamRange {
        match self {
            ParamId::LowCutFreq => FREQUENCY_RANGE,
            ParamId::HighCutFreq => ParamRange {
                default: MAX_FREQUENCY,
                ..FREQUENCY_RANGE
            },
            ParamId::PeakFreq => ParamRange {
                default: 750.0,
                ..FREQUENCY_RANGE
            },
            ParamId::PeakGain => ParamRange {
                min: -24.0,
                max: 24.0,
                default: 0.0,
                log_scale: false,
            },
            ParamId::PeakQuality => ParamRange {
                min: 0.1,
                max: 10.0,
                default: 1.0,
                log_scale: false,
            },
            ParamId::LowCutSlope | ParamId::HighCutSlope => ParamRange {
                min: 0.0,
                max: (Slope::ALL.len() - 1) as f32,
                default: 0.0,
                log_scale: false,
            },
            ParamId::LowCutBypassed
            | ParamId::PeakBypassed
            | ParamId::HighCutBypassed
            | ParamId::AnalyzerEnabled => ParamRange {
                min: 0.0,
                max: 1.0,
                default: if self == ParamId::AnalyzerEnabled { 1.0 } else { 0.0 },
                log_scale: false,
            },
        }
    }

    /// Plain value; slopes are choice indices and toggles are 0 or 1.
    pub fn get(self, settings: &ChainSettings) -> f32 {
        let flag = |b: bool| if b { 1.0 } else { 0.0 };
        match self {
            ParamId::LowCutFreq => settings.low_cut_freq,
            ParamId::LowCutSlope => settings.low_cut_slope.index() as f32,
            ParamId::PeakFreq => settings.peak_freq,
            ParamId::PeakGain => settings.peak_gain_db,
            ParamId::PeakQuality => settings.peak_quality,
            ParamId::HighCutFreq => settings.high_cut_freq,
            ParamId::HighCutSlope => settings.high_cut_slope.index() as f32,
            ParamId::LowCutBypassed => flag(settings.low_cut_bypassed),
            ParamId::PeakBypassed => flag(settings.peak_bypassed),
            ParamId::HighCutBypassed => flag(settings.high_cut_bypassed),
            ParamId::AnalyzerEnabled => flag(settings.analyzer_enabled),
        }
    }

    /// Writes a plain value, clamped into the parameter's range.
    pub fn set(self, settings: &mut ChainSettings, value: f32) {
        let value = self.range().clamp(value);
        let slope = || Slope::from_index(value.round() as usize);
        match self {
            ParamId::LowCutFreq => settings.low_cut_freq = value,
            ParamId::LowCutSlope => settings.low_cut_slope = slope(),
            ParamId::PeakFreq => settings.peak_freq = value,
            ParamId::PeakGain => settings.peak_gain_db = value,
            ParamId::PeakQuality => settings.peak_quality = value,
            ParamId::HighCutFreq => settings.high_cut_freq = value,
            ParamId::HighCutSlope => settings.high_cut_slope = slope(),
            ParamId::LowCutBypassed => settings.low_cut_bypassed = value >= 0.5,
            ParamId::PeakBypassed => settings.peak_bypassed = value >= 0.5,
            ParamId::HighCutBypassed => settings.high_cut_bypassed = value >= 0.5,
            ParamId::AnalyzerEnabled => settings.analyzer_enabled = value >= 0.5,
        }
    }
}

/// Current parameter snapshot plus a change generation.
#[derive(Debug, Default)]
pub struct ParameterStore {
    settings: RwLock<ChainSettings>,
    generation: AtomicU64,
}

impl ParameterStore {
    pub fn new(settings: ChainSettings) -> Self {
        Self {
            settings: RwLock::new(settings),
            generation: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> ChainSettings {
        *self.settings.read()
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Applies `edit` under the write lock; readers only ever see whole snapshots.
    pub fn update(&self, edit: impl FnOnce(&mut ChainSettings)) {
        let mut settings = self.settings.write();
        let before = *settings;
        edit(&mut *settings);
        if *settings != before {
            self.generation.fetch_add(1, Ordering::AcqRel);
        }
    }

    pub fn set(&self, id: ParamId, value: f32) {
        self.update(|settings| id.set(settings, value));
    }

    pub fn get(&self, id: ParamId) -> f32 {
        id.get(&self.settings.read())
    }

    pub fn watch(&self) -> ChangeWatcher {
        ChangeWatcher {
            seen: self.generation(),
        }
    }
}

/// Tracks the last generation a consumer has applied.
#[derive(Debug, Clone)]
pub struct ChangeWatcher {
    seen: u64,
}

impl ChangeWatcher {
    /// Returns `true` once per batch of changes since the previous call.
    pub fn take_change(&mut self, store: &ParameterStore) -> bool {
        let current = store.generation();
        if current != self.seen {
            self.seen = current;
            true
        } else {
            false
        }
    }
}

/// One-shot "needs recompute" signal, cleared with a compare-and-set.
#[derive(Debug, Default)]
pub struct DirtyFlag(AtomicBool);

impl DirtyFlag {
    pub fn mark(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn take(&self) -> bool {
        self.0
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}
