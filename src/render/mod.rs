//! Composition of the response curve and spectrum overlays.
//!
//! [`ResponseCurveRenderer::tick`] does all of the per-frame work on the
//! caller's thread; [`ResponseCurveComponent`] drives it from a [`Ticker`]
//! and hands finished frames to the display.

pub mod component;
pub mod grid;
pub mod ticker;

pub use component::ResponseCurveComponent;
pub use grid::{build_grid, Grid, GridLabel, GridLine, LabelAnchor};
pub use ticker::Ticker;

use crate::analysis::{Channel, ChannelAnalyzer, RenderPath};
use crate::config::{AnalyzerConfig, ConfigError};
use crate::decibels::gain_to_decibels;
use crate::engine::AudioTap;
use crate::filter::chain::clamp_frequency;
use crate::filter::{compute_coefficients, MonoChain};
use crate::geometry::{jmap, map_to_log10, Bounds};
use crate::params::{ChangeWatcher, DirtyFlag, ParameterStore};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Floor used when converting the chain's magnitude; keeps deep notches finite.
const RESPONSE_FLOOR_DB: f64 = -100.0;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to spawn ticker thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Area the response curve and grid are drawn in.
pub fn render_area(bounds: Bounds) -> Bounds {
    bounds.inset(20.0, 12.0, 20.0, 2.0)
}

/// Area the spectrum paths are mapped into.
pub fn analysis_area(bounds: Bounds) -> Bounds {
    render_area(bounds).inset(0.0, 4.0, 0.0, 4.0)
}

/// One composed display frame.
#[derive(Debug, Clone, Default)]
pub struct CurveFrame {
    pub bounds: Bounds,
    pub render_area: Bounds,
    pub analysis_area: Bounds,
    pub grid: Arc<Grid>,
    pub response: RenderPath,
    /// `None` while the analyzer is switched off.
    pub left: Option<RenderPath>,
    pub right: Option<RenderPath>,
}

struct TickStats {
    since: Instant,
    ticks: u64,
    recomputes: u64,
}

pub struct ResponseCurveRenderer {
    config: AnalyzerConfig,
    params: Arc<ParameterStore>,
    watcher: ChangeWatcher,
    dirty: DirtyFlag,
    chain: Arc<MonoChain>,
    tap: AudioTap,
    left: ChannelAnalyzer,
    right: ChannelAnalyzer,
    analyzer_enabled: bool,
    sample_rate: f64,
    grid: Arc<Grid>,
    grid_bounds: Bounds,
    stats: TickStats,
}

impl ResponseCurveRenderer {
    pub fn new(
        config: AnalyzerConfig,
        params: Arc<ParameterStore>,
        tap: AudioTap,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        params.snapshot().validate()?;

        let mut renderer = Self {
            left: ChannelAnalyzer::new(Channel::Left, tap.fifo(Channel::Left), &config),
            right: ChannelAnalyzer::new(Channel::Right, tap.fifo(Channel::Right), &config),
            watcher: params.watch(),
            dirty: DirtyFlag::default(),
            chain: Arc::new(MonoChain::new()),
            analyzer_enabled: true,
            sample_rate: tap.sample_rate(),
            grid: Arc::new(Grid::default()),
            grid_bounds: Bounds::default(),
            stats: TickStats {
                since: Instant::now(),
                ticks: 0,
                recomputes: 0,
            },
            config,
            params,
            tap,
        };
        renderer.update_chain();
        Ok(renderer)
    }

    /// Chain shared with anything else that needs the current response.
    pub fn chain(&self) -> Arc<MonoChain> {
        self.chain.clone()
    }

    pub fn analyzer_enabled(&self) -> bool {
        self.analyzer_enabled
    }

    pub fn analyzer(&self, channel: Channel) -> &ChannelAnalyzer {
        match channel {
            Channel::Left => &self.left,
            Channel::Right => &self.right,
        }
    }

    /// Recomputes coefficients from the current parameters and publishes
    /// them to the chain in one swap.
    pub fn update_chain(&mut self) {
        let settings = self.params.snapshot();
        if let Err(e) = settings.validate() {
            log::warn!("Keeping previous filter chain: {}", e);
            return;
        }

        let coefficients = compute_coefficients(&settings, self.sample_rate);
        self.chain.update(&coefficients, settings.bypass_flags());
        self.analyzer_enabled = settings.analyzer_enabled;
        self.stats.recomputes += 1;
    }

    /// Produces one frame for a display of the given size.
    pub fn tick(&mut self, bounds: Bounds) -> CurveFrame {
        //
        // Apply parameter and sample-rate changes before drawing.
        //
        let sample_rate = self.tap.sample_rate();
        if sample_rate != self.sample_rate {
            log::info!("Sample rate changed: {} -> {}", self.sample_rate, sample_rate);
            self.sample_rate = sample_rate;
            self.dirty.mark();
        }
        let changed = self.watcher.take_change(&self.params);
        if self.dirty.take() | changed {
            self.update_chain();
        }

        let render = render_area(bounds);
        let analysis = analysis_area(bounds);

        //
        // Spectrum paths.
        //
        let (left, right) = if self.analyzer_enabled {
            self.left.process(analysis, sample_rate);
            self.right.process(analysis, sample_rate);
            (Some(self.left.path().clone()), Some(self.right.path().clone()))
        } else {
            (None, None)
        };

        if bounds != self.grid_bounds {
            self.grid_bounds = bounds;
            self.grid = Arc::new(build_grid(
                bounds,
                render,
                self.config.min_frequency,
                self.config.max_frequency,
                self.config.response_db_range,
            ));
        }

        let frame = CurveFrame {
            bounds,
            render_area: render,
            analysis_area: analysis,
            grid: self.grid.clone(),
            response: self.response_path(analysis),
            left,
            right,
        };

        self.log_stats();
        frame
    }

    /// Filter response sampled once per pixel column of `area`.
    pub fn response_path(&self, area: Bounds) -> RenderPath {
        let columns = area.columns();
        let mut path = RenderPath::with_capacity(columns);
        let chain = self.chain.snapshot();
        let range = self.config.response_db_range;

        for col in 0..columns {
            let t = col as f32 / columns as f32;
            let freq = map_to_log10(t, self.config.min_frequency, self.config.max_frequency);
            let freq = clamp_frequency(freq as f64, self.sample_rate);
            let mag = chain.magnitude_at(freq, self.sample_rate);
            let db = gain_to_decibels(mag, RESPONSE_FLOOR_DB) as f32;
            let y = jmap(db, -range, range, area.bottom(), area.top());
            path.line_to(area.left() + col as f32, y);
        }
        path
    }

    fn log_stats(&mut self) {
        self.stats.ticks += 1;
        if self.stats.since.elapsed() < Duration::from_secs(1) {
            return;
        }

        let (dropped_left, dropped_right) = self.tap.dropped();
        log::debug!(
            "Tick | ticks: {} | recomputes: {} | transforms L/R: {}/{} | dropped L/R: {}/{}",
            self.stats.ticks,
            self.stats.recomputes,
            self.left.transforms(),
            self.right.transforms(),
            dropped_left,
            dropped_right
        );
        self.stats.ticks = 0;
        self.stats.recomputes = 0;
        self.stats.since = Instant::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{ChainSettings, Slope};
    use crate::params::ParamId;

    fn renderer(settings: ChainSettings) -> (ResponseCurveRenderer, Arc<ParameterStore>, AudioTap) {
        let config = AnalyzerConfig {
            window_size: 1024,
            block_size: 256,
            ..Default::default()
        };
        let store = Arc::new(ParameterStore::new(settings));
        let tap = AudioTap::new(&config, 48_000.0).unwrap();
        let renderer = ResponseCurveRenderer::new(config, store.clone(), tap.clone()).unwrap();
        (renderer, store, tap)
    }

    fn flat_settings() -> ChainSettings {
        ChainSettings {
            low_cut_bypassed: true,
            peak_bypassed: true,
            high_cut_bypassed: true,
            ..Default::default()
        }
    }

    #[test]
    fn areas_follow_margins() {
        let bounds = Bounds::new(0.0, 0.0, 400.0, 200.0);
        assert_eq!(render_area(bounds), Bounds::new(20.0, 12.0, 360.0, 186.0));
        assert_eq!(analysis_area(bounds), Bounds::new(20.0, 16.0, 360.0, 178.0));
    }

    #[test]
    fn bypassed_chain_draws_a_flat_line_at_zero_db() {
        let (mut renderer, _, _) = renderer(flat_settings());
        let bounds = Bounds::new(0.0, 0.0, 300.0, 150.0);
        let frame = renderer.tick(bounds);

        let area = frame.analysis_area;
        let middle = area.top() + area.height / 2.0;
        assert_eq!(frame.response.len(), area.columns());
        for p in frame.response.points() {
            assert!((p.y - middle).abs() < 1e-3);
        }
        assert!(!frame.grid.lines.is_empty());
    }

    #[test]
    fn response_and_spectra_share_the_analysis_area() {
        let (mut renderer, _, tap) = renderer(ChainSettings {
            low_cut_bypassed: false,
            low_cut_freq: 2_000.0,
            low_cut_slope: Slope::Db48,
            peak_bypassed: true,
            high_cut_bypassed: true,
            ..Default::default()
        });
        tap.push_stereo(&[0.25; 256], &[0.25; 256]);
        let bounds = Bounds::new(0.0, 0.0, 200.0, 100.0);
        let frame = renderer.tick(bounds);

        let area = frame.analysis_area;
        let left = frame.left.as_ref().unwrap();
        assert_eq!(frame.response.len(), left.len());
        for (r, s) in frame.response.points().iter().zip(left.points()) {
            assert_eq!(r.x, s.x);
        }

        // Above the cut the response sits at 0 dB, the middle of the analysis area.
        let last = frame.response.points()[frame.response.len() - 1];
        let zero_db = jmap(0.0, -24.0, 24.0, area.bottom(), area.top());
        assert!((last.y - zero_db).abs() < 0.5);
        // Far below the cut it falls past the bottom of the same area.
        assert!(frame.response.points()[0].y > area.bottom());
    }

    #[test]
    fn parameter_change_is_applied_on_next_tick() {
        let (mut renderer, store, _) = renderer(flat_settings());
        let bounds = Bounds::new(0.0, 0.0, 300.0, 150.0);
        let before = renderer.tick(bounds);

        store.update(|s| {
            s.peak_bypassed = false;
            s.peak_gain_db = 12.0;
            s.peak_freq = 1_000.0;
        });
        let after = renderer.tick(bounds);

        let lowest = |frame: &CurveFrame| {
            frame
                .response
                .points()
                .iter()
                .map(|p| p.y)
                .fold(f32::INFINITY, f32::min)
        };
        // Boost raises the curve (smaller y) somewhere near 1 kHz.
        assert!(lowest(&after) < lowest(&before) - 10.0);
    }

    #[test]
    fn analyzer_toggle_hides_spectrum_paths() {
        let (mut renderer, store, tap) = renderer(flat_settings());
        let bounds = Bounds::new(0.0, 0.0, 200.0, 100.0);
        tap.push_stereo(&[0.25; 256], &[0.25; 256]);

        let frame = renderer.tick(bounds);
        assert_eq!(frame.left.as_ref().map(|p| p.len()), Some(160));
        assert!(frame.right.is_some());

        store.set(ParamId::AnalyzerEnabled, 0.0);
        let frame = renderer.tick(bounds);
        assert!(frame.left.is_none() && frame.right.is_none());
        assert!(!renderer.analyzer_enabled());
    }

    #[test]
    fn sample_rate_change_recomputes_chain() {
        let (mut renderer, _, tap) = renderer(ChainSettings::default());
        let bounds = Bounds::new(0.0, 0.0, 100.0, 100.0);
        renderer.tick(bounds);
        let before = renderer.chain().snapshot();

        tap.set_sample_rate(96_000.0);
        renderer.tick(bounds);
        assert!(!Arc::ptr_eq(&before, &renderer.chain().snapshot()));
    }

    #[test]
    fn grid_is_rebuilt_only_on_resize() {
        let (mut renderer, _, _) = renderer(ChainSettings::default());
        let a = renderer.tick(Bounds::new(0.0, 0.0, 300.0, 150.0));
        let b = renderer.tick(Bounds::new(0.0, 0.0, 300.0, 150.0));
        let c = renderer.tick(Bounds::new(0.0, 0.0, 320.0, 150.0));
        assert!(Arc::ptr_eq(&a.grid, &b.grid));
        assert!(!Arc::ptr_eq(&b.grid, &c.grid));
    }
}
