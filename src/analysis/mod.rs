pub mod accumulator;
pub mod generator;
pub mod path;

pub use accumulator::{AccumulatorState, MonoAccumulator};
pub use generator::{SpectralFrame, SpectrumGenerator};
pub use path::{PathGenerator, RenderPath};

use crate::config::AnalyzerConfig;
use crate::fifo::{AudioBlock, BlockFifo};
use crate::geometry::Bounds;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Left,
    Right,
}

/// Analysis pipeline for one channel: block queue, rolling window,
/// transform, and path smoothing. Driven from the render tick.
pub struct ChannelAnalyzer {
    channel: Channel,
    fifo: Arc<BlockFifo>,
    incoming: AudioBlock,
    accumulator: MonoAccumulator,
    generator: SpectrumGenerator,
    paths: PathGenerator,
    frame: SpectralFrame,
    latest: RenderPath,
    hop_size: Option<usize>,
    transforms: u64,
}

impl ChannelAnalyzer {
    pub fn new(channel: Channel, fifo: Arc<BlockFifo>, config: &AnalyzerConfig) -> Self {
        Self {
            channel,
            fifo,
            incoming: AudioBlock::new(config.block_size),
            accumulator: MonoAccumulator::new(config.window_size),
            generator: SpectrumGenerator::new(
                config.window_size,
                config.window_kind,
                config.frame_capacity,
                config.db_floor,
            ),
            paths: PathGenerator::new(
                config.path_capacity,
                config.smoothing_rate,
                config.min_frequency,
                config.max_frequency,
            ),
            frame: SpectralFrame::default(),
            latest: RenderPath::default(),
            hop_size: config.hop_size,
            transforms: 0,
        }
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn state(&self) -> AccumulatorState {
        self.accumulator.state()
    }

    /// Total transforms run since construction.
    pub fn transforms(&self) -> u64 {
        self.transforms
    }

    /// Drains pending blocks and frames, then keeps the newest path.
    /// An empty queue leaves the previous path in place.
    pub fn process(&mut self, bounds: Bounds, sample_rate: f64) {
        //
        // Ingest audio blocks into the rolling window.
        //
        while self.fifo.pop_swap(&mut self.incoming) {
            self.accumulator.push(self.incoming.samples());
            if self.accumulator.take_ready(self.hop_size) {
                self.generator.produce(self.accumulator.samples());
                self.transforms += 1;
            }
        }

        //
        // Convert queued frames to paths.
        //
        let fft_size = self.generator.fft_size();
        let bin_width = (sample_rate / fft_size as f64) as f32;
        let floor_db = self.generator.floor_db();
        while self.generator.pop_frame(&mut self.frame) {
            self.paths
                .generate_path(&self.frame, bounds, fft_size, bin_width, floor_db);
        }

        self.paths.pull_latest(&mut self.latest);
    }

    pub fn path(&self) -> &RenderPath {
        &self.latest
    }
}
