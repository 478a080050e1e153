//! Producer-side handle given to the audio engine.

use crate::analysis::Channel;
use crate::config::{AnalyzerConfig, ConfigError};
use crate::fifo::BlockFifo;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// The two channel queues plus the engine's current sample rate.
///
/// Cloning shares the same queues. Everything reachable from the audio
/// callback is lock-free or `try_lock` only.
#[derive(Clone)]
pub struct AudioTap {
    left: Arc<BlockFifo>,
    right: Arc<BlockFifo>,
    sample_rate: Arc<AtomicU64>,
    block_size: usize,
}

fn valid_sample_rate(sample_rate: f64) -> bool {
    sample_rate.is_finite() && sample_rate > 0.0
}

impl AudioTap {
    pub fn new(config: &AnalyzerConfig, sample_rate: f64) -> Result<Self, ConfigError> {
        if !valid_sample_rate(sample_rate) {
            return Err(ConfigError::SampleRate(sample_rate));
        }
        let fifo = || Arc::new(BlockFifo::for_blocks(config.fifo_capacity, config.block_size));
        Ok(Self {
            left: fifo(),
            right: fifo(),
            sample_rate: Arc::new(AtomicU64::new(sample_rate.to_bits())),
            block_size: config.block_size,
        })
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn fifo(&self, channel: Channel) -> Arc<BlockFifo> {
        match channel {
            Channel::Left => self.left.clone(),
            Channel::Right => self.right.clone(),
        }
    }

    pub fn push(&self, channel: Channel, samples: &[f32]) -> bool {
        match channel {
            Channel::Left => self.left.push_block(samples),
            Channel::Right => self.right.push_block(samples),
        }
    }

    pub fn push_stereo(&self, left: &[f32], right: &[f32]) {
        self.left.push_block(left);
        self.right.push_block(right);
    }

    pub fn sample_rate(&self) -> f64 {
        f64::from_bits(self.sample_rate.load(Ordering::Acquire))
    }

    /// Ignores rates that are not positive and finite.
    pub fn set_sample_rate(&self, sample_rate: f64) {
        if valid_sample_rate(sample_rate) {
            self.sample_rate
                .store(sample_rate.to_bits(), Ordering::Release);
        } else {
            log::warn!("Ignoring invalid sample rate {}", sample_rate);
        }
    }

    /// Blocks lost on each channel so far.
    pub fn dropped(&self) -> (u64, u64) {
        (self.left.dropped(), self.right.dropped())
    }
}

/// Collects frames of arbitrary callback sizes into fixed-length blocks.
///
/// Staging buffers are allocated once, so feeding it from an audio callback
/// does not allocate.
pub struct BlockAssembler {
    left: Vec<f32>,
    right: Vec<f32>,
    filled: usize,
}

impl BlockAssembler {
    pub fn new(block_size: usize) -> Self {
        Self {
            left: vec![0.0; block_size],
            right: vec![0.0; block_size],
            filled: 0,
        }
    }

    pub fn push_frame(&mut self, left: f32, right: f32, tap: &AudioTap) {
        self.left[self.filled] = left;
        self.right[self.filled] = right;
        self.filled += 1;

        if self.filled == self.left.len() {
            tap.push_stereo(&self.left, &self.right);
            self.filled = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AnalyzerConfig {
        AnalyzerConfig {
            block_size: 4,
            fifo_capacity: 3,
            ..Default::default()
        }
    }

    #[test]
    fn rejects_bad_sample_rate() {
        assert!(matches!(
            AudioTap::new(&config(), 0.0),
            Err(ConfigError::SampleRate(_))
        ));
    }

    #[test]
    fn sample_rate_updates_are_visible() {
        let tap = AudioTap::new(&config(), 44_100.0).unwrap();
        let other = tap.clone();
        other.set_sample_rate(96_000.0);
        other.set_sample_rate(f64::NAN);
        assert_eq!(tap.sample_rate(), 96_000.0);
    }

    #[test]
    fn assembler_emits_whole_blocks() {
        let tap = AudioTap::new(&config(), 48_000.0).unwrap();
        let mut assembler = BlockAssembler::new(tap.block_size());

        for i in 0..10 {
            assembler.push_frame(i as f32, -(i as f32), &tap);
        }
        let left = tap.fifo(Channel::Left);
        let right = tap.fifo(Channel::Right);
        assert_eq!(left.len(), 2);
        assert_eq!(left.pop().unwrap().samples(), &[0.0, 1.0, 2.0, 3.0]);
        assert_eq!(right.pop().unwrap().samples(), &[0.0, -1.0, -2.0, -3.0]);
        assert_eq!(tap.dropped(), (0, 0));
    }
}
