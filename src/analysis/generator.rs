use crate::decibels::gain_to_decibels;
use crate::fft::{find_dft, DFTBase, WindowKind};
use crate::fifo::Fifo;
use num_complex::Complex32;
use std::sync::Arc;

/// Per-bin magnitudes in decibels, `fft_size / 2 + 1` values long.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpectralFrame {
    magnitudes_db: Vec<f32>,
}

impl SpectralFrame {
    pub fn from_decibels(magnitudes_db: Vec<f32>) -> Self {
        Self { magnitudes_db }
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.magnitudes_db
    }

    pub fn len(&self) -> usize {
        self.magnitudes_db.len()
    }

    pub fn is_empty(&self) -> bool {
        self.magnitudes_db.is_empty()
    }

    /// Index of the loudest bin, ignoring DC.
    pub fn peak_bin(&self) -> Option<usize> {
        self.magnitudes_db
            .iter()
            .enumerate()
            .skip(1)
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
    }
}

/// Windowed transform of the analysis buffer into decibel frames.
pub struct SpectrumGenerator {
    plan: Arc<dyn DFTBase>,
    window: Vec<f32>,
    scratch: Vec<Complex32>,
    frames: Fifo<SpectralFrame>,
    floor_db: f32,
}

impl SpectrumGenerator {
    pub fn new(fft_size: usize, window: WindowKind, frame_capacity: usize, floor_db: f32) -> Self {
        let bins = fft_size / 2 + 1;
        Self {
            plan: find_dft(fft_size),
            window: window.build(fft_size),
            scratch: vec![Complex32::default(); fft_size],
            frames: Fifo::new(frame_capacity, || SpectralFrame {
                magnitudes_db: vec![floor_db; bins],
            }),
            floor_db,
        }
    }

    pub fn fft_size(&self) -> usize {
        self.plan.size()
    }

    pub fn floor_db(&self) -> f32 {
        self.floor_db
    }

    pub fn available_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn dropped_frames(&self) -> u64 {
        self.frames.dropped()
    }

    /// Transforms one full analysis window and queues the resulting frame.
    /// Input shorter than the transform is ignored.
    pub fn produce(&mut self, audio: &[f32]) {
        let n = self.plan.size();
        if audio.len() < n {
            return;
        }

        //
        // Apply window function and prepare complex FFT input.
        //
        for ((slot, &sample), &w) in self.scratch.iter_mut().zip(audio).zip(&self.window) {
            *slot = Complex32::new(sample * w, 0.0);
        }

        self.plan.xform_inplace(&mut self.scratch);

        //
        // Normalise magnitudes and convert to decibels.
        //
        let bins = n / 2 + 1;
        let norm = (n / 2).max(1) as f32;
        let floor_db = self.floor_db;
        let scratch = &self.scratch;

        self.frames.push_with(|frame| {
            frame.magnitudes_db.resize(bins, floor_db);
            for (out, bin) in frame.magnitudes_db.iter_mut().zip(scratch) {
                let mut mag = bin.norm() / norm;
                if !mag.is_finite() {
                    mag = 0.0;
                }
                *out = gain_to_decibels(mag, floor_db);
            }
        });
    }

    pub fn pop_frame(&self, out: &mut SpectralFrame) -> bool {
        self.frames.pop_swap(out)
    }
}
