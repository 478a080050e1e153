/// Whether any audio has reached the analysis window yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccumulatorState {
    Idle,
    Accumulating,
}

/// Rolling window holding the most recent `len` samples of one channel.
///
/// The length never changes: each block shifts the history left by the
/// block length and lands at the tail.
#[derive(Debug, Clone)]
pub struct MonoAccumulator {
    buffer: Vec<f32>,
    pending: usize,
    received: u64,
}

impl MonoAccumulator {
    pub fn new(len: usize) -> Self {
        Self {
            buffer: vec![0.0; len],
            pending: 0,
            received: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn samples(&self) -> &[f32] {
        &self.buffer
    }

    pub fn state(&self) -> AccumulatorState {
        if self.received == 0 {
            AccumulatorState::Idle
        } else {
            AccumulatorState::Accumulating
        }
    }

    pub fn push(&mut self, block: &[f32]) {
        let len = self.buffer.len();
        let size = block.len();
        if size >= len {
            self.buffer.copy_from_slice(&block[size - len..]);
        } else {
            self.buffer.copy_within(size.., 0);
            self.buffer[len - size..].copy_from_slice(block);
        }
        self.pending += size;
        self.received += size as u64;
    }

    /// Decides whether a transform is due, consuming the pending count.
    ///
    /// Without a hop size every pushed block triggers one transform. With a
    /// hop size, a transform fires once `hop` new samples are waiting; hops
    /// that complete inside the same block collapse into one transform.
    pub fn take_ready(&mut self, hop: Option<usize>) -> bool {
        match hop {
            None if self.pending > 0 => {
                self.pending = 0;
                true
            }
            Some(hop) if hop > 0 && self.pending >= hop => {
                self.pending %= hop;
                true
            }
            _ => false,
        }
    }
}
