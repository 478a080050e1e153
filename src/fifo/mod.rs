use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Fixed-capacity ring of preallocated slots.
///
/// A push into a full ring overwrites the oldest unread slot, so the producer
/// never waits for the consumer. Slots are filled in place and handed out by
/// swapping, which keeps both sides allocation-free once the ring is built.
pub struct Fifo<T> {
    ring: Mutex<Ring<T>>,
    capacity: usize,
    contended: AtomicU64,
}

struct Ring<T> {
    slots: Vec<T>,
    read: usize,
    len: usize,
    dropped: u64,
}

impl<T> Ring<T> {
    /// Returns the slot to write next, evicting the oldest entry when full.
    fn claim(&mut self) -> &mut T {
        let capacity = self.slots.len();
        let index = (self.read + self.len) % capacity;
        if self.len == capacity {
            self.read = (self.read + 1) % capacity;
            self.dropped += 1;
        } else {
            self.len += 1;
        }
        &mut self.slots[index]
    }

    fn take(&mut self) -> Option<&mut T> {
        if self.len == 0 {
            return None;
        }
        let index = self.read;
        self.read = (self.read + 1) % self.slots.len();
        self.len -= 1;
        Some(&mut self.slots[index])
    }
}

impl<T> Fifo<T> {
    /// Builds a ring with `capacity` slots produced by `make_slot`.
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize, mut make_slot: impl FnMut() -> T) -> Self {
        assert!(capacity > 0, "fifo capacity must be non-zero");

        let slots = (0..capacity).map(|_| make_slot()).collect();
        Self {
            ring: Mutex::new(Ring {
                slots,
                read: 0,
                len: 0,
                dropped: 0,
            }),
            capacity,
            contended: AtomicU64::new(0),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.ring.lock().len
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of entries lost to overwrites or producer contention.
    pub fn dropped(&self) -> u64 {
        self.ring.lock().dropped + self.contended.load(Ordering::Relaxed)
    }

    /// Writes the next slot in place.
    pub fn push_with(&self, fill: impl FnOnce(&mut T)) {
        let mut ring = self.ring.lock();
        fill(ring.claim());
    }

    /// Like [`Fifo::push_with`], but gives up instead of waiting when the
    /// consumer holds the lock. Returns `false` if the entry was discarded.
    pub fn try_push_with(&self, fill: impl FnOnce(&mut T)) -> bool {
        match self.ring.try_lock() {
            Some(mut ring) => {
                fill(ring.claim());
                true
            }
            None => {
                self.contended.fetch_add(1, Ordering::Relaxed);
                false
            }
        }
    }

    pub fn push(&self, value: T) {
        self.push_with(|slot| *slot = value);
    }

    /// Swaps the oldest entry into `out`. The previous contents of `out`
    /// become the free slot.
    pub fn pop_swap(&self, out: &mut T) -> bool {
        let mut ring = self.ring.lock();
        match ring.take() {
            Some(slot) => {
                std::mem::swap(slot, out);
                true
            }
            None => false,
        }
    }

    /// Drains the queue, leaving only the newest entry in `out`.
    pub fn pop_latest(&self, out: &mut T) -> bool {
        let mut found = false;
        while self.pop_swap(out) {
            found = true;
        }
        found
    }
}

impl<T: Clone> Fifo<T> {
    pub fn pop(&self) -> Option<T> {
        let mut ring = self.ring.lock();
        ring.take().map(|slot| slot.clone())
    }
}

/// One channel's worth of samples moved through a [`BlockFifo`].
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBlock {
    samples: Vec<f32>,
}

impl AudioBlock {
    pub fn new(len: usize) -> Self {
        Self {
            samples: vec![0.0; len],
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Copies `src` into the block, truncating or zero-padding to its length.
    pub fn copy_from(&mut self, src: &[f32]) {
        let n = src.len().min(self.samples.len());
        self.samples[..n].copy_from_slice(&src[..n]);
        self.samples[n..].fill(0.0);
    }
}

pub type BlockFifo = Fifo<AudioBlock>;

impl Fifo<AudioBlock> {
    pub fn for_blocks(capacity: usize, block_len: usize) -> Self {
        Self::new(capacity, || AudioBlock::new(block_len))
    }

    /// Producer entry point for the audio thread: copies into a preallocated
    /// slot and never waits on the consumer.
    pub fn push_block(&self, samples: &[f32]) -> bool {
        self.try_push_with(|slot| slot.copy_from(samples))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(value: f32) -> Vec<f32> {
        vec![value; 4]
    }

    #[test]
    fn pop_on_empty_returns_nothing() {
        let fifo = BlockFifo::for_blocks(3, 4);
        assert!(fifo.is_empty());
        assert_eq!(fifo.pop(), None);
    }

    #[test]
    fn keeps_fifo_order() {
        let fifo = BlockFifo::for_blocks(3, 4);
        fifo.push_block(&block(1.0));
        fifo.push_block(&block(2.0));

        assert_eq!(fifo.pop().unwrap().samples(), &block(1.0)[..]);
        assert_eq!(fifo.pop().unwrap().samples(), &block(2.0)[..]);
        assert_eq!(fifo.pop(), None);
    }

    #[test]
    fn overwrite_drops_oldest() {
        let capacity = 5;
        let fifo = BlockFifo::for_blocks(capacity, 4);

        for i in 0..=capacity {
            assert!(fifo.push_block(&block(i as f32)));
        }
        assert_eq!(fifo.len(), capacity);
        assert_eq!(fifo.dropped(), 1);

        let mut scratch = AudioBlock::new(4);
        for i in 1..=capacity {
            assert!(fifo.pop_swap(&mut scratch));
            assert_eq!(scratch.samples(), &block(i as f32)[..]);
        }
        assert!(!fifo.pop_swap(&mut scratch));
    }

    #[test]
    fn short_blocks_are_zero_padded() {
        let fifo = BlockFifo::for_blocks(2, 4);
        fifo.push_block(&block(9.0));
        let mut scratch = AudioBlock::new(4);
        fifo.pop_swap(&mut scratch);

        // The recycled slot must not leak stale samples.
        fifo.push_block(&[1.0, 2.0]);
        assert_eq!(fifo.pop().unwrap().samples(), &[1.0, 2.0, 0.0, 0.0]);
    }

    #[test]
    fn pop_latest_discards_older_entries() {
        let fifo = Fifo::new(4, || 0u32);
        for v in 1..=3 {
            fifo.push(v);
        }
        let mut latest = 0;
        assert!(fifo.pop_latest(&mut latest));
        assert_eq!(latest, 3);
        assert!(fifo.is_empty());
        assert!(!fifo.pop_latest(&mut latest));
    }

    #[test]
    fn producer_drops_instead_of_waiting_on_a_held_lock() {
        let fifo = BlockFifo::for_blocks(3, 4);
        assert!(fifo.push_block(&block(1.0)));

        let held = fifo.ring.lock();
        assert!(!fifo.push_block(&block(2.0)));
        assert_eq!(fifo.contended.load(Ordering::Relaxed), 1);
        assert_eq!(held.len, 1);
        drop(held);

        assert_eq!(fifo.dropped(), 1);
        assert_eq!(fifo.len(), 1);
        assert_eq!(fifo.pop().unwrap().samples(), &block(1.0)[..]);
    }

    #[test]
    #[should_panic]
    fn zero_capacity_is_rejected() {
        let _ = Fifo::new(0, || 0u8);
    }
}
