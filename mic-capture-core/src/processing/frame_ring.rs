use std::sync::Arc;

use parking_lot::{Condvar, Mutex};

use crate::models::config::{CaptureConfig, Encoding};
use crate::traits::sink::RingSink;

/// A finished frame tagged with its encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub encoding: Encoding,
    pub data: Vec<u8>,
}

/// Bounded circular buffer of finished frames.
///
/// Overflow behavior: drops the oldest frame and counts it.
#[derive(Debug)]
pub struct FrameRing {
    slots: Vec<Option<Frame>>,
    write_index: usize,
    read_index: usize,
    available: usize,
    capacity: usize,
    overflowed: u64,
}

impl FrameRing {
    /// A capacity of 0 is raised to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: vec![None; capacity],
            write_index: 0,
            read_index: 0,
            available: 0,
            capacity,
            overflowed: 0,
        }
    }

    /// Ring sized by the session's frame backlog.
    pub fn for_config(config: &CaptureConfig) -> Self {
        Self::new(config.frame_backlog as usize)
    }

    pub fn write(&mut self, frame: Frame) {
        if self.available == self.capacity {
            self.slots[self.read_index] = None;
            self.read_index = (self.read_index + 1) % self.capacity;
            self.available -= 1;
            self.overflowed += 1;
        }

        self.slots[self.write_index] = Some(frame);
        self.write_index = (self.write_index + 1) % self.capacity;
        self.available += 1;
    }

    /// Remove and return the oldest frame.
    pub fn pop(&mut self) -> Option<Frame> {
        if self.available == 0 {
            return None;
        }
        let frame = self.slots[self.read_index].take();
        self.read_index = (self.read_index + 1) % self.capacity;
        self.available -= 1;
        frame
    }

    /// Remove up to `count` frames, oldest first.
    pub fn read(&mut self, count: usize) -> Vec<Frame> {
        let to_read = count.min(self.available);
        let mut result = Vec::with_capacity(to_read);
        for _ in 0..to_read {
            if let Some(frame) = self.pop() {
                result.push(frame);
            }
        }
        result
    }

    pub fn count(&self) -> usize {
        self.available
    }

    pub fn is_empty(&self) -> bool {
        self.available == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Frames discarded because the ring was full since creation or the last reset.
    pub fn overflowed(&self) -> u64 {
        self.overflowed
    }

    /// Empty the ring and clear the overflow count.
    pub fn reset(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.write_index = 0;
        self.read_index = 0;
        self.available = 0;
        self.overflowed = 0;
    }
}

/// `FrameRing` shared between the sampling worker and a consumer thread.
#[derive(Debug, Clone)]
pub struct SharedFrameRing {
    inner: Arc<(Mutex<FrameRing>, Condvar)>,
}

impl SharedFrameRing {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new((Mutex::new(FrameRing::new(capacity)), Condvar::new())),
        }
    }

    pub fn for_config(config: &CaptureConfig) -> Self {
        Self::new(config.frame_backlog as usize)
    }

    pub fn try_pop(&self) -> Option<Frame> {
        self.inner.0.lock().pop()
    }

    /// Wait until a frame is available or `timeout` elapses.
    pub fn pop_timeout(&self, timeout: std::time::Duration) -> Option<Frame> {
        let (ring, ready) = &*self.inner;
        let mut ring = ring.lock();
        if ring.is_empty() {
            ready.wait_for(&mut ring, timeout);
        }
        ring.pop()
    }

    pub fn count(&self) -> usize {
        self.inner.0.lock().count()
    }

    pub fn overflowed(&self) -> u64 {
        self.inner.0.lock().overflowed()
    }

    pub fn reset(&self) {
        self.inner.0.lock().reset();
    }
}

impl RingSink for SharedFrameRing {
    fn push(&self, encoding: Encoding, frame: &[u8]) {
        let (ring, ready) = &*self.inner;
        ring.lock().write(Frame {
            encoding,
            data: frame.to_vec(),
        });
        ready.notify_one();
    }
}
