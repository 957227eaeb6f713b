//! Per-player intent buffering.
//!
//! Message arrival is decoupled from simulation stepping: intents are pushed
//! here the moment they come off the wire and consumed only at the next tick
//! boundary, in FIFO arrival order, each exactly once. The buffer is bounded
//! so a flooding client cannot grow server memory; on overflow the oldest
//! intent is discarded, since the newest input best reflects what the client
//! currently wants.

use log::debug;
use shared::InputData;
use std::collections::VecDeque;

pub const DEFAULT_QUEUE_CAPACITY: usize = 128;

#[derive(Debug)]
pub struct InputQueue {
    buffer: VecDeque<InputData>,
    capacity: usize,
}

impl InputQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, input: InputData) {
        if self.buffer.len() >= self.capacity {
            self.buffer.pop_front();
            debug!("Input queue full, dropping oldest intent");
        }
        self.buffer.push_back(input);
    }

    /// Empties the queue, yielding every buffered intent in arrival order.
    pub fn drain(&mut self) -> Vec<InputData> {
        self.buffer.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new(DEFAULT_QUEUE_CAPACITY)
    }
}
