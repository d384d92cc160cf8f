//! Ordered pending buffer.

use std::collections::VecDeque;

/// Insertion-ordered buffer of not-yet-sent items.
///
/// The order items are pushed in is the order they are drained in, which is
/// the order the transport sees and the order outcomes are matched back by.
#[derive(Debug)]
pub struct PendingBuffer<T> {
    items: VecDeque<T>,
}

impl<T> Default for PendingBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PendingBuffer<T> {
    pub fn new() -> Self {
        Self {
            items: VecDeque::new(),
        }
    }

    /// Append `item`; reports whether the buffer reached `max_batch_size`.
    pub fn push(&mut self, item: T, max_batch_size: usize) -> BufferAddResult {
        self.items.push_back(item);
        let count = self.items.len();
        if count >= max_batch_size {
            BufferAddResult::ShouldFlush { count }
        } else {
            BufferAddResult::Added { count }
        }
    }

    /// Take every item, leaving an empty buffer for the next cycle.
    pub fn drain(&mut self) -> Vec<T> {
        self.items.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferAddResult { Added { count: usize }, ShouldFlush { count: usize } }
impl BufferAddResult { pub fn should_flush(&self) -> bool { matches!(self, BufferAddResult::ShouldFlush { .. }) } pub fn count(&self) -> usize { match self { BufferAddResult::Added { count } | BufferAddResult::ShouldFlush { count } => *count } } }
