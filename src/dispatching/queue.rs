//! FIFO ready queue for the queue-based policies.

use std::collections::VecDeque;

/// Ordered sequence of indices into the process arena.
///
/// Holds no process data. Rebuilt for every simulation run.
#[derive(Debug, Clone, Default)]
pub struct ReadyQueue {
    entries: VecDeque<usize>,
}

impl ReadyQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an index at the tail.
    pub fn push(&mut self, index: usize) {
        debug_assert!(
            !self.entries.contains(&index),
            "process index {index} enqueued twice"
        );
        self.entries.push_back(index);
    }

    /// Removes and returns the head, if any.
    pub fn pop(&mut self) -> Option<usize> {
        self.entries.pop_front()
    }

    /// Head of the queue without removing it.
    pub fn peek(&self) -> Option<usize> {
        self.entries.front().copied()
    }

    /// Number of queued indices.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut q = ReadyQueue::new();
        q.push(2);
        q.push(0);
        q.push(1);
        assert_eq!(q.len(), 3);
        assert_eq!(q.peek(), Some(2));
        assert_eq!(q.pop(), Some(2));
        assert_eq!(q.pop(), Some(0));
        assert_eq!(q.pop(), Some(1));
        assert_eq!(q.pop(), None);
        assert!(q.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut q = ReadyQueue::new();
        q.push(0);
        q.push(1);
        q.clear();
        assert!(q.is_empty());
        assert_eq!(q.pop(), None);
    }
}
