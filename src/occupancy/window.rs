use std::collections::VecDeque;

/// Fixed-capacity FIFO of the most recent raw observations for one zone.
///
/// Keeps a running count of `true` samples so the unanimity check is O(1).
#[derive(Clone, Debug)]
pub struct SmoothingWindow {
    samples: VecDeque<bool>,
    capacity: usize,
    occupied: usize,
}

impl SmoothingWindow {
    /// `capacity` is clamped to at least one sample.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
            occupied: 0,
        }
    }

    /// Append one observation, evicting the oldest once the window is full.
    pub fn push(&mut self, raw: bool) {
        if self.samples.len() == self.capacity {
            if let Some(true) = self.samples.pop_front() {
                self.occupied -= 1;
            }
        }
        self.samples.push_back(raw);
        if raw {
            self.occupied += 1;
        }
    }

    /// The value every sample agrees on, once the window holds `capacity`
    /// samples. `None` while warming up or when the samples disagree.
    pub fn unanimous(&self) -> Option<bool> {
        if !self.is_full() {
            return None;
        }
        if self.occupied == self.capacity {
            Some(true)
        } else if self.occupied == 0 {
            Some(false)
        } else {
            None
        }
    }

    pub fn is_full(&self) -> bool {
        self.samples.len() == self.capacity
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.samples.iter().copied()
    }
}
