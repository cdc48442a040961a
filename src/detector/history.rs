use crate::util::median;
use std::collections::VecDeque;

/// Rolling buffer of the last few timer readings of the open window.
#[derive(Debug, Clone)]
pub struct TimerHistory {
    values: VecDeque<u8>,
    capacity: usize,
}

impl TimerHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            values: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, value: u8) {
        if self.values.len() == self.capacity {
            self.values.pop_front();
        }
        self.values.push_back(value);
    }

    pub fn median(&self) -> Option<f32> {
        let values: Vec<u8> = self.values.iter().copied().collect();
        median(&values)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_evicts_oldest() {
        let mut history = TimerHistory::new(3);
        for v in [99, 98, 97, 10] {
            history.push(v);
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.median(), Some(97.0));
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.median(), None);
    }
}
