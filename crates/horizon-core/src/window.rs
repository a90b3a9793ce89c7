//! Bounded sliding window of recent data points

use std::collections::VecDeque;

use serde::Serialize;

/// Ordered buffer with a fixed capacity; the oldest entry is dropped first
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SlidingWindow<T> {
    #[serde(skip)]
    capacity: usize,
    items: VecDeque<T>,
}

impl<T> SlidingWindow<T> {
    /// A window holding at most `capacity` items (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            items: VecDeque::with_capacity(capacity),
        }
    }

    /// Fill from an iterator, keeping only the newest `capacity` items
    pub fn from_iter_capped(capacity: usize, items: impl IntoIterator<Item = T>) -> Self {
        let mut window = Self::new(capacity);
        window.extend(items);
        window
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append as newest, evicting the oldest when full
    pub fn push(&mut self, item: T) -> Option<T> {
        let evicted = if self.items.len() == self.capacity {
            self.items.pop_front()
        } else {
            None
        };
        self.items.push_back(item);
        evicted
    }

    pub fn extend(&mut self, items: impl IntoIterator<Item = T>) {
        for item in items {
            self.push(item);
        }
    }

    /// Replace the whole contents
    pub fn replace(&mut self, items: impl IntoIterator<Item = T>) {
        self.items.clear();
        self.extend(items);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn newest(&self) -> Option<&T> {
        self.items.back()
    }

    pub fn oldest(&self) -> Option<&T> {
        self.items.front()
    }

    /// Oldest to newest
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.items.iter()
    }

    /// Newest to oldest
    pub fn iter_newest_first(&self) -> impl Iterator<Item = &T> {
        self.items.iter().rev()
    }
}

impl<T: Clone> SlidingWindow<T> {
    pub fn to_vec(&self) -> Vec<T> {
        self.items.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_oldest_when_full() {
        let mut window = SlidingWindow::new(3);
        for i in 0..5 {
            window.push(i);
        }
        assert_eq!(window.len(), 3);
        assert_eq!(window.to_vec(), vec![2, 3, 4]);
        assert_eq!(window.oldest(), Some(&2));
        assert_eq!(window.newest(), Some(&4));
    }

    #[test]
    fn push_reports_eviction() {
        let mut window = SlidingWindow::new(1);
        assert_eq!(window.push('a'), None);
        assert_eq!(window.push('b'), Some('a'));
    }

    #[test]
    fn capped_fill_keeps_newest() {
        let window = SlidingWindow::from_iter_capped(50, 0..60);
        assert_eq!(window.len(), 50);
        assert_eq!(window.oldest(), Some(&10));
        let newest_first: Vec<_> = window.iter_newest_first().take(2).copied().collect();
        assert_eq!(newest_first, vec![59, 58]);
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let mut window = SlidingWindow::new(0);
        window.push(1);
        window.push(2);
        assert_eq!(window.to_vec(), vec![2]);
    }

    #[test]
    fn serializes_as_list() {
        let window = SlidingWindow::from_iter_capped(2, [1, 2, 3]);
        assert_eq!(serde_json::to_string(&window).unwrap(), "[2,3]");
    }
}
