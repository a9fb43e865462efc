//! Fixed-capacity FIFO sample buffer with population statistics.
//!
//! Each detection session keeps two of these: the baseline window holding the
//! subject's calibrated "normal" signal and the recent window holding the
//! latest live samples. Windows are small (tens of samples), so statistics are
//! recomputed over the contents on every query.

use std::collections::VecDeque;

/// Rolling window of scalar signal values
#[derive(Debug, Clone, PartialEq)]
pub struct RollingWindow {
    capacity: usize,
    values: VecDeque<f64>,
}

impl RollingWindow {
    /// Create an empty window holding at most `capacity` values
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Window capacity must be greater than 0");
        Self {
            capacity,
            values: VecDeque::with_capacity(capacity),
        }
    }

    /// Append a value, evicting the oldest one when the window is full
    pub fn push(&mut self, value: f64) {
        if self.values.len() >= self.capacity {
            self.values.pop_front();
        }
        self.values.push_back(value);
    }

    /// Population mean of the current contents, `0.0` when empty
    #[must_use]
    pub fn mean(&self) -> f64 {
        self.values.iter().sum::<f64>() / self.denominator()
    }

    /// Population standard deviation of the current contents, `0.0` when empty
    #[must_use]
    pub fn std_dev(&self) -> f64 {
        let mean = self.mean();
        let variance = self.values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / self.denominator();
        variance.sqrt()
    }

    /// Summary statistics, or `None` while the window is empty
    #[must_use]
    pub fn statistics(&self) -> Option<Statistics> {
        if self.values.is_empty() {
            return None;
        }

        let min = self.values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Some(Statistics {
            mean: self.mean(),
            std_dev: self.std_dev(),
            min,
            max,
            range: max - min,
        })
    }

    /// Number of values currently held
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the window holds no values
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether the window holds `capacity` values
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.values.len() >= self.capacity
    }

    /// Maximum number of values held
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate over the contents, oldest first
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied()
    }

    /// Drop all values
    pub fn clear(&mut self) {
        self.values.clear();
    }

    #[allow(clippy::cast_precision_loss)] // window sizes are tiny
    fn denominator(&self) -> f64 {
        self.values.len().max(1) as f64
    }
}

/// Statistical summary of a window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Statistics {
    /// Mean value of the data
    pub mean: f64,
    /// Population standard deviation of the data
    pub std_dev: f64,
    /// Minimum value in the window
    pub min: f64,
    /// Maximum value in the window
    pub max: f64,
    /// Range (max - min) of the data
    pub range: f64,
}
