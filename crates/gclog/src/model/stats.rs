use serde::Serialize;

/// Numeric sample type accepted by [`Stats`].
pub trait Sample: Copy + PartialOrd + Default {
    /// Integer sums clamp at the type bounds instead of wrapping.
    fn saturating_add(self, other: Self) -> Self;

    fn to_f64(self) -> f64;
}

impl Sample for f64 {
    fn saturating_add(self, other: Self) -> Self {
        self + other
    }

    fn to_f64(self) -> f64 {
        self
    }
}

impl Sample for i64 {
    fn saturating_add(self, other: Self) -> Self {
        i64::saturating_add(self, other)
    }

    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl Sample for u64 {
    fn saturating_add(self, other: Self) -> Self {
        u64::saturating_add(self, other)
    }

    fn to_f64(self) -> f64 {
        self as f64
    }
}

/// Running count/sum/min/max over a sample stream.
///
/// `min`, `max` and `mean` are `None` until the first sample; `sum` starts
/// at zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Stats<T: Sample> {
    count: usize,
    sum: T,
    min: Option<T>,
    max: Option<T>,
}

impl<T: Sample> Stats<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, value: T) {
        self.count += 1;
        self.sum = self.sum.saturating_add(value);
        if self.min.map_or(true, |m| value < m) {
            self.min = Some(value);
        }
        if self.max.map_or(true, |m| value > m) {
            self.max = Some(value);
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn sum(&self) -> T {
        self.sum
    }

    pub fn min(&self) -> Option<T> {
        self.min
    }

    pub fn max(&self) -> Option<T> {
        self.max
    }

    pub fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum.to_f64() / self.count as f64)
        }
    }
}
