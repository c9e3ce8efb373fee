use num_complex::Complex;

/// Fixed-capacity sliding window over the most recent samples, used as the
/// FFT input. Implemented as a ring buffer: pushes are O(1) and eviction is
/// just the write index lapping the oldest slot.
#[derive(Debug)]
pub struct AnalysisWindow {
    slots: Vec<Complex<f32>>,
    /// Next slot to overwrite once the window has filled.
    write: usize,
    len: usize,
}

impl AnalysisWindow {
    /// `capacity` is the FFT size and must be a power of two; the transform
    /// relies on it and the check lives here so pushes stay unchecked.
    pub fn new(capacity: usize) -> Self {
        assert!(
            capacity.is_power_of_two(),
            "analysis window capacity must be a power of two, got {capacity}"
        );
        Self {
            slots: vec![Complex::new(0.0, 0.0); capacity],
            write: 0,
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// True from the moment the window first fills; it never shrinks.
    pub fn is_full(&self) -> bool {
        self.len == self.slots.len()
    }

    /// Appends one real-valued sample (imaginary part zero). Once full, each
    /// push evicts exactly the oldest sample.
    pub fn push(&mut self, sample: f32) {
        self.slots[self.write] = Complex::new(sample, 0.0);
        self.write = (self.write + 1) % self.slots.len();
        if self.len < self.slots.len() {
            self.len += 1;
        }
    }

    /// Contents in insertion order, oldest first. Position is the discrete
    /// time index the transform sees, so order matters.
    pub fn snapshot(&self) -> Vec<Complex<f32>> {
        let cap = self.slots.len();
        let start = if self.len < cap {
            0
        } else {
            self.write // oldest slot once wrapped
        };
        (0..self.len)
            .map(|i| self.slots[(start + i) % cap])
            .collect()
    }
}
