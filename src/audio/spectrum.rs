use std::f32::consts::PI;

use num_complex::Complex;

/// Radix-2 decimation-in-time FFT plus the magnitude post-processing that
/// turns a full analysis window into equalizer bar levels.
///
/// The power-of-two requirement is validated once at construction; the
/// recursion itself carries no size checks.
#[derive(Debug, Clone, Copy)]
pub struct SpectrumAnalyzer {
    fft_size: usize,
}

impl SpectrumAnalyzer {
    pub fn new(fft_size: usize) -> Self {
        assert!(
            fft_size.is_power_of_two(),
            "FFT size must be a power of two, got {fft_size}"
        );
        Self { fft_size }
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Number of levels produced per transform: one per retained bin.
    pub fn bin_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Forward transform of exactly `fft_size` time-domain samples.
    pub fn fft(&self, input: &[Complex<f32>]) -> Vec<Complex<f32>> {
        debug_assert_eq!(input.len(), self.fft_size);
        fft_recursive(input)
    }

    /// Magnitude per frequency bin, DC first, scaled by 1/(n/2). Only the
    /// first half is kept; for real input the second half mirrors it.
    pub fn levels(&self, input: &[Complex<f32>]) -> Vec<f32> {
        let spectrum = self.fft(input);
        let half = self.fft_size / 2;
        spectrum[..half]
            .iter()
            .map(|c| c.norm() / half as f32)
            .collect()
    }
}

fn fft_recursive(input: &[Complex<f32>]) -> Vec<Complex<f32>> {
    let n = input.len();
    if n == 1 {
        return input.to_vec();
    }

    let even: Vec<Complex<f32>> = input.iter().step_by(2).copied().collect();
    let odd: Vec<Complex<f32>> = input.iter().skip(1).step_by(2).copied().collect();
    let even = fft_recursive(&even);
    let odd = fft_recursive(&odd);

    let mut out = vec![Complex::new(0.0, 0.0); n];
    for k in 0..n / 2 {
        let twiddle = Complex::from_polar(1.0, -2.0 * PI * k as f32 / n as f32);
        let butterfly = twiddle * odd[k];
        out[k] = even[k] + butterfly;
        out[k + n / 2] = even[k] - butterfly;
    }
    out
}
