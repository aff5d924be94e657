use std::f32::consts::PI;

const TWO_PI: f32 = 2. * PI;

/// Maps a phase in `[-π, π)` to an output sample.
pub type Waveshape = fn(f32) -> f32;

/// Triangle wave: `-1` at `±π`, rising linearly to `1` at phase `0`.
pub fn triangle(phase: f32) -> f32 {
    1. - 2. * (phase / PI).abs()
}

/// A running angular position, kept within `[-π, π)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Phase(f32);

impl Phase {
    pub const START: Phase = Phase(-PI);

    pub fn value(self) -> f32 {
        self.0
    }

    /// Returns the current position, then moves forward by `increment` radians.
    ///
    /// `increment` must lie in `[0, 2π)`, so at most one wrap is needed.
    fn advance(&mut self, increment: f32) -> f32 {
        let current = self.0;
        let mut next = current + increment;
        if next >= PI {
            next -= TWO_PI;
        }
        // Rounding near 3π can leave the sum one ulp short of a full wrap.
        if !(-PI..PI).contains(&next) {
            next = -PI;
        }
        self.0 = next;
        current
    }
}

/// Generates a periodic waveform by evaluating a `Waveshape` at a continuously advancing phase.
///
/// Frequency changes take effect on the next sample. There is no smoothing, so a large jump
/// produces an audible corner in the waveform.
#[derive(Clone, Debug)]
pub struct Oscillator {
    shape: Waveshape,
    phase: Phase,
    frequency: f32,
    sample_rate: f32,
    increment: f32,
}

impl Oscillator {
    pub fn new(shape: Waveshape, sample_rate: f32) -> Self {
        let mut osc = Self {
            shape,
            phase: Phase::START,
            frequency: 0.,
            sample_rate,
            increment: 0.,
        };
        osc.update_increment();
        osc
    }

    pub fn triangle(sample_rate: f32) -> Self {
        Self::new(triangle, sample_rate)
    }

    pub fn set_frequency(&mut self, frequency: f32) {
        if frequency != self.frequency {
            self.frequency = frequency;
            self.update_increment();
        }
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.update_increment();
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Restarts the waveform from the beginning of its period.
    pub fn reset(&mut self) {
        self.phase = Phase::START;
    }

    pub fn next_sample(&mut self) -> f32 {
        (self.shape)(self.phase.advance(self.increment))
    }

    /// Overwrites `output` with consecutive samples of the waveform.
    pub fn render(&mut self, output: &mut [f32]) {
        for sample in output.iter_mut() {
            *sample = self.next_sample();
        }
    }

    /// Whole turns are dropped from the per-sample step, which keeps `Phase::advance` constant
    /// time however small the sample rate gets.
    fn update_increment(&mut self) {
        let increment = if self.sample_rate > 0. {
            (TWO_PI * self.frequency / self.sample_rate).rem_euclid(TWO_PI)
        } else {
            0.
        };
        self.increment = if increment.is_finite() && increment < TWO_PI {
            increment
        } else {
            0.
        };
    }
}
