/// Scales a signal by a linear factor.
///
/// Gain changes apply immediately; there is no ramp between the old and new value.
#[derive(Clone, Debug, PartialEq)]
pub struct Gain {
    gain: f32,
}

impl Gain {
    pub fn new(gain: f32) -> Self {
        Self { gain }
    }

    pub fn set_gain_linear(&mut self, gain: f32) {
        self.gain = gain;
    }

    pub fn gain_linear(&self) -> f32 {
        self.gain
    }

    pub fn process_sample(&self, sample: f32) -> f32 {
        sample * self.gain
    }

    /// Scales every sample of `buffer` in place.
    pub fn process(&self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process_sample(*sample);
        }
    }
}

impl Default for Gain {
    fn default() -> Self {
        Self::new(1.)
    }
}
