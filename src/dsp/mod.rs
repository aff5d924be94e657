//! The plugin's digital signal processing is fully implemented within this module.
//!
//! The signal chain is fixed: an oscillator writes a triangle wave into every output channel, and
//! a gain stage then scales those samples in place. Parameter values arrive as a `ParamSnapshot`
//! taken once at the start of each processing call, so frequency and gain only ever change on
//! block boundaries. This keeps the oscillator's phase continuous between calls.
//!
//! Nothing in this module allocates, locks or blocks. Work per call is proportional to the block
//! size.

use crate::params::ParamSnapshot;

mod gain;
mod oscillator;

pub use gain::Gain;
pub use oscillator::{triangle, Oscillator, Phase, Waveshape};

/// Sample rate assumed until the host reports the real one.
pub const DEFAULT_SAMPLE_RATE: f32 = 44_100.;

/// Handles all audio processing algorithms for the plugin.
pub struct PluginDsp {
    oscillator: Oscillator,
    gain: Gain,
}

impl PluginDsp {
    pub fn new(sample_rate: f32) -> Self {
        let snapshot = ParamSnapshot::default();
        let mut oscillator = Oscillator::triangle(sample_rate);
        oscillator.set_frequency(snapshot.frequency);

        Self {
            oscillator,
            gain: Gain::new(snapshot.gain),
        }
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.oscillator.set_sample_rate(sample_rate);
    }

    /// Called when the audio stream (re)starts.
    pub fn reset(&mut self) {
        self.oscillator.reset();
    }

    /// Applies `snapshot` to the signal chain, then overwrites each of `channels` with the
    /// processed output. Every channel receives the same samples.
    pub fn process<'a, I>(&mut self, snapshot: ParamSnapshot, channels: I)
    where
        I: IntoIterator<Item = &'a mut [f32]>,
    {
        self.oscillator.set_frequency(snapshot.frequency);
        self.gain.set_gain_linear(snapshot.gain);

        // Each channel is rendered by a copy of the oscillator starting from the same phase.
        // The copy that rendered the last channel carries the advanced phase into the next call.
        let start = self.oscillator.clone();
        for channel in channels {
            let mut oscillator = start.clone();
            oscillator.render(channel);
            self.gain.process(channel);
            self.oscillator = oscillator;
        }
    }
}

impl Default for PluginDsp {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_RATE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(frequency: f32, gain: f32) -> ParamSnapshot {
        ParamSnapshot { frequency, gain }
    }

    fn process_stereo(dsp: &mut PluginDsp, snapshot: ParamSnapshot, len: usize) -> [Vec<f32>; 2] {
        let mut left = vec![f32::NAN; len];
        let mut right = vec![f32::NAN; len];
        dsp.process(snapshot, vec![&mut left[..], &mut right[..]]);
        [left, right]
    }

    #[test]
    fn channels_are_fully_overwritten_with_identical_samples() {
        let mut dsp = PluginDsp::new(48_000.);
        let [left, right] = process_stereo(&mut dsp, snapshot(440., 0.5), 512);
        assert!(left.iter().all(|s| s.is_finite()));
        assert_eq!(left, right);
    }

    #[test]
    fn output_is_oscillator_scaled_by_gain() {
        let mut dsp = PluginDsp::new(48_000.);
        let [output, _] = process_stereo(&mut dsp, snapshot(440., 0.25), 256);

        let mut reference = Oscillator::triangle(48_000.);
        reference.set_frequency(440.);
        let mut expected = vec![0f32; 256];
        reference.render(&mut expected);

        for (out, osc) in output.iter().zip(expected.iter()) {
            assert!((out - osc * 0.25).abs() <= f32::EPSILON);
        }
    }

    #[test]
    fn zero_gain_produces_silence() {
        let mut dsp = PluginDsp::new(48_000.);
        process_stereo(&mut dsp, snapshot(1000., 0.8), 333);
        let [left, right] = process_stereo(&mut dsp, snapshot(1000., 0.), 333);
        assert!(left.iter().chain(right.iter()).all(|&s| s == 0.));
    }

    #[test]
    fn phase_is_continuous_across_calls() {
        let params = snapshot(220., 1.);

        let mut whole = PluginDsp::new(44_100.);
        let [expected, _] = process_stereo(&mut whole, params, 1024);

        let mut blocks = PluginDsp::new(44_100.);
        let mut actual = Vec::new();
        for &len in [100, 256, 1, 667].iter() {
            let [left, _] = process_stereo(&mut blocks, params, len);
            actual.extend(left);
        }

        assert_eq!(actual, expected);
    }

    #[test]
    fn snapshot_applies_from_the_next_block() {
        let mut dsp = PluginDsp::new(48_000.);
        process_stereo(&mut dsp, snapshot(220., 1.), 64);
        let [second, _] = process_stereo(&mut dsp, snapshot(880., 1.), 64);

        let mut reference = Oscillator::triangle(48_000.);
        reference.set_frequency(220.);
        reference.render(&mut [0f32; 64]);
        reference.set_frequency(880.);
        let mut expected = [0f32; 64];
        reference.render(&mut expected);

        assert_eq!(&second[..], &expected[..]);
    }

    #[test]
    fn reset_restarts_the_waveform() {
        let mut dsp = PluginDsp::new(48_000.);
        let [first, _] = process_stereo(&mut dsp, snapshot(500., 1.), 32);
        process_stereo(&mut dsp, snapshot(500., 1.), 77);
        dsp.reset();
        let [restarted, _] = process_stereo(&mut dsp, snapshot(500., 1.), 32);
        assert_eq!(first, restarted);
        assert_eq!(first[0], -1.);
    }

    #[test]
    fn no_channels_is_a_no_op() {
        let mut dsp = PluginDsp::new(48_000.);
        dsp.process(snapshot(440., 1.), Vec::<&mut [f32]>::new());
        let [left, _] = process_stereo(&mut dsp, snapshot(440., 1.), 1);
        assert_eq!(left[0], -1.);
    }
}
