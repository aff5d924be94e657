//! Declarations of the plugin's two automatable parameters, and the lock-free storage used to
//! share their values between threads.
//!
//! The VST API exchanges parameter values normalized to `0..=1`. Internally, each parameter is
//! stored as its plain value (Hz for frequency, a linear multiplier for gain) so that the audio
//! thread can use it directly. `ParamRange` converts between the two representations.

use std::sync::atomic::{AtomicU32, Ordering};

/// Identifies one of the plugin's parameters. The discriminant is the VST parameter index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamId {
    Frequency = 0,
    Gain = 1,
}

impl ParamId {
    pub const ALL: [ParamId; 2] = [ParamId::Frequency, ParamId::Gain];

    pub fn from_index(index: i32) -> Option<Self> {
        match index {
            0 => Some(ParamId::Frequency),
            1 => Some(ParamId::Gain),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn spec(self) -> &'static ParamSpec {
        match self {
            ParamId::Frequency => &FREQUENCY,
            ParamId::Gain => &GAIN,
        }
    }
}

/// A numeric range with a step size and a skew curve.
///
/// A skew below 1 spends more of the normalized range on the low end, which suits perceptual
/// quantities like frequency.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParamRange {
    pub min: f32,
    pub max: f32,
    pub step: f32,
    pub skew: f32,
}

impl ParamRange {
    /// Maps a normalized position onto the range, snapping to the nearest step.
    pub fn from_normalized(&self, normalized: f32) -> f32 {
        let normalized = normalized.max(0.).min(1.);
        let proportion = if self.skew != 1. && normalized > 0. {
            (normalized.ln() / self.skew).exp()
        } else {
            normalized
        };
        self.snap(self.min + (self.max - self.min) * proportion)
    }

    /// Maps a plain value back to its normalized position.
    pub fn to_normalized(&self, value: f32) -> f32 {
        let proportion = ((value - self.min) / (self.max - self.min)).max(0.).min(1.);
        if self.skew != 1. {
            proportion.powf(self.skew)
        } else {
            proportion
        }
    }

    /// Rounds `value` to the nearest legal step and clamps it into the range.
    pub fn snap(&self, value: f32) -> f32 {
        let value = if self.step > 0. {
            self.min + self.step * ((value - self.min) / self.step).round()
        } else {
            value
        };
        value.max(self.min).min(self.max)
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Everything the host needs to know to present and automate a parameter.
#[derive(Debug)]
pub struct ParamSpec {
    /// Stable identifier, also used as the key in preset data.
    pub id: &'static str,
    pub name: &'static str,
    /// Unit label displayed next to the value.
    pub label: &'static str,
    pub range: ParamRange,
    pub default: f32,
    /// Number of decimal places used when displaying the value.
    pub precision: usize,
}

impl ParamSpec {
    pub fn display(&self, value: f32) -> String {
        format!("{:.*}", self.precision, value)
    }
}

pub static FREQUENCY: ParamSpec = ParamSpec {
    id: "frequency",
    name: "Frequency",
    label: "Hz",
    range: ParamRange {
        min: 20.,
        max: 2000.,
        step: 1.,
        skew: 0.3,
    },
    default: 220.,
    precision: 0,
};

pub static GAIN: ParamSpec = ParamSpec {
    id: "gain",
    name: "Gain",
    label: "",
    range: ParamRange {
        min: 0.,
        max: 1.,
        step: 0.01,
        skew: 1.,
    },
    default: 0.01,
    precision: 2,
};

/// A single `f32` that can be shared across threads without locking.
///
/// Each parameter has exactly one logical writer at a time and the audio thread only needs the
/// latest value, so relaxed ordering is sufficient. The value is stored as its raw bits in a
/// word-sized atomic and can never be observed half-written.
#[derive(Debug)]
pub struct AtomicParam(AtomicU32);

impl AtomicParam {
    pub fn new(value: f32) -> Self {
        Self(AtomicU32::new(value.to_bits()))
    }

    pub fn load(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }

    pub fn store(&self, value: f32) {
        self.0.store(value.to_bits(), Ordering::Relaxed)
    }
}

/// Plain parameter values as read by the audio thread at the start of a processing call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParamSnapshot {
    /// Oscillator frequency in Hz.
    pub frequency: f32,
    /// Linear output gain.
    pub gain: f32,
}

impl Default for ParamSnapshot {
    fn default() -> Self {
        Self {
            frequency: FREQUENCY.default,
            gain: GAIN.default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_endpoints_map_exactly() {
        for id in ParamId::ALL.iter() {
            let range = id.spec().range;
            assert_eq!(range.from_normalized(0.), range.min);
            assert_eq!(range.from_normalized(1.), range.max);
            assert_eq!(range.to_normalized(range.min), 0.);
            assert_eq!(range.to_normalized(range.max), 1.);
        }
    }

    #[test]
    fn frequency_is_skewed_towards_low_values() {
        // Halfway along the knob should be well below the arithmetic midpoint.
        let halfway = FREQUENCY.range.from_normalized(0.5);
        assert!(halfway < 500., "halfway was {}", halfway);
        assert!(halfway > FREQUENCY.range.min);
    }

    #[test]
    fn normalized_conversion_round_trips_on_steps() {
        let range = FREQUENCY.range;
        for &hz in [20., 55., 220., 440., 1000., 2000.].iter() {
            assert_eq!(range.from_normalized(range.to_normalized(hz)), hz);
        }
        let range = GAIN.range;
        for &gain in [0., 0.01, 0.25, 0.5, 1.].iter() {
            let back = range.from_normalized(range.to_normalized(gain));
            assert!((back - gain).abs() < 1e-6, "{} came back as {}", gain, back);
        }
    }

    #[test]
    fn snapping_rounds_to_step_and_clamps() {
        assert_eq!(FREQUENCY.range.snap(220.4), 220.);
        assert_eq!(FREQUENCY.range.snap(220.6), 221.);
        assert_eq!(FREQUENCY.range.snap(5.), 20.);
        assert_eq!(FREQUENCY.range.snap(5000.), 2000.);
        assert!((GAIN.range.snap(0.123) - 0.12).abs() < 1e-6);
        assert_eq!(GAIN.range.snap(-1.), 0.);
    }

    #[test]
    fn out_of_range_normalized_values_are_clamped() {
        assert_eq!(GAIN.range.from_normalized(-0.5), 0.);
        assert_eq!(GAIN.range.from_normalized(1.5), 1.);
    }

    #[test]
    fn defaults_are_legal_values() {
        for id in ParamId::ALL.iter() {
            let spec = id.spec();
            assert!(spec.range.contains(spec.default));
            assert_eq!(spec.range.snap(spec.default), spec.default);
        }
    }

    #[test]
    fn indices_match_declaration_order() {
        for (i, id) in ParamId::ALL.iter().enumerate() {
            assert_eq!(id.index(), i);
            assert_eq!(ParamId::from_index(i as i32), Some(*id));
        }
        assert_eq!(ParamId::from_index(2), None);
        assert_eq!(ParamId::from_index(-1), None);
    }

    #[test]
    fn atomic_param_returns_last_write() {
        let param = AtomicParam::new(GAIN.default);
        assert_eq!(param.load(), 0.01);
        param.store(0.5);
        param.store(0.75);
        assert_eq!(param.load(), 0.75);
    }

    #[test]
    fn display_uses_parameter_precision() {
        assert_eq!(FREQUENCY.display(220.), "220");
        assert_eq!(GAIN.display(0.01), "0.01");
    }
}
