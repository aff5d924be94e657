//! Parameters are kept as the single "source of truth" for the long-term state of the plugin. As
//! used by the VST API, the parameter bank is accessible by the host, the audio processing thread
//! and the UI thread at the same time.
//!
//! Each parameter's plain value lives in its own word-sized atomic. The audio thread copies both
//! values into a `ParamSnapshot` once per processing call; the host and the editor overwrite them
//! whenever a knob moves. There is no queue and no lock between the threads, and the latest write
//! always wins.

use vst::plugin::{HostCallback, PluginParameters};

use crate::params::{AtomicParam, ParamId, ParamSnapshot};
use crate::preset::PresetData;

pub struct PluginState {
    /// Absent when the plugin was constructed without a host, as with `Default`.
    #[cfg_attr(not(feature = "editor"), allow(dead_code))]
    host: Option<HostCallback>,
    values: [AtomicParam; 2],
}

/// VST-accessible long-term plugin state storage. This is accessed through the audio processing
/// thread and the UI thread, so all fields are thread-safe.
impl PluginState {
    pub fn new(host: Option<HostCallback>) -> Self {
        Self {
            host,
            values: [
                AtomicParam::new(ParamId::Frequency.spec().default),
                AtomicParam::new(ParamId::Gain.spec().default),
            ],
        }
    }

    /// Plain value of a parameter.
    pub fn value(&self, id: ParamId) -> f32 {
        self.values[id.index()].load()
    }

    /// Stores a plain value, snapping it onto the parameter's range first.
    pub fn set_value(&self, id: ParamId, value: f32) {
        self.values[id.index()].store(id.spec().range.snap(value));
    }

    pub fn normalized(&self, id: ParamId) -> f32 {
        id.spec().range.to_normalized(self.value(id))
    }

    pub fn set_normalized(&self, id: ParamId, normalized: f32) {
        self.set_value(id, id.spec().range.from_normalized(normalized));
    }

    /// Reads the latest value of every parameter. Called by the audio thread at the start of each
    /// processing call.
    pub fn snapshot(&self) -> ParamSnapshot {
        ParamSnapshot {
            frequency: self.value(ParamId::Frequency),
            gain: self.value(ParamId::Gain),
        }
    }

    fn restore(&self, preset: &PresetData) {
        let snapshot = preset.to_snapshot();
        self.set_value(ParamId::Frequency, snapshot.frequency);
        self.set_value(ParamId::Gain, snapshot.gain);
        tracing::debug!(?snapshot, "restored preset");
    }

    fn save_chunk(&self) -> Vec<u8> {
        match PresetData::from_snapshot(self.snapshot()).to_bytes() {
            Ok(data) => data,
            Err(e) => {
                tracing::error!("failed to serialize preset: {}", e);
                Vec::new()
            }
        }
    }

    fn load_chunk(&self, data: &[u8]) {
        match PresetData::from_bytes(data) {
            Ok(preset) => self.restore(&preset),
            Err(e) => tracing::warn!(len = data.len(), "ignoring preset chunk: {}", e),
        }
    }
}

/// The DAW directly accesses the plugin state through the VST API to get reports on knob states.
impl PluginParameters for PluginState {
    fn set_parameter(&self, index: i32, value: f32) {
        if let Some(id) = ParamId::from_index(index) {
            self.set_normalized(id, value);
        }
    }

    fn get_parameter(&self, index: i32) -> f32 {
        ParamId::from_index(index)
            .map(|id| self.normalized(id))
            .unwrap_or(0.)
    }

    fn get_parameter_label(&self, index: i32) -> String {
        ParamId::from_index(index)
            .map(|id| id.spec().label.to_string())
            .unwrap_or_default()
    }

    fn get_parameter_text(&self, index: i32) -> String {
        ParamId::from_index(index)
            .map(|id| id.spec().display(self.value(id)))
            .unwrap_or_default()
    }

    fn get_parameter_name(&self, index: i32) -> String {
        ParamId::from_index(index)
            .map(|id| id.spec().name.to_string())
            .unwrap_or_default()
    }

    fn can_be_automated(&self, index: i32) -> bool {
        ParamId::from_index(index).is_some()
    }

    /// Accepts plain values typed by the user, e.g. `440` for the frequency.
    fn string_to_parameter(&self, index: i32, text: String) -> bool {
        let id = match ParamId::from_index(index) {
            Some(id) => id,
            None => return false,
        };
        match text.trim().parse::<f32>() {
            Ok(value) if id.spec().range.contains(value) => {
                self.set_value(id, value);
                true
            }
            _ => {
                tracing::debug!(index, %text, "rejected parameter text");
                false
            }
        }
    }

    fn get_preset_name(&self, _preset: i32) -> String {
        "Default".to_string()
    }

    fn get_preset_data(&self) -> Vec<u8> {
        self.save_chunk()
    }

    fn get_bank_data(&self) -> Vec<u8> {
        self.save_chunk()
    }

    fn load_preset_data(&self, data: &[u8]) {
        self.load_chunk(data)
    }

    fn load_bank_data(&self, data: &[u8]) {
        self.load_chunk(data)
    }
}

/// The editor interface also directly accesses the plugin state through its own API.
#[cfg(feature = "editor")]
impl crate::editor::EditorRemoteState for PluginState {
    fn control(&self, id: ParamId) -> f32 {
        self.normalized(id)
    }

    fn set_control(&self, id: ParamId, value: f32) {
        use vst::host::Host;

        self.set_normalized(id, value);

        if let Some(host) = &self.host {
            host.automate(id.index() as i32, self.normalized(id));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{FREQUENCY, GAIN};

    #[test]
    fn starts_at_declared_defaults() {
        let state = PluginState::new(None);
        assert_eq!(state.snapshot(), ParamSnapshot::default());
        assert_eq!(state.get_parameter_text(0), "220");
        assert_eq!(state.get_parameter_text(1), "0.01");
    }

    #[test]
    fn host_writes_are_visible_in_the_next_snapshot() {
        let state = PluginState::new(None);
        state.set_parameter(0, 1.);
        state.set_parameter(1, 0.5);
        assert_eq!(
            state.snapshot(),
            ParamSnapshot {
                frequency: 2000.,
                gain: 0.5
            }
        );

        state.set_parameter(1, 0.);
        assert_eq!(state.snapshot().gain, 0.);
    }

    #[test]
    fn get_parameter_reports_normalized_values() {
        let state = PluginState::new(None);
        state.set_parameter(0, 0.);
        assert_eq!(state.get_parameter(0), 0.);
        state.set_parameter(1, 0.75);
        assert!((state.get_parameter(1) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn names_and_labels() {
        let state = PluginState::new(None);
        assert_eq!(state.get_parameter_name(0), "Frequency");
        assert_eq!(state.get_parameter_name(1), "Gain");
        assert_eq!(state.get_parameter_label(0), "Hz");
        assert_eq!(state.get_parameter_label(1), "");
        assert!(state.can_be_automated(1));
    }

    #[test]
    fn unknown_indices_are_ignored() {
        let state = PluginState::new(None);
        state.set_parameter(5, 0.3);
        assert_eq!(state.get_parameter(5), 0.);
        assert_eq!(state.get_parameter_name(5), "");
        assert!(!state.can_be_automated(-1));
        assert!(!state.string_to_parameter(9, "1".to_string()));
        assert_eq!(state.snapshot(), ParamSnapshot::default());
    }

    #[test]
    fn text_entry_accepts_plain_values_in_range() {
        let state = PluginState::new(None);
        assert!(state.string_to_parameter(0, " 440 ".to_string()));
        assert_eq!(state.value(ParamId::Frequency), 440.);

        assert!(!state.string_to_parameter(0, "5".to_string()));
        assert!(!state.string_to_parameter(1, "loud".to_string()));
        assert!(!state.string_to_parameter(1, "1.5".to_string()));
        assert_eq!(state.value(ParamId::Gain), GAIN.default);
    }

    #[test]
    fn preset_chunks_round_trip() {
        let source = PluginState::new(None);
        source.set_value(ParamId::Frequency, 987.);
        source.set_value(ParamId::Gain, 0.42);
        let chunk = source.get_preset_data();

        let target = PluginState::new(None);
        target.load_preset_data(&chunk);
        assert_eq!(target.snapshot(), source.snapshot());
        assert_eq!(target.get_preset_data(), chunk);
        assert_eq!(target.get_bank_data(), chunk);
    }

    #[test]
    fn malformed_chunks_leave_state_untouched() {
        let state = PluginState::new(None);
        state.set_value(ParamId::Frequency, 300.);
        state.load_bank_data(b"not json");
        assert_eq!(state.value(ParamId::Frequency), 300.);
    }

    #[test]
    fn stored_values_are_snapped() {
        let state = PluginState::new(None);
        state.set_value(ParamId::Frequency, 440.6);
        assert_eq!(state.value(ParamId::Frequency), 441.);
        state.set_value(ParamId::Frequency, 1.);
        assert_eq!(state.value(ParamId::Frequency), FREQUENCY.range.min);
    }

    #[test]
    fn writes_from_another_thread_are_observed() {
        use std::sync::Arc;

        let state = Arc::new(PluginState::new(None));
        let writer = Arc::clone(&state);
        std::thread::spawn(move || {
            for i in 0..=100 {
                writer.set_parameter(1, i as f32 / 100.);
            }
        })
        .join()
        .unwrap();

        assert_eq!(state.snapshot().gain, 1.);
    }
}
