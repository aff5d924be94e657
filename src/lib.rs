//! trisynth is a minimal VST2 instrument: a single triangle-wave oscillator followed by a linear
//! gain stage.
//!
//! Two host-automatable parameters control the sound, frequency (20 Hz to 2 kHz) and gain (0 to
//! 1). With the default `editor` feature enabled, the plugin also provides a custom editor UI with
//! a rotary knob for each parameter.
//!
//! Parameter values are shared between the host, the editor and the audio thread through one
//! atomic per parameter. The audio thread reads both once at the start of every processing call,
//! so it never locks, allocates or waits on another thread.

use std::sync::Arc;

use once_cell::sync::Lazy;
use vst::{
    api::Supported,
    buffer::AudioBuffer,
    plugin::{CanDo, Category, HostCallback, Info, Plugin, PluginParameters},
};

pub mod config;
pub mod dsp;
pub mod error;
mod logging;
pub mod params;
pub mod plugin_state;
pub mod preset;

#[cfg(feature = "editor")]
mod editor;
#[cfg(feature = "editor")]
use editor::PluginEditor;

use config::Config;
use dsp::PluginDsp;
use plugin_state::PluginState;

/// Top level wrapper that exposes a full `vst::Plugin` implementation.
pub struct TriSynthVst {
    /// The `PluginDsp` handles all of the plugin's audio processing, and is only accessed from the
    /// audio processing thread.
    dsp: PluginDsp,

    /// The `PluginState` holds the long-term state of the plugin. It is shared on the audio
    /// processing thread, the UI thread and with the host, and updated using lock-free atomics.
    state_handle: Arc<PluginState>,

    /// The `PluginEditor` implements the plugin's custom editor interface. It's temporarily stored
    /// here until being moved to the UI thread by the first `get_editor` method call.
    #[cfg(feature = "editor")]
    editor_placeholder: Option<PluginEditor>,
}

impl TriSynthVst {
    /// Initializes the VST plugin, along with an optional `HostCallback` handle.
    fn new_maybe_host(maybe_host: Option<HostCallback>) -> Self {
        logging::init(&Config::from_env());

        let state_handle = Arc::new(PluginState::new(maybe_host));

        Self {
            dsp: PluginDsp::default(),
            #[cfg(feature = "editor")]
            editor_placeholder: Some(PluginEditor::new(Arc::clone(&state_handle))),
            state_handle,
        }
    }

    /// Runs the signal chain over raw output channels, exactly as `process` does for a host
    /// buffer.
    pub fn process_channels<'a, I>(&mut self, channels: I)
    where
        I: IntoIterator<Item = &'a mut [f32]>,
    {
        let snapshot = self.state_handle.snapshot();
        self.dsp.process(snapshot, channels);
    }
}

/// `vst::plugin_main` requires a `Default` implementation.
impl Default for TriSynthVst {
    fn default() -> Self {
        Self::new_maybe_host(None)
    }
}

/// Use a hash of a string describing this plugin to avoid unique ID conflicts.
const UNIQUE_ID_SEED: &str = "trisynth Triangle Oscillator VST2 Instrument";
static UNIQUE_ID: Lazy<i32> = Lazy::new(|| {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut s = DefaultHasher::new();
    UNIQUE_ID_SEED.hash(&mut s);
    s.finish() as i32
});

/// Main `vst` plugin implementation.
impl Plugin for TriSynthVst {
    fn new(host: HostCallback) -> Self {
        Self::new_maybe_host(Some(host))
    }

    fn get_info(&self) -> Info {
        Info {
            name: "trisynth".to_string(),
            vendor: "trisynth".to_string(),
            unique_id: *UNIQUE_ID,
            category: Category::Synth,
            inputs: 0,
            outputs: 2,
            parameters: params::ParamId::ALL.len() as i32,
            presets: 1,
            initial_delay: 0,
            preset_chunks: true,
            ..Info::default()
        }
    }

    fn set_sample_rate(&mut self, rate: f32) {
        tracing::info!(rate, "sample rate changed");
        self.dsp.set_sample_rate(rate);
    }

    /// Hosts call `resume` whenever the audio stream (re)starts.
    fn resume(&mut self) {
        tracing::debug!("stream resumed");
        self.dsp.reset();
    }

    fn process(&mut self, buffer: &mut AudioBuffer<f32>) {
        let (_, mut outputs) = buffer.split();
        self.process_channels(&mut outputs);
    }

    /// No MIDI or other host features are used.
    fn can_do(&self, _can_do: CanDo) -> Supported {
        Supported::No
    }

    fn get_tail_size(&self) -> isize {
        0
    }

    fn get_parameter_object(&mut self) -> Arc<dyn PluginParameters> {
        Arc::clone(&self.state_handle) as Arc<dyn PluginParameters>
    }

    #[cfg(feature = "editor")]
    fn get_editor(&mut self) -> Option<Box<dyn vst::editor::Editor>> {
        self.editor_placeholder
            .take()
            .map(|editor| Box::new(editor) as Box<dyn vst::editor::Editor>)
    }
}

vst::plugin_main!(TriSynthVst);
