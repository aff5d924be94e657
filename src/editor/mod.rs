//! In VST terminology, the editor is a graphical window that can be used to display and interact
//! with a plugin using a custom visual appearance.
//!
//! The editor interface runs fully on the UI thread. It manages an OS window through a
//! cross-platform API exposed by the `vst_window` crate. It displays the state of the plugin's two
//! knobs graphically and writes knob movements straight into the shared plugin state. Changes
//! made by the host (automation, generic parameter views) are picked up by re-reading that state
//! on every idle tick.

use std::sync::Arc;

use vst::editor::Editor;
use vst_window::setup;

use crate::params::ParamId;
use crate::plugin_state::PluginState;

mod interface;
use interface::{EditorInterface, InterfaceState, SIZE_X, SIZE_Y};

/// Persistent VST-compatible wrapper that opens and closes an `EditorInterface`.
pub(super) struct PluginEditor {
    opened_interface: Option<EditorInterface>,
    remote_state: Arc<PluginState>,
}

impl PluginEditor {
    pub fn new(remote_state: Arc<PluginState>) -> Self {
        Self {
            opened_interface: None,
            remote_state,
        }
    }
}

/// `PluginEditor` responds directly to VST API calls specific to the UI thread.
impl Editor for PluginEditor {
    fn size(&self) -> (i32, i32) {
        (SIZE_X as i32, SIZE_Y as i32)
    }

    fn position(&self) -> (i32, i32) {
        (0, 0)
    }

    fn open(&mut self, parent: *mut core::ffi::c_void) -> bool {
        if self.opened_interface.is_some() {
            return false;
        }

        let (window, event_source) = setup(parent, (SIZE_X as i32, SIZE_Y as i32));
        let initial_state = InterfaceState::from_remote(&*self.remote_state);
        match EditorInterface::new(window, event_source, initial_state) {
            Ok(interface) => {
                tracing::debug!("editor opened");
                self.opened_interface = Some(interface);
                true
            }
            Err(e) => {
                tracing::error!("failed to open editor: {}", e);
                false
            }
        }
    }

    fn close(&mut self) {
        if self.opened_interface.take().is_some() {
            tracing::debug!("editor closed");
        }
    }

    fn is_open(&mut self) -> bool {
        self.opened_interface.is_some()
    }

    fn idle(&mut self) {
        if let Some(opened_interface) = &mut self.opened_interface {
            opened_interface.run_tasks(&*self.remote_state);
        }
    }
}

/// The editor interface holds a handle directly to the remote VST plugin state, which should
/// implement this trait. Knob positions are exchanged as fractions of their full range between 0
/// and 1.
pub(super) trait EditorRemoteState {
    /// Current position of the knob controlling `id`.
    fn control(&self, id: ParamId) -> f32;
    /// Moves the knob controlling `id`. This updates the long-term state read by the audio
    /// thread, and notifies the host DAW so its own view of the parameter stays in sync.
    fn set_control(&self, id: ParamId, value: f32);
}
