//! All the logic behind the editor UI is contained within this module.
//!
//! Fundamentally, the UI is split into graphics rendering and state management in response to
//! input events, both of which are managed within the `EditorInterface` type.

use vst_window::{EditorWindow, EventSource};

use crate::error::Error;
use crate::params::ParamId;

mod graphics;
mod state;

use super::EditorRemoteState;
pub(super) use state::InterfaceState;

/// Pixel width of the editor window.
pub(super) const SIZE_X: usize = 400;
/// Pixel height of the editor window.
pub(super) const SIZE_Y: usize = 300;

/// Placement of a rotary knob within the window, in pixels from the top-left corner.
#[derive(Clone, Copy, Debug)]
pub(in crate::editor) struct KnobLayout {
    pub param: ParamId,
    pub center_x: isize,
    pub center_y: isize,
    pub radius: isize,
}

impl KnobLayout {
    pub fn contains(&self, (x, y): (isize, isize)) -> bool {
        (x - self.center_x).pow(2) + (y - self.center_y).pow(2) < self.radius.pow(2)
    }
}

/// Frequency on the left, gain on the right. Each knob occupies a 100 pixel square.
pub(in crate::editor) static KNOBS: [KnobLayout; 2] = [
    KnobLayout {
        param: ParamId::Frequency,
        center_x: 100,
        center_y: 100,
        radius: 50,
    },
    KnobLayout {
        param: ParamId::Gain,
        center_x: 250,
        center_y: 100,
        radius: 50,
    },
];

/// Represents a window containing an editor interface. A new one is used each time the parent
/// window provided by the host DAW is opened or closed.
pub(super) struct EditorInterface {
    renderer: graphics::Renderer,
    event_source: EventSource,
    state: InterfaceState,
}

impl EditorInterface {
    /// Setup the `EditorInterface` within the provided parent `EditorWindow` to respond to events
    /// from the corresponding `EventSource`.
    pub fn new(
        window: EditorWindow,
        event_source: EventSource,
        initial_state: InterfaceState,
    ) -> Result<Self, Error> {
        let renderer = graphics::Renderer::new(window)?;

        Ok(Self {
            renderer,
            event_source,
            state: initial_state,
        })
    }

    /// Run as much as possible of the editor interface without blocking. This means picking up
    /// any parameter changes made elsewhere, responding to any new window input events, and then
    /// rendering the new state of the UI.
    pub fn run_tasks<S: EditorRemoteState>(&mut self, remote_state: &S) {
        self.state.sync_from_remote(remote_state);

        while let Some(event) = self.event_source.poll_event() {
            self.state.react_to_window_event(event, remote_state);
        }

        self.renderer.draw_frame(&self.state);
    }
}
