//! The editor interface is scheduled to be drawn periodically by the host DAW. Some state must be
//! kept to maintain a consistent appearance across frames. This module contains the
//! `InterfaceState` struct along with logic to update it in response to window events like clicks,
//! drags, etc. as well as from external state updates.

use vst_window::{MouseButton, WindowEvent};

use super::{EditorRemoteState, KnobLayout, KNOBS, SIZE_X, SIZE_Y};
use crate::params::ParamId;

/// All the possible ways a click+drag operation on the interface window might be interpreted.
#[derive(Clone, Copy, Debug, PartialEq)]
enum DragBehavior {
    TurnKnob {
        knob: usize,
        click_y: isize,
        original_value: f32,
    },
}

/// Dragging across the full height of the window moves a knob through this fraction of its range.
const KNOB_CHANGE_SPEED: f32 = 0.5;

/// Holds any state required to render and update the editor interface.
pub(in crate::editor) struct InterfaceState {
    /// Position of each knob in `KNOBS`, from 0 to 1.
    pub knob_values: [f32; 2],
    /// (X, Y) pixel coordinate of the cursor, from the top-left corner.
    /// Coordinates could be negative if the cursor is dragged outside of the window!
    cursor_pos: (isize, isize),
    drag_behavior: Option<DragBehavior>,
}

impl InterfaceState {
    pub fn new(knob_values: [f32; 2]) -> Self {
        Self {
            knob_values,
            cursor_pos: Default::default(),
            drag_behavior: None,
        }
    }

    pub fn from_remote<S: EditorRemoteState>(remote_state: &S) -> Self {
        let mut state = Self::new([0.; 2]);
        state.sync_from_remote(remote_state);
        state
    }

    pub fn knobs(&self) -> impl Iterator<Item = (&'static KnobLayout, f32)> + '_ {
        KNOBS.iter().zip(self.knob_values.iter().copied())
    }

    /// Picks up parameter changes made by the host. The knob being dragged keeps the position set
    /// by the cursor.
    pub fn sync_from_remote<S: EditorRemoteState>(&mut self, remote_state: &S) {
        let dragged = self.dragged_knob();
        for (i, layout) in KNOBS.iter().enumerate() {
            if Some(i) != dragged {
                self.knob_values[i] = remote_state.control(layout.param);
            }
        }
    }

    /// Update the editor state and remote state store as necessary in response to an interaction
    /// with the editor window.
    pub fn react_to_window_event<S: EditorRemoteState>(
        &mut self,
        event: WindowEvent,
        remote_state: &S,
    ) {
        match event {
            WindowEvent::CursorMovement(x, y) => {
                self.cursor_pos = ((x * SIZE_X as f32) as isize, (y * SIZE_Y as f32) as isize);
                if let Some(DragBehavior::TurnKnob {
                    knob,
                    click_y,
                    original_value,
                }) = self.drag_behavior
                {
                    let diff_y = click_y - self.cursor_pos.1;
                    let value = (original_value
                        + diff_y as f32 / SIZE_Y as f32 * KNOB_CHANGE_SPEED)
                        .max(0.)
                        .min(1.);
                    self.knob_values[knob] = value;
                    remote_state.set_control(KNOBS[knob].param, value);
                }
            }
            WindowEvent::MouseClick(button) => {
                let knob = match KNOBS.iter().position(|k| k.contains(self.cursor_pos)) {
                    Some(knob) => knob,
                    None => return,
                };
                if button == MouseButton::Left {
                    self.drag_behavior = Some(DragBehavior::TurnKnob {
                        knob,
                        click_y: self.cursor_pos.1,
                        original_value: self.knob_values[knob],
                    });
                } else if button == MouseButton::Right {
                    let param = KNOBS[knob].param;
                    let spec = param.spec();
                    self.knob_values[knob] = spec.range.to_normalized(spec.default);
                    remote_state.set_control(param, self.knob_values[knob]);
                }
            }
            WindowEvent::MouseRelease(MouseButton::Left) => {
                self.drag_behavior = None;
            }
            _ => (),
        }
    }

    fn dragged_knob(&self) -> Option<usize> {
        match self.drag_behavior {
            Some(DragBehavior::TurnKnob { knob, .. }) => Some(knob),
            None => None,
        }
    }

    pub fn is_dragging(&self, param: ParamId) -> bool {
        self.dragged_knob().map(|knob| KNOBS[knob].param) == Some(param)
    }
}
