//! Polled input snapshot for one frame

use std::collections::{HashMap, HashSet};

use glam::Vec2;

use crate::ports::{Action, InputAxis, InputSource};

/// Actions pressed this frame plus current axis values.
/// Actions are edge-triggered and cleared with `end_frame`; axes persist.
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    pressed: HashSet<Action>,
    axes: HashMap<InputAxis, f32>,
    cursor: Vec2,
}

impl FrameInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, action: Action) {
        self.pressed.insert(action);
    }

    pub fn set_axis(&mut self, axis: InputAxis, value: f32) {
        if value == 0.0 {
            self.axes.remove(&axis);
        } else {
            self.axes.insert(axis, value);
        }
    }

    pub fn set_cursor(&mut self, cursor: Vec2) {
        self.cursor = cursor;
    }

    /// Release all analog inputs.
    pub fn clear_axes(&mut self) {
        self.axes.clear();
    }

    /// Forget this frame's button presses.
    pub fn end_frame(&mut self) {
        self.pressed.clear();
    }
}

impl InputSource for FrameInput {
    fn pressed(&self, action: Action) -> bool {
        self.pressed.contains(&action)
    }

    fn axis(&self, axis: InputAxis) -> f32 {
        self.axes.get(&axis).copied().unwrap_or(0.0)
    }

    fn cursor(&self) -> Vec2 {
        self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presses_are_edge_triggered() {
        let mut input = FrameInput::new();
        input.press(Action::Carry);
        assert!(input.pressed(Action::Carry));
        assert!(!input.pressed(Action::Drop));
        input.end_frame();
        assert!(!input.pressed(Action::Carry));
    }

    #[test]
    fn test_axes_persist_across_frames() {
        let mut input = FrameInput::new();
        input.set_axis(InputAxis::Nudge, 0.5);
        input.end_frame();
        assert_eq!(input.axis(InputAxis::Nudge), 0.5);
        assert_eq!(input.axis(InputAxis::Scale), 0.0);
        input.set_axis(InputAxis::Nudge, 0.0);
        assert_eq!(input.axis(InputAxis::Nudge), 0.0);
    }
}
