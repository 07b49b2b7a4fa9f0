//! Input module - ShotInputQueue resource and capture_input system

use bevy::prelude::*;

use crate::session::ShotInput;

/// Inputs captured since the last fixed tick, oldest first
#[derive(Resource, Default, Debug)]
pub struct ShotInputQueue {
    pending: Vec<ShotInput>,
}

impl ShotInputQueue {
    pub fn push(&mut self, input: ShotInput) {
        self.pending.push(input);
    }

    /// Take everything queued so far
    pub fn drain(&mut self) -> Vec<ShotInput> {
        std::mem::take(&mut self.pending)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Keyboard bindings: arrows move, W/S power, Space shoot, R reset
const KEY_BINDINGS: &[(KeyCode, ShotInput)] = &[
    (KeyCode::ArrowLeft, ShotInput::MoveLeft),
    (KeyCode::ArrowRight, ShotInput::MoveRight),
    (KeyCode::ArrowUp, ShotInput::MoveForward),
    (KeyCode::ArrowDown, ShotInput::MoveBack),
    (KeyCode::KeyW, ShotInput::IncreasePower),
    (KeyCode::KeyS, ShotInput::DecreasePower),
    (KeyCode::Space, ShotInput::Shoot),
    (KeyCode::KeyR, ShotInput::Reset),
];

/// Gamepad bindings mirror the keyboard: d-pad moves, shoulders power
const PAD_BINDINGS: &[(GamepadButton, ShotInput)] = &[
    (GamepadButton::DPadLeft, ShotInput::MoveLeft),
    (GamepadButton::DPadRight, ShotInput::MoveRight),
    (GamepadButton::DPadUp, ShotInput::MoveForward),
    (GamepadButton::DPadDown, ShotInput::MoveBack),
    (GamepadButton::RightTrigger, ShotInput::IncreasePower),
    (GamepadButton::LeftTrigger, ShotInput::DecreasePower),
    (GamepadButton::South, ShotInput::Shoot),
    (GamepadButton::North, ShotInput::Reset),
];

/// Runs in Update so presses between fixed ticks are not lost.
/// Queued inputs are applied at the start of the next FixedUpdate.
pub fn capture_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    gamepads: Query<&Gamepad>,
    mut queue: ResMut<ShotInputQueue>,
) {
    for (key, input) in KEY_BINDINGS {
        if keyboard.just_pressed(*key) {
            queue.push(*input);
        }
    }
    for gamepad in &gamepads {
        for (button, input) in PAD_BINDINGS {
            if gamepad.just_pressed(*button) {
                queue.push(*input);
            }
        }
    }
}
