//! Scripted input injection for tests

use std::collections::HashMap;

use super::parser::FrameInput;
use crate::session::ShotInput;

/// Inputs to apply, keyed by frame
#[derive(Debug, Default)]
pub struct ScriptedInputs {
    pub frames: HashMap<u64, Vec<ShotInput>>,
    /// Last frame with any input
    pub max_frame: u64,
}

impl ScriptedInputs {
    /// Create from parsed frame inputs. Unknown action names are an error.
    pub fn from_inputs(inputs: &[FrameInput]) -> Result<Self, String> {
        let mut scripted = Self::default();
        for frame_input in inputs {
            let entry = scripted.frames.entry(frame_input.frame).or_default();
            for action in &frame_input.actions {
                let input = ShotInput::from_name(action).ok_or_else(|| {
                    format!("Unknown action '{}' at frame {}", action, frame_input.frame)
                })?;
                entry.push(input);
            }
            scripted.max_frame = scripted.max_frame.max(frame_input.frame);
        }
        Ok(scripted)
    }

    /// Make sure the run reaches at least `frame`
    pub fn set_max_frame(&mut self, frame: u64) {
        self.max_frame = self.max_frame.max(frame);
    }

    pub fn inputs_for(&self, frame: u64) -> &[ShotInput] {
        self.frames.get(&frame).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_actions_per_frame() {
        let inputs = vec![
            FrameInput {
                frame: 3,
                actions: vec!["power_up".into(), "shoot".into()],
            },
            FrameInput {
                frame: 9,
                actions: vec!["reset".into()],
            },
        ];
        let scripted = ScriptedInputs::from_inputs(&inputs).unwrap();
        assert_eq!(scripted.max_frame, 9);
        assert_eq!(
            scripted.inputs_for(3),
            &[ShotInput::IncreasePower, ShotInput::Shoot]
        );
        assert!(scripted.inputs_for(4).is_empty());
    }

    #[test]
    fn test_unknown_action() {
        let inputs = vec![FrameInput {
            frame: 1,
            actions: vec!["dunk".into()],
        }];
        let err = ScriptedInputs::from_inputs(&inputs).unwrap_err();
        assert!(err.contains("dunk"));
    }
}
