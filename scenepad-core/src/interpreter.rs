//! Action interpreter
//!
//! Runs a binding's action sequence against the output capabilities. The
//! interpreter holds no state of its own: the dispatch loop remembers which
//! sequence each key pressed and hands the same sequence back on release.

use crate::scene::{Action, KeyStep, MouseGesture};
use crate::traits::{Board, ConsumerControl, Keyboard, OutputError};

/// Scene switching as seen from inside an action sequence
pub trait SceneSwitch<B: ?Sized> {
    /// Make `id` the active scene and render it onto `board`
    ///
    /// Returns `Ok(false)` when no scene has that id; the active scene is
    /// then left unchanged.
    fn switch_scene(&mut self, id: &str, board: &mut B) -> Result<bool, OutputError>;
}

/// Press pass: execute every action in order
///
/// Delays and tones block the caller for their full duration. Output errors
/// abort the pass and propagate.
pub fn run_press<B, S>(actions: &[Action], board: &mut B, scenes: &mut S) -> Result<(), OutputError>
where
    B: Board + ?Sized,
    S: SceneSwitch<B> + ?Sized,
{
    for action in actions {
        match action {
            Action::SwitchScene(dest) => {
                // The rest of this sequence keeps running after the switch,
                // against a pad that now shows the destination scene.
                if !scenes.switch_scene(dest, board)? {
                    warn!("Unknown scene '{}', ignoring", dest.as_str());
                }
            }
            Action::PressKeys(steps) => press_steps(steps, board)?,
            Action::Consumer(usage) => board.consumer_send(*usage)?,
            Action::Mouse(gesture) => mouse_gesture(gesture, board)?,
            Action::Tone { frequency, ms } => {
                board.start_tone(*frequency)?;
                board.delay_ms(*ms);
                board.stop_tone()?;
            }
        }
    }
    Ok(())
}

/// Release pass: undo the keys a press pass left held
///
/// Only key-down steps of `PressKeys` actions are reversed. Key-up steps,
/// text, delays and scene switches are not. A single consumer release
/// always follows, whatever the sequence contained.
pub fn run_release<B>(actions: &[Action], board: &mut B) -> Result<(), OutputError>
where
    B: Keyboard + ConsumerControl + ?Sized,
{
    for action in actions {
        if let Action::PressKeys(steps) = action {
            for step in steps {
                if let KeyStep::Down(code) = step {
                    board.key_up(*code)?;
                }
            }
        }
    }
    board.consumer_release()
}

fn press_steps<B: Board + ?Sized>(steps: &[KeyStep], board: &mut B) -> Result<(), OutputError> {
    for step in steps {
        match step {
            KeyStep::Down(code) => board.key_down(*code)?,
            KeyStep::Up(code) => board.key_up(*code)?,
            KeyStep::Delay { ms } => {
                trace!("Delay {} ms", ms);
                board.delay_ms(*ms);
            }
            KeyStep::Type(text) => board.type_text(text)?,
        }
    }
    Ok(())
}

fn mouse_gesture<B: Board + ?Sized>(gesture: &MouseGesture, board: &mut B) -> Result<(), OutputError> {
    if gesture.buttons != 0 {
        board.mouse_press(gesture.buttons)?;
    }
    if gesture.x != 0 || gesture.y != 0 || gesture.wheel != 0 {
        board.mouse_move(gesture.x, gesture.y, gesture.wheel)?;
    }
    if gesture.buttons != 0 {
        board.mouse_release(gesture.buttons)?;
    }
    Ok(())
}
