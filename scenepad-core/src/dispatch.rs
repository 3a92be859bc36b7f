//! Dispatch loop
//!
//! Owns the only mutable state in the system: the active scene and, per
//! physical key, the action sequence that key's press ran. Each call to
//! [`DispatchLoop::poll`] handles at most one input event to completion.

use crate::interpreter::{self, SceneSwitch};
use crate::scene::{
    Action, Binding, Color, Scene, SceneRegistry, ENCODER_SLOT, KEY_COUNT, NO_SCENES_MESSAGE,
};
use crate::state::{Event, HaltReason, State};
use crate::traits::{Board, InputSource, KeyEvent, OutputError};

/// Outcome of one poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Poll {
    /// Nothing to do, or the event had no binding
    Idle,
    /// One event was dispatched
    Handled(KeyEvent),
    /// The loop is halted and did not look at input
    Halted,
}

/// Active-scene state, split out so the interpreter can switch scenes
/// while the loop still holds the board
struct ActiveScene<'r> {
    registry: &'r SceneRegistry,
    current: &'r Scene,
    home: &'r Scene,
}

impl<'r, B: Board + ?Sized> SceneSwitch<B> for ActiveScene<'r> {
    fn switch_scene(&mut self, id: &str, board: &mut B) -> Result<bool, OutputError> {
        let Some(scene) = self.registry.lookup(id) else {
            return Ok(false);
        };
        self.current = scene;
        scene.activate(board)?;
        Ok(true)
    }
}

/// The top-level controller
pub struct DispatchLoop<'r, B> {
    board: B,
    scenes: Option<ActiveScene<'r>>,
    /// Sequence each physical key ran on press, until its release
    held: [Option<&'r [Action]>; KEY_COUNT],
    last_encoder: bool,
    state: State,
}

impl<'r, B: Board> DispatchLoop<'r, B> {
    /// Render the home scene and get ready to poll
    ///
    /// With an empty registry the "no scenes" message is shown instead and
    /// the loop starts halted. The encoder level is sampled here so a button
    /// held during boot does not count as a press.
    pub fn start<I>(registry: &'r SceneRegistry, mut board: B, input: &mut I) -> Result<Self, OutputError>
    where
        I: InputSource + ?Sized,
    {
        let last_encoder = input.encoder_pressed();

        let (scenes, state) = match registry.home() {
            Some(home) => {
                info!("{} scenes loaded, starting in '{}'", registry.len(), home.name.as_str());
                home.activate(&mut board)?;
                let scenes = ActiveScene {
                    registry,
                    current: home,
                    home,
                };
                (Some(scenes), State::Idle)
            }
            None => {
                error!("No scenes loaded, halting");
                board.set_title(NO_SCENES_MESSAGE);
                board.refresh_display()?;
                (None, State::Idle.transition(Event::Fault(HaltReason::NoScenes)))
            }
        };

        Ok(Self {
            board,
            scenes,
            held: [None; KEY_COUNT],
            last_encoder,
            state,
        })
    }

    /// Poll input once and dispatch at most one event
    ///
    /// An output error halts the loop and is returned; every later poll
    /// reports [`Poll::Halted`].
    pub fn poll<I>(&mut self, input: &mut I) -> Result<Poll, OutputError>
    where
        I: InputSource + ?Sized,
    {
        if self.state.is_halted() {
            return Ok(Poll::Halted);
        }
        let Some(current) = self.active_scene() else {
            return Ok(Poll::Halted);
        };

        let Some(event) = self.next_event(current, input) else {
            return Ok(Poll::Idle);
        };

        let slot = usize::from(event.key);
        let Some(binding) = current.active_binding(slot) else {
            // Unbound in the scene that is active now, whatever was bound
            // when the key went down
            if !event.pressed {
                if let Some(held) = self.held.get_mut(slot) {
                    *held = None;
                }
            }
            trace!("No binding for slot {}", slot);
            return Ok(Poll::Idle);
        };

        self.state = self.state.transition(Event::InputReceived(event));
        match self.dispatch(event, binding) {
            Ok(()) => {
                self.state = self.state.transition(Event::DispatchComplete);
                Ok(Poll::Handled(event))
            }
            Err(e) => {
                error!("Output failure while dispatching {}: {}", event, e);
                self.state = self.state.transition(Event::Fault(HaltReason::Output(e)));
                Err(e)
            }
        }
    }

    /// Currently active scene, `None` when no scenes were loaded
    pub fn active_scene(&self) -> Option<&'r Scene> {
        self.scenes.as_ref().map(|s| s.current)
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_halted(&self) -> bool {
        self.state.is_halted()
    }

    pub fn board(&self) -> &B {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut B {
        &mut self.board
    }

    /// Encoder edges take priority over the key queue; only one of the two
    /// is consumed per poll.
    fn next_event<I>(&mut self, current: &Scene, input: &mut I) -> Option<KeyEvent>
    where
        I: InputSource + ?Sized,
    {
        let encoder = input.encoder_pressed();
        if encoder != self.last_encoder {
            self.last_encoder = encoder;
            if !current.has_encoder_binding() {
                return None;
            }
            return Some(KeyEvent {
                key: ENCODER_SLOT as u8,
                pressed: encoder,
            });
        }

        input
            .next_key_event()
            .filter(|e| usize::from(e.key) < KEY_COUNT)
    }

    fn dispatch(&mut self, event: KeyEvent, binding: &'r Binding) -> Result<(), OutputError> {
        let Some(scenes) = self.scenes.as_mut() else {
            return Ok(());
        };
        let slot = usize::from(event.key);

        match (event.pressed, slot) {
            (true, ENCODER_SLOT) => {
                // Hard-wired "go home"; the encoder binding's own actions
                // never run
                debug!("Encoder pressed, returning home");
                let home = scenes.home;
                scenes.current = home;
                home.activate(&mut self.board)
            }
            (true, _) => {
                debug!("Key {} pressed", slot);
                self.board.set_pixel(slot, Color::WHITE);
                self.board.show_pixels()?;

                self.held[slot] = Some(binding.actions.as_slice());
                interpreter::run_press(&binding.actions, &mut self.board, scenes)
            }
            (false, ENCODER_SLOT) => interpreter::run_release(&[], &mut self.board),
            (false, _) => {
                debug!("Key {} released", slot);
                let sequence = self.held[slot].take().unwrap_or(&[]);
                interpreter::run_release(sequence, &mut self.board)?;

                // Color from the scene active now, which may not be the one
                // that was active when the key went down
                let color = scenes
                    .current
                    .binding(slot)
                    .map_or(Color::OFF, |b| b.color);
                self.board.set_pixel(slot, color);
                self.board.show_pixels()
            }
        }
    }
}
