//! State machine definition

use super::events::Event;
use crate::traits::{KeyEvent, OutputError};

/// Dispatch loop states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Waiting for input
    Idle,
    /// Running the press or release pass for one event
    Dispatching(KeyEvent),
    /// Permanently stopped; input is never polled again
    Halted(HaltReason),
}

/// Why the loop halted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HaltReason {
    /// No scene file produced a registered scene
    NoScenes,
    /// An output device failed during dispatch
    Output(OutputError),
}

impl State {
    /// Check if this is the halted state
    pub fn is_halted(&self) -> bool {
        matches!(self, State::Halted(_))
    }

    /// Process an event and return the next state
    pub fn transition(self, event: Event) -> Self {
        use Event::*;
        use State::*;

        match (self, event) {
            // Halted absorbs everything
            (Halted(reason), _) => Halted(reason),

            (_, Fault(reason)) => Halted(reason),

            (Idle, InputReceived(input)) => Dispatching(input),
            (Dispatching(_), DispatchComplete) => Idle,

            // Default: stay in current state
            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_cycle() {
        let event = KeyEvent::pressed(3);
        let state = State::Idle.transition(Event::InputReceived(event));
        assert_eq!(state, State::Dispatching(event));

        let state = state.transition(Event::DispatchComplete);
        assert_eq!(state, State::Idle);
    }

    #[test]
    fn test_fault_from_any_state() {
        let states = [State::Idle, State::Dispatching(KeyEvent::released(0))];
        let reason = HaltReason::Output(OutputError::Transport);

        for state in states {
            let next = state.transition(Event::Fault(reason));
            assert_eq!(next, State::Halted(reason));
        }
    }

    #[test]
    fn test_halted_absorbs_events() {
        let halted = State::Halted(HaltReason::NoScenes);
        assert_eq!(
            halted.transition(Event::InputReceived(KeyEvent::pressed(0))),
            halted
        );
        assert_eq!(halted.transition(Event::DispatchComplete), halted);
        assert_eq!(
            halted.transition(Event::Fault(HaltReason::Output(OutputError::Display))),
            halted
        );
    }

    #[test]
    fn test_one_event_at_a_time() {
        // A second input while dispatching is not accepted
        let busy = State::Dispatching(KeyEvent::pressed(1));
        assert_eq!(busy.transition(Event::InputReceived(KeyEvent::pressed(2))), busy);

        // Completion without a dispatch is ignored
        assert_eq!(State::Idle.transition(Event::DispatchComplete), State::Idle);
    }
}
