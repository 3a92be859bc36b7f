//! Events that trigger state transitions

use super::machine::HaltReason;
use crate::traits::KeyEvent;

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// A key or encoder edge resolved to a bound slot
    InputReceived(KeyEvent),
    /// Press or release pass finished
    DispatchComplete,
    /// Unrecoverable condition
    Fault(HaltReason),
}
