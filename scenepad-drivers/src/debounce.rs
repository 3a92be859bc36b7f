//! Switch debouncing and the key event queue
//!
//! Switches are sampled on a fixed tick, independent of whoever consumes
//! the events, so a tap during a long action sequence is still queued.
//! Each switch has an integrating debouncer: a counter that moves toward
//! the raw level one step per sample and only flips the debounced state at
//! either end of its range.

use embedded_hal::digital::InputPin;
use heapless::Deque;

use scenepad_core::traits::{InputSource, KeyEvent};

/// Capacity of the key event queue
pub const EVENT_QUEUE_LEN: usize = 64;

/// Integrating debouncer for one switch
#[derive(Debug, Clone, Copy)]
pub struct Debouncer {
    integrator: u8,
    threshold: u8,
    pressed: bool,
}

impl Debouncer {
    /// `threshold` consecutive agreeing samples flip the state
    pub const fn new(threshold: u8) -> Self {
        Self {
            integrator: 0,
            threshold: if threshold == 0 { 1 } else { threshold },
            pressed: false,
        }
    }

    /// Feed one raw sample; returns the new state when it changes
    pub fn update(&mut self, raw_pressed: bool) -> Option<bool> {
        if raw_pressed {
            self.integrator = self.integrator.saturating_add(1).min(self.threshold);
        } else {
            self.integrator = self.integrator.saturating_sub(1);
        }

        if self.integrator == self.threshold && !self.pressed {
            self.pressed = true;
            Some(true)
        } else if self.integrator == 0 && self.pressed {
            self.pressed = false;
            Some(false)
        } else {
            None
        }
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }
}

/// Read an active-low switch; a failed read counts as released
fn is_pressed<P: InputPin>(pin: &mut P) -> bool {
    pin.is_low().unwrap_or(false)
}

/// Debounced active-low push button
pub struct DebouncedButton<P> {
    pin: P,
    debouncer: Debouncer,
}

impl<P: InputPin> DebouncedButton<P> {
    pub fn new(pin: P, threshold: u8) -> Self {
        Self {
            pin,
            debouncer: Debouncer::new(threshold),
        }
    }

    /// Sample the pin and return the debounced level
    pub fn sample(&mut self) -> bool {
        let raw = is_pressed(&mut self.pin);
        self.debouncer.update(raw);
        self.debouncer.is_pressed()
    }
}

/// Debounced bank of active-low key switches feeding a FIFO
pub struct KeyScanner<P, const N: usize> {
    pins: [P; N],
    debouncers: [Debouncer; N],
    queue: Deque<KeyEvent, EVENT_QUEUE_LEN>,
    dropped: usize,
}

impl<P: InputPin, const N: usize> KeyScanner<P, N> {
    pub fn new(pins: [P; N], threshold: u8) -> Self {
        Self {
            pins,
            debouncers: [Debouncer::new(threshold); N],
            queue: Deque::new(),
            dropped: 0,
        }
    }

    /// Sample every key once and queue any debounced changes in key order
    pub fn scan(&mut self) {
        for (index, (pin, debouncer)) in self.pins.iter_mut().zip(self.debouncers.iter_mut()).enumerate() {
            let Some(pressed) = debouncer.update(is_pressed(pin)) else {
                continue;
            };
            let event = KeyEvent {
                key: index as u8,
                pressed,
            };
            // Full queue: the newest event is lost
            if self.queue.push_back(event).is_err() {
                self.dropped += 1;
            }
        }
    }

    /// Oldest queued event
    pub fn pop(&mut self) -> Option<KeyEvent> {
        self.queue.pop_front()
    }

    /// Events lost to a full queue since the last call
    pub fn take_dropped(&mut self) -> usize {
        core::mem::take(&mut self.dropped)
    }
}

/// Keys plus the encoder push switch
///
/// [`PadInput::scan`] samples every switch. The [`InputSource`] side only
/// reads what earlier scans recorded, so it can be drained at any pace.
pub struct PadInput<K, E, const N: usize> {
    keys: KeyScanner<K, N>,
    encoder: DebouncedButton<E>,
    encoder_level: bool,
}

impl<K: InputPin, E: InputPin, const N: usize> PadInput<K, E, N> {
    pub fn new(keys: KeyScanner<K, N>, encoder: DebouncedButton<E>) -> Self {
        Self {
            keys,
            encoder,
            encoder_level: false,
        }
    }

    /// Sample all switches once
    pub fn scan(&mut self) {
        self.keys.scan();
        self.encoder_level = self.encoder.sample();
    }

    /// Key events lost to a full queue since the last call
    pub fn take_dropped(&mut self) -> usize {
        self.keys.take_dropped()
    }
}

impl<K: InputPin, E: InputPin, const N: usize> InputSource for PadInput<K, E, N> {
    fn encoder_pressed(&mut self) -> bool {
        self.encoder_level
    }

    fn next_key_event(&mut self) -> Option<KeyEvent> {
        self.keys.pop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;
    use std::rc::Rc;
    use std::vec::Vec;

    /// Switch whose level the test controls; low = pressed
    #[derive(Clone)]
    struct MockSwitch {
        pressed: Rc<Cell<bool>>,
    }

    impl MockSwitch {
        fn new() -> Self {
            Self {
                pressed: Rc::new(Cell::new(false)),
            }
        }

        fn set(&self, pressed: bool) {
            self.pressed.set(pressed);
        }
    }

    impl ErrorType for MockSwitch {
        type Error = Infallible;
    }

    impl InputPin for MockSwitch {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.pressed.get())
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Ok(self.pressed.get())
        }
    }

    #[test]
    fn test_debouncer_needs_threshold_samples() {
        let mut d = Debouncer::new(3);
        assert_eq!(d.update(true), None);
        assert_eq!(d.update(true), None);
        assert_eq!(d.update(true), Some(true));
        assert_eq!(d.update(true), None);

        assert_eq!(d.update(false), None);
        assert_eq!(d.update(false), None);
        assert_eq!(d.update(false), Some(false));
    }

    #[test]
    fn test_debouncer_rejects_bounce() {
        let mut d = Debouncer::new(3);
        let samples = [true, false, true, false, true, true];
        let changes: Vec<_> = samples.iter().filter_map(|&s| d.update(s)).collect();
        assert!(changes.is_empty());
        assert_eq!(d.update(true), Some(true));
    }

    #[test]
    fn test_scanner_preserves_order() {
        let switches: [MockSwitch; 3] = core::array::from_fn(|_| MockSwitch::new());
        let mut scanner = KeyScanner::new(switches.clone(), 1);

        switches[2].set(true);
        scanner.scan();
        switches[0].set(true);
        switches[2].set(false);
        scanner.scan();

        assert_eq!(scanner.pop(), Some(KeyEvent::pressed(2)));
        assert_eq!(scanner.pop(), Some(KeyEvent::pressed(0)));
        assert_eq!(scanner.pop(), Some(KeyEvent::released(2)));
        assert_eq!(scanner.pop(), None);
    }

    #[test]
    fn test_full_queue_drops_newest() {
        let switch = MockSwitch::new();
        let mut scanner = KeyScanner::new([switch.clone()], 1);

        for _ in 0..EVENT_QUEUE_LEN + 2 {
            switch.set(!switch.pressed.get());
            scanner.scan();
        }

        assert_eq!(scanner.take_dropped(), 2);
        assert_eq!(scanner.take_dropped(), 0);
        // The oldest events survived, the newest were lost
        assert_eq!(scanner.pop(), Some(KeyEvent::pressed(0)));
        assert_eq!(core::iter::from_fn(|| scanner.pop()).count(), EVENT_QUEUE_LEN - 1);
    }

    #[test]
    fn test_debouncer_max_threshold() {
        let mut d = Debouncer::new(u8::MAX);
        let changes: Vec<_> = (0..300).filter_map(|_| d.update(true)).collect();
        assert_eq!(changes, [true]);
        assert!(d.is_pressed());
    }

    #[test]
    fn test_pad_input() {
        let key = MockSwitch::new();
        let encoder = MockSwitch::new();
        let mut input = PadInput::new(
            KeyScanner::new([key.clone()], 2),
            DebouncedButton::new(encoder.clone(), 2),
        );

        encoder.set(true);
        input.scan();
        assert!(!input.encoder_pressed());
        input.scan();
        assert!(input.encoder_pressed());

        key.set(true);
        input.scan();
        assert_eq!(input.next_key_event(), None);
        input.scan();
        assert_eq!(input.next_key_event(), Some(KeyEvent::pressed(0)));
        assert_eq!(input.next_key_event(), None);
    }

    #[test]
    fn test_tap_between_reads_is_queued() {
        let key = MockSwitch::new();
        let mut input = PadInput::new(
            KeyScanner::new([key.clone()], 1),
            DebouncedButton::new(MockSwitch::new(), 1),
        );

        // Pressed and released while nothing reads events
        key.set(true);
        input.scan();
        key.set(false);
        input.scan();
        input.scan();

        assert_eq!(input.next_key_event(), Some(KeyEvent::pressed(0)));
        assert_eq!(input.next_key_event(), Some(KeyEvent::released(0)));
        assert_eq!(input.next_key_event(), None);
        assert_eq!(input.take_dropped(), 0);
    }
}
