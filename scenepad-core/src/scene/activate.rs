//! Rendering a scene onto the pad

use super::limits::KEY_COUNT;
use super::types::{Color, Scene};
use crate::traits::{
    ConsumerControl, Keyboard, LabelDisplay, Mouse, OutputError, PixelStrip, ToneGenerator,
};

impl Scene {
    /// Make this scene visible and drop all held output state
    ///
    /// Title and per-key colors/labels are buffered first, then every
    /// keyboard, consumer, mouse and tone state left over from the previous
    /// scene is released, and finally pixels and display are flushed once
    /// each.
    pub fn activate<B>(&self, board: &mut B) -> Result<(), OutputError>
    where
        B: Keyboard + ConsumerControl + Mouse + ToneGenerator + PixelStrip + LabelDisplay + ?Sized,
    {
        info!("Activating scene '{}'", self.name.as_str());

        board.set_title(&self.name);
        for index in 0..KEY_COUNT {
            match self.binding(index) {
                Some(binding) => {
                    board.set_pixel(index, binding.color);
                    board.set_label(index, &binding.label);
                }
                None => {
                    board.set_pixel(index, Color::OFF);
                    board.set_label(index, "");
                }
            }
        }

        board.release_all_keys()?;
        board.consumer_release()?;
        board.mouse_release_all()?;
        board.stop_tone()?;

        board.show_pixels()?;
        board.refresh_display()
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use proptest::prelude::*;

    use crate::scene::{Binding, Color, Scene, MAX_BINDINGS};
    use crate::testing::{Call, MockBoard};

    fn scene_with(count: usize) -> Scene {
        let mut scene = Scene::new(Some("test"), "Test");
        for i in 0..count {
            let mut label = heapless::String::<8>::new();
            core::fmt::write(&mut label, format_args!("K{}", i)).unwrap();
            scene
                .bindings
                .push(Binding::new(Color::new(0x10 + i as u32), &label, Vec::new()))
                .unwrap();
        }
        scene
    }

    #[test]
    fn test_activate_order() {
        let scene = scene_with(2);
        let mut board = MockBoard::new();
        scene.activate(&mut board).unwrap();

        let calls = &board.calls;
        let release = calls.iter().position(|c| *c == Call::ReleaseAllKeys).unwrap();
        let show = calls.iter().position(|c| *c == Call::ShowPixels).unwrap();
        let refresh = calls.iter().position(|c| *c == Call::RefreshDisplay).unwrap();

        // Buffers are filled before anything is flushed, flushes come last
        assert!(release < show);
        assert!(show < refresh);
        assert_eq!(refresh, calls.len() - 1);
        assert_eq!(board.count(&Call::ShowPixels), 1);
        assert_eq!(board.count(&Call::RefreshDisplay), 1);
    }

    #[test]
    fn test_activate_renders_title_and_blanks_unbound() {
        let scene = scene_with(3);
        let mut board = MockBoard::new();
        board.pixels = [Color::WHITE; 12];
        scene.activate(&mut board).unwrap();

        assert_eq!(board.title.as_str(), "Test");
        assert_eq!(board.pixels[2], Color::new(0x12));
        assert_eq!(board.labels[2].as_str(), "K2");
        assert_eq!(board.pixels[3], Color::OFF);
        assert_eq!(board.labels[3].as_str(), "");
        assert_eq!(board.pixels[11], Color::OFF);
    }

    proptest! {
        #[test]
        fn prop_activate_sets_bound_and_blanks_rest(count in 0usize..=MAX_BINDINGS) {
            let scene = scene_with(count);
            let mut board = MockBoard::new();
            board.pixels = [Color::WHITE; 12];
            scene.activate(&mut board).unwrap();

            for i in 0..12 {
                if i < count {
                    prop_assert_eq!(board.pixels[i], scene.bindings[i].color);
                    prop_assert_eq!(board.labels[i].as_str(), scene.bindings[i].label.as_str());
                } else {
                    prop_assert_eq!(board.pixels[i], Color::OFF);
                    prop_assert_eq!(board.labels[i].as_str(), "");
                }
            }
        }

        #[test]
        fn prop_activate_always_releases_everything(count in 0usize..=MAX_BINDINGS, held in any::<u8>()) {
            let scene = scene_with(count);
            let mut board = MockBoard::new();
            // Leave state behind from a "previous scene"
            board.key_down_raw(held);
            board.tone = Some(440);
            scene.activate(&mut board).unwrap();

            prop_assert_eq!(board.count(&Call::ReleaseAllKeys), 1);
            prop_assert_eq!(board.count(&Call::ConsumerRelease), 1);
            prop_assert_eq!(board.count(&Call::MouseReleaseAll), 1);
            prop_assert_eq!(board.count(&Call::StopTone), 1);
            prop_assert!(board.held_keys.is_empty());
            prop_assert!(board.tone.is_none());
        }
    }
}
