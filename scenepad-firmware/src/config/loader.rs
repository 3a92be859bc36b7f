//! Scene loading
//!
//! Parses the scene files embedded by the build script into the registry.
//! A file that fails to parse is logged with its name and skipped; the
//! remaining files still load.

use defmt::*;

use scenepad_core::config::parse_scene;
use scenepad_core::scene::RegistryError;
use scenepad_core::SceneRegistry;

// Generated by build.rs: `(file name, contents)` in load order
include!(concat!(env!("OUT_DIR"), "/scenes.rs"));

/// Scene files compiled into the image
pub fn embedded_scenes() -> &'static [(&'static str, &'static str)] {
    SCENE_FILES
}

/// Parse every file and register the selectable scenes
///
/// Returns the number of scenes registered.
pub fn load_scenes(files: &[(&str, &str)], registry: &mut SceneRegistry) -> usize {
    let mut loaded = 0;

    for &(file, text) in files {
        let parsed = match parse_scene(text) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("{}: skipped, {}", file, e);
                continue;
            }
        };

        if parsed.skipped > 0 {
            warn!("{}: {} action items dropped", file, parsed.skipped);
        }

        let name = parsed.scene.name.clone();
        match registry.register(parsed.scene) {
            Ok(()) => {
                debug!("{}: loaded '{}'", file, name.as_str());
                loaded += 1;
            }
            Err(RegistryError::MissingId) => {
                warn!("{}: '{}' has no id and is not selectable", file, name.as_str());
            }
            Err(RegistryError::Full) => {
                warn!("{}: registry full, '{}' not loaded", file, name.as_str());
            }
        }
    }

    info!("{} of {} scene files loaded", loaded, files.len());
    for scene in registry.iter() {
        debug!("Scene '{}': {}", scene.id().unwrap_or(""), scene.name.as_str());
    }
    loaded
}
