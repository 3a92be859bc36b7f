//! Scene registry
//!
//! Holds every loaded scene keyed by id. Built once during startup and
//! only read afterwards.

use heapless::Vec;

use super::limits::{HOME_SCENE_ID, MAX_SCENES};
use super::types::Scene;

/// Reasons a scene is refused by the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegistryError {
    /// Scene has no id and can never be selected
    MissingId,
    /// Registry is at capacity
    Full,
}

/// Registry of loaded scenes
#[derive(Debug, Default)]
pub struct SceneRegistry {
    scenes: Vec<Scene, MAX_SCENES>,
}

impl SceneRegistry {
    pub const fn new() -> Self {
        Self { scenes: Vec::new() }
    }

    /// Insert a scene under its id
    ///
    /// A scene whose id is already registered replaces the earlier one in
    /// place, so the last loaded file wins.
    pub fn register(&mut self, scene: Scene) -> Result<(), RegistryError> {
        let id = scene.id().ok_or(RegistryError::MissingId)?;

        if let Some(existing) = self.scenes.iter_mut().find(|s| s.id() == Some(id)) {
            *existing = scene;
            return Ok(());
        }

        self.scenes.push(scene).map_err(|_| RegistryError::Full)
    }

    /// Find a scene by id
    pub fn lookup(&self, id: &str) -> Option<&Scene> {
        self.scenes.iter().find(|s| s.id() == Some(id))
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    /// Scenes in load order
    pub fn iter(&self) -> impl Iterator<Item = &Scene> {
        self.scenes.iter()
    }

    /// Scene the encoder button returns to
    ///
    /// This is the `home` scene when present, otherwise the first scene
    /// loaded. `None` only when the registry is empty.
    pub fn home(&self) -> Option<&Scene> {
        if let Some(home) = self.lookup(HOME_SCENE_ID) {
            return Some(home);
        }

        let fallback = self.scenes.first()?;
        warn!(
            "No '{}' scene, using '{}' as home",
            HOME_SCENE_ID,
            fallback.id().unwrap_or("")
        );
        Some(fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene(id: &str, name: &str) -> Scene {
        Scene::new(Some(id), name)
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = SceneRegistry::new();
        assert!(registry.is_empty());

        registry.register(scene("home", "Home")).unwrap();
        registry.register(scene("zoom", "Zoom")).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.lookup("zoom").unwrap().name.as_str(), "Zoom");
        assert!(registry.lookup("safari").is_none());
    }

    #[test]
    fn test_duplicate_id_overwrites() {
        let mut registry = SceneRegistry::new();
        registry.register(scene("zoom", "Old")).unwrap();
        registry.register(scene("home", "Home")).unwrap();
        registry.register(scene("zoom", "New")).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.lookup("zoom").unwrap().name.as_str(), "New");

        // Replacement keeps the original load position
        let names: std::vec::Vec<_> = registry.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["New", "Home"]);
    }

    #[test]
    fn test_missing_id_rejected() {
        let mut registry = SceneRegistry::new();
        let result = registry.register(Scene::new(None, "Mac Safari"));
        assert_eq!(result, Err(RegistryError::MissingId));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_full_registry() {
        let mut registry = SceneRegistry::new();
        for i in 0..MAX_SCENES {
            let mut id = heapless::String::<8>::new();
            core::fmt::write(&mut id, format_args!("s{}", i)).unwrap();
            registry.register(scene(&id, "x")).unwrap();
        }
        assert_eq!(registry.register(scene("extra", "x")), Err(RegistryError::Full));

        // Overwriting still works when full
        assert!(registry.register(scene("s3", "y")).is_ok());
    }

    #[test]
    fn test_home_prefers_home_id() {
        let mut registry = SceneRegistry::new();
        registry.register(scene("alpha", "Alpha")).unwrap();
        registry.register(scene("home", "Home")).unwrap();
        assert_eq!(registry.home().unwrap().id(), Some("home"));
    }

    #[test]
    fn test_home_falls_back_to_first_loaded() {
        let mut registry = SceneRegistry::new();
        assert!(registry.home().is_none());

        registry.register(scene("media", "Media")).unwrap();
        registry.register(scene("alpha", "Alpha")).unwrap();
        assert_eq!(registry.home().unwrap().id(), Some("media"));
    }
}
