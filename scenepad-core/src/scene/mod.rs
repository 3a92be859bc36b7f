//! Scenes: application profiles and their registry

mod activate;
pub mod limits;
pub mod registry;
pub mod types;

pub use limits::*;
pub use registry::{RegistryError, SceneRegistry};
pub use types::{Action, Binding, Color, KeyStep, MouseGesture, Scene, SceneId};
