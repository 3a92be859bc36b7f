//! Scene file parsing
//!
//! Scene files are TOML documents, one scene per file. Parsing happens on
//! the device at startup, so it uses a small purpose-built parser rather
//! than a full TOML implementation.

pub mod toml;
pub mod value;

pub use self::toml::{parse_scene, ParseError, SceneFile};
pub use value::Value;
